use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::{s, Array3, Array4, ArrayViewMut3};

use crate::shared::config::ChannelOrder;
use crate::shared::constants::{BLOB_MEAN_BGR, BLOB_SIZE, FACE_CROP_SIZE};
use crate::shared::frame::Frame;

/// Builds the detector blob: bilinear resize to `BLOB_SIZE²`, B,G,R channel
/// order, per-channel mean subtraction, then `scale`. Layout is NCHW.
pub fn detector_blob(frame: &Frame, scale: f32) -> Array4<f32> {
    let resized = frame.resized(BLOB_SIZE, BLOB_SIZE);
    let src = resized.as_ndarray();
    let s = BLOB_SIZE as usize;

    let mut blob = Array4::<f32>::zeros((1, 3, s, s));
    for y in 0..s {
        for x in 0..s {
            for (c, mean) in BLOB_MEAN_BGR.iter().enumerate() {
                // plane 0 is blue, which is RGB channel 2
                let value = src[[y, x, 2 - c]] as f32;
                blob[[0, c, y, x]] = (value - mean) * scale;
            }
        }
    }
    blob
}

/// Resizes an RGB face crop to `FACE_CROP_SIZE²` and scales pixels to
/// `[-1, 1]`.
///
/// Output is HWC with channels in `order`, ready to be stacked into an NHWC
/// batch.
pub fn face_tensor(crop: &RgbImage, order: ChannelOrder) -> Array3<f32> {
    let size = FACE_CROP_SIZE;
    let resized = imageops::resize(crop, size, size, FilterType::Triangle);
    let s = size as usize;
    let mut tensor = Array3::<f32>::zeros((s, s, 3));
    write_face(&resized, order, tensor.view_mut());
    tensor
}

/// Stacks face tensors into an NHWC batch, preserving order.
pub fn stack_faces(faces: &[Array3<f32>]) -> Array4<f32> {
    let s = FACE_CROP_SIZE as usize;
    let mut batch = Array4::<f32>::zeros((faces.len(), s, s, 3));
    for (i, face) in faces.iter().enumerate() {
        batch.slice_mut(s![i, .., .., ..]).assign(face);
    }
    batch
}

fn write_face(image: &RgbImage, order: ChannelOrder, mut out: ArrayViewMut3<'_, f32>) {
    for (x, y, pixel) in image.enumerate_pixels() {
        for c in 0..3 {
            let src = match order {
                ChannelOrder::Bgr => 2 - c,
                ChannelOrder::Rgb => c,
            };
            out[[y as usize, x as usize, c]] = pixel.0[src] as f32 / 127.5 - 1.0;
        }
    }
}
