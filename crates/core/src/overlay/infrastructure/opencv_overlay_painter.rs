use std::ffi::c_void;

use opencv::core::{Mat, Point, Scalar, CV_8UC3};
use opencv::imgproc;

use crate::overlay::domain::mask_status::Rgb;
use crate::overlay::domain::overlay_painter::OverlayPainter;
use crate::shared::frame::Frame;

pub const FONT_SCALE: f64 = 0.45;
pub const FONT_THICKNESS: i32 = 2;

/// Draws labels (Hershey simplex) and box outlines with OpenCV `imgproc`,
/// directly on the frame's pixel buffer.
#[derive(Default)]
pub struct OpencvOverlayPainter;

impl OpencvOverlayPainter {
    pub fn new() -> Self {
        Self
    }
}

impl OverlayPainter for OpencvOverlayPainter {
    fn put_text(
        &mut self,
        frame: &mut Frame,
        text: &str,
        origin: (i32, i32),
        color: Rgb,
    ) -> Result<(), Box<dyn std::error::Error>> {
        with_frame_mat(frame, |mat| {
            imgproc::put_text(
                mat,
                text,
                Point::new(origin.0, origin.1),
                imgproc::FONT_HERSHEY_SIMPLEX,
                FONT_SCALE,
                to_scalar(color),
                FONT_THICKNESS,
                imgproc::LINE_8,
                false,
            )
        })?;
        Ok(())
    }

    fn rectangle(
        &mut self,
        frame: &mut Frame,
        top_left: (i32, i32),
        bottom_right: (i32, i32),
        color: Rgb,
        thickness: i32,
    ) -> Result<(), Box<dyn std::error::Error>> {
        with_frame_mat(frame, |mat| {
            imgproc::rectangle_points(
                mat,
                Point::new(top_left.0, top_left.1),
                Point::new(bottom_right.0, bottom_right.1),
                to_scalar(color),
                thickness,
                imgproc::LINE_8,
                0,
            )
        })?;
        Ok(())
    }
}

/// Channel order is kept, so colors are passed in frame order.
fn to_scalar(color: Rgb) -> Scalar {
    let [c0, c1, c2] = color;
    Scalar::new(c0 as f64, c1 as f64, c2 as f64, 0.0)
}

/// Runs `draw` on a `Mat` header over the frame's bytes; nothing is copied.
fn with_frame_mat(
    frame: &mut Frame,
    draw: impl FnOnce(&mut Mat) -> opencv::Result<()>,
) -> opencv::Result<()> {
    if frame.width() == 0 || frame.height() == 0 {
        return Ok(());
    }
    let rows = frame.height() as i32;
    let cols = frame.width() as i32;
    let step = frame.width() as usize * Frame::CHANNELS;
    let data = frame.data_mut().as_mut_ptr().cast::<c_void>();

    // SAFETY: `data` points to `rows * step` bytes owned by `frame`, which is
    // mutably borrowed for the lifetime of `mat`. A Mat built over external
    // data never frees it.
    let mut mat = unsafe { Mat::new_rows_cols_with_data_unsafe(rows, cols, CV_8UC3, data, step)? };
    draw(&mut mat)
}
