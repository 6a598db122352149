use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;

use crate::overlay::domain::mask_status::MaskStatus;
use crate::shared::constants::{STICKER_HAPPY, STICKER_MIDDLE, STICKER_WORRIED};
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum StickerError {
    #[error("failed to load sticker {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("sticker {0} has no alpha channel")]
    MissingAlpha(PathBuf),
}

/// An RGBA overlay image.
#[derive(Clone, Debug)]
pub struct Sticker {
    image: RgbaImage,
}

impl Sticker {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Reads a PNG (or any format `image` decodes) that must carry alpha.
    pub fn load(path: &Path) -> Result<Self, StickerError> {
        let decoded = image::open(path).map_err(|source| StickerError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        if !decoded.color().has_alpha() {
            return Err(StickerError::MissingAlpha(path.to_path_buf()));
        }
        Ok(Self::new(decoded.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Alpha-composites the sticker onto `frame` with its top-left corner at
    /// `(x, y)`: `out = a * sticker + (1 - a) * frame`, `a = alpha / 255`.
    ///
    /// Pixels falling outside the frame are skipped.
    pub fn composite_onto(&self, frame: &mut Frame, x: u32, y: u32) {
        let fw = frame.width();
        let fh = frame.height();
        let mut dst = frame.as_ndarray_mut();

        for (sx, sy, pixel) in self.image.enumerate_pixels() {
            let (tx, ty) = (x + sx, y + sy);
            if tx >= fw || ty >= fh {
                continue;
            }
            let [r, g, b, a] = pixel.0;
            let alpha = a as f32 / 255.0;
            for (c, value) in [r, g, b].into_iter().enumerate() {
                let bg = dst[[ty as usize, tx as usize, c]] as f32;
                dst[[ty as usize, tx as usize, c]] = (alpha * value as f32 + (1.0 - alpha) * bg) as u8;
            }
        }
    }
}

/// The three stickers, loaded once and keyed by status.
#[derive(Clone, Debug)]
pub struct StickerSet {
    stickers: HashMap<MaskStatus, Sticker>,
}

impl StickerSet {
    pub fn new(happy: Sticker, middle: Sticker, worried: Sticker) -> Self {
        let stickers = HashMap::from([
            (MaskStatus::Mask, happy),
            (MaskStatus::MaskNotOnProperly, middle),
            (MaskStatus::NoMask, worried),
        ]);
        Self { stickers }
    }

    /// Loads `emoji_happy.png`, `emoji_middle.png` and `emoji_worried.png`
    /// from `dir`.
    pub fn load(dir: &Path) -> Result<Self, StickerError> {
        Ok(Self::new(
            Sticker::load(&dir.join(STICKER_HAPPY))?,
            Sticker::load(&dir.join(STICKER_MIDDLE))?,
            Sticker::load(&dir.join(STICKER_WORRIED))?,
        ))
    }

    pub fn for_status(&self, status: MaskStatus) -> &Sticker {
        &self.stickers[&status]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};
    use tempfile::TempDir;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Sticker {
        Sticker::new(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    #[test]
    fn test_opaque_sticker_replaces_background() {
        let mut frame = Frame::filled(10, 10, [10, 20, 30], 0);
        solid(2, 2, [200, 100, 50, 255]).composite_onto(&mut frame, 3, 4);
        let arr = frame.as_ndarray();
        assert_eq!(
            [arr[[4, 3, 0]], arr[[4, 3, 1]], arr[[4, 3, 2]]],
            [200, 100, 50]
        );
        assert_eq!(
            [arr[[5, 4, 0]], arr[[5, 4, 1]], arr[[5, 4, 2]]],
            [200, 100, 50]
        );
        // outside the sticker
        assert_eq!(
            [arr[[3, 3, 0]], arr[[3, 3, 1]], arr[[3, 3, 2]]],
            [10, 20, 30]
        );
    }

    #[test]
    fn test_transparent_sticker_keeps_background() {
        let mut frame = Frame::filled(10, 10, [10, 20, 30], 0);
        let before = frame.data().to_vec();
        solid(4, 4, [255, 255, 255, 0]).composite_onto(&mut frame, 0, 0);
        assert_eq!(frame.data(), &before[..]);
    }

    #[test]
    fn test_half_alpha_blends_and_truncates() {
        let mut frame = Frame::filled(4, 4, [0, 100, 255], 0);
        solid(1, 1, [255, 0, 0, 128]).composite_onto(&mut frame, 0, 0);
        let a = 128.0f32 / 255.0;
        let arr = frame.as_ndarray();
        assert_eq!(arr[[0, 0, 0]], (a * 255.0) as u8);
        assert_eq!(arr[[0, 0, 1]], ((1.0 - a) * 100.0) as u8);
        assert_eq!(arr[[0, 0, 2]], ((1.0 - a) * 255.0) as u8);
    }

    #[test]
    fn test_sticker_clipped_at_frame_edge() {
        let mut frame = Frame::filled(5, 5, [0, 0, 0], 0);
        solid(4, 4, [9, 9, 9, 255]).composite_onto(&mut frame, 3, 3);
        let arr = frame.as_ndarray();
        assert_eq!(arr[[4, 4, 0]], 9);
        assert_eq!(arr[[2, 2, 0]], 0);
    }

    #[test]
    fn test_sticker_fully_outside_frame_is_noop() {
        let mut frame = Frame::filled(5, 5, [1, 2, 3], 0);
        let before = frame.data().to_vec();
        solid(4, 4, [9, 9, 9, 255]).composite_onto(&mut frame, 75, 75);
        assert_eq!(frame.data(), &before[..]);
    }

    #[test]
    fn test_load_set_from_directory() {
        let dir = TempDir::new().unwrap();
        for (name, shade) in [
            ("emoji_happy.png", 10u8),
            ("emoji_middle.png", 20),
            ("emoji_worried.png", 30),
        ] {
            RgbaImage::from_pixel(3, 2, Rgba([shade, shade, shade, 255]))
                .save(dir.path().join(name))
                .unwrap();
        }

        let set = StickerSet::load(dir.path()).unwrap();
        let worried = set.for_status(MaskStatus::NoMask);
        assert_eq!((worried.width(), worried.height()), (3, 2));
        assert_eq!(worried.image.get_pixel(0, 0).0, [30, 30, 30, 255]);
        assert_eq!(
            set.for_status(MaskStatus::Mask).image.get_pixel(0, 0).0[0],
            10
        );
    }

    #[test]
    fn test_load_without_alpha_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flat.png");
        RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])).save(&path).unwrap();
        assert!(matches!(
            Sticker::load(&path),
            Err(StickerError::MissingAlpha(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = StickerSet::load(dir.path()).unwrap_err();
        assert!(matches!(err, StickerError::Load { .. }));
        assert!(err.to_string().contains("emoji_happy.png"));
    }
}
