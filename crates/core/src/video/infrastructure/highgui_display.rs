use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::highgui;
use opencv::prelude::*;

use crate::shared::frame::Frame;
use crate::video::domain::frame_display::FrameDisplay;

/// OpenCV HighGUI window.
///
/// Frames are RGB; HighGUI expects BGR, so each frame is swizzled into a
/// reusable `Mat` before `imshow`.
pub struct HighguiDisplay {
    title: String,
    canvas: Mat,
    open: bool,
}

impl HighguiDisplay {
    pub fn new(title: &str) -> Result<Self, Box<dyn std::error::Error>> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            title: title.to_string(),
            canvas: Mat::default(),
            open: true,
        })
    }
}

impl FrameDisplay for HighguiDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let (w, h) = (frame.width() as i32, frame.height() as i32);
        if self.canvas.cols() != w || self.canvas.rows() != h {
            self.canvas = Mat::new_rows_cols_with_default(h, w, CV_8UC3, Scalar::all(0.0))?;
        }

        let dst = self.canvas.data_bytes_mut()?;
        for (out, rgb) in dst.chunks_exact_mut(3).zip(frame.data().chunks_exact(3)) {
            out[0] = rgb[2];
            out[1] = rgb[1];
            out[2] = rgb[0];
        }

        highgui::imshow(&self.title, &self.canvas)?;
        Ok(())
    }

    fn poll_key(&mut self, timeout_ms: i32) -> Result<Option<char>, Box<dyn std::error::Error>> {
        let key = highgui::wait_key(timeout_ms)?;
        if key < 0 {
            return Ok(None);
        }
        Ok(char::from_u32((key & 0xFF) as u32))
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.open {
            highgui::destroy_all_windows()?;
            self.open = false;
        }
        Ok(())
    }
}
