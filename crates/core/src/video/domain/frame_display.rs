use crate::shared::frame::Frame;

/// A named on-screen surface that shows frames and reports key presses.
pub trait FrameDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Waits up to `timeout_ms` for a key press. Also paces the display
    /// loop, since windows only repaint while events are pumped.
    fn poll_key(&mut self, timeout_ms: i32) -> Result<Option<char>, Box<dyn std::error::Error>>;

    /// Closes the surface. Idempotent.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
