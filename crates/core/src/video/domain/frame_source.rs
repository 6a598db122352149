use crate::shared::frame::Frame;

/// Supplies the latest available camera frame.
///
/// `read` must not wait on hardware I/O: implementations buffer frames in
/// the background and hand out the most recent one, which may be the same
/// frame as the previous call.
pub trait FrameSource: Send {
    fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;

    /// Stops capturing and releases the device. Idempotent.
    fn stop(&mut self);
}
