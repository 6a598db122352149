use crate::overlay::domain::mask_status::Rgb;
use crate::shared::frame::Frame;

/// Drawing primitives the overlay renderer needs. Coordinates are frame
/// pixels and colors are in frame (RGB) order.
pub trait OverlayPainter: Send {
    /// Draws `text` with its baseline starting at `origin`.
    fn put_text(
        &mut self,
        frame: &mut Frame,
        text: &str,
        origin: (i32, i32),
        color: Rgb,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Outlines the rectangle with corners `top_left` and `bottom_right`
    /// (both inclusive). The stroke is centred on the edge.
    fn rectangle(
        &mut self,
        frame: &mut Frame,
        top_left: (i32, i32),
        bottom_right: (i32, i32),
        color: Rgb,
        thickness: i32,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
