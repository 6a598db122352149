pub mod mask_status;
pub mod overlay_painter;
pub mod overlay_renderer;
pub mod sticker;
