//! Real-time face mask monitoring: SSD face localization, batched mask
//! classification and on-frame overlays over a live camera feed.

pub mod classification;
pub mod detection;
pub mod overlay;
pub mod pipeline;
pub mod shared;
pub mod video;
