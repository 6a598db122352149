use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_BLOB_SCALE, DEFAULT_CAMERA_DEVICE, DEFAULT_CAMERA_FORMAT,
    DEFAULT_CONFIDENCE, DEFAULT_DETECTOR_THRESHOLD, DEFAULT_FACE_DETECTOR_DIR,
    DEFAULT_MASK_MODEL_PATH, DISPLAY_HEIGHT, DISPLAY_WIDTH, WARMUP_MS,
};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    OutOfUnitRange { name: &'static str, value: f32 },
    #[error("blob scale must be positive and finite, got {0}")]
    InvalidScale(f32),
    #[error("batch size must be at least 1")]
    ZeroBatchSize,
    #[error("frame size must be non-zero, got {0}x{1}")]
    ZeroFrameSize(u32, u32),
}

/// Where frames come from.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    /// Device name or path (`/dev/video0`, `0`, ...), or a media file/URL.
    pub device: String,
    /// libavdevice input format (`v4l2`, `avfoundation`, `dshow`).
    /// `None` lets ffmpeg probe `device` as a regular input.
    pub input_format: Option<String>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: DEFAULT_CAMERA_DEVICE.to_string(),
            input_format: Some(DEFAULT_CAMERA_FORMAT.to_string()),
        }
    }
}

/// Channel order of the face crops handed to the mask classifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Blue, green, red, as OpenCV capture delivers camera frames.
    #[default]
    Bgr,
    Rgb,
}

/// Pipeline tuning shared by the detector and classifier stages.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Minimum detection confidence; candidates at or below are dropped.
    pub confidence: f32,
    /// Likelihood threshold passed to the localizer.
    pub detector_threshold: f32,
    /// Multiplier applied to mean-subtracted blob values.
    pub blob_scale: f32,
    pub classifier_channels: ChannelOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE,
            detector_threshold: DEFAULT_DETECTOR_THRESHOLD,
            blob_scale: DEFAULT_BLOB_SCALE,
            classifier_channels: ChannelOrder::default(),
        }
    }
}

/// Startup configuration, built once and handed to every component.
#[derive(Clone, Debug, PartialEq)]
pub struct MonitorConfig {
    /// Face detector model file, or a directory containing one.
    pub face_detector: PathBuf,
    /// Serialized mask classifier (ONNX).
    pub mask_model: PathBuf,
    /// Directory holding the three emoji stickers.
    pub sticker_dir: PathBuf,
    pub pipeline: PipelineConfig,
    pub batch_size: usize,
    pub camera: CameraConfig,
    pub frame_width: u32,
    pub frame_height: u32,
    pub warmup: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            face_detector: PathBuf::from(DEFAULT_FACE_DETECTOR_DIR),
            mask_model: PathBuf::from(DEFAULT_MASK_MODEL_PATH),
            sticker_dir: PathBuf::from("."),
            pipeline: PipelineConfig::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            camera: CameraConfig::default(),
            frame_width: DISPLAY_WIDTH,
            frame_height: DISPLAY_HEIGHT,
            warmup: Duration::from_millis(WARMUP_MS),
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit_range("confidence", self.pipeline.confidence)?;
        check_unit_range("detector threshold", self.pipeline.detector_threshold)?;
        let scale = self.pipeline.blob_scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidScale(scale));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::ZeroFrameSize(
                self.frame_width,
                self.frame_height,
            ));
        }
        Ok(())
    }
}

fn check_unit_range(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}
