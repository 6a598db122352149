/// File looked up inside the `--face` directory.
pub const FACE_DETECTOR_FILENAME: &str = "face_detector.onnx";

pub const DEFAULT_FACE_DETECTOR_DIR: &str = "face_detector";
pub const DEFAULT_MASK_MODEL_PATH: &str = "mask_detector.model";

/// Minimum detection confidence kept by the pipeline (strict `>`).
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Likelihood threshold handed to the localizer itself.
pub const DEFAULT_DETECTOR_THRESHOLD: f32 = 0.5;

pub const DEFAULT_BLOB_SCALE: f32 = 1.0;

/// Detector input resolution.
pub const BLOB_SIZE: u32 = 300;

/// Per-channel means in B, G, R order, subtracted before detection.
pub const BLOB_MEAN_BGR: [f32; 3] = [104.0, 177.0, 123.0];

/// Classifier input resolution.
pub const FACE_CROP_SIZE: u32 = 224;

pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Fixed size every camera frame is resized to before inference.
pub const DISPLAY_WIDTH: u32 = 640;
pub const DISPLAY_HEIGHT: u32 = 480;

pub const WARMUP_MS: u64 = 2000;

pub const WINDOW_TITLE: &str = "Frame";
pub const QUIT_KEY: char = 'q';
pub const KEY_POLL_MS: i32 = 1;

pub const STICKER_HAPPY: &str = "emoji_happy.png";
pub const STICKER_MIDDLE: &str = "emoji_middle.png";
pub const STICKER_WORRIED: &str = "emoji_worried.png";

/// Top-left corner of the sticker, independent of the face position.
pub const STICKER_OFFSET: (u32, u32) = (75, 75);

#[cfg(target_os = "linux")]
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
#[cfg(target_os = "linux")]
pub const DEFAULT_CAMERA_FORMAT: &str = "v4l2";

#[cfg(target_os = "macos")]
pub const DEFAULT_CAMERA_DEVICE: &str = "0";
#[cfg(target_os = "macos")]
pub const DEFAULT_CAMERA_FORMAT: &str = "avfoundation";

#[cfg(target_os = "windows")]
pub const DEFAULT_CAMERA_DEVICE: &str = "video=Integrated Camera";
#[cfg(target_os = "windows")]
pub const DEFAULT_CAMERA_FORMAT: &str = "dshow";

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const DEFAULT_CAMERA_FORMAT: &str = "v4l2";
