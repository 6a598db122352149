use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use maskwatch_core::classification::infrastructure::onnx_mask_classifier::OnnxMaskClassifier;
use maskwatch_core::detection::infrastructure::model_locator;
use maskwatch_core::detection::infrastructure::onnx_ssd_localizer::OnnxSsdLocalizer;
use maskwatch_core::overlay::domain::overlay_renderer::OverlayRenderer;
use maskwatch_core::overlay::domain::sticker::StickerSet;
use maskwatch_core::overlay::infrastructure::opencv_overlay_painter::OpencvOverlayPainter;
use maskwatch_core::pipeline::detect_and_predict::DetectAndPredict;
use maskwatch_core::pipeline::monitor_loop::MonitorLoop;
use maskwatch_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use maskwatch_core::shared::config::{CameraConfig, ChannelOrder, MonitorConfig, PipelineConfig};
use maskwatch_core::shared::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CAMERA_DEVICE, DEFAULT_CAMERA_FORMAT, DEFAULT_FACE_DETECTOR_DIR,
    DEFAULT_MASK_MODEL_PATH, DISPLAY_HEIGHT, DISPLAY_WIDTH, FACE_DETECTOR_FILENAME, WARMUP_MS,
    WINDOW_TITLE,
};
use maskwatch_core::video::infrastructure::ffmpeg_camera_source::FfmpegCameraSource;
use maskwatch_core::video::infrastructure::highgui_display::HighguiDisplay;

/// Input format value that lets ffmpeg probe `--device` as a plain media input.
const AUTO_INPUT_FORMAT: &str = "auto";

/// Live face mask monitor for a local camera. Press `q` in the window to quit.
#[derive(Parser, Debug)]
#[command(name = "mask-monitor")]
struct Cli {
    /// Face detector model file, or a directory containing face_detector.onnx.
    #[arg(short, long, default_value = DEFAULT_FACE_DETECTOR_DIR)]
    face: PathBuf,

    /// Face mask classifier model (ONNX).
    #[arg(short, long, default_value = DEFAULT_MASK_MODEL_PATH)]
    model: PathBuf,

    /// Minimum probability to keep a detected face (0.0-1.0).
    #[arg(short, long, default_value = "0.5")]
    confidence: f32,

    /// Likelihood threshold applied inside the face detector (0.0-1.0).
    #[arg(long, default_value = "0.5")]
    detector_threshold: f32,

    /// Multiplier applied to the mean-subtracted detector input.
    #[arg(long, default_value = "1.0")]
    scale: f32,

    /// Feed classifier crops in RGB order instead of BGR.
    #[arg(long)]
    classifier_rgb: bool,

    /// Maximum faces per classifier invocation.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Capture device (e.g. /dev/video0), or a media file/URL with --input-format auto.
    #[arg(long, default_value = DEFAULT_CAMERA_DEVICE)]
    device: String,

    /// libavdevice input format (v4l2, avfoundation, dshow), or "auto".
    #[arg(long, default_value = DEFAULT_CAMERA_FORMAT)]
    input_format: String,

    /// Directory containing emoji_happy.png, emoji_middle.png and emoji_worried.png.
    #[arg(long, default_value = ".")]
    stickers: PathBuf,

    /// Delay after the camera starts before the first frame is processed.
    #[arg(long, default_value_t = WARMUP_MS)]
    warmup_ms: u64,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = to_config(cli);
    config.validate()?;

    log::info!("loading face detector model...");
    let face_path = model_locator::locate(&config.face_detector, FACE_DETECTOR_FILENAME)?;
    let localizer = OnnxSsdLocalizer::new(&face_path)?;

    log::info!("loading face mask detector model...");
    let mask_path = model_locator::require_file(&config.mask_model)?;
    let classifier = OnnxMaskClassifier::new(&mask_path, config.batch_size)?;

    let stickers = StickerSet::load(&config.sticker_dir)?;

    log::info!("starting video stream...");
    let source = FfmpegCameraSource::start(&config.camera)?;
    let display = HighguiDisplay::new(WINDOW_TITLE)?;

    let pipeline = DetectAndPredict::new(
        Box::new(localizer),
        Box::new(classifier),
        config.pipeline.clone(),
    );
    let renderer = OverlayRenderer::new(stickers, Box::new(OpencvOverlayPainter::new()));

    let mut monitor = MonitorLoop::new(
        Box::new(source),
        Box::new(display),
        pipeline,
        renderer,
        Box::new(StdoutPipelineLogger::default()),
        (config.frame_width, config.frame_height),
    );
    monitor.run(config.warmup)
}

fn to_config(cli: Cli) -> MonitorConfig {
    let input_format = if cli.input_format.eq_ignore_ascii_case(AUTO_INPUT_FORMAT) {
        None
    } else {
        Some(cli.input_format)
    };

    MonitorConfig {
        face_detector: cli.face,
        mask_model: cli.model,
        sticker_dir: cli.stickers,
        pipeline: PipelineConfig {
            confidence: cli.confidence,
            detector_threshold: cli.detector_threshold,
            blob_scale: cli.scale,
            classifier_channels: if cli.classifier_rgb {
                ChannelOrder::Rgb
            } else {
                ChannelOrder::Bgr
            },
        },
        batch_size: cli.batch_size,
        camera: CameraConfig {
            device: cli.device,
            input_format,
        },
        frame_width: DISPLAY_WIDTH,
        frame_height: DISPLAY_HEIGHT,
        warmup: Duration::from_millis(cli.warmup_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> MonitorConfig {
        let argv = std::iter::once("mask-monitor").chain(args.iter().copied());
        to_config(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_defaults_match_monitor_config_default() {
        assert_eq!(parse(&[]), MonitorConfig::default());
    }

    #[test]
    fn test_short_flags() {
        let config = parse(&["-f", "models/faces", "-m", "mask.onnx", "-c", "0.7"]);
        assert_eq!(config.face_detector, PathBuf::from("models/faces"));
        assert_eq!(config.mask_model, PathBuf::from("mask.onnx"));
        assert_eq!(config.pipeline.confidence, 0.7);
    }

    #[test]
    fn test_auto_input_format_probes_device() {
        let config = parse(&["--device", "clip.mp4", "--input-format", "auto"]);
        assert_eq!(config.camera.device, "clip.mp4");
        assert_eq!(config.camera.input_format, None);
    }

    #[test]
    fn test_classifier_rgb_flag() {
        assert_eq!(parse(&[]).pipeline.classifier_channels, ChannelOrder::Bgr);
        let config = parse(&["--classifier-rgb"]);
        assert_eq!(config.pipeline.classifier_channels, ChannelOrder::Rgb);
    }

    #[test]
    fn test_out_of_range_confidence_fails_validation() {
        assert!(parse(&["--confidence", "1.5"]).validate().is_err());
    }

    #[test]
    fn test_zero_batch_size_fails_validation() {
        assert!(parse(&["--batch-size", "0"]).validate().is_err());
    }
}
