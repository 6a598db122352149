use std::time::{Duration, Instant};

use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::pipeline::detect_and_predict::DetectAndPredict;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::constants::{KEY_POLL_MS, QUIT_KEY};
use crate::video::domain::frame_display::FrameDisplay;
use crate::video::domain::frame_source::FrameSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonitorState {
    /// Components built, camera warming up.
    Init,
    /// Pulling, analysing and displaying frames.
    Running,
    /// Quit requested or a fatal error occurred; resources released.
    Terminated,
}

/// Single-threaded monitor loop: read → resize → detect/classify → render
/// → show → poll for the quit key.
pub struct MonitorLoop {
    source: Box<dyn FrameSource>,
    display: Box<dyn FrameDisplay>,
    pipeline: DetectAndPredict,
    renderer: OverlayRenderer,
    logger: Box<dyn PipelineLogger>,
    frame_size: (u32, u32),
    state: MonitorState,
}

impl MonitorLoop {
    pub fn new(
        source: Box<dyn FrameSource>,
        display: Box<dyn FrameDisplay>,
        pipeline: DetectAndPredict,
        renderer: OverlayRenderer,
        logger: Box<dyn PipelineLogger>,
        frame_size: (u32, u32),
    ) -> Self {
        Self {
            source,
            display,
            pipeline,
            renderer,
            logger,
            frame_size,
            state: MonitorState::Init,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Waits `warmup` for the sensor to settle, then loops until the quit
    /// key is pressed. Resources are released on every exit path.
    pub fn run(&mut self, warmup: Duration) -> Result<(), Box<dyn std::error::Error>> {
        if self.state != MonitorState::Init {
            return Err(format!("Monitor cannot start from state {:?}", self.state).into());
        }
        if !warmup.is_zero() {
            std::thread::sleep(warmup);
        }
        self.state = MonitorState::Running;

        let result = self.run_until_quit();
        let shutdown = self.terminate();
        result.and(shutdown)
    }

    fn run_until_quit(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        while self.state == MonitorState::Running {
            if self.step()? {
                log::info!("Quit key pressed");
                return Ok(());
            }
        }
        Ok(())
    }

    /// Processes one frame. Returns `true` when the quit key was pressed.
    pub fn step(&mut self) -> Result<bool, Box<dyn std::error::Error>> {
        let (width, height) = self.frame_size;
        let mut frame = self.source.read()?.resized(width, height);

        let t0 = Instant::now();
        let detections = self.pipeline.locate(&frame)?;
        let t1 = Instant::now();
        let assessments = self.pipeline.classify(&frame, detections)?;
        let t2 = Instant::now();
        self.renderer.render_all(&mut frame, &assessments)?;
        let t3 = Instant::now();
        self.display.show(&frame)?;
        let key = self.display.poll_key(KEY_POLL_MS)?;
        let t4 = Instant::now();

        self.logger.timing("detect", ms(t1 - t0));
        self.logger.timing("classify", ms(t2 - t1));
        self.logger.timing("render", ms(t3 - t2));
        self.logger.timing("display", ms(t4 - t3));
        self.logger.metric("faces", assessments.len() as f64);
        self.logger.frame_done(frame.index());

        Ok(key == Some(QUIT_KEY))
    }

    fn terminate(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.state == MonitorState::Terminated {
            return Ok(());
        }
        self.state = MonitorState::Terminated;
        self.source.stop();
        self.logger.summary();
        self.display.close()
    }
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::domain::mask_classifier::MaskClassifier;
    use crate::classification::domain::prediction::Prediction;
    use crate::detection::domain::detection::{LocalizerOutput, RawCandidate};
    use crate::detection::domain::face_localizer::FaceLocalizer;
    use crate::overlay::domain::mask_status::Rgb;
    use crate::overlay::domain::sticker::{Sticker, StickerSet};
    use crate::overlay::domain::overlay_painter::OverlayPainter;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::shared::config::PipelineConfig;
    use crate::shared::frame::Frame;
    use image::{Rgba, RgbaImage};
    use ndarray::{Array4, Axis};
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    #[derive(Default)]
    struct Events {
        shown: Vec<(u32, u32, usize)>,
        last: Option<Frame>,
        reads: usize,
        stopped: bool,
        closed: bool,
    }

    struct StubSource {
        events: Arc<Mutex<Events>>,
        fail_on_read: Option<usize>,
    }

    impl FrameSource for StubSource {
        fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
            let mut events = self.events.lock().unwrap();
            events.reads += 1;
            if self.fail_on_read == Some(events.reads) {
                return Err("camera unplugged".into());
            }
            Ok(Frame::filled(1280, 960, [90, 90, 90], events.reads))
        }

        fn stop(&mut self) {
            self.events.lock().unwrap().stopped = true;
        }
    }

    /// Replays `keys` one poll at a time, then reports no key.
    struct ScriptedDisplay {
        events: Arc<Mutex<Events>>,
        keys: Vec<Option<char>>,
    }

    impl FrameDisplay for ScriptedDisplay {
        fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
            let mut events = self.events.lock().unwrap();
            events
                .shown
                .push((frame.width(), frame.height(), frame.index()));
            events.last = Some(frame.clone());
            Ok(())
        }

        fn poll_key(&mut self, timeout_ms: i32) -> Result<Option<char>, Box<dyn std::error::Error>> {
            assert_eq!(timeout_ms, 1);
            Ok(if self.keys.is_empty() {
                None
            } else {
                self.keys.remove(0)
            })
        }

        fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.events.lock().unwrap().closed = true;
            Ok(())
        }
    }

    struct OneFaceLocalizer;

    impl FaceLocalizer for OneFaceLocalizer {
        fn localize(
            &mut self,
            _blob: &Array4<f32>,
            _threshold: f32,
        ) -> Result<LocalizerOutput, Box<dyn std::error::Error>> {
            Ok(LocalizerOutput {
                candidates: vec![RawCandidate {
                    confidence: 0.95,
                    bbox: [0.4, 0.4, 0.6, 0.6],
                }],
                landmarks: Vec::new(),
            })
        }
    }

    struct MaskedClassifier;

    impl MaskClassifier for MaskedClassifier {
        fn classify(
            &mut self,
            faces: &Array4<f32>,
        ) -> Result<Vec<Prediction>, Box<dyn std::error::Error>> {
            Ok(vec![Prediction::new(0.97, 0.03); faces.len_of(Axis(0))])
        }
    }

    struct NoopPainter;

    impl OverlayPainter for NoopPainter {
        fn put_text(
            &mut self,
            _frame: &mut Frame,
            _text: &str,
            _origin: (i32, i32),
            _color: Rgb,
        ) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }

        fn rectangle(
            &mut self,
            _frame: &mut Frame,
            _top_left: (i32, i32),
            _bottom_right: (i32, i32),
            _color: Rgb,
            _thickness: i32,
        ) -> Result<(), Box<dyn std::error::Error>> {
            Ok(())
        }
    }

    fn monitor(keys: Vec<Option<char>>, fail_on_read: Option<usize>) -> (MonitorLoop, Arc<Mutex<Events>>) {
        let events = Arc::new(Mutex::new(Events::default()));
        let sticker = || Sticker::new(RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255])));
        let pipeline = DetectAndPredict::new(
            Box::new(OneFaceLocalizer),
            Box::new(MaskedClassifier),
            PipelineConfig::default(),
        );
        let renderer = OverlayRenderer::new(
            StickerSet::new(sticker(), sticker(), sticker()),
            Box::new(NoopPainter),
        );
        let monitor = MonitorLoop::new(
            Box::new(StubSource {
                events: events.clone(),
                fail_on_read,
            }),
            Box::new(ScriptedDisplay {
                events: events.clone(),
                keys,
            }),
            pipeline,
            renderer,
            Box::new(NullPipelineLogger),
            (640, 480),
        );
        (monitor, events)
    }

    #[test]
    fn test_starts_in_init() {
        let (monitor, _) = monitor(vec![], None);
        assert_eq!(monitor.state(), MonitorState::Init);
    }

    #[test]
    fn test_quit_key_terminates_and_releases_resources() {
        let (mut monitor, events) = monitor(vec![None, Some('x'), Some('q')], None);
        monitor.run(Duration::ZERO).unwrap();

        assert_eq!(monitor.state(), MonitorState::Terminated);
        let events = events.lock().unwrap();
        assert_eq!(events.shown.len(), 3);
        assert!(events.stopped);
        assert!(events.closed);
    }

    #[test]
    fn test_uppercase_q_does_not_quit() {
        let (mut monitor, events) = monitor(vec![Some('Q'), Some('q')], None);
        monitor.run(Duration::ZERO).unwrap();
        assert_eq!(events.lock().unwrap().shown.len(), 2);
    }

    #[test]
    fn test_frames_resized_before_display() {
        let (mut monitor, events) = monitor(vec![Some('q')], None);
        monitor.run(Duration::ZERO).unwrap();
        assert_eq!(events.lock().unwrap().shown[0], (640, 480, 1));
    }

    #[test]
    fn test_step_renders_overlay_onto_frame() {
        let (mut monitor, events) = monitor(vec![None], None);
        assert!(!monitor.step().unwrap());

        let events = events.lock().unwrap();
        let shown = events.last.as_ref().unwrap().as_ndarray();
        // white sticker at its fixed offset
        assert_eq!(shown[[76, 76, 0]], 255);
        assert_eq!(shown[[400, 500, 0]], 90);
    }

    #[test]
    fn test_read_failure_terminates_with_error() {
        let (mut monitor, events) = monitor(vec![], Some(2));
        let err = monitor.run(Duration::ZERO).unwrap_err();

        assert!(err.to_string().contains("camera unplugged"));
        assert_eq!(monitor.state(), MonitorState::Terminated);
        let events = events.lock().unwrap();
        assert_eq!(events.shown.len(), 1);
        assert!(events.stopped);
        assert!(events.closed);
    }

    #[test]
    fn test_run_twice_is_rejected() {
        let (mut monitor, _) = monitor(vec![Some('q')], None);
        monitor.run(Duration::ZERO).unwrap();
        assert!(monitor.run(Duration::ZERO).is_err());
    }
}
