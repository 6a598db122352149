use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::shared::config::CameraConfig;
use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

type SendError = Box<dyn std::error::Error + Send + Sync>;

/// Captures camera frames via ffmpeg-next (libavdevice + libavcodec) on a
/// background thread.
///
/// Only the most recent decoded frame is kept; [`FrameSource::read`] clones
/// it without touching the device.
pub struct FfmpegCameraSource {
    latest: Arc<Mutex<Option<Frame>>>,
    failure: Arc<Mutex<Option<String>>>,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl FfmpegCameraSource {
    /// Opens the device and blocks until the first frame is decoded.
    ///
    /// Fails if the device cannot be opened or produces no frame.
    pub fn start(config: &CameraConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let latest = Arc::new(Mutex::new(None));
        let failure = Arc::new(Mutex::new(None));
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), String>>(1);
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);

        let handle = {
            let config = config.clone();
            let latest = latest.clone();
            let failure = failure.clone();
            thread::Builder::new()
                .name("camera-capture".to_string())
                .spawn(move || {
                    let mut capture = Capture {
                        latest,
                        ready_tx: Some(ready_tx),
                        stop_rx,
                    };
                    if let Err(e) = capture.run(&config) {
                        let message = e.to_string();
                        log::error!("Camera capture stopped: {message}");
                        capture.signal_ready(Err(message.clone()));
                        if let Ok(mut slot) = failure.lock() {
                            *slot = Some(message);
                        }
                    }
                    capture.signal_ready(Err("Camera produced no frames".to_string()));
                })?
        };

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                latest,
                failure,
                stop_tx: Some(stop_tx),
                handle: Some(handle),
            }),
            Ok(Err(message)) => {
                let _ = handle.join();
                Err(message.into())
            }
            Err(_) => {
                let _ = handle.join();
                Err("Camera capture thread exited unexpectedly".into())
            }
        }
    }
}

impl FrameSource for FfmpegCameraSource {
    fn read(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        if let Some(message) = self.failure.lock().map_err(|e| e.to_string())?.as_ref() {
            return Err(format!("Camera failed: {message}").into());
        }
        self.latest
            .lock()
            .map_err(|e| e.to_string())?
            .clone()
            .ok_or_else(|| "No camera frame available".into())
    }

    fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for FfmpegCameraSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// State owned by the capture thread.
struct Capture {
    latest: Arc<Mutex<Option<Frame>>>,
    ready_tx: Option<Sender<Result<(), String>>>,
    stop_rx: Receiver<()>,
}

impl Capture {
    fn run(&mut self, config: &CameraConfig) -> Result<(), SendError> {
        let mut ictx = open_input(config)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;
        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let mut decoder = codec_ctx.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();
        let mut scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;
        log::info!("Camera opened: {} ({width}x{height})", config.device);

        let mut frame_index = 0;
        for (stream, packet) in ictx.packets() {
            if self.stop_requested() {
                return Ok(());
            }
            if stream.index() != video_stream_index {
                continue;
            }
            if decoder.send_packet(&packet).is_err() {
                continue;
            }
            self.drain(&mut decoder, &mut scaler, width, height, &mut frame_index)?;
        }

        // Flush formats that buffer their last frame (single images, files)
        let _ = decoder.send_eof();
        self.drain(&mut decoder, &mut scaler, width, height, &mut frame_index)?;
        log::debug!("Camera input ended after {frame_index} frames");
        Ok(())
    }

    fn drain(
        &mut self,
        decoder: &mut ffmpeg_next::decoder::Video,
        scaler: &mut ffmpeg_next::software::scaling::Context,
        width: u32,
        height: u32,
        frame_index: &mut usize,
    ) -> Result<(), SendError> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        while decoder.receive_frame(&mut decoded).is_ok() {
            let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
            scaler.run(&decoded, &mut rgb_frame)?;
            let pixels = extract_rgb_pixels(&rgb_frame, width, height);
            let frame = Frame::new(pixels, width, height, *frame_index);
            *frame_index += 1;

            *self.latest.lock().map_err(|e| e.to_string())? = Some(frame);
            self.signal_ready(Ok(()));
        }
        Ok(())
    }

    fn stop_requested(&self) -> bool {
        !matches!(self.stop_rx.try_recv(), Err(TryRecvError::Empty))
    }

    /// Reports the startup outcome once; later calls are ignored.
    fn signal_ready(&mut self, result: Result<(), String>) {
        if let Some(tx) = self.ready_tx.take() {
            let _ = tx.send(result);
        }
    }
}

/// Opens `config.device` through the named libavdevice format, or as a
/// regular media input when no format is configured.
fn open_input(config: &CameraConfig) -> Result<ffmpeg_next::format::context::Input, SendError> {
    ffmpeg_next::init()?;

    let Some(name) = config.input_format.as_deref() else {
        return Ok(ffmpeg_next::format::input(&config.device)?);
    };

    ffmpeg_next::device::register_all();
    let format = ffmpeg_next::device::input::video()
        .find(|f| f.name() == name)
        .ok_or_else(|| format!("Capture format '{name}' is not available in this ffmpeg build"))?;
    let ctx =
        ffmpeg_next::format::open_with(&config.device, &format, ffmpeg_next::Dictionary::new())?;
    Ok(ctx.input())
}

fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
