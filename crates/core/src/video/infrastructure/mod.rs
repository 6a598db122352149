pub mod ffmpeg_camera_source;
pub mod highgui_display;
