pub mod opencv_overlay_painter;
