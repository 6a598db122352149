pub mod detect_and_predict;
pub mod monitor_loop;
pub mod pipeline_logger;
pub mod preprocess;
