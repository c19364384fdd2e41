pub mod detector;
pub mod letterbox;
pub mod onnx_detector;
pub mod postprocess;
