use crate::detection::detector::{validate_threshold, DetectionError, Detector};
use crate::detection::letterbox::letterbox;
use crate::detection::postprocess::{decode_predictions, prediction_matrix};
use crate::utils::config::Config;
use common::diagnosis::detection::Detection;
use image::DynamicImage;
use ort::logging::LogLevel;
use ort::session::Session;
use ort::value::TensorRef;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

/// YOLO detector exported to ONNX, loaded once and shared by every request.
pub struct OnnxDetector {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    labels: Vec<String>,
    input_size: u32,
    iou_threshold: f32,
}

impl OnnxDetector {
    pub fn load(config: &Config) -> Result<Self, DetectionError> {
        let labels = load_labels(&config.labels_path)?;
        let model_path = config.model_path.display().to_string();
        let session = Session::builder()
            .and_then(|builder| builder.with_log_level(LogLevel::Error))
            .and_then(|builder| builder.commit_from_file(&config.model_path))
            .map_err(|err| DetectionError::ModelLoad(model_path.clone(), err.to_string()))?;
        let input_name = session.inputs.first()
            .map(|input| input.name.clone())
            .ok_or_else(|| DetectionError::ModelLoad(model_path.clone(), "model has no inputs".to_string()))?;
        let output_name = session.outputs.first()
            .map(|output| output.name.clone())
            .ok_or_else(|| DetectionError::ModelLoad(model_path, "model has no outputs".to_string()))?;
        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            labels,
            input_size: config.input_size,
            iou_threshold: config.iou_threshold,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Detector for OnnxDetector {
    fn detect(&self, image: &DynamicImage, threshold: f32) -> Result<Vec<Detection>, DetectionError> {
        validate_threshold(threshold)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(DetectionError::InvalidImage("image has no pixels".to_string()));
        }
        let (tensor, letterbox) = letterbox(image, self.input_size);
        let input = TensorRef::from_array_view(tensor.view())
            .map_err(|err| DetectionError::Inference(err.to_string()))?;
        let mut session = self.session.lock()
            .map_err(|_| DetectionError::Inference("session lock poisoned".to_string()))?;
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input])
            .map_err(|err| DetectionError::Inference(err.to_string()))?;
        let (shape, data) = outputs[self.output_name.as_str()].try_extract_tensor::<f32>()
            .map_err(|err| DetectionError::Inference(err.to_string()))?;
        let shape = shape.iter().copied().collect::<Vec<i64>>();
        let predictions = prediction_matrix(&shape, data, self.labels.len())?;
        Ok(decode_predictions(predictions.view(), threshold, self.iou_threshold, &letterbox, &self.labels))
    }
}

/// One class name per line; the line number is the class index. Blank lines are kept so indices stay aligned.
pub fn load_labels(path: &Path) -> Result<Vec<String>, DetectionError> {
    let content = fs::read_to_string(path)
        .map_err(|err| DetectionError::LabelLoad(path.display().to_string(), err.to_string()))?;
    let labels = parse_labels(&content);
    if labels.is_empty() {
        return Err(DetectionError::LabelLoad(path.display().to_string(), "no class names".to_string()));
    }
    Ok(labels)
}

pub fn parse_labels(content: &str) -> Vec<String> {
    let mut labels = content.lines().map(|line| line.trim().to_string()).collect::<Vec<_>>();
    while labels.last().is_some_and(|label| label.is_empty()) {
        labels.pop();
    }
    labels
}
