/// SSD face localizer using ONNX Runtime via `ort`.
///
/// Expects the single-shot detector layout `[1, 1, N, 7]` where each row is
/// `(image_id, label, confidence, x1, y1, x2, y2)` with normalized corners.
use std::path::Path;

use ndarray::Array4;

use crate::detection::domain::detection::{LocalizerOutput, RawCandidate};
use crate::detection::domain::face_localizer::FaceLocalizer;

use super::execution_provider::load_session;

/// Values per detection row.
const ROW_LEN: usize = 7;

/// SSD face localizer backed by an ONNX Runtime session.
///
/// The detector has no landmark head, so `landmarks` is always empty.
pub struct OnnxSsdLocalizer {
    session: ort::session::Session,
}

impl OnnxSsdLocalizer {
    /// Load an SSD face detector ONNX model.
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = load_session(model_path)?;
        Ok(Self { session })
    }
}

impl FaceLocalizer for OnnxSsdLocalizer {
    fn localize(
        &mut self,
        blob: &Array4<f32>,
        threshold: f32,
    ) -> Result<LocalizerOutput, Box<dyn std::error::Error>> {
        let input_value = ort::value::Tensor::from_array(blob.clone())?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("Face detector produced no outputs".into());
        }

        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        let data: Vec<f32> = tensor.iter().copied().collect();

        let candidates = decode_detections(&data, &shape, threshold)?;
        Ok(LocalizerOutput {
            candidates,
            landmarks: Vec::new(),
        })
    }
}

/// Parses detector rows, keeping those with `confidence >= threshold`.
///
/// Accepts `[1, 1, N, 7]` as well as flattened `[N, 7]` outputs.
fn decode_detections(
    data: &[f32],
    shape: &[usize],
    threshold: f32,
) -> Result<Vec<RawCandidate>, Box<dyn std::error::Error>> {
    if shape.last() != Some(&ROW_LEN) {
        return Err(format!("Unexpected face detector output shape: {shape:?}").into());
    }

    let candidates = data
        .chunks_exact(ROW_LEN)
        .filter(|row| row[2] >= threshold)
        .map(|row| RawCandidate {
            confidence: row[2],
            bbox: [row[3], row[4], row[5], row[6]],
        })
        .collect();
    Ok(candidates)
}
