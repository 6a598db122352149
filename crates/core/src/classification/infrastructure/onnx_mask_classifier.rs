/// Mask / no-mask classifier using ONNX Runtime via `ort`.
///
/// The model takes an NHWC `[N, 224, 224, 3]` batch scaled to `[-1, 1]` and
/// produces softmax pairs `[N, 2]` ordered `(mask, no_mask)`.
use std::path::Path;

use ndarray::{Array4, Axis};

use crate::classification::domain::mask_classifier::MaskClassifier;
use crate::classification::domain::prediction::Prediction;
use crate::detection::infrastructure::execution_provider::load_session;

/// Mask classifier backed by an ONNX Runtime session.
pub struct OnnxMaskClassifier {
    session: ort::session::Session,
    batch_size: usize,
}

impl OnnxMaskClassifier {
    /// Load a classifier ONNX model. Batches larger than `batch_size` are
    /// run in consecutive chunks.
    pub fn new(model_path: &Path, batch_size: usize) -> Result<Self, Box<dyn std::error::Error>> {
        if batch_size == 0 {
            return Err("batch_size must be >= 1".into());
        }
        let session = load_session(model_path)?;
        Ok(Self {
            session,
            batch_size,
        })
    }
}

impl MaskClassifier for OnnxMaskClassifier {
    fn classify(
        &mut self,
        faces: &Array4<f32>,
    ) -> Result<Vec<Prediction>, Box<dyn std::error::Error>> {
        if faces.len_of(Axis(0)) == 0 {
            return Err("Mask classifier called with an empty batch".into());
        }

        let mut predictions = Vec::with_capacity(faces.len_of(Axis(0)));
        for chunk in faces.axis_chunks_iter(Axis(0), self.batch_size) {
            let expected = chunk.len_of(Axis(0));
            let input_value = ort::value::Tensor::from_array(chunk.to_owned())?;
            let outputs = self.session.run(ort::inputs![input_value])?;
            if outputs.len() == 0 {
                return Err("Mask classifier produced no outputs".into());
            }
            let tensor = outputs[0].try_extract_array::<f32>()?;
            let data: Vec<f32> = tensor.iter().copied().collect();
            predictions.extend(decode_predictions(&data, tensor.shape(), expected)?);
        }
        Ok(predictions)
    }
}

/// Splits a `[N, 2]` output into predictions, checking `N == expected`.
fn decode_predictions(
    data: &[f32],
    shape: &[usize],
    expected: usize,
) -> Result<Vec<Prediction>, Box<dyn std::error::Error>> {
    if shape != [expected, 2] {
        return Err(format!(
            "Unexpected mask classifier output shape {shape:?}, expected [{expected}, 2]"
        )
        .into());
    }
    Ok(data
        .chunks_exact(2)
        .map(|pair| Prediction::new(pair[0], pair[1]))
        .collect())
}
