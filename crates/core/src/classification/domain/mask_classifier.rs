use ndarray::Array4;

use crate::classification::domain::prediction::Prediction;

/// Domain interface for the pretrained mask classifier.
///
/// `faces` is an NHWC batch of normalized 224×224 crops. Implementations
/// return one prediction per crop, in batch order, and may reject an empty
/// batch.
pub trait MaskClassifier: Send {
    fn classify(&mut self, faces: &Array4<f32>)
        -> Result<Vec<Prediction>, Box<dyn std::error::Error>>;
}
