use ndarray::Array4;

use crate::detection::domain::detection::LocalizerOutput;

/// Domain interface for the pretrained face detector.
///
/// Takes a preprocessed NCHW blob and returns candidates whose confidence
/// reached `threshold`. Box coordinates are normalized to the blob.
pub trait FaceLocalizer: Send {
    fn localize(
        &mut self,
        blob: &Array4<f32>,
        threshold: f32,
    ) -> Result<LocalizerOutput, Box<dyn std::error::Error>>;
}
