use crate::classification::domain::mask_classifier::MaskClassifier;
use crate::classification::domain::prediction::Prediction;
use crate::detection::domain::detection::Detection;
use crate::detection::domain::face_localizer::FaceLocalizer;
use crate::pipeline::preprocess::{detector_blob, face_tensor, stack_faces};
use crate::shared::config::PipelineConfig;
use crate::shared::frame::Frame;

/// A located face paired with the classifier's verdict for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceAssessment {
    pub detection: Detection,
    pub prediction: Prediction,
}

impl FaceAssessment {
    /// Splits paired records into two order-matched sequences.
    pub fn split(assessments: &[FaceAssessment]) -> (Vec<Detection>, Vec<Prediction>) {
        assessments
            .iter()
            .map(|a| (a.detection, a.prediction))
            .unzip()
    }
}

/// Detect-and-predict pipeline: blob → localize → filter/clamp → crop →
/// one batched classification.
///
/// Built once at startup and held for the process lifetime.
pub struct DetectAndPredict {
    localizer: Box<dyn FaceLocalizer>,
    classifier: Box<dyn MaskClassifier>,
    config: PipelineConfig,
}

impl DetectAndPredict {
    pub fn new(
        localizer: Box<dyn FaceLocalizer>,
        classifier: Box<dyn MaskClassifier>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            localizer,
            classifier,
            config,
        }
    }

    /// Locates faces in `frame` and classifies every one whose confidence
    /// exceeds the configured threshold.
    ///
    /// Returns an empty list when no face survives; the classifier is only
    /// invoked when there is at least one crop.
    pub fn run(&mut self, frame: &Frame) -> Result<Vec<FaceAssessment>, Box<dyn std::error::Error>> {
        let detections = self.locate(frame)?;
        self.classify(frame, detections)
    }

    /// Runs the localizer and returns clamped boxes above the confidence
    /// threshold, in detector order.
    pub fn locate(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        let blob = detector_blob(frame, self.config.blob_scale);
        let output = self
            .localizer
            .localize(&blob, self.config.detector_threshold)?;

        let detections = output
            .candidates
            .iter()
            .filter(|c| c.confidence > self.config.confidence)
            .map(|c| Detection::from_candidate(c, frame.width(), frame.height()))
            .collect();
        Ok(detections)
    }

    /// Crops each detection, classifies the whole batch at once and pairs
    /// predictions back with their boxes.
    pub fn classify(
        &mut self,
        frame: &Frame,
        detections: Vec<Detection>,
    ) -> Result<Vec<FaceAssessment>, Box<dyn std::error::Error>> {
        if detections.is_empty() {
            return Ok(Vec::new());
        }

        let faces: Vec<_> = detections
            .iter()
            .map(|d| {
                let crop = frame.crop(
                    d.start_x as u32,
                    d.start_y as u32,
                    d.width().max(1),
                    d.height().max(1),
                );
                face_tensor(&crop, self.config.classifier_channels)
            })
            .collect();
        let batch = stack_faces(&faces);

        let predictions = self.classifier.classify(&batch)?;
        if predictions.len() != detections.len() {
            return Err(format!(
                "Mask classifier returned {} predictions for {} faces",
                predictions.len(),
                detections.len()
            )
            .into());
        }

        Ok(detections
            .into_iter()
            .zip(predictions)
            .map(|(detection, prediction)| FaceAssessment {
                detection,
                prediction,
            })
            .collect())
    }
}
