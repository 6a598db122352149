use crate::detection::domain::detection::Detection;
use crate::overlay::domain::mask_status::MaskStatus;
use crate::overlay::domain::overlay_painter::OverlayPainter;
use crate::overlay::domain::sticker::StickerSet;
use crate::pipeline::detect_and_predict::FaceAssessment;
use crate::shared::constants::STICKER_OFFSET;
use crate::shared::frame::Frame;

/// Label baseline sits this far above the box.
pub const LABEL_OFFSET_Y: i32 = 10;

/// Lowest baseline that still keeps a label inside the frame.
pub const LABEL_MIN_BASELINE: i32 = 12;

pub const BOX_THICKNESS: i32 = 2;

/// Draws label, box outline and sticker for each face assessment.
///
/// The only component that mutates a frame.
pub struct OverlayRenderer {
    stickers: StickerSet,
    painter: Box<dyn OverlayPainter>,
}

impl OverlayRenderer {
    pub fn new(stickers: StickerSet, painter: Box<dyn OverlayPainter>) -> Self {
        Self { stickers, painter }
    }

    pub fn render_all(
        &mut self,
        frame: &mut Frame,
        assessments: &[FaceAssessment],
    ) -> Result<(), Box<dyn std::error::Error>> {
        for assessment in assessments {
            self.render(frame, assessment)?;
        }
        Ok(())
    }

    /// Label first, then the outline, then the sticker at its fixed offset.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        assessment: &FaceAssessment,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let status = MaskStatus::from_prediction(&assessment.prediction);
        let color = status.color();
        let det = &assessment.detection;

        let label = status.label(&assessment.prediction);
        self.painter
            .put_text(frame, &label, label_origin(det), color)?;

        self.painter.rectangle(
            frame,
            (det.start_x, det.start_y),
            (det.end_x, det.end_y),
            color,
            BOX_THICKNESS,
        )?;

        let (x, y) = STICKER_OFFSET;
        self.stickers
            .for_status(status)
            .composite_onto(frame, x, y);
        Ok(())
    }
}

/// Baseline origin for a label above `det`, kept below the top edge.
pub fn label_origin(det: &Detection) -> (i32, i32) {
    (
        det.start_x,
        (det.start_y - LABEL_OFFSET_Y).max(LABEL_MIN_BASELINE),
    )
}
