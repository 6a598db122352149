/// One raw detector row: confidence plus a box in normalized `[0, 1]`
/// image coordinates `[x1, y1, x2, y2]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawCandidate {
    pub confidence: f32,
    pub bbox: [f32; 4],
}

/// Five facial keypoints in normalized coordinates, when the detector
/// provides them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FacialLandmarks {
    pub points: [(f32, f32); 5],
}

/// Everything a localizer returns for one blob.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocalizerOutput {
    pub candidates: Vec<RawCandidate>,
    pub landmarks: Vec<FacialLandmarks>,
}

/// A face box in integer pixel coordinates of the frame it came from.
///
/// Always satisfies `0 <= start_x <= end_x <= width - 1` and
/// `0 <= start_y <= end_y <= height - 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
    pub confidence: f32,
}

impl Detection {
    /// Scales a normalized candidate to a `width × height` frame and clamps
    /// it so the box never leaves the frame.
    pub fn from_candidate(candidate: &RawCandidate, width: u32, height: u32) -> Self {
        let [x1, y1, x2, y2] = candidate.bbox;
        let (w, h) = (width as f32, height as f32);
        let max_x = width.saturating_sub(1) as i32;
        let max_y = height.saturating_sub(1) as i32;

        let start_x = to_pixel(x1 * w).clamp(0, max_x);
        let start_y = to_pixel(y1 * h).clamp(0, max_y);
        let end_x = to_pixel(x2 * w).clamp(start_x, max_x);
        let end_y = to_pixel(y2 * h).clamp(start_y, max_y);

        Self {
            start_x,
            start_y,
            end_x,
            end_y,
            confidence: candidate.confidence,
        }
    }

    pub fn width(&self) -> u32 {
        (self.end_x - self.start_x) as u32
    }

    pub fn height(&self) -> u32 {
        (self.end_y - self.start_y) as u32
    }
}

/// Truncates toward zero like an integer cast; NaN maps to 0.
fn to_pixel(value: f32) -> i32 {
    if value.is_nan() {
        0
    } else {
        value as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn candidate(bbox: [f32; 4]) -> RawCandidate {
        RawCandidate {
            confidence: 0.9,
            bbox,
        }
    }

    #[test]
    fn test_scales_normalized_coordinates() {
        let det = Detection::from_candidate(&candidate([0.25, 0.5, 0.75, 1.0]), 640, 480);
        assert_eq!(det.start_x, 160);
        assert_eq!(det.start_y, 240);
        assert_eq!(det.end_x, 480);
        // 1.0 * 480 = 480 is past the last row
        assert_eq!(det.end_y, 479);
        assert_eq!(det.confidence, 0.9);
    }

    #[test]
    fn test_truncates_fractional_pixels() {
        let det = Detection::from_candidate(&candidate([0.1, 0.1, 0.2, 0.2]), 333, 333);
        // 0.1 * 333 = 33.3, 0.2 * 333 = 66.6
        assert_eq!((det.start_x, det.end_x), (33, 66));
    }

    #[rstest]
    #[case::negative_origin([-0.2, -0.5, 0.3, 0.3])]
    #[case::past_far_edge([0.5, 0.5, 1.7, 2.0])]
    #[case::fully_outside([1.5, 1.5, 2.0, 2.0])]
    #[case::inverted([0.8, 0.8, 0.2, 0.2])]
    #[case::nan([f32::NAN, 0.1, f32::NAN, 0.5])]
    fn test_clamped_box_stays_in_frame(#[case] bbox: [f32; 4]) {
        let (w, h) = (640, 480);
        let det = Detection::from_candidate(&candidate(bbox), w, h);
        assert!(0 <= det.start_x && det.start_x <= det.end_x && det.end_x <= w as i32 - 1);
        assert!(0 <= det.start_y && det.start_y <= det.end_y && det.end_y <= h as i32 - 1);
    }

    #[test]
    fn test_width_and_height() {
        let det = Detection {
            start_x: 10,
            start_y: 20,
            end_x: 60,
            end_y: 100,
            confidence: 1.0,
        };
        assert_eq!(det.width(), 50);
        assert_eq!(det.height(), 80);
    }
}
