use crate::classification::domain::prediction::Prediction;

/// Above this mask probability a winning "mask" verdict counts as properly
/// worn (strict `>`).
pub const PROPER_MASK_THRESHOLD: f32 = 0.90;

/// RGB color.
pub type Rgb = [u8; 3];

pub const GREEN: Rgb = [0, 255, 0];
pub const YELLOW: Rgb = [220, 220, 0];
pub const RED: Rgb = [255, 0, 0];

/// Label category chosen for one face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaskStatus {
    Mask,
    MaskNotOnProperly,
    NoMask,
}

impl MaskStatus {
    /// First match wins; ties between the two probabilities fall through to
    /// `NoMask`.
    pub fn from_prediction(prediction: &Prediction) -> Self {
        if prediction.mask > prediction.no_mask {
            if prediction.mask > PROPER_MASK_THRESHOLD {
                MaskStatus::Mask
            } else {
                MaskStatus::MaskNotOnProperly
            }
        } else {
            MaskStatus::NoMask
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MaskStatus::Mask => "Mask",
            MaskStatus::MaskNotOnProperly => "Mask not on Properly",
            MaskStatus::NoMask => "No Mask",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            MaskStatus::Mask => GREEN,
            MaskStatus::MaskNotOnProperly => YELLOW,
            MaskStatus::NoMask => RED,
        }
    }

    /// Label text, e.g. `"Mask: 97.32%"`.
    pub fn label(&self, prediction: &Prediction) -> String {
        format!(
            "{}: {:.2}%",
            self.name(),
            prediction.winning_probability() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::confident_mask(0.95, 0.05, MaskStatus::Mask)]
    #[case::loose_mask(0.70, 0.30, MaskStatus::MaskNotOnProperly)]
    #[case::no_mask(0.10, 0.90, MaskStatus::NoMask)]
    #[case::tie_is_no_mask(0.5, 0.5, MaskStatus::NoMask)]
    #[case::exactly_threshold(0.90, 0.10, MaskStatus::MaskNotOnProperly)]
    #[case::just_above_threshold(0.9001, 0.0999, MaskStatus::Mask)]
    #[case::certain_mask(1.0, 0.0, MaskStatus::Mask)]
    #[case::certain_no_mask(0.0, 1.0, MaskStatus::NoMask)]
    fn test_policy(#[case] mask: f32, #[case] no_mask: f32, #[case] expected: MaskStatus) {
        assert_eq!(
            MaskStatus::from_prediction(&Prediction::new(mask, no_mask)),
            expected
        );
    }

    #[test]
    fn test_policy_is_total_over_probability_pairs() {
        for i in 0..=1000 {
            let mask = i as f32 / 1000.0;
            let status = MaskStatus::from_prediction(&Prediction::new(mask, 1.0 - mask));
            let fired = [
                mask > 1.0 - mask && mask > PROPER_MASK_THRESHOLD,
                mask > 1.0 - mask && mask <= PROPER_MASK_THRESHOLD,
                mask <= 1.0 - mask,
            ];
            assert_eq!(fired.iter().filter(|f| **f).count(), 1);
            let branch = fired.iter().position(|f| *f).unwrap();
            let expected = [
                MaskStatus::Mask,
                MaskStatus::MaskNotOnProperly,
                MaskStatus::NoMask,
            ][branch];
            assert_eq!(status, expected);
        }
    }

    #[rstest]
    #[case(0.95, 0.05, "Mask: 95.00%", GREEN)]
    #[case(0.70, 0.30, "Mask not on Properly: 70.00%", YELLOW)]
    #[case(0.10, 0.90, "No Mask: 90.00%", RED)]
    fn test_label_and_color(
        #[case] mask: f32,
        #[case] no_mask: f32,
        #[case] label: &str,
        #[case] color: Rgb,
    ) {
        let prediction = Prediction::new(mask, no_mask);
        let status = MaskStatus::from_prediction(&prediction);
        assert_eq!(status.label(&prediction), label);
        assert_eq!(status.color(), color);
    }

    #[test]
    fn test_label_two_decimals() {
        let prediction = Prediction::new(0.9732, 0.0268);
        assert_eq!(MaskStatus::Mask.label(&prediction), "Mask: 97.32%");
    }
}
