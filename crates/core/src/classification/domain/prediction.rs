/// Classifier output for one face: probabilities of wearing a mask and of
/// not wearing one. The pair sums to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    pub mask: f32,
    pub no_mask: f32,
}

impl Prediction {
    pub fn new(mask: f32, no_mask: f32) -> Self {
        Self { mask, no_mask }
    }

    /// The larger of the two probabilities.
    pub fn winning_probability(&self) -> f32 {
        self.mask.max(self.no_mask)
    }
}
