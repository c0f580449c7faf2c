//! Trainable coefficients, one per input.

use rand::Rng;

use crate::pattern::INPUT_LEN;

/// Weight vector `W`, indexed like the input vector (bias last).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeightVector([f32; INPUT_LEN]);

impl WeightVector {
    pub const fn zeros() -> Self {
        Self([0.0; INPUT_LEN])
    }

    pub const fn from_array(values: [f32; INPUT_LEN]) -> Self {
        Self(values)
    }

    /// Small random start: integer hundredths drawn from `[-span, span)`.
    pub fn random<R: Rng>(rng: &mut R, span: i32) -> Self {
        let mut values = [0.0; INPUT_LEN];
        for w in values.iter_mut() {
            *w = rng.gen_range(-span..span) as f32 / 100.0;
        }
        Self(values)
    }

    pub fn as_array(&self) -> &[f32; INPUT_LEN] {
        &self.0
    }

    pub fn get(&self, index: usize) -> f32 {
        self.0[index]
    }

    pub fn reset(&mut self) {
        self.0 = [0.0; INPUT_LEN];
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::zeros()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn random_weights_stay_in_span() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let weights = WeightVector::random(&mut rng, 100);
        for &w in weights.as_array() {
            assert!((-1.0..1.0).contains(&w), "w = {w}");
            // whole hundredths only
            let hundredths = w * 100.0;
            assert!((hundredths - libm::roundf(hundredths)).abs() < 1e-3);
        }
    }

    #[test]
    fn same_seed_same_weights() {
        let a = WeightVector::random(&mut SmallRng::seed_from_u64(7), 100);
        let b = WeightVector::random(&mut SmallRng::seed_from_u64(7), 100);
        assert_eq!(a, b);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut weights = WeightVector::from_array([0.5; INPUT_LEN]);
        weights.reset();
        assert_eq!(weights, WeightVector::zeros());
    }
}
