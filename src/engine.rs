//! Adaline numeric core.
//!
//! `output` and `update` are pure; [`EngineState`] owns the pattern, the
//! weights and the learning rate and is the only thing that mutates them.

use crate::pattern::{Inputs, PatternState, INPUT_LEN};
use crate::weights::WeightVector;

/// Teaching signal `d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    pub fn value(self) -> f32 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }
}

/// `y = Σ W[i]·I[i]` over all inputs including the bias.
pub fn output(inputs: &Inputs, weights: &WeightVector) -> f32 {
    inputs
        .iter()
        .zip(weights.as_array().iter())
        .map(|(i, w)| i * w)
        .sum()
}

/// One LMS step: `W'[i] = W[i] + 2·μ·(d − y)·I[i]`.
///
/// `y` is the output the caller already computed for `inputs` and `weights`.
pub fn update(inputs: &Inputs, weights: &WeightVector, y: f32, desired: f32, rate: f32) -> WeightVector {
    let step = 2.0 * rate * (desired - y);
    let mut next = [0.0; INPUT_LEN];
    for ((n, w), i) in next.iter_mut().zip(weights.as_array().iter()).zip(inputs.iter()) {
        *n = w + step * i;
    }
    WeightVector::from_array(next)
}

/// Squashed output for the status readout and backlight, `tanh(2y)`.
/// Never used for training.
pub fn sigmoid_display(y: f32) -> f32 {
    libm::tanhf(2.0 * y)
}

/// Everything the learning loop mutates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineState {
    pub pattern: PatternState,
    pub weights: WeightVector,
    rate: f32,
}

impl EngineState {
    pub fn new(weights: WeightVector, rate: f32) -> Self {
        Self {
            pattern: PatternState::new(),
            weights,
            rate,
        }
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    pub fn output(&self) -> f32 {
        output(&self.pattern.inputs(), &self.weights)
    }

    /// Apply one update toward `label` and return the error `d − y` it
    /// corrected.
    pub fn train(&mut self, label: Label) -> f32 {
        let inputs = self.pattern.inputs();
        let y = output(&inputs, &self.weights);
        let desired = label.value();
        self.weights = update(&inputs, &self.weights, y, desired, self.rate);
        desired - y
    }

    /// Clear the pattern and zero the weights. The rate is kept.
    pub fn reset(&mut self) {
        self.pattern.clear();
        self.weights.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{BIAS_INDEX, KEY_COUNT};

    const EPS: f32 = 1e-6;

    #[test]
    fn output_is_dot_product() {
        let mut inputs = [-1.0; INPUT_LEN];
        inputs[BIAS_INDEX] = 1.0;
        inputs[2] = 1.0;
        let mut w = [0.0; INPUT_LEN];
        w[2] = 0.5;
        w[3] = 0.25;
        w[BIAS_INDEX] = 0.1;
        let y = output(&inputs, &WeightVector::from_array(w));
        assert!((y - (0.5 - 0.25 + 0.1)).abs() < EPS);
    }

    #[test]
    fn first_step_from_zero_weights() {
        let state = EngineState::new(WeightVector::zeros(), 0.002);
        let inputs = state.pattern.inputs();
        let y = output(&inputs, &state.weights);
        assert_eq!(y, 0.0);

        let next = update(&inputs, &state.weights, y, 1.0, 0.002);
        for k in 0..KEY_COUNT {
            assert!((next.get(k) + 0.004).abs() < EPS, "w[{k}] = {}", next.get(k));
        }
        assert!((next.get(BIAS_INDEX) - 0.004).abs() < EPS);
    }

    #[test]
    fn zero_error_leaves_weights() {
        let inputs = PatternState::new().inputs();
        let weights = WeightVector::from_array([0.03; INPUT_LEN]);
        let y = output(&inputs, &weights);
        let next = update(&inputs, &weights, y, y, 0.5);
        assert_eq!(next, weights);
    }

    #[test]
    fn train_reports_error() {
        let mut state = EngineState::new(WeightVector::zeros(), 0.002);
        let err = state.train(Label::Negative);
        assert_eq!(err, -1.0);
        assert!((state.weights.get(0) - 0.004).abs() < EPS);
        assert!((state.weights.get(BIAS_INDEX) + 0.004).abs() < EPS);
    }

    #[test]
    fn reset_zeroes_output() {
        let mut state = EngineState::new(WeightVector::from_array([0.7; INPUT_LEN]), 0.002);
        state.pattern.toggle(5);
        state.reset();
        assert_eq!(state.output(), 0.0);
        assert_eq!(state.rate(), 0.002);
    }

    #[test]
    fn sigmoid_is_tanh_of_twice_output() {
        assert_eq!(sigmoid_display(0.0), 0.0);
        assert!((sigmoid_display(0.25) - libm::tanhf(0.5)).abs() < EPS);
        assert!(sigmoid_display(10.0) > 0.999);
        assert!(sigmoid_display(-10.0) < -0.999);
    }
}
