//! Input pattern held on the keypad.

use crate::device::{Edge, KeyEdge};

/// Number of pattern keys on the pad.
pub const KEY_COUNT: usize = 16;

/// Length of the input vector: one entry per key plus the bias terminal.
pub const INPUT_LEN: usize = KEY_COUNT + 1;

/// Index of the constant bias input.
pub const BIAS_INDEX: usize = KEY_COUNT;

/// Input vector as fed to the engine.
pub type Inputs = [f32; INPUT_LEN];

/// State of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    Negative,
    /// Only reachable through a menu reset.
    Cleared,
    Positive,
}

impl Polarity {
    pub fn value(self) -> f32 {
        match self {
            Self::Negative => -1.0,
            Self::Cleared => 0.0,
            Self::Positive => 1.0,
        }
    }

    /// A cleared key has no sign to flip, so it comes back armed.
    pub fn flipped(self) -> Self {
        match self {
            Self::Negative | Self::Cleared => Self::Positive,
            Self::Positive => Self::Negative,
        }
    }
}

/// How a key should be lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Indicator {
    /// Input is +1.
    Armed,
    /// Input is -1 or cleared.
    Idle,
}

/// The 16 key polarities. The bias terminal is implicit and always +1.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatternState {
    keys: [Polarity; KEY_COUNT],
}

impl PatternState {
    /// Power-up pattern: every key negative.
    pub const fn new() -> Self {
        Self {
            keys: [Polarity::Negative; KEY_COUNT],
        }
    }

    pub fn from_keys(keys: [Polarity; KEY_COUNT]) -> Self {
        Self { keys }
    }

    pub fn polarity(&self, key: usize) -> Polarity {
        self.keys[key]
    }

    pub fn keys(&self) -> &[Polarity; KEY_COUNT] {
        &self.keys
    }

    pub fn toggle(&mut self, key: usize) {
        self.keys[key] = self.keys[key].flipped();
    }

    /// Apply one key event. Only a rising edge changes the pattern; releases
    /// are ignored. Returns `true` when the pattern changed.
    ///
    /// Keys outside the pad are dropped.
    pub fn apply_edge(&mut self, event: KeyEdge) -> bool {
        let key = usize::from(event.key);
        if key >= KEY_COUNT {
            warn!("key index {} out of range, dropped", event.key);
            return false;
        }
        match event.edge {
            Edge::Rising => {
                self.toggle(key);
                true
            }
            Edge::Falling => false,
        }
    }

    pub fn indicator(&self, key: usize) -> Indicator {
        if self.keys[key] == Polarity::Positive {
            Indicator::Armed
        } else {
            Indicator::Idle
        }
    }

    /// Zero every pattern input. The bias stays at +1.
    pub fn clear(&mut self) {
        self.keys = [Polarity::Cleared; KEY_COUNT];
    }

    /// Project to the engine's input vector, bias last.
    pub fn inputs(&self) -> Inputs {
        let mut inputs = [1.0; INPUT_LEN];
        for (slot, key) in inputs.iter_mut().zip(self.keys.iter()) {
            *slot = key.value();
        }
        inputs
    }
}

impl Default for PatternState {
    fn default() -> Self {
        Self::new()
    }
}
