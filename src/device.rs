//! Device capabilities the control loop is written against.
//!
//! The firmware implements these on real peripherals; tests implement them
//! with in-memory fakes.

use heapless::Vec;

use crate::error::Result;
use crate::present::{Rgb, WeightGrid};

/// Most key events a source may hand over in one poll.
pub const EDGE_QUEUE_LEN: usize = 32;

/// Events collected since the previous poll, oldest first.
pub type EdgeBatch = Vec<KeyEdge, EDGE_QUEUE_LEN>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Key went down.
    Rising,
    /// Key came up.
    Falling,
}

/// A single key transition. `key` is in `0..16`, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEdge {
    pub key: u8,
    pub edge: Edge,
}

/// Level of the two teach buttons at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSample {
    /// "Teach positive" held.
    pub positive: bool,
    /// "Teach negative" held.
    pub negative: bool,
}

impl ButtonSample {
    pub const fn new(positive: bool, negative: bool) -> Self {
        Self { positive, negative }
    }

    pub fn any(self) -> bool {
        self.positive || self.negative
    }

    pub fn both(self) -> bool {
        self.positive && self.negative
    }
}

/// Keypad edge detector.
pub trait KeyEdgeSource {
    /// Drain every edge seen since the last call.
    fn poll(&mut self) -> Result<EdgeBatch>;
}

/// The two teach buttons. Debounced by the implementation.
pub trait ControlButtons {
    fn sample(&mut self) -> Result<ButtonSample>;
}

/// Everything the loop draws on.
pub trait Display {
    /// Text row of the 2x16 readout.
    fn write_line(&mut self, row: u8, text: &str) -> Result<()>;

    /// Ambient status light.
    fn set_indicator_color(&mut self, color: Rgb) -> Result<()>;

    /// 4x4 weight inspection panel.
    fn write_grid(&mut self, grid: &WeightGrid) -> Result<()>;

    /// Illumination of pattern key `key`.
    fn set_key_color(&mut self, key: u8, color: Rgb) -> Result<()>;

    /// Push buffered drawing to the hardware. Called once per cycle.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
