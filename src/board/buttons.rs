//! Teach buttons: momentary switches to ground on pull-up inputs.

use adaline_trellis::{ButtonSample, ControlButtons, Result};
use stm32f4xx_hal::gpio::{Input, Pin};

pub struct TeachButtons {
    positive: Pin<'A', 1, Input>,
    negative: Pin<'A', 0, Input>,
}

impl TeachButtons {
    pub fn new(positive: Pin<'A', 1, Input>, negative: Pin<'A', 0, Input>) -> Self {
        Self { positive, negative }
    }
}

impl ControlButtons for TeachButtons {
    // Active low. The 50 ms cycle is longer than switch bounce, so one
    // sample per cycle is enough.
    fn sample(&mut self) -> Result<ButtonSample> {
        Ok(ButtonSample::new(self.positive.is_low(), self.negative.is_low()))
    }
}
