//! 4x4 key matrix scanned once per cycle.
//!
//! Rows are driven low one at a time; a column reading low means the key at
//! that intersection is down. Edges come from comparing the scan against
//! the previous one.

use adaline_trellis::{Edge, EdgeBatch, Error, KeyEdge, KeyEdgeSource, Result, KEY_COUNT};
use stm32f4xx_hal::gpio::{ErasedPin, Input, Output};

/// Core clock cycles to let a column settle after a row goes low.
const SETTLE_CYCLES: u32 = 200;

pub struct Keypad {
    rows: [ErasedPin<Output>; 4],
    cols: [ErasedPin<Input>; 4],
    /// Bit `k` set while key `k` is down.
    held: u16,
}

impl Keypad {
    pub fn new(mut rows: [ErasedPin<Output>; 4], cols: [ErasedPin<Input>; 4]) -> Self {
        for row in rows.iter_mut() {
            row.set_high();
        }
        Self { rows, cols, held: 0 }
    }

    fn scan(&mut self) -> u16 {
        let mut down = 0u16;
        for (r, row) in self.rows.iter_mut().enumerate() {
            row.set_low();
            cortex_m::asm::delay(SETTLE_CYCLES);
            for (c, col) in self.cols.iter().enumerate() {
                if col.is_low() {
                    down |= 1 << (r * 4 + c);
                }
            }
            row.set_high();
        }
        down
    }
}

impl KeyEdgeSource for Keypad {
    fn poll(&mut self) -> Result<EdgeBatch> {
        let now = self.scan();
        let changed = now ^ self.held;
        self.held = now;

        let mut batch = EdgeBatch::new();
        for key in 0..KEY_COUNT as u8 {
            let bit = 1u16 << key;
            if changed & bit == 0 {
                continue;
            }
            let edge = if now & bit != 0 { Edge::Rising } else { Edge::Falling };
            batch.push(KeyEdge { key, edge }).map_err(|_| Error::Keypad)?;
        }
        Ok(batch)
    }
}
