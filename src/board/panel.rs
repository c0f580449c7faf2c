//! SSD1306 128x64 panel plus the board LED.
//!
//! Screen layout, 6x10 font:
//!
//! ```text
//! y  0..40  weight grid, 4 rows x 4 cells of "%4d"
//! y 42..62  two status lines (16 chars, x 0..96) | key markers (x 100..128)
//! ```
//!
//! Key lights have no RGB hardware on this board: an armed key is a filled
//! square, an idle key an outline. The LED stands in for the backlight and
//! is lit while the verdict is positive.

use adaline_trellis::present::{self, LINE_WIDTH};
use adaline_trellis::{Display, Error, Result, Rgb, WeightGrid};
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, Ssd1306};
use stm32f4xx_hal::gpio::{Output, Pin};

use super::I2cProxy;

pub type Oled =
    Ssd1306<I2CInterface<I2cProxy>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

const LINE_H: i32 = 10;
const GRID_CELL_W: i32 = 32;
const STATUS_TOP: i32 = 42;
const STATUS_W: u32 = LINE_WIDTH as u32 * 6;
const MARKER_LEFT: i32 = 100;
const MARKER_TOP: i32 = 40;
const MARKER_PITCH_X: i32 = 7;
const MARKER_PITCH_Y: i32 = 6;
const MARKER_SIZE: u32 = 4;

pub struct Panel {
    oled: Oled,
    led: Pin<'A', 5, Output>,
    text_style: MonoTextStyle<'static, BinaryColor>,
    indicator: Rgb,
}

impl Panel {
    pub fn new(oled: Oled, led: Pin<'A', 5, Output>) -> Self {
        Self {
            oled,
            led,
            text_style: MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
            indicator: Rgb::default(),
        }
    }

    fn blank(&mut self, top_left: Point, size: Size) -> Result<()> {
        Rectangle::new(top_left, size)
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(&mut self.oled)
            .map_err(|_| Error::Display)
    }

    fn text(&mut self, text: &str, at: Point) -> Result<()> {
        Text::with_baseline(text, at, self.text_style, Baseline::Top)
            .draw(&mut self.oled)
            .map(|_| ())
            .map_err(|_| Error::Display)
    }
}

impl Display for Panel {
    fn write_line(&mut self, row: u8, text: &str) -> Result<()> {
        let top = Point::new(0, STATUS_TOP + i32::from(row) * LINE_H);
        self.blank(top, Size::new(STATUS_W, LINE_H as u32))?;
        self.text(text, top)
    }

    fn set_indicator_color(&mut self, color: Rgb) -> Result<()> {
        if color != self.indicator {
            defmt::debug!("indicator {}", color);
            self.indicator = color;
        }
        if color.b > color.r {
            self.led.set_high();
        } else {
            self.led.set_low();
        }
        Ok(())
    }

    fn write_grid(&mut self, grid: &WeightGrid) -> Result<()> {
        self.blank(Point::zero(), Size::new(128, 4 * LINE_H as u32))?;
        for (r, row) in grid.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let cell = present::grid_cell(*value);
                let at = Point::new(c as i32 * GRID_CELL_W, r as i32 * LINE_H);
                self.text(&cell, at)?;
            }
        }
        Ok(())
    }

    fn set_key_color(&mut self, key: u8, color: Rgb) -> Result<()> {
        let (row, col) = (i32::from(key / 4), i32::from(key % 4));
        let top_left = Point::new(
            MARKER_LEFT + col * MARKER_PITCH_X,
            MARKER_TOP + row * MARKER_PITCH_Y,
        );
        let size = Size::new(MARKER_SIZE, MARKER_SIZE);
        self.blank(top_left, size)?;
        let style = if color.b > color.r {
            PrimitiveStyle::with_fill(BinaryColor::On)
        } else {
            PrimitiveStyle::with_stroke(BinaryColor::On, 1)
        };
        Rectangle::new(top_left, size)
            .into_styled(style)
            .draw(&mut self.oled)
            .map_err(|_| Error::Display)
    }

    fn flush(&mut self) -> Result<()> {
        self.oled.flush().map_err(|_| Error::Display)
    }
}
