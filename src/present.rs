//! Projection of engine state onto the displays and key lights.

use core::fmt::Write;

use heapless::String;

use crate::menu::{MenuItem, MenuState, PendingRate};
use crate::pattern::Indicator;
use crate::weights::WeightVector;

/// Columns of the text readout.
pub const LINE_WIDTH: usize = 16;

/// One row of the text readout.
pub type Line = String<LINE_WIDTH>;

/// Weights in hundredths, `grid[row][col]`.
pub type WeightGrid = [[i32; 4]; 4];

/// One grid cell. Wide enough for any `i32`.
pub type Cell = String<11>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From a packed `0xRRGGBB` value.
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }
}

/// Key light for a +1 input.
pub const KEY_ARMED: Rgb = Rgb::from_u32(0x00_00_15);
/// Key light for a -1 (or cleared) input.
pub const KEY_IDLE: Rgb = Rgb::from_u32(0x15_00_00);
/// Backlight when the squashed output is exactly zero.
pub const NEUTRAL: Rgb = Rgb::new(0, 255, 0);

pub fn key_color(indicator: Indicator) -> Rgb {
    match indicator {
        Indicator::Armed => KEY_ARMED,
        Indicator::Idle => KEY_IDLE,
    }
}

/// Backlight brightness for a squashed output: `|s|^4 * 245 + 10`.
pub fn intensity(sig: f32) -> u8 {
    let magnitude = libm::fabsf(sig).min(1.0);
    (libm::powf(magnitude, 4.0) * 245.0) as u8 + 10
}

/// Red for a negative verdict, blue for positive, green at exactly zero.
pub fn indicator_color(sig: f32) -> Rgb {
    if sig < 0.0 {
        Rgb::new(intensity(sig), 0, 0)
    } else if sig > 0.0 {
        Rgb::new(0, 0, intensity(sig))
    } else {
        NEUTRAL
    }
}

/// Cell (r, c) shows `W[4c + r]` truncated to hundredths.
pub fn weight_grid(weights: &WeightVector) -> WeightGrid {
    let mut grid = [[0; 4]; 4];
    for (r, row) in grid.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = (weights.get(c * 4 + r) * 100.0) as i32;
        }
    }
    grid
}

/// Right-aligned text for one grid cell.
pub fn grid_cell(value: i32) -> Cell {
    let mut cell = Cell::new();
    write!(cell, "{:4}", value).ok();
    cell
}

/// Readout while training: squashed output and the current rate.
pub fn status_lines(sig: f32, rate: f32, digits: u8) -> [Line; 2] {
    let mut top = Line::new();
    let mut bottom = Line::new();
    write!(top, "Sig = {:.2}", sig).ok();
    write!(bottom, "mu = {}", PendingRate::from_rate(rate, digits)).ok();
    [top, bottom]
}

/// Prefix before the first editable digit in the rate editor.
const EDIT_PREFIX: &str = "mu = 0.";

pub fn menu_lines(state: &MenuState) -> [Line; 2] {
    let mut top = Line::new();
    let mut bottom = Line::new();
    match state {
        MenuState::Closed => {}
        MenuState::ItemSelect(index) => {
            top.push_str("Menu").ok();
            write!(bottom, "> {}", MenuItem::from_index(*index).label()).ok();
        }
        MenuState::EditRate { digit, pending } => {
            write!(top, "mu = {}", pending).ok();
            for _ in 0..EDIT_PREFIX.len() + usize::from(*digit) {
                bottom.push(' ').ok();
            }
            bottom.push('^').ok();
        }
        MenuState::Confirm { pending } => {
            write!(top, "Apply {}?", pending).ok();
            bottom.push_str("P:yes N:no").ok();
        }
    }
    [top, bottom]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::INPUT_LEN;

    #[test]
    fn key_colors_follow_polarity() {
        assert_eq!(key_color(Indicator::Armed), Rgb::new(0, 0, 0x15));
        assert_eq!(key_color(Indicator::Idle), Rgb::new(0x15, 0, 0));
    }

    #[test]
    fn zero_output_is_neutral() {
        assert_eq!(indicator_color(crate::engine::sigmoid_display(0.0)), NEUTRAL);
    }

    #[test]
    fn sign_picks_channel() {
        let neg = indicator_color(-0.5);
        let pos = indicator_color(0.5);
        assert!(neg.r > 0 && neg.g == 0 && neg.b == 0);
        assert!(pos.b > 0 && pos.r == 0 && pos.g == 0);
        assert_eq!(neg.r, pos.b);
    }

    #[test]
    fn intensity_saturates() {
        assert_eq!(intensity(0.0), 10);
        assert_eq!(intensity(1.0), 255);
        assert_eq!(intensity(-1.0), 255);
        assert!(intensity(0.99) > 230);
    }

    #[test]
    fn grid_is_column_major_hundredths() {
        let mut w = [0.0; INPUT_LEN];
        w[1] = 0.257;
        w[4] = -0.5;
        w[16] = 9.0;
        let grid = weight_grid(&WeightVector::from_array(w));
        assert_eq!(grid[1][0], 25);
        assert_eq!(grid[0][1], -50);
        // bias weight is not on the grid
        assert!(grid.iter().flatten().all(|&v| v != 900));
    }

    #[test]
    fn grid_cells_keep_every_digit() {
        assert_eq!(grid_cell(25).as_str(), "  25");
        assert_eq!(grid_cell(-50).as_str(), " -50");
        assert_eq!(grid_cell(i32::MAX).as_str(), "2147483647");
        assert_eq!(grid_cell(i32::MIN).as_str(), "-2147483648");
    }

    #[test]
    fn status_readout() {
        let [top, bottom] = status_lines(-0.456, 0.002, 4);
        assert_eq!(top.as_str(), "Sig = -0.46");
        assert_eq!(bottom.as_str(), "mu = 0.0020");
    }

    #[test]
    fn menu_screens() {
        let [top, bottom] = menu_lines(&MenuState::ItemSelect(1));
        assert_eq!(top.as_str(), "Menu");
        assert_eq!(bottom.as_str(), "> Change rate");

        let pending = PendingRate::from_rate(0.002, 4);
        let [top, bottom] = menu_lines(&MenuState::EditRate { digit: 2, pending });
        assert_eq!(top.as_str(), "mu = 0.0020");
        assert_eq!(bottom.as_str(), "         ^");
        assert_eq!(top.find('2'), bottom.find('^'));

        let [top, bottom] = menu_lines(&MenuState::Confirm { pending });
        assert_eq!(top.as_str(), "Apply 0.0020?");
        assert_eq!(bottom.as_str(), "P:yes N:no");
    }
}
