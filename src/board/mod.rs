//! STM32F446 Nucleo adapters for the trainer's device traits.
//!
//! | Device        | Wiring                                     |
//! |---------------|--------------------------------------------|
//! | SSD1306 OLED  | I2C1, SCL=PB8, SDA=PB9, address 0x3C       |
//! | Status LED    | LD2 on PA5                                 |
//! | Key matrix    | rows PC0-PC3 (driven), cols PC4-PC7 (pull-up) |
//! | Teach buttons | P on PA1, N on PA0, to ground              |
//! | Seed noise    | PA4 floating analog                        |

pub mod buttons;
pub mod keypad;
pub mod panel;
pub mod startup;

use stm32f4xx_hal::{i2c::I2c, pac};

pub use buttons::TeachButtons;
pub use keypad::Keypad;
pub use panel::Panel;

/// Shared I2C bus manager. `BusManagerSimple` uses a `NullMutex`, which is
/// fine because only the control task touches the bus after init.
pub type I2cBus = shared_bus::BusManagerSimple<I2c<pac::I2C1>>;

/// Handle onto the shared bus.
pub type I2cProxy = shared_bus::I2cProxy<'static, shared_bus::NullMutex<I2c<pac::I2C1>>>;

/// 7-bit address of the SSD1306.
pub const PANEL_ADDRESS: u8 = 0x3C;
