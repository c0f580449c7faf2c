//! Operator menu: reset the network or edit the learning rate with the two
//! teach buttons.
//!
//! ```text
//! Closed --both--> ItemSelect(0)
//! ItemSelect(i)   P: i+1   N: i-1   both: commit item
//!   Reset      -> zero pattern and weights, Closed
//!   ChangeRate -> EditRate { digit: 0 }
//!   Exit       -> Closed
//! EditRate(d)     P: digit+1   N: digit-1   both: next digit, Confirm after the last
//! Confirm         P: apply, Closed   N: discard, Closed   both: back to EditRate(0)
//! ```

use core::fmt;

use crate::controls::Gesture;

/// Entries of the top-level menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    Reset,
    ChangeRate,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Reset, MenuItem::ChangeRate, MenuItem::Exit];

    pub fn from_index(index: u8) -> Self {
        Self::ALL[usize::from(index) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Reset => "Reset",
            Self::ChangeRate => "Change rate",
            Self::Exit => "Exit",
        }
    }
}

const ITEM_COUNT: u8 = MenuItem::ALL.len() as u8;

/// Learning rate being edited, as a fixed-point decimal `0.dddd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingRate {
    scaled: u32,
    digits: u8,
}

impl PendingRate {
    /// Round `rate` to `digits` decimal places. Rates of 1 or more clamp to
    /// the largest editable value.
    pub fn from_rate(rate: f32, digits: u8) -> Self {
        let scale = 10u32.pow(u32::from(digits));
        let scaled = libm::roundf(rate.max(0.0) * scale as f32) as u32;
        Self {
            scaled: scaled.min(scale - 1),
            digits,
        }
    }

    pub fn digits(&self) -> u8 {
        self.digits
    }

    pub fn scaled(&self) -> u32 {
        self.scaled
    }

    fn place(&self, position: u8) -> u32 {
        10u32.pow(u32::from(self.digits - 1 - position))
    }

    /// Decimal digit at `position`, 0 being tenths.
    pub fn digit(&self, position: u8) -> u8 {
        ((self.scaled / self.place(position)) % 10) as u8
    }

    fn set_digit(&mut self, position: u8, value: u8) {
        let place = self.place(position);
        let old = u32::from(self.digit(position));
        self.scaled = self.scaled - old * place + u32::from(value) * place;
    }

    /// Raise one digit, 9 wraps to 0 without carrying.
    pub fn increment(&mut self, position: u8) {
        let d = self.digit(position);
        self.set_digit(position, (d + 1) % 10);
    }

    /// Lower one digit, 0 wraps to 9 without borrowing.
    pub fn decrement(&mut self, position: u8) {
        let d = self.digit(position);
        self.set_digit(position, (d + 9) % 10);
    }

    pub fn to_rate(&self) -> f32 {
        self.scaled as f32 / 10u32.pow(u32::from(self.digits)) as f32
    }
}

impl fmt::Display for PendingRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0.{:0width$}", self.scaled, width = usize::from(self.digits))
    }
}

/// Side effect a menu step asks the trainer to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuEffect {
    None,
    /// Clear the pattern and zero the weights.
    Reset,
    /// Replace the learning rate.
    SetRate(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuState {
    #[default]
    Closed,
    ItemSelect(u8),
    EditRate { digit: u8, pending: PendingRate },
    Confirm { pending: PendingRate },
}

impl MenuState {
    pub const fn open() -> Self {
        Self::ItemSelect(0)
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Advance on one gesture. `rate` and `digits` seed the rate editor.
    pub fn step(self, gesture: Gesture, rate: f32, digits: u8) -> (Self, MenuEffect) {
        match self {
            Self::Closed => (Self::Closed, MenuEffect::None),
            Self::ItemSelect(index) => match gesture {
                Gesture::Positive => (Self::ItemSelect((index + 1) % ITEM_COUNT), MenuEffect::None),
                Gesture::Negative => (
                    Self::ItemSelect((index + ITEM_COUNT - 1) % ITEM_COUNT),
                    MenuEffect::None,
                ),
                Gesture::Both => match MenuItem::from_index(index) {
                    MenuItem::Reset => (Self::Closed, MenuEffect::Reset),
                    MenuItem::ChangeRate => (
                        Self::EditRate {
                            digit: 0,
                            pending: PendingRate::from_rate(rate, digits),
                        },
                        MenuEffect::None,
                    ),
                    MenuItem::Exit => (Self::Closed, MenuEffect::None),
                },
            },
            Self::EditRate { digit, mut pending } => match gesture {
                Gesture::Positive => {
                    pending.increment(digit);
                    (Self::EditRate { digit, pending }, MenuEffect::None)
                }
                Gesture::Negative => {
                    pending.decrement(digit);
                    (Self::EditRate { digit, pending }, MenuEffect::None)
                }
                Gesture::Both if digit + 1 < pending.digits() => (
                    Self::EditRate {
                        digit: digit + 1,
                        pending,
                    },
                    MenuEffect::None,
                ),
                Gesture::Both => (Self::Confirm { pending }, MenuEffect::None),
            },
            Self::Confirm { pending } => match gesture {
                Gesture::Positive => (Self::Closed, MenuEffect::SetRate(pending.to_rate())),
                Gesture::Negative => (Self::Closed, MenuEffect::None),
                Gesture::Both => (Self::EditRate { digit: 0, pending }, MenuEffect::None),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_selection_wraps() {
        let s = MenuState::open();
        let (s, _) = s.step(Gesture::Negative, 0.002, 4);
        assert_eq!(s, MenuState::ItemSelect(2));
        let (s, _) = s.step(Gesture::Positive, 0.002, 4);
        assert_eq!(s, MenuState::ItemSelect(0));
    }

    #[test]
    fn commit_items() {
        let (s, effect) = MenuState::ItemSelect(0).step(Gesture::Both, 0.002, 4);
        assert_eq!((s, effect), (MenuState::Closed, MenuEffect::Reset));

        let (s, effect) = MenuState::ItemSelect(2).step(Gesture::Both, 0.002, 4);
        assert_eq!((s, effect), (MenuState::Closed, MenuEffect::None));

        let (s, _) = MenuState::ItemSelect(1).step(Gesture::Both, 0.002, 4);
        match s {
            MenuState::EditRate { digit, pending } => {
                assert_eq!(digit, 0);
                assert_eq!(pending.scaled(), 20);
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn pending_rate_formats_and_edits() {
        let mut rate = PendingRate::from_rate(0.002, 4);
        assert_eq!(format!("{rate}"), "0.0020");
        assert_eq!(rate.digit(2), 2);

        rate.increment(0);
        assert_eq!(format!("{rate}"), "0.1020");
        rate.decrement(3);
        assert_eq!(format!("{rate}"), "0.1029");
        rate.increment(3);
        assert_eq!(format!("{rate}"), "0.1020");
        assert!((rate.to_rate() - 0.102).abs() < 1e-6);
    }

    #[test]
    fn digits_wrap_without_carry() {
        let mut rate = PendingRate::from_rate(0.0090, 4);
        rate.increment(2);
        assert_eq!(format!("{rate}"), "0.0000");
        rate.decrement(2);
        assert_eq!(format!("{rate}"), "0.0090");
    }

    #[test]
    fn large_rate_clamps() {
        assert_eq!(PendingRate::from_rate(3.0, 2).scaled(), 99);
        assert_eq!(PendingRate::from_rate(-1.0, 2).scaled(), 0);
    }

    // Known divergence: earlier firmware never left the rate editor. The
    // both-chord now walks the digits and ends in a confirmation step.
    #[test]
    fn rate_editor_exits_through_confirm() {
        let mut s = MenuState::EditRate {
            digit: 0,
            pending: PendingRate::from_rate(0.002, 2),
        };
        s = s.step(Gesture::Positive, 0.0, 2).0;
        s = s.step(Gesture::Both, 0.0, 2).0;
        assert!(matches!(s, MenuState::EditRate { digit: 1, .. }));
        s = s.step(Gesture::Both, 0.0, 2).0;
        assert!(matches!(s, MenuState::Confirm { .. }));

        let (closed, effect) = s.step(Gesture::Positive, 0.0, 2);
        assert_eq!(closed, MenuState::Closed);
        match effect {
            MenuEffect::SetRate(rate) => assert!((rate - 0.1).abs() < 1e-6),
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn confirm_can_discard_or_return() {
        let pending = PendingRate::from_rate(0.5, 1);
        let confirm = MenuState::Confirm { pending };
        assert_eq!(confirm.step(Gesture::Negative, 0.0, 1), (MenuState::Closed, MenuEffect::None));
        assert_eq!(
            confirm.step(Gesture::Both, 0.0, 1).0,
            MenuState::EditRate { digit: 0, pending }
        );
    }
}
