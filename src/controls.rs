//! Teach-button interpretation.
//!
//! Buttons are sampled once per cycle. Outside the menu they are
//! level-triggered: a held button trains on every cycle. Inside the menu each
//! press-and-release ("chord") counts once, so a button must be seen released
//! before the next press is honored.

use crate::device::ButtonSample;
use crate::engine::Label;

/// Debounced level of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Line {
    Released,
    Pressed,
}

impl Line {
    fn from_level(pressed: bool) -> Self {
        if pressed {
            Self::Pressed
        } else {
            Self::Released
        }
    }
}

/// A completed chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    Positive,
    Negative,
    Both,
}

/// Tracks one chord: from the first press until both lines read released.
///
/// `Both` needs the two lines down in the same sample. Rolling from one
/// button straight to the other ends the first chord and starts a new one.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChordTracker {
    active: bool,
    /// Sample that started the chord.
    lead: ButtonSample,
    saw_both: bool,
    consumed: bool,
}

impl ChordTracker {
    pub const fn new() -> Self {
        Self {
            active: false,
            lead: ButtonSample::new(false, false),
            saw_both: false,
            consumed: false,
        }
    }

    /// Feed one sample. Returns the gesture when a chord ends.
    pub fn feed(&mut self, sample: ButtonSample) -> Option<Gesture> {
        if !sample.any() {
            if !self.active {
                return None;
            }
            let gesture = self.finish();
            *self = Self::new();
            return gesture;
        }
        if self.active && !self.saw_both && !sample.both() && sample != self.lead {
            let gesture = self.finish();
            *self = Self::new();
            self.start(sample);
            return gesture;
        }
        if !self.active {
            self.start(sample);
        }
        self.saw_both |= sample.both();
        None
    }

    fn start(&mut self, sample: ButtonSample) {
        self.active = true;
        self.lead = sample;
        self.saw_both = sample.both();
    }

    fn finish(&self) -> Option<Gesture> {
        if self.consumed {
            None
        } else if self.saw_both {
            Some(Gesture::Both)
        } else if self.lead.positive {
            Some(Gesture::Positive)
        } else {
            Some(Gesture::Negative)
        }
    }

    /// Mark the running chord as already handled; its release yields nothing.
    pub fn consume(&mut self) {
        if self.active {
            self.consumed = true;
        }
    }

    /// A consumed chord is still being held.
    pub fn is_consumed(&self) -> bool {
        self.active && self.consumed
    }
}

/// What the loop should do this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    Idle,
    Teach(Label),
    OpenMenu,
    Menu(Gesture),
}

/// Maps button samples to actions.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InteractionController {
    positive: Line,
    negative: Line,
    chord: ChordTracker,
}

impl InteractionController {
    pub const fn new() -> Self {
        Self {
            positive: Line::Released,
            negative: Line::Released,
            chord: ChordTracker::new(),
        }
    }

    /// Classify one sample. `menu_open` selects between level-triggered
    /// teaching and chord gestures.
    pub fn step(&mut self, sample: ButtonSample, menu_open: bool) -> Action {
        let positive = Line::from_level(sample.positive);
        let negative = Line::from_level(sample.negative);
        if positive != self.positive || negative != self.negative {
            trace!("buttons p={} n={}", sample.positive, sample.negative);
        }
        self.positive = positive;
        self.negative = negative;

        let gesture = self.chord.feed(sample);
        if menu_open {
            return gesture.map_or(Action::Idle, Action::Menu);
        }
        match (positive, negative) {
            (Line::Pressed, Line::Pressed) => {
                self.chord.consume();
                Action::OpenMenu
            }
            (Line::Pressed, Line::Released) => Action::Teach(Label::Positive),
            (Line::Released, Line::Pressed) => Action::Teach(Label::Negative),
            (Line::Released, Line::Released) => Action::Idle,
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: ButtonSample = ButtonSample::new(false, false);
    const P: ButtonSample = ButtonSample::new(true, false);
    const N: ButtonSample = ButtonSample::new(false, true);
    const BOTH: ButtonSample = ButtonSample::new(true, true);

    #[test]
    fn chord_reports_on_release() {
        let mut chord = ChordTracker::new();
        assert_eq!(chord.feed(P), None);
        assert_eq!(chord.feed(P), None);
        assert_eq!(chord.feed(NONE), Some(Gesture::Positive));
        assert_eq!(chord.feed(NONE), None);
    }

    #[test]
    fn staggered_press_is_both() {
        let mut chord = ChordTracker::new();
        chord.feed(N);
        chord.feed(BOTH);
        chord.feed(P);
        assert_eq!(chord.feed(NONE), Some(Gesture::Both));
    }

    #[test]
    fn rolled_press_is_two_taps() {
        let mut chord = ChordTracker::new();
        assert_eq!(chord.feed(P), None);
        assert_eq!(chord.feed(N), Some(Gesture::Positive));
        assert_eq!(chord.feed(NONE), Some(Gesture::Negative));
    }

    #[test]
    fn roll_in_menu_never_commits() {
        let mut ctl = InteractionController::new();
        assert_eq!(ctl.step(P, true), Action::Idle);
        assert_eq!(ctl.step(N, true), Action::Menu(Gesture::Positive));
        assert_eq!(ctl.step(NONE, true), Action::Menu(Gesture::Negative));
    }

    #[test]
    fn consumed_chord_is_silent() {
        let mut chord = ChordTracker::new();
        chord.feed(BOTH);
        chord.consume();
        assert!(chord.is_consumed());
        assert_eq!(chord.feed(NONE), None);
        assert!(!chord.is_consumed());
    }

    #[test]
    fn held_button_teaches_every_cycle() {
        let mut ctl = InteractionController::new();
        for _ in 0..3 {
            assert_eq!(ctl.step(P, false), Action::Teach(Label::Positive));
        }
        assert_eq!(ctl.step(N, false), Action::Teach(Label::Negative));
        assert_eq!(ctl.step(NONE, false), Action::Idle);
    }

    #[test]
    fn both_opens_menu_once() {
        let mut ctl = InteractionController::new();
        assert_eq!(ctl.step(BOTH, false), Action::OpenMenu);
        // menu now open: the opening chord must not count as a gesture
        assert_eq!(ctl.step(BOTH, true), Action::Idle);
        assert_eq!(ctl.step(NONE, true), Action::Idle);
        assert_eq!(ctl.step(P, true), Action::Idle);
        assert_eq!(ctl.step(NONE, true), Action::Menu(Gesture::Positive));
    }
}
