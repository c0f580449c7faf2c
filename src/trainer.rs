//! The control cycle: keys in, one learning step, displays out.

use crate::config::Config;
use crate::controls::{Action, Gesture, InteractionController};
use crate::device::{ControlButtons, Display, KeyEdgeSource};
use crate::engine::{sigmoid_display, EngineState, Label};
use crate::error::Result;
use crate::menu::{MenuEffect, MenuState};
use crate::pattern::KEY_COUNT;
use crate::present;
use crate::weights::WeightVector;

/// Where the trainer is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Painting key `n` at power-up, one key per cycle.
    Sweep(u8),
    Running,
}

/// What happened during one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Output `y` for the pattern after this cycle's key edges, before any
    /// weight update.
    pub output: f32,
    /// Label trained toward, if a teach button was held.
    pub trained: Option<Label>,
    /// Menu state at the end of the cycle.
    pub menu: MenuState,
}

/// Owns the learning state and the injected devices.
pub struct Trainer<K, B, D> {
    config: Config,
    engine: EngineState,
    controls: InteractionController,
    menu: MenuState,
    phase: Phase,
    keys: K,
    buttons: B,
    display: D,
}

impl<K, B, D> Trainer<K, B, D>
where
    K: KeyEdgeSource,
    B: ControlButtons,
    D: Display,
{
    pub fn new(config: Config, weights: WeightVector, keys: K, buttons: B, display: D) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            engine: EngineState::new(weights, config.initial_rate),
            controls: InteractionController::new(),
            menu: MenuState::Closed,
            phase: Phase::Sweep(0),
            keys,
            buttons,
            display,
        })
    }

    pub fn engine(&self) -> &EngineState {
        &self.engine
    }

    pub fn menu(&self) -> MenuState {
        self.menu
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn keys_mut(&mut self) -> &mut K {
        &mut self.keys
    }

    pub fn buttons_mut(&mut self) -> &mut B {
        &mut self.buttons
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Run one control cycle. Bounded time: nothing in here waits on a
    /// button.
    pub fn cycle(&mut self) -> Result<CycleReport> {
        if let Phase::Sweep(next) = self.phase {
            return self.sweep(next);
        }

        for event in self.keys.poll()? {
            if self.engine.pattern.apply_edge(event) {
                self.paint_key(event.key)?;
            }
        }

        let output = self.engine.output();
        let sample = self.buttons.sample()?;
        let mut trained = None;
        match self.controls.step(sample, self.menu.is_open()) {
            Action::Idle => {}
            Action::Teach(label) => {
                let err = self.engine.train(label);
                trace!("train {} err={}", label, err);
                trained = Some(label);
            }
            Action::OpenMenu => {
                info!("menu opened");
                self.menu = MenuState::open();
            }
            Action::Menu(gesture) => self.on_gesture(gesture),
        }

        self.refresh(output)?;
        Ok(CycleReport {
            output,
            trained,
            menu: self.menu,
        })
    }

    fn sweep(&mut self, key: u8) -> Result<CycleReport> {
        self.paint_key(key)?;
        self.display.flush()?;
        self.phase = if usize::from(key) + 1 >= KEY_COUNT {
            debug!("key sweep done");
            Phase::Running
        } else {
            Phase::Sweep(key + 1)
        };
        Ok(CycleReport {
            output: self.engine.output(),
            trained: None,
            menu: self.menu,
        })
    }

    fn on_gesture(&mut self, gesture: Gesture) {
        let (next, effect) = self.menu.step(gesture, self.engine.rate(), self.config.rate_digits);
        match effect {
            MenuEffect::None => {}
            MenuEffect::Reset => {
                info!("pattern and weights reset");
                self.engine.reset();
            }
            MenuEffect::SetRate(rate) => {
                info!("learning rate {} -> {}", self.engine.rate(), rate);
                self.engine.set_rate(rate);
            }
        }
        if !next.is_open() {
            info!("menu closed");
        }
        self.menu = next;
    }

    fn paint_key(&mut self, key: u8) -> Result<()> {
        let color = present::key_color(self.engine.pattern.indicator(usize::from(key)));
        self.display.set_key_color(key, color)
    }

    fn refresh(&mut self, output: f32) -> Result<()> {
        let sig = sigmoid_display(output);
        let lines = if self.menu.is_open() {
            present::menu_lines(&self.menu)
        } else {
            present::status_lines(sig, self.engine.rate(), self.config.rate_digits)
        };
        for (row, line) in (0u8..).zip(lines.iter()) {
            self.display.write_line(row, line)?;
        }
        self.display.set_indicator_color(present::indicator_color(sig))?;
        self.display.write_grid(&present::weight_grid(&self.engine.weights))?;
        for key in 0..KEY_COUNT as u8 {
            self.paint_key(key)?;
        }
        self.display.flush()
    }
}
