//! # Adaline keypad trainer
//!
//! Widrow-Hoff (LMS) online learning on a 4x4 illuminated keypad. The keys
//! hold a bipolar input pattern, two teach buttons supply the desired class,
//! and every cycle the 17 weights (16 keys plus bias) take one gradient step
//! toward it.
//!
//! The library is `no_std` and hardware-free: the control loop is written
//! against the traits in [`device`] and the firmware binary provides the
//! STM32F446 implementations.
//!
//! ```text
//! KeyEdgeSource ──► PatternState ──► output() ──► Display
//!                                       ▲
//! ControlButtons ──► InteractionController ──► update() / MenuState
//! ```

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod controls;
pub mod device;
pub mod engine;
pub mod error;
pub mod menu;
pub mod pattern;
pub mod present;
pub mod trainer;
pub mod weights;

pub use config::Config;
pub use device::{ButtonSample, ControlButtons, Display, Edge, EdgeBatch, KeyEdge, KeyEdgeSource};
pub use engine::{output, sigmoid_display, update, EngineState, Label};
pub use error::{Device, Error, Result};
pub use menu::{MenuEffect, MenuItem, MenuState, PendingRate};
pub use pattern::{Indicator, PatternState, Polarity, BIAS_INDEX, INPUT_LEN, KEY_COUNT};
pub use present::{Rgb, WeightGrid};
pub use trainer::{CycleReport, Phase, Trainer};
pub use weights::WeightVector;
