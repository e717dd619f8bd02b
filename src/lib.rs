//! Macro Deck controller
//!
//! A Rust daemon that drives a 12-key macropad with a rotary encoder, a
//! small display and per-key RGB indicators over raw USB HID.
//!
//! # Features
//! - Loads named application profiles (TOML) mapping keys to colored
//!   labels and macro sequences
//! - Rotating the encoder switches the active profile, with an
//!   interruptible icon animation on the pad's display
//! - Pressing a key or the encoder button plays the bound sequence of
//!   keystrokes, text, delays, media codes, mouse motion and tones
//! - Releasing a key unwinds exactly the state that key asserted, so
//!   rollover combinations across keys keep working

pub mod action;
pub mod core;
pub mod display;
pub mod hid;
pub mod profiles;

pub use crate::action::{Action, MediaStep, MouseAction};
pub use crate::core::config::Config;
pub use crate::core::controller::{Controller, TickOutcome};
pub use crate::core::events::{InputEvent, InputSource, KeyEvent};
pub use crate::display::{DisplaySurface, IconPresenter, LedPanel, Rgb};
pub use crate::hid::{Device, HidDeck, OutputSink};
pub use crate::profiles::{KeyBinding, Profile, ProfileError};
