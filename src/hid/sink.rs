//! Output sink interface
//!
//! The pad firmware owns the real USB keyboard/consumer/mouse endpoints
//! and the speaker; the controller only tells it what to assert or
//! release. Everything the interpreter and the profile activation
//! handshake do goes through this trait, which keeps the state machine
//! testable without hardware.

use super::keycodes::{ConsumerCode, Keycode};
use anyhow::Result;
use std::path::Path;

/// Discrete output operations accepted by the pad firmware
pub trait OutputSink {
    /// Press and hold a keyboard usage
    fn key_press(&mut self, code: Keycode) -> Result<()>;

    /// Release a keyboard usage (no-op if it is not held)
    fn key_release(&mut self, code: Keycode) -> Result<()>;

    /// Type literal text through the active keyboard layout
    fn write_text(&mut self, text: &str) -> Result<()>;

    /// Assert a consumer-control code (replaces any held code)
    fn media_press(&mut self, code: ConsumerCode) -> Result<()>;

    /// Release whatever consumer-control code is held, if any
    fn media_release(&mut self) -> Result<()>;

    /// Press mouse buttons by mask
    fn mouse_press(&mut self, buttons: u8) -> Result<()>;

    /// Release mouse buttons by mask
    fn mouse_release(&mut self, buttons: u8) -> Result<()>;

    /// Relative mouse motion
    fn mouse_move(&mut self, dx: i32, dy: i32, wheel: i32) -> Result<()>;

    /// Start a tone on the pad's speaker
    fn tone_start(&mut self, frequency: u32) -> Result<()>;

    /// Stop the tone, if one is playing
    fn tone_stop(&mut self) -> Result<()>;

    /// Play an audio file from the pad's storage
    fn play_file(&mut self, path: &Path) -> Result<()>;

    /// Release everything held: keys, consumer control, mouse buttons,
    /// tone. Only profile activation may use this, since a switch
    /// invalidates all per-key release bookkeeping at once.
    fn release_all(&mut self) -> Result<()>;
}
