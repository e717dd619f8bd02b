//! Input event definitions
//!
//! Events flow from the HID reader thread into the controller through a
//! non-blocking channel; the controller drains them once per tick.

/// A key transition reported by the pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Physical key index (0-11)
    pub index: usize,
    /// true = pressed, false = released
    pub pressed: bool,
}

/// Raw input reported by the pad firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Absolute encoder position (monotonic, wraps by modulo downstream)
    EncoderTurn(i64),
    /// Debounced encoder button state
    EncoderButton(bool),
    /// Keypad transition
    Key(KeyEvent),
}

/// Polled view of the pad's input state.
///
/// Implementations cache the most recent encoder position and button
/// state and queue key transitions so that none are lost between ticks.
pub trait InputSource {
    /// Current encoder position
    fn encoder_position(&mut self) -> i64;

    /// Current debounced encoder button state
    fn encoder_pressed(&mut self) -> bool;

    /// Next queued key transition, if any (non-blocking)
    fn next_key_event(&mut self) -> Option<KeyEvent>;
}
