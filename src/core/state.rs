//! Controller state tracking

use crate::profiles::BINDING_COUNT;

/// Mutable state owned by the main controller.
///
/// Everything here is derived from input transitions; it is re-initialized
/// on every profile switch so that no held-key bookkeeping survives a
/// switch (the switch itself releases all asserted output state).
#[derive(Debug)]
pub struct ControllerState {
    /// Index of the active profile in the loaded list
    pub active_profile: usize,
    /// Encoder position recorded at the last switch (None before the first)
    pub last_position: Option<i64>,
    /// Last observed debounced encoder button state
    pub last_button: bool,
    /// Keys whose press edge has been dispatched but not yet released
    pub held: [bool; BINDING_COUNT],
    /// Whether the last activation completed; key and button input is
    /// refused until it did
    pub ready: bool,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            active_profile: 0,
            last_position: None,
            last_button: false,
            held: [false; BINDING_COUNT],
            ready: false,
        }
    }
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the start of a profile switch. Held flags are cleared before
    /// the switch completes; the activation result decides `ready`.
    pub fn begin_switch(&mut self, index: usize, position: i64) {
        self.active_profile = index;
        self.last_position = Some(position);
        self.held = [false; BINDING_COUNT];
        self.ready = false;
    }
}
