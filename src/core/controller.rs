//! Main controller event loop
//!
//! Tick-driven state machine over the pad's input. Each tick checks, in
//! precedence order: encoder rotation (profile switch), encoder button
//! edge (virtual key 12), then one queued keypad transition. Playback of
//! a macro blocks the loop through its delays; the only interruptible
//! stretch is the icon presentation during a switch.

use crate::action::interpreter;
use crate::core::config::InputConfig;
use crate::core::state::ControllerState;
use crate::display::{IconPresenter, Rgb};
use crate::hid::Device;
use crate::profiles::{Profile, ENCODER_KEY, KEY_COUNT};
use anyhow::{bail, Result};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// LED color while a key's macro is held
const HIGHLIGHT_COLOR: Rgb = Rgb(0xFFFFFF);

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do
    Idle,
    /// Switched to the profile at this index
    Switched(usize),
    /// A switch began but its presentation was interrupted; input stays
    /// refused until a later tick completes the activation
    SwitchInterrupted,
    /// Played the macro bound at this index
    Played(usize),
    /// Unwound the macro bound at this index
    Released(usize),
    /// An edge arrived but nothing was bound (or held) for it
    Dropped,
}

/// Owns the device, the loaded profiles, and the tick state machine
pub struct Controller<D: Device> {
    deck: D,
    presenter: IconPresenter,
    profiles: Vec<Profile>,
    state: ControllerState,
    tick_interval: Duration,
}

impl<D: Device> Controller<D> {
    pub fn new(
        deck: D,
        presenter: IconPresenter,
        profiles: Vec<Profile>,
        config: &InputConfig,
    ) -> Result<Self> {
        if profiles.is_empty() {
            bail!("at least one profile is required");
        }
        Ok(Self {
            deck,
            presenter,
            profiles,
            state: ControllerState::new(),
            tick_interval: Duration::from_millis(config.tick_interval_ms),
        })
    }

    /// Run the event loop until a device error surfaces.
    pub fn run(&mut self) -> Result<()> {
        self.state.last_button = self.deck.encoder_pressed();
        info!("Controller running with {} profile(s)", self.profiles.len());
        loop {
            self.tick()?;
            thread::sleep(self.tick_interval);
        }
    }

    /// Poll inputs once and dispatch at most one transition.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        // 1. Encoder rotation switches profiles. `ready == false` means an
        // earlier activation was interrupted and must be retried even if
        // the encoder has meanwhile come back to the recorded position.
        let position = self.deck.encoder_position();
        let mut switched = None;
        if self.state.last_position != Some(position) || !self.state.ready {
            let index = position.rem_euclid(self.profiles.len() as i64) as usize;
            debug!("Switching to profile {} (encoder at {})", index, position);
            self.state.begin_switch(index, position);
            let completed = self.profiles[index].activate(&mut self.deck, &self.presenter)?;
            self.state.ready = completed;
            if !completed {
                // The turn that interrupted the presentation restarts the
                // switch next tick; edges queued meanwhile belong to a
                // profile that never became active.
                debug!("Activation of profile {} interrupted", index);
                self.discard_pending_input();
                return Ok(TickOutcome::SwitchInterrupted);
            }
            info!("Profile {:?} active", self.profiles[index].name);
            switched = Some(index);
        }

        // 2. Encoder button edge acts as a virtual 13th key.
        let profile = &self.profiles[self.state.active_profile];
        let button = self.deck.encoder_pressed();
        let (index, pressed) = if button != self.state.last_button {
            self.state.last_button = button;
            if !profile.has_encoder_binding() {
                return Ok(TickOutcome::Dropped);
            }
            (ENCODER_KEY, button)
        } else {
            // 3. One keypad transition per tick.
            match self.deck.next_key_event() {
                Some(event) if profile.binding(event.index).is_some() => {
                    (event.index, event.pressed)
                }
                Some(event) => {
                    debug!("No binding for key {}, dropping", event.index);
                    return Ok(TickOutcome::Dropped);
                }
                None => {
                    return Ok(match switched {
                        Some(index) => TickOutcome::Switched(index),
                        None => TickOutcome::Idle,
                    })
                }
            }
        };

        let Some(binding) = self.profiles[self.state.active_profile].binding(index) else {
            return Ok(TickOutcome::Dropped);
        };

        if pressed {
            if index < KEY_COUNT {
                self.deck.set_key_color(index, HIGHLIGHT_COLOR)?;
            }
            self.state.held[index] = true;
            interpreter::play(&binding.sequence, &mut self.deck)?;
            Ok(TickOutcome::Played(index))
        } else {
            if !self.state.held[index] {
                // The press predates the last switch; the switch already
                // released everything this key could hold.
                return Ok(TickOutcome::Dropped);
            }
            self.state.held[index] = false;
            interpreter::release(&binding.sequence, &mut self.deck)?;
            self.deck.media_release()?;
            if index < KEY_COUNT {
                self.deck.set_key_color(index, binding.color)?;
            }
            Ok(TickOutcome::Released(index))
        }
    }

    /// Current controller state (for observation)
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// The active profile
    pub fn active_profile(&self) -> &Profile {
        &self.profiles[self.state.active_profile]
    }

    /// Access the device (for observation in tests)
    pub fn deck(&self) -> &D {
        &self.deck
    }

    pub fn deck_mut(&mut self) -> &mut D {
        &mut self.deck
    }

    fn discard_pending_input(&mut self) {
        while self.deck.next_key_event().is_some() {}
        self.state.last_button = self.deck.encoder_pressed();
    }
}
