//! Application profiles
//!
//! A profile names an application and binds up to 13 keys (12 physical
//! plus the encoder button) to a color, a label, and a macro sequence.
//! Profiles are immutable once loaded; switching between them is the
//! controller's job.

pub mod loader;

use crate::action::{Action, MediaStep};
use crate::display::{IconPresenter, Presentation, Rgb};
use crate::hid::Device;
use anyhow::Result;
use serde::Deserialize;
use thiserror::Error;

/// Number of physical keys on the pad
pub const KEY_COUNT: usize = 12;

/// Virtual index of the encoder button
pub const ENCODER_KEY: usize = 12;

/// Maximum bindings per profile (keys plus encoder button)
pub const BINDING_COUNT: usize = KEY_COUNT + 1;

/// Errors raised while loading a profile definition
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse profile file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("profile name must not be empty")]
    EmptyName,
    #[error("too many key bindings ({0}, max 13)")]
    TooManyKeys(usize),
    #[error("delays must not be negative")]
    NegativeDelay,
}

/// One key's binding: LED color, menu label, macro sequence
#[derive(Debug, Clone, Deserialize)]
pub struct KeyBinding {
    /// LED color while idle
    pub color: Rgb,
    /// Short label shown on the menu
    pub label: String,
    /// Actions played on press and unwound on release
    #[serde(default)]
    pub sequence: Vec<Action>,
}

/// On-disk profile schema
#[derive(Debug, Deserialize)]
pub struct ProfileFile {
    /// Application name shown as the menu header
    pub name: String,
    /// Icon file under the icons directory
    pub icon: Option<String>,
    /// Bindings in key order; entries beyond the 12 physical keys bind
    /// the encoder button
    #[serde(default)]
    pub keys: Vec<KeyBinding>,
}

/// A loaded, validated application profile
#[derive(Debug, Clone)]
pub struct Profile {
    /// Application name
    pub name: String,
    /// Icon reference, resolved against the icons directory
    pub icon: String,
    bindings: Vec<KeyBinding>,
}

impl Profile {
    /// Validate a parsed definition. `index` is the profile's position in
    /// the loaded list and names the fallback icon.
    pub fn from_file(file: ProfileFile, index: usize) -> Result<Self, ProfileError> {
        if file.name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if file.keys.len() > BINDING_COUNT {
            return Err(ProfileError::TooManyKeys(file.keys.len()));
        }
        for binding in &file.keys {
            validate_sequence(&binding.sequence)?;
        }
        Ok(Self {
            name: file.name,
            icon: file.icon.unwrap_or_else(|| format!("{index}.png")),
            bindings: file.keys,
        })
    }

    /// Binding at a key index, if the profile defines one
    pub fn binding(&self, index: usize) -> Option<&KeyBinding> {
        self.bindings.get(index)
    }

    /// Whether the encoder button is bound
    pub fn has_encoder_binding(&self) -> bool {
        self.bindings.len() > ENCODER_KEY
    }

    /// Number of bindings
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Activate this profile on the pad.
    ///
    /// Releases all output state, paints the key LEDs, then presents the
    /// icon. Presentation is interruptible: if the encoder turns during
    /// it, activation stops and returns `Ok(false)` without rendering the
    /// menu, and the caller must retry before accepting any key input. On a
    /// completed presentation the menu is rendered and `Ok(true)` is
    /// returned.
    pub fn activate<D: Device>(&self, deck: &mut D, presenter: &IconPresenter) -> Result<bool> {
        // A switch invalidates every per-key release obligation at once;
        // this is the only place a global release is allowed.
        deck.release_all()?;

        let mut colors = [Rgb::OFF; KEY_COUNT];
        for (index, slot) in colors.iter_mut().enumerate() {
            if let Some(binding) = self.binding(index) {
                *slot = binding.color;
            }
        }
        deck.set_all_leds(&colors)?;

        if presenter.present(&self.icon, deck)? == Presentation::Interrupted {
            return Ok(false);
        }

        let labels: Vec<String> = (0..KEY_COUNT)
            .map(|index| {
                self.binding(index)
                    .map(|binding| binding.label.clone())
                    .unwrap_or_default()
            })
            .collect();
        deck.show_menu(&self.name, &labels)?;
        Ok(true)
    }
}

fn validate_sequence(sequence: &[Action]) -> Result<(), ProfileError> {
    for action in sequence {
        match action {
            Action::Delay(seconds) if *seconds < 0.0 => return Err(ProfileError::NegativeDelay),
            Action::Media(steps) => {
                for step in steps {
                    if let MediaStep::Delay(seconds) = step {
                        if *seconds < 0.0 {
                            return Err(ProfileError::NegativeDelay);
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}
