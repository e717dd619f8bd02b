//! Display and LED surfaces
//!
//! The pad renders everything itself; these traits are the controller's
//! view of its LED ring and screen. Production impls live on the HID
//! device and turn each call into protocol packets.

pub mod icons;

pub use icons::{IconPresenter, Presentation};

use crate::profiles::KEY_COUNT;
use anyhow::Result;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// A 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(pub u32);

impl Rgb {
    /// LED off
    pub const OFF: Rgb = Rgb(0);

    pub fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn b(self) -> u8 {
        self.0 as u8
    }
}

// Profile files write colors either as "#RRGGBB" or a bare integer.
impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(u32),
            Hex(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Int(value) => Ok(Rgb(value & 0x00FF_FFFF)),
            Repr::Hex(text) => {
                let digits = text.trim_start_matches('#');
                u32::from_str_radix(digits, 16)
                    .map(|value| Rgb(value & 0x00FF_FFFF))
                    .map_err(|_| D::Error::custom(format!("invalid color: {text:?}")))
            }
        }
    }
}

/// One decoded frame of an icon strip
#[derive(Debug)]
pub struct IconFrame<'a> {
    pub width: u32,
    pub height: u32,
    /// Raw decoded rows, `width * height` pixels
    pub data: &'a [u8],
}

/// Per-key RGB indicators
pub trait LedPanel {
    /// Set one key's LED color
    fn set_key_color(&mut self, index: usize, color: Rgb) -> Result<()>;

    /// Set the whole panel in one update
    fn set_all_leds(&mut self, colors: &[Rgb; KEY_COUNT]) -> Result<()>;
}

/// The pad's screen
pub trait DisplaySurface {
    /// Render the key-label menu with the profile name header
    fn show_menu(&mut self, name: &str, labels: &[String]) -> Result<()>;

    /// Render a full-screen diagnostic message
    fn show_message(&mut self, text: &str) -> Result<()>;

    /// Blit one icon animation frame
    fn blit_icon_frame(&mut self, frame: &IconFrame<'_>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Holder {
        color: Rgb,
    }

    #[test]
    fn test_rgb_channels() {
        let color = Rgb(0xBB51FB);
        assert_eq!(color.r(), 0xBB);
        assert_eq!(color.g(), 0x51);
        assert_eq!(color.b(), 0xFB);
    }

    #[test]
    fn test_rgb_from_hex_string() {
        let holder: Holder = toml::from_str(r##"color = "#FF0000""##).unwrap();
        assert_eq!(holder.color, Rgb(0xFF0000));
    }

    #[test]
    fn test_rgb_from_integer() {
        let holder: Holder = toml::from_str("color = 16711680").unwrap();
        assert_eq!(holder.color, Rgb(0xFF0000));
    }

    #[test]
    fn test_rgb_rejects_garbage() {
        let result: Result<Holder, _> = toml::from_str(r#"color = "not-a-color""#);
        assert!(result.is_err());
    }
}
