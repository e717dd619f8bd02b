//! Macro action primitives
//!
//! One profile key binds an ordered sequence of these. The original
//! firmware distinguished primitive kinds by value type at runtime; here
//! the kinds are a closed enum validated at profile load, so playback is
//! a single exhaustive match.

pub mod interpreter;

use crate::hid::keycodes::{ConsumerCode, Keycode};
use serde::Deserialize;
use std::path::PathBuf;

/// One step of a macro sequence
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Press and hold a key
    KeyDown(Keycode),
    /// Release a key
    KeyUp(Keycode),
    /// Pause playback for the given number of seconds
    Delay(f32),
    /// Type literal text through the active keyboard layout
    Text(String),
    /// One or more consumer-control codes, each replacing the previous,
    /// with optional interleaved delays
    Media(Vec<MediaStep>),
    /// Mouse buttons/motion, plus the speaker oddballs that share the
    /// same table shape in profile files
    Mouse(MouseAction),
}

/// One entry of a media-control burst
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaStep {
    /// Consumer-control code to press (the previous one is released first)
    Code(ConsumerCode),
    /// Pause between codes, in seconds
    Delay(f32),
}

/// Mouse motion, buttons, and tone/audio side effects
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct MouseAction {
    /// Button mask; positive = press, negative = release the mask's
    /// absolute value
    pub buttons: Option<i32>,
    /// Horizontal motion
    pub dx: i32,
    /// Vertical motion
    pub dy: i32,
    /// Wheel motion
    pub wheel: i32,
    /// Tone frequency in Hz; positive starts the tone, zero or negative
    /// stops it
    pub tone: Option<i32>,
    /// Audio file on the pad's storage to play
    pub play: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Seq {
        sequence: Vec<Action>,
    }

    #[test]
    fn test_deserialize_key_actions() {
        let seq: Seq = toml::from_str(
            r#"sequence = [{ key_down = "LeftCtrl" }, { key_down = "C" }, { key_up = "C" }, { key_up = "LeftCtrl" }]"#,
        )
        .unwrap();
        assert_eq!(
            seq.sequence,
            vec![
                Action::KeyDown(Keycode::LeftCtrl),
                Action::KeyDown(Keycode::C),
                Action::KeyUp(Keycode::C),
                Action::KeyUp(Keycode::LeftCtrl),
            ]
        );
    }

    #[test]
    fn test_deserialize_delay_and_text() {
        let seq: Seq =
            toml::from_str(r#"sequence = [{ delay = 0.25 }, { text = "hello" }]"#).unwrap();
        assert_eq!(
            seq.sequence,
            vec![Action::Delay(0.25), Action::Text("hello".to_string())]
        );
    }

    #[test]
    fn test_deserialize_media_burst() {
        let seq: Seq = toml::from_str(
            r#"sequence = [{ media = [{ code = "VolumeUp" }, { delay = 0.1 }, { code = "Mute" }] }]"#,
        )
        .unwrap();
        assert_eq!(
            seq.sequence,
            vec![Action::Media(vec![
                MediaStep::Code(ConsumerCode::VolumeUp),
                MediaStep::Delay(0.1),
                MediaStep::Code(ConsumerCode::Mute),
            ])]
        );
    }

    #[test]
    fn test_deserialize_mouse_defaults() {
        let seq: Seq = toml::from_str(r#"sequence = [{ mouse = { buttons = 1, dx = 10 } }]"#).unwrap();
        assert_eq!(
            seq.sequence,
            vec![Action::Mouse(MouseAction {
                buttons: Some(1),
                dx: 10,
                ..Default::default()
            })]
        );
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result: Result<Seq, _> = toml::from_str(r#"sequence = [{ warp_drive = 9 }]"#);
        assert!(result.is_err());
    }
}
