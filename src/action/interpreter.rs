//! Macro sequence playback and unwinding
//!
//! `play` executes a sequence in order, blocking through delays. `release`
//! executes the release-only projection of the same sequence; it must be
//! safe to call even when `play` was cut short (a profile switch can
//! interrupt a press mid-sequence), so it never assumes any step of the
//! press actually ran.

use super::{Action, MediaStep, MouseAction};
use crate::hid::sink::OutputSink;
use anyhow::Result;
use std::thread;
use std::time::Duration;

fn sleep_secs(seconds: f32) {
    thread::sleep(Duration::from_secs_f32(seconds.max(0.0)));
}

/// Execute a sequence against the output sink, in order.
pub fn play<S: OutputSink + ?Sized>(sequence: &[Action], sink: &mut S) -> Result<()> {
    for action in sequence {
        match action {
            Action::KeyDown(code) => sink.key_press(*code)?,
            Action::KeyUp(code) => sink.key_release(*code)?,
            Action::Delay(seconds) => sleep_secs(*seconds),
            Action::Text(text) => sink.write_text(text)?,
            Action::Media(steps) => {
                for step in steps {
                    match step {
                        MediaStep::Code(code) => {
                            // Consumer control carries one code at a time;
                            // drop the previous one before asserting the next.
                            sink.media_release()?;
                            sink.media_press(*code)?;
                        }
                        MediaStep::Delay(seconds) => sleep_secs(*seconds),
                    }
                }
            }
            Action::Mouse(mouse) => play_mouse(mouse, sink)?,
        }
    }
    Ok(())
}

fn play_mouse<S: OutputSink + ?Sized>(mouse: &MouseAction, sink: &mut S) -> Result<()> {
    if let Some(buttons) = mouse.buttons {
        let mask = buttons.unsigned_abs() as u8;
        if buttons >= 0 {
            sink.mouse_press(mask)?;
        } else {
            sink.mouse_release(mask)?;
        }
    }
    sink.mouse_move(mouse.dx, mouse.dy, mouse.wheel)?;
    if let Some(tone) = mouse.tone {
        sink.tone_stop()?;
        if tone > 0 {
            sink.tone_start(tone as u32)?;
        }
    } else if let Some(path) = &mouse.play {
        sink.play_file(path)?;
    }
    Ok(())
}

/// Execute the release-only projection of a sequence.
///
/// Keys pressed by the sequence are released individually rather than via
/// a global release, so a modifier or mouse button held by a different,
/// still-active macro stays held (rollover combinations). A mouse entry
/// unwinds its button mask when positive; a tone-only entry stops the
/// tone. Lingering consumer-control state is the caller's to drop,
/// unconditionally, on every release edge.
pub fn release<S: OutputSink + ?Sized>(sequence: &[Action], sink: &mut S) -> Result<()> {
    for action in sequence {
        match action {
            Action::KeyDown(code) => sink.key_release(*code)?,
            Action::Mouse(mouse) => {
                if let Some(buttons) = mouse.buttons {
                    if buttons >= 0 {
                        sink.mouse_release(buttons.unsigned_abs() as u8)?;
                    }
                } else if mouse.tone.is_some() {
                    sink.tone_stop()?;
                }
            }
            // Explicit key releases, delays, typed text, and media codes
            // assert nothing that survives the press path.
            Action::KeyUp(_) | Action::Delay(_) | Action::Text(_) | Action::Media(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::keycodes::{ConsumerCode, Keycode};
    use crate::hid::mock::{MockDeck, SinkCall};

    fn copy_sequence() -> Vec<Action> {
        vec![
            Action::KeyDown(Keycode::LeftCtrl),
            Action::KeyDown(Keycode::C),
            Action::KeyUp(Keycode::C),
            Action::KeyUp(Keycode::LeftCtrl),
        ]
    }

    #[test]
    fn test_play_emits_in_order() {
        let mut deck = MockDeck::new();
        play(&copy_sequence(), &mut deck).unwrap();
        assert_eq!(
            deck.calls,
            vec![
                SinkCall::KeyPress(Keycode::LeftCtrl),
                SinkCall::KeyPress(Keycode::C),
                SinkCall::KeyRelease(Keycode::C),
                SinkCall::KeyRelease(Keycode::LeftCtrl),
            ]
        );
    }

    #[test]
    fn test_media_burst_releases_between_codes() {
        let sequence = vec![Action::Media(vec![
            MediaStep::Code(ConsumerCode::VolumeUp),
            MediaStep::Delay(0.0),
            MediaStep::Code(ConsumerCode::VolumeDown),
        ])];
        let mut deck = MockDeck::new();
        play(&sequence, &mut deck).unwrap();
        assert_eq!(
            deck.calls,
            vec![
                SinkCall::MediaRelease,
                SinkCall::MediaPress(ConsumerCode::VolumeUp),
                SinkCall::MediaRelease,
                SinkCall::MediaPress(ConsumerCode::VolumeDown),
            ]
        );
        assert_eq!(deck.asserted().media, Some(ConsumerCode::VolumeDown));
    }

    #[test]
    fn test_release_is_idempotent() {
        let sequence = vec![
            Action::KeyDown(Keycode::LeftShift),
            Action::KeyDown(Keycode::F5),
            Action::Mouse(MouseAction {
                buttons: Some(1),
                ..Default::default()
            }),
        ];
        let mut deck = MockDeck::new();
        play(&sequence, &mut deck).unwrap();

        release(&sequence, &mut deck).unwrap();
        let after_first = deck.asserted();
        release(&sequence, &mut deck).unwrap();
        assert_eq!(deck.asserted(), after_first);
    }

    #[test]
    fn test_release_covers_any_played_prefix() {
        let sequence = vec![
            Action::KeyDown(Keycode::LeftCtrl),
            Action::Mouse(MouseAction {
                buttons: Some(2),
                ..Default::default()
            }),
            Action::Mouse(MouseAction {
                tone: Some(440),
                ..Default::default()
            }),
            Action::KeyDown(Keycode::X),
            Action::KeyUp(Keycode::X),
            Action::KeyUp(Keycode::LeftCtrl),
        ];

        for prefix in 0..=sequence.len() {
            let mut deck = MockDeck::new();
            play(&sequence[..prefix], &mut deck).unwrap();
            release(&sequence, &mut deck).unwrap();

            let state = deck.asserted();
            assert!(state.keys.is_empty(), "keys leaked for prefix {}", prefix);
            assert_eq!(state.mouse_buttons, 0, "buttons leaked for prefix {}", prefix);
            assert_eq!(state.tone, None, "tone leaked for prefix {}", prefix);
        }
    }

    #[test]
    fn test_release_skips_key_up_entries() {
        let sequence = vec![Action::KeyUp(Keycode::A)];
        let mut deck = MockDeck::new();
        release(&sequence, &mut deck).unwrap();
        assert!(deck.calls.is_empty());
    }

    #[test]
    fn test_mouse_release_prefers_buttons_over_tone() {
        // buttons and tone in the same entry: only the buttons unwind
        let both = vec![Action::Mouse(MouseAction {
            buttons: Some(4),
            tone: Some(880),
            ..Default::default()
        })];
        let mut deck = MockDeck::new();
        play(&both, &mut deck).unwrap();
        deck.calls.clear();
        release(&both, &mut deck).unwrap();
        assert_eq!(deck.calls, vec![SinkCall::MouseRelease(4)]);

        // tone-only entry stops the tone
        let tone_only = vec![Action::Mouse(MouseAction {
            tone: Some(880),
            ..Default::default()
        })];
        let mut deck = MockDeck::new();
        play(&tone_only, &mut deck).unwrap();
        release(&tone_only, &mut deck).unwrap();
        assert_eq!(deck.asserted().tone, None);
    }

    #[test]
    fn test_negative_button_mask_releases_on_play() {
        let sequence = vec![Action::Mouse(MouseAction {
            buttons: Some(-2),
            ..Default::default()
        })];
        let mut deck = MockDeck::new();
        deck.force_mouse_buttons(2);
        play(&sequence, &mut deck).unwrap();
        assert_eq!(deck.asserted().mouse_buttons, 0);
        // release projection ignores the negative mask
        deck.calls.clear();
        release(&sequence, &mut deck).unwrap();
        assert_eq!(deck.calls, vec![]);
    }

    #[test]
    fn test_tone_restart_stops_previous() {
        let sequence = vec![Action::Mouse(MouseAction {
            tone: Some(440),
            ..Default::default()
        })];
        let mut deck = MockDeck::new();
        play(&sequence, &mut deck).unwrap();
        assert_eq!(deck.asserted().tone, Some(440));
        play(&sequence, &mut deck).unwrap();
        assert_eq!(
            deck.calls
                .iter()
                .filter(|c| matches!(c, SinkCall::ToneStop))
                .count(),
            2
        );
    }

    #[test]
    fn test_play_file_only_without_tone() {
        let sequence = vec![Action::Mouse(MouseAction {
            tone: Some(0),
            play: Some("alert.wav".into()),
            ..Default::default()
        })];
        let mut deck = MockDeck::new();
        play(&sequence, &mut deck).unwrap();
        // tone field wins over play when both are present
        assert!(!deck
            .calls
            .iter()
            .any(|c| matches!(c, SinkCall::PlayFile(_))));
    }
}
