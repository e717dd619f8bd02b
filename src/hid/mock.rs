//! Mock deck for testing without hardware
//!
//! Records every sink call in order and models the state the firmware
//! would hold asserted (keys, mouse buttons, consumer code, tone), so
//! tests can check both call ordering and end-state invariants like
//! "nothing left pressed".

use super::keycodes::{ConsumerCode, Keycode};
use super::sink::OutputSink;
use crate::core::events::{InputSource, KeyEvent};
use crate::display::{DisplaySurface, IconFrame, LedPanel, Rgb};
use crate::profiles::KEY_COUNT;
use anyhow::Result;
use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

/// One recorded sink invocation
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    KeyPress(Keycode),
    KeyRelease(Keycode),
    WriteText(String),
    MediaPress(ConsumerCode),
    MediaRelease,
    MousePress(u8),
    MouseRelease(u8),
    MouseMove(i32, i32, i32),
    ToneStart(u32),
    ToneStop,
    PlayFile(PathBuf),
    ReleaseAll,
}

/// Snapshot of everything the firmware would currently hold asserted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssertedState {
    pub keys: BTreeSet<u8>,
    pub media: Option<ConsumerCode>,
    pub mouse_buttons: u8,
    pub tone: Option<u32>,
}

/// In-memory stand-in for the pad
#[derive(Debug, Default)]
pub struct MockDeck {
    /// Ordered log of sink calls
    pub calls: Vec<SinkCall>,
    /// Current LED colors
    pub leds: [Rgb; KEY_COUNT],
    /// Last rendered menu, as (profile name, labels)
    pub menu: Option<(String, Vec<String>)>,
    /// Full-screen messages shown
    pub messages: Vec<String>,
    /// Number of icon frames blitted
    pub frames_blitted: usize,
    /// Dimensions of the last blitted frame
    pub last_frame_size: Option<(u32, u32)>,

    state: AssertedState,

    // Scripted input
    positions: VecDeque<i64>,
    position: i64,
    button: bool,
    keys: VecDeque<KeyEvent>,
}

impl MockDeck {
    pub fn new() -> Self {
        Self {
            leds: [Rgb::OFF; KEY_COUNT],
            ..Default::default()
        }
    }

    /// Snapshot the modeled firmware state
    pub fn asserted(&self) -> AssertedState {
        self.state.clone()
    }

    /// Pin the encoder at a position
    pub fn set_position(&mut self, position: i64) {
        self.positions.clear();
        self.position = position;
    }

    /// Queue positions returned by successive `encoder_position` calls;
    /// the last one repeats once the script runs out
    pub fn script_positions<I: IntoIterator<Item = i64>>(&mut self, positions: I) {
        self.positions = positions.into_iter().collect();
    }

    /// Set the debounced encoder button state
    pub fn set_button(&mut self, pressed: bool) {
        self.button = pressed;
    }

    /// Queue a key transition
    pub fn push_key(&mut self, index: usize, pressed: bool) {
        self.keys.push_back(KeyEvent { index, pressed });
    }

    /// Pre-assert mouse buttons, as if another macro held them
    pub fn force_mouse_buttons(&mut self, mask: u8) {
        self.state.mouse_buttons |= mask;
    }
}

impl InputSource for MockDeck {
    fn encoder_position(&mut self) -> i64 {
        if let Some(position) = self.positions.pop_front() {
            self.position = position;
        }
        self.position
    }

    fn encoder_pressed(&mut self) -> bool {
        self.button
    }

    fn next_key_event(&mut self) -> Option<KeyEvent> {
        self.keys.pop_front()
    }
}

impl OutputSink for MockDeck {
    fn key_press(&mut self, code: Keycode) -> Result<()> {
        self.calls.push(SinkCall::KeyPress(code));
        self.state.keys.insert(code.to_byte());
        Ok(())
    }

    fn key_release(&mut self, code: Keycode) -> Result<()> {
        self.calls.push(SinkCall::KeyRelease(code));
        self.state.keys.remove(&code.to_byte());
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.calls.push(SinkCall::WriteText(text.to_string()));
        Ok(())
    }

    fn media_press(&mut self, code: ConsumerCode) -> Result<()> {
        self.calls.push(SinkCall::MediaPress(code));
        self.state.media = Some(code);
        Ok(())
    }

    fn media_release(&mut self) -> Result<()> {
        self.calls.push(SinkCall::MediaRelease);
        self.state.media = None;
        Ok(())
    }

    fn mouse_press(&mut self, buttons: u8) -> Result<()> {
        self.calls.push(SinkCall::MousePress(buttons));
        self.state.mouse_buttons |= buttons;
        Ok(())
    }

    fn mouse_release(&mut self, buttons: u8) -> Result<()> {
        self.calls.push(SinkCall::MouseRelease(buttons));
        self.state.mouse_buttons &= !buttons;
        Ok(())
    }

    fn mouse_move(&mut self, dx: i32, dy: i32, wheel: i32) -> Result<()> {
        self.calls.push(SinkCall::MouseMove(dx, dy, wheel));
        Ok(())
    }

    fn tone_start(&mut self, frequency: u32) -> Result<()> {
        self.calls.push(SinkCall::ToneStart(frequency));
        self.state.tone = Some(frequency);
        Ok(())
    }

    fn tone_stop(&mut self) -> Result<()> {
        self.calls.push(SinkCall::ToneStop);
        self.state.tone = None;
        Ok(())
    }

    fn play_file(&mut self, path: &Path) -> Result<()> {
        self.calls.push(SinkCall::PlayFile(path.to_path_buf()));
        Ok(())
    }

    fn release_all(&mut self) -> Result<()> {
        self.calls.push(SinkCall::ReleaseAll);
        self.state = AssertedState::default();
        Ok(())
    }
}

impl LedPanel for MockDeck {
    fn set_key_color(&mut self, index: usize, color: Rgb) -> Result<()> {
        if let Some(led) = self.leds.get_mut(index) {
            *led = color;
        }
        Ok(())
    }

    fn set_all_leds(&mut self, colors: &[Rgb; KEY_COUNT]) -> Result<()> {
        self.leds = *colors;
        Ok(())
    }
}

impl DisplaySurface for MockDeck {
    fn show_menu(&mut self, name: &str, labels: &[String]) -> Result<()> {
        self.menu = Some((name.to_string(), labels.to_vec()));
        Ok(())
    }

    fn show_message(&mut self, text: &str) -> Result<()> {
        self.messages.push(text.to_string());
        Ok(())
    }

    fn blit_icon_frame(&mut self, frame: &IconFrame<'_>) -> Result<()> {
        self.frames_blitted += 1;
        self.last_frame_size = Some((frame.width, frame.height));
        Ok(())
    }
}
