//! HID command helpers
//!
//! Convenience functions for building the packets behind every sink,
//! LED, and display operation. All builders return `Vec<HidPacket>` using
//! the chunked protocol.

use super::keycodes::{ConsumerCode, Keycode};
use super::protocol::{build_chunked_packets, Command, HidPacket};
use crate::display::Rgb;
use crate::profiles::KEY_COUNT;
use std::path::Path;

/// Build a key press command
pub fn build_key_press(code: Keycode) -> Vec<HidPacket> {
    build_chunked_packets(Command::KeyPress, &[code.to_byte()])
}

/// Build a key release command
pub fn build_key_release(code: Keycode) -> Vec<HidPacket> {
    build_chunked_packets(Command::KeyRelease, &[code.to_byte()])
}

/// Build a text command (may be multi-packet for long strings)
pub fn build_type_text(text: &str) -> Vec<HidPacket> {
    build_chunked_packets(Command::TypeText, text.as_bytes())
}

/// Build a media press command
pub fn build_media_press(code: ConsumerCode) -> Vec<HidPacket> {
    build_chunked_packets(Command::MediaPress, &code.to_u16().to_le_bytes())
}

/// Build a media release command
pub fn build_media_release() -> Vec<HidPacket> {
    build_chunked_packets(Command::MediaRelease, &[])
}

/// Build a mouse button press command
pub fn build_mouse_press(buttons: u8) -> Vec<HidPacket> {
    build_chunked_packets(Command::MousePress, &[buttons])
}

/// Build a mouse button release command
pub fn build_mouse_release(buttons: u8) -> Vec<HidPacket> {
    build_chunked_packets(Command::MouseRelease, &[buttons])
}

/// Build a mouse move command; deltas are clamped to the wire range
pub fn build_mouse_move(dx: i32, dy: i32, wheel: i32) -> Vec<HidPacket> {
    let mut payload = Vec::with_capacity(5);
    payload.extend_from_slice(&clamp_i16(dx).to_le_bytes());
    payload.extend_from_slice(&clamp_i16(dy).to_le_bytes());
    payload.push(wheel.clamp(i8::MIN as i32, i8::MAX as i32) as i8 as u8);
    build_chunked_packets(Command::MouseMove, &payload)
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Build a tone start command
pub fn build_tone_start(frequency: u32) -> Vec<HidPacket> {
    let hz = frequency.min(u16::MAX as u32) as u16;
    build_chunked_packets(Command::ToneStart, &hz.to_le_bytes())
}

/// Build a tone stop command
pub fn build_tone_stop() -> Vec<HidPacket> {
    build_chunked_packets(Command::ToneStop, &[])
}

/// Build a play-file command
pub fn build_play_file(path: &Path) -> Vec<HidPacket> {
    build_chunked_packets(Command::PlayFile, path.to_string_lossy().as_bytes())
}

/// Build a release-all command
pub fn build_release_all() -> Vec<HidPacket> {
    build_chunked_packets(Command::ReleaseAll, &[])
}

/// Build a single-LED color command
pub fn build_set_led(index: usize, color: Rgb) -> Vec<HidPacket> {
    let payload = [index as u8, color.r(), color.g(), color.b()];
    build_chunked_packets(Command::SetLed, &payload)
}

/// Build a whole-panel LED command
pub fn build_set_leds(colors: &[Rgb; KEY_COUNT]) -> Vec<HidPacket> {
    let mut payload = Vec::with_capacity(KEY_COUNT * 3);
    for color in colors {
        payload.extend_from_slice(&[color.r(), color.g(), color.b()]);
    }
    build_chunked_packets(Command::SetLeds, &payload)
}

/// Build a menu render command with the profile name and key labels
pub fn build_show_menu(name: &str, labels: &[String]) -> Vec<HidPacket> {
    let json = serde_json::json!({
        "name": name,
        "labels": labels,
    });
    build_chunked_packets(Command::ShowMenu, json.to_string().as_bytes())
}

/// Build a full-screen message command
pub fn build_show_message(text: &str) -> Vec<HidPacket> {
    let json = serde_json::json!({ "text": text });
    build_chunked_packets(Command::ShowMessage, json.to_string().as_bytes())
}

/// Build an icon frame blit. Payload: width u16, height u16, raw pixels.
pub fn build_blit_frame(width: u32, height: u32, pixels: &[u8]) -> Vec<HidPacket> {
    let mut payload = Vec::with_capacity(4 + pixels.len());
    payload.extend_from_slice(&(width.min(u16::MAX as u32) as u16).to_le_bytes());
    payload.extend_from_slice(&(height.min(u16::MAX as u32) as u16).to_le_bytes());
    payload.extend_from_slice(pixels);
    build_chunked_packets(Command::BlitFrame, &payload)
}
