//! USB HID usage code definitions
//!
//! Named keyboard usage codes (page 0x07) for profile files, plus the
//! consumer-control usages (page 0x0C) used by media bursts.

use serde::{Deserialize, Serialize};

/// A keyboard usage code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Keycode {
    A = 0x04,
    B = 0x05,
    C = 0x06,
    D = 0x07,
    E = 0x08,
    F = 0x09,
    G = 0x0A,
    H = 0x0B,
    I = 0x0C,
    J = 0x0D,
    K = 0x0E,
    L = 0x0F,
    M = 0x10,
    N = 0x11,
    O = 0x12,
    P = 0x13,
    Q = 0x14,
    R = 0x15,
    S = 0x16,
    T = 0x17,
    U = 0x18,
    V = 0x19,
    W = 0x1A,
    X = 0x1B,
    Y = 0x1C,
    Z = 0x1D,
    Num1 = 0x1E,
    Num2 = 0x1F,
    Num3 = 0x20,
    Num4 = 0x21,
    Num5 = 0x22,
    Num6 = 0x23,
    Num7 = 0x24,
    Num8 = 0x25,
    Num9 = 0x26,
    Num0 = 0x27,
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    LeftBracket = 0x2F,
    RightBracket = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Grave = 0x35,
    Comma = 0x36,
    Dot = 0x37,
    Slash = 0x38,
    CapsLock = 0x39,
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,
    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    Right = 0x4F,
    Left = 0x50,
    Down = 0x51,
    Up = 0x52,
    LeftCtrl = 0xE0,
    LeftShift = 0xE1,
    LeftAlt = 0xE2,
    LeftGui = 0xE3,
    RightCtrl = 0xE4,
    RightShift = 0xE5,
    RightAlt = 0xE6,
    RightGui = 0xE7,
}

impl Keycode {
    /// Convert to the USB HID usage byte
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Parse from a USB HID usage byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x04 => Self::A,
            0x05 => Self::B,
            0x06 => Self::C,
            0x07 => Self::D,
            0x08 => Self::E,
            0x09 => Self::F,
            0x0A => Self::G,
            0x0B => Self::H,
            0x0C => Self::I,
            0x0D => Self::J,
            0x0E => Self::K,
            0x0F => Self::L,
            0x10 => Self::M,
            0x11 => Self::N,
            0x12 => Self::O,
            0x13 => Self::P,
            0x14 => Self::Q,
            0x15 => Self::R,
            0x16 => Self::S,
            0x17 => Self::T,
            0x18 => Self::U,
            0x19 => Self::V,
            0x1A => Self::W,
            0x1B => Self::X,
            0x1C => Self::Y,
            0x1D => Self::Z,
            0x1E => Self::Num1,
            0x1F => Self::Num2,
            0x20 => Self::Num3,
            0x21 => Self::Num4,
            0x22 => Self::Num5,
            0x23 => Self::Num6,
            0x24 => Self::Num7,
            0x25 => Self::Num8,
            0x26 => Self::Num9,
            0x27 => Self::Num0,
            0x28 => Self::Enter,
            0x29 => Self::Escape,
            0x2A => Self::Backspace,
            0x2B => Self::Tab,
            0x2C => Self::Space,
            0x2D => Self::Minus,
            0x2E => Self::Equal,
            0x2F => Self::LeftBracket,
            0x30 => Self::RightBracket,
            0x31 => Self::Backslash,
            0x33 => Self::Semicolon,
            0x34 => Self::Quote,
            0x35 => Self::Grave,
            0x36 => Self::Comma,
            0x37 => Self::Dot,
            0x38 => Self::Slash,
            0x39 => Self::CapsLock,
            0x3A => Self::F1,
            0x3B => Self::F2,
            0x3C => Self::F3,
            0x3D => Self::F4,
            0x3E => Self::F5,
            0x3F => Self::F6,
            0x40 => Self::F7,
            0x41 => Self::F8,
            0x42 => Self::F9,
            0x43 => Self::F10,
            0x44 => Self::F11,
            0x45 => Self::F12,
            0x46 => Self::PrintScreen,
            0x47 => Self::ScrollLock,
            0x48 => Self::Pause,
            0x49 => Self::Insert,
            0x4A => Self::Home,
            0x4B => Self::PageUp,
            0x4C => Self::Delete,
            0x4D => Self::End,
            0x4E => Self::PageDown,
            0x4F => Self::Right,
            0x50 => Self::Left,
            0x51 => Self::Down,
            0x52 => Self::Up,
            0xE0 => Self::LeftCtrl,
            0xE1 => Self::LeftShift,
            0xE2 => Self::LeftAlt,
            0xE3 => Self::LeftGui,
            0xE4 => Self::RightCtrl,
            0xE5 => Self::RightShift,
            0xE6 => Self::RightAlt,
            0xE7 => Self::RightGui,
            _ => return None,
        })
    }

    /// Whether this is a modifier usage (0xE0-0xE7)
    pub fn is_modifier(self) -> bool {
        (self as u8) >= 0xE0
    }
}

/// A consumer-control usage code (media keys)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u16)]
pub enum ConsumerCode {
    BrightnessUp = 0x6F,
    BrightnessDown = 0x70,
    Record = 0xB2,
    FastForward = 0xB3,
    Rewind = 0xB4,
    NextTrack = 0xB5,
    PrevTrack = 0xB6,
    Stop = 0xB7,
    Eject = 0xB8,
    PlayPause = 0xCD,
    Mute = 0xE2,
    VolumeUp = 0xE9,
    VolumeDown = 0xEA,
}

impl ConsumerCode {
    /// Convert to the 16-bit usage value
    pub fn to_u16(self) -> u16 {
        self as u16
    }

    /// Parse from a 16-bit usage value
    pub fn from_u16(value: u16) -> Option<Self> {
        Some(match value {
            0x6F => Self::BrightnessUp,
            0x70 => Self::BrightnessDown,
            0xB2 => Self::Record,
            0xB3 => Self::FastForward,
            0xB4 => Self::Rewind,
            0xB5 => Self::NextTrack,
            0xB6 => Self::PrevTrack,
            0xB7 => Self::Stop,
            0xB8 => Self::Eject,
            0xCD => Self::PlayPause,
            0xE2 => Self::Mute,
            0xE9 => Self::VolumeUp,
            0xEA => Self::VolumeDown,
            _ => return None,
        })
    }
}
