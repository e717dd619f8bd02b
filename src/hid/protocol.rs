//! Raw HID protocol for pad communication
//!
//! - Packet size: 32 bytes
//! - Byte 0: command, byte 1: START/END chunk flags, byte 2: chunk length
//! - Bytes 3-31: payload
//!
//! Payloads longer than one chunk are split across consecutive packets;
//! the first carries START, the last END. Input reports from the pad are
//! single packets with command bytes >= 0x80. The encoder button state in
//! reports is already debounced by the firmware.

use crate::core::events::{InputEvent, KeyEvent};

/// HID packet size in bytes
pub const PACKET_SIZE: usize = 32;

/// Packet header: command, flags, chunk length
pub const HEADER_SIZE: usize = 3;

/// Payload capacity of a single chunk
pub const CHUNK_PAYLOAD: usize = PACKET_SIZE - HEADER_SIZE;

/// First packet of a chunked payload
pub const FLAG_START: u8 = 0x01;
/// Last packet of a chunked payload
pub const FLAG_END: u8 = 0x02;

/// Commands understood by the pad firmware, and report types it sends back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    // Output sink
    KeyPress = 0x01,
    KeyRelease = 0x02,
    TypeText = 0x03,
    MediaPress = 0x04,
    MediaRelease = 0x05,
    MousePress = 0x06,
    MouseRelease = 0x07,
    MouseMove = 0x08,
    ToneStart = 0x09,
    ToneStop = 0x0A,
    PlayFile = 0x0B,
    ReleaseAll = 0x0C,
    // LEDs and display
    SetLed = 0x10,
    SetLeds = 0x11,
    ShowMenu = 0x12,
    ShowMessage = 0x13,
    BlitFrame = 0x14,
    // Input reports (pad -> host)
    EncoderReport = 0x80,
    ButtonReport = 0x81,
    KeyReport = 0x82,
}

impl Command {
    /// Convert command to byte value
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Parse command from byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x01 => Command::KeyPress,
            0x02 => Command::KeyRelease,
            0x03 => Command::TypeText,
            0x04 => Command::MediaPress,
            0x05 => Command::MediaRelease,
            0x06 => Command::MousePress,
            0x07 => Command::MouseRelease,
            0x08 => Command::MouseMove,
            0x09 => Command::ToneStart,
            0x0A => Command::ToneStop,
            0x0B => Command::PlayFile,
            0x0C => Command::ReleaseAll,
            0x10 => Command::SetLed,
            0x11 => Command::SetLeds,
            0x12 => Command::ShowMenu,
            0x13 => Command::ShowMessage,
            0x14 => Command::BlitFrame,
            0x80 => Command::EncoderReport,
            0x81 => Command::ButtonReport,
            0x82 => Command::KeyReport,
            _ => return None,
        })
    }
}

/// A 32-byte HID packet
#[derive(Debug, Clone)]
pub struct HidPacket {
    data: [u8; PACKET_SIZE],
}

impl Default for HidPacket {
    fn default() -> Self {
        Self::new()
    }
}

impl HidPacket {
    /// Create a new empty packet
    pub fn new() -> Self {
        Self {
            data: [0u8; PACKET_SIZE],
        }
    }

    /// Create a single-chunk packet with command, flags, and payload
    pub fn with_chunk(command: Command, flags: u8, payload: &[u8]) -> Self {
        debug_assert!(payload.len() <= CHUNK_PAYLOAD);
        let mut packet = Self::new();
        packet.data[0] = command.as_byte();
        packet.data[1] = flags;
        let len = payload.len().min(CHUNK_PAYLOAD);
        packet.data[2] = len as u8;
        packet.data[HEADER_SIZE..HEADER_SIZE + len].copy_from_slice(&payload[..len]);
        packet
    }

    /// Get the command
    pub fn command(&self) -> Option<Command> {
        Command::from_byte(self.data[0])
    }

    /// Chunk flags
    pub fn flags(&self) -> u8 {
        self.data[1]
    }

    /// Whether this starts a chunked payload
    pub fn is_start(&self) -> bool {
        self.flags() & FLAG_START != 0
    }

    /// Whether this ends a chunked payload
    pub fn is_end(&self) -> bool {
        self.flags() & FLAG_END != 0
    }

    /// Payload bytes carried by this chunk
    pub fn payload(&self) -> &[u8] {
        let len = (self.data[2] as usize).min(CHUNK_PAYLOAD);
        &self.data[HEADER_SIZE..HEADER_SIZE + len]
    }

    /// Get raw packet data for sending
    pub fn as_bytes(&self) -> &[u8; PACKET_SIZE] {
        &self.data
    }

    /// Create packet from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut packet = Self::new();
        let len = bytes.len().min(PACKET_SIZE);
        packet.data[..len].copy_from_slice(&bytes[..len]);
        packet
    }
}

/// Split a payload into chunked packets for the given command.
/// An empty payload still produces one START|END packet.
pub fn build_chunked_packets(command: Command, data: &[u8]) -> Vec<HidPacket> {
    if data.is_empty() {
        return vec![HidPacket::with_chunk(command, FLAG_START | FLAG_END, &[])];
    }

    let chunks: Vec<&[u8]> = data.chunks(CHUNK_PAYLOAD).collect();
    let last = chunks.len() - 1;
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let mut flags = 0;
            if i == 0 {
                flags |= FLAG_START;
            }
            if i == last {
                flags |= FLAG_END;
            }
            HidPacket::with_chunk(command, flags, chunk)
        })
        .collect()
}

/// Reassemble the payload of a chunked packet run
pub fn reassemble(packets: &[HidPacket]) -> Vec<u8> {
    let mut payload = Vec::new();
    for packet in packets {
        payload.extend_from_slice(packet.payload());
    }
    payload
}

/// Parse an input report packet from the pad into an event.
/// Unknown or malformed reports yield None and are dropped upstream.
pub fn parse_report(packet: &HidPacket) -> Option<InputEvent> {
    let payload = packet.payload();
    match packet.command()? {
        Command::EncoderReport => {
            let bytes: [u8; 4] = payload.get(..4)?.try_into().ok()?;
            Some(InputEvent::EncoderTurn(i64::from(i32::from_le_bytes(bytes))))
        }
        Command::ButtonReport => Some(InputEvent::EncoderButton(*payload.first()? != 0)),
        Command::KeyReport => {
            let index = *payload.first()? as usize;
            let pressed = *payload.get(1)? != 0;
            Some(InputEvent::Key(KeyEvent { index, pressed }))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_creation() {
        let packet = HidPacket::new();
        assert_eq!(packet.as_bytes().len(), PACKET_SIZE);
        assert!(packet.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_single_chunk() {
        let packets = build_chunked_packets(Command::KeyPress, &[0xE0]);
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].command(), Some(Command::KeyPress));
        assert_eq!(packets[0].flags(), FLAG_START | FLAG_END);
        assert_eq!(packets[0].payload(), &[0xE0]);
    }

    #[test]
    fn test_empty_payload_still_sends() {
        let packets = build_chunked_packets(Command::ReleaseAll, &[]);
        assert_eq!(packets.len(), 1);
        assert!(packets[0].is_start() && packets[0].is_end());
        assert!(packets[0].payload().is_empty());
    }

    #[test]
    fn test_chunking_roundtrip() {
        let data: Vec<u8> = (0..200).map(|i| i as u8).collect();
        let packets = build_chunked_packets(Command::BlitFrame, &data);
        assert!(packets.len() > 1);
        assert!(packets[0].is_start());
        assert!(!packets[0].is_end());
        assert!(packets.last().unwrap().is_end());
        assert_eq!(reassemble(&packets), data);
    }

    #[test]
    fn test_chunking_preserves_trailing_zeros() {
        let data = [1u8, 0, 0, 0, 0];
        let packets = build_chunked_packets(Command::TypeText, &data);
        assert_eq!(reassemble(&packets), data);
    }

    #[test]
    fn test_command_roundtrip() {
        for byte in 0u8..=0xFF {
            if let Some(command) = Command::from_byte(byte) {
                assert_eq!(command.as_byte(), byte);
            }
        }
        assert_eq!(Command::from_byte(0xFF), None);
    }

    #[test]
    fn test_parse_encoder_report() {
        let position = (-3i32).to_le_bytes();
        let packet = HidPacket::with_chunk(Command::EncoderReport, FLAG_START | FLAG_END, &position);
        assert_eq!(
            parse_report(&packet),
            Some(crate::core::events::InputEvent::EncoderTurn(-3))
        );
    }

    #[test]
    fn test_parse_key_report() {
        let packet = HidPacket::with_chunk(Command::KeyReport, FLAG_START | FLAG_END, &[5, 1]);
        assert_eq!(
            parse_report(&packet),
            Some(crate::core::events::InputEvent::Key(
                crate::core::events::KeyEvent {
                    index: 5,
                    pressed: true
                }
            ))
        );
    }

    #[test]
    fn test_parse_truncated_report() {
        let packet = HidPacket::with_chunk(Command::EncoderReport, FLAG_START | FLAG_END, &[1, 2]);
        assert_eq!(parse_report(&packet), None);
    }

    #[test]
    fn test_parse_non_report_command() {
        let packet = HidPacket::with_chunk(Command::KeyPress, FLAG_START | FLAG_END, &[4]);
        assert_eq!(parse_report(&packet), None);
    }
}
