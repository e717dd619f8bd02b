//! HID device discovery and connection management
//!
//! The pad is a raw-HID device: the controller sends chunked command
//! packets (sink, LED, display) and a reader thread turns incoming report
//! packets into input events on a non-blocking channel.

use super::commands;
use super::keycodes::{ConsumerCode, Keycode};
use super::protocol::{parse_report, HidPacket, PACKET_SIZE};
use super::sink::OutputSink;
use crate::core::config::HidConfig;
use crate::core::events::{InputEvent, InputSource, KeyEvent};
use crate::display::{DisplaySurface, IconFrame, LedPanel, Rgb};
use crate::profiles::KEY_COUNT;
use anyhow::{anyhow, Context, Result};
use hidapi::{HidApi, HidDevice};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Read timeout for the reader thread, in milliseconds
const READ_TIMEOUT_MS: i32 = 20;

/// Connection to the macropad
pub struct HidDeck {
    /// Connected device, shared with the reader thread
    device: Arc<Mutex<HidDevice>>,
    /// Input events parsed by the reader thread
    events: mpsc::UnboundedReceiver<InputEvent>,
    /// Tells the reader thread to stop
    stop_reader: Arc<AtomicBool>,
    /// Cached encoder position from the last report
    encoder_position: i64,
    /// Cached debounced button state from the last report
    encoder_pressed: bool,
    /// Key transitions not yet consumed by the controller
    pending_keys: VecDeque<KeyEvent>,
}

impl HidDeck {
    /// Find and open the pad, and start the reader thread.
    pub fn open(config: &HidConfig) -> Result<Self> {
        let api = HidApi::new().context("Failed to initialize HID API")?;

        let device_info = api
            .device_list()
            .find(|d| {
                d.vendor_id() == config.vendor_id
                    && d.product_id() == config.product_id
                    && d.usage_page() == config.usage_page
                    && d.usage() == config.usage_id
            })
            .ok_or_else(|| {
                anyhow!(
                    "Macropad not found (VID: 0x{:04X}, PID: 0x{:04X}, Usage: 0x{:04X}/0x{:02X})",
                    config.vendor_id,
                    config.product_id,
                    config.usage_page,
                    config.usage_id
                )
            })?;

        info!(
            "Found macropad: {} {}",
            device_info.manufacturer_string().unwrap_or("Unknown"),
            device_info.product_string().unwrap_or("Unknown")
        );

        let device = device_info
            .open_device(&api)
            .context("Failed to open HID device")?;
        device
            .set_blocking_mode(false)
            .context("Failed to set non-blocking mode")?;

        let device = Arc::new(Mutex::new(device));
        let stop_reader = Arc::new(AtomicBool::new(false));
        let (event_tx, events) = mpsc::unbounded_channel();
        spawn_reader(Arc::clone(&device), event_tx, Arc::clone(&stop_reader));

        Ok(Self {
            device,
            events,
            stop_reader,
            encoder_position: 0,
            encoder_pressed: false,
            pending_keys: VecDeque::new(),
        })
    }

    /// Fold queued reports into the cached input state.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                InputEvent::EncoderTurn(position) => self.encoder_position = position,
                InputEvent::EncoderButton(pressed) => self.encoder_pressed = pressed,
                InputEvent::Key(key) => self.pending_keys.push_back(key),
            }
        }
    }

    fn send(&self, packets: Vec<HidPacket>) -> Result<()> {
        let device = self.device.lock();
        for packet in &packets {
            send_single_packet(&device, packet)?;
        }
        Ok(())
    }
}

impl Drop for HidDeck {
    fn drop(&mut self) {
        self.stop_reader.store(true, Ordering::Relaxed);
    }
}

/// Parse incoming report packets into input events until stopped.
fn spawn_reader(
    device: Arc<Mutex<HidDevice>>,
    event_tx: mpsc::UnboundedSender<InputEvent>,
    stop: Arc<AtomicBool>,
) {
    thread::spawn(move || {
        info!("HID reader thread started");
        let mut buffer = [0u8; PACKET_SIZE];
        while !stop.load(Ordering::Relaxed) {
            let read = {
                let device = device.lock();
                device.read_timeout(&mut buffer, READ_TIMEOUT_MS)
            };
            match read {
                Ok(n) if n > 0 => {
                    if let Some(event) = parse_report(&HidPacket::from_bytes(&buffer[..n])) {
                        debug!("Input report: {:?}", event);
                        if event_tx.send(event).is_err() {
                            break; // Controller is gone
                        }
                    }
                }
                Ok(_) => {} // Timeout, no data
                Err(e) => {
                    warn!("HID read error: {}", e);
                    thread::sleep(Duration::from_millis(200));
                }
            }
        }
        info!("HID reader thread stopped");
    });
}

/// Send a single 32-byte packet to the HID device
fn send_single_packet(device: &HidDevice, packet: &HidPacket) -> Result<()> {
    let bytes = packet.as_bytes();

    #[cfg(any(target_os = "macos", target_os = "windows"))]
    let data = {
        let mut data = Vec::with_capacity(PACKET_SIZE + 1);
        data.push(0x00); // Report ID
        data.extend_from_slice(bytes);
        data
    };

    #[cfg(target_os = "linux")]
    let data = bytes.to_vec();

    let written = device
        .write(&data)
        .context("Failed to write to HID device")?;
    debug!("Wrote {} bytes to HID device", written);
    Ok(())
}

impl InputSource for HidDeck {
    fn encoder_position(&mut self) -> i64 {
        self.drain_events();
        self.encoder_position
    }

    fn encoder_pressed(&mut self) -> bool {
        self.drain_events();
        self.encoder_pressed
    }

    fn next_key_event(&mut self) -> Option<KeyEvent> {
        self.drain_events();
        self.pending_keys.pop_front()
    }
}

impl OutputSink for HidDeck {
    fn key_press(&mut self, code: Keycode) -> Result<()> {
        self.send(commands::build_key_press(code))
    }

    fn key_release(&mut self, code: Keycode) -> Result<()> {
        self.send(commands::build_key_release(code))
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.send(commands::build_type_text(text))
    }

    fn media_press(&mut self, code: ConsumerCode) -> Result<()> {
        self.send(commands::build_media_press(code))
    }

    fn media_release(&mut self) -> Result<()> {
        self.send(commands::build_media_release())
    }

    fn mouse_press(&mut self, buttons: u8) -> Result<()> {
        self.send(commands::build_mouse_press(buttons))
    }

    fn mouse_release(&mut self, buttons: u8) -> Result<()> {
        self.send(commands::build_mouse_release(buttons))
    }

    fn mouse_move(&mut self, dx: i32, dy: i32, wheel: i32) -> Result<()> {
        self.send(commands::build_mouse_move(dx, dy, wheel))
    }

    fn tone_start(&mut self, frequency: u32) -> Result<()> {
        self.send(commands::build_tone_start(frequency))
    }

    fn tone_stop(&mut self) -> Result<()> {
        self.send(commands::build_tone_stop())
    }

    fn play_file(&mut self, path: &Path) -> Result<()> {
        self.send(commands::build_play_file(path))
    }

    fn release_all(&mut self) -> Result<()> {
        self.send(commands::build_release_all())
    }
}

impl LedPanel for HidDeck {
    fn set_key_color(&mut self, index: usize, color: Rgb) -> Result<()> {
        self.send(commands::build_set_led(index, color))
    }

    fn set_all_leds(&mut self, colors: &[Rgb; KEY_COUNT]) -> Result<()> {
        self.send(commands::build_set_leds(colors))
    }
}

impl DisplaySurface for HidDeck {
    fn show_menu(&mut self, name: &str, labels: &[String]) -> Result<()> {
        self.send(commands::build_show_menu(name, labels))
    }

    fn show_message(&mut self, text: &str) -> Result<()> {
        self.send(commands::build_show_message(text))
    }

    fn blit_icon_frame(&mut self, frame: &IconFrame<'_>) -> Result<()> {
        self.send(commands::build_blit_frame(frame.width, frame.height, frame.data))
    }
}
