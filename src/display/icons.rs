//! Profile icon presentation
//!
//! Icons are PNG files; taller images are vertical sprite sheets animated
//! top to bottom. Presentation runs for a fixed total duration and polls
//! the encoder between frames; a turn aborts it immediately so the
//! controller can start the next switch. The icon file handle lives only
//! for the duration of one presentation call.

use super::IconFrame;
use crate::core::config::DisplayConfig;
use crate::hid::Device;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Outcome of one icon presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Ran for the full duration
    Completed,
    /// Aborted because the encoder moved
    Interrupted,
}

struct IconStrip {
    width: u32,
    height: u32,
    line_size: usize,
    data: Vec<u8>,
}

/// Shows a profile's icon on the pad, optionally animated
pub struct IconPresenter {
    icons_dir: PathBuf,
    default_icon: String,
    icon_height: u32,
    duration: Duration,
    frame_interval: Duration,
}

impl IconPresenter {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            icons_dir: config.icons_dir.clone(),
            default_icon: config.default_icon.clone(),
            icon_height: config.icon_height.max(1),
            duration: Duration::from_millis(config.icon_duration_ms),
            frame_interval: Duration::from_millis(config.frame_interval_ms),
        }
    }

    /// Present an icon, polling the encoder each frame.
    ///
    /// A missing or unreadable icon skips the animation rather than
    /// failing the profile switch; the menu still needs to come up.
    pub fn present<D: Device>(&self, icon: &str, deck: &mut D) -> Result<Presentation> {
        let start_position = deck.encoder_position();

        let strip = match self.resolve(icon) {
            Some(path) => match decode_strip(&path) {
                Ok(strip) => strip,
                Err(e) => {
                    warn!("Failed to decode icon {:?}: {:#}", path, e);
                    return Ok(Presentation::Completed);
                }
            },
            None => {
                warn!("Icon {:?} not found and no default animation", icon);
                return Ok(Presentation::Completed);
            }
        };

        let frame_height = self.icon_height.min(strip.height);
        let frame_count = (strip.height / self.icon_height).max(1) as usize;
        let frame_len = frame_height as usize * strip.line_size;
        let stride = self.icon_height as usize * strip.line_size;
        debug!(
            "Presenting icon {:?} ({} frame(s), {}x{})",
            icon, frame_count, strip.width, frame_height
        );

        let deadline = Instant::now() + self.duration;
        while Instant::now() < deadline {
            for frame in 0..frame_count {
                let offset = frame * stride;
                deck.blit_icon_frame(&IconFrame {
                    width: strip.width,
                    height: frame_height,
                    data: &strip.data[offset..offset + frame_len],
                })?;
                if deck.encoder_position() != start_position {
                    return Ok(Presentation::Interrupted);
                }
                thread::sleep(self.frame_interval);
            }
        }

        Ok(Presentation::Completed)
    }

    /// Resolve an icon reference, falling back to the default animation
    fn resolve(&self, icon: &str) -> Option<PathBuf> {
        let path = self.icons_dir.join(icon);
        if path.is_file() {
            return Some(path);
        }
        let fallback = self.icons_dir.join(&self.default_icon);
        fallback.is_file().then_some(fallback)
    }
}

fn decode_strip(path: &Path) -> Result<IconStrip> {
    let file = File::open(path).with_context(|| format!("Failed to open icon: {:?}", path))?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .with_context(|| format!("Failed to read PNG header: {:?}", path))?;
    let mut data = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut data)
        .with_context(|| format!("Failed to decode PNG: {:?}", path))?;
    data.truncate(info.buffer_size());
    Ok(IconStrip {
        width: info.width,
        height: info.height,
        line_size: info.line_size,
        data,
    })
}
