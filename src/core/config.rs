//! Configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HID device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HidConfig {
    /// USB Vendor ID
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,
    /// USB Product ID
    #[serde(default = "default_product_id")]
    pub product_id: u16,
    /// HID Usage Page
    #[serde(default = "default_usage_page")]
    pub usage_page: u16,
    /// HID Usage ID
    #[serde(default = "default_usage_id")]
    pub usage_id: u16,
}

fn default_vendor_id() -> u16 {
    0xFEED
}
fn default_product_id() -> u16 {
    0x0804
}
fn default_usage_page() -> u16 {
    0xFF60
}
fn default_usage_id() -> u16 {
    0x61
}

impl Default for HidConfig {
    fn default() -> Self {
        Self {
            vendor_id: default_vendor_id(),
            product_id: default_product_id(),
            usage_page: default_usage_page(),
            usage_id: default_usage_id(),
        }
    }
}

/// Profile source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesConfig {
    /// Directory scanned for *.toml profile definitions
    #[serde(default = "default_profiles_dir")]
    pub dir: PathBuf,
}

fn default_profiles_dir() -> PathBuf {
    PathBuf::from("profiles")
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            dir: default_profiles_dir(),
        }
    }
}

/// Display and icon animation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Directory holding profile icon strips
    #[serde(default = "default_icons_dir")]
    pub icons_dir: PathBuf,
    /// Icon shown when a profile's own icon is missing
    #[serde(default = "default_icon")]
    pub default_icon: String,
    /// Height of one animation frame in pixels
    #[serde(default = "default_icon_height")]
    pub icon_height: u32,
    /// Total icon presentation time in milliseconds
    #[serde(default = "default_icon_duration")]
    pub icon_duration_ms: u64,
    /// Delay between animation frames in milliseconds
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
}

fn default_icons_dir() -> PathBuf {
    PathBuf::from("icons")
}
fn default_icon() -> String {
    "default_animation.png".to_string()
}
fn default_icon_height() -> u32 {
    64
}
fn default_icon_duration() -> u64 {
    1000
}
fn default_frame_interval() -> u64 {
    50
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            icons_dir: default_icons_dir(),
            default_icon: default_icon(),
            icon_height: default_icon_height(),
            icon_duration_ms: default_icon_duration(),
            frame_interval_ms: default_frame_interval(),
        }
    }
}

/// Input polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Main loop tick interval in milliseconds
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

fn default_tick_interval() -> u64 {
    10
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HID device configuration
    #[serde(default)]
    pub hid: HidConfig,
    /// Profile source configuration
    #[serde(default)]
    pub profiles: ProfilesConfig,
    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,
    /// Input polling configuration
    #[serde(default)]
    pub input: InputConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            // Return default config if file doesn't exist
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "macrodeck", "MacroDeck")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.hid.vendor_id, 0xFEED);
        assert_eq!(config.hid.product_id, 0x0804);
        assert_eq!(config.hid.usage_page, 0xFF60);
        assert_eq!(config.display.icon_height, 64);
        assert_eq!(config.display.icon_duration_ms, 1000);
        assert_eq!(config.display.frame_interval_ms, 50);
        assert_eq!(config.input.tick_interval_ms, 10);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.hid.vendor_id, config.hid.vendor_id);
        assert_eq!(parsed.profiles.dir, config.profiles.dir);
    }

    #[test]
    fn test_partial_config() {
        let parsed: Config = toml::from_str("[display]\nicon_duration_ms = 250\n").unwrap();
        assert_eq!(parsed.display.icon_duration_ms, 250);
        assert_eq!(parsed.display.frame_interval_ms, 50);
        assert_eq!(parsed.hid.vendor_id, 0xFEED);
    }
}
