//! Profile discovery and loading
//!
//! Scans a directory for `*.toml` profile definitions, sorted by file
//! name so the encoder order is deterministic. A file that fails to
//! parse or validate is logged and skipped; loading always continues
//! with the remaining files.

use super::{Profile, ProfileError, ProfileFile};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Load every valid profile under `dir`, in file-name order.
pub fn load_profiles(dir: &Path) -> Vec<Profile> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read profiles directory {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_profile_file(path))
        .collect();
    paths.sort();

    let mut profiles = Vec::new();
    for path in paths {
        match load_profile_file(&path, profiles.len()) {
            Ok(profile) => {
                info!("Loaded profile {:?} from {:?}", profile.name, path);
                profiles.push(profile);
            }
            Err(e) => {
                warn!("Skipping profile {:?}: {}", path, e);
            }
        }
    }
    profiles
}

fn is_profile_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'));
    !hidden && path.extension().is_some_and(|ext| ext == "toml") && path.is_file()
}

fn load_profile_file(path: &Path, index: usize) -> Result<Profile, ProfileError> {
    let text = fs::read_to_string(path)?;
    let file: ProfileFile = toml::from_str(&text)?;
    Profile::from_file(file, index)
}
