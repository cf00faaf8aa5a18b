//! # Saved Location Store
//!
//! Persists the selected [`Coordinate`] between runs as a small JSON
//! document in the platform data directory. One file, one location: picking
//! a new location overwrites the previous one.
//!
//! A missing file is the normal first-run state, not an error. A file that
//! exists but cannot be parsed is reported to the caller, which treats it the
//! same as no saved location and repairs it on the next save.

use crate::Coordinate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name of the saved location inside the data directory.
const FILE_NAME: &str = "location.json";

/// Errors raised while reading or writing the saved location.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure underneath the store.
    #[error("store IO: {0}")]
    Io(#[from] io::Error),

    /// The file exists but does not hold a valid saved location.
    #[error("corrupt location file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resolve the platform path for the saved location file.
///
/// Uses the OS data directory (XDG data home on Linux, Application Support
/// on macOS) and falls back to a dotfile directory under `$HOME` when the
/// platform directories cannot be resolved.
pub fn default_path() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("", "", "tide-times") {
        return dirs.data_dir().join(FILE_NAME);
    }

    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".tide-times").join(FILE_NAME)
}

/// Read the saved location from the default path, if one exists.
pub fn load() -> Result<Option<Coordinate>, StoreError> {
    load_from_path(&default_path())
}

/// Read a saved location from `path`.
pub fn load_from_path(path: &Path) -> Result<Option<Coordinate>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let location: Coordinate = serde_json::from_str(&contents)?;
    debug!("loaded saved location {}", location.name);
    Ok(Some(location))
}

/// Persist `location` at the default path for future runs.
pub fn save(location: &Coordinate) -> Result<(), StoreError> {
    save_to_path(location, &default_path())
}

/// Persist `location` at `path`, creating parent directories as needed.
pub fn save_to_path(location: &Coordinate, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = serde_json::to_string_pretty(location)?;
    fs::write(path, contents)?;
    debug!("saved location {} to {}", location.name, path.display());
    Ok(())
}
