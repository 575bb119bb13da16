//! Data file utilities
//!
//! Helpers for locating the app's data directory and for reading and writing
//! the JSON files kept there (service registries, upload log). By default the
//! files live in the platform config directory under "multiuploader/".

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR_NAME: &str = "multiuploader";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Default data directory.
///
/// Returns: `~/.config/multiuploader` (Linux)
///          `~/Library/Application Support/multiuploader` (macOS)
///          `C:\Users\<User>\AppData\Roaming\multiuploader` (Windows)
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME))
}

/// Default directory for rolling log files: `~/.multiuploader/logs`
pub fn default_logs_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(format!(".{}", APP_DIR_NAME)).join("logs"))
}

/// Load a JSON file; a missing file yields `T::default()`.
///
/// A file that exists but does not parse is a `StoreError::Parse`. Paths that
/// write the data back use this so a bad file is never overwritten.
pub fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Ok(T::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a JSON file for reading only, falling back to `T::default()`.
///
/// Like [`load_json`], except a file that does not parse is logged and read
/// as the default. Only an unreadable file is an error.
pub fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    match load_json(path) {
        Err(StoreError::Parse { path, source }) => {
            tracing::warn!(path = %path.display(), error = %source, "data file does not parse, reading as empty");
            Ok(T::default())
        }
        other => other,
    }
}

/// Save data as pretty JSON using an atomic write (temp file + rename).
///
/// The parent directory is created if needed.
pub fn save_json_atomic<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let contents = serde_json::to_string_pretty(data).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp_file = path.with_file_name(format!(
        "{}.tmp",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("data.json")
    ));

    let mut tmp = fs::File::create(&tmp_file).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.sync_all().map_err(write_err)?;
    drop(tmp);

    fs::rename(&tmp_file, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_file);
        write_err(e)
    })
}
