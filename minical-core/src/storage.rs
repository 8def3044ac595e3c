//! Fail-open JSON storage for durable calendar state.
//!
//! Every durable record (events, categories, reminder catalog) is an
//! independent file. Reads that fail for any reason (missing file,
//! unreadable, corrupt JSON) yield the caller's default value instead of
//! an error: losing one record must never prevent the app from starting.
//! Writes go through a temp file and rename so a crash mid-write leaves
//! the previous contents intact.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{MinicalError, MinicalResult};

/// Default data directory (`<platform data dir>/minical`).
pub fn data_dir() -> MinicalResult<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| MinicalError::Storage("Could not determine data directory".to_string()))?;
    Ok(base.join("minical"))
}

/// Load a JSON record, falling back to `default` if the file is missing
/// or unreadable in any way.
pub fn load_or<T: DeserializeOwned>(path: &Path, default: impl FnOnce() -> T) -> T {
    let Ok(content) = std::fs::read_to_string(path) else {
        return default();
    };

    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(_) => default(),
    }
}

/// Write a JSON record atomically (temp file + rename).
pub fn save<T: Serialize>(path: &Path, value: &T) -> MinicalResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| MinicalError::Serialization(e.to_string()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp = path.with_extension("tmp");
    std::fs::write(&temp, json)?;
    std::fs::rename(&temp, path)?;
    Ok(())
}
