//! Save/load of small JSON records in the user's home directory
//!
//! Features:
//! - Missing file loads as defaults
//! - Corrupt file loads as defaults (logged, never fatal)
//! - Atomic writes (tmp → rename)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure writing a save file
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode save data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Path of a per-user file (`$HOME/<name>`, falling back to the working directory)
pub fn user_file(name: &str) -> PathBuf {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
    match home {
        Some(dir) => PathBuf::from(dir).join(name),
        None => {
            log::warn!("No home directory, storing {name} in the working directory");
            PathBuf::from(name)
        }
    }
}

/// Load a JSON record, or its default when the file is missing or unreadable
pub fn load_json<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::info!("No save at {}, using defaults", path.display());
            return T::default();
        }
        Err(err) => {
            log::warn!("Could not read {}: {err}, using defaults", path.display());
            return T::default();
        }
    };

    match serde_json::from_str(&text) {
        Ok(value) => {
            log::info!("Loaded {}", path.display());
            value
        }
        Err(err) => {
            log::warn!("Corrupt save at {}: {err}, using defaults", path.display());
            T::default()
        }
    }
}

/// Write a JSON record atomically: write a sibling tmp file, then rename over the target
pub fn save_json<T>(path: &Path, value: &T) -> Result<(), PersistError>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(&tmp, json).map_err(io_err)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(err));
    }
    log::info!("Saved {}", path.display());
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
