//! Configuration store for persisted style settings.
//!
//! Settings live in a small JSON document (see [`StyleProfile`]). Reads
//! resolve each field independently over the defaults; writes are partial
//! updates that leave unspecified fields untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::StoreError;
use crate::profile::StyleProfile;
use crate::style::StyleConfig;

const APP_DIR: &str = "onedot";
const SETTINGS_FILE: &str = "settings.json";

// ============================================================================
// StyleStore
// ============================================================================

/// Read/write access to persisted style settings.
pub trait StyleStore: Send + Sync {
    /// Loads the stored profile. A store with nothing saved yields an empty profile.
    fn load(&self) -> Result<StyleProfile, StoreError>;

    /// Merges `patch` into the stored profile and returns the result.
    fn update(&self, patch: &StyleProfile) -> Result<StyleProfile, StoreError>;

    /// Loads and resolves the style the generator should use.
    fn style(&self) -> Result<StyleConfig, StoreError> {
        Ok(self.load()?.resolve())
    }

    /// Records the time of the last successful wallpaper update.
    fn record_update(&self, timestamp_ms: i64) -> Result<(), StoreError> {
        let patch = StyleProfile {
            last_update: Some(timestamp_ms),
            ..StyleProfile::default()
        };
        self.update(&patch).map(|_| ())
    }
}

// ============================================================================
// JsonFileStore
// ============================================================================

/// A [`StyleStore`] backed by a JSON file.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the settings file, so readers never observe a partial document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Opens the store at the platform default location,
    /// e.g. `~/.config/onedot/settings.json` on Linux.
    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self::new(default_settings_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, profile: &StyleProfile) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(profile.to_json_pretty()?.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl StyleStore for JsonFileStore {
    fn load(&self) -> Result<StyleProfile, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) if json.trim().is_empty() => Ok(StyleProfile::default()),
            Ok(json) => Ok(StyleProfile::from_json(&json)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(StyleProfile::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn update(&self, patch: &StyleProfile) -> Result<StyleProfile, StoreError> {
        let _guard = self.write_lock.lock();
        let mut profile = self.load()?;
        profile.merge(patch);
        self.write(&profile)?;
        tracing::info!(path = %self.path.display(), "saved settings");
        Ok(profile)
    }
}

/// Returns the default settings file path under the platform config directory.
pub fn default_settings_path() -> Result<PathBuf, StoreError> {
    let base = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
    Ok(base.join(APP_DIR).join(SETTINGS_FILE))
}

// ============================================================================
// MemoryStore
// ============================================================================

/// An in-process [`StyleStore`], useful for previews and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profile: Mutex<StyleProfile>,
}

impl MemoryStore {
    pub fn new(profile: StyleProfile) -> Self {
        Self {
            profile: Mutex::new(profile),
        }
    }
}

impl StyleStore for MemoryStore {
    fn load(&self) -> Result<StyleProfile, StoreError> {
        Ok(self.profile.lock().clone())
    }

    fn update(&self, patch: &StyleProfile) -> Result<StyleProfile, StoreError> {
        let mut profile = self.profile.lock();
        profile.merge(patch);
        Ok(profile.clone())
    }
}
