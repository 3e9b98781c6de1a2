//! # Configuration Module
//!
//! This module handles configuration management and data directory setup for
//! Songbook. It provides platform-appropriate data locations and the runtime
//! settings the binary works with.
//!
//! ## Data Storage
//!
//! Songbook looks for its files in the platform-standard data directory:
//! - Linux: `~/.local/share/songbook/`
//! - macOS: `~/Library/Application Support/songbook/`
//! - Windows: `%APPDATA%\songbook\`
//!
//! Two files live there:
//! - `songs.txt` - the default catalog source
//! - `config.json` - optional [`RuntimeConfig`] overrides
//!
//! Command-line flags take precedence over `config.json`.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "songbook";
const CATALOG_FILE: &str = "songs.txt";
const CONFIG_FILE: &str = "config.json";

/// Returns the platform-appropriate data directory for Songbook,
/// creating it if needed.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The songbook subdirectory cannot be created due to permissions
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        )
    })?;

    let app_dir = data_dir.join(APP_DIR);
    fs::create_dir_all(&app_dir).with_context(|| {
        format!(
            "Failed to create Songbook data directory at {}. Please check file permissions.",
            app_dir.display()
        )
    })?;

    Ok(app_dir)
}

/// Returns the default catalog file path, `<data dir>/songbook/songs.txt`.
///
/// The file itself is not created; a missing catalog is reported when it is
/// loaded.
///
/// # Errors
///
/// See [`get_data_dir`].
///
/// # Examples
///
/// ```no_run
/// use songbook::config::get_catalog_path;
///
/// let catalog_path = get_catalog_path()?;
/// println!("Catalog location: {}", catalog_path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_catalog_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(CATALOG_FILE))
}

/// Where the catalog lives by default, without touching the filesystem.
fn default_catalog_path() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(CATALOG_FILE),
        |dir| dir.join(APP_DIR).join(CATALOG_FILE),
    )
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Catalog source to bulk-load at startup
    pub catalog_path: PathBuf,
    /// Fixed seed for shuffle play; `None` seeds from the OS
    pub shuffle_seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            shuffle_seed: None,
        }
    }
}

impl RuntimeConfig {
    /// Load `config.json` from the data directory, falling back to defaults
    /// when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory is unavailable or the config
    /// file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let path = get_data_dir()?.join(CONFIG_FILE);
        if path.exists() {
            Self::from_file(&path)
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Read a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}: {config:?}", path.display());
        Ok(config)
    }

    /// Apply command-line overrides on top of this configuration.
    #[must_use]
    pub fn merge(mut self, catalog_path: Option<PathBuf>, shuffle_seed: Option<u64>) -> Self {
        if let Some(path) = catalog_path {
            self.catalog_path = path;
        }
        if shuffle_seed.is_some() {
            self.shuffle_seed = shuffle_seed;
        }
        self
    }
}
