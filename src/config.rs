//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\songvault\config.toml
//! - macOS: ~/Library/Application Support/songvault/config.toml
//! - Linux: ~/.config/songvault/config.toml
//!
//! The config file is human-readable and editable. Settings are loaded
//! at startup; CLI flags override individual fields per run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory the library layout lives under
    pub root: PathBuf,

    /// Layout settings (directory names under the root)
    pub layout: LayoutConfig,

    /// Batch behavior settings
    pub batch: BatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            layout: LayoutConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

/// Directory names under the library root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Scratch directory, cleared before each row
    pub scratch_dir: String,

    /// Flat canonical store holding one copy of every audio file
    pub store_dir: String,

    /// Per-artist/per-album tree holding artwork and links
    pub artists_dir: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scratch_dir: "temp".to_string(),
            store_dir: "All_MP3s".to_string(),
            artists_dir: "Artists".to_string(),
        }
    }
}

/// Batch behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// What to do when a row fails
    pub on_row_error: RowErrorPolicy,

    /// How the artist directory references the canonical audio file
    pub link_mode: LinkMode,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            on_row_error: RowErrorPolicy::Abort,
            link_mode: LinkMode::Symlink,
        }
    }
}

/// Per-row failure policy for a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorPolicy {
    /// Halt the whole batch on the first failing row
    Abort,
    /// Log the failure and continue with the next row
    Skip,
}

/// How the per-song directory references the canonical audio file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    /// Relative symlink, single canonical copy of the bytes
    Symlink,
    /// Full copy, for filesystems without symlink support
    Copy,
}

/// Resolved filesystem layout for one run.
///
/// Every component receives paths through this struct rather than
/// deriving them from process state.
#[derive(Debug, Clone)]
pub struct Layout {
    pub scratch: PathBuf,
    pub store: PathBuf,
    pub artists: PathBuf,
}

impl Layout {
    /// Resolve the layout for a root directory.
    pub fn new(root: &Path, layout: &LayoutConfig) -> Self {
        Self {
            scratch: root.join(&layout.scratch_dir),
            store: root.join(&layout.store_dir),
            artists: root.join(&layout.artists_dir),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("songvault"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to disk
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    let path = dir.join("config.toml");

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDir(dir.clone(), e))?;

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, &path)
        .map_err(|e| ConfigError::Rename(temp_path, path.clone(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
