//! Configuration file handling for rayci-snap.
//!
//! Loads configuration from `~/.config/rayci-snap/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::rayci::{ExportView, DEFAULT_SERVER_URL};

/// Width of the exported histogram view in pixels.
pub const DEFAULT_EXPORT_WIDTH: u32 = 1600;

/// Height of the exported histogram view in pixels.
pub const DEFAULT_EXPORT_HEIGHT: u32 = 1200;

/// Colour palette used for the histogram view.
pub const DEFAULT_EXPORT_PALETTE: &str = "CINOGY";

/// Configuration file structure for rayci-snap.
/// Loaded from ~/.config/rayci-snap/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub histogram: HistogramConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,
    /// Give up on a request after this many seconds (no limit when unset)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            timeout_secs: None,
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CaptureConfig {
    /// Directory used when --directory is not given
    #[serde(default = "default_directory")]
    pub default_directory: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            default_directory: default_directory(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HistogramConfig {
    #[serde(default = "default_export_width")]
    pub width: u32,
    #[serde(default = "default_export_height")]
    pub height: u32,
    #[serde(default = "default_export_palette")]
    pub palette: String,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_EXPORT_WIDTH,
            height: DEFAULT_EXPORT_HEIGHT,
            palette: DEFAULT_EXPORT_PALETTE.to_string(),
        }
    }
}

impl HistogramConfig {
    pub fn export_view(&self) -> ExportView {
        ExportView {
            width: self.width,
            height: self.height,
            palette: self.palette.clone(),
        }
    }
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_export_width() -> u32 {
    DEFAULT_EXPORT_WIDTH
}

fn default_export_height() -> u32 {
    DEFAULT_EXPORT_HEIGHT
}

fn default_export_palette() -> String {
    DEFAULT_EXPORT_PALETTE.to_string()
}

/// Directory snapshots land in when none is given on the command line.
///
/// On Windows this is the RayCi SDK's Python folder, next to the server.
#[cfg(windows)]
pub fn default_directory() -> PathBuf {
    PathBuf::from(r"C:\CINOGY\RayCi Lite SDK\Python")
}

/// Directory snapshots land in when none is given on the command line.
#[cfg(not(windows))]
pub fn default_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            Self::load_from_explicit(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a path the user named; the file must exist.
    pub fn load_from_explicit(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("rayci-snap").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("rayci-snap.toml"))
}

/// Commented default configuration written by `config init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# rayci-snap configuration

[server]
# Address of the RayCi remote interface
url = "http://localhost:8080/"
# Abort a request after this many seconds (unset = wait forever)
# timeout_secs = 30

[capture]
# Directory used when --directory is not given
# default_directory = "C:\\CINOGY\\RayCi Lite SDK\\Python"

[histogram]
# Size of the exported cross-section view
width = 1600
height = 1200
# Colour palette of the exported view
palette = "CINOGY"
"#;
