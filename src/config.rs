//! Configuration loading for the grade ledger.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.gpa/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional. The tool runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, Result};
use crate::import::{ImportParser, DEFAULT_UNIT_LABEL};
use crate::util::read_to_string_limited;

/// Default grade data file name under the home directory.
pub const DEFAULT_DATA_FILE: &str = "grade_data.json";

/// Default settings file name under the home directory.
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where grade data and settings live.
    pub storage: StorageConfig,
    /// Text import behavior.
    pub import: ImportConfig,
    /// Year labels offered for semesters.
    pub ledger: LedgerConfig,
}

/// Storage file locations.
///
/// Relative paths are resolved against the home directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub data_file: PathBuf,
    pub settings_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            settings_file: PathBuf::from(DEFAULT_SETTINGS_FILE),
        }
    }
}

/// Text import configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImportConfig {
    /// Text that marks the credits line of a course group.
    pub unit_label: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            unit_label: DEFAULT_UNIT_LABEL.to_string(),
        }
    }
}

/// Ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Year labels a semester may be filed under.
    pub years: Vec<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            years: ["Year 1", "Year 2", "Year 3", "Year 4", "Other"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// A missing or unreadable config file yields defaults; environment
    /// overrides are applied either way.
    pub fn load() -> Self {
        let mut config = match config_path() {
            Some(path) if path.exists() => match Self::load_from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "invalid config file, using defaults"
                    );
                    Config::default()
                }
            },
            _ => Config::default(),
        };
        config.apply_env_overrides();
        config
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = read_to_string_limited(path)?;
        toml::from_str(&content).map_err(|e| LedgerError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // GPA_DATA_FILE
        if let Some(val) = non_empty_var("GPA_DATA_FILE") {
            self.storage.data_file = PathBuf::from(val);
        }

        // GPA_SETTINGS_FILE
        if let Some(val) = non_empty_var("GPA_SETTINGS_FILE") {
            self.storage.settings_file = PathBuf::from(val);
        }

        // GPA_IMPORT_UNIT_LABEL
        if let Some(val) = non_empty_var("GPA_IMPORT_UNIT_LABEL") {
            self.import.unit_label = val;
        }
    }

    /// Resolved grade data path.
    pub fn data_path(&self) -> Option<PathBuf> {
        resolve_under_home(&self.storage.data_file)
    }

    /// Resolved settings path.
    pub fn settings_path(&self) -> Option<PathBuf> {
        resolve_under_home(&self.storage.settings_file)
    }

    /// Whether `year` is one of the configured year labels.
    pub fn is_known_year(&self, year: &str) -> bool {
        self.ledger.years.iter().any(|y| y == year)
    }

    /// Build an import parser using the configured unit label.
    ///
    /// An empty label would match every line, so it falls back to the
    /// default.
    pub fn import_parser(&self) -> ImportParser {
        if self.import.unit_label.trim().is_empty() {
            tracing::warn!("import.unit_label is empty, using default");
            return ImportParser::default();
        }
        ImportParser::new(self.import.unit_label.clone())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(val) if !val.is_empty() => Some(val),
        Ok(_) => {
            tracing::warn!(var = key, "environment variable is empty, ignoring");
            None
        }
        Err(_) => None,
    }
}

fn resolve_under_home(path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        return Some(path.to_path_buf());
    }
    gpa_home().map(|home| home.join(path))
}

/// Get the home directory for grade data and config.
///
/// Uses `$GPA_HOME` if set, otherwise `~/.gpa`.
pub fn gpa_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("GPA_HOME") {
        if home.is_empty() {
            tracing::warn!("GPA_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("GPA_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".gpa"));
    }

    // Containerized/minimal environments without HOME
    let fallback_path = fallback_gpa_home();
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

#[cfg(unix)]
fn fallback_gpa_home() -> PathBuf {
    use std::os::unix::fs::MetadataExt;
    let uid = std::fs::metadata("/").map(|m| m.uid()).unwrap_or(0);
    PathBuf::from(format!("/tmp/gpa-{}", uid))
}

#[cfg(not(unix))]
fn fallback_gpa_home() -> PathBuf {
    std::env::temp_dir().join("gpa")
}

/// Path of the user config file: `<gpa_home>/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    gpa_home().map(|h| h.join("config.toml"))
}

/// Path of the crash log: `<gpa_home>/crash.log`.
pub fn crash_log_path() -> Option<PathBuf> {
    gpa_home().map(|h| h.join("crash.log"))
}
