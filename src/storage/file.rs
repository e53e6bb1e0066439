//! File-based ledger storage.
//!
//! Grade data and settings are separate JSON files, by default
//! `~/.gpa/grade_data.json` and `~/.gpa/settings.json`. Every save rewrites
//! the whole file atomically via temp file + rename.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::core::LedgerSnapshot;
use crate::error::{FailOpen, LedgerError, Result};
use crate::storage::{LedgerStore, LoadOutcome, Settings};
use crate::util::{atomic_write, read_to_string_limited};

/// File-based ledger storage.
#[derive(Debug, Clone)]
pub struct FileLedgerStore {
    /// Grade data file.
    data_path: PathBuf,
    /// Settings file.
    settings_path: PathBuf,
}

impl FileLedgerStore {
    /// Create a store at the paths named by the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let data_path = config.data_path().ok_or_else(|| {
            LedgerError::config("Could not determine data file location (no home directory)")
        })?;
        let settings_path = config.settings_path().ok_or_else(|| {
            LedgerError::config("Could not determine settings file location (no home directory)")
        })?;
        Ok(Self::with_paths(data_path, settings_path))
    }

    /// Create a store with explicit file paths.
    pub fn with_paths(data_path: impl Into<PathBuf>, settings_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            settings_path: settings_path.into(),
        }
    }

    /// Create a store with both files in `dir` under their default names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::with_paths(dir.join("grade_data.json"), dir.join("settings.json"))
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    fn read_settings(&self) -> Result<Settings> {
        let content = read_to_string_limited(&self.settings_path)?;
        serde_json::from_str(&content).map_err(|e| {
            LedgerError::serde(format!("{}: {}", self.settings_path.display(), e))
        })
    }
}

impl LedgerStore for FileLedgerStore {
    fn load(&self) -> LoadOutcome {
        if !self.data_path.exists() {
            tracing::debug!(path = %self.data_path.display(), "no grade data file yet");
            return LoadOutcome::Empty;
        }

        let parsed = read_to_string_limited(&self.data_path)
            .and_then(|content| LedgerSnapshot::from_json(&content));

        match parsed {
            Ok((snapshot, legacy)) => {
                if legacy {
                    tracing::info!(
                        path = %self.data_path.display(),
                        "migrated legacy grade data into Year 1"
                    );
                }
                LoadOutcome::Loaded { snapshot, legacy }
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.data_path.display(),
                    error = %err,
                    "failed to load grade data"
                );
                LoadOutcome::Failed(err)
            }
        }
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        let json = snapshot.to_json_pretty()?;
        atomic_write(&self.data_path, &json)?;
        tracing::debug!(
            path = %self.data_path.display(),
            semesters = snapshot.semester_count(),
            "saved grade data"
        );
        Ok(())
    }

    fn load_settings(&self) -> Settings {
        if !self.settings_path.exists() {
            return Settings::default();
        }
        self.read_settings().fail_open_default("loading settings")
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings)?;
        atomic_write(&self.settings_path, &json)
    }
}
