//! Storage traits for the ledger.
//!
//! This module defines the `LedgerStore` trait and the `LoadOutcome` it
//! reports on read.

use std::sync::Arc;

use crate::core::{GradeLedger, LedgerSnapshot};
use crate::error::{LedgerError, Result};
use crate::storage::Settings;

/// What happened when the grade data was read.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Data was read. `legacy` is set when a bare-array file was migrated.
    Loaded {
        snapshot: LedgerSnapshot,
        legacy: bool,
    },
    /// No data has been saved yet.
    Empty,
    /// Data exists but could not be read or parsed.
    Failed(LedgerError),
}

impl LoadOutcome {
    /// The snapshot to start from.
    ///
    /// A failed load yields an empty snapshot after logging a warning; the
    /// next save will overwrite the unreadable file. Callers that want to
    /// warn the user should inspect the outcome before calling this.
    pub fn into_snapshot(self) -> LedgerSnapshot {
        match self {
            LoadOutcome::Loaded { snapshot, .. } => snapshot,
            LoadOutcome::Empty => LedgerSnapshot::default(),
            LoadOutcome::Failed(err) => {
                tracing::warn!(error = %err, "could not load grade data, starting empty");
                LedgerSnapshot::default()
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadOutcome::Failed(_))
    }

    /// Human-readable warning for a failed load, if any.
    pub fn warning(&self) -> Option<String> {
        match self {
            LoadOutcome::Failed(err) => Some(format!(
                "Saved grade data could not be loaded ({err}); starting with an empty history"
            )),
            _ => None,
        }
    }
}

/// Trait for ledger storage backends.
///
/// Grade data and settings are independent: failing to read one never
/// affects the other.
pub trait LedgerStore: Send + Sync {
    /// Read the persisted snapshot.
    fn load(&self) -> LoadOutcome;

    /// Overwrite the persisted snapshot with `snapshot`.
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<()>;

    /// Read settings, falling back to defaults on any problem.
    fn load_settings(&self) -> Settings;

    /// Overwrite the persisted settings.
    fn save_settings(&self, settings: &Settings) -> Result<()>;

    /// Load and build the ledger, treating a failed load as empty.
    fn load_ledger(&self) -> GradeLedger {
        GradeLedger::from_snapshot(&self.load().into_snapshot())
    }

    /// Persist the whole ledger.
    fn save_ledger(&self, ledger: &GradeLedger) -> Result<()> {
        self.save(&ledger.snapshot())
    }
}

/// Blanket implementation of LedgerStore for Arc-wrapped stores.
///
/// This allows using `Arc<T>` where `T: LedgerStore` is expected,
/// which is useful for sharing stores between tests and commands.
impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    fn load(&self) -> LoadOutcome {
        (**self).load()
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        (**self).save(snapshot)
    }

    fn load_settings(&self) -> Settings {
        (**self).load_settings()
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        (**self).save_settings(settings)
    }
}

/// Test utilities for LedgerStore implementations.
#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::core::{Course, Grade, Semester};
    use crate::storage::Theme;

    /// Test helper to verify LedgerStore implementations.
    pub fn test_ledger_store_roundtrip<S: LedgerStore>(store: &S) {
        // Nothing saved yet
        assert!(matches!(store.load(), LoadOutcome::Empty));
        assert!(store.load_ledger().is_empty());

        let mut ledger = GradeLedger::new();
        ledger.add(Semester::with_courses(
            "Fall",
            "Year 1",
            vec![
                Course::new("Calc", 3.0, Grade::A),
                Course::new("Lit", 3.0, Grade::B),
            ],
        ));
        ledger.add(Semester::with_courses(
            "Spring",
            "Year 2",
            vec![Course::new("Seminar", 1.0, Grade::Pass)],
        ));
        let snapshot = ledger.snapshot();

        store.save(&snapshot).unwrap();

        match store.load() {
            LoadOutcome::Loaded {
                snapshot: loaded,
                legacy,
            } => {
                assert!(!legacy);
                assert_eq!(loaded, snapshot);
            }
            other => panic!("expected Loaded, got {other:?}"),
        }

        let reloaded = store.load_ledger();
        assert_eq!(reloaded.len(), 2);
        assert!((reloaded.cumulative_gpa() - 3.5).abs() < 1e-9);

        // Saving again overwrites
        store.save(&LedgerSnapshot::default()).unwrap();
        assert!(store.load_ledger().is_empty());

        // Settings are independent of grade data
        assert_eq!(store.load_settings().theme, Theme::Light);
        let settings = Settings {
            theme: Theme::Dark,
            ..Settings::default()
        };
        store.save_settings(&settings).unwrap();
        assert_eq!(store.load_settings(), settings);
    }
}
