//! In-memory ledger storage for testing.
//!
//! Contents are held as serialized JSON so the same parsing (including
//! legacy migration and corrupt-data handling) runs as for files.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::core::LedgerSnapshot;
use crate::error::{FailOpen, LedgerError, Result};
use crate::storage::{LedgerStore, LoadOutcome, Settings};

/// In-memory ledger store for testing.
///
/// Thread-safe implementation using `RwLock`. Contents are lost when the
/// store is dropped.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    data: RwLock<Option<String>>,
    settings: RwLock<Option<String>>,
    fail_saves: AtomicBool,
}

impl MemoryLedgerStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose grade data is the given raw JSON.
    pub fn with_raw_data(json: impl Into<String>) -> Self {
        let store = Self::new();
        *store.data.write().unwrap() = Some(json.into());
        store
    }

    /// Raw grade data as last saved.
    pub fn raw_data(&self) -> Option<String> {
        self.data.read().unwrap().clone()
    }

    /// Make every subsequent save fail with a storage error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(LedgerError::storage(
                "<memory>",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "saves disabled"),
            ));
        }
        Ok(())
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn load(&self) -> LoadOutcome {
        match self.data.read().unwrap().as_deref() {
            None => LoadOutcome::Empty,
            Some(content) => match LedgerSnapshot::from_json(content) {
                Ok((snapshot, legacy)) => LoadOutcome::Loaded { snapshot, legacy },
                Err(err) => LoadOutcome::Failed(err),
            },
        }
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        self.check_writable()?;
        let json = snapshot.to_json_pretty()?;
        *self.data.write().unwrap() = Some(json);
        Ok(())
    }

    fn load_settings(&self) -> Settings {
        match self.settings.read().unwrap().as_deref() {
            None => Settings::default(),
            Some(content) => serde_json::from_str::<Settings>(content)
                .map_err(LedgerError::from)
                .fail_open_default("loading settings"),
        }
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.check_writable()?;
        let json = serde_json::to_string(settings)?;
        *self.settings.write().unwrap() = Some(json);
        Ok(())
    }
}
