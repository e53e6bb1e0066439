//! Ledger storage.
//!
//! This module provides persistence for the grade ledger snapshot and the
//! settings blob, with file-based and in-memory backends.

pub mod file;
pub mod memory;
pub mod settings;
pub mod traits;

pub use file::FileLedgerStore;
pub use memory::MemoryLedgerStore;
pub use settings::{Settings, Theme};
pub use traits::{LedgerStore, LoadOutcome};
