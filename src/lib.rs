//! gpa-ledger - semester and cumulative GPA tracking
//!
//! Courses are grouped into semesters and semesters into academic years.
//! The ledger computes semester, yearly and cumulative GPA on a 4.0 scale,
//! persists itself as a JSON snapshot, imports courses from pasted
//! transcript text, and aggregates chart-ready series.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod import;
pub mod storage;
pub mod util;

pub use config::Config;
pub use core::{
    ChartData, Course, Grade, GradeLedger, LedgerSnapshot, Semester, SemesterEditor, SemesterId,
    SemesterStats, YearFilter,
};
pub use error::{LedgerError, Result};
pub use import::{ImportParser, ImportedCourse};
pub use storage::{FileLedgerStore, LedgerStore, LoadOutcome, MemoryLedgerStore, Settings, Theme};

// CLI commands
pub use cli::{
    AddCommand, ChartCommand, ClearCommand, DeleteCommand, EditCommand, GradesCommand,
    HistoryCommand, ImportCommand, ThemeCommand,
};
