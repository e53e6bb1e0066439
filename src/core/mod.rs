//! Core types and logic for the grade ledger.
//!
//! This module contains the grade table, the course and semester value
//! types, the year-grouped ledger with its chart aggregation, the snapshot
//! form used for persistence, and the semester editor state machine.

pub mod aggregate;
pub mod course;
pub mod editor;
pub mod ledger;
pub mod semester;
pub mod snapshot;

pub use aggregate::{ChartData, GpaPoint, YearFilter, ALL_YEARS};
pub use course::{parse_credits, Course, Grade};
pub use editor::{
    CourseRow, EditorMode, RowId, SaveKind, SavedSemester, SemesterEditor, DEFAULT_YEAR,
    EMPTY_SEMESTER_MESSAGE,
};
pub use ledger::{GradeLedger, SemesterId};
pub use semester::{Semester, SemesterStats};
pub use snapshot::{LedgerSnapshot, SemesterRecord, LEGACY_YEAR};
