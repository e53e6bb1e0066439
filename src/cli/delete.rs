//! Delete command.
//!
//! Removes one semester by its display position within a year.

use serde::Serialize;

use crate::cli::{load_ledger, position_to_index};
use crate::error::LedgerError;
use crate::storage::LedgerStore;

/// Options for the delete command.
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the delete command.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutput {
    /// Whether a semester was deleted.
    pub success: bool,
    /// Name of the deleted semester.
    pub name: String,
    /// Year it was deleted from.
    pub year: String,
    /// GPA over what remains.
    pub cumulative_gpa: f64,
    /// Warning about previously saved data that could not be loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Error message if the delete failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeleteOutput {
    fn failure(error: impl Into<String>, warning: Option<String>) -> Self {
        Self {
            success: false,
            name: String::new(),
            year: String::new(),
            cumulative_gpa: 0.0,
            warning,
            error: Some(error.into()),
        }
    }
}

/// The delete command implementation.
pub struct DeleteCommand<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> DeleteCommand<S> {
    /// Create a new delete command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Delete the semester at 1-based `position` in `year`.
    pub fn run(&self, year: &str, position: usize, _options: &DeleteOptions) -> DeleteOutput {
        let (mut ledger, warning) = load_ledger(&self.store);

        let index = match position_to_index(position) {
            Ok(index) => index,
            Err(e) => return DeleteOutput::failure(e.to_string(), warning),
        };

        let Some(removed) = ledger.delete(year, index) else {
            let err = LedgerError::semester_not_found(year, position);
            return DeleteOutput::failure(err.to_string(), warning);
        };

        if let Err(e) = self.store.save_ledger(&ledger) {
            return DeleteOutput::failure(e.to_string(), warning);
        }
        tracing::info!(year = %removed.year, semester = %removed.name, "semester deleted");

        DeleteOutput {
            success: true,
            name: removed.name,
            year: removed.year,
            cumulative_gpa: ledger.cumulative_gpa(),
            warning,
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &DeleteOutput, options: &DeleteOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &DeleteOutput) -> String {
        let mut out = String::new();
        if let Some(warning) = &output.warning {
            out.push_str(&format!("Warning: {}\n", warning));
        }
        if output.success {
            out.push_str(&format!(
                "Deleted {} from {}\nCumulative GPA: {:.2}\n",
                output.name, output.year, output.cumulative_gpa
            ));
        } else {
            out.push_str(&format!(
                "Delete failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Course, Grade, GradeLedger, Semester};
    use crate::storage::MemoryLedgerStore;
    use std::sync::Arc;

    fn setup() -> Arc<MemoryLedgerStore> {
        let store = Arc::new(MemoryLedgerStore::new());
        let mut ledger = GradeLedger::new();
        for (name, year, grade) in [
            ("Fall", "Year 1", Grade::A),
            ("Spring", "Year 1", Grade::C),
            ("Fall", "Year 2", Grade::B),
        ] {
            ledger.add(Semester::with_courses(
                name,
                year,
                vec![Course::new("Course", 3.0, grade)],
            ));
        }
        store.save_ledger(&ledger).unwrap();
        store
    }

    #[test]
    fn test_delete_removes_semester() {
        let store = setup();
        let cmd = DeleteCommand::new(Arc::clone(&store));

        let output = cmd.run("Year 1", 2, &DeleteOptions::default());

        assert!(output.success);
        assert_eq!(output.name, "Spring");
        assert!((output.cumulative_gpa - 3.5).abs() < 1e-9);
        assert_eq!(store.load_ledger().semesters_in("Year 1").count(), 1);
    }

    #[test]
    fn test_delete_last_in_year_prunes_year() {
        let store = setup();
        let cmd = DeleteCommand::new(Arc::clone(&store));

        let output = cmd.run("Year 2", 1, &DeleteOptions::default());

        assert!(output.success);
        let ledger = store.load_ledger();
        assert!(!ledger.contains_year("Year 2"));
        let snapshot: serde_json::Value =
            serde_json::from_str(&store.raw_data().unwrap()).unwrap();
        assert!(snapshot.get("Year 2").is_none());
    }

    #[test]
    fn test_delete_out_of_range_is_noop() {
        let store = setup();
        let before = store.raw_data();
        let cmd = DeleteCommand::new(Arc::clone(&store));

        let output = cmd.run("Year 1", 9, &DeleteOptions::default());

        assert!(!output.success);
        assert_eq!(store.raw_data(), before);
    }

    #[test]
    fn test_delete_unknown_year_is_noop() {
        let store = setup();
        let cmd = DeleteCommand::new(Arc::clone(&store));

        let output = cmd.run("Year 3", 1, &DeleteOptions::default());

        assert!(!output.success);
        assert_eq!(store.load_ledger().len(), 3);
    }

    #[test]
    fn test_delete_format_output() {
        let store = setup();
        let cmd = DeleteCommand::new(Arc::clone(&store));
        let options = DeleteOptions::default();

        let output = cmd.run("Year 1", 1, &options);
        let text = cmd.format_output(&output, &options);

        assert!(text.contains("Deleted Fall from Year 1"));
        assert!(text.contains("Cumulative GPA: 2.50"));
    }
}
