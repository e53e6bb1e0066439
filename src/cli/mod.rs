//! CLI commands for the grade ledger.
//!
//! Commands are organized into:
//! - **Editing commands**: add, edit, delete, clear, import
//! - **Reporting commands**: history, chart, grades
//! - **Settings commands**: theme
//!
//! Every command loads the ledger from a [`LedgerStore`], applies one
//! operation, and writes the whole ledger back when it changed.

use serde::Serialize;

use crate::config::Config;
use crate::core::{GradeLedger, SavedSemester, SemesterEditor};
use crate::error::{LedgerError, Result};
use crate::storage::LedgerStore;

// Editing commands
pub mod add;
pub mod clear;
pub mod delete;
pub mod edit;
pub mod import;

// Reporting commands
pub mod chart;
pub mod grades;
pub mod history;

// Settings commands
pub mod theme;

pub use add::AddCommand;
pub use chart::ChartCommand;
pub use clear::ClearCommand;
pub use delete::DeleteCommand;
pub use edit::EditCommand;
pub use grades::GradesCommand;
pub use history::HistoryCommand;
pub use import::ImportCommand;
pub use theme::ThemeCommand;

/// Output of a command that writes a semester into the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutput {
    /// Whether the semester was saved.
    pub success: bool,
    /// Confirmation line, e.g. "Saved Fall to Year 1".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Semester name.
    pub name: String,
    /// Year the semester is filed under.
    pub year: String,
    /// Semester GPA.
    pub gpa: f64,
    /// GPA-bearing credits.
    pub credits: f64,
    /// GPA over the whole ledger after the save.
    pub cumulative_gpa: f64,
    /// Warning about previously saved data that could not be loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Error message if the save failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveOutput {
    /// Create a successful output.
    pub fn success(saved: &SavedSemester, ledger: &GradeLedger, warning: Option<String>) -> Self {
        Self {
            success: true,
            message: Some(saved.message()),
            name: saved.name.clone(),
            year: saved.year.clone(),
            gpa: saved.stats.gpa,
            credits: saved.stats.credits,
            cumulative_gpa: ledger.cumulative_gpa(),
            warning,
            error: None,
        }
    }

    /// Create an output for a draft that was calculated but not saved.
    ///
    /// The cumulative GPA is what the ledger would have with the draft added.
    pub fn preview(
        editor: &SemesterEditor,
        ledger: &GradeLedger,
        warning: Option<String>,
    ) -> Self {
        let stats = editor.preview();
        let name = editor.name.trim().to_string();
        let year = editor.year.trim().to_string();
        Self {
            success: true,
            message: Some(format!("{name} in {year} (not saved)")),
            name,
            year,
            gpa: stats.gpa,
            credits: stats.credits,
            cumulative_gpa: ledger.cumulative_stats().pool(stats).gpa,
            warning,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>, warning: Option<String>) -> Self {
        Self {
            success: false,
            message: None,
            name: String::new(),
            year: String::new(),
            gpa: 0.0,
            credits: 0.0,
            cumulative_gpa: 0.0,
            warning,
            error: Some(error.into()),
        }
    }

    /// Format output based on the common flags.
    pub fn format(&self, json: bool, quiet: bool) -> String {
        if quiet {
            return String::new();
        }

        if json {
            serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable()
        }
    }

    fn format_human_readable(&self) -> String {
        let mut out = String::new();
        if let Some(warning) = &self.warning {
            out.push_str(&format!("Warning: {}\n", warning));
        }
        if self.success {
            out.push_str(&format!(
                "{}\nSemester GPA: {:.2} ({} credits)\nCumulative GPA: {:.2}\n",
                self.message.as_deref().unwrap_or_default(),
                self.gpa,
                format_credits(self.credits),
                self.cumulative_gpa
            ));
        } else {
            out.push_str(&format!(
                "Error: {}\n",
                self.error.as_deref().unwrap_or("unknown error")
            ));
        }
        out
    }
}

/// Load the ledger, returning a user-facing warning if saved data was lost.
pub(crate) fn load_ledger<S: LedgerStore>(store: &S) -> (GradeLedger, Option<String>) {
    let outcome = store.load();
    let warning = outcome.warning();
    (GradeLedger::from_snapshot(&outcome.into_snapshot()), warning)
}

/// Save the editor draft into the ledger and persist the ledger.
///
/// The ledger is only written when the editor accepted the draft.
pub(crate) fn save_draft<S: LedgerStore>(
    store: &S,
    editor: &mut SemesterEditor,
    ledger: &mut GradeLedger,
) -> Result<SavedSemester> {
    let saved = editor.save(ledger)?;
    store.save_ledger(ledger)?;
    tracing::info!(
        id = %saved.id,
        year = %saved.year,
        gpa = saved.stats.gpa,
        "semester saved"
    );
    Ok(saved)
}

/// Reject year labels that are not configured.
pub(crate) fn check_year(config: &Config, year: &str) -> Result<()> {
    if config.is_known_year(year) {
        return Ok(());
    }
    Err(LedgerError::invalid_input(format!(
        "Unknown year '{}'. Valid years: {}",
        year,
        config.ledger.years.join(", ")
    )))
}

/// Convert a 1-based position from the command line into an index.
pub(crate) fn position_to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| LedgerError::invalid_input("Positions start at 1"))
}

/// Split a `NAME:CREDITS:GRADE` course argument into its raw fields.
///
/// The name may itself contain colons; credits and grade are taken from the
/// right.
pub fn parse_course_spec(spec: &str) -> Result<(String, String, String)> {
    let mut parts = spec.rsplitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(grade), Some(credits), Some(name)) => Ok((
            name.trim().to_string(),
            credits.trim().to_string(),
            grade.trim().to_string(),
        )),
        _ => Err(LedgerError::invalid_input(format!(
            "Invalid course '{}'. Expected NAME:CREDITS:GRADE",
            spec
        ))),
    }
}

/// Credits without a trailing `.0` for whole numbers.
pub(crate) fn format_credits(credits: f64) -> String {
    if credits.fract() == 0.0 {
        format!("{}", credits as i64)
    } else {
        format!("{}", credits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SaveKind, SemesterStats};

    #[test]
    fn test_parse_course_spec() {
        let (name, credits, grade) = parse_course_spec("Calculus I:3:B+").unwrap();
        assert_eq!(name, "Calculus I");
        assert_eq!(credits, "3");
        assert_eq!(grade, "B+");
    }

    #[test]
    fn test_parse_course_spec_name_with_colon() {
        let (name, credits, grade) = parse_course_spec("CS: Systems : 4 : A").unwrap();
        assert_eq!(name, "CS: Systems");
        assert_eq!(credits, "4");
        assert_eq!(grade, "A");
    }

    #[test]
    fn test_parse_course_spec_keeps_empty_fields() {
        // empty fields are dropped later by the editor, not rejected here
        let (name, credits, grade) = parse_course_spec("Seminar::P").unwrap();
        assert_eq!(name, "Seminar");
        assert_eq!(credits, "");
        assert_eq!(grade, "P");
    }

    #[test]
    fn test_parse_course_spec_invalid() {
        let err = parse_course_spec("Calc:3").unwrap_err();
        assert!(err.is_user_facing());
        assert!(err.to_string().contains("NAME:CREDITS:GRADE"));
    }

    #[test]
    fn test_position_to_index() {
        assert_eq!(position_to_index(1).unwrap(), 0);
        assert_eq!(position_to_index(3).unwrap(), 2);
        assert!(position_to_index(0).is_err());
    }

    #[test]
    fn test_check_year() {
        let config = Config::default();
        assert!(check_year(&config, "Year 2").is_ok());
        let err = check_year(&config, "Year 9").unwrap_err();
        assert!(err.to_string().contains("Valid years: Year 1, Year 2"));
    }

    #[test]
    fn test_format_credits() {
        assert_eq!(format_credits(3.0), "3");
        assert_eq!(format_credits(1.5), "1.5");
    }

    #[test]
    fn test_save_output_format() {
        let saved = SavedSemester {
            id: GradeLedger::new().add(crate::core::Semester::new("Fall", "Year 1")),
            kind: SaveKind::Added,
            name: "Fall".to_string(),
            year: "Year 1".to_string(),
            stats: SemesterStats::from_totals(21.0, 6.0),
        };
        let output = SaveOutput::success(&saved, &GradeLedger::new(), None);

        let text = output.format(false, false);
        assert!(text.contains("Saved Fall to Year 1"));
        assert!(text.contains("Semester GPA: 3.50 (6 credits)"));

        assert!(output.format(false, true).is_empty());

        let json: serde_json::Value =
            serde_json::from_str(&output.format(true, false)).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_save_output_failure_format() {
        let output = SaveOutput::failure("Cannot save empty semester!", Some("lost".into()));
        let text = output.format(false, false);
        assert!(text.starts_with("Warning: lost\n"));
        assert!(text.contains("Error: Cannot save empty semester!"));
    }
}
