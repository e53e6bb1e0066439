//! History command.
//!
//! Lists every year and semester with its GPA, plus the cumulative GPA.
//! Positions are 1-based and match what `edit` and `delete` accept.

use serde::Serialize;

use crate::cli::{format_credits, load_ledger};
use crate::core::{Course, GradeLedger};
use crate::storage::LedgerStore;

/// Options for the history command.
#[derive(Debug, Clone, Default)]
pub struct HistoryOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// List each semester's courses.
    pub detailed: bool,
}

/// One semester in the history listing.
#[derive(Debug, Clone, Serialize)]
pub struct SemesterEntry {
    /// 1-based display position within the year.
    pub position: usize,
    pub name: String,
    pub gpa: f64,
    pub points: f64,
    pub credits: f64,
    pub courses: Vec<Course>,
}

/// One year in the history listing.
#[derive(Debug, Clone, Serialize)]
pub struct YearEntry {
    pub year: String,
    /// Pooled GPA over the year.
    pub gpa: f64,
    pub credits: f64,
    pub semesters: Vec<SemesterEntry>,
}

/// Output format for the history command.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryOutput {
    pub success: bool,
    pub years: Vec<YearEntry>,
    pub cumulative_gpa: f64,
    pub total_credits: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl HistoryOutput {
    /// Build the listing from a ledger.
    pub fn from_ledger(ledger: &GradeLedger, warning: Option<String>) -> Self {
        let years = ledger
            .years()
            .map(|year| {
                let stats = ledger.year_stats(year);
                let semesters = ledger
                    .semesters_in(year)
                    .enumerate()
                    .map(|(index, (_, semester))| {
                        let stats = semester.calculate_stats();
                        SemesterEntry {
                            position: index + 1,
                            name: semester.name.clone(),
                            gpa: stats.gpa,
                            points: stats.points,
                            credits: stats.credits,
                            courses: semester.courses.clone(),
                        }
                    })
                    .collect();
                YearEntry {
                    year: year.to_string(),
                    gpa: stats.gpa,
                    credits: stats.credits,
                    semesters,
                }
            })
            .collect();

        let cumulative = ledger.cumulative_stats();
        Self {
            success: true,
            years,
            cumulative_gpa: cumulative.gpa,
            total_credits: cumulative.credits,
            warning,
        }
    }
}

/// The history command implementation.
pub struct HistoryCommand<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> HistoryCommand<S> {
    /// Create a new history command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the history command.
    pub fn run(&self, _options: &HistoryOptions) -> HistoryOutput {
        let (ledger, warning) = load_ledger(&self.store);
        HistoryOutput::from_ledger(&ledger, warning)
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &HistoryOutput, options: &HistoryOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output, options.detailed)
        }
    }

    fn format_human_readable(&self, output: &HistoryOutput, detailed: bool) -> String {
        let mut out = String::new();

        if let Some(warning) = &output.warning {
            out.push_str(&format!("Warning: {}\n\n", warning));
        }

        if output.years.is_empty() {
            out.push_str("No semesters recorded yet.\n");
            return out;
        }

        for year in &output.years {
            out.push_str(&format!(
                "{} (GPA {:.2}, {} credits)\n",
                year.year,
                year.gpa,
                format_credits(year.credits)
            ));
            for semester in &year.semesters {
                out.push_str(&format!(
                    "  {}. {}: GPA {:.2} ({} credits)\n",
                    semester.position,
                    semester.name,
                    semester.gpa,
                    format_credits(semester.credits)
                ));
                if detailed {
                    for course in &semester.courses {
                        out.push_str(&format!(
                            "       {} | {} | {}\n",
                            course.name,
                            format_credits(course.credits),
                            course.grade
                        ));
                    }
                }
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "Cumulative GPA: {:.2} ({} credits)\n",
            output.cumulative_gpa,
            format_credits(output.total_credits)
        ));
        out
    }
}
