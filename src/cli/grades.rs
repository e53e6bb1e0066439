//! Grades command. Prints the grade table.

use serde::Serialize;

use crate::core::Grade;

/// Options for the grades command.
#[derive(Debug, Clone, Default)]
pub struct GradesOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// One row of the grade table.
#[derive(Debug, Clone, Serialize)]
pub struct GradeEntry {
    pub label: String,
    /// Point value, or `None` for grades excluded from GPA.
    pub points: Option<f64>,
}

/// Output format for the grades command.
#[derive(Debug, Clone, Serialize)]
pub struct GradesOutput {
    pub success: bool,
    pub grades: Vec<GradeEntry>,
}

/// The grades command implementation.
#[derive(Debug, Default)]
pub struct GradesCommand;

impl GradesCommand {
    pub fn new() -> Self {
        Self
    }

    /// List every recognized grade in table order.
    pub fn run(&self, _options: &GradesOptions) -> GradesOutput {
        GradesOutput {
            success: true,
            grades: Grade::ALL
                .iter()
                .map(|grade| GradeEntry {
                    label: grade.label().to_string(),
                    points: grade.points(),
                })
                .collect(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &GradesOutput, options: &GradesOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string());
        }

        let mut out = String::from("Grade  Points\n");
        for entry in &output.grades {
            let points = entry
                .points
                .map(|p| format!("{:.1}", p))
                .unwrap_or_else(|| "not counted".to_string());
            out.push_str(&format!("{:<5}  {}\n", entry.label, points));
        }
        out
    }
}
