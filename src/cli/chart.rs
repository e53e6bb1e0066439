//! Chart command.
//!
//! Prints the data a chart would be drawn from: the GPA series for the
//! selected filter and the grade distribution.

use serde::Serialize;

use crate::cli::load_ledger;
use crate::core::{ChartData, YearFilter};
use crate::storage::LedgerStore;

/// Width of a full-scale (4.00) bar in text output.
const BAR_WIDTH: usize = 40;

/// Options for the chart command.
#[derive(Debug, Clone, Default)]
pub struct ChartOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Year label, or "All Years". Defaults to all years.
    pub year: Option<String>,
}

/// Output format for the chart command.
#[derive(Debug, Clone, Serialize)]
pub struct ChartOutput {
    pub success: bool,
    /// Filter label the data was computed for.
    pub filter: String,
    #[serde(flatten)]
    pub data: ChartData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// The chart command implementation.
pub struct ChartCommand<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> ChartCommand<S> {
    /// Create a new chart command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the chart command.
    pub fn run(&self, options: &ChartOptions) -> ChartOutput {
        let (ledger, warning) = load_ledger(&self.store);
        let filter = options
            .year
            .as_deref()
            .map(YearFilter::parse)
            .unwrap_or_default();

        let data = ledger.aggregate(&filter);
        tracing::debug!(
            filter = %filter,
            points = data.gpa_series.len(),
            grades = data.grade_counts.len(),
            "aggregated chart data"
        );

        ChartOutput {
            success: true,
            filter: filter.label().to_string(),
            data,
            warning,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ChartOutput, options: &ChartOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &ChartOutput) -> String {
        let mut out = String::new();

        if let Some(warning) = &output.warning {
            out.push_str(&format!("Warning: {}\n\n", warning));
        }

        if output.data.is_empty() {
            out.push_str(&format!("No data to display for {}.\n", output.filter));
            return out;
        }

        out.push_str(&format!("GPA trend ({})\n", output.filter));
        if output.data.gpa_series.is_empty() {
            out.push_str("  (no graded credits)\n");
        }
        let label_width = output
            .data
            .gpa_series
            .iter()
            .map(|p| p.label.chars().count())
            .max()
            .unwrap_or(0);
        for point in &output.data.gpa_series {
            out.push_str(&format!(
                "  {:<width$}  {:.2}  {}\n",
                point.label,
                point.gpa,
                bar(point.gpa, 4.0, BAR_WIDTH),
                width = label_width
            ));
        }

        out.push_str("\nGrade distribution\n");
        let max_count = output.data.grade_counts.values().copied().max().unwrap_or(0);
        for (grade, count) in &output.data.grade_counts {
            out.push_str(&format!(
                "  {:<3} {:>3}  {}\n",
                grade,
                count,
                bar(*count as f64, max_count as f64, BAR_WIDTH / 2)
            ));
        }
        out
    }
}

fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round().clamp(0.0, width as f64) as usize;
    "#".repeat(filled)
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
            "Year 1",
            vec![Course::new("Physics", 3.0, Grade::A)],
        ));
        ledger.add(Semester::with_courses(
            "Fall",
            "Year 2",
            vec![Course::new("Seminar", 1.0, Grade::Pass)],
        ));
        store.save_ledger(&ledger).unwrap();
        store
    }

    #[test]
    fn test_chart_all_years() {
        let store = setup();
        let cmd = ChartCommand::new(Arc::clone(&store));

        let output = cmd.run(&ChartOptions::default());

        assert_eq!(output.filter, "All Years");
        // Year 2 has no graded credits and is left out of the series
        assert_eq!(output.data.gpa_series.len(), 1);
        assert_eq!(output.data.gpa_series[0].label, "Year 1");
        assert!((output.data.gpa_series[0].gpa - 33.0 / 9.0).abs() < 1e-9);
        assert_eq!(output.data.grade_counts["A"], 2);
        assert_eq!(output.data.grade_counts["P"], 1);
    }

    #[test]
    fn test_chart_single_year() {
        let store = setup();
        let cmd = ChartCommand::new(Arc::clone(&store));

        let output = cmd.run(&ChartOptions {
            year: Some("Year 1".to_string()),
            ..Default::default()
        });

        let labels: Vec<&str> = output
            .data
            .gpa_series
            .iter()
            .map(|p| p.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Fall", "Spring"]);
        assert!(!output.data.grade_counts.contains_key("P"));
    }

    #[test]
    fn test_chart_no_data_placeholder() {
        let store = setup();
        let cmd = ChartCommand::new(Arc::clone(&store));
        let options = ChartOptions {
            year: Some("Year 4".to_string()),
            ..Default::default()
        };

        let output = cmd.run(&options);

        assert!(output.data.is_empty());
        assert_eq!(
            cmd.format_output(&output, &options),
            "No data to display for Year 4.\n"
        );
    }

    #[test]
    fn test_chart_text_bars() {
        let store = setup();
        let cmd = ChartCommand::new(Arc::clone(&store));
        let options = ChartOptions {
            year: Some("Year 1".to_string()),
            ..Default::default()
        };

        let output = cmd.run(&options);
        let text = cmd.format_output(&output, &options);

        assert!(text.contains("GPA trend (Year 1)"));
        assert!(text.contains(&format!("Spring  4.00  {}", "#".repeat(BAR_WIDTH))));
        assert!(text.contains("Grade distribution"));
    }

    #[test]
    fn test_chart_json_shape() {
        let store = setup();
        let cmd = ChartCommand::new(Arc::clone(&store));
        let options = ChartOptions {
            json: true,
            ..Default::default()
        };

        let output = cmd.run(&options);
        let json: serde_json::Value =
            serde_json::from_str(&cmd.format_output(&output, &options)).unwrap();

        assert_eq!(json["filter"], "All Years");
        assert_eq!(json["gpa_series"][0]["label"], "Year 1");
        assert_eq!(json["grade_counts"]["B"], 1);
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(2.0, 4.0, 10), "#####");
        assert_eq!(bar(5.0, 4.0, 10), "##########");
        assert_eq!(bar(1.0, 0.0, 10), "");
    }
}
