//! Chart-ready aggregation over the ledger.
//!
//! Produces the two series a visualization layer needs: a label→GPA line and a
//! grade→frequency count. Rendering is someone else's job.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::ledger::GradeLedger;
use crate::core::semester::Semester;

/// Filter label selecting every year.
pub const ALL_YEARS: &str = "All Years";

/// Which part of the ledger to aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum YearFilter {
    /// One point per year, pooled.
    #[default]
    AllYears,
    /// One point per semester of the named year.
    Year(String),
}

impl YearFilter {
    /// Parse a filter label. `"All Years"` selects everything.
    pub fn parse(label: &str) -> Self {
        if label == ALL_YEARS {
            YearFilter::AllYears
        } else {
            YearFilter::Year(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            YearFilter::AllYears => ALL_YEARS,
            YearFilter::Year(year) => year,
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One point of the GPA series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpaPoint {
    pub label: String,
    pub gpa: f64,
}

/// Data consumed by the chart layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    /// Ordered label→GPA series.
    pub gpa_series: Vec<GpaPoint>,
    /// Grade label→number of courses carrying it.
    pub grade_counts: BTreeMap<String, usize>,
}

impl ChartData {
    /// Nothing to plot; the consumer should show a "no data" placeholder.
    pub fn is_empty(&self) -> bool {
        self.gpa_series.is_empty() && self.grade_counts.is_empty()
    }

    fn count_grades(&mut self, semester: &Semester) {
        for course in &semester.courses {
            let label = course.grade.label();
            if !label.is_empty() {
                *self.grade_counts.entry(label.to_string()).or_insert(0) += 1;
            }
        }
    }
}

impl GradeLedger {
    /// Aggregate the ledger for charting.
    ///
    /// With [`YearFilter::AllYears`], each year contributes its pooled GPA in
    /// lexicographic year order. With a specific year, each of its semesters
    /// contributes its own GPA in display order. Points with no GPA-bearing
    /// credits are left out of the series, but their courses are still counted
    /// in the grade distribution.
    pub fn aggregate(&self, filter: &YearFilter) -> ChartData {
        let mut data = ChartData::default();

        match filter {
            YearFilter::AllYears => {
                for year in self.years() {
                    for (_, semester) in self.semesters_in(year) {
                        data.count_grades(semester);
                    }
                    let stats = self.year_stats(year);
                    if stats.has_credits() {
                        data.gpa_series.push(GpaPoint {
                            label: year.to_string(),
                            gpa: stats.gpa,
                        });
                    }
                }
            }
            YearFilter::Year(year) => {
                for (_, semester) in self.semesters_in(year) {
                    data.count_grades(semester);
                    let stats = semester.calculate_stats();
                    if stats.has_credits() {
                        data.gpa_series.push(GpaPoint {
                            label: semester.name.clone(),
                            gpa: stats.gpa,
                        });
                    }
                }
            }
        }

        tracing::debug!(
            filter = %filter,
            points = data.gpa_series.len(),
            grades = data.grade_counts.len(),
            "aggregated chart data"
        );
        data
    }
}
