//! Plain serializable form of the ledger.
//!
//! The on-disk shape is a JSON object keyed by year label, each value an array
//! of semester records. Records carry `points`, `credits` and `gpa` alongside
//! their courses; those numbers are a write-side cache for readers of the file
//! and are never trusted on load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::course::Course;
use crate::core::semester::{Semester, SemesterStats};
use crate::error::{LedgerError, Result};

/// Year that a legacy bare-array file is migrated into.
pub const LEGACY_YEAR: &str = "Year 1";

/// One semester as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterRecord {
    pub name: String,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub credits: f64,
    #[serde(default)]
    pub gpa: f64,
    #[serde(default)]
    pub courses: Vec<Course>,
}

impl SemesterRecord {
    /// Build a record from a semester, filling the cached totals.
    pub fn from_semester(semester: &Semester) -> Self {
        let stats = semester.calculate_stats();
        Self {
            name: semester.name.clone(),
            points: stats.points,
            credits: stats.credits,
            gpa: stats.gpa,
            courses: semester.courses.clone(),
        }
    }

    /// Rebuild the semester under the given year. Cached totals are dropped.
    pub fn to_semester(&self, year: &str) -> Semester {
        Semester::with_courses(self.name.clone(), year, self.courses.clone())
    }

    /// Whether the cached totals agree with the courses.
    pub fn cache_is_consistent(&self) -> bool {
        let fresh = SemesterStats::from_courses(&self.courses);
        (fresh.points - self.points).abs() < 1e-9
            && (fresh.credits - self.credits).abs() < 1e-9
            && (fresh.gpa - self.gpa).abs() < 1e-9
    }
}

/// Serializable ledger contents: year label to ordered semester records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerSnapshot {
    pub years: BTreeMap<String, Vec<SemesterRecord>>,
}

impl LedgerSnapshot {
    /// Whether the snapshot holds no semesters at all.
    pub fn is_empty(&self) -> bool {
        self.years.values().all(Vec::is_empty)
    }

    /// Total number of semester records.
    pub fn semester_count(&self) -> usize {
        self.years.values().map(Vec::len).sum()
    }

    /// Parse file contents.
    ///
    /// Returns the snapshot and whether it was migrated from the legacy
    /// bare-array shape (placed under [`LEGACY_YEAR`]).
    pub fn from_json(content: &str) -> Result<(Self, bool)> {
        let value: Value = serde_json::from_str(content)?;
        match value {
            Value::Object(_) => Ok((serde_json::from_value(value)?, false)),
            Value::Array(_) => {
                let records: Vec<SemesterRecord> = serde_json::from_value(value)?;
                let mut years = BTreeMap::new();
                years.insert(LEGACY_YEAR.to_string(), records);
                Ok((Self { years }, true))
            }
            other => Err(LedgerError::serde(format!(
                "expected an object keyed by year or a legacy array of semesters, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Serialize with four-space indentation.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|e| LedgerError::serde(e.to_string()))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
