//! Grade table and the course value type.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A letter grade.
///
/// Letter grades carry a point value on the 4.0 scale. Administrative grades
/// (incomplete, pass/fail, no grade) carry none and are excluded from GPA
/// arithmetic. Labels outside the table are kept verbatim as [`Grade::Other`]
/// so that loading foreign data never loses information.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Grade {
    A,
    BPlus,
    B,
    CPlus,
    C,
    DPlus,
    D,
    F,
    /// `I`
    Incomplete,
    /// `S`
    Satisfactory,
    /// `U`
    Unsatisfactory,
    /// `P`
    Pass,
    /// `NP`
    NoPass,
    /// `N`
    NoGrade,
    /// Unrecognized label, preserved as written.
    Other(String),
}

impl Grade {
    /// Every recognized grade, in table order.
    pub const ALL: [Grade; 14] = [
        Grade::A,
        Grade::BPlus,
        Grade::B,
        Grade::CPlus,
        Grade::C,
        Grade::DPlus,
        Grade::D,
        Grade::F,
        Grade::Incomplete,
        Grade::Satisfactory,
        Grade::Unsatisfactory,
        Grade::Pass,
        Grade::NoPass,
        Grade::NoGrade,
    ];

    /// Parse a grade label. Never fails: unknown labels become `Other`.
    pub fn parse(label: &str) -> Self {
        match label {
            "A" => Grade::A,
            "B+" => Grade::BPlus,
            "B" => Grade::B,
            "C+" => Grade::CPlus,
            "C" => Grade::C,
            "D+" => Grade::DPlus,
            "D" => Grade::D,
            "F" => Grade::F,
            "I" => Grade::Incomplete,
            "S" => Grade::Satisfactory,
            "U" => Grade::Unsatisfactory,
            "P" => Grade::Pass,
            "NP" => Grade::NoPass,
            "N" => Grade::NoGrade,
            other => Grade::Other(other.to_string()),
        }
    }

    /// Parse a label only if it is in the grade table.
    pub fn recognize(label: &str) -> Option<Self> {
        match Self::parse(label) {
            Grade::Other(_) => None,
            grade => Some(grade),
        }
    }

    /// The label as written in the grade table.
    pub fn label(&self) -> &str {
        match self {
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::F => "F",
            Grade::Incomplete => "I",
            Grade::Satisfactory => "S",
            Grade::Unsatisfactory => "U",
            Grade::Pass => "P",
            Grade::NoPass => "NP",
            Grade::NoGrade => "N",
            Grade::Other(label) => label,
        }
    }

    /// Grade-point value, or `None` for non-GPA and unrecognized grades.
    pub fn points(&self) -> Option<f64> {
        match self {
            Grade::A => Some(4.0),
            Grade::BPlus => Some(3.5),
            Grade::B => Some(3.0),
            Grade::CPlus => Some(2.5),
            Grade::C => Some(2.0),
            Grade::DPlus => Some(1.5),
            Grade::D => Some(1.0),
            Grade::F => Some(0.0),
            _ => None,
        }
    }

    /// Whether the grade is in the table.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Grade::Other(_))
    }

    /// Whether the grade counts toward GPA.
    pub fn counts_toward_gpa(&self) -> bool {
        self.points().is_some()
    }
}

impl From<String> for Grade {
    fn from(label: String) -> Self {
        Grade::parse(&label)
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        match grade {
            Grade::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single course: name, credit weight and grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    #[serde(deserialize_with = "deserialize_credits")]
    pub credits: f64,
    pub grade: Grade,
}

impl Course {
    /// Create a new course.
    pub fn new(name: impl Into<String>, credits: f64, grade: Grade) -> Self {
        Self {
            name: name.into(),
            credits,
            grade,
        }
    }

    /// Grade-point value of this course's grade.
    pub fn points(&self) -> Option<f64> {
        self.grade.points()
    }
}

/// Parse a raw credits field.
///
/// Accepts any finite, non-negative real number. Returns `None` for empty or
/// unparseable input.
pub fn parse_credits(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|credits| credits.is_finite() && *credits >= 0.0)
}

/// Stored credits may be a JSON number or a numeric string.
fn deserialize_credits<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCredits {
        Number(f64),
        Text(String),
    }

    let value = match RawCredits::deserialize(deserializer)? {
        RawCredits::Number(n) => n,
        RawCredits::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid credits value: {s:?}")))?,
    };

    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "credits must be a non-negative number, got {value}"
        )));
    }
    Ok(value)
}
