//! Bulk course import from pasted transcript text.
//!
//! Registrar pages paste as loosely structured text where each course spans
//! five non-empty lines:
//!
//! ```text
//! 01999021            <- course code
//! 3 หน่วยกิต           <- credits followed by the unit label
//! <native name>
//! <alternate name>
//! A                   <- grade, possibly blank
//! ```
//!
//! The scanner looks at five-line windows. A window is taken only when its
//! second line contains the unit label; otherwise the scanner slides forward
//! by a single line and tries again, which skips stray lines between groups.

use serde::{Deserialize, Serialize};

use crate::core::course::{Course, Grade};

/// Unit label used by the registrar export the importer was built for.
pub const DEFAULT_UNIT_LABEL: &str = "หน่วยกิต";

/// Lines per course group.
const GROUP_LINES: usize = 5;

/// A course recovered from import text, not yet part of any semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedCourse {
    /// `"<code> <alternate name>"`.
    pub name: String,
    pub credits: f64,
    /// `None` when the grade line was blank or not a recognized grade.
    pub grade: Option<Grade>,
}

impl ImportedCourse {
    /// Convert into a course, if it has a grade.
    pub fn to_course(&self) -> Option<Course> {
        self.grade
            .clone()
            .map(|grade| Course::new(self.name.clone(), self.credits, grade))
    }
}

/// Parser for pasted course text.
#[derive(Debug, Clone)]
pub struct ImportParser {
    unit_label: String,
}

impl Default for ImportParser {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT_LABEL)
    }
}

impl ImportParser {
    /// Create a parser that recognizes credit lines by `unit_label`.
    pub fn new(unit_label: impl Into<String>) -> Self {
        Self {
            unit_label: unit_label.into(),
        }
    }

    pub fn unit_label(&self) -> &str {
        &self.unit_label
    }

    /// Parse pasted text into courses, in input order.
    ///
    /// Never fails: unrecognizable text simply yields fewer courses.
    pub fn parse(&self, text: &str) -> Vec<ImportedCourse> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut courses = Vec::new();
        let mut skipped = 0usize;
        let mut i = 0;

        while i + GROUP_LINES <= lines.len() {
            if !self.is_credit_line(lines[i + 1]) {
                i += 1;
                skipped += 1;
                continue;
            }

            let code = lines[i];
            let alternate = lines[i + 3];
            courses.push(ImportedCourse {
                name: format!("{code} {alternate}"),
                credits: parse_leading_credits(lines[i + 1]),
                grade: Grade::recognize(lines[i + 4]),
            });
            i += GROUP_LINES;
        }

        tracing::debug!(
            courses = courses.len(),
            skipped_lines = skipped,
            unit_label = %self.unit_label,
            "parsed import text"
        );
        courses
    }

    fn is_credit_line(&self, line: &str) -> bool {
        line.contains(self.unit_label.as_str())
    }
}

/// First whitespace-separated token as credits, `0.0` if it isn't a number.
fn parse_leading_credits(line: &str) -> f64 {
    line.split_whitespace()
        .next()
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|credits| credits.is_finite() && *credits >= 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ImportParser {
        ImportParser::new("credits")
    }

    #[test]
    fn test_single_group() {
        let courses = parser().parse("101\n3 credits\nThai\nEnglish 101\nA\n");

        assert_eq!(
            courses,
            vec![ImportedCourse {
                name: "101 English 101".to_string(),
                credits: 3.0,
                grade: Some(Grade::A),
            }]
        );
    }

    #[test]
    fn test_default_unit_label() {
        let text = "01999021\n3 หน่วยกิต\nภาษาไทย\nThai Language\nB+\n";
        let courses = ImportParser::default().parse(text);

        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name, "01999021 Thai Language");
        assert_eq!(courses[0].grade, Some(Grade::BPlus));
    }

    #[test]
    fn test_multiple_groups_with_blank_lines_and_padding() {
        let text = "
            101
            3 credits
            Native A

            Intro A
            A

            102
              2 credits
            Native B
            Intro B
            C+
        ";
        let courses = parser().parse(text);

        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0].name, "101 Intro A");
        assert_eq!(courses[1].name, "102 Intro B");
        assert_eq!(courses[1].credits, 2.0);
        assert_eq!(courses[1].grade, Some(Grade::CPlus));
    }

    #[test]
    fn test_unparseable_credits_default_to_zero() {
        let courses = parser().parse("101\nthree credits\nN\nName\nA\n");
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].credits, 0.0);
    }

    #[test]
    fn test_unrecognized_grade_left_blank() {
        let courses = parser().parse("101\n3 credits\nN\nName\nW\n");
        assert_eq!(courses.len(), 1);
        assert!(courses[0].grade.is_none());
        assert!(courses[0].to_course().is_none());
    }

    #[test]
    fn test_non_gpa_grade_is_kept() {
        let courses = parser().parse("101\n1 credits\nN\nSeminar\nS\n");
        assert_eq!(courses[0].grade, Some(Grade::Satisfactory));
        assert_eq!(courses[0].to_course().unwrap().points(), None);
    }

    #[test]
    fn test_stray_line_before_group_is_skipped() {
        let text = "Transcript printed 2024\n101\n3 credits\nN\nIntro\nA\n";
        let courses = parser().parse(text);

        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name, "101 Intro");
    }

    #[test]
    fn test_several_stray_lines_between_groups() {
        let text = "101\n3 credits\nN\nIntro\nA\npage 1\nfooter\n102\n2 credits\nN\nNext\nB\n";
        let courses = parser().parse(text);

        let names: Vec<&str> = courses.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["101 Intro", "102 Next"]);
    }

    #[test]
    fn test_corrupted_group_dropped_not_merged() {
        // first group lost its unit label
        let text = "101\n3\nN\nBroken\nA\n102\n2 credits\nN\nGood\nB\n";
        let courses = parser().parse(text);

        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name, "102 Good");
        assert_eq!(courses[0].credits, 2.0);
        assert_eq!(courses[0].grade, Some(Grade::B));
    }

    #[test]
    fn test_group_after_lost_code_line_is_dropped() {
        // the second group lost its code line, so its window starts on "W"
        // and "Next" sits where the credit line should be
        let text = "101\n3 credits\nN\nIntro\nW\n2 credits\nN\nNext\nB\n";
        let courses = parser().parse(text);

        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name, "101 Intro");
        assert!(courses[0].grade.is_none());
    }

    #[test]
    fn test_window_always_consumes_five_lines() {
        // blank grade line vanished, so the next code is read as the grade
        let text = "101\n3 credits\nN\nNo Grade Yet\n\n102\n2 credits\nN\nGraded\nA\n";
        let courses = parser().parse(text);

        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].name, "101 No Grade Yet");
        assert!(courses[0].grade.is_none());
    }

    #[test]
    fn test_trailing_four_lines_yield_nothing() {
        assert!(parser().parse("101\n3 credits\nN\nIn Progress\n\n").is_empty());
    }

    #[test]
    fn test_truncated_text_yields_nothing() {
        assert!(parser().parse("101\n3 credits\nN\n").is_empty());
        assert!(parser().parse("").is_empty());
        assert!(parser().parse("\n\n   \n").is_empty());
    }

    #[test]
    fn test_text_without_unit_label() {
        let text = "a\nb\nc\nd\ne\nf\ng\n";
        assert!(parser().parse(text).is_empty());
    }

    #[test]
    fn test_negative_credits_default_to_zero() {
        let courses = parser().parse("101\n-3 credits\nN\nName\nA\n");
        assert_eq!(courses[0].credits, 0.0);
    }
}
