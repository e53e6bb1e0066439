//! Semester type and derived GPA statistics.

use serde::{Deserialize, Serialize};

use crate::core::course::Course;

/// Totals derived from a set of courses.
///
/// Only courses whose grade carries a point value contribute; everything else
/// is ignored regardless of its credit weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SemesterStats {
    /// Grade points over credits, or `0.0` when no credits count.
    pub gpa: f64,
    /// Sum of `points * credits`.
    pub points: f64,
    /// Sum of credits of GPA-bearing courses.
    pub credits: f64,
}

impl SemesterStats {
    /// Compute stats from a sequence of courses.
    pub fn from_courses<'a>(courses: impl IntoIterator<Item = &'a Course>) -> Self {
        let (points, credits) = courses
            .into_iter()
            .filter_map(|course| course.points().map(|value| (value, course.credits)))
            .fold((0.0, 0.0), |(points, credits), (value, weight)| {
                (points + value * weight, credits + weight)
            });
        Self::from_totals(points, credits)
    }

    /// Build stats from pooled totals.
    pub fn from_totals(points: f64, credits: f64) -> Self {
        let gpa = if credits > 0.0 { points / credits } else { 0.0 };
        Self {
            gpa,
            points,
            credits,
        }
    }

    /// Pool two sets of totals. The GPA is recomputed, not averaged.
    pub fn pool(self, other: SemesterStats) -> Self {
        Self::from_totals(self.points + other.points, self.credits + other.credits)
    }

    /// Whether any credits count toward GPA.
    pub fn has_credits(&self) -> bool {
        self.credits > 0.0
    }
}

/// A named semester within a year.
#[derive(Debug, Clone, PartialEq)]
pub struct Semester {
    pub name: String,
    pub year: String,
    pub courses: Vec<Course>,
}

impl Semester {
    /// Create an empty semester.
    pub fn new(name: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            year: year.into(),
            courses: Vec::new(),
        }
    }

    /// Create a semester with the given courses.
    pub fn with_courses(
        name: impl Into<String>,
        year: impl Into<String>,
        courses: Vec<Course>,
    ) -> Self {
        Self {
            name: name.into(),
            year: year.into(),
            courses,
        }
    }

    pub fn add_course(&mut self, course: Course) {
        self.courses.push(course);
    }

    /// Derive GPA, points and credits from the current courses.
    ///
    /// Nothing is cached; calling this twice always gives the same answer.
    pub fn calculate_stats(&self) -> SemesterStats {
        SemesterStats::from_courses(&self.courses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::course::Grade;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_calculate_stats_example() {
        let semester = Semester::with_courses(
            "Fall",
            "Year 1",
            vec![
                Course::new("Calc", 3.0, Grade::A),
                Course::new("Lit", 3.0, Grade::B),
            ],
        );

        let stats = semester.calculate_stats();
        assert!(approx(stats.points, 21.0));
        assert!(approx(stats.credits, 6.0));
        assert!(approx(stats.gpa, 3.5));
        assert_eq!(format!("{:.2}", stats.gpa), "3.50");
    }

    #[test]
    fn test_empty_semester_has_zero_gpa() {
        let stats = Semester::new("Empty", "Year 1").calculate_stats();
        assert_eq!(stats, SemesterStats::default());
    }

    #[test]
    fn test_non_gpa_courses_excluded() {
        let semester = Semester::with_courses(
            "Spring",
            "Year 1",
            vec![
                Course::new("Calc", 3.0, Grade::B),
                Course::new("Seminar", 2.0, Grade::Pass),
                Course::new("Thesis", 6.0, Grade::Incomplete),
                Course::new("Audit", 1.0, Grade::parse("AU")),
            ],
        );

        let stats = semester.calculate_stats();
        assert!(approx(stats.credits, 3.0));
        assert!(approx(stats.points, 9.0));
        assert!(approx(stats.gpa, 3.0));
    }

    #[test]
    fn test_only_non_gpa_courses_yields_zero() {
        let semester = Semester::with_courses(
            "Summer",
            "Year 1",
            vec![Course::new("Internship", 3.0, Grade::Satisfactory)],
        );
        let stats = semester.calculate_stats();
        assert_eq!(stats.gpa, 0.0);
        assert!(!stats.has_credits());
    }

    #[test]
    fn test_zero_credit_graded_course() {
        let semester = Semester::with_courses(
            "Fall",
            "Year 1",
            vec![Course::new("Orientation", 0.0, Grade::A)],
        );
        let stats = semester.calculate_stats();
        assert_eq!(stats.credits, 0.0);
        assert_eq!(stats.gpa, 0.0);
    }

    #[test]
    fn test_failing_grade_counts_credits() {
        let semester = Semester::with_courses(
            "Fall",
            "Year 1",
            vec![
                Course::new("Calc", 3.0, Grade::A),
                Course::new("Physics", 3.0, Grade::F),
            ],
        );
        let stats = semester.calculate_stats();
        assert!(approx(stats.credits, 6.0));
        assert!(approx(stats.gpa, 2.0));
    }

    #[test]
    fn test_stats_are_idempotent() {
        let semester = Semester::with_courses(
            "Fall",
            "Year 1",
            vec![
                Course::new("Calc", 3.0, Grade::CPlus),
                Course::new("Lit", 2.0, Grade::DPlus),
            ],
        );
        assert_eq!(semester.calculate_stats(), semester.calculate_stats());
    }

    #[test]
    fn test_pool_recomputes_gpa() {
        let a = SemesterStats::from_totals(12.0, 3.0); // 4.0
        let b = SemesterStats::from_totals(18.0, 9.0); // 2.0
        let pooled = a.pool(b);
        assert!(approx(pooled.gpa, 30.0 / 12.0));
        assert!(!approx(pooled.gpa, 3.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_grade() -> impl Strategy<Value = Grade> {
            prop::sample::select(Grade::ALL.to_vec())
        }

        fn arb_course() -> impl Strategy<Value = Course> {
            ("[a-z]{1,8}", 0u32..=12, arb_grade())
                .prop_map(|(name, credits, grade)| Course::new(name, credits as f64, grade))
        }

        proptest! {
            // Property: stats do not depend on course order
            #[test]
            fn prop_stats_order_independent(
                courses in prop::collection::vec(arb_course(), 0..12),
            ) {
                let forward = SemesterStats::from_courses(&courses);
                let reversed: Vec<Course> = courses.iter().rev().cloned().collect();
                let backward = SemesterStats::from_courses(&reversed);

                prop_assert!((forward.points - backward.points).abs() < 1e-9);
                prop_assert!((forward.credits - backward.credits).abs() < 1e-9);
                prop_assert!((forward.gpa - backward.gpa).abs() < 1e-9);
            }

            // Property: non-GPA courses never change the totals
            #[test]
            fn prop_non_gpa_courses_excluded(
                courses in prop::collection::vec(arb_course(), 0..8),
                extra_credits in 0u32..=30,
                label in prop::sample::select(vec!["I", "S", "U", "P", "NP", "N", "W"]),
            ) {
                let base = SemesterStats::from_courses(&courses);
                let mut with_extra = courses.clone();
                with_extra.push(Course::new("extra", extra_credits as f64, Grade::parse(label)));
                let after = SemesterStats::from_courses(&with_extra);

                prop_assert_eq!(base, after);
            }

            // Property: GPA stays on the 4.0 scale
            #[test]
            fn prop_gpa_within_scale(courses in prop::collection::vec(arb_course(), 0..12)) {
                let stats = SemesterStats::from_courses(&courses);
                prop_assert!(stats.gpa >= 0.0);
                prop_assert!(stats.gpa <= 4.0 + 1e-9);
            }
        }
    }
}
