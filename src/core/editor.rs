//! Semester editor: the draft form behind "add" and "edit".
//!
//! The editor holds raw field text for a semester being composed and knows
//! whether that draft is new or replaces a semester already in the ledger.
//!
//! ```text
//! Idle ──edit(id)──▶ Editing(id) ──save──▶ Idle
//!  ▲                     │
//!  └───────clear─────────┘
//! ```
//!
//! Saving from `Idle` adds a semester; saving from `Editing` replaces the one
//! being edited. `clear` never touches the ledger.

use serde::{Deserialize, Serialize};

use crate::core::course::{parse_credits, Course, Grade};
use crate::core::ledger::{GradeLedger, SemesterId};
use crate::core::semester::{Semester, SemesterStats};
use crate::error::{LedgerError, Result};
use crate::import::ImportedCourse;

/// Message shown when a draft has no GPA-bearing credits.
pub const EMPTY_SEMESTER_MESSAGE: &str = "Cannot save empty semester!";

/// Year a fresh draft starts in.
pub const DEFAULT_YEAR: &str = "Year 1";

/// Identifier of a course row, fixed when the row is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowId(u64);

/// One course row of the draft, as raw field text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRow {
    id: RowId,
    pub name: String,
    pub credits: String,
    pub grade: String,
}

impl CourseRow {
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Convert to a course, or `None` if credits are missing or invalid or
    /// the grade is blank. Grades outside the table are kept as written.
    pub fn to_course(&self) -> Option<Course> {
        let credits = parse_credits(&self.credits)?;
        let grade = self.grade.trim();
        if grade.is_empty() {
            return None;
        }
        Some(Course::new(self.name.trim(), credits, Grade::parse(grade)))
    }
}

/// Editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Composing a new semester.
    #[default]
    Idle,
    /// Editing an existing semester.
    Editing(SemesterId),
}

/// Whether a save added or replaced a semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveKind {
    Added,
    Updated,
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedSemester {
    pub id: SemesterId,
    pub kind: SaveKind,
    pub name: String,
    pub year: String,
    pub stats: SemesterStats,
}

impl SavedSemester {
    /// Confirmation line for the user.
    pub fn message(&self) -> String {
        match self.kind {
            SaveKind::Added => format!("Saved {} to {}", self.name, self.year),
            SaveKind::Updated => format!("Updated {} in {}", self.name, self.year),
        }
    }
}

/// Draft semester plus editing mode.
#[derive(Debug, Clone)]
pub struct SemesterEditor {
    mode: EditorMode,
    pub name: String,
    pub year: String,
    rows: Vec<CourseRow>,
    next_row: u64,
    default_year: String,
}

impl Default for SemesterEditor {
    fn default() -> Self {
        Self::new(DEFAULT_YEAR)
    }
}

impl SemesterEditor {
    /// Create an idle editor whose drafts start in `default_year`.
    pub fn new(default_year: impl Into<String>) -> Self {
        let default_year = default_year.into();
        Self {
            mode: EditorMode::Idle,
            name: String::new(),
            year: default_year.clone(),
            rows: Vec::new(),
            next_row: 0,
            default_year,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditorMode::Editing(_))
    }

    pub fn rows(&self) -> &[CourseRow] {
        &self.rows
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Append a row with the given field text.
    pub fn add_row(
        &mut self,
        name: impl Into<String>,
        credits: impl Into<String>,
        grade: impl Into<String>,
    ) -> RowId {
        let id = RowId(self.next_row);
        self.next_row += 1;
        self.rows.push(CourseRow {
            id,
            name: name.into(),
            credits: credits.into(),
            grade: grade.into(),
        });
        id
    }

    pub fn row_mut(&mut self, id: RowId) -> Option<&mut CourseRow> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    /// Remove a row. Returns false if no such row exists.
    pub fn remove_row(&mut self, id: RowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        self.rows.len() != before
    }

    /// Replace every row with imported courses. Returns the number of rows.
    pub fn apply_import(&mut self, courses: &[ImportedCourse]) -> usize {
        self.rows.clear();
        for course in courses {
            let grade = course
                .grade
                .as_ref()
                .map(|g| g.label().to_string())
                .unwrap_or_default();
            self.add_row(course.name.clone(), course.credits.to_string(), grade);
        }
        self.rows.len()
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// Build a semester from the draft, skipping incomplete rows.
    pub fn build_semester(&self) -> Semester {
        let mut semester = Semester::new(self.name.trim(), self.year.trim());
        for row in &self.rows {
            match row.to_course() {
                Some(course) => semester.add_course(course),
                None => tracing::debug!(row = row.id.0, "skipping incomplete course row"),
            }
        }
        semester
    }

    /// GPA of the draft as it stands.
    pub fn preview(&self) -> SemesterStats {
        self.build_semester().calculate_stats()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Transition: any → Editing(id). Loads the semester into the draft.
    pub fn edit(&mut self, ledger: &GradeLedger, id: SemesterId) -> Result<()> {
        let semester = ledger
            .get(id)
            .ok_or(LedgerError::UnknownSemester { id: id.get() })?;

        self.name = semester.name.clone();
        self.year = semester.year.clone();
        self.rows.clear();
        for course in &semester.courses {
            self.add_row(
                course.name.clone(),
                course.credits.to_string(),
                course.grade.label().to_string(),
            );
        }
        self.mode = EditorMode::Editing(id);
        Ok(())
    }

    /// Transition: any → Editing, addressing the semester by display position.
    pub fn edit_at(&mut self, ledger: &GradeLedger, year: &str, index: usize) -> Result<SemesterId> {
        let id = ledger
            .id_at(year, index)
            .ok_or_else(|| LedgerError::semester_not_found(year, index))?;
        self.edit(ledger, id)?;
        Ok(id)
    }

    /// Transition: any → Idle. Discards the draft.
    pub fn clear(&mut self) {
        self.mode = EditorMode::Idle;
        self.name.clear();
        self.year = self.default_year.clone();
        self.rows.clear();
    }

    /// Transition: Idle/Editing → Idle, writing the draft into the ledger.
    ///
    /// A draft without GPA-bearing credits is rejected and the editor is left
    /// untouched. The caller is responsible for persisting the ledger.
    pub fn save(&mut self, ledger: &mut GradeLedger) -> Result<SavedSemester> {
        let semester = self.build_semester();
        let stats = semester.calculate_stats();

        if !stats.has_credits() {
            return Err(LedgerError::invalid_input(EMPTY_SEMESTER_MESSAGE));
        }
        if semester.year.is_empty() {
            return Err(LedgerError::invalid_input("A year is required"));
        }

        let name = semester.name.clone();
        let year = semester.year.clone();
        let (id, kind) = match self.mode {
            EditorMode::Idle => (ledger.add(semester), SaveKind::Added),
            EditorMode::Editing(id) => {
                if ledger.get(id).is_none() {
                    return Err(LedgerError::invalid_state(format!(
                        "Semester {id} was removed while being edited"
                    )));
                }
                ledger.replace(id, semester)?;
                (id, SaveKind::Updated)
            }
        };

        self.clear();
        Ok(SavedSemester {
            id,
            kind,
            name,
            year,
            stats,
        })
    }
}
