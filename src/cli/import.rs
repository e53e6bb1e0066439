//! Import command.
//!
//! Parses pasted transcript text. With a name and year the recovered courses
//! are saved as a new semester; otherwise they are only listed.

use serde::Serialize;

use crate::cli::{check_year, format_credits, load_ledger, save_draft, SaveOutput};
use crate::config::Config;
use crate::core::SemesterEditor;
use crate::import::ImportedCourse;
use crate::storage::LedgerStore;

/// Options for the import command.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Semester name to save under.
    pub name: Option<String>,
    /// Year to save under.
    pub year: Option<String>,
}

/// Output format for the import command.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutput {
    pub success: bool,
    /// Courses recovered from the text, in order.
    pub courses: Vec<ImportedCourse>,
    /// Result of saving, when a name and year were given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<SaveOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The import command implementation.
pub struct ImportCommand<S: LedgerStore> {
    store: S,
    config: Config,
}

impl<S: LedgerStore> ImportCommand<S> {
    /// Create a new import command.
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// Run the import command on `text`.
    pub fn run(&self, text: &str, options: &ImportOptions) -> ImportOutput {
        let courses = self.config.import_parser().parse(text);

        let (name, year) = match (&options.name, &options.year) {
            (Some(name), Some(year)) => (name, year),
            (None, None) => {
                return ImportOutput {
                    success: true,
                    courses,
                    saved: None,
                    error: None,
                }
            }
            _ => {
                return ImportOutput {
                    success: false,
                    courses,
                    saved: None,
                    error: Some("Both --name and --year are needed to save".to_string()),
                }
            }
        };

        let saved = self.save(&courses, name, year);
        ImportOutput {
            success: saved.success,
            courses,
            error: saved.error.clone(),
            saved: Some(saved),
        }
    }

    fn save(&self, courses: &[ImportedCourse], name: &str, year: &str) -> SaveOutput {
        let (mut ledger, warning) = load_ledger(&self.store);
        if let Err(e) = check_year(&self.config, year) {
            return SaveOutput::failure(e.to_string(), warning);
        }

        let mut editor = SemesterEditor::new(year);
        editor.apply_import(courses);
        editor.name = name.to_string();

        match save_draft(&self.store, &mut editor, &mut ledger) {
            Ok(saved) => SaveOutput::success(&saved, &ledger, warning),
            Err(e) => SaveOutput::failure(e.to_string(), warning),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ImportOutput, options: &ImportOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &ImportOutput) -> String {
        let mut out = String::new();

        if output.courses.is_empty() {
            out.push_str("No courses found.\n");
        } else {
            out.push_str(&format!("Found {} course(s):\n", output.courses.len()));
            for course in &output.courses {
                let grade = course
                    .grade
                    .as_ref()
                    .map(|g| g.label().to_string())
                    .unwrap_or_else(|| "-".to_string());
                out.push_str(&format!(
                    "  {} | {} | {}\n",
                    course.name,
                    format_credits(course.credits),
                    grade
                ));
            }
        }

        match (&output.saved, &output.error) {
            (Some(saved), _) => out.push_str(&saved.format(false, false)),
            (None, Some(error)) => out.push_str(&format!("Error: {}\n", error)),
            (None, None) => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Grade;
    use crate::storage::MemoryLedgerStore;
    use std::sync::Arc;

    const TEXT: &str = "\
01999021
3 หน่วยกิต
ภาษาไทย
Thai Language
A
01418101
3 หน่วยกิต
การเขียนโปรแกรม
Programming
B+
";

    fn setup() -> Arc<MemoryLedgerStore> {
        Arc::new(MemoryLedgerStore::new())
    }

    #[test]
    fn test_import_lists_courses() {
        let store = setup();
        let cmd = ImportCommand::new(Arc::clone(&store), Config::default());

        let output = cmd.run(TEXT, &ImportOptions::default());

        assert!(output.success);
        assert_eq!(output.courses.len(), 2);
        assert_eq!(output.courses[0].name, "01999021 Thai Language");
        assert_eq!(output.courses[1].grade, Some(Grade::BPlus));
        assert!(output.saved.is_none());
        // listing never touches storage
        assert!(store.raw_data().is_none());
    }

    #[test]
    fn test_import_saves_semester() {
        let store = setup();
        let cmd = ImportCommand::new(Arc::clone(&store), Config::default());

        let output = cmd.run(
            TEXT,
            &ImportOptions {
                name: Some("Fall".to_string()),
                year: Some("Year 1".to_string()),
                ..Default::default()
            },
        );

        assert!(output.success);
        let saved = output.saved.unwrap();
        assert!((saved.gpa - 3.75).abs() < 1e-9);
        let ledger = store.load_ledger();
        let (_, semester) = ledger.semesters_in("Year 1").next().unwrap();
        assert_eq!(semester.name, "Fall");
        assert_eq!(semester.courses.len(), 2);
    }

    #[test]
    fn test_import_custom_unit_label() {
        let store = setup();
        let mut config = Config::default();
        config.import.unit_label = "credits".to_string();
        let cmd = ImportCommand::new(Arc::clone(&store), config);

        let text = "CS101\n4 credits\nนามธรรม\nIntro to CS\nA\n";
        let output = cmd.run(text, &ImportOptions::default());

        assert_eq!(output.courses.len(), 1);
        assert_eq!(output.courses[0].credits, 4.0);
    }

    #[test]
    fn test_import_needs_name_and_year() {
        let store = setup();
        let cmd = ImportCommand::new(Arc::clone(&store), Config::default());

        let output = cmd.run(
            TEXT,
            &ImportOptions {
                name: Some("Fall".to_string()),
                ..Default::default()
            },
        );

        assert!(!output.success);
        assert_eq!(output.courses.len(), 2);
        assert!(store.raw_data().is_none());
    }

    #[test]
    fn test_import_nothing_gradable_is_rejected() {
        let store = setup();
        let cmd = ImportCommand::new(Arc::clone(&store), Config::default());

        let output = cmd.run(
            "garbage\nmore garbage\n",
            &ImportOptions {
                name: Some("Fall".to_string()),
                year: Some("Year 1".to_string()),
                ..Default::default()
            },
        );

        assert!(output.courses.is_empty());
        assert!(!output.success);
        assert_eq!(output.error.as_deref(), Some("Cannot save empty semester!"));
    }

    #[test]
    fn test_import_text_output() {
        let store = setup();
        let cmd = ImportCommand::new(Arc::clone(&store), Config::default());
        let options = ImportOptions::default();

        let output = cmd.run(TEXT, &options);
        let text = cmd.format_output(&output, &options);

        assert!(text.starts_with("Found 2 course(s):\n"));
        assert!(text.contains("01418101 Programming | 3 | B+"));
    }
}
