//! Add command.
//!
//! Builds a new semester from course arguments and files it under a year.

use crate::cli::{check_year, load_ledger, parse_course_spec, save_draft, SaveOutput};
use crate::config::Config;
use crate::core::SemesterEditor;
use crate::storage::LedgerStore;

/// Options for the add command.
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Semester name.
    pub name: String,
    /// Year label to file the semester under.
    pub year: String,
    /// Courses as `NAME:CREDITS:GRADE`.
    pub courses: Vec<String>,
    /// Calculate the GPA without saving.
    pub dry_run: bool,
}

/// The add command implementation.
pub struct AddCommand<S: LedgerStore> {
    store: S,
    config: Config,
}

impl<S: LedgerStore> AddCommand<S> {
    /// Create a new add command.
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// Run the add command.
    pub fn run(&self, options: &AddOptions) -> SaveOutput {
        let (mut ledger, warning) = load_ledger(&self.store);

        if let Err(e) = check_year(&self.config, &options.year) {
            return SaveOutput::failure(e.to_string(), warning);
        }

        let mut editor = SemesterEditor::new(options.year.clone());
        editor.name = options.name.clone();
        for spec in &options.courses {
            match parse_course_spec(spec) {
                Ok((name, credits, grade)) => {
                    editor.add_row(name, credits, grade);
                }
                Err(e) => return SaveOutput::failure(e.to_string(), warning),
            }
        }

        if options.dry_run {
            return SaveOutput::preview(&editor, &ledger, warning);
        }

        match save_draft(&self.store, &mut editor, &mut ledger) {
            Ok(saved) => SaveOutput::success(&saved, &ledger, warning),
            Err(e) => SaveOutput::failure(e.to_string(), warning),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SaveOutput, options: &AddOptions) -> String {
        output.format(options.json, options.quiet)
    }
}
