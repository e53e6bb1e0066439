//! Edit command.
//!
//! Loads an existing semester into the editor, applies the requested changes
//! and writes it back under the same id. Changing the year moves the
//! semester to the end of the new year.

use crate::cli::{
    check_year, load_ledger, parse_course_spec, position_to_index, save_draft, SaveOutput,
};
use crate::config::Config;
use crate::core::SemesterEditor;
use crate::error::{LedgerError, Result};
use crate::storage::LedgerStore;

/// Options for the edit command.
#[derive(Debug, Clone, Default)]
pub struct EditOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// New semester name.
    pub name: Option<String>,
    /// Year to move the semester to.
    pub new_year: Option<String>,
    /// Replacement courses as `NAME:CREDITS:GRADE`. Empty keeps the current
    /// courses.
    pub courses: Vec<String>,
}

/// The edit command implementation.
pub struct EditCommand<S: LedgerStore> {
    store: S,
    config: Config,
}

impl<S: LedgerStore> EditCommand<S> {
    /// Create a new edit command.
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// Run the edit command on the semester at 1-based `position` in `year`.
    pub fn run(&self, year: &str, position: usize, options: &EditOptions) -> SaveOutput {
        let (mut ledger, warning) = load_ledger(&self.store);
        let mut editor = SemesterEditor::default();

        let prepared = position_to_index(position)
            .and_then(|index| {
                ledger
                    .id_at(year, index)
                    .ok_or_else(|| LedgerError::semester_not_found(year, position))
            })
            .and_then(|id| editor.edit(&ledger, id))
            .and_then(|_| self.apply(&mut editor, options));
        if let Err(e) = prepared {
            return SaveOutput::failure(e.to_string(), warning);
        }

        match save_draft(&self.store, &mut editor, &mut ledger) {
            Ok(saved) => SaveOutput::success(&saved, &ledger, warning),
            Err(e) => SaveOutput::failure(e.to_string(), warning),
        }
    }

    fn apply(&self, editor: &mut SemesterEditor, options: &EditOptions) -> Result<()> {
        if let Some(name) = &options.name {
            editor.name = name.clone();
        }
        if let Some(year) = &options.new_year {
            check_year(&self.config, year)?;
            editor.year = year.clone();
        }
        if !options.courses.is_empty() {
            let rows = options
                .courses
                .iter()
                .map(|spec| parse_course_spec(spec))
                .collect::<Result<Vec<_>>>()?;
            let existing: Vec<_> = editor.rows().iter().map(|row| row.id()).collect();
            for id in existing {
                editor.remove_row(id);
            }
            for (name, credits, grade) in rows {
                editor.add_row(name, credits, grade);
            }
        }
        Ok(())
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SaveOutput, options: &EditOptions) -> String {
        output.format(options.json, options.quiet)
    }
}
