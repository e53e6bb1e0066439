//! Clear command. Wipes the whole grade history.

use serde::Serialize;

use crate::cli::load_ledger;
use crate::storage::LedgerStore;

/// Options for the clear command.
#[derive(Debug, Clone, Default)]
pub struct ClearOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the clear command.
#[derive(Debug, Clone, Serialize)]
pub struct ClearOutput {
    pub success: bool,
    /// Number of semesters removed.
    pub removed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The clear command implementation.
pub struct ClearCommand<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> ClearCommand<S> {
    /// Create a new clear command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Remove every semester and persist the empty ledger.
    ///
    /// Settings are left alone.
    pub fn run(&self, _options: &ClearOptions) -> ClearOutput {
        let (mut ledger, _) = load_ledger(&self.store);
        let removed = ledger.len();
        ledger.clear();

        match self.store.save_ledger(&ledger) {
            Ok(()) => {
                tracing::info!(removed, "grade history cleared");
                ClearOutput {
                    success: true,
                    removed,
                    error: None,
                }
            }
            Err(e) => ClearOutput {
                success: false,
                removed: 0,
                error: Some(e.to_string()),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ClearOutput, options: &ClearOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if output.success {
            format!("Cleared {} semester(s).\n", output.removed)
        } else {
            format!(
                "Clear failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}
