//! Theme command. Shows or changes the display theme setting.

use serde::Serialize;

use crate::storage::{LedgerStore, Theme};

/// What to do with the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeAction {
    /// Report the current theme.
    #[default]
    Show,
    /// Set a specific theme.
    Set(Theme),
    /// Switch between light and dark.
    Toggle,
}

/// Options for the theme command.
#[derive(Debug, Clone, Default)]
pub struct ThemeOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the theme command.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeOutput {
    pub success: bool,
    /// Theme in effect after the command.
    pub theme: Theme,
    /// Whether the stored setting changed.
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The theme command implementation.
pub struct ThemeCommand<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> ThemeCommand<S> {
    /// Create a new theme command.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run the theme command.
    pub fn run(&self, action: ThemeAction, _options: &ThemeOptions) -> ThemeOutput {
        let mut settings = self.store.load_settings();
        let current = settings.theme;

        let target = match action {
            ThemeAction::Show => current,
            ThemeAction::Set(theme) => theme,
            ThemeAction::Toggle => current.toggled(),
        };

        if target == current {
            return ThemeOutput {
                success: true,
                theme: current,
                changed: false,
                error: None,
            };
        }

        settings.theme = target;
        match self.store.save_settings(&settings) {
            Ok(()) => {
                tracing::debug!(from = %current, to = %target, "theme changed");
                ThemeOutput {
                    success: true,
                    theme: target,
                    changed: true,
                    error: None,
                }
            }
            Err(e) => ThemeOutput {
                success: false,
                theme: current,
                changed: false,
                error: Some(e.to_string()),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ThemeOutput, options: &ThemeOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else if !output.success {
            format!(
                "Could not change theme: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            )
        } else if output.changed {
            format!("Theme set to {}.\n", output.theme)
        } else {
            format!("Theme: {}\n", output.theme)
        }
    }
}
