//! gpa - semester and cumulative GPA tracker
//!
//! CLI entry point with global panic handler.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gpa_ledger::config::{crash_log_path, Config};
use gpa_ledger::error::exit_codes;
use gpa_ledger::storage::{FileLedgerStore, Theme};
use gpa_ledger::util::read_to_string_limited;

// =============================================================================
// CLI Definition
// =============================================================================

/// Track semester and cumulative GPA
#[derive(Parser)]
#[command(name = "gpa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a semester
    Add {
        /// Semester name
        #[arg(long)]
        name: String,
        /// Year to file the semester under
        #[arg(long)]
        year: String,
        /// Course as NAME:CREDITS:GRADE (repeatable)
        #[arg(long = "course", short = 'c')]
        courses: Vec<String>,
        /// Calculate the GPA without saving
        #[arg(long)]
        dry_run: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Edit a semester in place
    Edit {
        /// Year the semester is in
        year: String,
        /// Position within the year, starting at 1
        position: usize,
        /// New semester name
        #[arg(long)]
        name: Option<String>,
        /// Move the semester to another year
        #[arg(long)]
        new_year: Option<String>,
        /// Replacement course as NAME:CREDITS:GRADE (repeatable)
        #[arg(long = "course", short = 'c')]
        courses: Vec<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Delete a semester
    Delete {
        /// Year the semester is in
        year: String,
        /// Position within the year, starting at 1
        position: usize,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Delete the whole grade history
    Clear {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// List saved semesters and the cumulative GPA
    History {
        /// Show each semester's courses
        #[arg(long, short)]
        detailed: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Parse pasted transcript text, optionally saving it as a semester
    Import {
        /// File to read; stdin when omitted or "-"
        file: Option<PathBuf>,
        /// Save as a semester with this name
        #[arg(long)]
        name: Option<String>,
        /// Save under this year
        #[arg(long)]
        year: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show chart data: GPA trend and grade distribution
    Chart {
        /// A year label, or "All Years"
        #[arg(long)]
        year: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show or change the display theme
    Theme {
        /// New theme; shows the current one when omitted
        #[arg(value_enum)]
        action: Option<ThemeArg>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Print the grade table
    Grades {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

impl From<ThemeArg> for gpa_ledger::cli::theme::ThemeAction {
    fn from(arg: ThemeArg) -> Self {
        use gpa_ledger::cli::theme::ThemeAction;
        match arg {
            ThemeArg::Light => ThemeAction::Set(Theme::Light),
            ThemeArg::Dark => ThemeAction::Set(Theme::Dark),
            ThemeArg::Toggle => ThemeAction::Toggle,
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("gpa error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Install the stderr log subscriber.
///
/// `GPA_LOG` takes an `EnvFilter` directive; `--verbose` switches the
/// default from warnings to debug output.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "gpa_ledger=debug"
    } else {
        "gpa_ledger=warn"
    };
    let filter = EnvFilter::try_from_env("GPA_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Set up the global panic handler.
///
/// On panic, logs to `<gpa_home>/crash.log` and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("gpa panic: {}", info);

        if let Some(crash_log) = crash_log_path() {
            if let Some(parent) = crash_log.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Run a command and return the exit code.
fn run(command: Commands) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = Config::load();
    let store = FileLedgerStore::new(&config)?;

    match command {
        Commands::Add {
            name,
            year,
            courses,
            dry_run,
            json,
            quiet,
        } => {
            use gpa_ledger::cli::add::{AddCommand, AddOptions};

            let cmd = AddCommand::new(store, config);
            let options = AddOptions {
                json,
                quiet,
                name,
                year,
                courses,
                dry_run,
            };
            let output = cmd.run(&options);
            print_formatted(&cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Edit {
            year,
            position,
            name,
            new_year,
            courses,
            json,
            quiet,
        } => {
            use gpa_ledger::cli::edit::{EditCommand, EditOptions};

            let cmd = EditCommand::new(store, config);
            let options = EditOptions {
                json,
                quiet,
                name,
                new_year,
                courses,
            };
            let output = cmd.run(&year, position, &options);
            print_formatted(&cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Delete {
            year,
            position,
            json,
            quiet,
        } => {
            use gpa_ledger::cli::delete::{DeleteCommand, DeleteOptions};

            let cmd = DeleteCommand::new(store);
            let options = DeleteOptions { json, quiet };
            let output = cmd.run(&year, position, &options);
            print_formatted(&cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Clear { json, quiet } => {
            use gpa_ledger::cli::clear::{ClearCommand, ClearOptions};

            let cmd = ClearCommand::new(store);
            let options = ClearOptions { json, quiet };
            let output = cmd.run(&options);
            print_formatted(&cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::History {
            detailed,
            json,
            quiet,
        } => {
            use gpa_ledger::cli::history::{HistoryCommand, HistoryOptions};

            let cmd = HistoryCommand::new(store);
            let options = HistoryOptions {
                json,
                quiet,
                detailed,
            };
            let output = cmd.run(&options);
            print_formatted(&cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Import {
            file,
            name,
            year,
            json,
            quiet,
        } => {
            use gpa_ledger::cli::import::{ImportCommand, ImportOptions};

            let text = read_import_text(file)?;
            let cmd = ImportCommand::new(store, config);
            let options = ImportOptions {
                json,
                quiet,
                name,
                year,
            };
            let output = cmd.run(&text, &options);
            print_formatted(&cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Chart { year, json, quiet } => {
            use gpa_ledger::cli::chart::{ChartCommand, ChartOptions};

            let cmd = ChartCommand::new(store);
            let options = ChartOptions { json, quiet, year };
            let output = cmd.run(&options);
            print_formatted(&cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Theme {
            action,
            json,
            quiet,
        } => {
            use gpa_ledger::cli::theme::{ThemeAction, ThemeCommand, ThemeOptions};

            let cmd = ThemeCommand::new(store);
            let options = ThemeOptions { json, quiet };
            let action = action.map(ThemeAction::from).unwrap_or_default();
            let output = cmd.run(action, &options);
            print_formatted(&cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
        Commands::Grades { json, quiet } => {
            use gpa_ledger::cli::grades::{GradesCommand, GradesOptions};

            let cmd = GradesCommand::new();
            let options = GradesOptions { json, quiet };
            let output = cmd.run(&options);
            print_formatted(&cmd.format_output(&output, &options));
            Ok(success_to_exit_code(output.success))
        }
    }
}

/// Read import text from a file, or stdin for `None` / `-`.
fn read_import_text(file: Option<PathBuf>) -> Result<String, Box<dyn std::error::Error>> {
    match file {
        Some(path) if path.as_os_str() != "-" => Ok(read_to_string_limited(&path)?),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn print_formatted(formatted: &str) {
    if !formatted.is_empty() {
        print!("{}", formatted);
        if !formatted.ends_with('\n') {
            println!();
        }
    }
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}
