// courtcut-cli/src/lib.rs
//
// Library portion of the Courtcut CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// Re-exported for the cli_error! macro.
pub use courtcut_core;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands};
pub use error::{CliErrorContext, CliResult};

/// Creates a CLI error with a formatted message.
///
/// This is a convenience macro similar to anyhow! but creates a CoreError.
#[macro_export]
macro_rules! cli_error {
    ($($arg:tt)*) => {
        $crate::courtcut_core::CoreError::OperationFailed(format!($($arg)*))
    };
}

/// Dispatches a parsed command line.
pub fn run(cli: Cli) -> CliResult<()> {
    let config = courtcut_core::CoreConfig::new(cli.work_dir);
    match cli.command {
        Commands::Zone { action } => commands::zone::run_zone(action, &config),
        Commands::Analyze(args) => commands::analyze::run_analyze(args, &config),
        Commands::Stop => commands::stop::run_stop(&config),
        Commands::Clips(args) => commands::clips::run_clips(args, &config),
        Commands::Sync { action } => commands::sync::run_sync(action, &config),
        Commands::Coverage(args) => commands::coverage::run_coverage(args, &config),
        Commands::Edit { action } => commands::edit::run_edit(action, &config),
    }
}
