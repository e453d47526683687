// courtcut-cli/src/main.rs
//
// Entry point of the `courtcut` binary: parses arguments, installs the
// logger, runs the selected command and maps failures to exit code 1.

use clap::Parser;
use courtcut_cli::error::suggestion_for;
use courtcut_cli::logging::init_logging;
use courtcut_cli::{Cli, run};
use courtcut_core::terminal;
use std::process;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    log::debug!("Work directory: {}", cli.work_dir.display());

    if let Err(e) = run(cli) {
        terminal::print_error("Command failed", &e.to_string(), suggestion_for(&e));
        process::exit(1);
    }
}
