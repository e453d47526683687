//! Implementation of the 'stop' subcommand.

use courtcut_core::CoreConfig;
use courtcut_core::analysis::StopMarker;
use courtcut_core::terminal;

use crate::error::CliResult;

/// Writes the stop marker that a running `analyze` polls between frames.
pub fn run_stop(config: &CoreConfig) -> CliResult<()> {
    let marker = StopMarker::in_dir(&config.work_dir);
    marker.request()?;
    log::debug!("Stop marker written to {}", marker.path().display());
    terminal::print_success("Stop requested; a running analysis ends after its current frame");
    Ok(())
}
