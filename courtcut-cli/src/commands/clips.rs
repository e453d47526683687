//! Implementation of the 'clips' subcommand.

use courtcut_core::CoreConfig;
use courtcut_core::terminal;

use crate::cli::ClipsArgs;
use crate::cli_error;
use crate::error::CliResult;

use super::analyze::print_clips;
use super::open_catalog;

pub fn run_clips(args: ClipsArgs, config: &CoreConfig) -> CliResult<()> {
    let catalog = open_catalog(config)?;
    let Some(record) = catalog.analysis(&args.video)? else {
        return Err(cli_error!("No analysis stored for {}", args.video));
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record.clips)?);
        return Ok(());
    }

    terminal::print_section("Clips");
    terminal::print_status("Video", &record.video, true);
    terminal::print_status("Analyzed", &record.created, false);
    terminal::print_status("Frames", &record.trace.len().to_string(), false);
    print_clips(&record.clips);
    Ok(())
}
