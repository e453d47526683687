//! Implementation of the 'zone' subcommand.

use courtcut_core::terminal;
use courtcut_core::{CoreConfig, GoalZone};

use crate::cli::ZoneCommand;
use crate::error::{CliErrorContext, CliResult};

use super::open_catalog;

pub fn run_zone(action: ZoneCommand, config: &CoreConfig) -> CliResult<()> {
    let catalog = open_catalog(config)?;
    match action {
        ZoneCommand::Set { video, bbox } => {
            catalog.put_zone(&video, &bbox)?;
            print_zone(&video, &bbox);
            terminal::print_success(&format!("Goal zone stored for {video}"));
        }
        ZoneCommand::Show { video } => {
            let zone = catalog
                .zone(&video)?
                .cli_with_context(|| format!("No goal zone stored for {video}"))?;
            print_zone(&video, &zone);
        }
    }
    Ok(())
}

fn print_zone(video: &str, zone: &GoalZone) {
    terminal::print_section("Goal Zone");
    terminal::print_status("Video", video, true);
    terminal::print_status(
        "Box",
        &format!("{},{},{},{}", zone.x1, zone.y1, zone.x2, zone.y2),
        false,
    );
    terminal::print_status("Size", &format!("{} x {}", zone.width(), zone.height()), false);
}
