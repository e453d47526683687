//! Implementation of the 'edit' subcommand.
//!
//! Hand-edited segment lists live beside the planned coverage, so running
//! `coverage` again never overwrites them.

use courtcut_core::CoreConfig;
use courtcut_core::model::CoverageSegment;
use courtcut_core::terminal;

use crate::cli::EditCommand;
use crate::cli_error;
use crate::error::{CliErrorContext, CliResult};

use super::coverage::print_segments;
use super::open_catalog;

pub fn run_edit(action: EditCommand, config: &CoreConfig) -> CliResult<()> {
    let catalog = open_catalog(config)?;
    match action {
        EditCommand::Save {
            left,
            right,
            segments,
        } => {
            let text = std::fs::read_to_string(&segments)
                .cli_with_context(|| format!("Cannot read {}", segments.display()))?;
            let parsed: Vec<CoverageSegment> = serde_json::from_str(&text)
                .cli_with_context(|| format!("Invalid segment list in {}", segments.display()))?;

            let stored = catalog.put_edited_segments(&left, &right, &parsed)?;
            if stored.len() < parsed.len() {
                terminal::print_warning(&format!(
                    "Dropped {} empty segment(s)",
                    parsed.len() - stored.len()
                ));
            }
            terminal::print_section("Edited Coverage");
            terminal::print_status("Pair", &format!("{left} / {right}"), false);
            print_segments(&stored);
            terminal::print_success("Edited segments stored");
        }
        EditCommand::Show { left, right, json } => {
            let Some(segments) = catalog.edited_segments(&left, &right)? else {
                return Err(cli_error!("No edited segments stored for {left} / {right}"));
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&segments)?);
                return Ok(());
            }
            terminal::print_section("Edited Coverage");
            terminal::print_status("Pair", &format!("{left} / {right}"), false);
            print_segments(&segments);
        }
    }
    Ok(())
}
