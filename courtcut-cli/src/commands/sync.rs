//! Implementation of the 'sync' subcommand.
//!
//! `auto` estimates the offset from audio, `set` stores a value chosen by a
//! person (which replaces any estimate), `show` prints the stored value.

use courtcut_core::external::{SidecarSpawner, check_dependency};
use courtcut_core::model::SyncOffset;
use courtcut_core::terminal;
use courtcut_core::temp_files::create_temp_dir;
use courtcut_core::utils::video_id;
use courtcut_core::{AudioAligner, CoreConfig, format_offset};

use crate::cli::SyncCommand;
use crate::error::{CliErrorContext, CliResult};

use super::open_catalog;

pub fn run_sync(action: SyncCommand, base: &CoreConfig) -> CliResult<()> {
    match action {
        SyncCommand::Auto {
            left,
            right,
            window,
            max_shift,
        } => {
            let mut config = base.clone();
            if let Some(window) = window {
                config.align.window_secs = window;
            }
            if let Some(shift) = max_shift {
                config.align.max_shift_secs = shift;
            }
            config.validate()?;

            let left_id = video_id(&left)?;
            let right_id = video_id(&right)?;
            check_dependency("ffmpeg")?;

            terminal::print_section("Audio Sync");
            terminal::print_status("Left (A)", &left_id, false);
            terminal::print_status("Right (B)", &right_id, false);
            terminal::print_processing("Cross-correlating leading audio");

            let scratch = create_temp_dir(&config, "sync")?;
            let offset = AudioAligner::new(&config.align)
                .align_files(&SidecarSpawner, &left, &right, scratch.path())
                .cli_context("Audio sync failed")?;

            let catalog = open_catalog(&config)?;
            catalog.put_sync(&left_id, &right_id, offset)?;
            print_offset(&left_id, &right_id, &offset);
            terminal::print_success("Offset estimated and stored");
        }
        SyncCommand::Set {
            left,
            right,
            offset,
        } => {
            let catalog = open_catalog(base)?;
            let offset = SyncOffset::confirmed(offset);
            catalog.put_sync(&left, &right, offset)?;
            print_offset(&left, &right, &offset);
            terminal::print_success("Offset stored");
        }
        SyncCommand::Show { left, right } => {
            let catalog = open_catalog(base)?;
            let offset = catalog
                .sync(&left, &right)?
                .cli_with_context(|| format!("No sync offset stored for {left} / {right}"))?;
            print_offset(&left, &right, &offset);
        }
        SyncCommand::List { json } => {
            let catalog = open_catalog(base)?;
            let pairs = catalog.sync_pairs()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pairs)?);
                return Ok(());
            }
            terminal::print_section("Sync Offsets");
            if pairs.is_empty() {
                terminal::print_sub_item("none");
            }
            for pair in &pairs {
                terminal::print_sub_item(&format!(
                    "{} / {}  {}  ({})",
                    pair.left,
                    pair.right,
                    format_offset(pair.offset.seconds),
                    if pair.offset.confirmed { "manual" } else { "estimated" }
                ));
            }
        }
    }
    Ok(())
}

fn print_offset(left: &str, right: &str, offset: &SyncOffset) {
    let plan = offset.trim_plan();
    terminal::print_section("Sync Offset");
    terminal::print_status("Pair", &format!("{left} / {right}"), false);
    terminal::print_status("Offset", &format_offset(offset.seconds), true);
    terminal::print_status(
        "Source",
        if offset.confirmed { "manual" } else { "estimated" },
        false,
    );
    terminal::print_status("Trim left", &format!("{:.3}s", plan.left_trim), false);
    terminal::print_status("Trim right", &format!("{:.3}s", plan.right_trim), false);
}
