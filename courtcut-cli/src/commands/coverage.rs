//! Implementation of the 'coverage' subcommand.

use courtcut_core::model::{CoverageSegment, CoverageSession};
use courtcut_core::terminal;
use courtcut_core::utils::video_id;
use courtcut_core::session::aligned_duration;
use courtcut_core::{CoreConfig, format_duration, format_offset, plan_coverage};

use crate::cli::CoverageArgs;
use crate::error::CliResult;

use super::{open_catalog, probe_duration};

pub fn run_coverage(args: CoverageArgs, base: &CoreConfig) -> CliResult<()> {
    let mut config = base.clone();
    if let Some(sustain) = args.sustain {
        config.segmenter.sustain_secs = sustain;
    }
    config.validate()?;

    let left = video_id(&args.left)?;
    let right = video_id(&args.right)?;
    let catalog = open_catalog(&config)?;

    let duration_hint = match args.duration {
        Some(duration) => Some(duration),
        None => {
            let offset = catalog.sync(&left, &right)?.map_or(0.0, |o| o.seconds);
            aligned_duration(probe_duration(&args.left), probe_duration(&args.right), offset)
        }
    };
    let session = plan_coverage(&catalog, &left, &right, duration_hint, &config.segmenter)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        print_session(&session);
    }
    Ok(())
}

fn print_session(session: &CoverageSession) {
    terminal::print_section("Coverage");
    terminal::print_status("Left (A)", &session.left_video, false);
    terminal::print_status("Right (B)", &session.right_video, false);
    terminal::print_status("Offset", &format_offset(session.offset), false);
    terminal::print_status("Duration", &format_duration(session.duration), false);

    print_segments(&session.segments);

    let (left, right) = session.clips_by_side();
    let seconds = |clips: &[courtcut_core::ClipInterval]| -> f64 {
        clips.iter().map(|c| c.duration()).sum()
    };
    terminal::print_status(
        "Left share",
        &format!("{} clip(s), {:.1}s", left.len(), seconds(&left)),
        false,
    );
    terminal::print_status(
        "Right share",
        &format!("{} clip(s), {:.1}s", right.len(), seconds(&right)),
        false,
    );
    terminal::print_success("Coverage stored");
}

pub fn print_segments(segments: &[CoverageSegment]) {
    terminal::print_processing(&format!("Segments ({})", segments.len()));
    for segment in segments {
        terminal::print_sub_item(&format!(
            "{:>9.2}s - {:>9.2}s  {}",
            segment.start, segment.end, segment.target
        ));
    }
}
