// courtcut-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use courtcut_core::GoalZone;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Courtcut: basketball highlights and two-camera cross-editing",
    long_about = "Detects scoring events from recorded object detections, syncs two \
                  recordings of a game by their audio and plans which camera to show \
                  second by second."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the store, the progress file and the stop marker.
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        env = "COURTCUT_WORK_DIR",
        default_value = "."
    )]
    pub work_dir: PathBuf,

    /// Enable debug logging (RUST_LOG takes precedence when set).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stores or prints the goal zone of a video
    Zone {
        #[command(subcommand)]
        action: ZoneCommand,
    },
    /// Runs scoring-event detection over recorded detector output
    Analyze(AnalyzeArgs),
    /// Asks a running analysis to stop
    Stop,
    /// Prints the stored highlight clips of a video
    Clips(ClipsArgs),
    /// Computes, stores or prints the sync offset of two recordings
    Sync {
        #[command(subcommand)]
        action: SyncCommand,
    },
    /// Plans camera coverage for a synced pair of recordings
    Coverage(CoverageArgs),
    /// Stores or prints a hand-edited coverage segment list
    Edit {
        #[command(subcommand)]
        action: EditCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ZoneCommand {
    /// Stores the goal zone for a video
    Set {
        /// Video identifier (its file name)
        video: String,

        /// Goal zone box in pixels as X1,Y1,X2,Y2
        #[arg(long, value_name = "X1,Y1,X2,Y2", value_parser = parse_zone)]
        bbox: GoalZone,
    },
    /// Prints the stored goal zone of a video
    Show {
        /// Video identifier (its file name)
        video: String,
    },
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Video the detections were recorded from. Its file name identifies the
    /// analysis; the file itself is only probed for its frame rate.
    #[arg(value_name = "VIDEO")]
    pub video: PathBuf,

    /// JSON-lines file with one array of detections per frame
    #[arg(short, long, value_name = "PATH")]
    pub detections: PathBuf,

    /// Frame rate of the video (probed from VIDEO when omitted)
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f64>,

    /// Optional: Seconds kept before each score
    #[arg(long, value_name = "SECONDS")]
    pub start_pad: Option<f64>,

    /// Optional: Seconds kept after each score
    #[arg(long, value_name = "SECONDS")]
    pub end_pad: Option<f64>,
}

#[derive(Args, Debug)]
pub struct ClipsArgs {
    /// Video identifier (its file name)
    pub video: String,

    /// Print the clips as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum SyncCommand {
    /// Estimates the offset from the audio of both recordings (needs ffmpeg)
    Auto {
        /// Reference recording (A)
        left: PathBuf,
        /// Recording whose offset relative to A is estimated (B)
        right: PathBuf,

        /// Optional: Seconds of leading audio to compare
        #[arg(long, value_name = "SECONDS")]
        window: Option<f64>,

        /// Optional: Largest offset considered, in seconds
        #[arg(long, value_name = "SECONDS")]
        max_shift: Option<f64>,
    },
    /// Stores an offset chosen by hand
    Set {
        left: String,
        right: String,
        /// Seconds B is delayed relative to A (negative when B starts late)
        #[arg(allow_negative_numbers = true)]
        offset: f64,
    },
    /// Prints the stored offset of a pair
    Show { left: String, right: String },
    /// Lists every stored offset
    List {
        /// Print the offsets as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct CoverageArgs {
    /// Left recording (A)
    pub left: PathBuf,
    /// Right recording (B)
    pub right: PathBuf,

    /// Optional: Timeline duration in seconds (probed from both recordings when omitted)
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f64>,

    /// Optional: Sustain time for a weak camera-switch signal
    #[arg(long, value_name = "SECONDS")]
    pub sustain: Option<f64>,

    /// Print the session as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum EditCommand {
    /// Stores a segment list edited by hand, kept apart from planned coverage
    Save {
        left: String,
        right: String,

        /// JSON array of {"start", "end", "target": "left"|"right"} objects
        #[arg(long, value_name = "PATH")]
        segments: PathBuf,
    },
    /// Prints the stored hand-edited segments of a pair
    Show {
        left: String,
        right: String,

        /// Print the segments as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Parses `X1,Y1,X2,Y2` into a goal zone.
pub fn parse_zone(value: &str) -> Result<GoalZone, String> {
    let coords = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate in '{value}': {e}"))?;

    match coords[..] {
        [x1, y1, x2, y2] if x2 > x1 && y2 > y1 => Ok(GoalZone::new(x1, y1, x2, y2)),
        [_, _, _, _] => Err(format!("'{value}' is not a box with X1 < X2 and Y1 < Y2")),
        _ => Err(format!("expected 4 comma-separated numbers, got '{value}'")),
    }
}
