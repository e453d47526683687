//! Error types for the courtcut-core library.
//!
//! Analysis components that work on already-collected data (event detection,
//! interval merging, coverage segmentation) never fail for data-quality
//! reasons and therefore do not appear here. The variants below cover the
//! places where the core talks to the outside world: ffmpeg/ffprobe, input
//! files, persistence and configuration.

use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for courtcut
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, std::io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, std::io::Error),

    #[error("Command '{command}' failed with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("ffprobe output could not be parsed: {0}")]
    FfprobeParse(String),

    #[error("Input unavailable: {0}")]
    InputUnavailable(String),

    #[error("Audio extraction failed for {path}: {reason}")]
    AudioExtraction { path: String, reason: String },

    #[error("No overlapping audio to correlate")]
    EmptyAudio,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for courtcut operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a [`CoreError::CommandStart`] for a command that could not be spawned.
pub fn command_start_error(command: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), err)
}

/// Builds a [`CoreError::CommandWait`] for a spawned command that could not be awaited.
pub fn command_wait_error(command: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(command.into(), err)
}

/// Builds a [`CoreError::CommandFailed`] for a command that exited unsuccessfully.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}
