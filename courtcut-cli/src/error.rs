//! Error plumbing for the CLI.
//!
//! Commands return core errors directly; [`CliErrorContext`] prefixes them
//! with what the command was doing, and [`suggestion_for`] picks the hint
//! printed under the failure.

use courtcut_core::{CoreError, CoreResult};
use std::fmt::Display;

pub type CliResult<T> = CoreResult<T>;

/// `context` alone when there is no cause, `context: cause` otherwise.
fn with_context(context: impl Display, cause: Option<CoreError>) -> CoreError {
    match cause {
        Some(cause) => CoreError::OperationFailed(format!("{context}: {cause}")),
        None => CoreError::OperationFailed(context.to_string()),
    }
}

/// Attaches a description of the failed step to a `Result` error or turns a
/// missing `Option` value into an error.
pub trait CliErrorContext<T>: Sized {
    fn cli_with_context<C: Display>(self, f: impl FnOnce() -> C) -> CliResult<T>;

    fn cli_context(self, context: impl Display) -> CliResult<T> {
        self.cli_with_context(|| context)
    }
}

impl<T, E: Into<CoreError>> CliErrorContext<T> for Result<T, E> {
    fn cli_with_context<C: Display>(self, f: impl FnOnce() -> C) -> CliResult<T> {
        self.map_err(|e| with_context(f(), Some(e.into())))
    }
}

impl<T> CliErrorContext<T> for Option<T> {
    fn cli_with_context<C: Display>(self, f: impl FnOnce() -> C) -> CliResult<T> {
        self.ok_or_else(|| with_context(f(), None))
    }
}

/// Suggestion shown under an error, for the failures a user can fix.
pub fn suggestion_for(error: &CoreError) -> Option<&'static str> {
    match error {
        CoreError::DependencyNotFound(_) => Some("Install ffmpeg/ffprobe and make sure they are on PATH"),
        CoreError::InputUnavailable(_) => Some("Check the path and that the file is readable"),
        CoreError::AudioExtraction { .. } | CoreError::EmptyAudio => {
            Some("Set the offset by hand with 'courtcut sync set'")
        }
        CoreError::Config(_) => Some("Check the numeric options passed on the command line"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_prefixed() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = result.cli_context("Opening store").unwrap_err();
        assert!(err.to_string().contains("Opening store: "));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn missing_value_becomes_error() {
        let err = None::<u8>
            .cli_with_context(|| format!("No analysis stored for {}", "a.mp4"))
            .unwrap_err();
        assert!(matches!(err, CoreError::OperationFailed(m) if m == "No analysis stored for a.mp4"));
    }

    #[test]
    fn sync_failures_suggest_manual_offset() {
        assert!(suggestion_for(&CoreError::EmptyAudio).unwrap().contains("sync set"));
        assert!(suggestion_for(&CoreError::OperationFailed("x".into())).is_none());
    }
}
