//! The external tools courtcut shells out to: ffmpeg for audio extraction
//! and ffprobe for media properties.

use std::io::ErrorKind;
use std::process::{Command, Stdio};

use crate::error::{CoreError, CoreResult};

pub mod ffmpeg_executor;
pub mod ffprobe_executor;

pub use ffmpeg_executor::{
    FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner, run_to_completion,
};
pub use ffprobe_executor::{MediaInfo, get_media_info, parse_frame_rate};

/// Fails with [`CoreError::DependencyNotFound`] unless `tool -version` can be
/// started. The exit status is not inspected.
pub fn check_dependency(tool: &str) -> CoreResult<()> {
    let probe = Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match probe {
        Ok(_) => {
            log::debug!("{tool} is available");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(CoreError::DependencyNotFound(tool.to_string())),
        Err(e) => Err(CoreError::CommandStart(tool.to_string(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dependency_is_reported() {
        let result = check_dependency("courtcut-no-such-tool");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }
}
