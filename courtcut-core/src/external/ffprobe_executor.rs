//! Reads the two container properties courtcut needs from ffprobe: the
//! duration that bounds a coverage plan and the frame rate that turns frame
//! numbers into seconds.

use std::path::Path;

use ffprobe::{FfProbeError, ffprobe};

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MediaInfo {
    /// Container duration in seconds.
    pub duration: Option<f64>,
    /// Average frame rate of the first video stream.
    pub frame_rate: Option<f64>,
}

pub fn get_media_info(path: &Path) -> CoreResult<MediaInfo> {
    log::debug!("Probing {}", path.display());
    let probed = ffprobe(path).map_err(|e| probe_error(path, e))?;

    let duration = probed
        .format
        .duration
        .as_deref()
        .and_then(|d| d.trim().parse::<f64>().ok());
    let frame_rate = probed
        .streams
        .iter()
        .find(|stream| stream.codec_type.as_deref() == Some("video"))
        .and_then(|video| {
            parse_frame_rate(&video.avg_frame_rate).or_else(|| parse_frame_rate(&video.r_frame_rate))
        });
    if frame_rate.is_none() {
        log::debug!("No usable video frame rate in {}", path.display());
    }

    Ok(MediaInfo {
        duration,
        frame_rate,
    })
}

/// Parses an ffprobe rate such as `30000/1001` or `25`. Zero or malformed
/// rates yield `None`.
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let den = den.trim().parse::<f64>().ok().filter(|d| *d != 0.0)?;
            num.trim().parse::<f64>().ok()? / den
        }
        None => rate.trim().parse::<f64>().ok()?,
    };
    (value.is_finite() && value > 0.0).then_some(value)
}

fn probe_error(path: &Path, err: FfProbeError) -> CoreError {
    let command = format!("ffprobe {}", path.display());
    match err {
        FfProbeError::Io(e) => command_start_error(command, e),
        FfProbeError::Status(output) => command_failed_error(
            command,
            output.status,
            String::from_utf8_lossy(&output.stderr),
        ),
        other => CoreError::FfprobeParse(format!("{command}: {other}")),
    }
}
