//! Small formatting and numeric helpers shared by the core and the CLI.

use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Clock-style `HH:MM:SS`; negative or non-finite input prints `??:??:??`.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if !(seconds.is_finite() && seconds >= 0.0) {
        return "??:??:??".into();
    }
    let whole = seconds as u64;
    format!("{:02}:{:02}:{:02}", whole / 3600, whole / 60 % 60, whole % 60)
}

/// Always signed, millisecond precision: `+1.250s`.
#[must_use]
pub fn format_offset(seconds: f64) -> String {
    format!("{seconds:+.3}s")
}

#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// `fps` when it is a positive finite rate, `fallback` otherwise.
#[must_use]
pub fn effective_fps(fps: f64, fallback: f64) -> f64 {
    if fps.is_finite() && fps > 0.0 { fps } else { fallback }
}

/// Store key of a video: its file name.
pub fn video_id(path: &Path) -> CoreResult<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CoreError::PathError(format!("{} has no file name", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(3725.0), "01:02:05");
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(-1.0), "??:??:??");
        assert_eq!(format_duration(f64::NAN), "??:??:??");
    }

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(1.25), "+1.250s");
        assert_eq!(format_offset(-0.5), "-0.500s");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.3456, 2), 12.35);
        assert_eq!(round_to(0.123_449, 4), 0.1234);
    }

    #[test]
    fn test_effective_fps() {
        assert_eq!(effective_fps(25.0, 30.0), 25.0);
        assert_eq!(effective_fps(0.0, 30.0), 30.0);
        assert_eq!(effective_fps(f64::NAN, 30.0), 30.0);
    }

    #[test]
    fn test_video_id() {
        assert_eq!(
            video_id(&PathBuf::from("/games/left_cam.mp4")).unwrap(),
            "left_cam.mp4"
        );
        assert!(video_id(&PathBuf::from("/")).is_err());
    }
}
