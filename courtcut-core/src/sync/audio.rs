// ============================================================================
// courtcut-core/src/sync/audio.rs
// ============================================================================
//
// AUDIO ALIGNMENT: Offset between two recordings of the same event
//
// The leading window of each recording's audio is extracted as mono 16-bit
// PCM through ffmpeg and the two signals are cross-correlated. The recordings
// are assumed to run at the same speed, so a single constant offset is
// estimated and no drift correction is attempted.

use std::path::Path;

use ffmpeg_sidecar::command::FfmpegCommand;
use log::{debug, info};

use crate::config::AlignConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, run_to_completion};
use crate::model::SyncOffset;
use crate::sync::correlation::estimate_offset;
use crate::temp_files;

/// Converts raw signed 16-bit little-endian PCM into samples in `[-1, 1)`.
/// A trailing odd byte is ignored.
pub fn decode_pcm_s16le(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32_768.0)
        .collect()
}

/// Extracts the first `window_secs` of `video`'s audio as mono samples at
/// `sample_rate`.
pub fn extract_audio<S: FfmpegSpawner>(
    spawner: &S,
    video: &Path,
    window_secs: f64,
    sample_rate: u32,
    scratch_dir: &Path,
) -> CoreResult<Vec<f32>> {
    let extraction_error = |reason: String| CoreError::AudioExtraction {
        path: video.display().to_string(),
        reason,
    };

    if !video.is_file() {
        return Err(CoreError::InputUnavailable(format!(
            "video not found: {}",
            video.display()
        )));
    }

    let output = temp_files::create_temp_file(scratch_dir, "sync_audio", "pcm")?;

    let rate = sample_rate.to_string();
    let window = window_secs.to_string();
    let mut cmd = FfmpegCommand::new();
    cmd.input(video);
    cmd.args([
        "-vn",
        "-ac",
        "1",
        "-ar",
        rate.as_str(),
        "-t",
        window.as_str(),
        "-f",
        "s16le",
    ]);
    cmd.overwrite();
    cmd.output(output.path());

    run_to_completion(spawner, cmd, "audio extraction")
        .map_err(|e| extraction_error(e.to_string()))?;

    let bytes = std::fs::read(output.path())
        .map_err(|e| extraction_error(format!("cannot read extracted audio: {e}")))?;
    let samples = decode_pcm_s16le(&bytes);
    if samples.is_empty() {
        return Err(extraction_error("no audio samples produced".to_string()));
    }

    debug!(
        "Extracted {} samples ({:.2}s) of audio from {}",
        samples.len(),
        samples.len() as f64 / f64::from(sample_rate),
        video.display()
    );
    Ok(samples)
}

/// Computes sync offsets between pairs of recordings.
#[derive(Debug, Clone, Default)]
pub struct AudioAligner {
    config: AlignConfig,
}

impl AudioAligner {
    pub fn new(config: &AlignConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Offset in seconds of `right` relative to `left`, both sampled at the
    /// configured rate.
    pub fn align_signals(&self, left: &[f32], right: &[f32]) -> CoreResult<f64> {
        estimate_offset(left, right, self.config.sample_rate, self.config.max_shift_secs)
            .ok_or(CoreError::EmptyAudio)
    }

    /// Extracts audio from both recordings in parallel and estimates the
    /// offset of `right` relative to `left`.
    pub fn align_files<S: FfmpegSpawner + Sync>(
        &self,
        spawner: &S,
        left: &Path,
        right: &Path,
        scratch_dir: &Path,
    ) -> CoreResult<SyncOffset> {
        let AlignConfig {
            window_secs,
            sample_rate,
            ..
        } = self.config;

        let (left_audio, right_audio) = rayon::join(
            || extract_audio(spawner, left, window_secs, sample_rate, scratch_dir),
            || extract_audio(spawner, right, window_secs, sample_rate, scratch_dir),
        );
        let offset = self.align_signals(&left_audio?, &right_audio?)?;

        info!(
            "Estimated sync offset {:+.3}s between {} and {}",
            offset,
            left.display(),
            right.display()
        );
        Ok(SyncOffset::estimated(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_samples() {
        let bytes = [0x00, 0x00, 0x00, 0x40, 0x00, 0x80, 0xff, 0x7f, 0x12];
        let samples = decode_pcm_s16le(&bytes);
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[1], 0.5);
        assert_eq!(samples[2], -1.0);
        assert!(samples[3] < 1.0 && samples[3] > 0.999);
    }

    #[test]
    fn empty_signal_is_a_typed_error() {
        let aligner = AudioAligner::default();
        assert!(matches!(
            aligner.align_signals(&[], &[0.1, 0.2]),
            Err(CoreError::EmptyAudio)
        ));
    }

    #[test]
    fn missing_video_is_reported_before_spawning() {
        let scratch = tempfile::tempdir().unwrap();
        let result = extract_audio(
            &crate::external::SidecarSpawner,
            Path::new("/nonexistent/clip.mp4"),
            30.0,
            16_000,
            scratch.path(),
        );
        assert!(matches!(result, Err(CoreError::InputUnavailable(_))));
    }
}
