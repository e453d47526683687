//! Time alignment of two camera recordings from their audio.

pub mod audio;
pub mod correlation;

pub use audio::{AudioAligner, decode_pcm_s16le, extract_audio};
pub use correlation::{cross_correlate, estimate_offset};
