//! Cross-correlation offset estimation.
//!
//! For signals `a` and `b` truncated to a common length `n` the correlation
//! at lag `k` is `c[k] = sum_i a[i] * b[i + k]`. It peaks at `k = +D` when `b`
//! is `a` delayed by `D` samples, so the returned offset is positive when the
//! second signal lags the first.

use log::debug;
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

/// Full cross-correlation of two equal-length signals.
///
/// Returns `2n - 1` values; entry `j` is the correlation at lag `j - (n - 1)`.
pub fn cross_correlate(a: &[f32], b: &[f32]) -> Vec<f64> {
    let n = a.len().min(b.len());
    if n == 0 {
        return Vec::new();
    }
    let len = (2 * n - 1).next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(len);
    let inverse = planner.plan_fft_inverse(len);

    let pad = |signal: &[f32]| -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = signal[..n]
            .iter()
            .map(|&s| Complex::new(f64::from(s), 0.0))
            .collect();
        buffer.resize(len, Complex::new(0.0, 0.0));
        buffer
    };
    let mut spec_a = pad(a);
    let mut spec_b = pad(b);
    forward.process(&mut spec_a);
    forward.process(&mut spec_b);

    let mut product: Vec<Complex<f64>> = spec_a
        .iter()
        .zip(&spec_b)
        .map(|(x, y)| x.conj() * *y)
        .collect();
    inverse.process(&mut product);

    let scale = len as f64;
    // Negative lags wrap around to the end of the buffer.
    (1..n)
        .rev()
        .map(|k| product[len - k].re / scale)
        .chain((0..n).map(|k| product[k].re / scale))
        .collect()
}

/// Estimates how many seconds `b` lags behind `a`.
///
/// Only lags within `max_shift_secs` are searched. The earliest lag wins when
/// several share the maximum. Returns `None` when the signals do not overlap.
pub fn estimate_offset(a: &[f32], b: &[f32], sample_rate: u32, max_shift_secs: f64) -> Option<f64> {
    let n = a.len().min(b.len());
    if n == 0 || sample_rate == 0 {
        return None;
    }

    let max_shift = ((max_shift_secs.max(0.0) * f64::from(sample_rate)) as usize).min(n - 1);
    let correlation = cross_correlate(&a[..n], &b[..n]);
    let center = n - 1;

    let (best_index, best_value) = correlation[center - max_shift..=center + max_shift]
        .iter()
        .enumerate()
        .fold((0usize, f64::NEG_INFINITY), |best, (i, &value)| {
            if value > best.1 { (i, value) } else { best }
        });

    let lag = best_index as i64 - max_shift as i64;
    let offset = lag as f64 / f64::from(sample_rate);
    debug!(
        "Correlation peak {:.3} at lag {} samples ({:.4}s) over {} samples",
        best_value, lag, offset, n
    );
    Some(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic noise-like signal.
    fn signal(len: usize, seed: u32) -> Vec<f32> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                ((state >> 16) & 0x7fff) as f32 / 16_384.0 - 1.0
            })
            .collect()
    }

    fn delayed(source: &[f32], delay: usize) -> Vec<f32> {
        let mut out = vec![0.0; delay];
        out.extend_from_slice(&source[..source.len() - delay]);
        out
    }

    #[test]
    fn correlation_matches_direct_sum() {
        let a = [1.0, 2.0, 3.0];
        let b = [0.0, 1.0, 0.5];
        let c = cross_correlate(&a, &b);
        assert_eq!(c.len(), 5);
        let direct: Vec<f64> = (-2i64..=2)
            .map(|k| {
                (0..3i64)
                    .filter(|i| (0..3).contains(&(i + k)))
                    .map(|i| f64::from(a[i as usize]) * f64::from(b[(i + k) as usize]))
                    .sum()
            })
            .collect();
        for (got, want) in c.iter().zip(&direct) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
        // zero lag: 1*0 + 2*1 + 3*0.5
        assert!((c[2] - 3.5).abs() < 1e-9);
    }

    #[test]
    fn delayed_second_signal_gives_positive_offset() {
        let rate = 1_000;
        let a = signal(4_000, 7);
        let b = delayed(&a, 250);
        let offset = estimate_offset(&a, &b, rate, 2.0).unwrap();
        assert!((offset - 0.25).abs() <= 1.0 / rate as f64, "offset {offset}");
    }

    #[test]
    fn delayed_first_signal_gives_negative_offset() {
        let rate = 1_000;
        let b = signal(4_000, 11);
        let a = delayed(&b, 120);
        let offset = estimate_offset(&a, &b, rate, 2.0).unwrap();
        assert!((offset + 0.12).abs() <= 1.0 / rate as f64, "offset {offset}");
    }

    #[test]
    fn search_is_limited_to_max_shift() {
        let rate = 1_000;
        let a = signal(4_000, 3);
        let b = delayed(&a, 900);
        let offset = estimate_offset(&a, &b, rate, 0.5).unwrap();
        assert!(offset.abs() <= 0.5);
    }

    #[test]
    fn unequal_lengths_are_truncated() {
        let rate = 1_000;
        let a = signal(5_000, 5);
        let b = delayed(&a, 40)[..3_000].to_vec();
        let offset = estimate_offset(&a, &b, rate, 1.0).unwrap();
        assert!((offset - 0.04).abs() <= 1.0 / rate as f64);
    }

    #[test]
    fn empty_overlap_has_no_offset() {
        assert_eq!(estimate_offset(&[], &[1.0, 2.0], 16_000, 30.0), None);
        assert!(cross_correlate(&[], &[]).is_empty());
    }
}
