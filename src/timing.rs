//! Per-image display durations.
//!
//! Pure functions, no I/O. The crescendo is a linearly decreasing arithmetic
//! sequence that ends at one frame (`1/fps`) and sums to the requested total:
//!
//! ```text
//! sum = count * (start + min) / 2   →   start = 2 * total / count - min
//! step = (start - min) / (count - 1)
//! ```
//!
//! When the images are too many for the requested time (`start < min`), the
//! sequence does not shrink or stretch: every image collapses to exactly one
//! frame. That flat fallback is the intended behavior.

use serde::{Deserialize, Serialize};

/// Shortest duration any clip may have: one frame at `fps`.
pub fn min_frame_duration(fps: u32) -> f64 {
    1.0 / fps as f64
}

/// Durations for the crescendo phase, one per image, in display order.
///
/// Returns an empty list for `count == 0`; callers are expected to have
/// rejected an empty image set already.
pub fn compute_crescendo_durations(count: usize, total_time: f64, fps: u32) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }

    let min_dur = min_frame_duration(fps);
    let start_dur = 2.0 * total_time / count as f64 - min_dur;

    if start_dur < min_dur {
        return vec![min_dur; count];
    }

    let step = if count > 1 {
        (start_dur - min_dur) / (count - 1) as f64
    } else {
        0.0
    };

    (0..count)
        .map(|i| (start_dur - i as f64 * step).max(min_dur))
        .collect()
}

/// Number of one-frame jobs in the high-speed loop phase.
pub fn loop_frame_count(loop_duration: f64, fps: u32) -> usize {
    if !loop_duration.is_finite() || loop_duration <= 0.0 {
        return 0;
    }
    (loop_duration * fps as f64).floor() as usize
}

/// How the primary pass assigns durations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingMode {
    /// Accelerate over `total` seconds.
    Crescendo { total: f64 },
    /// Hold every image for the same number of seconds.
    Static { duration: f64 },
}

/// Durations for the primary pass under either timing mode.
///
/// Static durations are floored at one frame, like crescendo terms.
pub fn primary_durations(count: usize, mode: TimingMode, fps: u32) -> Vec<f64> {
    match mode {
        TimingMode::Crescendo { total } => compute_crescendo_durations(count, total, fps),
        TimingMode::Static { duration } => {
            vec![duration.max(min_frame_duration(fps)); count]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    // =========================================================================
    // compute_crescendo_durations
    // =========================================================================

    #[test]
    fn four_images_two_seconds_ten_fps() {
        let d = compute_crescendo_durations(4, 2.0, 10);
        assert_eq!(d.len(), 4);
        assert_close(d[0], 0.9, EPS);
        assert_close(d[1], 0.9 - 0.8 / 3.0, EPS);
        assert_close(d[2], 0.9 - 1.6 / 3.0, EPS);
        assert_close(d[3], 0.1, EPS);
        assert_close(d.iter().sum(), 2.0, EPS);
    }

    #[test]
    fn sequence_is_non_increasing_and_floored() {
        for &(count, total, fps) in &[
            (2usize, 1.0, 30u32),
            (10, 10.0, 30),
            (37, 12.5, 24),
            (100, 10.0, 60),
            (500, 3.0, 25),
        ] {
            let d = compute_crescendo_durations(count, total, fps);
            let min = min_frame_duration(fps);
            assert_eq!(d.len(), count);
            assert!(d.windows(2).all(|w| w[0] >= w[1] - EPS), "{d:?}");
            assert!(d.iter().all(|x| *x >= min - EPS));
        }
    }

    #[test]
    fn sum_matches_total_when_unclamped() {
        let d = compute_crescendo_durations(20, 10.0, 30);
        assert_close(d.iter().sum(), 10.0, 1e-6);
        assert_close(*d.last().unwrap(), 1.0 / 30.0, EPS);
    }

    #[test]
    fn single_image_gets_whole_budget_minus_nothing() {
        // start = 2 * 3 / 1 - 0.1 = 5.9; no step for a single term.
        let d = compute_crescendo_durations(1, 3.0, 10);
        assert_eq!(d.len(), 1);
        assert_close(d[0], 5.9, EPS);
    }

    #[test]
    fn too_many_images_collapse_to_one_frame() {
        // start = 2 * 1 / 100 - 1/30 < 1/30
        let d = compute_crescendo_durations(100, 1.0, 30);
        assert_eq!(d.len(), 100);
        assert!(d.iter().all(|x| *x == 1.0 / 30.0));
    }

    #[test]
    fn single_image_below_floor_collapses() {
        let d = compute_crescendo_durations(1, 0.01, 10);
        assert_eq!(d, vec![0.1]);
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(compute_crescendo_durations(0, 5.0, 30).is_empty());
    }

    // =========================================================================
    // loop_frame_count
    // =========================================================================

    #[test]
    fn loop_count_is_floor_of_seconds_times_fps() {
        assert_eq!(loop_frame_count(1.0, 10), 10);
        assert_eq!(loop_frame_count(5.0, 30), 150);
        assert_eq!(loop_frame_count(0.25, 10), 2);
    }

    #[test]
    fn loop_count_zero_or_negative_is_empty() {
        assert_eq!(loop_frame_count(0.0, 30), 0);
        assert_eq!(loop_frame_count(-1.0, 30), 0);
        assert_eq!(loop_frame_count(f64::NAN, 30), 0);
    }

    // =========================================================================
    // primary_durations
    // =========================================================================

    #[test]
    fn static_mode_repeats_duration() {
        let d = primary_durations(3, TimingMode::Static { duration: 2.0 }, 30);
        assert_eq!(d, vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn static_mode_floors_at_one_frame() {
        let d = primary_durations(2, TimingMode::Static { duration: 0.001 }, 10);
        assert_eq!(d, vec![0.1, 0.1]);
    }

    #[test]
    fn crescendo_mode_delegates() {
        let d = primary_durations(4, TimingMode::Crescendo { total: 2.0 }, 10);
        assert_eq!(d, compute_crescendo_durations(4, 2.0, 10));
    }
}
