//! Motion Features
//!
//! Summary statistics over a window of pointer samples. All spreads are
//! population standard deviations.

use serde::Serialize;
use std::f64::consts::PI;

use super::window::Sample;

/// Heading change that counts as a change of direction
pub const DIRECTION_CHANGE_DEGREES: f64 = 30.0;

/// Lower bound applied to non-positive time deltas
const MIN_DT: f64 = 1e-6;

/// Features streamed to dashboards, in wire field order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Features {
    /// Epoch milliseconds
    pub timestamp: i64,
    pub sample_count: usize,
    /// Pixels per second
    pub mean_speed: f64,
    pub std_speed: f64,
    /// Spread of per-step distances
    pub jitter: f64,
    pub direction_changes: u32,
}

/// Compute features for `samples`, stamped with `timestamp` (epoch millis)
///
/// Returns `None` when fewer than two samples are available.
pub fn compute_features(samples: &[Sample], timestamp: i64) -> Option<Features> {
    if samples.len() < 2 {
        return None;
    }

    let mut speeds = Vec::with_capacity(samples.len() - 1);
    let mut distances = Vec::with_capacity(samples.len() - 1);
    let mut headings = Vec::with_capacity(samples.len() - 1);

    for pair in samples.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let dt = if b.ts - a.ts > 0.0 { b.ts - a.ts } else { MIN_DT };
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let dist = dx.hypot(dy);

        speeds.push(dist / dt);
        distances.push(dist);
        headings.push(dy.atan2(dx));
    }

    let (mean_speed, std_speed) = mean_and_std(&speeds);
    let (_, jitter) = mean_and_std(&distances);

    let threshold = DIRECTION_CHANGE_DEGREES.to_radians();
    let direction_changes = headings
        .windows(2)
        .filter(|h| wrap_angle(h[1] - h[0]).abs() > threshold)
        .count() as u32;

    Some(Features {
        timestamp,
        sample_count: samples.len(),
        mean_speed,
        std_speed,
        jitter,
        direction_changes,
    })
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Normalise an angle difference into [-π, π]
fn wrap_angle(mut diff: f64) -> f64 {
    while diff > PI {
        diff -= 2.0 * PI;
    }
    while diff < -PI {
        diff += 2.0 * PI;
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn straight_line(n: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| Sample::new(i as f64 * 0.1, i as f64 * 10.0, 0.0))
            .collect()
    }

    #[test]
    fn test_needs_two_samples() {
        assert!(compute_features(&[], 0).is_none());
        assert!(compute_features(&[Sample::new(0.0, 1.0, 1.0)], 0).is_none());
    }

    #[test]
    fn test_constant_velocity() {
        let features = compute_features(&straight_line(11), 42).unwrap();
        assert_eq!(features.timestamp, 42);
        assert_eq!(features.sample_count, 11);
        assert!((features.mean_speed - 100.0).abs() < 1e-6);
        assert!(features.std_speed < 1e-6);
        assert!(features.jitter < EPS);
        assert_eq!(features.direction_changes, 0);
    }

    #[test]
    fn test_zig_zag_counts_turns() {
        let samples = vec![
            Sample::new(0.0, 0.0, 0.0),
            Sample::new(1.0, 10.0, 10.0),
            Sample::new(2.0, 20.0, 0.0),
            Sample::new(3.0, 30.0, 10.0),
            Sample::new(4.0, 40.0, 0.0),
        ];
        let features = compute_features(&samples, 0).unwrap();
        assert_eq!(features.direction_changes, 3);
    }

    #[test]
    fn test_gentle_curve_is_not_a_turn() {
        let samples = vec![
            Sample::new(0.0, 0.0, 0.0),
            Sample::new(1.0, 10.0, 0.0),
            Sample::new(2.0, 20.0, 2.0),
        ];
        let features = compute_features(&samples, 0).unwrap();
        assert_eq!(features.direction_changes, 0);
    }

    #[test]
    fn test_non_positive_dt_is_clamped() {
        let samples = vec![Sample::new(5.0, 0.0, 0.0), Sample::new(5.0, 3.0, 4.0)];
        let features = compute_features(&samples, 0).unwrap();
        assert!((features.mean_speed - 5.0 / MIN_DT).abs() < 1e-3);
    }

    #[test]
    fn test_jitter_is_spread_of_distances() {
        let samples = vec![
            Sample::new(0.0, 0.0, 0.0),
            Sample::new(1.0, 1.0, 0.0),
            Sample::new(2.0, 4.0, 0.0),
        ];
        // distances 1 and 3: mean 2, population std 1
        let features = compute_features(&samples, 0).unwrap();
        assert!((features.jitter - 1.0).abs() < EPS);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < EPS);
        assert!((wrap_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < EPS);
        assert!((wrap_angle(0.5) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_serialized_field_order() {
        let features = compute_features(&straight_line(3), 1).unwrap();
        let json = serde_json::to_string(&features).unwrap();
        let ts = json.find("\"timestamp\"").unwrap();
        let mean = json.find("\"mean_speed\"").unwrap();
        let dirs = json.find("\"direction_changes\"").unwrap();
        assert!(ts < mean && mean < dirs);
    }
}
