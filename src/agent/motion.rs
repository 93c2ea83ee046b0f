//! Motion Sources
//!
//! Where the agent's pointer positions come from, and the sampler task that
//! feeds them into the shared window.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::window::{Sample, SampleWindow};

/// A source of pointer positions
pub trait MotionSource: Send {
    /// Position at `t` seconds since the Unix epoch, or `None` when the
    /// pointer has not moved since the last call
    fn position_at(&mut self, t: f64) -> Option<(f64, f64)>;
}

/// Deterministic pointer tracing a drifting Lissajous figure
///
/// Speed varies slowly over time so the streamed features are not constant.
#[derive(Debug, Clone)]
pub struct SyntheticPointer {
    center: (f64, f64),
    amplitude: (f64, f64),
    /// Angular frequencies in radians per second
    omega: (f64, f64),
    phase: f64,
    last: Option<(f64, f64)>,
}

impl Default for SyntheticPointer {
    fn default() -> Self {
        Self {
            center: (960.0, 540.0),
            amplitude: (400.0, 250.0),
            omega: (0.9, 1.3),
            phase: std::f64::consts::FRAC_PI_4,
            last: None,
        }
    }
}

impl SyntheticPointer {
    pub fn new(center: (f64, f64), amplitude: (f64, f64), omega: (f64, f64)) -> Self {
        Self {
            center,
            amplitude,
            omega,
            ..Self::default()
        }
    }
}

impl MotionSource for SyntheticPointer {
    fn position_at(&mut self, t: f64) -> Option<(f64, f64)> {
        // Warp time so the pointer alternates between fast and slow passes
        let warped = t + 0.8 * (0.25 * t).sin();
        let x = self.center.0 + self.amplitude.0 * (self.omega.0 * warped).sin();
        let y = self.center.1 + self.amplitude.1 * (self.omega.1 * warped + self.phase).sin();
        let position = (x.round(), y.round());

        if self.last == Some(position) {
            return None;
        }
        self.last = Some(position);
        Some(position)
    }
}

/// Poll `source` at `rate_hz` and record each movement in `window`
///
/// Runs until the task is dropped.
pub async fn run_sampler<M: MotionSource>(
    mut source: M,
    window: Arc<RwLock<SampleWindow>>,
    rate_hz: u32,
) {
    let period = Duration::from_secs_f64(1.0 / f64::from(rate_hz.max(1)));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::info!(rate_hz = rate_hz, "Pointer sampler started");

    loop {
        ticker.tick().await;
        let now = epoch_secs();
        if let Some((x, y)) = source.position_at(now) {
            window.write().await.push(Sample::new(now, x, y));
        }
    }
}

/// Current time in fractional seconds since the Unix epoch
pub fn epoch_secs() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_pointer_is_deterministic() {
        let mut a = SyntheticPointer::default();
        let mut b = SyntheticPointer::default();
        for i in 0..20 {
            let t = 1_700_000_000.0 + i as f64 * 0.05;
            assert_eq!(a.position_at(t), b.position_at(t));
        }
    }

    #[test]
    fn test_stationary_pointer_reports_nothing() {
        let mut pointer = SyntheticPointer::default();
        assert!(pointer.position_at(10.0).is_some());
        assert!(pointer.position_at(10.0).is_none());
    }

    #[test]
    fn test_stays_within_amplitude() {
        let mut pointer = SyntheticPointer::new((0.0, 0.0), (100.0, 50.0), (1.0, 2.0));
        for i in 0..500 {
            if let Some((x, y)) = pointer.position_at(i as f64 * 0.013) {
                assert!(x.abs() <= 100.0);
                assert!(y.abs() <= 50.0);
            }
        }
    }

    #[tokio::test]
    async fn test_sampler_fills_window() {
        let window = Arc::new(RwLock::new(SampleWindow::default()));
        let task = tokio::spawn(run_sampler(
            SyntheticPointer::default(),
            Arc::clone(&window),
            200,
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;
        task.abort();

        assert!(window.read().await.len() >= 2);
    }
}
