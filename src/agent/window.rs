//! Sample Window
//!
//! Time-bounded buffer of pointer positions. Unlike the dashboard's display
//! buffer this one is trimmed by age, not by count.

use std::collections::VecDeque;
use std::time::Duration;

/// Default span of the sliding window
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(5);

/// One pointer position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since the Unix epoch
    pub ts: f64,
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(ts: f64, x: f64, y: f64) -> Self {
        Self { ts, x, y }
    }
}

/// Pointer samples from the last `span` seconds
#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<Sample>,
    span: Duration,
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl SampleWindow {
    pub fn new(span: Duration) -> Self {
        Self {
            samples: VecDeque::new(),
            span,
        }
    }

    /// Record a sample and drop everything older than `span` before it
    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);

        let cutoff = sample.ts - self.span.as_secs_f64();
        while let Some(front) = self.samples.front() {
            if front.ts < cutoff {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Copy of the current contents, oldest first
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn span(&self) -> Duration {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_span() {
        let window = SampleWindow::default();
        assert_eq!(window.span(), Duration::from_secs(5));
        assert!(window.is_empty());
    }

    #[test]
    fn test_drops_samples_older_than_span() {
        let mut window = SampleWindow::new(Duration::from_secs(5));
        window.push(Sample::new(100.0, 0.0, 0.0));
        window.push(Sample::new(103.0, 1.0, 1.0));
        window.push(Sample::new(105.0, 2.0, 2.0));
        assert_eq!(window.len(), 3);

        window.push(Sample::new(106.5, 3.0, 3.0));
        let ts: Vec<f64> = window.snapshot().iter().map(|s| s.ts).collect();
        assert_eq!(ts, vec![103.0, 105.0, 106.5]);
    }

    #[test]
    fn test_sample_exactly_at_cutoff_is_kept() {
        let mut window = SampleWindow::new(Duration::from_secs(2));
        window.push(Sample::new(10.0, 0.0, 0.0));
        window.push(Sample::new(12.0, 0.0, 0.0));
        assert_eq!(window.len(), 2);
    }
}
