//! Display Buffer
//!
//! Fixed-capacity rolling window of chart points. Labels and values live in
//! two index-aligned deques so a surface can hand them to a chart as-is.

use serde_json::Value;
use std::collections::VecDeque;

/// Number of points visible on the chart
pub const DISPLAY_CAPACITY: usize = 50;

/// Rolling (label, value) series with FIFO eviction
#[derive(Debug, Clone)]
pub struct DisplayBuffer {
    labels: VecDeque<String>,
    values: VecDeque<Value>,
    capacity: usize,
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new(DISPLAY_CAPACITY)
    }
}

impl DisplayBuffer {
    /// Create an empty buffer holding at most `capacity` points
    pub fn new(capacity: usize) -> Self {
        Self {
            labels: VecDeque::with_capacity(capacity + 1),
            values: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a point, evicting the oldest one if the buffer overflows
    ///
    /// Returns the evicted point, if any.
    pub fn push(&mut self, label: String, value: Value) -> Option<(String, Value)> {
        self.labels.push_back(label);
        self.values.push_back(value);

        if self.labels.len() > self.capacity {
            match (self.labels.pop_front(), self.values.pop_front()) {
                (Some(label), Some(value)) => Some((label, value)),
                _ => None,
            }
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Labels, oldest first
    pub fn labels(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.labels.iter().map(String::as_str)
    }

    /// Values as received, oldest first
    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> + '_ {
        self.values.iter()
    }

    /// Points, oldest first
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.labels.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Numeric view of the series; `None` marks a gap
    pub fn numeric(&self) -> Vec<Option<f64>> {
        self.values.iter().map(Value::as_f64).collect()
    }

    /// Label of the newest point
    pub fn latest_label(&self) -> Option<&str> {
        self.labels.back().map(String::as_str)
    }

    /// Smallest and largest numeric value currently held
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter_map(Value::as_f64)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
