//! Telemetry Message
//!
//! Inbound frames are kept as untyped JSON. Only `timestamp` and
//! `mean_speed` are read, and neither is validated.
//!
//! Parsing follows `serde_json`'s limits: numbers outside the `f64` range and
//! documents nested deeper than 128 levels are malformed frames.

use chrono::{TimeZone, Utc};
use serde_json::{Number, Value};

use super::error::{ViewError, ViewResult};

/// Label shown for a point whose timestamp cannot be interpreted
pub const INVALID_DATE: &str = "Invalid Date";

/// Format used for chart labels (local time of day)
pub const TIME_LABEL_FORMAT: &str = "%H:%M:%S";

/// A single parsed telemetry frame
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryMessage {
    document: Value,
}

impl TelemetryMessage {
    /// Parse a raw text frame
    pub fn parse(raw: &str) -> ViewResult<Self> {
        let document = serde_json::from_str(raw)?;
        Ok(Self { document })
    }

    /// The parsed document as received
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Two-space indented rendering of the document, keys in arrival order
    ///
    /// Whole-number floats print without a fraction (`3.0` shows as `3`).
    pub fn pretty(&self) -> ViewResult<String> {
        let mut display = self.document.clone();
        normalize_numbers(&mut display);
        serde_json::to_string_pretty(&display)
            .map_err(|e| ViewError::Serialization(e.to_string()))
    }

    /// Epoch milliseconds, if `timestamp` is a JSON number
    pub fn timestamp_millis(&self) -> Option<f64> {
        self.document.get("timestamp").and_then(Value::as_f64)
    }

    /// The `mean_speed` field as received; `null` when absent
    pub fn mean_speed(&self) -> Value {
        self.document
            .get("mean_speed")
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Chart label for this message in the given timezone
    pub fn label_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        match self.timestamp_millis() {
            Some(millis) => time_label(millis, tz),
            None => INVALID_DATE.to_string(),
        }
    }
}

/// 2^64, the first float no integer type can hold
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

fn normalize_numbers(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            if let Some(whole) = n.as_f64().and_then(whole_number) {
                *n = whole;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_numbers),
        Value::Object(map) => map.values_mut().for_each(normalize_numbers),
        _ => {}
    }
}

fn whole_number(f: f64) -> Option<Number> {
    if f.fract() != 0.0 {
        return None;
    }
    if (0.0..U64_LIMIT).contains(&f) {
        Some(Number::from(f as u64))
    } else if (i64::MIN as f64..0.0).contains(&f) {
        Some(Number::from(f as i64))
    } else {
        None
    }
}

/// Format epoch milliseconds as a time-of-day label in `tz`
///
/// Fractional milliseconds are truncated. Values outside chrono's
/// representable range produce [`INVALID_DATE`].
pub fn time_label<Tz>(millis: f64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return INVALID_DATE.to_string();
    }

    match Utc.timestamp_millis_opt(millis.trunc() as i64).single() {
        Some(utc) => utc
            .with_timezone(tz)
            .format(TIME_LABEL_FORMAT)
            .to_string(),
        None => INVALID_DATE.to_string(),
    }
}
