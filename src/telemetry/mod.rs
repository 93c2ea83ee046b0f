//! Telemetry View State
//!
//! The dashboard's model: inbound frames are parsed into
//! [`TelemetryMessage`]s, mirrored as pretty-printed text, and fed into a
//! 50-point [`DisplayBuffer`] that backs the mean-speed chart.
//!
//! ## Example
//!
//! ```rust
//! use telemetry_view::telemetry::{ConnectionState, TelemetryView};
//!
//! let mut view = TelemetryView::new();
//! view.on_connect();
//! view.on_message(r#"{"timestamp": 1700000000000, "mean_speed": 3.2}"#).unwrap();
//!
//! assert_eq!(view.state(), ConnectionState::Open);
//! assert_eq!(view.buffer().len(), 1);
//! ```

mod buffer;
mod error;
mod message;
mod view;

pub use buffer::{DisplayBuffer, DISPLAY_CAPACITY};
pub use error::{ViewError, ViewResult};
pub use message::{time_label, TelemetryMessage, INVALID_DATE, TIME_LABEL_FORMAT};
pub use view::{
    ConnectionState, TelemetryView, STATUS_CONNECTED, STATUS_CONNECTING, STATUS_DISCONNECTED,
};
