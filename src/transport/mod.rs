//! Telemetry Transport
//!
//! WebSocket client for the local telemetry agent at
//! [`TELEMETRY_URL`]. Each text frame is one JSON document; the client does
//! not interpret it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use telemetry_view::telemetry::TelemetryView;
//! use telemetry_view::transport::{self, TELEMETRY_URL};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (_handle, mut events) = transport::spawn(TELEMETRY_URL);
//!     let mut view = TelemetryView::new();
//!
//!     while let Some(event) = events.recv().await {
//!         let done = event.is_terminal();
//!         view.apply(event);
//!         if done {
//!             break;
//!         }
//!     }
//! }
//! ```

mod client;
mod error;
mod events;

pub use client::{connect, spawn, TELEMETRY_URL};
pub use error::{TransportError, TransportResult};
pub use events::TransportEvent;
