//! # Telemetry View
//!
//! A real-time terminal dashboard for pointer-motion telemetry. It connects
//! to a local agent over WebSocket, mirrors each JSON frame as text, and
//! keeps a rolling 50-point chart of `mean_speed`.
//!
//! ## Modules
//!
//! - [`telemetry`]: view state, display buffer and message handling
//! - [`transport`]: WebSocket client producing lifecycle events
//! - [`ui`]: terminal dashboard and plain-text surfaces
//! - [`agent`]: development telemetry producer
//! - [`config`]: TOML configuration with environment overrides
//! - [`logging`]: tracing subscriber setup
//!
//! ## Quick Start
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
//!         println!("{} ({} points)", view.status(), view.buffer().len());
//!         if done {
//!             break;
//!         }
//!     }
//! }
//! ```

pub mod agent;
pub mod config;
pub mod logging;
pub mod telemetry;
pub mod transport;
pub mod ui;

// Re-export top-level types for convenience
pub use telemetry::{
    ConnectionState, DisplayBuffer, TelemetryMessage, TelemetryView, ViewError, ViewResult,
    DISPLAY_CAPACITY,
};

pub use transport::{TransportError, TransportEvent, TransportResult, TELEMETRY_URL};

pub use agent::{AgentError, AgentState, Features, SampleWindow};

pub use config::{AgentConfig, Config, ConfigError, ConfigSearch, DashboardConfig, LoggingConfig};
