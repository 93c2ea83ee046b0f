//! Development Telemetry Agent
//!
//! The producer side of the telemetry socket. A sampler task records pointer
//! positions into a time-bounded [`SampleWindow`]; every connected dashboard
//! receives a greeting, then periodic [`Features`] computed over the window.
//!
//! ## Wire format
//!
//! ```text
//! {"timestamp":1700000000000,"status":"connected","message":"Hello from telemetry agent, ..."}
//! {"timestamp":1700000002000,"sample_count":118,"mean_speed":412.7,"std_speed":96.1,"jitter":1.6,"direction_changes":4}
//! ```
//!
//! ## Features
//!
//! - `mean_speed`, `std_speed`: pixels per second between consecutive samples
//! - `jitter`: spread of per-step distances
//! - `direction_changes`: heading changes larger than 30°
//! - `sample_count`: samples in the window

mod error;
mod features;
mod messages;
mod motion;
mod server;
mod window;

pub use error::{AgentError, AgentResult};
pub use features::{compute_features, Features, DIRECTION_CHANGE_DEGREES};
pub use messages::{AgentMessage, GREETING_MESSAGE};
pub use motion::{epoch_secs, run_sampler, MotionSource, SyntheticPointer};
pub use server::{build_router, serve, serve_until, AgentState, DEFAULT_SEND_INTERVAL};
pub use window::{Sample, SampleWindow, DEFAULT_WINDOW};
