//! Telemetry View
//!
//! Owns everything the dashboard shows: connection state, status text, the
//! JSON text panel and the rolling chart buffer. Handlers run to completion
//! one at a time; the owner of the view is the only thread that touches it.

use chrono::Local;
use std::fmt;

use super::buffer::DisplayBuffer;
use super::error::ViewResult;
use super::message::TelemetryMessage;
use crate::transport::TransportEvent;

pub const STATUS_CONNECTING: &str = "Connecting to telemetry agent...";
pub const STATUS_CONNECTED: &str = "Connected to telemetry agent";
pub const STATUS_DISCONNECTED: &str = "Disconnected from telemetry agent";

/// Transport lifecycle as seen by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    /// Terminal for the session
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Open => write!(f, "open"),
            ConnectionState::Closed => write!(f, "closed"),
        }
    }
}

/// Live dashboard state for one transport session
#[derive(Debug)]
pub struct TelemetryView {
    state: ConnectionState,
    status: String,
    text: String,
    buffer: DisplayBuffer,
    /// Bumped on every buffer mutation
    revision: u64,
    messages_received: u64,
    frames_rejected: u64,
}

impl Default for TelemetryView {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryView {
    pub fn new() -> Self {
        Self::with_buffer(DisplayBuffer::default())
    }

    /// Create a view over a caller-supplied buffer
    pub fn with_buffer(buffer: DisplayBuffer) -> Self {
        Self {
            state: ConnectionState::Connecting,
            status: STATUS_CONNECTING.to_string(),
            text: String::new(),
            buffer,
            revision: 0,
            messages_received: 0,
            frames_rejected: 0,
        }
    }

    /// Transport opened
    pub fn on_connect(&mut self) {
        if self.state == ConnectionState::Closed {
            tracing::debug!("Ignoring open event after close");
            return;
        }
        self.state = ConnectionState::Open;
        self.status = STATUS_CONNECTED.to_string();
        tracing::info!("Telemetry connection open");
    }

    /// Handle one inbound text frame
    ///
    /// A frame that is not JSON leaves the view untouched and returns the
    /// parse error. Everything else is accepted without validation.
    pub fn on_message(&mut self, raw: &str) -> ViewResult<()> {
        if self.state == ConnectionState::Closed {
            tracing::debug!("Ignoring frame received after close");
            return Ok(());
        }

        let message = match TelemetryMessage::parse(raw) {
            Ok(message) => message,
            Err(e) => {
                self.frames_rejected += 1;
                return Err(e);
            }
        };
        let text = message.pretty()?;
        let label = message.label_in(&Local);
        let value = message.mean_speed();

        self.text = text;
        if let Some((evicted, _)) = self.buffer.push(label, value) {
            tracing::trace!(label = %evicted, "Evicted oldest chart point");
        }
        self.revision += 1;
        self.messages_received += 1;

        tracing::debug!(
            points = self.buffer.len(),
            revision = self.revision,
            "Telemetry frame applied"
        );
        Ok(())
    }

    /// Transport closed; no reconnection follows
    pub fn on_disconnect(&mut self) {
        if self.state != ConnectionState::Closed {
            tracing::info!(
                messages = self.messages_received,
                rejected = self.frames_rejected,
                "Telemetry connection closed"
            );
        }
        self.state = ConnectionState::Closed;
        self.status = STATUS_DISCONNECTED.to_string();
    }

    /// Transport reported an error; the close that follows updates status
    pub fn on_transport_error(&mut self, error: &str) {
        tracing::warn!(error = %error, "Telemetry transport error");
    }

    /// Dispatch one transport event to its handler
    ///
    /// Malformed frames are logged and skipped.
    pub fn apply(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Open => self.on_connect(),
            TransportEvent::Message(raw) => {
                if let Err(e) = self.on_message(&raw) {
                    tracing::warn!(error = %e, frame = %raw, "Skipping telemetry frame");
                }
            }
            TransportEvent::Error(error) => self.on_transport_error(&error),
            TransportEvent::Closed => self.on_disconnect(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Pretty-printed payload of the latest message
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn messages_received(&self) -> u64 {
        self.messages_received
    }

    pub fn frames_rejected(&self) -> u64 {
        self.frames_rejected
    }
}
