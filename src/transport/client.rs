//! WebSocket Client
//!
//! Connects to the telemetry source and forwards its lifecycle as
//! [`TransportEvent`]s. There is no reconnection: once `Closed` has been sent
//! the session is over.

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::error::{TransportError, TransportResult};
use super::events::TransportEvent;

/// Address of the local telemetry agent
pub const TELEMETRY_URL: &str = "ws://localhost:8765";

/// Run one telemetry session against `url`
///
/// Emits `Open`, then one `Message` per text frame, and always finishes with
/// exactly one `Closed`. A failed connect or receive is reported as `Error`
/// before the close and also returned.
pub async fn connect(
    url: &str,
    events: mpsc::UnboundedSender<TransportEvent>,
) -> TransportResult<()> {
    tracing::info!(url = %url, "Connecting to telemetry source");

    let (mut stream, _response) = match connect_async(url).await {
        Ok(connected) => connected,
        Err(e) => {
            tracing::error!(url = %url, error = %e, "WebSocket connect failed");
            let _ = events.send(TransportEvent::Error(e.to_string()));
            let _ = events.send(TransportEvent::Closed);
            return Err(TransportError::Connect {
                url: url.to_string(),
                error: e.to_string(),
            });
        }
    };

    emit(&events, TransportEvent::Open)?;

    let mut outcome = Ok(());

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if let Err(e) = emit(&events, TransportEvent::Message(text)) {
                    outcome = Err(e);
                    break;
                }
            }
            Ok(Message::Binary(data)) => {
                tracing::debug!(bytes = data.len(), "Ignoring binary frame");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => {}
            Ok(Message::Close(frame)) => {
                tracing::debug!(frame = ?frame, "Server closed connection");
                break;
            }
            Err(e) => {
                tracing::debug!(error = %e, "WebSocket receive error");
                let _ = events.send(TransportEvent::Error(e.to_string()));
                outcome = Err(TransportError::Receive(e.to_string()));
                break;
            }
        }
    }

    let _ = events.send(TransportEvent::Closed);
    tracing::info!(url = %url, "Telemetry session ended");
    outcome
}

/// Start a session on a background task
///
/// The receiver yields the session's events in order.
pub fn spawn(
    url: impl Into<String>,
) -> (
    JoinHandle<TransportResult<()>>,
    mpsc::UnboundedReceiver<TransportEvent>,
) {
    let url = url.into();
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move { connect(&url, tx).await });
    (handle, rx)
}

fn emit(
    events: &mpsc::UnboundedSender<TransportEvent>,
    event: TransportEvent,
) -> TransportResult<()> {
    events.send(event).map_err(|_| TransportError::ChannelClosed)
}
