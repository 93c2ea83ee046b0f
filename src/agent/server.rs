//! Agent WebSocket Server
//!
//! Serves the telemetry stream on `/`. Each connection gets a greeting frame
//! and then a feature report every `send_interval` while the window holds
//! enough samples.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::error::{AgentError, AgentResult};
use super::features::compute_features;
use super::messages::AgentMessage;
use super::window::SampleWindow;

/// Default pause between feature reports
pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_secs(2);

/// Shared state for all agent connections
#[derive(Clone)]
pub struct AgentState {
    window: Arc<RwLock<SampleWindow>>,
    send_interval: Duration,
}

impl AgentState {
    pub fn new(window: SampleWindow, send_interval: Duration) -> Self {
        Self {
            window: Arc::new(RwLock::new(window)),
            send_interval,
        }
    }

    /// Handle to the window, for the sampler task
    pub fn window(&self) -> Arc<RwLock<SampleWindow>> {
        Arc::clone(&self.window)
    }

    pub fn send_interval(&self) -> Duration {
        self.send_interval
    }
}

/// Build the agent router
pub fn build_router(state: AgentState) -> Router {
    Router::new()
        .route("/", get(agent_ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C or SIGTERM
pub async fn serve(listener: TcpListener, state: AgentState) -> AgentResult<()> {
    serve_until(listener, state, shutdown_signal()).await
}

/// Serve until `signal` resolves
pub async fn serve_until<F>(listener: TcpListener, state: AgentState, signal: F) -> AgentResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Telemetry agent listening on ws://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(signal)
        .await
        .map_err(|e| AgentError::Server(e.to_string()))?;

    tracing::info!("Telemetry agent shut down gracefully");
    Ok(())
}

async fn agent_ws_handler(ws: WebSocketUpgrade, State(state): State<AgentState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Stream telemetry to one dashboard until either side goes away
async fn handle_socket(socket: WebSocket, state: AgentState) {
    let connection_id = Uuid::new_v4().to_string();
    tracing::info!(connection_id = %connection_id, "Dashboard connected");

    let (mut sender, mut receiver) = socket.split();

    let greeting = AgentMessage::greeting(now_millis());
    if let Err(e) = send_frame(&mut sender, &greeting).await {
        tracing::error!(connection_id = %connection_id, error = %e, "Failed to send greeting");
        return;
    }

    let window = state.window();
    let send_interval = state.send_interval();
    let conn_id_for_send = connection_id.clone();

    let mut send_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(send_interval);
        loop {
            ticker.tick().await;

            let samples = window.read().await.snapshot();
            let Some(features) = compute_features(&samples, now_millis()) else {
                continue;
            };

            if let Err(e) = send_frame(&mut sender, &AgentMessage::Features(features)).await {
                tracing::debug!(
                    connection_id = %conn_id_for_send,
                    error = %e,
                    "WebSocket send failed, closing connection"
                );
                break;
            }
        }
    });

    let conn_id_for_recv = connection_id.clone();

    // Dashboards never send anything meaningful; only watch for the close
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(
                        connection_id = %conn_id_for_recv,
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    tracing::info!(connection_id = %connection_id, "Dashboard disconnected");
}

async fn send_frame(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &AgentMessage,
) -> AgentResult<()> {
    let text = message.to_json()?;
    sender
        .send(Message::Text(text))
        .await
        .map_err(|e| AgentError::Server(e.to_string()))
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::window::Sample;
    use crate::agent::GREETING_MESSAGE;
    use tokio::time::timeout;
    use tokio_tungstenite::{connect_async, tungstenite::Message as ClientMessage};

    async fn start(state: AgentState) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_until(listener, state, std::future::pending()));
        format!("ws://{}/", addr)
    }

    async fn next_text<S>(stream: &mut S) -> serde_json::Value
    where
        S: futures_util::Stream<Item = Result<ClientMessage, tokio_tungstenite::tungstenite::Error>>
            + Unpin,
    {
        loop {
            let msg = timeout(Duration::from_secs(5), stream.next())
                .await
                .expect("timed out waiting for frame")
                .expect("stream ended")
                .expect("receive error");
            if let ClientMessage::Text(text) = msg {
                return serde_json::from_str(&text).unwrap();
            }
        }
    }

    #[test]
    fn test_default_send_interval() {
        assert_eq!(DEFAULT_SEND_INTERVAL, Duration::from_secs(2));
        let state = AgentState::new(SampleWindow::default(), DEFAULT_SEND_INTERVAL);
        assert_eq!(state.send_interval(), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_greeting_then_features() {
        let mut window = SampleWindow::new(Duration::from_secs(3600));
        let now = crate::agent::epoch_secs();
        window.push(Sample::new(now - 1.0, 0.0, 0.0));
        window.push(Sample::new(now - 0.5, 30.0, 40.0));
        window.push(Sample::new(now, 60.0, 80.0));

        let url = start(AgentState::new(window, Duration::from_millis(20))).await;
        let (mut stream, _) = connect_async(url).await.unwrap();

        let greeting = next_text(&mut stream).await;
        assert_eq!(greeting["status"], "connected");
        assert_eq!(greeting["message"], GREETING_MESSAGE);
        assert!(greeting["timestamp"].is_i64());

        let features = next_text(&mut stream).await;
        assert_eq!(features["sample_count"], 3);
        assert!((features["mean_speed"].as_f64().unwrap() - 100.0).abs() < 1e-3);
        assert_eq!(features["direction_changes"], 0);
    }

    #[tokio::test]
    async fn test_no_features_without_samples() {
        let url = start(AgentState::new(SampleWindow::default(), Duration::from_millis(10))).await;
        let (mut stream, _) = connect_async(url).await.unwrap();

        let greeting = next_text(&mut stream).await;
        assert_eq!(greeting["status"], "connected");

        let next = timeout(Duration::from_millis(100), stream.next()).await;
        assert!(next.is_err(), "expected no frame while window is empty");
    }
}
