//! Telemetry Agent
//!
//! Run with: cargo run --bin telemetry-agent
//!
//! Development producer for the dashboard. Streams pointer-motion features
//! from a synthetic pointer on `ws://localhost:8765`.
//!
//! # Configuration
//!
//! The `[agent]` and `[logging]` sections of the config file, or:
//! - `TELEMETRY_AGENT_WINDOW_SECS`: Sample window span (default: 5)
//! - `TELEMETRY_AGENT_SEND_INTERVAL_SECS`: Report interval (default: 2)
//! - `TELEMETRY_AGENT_SAMPLE_RATE_HZ`: Pointer polling rate (default: 60)
//! - `RUST_LOG`: Log filter (default: info)

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use telemetry_view::agent::{run_sampler, serve, AgentState, SampleWindow, SyntheticPointer};
use telemetry_view::config::Config;
use telemetry_view::logging::{self, LogTarget};

/// Address the dashboard connects to
const AGENT_ADDR: &str = "localhost:8765";

#[derive(Parser)]
#[command(name = "telemetry-agent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Development telemetry producer for telemetry-view")]
struct Cli {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let search = match &cli.config {
        Some(path) => Config::load_explicit(path)?,
        None => Config::load_default(),
    };
    let config = &search.config;
    logging::init(&config.logging, LogTarget::from_config(&config.logging))?;

    tracing::info!("Starting telemetry agent v{}", env!("CARGO_PKG_VERSION"));
    search.report();
    tracing::info!(
        window = ?config.agent.window(),
        send_interval = ?config.agent.send_interval(),
        sample_rate_hz = config.agent.sample_rate_hz,
        "Agent settings"
    );

    let state = AgentState::new(
        SampleWindow::new(config.agent.window()),
        config.agent.send_interval(),
    );

    let sampler = tokio::spawn(run_sampler(
        SyntheticPointer::default(),
        state.window(),
        config.agent.sample_rate_hz,
    ));

    let listener = TcpListener::bind(AGENT_ADDR).await?;
    let result = serve(listener, state).await;

    sampler.abort();
    tracing::info!("Telemetry agent stopped");

    result.map_err(Into::into)
}
