//! Telemetry View Dashboard
//!
//! Run with: cargo run --bin telemetry-view
//!
//! Connects to the telemetry agent at `ws://localhost:8765` and shows the
//! latest payload next to a rolling chart of mean pointer speed. Use
//! `--plain` to print frames to stdout instead of opening the dashboard.

use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use telemetry_view::config::{generate_default_config, Config};
use telemetry_view::logging::{self, LogTarget};
use telemetry_view::telemetry::TelemetryView;
use telemetry_view::transport::{self, TELEMETRY_URL};
use telemetry_view::ui;

#[derive(Parser)]
#[command(name = "telemetry-view")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Real-time dashboard for pointer-motion telemetry")]
struct Cli {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print frames to stdout instead of drawing the dashboard
    #[arg(long)]
    plain: bool,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let search = match &cli.config {
        Some(path) => Config::load_explicit(path)?,
        None => Config::load_default(),
    };
    let config = &search.config;

    let plain = cli.plain || !std::io::stdout().is_terminal();
    let target = if plain {
        LogTarget::from_config(&config.logging)
    } else {
        LogTarget::file_from_config(&config.logging)
    };
    logging::init(&config.logging, target)?;

    tracing::info!("Telemetry View v{}", env!("CARGO_PKG_VERSION"));
    search.report();

    let (transport_handle, mut events) = transport::spawn(TELEMETRY_URL);
    let mut view = TelemetryView::new();

    let result = if plain {
        let mut stdout = std::io::stdout().lock();
        ui::plain::run(&mut view, &mut events, &mut stdout).await
    } else {
        ui::terminal::run(&mut view, &mut events, config.dashboard.tick_rate()).await
    };

    transport_handle.abort();

    tracing::info!(
        messages = view.messages_received(),
        rejected = view.frames_rejected(),
        "Telemetry View stopped"
    );
    result
}
