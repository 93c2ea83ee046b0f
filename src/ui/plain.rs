//! Plain Text Surface
//!
//! Line-oriented rendering for pipes and non-interactive terminals: status
//! changes and each payload are written as they arrive.

use std::io::Write;
use tokio::sync::mpsc;

use crate::telemetry::TelemetryView;
use crate::transport::TransportEvent;

/// Mirror the session to `out` until the transport closes
pub async fn run<W: Write>(
    view: &mut TelemetryView,
    events: &mut mpsc::UnboundedReceiver<TransportEvent>,
    out: &mut W,
) -> anyhow::Result<()> {
    writeln!(out, "{}", view.status())?;

    while let Some(event) = events.recv().await {
        let done = event.is_terminal();
        render_event(view, event, out)?;
        if done {
            break;
        }
    }

    out.flush()?;
    Ok(())
}

/// Apply one event and write whatever it changed
pub fn render_event<W: Write>(
    view: &mut TelemetryView,
    event: TransportEvent,
    out: &mut W,
) -> std::io::Result<()> {
    let state_before = view.state();
    let revision_before = view.revision();

    view.apply(event);

    if view.state() != state_before {
        writeln!(out, "{}", view.status())?;
    }
    if view.revision() != revision_before {
        writeln!(out, "{}", view.text())?;
        let latest = view
            .buffer()
            .values()
            .last()
            .map(|v| v.to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "-- {} {} ({}/{} points)",
            view.buffer().latest_label().unwrap_or_default(),
            latest,
            view.buffer().len(),
            view.buffer().capacity()
        )?;
    }

    Ok(())
}
