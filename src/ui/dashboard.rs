//! Dashboard Layout
//!
//! Status line on top, the latest payload on the left, the mean-speed chart
//! on the right.

use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
};

use crate::telemetry::{ConnectionState, DisplayBuffer, TelemetryView};

pub const CHART_TITLE: &str = "Mean Speed (px/s)";

const SERIES_COLOR: Color = Color::Blue;

/// Render the whole dashboard
pub fn draw(f: &mut Frame, view: &TelemetryView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // status
            Constraint::Min(8),    // body
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_status(f, rows[0], view);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    draw_payload(f, cols[0], view);
    draw_chart(f, cols[1], view.buffer());
    draw_keys(f, rows[2]);
}

fn status_style(state: ConnectionState) -> Style {
    match state {
        ConnectionState::Connecting => Style::default().fg(Color::Yellow),
        ConnectionState::Open => Style::default().fg(Color::Green),
        ConnectionState::Closed => Style::default().fg(Color::Red),
    }
}

fn draw_status(f: &mut Frame, area: Rect, view: &TelemetryView) {
    let mut spans = vec![Span::styled(
        view.status().to_string(),
        status_style(view.state()).bold(),
    )];

    if let Some(label) = view.buffer().latest_label() {
        spans.push(Span::styled(
            format!("  last frame {}", label),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if view.frames_rejected() > 0 {
        spans.push(Span::styled(
            format!("  {} malformed", view.frames_rejected()),
            Style::default().fg(Color::Magenta),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Telemetry View ");
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_payload(f: &mut Frame, area: Rect, view: &TelemetryView) {
    let block = Block::default().borders(Borders::ALL).title(" Payload ");

    let paragraph = if view.text().is_empty() {
        Paragraph::new("Waiting for telemetry...").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(view.text().to_string())
    };

    f.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), area);
}

fn draw_chart(f: &mut Frame, area: Rect, buffer: &DisplayBuffer) {
    let runs = series_runs(buffer);
    let datasets: Vec<Dataset> = runs
        .iter()
        .enumerate()
        .map(|(i, run)| {
            let dataset = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLOR))
                .data(run);
            // One legend entry for the whole series
            if i == 0 {
                dataset.name(CHART_TITLE)
            } else {
                dataset
            }
        })
        .collect();

    let [y_min, y_max] = y_bounds(buffer);
    let x_axis = Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds(x_bounds(buffer));
    let y_axis = Axis::default()
        .style(Style::default().fg(Color::DarkGray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("{:.0}", y_min)),
            Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
            Span::raw(format!("{:.0}", y_max)),
        ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", CHART_TITLE));
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis);

    f.render_widget(chart, area);
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let keys = Line::from(vec![
        Span::styled(" q ", Style::default().bold().fg(Color::Black).bg(Color::Cyan)),
        Span::raw(" quit  "),
        Span::styled(" Esc ", Style::default().bold().fg(Color::Black).bg(Color::Cyan)),
        Span::raw(" quit"),
    ]);
    f.render_widget(Paragraph::new(keys), area);
}

/// Contiguous numeric runs of the series, indexed by buffer slot
///
/// Non-numeric values break the line so they show up as gaps.
pub fn series_runs(buffer: &DisplayBuffer) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for (i, value) in buffer.numeric().into_iter().enumerate() {
        match value {
            Some(v) => current.push((i as f64, v)),
            None => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

/// X range covering the full display window
pub fn x_bounds(buffer: &DisplayBuffer) -> [f64; 2] {
    [0.0, buffer.capacity().saturating_sub(1).max(1) as f64]
}

/// Y range padded around the numeric values, never degenerate
pub fn y_bounds(buffer: &DisplayBuffer) -> [f64; 2] {
    match buffer.value_range() {
        None => [0.0, 1.0],
        Some((lo, hi)) => {
            let pad = ((hi - lo) * 0.1).max(1.0);
            let floor = if lo >= 0.0 { (lo - pad).max(0.0) } else { lo - pad };
            [floor, hi + pad]
        }
    }
}
