//! Terminal Event Loop
//!
//! Owns the terminal for the lifetime of the dashboard. Transport events,
//! key presses and redraw ticks are handled one at a time on a single task.

use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use tokio::sync::mpsc;

use super::dashboard;
use crate::telemetry::TelemetryView;
use crate::transport::TransportEvent;

type Backend = CrosstermBackend<Stdout>;

/// Restores the terminal when dropped, including on early return
struct TerminalGuard {
    terminal: Terminal<Backend>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                restore(&mut io::stdout());
                Err(e)
            }
        }
    }
}

/// Leave raw mode and the alternate screen, ignoring failures
fn restore<W: Write>(out: &mut W) {
    let _ = disable_raw_mode();
    let _ = execute!(out, LeaveAlternateScreen);
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore(self.terminal.backend_mut());
        let _ = self.terminal.show_cursor();
    }
}

/// Run the dashboard until the user quits
///
/// The transport closing does not end the loop; the disconnected status
/// stays on screen until the user leaves.
pub async fn run(
    view: &mut TelemetryView,
    events: &mut mpsc::UnboundedReceiver<TransportEvent>,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let mut input = EventStream::new();
    let mut ticker = tokio::time::interval(tick_rate);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut transport_live = true;
    let mut dirty = true;

    loop {
        tokio::select! {
            event = events.recv(), if transport_live => match event {
                Some(event) => {
                    view.apply(event);
                    dirty = true;
                }
                None => {
                    tracing::debug!("Transport event channel closed");
                    transport_live = false;
                }
            },
            key = input.next() => match key {
                Some(Ok(Event::Key(key))) if is_quit(&key) => {
                    tracing::info!("Quit requested");
                    break;
                }
                Some(Ok(Event::Resize(..))) => dirty = true,
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            _ = ticker.tick() => {
                if dirty {
                    guard.terminal.draw(|f| dashboard::draw(f, view))?;
                    dirty = false;
                }
            }
        }
    }

    Ok(())
}

/// `q`, `Esc` or `Ctrl-C`
pub fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));

        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }

    #[cfg(unix)]
    #[test]
    fn test_restore_leaves_alternate_screen() {
        let mut out = Vec::new();
        restore(&mut out);
        assert!(String::from_utf8_lossy(&out).contains("\x1b[?1049l"));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(!is_quit(&key));
    }
}
