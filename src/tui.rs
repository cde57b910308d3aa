use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, EventStream, KeyEventKind,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::event::Event;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn init() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    install_panic_hook();
    Terminal::new(CrosstermBackend::new(io::stdout())).context("Failed to create terminal")
}

pub fn restore() -> Result<()> {
    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Put the terminal back before the default hook prints the panic.
fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        original(info);
    }));
}

/// Merges terminal input with a periodic tick on one channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick = tokio::time::interval(Duration::from_millis(tick_rate_ms));
            loop {
                let event = tokio::select! {
                    () = token.cancelled() => break,
                    _ = tick.tick() => Event::Tick,
                    maybe = reader.next() => match maybe {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            Event::Key(key)
                        }
                        Some(Ok(CrosstermEvent::Mouse(mouse)))
                            if matches!(
                                mouse.kind,
                                MouseEventKind::ScrollDown | MouseEventKind::ScrollUp
                            ) =>
                        {
                            Event::Mouse(mouse)
                        }
                        Some(Ok(CrosstermEvent::Resize(_, _))) => Event::Resize,
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            debug!(error = %e, "terminal event stream error");
                            break;
                        }
                        None => break,
                    },
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, cancel }
    }

    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .context("Terminal event stream closed")
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
