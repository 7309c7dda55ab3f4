//! Line input multiplexed with interrupts.
//!
//! Stdin is read on a dedicated thread so a pending read never holds up
//! the runtime; Ctrl+C is turned into a message instead of killing the
//! process, so the session can decide between operations what to do.

use std::io::{BufRead, Write};

use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Something the session has to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    Interrupted,
    /// Stdin reached end of file.
    Closed,
}

pub struct Input {
    events: mpsc::UnboundedReceiver<InputEvent>,
    closed: bool,
}

impl Input {
    /// Start the stdin reader thread and the interrupt listener.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn() -> Self {
        let (tx, events) = mpsc::unbounded_channel();

        let lines = tx.clone();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if lines.send(InputEvent::Line(line.trim().to_string())).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to read stdin");
                        break;
                    }
                }
            }
            debug!("stdin closed");
            let _ = lines.send(InputEvent::Closed);
        });

        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if tx.send(InputEvent::Interrupted).is_err() {
                    break;
                }
            }
        });

        Self {
            events,
            closed: false,
        }
    }

    /// Input that replays `events`, then reports `Closed`.
    #[cfg(test)]
    pub fn scripted(events: impl IntoIterator<Item = InputEvent>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        for event in events {
            let _ = tx.send(event);
        }
        Self {
            events: rx,
            closed: false,
        }
    }

    /// Wait for the next line or interrupt. Cancel safe; once stdin is
    /// closed every call returns `Closed` right away.
    pub async fn next(&mut self) -> InputEvent {
        if self.closed {
            return InputEvent::Closed;
        }
        match self.events.recv().await {
            Some(InputEvent::Closed) | None => {
                self.closed = true;
                InputEvent::Closed
            }
            Some(event) => event,
        }
    }

    /// Print `question` and wait for the answer.
    pub async fn prompt(&mut self, question: &str) -> InputEvent {
        print!("{question}");
        if let Err(e) = std::io::stdout().flush() {
            warn!(error = %e, "failed to flush prompt");
        }
        self.next().await
    }
}
