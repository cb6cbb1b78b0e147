//! Event bus for the TUI.
//!
//! User input, timer ticks, and background-task results are normalised into
//! a single [`AppEvent`] enum and sent over a tokio unbounded MPSC channel.
//! The main loop receives from this channel, updates the [`App`](crate::app::App),
//! and redraws.
//!
//! Background gateway tasks get a clone of the sender and report back as
//! [`AppEvent::Task`]; the pump task below feeds ticks and crossterm input.

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::tasks::TaskOutcome;

/// All events the application can receive from any source.
#[derive(Debug)]
pub enum AppEvent {
    /// A key press from the terminal (`KeyEventKind::Press` only; release
    /// and repeat events are filtered so Windows does not double-fire).
    Key(KeyEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// Timer tick for state updates (toast expiry, log refresh).
    Tick,
    /// Result of a background gateway task.
    Task(TaskOutcome),
}

/// Holds the sender and receiver ends of the unified event channel.
///
/// The sender (`tx`) is cloned and handed to background tasks; the receiver
/// (`rx`) is owned by the main event loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    /// A fresh unbounded channel. Producers run at hardware/timer rate and
    /// the main loop always keeps up, so no backpressure is needed.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the pump task feeding ticks and crossterm input into the channel.
///
/// `reader.next().fuse()` keeps `tokio::select!` safe if the crossterm
/// stream ever terminates. A failed send means the receiver is gone and
/// the task exits.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>, tick_rate: Duration) {
    tokio::spawn(async move {
        let mut ticks = interval(tick_rate);
        let mut reader = EventStream::new();

        loop {
            let tick = ticks.tick();
            let crossterm_event = reader.next().fuse();

            tokio::select! {
                _ = tick => {
                    if tx.send(AppEvent::Tick).is_err() {
                        break;
                    }
                }
                maybe_event = crossterm_event => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) => {
                            if key.kind == KeyEventKind::Press
                                && tx.send(AppEvent::Key(key)).is_err()
                            {
                                break;
                            }
                        }
                        Some(Ok(Event::Resize(w, h))) => {
                            if tx.send(AppEvent::Resize(w, h)).is_err() {
                                break;
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    });
}
