//! Unified event loop that merges crossterm terminal events, catalog worker
//! events, and a fixed-rate tick into a single async stream.

use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::catalog::types::CatalogEvent;

/// Unified event type consumed by the TUI main loop.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed (`Press` kind only).
    Key(KeyEvent),
    /// Terminal was resized to `(width, height)`.
    #[allow(dead_code)]
    Resize(u16, u16),
    /// Animation / debounce tick.
    Tick,
    /// An event from the catalog worker task.
    Catalog(CatalogEvent),
}

pub struct EventHandler {
    crossterm_stream: EventStream,
    tick_interval: tokio::time::Interval,
    catalog_rx: mpsc::Receiver<CatalogEvent>,
}

impl EventHandler {
    pub fn new(catalog_rx: mpsc::Receiver<CatalogEvent>) -> Self {
        let tick_ms = crate::config::get().general.tick_rate_ms;
        let mut tick_interval = tokio::time::interval(Duration::from_millis(tick_ms));
        // Don't try to "catch up" missed ticks.
        tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        Self {
            crossterm_stream: EventStream::new(),
            tick_interval,
            catalog_rx,
        }
    }

    /// Await the next event from any source.
    pub async fn next(&mut self) -> Result<Event> {
        loop {
            tokio::select! {
                // ── Catalog responses (highest priority) ────────────────
                Some(catalog_event) = self.catalog_rx.recv() => {
                    return Ok(Event::Catalog(catalog_event));
                }

                // ── Terminal events ─────────────────────────────────────
                Some(ct_result) = self.crossterm_stream.next() => {
                    match ct_result? {
                        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                            return Ok(Event::Key(key));
                        }
                        CrosstermEvent::Resize(w, h) => return Ok(Event::Resize(w, h)),
                        // Swallow key release/repeat and mouse events.
                        _ => continue,
                    }
                }

                _ = self.tick_interval.tick() => {
                    return Ok(Event::Tick);
                }
            }
        }
    }
}
