//! reelview: browse, search, sort and filter the TMDB movie catalog from the
//! terminal.
//!
//! Architecture:
//! - **UI thread** (main): runs the ratatui render loop and owns `App`.
//! - **Catalog worker** (tokio task): owns the HTTP client and spawns one
//!   task per request.
//! - Two `mpsc` channels bridge them: `CatalogCommand` (UI→Worker) and
//!   `CatalogEvent` (Worker→UI).
//!
//! The UI thread never touches the network. The worker never touches the
//! terminal.

mod app;
mod catalog;
mod config;
mod event;
mod logging;
mod theme;
mod tui;
mod ui;

use std::time::Instant;

use color_eyre::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use app::{App, AppAction};
use catalog::client::CatalogClient;
use catalog::types::CatalogCommand;
use event::Event;

#[tokio::main]
async fn main() -> Result<()> {
    // ── Error handling, logging & config ────────────────────────────────
    color_eyre::install()?;
    let _log_guard = logging::init()?;
    config::init()?;

    info!("reelview starting");

    // ── Channel setup ───────────────────────────────────────────────────
    let (cmd_tx, cmd_rx) = mpsc::channel::<CatalogCommand>(32);
    let (evt_tx, evt_rx) = mpsc::channel(64);

    // ── Spawn catalog worker ────────────────────────────────────────────
    let client = CatalogClient::new(&config::get().catalog)?;
    tokio::spawn(catalog::worker::run(client, cmd_rx, evt_tx));

    // Genres are loaded once and never refreshed.
    cmd_tx.send(CatalogCommand::LoadGenres).await?;

    // ── Initialise terminal ─────────────────────────────────────────────
    let mut terminal = tui::init()?;

    let mut app = App::new();
    app.on_resize(terminal.size()?.width);
    let mut events = event::EventHandler::new(evt_rx);

    // ── Main event loop ─────────────────────────────────────────────────
    while app.running {
        // Any change to the derived query starts exactly one fetch.
        if let Some(query) = app.poll_fetch(Instant::now()) {
            if cmd_tx.send(CatalogCommand::FetchMovies(query)).await.is_err() {
                warn!("Catalog worker is gone; fetch dropped");
            }
        }

        terminal.draw(|frame| ui::render(frame, &app))?;

        match events.next().await? {
            Event::Key(key) => match app.handle_key(key) {
                AppAction::Quit => app.running = false,
                AppAction::Consumed => {}
            },
            Event::Tick => app.on_tick(),
            Event::Catalog(catalog_event) => app.handle_catalog_event(catalog_event),
            Event::Resize(width, _) => app.on_resize(width),
        }
    }

    // ── Cleanup ─────────────────────────────────────────────────────────
    tui::restore()?;
    info!("reelview exiting");
    Ok(())
}
