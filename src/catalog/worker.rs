//! Async catalog worker task.
//!
//! Owns the `CatalogClient`. Listens for `CatalogCommand`s from the UI and
//! emits `CatalogEvent`s back. Each request runs in its own task: requests
//! are independent, and a newer one never cancels one already in flight.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::client::CatalogClient;
use super::types::*;

/// The main worker entry point. Runs until the command channel is closed
/// (i.e. the TUI exits).
pub async fn run(
    client: CatalogClient,
    mut cmd_rx: mpsc::Receiver<CatalogCommand>,
    evt_tx: mpsc::Sender<CatalogEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        handle_command(cmd, &client, &evt_tx);
    }
    debug!("Command channel closed, catalog worker exiting");
}

fn handle_command(
    cmd: CatalogCommand,
    client: &CatalogClient,
    evt_tx: &mpsc::Sender<CatalogEvent>,
) {
    let client = client.clone();
    let evt_tx = evt_tx.clone();

    match cmd {
        CatalogCommand::LoadGenres => {
            tokio::spawn(async move {
                match client.fetch_genres().await {
                    Ok(genres) => {
                        info!("Loaded {} genres", genres.len());
                        let _ = evt_tx.send(CatalogEvent::Genres(genres)).await;
                    }
                    // Logged only; the UI keeps offering "All Genres".
                    Err(e) => warn!("Genre list fetch failed: {e}"),
                }
            });
        }

        CatalogCommand::FetchMovies(query) => {
            tokio::spawn(async move {
                let result = client.fetch_movies(&query).await.map_err(|e| {
                    warn!(page = query.page, search = %query.search, "Movie fetch failed: {e}");
                    e.user_message()
                });
                if let Ok(movies) = &result {
                    debug!(count = movies.len(), page = query.page, "Movie page loaded");
                }
                let _ = evt_tx.send(CatalogEvent::Movies { query, result }).await;
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    fn keyless_client() -> CatalogClient {
        let config = CatalogConfig {
            base_url: "https://api.themoviedb.org/3".into(),
            image_base_url: "https://image.tmdb.org/t/p/w500".into(),
            api_key: None,
            request_timeout: None,
            default_sort: SortKey::PopularityDesc,
        };
        CatalogClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn movie_failure_comes_back_as_user_message() {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (evt_tx, mut evt_rx) = mpsc::channel(4);
        tokio::spawn(run(keyless_client(), cmd_rx, evt_tx));

        let query = MovieQuery::default();
        cmd_tx
            .send(CatalogCommand::FetchMovies(query.clone()))
            .await
            .unwrap();

        match evt_rx.recv().await {
            Some(CatalogEvent::Movies { query: q, result }) => {
                assert_eq!(q, query);
                let message = result.unwrap_err();
                assert!(message.starts_with("Failed to fetch movies."));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn genre_failure_emits_nothing() {
        let (cmd_tx, cmd_rx) = mpsc::channel(4);
        let (evt_tx, mut evt_rx) = mpsc::channel(4);
        tokio::spawn(run(keyless_client(), cmd_rx, evt_tx));

        cmd_tx.send(CatalogCommand::LoadGenres).await.unwrap();
        drop(cmd_tx);

        // The worker and its spawned task exit without sending anything, so
        // the channel closes.
        assert!(evt_rx.recv().await.is_none());
    }
}
