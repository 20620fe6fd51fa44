//! Application state and input handling.
//!
//! `App` is the single source of truth for the entire TUI. It is only mutated
//! from the main event loop, so no `Arc<Mutex<>>` is needed.
//!
//! Fetching is driven by one rule: after every event the main loop calls
//! [`App::poll_fetch`], which compares the current [`MovieQuery`] with the
//! last one requested. Any difference starts a new fetch.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::catalog::types::*;
use crate::theme::ThemeMode;
use crate::ui::movie_grid;

// ─── Input modes ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Grid navigation and query controls.
    Normal,
    /// `/` search: keys edit the search text, live.
    Search,
    /// A popup is displayed.
    Dialog,
}

// ─── Popup types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Popup {
    /// Detail overlay for one movie, with slide-in progress (0.0 → 1.0).
    Detail { movie: Movie, slide: f32 },
    Help,
}

// ─── Fetch state machine ────────────────────────────────────────────────────

/// Lifecycle of the movie page currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    /// Nothing requested yet.
    Idle,
    Loading,
    Loaded,
    /// The last fetch failed; the message is shown instead of the grid.
    Error(String),
}

// ─── Actions produced by input handling ─────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    /// Event consumed. Any query change is picked up by `poll_fetch`.
    Consumed,
}

// ─── App state ──────────────────────────────────────────────────────────────

pub struct App {
    /// Search text, sort, genre filter and page.
    pub query: MovieQuery,
    pub fetch: FetchState,
    /// Current page of results, in catalog order.
    pub movies: Vec<Movie>,
    pub genres: GenreSet,
    /// Cursor into `movies`.
    pub selected_index: usize,
    /// Cards per grid row at the current terminal width.
    pub grid_columns: usize,
    pub theme_mode: ThemeMode,
    pub input_mode: InputMode,
    pub active_popup: Option<Popup>,
    /// Monotonic tick counter for animations.
    pub tick_count: u64,
    pub running: bool,
    /// The query of the most recent fetch issued.
    last_requested: Option<MovieQuery>,
    /// Set by search edits while debouncing is on.
    search_edited_at: Option<Instant>,
    debounce: Duration,
}

impl App {
    pub fn new() -> Self {
        let config = crate::config::get();
        Self {
            query: MovieQuery::with_sort(config.catalog.default_sort),
            fetch: FetchState::Idle,
            movies: Vec::new(),
            genres: GenreSet::default(),
            selected_index: 0,
            grid_columns: 1,
            theme_mode: ThemeMode::from_dark_flag(config.general.dark_mode),
            input_mode: InputMode::Normal,
            active_popup: None,
            tick_count: 0,
            running: true,
            last_requested: None,
            search_edited_at: None,
            debounce: config.search.debounce,
        }
    }

    #[cfg(test)]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    // ── Derived views ───────────────────────────────────────────────────

    /// The movie under the grid cursor.
    pub fn current_movie(&self) -> Option<&Movie> {
        self.movies.get(self.selected_index)
    }

    /// The movie shown in the detail overlay, if one is open.
    pub fn selected_movie(&self) -> Option<&Movie> {
        match &self.active_popup {
            Some(Popup::Detail { movie, .. }) => Some(movie),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.fetch == FetchState::Loading
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.fetch {
            FetchState::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn genre_label(&self) -> String {
        self.genres.label_for(self.query.genre)
    }

    fn clamp_selection(&mut self) {
        let len = self.movies.len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    // ── Fetch trigger ───────────────────────────────────────────────────

    /// Decide whether the current query needs fetching. Returns the query to
    /// send and enters `Loading`, or `None` when nothing changed (or a search
    /// edit is still inside the debounce window).
    pub fn poll_fetch(&mut self, now: Instant) -> Option<MovieQuery> {
        if self.last_requested.as_ref() == Some(&self.query) {
            self.search_edited_at = None;
            return None;
        }
        if let Some(edited_at) = self.search_edited_at {
            if now.saturating_duration_since(edited_at) < self.debounce {
                return None;
            }
        }
        self.search_edited_at = None;
        self.last_requested = Some(self.query.clone());
        self.fetch = FetchState::Loading;
        Some(self.query.clone())
    }

    /// Bookkeeping after any input that may have changed the query.
    fn query_edited(&mut self, by_search: bool) {
        self.selected_index = 0;
        self.search_edited_at = if by_search && !self.debounce.is_zero() {
            Some(Instant::now())
        } else {
            None
        };
    }

    // ── Worker events ───────────────────────────────────────────────────

    pub fn handle_catalog_event(&mut self, event: CatalogEvent) {
        match event {
            CatalogEvent::Genres(genres) => {
                self.genres = genres;
            }

            CatalogEvent::Movies { query, result } => {
                // Responses are applied in arrival order, even late ones.
                if self.last_requested.as_ref() != Some(&query) {
                    debug!(page = query.page, search = %query.search, "Applying stale movie response");
                }
                match result {
                    Ok(movies) => {
                        self.movies = movies;
                        self.fetch = FetchState::Loaded;
                        self.clamp_selection();
                    }
                    Err(message) => {
                        self.movies.clear();
                        self.selected_index = 0;
                        self.fetch = FetchState::Error(message);
                    }
                }
            }
        }
    }

    // ── Ticks and resizes ───────────────────────────────────────────────

    pub fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);

        if let Some(Popup::Detail { slide, .. }) = &mut self.active_popup {
            if *slide < 1.0 {
                let speed = crate::config::get().notifications.slide_speed;
                *slide = (*slide + speed).min(1.0);
            }
        }
    }

    /// Recompute the grid column count for a terminal of this width.
    pub fn on_resize(&mut self, width: u16) {
        self.grid_columns = movie_grid::columns_for(movie_grid::inner_width(width));
    }

    // ── Input handling ──────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        // Ctrl+C always quits (system convention, non-configurable).
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return AppAction::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Search => self.handle_search_key(key),
            InputMode::Dialog => self.handle_dialog_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> AppAction {
        let kb = &crate::config::get().keys;
        let len = self.movies.len();
        let cols = self.grid_columns.max(1);

        match key.code {
            c if c == kb.quit => return AppAction::Quit,

            // ── Grid navigation ─────────────────────────────────────────
            c if c == kb.nav_right || c == KeyCode::Right => {
                if len > 0 {
                    self.selected_index = (self.selected_index + 1).min(len - 1);
                }
            }
            c if c == kb.nav_left || c == KeyCode::Left => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            c if c == kb.nav_down || c == KeyCode::Down => {
                if self.selected_index + cols < len {
                    self.selected_index += cols;
                }
            }
            c if c == kb.nav_up || c == KeyCode::Up => {
                if self.selected_index >= cols {
                    self.selected_index -= cols;
                }
            }
            c if c == kb.jump_top => self.selected_index = 0,
            c if c == kb.jump_bottom => self.selected_index = len.saturating_sub(1),

            // ── Detail / help ───────────────────────────────────────────
            c if c == kb.open_detail => {
                if let Some(movie) = self.current_movie().cloned() {
                    self.active_popup = Some(Popup::Detail { movie, slide: 0.0 });
                    self.input_mode = InputMode::Dialog;
                }
            }
            c if c == kb.help => {
                self.active_popup = Some(Popup::Help);
                self.input_mode = InputMode::Dialog;
            }

            // ── Query controls ──────────────────────────────────────────
            c if c == kb.search => self.input_mode = InputMode::Search,
            c if c == kb.sort_next => {
                self.query.set_sort(self.query.sort.next());
                self.query_edited(false);
            }
            c if c == kb.sort_prev => {
                self.query.set_sort(self.query.sort.prev());
                self.query_edited(false);
            }
            // Without a genre list there is nothing to cycle through.
            c if c == kb.genre_next && !self.genres.is_empty() => {
                self.query.set_genre(self.genres.next_after(self.query.genre));
                self.query_edited(false);
            }
            c if c == kb.genre_prev && !self.genres.is_empty() => {
                self.query
                    .set_genre(self.genres.previous_before(self.query.genre));
                self.query_edited(false);
            }
            c if c == kb.page_next => {
                self.query.next_page();
                self.query_edited(false);
            }
            c if c == kb.page_prev => {
                if self.query.page > 1 {
                    self.query.previous_page();
                    self.query_edited(false);
                }
            }

            c if c == kb.toggle_theme => self.theme_mode = self.theme_mode.toggled(),

            _ => {}
        }
        AppAction::Consumed
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                if !self.query.search.is_empty() {
                    self.query.set_search("");
                    self.query_edited(false);
                }
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                if !self.query.search.is_empty() {
                    self.query.pop_search_char();
                    self.query_edited(true);
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.query.push_search_char(c);
                self.query_edited(true);
            }
            _ => {}
        }
        AppAction::Consumed
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) -> AppAction {
        let help = crate::config::get().keys.help;
        let is_help = matches!(self.active_popup, Some(Popup::Help));
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.close_popup(),
            c if is_help && c == help => self.close_popup(),
            _ => {}
        }
        AppAction::Consumed
    }

    fn close_popup(&mut self) {
        self.active_popup = None;
        self.input_mode = InputMode::Normal;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) -> AppAction {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.into(),
            original_title: None,
            poster_path: Some(format!("/{id}.jpg")),
            release_date: Some("1999-03-31".into()),
            vote_average: 8.2,
            overview: Some("A hacker learns the truth.".into()),
            genre_ids: vec![28, 878],
        }
    }

    fn loaded(app: &mut App, movies: Vec<Movie>) {
        let query = app.poll_fetch(Instant::now()).unwrap_or_else(|| app.query.clone());
        app.handle_catalog_event(CatalogEvent::Movies {
            query,
            result: Ok(movies),
        });
    }

    fn genres() -> GenreSet {
        GenreSet::new(vec![
            Genre { id: 28, name: "Action".into() },
            Genre { id: 12, name: "Adventure".into() },
        ])
    }

    #[test]
    fn initial_poll_starts_loading_discover_page_one() {
        let mut app = App::new();
        assert_eq!(app.fetch, FetchState::Idle);

        let query = app.poll_fetch(Instant::now()).expect("initial fetch");
        assert_eq!(query, MovieQuery::default());
        assert_eq!(app.fetch, FetchState::Loading);

        // Same query again: nothing to do.
        assert_eq!(app.poll_fetch(Instant::now()), None);
    }

    #[test]
    fn success_replaces_movies_and_enters_loaded() {
        let mut app = App::new();
        loaded(&mut app, vec![movie(1, "A"), movie(2, "B")]);
        assert_eq!(app.fetch, FetchState::Loaded);
        assert_eq!(app.movies.len(), 2);

        press(&mut app, KeyCode::Char('n'));
        loaded(&mut app, vec![movie(3, "C")]);
        assert_eq!(app.movies, vec![movie(3, "C")]);
    }

    #[test]
    fn failure_enters_error_and_clears_grid() {
        let mut app = App::new();
        loaded(&mut app, vec![movie(1, "A")]);

        press(&mut app, KeyCode::Char('n'));
        let query = app.poll_fetch(Instant::now()).unwrap();
        app.handle_catalog_event(CatalogEvent::Movies {
            query,
            result: Err("Failed to fetch movies. Network error".into()),
        });

        assert!(app.movies.is_empty());
        assert_eq!(
            app.error_message(),
            Some("Failed to fetch movies. Network error")
        );
        assert!(!app.is_loading());
    }

    #[test]
    fn error_recovers_on_next_query_change() {
        let mut app = App::new();
        let query = app.poll_fetch(Instant::now()).unwrap();
        app.handle_catalog_event(CatalogEvent::Movies {
            query,
            result: Err("Failed to fetch movies.".into()),
        });

        press(&mut app, KeyCode::Char('s'));
        assert!(app.poll_fetch(Instant::now()).is_some());
        assert!(app.is_loading());
    }

    #[test]
    fn every_search_keystroke_triggers_a_fetch() {
        let mut app = App::new();
        app.poll_fetch(Instant::now());

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);

        for (typed, expected) in [('d', "d"), ('u', "du"), ('n', "dun")] {
            press(&mut app, KeyCode::Char(typed));
            let query = app.poll_fetch(Instant::now()).expect("fetch per keystroke");
            assert_eq!(query.search, expected);
        }

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.poll_fetch(Instant::now()), None);
    }

    #[test]
    fn search_escape_clears_text() {
        let mut app = App::new();
        app.poll_fetch(Instant::now());
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('x'));
        app.poll_fetch(Instant::now());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.query.search, "");
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.poll_fetch(Instant::now()).is_some());
    }

    #[test]
    fn debounce_holds_search_fetches() {
        let mut app = App::new().with_debounce(Duration::from_millis(300));
        app.poll_fetch(Instant::now());

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.poll_fetch(Instant::now()), None);

        let later = Instant::now() + Duration::from_millis(400);
        let query = app.poll_fetch(later).expect("fires after quiet period");
        assert_eq!(query.search, "ab");
    }

    #[test]
    fn debounce_never_delays_sort_changes() {
        let mut app = App::new().with_debounce(Duration::from_secs(5));
        app.poll_fetch(Instant::now());
        press(&mut app, KeyCode::Char('s'));
        assert!(app.poll_fetch(Instant::now()).is_some());
    }

    #[test]
    fn sort_and_genre_reset_page_but_search_does_not() {
        let mut app = App::new();
        app.genres = genres();

        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.query.page, 3);

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('z'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.query.page, 3);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.query.sort, SortKey::PopularityAsc);
        assert_eq!(app.query.page, 1);

        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.query.genre, Some(28));
        assert_eq!(app.query.page, 1);
        assert_eq!(app.genre_label(), "Action");

        press(&mut app, KeyCode::Char('F'));
        assert_eq!(app.query.genre, None);
        assert_eq!(app.genre_label(), "All Genres");
    }

    #[test]
    fn previous_page_floors_at_one() {
        let mut app = App::new();
        app.poll_fetch(Instant::now());
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.query.page, 1);
        assert_eq!(app.poll_fetch(Instant::now()), None);

        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.query.page, 1);
    }

    #[test]
    fn next_page_ignores_result_count() {
        let mut app = App::new();
        loaded(&mut app, Vec::new());
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.query.page, 2);
    }

    #[test]
    fn stale_response_still_overwrites() {
        let mut app = App::new();
        let first = app.poll_fetch(Instant::now()).unwrap();
        press(&mut app, KeyCode::Char('n'));
        let second = app.poll_fetch(Instant::now()).unwrap();

        app.handle_catalog_event(CatalogEvent::Movies {
            query: second,
            result: Ok(vec![movie(2, "Page two")]),
        });
        app.handle_catalog_event(CatalogEvent::Movies {
            query: first,
            result: Ok(vec![movie(1, "Page one")]),
        });
        assert_eq!(app.movies[0].title, "Page one");
    }

    #[test]
    fn detail_opens_and_closes_without_touching_fetch() {
        let mut app = App::new();
        loaded(&mut app, vec![movie(1, "A"), movie(2, "B")]);
        app.grid_columns = 2;

        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selected_movie().map(|m| m.id), Some(2));
        assert_eq!(app.input_mode, InputMode::Dialog);

        press(&mut app, KeyCode::Esc);
        assert!(app.selected_movie().is_none());
        assert_eq!(app.fetch, FetchState::Loaded);
        assert_eq!(app.poll_fetch(Instant::now()), None);
    }

    #[test]
    fn enter_on_empty_grid_opens_nothing() {
        let mut app = App::new();
        loaded(&mut app, Vec::new());
        press(&mut app, KeyCode::Enter);
        assert!(app.active_popup.is_none());
    }

    #[test]
    fn grid_navigation_moves_by_rows() {
        let mut app = App::new();
        loaded(&mut app, (1..=7).map(|i| movie(i, "M")).collect());
        app.grid_columns = 3;

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_index, 3);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_index, 6);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_index, 6);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.selected_index, 3);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.selected_index, 6);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.selected_index, 0);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn theme_toggle_is_cosmetic() {
        let mut app = App::new();
        app.poll_fetch(Instant::now());
        let before = app.theme_mode;
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme_mode, before.toggled());
        assert_eq!(app.poll_fetch(Instant::now()), None);
    }

    #[test]
    fn quit_keys() {
        let mut app = App::new();
        assert_eq!(press(&mut app, KeyCode::Char('q')), AppAction::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        app.input_mode = InputMode::Search;
        assert_eq!(app.handle_key(ctrl_c), AppAction::Quit);
    }

    #[test]
    fn genres_event_fills_lookup() {
        let mut app = App::new();
        app.handle_catalog_event(CatalogEvent::Genres(genres()));
        assert_eq!(app.genres.names_for(&[28, 12]), "Action, Adventure");
    }

    #[test]
    fn detail_slides_in_on_ticks() {
        let mut app = App::new();
        loaded(&mut app, vec![movie(1, "A")]);
        press(&mut app, KeyCode::Enter);
        for _ in 0..200 {
            app.on_tick();
        }
        match &app.active_popup {
            Some(Popup::Detail { slide, .. }) => assert_eq!(*slide, 1.0),
            other => panic!("expected detail popup, got {other:?}"),
        }
    }
}
