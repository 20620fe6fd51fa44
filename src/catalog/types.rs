//! Channel message types and plain-data records shared between the UI thread
//! and the catalog worker task. Nothing here holds an HTTP handle, so the TUI
//! thread stays free of network concerns.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Catalog genre identifier (e.g. `28` = Action).
pub type GenreId = u32;

// ─── Sort keys ──────────────────────────────────────────────────────────────

/// The fixed set of orderings the discover endpoint understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    PopularityDesc,
    PopularityAsc,
    ReleaseDateDesc,
    ReleaseDateAsc,
    RatingDesc,
    RatingAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::PopularityDesc,
        SortKey::PopularityAsc,
        SortKey::ReleaseDateDesc,
        SortKey::ReleaseDateAsc,
        SortKey::RatingDesc,
        SortKey::RatingAsc,
    ];

    /// Value sent as the `sort_by` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            SortKey::PopularityDesc => "popularity.desc",
            SortKey::PopularityAsc => "popularity.asc",
            SortKey::ReleaseDateDesc => "release_date.desc",
            SortKey::ReleaseDateAsc => "release_date.asc",
            SortKey::RatingDesc => "vote_average.desc",
            SortKey::RatingAsc => "vote_average.asc",
        }
    }

    /// Human-readable label for the header.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::PopularityDesc => "Popularity Descending",
            SortKey::PopularityAsc => "Popularity Ascending",
            SortKey::ReleaseDateDesc => "Release Date Descending",
            SortKey::ReleaseDateAsc => "Release Date Ascending",
            SortKey::RatingDesc => "Rating Descending",
            SortKey::RatingAsc => "Rating Ascending",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    /// The next key in the list, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// The previous key in the list, wrapping around.
    pub fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_param() == s)
            .ok_or_else(|| format!("unknown sort key \"{s}\""))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

// ─── Query state ────────────────────────────────────────────────────────────

/// Everything that determines the next movie fetch. Two equal queries never
/// produce two fetches in a row; see `App::poll_fetch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieQuery {
    pub search: String,
    pub sort: SortKey,
    pub genre: Option<GenreId>,
    /// 1-based page cursor.
    pub page: u32,
}

impl Default for MovieQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort: SortKey::default(),
            genre: None,
            page: 1,
        }
    }
}

impl MovieQuery {
    pub fn with_sort(sort: SortKey) -> Self {
        Self {
            sort,
            ..Self::default()
        }
    }

    /// Replace the search text. The page is left alone.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
    }

    /// Change the ordering and go back to page 1.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 1;
    }

    /// Change the genre filter and go back to page 1.
    pub fn set_genre(&mut self, genre: Option<GenreId>) {
        self.genre = genre;
        self.page = 1;
    }

    /// No upper bound: the catalog never reports a page count we rely on.
    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// Floored at 1.
    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }
}

// ─── Catalog records ────────────────────────────────────────────────────────

/// A single movie as returned by the discover/search endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<GenreId>,
}

/// The catalog sends `null` for unknown values; treat it like a missing key.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

impl Movie {
    fn parsed_release_date(&self) -> Option<NaiveDate> {
        let raw = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    pub fn release_year(&self) -> Option<i32> {
        self.parsed_release_date().map(|d| d.year())
    }

    /// Long form, e.g. `Fri Jul 16 2010`.
    pub fn release_date_display(&self) -> String {
        self.parsed_release_date()
            .map(|d| d.format("%a %b %d %Y").to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn rating_display(&self) -> String {
        format!("{:.1}", self.vote_average)
    }

    pub fn overview_text(&self) -> &str {
        self.overview.as_deref().unwrap_or_default()
    }
}

/// A genre entry from the genre-list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Genre lookup, kept in catalog order so the filter cycles predictably.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreSet {
    genres: Vec<Genre>,
}

impl GenreSet {
    pub fn new(genres: Vec<Genre>) -> Self {
        Self { genres }
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn name_of(&self, id: GenreId) -> Option<&str> {
        self.genres
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.as_str())
    }

    /// Resolve ids to names joined by `", "`. Unknown ids are skipped.
    pub fn names_for(&self, ids: &[GenreId]) -> String {
        ids.iter()
            .filter_map(|id| self.name_of(*id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn index_of(&self, id: Option<GenreId>) -> Option<usize> {
        id.and_then(|id| self.genres.iter().position(|g| g.id == id))
    }

    /// Cycle forward: All Genres → first → … → last → All Genres.
    pub fn next_after(&self, current: Option<GenreId>) -> Option<GenreId> {
        let next = match self.index_of(current) {
            None => 0,
            Some(i) => i + 1,
        };
        self.genres.get(next).map(|g| g.id)
    }

    /// Cycle backward: All Genres → last → … → first → All Genres.
    pub fn previous_before(&self, current: Option<GenreId>) -> Option<GenreId> {
        match self.index_of(current) {
            None => self.genres.last().map(|g| g.id),
            Some(0) => None,
            Some(i) => self.genres.get(i - 1).map(|g| g.id),
        }
    }

    /// Header label for a filter value.
    pub fn label_for(&self, id: Option<GenreId>) -> String {
        match id {
            None => "All Genres".to_string(),
            Some(id) => self
                .name_of(id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Genre #{id}")),
        }
    }
}

// ─── UI → Worker commands ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum CatalogCommand {
    /// Fetch the genre list (issued once at startup).
    LoadGenres,
    /// Fetch one page of movies for this query.
    FetchMovies(MovieQuery),
}

// ─── Worker → UI events ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum CatalogEvent {
    /// Genre list arrived. Failures never produce this event.
    Genres(GenreSet),
    /// A movie fetch finished. `query` is the query that was requested, which
    /// may no longer be the current one.
    Movies {
        query: MovieQuery,
        result: Result<Vec<Movie>, String>,
    },
}
