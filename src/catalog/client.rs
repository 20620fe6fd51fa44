//! HTTP client for the movie catalog API.
//!
//! Builds exactly one request per query and decodes one page of results.
//! No caching, no retries, no backoff: a failure is handed straight back to
//! the caller.

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::types::{Genre, GenreSet, Movie, MovieQuery};
use crate::config::CatalogConfig;

/// Headline shown for every failed movie fetch.
pub const FETCH_FAILURE: &str = "Failed to fetch movies.";

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid catalog URL: {0}")]
    InvalidUrl(String),

    #[error("no catalog API key configured")]
    MissingApiKey,
}

impl CatalogError {
    /// Text for the error banner in place of the grid.
    pub fn user_message(&self) -> String {
        let detail = match self {
            CatalogError::Http(e) if e.is_timeout() => "The request timed out.".to_string(),
            CatalogError::Http(e) => format!("Network error: {e}"),
            CatalogError::Status { status, message } => {
                format!("The catalog answered HTTP {status}: {message}")
            }
            CatalogError::Decode(_) => "Unexpected response from the catalog.".to_string(),
            CatalogError::InvalidUrl(url) => format!("Invalid catalog URL: {url}"),
            CatalogError::MissingApiKey => {
                "No API key configured (set TMDB_API_KEY or catalog.api_key).".to_string()
            }
        };
        format!("{FETCH_FAILURE} {detail}")
    }
}

// ─── Requests ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Discover,
    Search,
    GenreList,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Discover => "/discover/movie",
            Endpoint::Search => "/search/movie",
            Endpoint::GenreList => "/genre/movie/list",
        }
    }
}

/// An endpoint plus its query parameters, minus the credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    pub endpoint: Endpoint,
    pub params: Vec<(&'static str, String)>,
}

impl CatalogRequest {
    #[allow(dead_code)]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Join the image base and a poster path with exactly one slash.
pub fn poster_url(image_base: &str, poster_path: &str) -> String {
    format!(
        "{}/{}",
        image_base.trim_end_matches('/'),
        poster_path.trim_start_matches('/')
    )
}

// ─── Response bodies ────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct MoviePage {
    #[serde(default)]
    results: Vec<Movie>,
}

#[derive(Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Deserialize)]
struct StatusBody {
    status_message: Option<String>,
}

pub fn parse_movie_page(body: &str) -> Result<Vec<Movie>, CatalogError> {
    let page: MoviePage = serde_json::from_str(body)?;
    Ok(page.results)
}

pub fn parse_genre_list(body: &str) -> Result<GenreSet, CatalogError> {
    let list: GenreList = serde_json::from_str(body)?;
    Ok(GenreSet::new(list.genres))
}

/// Prefer the catalog's own `status_message`, else the raw body.
fn status_message(body: &str) -> String {
    serde_json::from_str::<StatusBody>(body)
        .ok()
        .and_then(|b| b.status_message)
        .unwrap_or_else(|| body.trim().to_string())
}

// ─── Client ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("reelview/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Discover when the search text is empty, search otherwise. The sort key
    /// is sent to both even though search may ignore it.
    pub fn request_for(query: &MovieQuery) -> CatalogRequest {
        let mut params = Vec::with_capacity(4);
        let endpoint = if query.search.is_empty() {
            Endpoint::Discover
        } else {
            params.push(("query", query.search.clone()));
            Endpoint::Search
        };
        params.push(("sort_by", query.sort.as_param().to_string()));
        params.push(("page", query.page.to_string()));
        if let Some(genre) = query.genre {
            params.push(("with_genres", genre.to_string()));
        }
        CatalogRequest { endpoint, params }
    }

    pub fn genre_request() -> CatalogRequest {
        CatalogRequest {
            endpoint: Endpoint::GenreList,
            params: Vec::new(),
        }
    }

    /// Full URL: base + endpoint path, `api_key` first, then the parameters.
    pub fn url_for(&self, request: &CatalogRequest) -> Result<Url, CatalogError> {
        let api_key = self.api_key.as_deref().ok_or(CatalogError::MissingApiKey)?;
        let raw = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            request.endpoint.path()
        );
        let mut url = Url::parse(&raw).map_err(|e| CatalogError::InvalidUrl(format!("{raw}: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", api_key);
            for (name, value) in &request.params {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    async fn get(&self, request: &CatalogRequest) -> Result<String, CatalogError> {
        let url = self.url_for(request)?;
        debug!(endpoint = request.endpoint.path(), params = ?request.params, "catalog request");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: status_message(&body),
            });
        }
        Ok(body)
    }

    pub async fn fetch_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>, CatalogError> {
        let body = self.get(&Self::request_for(query)).await?;
        parse_movie_page(&body)
    }

    pub async fn fetch_genres(&self) -> Result<GenreSet, CatalogError> {
        let body = self.get(&Self::genre_request()).await?;
        parse_genre_list(&body)
    }
}
