//! Movie catalog client for the TMDB REST API.
//!
//! This crate provides the "genre + year -> ranked list of movies" lookup the
//! bot needs. It handles:
//! - Mapping genre names onto TMDB genre ids
//! - Building the discover and details query URLs
//! - Fetching and decoding JSON responses
//! - Turning transport, status and decoding failures into `CatalogError`
//!
//! The client holds no conversation state. Every failure is returned to the
//! caller, which decides what the user sees.

pub mod config;
pub mod genres;

use async_trait::async_trait;
use domain::{MovieId, MovieRecord};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, info};

pub use config::CatalogConfig;
pub use genres::{COMEDY, genre_id, genre_names};

/// Errors that can occur when talking to the movie catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Movie catalog API key is not configured (set {})", config::API_KEY_ENV)]
    MissingApiKey,

    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    #[error("Unknown genre: {0}")]
    UnknownGenre(String),

    /// Connection refused, timeout, broken body...
    #[error("Failed to reach movie catalog: {0}")]
    Transport(String),

    /// Any non-2xx status
    #[error("Movie catalog returned HTTP {status}")]
    Status { status: u16 },

    /// Body was not JSON or lacked the expected fields
    #[error("Malformed catalog response: {0}")]
    MalformedResponse(String),
}

/// Shape of the discover endpoint's payload
#[derive(Debug, Deserialize)]
struct ResultsPage {
    results: Vec<MovieRecord>,
}

/// Read-only access to a movie catalog.
///
/// Implemented by `TmdbClient` for real traffic and by in-memory fakes in tests.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Movies of a genre (by catalog id), optionally restricted to a release year,
    /// in the catalog's ranking order
    async fn movies_by_genre(
        &self,
        genre_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<MovieRecord>, CatalogError>;

    /// Full record for a single movie
    async fn movie_details(&self, movie_id: MovieId) -> Result<MovieRecord, CatalogError>;

    /// Same as `movies_by_genre`, resolving a genre name through the lookup table first
    async fn movies_by_genre_name(
        &self,
        genre: &str,
        year: Option<i32>,
    ) -> Result<Vec<MovieRecord>, CatalogError> {
        let id = genre_id(genre).ok_or_else(|| CatalogError::UnknownGenre(genre.to_string()))?;
        self.movies_by_genre(id, year).await
    }
}

/// HTTP client for the TMDB v3 API
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: Client,
    base_url: Url,
    config: CatalogConfig,
}

impl TmdbClient {
    /// Create a client from an explicit configuration.
    ///
    /// Fails if the API key is empty or the base URL does not parse.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        if config.api_key.trim().is_empty() {
            return Err(CatalogError::MissingApiKey);
        }
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        info!("Movie catalog client targeting {}", base_url);
        Ok(Self {
            http: Client::new(),
            base_url,
            config,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// URL listing popular movies of a genre, optionally for one release year
    pub fn by_genre_url(&self, genre_id: &str, year: Option<i32>) -> Result<Url, CatalogError> {
        let mut url = self.endpoint("discover/movie")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("with_genres", genre_id)
                .append_pair("sort_by", "popularity.desc")
                .append_pair("include_adult", "false");
            if let Some(year) = year {
                query.append_pair("primary_release_year", &year.to_string());
            }
        }
        Ok(url)
    }

    /// URL of a single movie's details
    pub fn details_url(&self, movie_id: MovieId) -> Result<Url, CatalogError> {
        self.endpoint(&format!("movie/{}", movie_id))
    }

    /// Resolve a path against the base URL and attach the common query parameters
    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", path, e)))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.config.api_key);
            if let Some(language) = &self.config.language {
                query.append_pair("language", language);
            }
        }
        Ok(url)
    }

    /// GET a URL and decode its JSON body.
    ///
    /// Only the path is logged so the API key never reaches the logs.
    pub async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        debug!("GET {}", url.path());

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            error!("Catalog request to {} failed: {}", url.path(), e);
            CatalogError::Transport(e.without_url().to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("Catalog returned {} for {}", status, url.path());
            return Err(CatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Transport(e.without_url().to_string()))?;

        serde_json::from_str(&body).map_err(|e| {
            error!("Could not decode catalog response from {}: {}", url.path(), e);
            CatalogError::MalformedResponse(e.to_string())
        })
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    async fn movies_by_genre(
        &self,
        genre_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<MovieRecord>, CatalogError> {
        let url = self.by_genre_url(genre_id, year)?;
        let page: ResultsPage = self.fetch(url).await?;
        debug!(
            "Catalog returned {} movies for genre {} (year: {:?})",
            page.results.len(),
            genre_id,
            year
        );
        Ok(page.results)
    }

    async fn movie_details(&self, movie_id: MovieId) -> Result<MovieRecord, CatalogError> {
        let url = self.details_url(movie_id)?;
        self.fetch(url).await
    }
}
