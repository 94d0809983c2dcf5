//! Configuration for the catalog client.
//!
//! The API key is injected here at construction time instead of being read
//! from the process environment by the client itself.

use crate::CatalogError;

/// Default TMDB REST endpoint (trailing slash matters for `Url::join`)
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default poster base URL, 200px wide renditions
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w200";

/// Environment variable consulted by `CatalogConfig::from_env`
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Settings needed to talk to the movie catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
    /// Optional `language` query parameter (e.g. "en-US")
    pub language: Option<String>,
}

impl CatalogConfig {
    /// Create a config for the public TMDB API with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            language: None,
        }
    }

    /// Read the API key from `TMDB_API_KEY`
    pub fn from_env() -> Result<Self, CatalogError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| CatalogError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Point the client at a different endpoint (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}
