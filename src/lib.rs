//! Trawler: a polite, selector-driven web crawler
//!
//! Starting from a seed URL, the crawler repeatedly fetches pages, extracts
//! links and content through CSS selectors, feeds discovered links back into a
//! de-duplicated frontier and hands extracted data to user callbacks. Work is
//! dispatched in paced ticks with a fixed number of worker slots.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Trawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// Raised at construction time only; a crawler never starts with an invalid
/// configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("At least one link selector is required")]
    MissingLinkSelectors,
}

/// A single visit failed
///
/// Every variant carries the URL that produced it. These errors are logged by
/// the scheduler and never reach the caller of `start()`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("Selector '{selector}' failed on {url}: {message}")]
    Selector {
        url: String,
        selector: String,
        message: String,
    },
}

impl FetchError {
    /// The URL whose visit failed
    pub fn url(&self) -> &str {
        match self {
            Self::Http { url, .. }
            | Self::Status { url, .. }
            | Self::Body { url, .. }
            | Self::Selector { url, .. } => url,
        }
    }
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Empty URL")]
    Empty,

    #[error("Fragment-only reference: {0}")]
    FragmentOnly(String),
}

/// Result type alias for Trawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlHandlers, Crawler};
pub use state::CrawlPhase;
pub use crate::url::resolve_url;
