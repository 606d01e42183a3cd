//! linkscout: a concurrent link checker
//!
//! This crate crawls one or more seed URLs, follows every discovered link,
//! records HTTP status codes and redirect chains, and verifies that fragment
//! anchors referenced by source pages exist on the destination pages.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod report;
pub mod url;

use thiserror::Error;

/// Main error type for linkscout operations
#[derive(Debug, Error)]
pub enum LinkScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A crawl invariant was violated. This aborts the crawl and maps to a
    /// distinct exit code; per-destination failures never take this path.
    #[error("Internal crawl error: {0}")]
    Internal(String),
}

/// Configuration-specific errors
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

    #[error("Invalid host pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Result type alias for linkscout operations
pub type Result<T> = std::result::Result<T, LinkScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::CrawlOptions;
pub use crawler::crawl;
pub use graph::{Destination, DestinationResult, DestinationStore, Link, Origin};
pub use report::CrawlResult;
pub use crate::url::{normalize_url, HostGlobSet};
