//! Availability Crawler: rental availability time series from listing pages
//!
//! This crate walks a property site's paginated search results, reads the
//! "available from" date of every listing and aggregates the dates for CSV
//! export or a date-vs-count plot.

pub mod availability;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Availability error: {0}")]
    Availability(#[from] AvailabilityError),

    #[error("Export error: {0}")]
    Export(#[from] output::ExportError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },
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
}

/// Errors raised while turning listing text into a calendar date
#[derive(Debug, Error)]
pub enum AvailabilityError {
    #[error("No 'Available' marker in listing text: {text:?}")]
    MissingMarker { text: String },

    #[error("Unrecognised availability date {candidate:?}: {source}")]
    InvalidDate {
        candidate: String,
        source: chrono::ParseError,
    },
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use availability::{extract_date_candidate, parse_available_date, Clock, FixedClock, SystemClock};
pub use config::Config;
pub use crawler::{CrawlSummary, Crawler};
pub use state::CrawlState;
