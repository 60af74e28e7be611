//! Erz-Harvester: a checkpointed construction-catalog crawler
//!
//! This crate implements a harvester for the unified construction registry,
//! walking its region → complex → building hierarchy, normalizing each
//! building into a flat tabular record, and checkpointing results to a CSV
//! file at every region boundary.

pub mod catalog;
pub mod config;
pub mod harvester;
pub mod output;
pub mod record;
pub mod state;
pub mod transport;

use thiserror::Error;

/// Main error type for harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// Any of these is fatal at startup, before the first network request.
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

    #[error("Proxy list '{path}' is empty; add at least one proxy as ip:port:username:password")]
    EmptyProxyList { path: String },

    #[error("Malformed proxy on line {line}: expected ip:port:username:password, got '{text}'")]
    MalformedProxy { line: usize, text: String },
}

/// Transport-level errors for a single request
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed response body for {url}: {message}")]
    MalformedBody { url: String, message: String },

    #[error("Proxy setup failed: {0}")]
    Proxy(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Raised when a raw building payload lacks a field that has no sensible default
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Record is missing mandatory field '{field}'")]
    MissingField { field: &'static str },
}

/// Result type alias for harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for transport operations
pub type TransportResult<T> = std::result::Result<T, TransportError>;

// Re-export commonly used types
pub use config::Config;
pub use record::BuildingRecord;
pub use state::CrawlPhase;
