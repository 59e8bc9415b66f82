//! Error types module.
//!
//! This module defines the error types used throughout the dnseval application.
//! It uses `thiserror` for structured error handling and provides
//! a custom `Result` type alias for convenience.
//!
//! Measurement failures are not errors here: a failed lookup is recorded in a
//! `TrialResult` and the scan keeps going. The variants below cover input
//! problems and misuse of the scan machinery.

use thiserror::Error;

/// A specialized `Result` type for dnseval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for dnseval application.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations, terminal output, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error (report output)
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// DNS resolver error (lookup failures, resolver construction)
    #[error("DNS resolver error: {0}")]
    Resolver(#[from] trust_dns_resolver::error::ResolveError),

    /// Configuration error (missing provider table, invalid settings)
    #[error("Config error: {0}")]
    Config(String),

    /// Parse error (malformed provider record, bad address)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Scan lifecycle error
    #[error("Scan error: {0}")]
    Scan(String),

    /// Operation timeout
    #[error("Operation timed out")]
    Timeout,
}

impl Error {
    /// Create a new configuration error with a message.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new parse error with a message.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new scan lifecycle error with a message.
    #[must_use]
    pub fn scan(msg: impl Into<String>) -> Self {
        Self::Scan(msg.into())
    }
}

impl From<color_eyre::Report> for Error {
    fn from(e: color_eyre::Report) -> Self {
        Self::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::config("no providers").to_string(),
            "Config error: no providers"
        );
        assert_eq!(Error::parse("bad").to_string(), "Parse error: bad");
        assert_eq!(Error::Timeout.to_string(), "Operation timed out");
    }
}
