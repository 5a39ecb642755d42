//! Error types for thread crawling and novel extraction.
//!
//! Every variant is fatal to a crawl: nothing is retried and the first error
//! encountered is surfaced to the caller.
//!
//! # Example
//!
//! ```rust
//! use novelthread_core::{FloorRange, NovelError};
//!
//! match FloorRange::parse("1,x-3") {
//!     Err(NovelError::InvalidRangeSpec { token, .. }) => assert_eq!(token, "x-3"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use thiserror::Error;

/// Main error type for crawl and extraction operations.
#[derive(Error, Debug)]
pub enum NovelError {
    /// The source URL matches neither the path-style nor the query-style thread permalink.
    #[error("Malformed thread URL: {0}")]
    MalformedUrl(String),

    /// A floor range expression contains a token that is not `n`, `lo-hi` or `lo-`.
    #[error("Invalid floor range '{spec}': bad token '{token}'")]
    InvalidRangeSpec { spec: String, token: String },

    /// A post's displayed floor text does not look like `<digits>楼`.
    #[error("Cannot parse floor number from '{0}'")]
    FloorParseError(String),

    /// A raw URL found in a post could not be made absolute against the page URL.
    #[error("Cannot resolve URL '{url}': {source}")]
    UrlResolutionError {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The pagination widget exists but its layout is not recognised.
    #[error("Cannot parse pagination: {0}")]
    PaginationParseError(String),

    /// A page fetch exceeded the configured timeout.
    #[error("Request for {url} timed out after {timeout} seconds")]
    FetchTimeout { url: String, timeout: u64 },

    /// Connection failures and non-success HTTP statuses.
    #[error("Failed to fetch {url}: {reason}")]
    FetchError { url: String, reason: String },

    /// The forum answered with its "deleted thread / no permission" banner.
    #[error("Forum reported an error on {url}: {message}")]
    ForumErrorPage { url: String, message: String },

    /// Invalid CSS selectors or a failed HTML rewrite.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Configuration values that cannot be turned into a session, such as a cookie with control characters.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File write errors from generators.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),
}

/// Result type alias for NovelError.
pub type Result<T> = std::result::Result<T, NovelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NovelError::MalformedUrl("https://example.com/".to_string());
        assert!(err.to_string().contains("Malformed thread URL"));
    }

    #[test]
    fn test_range_error_names_token() {
        let err = NovelError::InvalidRangeSpec { spec: "1,a".to_string(), token: "a".to_string() };
        assert!(err.to_string().contains("'a'"));
        assert!(err.to_string().contains("1,a"));
    }

    #[test]
    fn test_timeout_error() {
        let err = NovelError::FetchTimeout { url: "https://host/thread-1-1-1.html".to_string(), timeout: 30 };
        assert!(err.to_string().contains("30"));
        assert!(err.to_string().contains("thread-1-1-1"));
    }

    #[test]
    fn test_url_resolution_error_keeps_raw_url() {
        let source = url::Url::parse("https://host/").unwrap().join("http://[bad").unwrap_err();
        let err = NovelError::UrlResolutionError { url: "http://[bad".to_string(), source };
        assert!(err.to_string().contains("http://[bad"));
    }
}
