//! Error types for the identification client.
//!
//! A single `IdentifyError` covers the request path (transport, status,
//! content type), XML parsing, and the output side used by the CLI.

use thiserror::Error;

/// Main error type for the identification client.
#[derive(Debug, Error)]
pub enum IdentifyError {
    /// Network, DNS, TLS or body-read failure reported by the HTTP client.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint URL could not be built.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The identification engine answered with a non-success status.
    #[error("Identification request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    /// The response did not declare an XML body.
    #[error("Unexpected content type: expected 'text/xml', got {}", .found.as_deref().map(|f| format!("'{f}'")).unwrap_or_else(|| "none".to_string()))]
    ContentType { found: Option<String> },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// No sequences were supplied.
    #[error("No sequences given. Pass sequences as arguments or with --fasta")]
    EmptyInput,

    /// Some sequences could not be identified.
    #[error("{failed} of {total} sequences could not be identified")]
    PartialFailure { failed: usize, total: usize },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// CSV/TSV writing error.
    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),
}

impl IdentifyError {
    /// HTTP status code carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for identification operations.
pub type Result<T> = std::result::Result<T, IdentifyError>;
