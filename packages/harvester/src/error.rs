//! Error types for the harvester.
//!
//! A single `HarvesterError` covers the whole pipeline. Harvest mode uses
//! [`HarvesterError::is_recoverable`] to decide which failures only cost one
//! record and which abort the run.

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Invalid or unusable configuration (missing stylesheet, bad page size, ...).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A URL could not be parsed.
    #[error("Invalid URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// Catalog search response did not have the expected shape.
    #[error("Malformed search response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A document could not be decoded to text.
    #[error("Character decoding failed: {0}")]
    Encoding(String),

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// The stylesheet transform failed.
    #[error("Transform failed: {message}{}", if .stderr.is_empty() { String::new() } else { format!("\n{}", .stderr) })]
    Transform { message: String, stderr: String },

    /// The transform output could not be read as RDF/XML.
    #[error("RDF/XML parsing of transform output failed: {0}")]
    RdfParse(String),

    /// Writing the output graph failed.
    #[error("RDF serialization failed: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvesterError {
    /// Whether this error only affects the record being processed.
    ///
    /// Transport, decoding, XML, transform and RDF parse failures are tied to one
    /// record's content or its fetch. Everything else (configuration, IO on
    /// our side, malformed search responses) points at the run itself.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            HarvesterError::Http(_)
                | HarvesterError::HttpStatus { .. }
                | HarvesterError::Encoding(_)
                | HarvesterError::XmlParse(_)
                | HarvesterError::Transform { .. }
                | HarvesterError::RdfParse(_)
        )
    }
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;

/// Render an error followed by all of its sources, one per line.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut out = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        out.push_str("\n  caused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
