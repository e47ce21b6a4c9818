//! Elasticlite Client Library
//!
//! Asynchronous HTTP client for the Elasticsearch REST API, including:
//! - Index lifecycle (create, get, delete, exists, stats)
//! - Document CRUD and existence checks
//! - URI and structured search, counting, update-by-query
//! - Newline-delimited bulk operations
//! - Cat APIs and refresh

mod bulk;
mod client;
mod uri;

pub use bulk::BulkBody;
pub use client::Client;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server error: {status} - {body}")]
    Server { status: u16, body: String },

    #[error("Response body exceeded {limit} bytes")]
    BodyTooLarge { limit: usize },
}

impl ClientError {
    /// HTTP status code of a server-reported failure.
    ///
    /// Callers branch on this at the call site, e.g. treating 404 as
    /// "not found" rather than a hard failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
