//! Error types for metadata fetching.

use thiserror::Error;

/// Error type for fetching a metadata document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport or client construction error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("metadata request failed with status {status}{}", describe_message(.message))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body, if any.
        message: Option<String>,
    },

    /// The fetched document could not be parsed or linked.
    #[error("schema error: {0}")]
    Schema(#[from] odatagen_schema::SchemaError),
}

fn describe_message(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {message}"),
        None => String::new(),
    }
}
