//! Metadata document fetching.
//!
//! Issues `GET <service root>/$metadata` advertising an XML response and
//! OData protocol version 4.0.

use crate::error::FetchError;
use odatagen_schema::{DataServiceModel, envelope, parse_metadata};
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for the metadata fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl FetchOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Returns the `$metadata` address of a service root.
#[must_use]
pub fn metadata_url(service_root: &str) -> String {
    format!("{}/$metadata", service_root.trim_end_matches('/'))
}

fn metadata_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/xml"));
    headers.insert(
        HeaderName::from_static("odata-version"),
        HeaderValue::from_static("4.0"),
    );
    headers.insert(
        HeaderName::from_static("odata-maxversion"),
        HeaderValue::from_static("4.0"),
    );
    headers.insert(
        HeaderName::from_static("dataserviceversion"),
        HeaderValue::from_static("4.0"),
    );
    headers
}

/// Fetches metadata documents over HTTP.
#[derive(Debug, Clone)]
pub struct MetadataFetcher {
    client: reqwest::Client,
}

impl MetadataFetcher {
    /// Creates a fetcher with default options.
    ///
    /// # Errors
    /// Returns `FetchError::Http` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_options(FetchOptions::default())
    }

    /// Creates a fetcher with the given options.
    ///
    /// # Errors
    /// Returns `FetchError::Http` if the HTTP client cannot be built.
    pub fn with_options(options: FetchOptions) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .default_headers(metadata_headers())
            .build()?;

        Ok(Self { client })
    }

    /// Fetches the raw metadata document of a service.
    ///
    /// # Arguments
    /// * `service_root` - Service root URL, with or without trailing `/`
    ///
    /// # Errors
    /// Returns `FetchError::Http` on transport failure and
    /// `FetchError::Status` for a non-success response, carrying the
    /// service's message when the body is an error envelope.
    pub async fn fetch(&self, service_root: &str) -> Result<Vec<u8>, FetchError> {
        let url = metadata_url(service_root);
        tracing::info!("Fetching metadata from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: envelope::service_message(&body),
            });
        }

        tracing::info!("Fetched {} bytes of metadata", body.len());
        Ok(body.to_vec())
    }

    /// Fetches, parses and links the metadata document of a service.
    ///
    /// # Errors
    /// Returns `FetchError` if fetching fails or the document is unusable.
    pub async fn fetch_model(&self, service_root: &str) -> Result<DataServiceModel, FetchError> {
        let bytes = self.fetch(service_root).await?;
        Ok(parse_metadata(&bytes)?)
    }
}
