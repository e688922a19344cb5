//! HTTP client for the backend's snapshot export.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::document::SnapshotDocument;
use super::error::SnapshotError;

/// Configuration for the snapshot client.
#[derive(Debug, Clone)]
pub struct SnapshotClientConfig {
    /// Full URL of the snapshot export
    pub url: String,
    /// Optional API key sent as `x-apikey`
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SnapshotClientConfig {
    /// Create a new config for the given URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout_secs: 30,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// Client that downloads snapshot documents.
#[derive(Debug, Clone)]
pub struct SnapshotClient {
    http: reqwest::Client,
    url: String,
}

impl SnapshotClient {
    /// Create a new client.
    pub fn new(config: SnapshotClientConfig) -> Result<Self, SnapshotError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| SnapshotError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert(HeaderName::from_static("x-apikey"), value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// Fetch the current snapshot document.
    pub async fn fetch(&self) -> Result<SnapshotDocument, SnapshotError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SnapshotError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SnapshotError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        SnapshotDocument::from_json(&body)
    }
}
