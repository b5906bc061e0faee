use std::time::Duration;

use futures_util::StreamExt;
use livesearch_core::{QUERY_PARAM, SEARCH_ENDPOINT};
use livesearch_logging::search_info;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use url::Url;

use crate::{FailureKind, ResponseMetadata, SearchError, SearchOutput};

#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Page URL the endpoint path is resolved against.
    pub base_url: String,
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            endpoint: SEARCH_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    /// Sends one search for the already trimmed `query`.
    async fn search(&self, query: &str) -> Result<SearchOutput, SearchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSearchClient {
    settings: SearchSettings,
    client: reqwest::Client,
}

impl ReqwestSearchClient {
    pub fn new(settings: SearchSettings) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| SearchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Resolves the endpoint against the base URL and sets `q` as the only parameter.
    pub fn request_url(&self, query: &str) -> Result<Url, SearchError> {
        let mut base = Url::parse(&self.settings.base_url)
            .map_err(|err| SearchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !base.path().ends_with('/') {
            // Without the slash, `join` would replace the last path segment.
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut url = base
            .join(&self.settings.endpoint)
            .map_err(|err| SearchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut()
            .clear()
            .append_pair(QUERY_PARAM, query);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl SearchClient for ReqwestSearchClient {
    async fn search(&self, query: &str) -> Result<SearchOutput, SearchError> {
        let url = self.request_url(query)?;
        search_info!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(SearchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(SearchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        // The body is taken as JSON whatever the declared content type says.
        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|err| SearchError::new(FailureKind::InvalidJson, err.to_string()))?;

        Ok(SearchOutput {
            payload,
            metadata: ResponseMetadata {
                url: url.to_string(),
                status: status.as_u16(),
                content_type,
                byte_len: bytes.len() as u64,
            },
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        return SearchError::new(FailureKind::Timeout, err.to_string());
    }
    SearchError::new(FailureKind::Network, err.to_string())
}
