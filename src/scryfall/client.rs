use crate::config::Config;
use crate::query::search_api_url;
use crate::scryfall::models::{ApiError, SearchPage};
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching a page of search results.
///
/// There is no retry: every variant describes the outcome of a single attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {status}{}", format_details(.details))]
    HttpStatus { status: u16, details: Option<String> },
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the configured size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Body was not the expected search result shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
    /// The search matched nothing
    #[error("No cards found")]
    NoResults,
    /// Configured API base URL is unusable
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

fn format_details(details: &Option<String>) -> String {
    details
        .as_deref()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default()
}

/// Client for the card search endpoint.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    api_base_url: String,
    user_agent: String,
    timeout: Duration,
    max_response_bytes: usize,
}

impl SearchClient {
    pub fn new(config: &Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Builds a client around an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_base_url: config.api_base_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_response_bytes: config.max_response_bytes,
        }
    }

    /// Fetches the first page of results for `query`, newest release first.
    ///
    /// Only the first page is fetched. `has_more` and `total_cards` on the
    /// returned page tell the caller whether anything was left behind.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Network`] - Connection or TLS errors
    /// - [`FetchError::Timeout`] - Request exceeded the timeout
    /// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
    /// - [`FetchError::ResponseTooLarge`] - Body exceeded the size limit
    /// - [`FetchError::UnexpectedResponse`] - Body is not a search result
    /// - [`FetchError::NoResults`] - `data` missing or empty
    pub async fn search(&self, query: &str) -> Result<SearchPage, FetchError> {
        let url = search_api_url(&self.api_base_url, query)?;
        tracing::debug!(url = %url, timeout_secs = self.timeout.as_secs(), "Requesting search results");

        // The deadline covers the body as well as the headers
        let bytes = tokio::time::timeout(self.timeout, self.fetch_body(url))
            .await
            .map_err(|_| {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "Search request timed out");
                FetchError::Timeout
            })??;

        let page: SearchPage = serde_json::from_slice(&bytes)
            .map_err(|e| FetchError::UnexpectedResponse(e.to_string()))?;

        if page.data.is_empty() {
            return Err(FetchError::NoResults);
        }

        tracing::info!(
            cards = page.data.len(),
            has_more = page.has_more,
            total_cards = ?page.total_cards,
            "Fetched search results"
        );
        Ok(page)
    }

    async fn fetch_body(&self, url: url::Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let details = read_limited_bytes(response, self.max_response_bytes)
                .await
                .ok()
                .and_then(|body| serde_json::from_slice::<ApiError>(&body).ok())
                .and_then(|err| err.details);
            tracing::warn!(status = status.as_u16(), details = ?details, "Search request failed");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                details,
            });
        }

        read_limited_bytes(response, self.max_response_bytes).await
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
