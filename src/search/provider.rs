//! Web-search provider client.
//!
//! One GET per query against a SerpApi-compatible `/search` endpoint. Results
//! come back in provider order with the score unset; ranking happens later.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::SearchConfig;
use crate::models::SearchCandidate;

/// Longest provider error body kept in a [`SearchError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search provider credentials are not configured")]
    MissingCredentials,

    #[error("search provider timed out")]
    Timeout,

    #[error("search request failed: {0}")]
    Transport(String),

    #[error("search provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed search response: {0}")]
    MalformedBody(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return SearchError::Timeout;
        }
        // The request URL carries the api_key query parameter.
        SearchError::Transport(e.without_url().to_string())
    }
}

/// Source of candidate learning resources for a query.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SearchError>;
}

#[derive(Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    link: Option<String>,
}

impl From<OrganicResult> for SearchCandidate {
    fn from(r: OrganicResult) -> Self {
        SearchCandidate {
            title: r.title.unwrap_or_default(),
            snippet: r.snippet.unwrap_or_default(),
            link: r.link.unwrap_or_default(),
            score: None,
        }
    }
}

/// SerpApi-backed [`SearchProvider`].
pub struct SerpApiClient {
    client: reqwest::Client,
    config: SearchConfig,
}

impl SerpApiClient {
    /// Build a client whose requests are bounded by `config.timeout_secs`.
    pub fn new(config: SearchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs.clamp(1, 10)))
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn has_credentials(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SearchError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(SearchError::MissingCredentials)?;

        let url = format!("{}/search", self.config.base_url);
        let num = self.config.num_results.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("engine", self.config.engine.as_str()),
                ("q", query),
                ("num", num.as_str()),
                ("api_key", api_key),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status,
                body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let body = resp.text().await?;
        parse_results(&body)
    }
}

/// Parse a provider response body into candidates, preserving order.
pub fn parse_results(body: &str) -> Result<Vec<SearchCandidate>, SearchError> {
    let parsed: SerpApiResponse =
        serde_json::from_str(body).map_err(|e| SearchError::MalformedBody(e.to_string()))?;

    Ok(parsed
        .organic_results
        .into_iter()
        .map(SearchCandidate::from)
        .collect())
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
