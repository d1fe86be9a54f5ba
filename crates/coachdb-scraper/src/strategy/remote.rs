//! Remote content-extraction strategy.
//!
//! Wraps an external scrape-to-markdown API (Firecrawl-compatible envelope)
//! with typed error handling and retry. The service itself is a black box:
//! we send a URL, we get back markdown or an error.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;
use crate::extract::extract_staff_records;
use crate::retry::retry_with_backoff;
use crate::strategy::StrategyYield;
use crate::types::{AcquisitionMethod, RawContent, Target};

const DEFAULT_BASE_URL: &str = "https://api.firecrawl.dev/";

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct ScrapeEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ScrapeData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
}

/// Client for the remote content-extraction API.
///
/// Use [`RemoteExtractionClient::new`] for production or
/// [`RemoteExtractionClient::with_base_url`] to point at a mock server in
/// tests. Transient failures (429, 5xx, network errors) are retried with
/// exponential backoff.
pub struct RemoteExtractionClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl RemoteExtractionClient {
    /// Creates a client pointed at the production extraction API.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScrapeError> {
        Self::with_base_url(
            api_key,
            timeout_secs,
            user_agent,
            max_retries,
            backoff_base_ms,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScrapeError::InvalidTargetUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: exactly one trailing slash so joins append rather than
        // replace the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| ScrapeError::InvalidTargetUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetch one page as markdown through the extraction API, with retry on
    /// transient failures.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScrapeError::Api`] — any other non-2xx status (5xx retried, 4xx not).
    /// - [`ScrapeError::Http`] — network failure after all retries exhausted.
    /// - [`ScrapeError::Deserialize`] — response is not the expected envelope.
    /// - [`ScrapeError::Extraction`] — the API reported an extraction failure.
    /// - [`ScrapeError::NoContent`] — the API succeeded but returned nothing.
    pub async fn fetch_content(&self, page_url: &str) -> Result<RawContent, ScrapeError> {
        let endpoint = self
            .base_url
            .join("v1/scrape")
            .map_err(|e| ScrapeError::InvalidTargetUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let endpoint = endpoint.clone();
            async move {
                let response = self
                    .client
                    .post(endpoint.clone())
                    .bearer_auth(&self.api_key)
                    .json(&ScrapeRequest {
                        url: page_url,
                        formats: &["markdown"],
                    })
                    .send()
                    .await?;

                let status = response.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(ScrapeError::RateLimited {
                        url: page_url.to_owned(),
                        retry_after_secs,
                    });
                }
                if !status.is_success() {
                    return Err(ScrapeError::Api {
                        status: status.as_u16(),
                        url: endpoint.to_string(),
                    });
                }

                let body = response.text().await?;
                let envelope: ScrapeEnvelope =
                    serde_json::from_str(&body).map_err(|e| ScrapeError::Deserialize {
                        context: page_url.to_owned(),
                        source: e,
                    })?;

                if !envelope.success {
                    return Err(ScrapeError::Extraction {
                        context: page_url.to_owned(),
                        reason: envelope
                            .error
                            .unwrap_or_else(|| "remote extraction reported failure".to_owned()),
                    });
                }

                let markdown = envelope
                    .data
                    .and_then(|d| d.markdown)
                    .unwrap_or_default();
                if markdown.trim().is_empty() {
                    return Err(ScrapeError::NoContent {
                        url: page_url.to_owned(),
                    });
                }

                Ok(RawContent {
                    source_url: page_url.to_owned(),
                    text: markdown,
                    method: AcquisitionMethod::RemoteExtraction,
                })
            }
        })
        .await
    }

    /// Acquire the target's base page and run it through the extraction
    /// engine.
    ///
    /// # Errors
    ///
    /// Propagates any [`ScrapeError`] from [`Self::fetch_content`]. A page
    /// that fetches but yields zero records is NOT an error here — the
    /// orchestrator applies the acceptance threshold.
    pub async fn extract_staff(&self, target: &Target) -> Result<StrategyYield, ScrapeError> {
        let content = self.fetch_content(&target.base_url).await?;
        tracing::debug!(
            target = %target.slug,
            bytes = content.len(),
            "remote extraction returned content"
        );
        let records = extract_staff_records(&content);
        Ok(StrategyYield {
            records,
            source_url: content.source_url,
        })
    }
}
