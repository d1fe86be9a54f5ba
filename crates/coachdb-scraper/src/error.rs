use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Api { status: u16, url: String },

    #[error("rate limited at {url} (retry after {retry_after_secs}s)")]
    RateLimited { url: String, retry_after_secs: u64 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("extraction failed for {context}: {reason}")]
    Extraction { context: String, reason: String },

    #[error("browser error: {0}")]
    Browser(String),

    #[error("navigation failed for {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("no usable content at {url}")]
    NoContent { url: String },

    #[error("all candidate paths exhausted for {base_url}: {last_error}")]
    AllPathsExhausted { base_url: String, last_error: String },

    #[error("invalid target URL \"{url}\": {reason}")]
    InvalidTargetUrl { url: String, reason: String },

    #[error("remote extraction is not configured (no API key)")]
    RemoteUnavailable,
}
