use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub targets_path: PathBuf,
    /// Base URL of the remote content-extraction API.
    pub extract_api_url: String,
    /// API key for the remote content-extraction API. When unset the hybrid
    /// orchestrator cannot use the remote strategy and goes straight to the
    /// stealth browser.
    pub extract_api_key: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_inter_target_delay_ms: u64,
    pub scraper_human_delay_ms: u64,
    pub scraper_delay_jitter_ratio: f64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_ms: u64,
    pub browser_nav_timeout_secs: u64,
    /// Minimum record count for a remote-extraction result to be accepted
    /// without escalating to the stealth browser.
    pub fallback_min_records: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("targets_path", &self.targets_path)
            .field("extract_api_url", &self.extract_api_url)
            .field(
                "extract_api_key",
                &self.extract_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field(
                "scraper_inter_target_delay_ms",
                &self.scraper_inter_target_delay_ms,
            )
            .field("scraper_human_delay_ms", &self.scraper_human_delay_ms)
            .field(
                "scraper_delay_jitter_ratio",
                &self.scraper_delay_jitter_ratio,
            )
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_ms",
                &self.scraper_retry_backoff_base_ms,
            )
            .field("browser_nav_timeout_secs", &self.browser_nav_timeout_secs)
            .field("fallback_min_records", &self.fallback_min_records)
            .finish()
    }
}
