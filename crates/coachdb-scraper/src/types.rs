//! Core data types for the scraping pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One athletic program to scrape. Immutable for the duration of a run;
/// `slug` is the stable identifier used for dedup keys and run bookkeeping.
#[derive(Debug, Clone)]
pub struct Target {
    pub name: String,
    pub slug: String,
    pub base_url: String,
}

/// Which acquisition strategy produced a piece of content or a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionMethod {
    RemoteExtraction,
    StealthBrowser,
}

impl AcquisitionMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AcquisitionMethod::RemoteExtraction => "remote_extraction",
            AcquisitionMethod::StealthBrowser => "stealth_browser",
        }
    }
}

impl std::fmt::Display for AcquisitionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw page content produced by a strategy. Transient: consumed once by the
/// extraction engine, never persisted.
#[derive(Debug, Clone)]
pub struct RawContent {
    pub source_url: String,
    pub text: String,
    pub method: AcquisitionMethod,
}

impl RawContent {
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A validated, classified coaching-staff entry.
///
/// Invariants: `name` passed the name validator, `title` is one of the
/// closed normalized title set, and `confidence` is in `[0.0, 1.0]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffRecord {
    pub name: String,
    pub title: String,
    pub sport: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub confidence: f64,
    pub method: AcquisitionMethod,
    pub extracted_at: DateTime<Utc>,
}

/// Per-target scrape outcome. `success` is true iff the accepting strategy
/// produced at least one record.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeAttemptResult {
    pub target_slug: String,
    pub method: AcquisitionMethod,
    pub success: bool,
    pub records: Vec<StaffRecord>,
    pub source_url: Option<String>,
    pub elapsed_ms: u64,
    pub error: Option<String>,
}

/// Compute a stable dedup key for a staff record.
///
/// SHA-256 over `target_slug || name || sport`, normalised to lower case.
/// Hex-encoded; used as the upsert conflict key in the store.
#[must_use]
pub fn make_record_key(target_slug: &str, record: &StaffRecord) -> String {
    use sha2::{Digest, Sha256};
    let input = format!(
        "{}\x00{}\x00{}",
        target_slug,
        record.name.trim().to_lowercase(),
        record.sport.trim().to_lowercase(),
    );
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
