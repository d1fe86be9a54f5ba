//! Acquisition strategies.
//!
//! Two ways to turn a target's website into staff records: a remote
//! content-extraction API (cheap, blocked by some sites) and a locally
//! driven stealth browser (expensive, resilient). The hybrid orchestrator
//! sequences them.

pub mod remote;
pub mod stealth;

pub use remote::RemoteExtractionClient;
pub use stealth::StealthScraper;

use crate::types::StaffRecord;

/// What a strategy hands back on success: the extracted records and the URL
/// they came from.
#[derive(Debug)]
pub struct StrategyYield {
    pub records: Vec<StaffRecord>,
    pub source_url: String,
}
