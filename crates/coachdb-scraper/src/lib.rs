pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod pacing;
mod retry;
pub mod strategy;
pub mod summary;
pub mod types;

pub use error::ScrapeError;
pub use extract::extract_staff_records;
pub use orchestrator::{HybridOrchestrator, ScrapeMethod, TargetState};
pub use pacing::Pacer;
pub use strategy::{RemoteExtractionClient, StealthScraper, StrategyYield};
pub use summary::{RunError, RunSummary};
pub use types::{
    make_record_key, AcquisitionMethod, RawContent, ScrapeAttemptResult, StaffRecord, Target,
};
