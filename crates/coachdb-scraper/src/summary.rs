//! Batch run accounting.
//!
//! A [`RunSummary`] is owned by the batch driver and updated incrementally
//! as each target completes; the CLI persists its terminal state and writes
//! it into the JSON report.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::ScrapeAttemptResult;

#[derive(Debug, Clone, Serialize)]
pub struct RunError {
    pub target_slug: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub method: String,
    pub targets_processed: usize,
    pub records_extracted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<RunError>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    total_elapsed_ms: u64,
}

impl RunSummary {
    #[must_use]
    pub fn start(method: &str) -> Self {
        Self {
            method: method.to_owned(),
            targets_processed: 0,
            records_extracted: 0,
            succeeded: 0,
            failed: 0,
            errors: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
            total_elapsed_ms: 0,
        }
    }

    /// Fold one completed target into the aggregate.
    pub fn record(&mut self, attempt: &ScrapeAttemptResult) {
        self.targets_processed += 1;
        self.records_extracted += attempt.records.len();
        self.total_elapsed_ms = self.total_elapsed_ms.saturating_add(attempt.elapsed_ms);

        if attempt.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
            self.errors.push(RunError {
                target_slug: attempt.target_slug.clone(),
                message: attempt
                    .error
                    .clone()
                    .unwrap_or_else(|| "no records extracted".to_owned()),
                at: Utc::now(),
            });
        }
    }

    /// Record a batch-level error that is not tied to a single target.
    pub fn record_batch_error(&mut self, message: &str) {
        self.errors.push(RunError {
            target_slug: "(batch)".to_owned(),
            message: message.to_owned(),
            at: Utc::now(),
        });
    }

    /// Fraction of processed targets that succeeded, in `[0.0, 1.0]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.targets_processed == 0 {
            return 0.0;
        }
        self.succeeded as f64 / self.targets_processed as f64
    }

    /// Mean per-target elapsed time.
    #[must_use]
    pub fn avg_elapsed_ms(&self) -> u64 {
        if self.targets_processed == 0 {
            return 0;
        }
        self.total_elapsed_ms / self.targets_processed as u64
    }

    /// Close the run.
    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }
}
