//! File-based batch report.
//!
//! Written at batch completion for offline inspection: per-target results
//! plus the aggregate statistics.

use std::path::{Path, PathBuf};

use serde::Serialize;

use coachdb_scraper::{RunSummary, ScrapeAttemptResult};

#[derive(Serialize)]
struct RunReport<'a> {
    summary: &'a RunSummary,
    success_rate: f64,
    avg_elapsed_ms: u64,
    targets: &'a [ScrapeAttemptResult],
}

/// Serialize the batch outcome to JSON. When `path` is `None` the report
/// lands next to the working directory as `scrape-report-<timestamp>.json`.
pub(super) fn write_report(
    path: Option<&Path>,
    summary: &RunSummary,
    attempts: &[ScrapeAttemptResult],
) -> anyhow::Result<PathBuf> {
    let path = path.map_or_else(
        || {
            PathBuf::from(format!(
                "scrape-report-{}.json",
                summary.started_at.format("%Y%m%d-%H%M%S")
            ))
        },
        Path::to_path_buf,
    );

    let report = RunReport {
        summary,
        success_rate: summary.success_rate(),
        avg_elapsed_ms: summary.avg_elapsed_ms(),
        targets: attempts,
    };

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, json)?;
    Ok(path)
}
