//! Batch scrape handler for the CLI.
//!
//! Owns the run tracker side of a batch: creates the `scrape_runs` row,
//! walks the target list sequentially through the hybrid orchestrator with a
//! politeness delay between targets, updates the aggregate summary as each
//! target completes, and persists terminal state plus the JSON report.
//! Per-target failures are contained; only target enumeration and run-row
//! persistence failures abort the batch.

mod report;
mod target;

use std::path::PathBuf;

use coachdb_core::{AppConfig, DifficultTargets};
use coachdb_scraper::{
    HybridOrchestrator, Pacer, RemoteExtractionClient, RunSummary, ScrapeMethod, StealthScraper,
    Target,
};

use crate::fail_run_best_effort;

pub(crate) struct ScrapeArgs {
    pub target_filter: Option<String>,
    pub method: ScrapeMethod,
    pub min_records: Option<usize>,
    pub dry_run: bool,
    pub report_path: Option<PathBuf>,
}

/// Collect coaching staff for the configured targets.
///
/// # Errors
///
/// Returns an error if the targets file cannot be loaded, the filter
/// resolves to nothing, or the scrape run row cannot be created or
/// completed. Per-target scrape failures are recorded and skipped, not
/// propagated.
pub(crate) async fn run_scrape_batch(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    args: ScrapeArgs,
) -> anyhow::Result<()> {
    let targets_file = coachdb_core::targets::load_targets(&config.targets_path)?;
    let difficult = DifficultTargets::from_file(&targets_file);

    let mut targets: Vec<Target> = targets_file
        .targets
        .iter()
        .map(|t| Target {
            name: t.name.clone(),
            slug: t.slug(),
            base_url: t.base_url.clone(),
        })
        .collect();

    if let Some(slug) = args.target_filter.as_deref() {
        targets.retain(|t| t.slug == slug);
        if targets.is_empty() {
            anyhow::bail!("target '{slug}' not found in {}", config.targets_path.display());
        }
    }
    if targets.is_empty() {
        anyhow::bail!("no targets configured in {}", config.targets_path.display());
    }

    if args.dry_run {
        println!(
            "dry-run: would scrape {} target(s) via {}:",
            targets.len(),
            args.method
        );
        for t in &targets {
            println!("  {:<30} {}", t.slug, t.base_url);
        }
        return Ok(());
    }

    let orchestrator = build_orchestrator(config, &args, difficult)?;
    let inter_target_pacer = Pacer::new(
        config.scraper_inter_target_delay_ms,
        config.scraper_delay_jitter_ratio,
    );

    println!(
        "Scraping coaching staff for {} target(s) via {}...",
        targets.len(),
        args.method
    );

    let run = coachdb_db::create_scrape_run(pool, args.method.as_str(), "cli").await?;
    if let Err(e) = coachdb_db::start_scrape_run(pool, run.id).await {
        fail_run_best_effort(pool, run.id, args.method.as_str(), format!("{e:#}")).await;
        return Err(e.into());
    }

    let mut summary = RunSummary::start(args.method.as_str());
    let mut attempts = Vec::with_capacity(targets.len());
    let target_count = targets.len();

    for (index, t) in targets.iter().enumerate() {
        let attempt = target::scrape_one_target(pool, &orchestrator, run.id, t, args.method).await;

        if attempt.success {
            println!(
                "  \u{2713} {:<30} {:>3} records  [{}] {}ms",
                t.slug,
                attempt.records.len(),
                attempt.method,
                attempt.elapsed_ms,
            );
        } else {
            println!(
                "  \u{2717} {:<30} {}",
                t.slug,
                attempt.error.as_deref().unwrap_or("unknown error"),
            );
        }

        summary.record(&attempt);
        attempts.push(attempt);

        if index + 1 < target_count {
            inter_target_pacer.pause().await;
        }
    }

    if summary.failed == target_count {
        let message = format!("all {target_count} targets failed scraping");
        summary.record_batch_error(&message);
        summary.finish();
        write_report_best_effort(args.report_path.as_deref(), &summary, &attempts);
        fail_run_best_effort(pool, run.id, args.method.as_str(), message.clone()).await;
        anyhow::bail!("{message}");
    }

    summary.finish();

    let processed = i32::try_from(summary.targets_processed).unwrap_or(i32::MAX);
    let extracted = i32::try_from(summary.records_extracted).unwrap_or(i32::MAX);
    if let Err(err) =
        coachdb_db::complete_scrape_run(pool, run.id, processed, extracted, summary.success_rate())
            .await
    {
        let message = format!("{err:#}");
        fail_run_best_effort(pool, run.id, args.method.as_str(), message).await;
        return Err(err.into());
    }

    write_report_best_effort(args.report_path.as_deref(), &summary, &attempts);

    println!(
        "Run {} complete: {} records across {} targets ({:.0}% success, avg {}ms/target)",
        run.public_id,
        summary.records_extracted,
        summary.targets_processed,
        summary.success_rate() * 100.0,
        summary.avg_elapsed_ms(),
    );

    Ok(())
}

fn build_orchestrator(
    config: &AppConfig,
    args: &ScrapeArgs,
    difficult: DifficultTargets,
) -> anyhow::Result<HybridOrchestrator> {
    let remote = match config.extract_api_key.as_deref() {
        Some(key) if !key.is_empty() => Some(RemoteExtractionClient::with_base_url(
            key,
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            config.scraper_max_retries,
            config.scraper_retry_backoff_base_ms,
            &config.extract_api_url,
        )?),
        _ => {
            tracing::info!("remote extraction disabled (no API key) — stealth browser only");
            None
        }
    };

    let human_pacer = Pacer::new(
        config.scraper_human_delay_ms,
        config.scraper_delay_jitter_ratio,
    );
    let stealth = StealthScraper::new(
        &config.scraper_user_agent,
        config.browser_nav_timeout_secs,
        config.scraper_max_retries,
        config.scraper_retry_backoff_base_ms,
        human_pacer,
    );

    let min_records = args.min_records.unwrap_or(config.fallback_min_records);

    Ok(HybridOrchestrator::new(
        remote,
        stealth,
        difficult,
        min_records,
    ))
}

fn write_report_best_effort(
    path: Option<&std::path::Path>,
    summary: &RunSummary,
    attempts: &[coachdb_scraper::ScrapeAttemptResult],
) {
    match report::write_report(path, summary, attempts) {
        Ok(written) => println!("report written to {}", written.display()),
        Err(e) => tracing::warn!(error = %e, "could not write batch report"),
    }
}
