//! Per-target scrape and persistence.

use coachdb_scraper::{
    make_record_key, HybridOrchestrator, ScrapeAttemptResult, ScrapeMethod, StaffRecord, Target,
};

/// Scrape one target and persist the outcome.
///
/// Always returns a `ScrapeAttemptResult`; database errors are folded into
/// the attempt rather than propagated, so a failing target does not abort
/// the batch.
pub(super) async fn scrape_one_target(
    pool: &sqlx::PgPool,
    orchestrator: &HybridOrchestrator,
    run_id: i64,
    target: &Target,
    method: ScrapeMethod,
) -> ScrapeAttemptResult {
    let mut attempt = orchestrator.scrape_target(target, method).await;

    if attempt.success {
        let new_records: Vec<coachdb_db::NewStaffRecord> = attempt
            .records
            .iter()
            .map(|r| to_new_record(&target.slug, r))
            .collect();

        match coachdb_db::upsert_staff_records(pool, &target.slug, &new_records).await {
            Ok((new, updated)) => {
                tracing::info!(target = %target.slug, new, updated, "staff records persisted");
            }
            Err(e) => {
                let message = format!("db error upserting staff records: {e:#}");
                tracing::error!(target = %target.slug, error = %e, "db upsert failed");
                attempt.success = false;
                attempt.error = Some(message);
            }
        }
    }

    let status = if attempt.success { "succeeded" } else { "failed" };
    let records = i32::try_from(attempt.records.len()).unwrap_or(i32::MAX);
    if let Err(e) = coachdb_db::upsert_scrape_run_target(
        pool,
        run_id,
        &target.slug,
        attempt.method.as_str(),
        status,
        Some(records),
        attempt.error.as_deref(),
    )
    .await
    {
        tracing::error!(
            target = %target.slug,
            run_id,
            error = %e,
            "staff data saved but failed to record target outcome — audit trail incomplete"
        );
    }

    attempt
}

fn to_new_record(target_slug: &str, record: &StaffRecord) -> coachdb_db::NewStaffRecord {
    coachdb_db::NewStaffRecord {
        record_key: make_record_key(target_slug, record),
        name: record.name.clone(),
        title: record.title.clone(),
        sport: record.sport.clone(),
        email: record.email.clone(),
        phone: record.phone.clone(),
        bio: record.bio.clone(),
        photo_url: record.photo_url.clone(),
        confidence: record.confidence,
        method: record.method.as_str().to_owned(),
        extracted_at: record.extracted_at,
    }
}
