//! Database operations for `scrape_runs` and `scrape_run_targets`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `scrape_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScrapeRunRow {
    pub id: i64,
    pub public_id: Uuid,
    pub method: String,
    pub trigger_source: String,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub targets_processed: i32,
    pub records_extracted: i32,
    pub success_rate: Option<f64>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A row from the `scrape_run_targets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScrapeRunTargetRow {
    pub id: i64,
    pub scrape_run_id: i64,
    pub target_slug: String,
    pub method: String,
    pub status: String,
    pub records_extracted: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// scrape_runs operations
// ---------------------------------------------------------------------------

/// Creates a new scrape run in `queued` status.
///
/// Generates a UUID in Rust and binds it to `public_id`. Returns the full
/// newly-created row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert or fetch fails.
pub async fn create_scrape_run(
    pool: &PgPool,
    method: &str,
    trigger_source: &str,
) -> Result<ScrapeRunRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, ScrapeRunRow>(
        "INSERT INTO scrape_runs (public_id, method, trigger_source, status) \
         VALUES ($1, $2, $3, 'queued') \
         RETURNING id, public_id, method, trigger_source, status, \
                   started_at, completed_at, targets_processed, records_extracted, \
                   success_rate, error_message, created_at",
    )
    .bind(public_id)
    .bind(method)
    .bind(trigger_source)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a run as `running` and sets `started_at = NOW()`.
///
/// # Errors
///
/// Returns [`DbError::InvalidScrapeRunTransition`] if the run is not in
/// `queued` status, or [`DbError::Sqlx`] if the update fails.
pub async fn start_scrape_run(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE scrape_runs \
         SET status = 'running', started_at = NOW() \
         WHERE id = $1 AND status = 'queued'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidScrapeRunTransition {
            id,
            expected_status: "queued",
        });
    }

    Ok(())
}

/// Marks a run as `succeeded`, sets `completed_at = NOW()` and the final
/// aggregate counts.
///
/// # Errors
///
/// Returns [`DbError::InvalidScrapeRunTransition`] if the run is not in
/// `running` status, or [`DbError::Sqlx`] if the update fails.
pub async fn complete_scrape_run(
    pool: &PgPool,
    id: i64,
    targets_processed: i32,
    records_extracted: i32,
    success_rate: f64,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE scrape_runs \
         SET status = 'succeeded', completed_at = NOW(), \
             targets_processed = $1, records_extracted = $2, success_rate = $3 \
         WHERE id = $4 AND status = 'running'",
    )
    .bind(targets_processed)
    .bind(records_extracted)
    .bind(success_rate)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidScrapeRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Marks a run as `failed`, sets `completed_at = NOW()` and `error_message`.
///
/// # Errors
///
/// Returns [`DbError::InvalidScrapeRunTransition`] if the run is not in
/// `running` status, or [`DbError::Sqlx`] if the update fails.
pub async fn fail_scrape_run(pool: &PgPool, id: i64, error_message: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE scrape_runs \
         SET status = 'failed', completed_at = NOW(), error_message = $1 \
         WHERE id = $2 AND status = 'running'",
    )
    .bind(error_message)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidScrapeRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Fetches a single run by its external `public_id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_scrape_run_by_public_id(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<ScrapeRunRow, DbError> {
    let row = sqlx::query_as::<_, ScrapeRunRow>(
        "SELECT id, public_id, method, trigger_source, status, \
                started_at, completed_at, targets_processed, records_extracted, \
                success_rate, error_message, created_at \
         FROM scrape_runs \
         WHERE public_id = $1",
    )
    .bind(public_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns the most recent `limit` runs, ordered by `created_at DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_scrape_runs(pool: &PgPool, limit: i64) -> Result<Vec<ScrapeRunRow>, DbError> {
    let rows = sqlx::query_as::<_, ScrapeRunRow>(
        "SELECT id, public_id, method, trigger_source, status, \
                started_at, completed_at, targets_processed, records_extracted, \
                success_rate, error_message, created_at \
         FROM scrape_runs \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

// ---------------------------------------------------------------------------
// scrape_run_targets operations
// ---------------------------------------------------------------------------

/// Inserts or updates the per-target result row for a scrape run.
///
/// Conflicts on `(scrape_run_id, target_slug)` update `method`, `status`,
/// `records_extracted`, and `error_message` in place.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_scrape_run_target(
    pool: &PgPool,
    run_id: i64,
    target_slug: &str,
    method: &str,
    status: &str,
    records_extracted: Option<i32>,
    error_message: Option<&str>,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO scrape_run_targets \
             (scrape_run_id, target_slug, method, status, records_extracted, error_message) \
         VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6) \
         ON CONFLICT (scrape_run_id, target_slug) DO UPDATE SET \
             method            = EXCLUDED.method, \
             status            = EXCLUDED.status, \
             records_extracted = EXCLUDED.records_extracted, \
             error_message     = EXCLUDED.error_message",
    )
    .bind(run_id)
    .bind(target_slug)
    .bind(method)
    .bind(status)
    .bind(records_extracted)
    .bind(error_message)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns all target-level result rows for a given scrape run.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_scrape_run_targets(
    pool: &PgPool,
    run_id: i64,
) -> Result<Vec<ScrapeRunTargetRow>, DbError> {
    let rows = sqlx::query_as::<_, ScrapeRunTargetRow>(
        "SELECT id, scrape_run_id, target_slug, method, status, records_extracted, \
                error_message, created_at \
         FROM scrape_run_targets \
         WHERE scrape_run_id = $1",
    )
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
