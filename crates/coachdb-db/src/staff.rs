//! Write operations for the `staff_records` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// A staff record ready for persistence.
#[derive(Debug, Clone)]
pub struct NewStaffRecord {
    pub record_key: String,
    pub name: String,
    pub title: String,
    pub sport: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub confidence: f64,
    pub method: String,
    pub extracted_at: DateTime<Utc>,
}

/// Insert new staff records and refresh existing ones.
///
/// Returns `(new_count, updated_count)` where:
/// - `new_count`: rows that did not exist before (were inserted)
/// - `updated_count`: rows that already existed (were updated)
///
/// Uses a single `INSERT … SELECT * FROM UNNEST(…) ON CONFLICT` so that the
/// entire batch is upserted in one round-trip regardless of batch size. The
/// conflict key is `(target_slug, record_key)` — the same stable hash the
/// extraction layer computes over target, name, and sport.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn upsert_staff_records(
    pool: &PgPool,
    target_slug: &str,
    records: &[NewStaffRecord],
) -> Result<(u64, u64), sqlx::Error> {
    if records.is_empty() {
        return Ok((0, 0));
    }

    // Collect each column into a parallel Vec for UNNEST binding.
    let mut record_keys: Vec<String> = Vec::with_capacity(records.len());
    let mut names: Vec<String> = Vec::with_capacity(records.len());
    let mut titles: Vec<String> = Vec::with_capacity(records.len());
    let mut sports: Vec<String> = Vec::with_capacity(records.len());
    let mut emails: Vec<Option<String>> = Vec::with_capacity(records.len());
    let mut phones: Vec<Option<String>> = Vec::with_capacity(records.len());
    let mut bios: Vec<Option<String>> = Vec::with_capacity(records.len());
    let mut photo_urls: Vec<Option<String>> = Vec::with_capacity(records.len());
    let mut confidences: Vec<f64> = Vec::with_capacity(records.len());
    let mut methods: Vec<String> = Vec::with_capacity(records.len());
    let mut extracted_ats: Vec<DateTime<Utc>> = Vec::with_capacity(records.len());

    for record in records {
        record_keys.push(record.record_key.clone());
        names.push(record.name.clone());
        titles.push(record.title.clone());
        sports.push(record.sport.clone());
        emails.push(record.email.clone());
        phones.push(record.phone.clone());
        bios.push(record.bio.clone());
        photo_urls.push(record.photo_url.clone());
        confidences.push(record.confidence);
        methods.push(record.method.clone());
        extracted_ats.push(record.extracted_at);
    }

    let rows: Vec<bool> = sqlx::query_scalar::<_, bool>(
        "INSERT INTO staff_records \
             (target_slug, record_key, name, title, sport, email, phone, bio, \
              photo_url, confidence, method, extracted_at) \
         SELECT $1, * FROM UNNEST(\
              $2::text[], $3::text[], $4::text[], $5::text[], $6::text[], $7::text[], \
              $8::text[], $9::text[], $10::float8[], $11::text[], $12::timestamptz[]) \
         ON CONFLICT (target_slug, record_key) DO UPDATE SET \
             last_seen_at = NOW(), \
             updated_at   = NOW(), \
             name         = EXCLUDED.name, \
             title        = EXCLUDED.title, \
             sport        = EXCLUDED.sport, \
             email        = COALESCE(EXCLUDED.email, staff_records.email), \
             phone        = COALESCE(EXCLUDED.phone, staff_records.phone), \
             bio          = COALESCE(EXCLUDED.bio, staff_records.bio), \
             photo_url    = COALESCE(EXCLUDED.photo_url, staff_records.photo_url), \
             confidence   = EXCLUDED.confidence, \
             method       = EXCLUDED.method, \
             extracted_at = EXCLUDED.extracted_at \
         RETURNING (xmax = 0) AS is_new",
    )
    .bind(target_slug)
    .bind(&record_keys)
    .bind(&names)
    .bind(&titles)
    .bind(&sports)
    .bind(&emails)
    .bind(&phones)
    .bind(&bios)
    .bind(&photo_urls)
    .bind(&confidences)
    .bind(&methods)
    .bind(&extracted_ats)
    .fetch_all(pool)
    .await?;

    let new_count = rows.iter().filter(|&&is_new| is_new).count() as u64;
    let updated_count = rows.len() as u64 - new_count;

    Ok((new_count, updated_count))
}
