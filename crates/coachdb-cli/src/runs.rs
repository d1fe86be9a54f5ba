//! Scrape run status queries.

use clap::Subcommand;
use serde_json::json;

#[derive(Debug, Subcommand)]
pub(crate) enum RunsCommands {
    /// List recent runs, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Show one run with its per-target results
    Show { public_id: uuid::Uuid },
}

pub(crate) async fn run(pool: &sqlx::PgPool, command: RunsCommands) -> anyhow::Result<()> {
    match command {
        RunsCommands::List { limit } => {
            let rows = coachdb_db::list_scrape_runs(pool, limit).await?;
            if rows.is_empty() {
                println!("no scrape runs recorded");
                return Ok(());
            }
            for row in rows {
                let completed = row
                    .completed_at
                    .map_or_else(|| "-".to_string(), |t| t.to_rfc3339());
                println!(
                    "{}  {:<8} {:<9} {:>4} targets {:>5} records  started={} completed={}",
                    row.public_id,
                    row.method,
                    row.status,
                    row.targets_processed,
                    row.records_extracted,
                    row.started_at
                        .map_or_else(|| "-".to_string(), |t| t.to_rfc3339()),
                    completed,
                );
            }
        }
        RunsCommands::Show { public_id } => {
            let row = coachdb_db::get_scrape_run_by_public_id(pool, public_id).await?;
            let targets = coachdb_db::list_scrape_run_targets(pool, row.id).await?;

            // The externally exposed status shape.
            let payload = json!({
                "job_id": row.public_id,
                "method": row.method,
                "status": row.status,
                "schools_processed": row.targets_processed,
                "coaches_extracted": row.records_extracted,
                "success_rate": row.success_rate,
                "started_at": row.started_at,
                "completed_at": row.completed_at,
                "errors": row.error_message,
                "targets": targets.iter().map(|t| json!({
                    "target": t.target_slug,
                    "method": t.method,
                    "status": t.status,
                    "records": t.records_extracted,
                    "error": t.error_message,
                })).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }
    Ok(())
}
