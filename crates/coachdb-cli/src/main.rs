mod runs;
mod scrape;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "coachdb")]
#[command(about = "Coaching staff collection pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a batch scrape over the configured targets
    Scrape {
        /// Restrict the batch to a single target (by slug)
        #[arg(long)]
        target: Option<String>,

        /// Acquisition route for the batch
        #[arg(long, value_enum, default_value_t = MethodArg::Hybrid)]
        method: MethodArg,

        /// Minimum remote-extraction record count before fallback is skipped
        #[arg(long)]
        min_records: Option<usize>,

        /// Preview the target list without creating a run
        #[arg(long)]
        dry_run: bool,

        /// Where to write the JSON batch report
        #[arg(long)]
        report: Option<std::path::PathBuf>,
    },
    /// Inspect past scrape runs
    Runs {
        #[command(subcommand)]
        command: runs::RunsCommands,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    Hybrid,
    Remote,
    Stealth,
}

impl From<MethodArg> for coachdb_scraper::ScrapeMethod {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Hybrid => coachdb_scraper::ScrapeMethod::Hybrid,
            MethodArg::Remote => coachdb_scraper::ScrapeMethod::Remote,
            MethodArg::Stealth => coachdb_scraper::ScrapeMethod::Stealth,
        }
    }
}

/// Mark a run failed, logging rather than propagating any secondary error so
/// the original failure stays visible.
pub(crate) async fn fail_run_best_effort(
    pool: &sqlx::PgPool,
    run_id: i64,
    method: &str,
    message: String,
) {
    tracing::error!(run_id, method, "{message}");
    if let Err(e) = coachdb_db::fail_scrape_run(pool, run_id, &message).await {
        tracing::error!(run_id, error = %e, "additionally failed to mark run as failed");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = coachdb_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();

    let pool_config = coachdb_db::PoolConfig {
        max_connections: config.db_max_connections,
        min_connections: config.db_min_connections,
        acquire_timeout_secs: config.db_acquire_timeout_secs,
    };
    let pool = coachdb_db::connect_pool(&config.database_url, pool_config).await?;

    match cli.command {
        Commands::Scrape {
            target,
            method,
            min_records,
            dry_run,
            report,
        } => {
            let args = scrape::ScrapeArgs {
                target_filter: target,
                method: method.into(),
                min_records,
                dry_run,
                report_path: report,
            };
            scrape::run_scrape_batch(&pool, &config, args).await
        }
        Commands::Runs { command } => runs::run(&pool, command).await,
    }
}
