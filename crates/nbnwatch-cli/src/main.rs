use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nbnwatch")]
#[command(about = "NBN plan tracker: scrape, normalize, and store provider plans")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one update batch over the stalest active providers.
    Run {
        /// Override the configured batch size.
        #[arg(long)]
        max_providers: Option<i64>,
    },
    /// Fetch and parse a single provider without persisting anything.
    Debug { slug: String },
    /// Upsert providers from the seed file into the database.
    Seed {
        /// Seed file path; defaults to the configured providers file.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Clear a provider's needs-review flag after manual correction.
    Approve { slug: String },
    /// Show a provider's stored plans.
    Plans { slug: String },
    /// Reactivate a provider for scraping.
    Enable { slug: String },
    /// Stop scraping a provider (providers are never deleted).
    Disable { slug: String },
    /// Show recent update runs.
    Runs {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = nbnwatch_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::debug!(?config, "loaded configuration");

    let pool_config = nbnwatch_db::PoolConfig::from_app_config(&config);
    let pool = nbnwatch_db::connect_pool(&config.database_url, pool_config).await?;
    nbnwatch_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Run { max_providers } => {
            let max = max_providers.unwrap_or(config.updater_batch_size);
            let summary = nbnwatch_updater::run_update_batch(&pool, &config, max).await?;
            println!(
                "checked {} providers: {} changed, {} errors",
                summary.checked, summary.changed, summary.errors
            );
        }
        Commands::Debug { slug } => {
            let report = nbnwatch_updater::debug_provider(&pool, &config, &slug).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Seed { file } => {
            let path = file.unwrap_or_else(|| config.providers_path.clone());
            let seeds = nbnwatch_core::load_providers(&path)?;
            let mut count = 0usize;
            for seed in &seeds.providers {
                nbnwatch_db::upsert_provider(&pool, seed).await?;
                count += 1;
            }
            println!("seeded {count} providers from {}", path.display());
        }
        Commands::Approve { slug } => {
            if nbnwatch_db::clear_needs_review(&pool, &slug).await? {
                println!("cleared needs-review for {slug}");
            } else {
                anyhow::bail!("provider '{slug}' not found");
            }
        }
        Commands::Plans { slug } => {
            let provider = nbnwatch_db::get_provider_by_slug(&pool, &slug)
                .await?
                .ok_or_else(|| anyhow::anyhow!("provider '{slug}' not found"))?;
            let plans = nbnwatch_db::list_plans_for_provider(&pool, provider.id).await?;
            if plans.is_empty() {
                println!("no plans stored for {slug}");
            }
            for plan in plans {
                let speed = plan
                    .speed_tier
                    .map_or_else(|| "?".to_string(), |t| t.to_string());
                let price = plan
                    .ongoing_price_cents
                    .map_or_else(|| "-".to_string(), |c| format!("${}.{:02}", c / 100, c % 100));
                let flag = if plan.is_active { "" } else { " [inactive]" };
                println!("NBN {speed:>5}  {price:>9}/mth  {}{flag}", plan.name);
            }
        }
        Commands::Enable { slug } => {
            if !nbnwatch_db::set_provider_active(&pool, &slug, true).await? {
                anyhow::bail!("provider '{slug}' not found");
            }
            println!("enabled {slug}");
        }
        Commands::Disable { slug } => {
            if !nbnwatch_db::set_provider_active(&pool, &slug, false).await? {
                anyhow::bail!("provider '{slug}' not found");
            }
            println!("disabled {slug}");
        }
        Commands::Runs { limit } => {
            let runs = nbnwatch_db::list_update_runs(&pool, limit).await?;
            if runs.is_empty() {
                println!("no update runs recorded");
            }
            for run in runs {
                let finished = run
                    .finished_at
                    .map_or_else(|| "-".to_string(), |t| t.to_rfc3339());
                println!(
                    "#{} {} started={} finished={} notes={}",
                    run.id,
                    run.status,
                    run.started_at.to_rfc3339(),
                    finished,
                    run.notes.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}
