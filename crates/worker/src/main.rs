//! TribeUp scoring worker

use std::time::Duration;

use scoring::{PgNotifier, StandingEngine, SweepConfig, SweepService};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tribeup=debug".parse()?)
                .add_directive("scoring=debug".parse()?),
        )
        .init();

    info!("Starting TribeUp scoring worker");

    // Load configuration
    let config = common::Config::from_env();
    config.validate()?;

    // Connect to database
    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;

    if config.run_migrations {
        db::run_migrations(&pool).await?;
    } else {
        info!("Skipping migrations (RUN_MIGRATIONS=false)");
    }

    let engine = StandingEngine::new(pool.clone(), PgNotifier::new(pool.clone()))
        .with_no_show_grace_hours(config.no_show_grace_hours);

    let sweep_config = SweepConfig {
        interval: Duration::from_secs(config.sweep_interval_secs),
    };
    let service = SweepService::new(engine, sweep_config);

    if config.sweep_interval_secs == 0 {
        info!("Sweep loop disabled (SWEEP_INTERVAL_SECS=0), running a single pass");
        let report = service.sweep_once().await?;
        info!(
            "Processed {} activities, penalized {} players, expired {} penalties",
            report.activities_processed, report.players_penalized, report.penalties_expired
        );
        return Ok(());
    }

    info!("Sweeping every {} seconds", config.sweep_interval_secs);
    service.run().await;

    Ok(())
}
