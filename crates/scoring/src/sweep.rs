//! Background sweep service

use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::notify::Notifier;
use crate::standing::StandingEngine;
use crate::store::Store;

/// Configuration for the sweep service
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Interval between sweep passes; zero means a single pass
    pub interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15 * 60), // 15 minutes
        }
    }
}

/// Outcome of one sweep pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub activities_processed: usize,
    pub players_penalized: usize,
    pub penalties_expired: u64,
}

/// Periodically detects no-shows and expires penalties
pub struct SweepService<S, N> {
    engine: StandingEngine<S, N>,
    config: SweepConfig,
}

impl<S: Store, N: Notifier> SweepService<S, N> {
    pub fn new(engine: StandingEngine<S, N>, config: SweepConfig) -> Self {
        Self { engine, config }
    }

    /// Start the sweep loop. A zero interval runs a single pass and returns.
    pub async fn run(self) {
        if self.config.interval.is_zero() {
            warn!("Sweep interval is zero, running a single pass");
            if let Err(e) = self.sweep_once().await {
                error!("Sweep failed: {}", e);
            }
            return;
        }

        info!(
            "Starting sweep service (interval: {:?})",
            self.config.interval
        );

        let mut ticker = interval(self.config.interval);

        loop {
            ticker.tick().await;

            if let Err(e) = self.sweep_once().await {
                error!("Sweep failed: {}", e);
            }
        }
    }

    /// Run a single pass: no-show detection, then penalty expiry
    pub async fn sweep_once(&self) -> common::Result<SweepReport> {
        let now = Utc::now();
        let no_shows = self.engine.detect_no_shows(now).await?;
        let penalties_expired = self.engine.expire_penalties(now).await?;

        let report = SweepReport {
            activities_processed: no_shows.activities_processed,
            players_penalized: no_shows.players_penalized,
            penalties_expired,
        };
        info!(
            "Sweep complete: {} activities, {} no-shows, {} penalties expired",
            report.activities_processed, report.players_penalized, report.penalties_expired
        );
        Ok(report)
    }
}
