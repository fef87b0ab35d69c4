use anyhow::{Context, Result};
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, error, info};

use crate::{
    arbitrage::{find_all_arbitrage_opportunities, ReportSummary},
    bookmaker::BookmakerRegistry,
    config::Config,
    normalizer::Normalizer,
    store::SnapshotStore,
    types::{BookmakerDataset, RunReport},
};

pub struct ArbitrageScanner {
    config: Config,
    store: Box<dyn SnapshotStore>,
    registry: BookmakerRegistry,
}

impl ArbitrageScanner {
    pub fn new(config: Config, store: Box<dyn SnapshotStore>) -> Self {
        let registry = BookmakerRegistry::new(&config.arbitrage.excluded_markets);

        info!(
            "Scanner initialized with {} bookmakers from {} store",
            config.bookmakers.len(),
            store.name()
        );

        Self {
            config,
            store,
            registry,
        }
    }

    /// Loads every configured bookmaker, then searches all pairs. Any load or
    /// normalization failure aborts the run before arbitrage is computed.
    pub fn run_once(&self) -> Result<RunReport> {
        let datasets = self.load_datasets()?;

        let pairs = find_all_arbitrage_opportunities(&datasets);
        let summary = ReportSummary::from_reports(datasets.len(), &pairs);

        match &summary.best {
            Some(best) => info!(
                "Run complete: {} opportunities across {}/{} bookmaker pairs, best {:.2}% ({} - {}, {}, {})",
                summary.total_opportunities,
                summary.pairs_with_opportunities,
                summary.pairs_evaluated,
                best.arbitrage_profit_percent,
                best.home_team,
                best.away_team,
                best.market,
                best.bookmaker_pair
            ),
            None => info!(
                "Run complete: no arbitrage opportunities across {} bookmaker pairs",
                summary.pairs_evaluated
            ),
        }

        Ok(RunReport::new(pairs))
    }

    fn load_datasets(&self) -> Result<Vec<BookmakerDataset>> {
        let profiles = self.registry.resolve(&self.config.bookmakers)?;

        profiles
            .into_iter()
            .map(|profile| -> Result<BookmakerDataset> {
                let records = self
                    .store
                    .fetch(profile.id)
                    .with_context(|| format!("Failed to load {} snapshot", profile.id))?;

                let dataset = Normalizer::normalize(profile, &records)
                    .with_context(|| format!("Failed to normalize {} snapshot", profile.id))?;

                debug!("Loaded {}: {} rows", profile.id, dataset.len());
                Ok(dataset)
            })
            .collect()
    }

    /// Runs once, or on `check_interval_seconds` until the returned future is
    /// dropped. In interval mode a failed run is logged and the next tick
    /// tries again. Cancellation lands at the tick, never inside a run.
    pub async fn start<F>(&mut self, mut on_report: F) -> Result<()>
    where
        F: FnMut(&RunReport),
    {
        let seconds = self.config.arbitrage.check_interval_seconds;
        if seconds == 0 {
            let report = self.run_once()?;
            on_report(&report);
            return Ok(());
        }

        let mut ticker = interval(Duration::from_secs(seconds));
        let mut cycle_count = 0u64;

        info!("Starting scan loop with {} second intervals", seconds);

        loop {
            ticker.tick().await;
            cycle_count += 1;

            match self.run_once() {
                Ok(report) => {
                    debug!("Scan cycle #{} completed", cycle_count);
                    on_report(&report);
                }
                Err(e) => error!("Error in scan cycle #{}: {:#}", cycle_count, e),
            }
        }
    }
}
