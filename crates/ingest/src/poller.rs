use anyhow::Context;
use std::future::Future;
use std::pin::pin;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, instrument};
use tron_data_client::BlockSource;
use tron_storage::db::BlockSummary;
use tron_storage::DBRef;


#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub succeeded: u64,
    pub failed: u64,
}


impl PollStats {
    pub fn ticks(&self) -> u64 {
        self.succeeded + self.failed
    }
}


/// Fetches the head block and stores it, one tick at a time.
pub struct Poller<S> {
    source: S,
    db: DBRef,
    interval: Duration,
    max_ticks: Option<u64>,
}


impl <S: BlockSource> Poller<S> {
    pub fn new(source: S, db: DBRef, interval: Duration) -> Self {
        Self {
            source,
            db,
            interval,
            max_ticks: None
        }
    }

    pub fn with_max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Runs until `shutdown` completes or the tick limit is reached.
    ///
    /// The first tick fires right away. A tick is never interrupted: shutdown
    /// is only observed while waiting for the next one.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) -> PollStats {
        let mut shutdown = pin!(shutdown);

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut stats = PollStats::default();

        loop {
            if self.max_ticks.map_or(false, |max| stats.ticks() >= max) {
                info!("reached the limit of {} polls", stats.ticks());
                break
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break
                },
                _ = interval.tick() => {}
            }

            match self.tick().await {
                Ok(summary) => {
                    stats.succeeded += 1;
                    if !summary.new_block {
                        info!(
                            block_id = %summary.block_id,
                            "block {} is already stored, node has not advanced",
                            summary.number
                        );
                    }
                },
                Err(err) => {
                    stats.failed += 1;
                    error!(error = ?err, "failed to ingest block");
                }
            }
        }

        stats
    }

    #[instrument(level = "debug", skip_all)]
    pub async fn tick(&self) -> anyhow::Result<BlockSummary> {
        let bytes = self.source.get_now_block().await.context("failed to fetch block")?;
        let db = self.db.clone();
        let summary = tokio::task::spawn_blocking(move || db.insert_block_json(&bytes))
            .await
            .context("block persisting task panicked")??;
        Ok(summary)
    }
}
