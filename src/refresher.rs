//! Background refresher
//!
//! Walks the symbol registry round-robin, one symbol per tick, re-fetching
//! its price and writing it into the cache. Order is registry insertion
//! order, wrapping; a newly appended symbol is reached within one cycle.
//!
//! The registry lock is only held to pick the next symbol. The fetch runs
//! with no lock held, so a slow provider never blocks cache readers. A failed
//! fetch skips the symbol until its next turn; there is no retry.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Level;

use crate::core::Symbol;
use crate::exchanges::MarketDataSource;
use crate::log_refresh;
use crate::service::{PriceService, RefreshOutcome};

pub struct Refresher<S> {
    service: Arc<PriceService<S>>,
    interval: Duration,
    cursor: usize,
}

impl<S: MarketDataSource> Refresher<S> {
    pub fn new(service: Arc<PriceService<S>>, interval: Duration) -> Self {
        Self {
            service,
            interval,
            cursor: 0,
        }
    }

    /// Start the loop on the runtime. The first tick runs immediately.
    pub fn spawn(service: Arc<PriceService<S>>, interval: Duration) -> RefresherHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let refresher = Self::new(service, interval);
        let task = tokio::spawn(refresher.run(shutdown_rx));
        RefresherHandle { shutdown, task }
    }

    /// Index of the next symbol to refresh (before wrapping)
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// One refresh step without the trailing sleep.
    ///
    /// Returns the symbol visited, or `None` when the registry is empty.
    pub async fn tick(&mut self) -> Option<(Symbol, RefreshOutcome)> {
        let (index, symbol) = self.service.registry().select(self.cursor)?;

        log_refresh!(Level::DEBUG, "Fetching the new info for symbol {} (#{})", symbol, index);

        let outcome = self.service.refresh_symbol(&symbol).await;
        match outcome {
            RefreshOutcome::Updated => {}
            RefreshOutcome::Failed => {
                log_refresh!(
                    Level::WARN,
                    "Failed to fetch the current price of {}, skipping this round",
                    symbol
                );
            }
            RefreshOutcome::Missing => {
                log_refresh!(Level::WARN, "Missing cache entry for registered symbol {}", symbol);
            }
        }

        self.cursor = index + 1;
        Some((symbol, outcome))
    }

    /// Tick, sleep, repeat until `shutdown` flips to true or its sender
    /// is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        log_refresh!(Level::INFO, "Refresher started, interval {:?}", self.interval);

        while !*shutdown.borrow() {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = self.tick() => {}
            }

            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        log_refresh!(Level::INFO, "Refresher stopped");
    }
}

/// Owner of a spawned refresher task
pub struct RefresherHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefresherHandle {
    /// Signal the loop to stop and wait for it. Interrupts an in-flight
    /// fetch or sleep; a cache write, once started, always completes.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            log_refresh!(Level::ERROR, "Refresher task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
