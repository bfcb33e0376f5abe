//! Price cache service for HitBTC trading pairs
//!
//! # Architecture
//! - **core**: Symbol, market data types, price cache, symbol registry
//! - **exchanges**: market-data source trait and the HitBTC REST client
//! - **service**: registration workflow and bootstrap
//! - **refresher**: round-robin background price refresh
//! - **infrastructure**: API server, config, logging, metrics

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use ticker_cache::core::Symbol;
use ticker_cache::exchanges::HitbtcClient;
use ticker_cache::infrastructure::{logging::init_logging, start_server};
use ticker_cache::{Config, PriceService, Refresher};

/// Main application
pub struct App {
    config: Config,
}

impl App {
    /// Create new application instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Bootstrap the cache, then serve until Ctrl-C
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!("Starting price cache service...");

        // 1. Market-data client
        let client = HitbtcClient::new(&self.config.provider)?;

        // 2. Seed the cache before accepting any traffic
        let seeds = self
            .config
            .refresh
            .seed_symbols
            .iter()
            .map(|name| Symbol::parse(name))
            .collect::<Result<Vec<_>, _>>()?;

        let service = PriceService::bootstrap(client, &seeds)
            .await
            .context("Init price cache failed")?;
        let service = Arc::new(service);

        // 3. Background refresh
        let refresher = Refresher::spawn(Arc::clone(&service), self.config.refresh.interval());

        // 4. API server (blocks until shutdown)
        let served = start_server(service, &self.config.api, shutdown_signal()).await;

        refresher.shutdown().await;
        served?;

        tracing::info!("Service stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Keep the guards alive until exit so buffered log lines are flushed
    let _log_guards = init_logging(Path::new("logs")).context("Failed to initialize logging")?;

    let config = Config::load()?;
    config.validate()?;

    App::new(config).run().await
}
