//! Price service
//!
//! Owns the price cache, the symbol registry and the market-data source.
//! Constructed once at startup and shared by `Arc` between the HTTP façade
//! and the refresher.
//!
//! Lock discipline: no lock is held across a network call, and the cache
//! and registry locks are never held at the same time. Registration writes
//! the cache first, then the registry.

use std::sync::Arc;

use crate::core::{CacheEntry, PriceCache, Symbol, SymbolRegistry};
use crate::exchanges::MarketDataSource;
use crate::infrastructure::metrics::MetricsCollector;
use crate::{Error, Result};

/// Result of refreshing one symbol's price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New price written, currency kept
    Updated,
    /// Fetch failed; entry left as it was
    Failed,
    /// Fetch succeeded but the cache has no entry for the symbol
    Missing,
}

pub struct PriceService<S> {
    source: S,
    cache: PriceCache,
    registry: SymbolRegistry,
    metrics: Arc<MetricsCollector>,
}

impl<S: MarketDataSource> PriceService<S> {
    /// Empty service
    pub fn new(source: S) -> Self {
        Self::with_metrics(source, Arc::new(MetricsCollector::new()))
    }

    pub fn with_metrics(source: S, metrics: Arc<MetricsCollector>) -> Self {
        Self {
            source,
            cache: PriceCache::new(),
            registry: SymbolRegistry::new(),
            metrics,
        }
    }

    /// Build a service seeded with `seeds`, in order.
    ///
    /// Runs before any traffic is accepted. Any seed whose metadata or price
    /// cannot be fetched fails the whole bootstrap. Repeated seeds are
    /// loaded once.
    pub async fn bootstrap(source: S, seeds: &[Symbol]) -> Result<Self> {
        let service = Self::new(source);

        for symbol in seeds {
            if service.cache.contains(symbol.as_str()) {
                tracing::warn!("Duplicate seed symbol {} ignored", symbol);
                continue;
            }

            let entry = service.fetch_entry(symbol).await.map_err(|e| {
                tracing::error!("Failed to load seed symbol {}: {}", symbol, e);
                e
            })?;
            service.cache.put(entry);
            service.registry.append(symbol.clone());
        }

        tracing::info!(
            "Price cache bootstrapped with {} symbols from {}",
            service.registry.len(),
            service.source.name()
        );
        Ok(service)
    }

    /// Cached entry for `symbol`
    pub fn get_one(&self, symbol: &str) -> Result<CacheEntry> {
        self.cache
            .get(symbol)
            .ok_or_else(|| Error::NotFound(symbol.to_string()))
    }

    /// All cached entries, unspecified order. Empty cache -> empty vec.
    pub fn get_all(&self) -> Vec<CacheEntry> {
        self.cache.get_all()
    }

    /// Add a new symbol: fetch currency and price, then publish it to the
    /// cache and append it to the registry.
    ///
    /// The entry becomes visible to cache readers slightly before the
    /// refresher can pick it from the registry. Two concurrent
    /// registrations of the same symbol may both fetch; the cache insert
    /// decides the winner and the loser gets `AlreadyRegistered`.
    pub async fn register(&self, symbol: Symbol) -> Result<CacheEntry> {
        if self.cache.contains(symbol.as_str()) {
            return Err(Error::AlreadyRegistered(symbol.to_string()));
        }

        let entry = self.fetch_entry(&symbol).await?;

        if !self.cache.insert_if_absent(entry.clone()) {
            return Err(Error::AlreadyRegistered(symbol.to_string()));
        }
        self.registry.append(symbol.clone());
        self.metrics.record_registration();

        tracing::info!("Registered symbol {} ({})", symbol, entry.currency.full_name);
        Ok(entry)
    }

    /// Re-fetch the price of one symbol and swap it into the cache.
    ///
    /// The fetch runs with no lock held. On failure nothing is written.
    pub async fn refresh_symbol(&self, symbol: &Symbol) -> RefreshOutcome {
        match self.source.fetch_price(symbol).await {
            Ok(price) => {
                if self.cache.replace_price(symbol.as_str(), price) {
                    self.metrics.record_refresh_success();
                    RefreshOutcome::Updated
                } else {
                    self.metrics.record_refresh_missing();
                    RefreshOutcome::Missing
                }
            }
            Err(_) => {
                self.metrics.record_refresh_failure();
                RefreshOutcome::Failed
            }
        }
    }

    async fn fetch_entry(&self, symbol: &Symbol) -> Result<CacheEntry> {
        let currency = self.source.fetch_currency_metadata(symbol).await?;
        let price = self.source.fetch_price(symbol).await?;
        Ok(CacheEntry::new(symbol.clone(), currency, price))
    }

    pub fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        Arc::clone(&self.metrics)
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sym, MockSource};
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_bootstrap_seeds_in_order() {
        let source = MockSource::new()
            .with_symbol("ETHBTC", "ETH", "0.05")
            .with_symbol("BTCUSDC", "BTC", "60000");

        let service = assert_ok!(
            PriceService::bootstrap(source, &[sym("ETHBTC"), sym("BTCUSDC"), sym("ETHBTC")]).await
        );

        assert_eq!(service.registry().list(), vec![sym("ETHBTC"), sym("BTCUSDC")]);
        assert_eq!(service.cache().len(), 2);
        assert_eq!(service.get_one("BTCUSDC").unwrap().price.last, "60000");
    }

    #[tokio::test]
    async fn test_bootstrap_fails_on_any_seed() {
        let source = MockSource::new()
            .with_symbol("ETHBTC", "ETH", "0.05")
            .with_symbol("BTCUSDC", "BTC", "60000");
        source.fail_price("BTCUSDC", true);

        let result = PriceService::bootstrap(source, &[sym("ETHBTC"), sym("BTCUSDC")]).await;
        assert!(matches!(result, Err(Error::Unavailable)));

        let source = MockSource::new().with_symbol("ETHBTC", "ETH", "0.05");
        let result = PriceService::bootstrap(source, &[sym("ETHBTC"), sym("NOPE")]).await;
        assert!(matches!(result, Err(Error::Unavailable)));
    }

    #[tokio::test]
    async fn test_get_one_unknown_and_empty_get_all() {
        let service = PriceService::new(MockSource::new());

        assert!(matches!(service.get_one("UNKNOWN"), Err(Error::NotFound(ref s)) if s == "UNKNOWN"));
        assert!(service.get_all().is_empty());
    }

    #[tokio::test]
    async fn test_register_then_read() {
        let service = PriceService::new(MockSource::new().with_symbol("XRPUSDT", "XRP", "0.52"));

        let entry = assert_ok!(service.register(sym("XRPUSDT")).await);

        let got = service.get_one("XRPUSDT").unwrap();
        assert_eq!(got, entry);
        assert_eq!(got.currency.id, "XRP");
        assert_eq!(got.currency.full_name, "XRP coin");
        assert_eq!(got.price.last, "0.52");
        assert!(service.registry().contains("XRPUSDT"));
        assert_eq!(service.metrics().snapshot().registrations, 1);
    }

    #[tokio::test]
    async fn test_register_twice() {
        let service = PriceService::new(MockSource::new().with_symbol("XRPUSDT", "XRP", "0.52"));

        assert_ok!(service.register(sym("XRPUSDT")).await);
        let err = assert_err!(service.register(sym("XRPUSDT")).await);
        assert!(matches!(err, Error::AlreadyRegistered(_)));

        assert_eq!(service.registry().len(), 1);
        // No refetch for an already registered symbol
        assert_eq!(service.source().currency_calls(), vec!["XRPUSDT"]);
    }

    #[tokio::test]
    async fn test_register_surfaces_errors_without_writing() {
        let source = MockSource::new()
            .with_symbol("XYZBTC", "XYZ", "1")
            .with_symbol("DOGEUSDT", "DOGE", "0.1");
        source.suspend("XYZBTC");
        source.fail_price("DOGEUSDT", true);
        let service = PriceService::new(source);

        let err = service.register(sym("XYZBTC")).await.unwrap_err();
        assert!(matches!(err, Error::NotTradable(_)));

        let err = service.register(sym("DOGEUSDT")).await.unwrap_err();
        assert!(matches!(err, Error::Unavailable));

        let err = service.register(sym("MISSING")).await.unwrap_err();
        assert!(matches!(err, Error::Unavailable));

        assert!(service.get_all().is_empty());
        assert!(service.registry().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_register_same_symbol() {
        let source = MockSource::new().with_symbol("XRPUSDT", "XRP", "0.52");
        source.set_delay(Duration::from_millis(20));
        let service = PriceService::new(source);

        let (a, b) = tokio::join!(
            service.register(sym("XRPUSDT")),
            service.register(sym("XRPUSDT"))
        );

        assert!(a.is_ok() ^ b.is_ok());
        assert!(matches!(a.err().or(b.err()), Some(Error::AlreadyRegistered(_))));
        assert_eq!(service.registry().list(), vec![sym("XRPUSDT")]);
    }

    #[tokio::test]
    async fn test_refresh_symbol_replaces_price_only() {
        let source = MockSource::new().with_symbol("ETHBTC", "ETH", "0.05");
        let service = PriceService::bootstrap(source, &[sym("ETHBTC")]).await.unwrap();
        let before = service.get_one("ETHBTC").unwrap();

        service.source().set_price("ETHBTC", "0.07");
        assert_eq!(service.refresh_symbol(&sym("ETHBTC")).await, RefreshOutcome::Updated);

        let after = service.get_one("ETHBTC").unwrap();
        assert_eq!(after.price.last, "0.07");
        assert_eq!(after.currency, before.currency);
        assert_eq!(service.metrics().snapshot().refresh_success, 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_entry_unchanged() {
        let source = MockSource::new().with_symbol("ETHBTC", "ETH", "0.05");
        let service = PriceService::bootstrap(source, &[sym("ETHBTC")]).await.unwrap();
        let before = service.get_one("ETHBTC").unwrap();

        service.source().set_price("ETHBTC", "0.07");
        service.source().fail_price("ETHBTC", true);
        assert_eq!(service.refresh_symbol(&sym("ETHBTC")).await, RefreshOutcome::Failed);

        assert_eq!(service.get_one("ETHBTC").unwrap(), before);
        assert_eq!(service.metrics().snapshot().refresh_failure, 1);
    }

    #[tokio::test]
    async fn test_refresh_missing_entry_is_skipped() {
        let service = PriceService::new(MockSource::new().with_symbol("ETHBTC", "ETH", "0.05"));

        assert_eq!(service.refresh_symbol(&sym("ETHBTC")).await, RefreshOutcome::Missing);
        assert!(service.get_all().is_empty());
        assert_eq!(service.metrics().snapshot().refresh_missing, 1);
    }
}
