//! Market-data source abstraction
//!
//! The service and refresher are generic over this trait, so tests can swap
//! the HTTP client for a scripted in-memory source. Futures are required to
//! be `Send` because the refresher runs on a spawned task.

use std::future::Future;

use crate::core::{CurrencyInfo, PriceSnapshot, Symbol};
use crate::Result;

/// Read-only view of an external market-data provider
///
/// # Errors
/// - `Error::Unavailable` for any transport, status or decode failure
/// - `Error::NotTradable` when the provider reports the symbol as not working
pub trait MarketDataSource: Send + Sync + 'static {
    /// Provider name (for logging)
    fn name(&self) -> &'static str;

    /// Resolve symbol -> base currency metadata (two chained lookups)
    fn fetch_currency_metadata(
        &self,
        symbol: &Symbol,
    ) -> impl Future<Output = Result<CurrencyInfo>> + Send;

    /// Fetch the latest quote for `symbol`
    fn fetch_price(&self, symbol: &Symbol) -> impl Future<Output = Result<PriceSnapshot>> + Send;
}
