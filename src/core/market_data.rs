//! Market data types
//!
//! CurrencyInfo is fixed once a symbol is registered; PriceSnapshot is
//! replaced on every refresh. A CacheEntry composes the two.

use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

use super::Symbol;

/// Base-currency metadata for a symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    /// Exchange-assigned base currency code
    pub id: String,
    /// Display name, e.g. "Ethereum"
    pub full_name: String,
    /// Currency the trading fee is charged in
    pub fee_currency: String,
}

/// Latest quote fields, preserved verbatim as the provider formats them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ask: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub bid: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub open: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub high: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub low: String,
}

/// One cached symbol: shared currency metadata plus its current price
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    pub symbol: Symbol,
    #[serde(flatten)]
    pub currency: Arc<CurrencyInfo>,
    #[serde(flatten)]
    pub price: PriceSnapshot,
}

impl CacheEntry {
    pub fn new(symbol: Symbol, currency: CurrencyInfo, price: PriceSnapshot) -> Self {
        Self {
            symbol,
            currency: Arc::new(currency),
            price,
        }
    }

    /// Same symbol and currency, new price
    pub fn with_price(&self, price: PriceSnapshot) -> Self {
        Self {
            symbol: self.symbol.clone(),
            currency: Arc::clone(&self.currency),
            price,
        }
    }
}

/// Provider sends `null` for quote fields with no book (e.g. no bids yet)
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
