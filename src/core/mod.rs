//! Core types and shared state
//!
//! - Symbol: validated trading-pair identifier
//! - CurrencyInfo / PriceSnapshot / CacheEntry: cached market data
//! - PriceCache: symbol -> entry map behind a reader/writer lock
//! - SymbolRegistry: ordered symbol list driving the refresher

pub mod market_data;
pub mod price_cache;
pub mod registry;
pub mod symbol;

pub use market_data::{CacheEntry, CurrencyInfo, PriceSnapshot};
pub use price_cache::PriceCache;
pub use registry::SymbolRegistry;
pub use symbol::Symbol;
