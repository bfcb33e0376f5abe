//! In-memory cache of trading-pair metadata and live quotes
//!
//! Core library: price cache, symbol registry, market-data client and the
//! round-robin refresher that keeps cached prices warm.

pub mod core;
pub mod exchanges;
pub mod infrastructure;
pub mod refresher;
pub mod service;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use infrastructure::config::{ApiConfig, Config, ProviderConfig, RefreshConfig};
pub use refresher::{Refresher, RefresherHandle};
pub use service::PriceService;

use thiserror::Error;

/// Main error type for the price cache
#[derive(Error, Debug)]
pub enum Error {
    /// Any transport, read or decode failure against the provider.
    /// Details are logged where they happen and never carried outward.
    #[error("Internal Server Error")]
    Unavailable,

    #[error("Symbol {0} is not in working state")]
    NotTradable(String),

    #[error("Symbol {0} is already added")]
    AlreadyRegistered(String),

    #[error("Not a valid symbol: {0}")]
    NotFound(String),

    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
