//! Market-data provider implementations

pub mod hitbtc;
pub mod traits;

pub use hitbtc::HitbtcClient;
pub use traits::MarketDataSource;
