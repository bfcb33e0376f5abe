//! HitBTC public REST client
//!
//! Three endpoints of API v3:
//! - GET /public/symbol/{symbol}     -> base currency, fee currency, status
//! - GET /public/currency/{currency} -> full name
//! - GET /public/ticker/{symbol}     -> quote fields
//!
//! Every request carries the configured timeout on its own; the two chained
//! metadata calls do not share a budget. Failures are logged here with full
//! detail and returned as the opaque `Error::Unavailable`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::core::{CurrencyInfo, PriceSnapshot, Symbol};
use crate::exchanges::MarketDataSource;
use crate::infrastructure::config::ProviderConfig;
use crate::{log_provider, Error, Result};

/// Status value HitBTC reports for tradable symbols
pub const WORKING_STATUS: &str = "working";

/// HitBTC REST client
pub struct HitbtcClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HitbtcClient {
    /// Build a client from provider settings
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("provider.base_url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "provider.base_url cannot be a base: {}",
                config.base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::Config(format!("http client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// `{base}/public/{kind}/{id}` with `id` as a single escaped segment
    fn endpoint(&self, kind: &str, id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Unavailable)?
            .pop_if_empty()
            .extend(["public", kind, id]);
        Ok(url)
    }

    /// GET and decode. Any failure along the way becomes `Unavailable`.
    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            log_provider!(tracing::Level::WARN, "GET {} ({}) request error: {}", url, what, e);
            Error::Unavailable
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            log_provider!(tracing::Level::WARN, "GET {} ({}) body error: {}", url, what, e);
            Error::Unavailable
        })?;

        if !status.is_success() {
            log_provider!(
                tracing::Level::WARN,
                "GET {} ({}) returned {}: {}",
                url,
                what,
                status,
                String::from_utf8_lossy(&body)
            );
            return Err(Error::Unavailable);
        }

        serde_json::from_slice(&body).map_err(|e| {
            log_provider!(tracing::Level::WARN, "GET {} ({}) decode error: {}", url, what, e);
            Error::Unavailable
        })
    }
}

impl MarketDataSource for HitbtcClient {
    fn name(&self) -> &'static str {
        "hitbtc"
    }

    async fn fetch_currency_metadata(&self, symbol: &Symbol) -> Result<CurrencyInfo> {
        let url = self.endpoint("symbol", symbol.as_str())?;
        let info: SymbolResponse = self.get_json(url, symbol.as_str()).await?;

        if info.status != WORKING_STATUS {
            log_provider!(
                tracing::Level::INFO,
                "symbol {} has status {:?}, refusing",
                symbol,
                info.status
            );
            return Err(Error::NotTradable(symbol.to_string()));
        }

        let url = self.endpoint("currency", &info.base_currency)?;
        let currency: CurrencyResponse = self.get_json(url, &info.base_currency).await?;

        Ok(CurrencyInfo {
            id: info.base_currency,
            full_name: currency.full_name,
            fee_currency: info.fee_currency,
        })
    }

    async fn fetch_price(&self, symbol: &Symbol) -> Result<PriceSnapshot> {
        let url = self.endpoint("ticker", symbol.as_str())?;
        self.get_json(url, symbol.as_str()).await
    }
}

// === API Response Types ===

/// GET /public/symbol/{symbol}
#[derive(Debug, Deserialize)]
struct SymbolResponse {
    base_currency: String,
    fee_currency: String,
    status: String,
}

/// GET /public/currency/{currency}
#[derive(Debug, Deserialize)]
struct CurrencyResponse {
    full_name: String,
}
