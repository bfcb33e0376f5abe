//! Test utilities
//!
//! `MockSource` is a scripted in-memory market-data source that records
//! every call, so tests can assert on fetch order without a network.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::core::{CurrencyInfo, PriceSnapshot, Symbol};
use crate::exchanges::MarketDataSource;
use crate::{Error, Result};

pub fn sym(name: &str) -> Symbol {
    Symbol::parse(name).unwrap()
}

/// Price with every field set to `last`
pub fn price(last: &str) -> PriceSnapshot {
    PriceSnapshot {
        ask: last.to_string(),
        bid: last.to_string(),
        last: last.to_string(),
        open: last.to_string(),
        high: last.to_string(),
        low: last.to_string(),
    }
}

#[derive(Default)]
struct MockState {
    currencies: HashMap<String, CurrencyInfo>,
    prices: HashMap<String, PriceSnapshot>,
    suspended: HashSet<String>,
    failing_prices: HashSet<String>,
    currency_calls: Vec<String>,
    price_calls: Vec<String>,
    delay: Option<Duration>,
}

#[derive(Default)]
pub struct MockSource {
    state: Mutex<MockState>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Known symbol with base currency `id` and a price of `last`
    pub fn with_symbol(self, symbol: &str, id: &str, last: &str) -> Self {
        {
            let mut state = self.state.lock();
            state.currencies.insert(
                symbol.to_string(),
                CurrencyInfo {
                    id: id.to_string(),
                    full_name: format!("{id} coin"),
                    fee_currency: "USDT".to_string(),
                },
            );
            state.prices.insert(symbol.to_string(), price(last));
        }
        self
    }

    pub fn set_price(&self, symbol: &str, last: &str) {
        self.state.lock().prices.insert(symbol.to_string(), price(last));
    }

    pub fn fail_price(&self, symbol: &str, failing: bool) {
        let mut state = self.state.lock();
        if failing {
            state.failing_prices.insert(symbol.to_string());
        } else {
            state.failing_prices.remove(symbol);
        }
    }

    /// Report `symbol` as not in working state
    pub fn suspend(&self, symbol: &str) {
        self.state.lock().suspended.insert(symbol.to_string());
    }

    /// Sleep this long inside every fetch
    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().delay = Some(delay);
    }

    pub fn currency_calls(&self) -> Vec<String> {
        self.state.lock().currency_calls.clone()
    }

    pub fn price_calls(&self) -> Vec<String> {
        self.state.lock().price_calls.clone()
    }
}

impl MarketDataSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_currency_metadata(&self, symbol: &Symbol) -> Result<CurrencyInfo> {
        let (delay, result) = {
            let mut state = self.state.lock();
            state.currency_calls.push(symbol.to_string());
            let result = if state.suspended.contains(symbol.as_str()) {
                Err(Error::NotTradable(symbol.to_string()))
            } else {
                state
                    .currencies
                    .get(symbol.as_str())
                    .cloned()
                    .ok_or(Error::Unavailable)
            };
            (state.delay, result)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn fetch_price(&self, symbol: &Symbol) -> Result<PriceSnapshot> {
        let (delay, result) = {
            let mut state = self.state.lock();
            state.price_calls.push(symbol.to_string());
            let result = if state.failing_prices.contains(symbol.as_str()) {
                Err(Error::Unavailable)
            } else {
                state
                    .prices
                    .get(symbol.as_str())
                    .cloned()
                    .ok_or(Error::Unavailable)
            };
            (state.delay, result)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }
}
