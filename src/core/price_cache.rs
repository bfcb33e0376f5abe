//! Price cache
//!
//! Symbol -> latest CacheEntry behind a single-writer/many-reader lock.
//! Every critical section is a pure map operation; values are built by the
//! caller (network fetches included) before the lock is taken.

use parking_lot::RwLock;
use std::collections::HashMap;

use super::{CacheEntry, PriceSnapshot, Symbol};

#[derive(Debug, Default)]
pub struct PriceCache {
    entries: RwLock<HashMap<Symbol, CacheEntry>>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone out the entry for `symbol`, if any
    pub fn get(&self, symbol: &str) -> Option<CacheEntry> {
        self.entries.read().get(symbol).cloned()
    }

    /// Snapshot of all entries, unspecified order
    pub fn get_all(&self) -> Vec<CacheEntry> {
        self.entries.read().values().cloned().collect()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.read().contains_key(symbol)
    }

    /// Insert or overwrite
    pub fn put(&self, entry: CacheEntry) {
        self.entries.write().insert(entry.symbol.clone(), entry);
    }

    /// Insert only if no entry exists yet. Returns false if one did.
    pub fn insert_if_absent(&self, entry: CacheEntry) -> bool {
        let mut entries = self.entries.write();
        if entries.contains_key(&entry.symbol) {
            return false;
        }
        entries.insert(entry.symbol.clone(), entry);
        true
    }

    /// Swap in a new price, keeping the registered currency.
    ///
    /// Returns false and leaves the map untouched if `symbol` has no entry.
    pub fn replace_price(&self, symbol: &str, price: PriceSnapshot) -> bool {
        let mut entries = self.entries.write();
        match entries.get_mut(symbol) {
            Some(entry) => {
                *entry = entry.with_price(price);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
