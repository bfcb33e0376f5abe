//! Symbol registry
//!
//! Ordered list of supported symbols. Insertion order is the refresher's
//! round-robin order. Guarded by its own lock, separate from the cache.

use parking_lot::RwLock;

use super::Symbol;

#[derive(Debug, Default)]
pub struct SymbolRegistry {
    symbols: RwLock<Vec<Symbol>>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the registry in insertion order
    pub fn list(&self) -> Vec<Symbol> {
        self.symbols.read().clone()
    }

    /// Add to the end.
    ///
    /// No duplicate check here: callers check the cache first.
    pub fn append(&self, symbol: Symbol) {
        self.symbols.write().push(symbol);
    }

    pub fn get(&self, index: usize) -> Option<Symbol> {
        self.symbols.read().get(index).cloned()
    }

    /// Pick the symbol at `cursor`, wrapping to 0 when the cursor has run
    /// past the end. Returns the effective cursor with the symbol.
    pub fn select(&self, cursor: usize) -> Option<(usize, Symbol)> {
        let symbols = self.symbols.read();
        if symbols.is_empty() {
            return None;
        }
        let index = if cursor >= symbols.len() { 0 } else { cursor };
        Some((index, symbols[index].clone()))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.read().iter().any(|s| s.as_str() == symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.read().is_empty()
    }
}
