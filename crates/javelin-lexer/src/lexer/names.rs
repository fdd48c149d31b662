//! Identifier interning.
//!
//! Every identifier a scanner produces is entered into its [`NameTable`], so
//! equal spellings share one [`Symbol`] and one allocation. Names are compared
//! after unicode-escape translation: `\u0041` and `A` are the same name.

use std::sync::Arc;

use rustc_hash::FxHashMap;

/// A handle to an interned name.
///
/// Symbols are only meaningful for the table that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Position of the name in its table, in order of first appearance.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Interned identifier spellings.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    map: FxHashMap<Arc<str>, Symbol>,
    names: Vec<Arc<str>>,
}

impl NameTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the symbol for `name`, entering it on first sight.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&symbol) = self.map.get(name) {
            return symbol;
        }
        let symbol = Symbol(self.names.len() as u32);
        let shared: Arc<str> = Arc::from(name);
        self.names.push(Arc::clone(&shared));
        self.map.insert(shared, symbol);
        symbol
    }

    /// Looks `name` up without entering it.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.map.get(name).copied()
    }

    /// The spelling behind `symbol`.
    pub fn resolve(&self, symbol: Symbol) -> Option<&str> {
        self.names.get(symbol.index()).map(|name| &**name)
    }

    /// Shared handle to the spelling behind `symbol`.
    pub fn resolve_shared(&self, symbol: Symbol) -> Option<Arc<str>> {
        self.names.get(symbol.index()).cloned()
    }

    /// Every interned name, in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (Symbol(i as u32), &**name))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let mut table = NameTable::new();
        let a = table.intern("count");
        let b = table.intern("total");
        assert_ne!(a, b);
        assert_eq!(table.intern("count"), a);
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(a), Some("count"));
        assert_eq!(table.get("total"), Some(b));
        assert_eq!(table.get("missing"), None);
    }

    #[test]
    fn test_names_are_shared() {
        let mut table = NameTable::new();
        let symbol = table.intern("data");
        let first = table.resolve_shared(symbol).unwrap();
        let again = table.intern("data");
        let second = table.resolve_shared(again).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_iter_in_first_seen_order() {
        let mut table = NameTable::new();
        for name in ["b", "a", "b", "c"] {
            table.intern(name);
        }
        let names: Vec<_> = table.iter().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert!(table.resolve(Symbol(7)).is_none());
    }
}
