//! First-occurrence-wins deduplication.

use std::collections::HashSet;

use crate::symbol::{Symbol, SymbolKind};

/// Keep only the first record for each (name, scope, kind) triple.
///
/// Relative order of the survivors is preserved.
pub fn dedup_symbols(symbols: Vec<Symbol>) -> Vec<Symbol> {
    let mut seen: HashSet<(String, String, SymbolKind)> = HashSet::with_capacity(symbols.len());
    symbols
        .into_iter()
        .filter(|s| seen.insert((s.name.clone(), s.scope.clone(), s.kind)))
        .collect()
}
