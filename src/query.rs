//! Searching, filtering and ordering a symbol table.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;

use crate::symbol::{Symbol, SymbolKind};

/// Column a symbol table can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Line,
    Name,
    Type,
    Scope,
    DataType,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(SortKey::Line),
            "name" => Ok(SortKey::Name),
            "type" | "kind" => Ok(SortKey::Type),
            "scope" => Ok(SortKey::Scope),
            "data-type" | "datatype" | "data_type" => Ok(SortKey::DataType),
            other => Err(format!(
                "invalid sort key {:?}, must be one of line, name, type, scope, data-type",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Search, kind filter and ordering applied to a scan result.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Case-insensitive substring of the name or scope.
    pub search: Option<String>,
    /// Kinds to keep; empty keeps all.
    pub kinds: Vec<SymbolKind>,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = SymbolKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    pub fn sort_by(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = key;
        self.order = order;
        self
    }

    /// Whether a symbol passes the search and kind filters.
    pub fn matches(&self, symbol: &Symbol) -> bool {
        let kind_ok = self.kinds.is_empty() || self.kinds.contains(&symbol.kind);
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => matches_search(symbol, term),
        };
        kind_ok && search_ok
    }

    /// Filtered and ordered copy of `symbols`.
    pub fn apply(&self, symbols: &[Symbol]) -> Vec<Symbol> {
        let mut selected: Vec<Symbol> = symbols
            .iter()
            .filter(|s| self.matches(s))
            .cloned()
            .collect();
        sort_symbols(&mut selected, self.sort, self.order);
        selected
    }
}

/// Case-insensitive substring match on name or scope.
pub fn matches_search(symbol: &Symbol, term: &str) -> bool {
    let term = term.to_lowercase();
    symbol.name.to_lowercase().contains(&term) || symbol.scope.to_lowercase().contains(&term)
}

/// Order by one column. Records without a data type sort last in either
/// direction; ties keep their scan order.
pub fn sort_symbols(symbols: &mut [Symbol], key: SortKey, order: SortOrder) {
    symbols.sort_by(|a, b| compare(a, b, key, order));
}

fn compare(a: &Symbol, b: &Symbol, key: SortKey, order: SortOrder) -> Ordering {
    let ordering = match key {
        SortKey::Line => a.line.cmp(&b.line),
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Type => a.kind.as_str().cmp(b.kind.as_str()),
        SortKey::Scope => a.scope.cmp(&b.scope),
        SortKey::DataType => match (&a.data_type, &b.data_type) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => return Ordering::Equal,
        },
    };
    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

/// Number of records of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KindCount {
    pub kind: SymbolKind,
    pub count: usize,
}

/// Count per kind, in the order each kind first appears.
pub fn kind_stats(symbols: &[Symbol]) -> Vec<KindCount> {
    let mut stats: Vec<KindCount> = Vec::new();
    for symbol in symbols {
        match stats.iter_mut().find(|c| c.kind == symbol.kind) {
            Some(entry) => entry.count += 1,
            None => stats.push(KindCount {
                kind: symbol.kind,
                count: 1,
            }),
        }
    }
    stats
}
