//! Symbol records produced by a scan.

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Scope name for declarations outside any recognised construct.
pub const GLOBAL_SCOPE: &str = "global";

/// Synthetic scope that built-in classifications are reported under.
pub const BUILTINS_SCOPE: &str = "builtins";

/// Classification of a declared identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Variable,
    Function,
    Class,
    Method,
    Parameter,
    Constant,
    Import,
    Builtin,
    Property,
    Constructor,
}

impl SymbolKind {
    /// All kinds, in display order.
    pub const ALL: [SymbolKind; 10] = [
        SymbolKind::Variable,
        SymbolKind::Function,
        SymbolKind::Class,
        SymbolKind::Method,
        SymbolKind::Parameter,
        SymbolKind::Constant,
        SymbolKind::Import,
        SymbolKind::Builtin,
        SymbolKind::Property,
        SymbolKind::Constructor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Function => "function",
            SymbolKind::Class => "class",
            SymbolKind::Method => "method",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Constant => "constant",
            SymbolKind::Import => "import",
            SymbolKind::Builtin => "builtin",
            SymbolKind::Property => "property",
            SymbolKind::Constructor => "constructor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        SymbolKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s.trim().to_lowercase())
    }

    /// Human-readable label (e.g. "Built-in").
    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Variable => "Variable",
            SymbolKind::Function => "Function",
            SymbolKind::Class => "Class",
            SymbolKind::Method => "Method",
            SymbolKind::Parameter => "Parameter",
            SymbolKind::Constant => "Constant",
            SymbolKind::Import => "Import",
            SymbolKind::Builtin => "Built-in",
            SymbolKind::Property => "Property",
            SymbolKind::Constructor => "Constructor",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SymbolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SymbolKind::parse(s).ok_or_else(|| format!("unknown symbol kind: {}", s))
    }
}

/// A declared identifier with its classification, scope and declaring line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    /// Identifier text, trimmed and quote-stripped. Never empty.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    /// Enclosing construct name, `global`, or `builtins`.
    pub scope: String,
    /// Line number (1-indexed)
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Symbol {
    /// The record's description, or the default text for its kind.
    pub fn describe(&self) -> String {
        if let Some(desc) = &self.description {
            return desc.clone();
        }
        let data_type = self.data_type.as_deref().unwrap_or("unknown");
        match self.kind {
            SymbolKind::Class => "Class definition".to_string(),
            SymbolKind::Constructor => "Constructor method".to_string(),
            SymbolKind::Method => "Instance method".to_string(),
            SymbolKind::Function => "Function definition".to_string(),
            SymbolKind::Variable => format!("Variable of type {}", data_type),
            SymbolKind::Constant => "Constant value".to_string(),
            SymbolKind::Import => "Imported module or member".to_string(),
            SymbolKind::Builtin => "Built-in language feature".to_string(),
            SymbolKind::Property => format!("Property of type {}", data_type),
            SymbolKind::Parameter => format!("Parameter of type {}", data_type),
        }
    }
}

/// Strip surrounding quotes and whitespace from a captured identifier.
///
/// Returns `None` when nothing remains.
pub fn clean_name(raw: &str) -> Option<String> {
    let name = raw
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
