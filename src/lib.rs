//! Symscan - heuristic multi-language symbol extraction.
//!
//! Symscan reads source text line by line and reports the identifiers it
//! declares: variables, functions, classes, methods, constants, imports,
//! properties, constructors and recognised built-ins. Each record carries
//! its enclosing scope and 1-indexed line. Scanning is pattern based, so
//! results are best-effort rather than a parse.
//!
//! # Architecture
//!
//! - `scanner`: the orchestrator, comment filter, scope tracker,
//!   deduplicator and built-in registries, plus one rule table per language
//! - `language`: the supported languages and their metadata
//! - `symbol`: the symbol record and kind set
//! - `query`: search, kind filter, ordering and statistics over a result
//! - `config`: YAML configuration for the command-line front end
//! - `report`: output formatting (pretty, JSON)
//!
//! # Example
//!
//! ```
//! use symscan::{scan, Language, SymbolKind};
//!
//! let symbols = scan("def greet(name):\n    return name", Language::Python).unwrap();
//! assert_eq!(symbols[0].name, "greet");
//! assert_eq!(symbols[0].kind, SymbolKind::Function);
//! ```
//!
//! # Adding a New Language
//!
//! See `src/scanner/languages/` for examples. Write the rule table and a
//! `scan_line` entry point, then route the new `Language` variant to it in
//! `scanner/mod.rs`.

pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod query;
pub mod report;
pub mod scanner;
pub mod symbol;

pub use config::{Config, ConfigError};
pub use error::ScanError;
pub use language::Language;
pub use query::{Query, SortKey, SortOrder};
pub use report::OutputFormat;
pub use scanner::{scan, scan_str};
pub use symbol::{Symbol, SymbolKind};
