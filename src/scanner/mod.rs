//! Multi-language symbol scanner.
//!
//! Source text is processed one trimmed line at a time:
//!
//! 1. Blank and comment-only lines are skipped.
//! 2. The line goes to the language's scanner, which applies its rule set and
//!    may record symbols and open a scope.
//! 3. A line that is exactly `}` closes the innermost scope.
//!
//! After the pass, records are deduplicated on (name, scope, kind).

pub mod builtins;
mod comments;
mod dedup;
mod languages;
mod scope;

pub use comments::{is_comment, markers, CommentMarker};
pub use dedup::dedup_symbols;
pub use scope::{ScopeKind, ScopeStack};

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{Result, ScanError};
use crate::language::Language;
use crate::symbol::{clean_name, Symbol, SymbolKind};

/// Extract the symbol table for `source` written in `language`.
pub fn scan(source: &str, language: Language) -> Result<Vec<Symbol>> {
    let mut ctx = ScanContext::new(language);
    let mut line_count = 0;

    for (index, raw) in source.lines().enumerate() {
        line_count += 1;
        let line = raw.trim();
        if line.is_empty() || is_comment(line, language) {
            continue;
        }

        let mut line_scan = LineScan {
            text: line,
            number: index + 1,
            ctx: &mut ctx,
        };
        languages::scan_line(language, &mut line_scan)?;

        if line == "}" {
            ctx.scopes.pop();
        }
    }

    let emitted = ctx.symbols.len();
    let symbols = dedup_symbols(ctx.symbols);
    tracing::debug!(
        language = language.id(),
        lines = line_count,
        symbols = symbols.len(),
        duplicates = emitted - symbols.len(),
        "scan complete"
    );
    Ok(symbols)
}

/// Like [`scan`], but selects the language by identifier.
///
/// Fails with [`ScanError::UnsupportedLanguage`] for unknown identifiers.
pub fn scan_str(source: &str, language_id: &str) -> Result<Vec<Symbol>> {
    let language = Language::from_id(language_id)?;
    scan(source, language)
}

/// Parenthesised multi-line declaration group (Go `import (`, `const (`, `var (`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclGroup {
    Import,
    Const,
    Var,
}

/// State for a single scan pass.
#[derive(Debug)]
pub struct ScanContext {
    language: Language,
    scopes: ScopeStack,
    symbols: Vec<Symbol>,
    /// Every name recorded so far, of any kind.
    names: HashSet<String>,
    group: Option<DeclGroup>,
}

impl ScanContext {
    fn new(language: Language) -> Self {
        Self {
            language,
            scopes: ScopeStack::new(),
            symbols: Vec::new(),
            names: HashSet::new(),
            group: None,
        }
    }

    fn record(
        &mut self,
        line: usize,
        scope: String,
        name: &str,
        kind: SymbolKind,
        data_type: Option<&str>,
        description: Option<&str>,
    ) -> bool {
        let Some(name) = clean_name(name) else {
            return false;
        };
        self.names.insert(name.clone());
        self.symbols.push(Symbol {
            name,
            kind,
            scope,
            line,
            data_type: data_type.and_then(clean_name),
            language: self.language,
            description: description.map(str::to_string),
        });
        true
    }
}

/// One trimmed, non-comment line handed to a language scanner.
pub struct LineScan<'a> {
    pub text: &'a str,
    /// Line number (1-indexed)
    pub number: usize,
    ctx: &'a mut ScanContext,
}

impl<'a> LineScan<'a> {
    /// Name of the current scope.
    pub fn scope(&self) -> &str {
        self.ctx.scopes.current()
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.ctx.scopes
    }

    /// Innermost enclosing class, falling back to the current scope.
    pub fn owner(&self) -> String {
        self.ctx
            .scopes
            .nearest(ScopeKind::Class)
            .unwrap_or_else(|| self.ctx.scopes.current())
            .to_string()
    }

    /// Record a symbol in the current scope.
    pub fn add(&mut self, name: &str, kind: SymbolKind) -> bool {
        self.add_with(name, kind, None)
    }

    /// Record a symbol in the current scope with an optional data type.
    pub fn add_with(&mut self, name: &str, kind: SymbolKind, data_type: Option<&str>) -> bool {
        let scope = self.scope().to_string();
        self.add_scoped(scope, name, kind, data_type, None)
    }

    /// Record a symbol in an explicit scope.
    pub fn add_scoped(
        &mut self,
        scope: String,
        name: &str,
        kind: SymbolKind,
        data_type: Option<&str>,
        description: Option<&str>,
    ) -> bool {
        self.ctx.record(self.number, scope, name, kind, data_type, description)
    }

    pub fn push_scope(&mut self, name: &str, kind: ScopeKind) {
        if let Some(name) = clean_name(name) {
            self.ctx.scopes.push(&name, kind);
        }
    }

    /// Whether any symbol with this name has been recorded earlier in the pass.
    pub fn has_emitted(&self, name: &str) -> bool {
        self.ctx.names.contains(name)
    }

    pub fn group(&self) -> Option<DeclGroup> {
        self.ctx.group
    }

    pub fn set_group(&mut self, group: Option<DeclGroup>) {
        self.ctx.group = group;
    }
}

/// Rule handler. Returns `false` to decline the match.
pub(crate) type Handler = fn(&Captures<'_>, &mut LineScan<'_>) -> bool;

/// A construct signature and what to do when a line matches it.
pub(crate) struct Rule {
    pub name: &'static str,
    pub pattern: &'static str,
    pub apply: Handler,
}

struct CompiledRule {
    name: &'static str,
    regex: Regex,
    apply: Handler,
}

/// A language's rules, split into the first-match-wins cascade and the
/// checks that run on every line.
pub(crate) struct RuleSet {
    language: Language,
    exclusive: Vec<CompiledRule>,
    independent: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn compile(language: Language, exclusive: &[Rule], independent: &[Rule]) -> Result<Self> {
        let compile_all = |rules: &[Rule]| -> Result<Vec<CompiledRule>> {
            rules
                .iter()
                .map(|rule| {
                    let regex = Regex::new(rule.pattern).map_err(|e| ScanError::InvalidPattern {
                        language: language.id(),
                        rule: rule.name,
                        message: e.to_string(),
                    })?;
                    Ok(CompiledRule {
                        name: rule.name,
                        regex,
                        apply: rule.apply,
                    })
                })
                .collect()
        };

        Ok(Self {
            language,
            exclusive: compile_all(exclusive)?,
            independent: compile_all(independent)?,
        })
    }

    /// Run the cascade until a rule claims the line, then every independent
    /// check against every match on the line.
    pub fn apply(&self, scan: &mut LineScan<'_>) {
        let text = scan.text;

        for rule in &self.exclusive {
            if let Some(caps) = rule.regex.captures(text) {
                if (rule.apply)(&caps, scan) {
                    self.trace(rule, scan.number);
                    break;
                }
            }
        }

        for rule in &self.independent {
            for caps in rule.regex.captures_iter(text) {
                if (rule.apply)(&caps, scan) {
                    self.trace(rule, scan.number);
                }
            }
        }
    }

    fn trace(&self, rule: &CompiledRule, line: usize) {
        tracing::trace!(language = self.language.id(), rule = rule.name, line, "rule matched");
    }
}

/// Resolve a lazily compiled rule set, surfacing compile failures.
pub(crate) fn rules(cell: &'static Lazy<Result<RuleSet>>) -> Result<&'static RuleSet> {
    Lazy::force(cell).as_ref().map_err(|e| e.clone())
}

/// Capture group text, if the group participated.
pub(crate) fn group<'t>(caps: &Captures<'t>, index: usize) -> Option<&'t str> {
    caps.get(index).map(|m| m.as_str())
}

/// Whether a line opens more braces than it closes.
pub(crate) fn opens_block(line: &str) -> bool {
    line.matches('{').count() > line.matches('}').count()
}

/// Whether a declaration line leaves a body open: either its braces are
/// unbalanced, or it has no brace and no `;` so the body follows.
pub(crate) fn opens_scope(line: &str) -> bool {
    opens_block(line) || !(line.contains('{') || line.ends_with(';'))
}
