//! Brace-counted scope stack.

use crate::symbol::GLOBAL_SCOPE;

/// What kind of construct opened a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Root,
    Class,
    Function,
    Namespace,
    /// Rust `impl`/`trait` bodies.
    Impl,
}

#[derive(Debug, Clone)]
struct ScopeEntry {
    name: String,
    kind: ScopeKind,
}

/// Ordered stack of open scopes, root-first.
///
/// The root (`global`) entry is never popped.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    entries: Vec<ScopeEntry>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            entries: vec![ScopeEntry {
                name: GLOBAL_SCOPE.to_string(),
                kind: ScopeKind::Root,
            }],
        }
    }

    pub fn push(&mut self, name: &str, kind: ScopeKind) {
        self.entries.push(ScopeEntry {
            name: name.to_string(),
            kind,
        });
    }

    /// Pop the innermost scope. No-op at the root.
    ///
    /// Returns the name of the new current scope.
    pub fn pop(&mut self) -> &str {
        if self.entries.len() > 1 {
            self.entries.pop();
        }
        self.current()
    }

    /// Name of the innermost scope.
    pub fn current(&self) -> &str {
        self.entries
            .last()
            .map(|e| e.name.as_str())
            .unwrap_or(GLOBAL_SCOPE)
    }

    pub fn current_kind(&self) -> ScopeKind {
        self.entries
            .last()
            .map(|e| e.kind)
            .unwrap_or(ScopeKind::Root)
    }

    pub fn is_root(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Innermost scope of the given kind.
    pub fn nearest(&self, kind: ScopeKind) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.kind == kind)
            .map(|e| e.name.as_str())
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Scope names, root-first.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
