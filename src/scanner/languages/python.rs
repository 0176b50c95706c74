//! Python line scanner.
//!
//! Python blocks have no braces, so `def` and `class` push a scope that only
//! a literal `}` line would close. Nesting drifts accordingly.

use once_cell::sync::Lazy;
use regex::Captures;

use crate::error::Result;
use crate::language::Language;
use crate::scanner::builtins::{is_python_builtin, PYTHON_KEYWORDS};
use crate::scanner::{group, rules, LineScan, Rule, RuleSet, ScopeKind};
use crate::symbol::{SymbolKind, BUILTINS_SCOPE, GLOBAL_SCOPE};

static EXCLUSIVE: &[Rule] = &[
    Rule {
        name: "function",
        pattern: r"\bdef\s+(\w+)\s*\(",
        apply: on_function,
    },
    Rule {
        name: "class",
        pattern: r"\bclass\s+(\w+)",
        apply: on_class,
    },
    Rule {
        name: "self-property",
        pattern: r"^self\.(\w+)\s*(?::\s*(\w+))?\s*=(?:[^=]|$)",
        apply: on_self_property,
    },
    Rule {
        name: "typed-variable",
        pattern: r"^(\w+)\s*:\s*(\w+)\s*(?:=\s*[^\s,]+)?",
        apply: on_typed_variable,
    },
    Rule {
        name: "variable",
        pattern: r"^(\w+(?:\s*,\s*\w+)*)\s*=(?:[^=]|$)",
        apply: on_variable,
    },
    Rule {
        name: "import",
        pattern: r"^(?:import\s+([^#]+)|from\s+([\w.]+)\s+import\s+([^#]+))",
        apply: on_import,
    },
];

static INDEPENDENT: &[Rule] = &[Rule {
    name: "builtin-call",
    pattern: r"\b(\w+)\s*\(",
    apply: on_builtin_call,
}];

static RULES: Lazy<Result<RuleSet>> =
    Lazy::new(|| RuleSet::compile(Language::Python, EXCLUSIVE, INDEPENDENT));

pub fn scan_line(scan: &mut LineScan<'_>) -> Result<()> {
    rules(&RULES)?.apply(scan);
    Ok(())
}

fn on_function(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    let kind = if scan.scopes().current_kind() == ScopeKind::Class {
        SymbolKind::Method
    } else {
        SymbolKind::Function
    };
    scan.add(name, kind);
    scan.push_scope(name, ScopeKind::Function);
    true
}

fn on_class(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    scan.add(name, SymbolKind::Class);
    scan.push_scope(name, ScopeKind::Class);
    true
}

fn on_self_property(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    if scan.scopes().is_root() {
        return false;
    }
    let owner = scan.owner();
    scan.add_scoped(owner, name, SymbolKind::Property, group(caps, 2), None)
}

fn on_typed_variable(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(name), Some(data_type)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    if PYTHON_KEYWORDS.contains(name) {
        return false;
    }
    scan.add_with(name, SymbolKind::Variable, Some(data_type));
    true
}

fn on_variable(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(targets) = group(caps, 1) else {
        return false;
    };
    let names: Vec<&str> = targets.split(',').map(str::trim).collect();
    if names.iter().any(|n| PYTHON_KEYWORDS.contains(*n)) {
        return false;
    }
    for name in names {
        // Rebinding a builtin name does not make it a user variable.
        if !is_python_builtin(name) {
            scan.add(name, SymbolKind::Variable);
        }
    }
    true
}

/// Strip an `as` alias from an import item.
fn import_target(item: &str) -> &str {
    item.split(" as ").next().unwrap_or(item).trim()
}

fn on_import(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let mut names: Vec<&str> = Vec::new();

    if let Some(modules) = group(caps, 1) {
        for item in modules.split(',') {
            if item.contains(" as ") {
                names.push(import_target(item));
            } else {
                // `import os.path` binds `os`.
                let item = item.trim();
                names.push(item.split('.').next().unwrap_or(item));
            }
        }
    } else if let (Some(module), Some(items)) = (group(caps, 2), group(caps, 3)) {
        for item in items.split(',') {
            let item = import_target(item.trim().trim_matches(|c: char| c == '(' || c == ')'));
            if item == "*" {
                names.push(module);
            } else {
                names.push(item);
            }
        }
    }

    let mut added = false;
    for name in names {
        added |= scan.add_scoped(
            GLOBAL_SCOPE.to_string(),
            name,
            SymbolKind::Import,
            Some("module"),
            None,
        );
    }
    added
}

fn on_builtin_call(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    if !is_python_builtin(name) || scan.has_emitted(name) {
        return false;
    }
    scan.add_scoped(
        BUILTINS_SCOPE.to_string(),
        name,
        SymbolKind::Builtin,
        Some("builtin_function_or_method"),
        None,
    )
}
