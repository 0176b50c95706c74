//! Go line scanner.
//!
//! Parenthesised `import (`, `const (` and `var (` groups span several lines;
//! the open group is kept on the scan context until a line starting with `)`.

use once_cell::sync::Lazy;
use regex::Captures;

use super::last_segment;
use crate::error::Result;
use crate::language::Language;
use crate::scanner::{group, opens_block, rules, DeclGroup, LineScan, Rule, RuleSet, ScopeKind};
use crate::symbol::{SymbolKind, GLOBAL_SCOPE};

const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range", "return",
    "select", "struct", "switch", "type", "var",
];

static EXCLUSIVE: &[Rule] = &[
    Rule {
        name: "group-close",
        pattern: r"^\)",
        apply: on_group_close,
    },
    Rule {
        name: "group-import",
        pattern: r#"^(?:([\w.]+)\s+)?"([^"]+)""#,
        apply: on_group_import,
    },
    Rule {
        name: "group-spec",
        pattern: r"^(\w+(?:\s*,\s*\w+)*)(?:\s+([\w.*\[\]]+))?\s*(?:=|$)",
        apply: on_group_spec,
    },
    Rule {
        name: "package",
        pattern: r"^package\s+\w+",
        apply: on_package,
    },
    Rule {
        name: "group-open",
        pattern: r"^(import|const|var)\s*\($",
        apply: on_group_open,
    },
    Rule {
        name: "import",
        pattern: r#"^import\s+(?:([\w.]+)\s+)?"([^"]+)""#,
        apply: on_import,
    },
    Rule {
        name: "function",
        pattern: r"^func\s+(?:\(\s*(?:\w+\s+)?\*?(\w+)(?:\[[^\]]*\])?\s*\)\s*)?(\w+)\s*(?:\[[^\]]*\])?\s*\(",
        apply: on_function,
    },
    Rule {
        name: "type",
        pattern: r"^type\s+(\w+)(?:\[[^\]]*\])?\s+(?:=\s*)?([\w.*\[\]]+)",
        apply: on_type,
    },
    Rule {
        name: "const",
        pattern: r"^const\s+(\w+)(?:\s+([\w.*\[\]]+))?\s*=",
        apply: on_const,
    },
    Rule {
        name: "var",
        pattern: r"^var\s+(\w+(?:\s*,\s*\w+)*)(?:\s+([\w.*\[\]]+))?\s*(?:=|$)",
        apply: on_var,
    },
    Rule {
        name: "short-var",
        pattern: r"^(?:(?:if|for|switch)\s+)?(\w+(?:\s*,\s*\w+)*)\s*:=",
        apply: on_short_var,
    },
    Rule {
        name: "interface-method",
        pattern: r"^(\w+)\s*\(",
        apply: on_interface_method,
    },
    Rule {
        name: "field",
        pattern: r"^(\w+(?:\s*,\s*\w+)*)\s+([\w.*\[\]]+)",
        apply: on_field,
    },
];

static RULES: Lazy<Result<RuleSet>> = Lazy::new(|| RuleSet::compile(Language::Go, EXCLUSIVE, &[]));

pub fn scan_line(scan: &mut LineScan<'_>) -> Result<()> {
    rules(&RULES)?.apply(scan);
    Ok(())
}

fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Comma-separated identifiers, minus the blank identifier.
fn identifiers(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|n| !n.is_empty() && *n != "_")
}

fn on_group_close(_caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    if scan.group().is_none() {
        return false;
    }
    scan.set_group(None);
    true
}

/// Record an import by its alias, or by the last element of its path.
fn add_import(scan: &mut LineScan<'_>, alias: Option<&str>, path: &str) -> bool {
    let name = match alias {
        Some(alias) if alias != "_" && alias != "." => alias,
        _ => last_segment(path, '/'),
    };
    scan.add_scoped(GLOBAL_SCOPE.to_string(), name, SymbolKind::Import, Some("package"), None)
}

fn on_group_import(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    if scan.group() != Some(DeclGroup::Import) {
        return false;
    }
    let Some(path) = group(caps, 2) else {
        return false;
    };
    add_import(scan, group(caps, 1), path);
    true
}

fn on_group_spec(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let kind = match scan.group() {
        Some(DeclGroup::Const) => SymbolKind::Constant,
        Some(DeclGroup::Var) => SymbolKind::Variable,
        _ => return false,
    };
    let Some(names) = group(caps, 1) else {
        return false;
    };
    let data_type = group(caps, 2);
    for name in identifiers(names) {
        scan.add_with(name, kind, data_type);
    }
    true
}

fn on_package(_caps: &Captures<'_>, _scan: &mut LineScan<'_>) -> bool {
    true
}

fn on_group_open(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let decl = match group(caps, 1) {
        Some("import") => DeclGroup::Import,
        Some("const") => DeclGroup::Const,
        Some("var") => DeclGroup::Var,
        _ => return false,
    };
    scan.set_group(Some(decl));
    true
}

fn on_import(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(path) = group(caps, 2) else {
        return false;
    };
    add_import(scan, group(caps, 1), path);
    true
}

fn on_function(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 2) else {
        return false;
    };
    match group(caps, 1) {
        Some(receiver) => {
            scan.add_scoped(receiver.to_string(), name, SymbolKind::Method, None, None);
        }
        None => {
            scan.add(name, SymbolKind::Function);
        }
    }
    if opens_block(scan.text) {
        scan.push_scope(name, ScopeKind::Function);
    }
    true
}

fn on_type(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(name), Some(underlying)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    let description = match underlying {
        "struct" => "Struct type",
        "interface" => "Interface type",
        _ => "Named type",
    };
    let scope = scan.scope().to_string();
    scan.add_scoped(scope, name, SymbolKind::Class, Some(underlying), Some(description));
    if opens_block(scan.text) {
        scan.push_scope(name, ScopeKind::Class);
    }
    true
}

fn on_const(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    scan.add_with(name, SymbolKind::Constant, group(caps, 2))
}

fn on_var(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(names) = group(caps, 1) else {
        return false;
    };
    let data_type = group(caps, 2);
    for name in identifiers(names) {
        scan.add_with(name, SymbolKind::Variable, data_type);
    }
    true
}

fn on_short_var(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(names) = group(caps, 1) else {
        return false;
    };
    if identifiers(names).any(is_keyword) {
        return false;
    }
    for name in identifiers(names) {
        scan.add(name, SymbolKind::Variable);
    }
    true
}

fn on_interface_method(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    if scan.scopes().current_kind() != ScopeKind::Class || is_keyword(name) {
        return false;
    }
    let owner = scan.owner();
    scan.add_scoped(owner, name, SymbolKind::Method, None, Some("Interface method"))
}

fn on_field(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(names), Some(data_type)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    if scan.scopes().current_kind() != ScopeKind::Class || identifiers(names).any(is_keyword) {
        return false;
    }
    let owner = scan.owner();
    for name in identifiers(names) {
        scan.add_scoped(owner.clone(), name, SymbolKind::Property, Some(data_type), None);
    }
    true
}
