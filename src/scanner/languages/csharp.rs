//! C# line scanner.
//!
//! Braces usually sit on their own line, so declarations push their scope
//! without waiting for a `{` on the same line. `namespace` opens a scope but
//! records nothing.

use once_cell::sync::Lazy;
use regex::Captures;

use super::{declaration_head, has_word, is_statement_keyword, last_segment};
use crate::error::Result;
use crate::language::Language;
use crate::scanner::{group, opens_scope, rules, LineScan, Rule, RuleSet, ScopeKind};
use crate::symbol::SymbolKind;

const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "virtual", "override", "abstract",
    "sealed", "async", "extern", "unsafe", "partial", "readonly", "const", "volatile",
];

static EXCLUSIVE: &[Rule] = &[
    Rule {
        name: "using",
        pattern: r"^(?:global\s+)?using\s+(?:static\s+)?(?:\w+\s*=\s*)?([\w.]+)\s*;",
        apply: on_using,
    },
    Rule {
        name: "namespace",
        pattern: r"^namespace\s+([\w.]+)",
        apply: on_namespace,
    },
    Rule {
        name: "class",
        pattern: r"\b(?:class|interface|struct|enum|record)\s+(\w+)",
        apply: on_class,
    },
    Rule {
        name: "method",
        pattern: r"^(?:(?:public|private|protected|internal|static|virtual|override|abstract|sealed|async|extern|unsafe|new|partial)\s+)*([\w.]+(?:<[^=;(]*>)?(?:\[\])*\??)\s+(\w+)\s*(?:<[^>]*>)?\s*\(",
        apply: on_method,
    },
    Rule {
        name: "constructor",
        pattern: r"^(\w+)\s*\([^)]*\)\s*(?::\s*(?:base|this)\s*\(.*\))?\s*\{?$",
        apply: on_bare_constructor,
    },
    Rule {
        name: "property",
        pattern: r"^(?:(?:public|private|protected|internal|static|virtual|override|abstract|sealed|new|required)\s+)*([\w.]+(?:<[^=;(]*>)?(?:\[\])*\??)\s+(\w+)\s*(?:\{|=>)",
        apply: on_property,
    },
    Rule {
        name: "variable",
        pattern: r"^(?:(?:public|private|protected|internal|static|const|readonly|volatile|new)\s+)*([\w.]+(?:<[^=;(]*>)?(?:\[\])*\??)\s+(\w+)\s*(?:=|;|,)",
        apply: on_variable,
    },
];

static RULES: Lazy<Result<RuleSet>> =
    Lazy::new(|| RuleSet::compile(Language::CSharp, EXCLUSIVE, &[]));

pub fn scan_line(scan: &mut LineScan<'_>) -> Result<()> {
    rules(&RULES)?.apply(scan);
    Ok(())
}

fn on_using(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(path) = group(caps, 1) else {
        return false;
    };
    scan.add(last_segment(path, '.'), SymbolKind::Import);
    true
}

fn on_namespace(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    scan.push_scope(name, ScopeKind::Namespace);
    true
}

fn on_class(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    scan.add(name, SymbolKind::Class);
    if opens_scope(scan.text) {
        scan.push_scope(name, ScopeKind::Class);
    }
    true
}

fn on_method(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(return_type), Some(name)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    if is_statement_keyword(return_type) || is_statement_keyword(name) {
        return false;
    }

    if MODIFIERS.contains(&return_type) {
        scan.add(name, SymbolKind::Constructor);
    } else {
        scan.add_with(name, SymbolKind::Method, Some(return_type));
    }
    // Expression-bodied and abstract members have no block.
    if opens_scope(scan.text) {
        scan.push_scope(name, ScopeKind::Function);
    }
    true
}

fn on_bare_constructor(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    if scan.scopes().current_kind() != ScopeKind::Class || scan.scope() != name {
        return false;
    }
    scan.add(name, SymbolKind::Constructor);
    if opens_scope(scan.text) {
        scan.push_scope(name, ScopeKind::Function);
    }
    true
}

fn on_property(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(data_type), Some(name)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    if scan.scopes().current_kind() != ScopeKind::Class
        || is_statement_keyword(data_type)
        || MODIFIERS.contains(&data_type)
    {
        return false;
    }
    let description = if scan.text.contains("get;") || scan.text.contains("set;") {
        Some("Auto-implemented property")
    } else {
        None
    };
    let owner = scan.owner();
    scan.add_scoped(owner, name, SymbolKind::Property, Some(data_type), description);
    true
}

fn on_variable(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(data_type), Some(name)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    let head = declaration_head(scan.text);
    if is_statement_keyword(data_type) || MODIFIERS.contains(&data_type) || head.contains('(') {
        return false;
    }
    let constant =
        has_word(head, "const") || (has_word(head, "static") && has_word(head, "readonly"));
    let kind = if constant {
        SymbolKind::Constant
    } else {
        SymbolKind::Variable
    };
    scan.add_with(name, kind, Some(data_type));
    true
}
