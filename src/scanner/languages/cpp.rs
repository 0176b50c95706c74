//! C++ line scanner.
//!
//! Class bodies end in `};`, which does not pop, so anything after a class
//! definition stays nested under it until a bare `}` turns up.

use once_cell::sync::Lazy;
use regex::Captures;

use super::{declaration_head, has_word, is_statement_keyword, last_segment};
use crate::error::Result;
use crate::language::Language;
use crate::scanner::{group, opens_block, rules, LineScan, Rule, RuleSet, ScopeKind};
use crate::symbol::SymbolKind;

const SPECIFIERS: &[&str] = &[
    "static", "inline", "virtual", "explicit", "constexpr", "consteval", "friend", "extern",
];

static EXCLUSIVE: &[Rule] = &[
    Rule {
        name: "define",
        pattern: r"^#\s*define\s+(\w+)",
        apply: on_define,
    },
    Rule {
        name: "namespace",
        pattern: r"^(?:inline\s+)?namespace\s+([\w:]+)\s*(?:\{.*)?$",
        apply: on_namespace,
    },
    Rule {
        name: "class",
        pattern: r"^(?:template\s*<[^>]*>\s*)?(?:enum\s+(?:class|struct)|class|struct|union|enum)\s+(?:alignas\([^)]*\)\s+)?(\w+)\s*(?:final\s*)?(?::[^;{]*)?(\{.*|;)?$",
        apply: on_class,
    },
    Rule {
        name: "constructor",
        pattern: r"^((?:\w+::)*)(~?\w+)\s*\(([^)]*)\)\s*(?:noexcept\s*)?(?::.*)?(\{.*|;)?$",
        apply: on_constructor,
    },
    Rule {
        name: "function",
        pattern: r"^(?:template\s*<[^>]*>\s*)?((?:[A-Za-z_][\w:<>,*&]*\s+)+)[*&]*((?:\w+::)*~?\w+)\s*\(([^)]*)\)\s*([^;{]*)(\{.*|;)?$",
        apply: on_function,
    },
    Rule {
        name: "variable",
        pattern: r"^(?:(?:static|const|constexpr|extern|volatile|mutable|inline|thread_local|unsigned|signed|struct|enum)\s+)*([\w:]+(?:<[^;=()]*>)?)(?:\s*[*&]+\s*|\s+)(\w+)\s*(?:\[[^\]]*\])*\s*(=|;|,|\(|\{)",
        apply: on_variable,
    },
];

static RULES: Lazy<Result<RuleSet>> =
    Lazy::new(|| RuleSet::compile(Language::Cpp, EXCLUSIVE, &[]));

pub fn scan_line(scan: &mut LineScan<'_>) -> Result<()> {
    rules(&RULES)?.apply(scan);
    Ok(())
}

fn on_define(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    let scope = scan.scope().to_string();
    scan.add_scoped(scope, name, SymbolKind::Constant, None, Some("Preprocessor macro"))
}

fn on_namespace(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    if opens_block(scan.text) || !scan.text.contains('{') {
        scan.push_scope(last_segment(name, ':'), ScopeKind::Namespace);
    }
    true
}

fn on_class(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    scan.add(name, SymbolKind::Class);
    // Forward declarations (`class Foo;`) have no body.
    let opens = match group(caps, 2) {
        Some(";") => false,
        Some(_) => opens_block(scan.text),
        None => true,
    };
    if opens {
        scan.push_scope(name, ScopeKind::Class);
    }
    true
}

/// Whether a parenthesised list reads as call arguments rather than
/// parameters: `Circle c(5.0, "x");` constructs an object.
fn looks_like_arguments(list: &str) -> bool {
    list.split(',').map(str::trim).any(|arg| {
        arg.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '"' | '\'' | '-' | '&' | '{'))
            || arg.contains('"')
            || arg == "true"
            || arg == "false"
            || arg == "nullptr"
    })
}

/// Record a constructor or destructor of `class` and open its body.
fn add_constructor(scan: &mut LineScan<'_>, class: &str, name: &str) {
    let description = if name.starts_with('~') {
        "Destructor"
    } else {
        "Class constructor"
    };
    scan.add_scoped(
        class.to_string(),
        name,
        SymbolKind::Constructor,
        None,
        Some(description),
    );
    if opens_block(scan.text) || !(scan.text.ends_with(';') || scan.text.ends_with('}')) {
        scan.push_scope(name, ScopeKind::Function);
    }
}

fn on_constructor(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(qualifier), Some(name)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    let base = name.trim_start_matches('~');
    let class = if qualifier.is_empty() {
        if scan.scopes().current_kind() != ScopeKind::Class || scan.scope() != base {
            return false;
        }
        scan.scope().to_string()
    } else {
        let owner = last_segment(qualifier.trim_end_matches(':'), ':');
        if owner != base {
            return false;
        }
        owner.to_string()
    };
    add_constructor(scan, &class, name);
    true
}

fn on_function(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(head), Some(qualified), Some(params)) =
        (group(caps, 1), group(caps, 2), group(caps, 3))
    else {
        return false;
    };
    if head.split_whitespace().any(is_statement_keyword)
        || is_statement_keyword(qualified)
        || looks_like_arguments(params)
    {
        return false;
    }

    let name = last_segment(qualified, ':');
    let base = name.trim_start_matches('~');
    let owner = qualified
        .strip_suffix(name)
        .map(|q| q.trim_end_matches(':'))
        .filter(|q| !q.is_empty())
        .map(|q| last_segment(q, ':').to_string());

    let in_class = scan.scopes().current_kind() == ScopeKind::Class;
    match owner.as_deref() {
        Some(class) if class == base => {
            add_constructor(scan, class, name);
            return true;
        }
        None if in_class && scan.scope() == base => {
            let class = scan.scope().to_string();
            add_constructor(scan, &class, name);
            return true;
        }
        _ => {}
    }

    let return_type = head
        .split_whitespace()
        .filter(|w| !SPECIFIERS.contains(w))
        .collect::<Vec<_>>()
        .join(" ");
    let data_type = (!return_type.is_empty()).then_some(return_type.as_str());

    match owner {
        Some(class) => {
            scan.add_scoped(class, name, SymbolKind::Method, data_type, None);
        }
        None => {
            let kind = if in_class {
                SymbolKind::Method
            } else {
                SymbolKind::Function
            };
            scan.add_with(name, kind, data_type);
        }
    }

    let tail = group(caps, 5);
    if opens_block(scan.text) || tail.is_none() {
        scan.push_scope(name, ScopeKind::Function);
    }
    true
}

fn on_variable(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(data_type), Some(name), Some(terminator)) =
        (group(caps, 1), group(caps, 2), group(caps, 3))
    else {
        return false;
    };
    if is_statement_keyword(data_type) {
        return false;
    }
    // Direct initialisation `Foo f(args);` is the only place a `(` may
    // precede the initializer.
    let head = declaration_head(scan.text);
    if terminator != "(" && head.contains('(') {
        return false;
    }
    let kind = if has_word(head, "const") || has_word(head, "constexpr") {
        SymbolKind::Constant
    } else {
        SymbolKind::Variable
    };
    scan.add_with(name, kind, Some(data_type))
}
