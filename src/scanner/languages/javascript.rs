//! JavaScript line scanner.
//!
//! Cascade: function, class, class-body members (constructor, method, field),
//! destructuring, variable, import.
//! Independent: `this.x =` properties, `Owner.x =` static properties,
//! prototype methods, and dotted built-in calls such as `console.log(`.

use once_cell::sync::Lazy;
use regex::Captures;

use crate::error::Result;
use crate::language::Language;
use crate::scanner::builtins::js_builtin_method;
use crate::scanner::{group, opens_block, opens_scope, rules, LineScan, Rule, RuleSet, ScopeKind};
use crate::symbol::{SymbolKind, BUILTINS_SCOPE};

const JS_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "function", "return", "with", "do", "else",
];

static EXCLUSIVE: &[Rule] = &[
    Rule {
        name: "function",
        pattern: r"\bfunction\s*\*?\s+(\w+)\s*\(",
        apply: on_function,
    },
    Rule {
        name: "class",
        pattern: r"\bclass\s+(\w+)",
        apply: on_class,
    },
    Rule {
        name: "constructor",
        pattern: r"^constructor\s*\(",
        apply: on_constructor,
    },
    Rule {
        name: "method",
        pattern: r"^(static\s+)?(?:async\s+)?(?:get\s+|set\s+)?\*?(#?\w+)\s*\([^)]*\)\s*\{",
        apply: on_method,
    },
    Rule {
        name: "field",
        pattern: r"^(static\s+)?(#?\w+)\s*(?:=|;)",
        apply: on_field,
    },
    Rule {
        name: "destructure",
        pattern: r"\b(let|const|var)\s*[\{\[]([^\}\]]+)[\}\]]\s*=",
        apply: on_destructure,
    },
    Rule {
        name: "variable",
        pattern: r"\b(let|const|var)\s+(\w+)",
        apply: on_variable,
    },
    Rule {
        name: "import",
        pattern: r"^import\s+(?:(\w+)\s*,?\s*)?(?:\{([^}]*)\}|\*\s+as\s+(\w+))?",
        apply: on_import,
    },
];

static INDEPENDENT: &[Rule] = &[
    Rule {
        name: "this-property",
        pattern: r"\bthis\.(#?\w+)\s*=(?:[^=]|$)",
        apply: on_this_property,
    },
    Rule {
        name: "static-property",
        pattern: r"^([A-Z]\w*)\.(\w+)\s*=(?:[^=]|$)",
        apply: on_static_property,
    },
    Rule {
        name: "prototype-method",
        pattern: r"^(\w+)\.prototype\.(\w+)\s*=",
        apply: on_prototype_method,
    },
    Rule {
        name: "builtin-call",
        pattern: r"\b([A-Za-z_$][\w$]*)\.([A-Za-z_$][\w$]*)\s*\(",
        apply: on_builtin_call,
    },
];

static RULES: Lazy<Result<RuleSet>> =
    Lazy::new(|| RuleSet::compile(Language::JavaScript, EXCLUSIVE, INDEPENDENT));

pub fn scan_line(scan: &mut LineScan<'_>) -> Result<()> {
    rules(&RULES)?.apply(scan);
    Ok(())
}

fn in_class_body(scan: &LineScan<'_>) -> bool {
    scan.scopes().current_kind() == ScopeKind::Class
}

fn on_function(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    scan.add(name, SymbolKind::Function);
    if opens_scope(scan.text) {
        scan.push_scope(name, ScopeKind::Function);
    }
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

fn on_constructor(_caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    if scan.scopes().is_root() {
        return false;
    }
    let owner = scan.owner();
    scan.add_scoped(owner, "constructor", SymbolKind::Constructor, None, None);
    if opens_block(scan.text) {
        scan.push_scope("constructor", ScopeKind::Function);
    }
    true
}

fn on_method(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 2) else {
        return false;
    };
    if !in_class_body(scan) || JS_KEYWORDS.contains(&name) {
        return false;
    }
    let description = caps.get(1).map(|_| "Static method");
    let owner = scan.owner();
    scan.add_scoped(owner, name, SymbolKind::Method, None, description);
    if opens_block(scan.text) {
        scan.push_scope(name, ScopeKind::Function);
    }
    true
}

fn on_field(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 2) else {
        return false;
    };
    if !in_class_body(scan) {
        return false;
    }
    let description = caps.get(1).map(|_| "Static property");
    let owner = scan.owner();
    scan.add_scoped(owner, name, SymbolKind::Property, None, description)
}

fn declaration_kind(keyword: &str) -> SymbolKind {
    if keyword == "const" {
        SymbolKind::Constant
    } else {
        SymbolKind::Variable
    }
}

fn on_destructure(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(keyword), Some(bindings)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    let kind = declaration_kind(keyword);
    let mut added = false;
    for binding in bindings.split(',') {
        // `{ key: local = fallback }` binds `local`; `...rest` binds `rest`
        let binding = binding.split('=').next().unwrap_or(binding);
        let local = binding.rsplit(':').next().unwrap_or(binding);
        let local = local.trim().trim_start_matches("...");
        if local.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            added |= scan.add(local, kind);
        }
    }
    added
}

fn on_variable(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(keyword), Some(name)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    scan.add(name, declaration_kind(keyword));
    true
}

fn on_import(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let mut names: Vec<&str> = Vec::new();
    if let Some(default) = group(caps, 1) {
        if default != "from" {
            names.push(default);
        }
    }
    if let Some(list) = group(caps, 2) {
        names.extend(
            list.split(',')
                .map(|item| item.split(" as ").next().unwrap_or(item))
                .map(|item| item.trim().trim_start_matches("type "))
                .filter(|item| !item.is_empty()),
        );
    }
    if let Some(namespace) = group(caps, 3) {
        names.push(namespace);
    }

    let mut added = false;
    for name in names {
        added |= scan.add(name, SymbolKind::Import);
    }
    added
}

fn on_this_property(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    if scan.scopes().is_root() {
        return false;
    }
    let owner = scan.owner();
    scan.add_scoped(owner, name, SymbolKind::Property, None, None)
}

fn on_static_property(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(owner), Some(name)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    if name == "prototype" {
        return false;
    }
    scan.add_scoped(
        owner.to_string(),
        name,
        SymbolKind::Property,
        None,
        Some("Static property"),
    )
}

fn on_prototype_method(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(owner), Some(name)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    scan.add_scoped(
        owner.to_string(),
        name,
        SymbolKind::Method,
        None,
        Some("Prototype method"),
    )
}

fn on_builtin_call(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(object), Some(method)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    let Some(entry) = js_builtin_method(object, method) else {
        return false;
    };
    let dotted = format!("{}.{}", object, method);
    if scan.has_emitted(&dotted) {
        return false;
    }
    scan.add_scoped(
        BUILTINS_SCOPE.to_string(),
        &dotted,
        SymbolKind::Builtin,
        Some(entry.type_tag),
        None,
    )
}
