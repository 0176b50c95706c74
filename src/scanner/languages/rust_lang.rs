//! Rust line scanner.

use once_cell::sync::Lazy;
use regex::Captures;

use super::last_segment;
use crate::error::Result;
use crate::language::Language;
use crate::scanner::{group, opens_block, opens_scope, rules, LineScan, Rule, RuleSet, ScopeKind};
use crate::symbol::SymbolKind;

static EXCLUSIVE: &[Rule] = &[
    Rule {
        name: "use",
        pattern: r"^(?:pub(?:\s*\([^)]*\))?\s+)?use\s+([^;]+);?$",
        apply: on_use,
    },
    Rule {
        name: "function",
        pattern: r#"^(?:pub(?:\s*\([^)]*\))?\s+)?(?:(?:default|const|async|unsafe|extern(?:\s+"[^"]*")?)\s+)*fn\s+(\w+)"#,
        apply: on_function,
    },
    Rule {
        name: "impl",
        pattern: r"^(?:unsafe\s+)?impl(?:\s*<[^{]*?>)?\s+(?:[\w:<>, ]+?\s+for\s+)?&?(?:\w+::)*(\w+)",
        apply: on_impl,
    },
    Rule {
        name: "trait",
        pattern: r"^(?:pub(?:\s*\([^)]*\))?\s+)?(?:unsafe\s+)?trait\s+(\w+)",
        apply: on_trait,
    },
    Rule {
        name: "struct",
        pattern: r"^(?:pub(?:\s*\([^)]*\))?\s+)?(struct|enum|union)\s+(\w+)",
        apply: on_struct,
    },
    Rule {
        name: "type-alias",
        pattern: r"^(?:pub(?:\s*\([^)]*\))?\s+)?type\s+(\w+)(?:<[^>]*>)?\s*(?:=\s*([^;]+))?;",
        apply: on_type_alias,
    },
    Rule {
        name: "module",
        pattern: r"^(?:pub(?:\s*\([^)]*\))?\s+)?mod\s+(\w+)\s*\{",
        apply: on_module,
    },
    Rule {
        name: "let",
        pattern: r"^let\s+(?:mut\s+)?(\w+)\s*(?::\s*([^=;]+?))?\s*(?:=|;)",
        apply: on_let,
    },
    Rule {
        name: "let-tuple",
        pattern: r"^let\s+(?:mut\s+)?\(([^)]*)\)",
        apply: on_let_tuple,
    },
    Rule {
        name: "static",
        pattern: r"^(?:pub(?:\s*\([^)]*\))?\s+)?static\s+(mut\s+)?(\w+)\s*:\s*([^=]+?)\s*=",
        apply: on_static,
    },
    Rule {
        name: "const",
        pattern: r"^(?:pub(?:\s*\([^)]*\))?\s+)?const\s+(\w+)\s*:\s*([^=]+?)\s*=",
        apply: on_const,
    },
    Rule {
        name: "field",
        pattern: r"^(?:pub(?:\s*\([^)]*\))?\s+)?(\w+)\s*:\s*([^,{}]+?)\s*,?$",
        apply: on_field,
    },
];

static RULES: Lazy<Result<RuleSet>> =
    Lazy::new(|| RuleSet::compile(Language::Rust, EXCLUSIVE, &[]));

pub fn scan_line(scan: &mut LineScan<'_>) -> Result<()> {
    rules(&RULES)?.apply(scan);
    Ok(())
}

/// Names brought into scope by the body of a `use` declaration.
///
/// Aliases resolve to the item they rename; `self` and globs name the
/// module they sit in.
fn use_names(tree: &str) -> Vec<&str> {
    let (prefix, items) = match tree.find('{') {
        Some(open) => {
            let close = tree.rfind('}').unwrap_or(tree.len());
            let inner = if close > open { &tree[open + 1..close] } else { "" };
            (tree[..open].trim_end_matches(':'), inner)
        }
        None => {
            let path = tree.split(" as ").next().unwrap_or(tree).trim();
            match path.strip_suffix("::*") {
                Some(module) => (module, "*"),
                None => ("", path),
            }
        }
    };

    items
        .split(',')
        .map(|item| item.trim().trim_start_matches('{').trim_end_matches('}').trim())
        .filter(|item| !item.is_empty())
        .map(|item| {
            let item = item.split(" as ").next().unwrap_or(item).trim();
            let item = item.rsplit('{').next().unwrap_or(item).trim();
            if item == "self" || item == "*" {
                last_segment(prefix, ':')
            } else {
                last_segment(item, ':')
            }
        })
        .filter(|name| !name.is_empty())
        .collect()
}

fn on_use(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(tree) = group(caps, 1) else {
        return false;
    };
    let mut added = false;
    for name in use_names(tree.trim()) {
        added |= scan.add(name, SymbolKind::Import);
    }
    added
}

/// Return type from a signature line, if it is on this line.
fn return_type(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once("->")?;
    let end = [rest.find('{'), rest.find(" where"), rest.find(';')]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(rest.len());
    Some(rest[..end].trim()).filter(|t| !t.is_empty())
}

fn on_function(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    let kind = if scan.scopes().current_kind() == ScopeKind::Impl {
        SymbolKind::Method
    } else {
        SymbolKind::Function
    };
    scan.add_with(name, kind, return_type(scan.text));
    // Trait method declarations end in `;` and have no body.
    if opens_scope(scan.text) {
        scan.push_scope(name, ScopeKind::Function);
    }
    true
}

fn on_impl(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(target) = group(caps, 1) else {
        return false;
    };
    if !scan.text.ends_with('}') || opens_block(scan.text) {
        scan.push_scope(target, ScopeKind::Impl);
    }
    true
}

fn on_trait(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    let scope = scan.scope().to_string();
    scan.add_scoped(scope, name, SymbolKind::Class, Some("trait"), Some("Trait definition"));
    if opens_scope(scan.text) {
        scan.push_scope(name, ScopeKind::Impl);
    }
    true
}

fn on_struct(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(keyword), Some(name)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    scan.add_with(name, SymbolKind::Class, Some(keyword));
    // Unit and tuple structs end in `;`.
    if !scan.text.ends_with(';') && (opens_block(scan.text) || !scan.text.contains('{')) {
        scan.push_scope(name, ScopeKind::Class);
    }
    true
}

fn on_type_alias(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    let scope = scan.scope().to_string();
    scan.add_scoped(
        scope,
        name,
        SymbolKind::Class,
        group(caps, 2).map(str::trim),
        Some("Type alias"),
    )
}

fn on_module(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    if opens_block(scan.text) {
        scan.push_scope(name, ScopeKind::Namespace);
    }
    true
}

fn on_let(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    if name == "_" {
        return true;
    }
    scan.add_with(name, SymbolKind::Variable, group(caps, 2));
    true
}

fn on_let_tuple(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(names) = group(caps, 1) else {
        return false;
    };
    for name in names.split(',') {
        let name = name.trim().trim_start_matches("mut ").trim();
        if !name.is_empty() && name != "_" && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        {
            scan.add(name, SymbolKind::Variable);
        }
    }
    true
}

fn on_static(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 2) else {
        return false;
    };
    let kind = if group(caps, 1).is_some() {
        SymbolKind::Variable
    } else {
        SymbolKind::Constant
    };
    scan.add_with(name, kind, group(caps, 3))
}

fn on_const(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    scan.add_with(name, SymbolKind::Constant, group(caps, 2))
}

fn on_field(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(name), Some(data_type)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    if scan.scopes().current_kind() != ScopeKind::Class {
        return false;
    }
    let owner = scan.owner();
    scan.add_scoped(owner, name, SymbolKind::Property, Some(data_type), None)
}

#[cfg(test)]
mod tests {
    use super::use_names;
    use crate::language::Language;
    use crate::scanner::scan;
    use crate::symbol::{Symbol, SymbolKind};

    fn find<'a>(symbols: &'a [Symbol], name: &str, kind: SymbolKind) -> &'a Symbol {
        symbols
            .iter()
            .find(|s| s.name == name && s.kind == kind)
            .unwrap_or_else(|| panic!("expected {} {}", kind, name))
    }

    #[test]
    fn test_example_program() {
        let symbols = scan(Language::Rust.example(), Language::Rust).unwrap();

        assert_eq!(find(&symbols, "PI", SymbolKind::Import).line, 2);

        let user = find(&symbols, "USER_NAME", SymbolKind::Constant);
        assert_eq!(user.data_type.as_deref(), Some("&str"));
        let count = find(&symbols, "COUNT", SymbolKind::Variable);
        assert_eq!(count.data_type.as_deref(), Some("i32"));

        let area_fn = find(&symbols, "calculate_area", SymbolKind::Function);
        assert_eq!(area_fn.data_type.as_deref(), Some("f64"));

        assert_eq!(find(&symbols, "Circle", SymbolKind::Class).line, 12);
        let radius = find(&symbols, "radius", SymbolKind::Property);
        assert_eq!(radius.scope, "Circle");
        assert_eq!(radius.data_type.as_deref(), Some("f64"));

        let new = find(&symbols, "new", SymbolKind::Method);
        assert_eq!(new.scope, "Circle");
        assert_eq!(new.data_type.as_deref(), Some("Circle"));
        assert_eq!(find(&symbols, "get_area", SymbolKind::Method).scope, "Circle");

        assert_eq!(find(&symbols, "main", SymbolKind::Function).scope, "global");
        assert_eq!(find(&symbols, "circle", SymbolKind::Variable).scope, "main");
        assert!(symbols.iter().any(|s| s.name == "area" && s.scope == "calculate_area"));
        assert!(symbols.iter().any(|s| s.name == "area" && s.scope == "main"));
    }

    #[test]
    fn test_use_names() {
        assert_eq!(use_names("std::collections::HashMap"), vec!["HashMap"]);
        assert_eq!(
            use_names("std::collections::{HashMap, HashSet as Set}"),
            vec!["HashMap", "HashSet"]
        );
        assert_eq!(use_names("std::io::{self, Write}"), vec!["io", "Write"]);
        assert_eq!(use_names("crate::prelude::*"), vec!["prelude"]);
        assert_eq!(use_names("serde::Serialize as Ser"), vec!["Serialize"]);
        assert_eq!(use_names("std::{fmt, io::{Read, Write}}"), vec!["fmt", "Read", "Write"]);
    }

    #[test]
    fn test_traits_and_impls() {
        let source = r#"pub trait Shape {
    fn area(&self) -> f64;
    fn name(&self) -> String {
    }
}
impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    }
}
pub struct Meters(f64);
pub const LIMIT: usize = 8;
let (mut a, b) = split();"#;
        let symbols = scan(source, Language::Rust).unwrap();

        let shape = find(&symbols, "Shape", SymbolKind::Class);
        assert_eq!(shape.data_type.as_deref(), Some("trait"));
        assert_eq!(find(&symbols, "area", SymbolKind::Method).scope, "Shape");
        assert_eq!(find(&symbols, "name", SymbolKind::Method).scope, "Shape");

        let fmt = find(&symbols, "fmt", SymbolKind::Method);
        assert_eq!(fmt.scope, "Circle");
        assert_eq!(fmt.data_type.as_deref(), Some("fmt::Result"));

        assert_eq!(find(&symbols, "Meters", SymbolKind::Class).scope, "global");
        assert_eq!(find(&symbols, "LIMIT", SymbolKind::Constant).scope, "global");

        let tuple: Vec<&str> = symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Variable)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(tuple, vec!["a", "b"]);
    }

    #[test]
    fn test_one_line_bodies_open_no_scope() {
        let source = "fn one() -> u8 { 1 }\ntrait Marker {}\nfn two() {\n}\nconst K: u8 = 1;";
        let symbols = scan(source, Language::Rust).unwrap();
        assert_eq!(find(&symbols, "Marker", SymbolKind::Class).scope, "global");
        assert_eq!(find(&symbols, "two", SymbolKind::Function).scope, "global");
        assert_eq!(find(&symbols, "K", SymbolKind::Constant).scope, "global");
    }
}
