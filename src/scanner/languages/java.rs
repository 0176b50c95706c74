//! Java line scanner.

use once_cell::sync::Lazy;
use regex::Captures;

use super::{declaration_head, has_word, is_statement_keyword, last_segment};
use crate::error::Result;
use crate::language::Language;
use crate::scanner::{group, opens_scope, rules, LineScan, Rule, RuleSet, ScopeKind};
use crate::symbol::SymbolKind;

const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "static", "final", "abstract", "synchronized", "native",
    "default", "strictfp", "transient", "volatile",
];

static EXCLUSIVE: &[Rule] = &[
    Rule {
        name: "package",
        pattern: r"^package\s+[\w.]+\s*;",
        apply: on_package,
    },
    Rule {
        name: "import",
        pattern: r"^import\s+(?:static\s+)?([\w.]+?)(\.\*)?\s*;",
        apply: on_import,
    },
    Rule {
        name: "class",
        pattern: r"\b(?:class|interface|enum|record)\s+(\w+)",
        apply: on_class,
    },
    Rule {
        name: "method",
        pattern: r"^(?:(?:public|private|protected|static|final|abstract|synchronized|native|default|strictfp)\s+)*(?:<[^>]+>\s+)?([\w.]+(?:<[^=;(]*>)?(?:\[\])*)\s+(\w+)\s*\(",
        apply: on_method,
    },
    Rule {
        name: "constructor",
        pattern: r"^(\w+)\s*\([^)]*\)\s*(?:throws\s+[\w.,\s]+)?\{?$",
        apply: on_bare_constructor,
    },
    Rule {
        name: "variable",
        pattern: r"^(?:(?:public|private|protected|static|final|transient|volatile)\s+)*([\w.]+(?:<[^=;(]*>)?(?:\[\])*)\s+(\w+)\s*(?:\[\])*\s*(?:=|;|,)",
        apply: on_variable,
    },
];

static RULES: Lazy<Result<RuleSet>> =
    Lazy::new(|| RuleSet::compile(Language::Java, EXCLUSIVE, &[]));

pub fn scan_line(scan: &mut LineScan<'_>) -> Result<()> {
    rules(&RULES)?.apply(scan);
    Ok(())
}

fn on_package(_caps: &Captures<'_>, _scan: &mut LineScan<'_>) -> bool {
    true
}

fn on_import(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(path) = group(caps, 1) else {
        return false;
    };
    // On-demand imports (`java.util.*`) name no single member.
    if caps.get(2).is_none() {
        scan.add(last_segment(path, '.'), SymbolKind::Import);
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

fn on_method(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(return_type), Some(name)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    if is_statement_keyword(return_type) || is_statement_keyword(name) {
        return false;
    }

    // `public Foo(...)` backtracks into type = "public": a constructor.
    if MODIFIERS.contains(&return_type) {
        scan.add(name, SymbolKind::Constructor);
    } else {
        scan.add_with(name, SymbolKind::Method, Some(return_type));
    }
    // Abstract and interface methods end in `;` and open no body.
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

fn on_variable(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(data_type), Some(name)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    let head = declaration_head(scan.text);
    if is_statement_keyword(data_type) || MODIFIERS.contains(&data_type) || head.contains('(') {
        return false;
    }
    let kind = if has_word(head, "final") {
        SymbolKind::Constant
    } else {
        SymbolKind::Variable
    };
    scan.add_with(name, kind, Some(data_type));
    true
}

#[cfg(test)]
mod tests {
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
        let symbols = scan(Language::Java.example(), Language::Java).unwrap();

        assert_eq!(find(&symbols, "Calculator", SymbolKind::Class).scope, "global");

        let pi = find(&symbols, "PI", SymbolKind::Constant);
        assert_eq!(pi.scope, "Calculator");
        assert_eq!(pi.data_type.as_deref(), Some("double"));

        let user = find(&symbols, "userName", SymbolKind::Variable);
        assert_eq!(user.data_type.as_deref(), Some("String"));

        let method = find(&symbols, "calculateArea", SymbolKind::Method);
        assert_eq!(method.scope, "Calculator");
        assert_eq!(method.data_type.as_deref(), Some("double"));

        assert_eq!(find(&symbols, "area", SymbolKind::Variable).scope, "calculateArea");

        let calc = find(&symbols, "calc", SymbolKind::Variable);
        assert_eq!(calc.scope, "main");
        assert_eq!(calc.data_type.as_deref(), Some("Calculator"));

        // `new Calculator()` is a call, not a declaration.
        assert!(!symbols
            .iter()
            .any(|s| s.name == "Calculator" && s.kind == SymbolKind::Method));
        // On-demand import names nothing.
        assert!(!symbols.iter().any(|s| s.kind == SymbolKind::Import));
    }

    #[test]
    fn test_imports() {
        let source = "package com.example;\nimport java.util.List;\nimport static java.lang.Math.max;";
        let symbols = scan(source, Language::Java).unwrap();
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["List", "max"]);
        assert!(symbols.iter().all(|s| s.kind == SymbolKind::Import));
    }

    #[test]
    fn test_constructors() {
        let source = r#"public class Point {
    public Point(int x) {
    }
    Point() {
    }
}"#;
        let symbols = scan(source, Language::Java).unwrap();
        let ctors: Vec<usize> = symbols
            .iter()
            .filter(|s| s.kind == SymbolKind::Constructor)
            .map(|s| s.line)
            .collect();
        // Both share (name, scope, kind); the first survives.
        assert_eq!(ctors, vec![2]);
        assert_eq!(find(&symbols, "Point", SymbolKind::Constructor).scope, "Point");
    }

    #[test]
    fn test_return_is_not_a_declaration() {
        let source = "int f() {\nreturn total;\nreturn compute(x);\n}";
        let symbols = scan(source, Language::Java).unwrap();
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["f"]);
    }

    #[test]
    fn test_interface_methods_open_no_scope() {
        let source = "interface Shape {\ndouble area();\ndouble perimeter();\n}\nint after = 1;";
        let symbols = scan(source, Language::Java).unwrap();
        assert_eq!(find(&symbols, "perimeter", SymbolKind::Method).scope, "Shape");
        assert_eq!(find(&symbols, "after", SymbolKind::Variable).scope, "global");
    }

    #[test]
    fn test_one_line_method_opens_no_scope() {
        let source = "int get() { return x; }\nint y = 2;";
        let symbols = scan(source, Language::Java).unwrap();
        assert_eq!(find(&symbols, "get", SymbolKind::Method).scope, "global");
        assert_eq!(find(&symbols, "y", SymbolKind::Variable).scope, "global");
    }
}
