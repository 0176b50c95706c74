//! C line scanner.
//!
//! Struct bodies are usually closed by `};`, which never pops a scope, so
//! struct definitions record a class without opening one.

use once_cell::sync::Lazy;
use regex::Captures;

use super::{declaration_head, has_word, is_statement_keyword};
use crate::error::Result;
use crate::language::Language;
use crate::scanner::{group, opens_block, rules, LineScan, Rule, RuleSet, ScopeKind};
use crate::symbol::SymbolKind;

/// Qualifiers that say how a function is stored, not what it returns.
const STORAGE: &[&str] = &["static", "inline", "extern", "_Noreturn"];

static EXCLUSIVE: &[Rule] = &[
    Rule {
        name: "define",
        pattern: r"^#\s*define\s+(\w+)",
        apply: on_define,
    },
    Rule {
        name: "function",
        pattern: r"^((?:[A-Za-z_][\w*]*\s+)+)\**(\w+)\s*\(([^)]*)\)\s*(\{.*|;)?$",
        apply: on_function,
    },
    Rule {
        name: "typedef",
        pattern: r"^typedef\s+.*?(\w+)\s*(?:\[[^\]]*\])*\s*;$",
        apply: on_typedef,
    },
    Rule {
        name: "typedef-close",
        pattern: r"^\}\s*(\w+)\s*;$",
        apply: on_typedef,
    },
    Rule {
        name: "struct",
        pattern: r"^(?:typedef\s+)?(?:struct|union|enum)\s+(\w+)\s*(?:\{.*)?$",
        apply: on_struct,
    },
    Rule {
        name: "variable",
        pattern: r"^(?:(?:static|const|extern|volatile|register|unsigned|signed|struct|union|enum)\s+)*(\w+)(?:\s*\*+\s*|\s+)(\w+)\s*(?:\[[^\]]*\])*\s*(?:=|;|,)",
        apply: on_variable,
    },
];

static RULES: Lazy<Result<RuleSet>> = Lazy::new(|| RuleSet::compile(Language::C, EXCLUSIVE, &[]));

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

/// Return type of a function head, without storage qualifiers.
fn return_type(head: &str) -> String {
    head.split_whitespace()
        .filter(|w| !STORAGE.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn on_function(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(head), Some(name)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    if is_statement_keyword(name) || head.split_whitespace().any(is_statement_keyword) {
        return false;
    }

    let data_type = return_type(head);
    let data_type = (!data_type.is_empty()).then_some(data_type.as_str());
    scan.add_with(name, SymbolKind::Function, data_type);

    // A definition whose brace sits on the next line has no tail at all.
    let tail = group(caps, 4);
    if opens_block(scan.text) || tail.is_none() {
        scan.push_scope(name, ScopeKind::Function);
    }
    true
}

fn on_typedef(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    let scope = scan.scope().to_string();
    scan.add_scoped(scope, name, SymbolKind::Class, None, Some("Type alias"))
}

fn on_struct(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let Some(name) = group(caps, 1) else {
        return false;
    };
    scan.add(name, SymbolKind::Class)
}

fn on_variable(caps: &Captures<'_>, scan: &mut LineScan<'_>) -> bool {
    let (Some(data_type), Some(name)) = (group(caps, 1), group(caps, 2)) else {
        return false;
    };
    let head = declaration_head(scan.text);
    if is_statement_keyword(data_type) || head.contains('(') {
        return false;
    }
    let kind = if has_word(head, "const") {
        SymbolKind::Constant
    } else {
        SymbolKind::Variable
    };
    scan.add_with(name, kind, Some(data_type))
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
        let symbols = scan(Language::C.example(), Language::C).unwrap();

        let pi = find(&symbols, "PI", SymbolKind::Constant);
        assert_eq!(pi.line, 5);
        assert_eq!(pi.scope, "global");

        let user = find(&symbols, "userName", SymbolKind::Variable);
        assert_eq!(user.data_type.as_deref(), Some("char"));

        let area_fn = find(&symbols, "calculateArea", SymbolKind::Function);
        assert_eq!(area_fn.data_type.as_deref(), Some("double"));

        let locals: Vec<(&str, &str)> = symbols
            .iter()
            .filter(|s| s.name == "area")
            .map(|s| (s.name.as_str(), s.scope.as_str()))
            .collect();
        assert_eq!(locals, vec![("area", "calculateArea"), ("area", "main")]);

        assert_eq!(find(&symbols, "radius", SymbolKind::Variable).scope, "main");
        // #include lines are skipped, calls are not declarations.
        assert!(!symbols.iter().any(|s| s.name == "printf" || s.name == "stdio"));
    }

    #[test]
    fn test_prototype_then_definition() {
        let source = "static int add(int a, int b);\nint add(int a, int b)\n{\n    int sum = a + b;\n    return sum;\n}\nint after = 0;";
        let symbols = scan(source, Language::C).unwrap();

        let adds: Vec<usize> = symbols
            .iter()
            .filter(|s| s.name == "add")
            .map(|s| s.line)
            .collect();
        assert_eq!(adds, vec![1]);
        assert_eq!(find(&symbols, "add", SymbolKind::Function).data_type.as_deref(), Some("int"));
        assert_eq!(find(&symbols, "sum", SymbolKind::Variable).scope, "add");
        assert_eq!(find(&symbols, "after", SymbolKind::Variable).scope, "global");
    }

    #[test]
    fn test_types_and_constants() {
        let source = r#"typedef unsigned long size_type;
typedef struct {
    int x;
} Point;
struct Node {
struct Node *next;
};
static const int LIMIT = 10;
char *name = "x";"#;
        let symbols = scan(source, Language::C).unwrap();

        assert_eq!(find(&symbols, "size_type", SymbolKind::Class).line, 1);
        assert_eq!(find(&symbols, "Point", SymbolKind::Class).line, 4);
        assert_eq!(find(&symbols, "Node", SymbolKind::Class).line, 5);

        let next = find(&symbols, "next", SymbolKind::Variable);
        assert_eq!(next.data_type.as_deref(), Some("Node"));

        let limit = find(&symbols, "LIMIT", SymbolKind::Constant);
        assert_eq!(limit.data_type.as_deref(), Some("int"));

        assert_eq!(find(&symbols, "name", SymbolKind::Variable).data_type.as_deref(), Some("char"));
    }

    #[test]
    fn test_control_flow_is_not_a_declaration() {
        let source = "int f(int n) {\nelse if (n) {\nreturn g(n);\nreturn n;\n}";
        let symbols = scan(source, Language::C).unwrap();
        let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["f"]);
    }
}
