//! Static built-in name registries.
//!
//! Consulted only to classify identifiers; they never decide whether a user
//! declaration is recorded.

use phf::{phf_map, phf_set};

/// Python built-in functions, types and constants.
pub static PYTHON_BUILTINS: phf::Set<&'static str> = phf_set! {
    "abs", "all", "any", "ascii", "bin", "bool", "bytearray", "bytes", "callable", "chr",
    "classmethod", "compile", "complex", "delattr", "dict", "dir", "divmod", "enumerate",
    "eval", "exec", "filter", "float", "format", "frozenset", "getattr", "globals", "hasattr",
    "hash", "help", "hex", "id", "input", "int", "isinstance", "issubclass", "iter", "len",
    "list", "locals", "map", "max", "memoryview", "min", "next", "object", "oct", "open",
    "ord", "pow", "print", "property", "range", "repr", "reversed", "round", "set", "setattr",
    "slice", "sorted", "staticmethod", "str", "sum", "super", "tuple", "type", "vars", "zip",
    "__import__", "None", "True", "False", "NotImplemented", "Ellipsis",
};

/// Python statement keywords that can look like `name: ...` or `name = ...`.
pub static PYTHON_KEYWORDS: phf::Set<&'static str> = phf_set! {
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
    "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in",
    "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield", "match", "case",
};

/// A well-known JavaScript global object.
#[derive(Debug)]
pub struct BuiltinObject {
    /// Type tag reported as the record's data type.
    pub type_tag: &'static str,
    pub methods: &'static [&'static str],
}

impl BuiltinObject {
    pub fn has_method(&self, method: &str) -> bool {
        self.methods.contains(&method)
    }
}

/// JavaScript global objects and the static methods they expose.
pub static JS_BUILTIN_OBJECTS: phf::Map<&'static str, BuiltinObject> = phf_map! {
    "console" => BuiltinObject {
        type_tag: "Console",
        methods: &[
            "log", "error", "warn", "info", "debug", "trace", "table", "dir", "group",
            "groupEnd", "time", "timeEnd", "assert", "count", "clear",
        ],
    },
    "Math" => BuiltinObject {
        type_tag: "Math",
        methods: &[
            "abs", "ceil", "floor", "round", "max", "min", "pow", "sqrt", "cbrt", "random",
            "sin", "cos", "tan", "atan2", "log", "log2", "log10", "exp", "trunc", "sign", "hypot",
        ],
    },
    "JSON" => BuiltinObject {
        type_tag: "JSON",
        methods: &["parse", "stringify"],
    },
    "Object" => BuiltinObject {
        type_tag: "ObjectConstructor",
        methods: &[
            "keys", "values", "entries", "assign", "freeze", "isFrozen", "seal", "create",
            "defineProperty", "getPrototypeOf", "setPrototypeOf", "fromEntries",
        ],
    },
    "Array" => BuiltinObject {
        type_tag: "ArrayConstructor",
        methods: &["isArray", "from", "of"],
    },
    "Promise" => BuiltinObject {
        type_tag: "PromiseConstructor",
        methods: &["all", "allSettled", "any", "race", "resolve", "reject"],
    },
    "Number" => BuiltinObject {
        type_tag: "NumberConstructor",
        methods: &["isInteger", "isFinite", "isNaN", "isSafeInteger", "parseFloat", "parseInt"],
    },
    "String" => BuiltinObject {
        type_tag: "StringConstructor",
        methods: &["fromCharCode", "fromCodePoint", "raw"],
    },
    "Date" => BuiltinObject {
        type_tag: "DateConstructor",
        methods: &["now", "parse", "UTC"],
    },
    "Reflect" => BuiltinObject {
        type_tag: "Reflect",
        methods: &["apply", "construct", "get", "set", "has", "ownKeys", "defineProperty"],
    },
};

pub fn is_python_builtin(name: &str) -> bool {
    PYTHON_BUILTINS.contains(name)
}

/// Look up `object.method` in the JavaScript registry.
pub fn js_builtin_method(object: &str, method: &str) -> Option<&'static BuiltinObject> {
    JS_BUILTIN_OBJECTS
        .get(object)
        .filter(|entry| entry.has_method(method))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_builtins() {
        assert!(is_python_builtin("print"));
        assert!(is_python_builtin("__import__"));
        assert!(!is_python_builtin("calculate_area"));
        assert!(PYTHON_KEYWORDS.contains("elif"));
    }

    #[test]
    fn test_js_builtin_methods() {
        let console = js_builtin_method("console", "log").expect("console.log is registered");
        assert_eq!(console.type_tag, "Console");
        assert!(js_builtin_method("Math", "max").is_some());
        assert!(js_builtin_method("Math", "launch").is_none());
        assert!(js_builtin_method("window", "alert").is_none());
    }
}
