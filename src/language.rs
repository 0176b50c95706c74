//! Supported languages and their static metadata.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// The closed set of languages the scanner understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    Python,
    Java,
    C,
    Cpp,
    CSharp,
    Go,
    Rust,
}

impl Language {
    /// All supported languages, in display order.
    pub const ALL: [Language; 8] = [
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Go,
        Language::Rust,
    ];

    /// Canonical identifier (e.g. "csharp").
    pub fn id(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
        }
    }

    /// Parse a language identifier.
    ///
    /// Identifiers are matched case-insensitively against `id()`.
    pub fn from_id(id: &str) -> Result<Self> {
        let wanted = id.trim().to_lowercase();
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.id() == wanted)
            .ok_or_else(|| ScanError::UnsupportedLanguage(id.to_string()))
    }

    /// Detect a language from a file extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Result<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "js" | "mjs" | "cjs" | "jsx" => Ok(Language::JavaScript),
            "py" | "pyi" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            "c" => Ok(Language::C),
            "cpp" | "cc" | "cxx" | "h" | "hpp" | "hh" | "hxx" => Ok(Language::Cpp),
            "cs" => Ok(Language::CSharp),
            "go" => Ok(Language::Go),
            "rs" => Ok(Language::Rust),
            _ => Err(ScanError::UnsupportedLanguage(format!(".{}", ext))),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::Rust => "Rust",
        }
    }

    /// Canonical file extension, including the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::JavaScript => ".js",
            Language::Python => ".py",
            Language::Java => ".java",
            Language::C => ".c",
            Language::Cpp => ".cpp",
            Language::CSharp => ".cs",
            Language::Go => ".go",
            Language::Rust => ".rs",
        }
    }

    /// Illustrative source snippet.
    pub fn example(&self) -> &'static str {
        match self {
            Language::JavaScript => include_str!("samples/example.js"),
            Language::Python => include_str!("samples/example.py"),
            Language::Java => include_str!("samples/example.java"),
            Language::C => include_str!("samples/example.c"),
            Language::Cpp => include_str!("samples/example.cpp"),
            Language::CSharp => include_str!("samples/example.cs"),
            Language::Go => include_str!("samples/example.go"),
            Language::Rust => include_str!("samples/example.rs"),
        }
    }

    /// Declaration keywords worth highlighting for this language.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Language::JavaScript => &["let", "const", "var", "function", "class", "import", "export"],
            Language::Python => &["def", "class", "import", "from", "global", "nonlocal"],
            Language::Java => &[
                "public", "private", "protected", "static", "final", "class", "import", "package",
            ],
            Language::C => &[
                "#include", "#define", "int", "double", "float", "char", "void", "struct", "typedef",
            ],
            Language::Cpp => &[
                "#include", "class", "public", "private", "protected", "namespace", "using",
                "template",
            ],
            Language::CSharp => &[
                "using", "namespace", "class", "public", "private", "protected", "static", "const",
            ],
            Language::Go => &[
                "package", "import", "func", "var", "const", "type", "struct", "interface",
            ],
            Language::Rust => &[
                "use", "fn", "let", "mut", "const", "static", "struct", "impl", "trait", "enum",
            ],
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl std::str::FromStr for Language {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        Language::from_id(s)
    }
}
