//! Per-language line scanners.
//!
//! Each module owns an ordered rule table: an exclusive cascade where the
//! first claiming rule ends the line, plus independent checks that run on
//! every line regardless.

mod c;
mod cpp;
mod csharp;
mod go;
mod java;
mod javascript;
mod python;
mod rust_lang;

use super::LineScan;
use crate::error::Result;
use crate::language::Language;

/// Dispatch one line to its language's scanner.
pub fn scan_line(language: Language, scan: &mut LineScan<'_>) -> Result<()> {
    match language {
        Language::JavaScript => javascript::scan_line(scan),
        Language::Python => python::scan_line(scan),
        Language::Java => java::scan_line(scan),
        Language::C => c::scan_line(scan),
        Language::Cpp => cpp::scan_line(scan),
        Language::CSharp => csharp::scan_line(scan),
        Language::Go => go::scan_line(scan),
        Language::Rust => rust_lang::scan_line(scan),
    }
}

/// Words that can lead a C-family statement but never name a type.
const STATEMENT_KEYWORDS: &[&str] = &[
    "return", "new", "delete", "throw", "else", "case", "goto", "break", "continue", "if",
    "while", "for", "foreach", "switch", "catch", "do", "sizeof", "typedef", "package", "import",
    "using", "namespace", "yield", "await", "struct", "enum", "union", "class", "interface",
];

pub(crate) fn is_statement_keyword(word: &str) -> bool {
    STATEMENT_KEYWORDS.contains(&word)
}

/// Whether `word` appears as a whole word in `line`.
pub(crate) fn has_word(line: &str, word: &str) -> bool {
    line.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|w| w == word)
}

/// The part of a declaration before its initializer.
pub(crate) fn declaration_head(line: &str) -> &str {
    match line.find('=') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Last segment of a dotted or slashed path.
pub(crate) fn last_segment(path: &str, separator: char) -> &str {
    path.rsplit(separator).next().unwrap_or(path).trim()
}
