//! Comment-only line detection.
//!
//! Only the start of a trimmed line is inspected; block comment state is not
//! carried across lines.

use crate::language::Language;

/// A line-prefix marker that makes a line comment-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentMarker {
    Prefix(&'static str),
    /// Preprocessor lines (`#include`, `#pragma`, ...). `#define` is left for
    /// the scanner so macros still become constants.
    Directive,
}

const C_STYLE: &[CommentMarker] = &[
    CommentMarker::Prefix("//"),
    CommentMarker::Prefix("/*"),
    CommentMarker::Prefix("*"),
];

const C_PREPROCESSED: &[CommentMarker] = &[
    CommentMarker::Prefix("//"),
    CommentMarker::Prefix("/*"),
    CommentMarker::Prefix("*"),
    CommentMarker::Directive,
];

const HASH: &[CommentMarker] = &[CommentMarker::Prefix("#")];

/// Comment markers for a language, in match order.
pub fn markers(language: Language) -> &'static [CommentMarker] {
    match language {
        Language::Python => HASH,
        Language::C | Language::Cpp => C_PREPROCESSED,
        Language::JavaScript
        | Language::Java
        | Language::CSharp
        | Language::Go
        | Language::Rust => C_STYLE,
    }
}

impl CommentMarker {
    fn matches(&self, line: &str) -> bool {
        match self {
            CommentMarker::Prefix(prefix) => line.starts_with(prefix),
            CommentMarker::Directive => line.starts_with('#') && !is_macro_definition(line),
        }
    }
}

/// Whether a trimmed line is comment-only for the language.
pub fn is_comment(line: &str, language: Language) -> bool {
    markers(language).iter().any(|m| m.matches(line))
}

fn is_macro_definition(line: &str) -> bool {
    line[1..].trim_start().starts_with("define")
}
