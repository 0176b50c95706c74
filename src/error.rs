//! Error types for symbol scanning.

use thiserror::Error;

/// Errors surfaced at the `scan` boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The language selector does not name one of the supported scanners.
    #[error("unsupported language: {0:?}")]
    UnsupportedLanguage(String),

    /// A scanner rule pattern failed to compile.
    #[error("invalid {language} rule '{rule}': {message}")]
    InvalidPattern {
        language: &'static str,
        rule: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ScanError>;
