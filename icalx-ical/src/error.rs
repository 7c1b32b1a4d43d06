//! Error kinds surfaced across the lexer, parser and value-type registry.
//!
//! Every variant carries enough source location — line, column, and property
//! name where applicable — to point a caller at the offending input.

use thiserror::Error;

/// A physical-format violation. Fatal to the whole parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("{line}:{column}: malformed content line: {reason}")]
    Malformed {
        line: u32,
        column: usize,
        reason: String,
    },

    #[error("{line}:{column}: bare CR without following LF is not accepted")]
    BareCarriageReturn { line: u32, column: usize },

    #[error("{line}:{column}: unterminated quoted parameter value")]
    UnterminatedQuotedString { line: u32, column: usize },
}

/// A structural grammar violation (BEGIN/END mismatch, missing colon,
/// truncated stream). Fatal to the whole parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{line}:{column}: BEGIN:{expected} closed by END:{found}")]
    Unbalanced {
        expected: String,
        found: String,
        line: u32,
        column: usize,
    },

    #[error("{line}:{column}: unexpected end of input, expected END:{expected}")]
    UnexpectedEof { expected: String, line: u32, column: usize },

    #[error("{line}:{column}: {reason}")]
    Malformed {
        line: u32,
        column: usize,
        reason: String,
    },
}

/// A single property's value failed variant parsing. Surfaced on the
/// property in lenient mode, or fails the whole parse in strict mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}:{column}: property {property}: {reason}")]
pub struct ValueError {
    pub property: String,
    pub line: u32,
    pub column: usize,
    pub reason: String,
}

impl ValueError {
    pub fn new(property: impl Into<String>, line: u32, column: usize, reason: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            line,
            column,
            reason: reason.into(),
        }
    }
}
