//! Error types for the Java lexer

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::lexer::Position;

/// Result type for lexer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or scanning source units
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a source unit failed
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        /// Path of the unit
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Lexical error while scanning
    #[error("{0}")]
    Lexical(#[from] LexicalError),
}

/// What went wrong while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexicalErrorKind {
    /// `\u` not followed by four hex digits
    InvalidUnicodeEscape,
    /// `/*` without a closing `*/`
    UnterminatedComment,
    /// Bad digits, misplaced underscores, missing exponent digits, ...
    MalformedNumericLiteral,
    /// The literal does not fit its target type
    NumericLiteralOverflow,
    /// Missing closing `"`
    UnterminatedStringLiteral,
    /// Empty, multi-character or unclosed character literal
    MalformedCharLiteral,
    /// Unknown escape sequence inside a string or character literal
    IllegalEscapeCharacter(char),
    /// A character that cannot start any token
    UnexpectedCharacter(char),
}

impl fmt::Display for LexicalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexicalErrorKind::InvalidUnicodeEscape => f.write_str("illegal unicode escape"),
            LexicalErrorKind::UnterminatedComment => f.write_str("unclosed comment"),
            LexicalErrorKind::MalformedNumericLiteral => f.write_str("malformed numeric literal"),
            LexicalErrorKind::NumericLiteralOverflow => f.write_str("numeric literal out of range"),
            LexicalErrorKind::UnterminatedStringLiteral => f.write_str("unclosed string literal"),
            LexicalErrorKind::MalformedCharLiteral => f.write_str("malformed character literal"),
            LexicalErrorKind::IllegalEscapeCharacter(ch) => {
                write!(f, "illegal escape character '{}'", ch.escape_default())
            }
            LexicalErrorKind::UnexpectedCharacter(ch) => {
                write!(f, "illegal character: '\\u{:04x}'", *ch as u32)
            }
        }
    }
}

/// A lexical error at a raw source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position}: {kind}")]
pub struct LexicalError {
    /// What went wrong
    pub kind: LexicalErrorKind,
    /// Where it went wrong
    pub position: Position,
    /// Whether scanning can resume after the malformed region
    pub recoverable: bool,
}

impl LexicalError {
    /// Creates an error; unterminated comments and strings are fatal by default.
    pub fn new(kind: LexicalErrorKind, position: Position) -> Self {
        let recoverable = !matches!(
            kind,
            LexicalErrorKind::UnterminatedComment | LexicalErrorKind::UnterminatedStringLiteral
        );
        Self {
            kind,
            position,
            recoverable,
        }
    }

    /// Overrides the recovery policy.
    pub fn with_recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = recoverable;
        self
    }

    /// Returns true if scanning can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        self.recoverable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_recovery_policy() {
        let at = Position::new(0, 1, 1);
        assert!(!LexicalError::new(LexicalErrorKind::UnterminatedComment, at).is_recoverable());
        assert!(!LexicalError::new(LexicalErrorKind::UnterminatedStringLiteral, at).is_recoverable());
        assert!(LexicalError::new(LexicalErrorKind::MalformedNumericLiteral, at).is_recoverable());
        assert!(LexicalError::new(LexicalErrorKind::UnexpectedCharacter('#'), at).is_recoverable());
        assert!(
            LexicalError::new(LexicalErrorKind::UnterminatedStringLiteral, at)
                .with_recoverable(true)
                .is_recoverable()
        );
    }

    #[test]
    fn test_display() {
        let err = LexicalError::new(
            LexicalErrorKind::UnexpectedCharacter('#'),
            Position::new(4, 2, 3),
        );
        assert_eq!(err.to_string(), "2:3: illegal character: '\\u0023'");

        let err = LexicalError::new(
            LexicalErrorKind::IllegalEscapeCharacter('q'),
            Position::new(0, 1, 1),
        );
        assert_eq!(err.to_string(), "1:1: illegal escape character 'q'");
    }

    #[test]
    fn test_wraps_into_crate_error() {
        let err: Error =
            LexicalError::new(LexicalErrorKind::UnterminatedComment, Position::new(0, 1, 1)).into();
        assert!(matches!(err, Error::Lexical(_)));
        assert_eq!(err.to_string(), "1:1: unclosed comment");
    }
}
