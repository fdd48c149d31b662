// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # javelin-lexer
//!
//! A Java source tokenizer modeled on the front end of a Java compiler.
//!
//! ## Overview
//!
//! This crate provides:
//! - Unicode escape translation following JLS 3.3
//! - A pull-based [`Scanner`] producing classified, positioned tokens
//! - Decoded literal values (`int`, `long`, `float`, `double`, `char`, strings)
//! - A [`ScannerFactory`] that shares one keyword table across scanners
//! - A [`TokenStream`] with lookahead for parsers
//!
//! ## Quick Start
//!
//! ```rust
//! use javelin_lexer::{tokenize, TokenKind};
//!
//! let tokens = tokenize("int x = 0x1F;");
//! assert_eq!(tokens[0].kind, TokenKind::Int);
//! assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod factory;
pub mod lexer;
pub mod source;
pub mod stream;

pub use error::{Error, LexicalError, LexicalErrorKind, Result};
pub use factory::{ScannedUnit, ScannerFactory, ScannerOptions};
pub use lexer::{
    CommentStyle, KeywordTable, LiteralValue, NameTable, Position, Scanner, Span, Symbol, Token,
    TokenCategory, TokenKind,
};
pub use source::{LineMap, SourceUnit};
pub use stream::TokenStream;

/// Tokenizes `text` with default options.
///
/// The returned tokens end with the EOF sentinel. Lexical errors appear as
/// [`TokenKind::Error`] tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    Scanner::new(text).scan_all().tokens
}

/// Tokenizes `text`, failing on the first lexical error.
pub fn tokenize_strict(text: &str) -> Result<Vec<Token>> {
    let scanned = Scanner::new(text).scan_all();
    match scanned.errors.into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(scanned.tokens),
    }
}
