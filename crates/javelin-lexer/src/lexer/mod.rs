//! Lexical analysis (tokenization) for Java source code.
//!
//! The lexer transforms Java source text into a stream of tokens that a
//! parser can consume.
//!
//! ## Structure
//!
//! - `unicode.rs` - Translates `\uXXXX` escapes before scanning
//! - `cursor.rs` - Character cursor with raw line/column tracking
//! - `scanner.rs` - Main `Scanner` struct that produces tokens
//! - `token.rs` - `Token` and `TokenKind` definitions
//! - `keywords.rs` - Reserved word table
//! - `names.rs` - Identifier interning
//! - `operators` - Operator table and maximal munch
//! - `literals` - Number, string and character literals
//!
//! ## Usage
//!
//! ```rust
//! use javelin_lexer::lexer::{Scanner, TokenKind};
//!
//! let mut scanner = Scanner::new("int x = 42;");
//!
//! loop {
//!     let token = scanner.next_token();
//!     if matches!(token.kind, TokenKind::Eof) {
//!         break;
//!     }
//!     println!("{:?}", token.kind);
//! }
//! ```

mod cursor;
mod keywords;
mod names;
mod scanner;
mod token;
mod unicode;

pub mod literals;
pub mod operators;

pub use keywords::KeywordTable;
pub use names::{NameTable, Symbol};
pub use scanner::{Scanner, is_identifier_part, is_identifier_start, is_line_terminator};
pub use token::{CommentStyle, LiteralValue, Position, Span, Token, TokenCategory, TokenKind};
