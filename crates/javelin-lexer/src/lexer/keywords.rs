//! Reserved word table.
//!
//! The table is built once per [`ScannerFactory`](crate::ScannerFactory) and
//! shared by every scanner it creates.

use rustc_hash::FxHashMap;

use super::token::{LiteralValue, TokenKind};
use crate::factory::ScannerOptions;

const KEYWORDS: &[TokenKind] = &[
    TokenKind::Abstract,
    TokenKind::Assert,
    TokenKind::Boolean,
    TokenKind::Break,
    TokenKind::Byte,
    TokenKind::Case,
    TokenKind::Catch,
    TokenKind::Char,
    TokenKind::Class,
    TokenKind::Const,
    TokenKind::Continue,
    TokenKind::Default,
    TokenKind::Do,
    TokenKind::Double,
    TokenKind::Else,
    TokenKind::Enum,
    TokenKind::Extends,
    TokenKind::Final,
    TokenKind::Finally,
    TokenKind::Float,
    TokenKind::For,
    TokenKind::Goto,
    TokenKind::If,
    TokenKind::Implements,
    TokenKind::Import,
    TokenKind::Instanceof,
    TokenKind::Int,
    TokenKind::Interface,
    TokenKind::Long,
    TokenKind::Native,
    TokenKind::New,
    TokenKind::Package,
    TokenKind::Private,
    TokenKind::Protected,
    TokenKind::Public,
    TokenKind::Return,
    TokenKind::Short,
    TokenKind::Static,
    TokenKind::Strictfp,
    TokenKind::Super,
    TokenKind::Switch,
    TokenKind::Synchronized,
    TokenKind::This,
    TokenKind::Throw,
    TokenKind::Throws,
    TokenKind::Transient,
    TokenKind::Try,
    TokenKind::Void,
    TokenKind::Volatile,
    TokenKind::While,
];

/// Maps reserved spellings to their token kinds.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    map: FxHashMap<&'static str, TokenKind>,
}

impl KeywordTable {
    /// Builds the default table, where `_` is reserved as in Java 9 and later.
    pub fn new() -> Self {
        Self::for_options(&ScannerOptions::default())
    }

    /// Builds the table for the given options.
    pub fn for_options(options: &ScannerOptions) -> Self {
        let mut map = FxHashMap::default();
        for &kind in KEYWORDS {
            if let Some(text) = kind.fixed_text() {
                map.insert(text, kind);
            }
        }
        if !options.allow_underscore_identifier {
            map.insert("_", TokenKind::Underscore);
        }
        map.insert("true", TokenKind::BooleanLiteral);
        map.insert("false", TokenKind::BooleanLiteral);
        map.insert("null", TokenKind::NullLiteral);
        Self { map }
    }

    /// Returns the reserved kind spelled `text`, if any.
    pub fn lookup(&self, text: &str) -> Option<TokenKind> {
        self.map.get(text).copied()
    }

    /// Classifies a scanned identifier-shaped word.
    pub fn classify(&self, text: &str) -> (TokenKind, Option<LiteralValue>) {
        match self.lookup(text) {
            Some(TokenKind::BooleanLiteral) => {
                (TokenKind::BooleanLiteral, Some(LiteralValue::Bool(text == "true")))
            }
            Some(TokenKind::NullLiteral) => (TokenKind::NullLiteral, Some(LiteralValue::Null)),
            Some(kind) => (kind, None),
            None => (TokenKind::Identifier, None),
        }
    }

    /// Every reserved spelling, in no particular order.
    pub fn words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.map.keys().copied()
    }

    /// Number of reserved spellings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Always false; the table is never empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::new()
    }
}
