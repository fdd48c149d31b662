//! Operators and separators.
//!
//! Java operators are scanned with maximal munch over a fixed table:
//!
//! | Start | Longest forms |
//! |-------|---------------|
//! | `>` | `>`, `>=`, `>>`, `>>=`, `>>>`, `>>>=` |
//! | `<` | `<`, `<=`, `<<`, `<<=` |
//! | `-` | `-`, `--`, `-=`, `->` |
//! | `:` | `:`, `::` |
//! | `.` | `.`, `...` (`..` is two dots) |
//!
//! The scanner never splits `>>` on its own; a parser closing nested type
//! arguments asks for that through [`Token::split`](super::Token::split).

use super::cursor::Cursor;
use super::token::TokenKind;

/// No operator is longer than `>>>=`.
pub const MAX_OPERATOR_LEN: usize = 4;

const OPERATORS: &[(&str, TokenKind)] = &[
    ("(", TokenKind::LeftParen),
    (")", TokenKind::RightParen),
    ("{", TokenKind::LeftBrace),
    ("}", TokenKind::RightBrace),
    ("[", TokenKind::LeftBracket),
    ("]", TokenKind::RightBracket),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    ("...", TokenKind::Ellipsis),
    ("@", TokenKind::At),
    ("::", TokenKind::ColonColon),
    ("=", TokenKind::Assign),
    (">", TokenKind::GreaterThan),
    ("<", TokenKind::LessThan),
    ("!", TokenKind::Bang),
    ("~", TokenKind::Tilde),
    ("?", TokenKind::Question),
    (":", TokenKind::Colon),
    ("->", TokenKind::Arrow),
    ("==", TokenKind::EqualEqual),
    (">=", TokenKind::GreaterThanEqual),
    ("<=", TokenKind::LessThanEqual),
    ("!=", TokenKind::NotEqual),
    ("&&", TokenKind::AmpersandAmpersand),
    ("||", TokenKind::PipePipe),
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("&", TokenKind::Ampersand),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
    ("%", TokenKind::Percent),
    ("<<", TokenKind::LeftShift),
    (">>", TokenKind::RightShift),
    (">>>", TokenKind::UnsignedRightShift),
    ("+=", TokenKind::PlusAssign),
    ("-=", TokenKind::MinusAssign),
    ("*=", TokenKind::StarAssign),
    ("/=", TokenKind::SlashAssign),
    ("&=", TokenKind::AmpersandAssign),
    ("|=", TokenKind::PipeAssign),
    ("^=", TokenKind::CaretAssign),
    ("%=", TokenKind::PercentAssign),
    ("<<=", TokenKind::LeftShiftAssign),
    (">>=", TokenKind::RightShiftAssign),
    (">>>=", TokenKind::UnsignedRightShiftAssign),
];

/// Looks up the operator or separator spelled exactly `text`.
pub fn lookup(text: &str) -> Option<TokenKind> {
    OPERATORS
        .iter()
        .find(|(spelling, _)| *spelling == text)
        .map(|&(_, kind)| kind)
}

/// Returns the spelling of an operator or separator kind.
pub fn spelling(kind: TokenKind) -> Option<&'static str> {
    OPERATORS
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|&(text, _)| text)
}

/// Returns true if `ch` can start an operator or separator.
pub fn is_operator_start(ch: char) -> bool {
    matches!(
        ch,
        '(' | ')'
            | '{'
            | '}'
            | '['
            | ']'
            | ';'
            | ','
            | '.'
            | '@'
            | '='
            | '>'
            | '<'
            | '!'
            | '~'
            | '?'
            | ':'
            | '&'
            | '|'
            | '+'
            | '-'
            | '*'
            | '/'
            | '^'
            | '%'
    )
}

/// Consumes the longest operator at the cursor.
///
/// Leaves the cursor untouched and returns `None` if no operator starts here.
pub(crate) fn scan_operator(cursor: &mut Cursor) -> Option<TokenKind> {
    let mut text = String::with_capacity(MAX_OPERATOR_LEN);
    let mut best = None;

    cursor.mark();
    for _ in 0..MAX_OPERATOR_LEN {
        let Some(ch) = cursor.advance() else { break };
        text.push(ch);
        if let Some(kind) = lookup(&text) {
            best = Some(kind);
            cursor.mark();
        }
    }
    // back to the end of the longest match, or to the start if none
    cursor.reset_to_mark();
    best
}
