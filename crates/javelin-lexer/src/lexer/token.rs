//! Token definitions for the Java lexer.

use std::fmt;

use crate::error::LexicalError;

use super::names::Symbol;
use super::operators;

/// A span in the source code, representing a range of raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A location in the raw source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Raw byte offset
    pub offset: usize,
    /// 1-based line
    pub line: u32,
    /// 1-based column, counted in characters
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The flavour of a comment retained as a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentStyle {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
    /// `/** ... */`
    Javadoc,
}

/// Coarse classification of a [`TokenKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Identifier,
    Keyword,
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    BooleanLiteral,
    NullLiteral,
    Operator,
    Punctuation,
    Comment,
    Eof,
    Error,
}

/// The decoded value of a literal token.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `int` literal (non-decimal literals are 32-bit patterns)
    Int(i32),
    /// `long` literal
    Long(i64),
    /// `float` literal (`f`/`F` suffix)
    Float(f32),
    /// `double` literal
    Double(f64),
    /// `char` literal
    Char(char),
    /// String literal with escapes decoded
    String(String),
    /// `true` / `false`
    Bool(bool),
    /// `null`
    Null,
}

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The lexeme after unicode-escape normalization
    pub text: String,
    /// The span in the raw source code
    pub span: Span,
    /// Line of the first character
    pub line: u32,
    /// Column of the first character
    pub column: u32,
    /// Decoded value, for literal kinds
    pub value: Option<LiteralValue>,
    /// The lexical error, for [`TokenKind::Error`]
    pub error: Option<LexicalError>,
    /// Interned name, for [`TokenKind::Identifier`]
    pub name: Option<Symbol>,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span, start: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            line: start.line,
            column: start.column,
            value: None,
            error: None,
            name: None,
        }
    }

    /// Creates the end-of-input sentinel at `at`.
    pub fn eof(at: Position) -> Self {
        Self::new(TokenKind::Eof, "", Span::new(at.offset, at.offset), at)
    }

    /// Creates an error token covering the malformed region.
    pub fn from_error(error: LexicalError, text: impl Into<String>, span: Span, start: Position) -> Self {
        let mut token = Self::new(TokenKind::Error, text, span, start);
        token.error = Some(error);
        token
    }

    /// Attaches a decoded literal value.
    pub fn with_value(mut self, value: LiteralValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Returns the position of the first character.
    pub fn position(&self) -> Position {
        Position::new(self.span.start, self.line, self.column)
    }

    /// Returns true for the end-of-input sentinel.
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Returns true for javadoc comments carrying a `@deprecated` tag.
    pub fn is_deprecated(&self) -> bool {
        self.kind == TokenKind::Comment(CommentStyle::Javadoc) && self.text.contains("@deprecated")
    }

    /// Splits a compound operator into its first character and the rest.
    ///
    /// `>>` becomes `>` and `>`, `>>=` becomes `>` and `>=`. Returns `None`
    /// when either half is not an operator, or when the token was spelled
    /// with unicode escapes (its raw span no longer lines up with its text).
    pub fn split(&self) -> Option<(Token, Token)> {
        let fixed = self.kind.fixed_text()?;
        if fixed.len() < 2 || !self.kind.is_operator() || self.span.len() != fixed.len() {
            return None;
        }

        let (head, tail) = fixed.split_at(1);
        let first_kind = operators::lookup(head)?;
        let rest_kind = operators::lookup(tail)?;
        let middle = self.span.start + 1;

        let first = Token::new(
            first_kind,
            head,
            Span::new(self.span.start, middle),
            self.position(),
        );
        let rest = Token::new(
            rest_kind,
            tail,
            Span::new(middle, self.span.end),
            Position::new(middle, self.line, self.column + 1),
        );
        Some((first, rest))
    }
}

/// The different kinds of tokens in Java.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier
    Identifier,

    // Keywords
    Abstract,
    Assert,
    Boolean,
    Break,
    Byte,
    Case,
    Catch,
    Char,
    Class,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extends,
    Final,
    Finally,
    Float,
    For,
    Goto,
    If,
    Implements,
    Import,
    Instanceof,
    Int,
    Interface,
    Long,
    Native,
    New,
    Package,
    Private,
    Protected,
    Public,
    Return,
    Short,
    Static,
    Strictfp,
    Super,
    Switch,
    Synchronized,
    This,
    Throw,
    Throws,
    Transient,
    Try,
    Void,
    Volatile,
    While,
    /// `_`, reserved since Java 9
    Underscore,

    // Literals
    /// `int` literal
    IntLiteral,
    /// `long` literal
    LongLiteral,
    /// `float` literal
    FloatLiteral,
    /// `double` literal
    DoubleLiteral,
    /// Character literal
    CharLiteral,
    /// String literal
    StringLiteral,
    /// `true` or `false`
    BooleanLiteral,
    /// `null`
    NullLiteral,

    // Separators
    /// (
    LeftParen,
    /// )
    RightParen,
    /// {
    LeftBrace,
    /// }
    RightBrace,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ;
    Semicolon,
    /// ,
    Comma,
    /// .
    Dot,
    /// ...
    Ellipsis,
    /// @
    At,
    /// ::
    ColonColon,

    // Operators
    /// =
    Assign,
    /// >
    GreaterThan,
    /// <
    LessThan,
    /// !
    Bang,
    /// ~
    Tilde,
    /// ?
    Question,
    /// :
    Colon,
    /// ->
    Arrow,
    /// ==
    EqualEqual,
    /// >=
    GreaterThanEqual,
    /// <=
    LessThanEqual,
    /// !=
    NotEqual,
    /// &&
    AmpersandAmpersand,
    /// ||
    PipePipe,
    /// ++
    PlusPlus,
    /// --
    MinusMinus,
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// &
    Ampersand,
    /// |
    Pipe,
    /// ^
    Caret,
    /// %
    Percent,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// >>>
    UnsignedRightShift,
    /// +=
    PlusAssign,
    /// -=
    MinusAssign,
    /// *=
    StarAssign,
    /// /=
    SlashAssign,
    /// &=
    AmpersandAssign,
    /// |=
    PipeAssign,
    /// ^=
    CaretAssign,
    /// %=
    PercentAssign,
    /// <<=
    LeftShiftAssign,
    /// >>=
    RightShiftAssign,
    /// >>>=
    UnsignedRightShiftAssign,

    // Special
    /// A comment retained because the scanner keeps comments
    Comment(CommentStyle),
    /// End of file
    Eof,
    /// Invalid token (for error recovery)
    Error,
}

impl TokenKind {
    /// Returns the fixed spelling of keywords, separators and operators.
    pub fn fixed_text(&self) -> Option<&'static str> {
        use TokenKind::*;
        let text = match self {
            Abstract => "abstract",
            Assert => "assert",
            Boolean => "boolean",
            Break => "break",
            Byte => "byte",
            Case => "case",
            Catch => "catch",
            Char => "char",
            Class => "class",
            Const => "const",
            Continue => "continue",
            Default => "default",
            Do => "do",
            Double => "double",
            Else => "else",
            Enum => "enum",
            Extends => "extends",
            Final => "final",
            Finally => "finally",
            Float => "float",
            For => "for",
            Goto => "goto",
            If => "if",
            Implements => "implements",
            Import => "import",
            Instanceof => "instanceof",
            Int => "int",
            Interface => "interface",
            Long => "long",
            Native => "native",
            New => "new",
            Package => "package",
            Private => "private",
            Protected => "protected",
            Public => "public",
            Return => "return",
            Short => "short",
            Static => "static",
            Strictfp => "strictfp",
            Super => "super",
            Switch => "switch",
            Synchronized => "synchronized",
            This => "this",
            Throw => "throw",
            Throws => "throws",
            Transient => "transient",
            Try => "try",
            Void => "void",
            Volatile => "volatile",
            While => "while",
            Underscore => "_",
            _ => return operators::spelling(*self),
        };
        Some(text)
    }

    /// Returns the coarse category of this kind.
    pub fn category(&self) -> TokenCategory {
        use TokenKind::*;
        match self {
            Identifier => TokenCategory::Identifier,
            IntLiteral | LongLiteral => TokenCategory::IntegerLiteral,
            FloatLiteral | DoubleLiteral => TokenCategory::FloatLiteral,
            CharLiteral => TokenCategory::CharLiteral,
            StringLiteral => TokenCategory::StringLiteral,
            BooleanLiteral => TokenCategory::BooleanLiteral,
            NullLiteral => TokenCategory::NullLiteral,
            LeftParen | RightParen | LeftBrace | RightBrace | LeftBracket | RightBracket
            | Semicolon | Comma | Dot | Ellipsis | At | ColonColon => TokenCategory::Punctuation,
            Comment(_) => TokenCategory::Comment,
            Eof => TokenCategory::Eof,
            Error => TokenCategory::Error,
            _ if operators::spelling(*self).is_some() => TokenCategory::Operator,
            _ => TokenCategory::Keyword,
        }
    }

    /// Returns true if this token is a keyword.
    pub fn is_keyword(&self) -> bool {
        self.category() == TokenCategory::Keyword
    }

    /// Returns true if this token is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self.category(),
            TokenCategory::IntegerLiteral
                | TokenCategory::FloatLiteral
                | TokenCategory::StringLiteral
                | TokenCategory::CharLiteral
                | TokenCategory::BooleanLiteral
                | TokenCategory::NullLiteral
        )
    }

    /// Returns true for operators and separators.
    pub fn is_operator(&self) -> bool {
        matches!(
            self.category(),
            TokenCategory::Operator | TokenCategory::Punctuation
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier => f.write_str("<identifier>"),
            TokenKind::IntLiteral => f.write_str("<int literal>"),
            TokenKind::LongLiteral => f.write_str("<long literal>"),
            TokenKind::FloatLiteral => f.write_str("<float literal>"),
            TokenKind::DoubleLiteral => f.write_str("<double literal>"),
            TokenKind::CharLiteral => f.write_str("<character>"),
            TokenKind::StringLiteral => f.write_str("<string>"),
            TokenKind::Comment(_) => f.write_str("<comment>"),
            TokenKind::Eof => f.write_str("<end of input>"),
            TokenKind::Error => f.write_str("<bad symbol>"),
            other => match other.fixed_text() {
                Some(text) => write!(f, "'{}'", text),
                None => write!(f, "{:?}", other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(offset: usize) -> Position {
        Position::new(offset, 1, offset as u32 + 1)
    }

    #[test]
    fn test_span_len() {
        let span = Span::new(5, 15);
        assert_eq!(span.len(), 10);
        assert!(Span::new(5, 5).is_empty());
        assert!(!span.is_empty());
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(12, 3, 7).to_string(), "3:7");
    }

    #[test]
    fn test_eof_is_zero_length() {
        let token = Token::eof(at(4));
        assert!(token.is_eof());
        assert!(token.span.is_empty());
        assert_eq!(token.span.start, 4);
        assert_eq!(token.text, "");
    }

    #[test]
    fn test_with_value() {
        let token = Token::new(TokenKind::IntLiteral, "42", Span::new(0, 2), at(0))
            .with_value(LiteralValue::Int(42));
        assert_eq!(token.value, Some(LiteralValue::Int(42)));
        assert!(token.error.is_none());
    }

    #[test]
    fn test_categories() {
        assert_eq!(TokenKind::Identifier.category(), TokenCategory::Identifier);
        assert_eq!(TokenKind::Class.category(), TokenCategory::Keyword);
        assert_eq!(TokenKind::Underscore.category(), TokenCategory::Keyword);
        assert_eq!(TokenKind::LongLiteral.category(), TokenCategory::IntegerLiteral);
        assert_eq!(TokenKind::FloatLiteral.category(), TokenCategory::FloatLiteral);
        assert_eq!(TokenKind::DoubleLiteral.category(), TokenCategory::FloatLiteral);
        assert_eq!(TokenKind::Semicolon.category(), TokenCategory::Punctuation);
        assert_eq!(TokenKind::ColonColon.category(), TokenCategory::Punctuation);
        assert_eq!(TokenKind::UnsignedRightShiftAssign.category(), TokenCategory::Operator);
        assert_eq!(TokenKind::Comment(CommentStyle::Line).category(), TokenCategory::Comment);
        assert_eq!(TokenKind::Eof.category(), TokenCategory::Eof);
        assert_eq!(TokenKind::Error.category(), TokenCategory::Error);
    }

    #[test]
    fn test_is_keyword_and_literal() {
        assert!(TokenKind::While.is_keyword());
        assert!(TokenKind::Goto.is_keyword());
        assert!(!TokenKind::BooleanLiteral.is_keyword());
        assert!(TokenKind::BooleanLiteral.is_literal());
        assert!(TokenKind::NullLiteral.is_literal());
        assert!(!TokenKind::Identifier.is_literal());
        assert!(!TokenKind::Plus.is_literal());
        assert!(TokenKind::Plus.is_operator());
        assert!(!TokenKind::Eof.is_operator());
    }

    #[test]
    fn test_fixed_text() {
        assert_eq!(TokenKind::Instanceof.fixed_text(), Some("instanceof"));
        assert_eq!(TokenKind::Arrow.fixed_text(), Some("->"));
        assert_eq!(TokenKind::Identifier.fixed_text(), None);
        assert_eq!(TokenKind::StringLiteral.fixed_text(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::Identifier.to_string(), "<identifier>");
        assert_eq!(TokenKind::Class.to_string(), "'class'");
        assert_eq!(TokenKind::GreaterThanEqual.to_string(), "'>='");
        assert_eq!(TokenKind::Eof.to_string(), "<end of input>");
    }

    #[test]
    fn test_split_right_shift() {
        let token = Token::new(TokenKind::RightShift, ">>", Span::new(10, 12), Position::new(10, 2, 5));
        let (first, rest) = token.split().unwrap();
        assert_eq!(first.kind, TokenKind::GreaterThan);
        assert_eq!(first.span, Span::new(10, 11));
        assert_eq!(rest.kind, TokenKind::GreaterThan);
        assert_eq!(rest.span, Span::new(11, 12));
        assert_eq!((rest.line, rest.column), (2, 6));
    }

    #[test]
    fn test_split_shift_assign() {
        let token = Token::new(TokenKind::RightShiftAssign, ">>=", Span::new(0, 3), at(0));
        let (first, rest) = token.split().unwrap();
        assert_eq!(first.kind, TokenKind::GreaterThan);
        assert_eq!(rest.kind, TokenKind::GreaterThanEqual);
        assert_eq!(rest.text, ">=");
    }

    #[test]
    fn test_split_rejects_single_char_and_keywords() {
        let gt = Token::new(TokenKind::GreaterThan, ">", Span::new(0, 1), at(0));
        assert!(gt.split().is_none());
        let kw = Token::new(TokenKind::If, "if", Span::new(0, 2), at(0));
        assert!(kw.split().is_none());
        // "->" splits into "-" and ">"
        let arrow = Token::new(TokenKind::Arrow, "->", Span::new(0, 2), at(0));
        assert!(arrow.split().is_some());
    }

    #[test]
    fn test_is_deprecated() {
        let doc = Token::new(
            TokenKind::Comment(CommentStyle::Javadoc),
            "/** @deprecated use bar */",
            Span::new(0, 26),
            at(0),
        );
        assert!(doc.is_deprecated());
        let block = Token::new(
            TokenKind::Comment(CommentStyle::Block),
            "/* @deprecated */",
            Span::new(0, 17),
            at(0),
        );
        assert!(!block.is_deprecated());
    }
}
