//! The scanner that produces tokens from Java source text.

use std::sync::Arc;

use super::cursor::{Cursor, CursorState};
use super::keywords::KeywordTable;
use super::literals;
use super::names::NameTable;
use super::operators;
use super::token::{CommentStyle, LiteralValue, Position, Span, Token, TokenKind};
use super::unicode::{self, PendingEscape};
use crate::error::{LexicalError, LexicalErrorKind};
use crate::factory::{ScannedUnit, ScannerOptions};
use crate::source::{LineMap, SourceUnit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Ready,
    Scanning,
    Exhausted,
}

/// What one pass of the classifier consumed.
enum Lexeme {
    Token(TokenKind, Option<LiteralValue>),
    /// Identifier or reserved word, classified once its text is known
    Word,
    /// Skipped comment
    Trivia,
    /// One or more errors, in source order
    Error(Vec<LexicalError>),
}

impl Lexeme {
    fn error(error: LexicalError) -> Self {
        Lexeme::Error(vec![error])
    }
}

/// A scanner that tokenizes one Java compilation unit.
///
/// Tokens are produced on demand. After the end of input every call to
/// [`next_token`](Scanner::next_token) returns the same EOF sentinel.
#[derive(Debug)]
pub struct Scanner {
    unit: SourceUnit,
    cursor: Cursor,
    keywords: Arc<KeywordTable>,
    names: NameTable,
    options: ScannerOptions,
    pending: Vec<PendingEscape>,
    next_pending: usize,
    state: ScanState,
    errors: Vec<LexicalError>,
}

impl Scanner {
    /// Creates a scanner over `source` with default options.
    pub fn new(source: &str) -> Self {
        Self::with_parts(
            SourceUnit::new("<input>", source),
            Arc::new(KeywordTable::new()),
            ScannerOptions::default(),
        )
    }

    /// Creates a scanner bound to `unit`, sharing a keyword table.
    pub fn with_parts(unit: SourceUnit, keywords: Arc<KeywordTable>, options: ScannerOptions) -> Self {
        let normalized = unicode::normalize(&unit);
        tracing::debug!(
            unit = unit.name(),
            chars = normalized.chars.len(),
            keep_comments = options.keep_comments,
            "created scanner"
        );
        Self {
            cursor: Cursor::new(normalized.chars, normalized.raw_offsets),
            pending: normalized.errors,
            next_pending: 0,
            unit,
            keywords,
            names: NameTable::new(),
            options,
            state: ScanState::Ready,
            errors: Vec::new(),
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        if self.state == ScanState::Exhausted {
            return self.eof();
        }

        self.state = ScanState::Scanning;
        let token = self.scan_token();
        if token.is_eof() {
            self.state = ScanState::Exhausted;
        } else if self.state == ScanState::Scanning {
            self.state = ScanState::Ready;
        }

        tracing::trace!(
            kind = ?token.kind,
            text = %token.text,
            line = token.line,
            column = token.column,
            "token"
        );
        token
    }

    /// Every lexical error reported so far, in source order.
    pub fn errors(&self) -> &[LexicalError] {
        &self.errors
    }

    /// Position of the most recent lexical error.
    pub fn err_pos(&self) -> Option<Position> {
        self.errors.last().map(|error| error.position)
    }

    /// The unit being scanned.
    pub fn source(&self) -> &SourceUnit {
        &self.unit
    }

    /// Line map of the unit being scanned.
    pub fn line_map(&self) -> &LineMap {
        self.unit.lines()
    }

    /// The keyword table shared with the factory.
    pub fn keywords(&self) -> &Arc<KeywordTable> {
        &self.keywords
    }

    /// Names of every identifier scanned so far.
    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Options this scanner was created with.
    pub fn options(&self) -> ScannerOptions {
        self.options
    }

    /// Returns true once the sentinel has been produced.
    pub fn is_exhausted(&self) -> bool {
        self.state == ScanState::Exhausted
    }

    /// Scans to the end of input, sentinel included.
    pub fn scan_all(mut self) -> ScannedUnit {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                break;
            }
        }
        ScannedUnit {
            source: self.unit,
            tokens,
            errors: self.errors,
            names: self.names,
        }
    }

    /// Gives the unit back.
    pub fn into_source(self) -> SourceUnit {
        self.unit
    }

    fn eof(&self) -> Token {
        Token::eof(self.unit.position(self.unit.text().len()))
    }

    fn scan_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            let start = self.cursor.state();
            let start_pos = self.cursor.position();

            if self.pending_at(start.index) {
                self.skip_invalid_escape();
                if let Some(token) = self.finish(Lexeme::Trivia, start, start_pos) {
                    return token;
                }
                continue;
            }

            let Some(ch) = self.cursor.current() else {
                return Token::eof(start_pos);
            };

            let lexeme = match ch {
                '/' if matches!(self.cursor.peek(1), Some('/' | '*')) => {
                    match self.scan_comment() {
                        Ok(style) if self.options.keep_comments => {
                            Lexeme::Token(TokenKind::Comment(style), None)
                        }
                        Ok(_) => Lexeme::Trivia,
                        Err(kind) => Lexeme::error(LexicalError::new(kind, start_pos)),
                    }
                }
                '"' => match literals::scan_string(&mut self.cursor) {
                    Ok(value) => Lexeme::Token(TokenKind::StringLiteral, Some(LiteralValue::String(value))),
                    Err(errors) => Lexeme::Error(errors),
                },
                '\'' => match literals::scan_char(&mut self.cursor) {
                    Ok(value) => Lexeme::Token(TokenKind::CharLiteral, Some(LiteralValue::Char(value))),
                    Err(error) => Lexeme::error(error),
                },
                '0'..='9' => self.scan_number(start_pos),
                '.' if self.cursor.peek(1).is_some_and(|next| next.is_ascii_digit()) => {
                    self.scan_number(start_pos)
                }
                _ if is_identifier_start(ch) => {
                    self.cursor.eat_while(is_identifier_part);
                    Lexeme::Word
                }
                _ => match operators::scan_operator(&mut self.cursor) {
                    Some(kind) => Lexeme::Token(kind, None),
                    None => {
                        self.cursor.advance();
                        Lexeme::error(LexicalError::new(
                            LexicalErrorKind::UnexpectedCharacter(ch),
                            start_pos,
                        ))
                    }
                },
            };

            if let Some(token) = self.finish(lexeme, start, start_pos) {
                return token;
            }
        }
    }

    /// Turns a consumed lexeme into a token, folding in escape errors that
    /// fall inside it. Returns `None` for skipped trivia.
    fn finish(&mut self, lexeme: Lexeme, start: CursorState, start_pos: Position) -> Option<Token> {
        let end = self.cursor.index();
        let span = Span::new(start_pos.offset, self.cursor.raw_offset());

        let mut errors = self.take_pending(end);
        if let Lexeme::Error(found) = &lexeme {
            errors.extend(found.iter().cloned());
        }

        if errors.is_empty() {
            let text = match lexeme {
                Lexeme::Trivia => return None,
                _ => self.cursor.slice(start.index, end),
            };
            let (kind, value) = match lexeme {
                Lexeme::Token(kind, value) => (kind, value),
                _ => self.keywords.classify(&text),
            };
            let name = (kind == TokenKind::Identifier).then(|| self.names.intern(&text));
            let mut token = Token::new(kind, text, span, start_pos);
            token.value = value;
            token.name = name;
            return Some(token);
        }

        errors.sort_by_key(|error| error.position.offset);
        for error in &errors {
            tracing::debug!(unit = self.unit.name(), %error, "lexical error");
        }
        if errors.iter().any(|error| !error.is_recoverable()) {
            self.state = ScanState::Exhausted;
        }
        self.errors.extend(errors.iter().cloned());

        let first = errors.swap_remove(0);
        let text = self.cursor.slice(start.index, end);
        Some(Token::from_error(first, text, span, start_pos))
    }

    fn pending_at(&self, index: usize) -> bool {
        self.pending
            .get(self.next_pending)
            .is_some_and(|pending| pending.index == index)
    }

    /// Removes the escape errors that lie before `end`.
    fn take_pending(&mut self, end: usize) -> Vec<LexicalError> {
        let mut taken = Vec::new();
        while let Some(pending) = self.pending.get(self.next_pending) {
            if pending.index >= end {
                break;
            }
            taken.push(pending.error.clone());
            self.next_pending += 1;
        }
        taken
    }

    /// Consumes a malformed `\u` run: the backslash, its `u`s and whatever
    /// hex digits follow (at most four).
    fn skip_invalid_escape(&mut self) {
        self.cursor.advance();
        self.cursor.eat_while(|ch| ch == 'u');
        for _ in 0..4 {
            if !self.cursor.current().is_some_and(|ch| ch.is_ascii_hexdigit()) {
                break;
            }
            self.cursor.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.cursor.current() {
            match ch {
                ' ' | '\t' | '\u{c}' | '\r' | '\n' => {}
                // Ctrl-Z is tolerated as the final character
                '\u{1a}' if self.cursor.peek(1).is_none() => {}
                _ => break,
            }
            self.cursor.advance();
        }
    }

    /// Scans a comment; the cursor is on the leading `/`.
    fn scan_comment(&mut self) -> Result<CommentStyle, LexicalErrorKind> {
        self.cursor.advance();
        if self.cursor.eat('/') {
            self.cursor.eat_while(|ch| !is_line_terminator(ch));
            return Ok(CommentStyle::Line);
        }

        self.cursor.advance();
        let style = if self.cursor.current() == Some('*') && self.cursor.peek(1) != Some('/') {
            CommentStyle::Javadoc
        } else {
            CommentStyle::Block
        };

        loop {
            match self.cursor.advance() {
                None => return Err(LexicalErrorKind::UnterminatedComment),
                Some('*') if self.cursor.eat('/') => return Ok(style),
                Some(_) => {}
            }
        }
    }

    fn scan_number(&mut self, start_pos: Position) -> Lexeme {
        match literals::scan_number(&mut self.cursor) {
            Ok((kind, value)) => Lexeme::Token(kind, Some(value)),
            Err(kind) => {
                literals::skip_number_tail(&mut self.cursor);
                Lexeme::error(LexicalError::new(kind, start_pos))
            }
        }
    }
}

impl Iterator for Scanner {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.is_eof() { None } else { Some(token) }
    }
}

/// Checks if a character can start a Java identifier.
pub fn is_identifier_start(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphabetic() || ch == '_' || ch == '$';
    }
    unicode_xid::UnicodeXID::is_xid_start(ch) || is_currency_symbol(ch) || is_connector_punctuation(ch)
}

/// Checks if a character can continue a Java identifier.
pub fn is_identifier_part(ch: char) -> bool {
    if ch.is_ascii() {
        return ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' || is_identifier_ignorable(ch);
    }
    unicode_xid::UnicodeXID::is_xid_continue(ch)
        || is_currency_symbol(ch)
        || is_connector_punctuation(ch)
        || is_identifier_ignorable(ch)
}

/// Control characters Java allows (and ignores) inside identifiers.
fn is_identifier_ignorable(ch: char) -> bool {
    matches!(ch, '\u{0}'..='\u{8}' | '\u{e}'..='\u{1b}' | '\u{7f}'..='\u{9f}') && ch != '\u{1a}'
}

/// `\n` or `\r`; `\r\n` is handled by the cursor.
pub fn is_line_terminator(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

/// Unicode category Sc.
fn is_currency_symbol(ch: char) -> bool {
    matches!(
        ch,
        '$' | '\u{a2}'..='\u{a5}'
            | '\u{58f}'
            | '\u{60b}'
            | '\u{7fe}'..='\u{7ff}'
            | '\u{9f2}'..='\u{9f3}'
            | '\u{9fb}'
            | '\u{af1}'
            | '\u{bf9}'
            | '\u{e3f}'
            | '\u{17db}'
            | '\u{20a0}'..='\u{20c0}'
            | '\u{a838}'
            | '\u{fdfc}'
            | '\u{fe69}'
            | '\u{ff04}'
            | '\u{ffe0}'..='\u{ffe1}'
            | '\u{ffe5}'..='\u{ffe6}'
            | '\u{11fdd}'..='\u{11fe0}'
            | '\u{1e2ff}'
            | '\u{1ecb0}'
    )
}

/// Unicode category Pc.
fn is_connector_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '_' | '\u{203f}'..='\u{2040}' | '\u{2054}' | '\u{fe33}'..='\u{fe34}' | '\u{fe4d}'..='\u{fe4f}' | '\u{ff3f}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Scanner::new(src).map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let mut scanner = Scanner::new("{ } ( )");
        assert!(matches!(scanner.next_token().kind, TokenKind::LeftBrace));
        assert!(matches!(scanner.next_token().kind, TokenKind::RightBrace));
        assert!(matches!(scanner.next_token().kind, TokenKind::LeftParen));
        assert!(matches!(scanner.next_token().kind, TokenKind::RightParen));
        assert!(matches!(scanner.next_token().kind, TokenKind::Eof));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("class classified public static void"),
            vec![
                TokenKind::Class,
                TokenKind::Identifier,
                TokenKind::Public,
                TokenKind::Static,
                TokenKind::Void
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        let mut scanner = Scanner::new("foo _bar $baz café µs x2");
        for expected in ["foo", "_bar", "$baz", "café", "µs", "x2"] {
            let token = scanner.next_token();
            assert_eq!(token.kind, TokenKind::Identifier);
            assert_eq!(token.text, expected);
        }
        assert!(scanner.next_token().is_eof());
    }

    #[test]
    fn test_underscore_is_reserved() {
        assert_eq!(kinds("_"), vec![TokenKind::Underscore]);
        assert_eq!(kinds("__"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn test_literal_words() {
        let mut scanner = Scanner::new("true null");
        let t = scanner.next_token();
        assert_eq!(t.kind, TokenKind::BooleanLiteral);
        assert_eq!(t.value, Some(LiteralValue::Bool(true)));
        let n = scanner.next_token();
        assert_eq!(n.kind, TokenKind::NullLiteral);
        assert_eq!(n.value, Some(LiteralValue::Null));
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a // line\n/* block */ b /** doc */ c"),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Identifier]
        );
    }

    #[test]
    fn test_comments_kept() {
        let options = ScannerOptions::default().keep_comments(true);
        let unit = SourceUnit::new("Test.java", "// a\n/* b */ /** c */ /**/");
        let scanner = Scanner::with_parts(unit, Arc::new(KeywordTable::new()), options);
        let tokens: Vec<Token> = scanner.collect();
        let styles: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            styles,
            vec![
                TokenKind::Comment(CommentStyle::Line),
                TokenKind::Comment(CommentStyle::Block),
                TokenKind::Comment(CommentStyle::Javadoc),
                TokenKind::Comment(CommentStyle::Block),
            ]
        );
        assert_eq!(tokens[0].text, "// a");
        assert_eq!(tokens[2].text, "/** c */");
    }

    #[test]
    fn test_division_vs_comment() {
        assert_eq!(
            kinds("a / b /= c"),
            vec![
                TokenKind::Identifier,
                TokenKind::Slash,
                TokenKind::Identifier,
                TokenKind::SlashAssign,
                TokenKind::Identifier
            ]
        );
    }

    #[test]
    fn test_unterminated_comment_is_fatal() {
        let mut scanner = Scanner::new("a /* never closed");
        scanner.next_token();
        let token = scanner.next_token();
        assert_eq!(token.kind, TokenKind::Error);
        assert_eq!(token.error.unwrap().kind, LexicalErrorKind::UnterminatedComment);
        assert_eq!(token.span.end, 17);
        assert!(scanner.is_exhausted());
        assert!(scanner.next_token().is_eof());
    }

    #[test]
    fn test_sentinel_is_idempotent() {
        let mut scanner = Scanner::new("x  ");
        scanner.next_token();
        let first = scanner.next_token();
        let second = scanner.next_token();
        assert!(first.is_eof());
        assert_eq!(first, second);
        assert_eq!(first.span, Span::new(3, 3));
    }

    #[test]
    fn test_empty_input() {
        let mut scanner = Scanner::new("");
        let token = scanner.next_token();
        assert!(token.is_eof());
        assert_eq!((token.line, token.column), (1, 1));
    }

    #[test]
    fn test_positions() {
        let mut scanner = Scanner::new("a\nbb");
        let a = scanner.next_token();
        assert_eq!((a.line, a.column), (1, 1));
        let bb = scanner.next_token();
        assert_eq!(bb.text, "bb");
        assert_eq!((bb.line, bb.column), (2, 1));
        assert_eq!(bb.span, Span::new(2, 4));
    }

    #[test]
    fn test_crlf_counts_once() {
        let mut scanner = Scanner::new("a\r\n\r\nb");
        scanner.next_token();
        let b = scanner.next_token();
        assert_eq!((b.line, b.column), (3, 1));
    }

    #[test]
    fn test_unexpected_character_recovers() {
        let mut scanner = Scanner::new("a # b");
        scanner.next_token();
        let bad = scanner.next_token();
        assert_eq!(bad.kind, TokenKind::Error);
        assert_eq!(bad.text, "#");
        assert_eq!(
            bad.error.as_ref().map(|e| e.kind),
            Some(LexicalErrorKind::UnexpectedCharacter('#'))
        );
        assert_eq!(scanner.next_token().text, "b");
        assert_eq!(scanner.errors().len(), 1);
        assert_eq!(scanner.err_pos(), Some(Position::new(2, 1, 3)));
    }

    #[test]
    fn test_escaped_identifier() {
        // an escaped 'A' inside an identifier
        let mut scanner = Scanner::new("x\\u0041y = 1;");
        let token = scanner.next_token();
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.text, "xAy");
        assert_eq!(token.span, Span::new(0, 8));
        let assign = scanner.next_token();
        assert_eq!(assign.column, 10);
    }

    #[test]
    fn test_equal_identifiers_share_a_name() {
        let unit = Scanner::new("int count = count + other; x\\u0041 = xA;").scan_all();
        let named: Vec<_> = unit
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Identifier)
            .map(|t| (t.text.as_str(), t.name.unwrap()))
            .collect();
        assert_eq!(named.len(), 5);
        assert_eq!(named[0].1, named[1].1);
        assert_ne!(named[0].1, named[2].1);
        // the escaped spelling interns as its translation
        assert_eq!(named[3].1, named[4].1);
        assert_eq!(unit.names.len(), 3);
        assert_eq!(unit.names.resolve(named[3].1), Some("xA"));

        let keyword = &unit.tokens[0];
        assert_eq!(keyword.kind, TokenKind::Int);
        assert!(keyword.name.is_none());
    }

    #[test]
    fn test_escaped_keyword() {
        let mut scanner = Scanner::new("\\u0063lass");
        assert_eq!(scanner.next_token().kind, TokenKind::Class);
    }

    #[test]
    fn test_escapes_inside_strings() {
        let mut scanner = Scanner::new(r#""\u0041" "\\u0041""#);
        let first = scanner.next_token();
        assert_eq!(first.value, Some(LiteralValue::String("A".into())));
        let second = scanner.next_token();
        assert_eq!(second.value, Some(LiteralValue::String("\\u0041".into())));
    }

    #[test]
    fn test_invalid_unicode_escape_recovers() {
        let mut scanner = Scanner::new("a \\u12G4 b");
        assert_eq!(scanner.next_token().text, "a");
        let bad = scanner.next_token();
        assert_eq!(bad.kind, TokenKind::Error);
        assert_eq!(bad.text, "\\u12");
        assert_eq!(
            bad.error.map(|e| e.kind),
            Some(LexicalErrorKind::InvalidUnicodeEscape)
        );
        // the rest of the run scans normally
        assert_eq!(scanner.next_token().text, "G4");
        assert_eq!(scanner.next_token().text, "b");
    }

    #[test]
    fn test_invalid_escape_inside_string() {
        let mut scanner = Scanner::new("\"a\\uZZ\" ;");
        let bad = scanner.next_token();
        assert_eq!(bad.kind, TokenKind::Error);
        assert_eq!(bad.error.map(|e| e.kind), Some(LexicalErrorKind::InvalidUnicodeEscape));
        // the string's own illegal escape is still recorded
        assert_eq!(scanner.errors().len(), 2);
        assert_eq!(scanner.next_token().kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_trailing_ctrl_z() {
        assert_eq!(kinds("a\u{1a}"), vec![TokenKind::Identifier]);
        let mut scanner = Scanner::new("\u{1a}a");
        assert_eq!(scanner.next_token().kind, TokenKind::Error);
    }

    #[test]
    fn test_scan_all() {
        let unit = Scanner::new("int x = 1;").scan_all();
        assert_eq!(unit.tokens.len(), 6);
        assert!(unit.tokens.last().unwrap().is_eof());
        assert!(!unit.has_errors());
    }

    #[test]
    fn test_char_classes() {
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('€'));
        assert!(is_identifier_start('ñ'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_part('1'));
        assert!(is_identifier_part('\u{0}'));
        assert!(!is_identifier_part('\u{1a}'));
        assert!(!is_identifier_part('-'));
        assert!(is_line_terminator('\r'));
    }
}
