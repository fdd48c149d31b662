//! Buffered token stream with bounded lookahead.
//!
//! Parsers usually want to look at the current token, peek a few ahead and
//! occasionally split `>>` while closing nested type arguments. The stream
//! keeps that bookkeeping out of the scanner.

use std::collections::VecDeque;

use crate::lexer::{Position, Scanner, Token};

/// A cursor over the tokens of one scanner.
#[derive(Debug)]
pub struct TokenStream {
    scanner: Scanner,
    current: Token,
    previous: Option<Token>,
    lookahead: VecDeque<Token>,
}

impl TokenStream {
    /// Wraps `scanner` and reads the first token.
    pub fn new(mut scanner: Scanner) -> Self {
        let current = scanner.next_token();
        Self {
            scanner,
            current,
            previous: None,
            lookahead: VecDeque::new(),
        }
    }

    /// The current token.
    pub fn token(&self) -> &Token {
        &self.current
    }

    /// The token `n` places after the current one; `peek_token(0)` is the
    /// current token. Past the end this is the EOF sentinel.
    ///
    /// Buffering stops at the sentinel, so the lookahead never holds more
    /// than the tokens left in the unit.
    pub fn peek_token(&mut self, n: usize) -> &Token {
        while self.lookahead.len() < n {
            let at_end = self.lookahead.back().unwrap_or(&self.current).is_eof();
            if at_end {
                break;
            }
            let token = self.scanner.next_token();
            self.lookahead.push_back(token);
        }
        match n {
            0 => &self.current,
            _ => self
                .lookahead
                .get(n - 1)
                .or(self.lookahead.back())
                .unwrap_or(&self.current),
        }
    }

    /// Advances to the next token and returns it.
    pub fn next_token(&mut self) -> &Token {
        let next = match self.lookahead.pop_front() {
            Some(token) => token,
            None => self.scanner.next_token(),
        };
        let old = std::mem::replace(&mut self.current, next);
        self.previous = Some(old);
        &self.current
    }

    /// The token before the current one.
    pub fn prev_token(&self) -> Option<&Token> {
        self.previous.as_ref()
    }

    /// Splits the current compound operator and makes its tail current.
    ///
    /// Returns the head, which becomes the previous token. Does nothing and
    /// returns `None` if the current token cannot be split.
    pub fn split(&mut self) -> Option<Token> {
        let (head, tail) = self.current.split()?;
        self.current = tail;
        self.previous = Some(head.clone());
        Some(head)
    }

    /// Position of the most recent lexical error.
    pub fn err_pos(&self) -> Option<Position> {
        self.scanner.err_pos()
    }

    /// The underlying scanner.
    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    fn stream(src: &str) -> TokenStream {
        TokenStream::new(Scanner::new(src))
    }

    #[test]
    fn test_token_and_next() {
        let mut s = stream("a b");
        assert_eq!(s.token().text, "a");
        assert!(s.prev_token().is_none());
        assert_eq!(s.next_token().text, "b");
        assert_eq!(s.prev_token().map(|t| t.text.as_str()), Some("a"));
        assert!(s.next_token().is_eof());
        assert!(s.next_token().is_eof());
    }

    #[test]
    fn test_peek_does_not_advance() {
        let mut s = stream("a b c");
        assert_eq!(s.peek_token(2).text, "c");
        assert_eq!(s.peek_token(1).text, "b");
        assert_eq!(s.peek_token(0).text, "a");
        assert!(s.peek_token(5).is_eof());
        assert_eq!(s.next_token().text, "b");
        assert_eq!(s.next_token().text, "c");
        assert!(s.next_token().is_eof());
    }

    #[test]
    fn test_lookahead_stops_at_eof() {
        let mut s = stream("a b");
        assert!(s.peek_token(1_000_000).is_eof());
        // `b` and the sentinel, nothing more
        assert_eq!(s.lookahead.len(), 2);
        assert_eq!(s.peek_token(1).text, "b");
        assert!(s.peek_token(usize::MAX).is_eof());
        assert_eq!(s.lookahead.len(), 2);

        let mut empty = stream("");
        assert!(empty.peek_token(3).is_eof());
        assert!(empty.lookahead.is_empty());
    }

    #[test]
    fn test_split_nested_generics() {
        let mut s = stream("List<List<String>> x");
        for _ in 0..5 {
            s.next_token();
        }
        assert_eq!(s.token().kind, TokenKind::RightShift);
        let head = s.split().unwrap();
        assert_eq!(head.kind, TokenKind::GreaterThan);
        assert_eq!(s.token().kind, TokenKind::GreaterThan);
        assert_eq!(s.token().span.start, 17);
        assert_eq!(s.next_token().text, "x");
    }

    #[test]
    fn test_split_unsplittable() {
        let mut s = stream("x");
        assert!(s.split().is_none());
        assert_eq!(s.token().text, "x");
    }

    #[test]
    fn test_err_pos() {
        let mut s = stream("a # b");
        assert!(s.err_pos().is_none());
        s.next_token();
        assert_eq!(s.err_pos().map(|p| p.column), Some(3));
    }
}
