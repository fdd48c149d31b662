//! Character cursor over the normalized buffer.
//!
//! The cursor walks translated characters but keeps line and column in raw
//! source coordinates. A character produced by a unicode escape advances the
//! column by the width of its escape text and never starts a new line, which
//! matches how the raw text is laid out.

use super::token::Position;

/// Everything needed to rewind the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CursorState {
    pub index: usize,
    pub line: u32,
    pub column: u32,
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            index: 0,
            line: 1,
            column: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Cursor {
    chars: Vec<char>,
    raw_offsets: Vec<usize>,
    state: CursorState,
    mark: Option<CursorState>,
}

impl Cursor {
    /// `raw_offsets` holds one entry per character plus the end offset.
    pub fn new(chars: Vec<char>, raw_offsets: Vec<usize>) -> Self {
        debug_assert_eq!(raw_offsets.len(), chars.len() + 1);
        Self {
            chars,
            raw_offsets,
            state: CursorState::default(),
            mark: None,
        }
    }

    pub fn index(&self) -> usize {
        self.state.index
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// The character under the cursor.
    pub fn current(&self) -> Option<char> {
        self.peek(0)
    }

    /// The character `n` places ahead of the cursor.
    pub fn peek(&self, n: usize) -> Option<char> {
        self.chars.get(self.state.index + n).copied()
    }

    /// Raw byte offset of the character at `index` (or the end of input).
    pub fn raw_offset_of(&self, index: usize) -> usize {
        let last = self.raw_offsets.len() - 1;
        self.raw_offsets[index.min(last)]
    }

    pub fn raw_offset(&self) -> usize {
        self.raw_offset_of(self.state.index)
    }

    /// Position of the character under the cursor.
    pub fn position(&self) -> Position {
        Position::new(self.raw_offset(), self.state.line, self.state.column)
    }

    /// Returns true if the character at `index` came from a unicode escape.
    pub fn is_escaped(&self, index: usize) -> bool {
        match self.chars.get(index) {
            Some(ch) => self.raw_width(index) != ch.len_utf8(),
            None => false,
        }
    }

    fn raw_width(&self, index: usize) -> usize {
        self.raw_offset_of(index + 1) - self.raw_offset_of(index)
    }

    /// Consumes one character.
    pub fn advance(&mut self) -> Option<char> {
        let index = self.state.index;
        let ch = *self.chars.get(index)?;

        if self.is_escaped(index) {
            // escape text is ASCII, so its byte width is its column width
            self.state.column += self.raw_width(index) as u32;
        } else if ch == '\n' {
            self.new_line();
        } else if ch == '\r' {
            let crlf = self.chars.get(index + 1) == Some(&'\n') && !self.is_escaped(index + 1);
            if crlf {
                self.state.column += 1;
            } else {
                self.new_line();
            }
        } else {
            self.state.column += 1;
        }

        self.state.index += 1;
        Some(ch)
    }

    fn new_line(&mut self) {
        self.state.line += 1;
        self.state.column = 1;
    }

    /// Consumes `expected` if it is next.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes characters while `pred` holds; returns how many.
    pub fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(ch) = self.current() {
            if !pred(ch) {
                break;
            }
            self.advance();
            count += 1;
        }
        count
    }

    pub fn mark(&mut self) {
        self.mark = Some(self.state);
    }

    /// Rewinds to the last mark. Does nothing without one.
    pub fn reset_to_mark(&mut self) {
        if let Some(state) = self.mark.take() {
            self.state = state;
        }
    }

    /// Normalized text between two character indices.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }
}
