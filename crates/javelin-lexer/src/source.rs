//! Source units and line maps.
//!
//! A [`SourceUnit`] is one compilation unit's text plus the name it was read
//! from. Positions are reported against the raw text, so diagnostics point at
//! what the user actually wrote even when unicode escapes were involved.

use std::path::Path;

use crate::error::{Error, Result};
use crate::lexer::Position;

/// Maps raw byte offsets to 1-based lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMap {
    line_starts: Vec<usize>,
}

impl LineMap {
    /// Builds the map; `\n`, `\r` and `\r\n` each end one line.
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i + 1),
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push(i + 1);
                }
                _ => {}
            }
            i += 1;
        }
        Self { line_starts }
    }

    /// Number of lines (an empty text has one).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the 1-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> u32 {
        let index = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index - 1,
        };
        index as u32 + 1
    }

    /// Returns the byte offset where `line` starts.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        let index = (line as usize).checked_sub(1)?;
        self.line_starts.get(index).copied()
    }
}

/// One compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    name: String,
    text: String,
    lines: LineMap,
}

impl SourceUnit {
    /// Creates a unit from text already in memory.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = LineMap::new(&text);
        Self {
            name: name.into(),
            text,
            lines,
        }
    }

    /// Reads a unit from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), text))
    }

    /// Reads a unit from disk without blocking the runtime.
    #[cfg(feature = "async")]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "loaded source unit");
        Ok(Self::new(path.display().to_string(), text))
    }

    /// Reads several units concurrently, preserving order.
    #[cfg(feature = "async")]
    pub async fn load_all<P: AsRef<Path>>(paths: &[P]) -> Vec<Result<Self>> {
        futures::future::join_all(paths.iter().map(|path| Self::load(path))).await
    }

    /// The name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The line map over the raw text.
    pub fn lines(&self) -> &LineMap {
        &self.lines
    }

    /// Converts a raw byte offset into a position.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self.lines.line_of(offset);
        let start = self.lines.line_start(line).unwrap_or(0);
        let column = self.text[start..offset].chars().count() as u32 + 1;
        Position::new(offset, line, column)
    }

    /// Returns the text of a 1-based line without its terminator.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let start = self.lines.line_start(line)?;
        let end = self
            .lines
            .line_start(line + 1)
            .unwrap_or(self.text.len());
        Some(self.text[start..end].trim_end_matches(['\n', '\r']))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_map_terminators() {
        let map = LineMap::new("a\nb\r\nc\rd");
        assert_eq!(map.line_count(), 4);
        assert_eq!(map.line_of(0), 1);
        assert_eq!(map.line_of(2), 2);
        assert_eq!(map.line_of(5), 3);
        assert_eq!(map.line_of(7), 4);
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let map = LineMap::new("");
        assert_eq!(map.line_count(), 1);
        assert_eq!(map.line_of(0), 1);
    }

    #[test]
    fn test_position_counts_characters() {
        let unit = SourceUnit::new("Test.java", "int é = 1;\nx");
        // 'é' is two bytes but one column
        assert_eq!(unit.position(7), Position::new(7, 1, 7));
        assert_eq!(unit.position(12), Position::new(12, 2, 1));
    }

    #[test]
    fn test_position_at_end() {
        let unit = SourceUnit::new("Test.java", "ab\n");
        assert_eq!(unit.position(3), Position::new(3, 2, 1));
        assert_eq!(unit.position(100), Position::new(3, 2, 1));
    }

    #[test]
    fn test_line_text() {
        let unit = SourceUnit::new("Test.java", "class A {\r\n}\n");
        assert_eq!(unit.line_text(1), Some("class A {"));
        assert_eq!(unit.line_text(2), Some("}"));
        assert_eq!(unit.line_text(3), Some(""));
        assert_eq!(unit.line_text(4), None);
        assert_eq!(unit.line_text(0), None);
    }

    #[test]
    fn test_from_file_missing() {
        let err = SourceUnit::from_file("/definitely/not/here/Missing.java").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_load_all_preserves_order() {
        let dir = std::env::temp_dir().join(format!("javelin-load-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let first = dir.join("A.java");
        let second = dir.join("B.java");
        std::fs::write(&first, "class A {}").unwrap();
        std::fs::write(&second, "class B {}").unwrap();

        let units = SourceUnit::load_all(&[first, second, dir.join("Missing.java")]).await;
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].as_ref().unwrap().text(), "class A {}");
        assert_eq!(units[1].as_ref().unwrap().text(), "class B {}");
        assert!(units[2].is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
