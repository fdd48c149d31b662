//! Unicode escape translation.
//!
//! Java translates `\uXXXX` escapes before any other lexical processing, so an
//! escape can produce any character, including quotes and line terminators.
//! The rules follow JLS 3.3:
//!
//! ```text
//! \u0041           -> A
//! \uuuu0041        -> A                (any number of 'u')
//! \\u0041          -> \\u0041          (the backslash is itself escaped)
//! \u005cu0041      -> \u0041           (a translated backslash never starts another escape)
//! \uD83D\uDE00     -> one supplementary character
//! ```
//!
//! A malformed escape does not stop translation. Its characters are kept
//! verbatim and the error is parked at the index of the backslash, where the
//! scanner reports it.

use crate::error::{LexicalError, LexicalErrorKind};
use crate::source::SourceUnit;

/// An escape error waiting to be reported by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingEscape {
    /// Index of the backslash in the normalized buffer
    pub index: usize,
    pub error: LexicalError,
}

/// The translated character buffer.
#[derive(Debug, Clone, Default)]
pub(crate) struct Normalized {
    pub chars: Vec<char>,
    /// Raw byte offset of every character, plus one trailing entry for the end
    pub raw_offsets: Vec<usize>,
    /// Sorted by index
    pub errors: Vec<PendingEscape>,
}

/// Translates all unicode escapes in `unit`.
pub(crate) fn normalize(unit: &SourceUnit) -> Normalized {
    let raw = unit.text();
    let source: Vec<(usize, char)> = raw.char_indices().collect();
    let mut out = Normalized {
        chars: Vec::with_capacity(source.len()),
        raw_offsets: Vec::with_capacity(source.len() + 1),
        errors: Vec::new(),
    };

    let mut escapes = 0usize;
    // Contiguous raw backslashes immediately before the current character.
    let mut backslashes = 0usize;
    let mut i = 0;

    while i < source.len() {
        let (offset, ch) = source[i];

        if ch == '\\' && backslashes % 2 == 0 && char_at(&source, i + 1) == Some('u') {
            match decode_escape(&source, i) {
                Ok((decoded, consumed)) => {
                    out.chars.push(decoded);
                    out.raw_offsets.push(offset);
                    escapes += 1;
                    backslashes = 0;
                    i += consumed;
                    continue;
                }
                Err(()) => {
                    out.errors.push(PendingEscape {
                        index: out.chars.len(),
                        error: LexicalError::new(
                            LexicalErrorKind::InvalidUnicodeEscape,
                            unit.position(offset),
                        ),
                    });
                }
            }
        }

        if ch == '\\' {
            backslashes += 1;
        } else {
            backslashes = 0;
        }
        out.chars.push(ch);
        out.raw_offsets.push(offset);
        i += 1;
    }
    out.raw_offsets.push(raw.len());

    if escapes > 0 || !out.errors.is_empty() {
        tracing::debug!(
            unit = unit.name(),
            escapes,
            malformed = out.errors.len(),
            "translated unicode escapes"
        );
    }
    out
}

fn char_at(source: &[(usize, char)], i: usize) -> Option<char> {
    source.get(i).map(|&(_, ch)| ch)
}

/// Decodes one escape starting at the backslash at `start`.
///
/// Returns the character and the number of raw characters consumed. A high
/// surrogate immediately followed by an escaped low surrogate combines into
/// one character; a lone surrogate is malformed.
fn decode_escape(source: &[(usize, char)], start: usize) -> Result<(char, usize), ()> {
    let (unit, len) = decode_code_unit(source, start)?;

    if (0xD800..0xDC00).contains(&unit) {
        if char_at(source, start + len) == Some('\\') && char_at(source, start + len + 1) == Some('u') {
            if let Ok((low, low_len)) = decode_code_unit(source, start + len) {
                if (0xDC00..0xE000).contains(&low) {
                    let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    let ch = char::from_u32(combined).ok_or(())?;
                    return Ok((ch, len + low_len));
                }
            }
        }
        return Err(());
    }

    let ch = char::from_u32(unit).ok_or(())?;
    Ok((ch, len))
}

/// Decodes `\u+XXXX` into a UTF-16 code unit.
fn decode_code_unit(source: &[(usize, char)], start: usize) -> Result<(u32, usize), ()> {
    let mut i = start + 1;
    while char_at(source, i) == Some('u') {
        i += 1;
    }

    let mut value = 0u32;
    for _ in 0..4 {
        let digit = char_at(source, i).and_then(|ch| ch.to_digit(16)).ok_or(())?;
        value = value * 16 + digit;
        i += 1;
    }
    Ok((value, i - start))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(text: &str) -> Normalized {
        normalize(&SourceUnit::new("Test.java", text))
    }

    fn chars(text: &str) -> String {
        translate(text).chars.into_iter().collect()
    }

    #[test]
    fn test_plain_text_untouched() {
        let out = translate("int x;");
        assert_eq!(out.chars.iter().collect::<String>(), "int x;");
        assert_eq!(out.raw_offsets, vec![0, 1, 2, 3, 4, 5, 6]);
        assert!(out.errors.is_empty());
    }

    #[test]
    fn test_simple_escape() {
        let out = translate("a\\u0041b");
        assert_eq!(out.chars, vec!['a', 'A', 'b']);
        assert_eq!(out.raw_offsets, vec![0, 1, 7, 8]);
    }

    #[test]
    fn test_case_insensitive_hex_and_many_u() {
        assert_eq!(chars("\\uuu004a"), "J");
        assert_eq!(chars("\\u004A"), "J");
    }

    #[test]
    fn test_escaped_backslash_is_not_an_escape() {
        assert_eq!(chars("\\\\u0041"), "\\\\u0041");
        // three backslashes: the third one is eligible again
        assert_eq!(chars("\\\\\\u0041"), "\\\\A");
    }

    #[test]
    fn test_translated_backslash_does_not_start_escape() {
        assert_eq!(chars("\\u005cu0041"), "\\u0041");
    }

    #[test]
    fn test_surrogate_pair() {
        assert_eq!(chars("\\uD83D\\uDE00"), "\u{1F600}");
    }

    #[test]
    fn test_lone_surrogate_is_malformed() {
        let out = translate("\\uD83D;");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].index, 0);
    }

    #[test]
    fn test_malformed_escape_is_kept_and_reported() {
        let out = translate("x \\u12G4");
        assert_eq!(out.chars.iter().collect::<String>(), "x \\u12G4");
        assert_eq!(out.errors.len(), 1);
        let pending = &out.errors[0];
        assert_eq!(pending.index, 2);
        assert_eq!(pending.error.kind, LexicalErrorKind::InvalidUnicodeEscape);
        assert_eq!(pending.error.position.offset, 2);
        assert_eq!(pending.error.position.column, 3);
    }

    #[test]
    fn test_truncated_escape_at_end() {
        let out = translate("\\u00");
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.chars.len(), 4);
    }

    #[test]
    fn test_backslash_without_u() {
        let out = translate("\\n");
        assert_eq!(out.chars, vec!['\\', 'n']);
        assert!(out.errors.is_empty());
    }
}
