//! Numeric, string and character literals.
//!
//! ## Numbers
//!
//! | Form | Example | Kind |
//! |------|---------|------|
//! | Decimal | `42`, `1_000` | int |
//! | Hex | `0xFF`, `0xCAFE_BABEL` | int / long |
//! | Octal | `017` | int |
//! | Binary | `0b1010` | int |
//! | Floating | `3.14`, `.5`, `1e10`, `2f`, `1D` | float / double |
//! | Hex floating | `0x1.8p3`, `0x1p-2f` | float / double |
//!
//! Underscores may only sit between two digits. Non-decimal integers are bit
//! patterns, so `0xFFFFFFFF` is `-1`.
//!
//! ## Strings and characters
//!
//! Escapes `\b \t \n \f \r \s \" \' \\` and octal `\0` to `\377` are decoded.
//! Unicode escapes never reach this module: they were translated before
//! scanning began.

use super::cursor::Cursor;
use super::scanner::{is_identifier_part, is_line_terminator};
use super::token::{LiteralValue, TokenKind};
use crate::error::{LexicalError, LexicalErrorKind};

type NumberResult = Result<(TokenKind, LiteralValue), LexicalErrorKind>;

/// Scans a numeric literal starting at a digit or at `.digit`.
///
/// On error the cursor sits somewhere inside the literal; callers consume
/// the rest of the run with [`skip_number_tail`].
pub(crate) fn scan_number(cursor: &mut Cursor) -> NumberResult {
    if cursor.current() == Some('0') {
        match cursor.peek(1) {
            Some('x' | 'X') => {
                cursor.advance();
                cursor.advance();
                return scan_hex(cursor);
            }
            Some('b' | 'B') => {
                cursor.advance();
                cursor.advance();
                return scan_binary(cursor);
            }
            _ => {}
        }
    }
    scan_decimal(cursor)
}

/// Consumes what is left of a malformed numeric literal.
pub(crate) fn skip_number_tail(cursor: &mut Cursor) {
    loop {
        match cursor.current() {
            Some('.') if cursor.peek(1).is_some_and(|ch| ch.is_ascii_digit()) => {
                cursor.advance();
            }
            Some(ch) if is_identifier_part(ch) => {
                cursor.advance();
            }
            _ => break,
        }
    }
}

/// Collects digits of `radix` into `out`, rejecting misplaced underscores.
fn scan_digits(cursor: &mut Cursor, radix: u32, out: &mut String) -> Result<usize, LexicalErrorKind> {
    let mut count = 0;
    let mut after_underscore = false;

    while let Some(ch) = cursor.current() {
        if ch == '_' {
            if count == 0 || after_underscore {
                return Err(LexicalErrorKind::MalformedNumericLiteral);
            }
            after_underscore = true;
        } else if ch.is_digit(radix) {
            out.push(ch);
            count += 1;
            after_underscore = false;
        } else {
            break;
        }
        cursor.advance();
    }

    if after_underscore {
        return Err(LexicalErrorKind::MalformedNumericLiteral);
    }
    Ok(count)
}

/// Fails if the literal runs straight into identifier characters (`12abc`).
fn expect_end(cursor: &Cursor) -> Result<(), LexicalErrorKind> {
    match cursor.current() {
        Some(ch) if is_identifier_part(ch) => Err(LexicalErrorKind::MalformedNumericLiteral),
        _ => Ok(()),
    }
}

fn eat_long_suffix(cursor: &mut Cursor) -> bool {
    cursor.eat('l') || cursor.eat('L')
}

fn scan_decimal(cursor: &mut Cursor) -> NumberResult {
    let mut int_part = String::new();
    if cursor.current() != Some('.') {
        scan_digits(cursor, 10, &mut int_part)?;
    }

    let mut floating = false;
    let mut frac_part = String::new();
    if cursor.eat('.') {
        floating = true;
        scan_digits(cursor, 10, &mut frac_part)?;
    }

    let mut exponent = String::new();
    if matches!(cursor.current(), Some('e' | 'E')) {
        floating = true;
        cursor.advance();
        if let Some(sign @ ('+' | '-')) = cursor.current() {
            exponent.push(sign);
            cursor.advance();
        }
        if scan_digits(cursor, 10, &mut exponent)? == 0 {
            return Err(LexicalErrorKind::MalformedNumericLiteral);
        }
    }

    let kind = match cursor.current() {
        Some('f' | 'F') => {
            cursor.advance();
            TokenKind::FloatLiteral
        }
        Some('d' | 'D') => {
            cursor.advance();
            TokenKind::DoubleLiteral
        }
        _ if floating => TokenKind::DoubleLiteral,
        _ if eat_long_suffix(cursor) => TokenKind::LongLiteral,
        _ => TokenKind::IntLiteral,
    };
    expect_end(cursor)?;

    match kind {
        TokenKind::FloatLiteral | TokenKind::DoubleLiteral => {
            decimal_float(&int_part, &frac_part, &exponent, kind)
        }
        _ => {
            let long = kind == TokenKind::LongLiteral;
            let value = if int_part.len() > 1 && int_part.starts_with('0') {
                if int_part.chars().any(|ch| !ch.is_digit(8)) {
                    return Err(LexicalErrorKind::MalformedNumericLiteral);
                }
                integer_value(&int_part, 8, long)?
            } else {
                integer_value(&int_part, 10, long)?
            };
            Ok((kind, value))
        }
    }
}

fn scan_hex(cursor: &mut Cursor) -> NumberResult {
    let mut digits = String::new();
    let int_count = scan_digits(cursor, 16, &mut digits)?;

    if !matches!(cursor.current(), Some('.' | 'p' | 'P')) {
        if int_count == 0 {
            return Err(LexicalErrorKind::MalformedNumericLiteral);
        }
        let long = eat_long_suffix(cursor);
        expect_end(cursor)?;
        let kind = if long {
            TokenKind::LongLiteral
        } else {
            TokenKind::IntLiteral
        };
        return Ok((kind, integer_value(&digits, 16, long)?));
    }

    let mut frac_count = 0;
    if cursor.eat('.') {
        frac_count = scan_digits(cursor, 16, &mut digits)?;
    }
    if int_count + frac_count == 0 || !(cursor.eat('p') || cursor.eat('P')) {
        return Err(LexicalErrorKind::MalformedNumericLiteral);
    }

    let mut exponent = String::new();
    if let Some(sign @ ('+' | '-')) = cursor.current() {
        exponent.push(sign);
        cursor.advance();
    }
    if scan_digits(cursor, 10, &mut exponent)? == 0 {
        return Err(LexicalErrorKind::MalformedNumericLiteral);
    }

    let kind = if cursor.eat('f') || cursor.eat('F') {
        TokenKind::FloatLiteral
    } else {
        let _ = cursor.eat('d') || cursor.eat('D');
        TokenKind::DoubleLiteral
    };
    expect_end(cursor)?;

    hex_float(&digits, frac_count, &exponent, kind)
}

fn scan_binary(cursor: &mut Cursor) -> NumberResult {
    let mut digits = String::new();
    if scan_digits(cursor, 2, &mut digits)? == 0 {
        return Err(LexicalErrorKind::MalformedNumericLiteral);
    }
    let long = eat_long_suffix(cursor);
    expect_end(cursor)?;
    let kind = if long {
        TokenKind::LongLiteral
    } else {
        TokenKind::IntLiteral
    };
    Ok((kind, integer_value(&digits, 2, long)?))
}

/// Decodes integer digits into an `int` or `long` value.
///
/// Decimal literals may reach `2^31` (`2^63` for long), which only makes
/// sense under unary minus and wraps to the minimum value. Other radixes
/// may use every bit of the type.
fn integer_value(digits: &str, radix: u32, long: bool) -> Result<LiteralValue, LexicalErrorKind> {
    let mut value: u64 = 0;
    for ch in digits.chars() {
        let digit = ch.to_digit(radix).ok_or(LexicalErrorKind::MalformedNumericLiteral)?;
        value = value
            .checked_mul(u64::from(radix))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(LexicalErrorKind::NumericLiteralOverflow)?;
    }

    let limit = match (long, radix) {
        (false, 10) => 1 << 31,
        (false, _) => u64::from(u32::MAX),
        (true, 10) => 1 << 63,
        (true, _) => u64::MAX,
    };
    if value > limit {
        return Err(LexicalErrorKind::NumericLiteralOverflow);
    }

    Ok(if long {
        LiteralValue::Long(value as i64)
    } else {
        LiteralValue::Int(value as u32 as i32)
    })
}

fn has_nonzero_digit(digits: &str) -> bool {
    digits.chars().any(|ch| ch.is_ascii_alphanumeric() && ch != '0')
}

fn decimal_float(int_part: &str, frac_part: &str, exponent: &str, kind: TokenKind) -> NumberResult {
    let or_zero = |s: &str| if s.is_empty() { "0".to_string() } else { s.to_string() };
    let text = format!("{}.{}e{}", or_zero(int_part), or_zero(frac_part), or_zero(exponent));
    let nonzero = has_nonzero_digit(int_part) || has_nonzero_digit(frac_part);

    if kind == TokenKind::FloatLiteral {
        let value: f32 = text
            .parse()
            .map_err(|_| LexicalErrorKind::MalformedNumericLiteral)?;
        check_range(value.is_infinite(), value == 0.0 && nonzero)?;
        Ok((kind, LiteralValue::Float(value)))
    } else {
        let value: f64 = text
            .parse()
            .map_err(|_| LexicalErrorKind::MalformedNumericLiteral)?;
        check_range(value.is_infinite(), value == 0.0 && nonzero)?;
        Ok((kind, LiteralValue::Double(value)))
    }
}

/// Precision and exponent range of an IEEE 754 binary format.
struct BinaryFormat {
    /// Significand bits, the implicit leading one included
    precision: i64,
    min_exp: i64,
    max_exp: i64,
}

const BINARY32: BinaryFormat = BinaryFormat {
    precision: 24,
    min_exp: -126,
    max_exp: 127,
};

const BINARY64: BinaryFormat = BinaryFormat {
    precision: 53,
    min_exp: -1022,
    max_exp: 1023,
};

/// Decodes a hexadecimal floating-point literal with a single rounding.
///
/// The first 64 significant bits are kept exactly; any non-zero digit past
/// them only sets a sticky bit, which is all round-to-nearest-even needs.
fn hex_float(digits: &str, frac_count: usize, exponent: &str, kind: TokenKind) -> NumberResult {
    let float = kind == TokenKind::FloatLiteral;
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        let zero = if float {
            LiteralValue::Float(0.0)
        } else {
            LiteralValue::Double(0.0)
        };
        return Ok((kind, zero));
    }

    let mut mantissa = 0u64;
    let mut sticky = false;
    for (i, ch) in significant.chars().enumerate() {
        let digit = ch.to_digit(16).ok_or(LexicalErrorKind::MalformedNumericLiteral)?;
        if i < 16 {
            mantissa = (mantissa << 4) | u64::from(digit);
        } else {
            sticky |= digit != 0;
        }
    }
    let dropped_digits = significant.len().saturating_sub(16) as i64;

    // huge exponents saturate; rounding reports them as out of range
    let exp: i64 = exponent.parse().unwrap_or(if exponent.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    });

    let shift = mantissa.leading_zeros();
    let mantissa = mantissa << shift;
    // value = mantissa * 2^scale with the top bit of mantissa set
    let scale = exp
        .saturating_add(4 * dropped_digits)
        .saturating_sub(4 * frac_count as i64)
        .saturating_sub(i64::from(shift));
    let exponent = scale.saturating_add(63);

    if float {
        let bits = round_to_format(mantissa, sticky, exponent, &BINARY32)?;
        Ok((kind, LiteralValue::Float(f32::from_bits(bits as u32))))
    } else {
        let bits = round_to_format(mantissa, sticky, exponent, &BINARY64)?;
        Ok((kind, LiteralValue::Double(f64::from_bits(bits))))
    }
}

/// Rounds `mantissa * 2^(exponent - 63)` to `format`, returning its bits.
///
/// `mantissa` has its top bit set. Values that round to infinity or to zero
/// are out of range.
fn round_to_format(
    mantissa: u64,
    sticky: bool,
    exponent: i64,
    format: &BinaryFormat,
) -> Result<u64, LexicalErrorKind> {
    if exponent > format.max_exp {
        return Err(LexicalErrorKind::NumericLiteralOverflow);
    }

    // subnormals keep fewer bits
    let width = if exponent >= format.min_exp {
        format.precision
    } else {
        format
            .precision
            .saturating_sub(format.min_exp.saturating_sub(exponent))
    };
    if width < 0 {
        return Err(LexicalErrorKind::NumericLiteralOverflow);
    }

    let wide = (u128::from(mantissa) << 64) | u128::from(sticky);
    let mut kept = if width == 0 {
        // below half the smallest subnormal unless strictly above the tie
        u128::from(wide > 1u128 << 127)
    } else {
        let drop = 128 - width as u32;
        let kept = wide >> drop;
        let rest = wide & ((1u128 << drop) - 1);
        let half = 1u128 << (drop - 1);
        if rest > half || (rest == half && kept & 1 == 1) {
            kept + 1
        } else {
            kept
        }
    };

    if kept == 0 {
        return Err(LexicalErrorKind::NumericLiteralOverflow);
    }
    if exponent < format.min_exp {
        // a subnormal that rounded up to the smallest normal encodes the same way
        return Ok(kept as u64);
    }

    let implicit = 1u128 << (format.precision - 1);
    let mut exponent = exponent;
    if kept == implicit << 1 {
        kept >>= 1;
        exponent += 1;
        if exponent > format.max_exp {
            return Err(LexicalErrorKind::NumericLiteralOverflow);
        }
    }
    let biased = (exponent - format.min_exp + 1) as u64;
    Ok((biased << (format.precision - 1)) | (kept - implicit) as u64)
}

fn check_range(too_large: bool, too_small: bool) -> Result<(), LexicalErrorKind> {
    if too_large || too_small {
        Err(LexicalErrorKind::NumericLiteralOverflow)
    } else {
        Ok(())
    }
}

/// Scans a string literal; the cursor is on the opening quote.
///
/// Illegal escapes are skipped so scanning reaches the closing quote. On
/// failure every error found in the literal is returned, in source order.
pub(crate) fn scan_string(cursor: &mut Cursor) -> Result<String, Vec<LexicalError>> {
    let start = cursor.position();
    cursor.advance();

    let mut value = String::new();
    let mut errors = Vec::new();

    loop {
        match cursor.current() {
            None => {
                errors.insert(
                    0,
                    LexicalError::new(LexicalErrorKind::UnterminatedStringLiteral, start),
                );
                return Err(errors);
            }
            Some('"') => {
                cursor.advance();
                break;
            }
            Some(ch) if is_line_terminator(ch) => {
                let unterminated =
                    LexicalError::new(LexicalErrorKind::UnterminatedStringLiteral, start)
                        .with_recoverable(true);
                errors.insert(0, unterminated);
                return Err(errors);
            }
            Some('\\') => {
                let at = cursor.position();
                match scan_escape(cursor) {
                    Ok(ch) => value.push(ch),
                    Err(kind) => errors.push(LexicalError::new(kind, at)),
                }
            }
            Some(ch) => {
                cursor.advance();
                value.push(ch);
            }
        }
    }

    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}

/// Scans a character literal; the cursor is on the opening quote.
///
/// Only characters that fit in a Java `char` (one UTF-16 unit) are accepted.
pub(crate) fn scan_char(cursor: &mut Cursor) -> Result<char, LexicalError> {
    let start = cursor.position();
    let malformed = LexicalError::new(LexicalErrorKind::MalformedCharLiteral, start);
    cursor.advance();

    let value = match cursor.current() {
        None => return Err(malformed),
        Some(ch) if is_line_terminator(ch) => return Err(malformed),
        Some('\'') => {
            cursor.advance();
            return Err(malformed);
        }
        Some('\\') => {
            let at = cursor.position();
            match scan_escape(cursor) {
                Ok(ch) => ch,
                Err(kind) => {
                    skip_to_closing_quote(cursor);
                    return Err(LexicalError::new(kind, at));
                }
            }
        }
        Some(ch) => {
            cursor.advance();
            ch
        }
    };

    if u32::from(value) > 0xFFFF || !cursor.eat('\'') {
        skip_to_closing_quote(cursor);
        return Err(malformed);
    }
    Ok(value)
}

/// Consumes through the next `'` on the current line, if there is one.
fn skip_to_closing_quote(cursor: &mut Cursor) {
    let mut n = 0;
    loop {
        match cursor.peek(n) {
            Some('\'') => break,
            Some(ch) if !is_line_terminator(ch) => n += 1,
            _ => return,
        }
    }
    for _ in 0..=n {
        cursor.advance();
    }
}

/// Decodes one escape sequence; the cursor is on the backslash.
fn scan_escape(cursor: &mut Cursor) -> Result<char, LexicalErrorKind> {
    cursor.advance();
    let ch = match cursor.current() {
        Some(ch) if !is_line_terminator(ch) => ch,
        _ => return Err(LexicalErrorKind::IllegalEscapeCharacter('\\')),
    };

    if let Some(first) = ch.to_digit(8) {
        // \0 to \377: three digits only when the first is 0..=3
        let max = if first <= 3 { 3 } else { 2 };
        let mut value = 0;
        for _ in 0..max {
            match cursor.current().and_then(|ch| ch.to_digit(8)) {
                Some(digit) => {
                    value = value * 8 + digit;
                    cursor.advance();
                }
                None => break,
            }
        }
        return char::from_u32(value).ok_or(LexicalErrorKind::IllegalEscapeCharacter(ch));
    }

    cursor.advance();
    match ch {
        'b' => Ok('\u{8}'),
        't' => Ok('\t'),
        'n' => Ok('\n'),
        'f' => Ok('\u{c}'),
        'r' => Ok('\r'),
        's' => Ok(' '),
        '"' => Ok('"'),
        '\'' => Ok('\''),
        '\\' => Ok('\\'),
        other => Err(LexicalErrorKind::IllegalEscapeCharacter(other)),
    }
}
