// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Literal value decoding.
//!
//! Every decoder returns `None` for input it cannot turn into a value:
//! out-of-range numbers, floating-point overflow or underflow to zero,
//! malformed escapes and lone surrogates. Literal text is assumed to have
//! been produced by the tokenizer, so the overall token shape is trusted.
//!
//! Characters decode to a Rust `char`, which cannot hold a UTF-16 surrogate.
//! A char literal such as `'\uD800'` is valid Java but has no value here,
//! and a string containing an unpaired surrogate escape has none either.

use serde::Serialize;

use crate::kinds::SyntaxKind;

/// The compile-time value of a literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LiteralValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
    Boolean(bool),
    Null,
}

/// Decode the literal token `text` of kind `kind`. `negated` says whether
/// the literal is the operand of a unary minus, which is the only place the
/// magnitudes `2147483648` and `9223372036854775808L` may appear.
pub fn decode(kind: SyntaxKind, text: &str, negated: bool) -> Option<LiteralValue> {
    match kind {
        SyntaxKind::IntLiteral => parse_int(text, negated).map(LiteralValue::Int),
        SyntaxKind::LongLiteral => parse_long(text, negated).map(LiteralValue::Long),
        SyntaxKind::FloatLiteral => parse_float(text).map(LiteralValue::Float),
        SyntaxKind::DoubleLiteral => parse_double(text).map(LiteralValue::Double),
        SyntaxKind::CharLiteral => parse_char(text).map(LiteralValue::Char),
        SyntaxKind::StringLiteral => parse_string(text).map(LiteralValue::String),
        SyntaxKind::TextBlockLiteral => parse_text_block(text).map(LiteralValue::String),
        SyntaxKind::TrueKw => Some(LiteralValue::Boolean(true)),
        SyntaxKind::FalseKw => Some(LiteralValue::Boolean(false)),
        SyntaxKind::NullKw => Some(LiteralValue::Null),
        _ => None,
    }
}

// ============================================================================
// Integers
// ============================================================================

/// Split an integer literal into its digits and radix, underscores removed.
fn radix_digits(text: &str) -> Option<(String, u32)> {
    let clean: String = text.chars().filter(|c| *c != '_').collect();
    let (digits, radix) = if let Some(rest) = clean
        .strip_prefix("0x")
        .or_else(|| clean.strip_prefix("0X"))
    {
        (rest.to_string(), 16)
    } else if let Some(rest) = clean
        .strip_prefix("0b")
        .or_else(|| clean.strip_prefix("0B"))
    {
        (rest.to_string(), 2)
    } else if clean.len() > 1 && clean.starts_with('0') {
        (clean[1..].to_string(), 8)
    } else {
        (clean, 10)
    };
    if digits.is_empty() {
        return None;
    }
    Some((digits, radix))
}

/// Magnitude of an integer literal, bounded by `bits` for non-decimal
/// radixes (which may set the sign bit) and by the signed maximum plus one
/// for decimal.
fn parse_magnitude(text: &str, bits: u32, negated: bool) -> Option<u64> {
    let (digits, radix) = radix_digits(text)?;
    let value = u64::from_str_radix(&digits, radix).ok()?;
    if radix == 10 {
        let max = 1u64 << (bits - 1);
        if value < max || (value == max && negated) {
            Some(value)
        } else {
            None
        }
    } else if bits == 64 || value <= u64::from(u32::MAX) {
        Some(value)
    } else {
        None
    }
}

pub fn parse_int(text: &str, negated: bool) -> Option<i32> {
    let magnitude = parse_magnitude(text, 32, negated)?;
    // Two's complement: 0xFFFFFFFF is -1, and 2147483648 under minus is MIN.
    Some(magnitude as u32 as i32)
}

pub fn parse_long(text: &str, negated: bool) -> Option<i64> {
    let body = text.strip_suffix(['l', 'L'])?;
    let magnitude = parse_magnitude(body, 64, negated)?;
    Some(magnitude as i64)
}

// ============================================================================
// Floating point
// ============================================================================

fn has_nonzero_mantissa(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    let mantissa = if lower.starts_with("0x") {
        lower[2..].split('p').next().unwrap_or("").to_string()
    } else {
        lower.split('e').next().unwrap_or("").to_string()
    };
    mantissa
        .chars()
        .any(|c| c.is_ascii_hexdigit() && c != '0')
}

/// Value of a hexadecimal floating literal such as `0x1.8p1`.
fn parse_hex_float(text: &str) -> Option<f64> {
    let lower = text.to_ascii_lowercase();
    let body = lower.strip_prefix("0x")?;
    let (mantissa, exponent) = body.split_once('p')?;
    let exponent: i32 = exponent.parse().ok()?;
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let mut value = 0f64;
    for c in whole.chars().chain(fraction.chars()) {
        value = value * 16.0 + f64::from(c.to_digit(16)?);
    }
    let scale = exponent.checked_sub(4 * i32::try_from(fraction.len()).ok()?)?;
    Some(value * 2f64.powi(scale))
}

fn finite_nonzero<T: PartialEq + Default + Copy>(
    value: T,
    is_finite: bool,
    text: &str,
) -> Option<T> {
    if !is_finite {
        return None;
    }
    if value == T::default() && has_nonzero_mantissa(text) {
        return None;
    }
    Some(value)
}

pub fn parse_double(text: &str) -> Option<f64> {
    let clean: String = text.chars().filter(|c| *c != '_').collect();
    let body = clean.strip_suffix(['d', 'D']).unwrap_or(&clean);
    let value = if body.starts_with("0x") || body.starts_with("0X") {
        parse_hex_float(body)?
    } else {
        body.parse::<f64>().ok()?
    };
    finite_nonzero(value, value.is_finite(), body)
}

pub fn parse_float(text: &str) -> Option<f32> {
    let clean: String = text.chars().filter(|c| *c != '_').collect();
    let body = clean.strip_suffix(['f', 'F'])?;
    let value = if body.starts_with("0x") || body.starts_with("0X") {
        parse_hex_float(body)? as f32
    } else {
        body.parse::<f32>().ok()?
    };
    finite_nonzero(value, value.is_finite(), body)
}

// ============================================================================
// Characters and strings
// ============================================================================

/// Resolve `\uXXXX` escapes (any number of `u`s) into UTF-16 units and
/// keep everything else, so the second pass sees the same characters the
/// Java compiler would.
fn unicode_units(body: &str) -> Option<Vec<u16>> {
    let chars: Vec<char> = body.chars().collect();
    let mut units = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            // An escaped backslash cannot start a unicode escape.
            let mut run = 0;
            while i + run < chars.len() && chars[i + run] == '\\' {
                run += 1;
            }
            if run % 2 == 0 || chars.get(i + run) != Some(&'u') {
                for _ in 0..run {
                    units.push(u16::from(b'\\'));
                }
                i += run;
                continue;
            }
            for _ in 0..run - 1 {
                units.push(u16::from(b'\\'));
            }
            let mut j = i + run;
            while chars.get(j) == Some(&'u') {
                j += 1;
            }
            let hex: String = chars.get(j..j + 4)?.iter().collect();
            let unit = u16::from_str_radix(&hex, 16).ok()?;
            units.push(unit);
            i = j + 4;
            continue;
        }
        let mut buf = [0u16; 2];
        units.extend_from_slice(c.encode_utf16(&mut buf));
        i += 1;
    }
    Some(units)
}

/// Process backslash escapes. `text_block` enables `\<line terminator>`.
fn translate_escapes(units: &[u16], text_block: bool) -> Option<Vec<u16>> {
    let backslash = u16::from(b'\\');
    let mut out = Vec::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        if unit != backslash {
            out.push(unit);
            i += 1;
            continue;
        }
        let next = *units.get(i + 1)?;
        i += 2;
        let translated = match char::from_u32(u32::from(next))? {
            'b' => 0x08,
            't' => u16::from(b'\t'),
            'n' => u16::from(b'\n'),
            'f' => 0x0c,
            'r' => u16::from(b'\r'),
            's' => u16::from(b' '),
            '"' => u16::from(b'"'),
            '\'' => u16::from(b'\''),
            '\\' => backslash,
            '\n' if text_block => continue,
            '\r' if text_block => {
                if units.get(i) == Some(&u16::from(b'\n')) {
                    i += 1;
                }
                continue;
            }
            d @ '0'..='7' => {
                let max_len = if d <= '3' { 3 } else { 2 };
                let mut value = u16::from(d as u8 - b'0');
                let mut len = 1;
                while len < max_len {
                    match units.get(i).and_then(|u| char::from_u32(u32::from(*u))) {
                        Some(o @ '0'..='7') => {
                            value = value * 8 + u16::from(o as u8 - b'0');
                            i += 1;
                            len += 1;
                        }
                        _ => break,
                    }
                }
                value
            }
            _ => return None,
        };
        out.push(translated);
    }
    Some(out)
}

fn decode_quoted(body: &str, text_block: bool) -> Option<String> {
    let units = unicode_units(body)?;
    let translated = translate_escapes(&units, text_block)?;
    String::from_utf16(&translated).ok()
}

/// Decode a char literal. Lone surrogates yield `None`.
pub fn parse_char(text: &str) -> Option<char> {
    let body = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let decoded = decode_quoted(body, false)?;
    let mut chars = decoded.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    Some(c)
}

pub fn parse_string(text: &str) -> Option<String> {
    let body = text.strip_prefix('"')?.strip_suffix('"')?;
    if body.contains('\n') || body.contains('\r') {
        return None;
    }
    decode_quoted(body, false)
}

// ============================================================================
// Text blocks
// ============================================================================

fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Strip incidental indentation and trailing spaces from the lines of a
/// text block body, the part between the opening line terminator and the
/// closing delimiter.
fn strip_indent(content: &str) -> String {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let last = lines.len() - 1;
    let closing_on_own_line = is_blank(lines[last]);
    let indent = lines
        .iter()
        .enumerate()
        .filter(|(i, line)| !is_blank(line) || (*i == last && closing_on_own_line))
        .map(|(_, line)| indent_width(line))
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if is_blank(line) {
                if i == last && !closing_on_own_line {
                    return (*line).to_string();
                }
                return String::new();
            }
            let stripped: String = line.chars().skip(indent).collect();
            stripped.trim_end_matches(char::is_whitespace).to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn parse_text_block(text: &str) -> Option<String> {
    let body = text.strip_prefix("\"\"\"")?.strip_suffix("\"\"\"")?;
    // Skip the rest of the opening line, which may only hold whitespace.
    let newline = body.find(['\n', '\r'])?;
    if !is_blank(&body[..newline]) {
        return None;
    }
    let mut content = &body[newline..];
    content = content
        .strip_prefix("\r\n")
        .or_else(|| content.strip_prefix('\n'))
        .or_else(|| content.strip_prefix('\r'))
        .unwrap_or(content);
    decode_quoted(&strip_indent(content), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_int_range() {
        assert_eq!(parse_int("0", false), Some(0));
        assert_eq!(parse_int("2147483647", false), Some(i32::MAX));
        assert_eq!(parse_int("2147483648", false), None);
        assert_eq!(parse_int("2147483648", true), Some(i32::MIN));
        assert_eq!(parse_int("1_000_000", false), Some(1_000_000));
    }

    #[test]
    fn test_radix_ints() {
        assert_eq!(parse_int("0x7fffffff", false), Some(i32::MAX));
        assert_eq!(parse_int("0xFFFFFFFF", false), Some(-1));
        assert_eq!(parse_int("0x100000000", false), None);
        assert_eq!(parse_int("017", false), Some(15));
        assert_eq!(parse_int("0b1010", false), Some(10));
        assert_eq!(parse_int("0x", false), None);
    }

    #[test]
    fn test_longs() {
        assert_eq!(parse_long("9223372036854775807L", false), Some(i64::MAX));
        assert_eq!(parse_long("9223372036854775808L", false), None);
        assert_eq!(parse_long("9223372036854775808L", true), Some(i64::MIN));
        assert_eq!(parse_long("0xFFFFFFFFFFFFFFFFL", false), Some(-1));
        assert_eq!(parse_long("42l", false), Some(42));
    }

    #[test]
    fn test_doubles_and_floats() {
        assert_eq!(parse_double("1.5"), Some(1.5));
        assert_eq!(parse_double("1e3"), Some(1000.0));
        assert_eq!(parse_double(".5d"), Some(0.5));
        assert_eq!(parse_double("0x1.8p1"), Some(3.0));
        assert_eq!(parse_double("1e999"), None);
        assert_eq!(parse_double("1e-999"), None);
        assert_eq!(parse_double("0.0"), Some(0.0));
        assert_eq!(parse_float("2.5f"), Some(2.5));
        assert_eq!(parse_float("1e39f"), None);
        assert_eq!(parse_float("1_0.0F"), Some(10.0));
    }

    #[test]
    fn test_chars() {
        assert_eq!(parse_char("'a'"), Some('a'));
        assert_eq!(parse_char("'\\n'"), Some('\n'));
        assert_eq!(parse_char("'\\''"), Some('\''));
        assert_eq!(parse_char("'\\101'"), Some('A'));
        assert_eq!(parse_char("'\\u0041'"), Some('A'));
        assert_eq!(parse_char("'\\uuu0041'"), Some('A'));
        assert_eq!(parse_char("'\\s'"), Some(' '));
        assert_eq!(parse_char("'ab'"), None);
        assert_eq!(parse_char("'\\q'"), None);
    }

    #[test]
    fn test_lone_surrogate_has_no_value() {
        assert_eq!(parse_char("'\\uD800'"), None);
        assert_eq!(parse_char("'\\uDFFF'"), None);
        assert_eq!(
            decode(SyntaxKind::CharLiteral, "'\\uD800'", false),
            None
        );
        assert_eq!(parse_char("'\\uD7FF'"), Some('\u{D7FF}'));
        assert_eq!(parse_string("\"a\\uD800\""), None);
        assert_eq!(
            parse_string("\"\\uD83D\\uDE00\""),
            Some("\u{1F600}".to_string())
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(parse_string("\"\""), Some(String::new()));
        assert_eq!(
            parse_string("\"a\\tb\\\\c\\\"\""),
            Some("a\tb\\c\"".to_string())
        );
        assert_eq!(parse_string("\"\\0\\12\""), Some("\0\n".to_string()));
        assert_eq!(
            parse_string("\"\\uD83D\\uDE00\""),
            Some("\u{1F600}".to_string())
        );
        assert_eq!(parse_string("\"\\uD83D\""), None);
        // `\\u0041` is a backslash followed by the text u0041.
        assert_eq!(parse_string("\"\\\\u0041\""), Some("\\u0041".to_string()));
    }

    #[test]
    fn test_text_block_indentation() {
        let text = "\"\"\"\n    Hello,\n      World!\n    \"\"\"";
        assert_eq!(parse_text_block(text), Some("Hello,\n  World!\n".to_string()));
    }

    #[test]
    fn test_text_block_closing_on_last_line() {
        let text = "\"\"\"\n    one\n    two\"\"\"";
        assert_eq!(parse_text_block(text), Some("one\ntwo".to_string()));
    }

    #[test]
    fn test_text_block_escapes_and_trailing_space() {
        let text = "\"\"\"\n  a   \n  b\\s\n  c \\\n  d\n  \"\"\"";
        assert_eq!(parse_text_block(text), Some("a\nb \nc d\n".to_string()));
    }

    #[test]
    fn test_text_block_closing_delimiter_sets_indent() {
        let text = "\"\"\"\n    x\n  \"\"\"";
        assert_eq!(parse_text_block(text), Some("  x\n".to_string()));
    }

    #[test]
    fn test_decode_dispatch() {
        assert_eq!(
            decode(SyntaxKind::TrueKw, "true", false),
            Some(LiteralValue::Boolean(true))
        );
        assert_eq!(decode(SyntaxKind::NullKw, "null", false), Some(LiteralValue::Null));
        assert_eq!(
            decode(SyntaxKind::IntLiteral, "2147483648", true),
            Some(LiteralValue::Int(i32::MIN))
        );
    }
}
