// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Lossless Java tokenizer.
//!
//! [`tokenize`] splits source text into [`Token`]s, keeping whitespace and
//! comments as trivia so that concatenating every token's text reproduces the
//! input exactly.
//!
//! Context-dependent tokens are left to the parser:
//!
//! - `>` is always a single token. The parser glues adjacent `>` tokens into
//!   shift operators, which lets `List<List<String>>` close both type
//!   argument lists.
//! - Restricted identifiers (`var`, `yield`, `record`, `permits`, `sealed`,
//!   `when`) are plain [`SyntaxKind::Ident`] tokens.

use thiserror::Error;
use winnow::combinator::{alt, opt};
use winnow::error::{ErrMode, ParserError};
use winnow::prelude::*;
use winnow::token::{any, one_of, take, take_till, take_until, take_while};
use winnow::ModalResult;

use crate::kinds::SyntaxKind;


/// A token and its position in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    /// Byte offset of the token's first character.
    pub offset: usize,
}

/// Tokenizer failure, located by byte offset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokError {
    #[error("unterminated string literal")]
    UnterminatedString { offset: usize },
    #[error("unterminated character literal")]
    UnterminatedChar { offset: usize },
    #[error("unterminated text block")]
    UnterminatedTextBlock { offset: usize },
    #[error("unterminated block comment")]
    UnterminatedComment { offset: usize },
    #[error("malformed text block opening delimiter")]
    BadTextBlockStart { offset: usize },
    #[error("unexpected character {ch:?}")]
    BadCharacter { ch: char, offset: usize },
}

impl TokError {
    pub fn offset(&self) -> usize {
        match self {
            TokError::UnterminatedString { offset }
            | TokError::UnterminatedChar { offset }
            | TokError::UnterminatedTextBlock { offset }
            | TokError::UnterminatedComment { offset }
            | TokError::BadTextBlockStart { offset }
            | TokError::BadCharacter { offset, .. } => *offset,
        }
    }
}

/// Operators and punctuation, longest spelling first.
const OPERATORS: &[(&str, SyntaxKind)] = &[
    ("<<=", SyntaxKind::LtLtEq),
    ("...", SyntaxKind::Ellipsis),
    ("->", SyntaxKind::Arrow),
    ("::", SyntaxKind::ColonColon),
    ("==", SyntaxKind::EqEq),
    ("!=", SyntaxKind::Ne),
    ("<=", SyntaxKind::Le),
    (">=", SyntaxKind::Ge),
    ("&&", SyntaxKind::AndAnd),
    ("||", SyntaxKind::OrOr),
    ("++", SyntaxKind::PlusPlus),
    ("--", SyntaxKind::MinusMinus),
    ("+=", SyntaxKind::PlusEq),
    ("-=", SyntaxKind::MinusEq),
    ("*=", SyntaxKind::StarEq),
    ("/=", SyntaxKind::SlashEq),
    ("&=", SyntaxKind::AmpEq),
    ("|=", SyntaxKind::PipeEq),
    ("^=", SyntaxKind::CaretEq),
    ("%=", SyntaxKind::PercentEq),
    ("<<", SyntaxKind::LtLt),
    ("(", SyntaxKind::LParen),
    (")", SyntaxKind::RParen),
    ("{", SyntaxKind::LBrace),
    ("}", SyntaxKind::RBrace),
    ("[", SyntaxKind::LBracket),
    ("]", SyntaxKind::RBracket),
    (";", SyntaxKind::Semicolon),
    (",", SyntaxKind::Comma),
    (".", SyntaxKind::Dot),
    ("@", SyntaxKind::At),
    ("=", SyntaxKind::Eq),
    ("<", SyntaxKind::Lt),
    (">", SyntaxKind::Gt),
    ("!", SyntaxKind::Bang),
    ("~", SyntaxKind::Tilde),
    ("?", SyntaxKind::Question),
    (":", SyntaxKind::Colon),
    ("+", SyntaxKind::Plus),
    ("-", SyntaxKind::Minus),
    ("*", SyntaxKind::Star),
    ("/", SyntaxKind::Slash),
    ("&", SyntaxKind::Amp),
    ("|", SyntaxKind::Pipe),
    ("^", SyntaxKind::Caret),
    ("%", SyntaxKind::Percent),
];

/// Split `text` into tokens, trivia included.
pub fn tokenize(text: &str) -> Result<Vec<Token<'_>>, TokError> {
    let mut input = text;
    let mut tokens = Vec::new();

    while !input.is_empty() {
        let offset = text.len() - input.len();
        let checkpoint = input;
        match next_token.parse_next(&mut input) {
            Ok(kind) => {
                let len = checkpoint.len() - input.len();
                tokens.push(Token {
                    kind,
                    text: &checkpoint[..len],
                    offset,
                });
            }
            Err(_) => return Err(classify_failure(checkpoint, offset)),
        }
    }

    Ok(tokens)
}

/// Work out why no token matched at the start of `rest`.
fn classify_failure(rest: &str, offset: usize) -> TokError {
    if rest.starts_with("/*") {
        TokError::UnterminatedComment { offset }
    } else if rest.starts_with("\"\"\"") {
        let after = &rest[3..];
        let opening_ok = after
            .trim_start_matches([' ', '\t', '\x0c'])
            .starts_with(['\n', '\r']);
        if opening_ok {
            TokError::UnterminatedTextBlock { offset }
        } else {
            TokError::BadTextBlockStart { offset }
        }
    } else if rest.starts_with('"') {
        TokError::UnterminatedString { offset }
    } else if rest.starts_with('\'') {
        TokError::UnterminatedChar { offset }
    } else {
        TokError::BadCharacter {
            ch: rest.chars().next().unwrap_or('\0'),
            offset,
        }
    }
}

// ============================================================================
// Token parsers
// ============================================================================

fn next_token(input: &mut &str) -> ModalResult<SyntaxKind> {
    alt((
        whitespace,
        line_comment,
        block_comment,
        text_block,
        string_literal,
        char_literal,
        number,
        identifier,
        operator,
    ))
    .parse_next(input)
}

fn whitespace(input: &mut &str) -> ModalResult<SyntaxKind> {
    take_while(1.., |c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c'))
        .value(SyntaxKind::Whitespace)
        .parse_next(input)
}

fn line_comment(input: &mut &str) -> ModalResult<SyntaxKind> {
    ("//", take_till(0.., |c| c == '\n' || c == '\r'))
        .value(SyntaxKind::LineComment)
        .parse_next(input)
}

fn block_comment(input: &mut &str) -> ModalResult<SyntaxKind> {
    ("/*", take_until(0.., "*/"), "*/")
        .value(SyntaxKind::BlockComment)
        .parse_next(input)
}

fn identifier(input: &mut &str) -> ModalResult<SyntaxKind> {
    let word = (
        one_of(|c: char| c.is_alphabetic() || c == '_' || c == '$'),
        take_while(0.., |c: char| c.is_alphanumeric() || c == '_' || c == '$'),
    )
        .take()
        .parse_next(input)?;
    Ok(SyntaxKind::from_keyword(word).unwrap_or(SyntaxKind::Ident))
}

fn operator(input: &mut &str) -> ModalResult<SyntaxKind> {
    if input.starts_with("/*") {
        return Err(ErrMode::from_input(input));
    }
    for (spelling, kind) in OPERATORS {
        if input.starts_with(spelling) {
            take(spelling.len()).parse_next(input)?;
            return Ok(*kind);
        }
    }
    Err(ErrMode::from_input(input))
}

/// Body of a quoted literal up to (not including) `quote`. Escapes are
/// skipped over, not interpreted.
fn quoted_body(quote: char) -> impl FnMut(&mut &str) -> ModalResult<()> {
    move |input: &mut &str| {
        loop {
            let c = any.parse_next(input)?;
            if c == '\\' {
                let escaped = any.parse_next(input)?;
                if escaped == '\n' || escaped == '\r' {
                    return Err(ErrMode::from_input(input));
                }
            } else if c == quote {
                return Ok(());
            } else if c == '\n' || c == '\r' {
                return Err(ErrMode::from_input(input));
            }
        }
    }
}

fn string_literal(input: &mut &str) -> ModalResult<SyntaxKind> {
    if input.starts_with("\"\"\"") {
        return Err(ErrMode::from_input(input));
    }
    ('"', quoted_body('"'))
        .value(SyntaxKind::StringLiteral)
        .parse_next(input)
}

fn char_literal(input: &mut &str) -> ModalResult<SyntaxKind> {
    ('\'', quoted_body('\''))
        .value(SyntaxKind::CharLiteral)
        .parse_next(input)
}

fn text_block(input: &mut &str) -> ModalResult<SyntaxKind> {
    "\"\"\"".parse_next(input)?;
    take_while(0.., |c: char| matches!(c, ' ' | '\t' | '\x0c')).parse_next(input)?;
    alt(("\r\n", "\n", "\r")).parse_next(input)?;
    loop {
        if input.starts_with("\"\"\"") {
            take(3usize).parse_next(input)?;
            return Ok(SyntaxKind::TextBlockLiteral);
        }
        let c = any.parse_next(input)?;
        if c == '\\' {
            any.parse_next(input)?;
        }
    }
}

fn digits<'a>(input: &mut &'a str, radix: u32) -> ModalResult<&'a str> {
    take_while(0.., move |c: char| c.is_digit(radix) || c == '_').parse_next(input)
}

fn exponent(input: &mut &str, markers: [char; 2]) -> ModalResult<bool> {
    let marker = opt(one_of(markers)).parse_next(input)?;
    if marker.is_none() {
        return Ok(false);
    }
    opt(one_of(['+', '-'])).parse_next(input)?;
    take_while(1.., |c: char| c.is_ascii_digit() || c == '_').parse_next(input)?;
    Ok(true)
}

fn number(input: &mut &str) -> ModalResult<SyntaxKind> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), _) if c.is_ascii_digit() => {}
        (Some('.'), Some(d)) if d.is_ascii_digit() => {}
        _ => return Err(ErrMode::from_input(input)),
    }

    let mut floating = false;
    let lower = input.get(..2).map(|p| p.to_ascii_lowercase());

    if lower.as_deref() == Some("0x") {
        take(2usize).parse_next(input)?;
        digits(input, 16)?;
        if opt('.').parse_next(input)?.is_some() {
            floating = true;
            digits(input, 16)?;
        }
        if exponent(input, ['p', 'P'])? {
            floating = true;
        }
    } else if lower.as_deref() == Some("0b") {
        take(2usize).parse_next(input)?;
        digits(input, 2)?;
    } else {
        digits(input, 10)?;
        if input.starts_with('.') && !input.starts_with("..") {
            floating = true;
            take(1usize).parse_next(input)?;
            digits(input, 10)?;
        }
        if exponent(input, ['e', 'E'])? {
            floating = true;
        }
    }

    let suffix = opt(one_of(['l', 'L', 'f', 'F', 'd', 'D'])).parse_next(input)?;
    let kind = match suffix {
        Some('l' | 'L') if !floating => SyntaxKind::LongLiteral,
        Some('f' | 'F') => SyntaxKind::FloatLiteral,
        Some('d' | 'D') => SyntaxKind::DoubleLiteral,
        Some(_) => return Err(ErrMode::from_input(input)),
        None if floating => SyntaxKind::DoubleLiteral,
        None => SyntaxKind::IntLiteral,
    };
    Ok(kind)
}
