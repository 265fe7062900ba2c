// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recursive-descent Java parser producing a lossless [`SyntaxTree`].
//!
//! The parser walks the significant tokens of the token stream. Trivia is
//! flushed into whatever node is open when the next significant token (or a
//! new node) is started, so composite nodes never begin or end with
//! whitespace or comments. Optional lists that are absent from the source
//! (modifier lists, `extends`/`implements`/`throws` lists, type parameter
//! lists) are still created as zero-width nodes, attached right after the
//! preceding significant token.

mod errors;
mod grammar;

pub use errors::ParserError;

use crate::kinds::SyntaxKind;
use crate::tokenizer::{tokenize, Token};
use crate::tree::{Checkpoint, SyntaxTree, TreeBuilder};
use crate::version::ParseOptions;

pub(crate) type PResult<T = ()> = Result<T, ParserError>;

/// What a fragment parse expects to find in its holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fragment {
    Statement,
    Expression,
    Type,
    Member,
    CodeBlock,
}

pub(crate) struct Parser<'t> {
    tokens: Vec<Token<'t>>,
    /// Indices into `tokens` of the non-trivia tokens.
    significant: Vec<usize>,
    /// Cursor into `significant`.
    pos: usize,
    /// Next raw token that has not been handed to the builder.
    emitted: usize,
    builder: TreeBuilder,
    options: ParseOptions,
    /// Set while parsing case labels and guards, where `->` ends the label.
    no_arrow_lambda: bool,
    source_len: usize,
}

impl<'t> Parser<'t> {
    fn new(text: &'t str, options: ParseOptions) -> PResult<Self> {
        let tokens = tokenize(text)?;
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(i, _)| i)
            .collect();
        Ok(Parser {
            tokens,
            significant,
            pos: 0,
            emitted: 0,
            builder: TreeBuilder::new(),
            options,
            no_arrow_lambda: false,
            source_len: text.len(),
        })
    }

    // ========================================================================
    // Lookahead
    // ========================================================================

    pub(crate) fn nth(&self, n: usize) -> Option<SyntaxKind> {
        self.significant
            .get(self.pos + n)
            .map(|i| self.tokens[*i].kind)
    }

    pub(crate) fn current(&self) -> Option<SyntaxKind> {
        self.nth(0)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == Some(kind)
    }

    pub(crate) fn nth_at(&self, n: usize, kind: SyntaxKind) -> bool {
        self.nth(n) == Some(kind)
    }

    pub(crate) fn nth_text(&self, n: usize) -> &'t str {
        self.significant
            .get(self.pos + n)
            .map_or("", |i| self.tokens[*i].text)
    }

    /// Is the current token the identifier `word`?
    pub(crate) fn at_contextual(&self, word: &str) -> bool {
        self.nth_contextual(0, word)
    }

    pub(crate) fn nth_contextual(&self, n: usize, word: &str) -> bool {
        self.nth_at(n, SyntaxKind::Ident) && self.nth_text(n) == word
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.pos >= self.significant.len()
    }

    /// Are significant tokens `n - 1` and `n` directly adjacent, with no
    /// trivia between them?
    pub(crate) fn nth_adjacent(&self, n: usize) -> bool {
        match (
            self.significant.get(self.pos + n - 1),
            self.significant.get(self.pos + n),
        ) {
            (Some(a), Some(b)) => *a + 1 == *b,
            _ => false,
        }
    }

    /// Byte offset of the current token, or the end of input.
    pub(crate) fn offset(&self) -> usize {
        self.significant
            .get(self.pos)
            .map_or(self.source_len, |i| self.tokens[*i].offset)
    }

    // ========================================================================
    // Tree building
    // ========================================================================

    /// Hand pending trivia to the builder.
    fn flush_trivia(&mut self) {
        let end = self
            .significant
            .get(self.pos)
            .copied()
            .unwrap_or(self.tokens.len());
        while self.emitted < end {
            let token = self.tokens[self.emitted];
            self.builder.token(token.kind, token.text);
            self.emitted += 1;
        }
    }

    pub(crate) fn bump(&mut self) {
        if let Some(kind) = self.current() {
            self.bump_as(kind);
        }
    }

    /// Consume the current token, retagging it as `kind`.
    pub(crate) fn bump_as(&mut self, kind: SyntaxKind) {
        self.bump_glued(kind, 1);
    }

    /// Consume `count` adjacent tokens as a single `kind` token.
    pub(crate) fn bump_glued(&mut self, kind: SyntaxKind, count: usize) {
        self.flush_trivia();
        let mut text = String::new();
        for _ in 0..count {
            let Some(index) = self.significant.get(self.pos).copied() else {
                break;
            };
            text.push_str(self.tokens[index].text);
            self.emitted = index + 1;
            self.pos += 1;
        }
        self.builder.token(kind, &text);
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> PResult {
        if self.at(kind) {
            self.bump();
            Ok(())
        } else {
            let expected = kind
                .fixed_text()
                .map_or_else(|| kind.name().to_string(), |t| format!("'{}'", t));
            Err(self.unexpected(&expected))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> PResult {
        self.expect(SyntaxKind::Ident)
            .map_err(|_| self.unexpected("identifier"))
    }

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind);
    }

    pub(crate) fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    pub(crate) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind);
    }

    pub(crate) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// A zero-width node attached before any pending trivia.
    pub(crate) fn empty_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind);
        self.builder.finish_node();
    }

    // ========================================================================
    // Errors and language level
    // ========================================================================

    pub(crate) fn unexpected(&self, expected: &str) -> ParserError {
        let found = if self.at_eof() {
            "end of input".to_string()
        } else {
            format!("'{}'", self.nth_text(0))
        };
        ParserError::UnexpectedToken {
            expected: expected.to_string(),
            found,
            offset: self.offset(),
        }
    }

    pub(crate) fn unsupported(&self, what: &'static str) -> ParserError {
        ParserError::Unsupported {
            what,
            offset: self.offset(),
        }
    }

    /// Fail unless `available` holds at the configured language level.
    pub(crate) fn require(&self, available: bool, feature: &'static str) -> PResult {
        if available {
            Ok(())
        } else {
            Err(ParserError::FeatureNotAvailable {
                feature,
                level: self.options.level,
                offset: self.offset(),
            })
        }
    }

    pub(crate) fn level(&self) -> crate::version::LanguageLevel {
        self.options.level
    }

    /// Run `f` with arrow lambdas enabled or disabled, restoring the previous
    /// setting afterwards.
    pub(crate) fn with_arrow_lambdas<T>(
        &mut self,
        allowed: bool,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let saved = self.no_arrow_lambda;
        self.no_arrow_lambda = !allowed;
        let result = f(self);
        self.no_arrow_lambda = saved;
        result
    }

    pub(crate) fn arrow_lambdas_allowed(&self) -> bool {
        !self.no_arrow_lambda
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    fn finish_root(mut self) -> PResult<SyntaxTree> {
        if !self.at_eof() {
            return Err(self.unexpected("end of input"));
        }
        self.flush_trivia();
        self.builder.finish_node();
        Ok(self.builder.finish())
    }

    fn compilation_unit(mut self) -> PResult<SyntaxTree> {
        self.builder.start_node(SyntaxKind::JavaFile);
        self.file_body()?;
        self.finish_root()
    }

    fn fragment(mut self, fragment: Fragment) -> PResult<SyntaxTree> {
        self.builder.start_node(SyntaxKind::DummyHolder);
        match fragment {
            Fragment::Statement => self.statement()?,
            Fragment::Expression => self.expression()?,
            Fragment::Type => self.type_()?,
            Fragment::Member => self.member()?,
            Fragment::CodeBlock => self.code_block()?,
        }
        self.finish_root()
    }
}

/// Parse a complete Java source file.
pub fn parse_compilation_unit(text: &str) -> Result<SyntaxTree, ParserError> {
    parse_compilation_unit_with_options(text, ParseOptions::default())
}

/// Parse a complete Java source file at a specific language level.
pub fn parse_compilation_unit_with_options(
    text: &str,
    options: ParseOptions,
) -> Result<SyntaxTree, ParserError> {
    let tree = Parser::new(text, options)?.compilation_unit()?;
    tracing::trace!(nodes = tree.arena_len(), "parsed compilation unit");
    Ok(tree)
}

fn parse_fragment(text: &str, fragment: Fragment) -> Result<SyntaxTree, ParserError> {
    Parser::new(text, ParseOptions::default())?.fragment(fragment)
}

/// Parse a single statement. The root is a `DummyHolder` wrapping it.
pub fn parse_statement(text: &str) -> Result<SyntaxTree, ParserError> {
    parse_fragment(text, Fragment::Statement)
}

/// Parse a single expression. The root is a `DummyHolder` wrapping it.
pub fn parse_expression(text: &str) -> Result<SyntaxTree, ParserError> {
    parse_fragment(text, Fragment::Expression)
}

/// Parse a type such as `Map<String, int[]>`.
pub fn parse_type(text: &str) -> Result<SyntaxTree, ParserError> {
    parse_fragment(text, Fragment::Type)
}

/// Parse a class member: field, method, constructor, initializer or nested
/// class.
pub fn parse_member(text: &str) -> Result<SyntaxTree, ParserError> {
    parse_fragment(text, Fragment::Member)
}

/// Parse a `{ ... }` code block.
pub fn parse_code_block(text: &str) -> Result<SyntaxTree, ParserError> {
    parse_fragment(text, Fragment::CodeBlock)
}
