// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A typed, editable Java syntax tree.
//!
//! # Overview
//!
//! - **Parsing**: build a lossless [`SyntaxTree`] with
//!   [`parse_compilation_unit`], or parse fragments with [`parse_statement`],
//!   [`parse_expression`], [`parse_type`] and [`parse_member`].
//! - **Roles**: [`roles`] classifies every child of a node by the slot it
//!   fills (condition, then-branch, operand, ...).
//! - **Facades**: [`nodes`] wraps node ids in typed handles with structural
//!   getters and mutators.
//! - **Editing**: [`edit`] inserts, deletes and replaces subtrees while
//!   keeping separators, parentheses and placeholders consistent;
//!   [`factory`] creates new subtrees from source text.
//! - **Visibility**: [`resolve`] answers which declarations are visible at a
//!   node, following pattern variables through `&&`, `||`, `!` and the
//!   control flow of `if` statements and loops.
//!
//! # Quick Start
//!
//! ```
//! use jtree_syntax::parse_compilation_unit;
//!
//! let source = "class A { void m() { if (o instanceof String s) use(s); } }";
//! let tree = parse_compilation_unit(source).expect("parse error");
//!
//! // Round-trip: the tree prints back exactly
//! assert_eq!(tree.text(tree.root()), source);
//! ```
//!
//! # Language Levels
//!
//! ```
//! use jtree_syntax::{parse_compilation_unit_with_options, LanguageLevel, ParseOptions};
//!
//! let options = ParseOptions::new(LanguageLevel::JDK_17);
//! let source = "class A { int f(Object o) { return o instanceof Integer i ? i : 0; } }";
//! assert!(parse_compilation_unit_with_options(source, options).is_ok());
//! ```

// ============================================================================
// Public modules and re-exports
// ============================================================================

/// Node kinds and category sets.
pub mod kinds;
pub use kinds::{Category, SyntaxKind, TokenSet};

/// Arena syntax tree.
pub mod tree;
pub use tree::{NodeId, SyntaxTree};

/// Lossless tokenizer.
pub mod tokenizer;
pub use tokenizer::{tokenize, TokError, Token};

/// Java language level for version-aware parsing.
pub mod version;
pub use version::{LanguageLevel, ParseOptions};

mod parser;
pub use parser::{
    parse_code_block, parse_compilation_unit, parse_compilation_unit_with_options,
    parse_expression, parse_member, parse_statement, parse_type, ParserError,
};

/// Child-role classification.
pub mod roles;
pub use roles::{check_role_consistency, find_child_by_role, find_children_by_role, role_of, Role};

/// Structural edits.
pub mod edit;
pub use edit::{EditError, EditResult};

/// Creating new subtrees from source text.
pub mod factory;

/// Typed node facades.
pub mod nodes;

/// Declaration visibility and normal-completion analysis.
pub mod resolve;
pub use resolve::{resolve_name, resolve_visibility, Declaration, DeclarationKind, ResolveContext};

/// Visitor infrastructure for tree traversal.
pub mod visitor;
pub use visitor::{walk, VisitResult, Visitor};

// Error bridges - converts syntax errors to JtreeError
mod error_bridges;

// ============================================================================
// Error formatting
// ============================================================================

/// Byte offset of the beginning of the line containing `offset`.
fn bol_offset(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Byte offset of the end of the line containing `offset`, newline excluded.
fn eol_offset(source: &str, offset: usize) -> usize {
    source[offset..]
        .find('\n')
        .map_or(source.len(), |i| offset + i)
}

/// Render a parse error as an annotated source snippet.
///
/// ```
/// use jtree_syntax::{parse_compilation_unit, prettify_error};
///
/// let source = "class A { void m() { int x = ; } }";
/// if let Err(e) = parse_compilation_unit(source) {
///     let formatted = prettify_error(&e, source, "A.java");
///     assert!(formatted.contains("A.java"));
/// }
/// ```
pub fn prettify_error(err: &ParserError, source: &str, label: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let mut offset = err.offset().min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let (line, _) = jtree_core::text::offset_to_position(source, offset);
    let start_offset = bol_offset(source, offset);
    let end_offset = eol_offset(source, offset);
    let snippet = &source[start_offset..end_offset];
    let message = err.to_string();
    if snippet.is_empty() {
        return format!("{}:{}: {}", label, line, message);
    }
    // Errors at end of line or input point at the last character.
    let mut start = (offset - start_offset).min(snippet.len() - 1);
    while !snippet.is_char_boundary(start) {
        start -= 1;
    }
    let end = snippet[start..]
        .chars()
        .next()
        .map_or(snippet.len(), |c| start + c.len_utf8());

    let rendered = Renderer::plain()
        .render(
            Level::Error.title(&message).snippet(
                Snippet::source(snippet)
                    .line_start(line as usize)
                    .origin(label)
                    .fold(false)
                    .annotation(Level::Error.span(start..end).label(&message)),
            ),
        )
        .to_string();
    rendered
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prettify_error_points_at_line() {
        let source = "class A {\n  void m() {\n    int x = ;\n  }\n}\n";
        let err = parse_compilation_unit(source).unwrap_err();
        let rendered = prettify_error(&err, source, "A.java");
        assert!(rendered.contains("A.java"));
        assert!(rendered.contains("int x = ;"));
        assert!(!rendered.contains("void m()"));
    }

    #[test]
    fn test_prettify_error_at_end_of_input() {
        let source = "class A {";
        let err = parse_compilation_unit(source).unwrap_err();
        let rendered = prettify_error(&err, source, "A.java");
        assert!(rendered.contains("class A {"));
    }
}
