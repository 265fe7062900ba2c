// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Element factory.
//!
//! New subtrees are made by parsing a small piece of source text and
//! grafting the result into the tree that will receive it. The returned
//! node is detached; hand it to [`crate::edit::add`] or
//! [`crate::edit::replace`].

use crate::edit::{is_identifier, EditError, EditResult};
use crate::kinds::SyntaxKind;
use crate::parser::{
    parse_code_block, parse_expression, parse_member, parse_statement, parse_type, ParserError,
};
use crate::tree::{NodeId, SyntaxTree};

fn graft_single(
    tree: &mut SyntaxTree,
    parsed: Result<SyntaxTree, ParserError>,
) -> EditResult<NodeId> {
    let fragment = parsed?;
    let top = fragment
        .significant_children(fragment.root())
        .next()
        .ok_or_else(|| EditError::Malformed("empty fragment".to_string()))?;
    Ok(tree.graft(&fragment, top))
}

/// Parse `text` as an expression, e.g. `a + b`.
pub fn create_expression(tree: &mut SyntaxTree, text: &str) -> EditResult<NodeId> {
    graft_single(tree, parse_expression(text))
}

/// Parse `text` as a statement, e.g. `return x;`.
pub fn create_statement(tree: &mut SyntaxTree, text: &str) -> EditResult<NodeId> {
    graft_single(tree, parse_statement(text))
}

/// Parse `text` as a type, e.g. `List<String>`.
pub fn create_type(tree: &mut SyntaxTree, text: &str) -> EditResult<NodeId> {
    graft_single(tree, parse_type(text))
}

/// Parse `text` as a class member.
pub fn create_member(tree: &mut SyntaxTree, text: &str) -> EditResult<NodeId> {
    graft_single(tree, parse_member(text))
}

/// Parse `text` as a `{ ... }` block.
pub fn create_code_block(tree: &mut SyntaxTree, text: &str) -> EditResult<NodeId> {
    graft_single(tree, parse_code_block(text))
}

/// Parse `text` as a method parameter, e.g. `final String name`.
pub fn create_parameter(tree: &mut SyntaxTree, text: &str) -> EditResult<NodeId> {
    let fragment = parse_member(&format!("void m({}) {{}}", text))?;
    let list = fragment
        .descendants(fragment.root())
        .find(|n| fragment.kind(*n) == SyntaxKind::ParameterList);
    let params: Vec<NodeId> = list
        .map(|l| {
            fragment
                .children(l)
                .iter()
                .copied()
                .filter(|c| fragment.kind(*c) == SyntaxKind::Parameter)
                .collect()
        })
        .unwrap_or_default();
    match params.as_slice() {
        [param] => Ok(tree.graft(&fragment, *param)),
        _ => Err(EditError::Malformed(format!(
            "{:?} is not a single parameter",
            text
        ))),
    }
}

/// A detached identifier token.
pub fn create_identifier(tree: &mut SyntaxTree, name: &str) -> EditResult<NodeId> {
    if !is_identifier(name) {
        return Err(EditError::InvalidIdentifier(name.to_string()));
    }
    Ok(tree.new_token(SyntaxKind::Ident, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_compilation_unit;

    #[test]
    fn test_create_expression_is_detached() {
        let mut tree = parse_compilation_unit("class A {}").unwrap();
        let expr = create_expression(&mut tree, "a + b").unwrap();
        assert_eq!(tree.kind(expr), SyntaxKind::BinaryExpression);
        assert_eq!(tree.parent(expr), None);
        assert_eq!(tree.text(expr), "a + b");
    }

    #[test]
    fn test_create_parameter() {
        let mut tree = parse_compilation_unit("class A {}").unwrap();
        let param = create_parameter(&mut tree, "final String name").unwrap();
        assert_eq!(tree.kind(param), SyntaxKind::Parameter);
        assert_eq!(tree.text(param), "final String name");
        assert!(create_parameter(&mut tree, "int a, int b").is_err());
    }

    #[test]
    fn test_create_identifier_rejects_keywords() {
        let mut tree = parse_compilation_unit("").unwrap();
        assert!(create_identifier(&mut tree, "while").is_err());
        let id = create_identifier(&mut tree, "count").unwrap();
        assert_eq!(tree.token_text(id), Some("count"));
    }

    #[test]
    fn test_bad_fragment_reports_parse_error() {
        let mut tree = parse_compilation_unit("").unwrap();
        assert!(matches!(
            create_statement(&mut tree, "if ("),
            Err(EditError::Fragment(_))
        ));
    }
}
