// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Pattern facades.

use crate::kinds::SyntaxKind;
use crate::roles::{find_child_by_role, Role};
use crate::tree::{NodeId, SyntaxTree};

use super::traits::{ast_node, child, children, sum_node};
use super::{AstNode, ModifierList, NamedNode, TypeElement};

ast_node! {
    /// `String s`.
    TypeTestPattern
}

impl TypeTestPattern {
    pub fn variable(self, tree: &SyntaxTree) -> Option<PatternVariable> {
        child(tree, self.0, Role::PatternVariable)
    }
}

ast_node! {
    /// The variable bound by a pattern.
    PatternVariable
}

impl NamedNode for PatternVariable {}

impl PatternVariable {
    pub fn modifier_list(self, tree: &SyntaxTree) -> Option<ModifierList> {
        child(tree, self.0, Role::ModifierList)
    }

    pub fn type_element(self, tree: &SyntaxTree) -> Option<TypeElement> {
        child(tree, self.0, Role::TypeElement)
    }

    /// `_` binds nothing.
    pub fn is_unnamed(self, tree: &SyntaxTree) -> bool {
        self.name(tree) == Some("_")
    }
}

ast_node! {
    /// `Point(int x, var y)`.
    DeconstructionPattern
}

impl DeconstructionPattern {
    pub fn type_element(self, tree: &SyntaxTree) -> Option<TypeElement> {
        child(tree, self.0, Role::TypeElement)
    }

    pub fn components(self, tree: &SyntaxTree) -> Vec<Pattern> {
        find_child_by_role(tree, self.0, Role::DeconstructionList)
            .map(|list| children(tree, list, Role::Pattern))
            .unwrap_or_default()
    }
}

ast_node! {
    /// `_` as a whole pattern.
    UnnamedPattern
}

sum_node! {
    /// Any pattern.
    Pattern {
        TypeTest(TypeTestPattern),
        Deconstruction(DeconstructionPattern),
        Unnamed(UnnamedPattern),
    }
}

impl Pattern {
    /// Every named variable this pattern binds, nested patterns included.
    pub fn bound_variables(self, tree: &SyntaxTree) -> Vec<PatternVariable> {
        tree.descendants(self.syntax())
            .filter(|n| tree.kind(*n) == SyntaxKind::PatternVariable)
            .filter_map(|n| PatternVariable::cast(tree, n))
            .filter(|v| !v.is_unnamed(tree))
            .collect()
    }
}

/// The pattern variables bound under `node`, for callers holding a raw id.
pub fn pattern_variables(tree: &SyntaxTree, node: NodeId) -> Vec<PatternVariable> {
    match Pattern::cast(tree, node) {
        Some(pattern) => pattern.bound_variables(tree),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;

    fn pattern_of(tree: &SyntaxTree) -> Pattern {
        tree.descendants(tree.root())
            .find_map(|n| Pattern::cast(tree, n))
            .unwrap()
    }

    #[test]
    fn test_type_test_pattern() {
        let tree = parse_expression("o instanceof final String s").unwrap();
        let Pattern::TypeTest(pattern) = pattern_of(&tree) else {
            panic!("expected a type test");
        };
        let var = pattern.variable(&tree).unwrap();
        assert_eq!(var.name(&tree), Some("s"));
        assert_eq!(var.type_element(&tree).unwrap().text(&tree), "String");
        assert!(var
            .modifier_list(&tree)
            .unwrap()
            .has_modifier(&tree, SyntaxKind::FinalKw));
    }

    #[test]
    fn test_nested_deconstruction() {
        let tree = parse_expression("o instanceof Line(Point(var x, var y), Point end)").unwrap();
        let pattern = pattern_of(&tree);
        let Pattern::Deconstruction(record) = pattern else {
            panic!("expected a record pattern");
        };
        assert_eq!(record.components(&tree).len(), 2);
        let names: Vec<_> = pattern
            .bound_variables(&tree)
            .iter()
            .filter_map(|v| v.name(&tree))
            .collect();
        assert_eq!(names, ["x", "y", "end"]);
    }
}
