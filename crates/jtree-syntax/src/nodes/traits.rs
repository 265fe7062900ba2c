// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Facade traits and the macros that define facade types.

use crate::edit::{self, EditResult};
use crate::kinds::SyntaxKind;
use crate::roles::{find_child_by_role, find_children_by_role, Role};
use crate::tree::{NodeId, SyntaxTree};

/// A typed view of one node kind (or a small family of kinds).
pub trait AstNode: Copy {
    /// Does a node of `kind` have this facade?
    fn can_cast(kind: SyntaxKind) -> bool;

    fn cast(tree: &SyntaxTree, id: NodeId) -> Option<Self>;

    /// The underlying node.
    fn syntax(self) -> NodeId;

    fn kind(self, tree: &SyntaxTree) -> SyntaxKind {
        tree.kind(self.syntax())
    }

    /// Source text, trivia included.
    fn text(self, tree: &SyntaxTree) -> String {
        tree.text(self.syntax())
    }

    fn parent(self, tree: &SyntaxTree) -> Option<NodeId> {
        tree.parent(self.syntax())
    }

    /// Put the detached `new` in this node's place.
    fn replace_with(self, tree: &mut SyntaxTree, new: NodeId) -> EditResult<NodeId> {
        edit::replace(tree, self.syntax(), new)
    }

    /// Remove this node from its parent.
    fn delete(self, tree: &mut SyntaxTree) -> EditResult {
        edit::delete_child(tree, self.syntax())
    }
}

/// A facade with a name identifier.
pub trait NamedNode: AstNode {
    fn name_token(self, tree: &SyntaxTree) -> Option<NodeId> {
        find_child_by_role(tree, self.syntax(), Role::Name)
    }

    fn name(self, tree: &SyntaxTree) -> Option<&str> {
        self.name_token(tree).and_then(|t| tree.token_text(t))
    }

    fn set_name(self, tree: &mut SyntaxTree, name: &str) -> EditResult {
        edit::set_name(tree, self.syntax(), name)
    }
}

/// The child in `role`, viewed as `N`.
pub(crate) fn child<N: AstNode>(tree: &SyntaxTree, node: NodeId, role: Role) -> Option<N> {
    find_child_by_role(tree, node, role).and_then(|c| N::cast(tree, c))
}

/// Every child in `role` that has facade `N`.
pub(crate) fn children<N: AstNode>(tree: &SyntaxTree, node: NodeId, role: Role) -> Vec<N> {
    find_children_by_role(tree, node, role)
        .into_iter()
        .filter_map(|c| N::cast(tree, c))
        .collect()
}

/// Every child with facade `N`, regardless of role.
pub(crate) fn children_of<N: AstNode>(tree: &SyntaxTree, node: NodeId) -> Vec<N> {
    tree.children(node)
        .iter()
        .filter_map(|c| N::cast(tree, *c))
        .collect()
}

/// Define a facade struct over one or more kinds.
macro_rules! ast_node {
    (
        $(#[$meta:meta])*
        $name:ident $(: $($kind:ident)|+)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(NodeId);

        impl $crate::nodes::AstNode for $name {
            fn can_cast(kind: $crate::kinds::SyntaxKind) -> bool {
                ast_node!(@matches kind, $name $(: $($kind)|+)?)
            }

            fn cast(tree: &$crate::tree::SyntaxTree, id: NodeId) -> Option<Self> {
                if Self::can_cast(tree.kind(id)) {
                    Some($name(id))
                } else {
                    None
                }
            }

            fn syntax(self) -> NodeId {
                self.0
            }
        }
    };
    (@matches $kind_var:ident, $name:ident) => {
        $kind_var == $crate::kinds::SyntaxKind::$name
    };
    (@matches $kind_var:ident, $name:ident : $($kind:ident)|+) => {
        matches!($kind_var, $($crate::kinds::SyntaxKind::$kind)|+)
    };
}

/// Define a sum facade: an enum with one variant per member facade,
/// dispatching on kind.
macro_rules! sum_node {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident($facade:ident)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($facade),)+
        }

        impl $crate::nodes::AstNode for $name {
            fn can_cast(kind: $crate::kinds::SyntaxKind) -> bool {
                false $(|| <$facade as $crate::nodes::AstNode>::can_cast(kind))+
            }

            fn cast(tree: &$crate::tree::SyntaxTree, id: NodeId) -> Option<Self> {
                $(
                    if let Some(node) = <$facade as $crate::nodes::AstNode>::cast(tree, id) {
                        return Some($name::$variant(node));
                    }
                )+
                None
            }

            fn syntax(self) -> NodeId {
                match self {
                    $($name::$variant(node) => node.syntax(),)+
                }
            }
        }
    };
}

pub(crate) use ast_node;
pub(crate) use sum_node;
