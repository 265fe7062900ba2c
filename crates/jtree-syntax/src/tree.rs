// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Arena-allocated lossless syntax tree.
//!
//! Every node lives in a single `Vec` owned by [`SyntaxTree`] and is
//! addressed by a [`NodeId`]. Leaves carry their source text; composite nodes
//! carry an ordered child list. Concatenating the text of all leaves under a
//! node reproduces that node's source text exactly, trivia included.
//!
//! Parents are stored as plain back-references and are only used for upward
//! navigation. Removing a node from its parent leaves it in the arena as a
//! detached subtree; it can be re-inserted elsewhere or simply dropped with
//! the tree.
//!
//! ## Modification stamps
//!
//! Every structural change bumps a tree-wide counter and stamps the changed
//! node and all of its ancestors with the new value. Derived data (see
//! [`crate::resolve::ResolveContext`]) is cached against the stamp of the
//! subtree root it was computed from, so an edit inside one block invalidates
//! that block and its ancestors but never a sibling subtree.

use std::fmt;

use jtree_core::text::Span;
use serde::Serialize;

use crate::kinds::SyntaxKind;

/// Index of a node in a [`SyntaxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Token(String),
    Node(Vec<NodeId>),
}

#[derive(Debug, Clone)]
struct NodeSlot {
    kind: SyntaxKind,
    parent: Option<NodeId>,
    data: NodeData,
    stamp: u64,
}

/// An arena of syntax nodes with a distinguished root.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<NodeSlot>,
    root: NodeId,
    modifications: u64,
}

impl SyntaxTree {
    /// Create a tree whose root is an empty node of `root_kind`.
    pub fn new(root_kind: SyntaxKind) -> Self {
        let mut tree = SyntaxTree {
            nodes: Vec::new(),
            root: NodeId(0),
            modifications: 0,
        };
        tree.root = tree.alloc(root_kind, NodeData::Node(Vec::new()));
        tree
    }

    fn alloc(&mut self, kind: SyntaxKind, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeSlot {
            kind,
            parent: None,
            data,
            stamp: self.modifications,
        });
        id
    }

    fn slot(&self, id: NodeId) -> &NodeSlot {
        &self.nodes[id.index()]
    }

    // ========================================================================
    // Basic accessors
    // ========================================================================

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of slots in the arena, detached nodes included.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.slot(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).parent
    }

    pub fn is_token(&self, id: NodeId) -> bool {
        matches!(self.slot(id).data, NodeData::Token(_))
    }

    /// Text of a leaf, or `None` for a composite node.
    pub fn token_text(&self, id: NodeId) -> Option<&str> {
        match &self.slot(id).data {
            NodeData::Token(text) => Some(text),
            NodeData::Node(_) => None,
        }
    }

    /// Children of a composite node; empty for a leaf.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.slot(id).data {
            NodeData::Token(_) => &[],
            NodeData::Node(children) => children,
        }
    }

    /// Children that are not whitespace or comments.
    pub fn significant_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |c| !self.kind(*c).is_trivia())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Position of `id` in its parent's child list.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Next sibling that is not trivia.
    pub fn next_significant_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.next_sibling(id);
        while let Some(c) = cur {
            if !self.kind(c).is_trivia() {
                return Some(c);
            }
            cur = self.next_sibling(c);
        }
        None
    }

    /// Previous sibling that is not trivia.
    pub fn prev_significant_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.prev_sibling(id);
        while let Some(c) = cur {
            if !self.kind(c).is_trivia() {
                return Some(c);
            }
            cur = self.prev_sibling(c);
        }
        None
    }

    /// `id` followed by its ancestors up to the top of its subtree.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |n| self.parent(*n))
    }

    /// Nearest ancestor of `id` (excluding `id`) with the given kind.
    pub fn find_ancestor(&self, id: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        self.ancestors(id).skip(1).find(|a| self.kind(*a) == kind)
    }

    /// Is `ancestor` equal to `id` or one of its ancestors?
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Is the node reachable from the root?
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors(id).last() == Some(self.root)
    }

    /// Preorder traversal of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// All leaves under `id` in source order.
    pub fn tokens(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(id).filter(move |n| self.is_token(*n))
    }

    pub fn first_token(&self, id: NodeId) -> Option<NodeId> {
        self.tokens(id).next()
    }

    /// First direct child with the given kind.
    pub fn child_of_kind(&self, id: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.kind(*c) == kind)
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Source text of a node: the concatenation of its leaves.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_text(id, &mut out);
        out
    }

    /// Append the source text of `id` to `out`.
    pub fn write_text(&self, id: NodeId, out: &mut String) {
        match &self.slot(id).data {
            NodeData::Token(text) => out.push_str(text),
            NodeData::Node(children) => {
                for child in children {
                    self.write_text(*child, out);
                }
            }
        }
    }

    /// Length of the node's source text in bytes.
    pub fn text_len(&self, id: NodeId) -> usize {
        match &self.slot(id).data {
            NodeData::Token(text) => text.len(),
            NodeData::Node(children) => children.iter().map(|c| self.text_len(*c)).sum(),
        }
    }

    /// Byte offset of the node relative to the top of its subtree.
    pub fn offset(&self, id: NodeId) -> usize {
        let mut offset = 0;
        let mut cur = id;
        while let Some(parent) = self.parent(cur) {
            for sibling in self.children(parent) {
                if *sibling == cur {
                    break;
                }
                offset += self.text_len(*sibling);
            }
            cur = parent;
        }
        offset
    }

    /// Byte range of the node relative to the top of its subtree.
    pub fn span(&self, id: NodeId) -> Span {
        let start = self.offset(id);
        Span::new(start, start + self.text_len(id))
    }

    /// The leaf covering `offset` in the root's text. An offset at the very
    /// end of the text selects the last leaf.
    pub fn token_at_offset(&self, offset: usize) -> Option<NodeId> {
        let mut start = 0;
        let mut last = None;
        for token in self.tokens(self.root) {
            let len = self.text_len(token);
            if len > 0 {
                if offset < start + len {
                    return Some(token);
                }
                last = Some(token);
            }
            start += len;
        }
        if offset == start {
            last
        } else {
            None
        }
    }

    /// Like [`token_at_offset`](Self::token_at_offset) but steps off trivia
    /// onto the preceding significant leaf when the offset sits right after it.
    pub fn significant_token_at_offset(&self, offset: usize) -> Option<NodeId> {
        let token = self.token_at_offset(offset)?;
        if !self.kind(token).is_trivia() {
            return Some(token);
        }
        if offset > 0 {
            if let Some(prev) = self.token_at_offset(offset - 1) {
                if !self.kind(prev).is_trivia() {
                    return Some(prev);
                }
            }
        }
        Some(token)
    }

    /// Innermost node whose span contains `span`.
    pub fn covering_element(&self, span: Span) -> Option<NodeId> {
        let token = self.token_at_offset(span.start)?;
        self.ancestors(token)
            .find(|n| self.span(*n).contains(&span))
    }

    // ========================================================================
    // Modification stamps
    // ========================================================================

    /// Stamp of the last modification at or below `id`.
    pub fn stamp(&self, id: NodeId) -> u64 {
        self.slot(id).stamp
    }

    /// Total number of structural modifications made to the tree.
    pub fn modification_count(&self) -> u64 {
        self.modifications
    }

    /// Record a change at `id`: bump the counter and restamp `id` and its
    /// ancestors.
    pub fn mark_modified(&mut self, id: NodeId) {
        self.modifications += 1;
        let stamp = self.modifications;
        let mut cur = Some(id);
        while let Some(n) = cur {
            self.nodes[n.index()].stamp = stamp;
            cur = self.nodes[n.index()].parent;
        }
    }

    // ========================================================================
    // Low-level structural primitives
    // ========================================================================

    /// Allocate a detached leaf.
    pub fn new_token(&mut self, kind: SyntaxKind, text: impl Into<String>) -> NodeId {
        self.alloc(kind, NodeData::Token(text.into()))
    }

    /// Allocate a detached composite node adopting `children`, which must all
    /// be detached.
    pub fn new_node(&mut self, kind: SyntaxKind, children: Vec<NodeId>) -> NodeId {
        let id = self.alloc(kind, NodeData::Node(Vec::new()));
        for child in &children {
            debug_assert!(self.parent(*child).is_none(), "{} is already attached", child);
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes[id.index()].data = NodeData::Node(children);
        id
    }

    fn children_mut(&mut self, id: NodeId) -> &mut Vec<NodeId> {
        match &mut self.nodes[id.index()].data {
            NodeData::Node(children) => children,
            NodeData::Token(_) => panic!("{} is a leaf and cannot hold children", id),
        }
    }

    /// Insert the detached node `child` at `index` in `parent`'s child list.
    pub fn insert_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        debug_assert!(self.parent(child).is_none(), "{} is already attached", child);
        let children = self.children_mut(parent);
        let index = index.min(children.len());
        children.insert(index, child);
        self.nodes[child.index()].parent = Some(parent);
        self.mark_modified(parent);
    }

    /// Insert `child` right before or after `anchor`.
    pub fn insert_next_to(&mut self, anchor: NodeId, child: NodeId, before: bool) {
        if let (Some(parent), Some(index)) = (self.parent(anchor), self.index_in_parent(anchor)) {
            let index = if before { index } else { index + 1 };
            self.insert_at(parent, index, child);
        }
    }

    /// Remove `id` from its parent. The subtree stays in the arena.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        self.children_mut(parent).retain(|c| *c != id);
        self.nodes[id.index()].parent = None;
        self.mark_modified(parent);
    }

    /// Put the detached node `new` where `old` is; `old` becomes detached.
    pub fn replace_raw(&mut self, old: NodeId, new: NodeId) {
        let Some(parent) = self.parent(old) else {
            return;
        };
        debug_assert!(self.parent(new).is_none(), "{} is already attached", new);
        if let Some(slot) = self.children_mut(parent).iter_mut().find(|c| **c == old) {
            *slot = new;
        }
        self.nodes[old.index()].parent = None;
        self.nodes[new.index()].parent = Some(parent);
        self.mark_modified(new);
    }

    /// Replace the text of a leaf.
    pub fn set_token_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let NodeData::Token(old) = &mut self.nodes[id.index()].data {
            *old = text.into();
            self.mark_modified(id);
        }
    }

    /// Retag a node with a different kind.
    pub fn set_kind(&mut self, id: NodeId, kind: SyntaxKind) {
        self.nodes[id.index()].kind = kind;
        self.mark_modified(id);
    }

    /// Deep-copy the subtree at `id` of `other` into this arena, detached.
    pub fn graft(&mut self, other: &SyntaxTree, id: NodeId) -> NodeId {
        match &other.slot(id).data {
            NodeData::Token(text) => self.new_token(other.kind(id), text.clone()),
            NodeData::Node(children) => {
                let copies = children.iter().map(|c| self.graft(other, *c)).collect();
                self.new_node(other.kind(id), copies)
            }
        }
    }

    /// Deep-copy a subtree of this tree, detached.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let snapshot = self.subtree(id);
        self.graft(&snapshot, snapshot.root())
    }

    /// A standalone tree holding a copy of the subtree at `id`.
    pub fn subtree(&self, id: NodeId) -> SyntaxTree {
        let mut tree = SyntaxTree {
            nodes: Vec::new(),
            root: NodeId(0),
            modifications: 0,
        };
        tree.root = tree.graft(self, id);
        tree
    }

    /// Verify parent/child agreement for everything reachable from the root.
    /// Returns a description of each violation.
    pub fn check_consistency(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.parent(self.root).is_some() {
            problems.push(format!("root {} has a parent", self.root));
        }
        for node in self.descendants(self.root) {
            for child in self.children(node) {
                if self.parent(*child) != Some(node) {
                    problems.push(format!(
                        "{} ({}) is a child of {} ({}) but claims parent {:?}",
                        child,
                        self.kind(*child),
                        node,
                        self.kind(node),
                        self.parent(*child)
                    ));
                }
            }
        }
        problems
    }

    /// Indented kind/text outline of the subtree, one node per line.
    pub fn debug_dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(self.kind(id).name());
        if let Some(text) = self.token_text(id) {
            out.push_str(&format!(" {:?}", text));
        }
        out.push('\n');
        for child in self.children(id) {
            self.dump_into(*child, depth + 1, out);
        }
    }
}

/// Preorder iterator returned by [`SyntaxTree::descendants`].
pub struct Descendants<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let next = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(next).iter().rev().copied());
        Some(next)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Marker for a position in the builder's current child list, used to wrap
/// already-built children in a node started later.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint(usize);

/// Bottom-up tree construction with checkpoints.
pub struct TreeBuilder {
    tree: SyntaxTree,
    base: Vec<NodeId>,
    frames: Vec<(SyntaxKind, Vec<NodeId>)>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder {
            tree: SyntaxTree::new(SyntaxKind::DummyHolder),
            base: Vec::new(),
            frames: Vec::new(),
        }
    }

    fn top(&mut self) -> &mut Vec<NodeId> {
        match self.frames.last_mut() {
            Some((_, children)) => children,
            None => &mut self.base,
        }
    }

    pub fn token(&mut self, kind: SyntaxKind, text: &str) {
        let id = self.tree.new_token(kind, text);
        self.top().push(id);
    }

    pub fn start_node(&mut self, kind: SyntaxKind) {
        self.frames.push((kind, Vec::new()));
    }

    pub fn checkpoint(&mut self) -> Checkpoint {
        Checkpoint(self.top().len())
    }

    /// Start a node that adopts everything added since `checkpoint`.
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        let top = self.top();
        let adopted = top.split_off(checkpoint.0.min(top.len()));
        self.frames.push((kind, adopted));
    }

    pub fn finish_node(&mut self) {
        let Some((kind, children)) = self.frames.pop() else {
            panic!("finish_node without start_node");
        };
        let id = self.tree.new_node(kind, children);
        self.top().push(id);
    }

    /// Kind of the node most recently finished at the current level.
    pub fn last_kind(&mut self) -> Option<SyntaxKind> {
        let last = self.top().last().copied()?;
        Some(self.tree.kind(last))
    }

    /// Finish building. The single completed top-level node becomes the root.
    pub fn finish(mut self) -> SyntaxTree {
        assert!(self.frames.is_empty(), "unfinished nodes in builder");
        let built = std::mem::take(&mut self.base);
        assert_eq!(built.len(), 1, "builder must produce exactly one root");
        self.tree.root = built[0];
        self.tree.nodes[self.tree.root.index()].parent = None;
        self.tree
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxTree {
        // `a + b`
        let mut b = TreeBuilder::new();
        b.start_node(SyntaxKind::BinaryExpression);
        b.start_node(SyntaxKind::ReferenceExpression);
        b.token(SyntaxKind::Ident, "a");
        b.finish_node();
        b.token(SyntaxKind::Whitespace, " ");
        b.token(SyntaxKind::Plus, "+");
        b.token(SyntaxKind::Whitespace, " ");
        let cp = b.checkpoint();
        b.token(SyntaxKind::Ident, "b");
        b.start_node_at(cp, SyntaxKind::ReferenceExpression);
        b.finish_node();
        b.finish_node();
        b.finish()
    }

    #[test]
    fn builder_produces_lossless_tree() {
        let tree = sample();
        let root = tree.root();
        assert_eq!(tree.kind(root), SyntaxKind::BinaryExpression);
        assert_eq!(tree.text(root), "a + b");
        assert_eq!(tree.children(root).len(), 5);
        assert_eq!(tree.significant_children(root).count(), 3);
        assert!(tree.check_consistency().is_empty());
    }

    #[test]
    fn spans_and_offsets() {
        let tree = sample();
        let root = tree.root();
        let rhs = tree.last_child(root).unwrap();
        assert_eq!(tree.span(rhs), Span::new(4, 5));
        let plus = tree.token_at_offset(2).unwrap();
        assert_eq!(tree.kind(plus), SyntaxKind::Plus);
        assert_eq!(tree.token_at_offset(5).map(|t| tree.kind(t)), Some(SyntaxKind::Ident));
        assert_eq!(tree.token_at_offset(6), None);
        let covering = tree.covering_element(Span::new(0, 3)).unwrap();
        assert_eq!(covering, root);
    }

    #[test]
    fn siblings_skip_trivia() {
        let tree = sample();
        let root = tree.root();
        let lhs = tree.first_child(root).unwrap();
        let plus = tree.next_significant_sibling(lhs).unwrap();
        assert_eq!(tree.kind(plus), SyntaxKind::Plus);
        assert_eq!(tree.prev_significant_sibling(plus), Some(lhs));
        assert_eq!(tree.kind(tree.next_sibling(lhs).unwrap()), SyntaxKind::Whitespace);
    }

    #[test]
    fn stamps_propagate_to_ancestors_only() {
        let mut tree = sample();
        let root = tree.root();
        let lhs = tree.first_child(root).unwrap();
        let rhs = tree.last_child(root).unwrap();
        let before_rhs = tree.stamp(rhs);

        let ident = tree.first_child(lhs).unwrap();
        tree.set_token_text(ident, "alpha");

        assert_eq!(tree.text(root), "alpha + b");
        assert_eq!(tree.stamp(lhs), tree.modification_count());
        assert_eq!(tree.stamp(root), tree.modification_count());
        assert_eq!(tree.stamp(rhs), before_rhs);
    }

    #[test]
    fn detach_insert_and_replace() {
        let mut tree = sample();
        let root = tree.root();
        let rhs = tree.last_child(root).unwrap();
        tree.detach(rhs);
        assert_eq!(tree.text(root), "a + ");
        assert!(!tree.is_attached(rhs));

        let c = tree.new_token(SyntaxKind::Ident, "c");
        let reference = tree.new_node(SyntaxKind::ReferenceExpression, vec![c]);
        tree.insert_at(root, 4, reference);
        assert_eq!(tree.text(root), "a + c");

        let copy = tree.deep_copy(reference);
        let lhs = tree.first_child(root).unwrap();
        tree.replace_raw(lhs, copy);
        assert_eq!(tree.text(root), "c + c");
        assert!(tree.check_consistency().is_empty());
    }

    #[test]
    fn graft_copies_between_trees() {
        let source = sample();
        let mut target = SyntaxTree::new(SyntaxKind::DummyHolder);
        let copy = target.graft(&source, source.root());
        let root = target.root();
        target.insert_at(root, 0, copy);
        assert_eq!(target.text(root), "a + b");
        assert_eq!(target.kind(copy), SyntaxKind::BinaryExpression);
    }

    #[test]
    fn debug_dump_lists_every_node() {
        let tree = sample();
        let dump = tree.debug_dump(tree.root());
        assert!(dump.starts_with("BinaryExpression\n"));
        assert!(dump.contains("  Plus \"+\""));
        assert_eq!(dump.lines().count(), 8);
    }
}
