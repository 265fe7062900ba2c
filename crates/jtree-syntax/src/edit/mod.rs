// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Structural mutation of syntax trees.
//!
//! Every public operation keeps the tree printable as valid Java: adding an
//! element to a list inserts one separator, removing it removes one,
//! removing a mandatory part (a loop body, an `if` branch, a `for` header
//! section) substitutes a placeholder, and replacing an expression inserts
//! parentheses when operator precedence requires them.
//!
//! Edits go through [`insert_children`], [`add`], [`add_before`],
//! [`add_after`], [`delete_child`], [`replace`] and [`set_name`]. The
//! low-level primitives on [`SyntaxTree`] do no separator management and
//! are not meant for callers outside this crate.

mod blocks;
mod lists;
pub mod precedence;

use thiserror::Error;
use tracing::debug;

use crate::kinds::SyntaxKind;
use crate::parser::ParserError;
use crate::roles::{find_child_by_role, role_of, Role};
use crate::tree::{NodeId, SyntaxTree};

use SyntaxKind::*;

pub use precedence::needs_parentheses;

/// Errors returned by edit operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The node has no parent.
    #[error("{0} is not attached to a tree")]
    Detached(NodeId),

    /// The anchor is not a child of the node being edited.
    #[error("{child} is not a child of {parent}")]
    NotAChild { child: NodeId, parent: NodeId },

    /// Removing the node would leave its parent invalid.
    #[error("cannot delete mandatory {kind} from {parent}")]
    MandatoryChild {
        kind: SyntaxKind,
        parent: SyntaxKind,
    },

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Source text given to a factory did not parse.
    #[error("cannot create node: {0}")]
    Fragment(#[from] ParserError),

    /// The request does not make sense for the nodes involved.
    #[error("{0}")]
    Malformed(String),
}

pub type EditResult<T = ()> = Result<T, EditError>;

// ============================================================================
// Shared helpers
// ============================================================================

pub(crate) fn new_ws(tree: &mut SyntaxTree, text: &str) -> NodeId {
    tree.new_token(Whitespace, text)
}

/// Insert detached `tokens` into `parent` starting at `index`, in order.
pub(crate) fn insert_tokens(
    tree: &mut SyntaxTree,
    parent: NodeId,
    index: usize,
    tokens: Vec<NodeId>,
) {
    for (offset, token) in tokens.into_iter().enumerate() {
        tree.insert_at(parent, index + offset, token);
    }
}

pub(crate) fn detach_all(tree: &mut SyntaxTree, nodes: Vec<NodeId>) {
    for node in nodes {
        tree.detach(node);
    }
}

fn is_ws(tree: &SyntaxTree, node: Option<NodeId>) -> bool {
    node.is_some_and(|n| tree.kind(n) == Whitespace)
}

/// Whitespace token immediately before `node`, if any.
pub(crate) fn leading_ws(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    tree.prev_sibling(node).filter(|p| tree.kind(*p) == Whitespace)
}

/// Does any earlier sibling of `node` produce text?
pub(crate) fn has_text_before(tree: &SyntaxTree, node: NodeId) -> bool {
    let Some(parent) = tree.parent(node) else {
        return false;
    };
    tree.children(parent)
        .iter()
        .take_while(|c| **c != node)
        .any(|c| tree.text_len(*c) > 0)
}

fn has_text_after(tree: &SyntaxTree, node: NodeId) -> bool {
    let Some(parent) = tree.parent(node) else {
        return false;
    };
    tree.children(parent)
        .iter()
        .skip_while(|c| **c != node)
        .skip(1)
        .any(|c| tree.text_len(*c) > 0)
}

/// After `node` became empty, drop the whitespace that separated it from
/// its neighbours so no double or dangling space is left.
pub(crate) fn tidy_space_around(tree: &mut SyntaxTree, node: NodeId) {
    let prev = tree.prev_sibling(node);
    let next = tree.next_sibling(node);
    match (is_ws(tree, prev), is_ws(tree, next)) {
        (true, true) => {
            if let Some(prev) = prev {
                tree.detach(prev);
            }
        }
        (false, true) if !has_text_before(tree, node) => {
            if let Some(next) = next {
                tree.detach(next);
            }
        }
        (true, false) if !has_text_after(tree, node) => {
            if let Some(prev) = prev {
                tree.detach(prev);
            }
        }
        _ => {}
    }
}

/// The children of `parent` from `first` through `last`, inclusive.
fn range(tree: &SyntaxTree, parent: NodeId, first: NodeId, last: NodeId) -> Vec<NodeId> {
    let children = tree.children(parent);
    let (Some(a), Some(b)) = (
        children.iter().position(|c| *c == first),
        children.iter().position(|c| *c == last),
    ) else {
        return Vec::new();
    };
    children[a.min(b)..=a.max(b)].to_vec()
}

/// `node` plus the trivia between it and the previous significant sibling.
fn with_leading_trivia(tree: &SyntaxTree, node: NodeId) -> Vec<NodeId> {
    let mut doomed = vec![node];
    let mut cur = tree.prev_sibling(node);
    while let Some(p) = cur.filter(|p| tree.kind(*p).is_trivia()) {
        doomed.insert(0, p);
        cur = tree.prev_sibling(p);
    }
    doomed
}

fn empty_block_statement(tree: &mut SyntaxTree) -> NodeId {
    let open = tree.new_token(LBrace, "{");
    let close = tree.new_token(RBrace, "}");
    let block = tree.new_node(CodeBlock, vec![open, close]);
    tree.new_node(BlockStatement, vec![block])
}

fn ensure_detached(tree: &SyntaxTree, node: NodeId) -> EditResult {
    if tree.parent(node).is_some() || node == tree.root() {
        return Err(EditError::Malformed(format!(
            "{} is already part of a tree",
            node
        )));
    }
    Ok(())
}

// ============================================================================
// Identifiers
// ============================================================================

/// Is `name` usable as a Java identifier?
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    if !chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
        return false;
    }
    name != "_" && SyntaxKind::from_keyword(name).is_none()
}

/// Rename the declaration, reference or label `node`.
pub fn set_name(tree: &mut SyntaxTree, node: NodeId, name: &str) -> EditResult {
    if !is_identifier(name) {
        return Err(EditError::InvalidIdentifier(name.to_string()));
    }
    let ident = if tree.kind(node) == Ident {
        Some(node)
    } else {
        find_child_by_role(tree, node, Role::Name)
            .or_else(|| find_child_by_role(tree, node, Role::Label))
            .filter(|n| tree.kind(*n) == Ident)
    };
    let Some(ident) = ident else {
        return Err(EditError::Malformed(format!(
            "{} has no name to change",
            tree.kind(node)
        )));
    };
    debug!(node = %node, name, "set name");
    tree.set_token_text(ident, name);
    Ok(())
}

// ============================================================================
// Insertion
// ============================================================================

/// Insert detached `nodes` into `parent`. With an `anchor` they go before or
/// after it; otherwise they go to the natural end of `parent` (the end of a
/// list, the end of a block).
///
/// Each node is routed to the list or block of `parent` that holds nodes of
/// its kind, creating the list when it does not exist yet, and gets its
/// separators and spacing. Later nodes of a run follow the earlier ones.
/// Returns the first inserted node.
pub fn insert_children(
    tree: &mut SyntaxTree,
    parent: NodeId,
    nodes: &[NodeId],
    anchor: Option<NodeId>,
    before: bool,
) -> EditResult<NodeId> {
    let Some(first) = nodes.first().copied() else {
        return Err(EditError::Malformed("nothing to insert".to_string()));
    };
    if tree.is_token(parent) {
        return Err(EditError::Malformed(format!(
            "{} is a token and cannot hold children",
            tree.kind(parent)
        )));
    }
    for node in nodes {
        ensure_detached(tree, *node)?;
    }
    if let Some(anchor) = anchor {
        if tree.parent(anchor) != Some(parent) {
            return Err(EditError::NotAChild {
                child: anchor,
                parent,
            });
        }
    }
    let mut prev = insert_one(tree, parent, first, anchor, before)?;
    for node in &nodes[1..] {
        // The rest of the run follows the node inserted before it, wherever
        // that one was routed.
        let holder = tree.parent(prev).ok_or(EditError::Detached(prev))?;
        prev = insert_one(tree, holder, *node, Some(prev), false)?;
    }
    Ok(first)
}

/// Add `node` at the natural end of `parent`.
pub fn add(tree: &mut SyntaxTree, parent: NodeId, node: NodeId) -> EditResult<NodeId> {
    insert_children(tree, parent, &[node], None, false)
}

/// Add `node` right before its future sibling `anchor`.
pub fn add_before(tree: &mut SyntaxTree, anchor: NodeId, node: NodeId) -> EditResult<NodeId> {
    let parent = tree.parent(anchor).ok_or(EditError::Detached(anchor))?;
    insert_children(tree, parent, &[node], Some(anchor), true)
}

/// Add `node` right after its future sibling `anchor`.
pub fn add_after(tree: &mut SyntaxTree, anchor: NodeId, node: NodeId) -> EditResult<NodeId> {
    let parent = tree.parent(anchor).ok_or(EditError::Detached(anchor))?;
    insert_children(tree, parent, &[node], Some(anchor), false)
}

fn insert_one(
    tree: &mut SyntaxTree,
    parent: NodeId,
    node: NodeId,
    anchor: Option<NodeId>,
    before: bool,
) -> EditResult<NodeId> {
    let kind = tree.kind(node);
    let target = lists::redirect(tree, parent, node)?;
    // Anchors are children of `parent`; they only apply when the node lands
    // there.
    let anchor = anchor.filter(|a| tree.parent(*a) == Some(target));
    debug!(
        parent = %tree.kind(parent),
        target = %tree.kind(target),
        kind = %kind,
        "insert"
    );

    let target_kind = tree.kind(target);
    if lists::list_shape(target_kind).is_some() {
        return lists::insert(tree, target, node, anchor, before);
    }
    if blocks::is_block(target_kind) {
        return blocks::insert(tree, target, node, anchor, before);
    }
    match (target_kind, kind) {
        (IfStatement, _) if kind.is_statement() && anchor.is_none() => {
            if find_child_by_role(tree, target, Role::ElseBranch).is_some() {
                return Err(EditError::Malformed(
                    "if statement already has an else branch".to_string(),
                ));
            }
            blocks::add_else(tree, target, node)
        }
        (TryStatement, CatchSection) => blocks::add_catch(tree, target, node, anchor, before),
        _ => {
            let index = match anchor {
                Some(a) => {
                    let i = tree.index_in_parent(a).unwrap_or(0);
                    if before {
                        i
                    } else {
                        i + 1
                    }
                }
                None => tree.children(target).len(),
            };
            tree.insert_at(target, index, node);
            Ok(node)
        }
    }
}

// ============================================================================
// Replacement
// ============================================================================

/// Put the detached `new` where `old` is. An expression that would bind
/// differently in `old`'s slot is wrapped in parentheses first. Returns the
/// node that now occupies the slot.
pub fn replace(tree: &mut SyntaxTree, old: NodeId, new: NodeId) -> EditResult<NodeId> {
    if tree.parent(old).is_none() {
        return Err(EditError::Detached(old));
    }
    ensure_detached(tree, new)?;
    let new = if needs_parentheses(tree, old, new) {
        let open = tree.new_token(LParen, "(");
        let close = tree.new_token(RParen, ")");
        tree.new_node(ParenthExpression, vec![open, new, close])
    } else {
        new
    };
    debug!(old = %tree.kind(old), new = %tree.kind(new), "replace");
    tree.replace_raw(old, new);
    Ok(new)
}

// ============================================================================
// Deletion
// ============================================================================

/// Remove `child` from its parent, keeping the parent valid.
pub fn delete_child(tree: &mut SyntaxTree, child: NodeId) -> EditResult {
    let parent = tree.parent(child).ok_or(EditError::Detached(child))?;
    let kind = tree.kind(child);
    let parent_kind = tree.kind(parent);
    if kind.is_trivia() || parent_kind == DummyHolder {
        tree.detach(child);
        return Ok(());
    }
    debug!(kind = %kind, parent = %parent_kind, "delete");

    if lists::list_shape(parent_kind).is_some() && lists::is_element(tree, parent, child) {
        return lists::delete(tree, parent, child);
    }
    if blocks::is_block(parent_kind) && blocks::is_member(tree, parent, child) {
        return blocks::delete(tree, parent, child);
    }

    let mandatory = EditError::MandatoryChild {
        kind,
        parent: parent_kind,
    };
    let Some(role) = role_of(tree, child) else {
        return Err(mandatory);
    };
    match (parent_kind, role) {
        (_, Role::LoopBody) | (IfStatement, Role::ThenBranch) => {
            let block = empty_block_statement(tree);
            tree.replace_raw(child, block);
            Ok(())
        }
        (IfStatement, Role::ElseBranch) => blocks::delete_else(tree, parent, child),
        (ForStatement, Role::ForInitialization) => {
            if kind != EmptyStatement {
                let semi = tree.new_token(Semicolon, ";");
                let empty = tree.new_node(EmptyStatement, vec![semi]);
                tree.replace_raw(child, empty);
            }
            Ok(())
        }
        (ForStatement, Role::ForUpdate) => {
            if tree.text_len(child) > 0 {
                let empty = tree.new_node(EmptyStatement, Vec::new());
                tree.replace_raw(child, empty);
            }
            Ok(())
        }
        (ForStatement, Role::Condition) | (ReturnStatement, Role::Expression) => {
            let doomed = with_leading_trivia(tree, child);
            detach_all(tree, doomed);
            Ok(())
        }
        (ResourceVariable, Role::Initializer) => Err(mandatory),
        (_, Role::Initializer) => remove_after_token(tree, parent, child, SyntaxKind::Eq),
        (AssertStatement, Role::AssertDescription) => {
            remove_after_token(tree, parent, child, SyntaxKind::Colon)
        }
        (SwitchLabelStatement | SwitchLabeledRule, Role::Guard) => {
            remove_after_token(tree, parent, child, WhenKw)
        }
        (ExpressionStatement, Role::Expression) | (DeclarationStatement, Role::Declaration) => {
            delete_child(tree, parent)
        }
        (ResourceExpression, Role::Expression) => delete_child(tree, parent),
        (PolyadicExpression | BinaryExpression, Role::Operand | Role::LOperand | Role::ROperand) => {
            delete_operand(tree, parent, child)
        }
        (Method, Role::Body) => {
            let semi = tree.new_token(Semicolon, ";");
            if let Some(ws) = leading_ws(tree, child) {
                tree.detach(ws);
            }
            tree.replace_raw(child, semi);
            Ok(())
        }
        (TryStatement, Role::CatchSection | Role::ResourceList) => {
            let doomed = with_leading_trivia(tree, child);
            detach_all(tree, doomed);
            Ok(())
        }
        (TryStatement, Role::FinallyBlock) => {
            let Some(keyword) = tree.child_of_kind(parent, FinallyKw) else {
                return Err(mandatory);
            };
            let mut doomed = with_leading_trivia(tree, keyword);
            doomed.extend(range(tree, parent, keyword, child).into_iter().skip(1));
            detach_all(tree, doomed);
            Ok(())
        }
        (
            Class | Method | Annotation | TypeParameter,
            Role::TypeParameterList
            | Role::ExtendsList
            | Role::ImplementsList
            | Role::PermitsList
            | Role::ThrowsList
            | Role::AnnotationParameterList
            | Role::BoundList,
        ) => lists::clear(tree, child),
        (JavaFile, Role::PackageStatement) => {
            let mut doomed = vec![child];
            if let Some(next) = tree.next_sibling(child).filter(|n| tree.kind(*n) == Whitespace) {
                doomed.push(next);
            }
            detach_all(tree, doomed);
            Ok(())
        }
        _ => Err(mandatory),
    }
}

/// Remove `child` together with the `token` that introduces it and the
/// trivia around that token: `x = 1` loses ` = 1`, `assert c : m` loses
/// ` : m`.
fn remove_after_token(
    tree: &mut SyntaxTree,
    parent: NodeId,
    child: NodeId,
    token: SyntaxKind,
) -> EditResult {
    let introducer = tree
        .children(parent)
        .iter()
        .copied()
        .take_while(|c| *c != child)
        .filter(|c| tree.kind(*c) == token)
        .last();
    let Some(introducer) = introducer else {
        return Err(EditError::Malformed(format!(
            "{} has no {} before its {}",
            tree.kind(parent),
            token,
            tree.kind(child)
        )));
    };
    let mut doomed = with_leading_trivia(tree, introducer);
    doomed.extend(range(tree, parent, introducer, child).into_iter().skip(1));
    detach_all(tree, doomed);
    Ok(())
}

/// Remove one operand of a binary or polyadic expression along with one
/// adjacent operator. An expression left with a single operand is replaced
/// by it.
fn delete_operand(tree: &mut SyntaxTree, expr: NodeId, operand: NodeId) -> EditResult {
    let operands: Vec<NodeId> = tree
        .children(expr)
        .iter()
        .copied()
        .filter(|c| tree.kind(*c).is_expression())
        .collect();
    let Some(index) = operands.iter().position(|o| *o == operand) else {
        return Err(EditError::NotAChild {
            child: operand,
            parent: expr,
        });
    };
    let doomed = if index == 0 {
        let Some(next) = operands.get(1).copied() else {
            return Err(EditError::MandatoryChild {
                kind: tree.kind(operand),
                parent: tree.kind(expr),
            });
        };
        // Everything up to (not including) the next operand.
        let mut span = range(tree, expr, operand, next);
        span.pop();
        span
    } else {
        let prev = operands[index - 1];
        let mut span = range(tree, expr, prev, operand);
        span.remove(0);
        span
    };
    detach_all(tree, doomed);

    match operands.len() - 1 {
        1 => {
            let Some(rest) = operands.iter().copied().find(|o| *o != operand) else {
                return Ok(());
            };
            tree.detach(rest);
            tree.replace_raw(expr, rest);
        }
        2 if tree.kind(expr) == PolyadicExpression => tree.set_kind(expr, BinaryExpression),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_compilation_unit, parse_expression, parse_statement};

    fn find_kind(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
        tree.descendants(tree.root())
            .find(|n| tree.kind(*n) == kind)
            .unwrap_or_else(|| panic!("no {} in tree", kind))
    }

    fn text(tree: &SyntaxTree) -> String {
        tree.text(tree.root())
    }

    fn expr_node(tree: &mut SyntaxTree, src: &str) -> NodeId {
        let fragment = parse_expression(src).unwrap();
        let top = fragment.significant_children(fragment.root()).next().unwrap();
        tree.graft(&fragment, top)
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_identifier("foo"));
        assert!(is_identifier("$x_1"));
        assert!(is_identifier("record"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("class"));
        assert!(!is_identifier("null"));
        assert!(!is_identifier("_"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }

    #[test]
    fn test_set_name_on_method() {
        let mut tree = parse_compilation_unit("class A { void foo() {} }").unwrap();
        let method = find_kind(&tree, Method);
        set_name(&mut tree, method, "bar").unwrap();
        assert_eq!(text(&tree), "class A { void bar() {} }");
        assert_eq!(
            set_name(&mut tree, method, "int"),
            Err(EditError::InvalidIdentifier("int".to_string()))
        );
    }

    #[test]
    fn test_add_argument_to_empty_call() {
        let mut tree = parse_expression("foo()").unwrap();
        let call = find_kind(&tree, MethodCallExpression);
        let arg = expr_node(&mut tree, "x");
        add(&mut tree, call, arg).unwrap();
        assert_eq!(text(&tree), "foo(x)");
        let arg = expr_node(&mut tree, "y");
        add(&mut tree, call, arg).unwrap();
        assert_eq!(text(&tree), "foo(x, y)");
    }

    #[test]
    fn test_add_before_first_argument() {
        let mut tree = parse_expression("foo(b)").unwrap();
        let list = find_kind(&tree, ExpressionList);
        let b = tree.significant_children(list).nth(1).unwrap();
        let a = expr_node(&mut tree, "a");
        add_before(&mut tree, b, a).unwrap();
        assert_eq!(text(&tree), "foo(a, b)");
        delete_child(&mut tree, a).unwrap();
        assert_eq!(text(&tree), "foo(b)");
    }

    #[test]
    fn test_delete_middle_argument() {
        let mut tree = parse_expression("foo(a, b, c)").unwrap();
        let list = find_kind(&tree, ExpressionList);
        let b = lists::elements(&tree, list)[1];
        delete_child(&mut tree, b).unwrap();
        assert_eq!(text(&tree), "foo(a, c)");
        let c = lists::elements(&tree, list)[1];
        delete_child(&mut tree, c).unwrap();
        assert_eq!(text(&tree), "foo(a)");
        let a = lists::elements(&tree, list)[0];
        delete_child(&mut tree, a).unwrap();
        assert_eq!(text(&tree), "foo()");
    }

    #[test]
    fn test_delete_loop_body_leaves_block() {
        let mut tree = parse_statement("while (x) foo();").unwrap();
        let stmt = find_kind(&tree, WhileStatement);
        let body = find_child_by_role(&tree, stmt, Role::LoopBody).unwrap();
        delete_child(&mut tree, body).unwrap();
        assert_eq!(text(&tree), "while (x) {}");
    }

    #[test]
    fn test_delete_if_condition_is_refused() {
        let mut tree = parse_statement("if (x) foo();").unwrap();
        let stmt = find_kind(&tree, IfStatement);
        let cond = find_child_by_role(&tree, stmt, Role::Condition).unwrap();
        assert!(matches!(
            delete_child(&mut tree, cond),
            Err(EditError::MandatoryChild { .. })
        ));
        assert_eq!(text(&tree), "if (x) foo();");
    }

    #[test]
    fn test_delete_else_branch() {
        let mut tree = parse_statement("if (x) a(); else b();").unwrap();
        let stmt = find_kind(&tree, IfStatement);
        let other = find_child_by_role(&tree, stmt, Role::ElseBranch).unwrap();
        delete_child(&mut tree, other).unwrap();
        assert_eq!(text(&tree), "if (x) a();");
    }

    #[test]
    fn test_add_else_branch() {
        let mut tree = parse_statement("if (x) a();").unwrap();
        let stmt = find_kind(&tree, IfStatement);
        let fragment = parse_statement("b();").unwrap();
        let top = fragment.significant_children(fragment.root()).next().unwrap();
        let other = tree.graft(&fragment, top);
        add(&mut tree, stmt, other).unwrap();
        assert_eq!(text(&tree), "if (x) a(); else b();");
        assert_eq!(role_of(&tree, other), Some(Role::ElseBranch));
    }

    #[test]
    fn test_delete_for_sections() {
        let mut tree = parse_statement("for (int i = 0; i < n; i++) {}").unwrap();
        let stmt = find_kind(&tree, ForStatement);
        let init = find_child_by_role(&tree, stmt, Role::ForInitialization).unwrap();
        delete_child(&mut tree, init).unwrap();
        assert_eq!(text(&tree), "for (; i < n; i++) {}");
        let update = find_child_by_role(&tree, stmt, Role::ForUpdate).unwrap();
        delete_child(&mut tree, update).unwrap();
        assert_eq!(text(&tree), "for (; i < n; ) {}");
        let cond = find_child_by_role(&tree, stmt, Role::Condition).unwrap();
        delete_child(&mut tree, cond).unwrap();
        assert_eq!(text(&tree), "for (;; ) {}");
        let update = find_child_by_role(&tree, stmt, Role::ForUpdate).unwrap();
        assert_eq!(tree.kind(update), EmptyStatement);
    }

    #[test]
    fn test_delete_polyadic_operand() {
        let mut tree = parse_expression("a && b && c").unwrap();
        let expr = find_kind(&tree, PolyadicExpression);
        let b = tree.significant_children(expr).nth(2).unwrap();
        assert_eq!(tree.text(b), "b");
        delete_child(&mut tree, b).unwrap();
        assert_eq!(text(&tree), "a && c");
        assert_eq!(tree.kind(expr), BinaryExpression);
        let a = find_child_by_role(&tree, expr, Role::LOperand).unwrap();
        delete_child(&mut tree, a).unwrap();
        assert_eq!(text(&tree), "c");
        assert!(!tree.is_attached(expr));
    }

    #[test]
    fn test_delete_initializer() {
        let mut tree = parse_statement("int x = 1;").unwrap();
        let var = find_kind(&tree, LocalVariable);
        let init = find_child_by_role(&tree, var, Role::Initializer).unwrap();
        delete_child(&mut tree, init).unwrap();
        assert_eq!(text(&tree), "int x;");
    }

    #[test]
    fn test_replace_adds_parentheses() {
        let mut tree = parse_expression("a * b").unwrap();
        let expr = find_kind(&tree, BinaryExpression);
        let b = find_child_by_role(&tree, expr, Role::ROperand).unwrap();
        let sum = expr_node(&mut tree, "c + d");
        let placed = replace(&mut tree, b, sum).unwrap();
        assert_eq!(tree.kind(placed), ParenthExpression);
        assert_eq!(text(&tree), "a * (c + d)");
    }

    #[test]
    fn test_replace_without_parentheses() {
        let mut tree = parse_expression("a + b").unwrap();
        let expr = find_kind(&tree, BinaryExpression);
        let b = find_child_by_role(&tree, expr, Role::ROperand).unwrap();
        let product = expr_node(&mut tree, "c * d");
        replace(&mut tree, b, product).unwrap();
        assert_eq!(text(&tree), "a + c * d");
    }

    fn stmt_node(tree: &mut SyntaxTree, src: &str) -> NodeId {
        let fragment = parse_statement(src).unwrap();
        let top = fragment.significant_children(fragment.root()).next().unwrap();
        tree.graft(&fragment, top)
    }

    #[test]
    fn test_insert_run_of_arguments() {
        let mut tree = parse_expression("f(a)").unwrap();
        let list = find_kind(&tree, ExpressionList);
        let b = expr_node(&mut tree, "b");
        let c = expr_node(&mut tree, "c");
        let first = insert_children(&mut tree, list, &[b, c], None, false).unwrap();
        assert_eq!(first, b);
        assert_eq!(text(&tree), "f(a, b, c)");
        assert!(tree.check_consistency().is_empty());
    }

    #[test]
    fn test_insert_run_before_anchor() {
        let mut tree = parse_expression("f(z)").unwrap();
        let call = find_kind(&tree, MethodCallExpression);
        let list = find_kind(&tree, ExpressionList);
        let z = lists::elements(&tree, list)[0];
        let x = expr_node(&mut tree, "x");
        let y = expr_node(&mut tree, "y");
        insert_children(&mut tree, list, &[x, y], Some(z), true).unwrap();
        assert_eq!(text(&tree), "f(x, y, z)");

        // Routed through the call, like a single argument would be
        let v = expr_node(&mut tree, "v");
        let w = expr_node(&mut tree, "w");
        insert_children(&mut tree, call, &[v, w], None, false).unwrap();
        assert_eq!(text(&tree), "f(x, y, z, v, w)");
    }

    #[test]
    fn test_insert_run_of_statements() {
        let mut tree = parse_statement("{ a(); }").unwrap();
        let block = find_kind(&tree, CodeBlock);
        let b = stmt_node(&mut tree, "b();");
        let c = stmt_node(&mut tree, "c();");
        insert_children(&mut tree, block, &[b, c], None, false).unwrap();
        assert_eq!(text(&tree), "{ a(); b(); c(); }");
    }

    #[test]
    fn test_insert_attached_node_is_refused() {
        let mut tree = parse_expression("foo(a)").unwrap();
        let list = find_kind(&tree, ExpressionList);
        let a = lists::elements(&tree, list)[0];
        assert!(matches!(
            add(&mut tree, list, a),
            Err(EditError::Malformed(_))
        ));
    }

    #[test]
    fn test_anchor_must_be_child() {
        let mut tree = parse_expression("foo(a)").unwrap();
        let call = find_kind(&tree, MethodCallExpression);
        let list = find_kind(&tree, ExpressionList);
        let a = lists::elements(&tree, list)[0];
        let b = expr_node(&mut tree, "b");
        assert!(matches!(
            insert_children(&mut tree, call, &[b], Some(a), true),
            Err(EditError::NotAChild { .. })
        ));
    }
}
