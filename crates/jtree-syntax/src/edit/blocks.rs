// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Whitespace-separated containers: code blocks, class bodies, the import
//! list and the file itself. New elements copy the indentation of their
//! neighbours.

use crate::kinds::SyntaxKind;
use crate::tree::{NodeId, SyntaxTree};

use super::{detach_all, insert_tokens, leading_ws, new_ws, EditResult};

use SyntaxKind::*;

pub(crate) fn is_block(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        CodeBlock | Class | AnonymousClass | EnumConstantInitializer | JavaFile | ImportList
    )
}

/// Is `child` one of the statements or members held by `block`?
pub(crate) fn is_member(tree: &SyntaxTree, block: NodeId, child: NodeId) -> bool {
    let kind = tree.kind(child);
    match tree.kind(block) {
        CodeBlock => kind.is_statement(),
        Class | AnonymousClass | EnumConstantInitializer => {
            matches!(kind, Method | Field | Class | ClassInitializer | EnumConstant)
        }
        JavaFile => kind == Class,
        ImportList => kind == ImportStatement,
        _ => false,
    }
}

fn members(tree: &SyntaxTree, block: NodeId) -> Vec<NodeId> {
    tree.children(block)
        .iter()
        .copied()
        .filter(|c| is_member(tree, block, *c))
        .collect()
}

fn ws_text(tree: &SyntaxTree, node: Option<NodeId>) -> Option<String> {
    node.and_then(|n| tree.token_text(n)).map(str::to_string)
}

/// Insert `node` into `block`, before or after `anchor` or after the last
/// member.
pub(crate) fn insert(
    tree: &mut SyntaxTree,
    block: NodeId,
    node: NodeId,
    anchor: Option<NodeId>,
    before: bool,
) -> EditResult<NodeId> {
    let anchor = anchor.filter(|a| is_member(tree, block, *a));
    match anchor {
        Some(anchor) => {
            let lead = ws_text(tree, leading_ws(tree, anchor)).unwrap_or_else(|| " ".to_string());
            let index = tree.index_in_parent(anchor).unwrap_or(0);
            if before {
                let space = new_ws(tree, &lead);
                insert_tokens(tree, block, index, vec![node, space]);
            } else {
                let space = new_ws(tree, &lead);
                insert_tokens(tree, block, index + 1, vec![space, node]);
            }
        }
        None => match members(tree, block).last().copied() {
            Some(last) => {
                let lead = ws_text(tree, leading_ws(tree, last)).unwrap_or_else(|| {
                    if tree.kind(block) == JavaFile || tree.kind(block) == ImportList {
                        "\n".to_string()
                    } else {
                        " ".to_string()
                    }
                });
                let index = tree.index_in_parent(last).map_or(0, |i| i + 1);
                let space = new_ws(tree, &lead);
                insert_tokens(tree, block, index, vec![space, node]);
            }
            None => insert_into_empty(tree, block, node),
        },
    }
    Ok(node)
}

fn insert_into_empty(tree: &mut SyntaxTree, block: NodeId, node: NodeId) {
    let Some(open) = tree.child_of_kind(block, LBrace) else {
        let len = tree.children(block).len();
        tree.insert_at(block, len, node);
        return;
    };
    let open_index = tree.index_in_parent(open).unwrap_or(0);
    let inner = tree.next_sibling(open).filter(|n| tree.kind(*n) == Whitespace);
    match inner.and_then(|ws| tree.token_text(ws).map(|t| (ws, t.to_string()))) {
        None => {
            // `{}` becomes `{ node }`.
            let a = new_ws(tree, " ");
            let b = new_ws(tree, " ");
            insert_tokens(tree, block, open_index + 1, vec![a, node, b]);
        }
        Some((_, text)) if text.contains('\n') => {
            // `{\n<indent>}`: the member goes on its own line, one level in.
            let indent = format!("{}    ", text);
            let space = new_ws(tree, &indent);
            insert_tokens(tree, block, open_index + 1, vec![space, node]);
        }
        Some((ws, _)) => {
            let index = tree.index_in_parent(ws).map_or(open_index + 1, |i| i + 1);
            let space = new_ws(tree, " ");
            insert_tokens(tree, block, index, vec![node, space]);
        }
    }
}

/// Remove a member together with the whitespace that insertion would have
/// added for it.
pub(crate) fn delete(tree: &mut SyntaxTree, block: NodeId, child: NodeId) -> EditResult {
    let sole = members(tree, block).len() == 1;
    let prev = tree.prev_sibling(child);
    let next = tree.next_sibling(child);
    let is_space = |n: Option<NodeId>| n.and_then(|n| tree.token_text(n)) == Some(" ");
    let is_ws = |n: Option<NodeId>| n.is_some_and(|n| tree.kind(n) == Whitespace);

    let mut doomed = vec![child];
    if sole && is_space(prev) && is_space(next) && tree.child_of_kind(block, LBrace).is_some() {
        // `{ node }` collapses back to `{}`.
        doomed.extend(prev);
        doomed.extend(next);
    } else if is_ws(prev) {
        doomed.extend(prev);
    } else if is_ws(next) {
        doomed.extend(next);
    }
    detach_all(tree, doomed);
    Ok(())
}

/// Append ` else node` to an `if` statement.
pub(crate) fn add_else(tree: &mut SyntaxTree, if_stmt: NodeId, node: NodeId) -> EditResult<NodeId> {
    let len = tree.children(if_stmt).len();
    let tokens = vec![
        new_ws(tree, " "),
        tree.new_token(ElseKw, "else"),
        new_ws(tree, " "),
        node,
    ];
    insert_tokens(tree, if_stmt, len, tokens);
    Ok(node)
}

/// Remove ` else node` from an `if` statement.
pub(crate) fn delete_else(tree: &mut SyntaxTree, if_stmt: NodeId, branch: NodeId) -> EditResult {
    let children = tree.children(if_stmt).to_vec();
    let Some(keyword) = children.iter().position(|c| tree.kind(*c) == ElseKw) else {
        tree.detach(branch);
        return Ok(());
    };
    let mut start = keyword;
    while start > 0 && tree.kind(children[start - 1]).is_trivia() {
        start -= 1;
    }
    let end = children
        .iter()
        .position(|c| *c == branch)
        .unwrap_or(children.len() - 1);
    detach_all(tree, children[start..=end].to_vec());
    Ok(())
}

/// Add a catch section to a `try`, before the `finally` clause if there is
/// one.
pub(crate) fn add_catch(
    tree: &mut SyntaxTree,
    try_stmt: NodeId,
    node: NodeId,
    anchor: Option<NodeId>,
    before: bool,
) -> EditResult<NodeId> {
    if let Some(anchor) = anchor.filter(|a| tree.kind(*a) == CatchSection) {
        let index = tree.index_in_parent(anchor).unwrap_or(0);
        let space = new_ws(tree, " ");
        if before {
            insert_tokens(tree, try_stmt, index, vec![node, space]);
        } else {
            insert_tokens(tree, try_stmt, index + 1, vec![space, node]);
        }
        return Ok(node);
    }
    match tree.child_of_kind(try_stmt, FinallyKw) {
        Some(finally) => {
            let mut index = tree.index_in_parent(finally).unwrap_or(0);
            // Keep the new section after the whitespace before `finally`.
            if let Some(ws) = leading_ws(tree, finally) {
                index = tree.index_in_parent(ws).unwrap_or(index);
            }
            let space = new_ws(tree, " ");
            insert_tokens(tree, try_stmt, index, vec![space, node]);
        }
        None => {
            let len = tree.children(try_stmt).len();
            let space = new_ws(tree, " ");
            insert_tokens(tree, try_stmt, len, vec![space, node]);
        }
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use crate::edit::{add, add_after, add_before, delete_child};
    use crate::kinds::SyntaxKind::{self, *};
    use crate::parser::{parse_code_block, parse_compilation_unit, parse_member, parse_statement};
    use crate::tree::{NodeId, SyntaxTree};

    fn find_kind(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
        tree.descendants(tree.root())
            .find(|n| tree.kind(*n) == kind)
            .unwrap_or_else(|| panic!("no {} in tree", kind))
    }

    fn statement(tree: &mut SyntaxTree, src: &str) -> NodeId {
        let fragment = parse_statement(src).unwrap();
        let top = fragment.significant_children(fragment.root()).next().unwrap();
        tree.graft(&fragment, top)
    }

    #[test]
    fn test_add_to_empty_block_and_back() {
        let mut tree = parse_code_block("{}").unwrap();
        let block = find_kind(&tree, CodeBlock);
        let stmt = statement(&mut tree, "foo();");
        add(&mut tree, block, stmt).unwrap();
        assert_eq!(tree.text(tree.root()), "{ foo(); }");
        delete_child(&mut tree, stmt).unwrap();
        assert_eq!(tree.text(tree.root()), "{}");
    }

    #[test]
    fn test_add_after_last_copies_indent() {
        let mut tree = parse_code_block("{\n    a();\n}").unwrap();
        let block = find_kind(&tree, CodeBlock);
        let stmt = statement(&mut tree, "b();");
        add(&mut tree, block, stmt).unwrap();
        assert_eq!(tree.text(tree.root()), "{\n    a();\n    b();\n}");
        delete_child(&mut tree, stmt).unwrap();
        assert_eq!(tree.text(tree.root()), "{\n    a();\n}");
    }

    #[test]
    fn test_add_before_and_after_anchor() {
        let mut tree = parse_code_block("{ a(); }").unwrap();
        let block = find_kind(&tree, CodeBlock);
        let a = find_kind(&tree, ExpressionStatement);
        let first = statement(&mut tree, "first();");
        add_before(&mut tree, a, first).unwrap();
        assert_eq!(tree.text(block), "{ first(); a(); }");
        let last = statement(&mut tree, "last();");
        add_after(&mut tree, a, last).unwrap();
        assert_eq!(tree.text(block), "{ first(); a(); last(); }");
    }

    #[test]
    fn test_add_to_indented_empty_block() {
        let mut tree = parse_code_block("{\n}").unwrap();
        let block = find_kind(&tree, CodeBlock);
        let stmt = statement(&mut tree, "x();");
        add(&mut tree, block, stmt).unwrap();
        assert_eq!(tree.text(block), "{\n    x();\n}");
    }

    #[test]
    fn test_add_method_to_class() {
        let mut tree = parse_compilation_unit("class A {\n    int x;\n}").unwrap();
        let class = find_kind(&tree, Class);
        let fragment = parse_member("void m() {}").unwrap();
        let top = fragment.significant_children(fragment.root()).next().unwrap();
        let method = tree.graft(&fragment, top);
        add(&mut tree, class, method).unwrap();
        assert_eq!(tree.text(tree.root()), "class A {\n    int x;\n    void m() {}\n}");
    }

    #[test]
    fn test_add_catch_before_finally() {
        let mut tree = parse_statement("try { } finally { }").unwrap();
        let stmt = find_kind(&tree, TryStatement);
        let fragment = parse_statement("try { } catch (Exception e) { }").unwrap();
        let section = find_kind(&fragment, CatchSection);
        let section = tree.graft(&fragment, section);
        add(&mut tree, stmt, section).unwrap();
        assert_eq!(
            tree.text(tree.root()),
            "try { } catch (Exception e) { } finally { }"
        );
        delete_child(&mut tree, section).unwrap();
        assert_eq!(tree.text(tree.root()), "try { } finally { }");
    }
}
