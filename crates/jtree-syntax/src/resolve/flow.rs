// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Normal-completion analysis.
//!
//! A statement *can complete normally* when execution may fall through to
//! whatever follows it. The rules are the reachability rules of the Java
//! language, restricted to what can be decided syntactically: the only
//! constant expressions recognised are `true`, `false`, parentheses and `!`.

use crate::kinds::SyntaxKind::{self, *};
use crate::nodes::{self, AstNode, LambdaExpression};
use crate::roles::{self, find_child_by_role, find_children_by_role, Role};
use crate::tree::{NodeId, SyntaxTree};
use crate::visitor::{walk, VisitResult, Visitor};

/// Can `stmt` complete normally?
pub fn can_complete_normally(tree: &SyntaxTree, stmt: NodeId) -> bool {
    match tree.kind(stmt) {
        CodeBlock => block_completes(tree, stmt),
        BlockStatement => find_child_by_role(tree, stmt, Role::Body)
            .is_none_or(|block| block_completes(tree, block)),
        ReturnStatement | ThrowStatement | BreakStatement | ContinueStatement
        | YieldStatement => false,
        IfStatement => {
            let Some(other) = find_child_by_role(tree, stmt, Role::ElseBranch) else {
                return true;
            };
            let then_ok = find_child_by_role(tree, stmt, Role::ThenBranch)
                .is_none_or(|then| can_complete_normally(tree, then));
            then_ok || can_complete_normally(tree, other)
        }
        WhileStatement | ForStatement => {
            let endless = find_child_by_role(tree, stmt, Role::Condition)
                .is_none_or(|cond| is_constant_true(tree, cond));
            !endless || has_break_targeting(tree, stmt)
        }
        DoWhileStatement => {
            let endless = find_child_by_role(tree, stmt, Role::Condition)
                .is_some_and(|cond| is_constant_true(tree, cond));
            let body_ok = find_child_by_role(tree, stmt, Role::LoopBody)
                .is_none_or(|body| can_complete_normally(tree, body))
                || has_continue_targeting(tree, stmt);
            (!endless && body_ok) || has_break_targeting(tree, stmt)
        }
        LabeledStatement => match find_child_by_role(tree, stmt, Role::Statement) {
            Some(inner) => {
                can_complete_normally(tree, inner) || has_break_targeting(tree, inner)
            }
            None => true,
        },
        SwitchStatement => switch_completes(tree, stmt),
        TryStatement => try_completes(tree, stmt),
        SynchronizedStatement => find_child_by_role(tree, stmt, Role::Body)
            .is_none_or(|body| block_completes(tree, body)),
        _ => true,
    }
}

fn block_completes(tree: &SyntaxTree, block: NodeId) -> bool {
    find_children_by_role(tree, block, Role::Statement)
        .into_iter()
        .all(|s| can_complete_normally(tree, s))
}

fn has_default_label(tree: &SyntaxTree, labels: &[NodeId]) -> bool {
    labels
        .iter()
        .filter_map(|l| nodes::SwitchLabel::cast(tree, *l))
        .any(|l| l.is_default(tree))
}

fn switch_completes(tree: &SyntaxTree, switch: NodeId) -> bool {
    let Some(body) = find_child_by_role(tree, switch, Role::SwitchBody) else {
        return true;
    };
    let statements = find_children_by_role(tree, body, Role::Statement);
    let labels: Vec<NodeId> = statements
        .iter()
        .copied()
        .filter(|s| matches!(tree.kind(*s), SwitchLabelStatement | SwitchLabeledRule))
        .collect();
    if !has_default_label(tree, &labels) || has_break_targeting(tree, switch) {
        return true;
    }
    let rules: Vec<NodeId> = labels
        .iter()
        .copied()
        .filter(|l| tree.kind(*l) == SwitchLabeledRule)
        .collect();
    if !rules.is_empty() {
        return rules.iter().any(|rule| {
            find_child_by_role(tree, *rule, Role::Body).is_none_or(|body| {
                tree.kind(body) == ExpressionStatement || can_complete_normally(tree, body)
            })
        });
    }
    match statements.last() {
        None => true,
        Some(last) if tree.kind(*last) == SwitchLabelStatement => true,
        Some(last) => can_complete_normally(tree, *last),
    }
}

fn try_completes(tree: &SyntaxTree, stmt: NodeId) -> bool {
    if let Some(finally) = find_child_by_role(tree, stmt, Role::FinallyBlock) {
        if !block_completes(tree, finally) {
            return false;
        }
    }
    let try_ok = find_child_by_role(tree, stmt, Role::TryBlock)
        .is_none_or(|block| block_completes(tree, block));
    try_ok
        || find_children_by_role(tree, stmt, Role::CatchSection)
            .into_iter()
            .filter_map(|c| find_child_by_role(tree, c, Role::CatchBlock))
            .any(|block| block_completes(tree, block))
}

/// Looks for a jump statement whose target is a given statement.
struct JumpFinder {
    target: NodeId,
    kind: SyntaxKind,
    found: bool,
}

impl Visitor for JumpFinder {
    fn visit_node(&mut self, tree: &SyntaxTree, node: NodeId) -> VisitResult {
        let kind = tree.kind(node);
        if matches!(kind, Class | AnonymousClass) {
            return VisitResult::SkipChildren;
        }
        if kind != self.kind {
            return VisitResult::Continue;
        }
        let target = match kind {
            BreakStatement => roles::exit_target(tree, node),
            _ => roles::continue_target(tree, node),
        };
        if target == Some(self.target) {
            self.found = true;
            return VisitResult::Stop;
        }
        VisitResult::Continue
    }

    fn visit_lambda_expression(
        &mut self,
        _tree: &SyntaxTree,
        _node: LambdaExpression,
    ) -> VisitResult {
        VisitResult::SkipChildren
    }
}

fn has_jump_targeting(tree: &SyntaxTree, stmt: NodeId, kind: SyntaxKind) -> bool {
    let mut finder = JumpFinder {
        target: stmt,
        kind,
        found: false,
    };
    walk(tree, stmt, &mut finder);
    finder.found
}

/// Is there a `break` inside `stmt` that exits `stmt`?
pub fn has_break_targeting(tree: &SyntaxTree, stmt: NodeId) -> bool {
    has_jump_targeting(tree, stmt, BreakStatement)
}

/// Is there a `continue` inside `stmt` that restarts `stmt`?
pub fn has_continue_targeting(tree: &SyntaxTree, stmt: NodeId) -> bool {
    has_jump_targeting(tree, stmt, ContinueStatement)
}

fn constant_bool(tree: &SyntaxTree, expr: NodeId) -> Option<bool> {
    match tree.kind(expr) {
        LiteralExpression => {
            if tree.child_of_kind(expr, TrueKw).is_some() {
                Some(true)
            } else if tree.child_of_kind(expr, FalseKw).is_some() {
                Some(false)
            } else {
                None
            }
        }
        ParenthExpression => {
            find_child_by_role(tree, expr, Role::Expression).and_then(|e| constant_bool(tree, e))
        }
        PrefixExpression if tree.child_of_kind(expr, Bang).is_some() => {
            find_child_by_role(tree, expr, Role::Operand)
                .and_then(|e| constant_bool(tree, e))
                .map(|v| !v)
        }
        _ => None,
    }
}

/// Is `expr` a constant expression with value `true`?
pub fn is_constant_true(tree: &SyntaxTree, expr: NodeId) -> bool {
    constant_bool(tree, expr) == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_statement;

    fn completes(text: &str) -> bool {
        let tree = parse_statement(text).unwrap();
        let stmt = tree.significant_children(tree.root()).next().unwrap();
        can_complete_normally(&tree, stmt)
    }

    #[test]
    fn test_jumps_do_not_complete() {
        assert!(!completes("return;"));
        assert!(!completes("throw new Error();"));
        assert!(!completes("{ a(); return; }"));
        assert!(completes("{ a(); }"));
    }

    #[test]
    fn test_if() {
        assert!(completes("if (c) return;"));
        assert!(!completes("if (c) return; else throw e;"));
        assert!(completes("if (c) return; else b();"));
    }

    #[test]
    fn test_loops() {
        assert!(completes("while (c) { }"));
        assert!(!completes("while (true) { }"));
        assert!(!completes("while (!false) { }"));
        assert!(completes("while (true) { if (c) break; }"));
        assert!(!completes("for (;;) { }"));
        assert!(completes("for (;;) { break; }"));
        assert!(!completes("outer: for (;;) { for (;;) { break; } }"));
        assert!(completes("outer: for (;;) { for (;;) { break outer; } }"));
        assert!(!completes("do { } while (true);"));
        assert!(!completes("do { return; } while (c);"));
        assert!(completes("do { if (c) continue; return; } while (c);"));
    }

    #[test]
    fn test_break_in_lambda_is_ignored() {
        assert!(!completes("while (true) { Runnable r = () -> { while (true) { break; } }; }"));
    }

    #[test]
    fn test_switch() {
        assert!(completes("switch (x) { case 1: return; }"));
        assert!(!completes("switch (x) { case 1: return; default: throw e; }"));
        assert!(completes("switch (x) { case 1: break; default: return; }"));
        assert!(!completes("switch (x) { case 1 -> { return; } default -> throw e; }"));
        assert!(completes("switch (x) { case 1 -> a(); default -> throw e; }"));
    }

    #[test]
    fn test_try() {
        assert!(completes("try { return; } catch (Exception e) { }"));
        assert!(!completes("try { return; } catch (Exception e) { return; }"));
        assert!(!completes("try { } finally { return; }"));
    }

    #[test]
    fn test_constant_true() {
        let tree = parse_statement("while ((!(false))) {}").unwrap();
        let stmt = tree.significant_children(tree.root()).next().unwrap();
        let cond = find_child_by_role(&tree, stmt, Role::Condition).unwrap();
        assert!(is_constant_true(&tree, cond));
    }
}
