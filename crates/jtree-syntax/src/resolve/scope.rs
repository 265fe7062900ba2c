// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The upward scope walk.
//!
//! [`tree_walk_up`] climbs from the query position to the root. At every
//! ancestor, [`process_declarations`] offers the processor the declarations
//! that ancestor makes visible to the child the walk came from. Pattern
//! variables are gated on the polarity of the condition that introduces
//! them: `x instanceof Foo f` binds `f` where the test held.

use tracing::{trace, warn};

use crate::kinds::SyntaxKind::*;
use crate::nodes::{self, AstNode};
use crate::roles::{find_child_by_role, find_children_by_role, role_of, Role};
use crate::tree::{NodeId, SyntaxTree};

use super::context::ResolveContext;
use super::flow::{can_complete_normally, has_break_targeting};
use super::{offer, Polarity, ResolveState, ScopeProcessor};

/// How a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WalkOutcome {
    /// Reached the root.
    Completed,
    /// The processor asked to stop.
    Stopped,
    /// A parent did not list the child the walk came from.
    Malformed,
}

/// Walk from `place` to the root, feeding declarations to `processor`.
pub(crate) fn tree_walk_up<P: ScopeProcessor + ?Sized>(
    tree: &SyntaxTree,
    ctx: &mut ResolveContext,
    processor: &mut P,
    place: NodeId,
    state: ResolveState,
) -> WalkOutcome {
    let mut last_parent = None;
    let mut current = Some(place);
    while let Some(node) = current {
        if let Some(lp) = last_parent {
            if tree.index_in_parent(lp).is_none() {
                warn!(node = %node, child = %lp, "parent does not list child, ending scope walk");
                debug_assert!(false, "{} is not a child of {}", lp, node);
                return WalkOutcome::Malformed;
            }
        }
        if !process_declarations(tree, ctx, node, processor, state, last_parent, place) {
            return WalkOutcome::Stopped;
        }
        last_parent = Some(node);
        current = tree.parent(node);
    }
    WalkOutcome::Completed
}

/// Offer `processor` the declarations `node` makes visible to its child
/// `last_parent`. Returns `false` when the processor wants the walk to stop.
///
/// With no `last_parent` the query sits on `node` itself, which makes
/// nothing visible to itself.
pub fn process_declarations<P: ScopeProcessor + ?Sized>(
    tree: &SyntaxTree,
    ctx: &mut ResolveContext,
    node: NodeId,
    processor: &mut P,
    state: ResolveState,
    last_parent: Option<NodeId>,
    place: NodeId,
) -> bool {
    let Some(lp) = last_parent else {
        return true;
    };
    let role = role_of(tree, lp);
    trace!(node = %node, kind = %tree.kind(node), place = %place, ?role, "process declarations");

    let visible: Vec<NodeId> = match tree.kind(node) {
        CodeBlock => return process_block(tree, ctx, node, processor, state, lp),

        PolyadicExpression | BinaryExpression => conditional_operands(tree, node, lp),
        ConditionalExpression => {
            let polarity = match role {
                Some(Role::ThenExpression) => Polarity::WhenTrue,
                Some(Role::ElseExpression) => Polarity::WhenFalse,
                _ => return true,
            };
            condition_bindings(tree, node, polarity)
        }

        IfStatement => match role {
            Some(Role::ThenBranch) => condition_bindings(tree, node, Polarity::WhenTrue),
            Some(Role::ElseBranch) => condition_bindings(tree, node, Polarity::WhenFalse),
            _ => Vec::new(),
        },
        WhileStatement => match role {
            Some(Role::LoopBody) => condition_bindings(tree, node, Polarity::WhenTrue),
            _ => Vec::new(),
        },
        ForStatement => {
            let mut visible = Vec::new();
            if matches!(role, Some(Role::LoopBody | Role::ForUpdate)) {
                visible = condition_bindings(tree, node, Polarity::WhenTrue);
            }
            if matches!(
                role,
                Some(Role::Condition | Role::ForUpdate | Role::LoopBody)
            ) {
                visible.extend(for_init_variables(tree, node));
            }
            visible
        }
        ForeachStatement => match role {
            Some(Role::LoopBody) => {
                find_child_by_role(tree, node, Role::IterationParameter).into_iter().collect()
            }
            _ => Vec::new(),
        },
        ForeachPatternStatement => match role {
            Some(Role::LoopBody) => find_child_by_role(tree, node, Role::IterationPattern)
                .map(|p| pattern_ids(tree, p))
                .unwrap_or_default(),
            _ => Vec::new(),
        },

        SwitchLabelStatement => match role {
            Some(Role::Guard) => label_bindings(tree, node),
            _ => Vec::new(),
        },
        SwitchLabeledRule => match role {
            Some(Role::Guard) => label_bindings(tree, node),
            Some(Role::Body) => {
                let mut visible = label_bindings(tree, node);
                visible.extend(guard_bindings(tree, node));
                visible
            }
            _ => Vec::new(),
        },

        LambdaExpression => match role {
            Some(Role::Body) => parameters_of(tree, node),
            _ => Vec::new(),
        },
        Method => {
            let mut visible = Vec::new();
            if role == Some(Role::Body) {
                visible = parameters_of(tree, node);
            }
            if role != Some(Role::ModifierList) {
                visible.extend(type_parameters_of(tree, node));
            }
            visible
        }
        Class | AnonymousClass | EnumConstantInitializer => {
            let mut visible = Vec::new();
            if role == Some(Role::Member) {
                visible = class_members(tree, node);
            }
            if tree.kind(node) == Class && role != Some(Role::ModifierList) {
                visible.extend(type_parameters_of(tree, node));
            }
            visible
        }
        JavaFile => find_children_by_role(tree, node, Role::Member),

        ResourceList => {
            let mut preceding: Vec<NodeId> = find_children_by_role(tree, node, Role::Resource)
                .into_iter()
                .take_while(|r| *r != lp)
                .filter(|r| tree.kind(*r) == ResourceVariable)
                .collect();
            preceding.reverse();
            preceding
        }
        TryStatement => match role {
            Some(Role::TryBlock) => find_child_by_role(tree, node, Role::ResourceList)
                .map(|list| {
                    find_children_by_role(tree, list, Role::Resource)
                        .into_iter()
                        .filter(|r| tree.kind(*r) == ResourceVariable)
                        .collect()
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        },
        CatchSection => match role {
            Some(Role::CatchBlock) => {
                find_child_by_role(tree, node, Role::CatchParameter).into_iter().collect()
            }
            _ => Vec::new(),
        },
        LabeledStatement => match role {
            Some(Role::Statement) => vec![node],
            _ => Vec::new(),
        },
        LocalVariable | ResourceVariable => match role {
            Some(Role::Initializer) => vec![node],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    visible
        .into_iter()
        .all(|decl| offer(tree, processor, decl, state))
}

/// Declarations of a block visible at its statement `lp`, innermost first.
fn process_block<P: ScopeProcessor + ?Sized>(
    tree: &SyntaxTree,
    ctx: &mut ResolveContext,
    block: NodeId,
    processor: &mut P,
    state: ResolveState,
    lp: NodeId,
) -> bool {
    if !tree.kind(lp).is_statement() {
        return true;
    }
    let Some(index) = tree.index_in_parent(lp) else {
        return true;
    };

    let in_switch = tree
        .parent(block)
        .is_some_and(|p| matches!(tree.kind(p), SwitchStatement | SwitchExpression));
    if in_switch && !matches!(tree.kind(lp), SwitchLabelStatement | SwitchLabeledRule) {
        let label = tree.children(block)[..index]
            .iter()
            .rev()
            .copied()
            .find(|s| tree.kind(*s) == SwitchLabelStatement);
        if let Some(label) = label {
            let mut bindings = label_bindings(tree, label);
            bindings.extend(guard_bindings(tree, label));
            for decl in bindings {
                if !offer(tree, processor, decl, state) {
                    return false;
                }
            }
        }
    }

    let scope = ctx.block_scope(tree, block);
    for (name, kind) in &scope.conflicts {
        if !processor.conflict(name, *kind) {
            return false;
        }
    }
    for entry in scope.entries.iter().rev() {
        if entry.from > index || scope.is_conflicted(&entry.decl) {
            continue;
        }
        if !super::deliver(tree, processor, &entry.decl, state) {
            return false;
        }
    }
    true
}

/// Variables bound by `expr` when it evaluates to `polarity`.
pub fn expression_bindings(tree: &SyntaxTree, expr: NodeId, polarity: Polarity) -> Vec<NodeId> {
    if polarity == Polarity::WhenBoth {
        return Vec::new();
    }
    match tree.kind(expr) {
        ParenthExpression => find_child_by_role(tree, expr, Role::Expression)
            .map(|inner| expression_bindings(tree, inner, polarity))
            .unwrap_or_default(),
        PrefixExpression if tree.child_of_kind(expr, Bang).is_some() => {
            find_child_by_role(tree, expr, Role::Operand)
                .map(|inner| expression_bindings(tree, inner, polarity.negate()))
                .unwrap_or_default()
        }
        PolyadicExpression | BinaryExpression => {
            let Some(poly) = nodes::PolyadicExpression::cast(tree, expr) else {
                return Vec::new();
            };
            let spreads = (poly.is_conditional_and(tree) && polarity == Polarity::WhenTrue)
                || (poly.is_conditional_or(tree) && polarity == Polarity::WhenFalse);
            if !spreads {
                return Vec::new();
            }
            poly.operands(tree)
                .into_iter()
                .flat_map(|operand| expression_bindings(tree, operand.syntax(), polarity))
                .collect()
        }
        InstanceofExpression if polarity == Polarity::WhenTrue => {
            find_child_by_role(tree, expr, Role::Pattern)
                .map(|p| pattern_ids(tree, p))
                .unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// Variables a loop or `if` statement leaves in scope for the statements
/// after it.
pub(crate) fn statement_leaks(tree: &SyntaxTree, stmt: NodeId) -> Vec<NodeId> {
    match tree.kind(stmt) {
        IfStatement => {
            let then_ok = find_child_by_role(tree, stmt, Role::ThenBranch)
                .is_none_or(|s| can_complete_normally(tree, s));
            let polarity = match find_child_by_role(tree, stmt, Role::ElseBranch) {
                None if !then_ok => Polarity::WhenFalse,
                None => return Vec::new(),
                Some(other) => match (then_ok, can_complete_normally(tree, other)) {
                    (true, false) => Polarity::WhenTrue,
                    (false, true) => Polarity::WhenFalse,
                    _ => return Vec::new(),
                },
            };
            condition_bindings(tree, stmt, polarity)
        }
        WhileStatement | DoWhileStatement | ForStatement => {
            if has_break_targeting(tree, stmt) {
                return Vec::new();
            }
            condition_bindings(tree, stmt, Polarity::WhenFalse)
        }
        _ => Vec::new(),
    }
}

fn condition_bindings(tree: &SyntaxTree, node: NodeId, polarity: Polarity) -> Vec<NodeId> {
    find_child_by_role(tree, node, Role::Condition)
        .map(|cond| expression_bindings(tree, cond, polarity))
        .unwrap_or_default()
}

/// Operands of `&&` before `lp` bind when true; of `||`, when false.
fn conditional_operands(tree: &SyntaxTree, node: NodeId, lp: NodeId) -> Vec<NodeId> {
    let Some(poly) = nodes::PolyadicExpression::cast(tree, node) else {
        return Vec::new();
    };
    let polarity = if poly.is_conditional_and(tree) {
        Polarity::WhenTrue
    } else if poly.is_conditional_or(tree) {
        Polarity::WhenFalse
    } else {
        return Vec::new();
    };
    poly.operands(tree)
        .into_iter()
        .map(|operand| operand.syntax())
        .take_while(|operand| *operand != lp)
        .flat_map(|operand| expression_bindings(tree, operand, polarity))
        .collect()
}

fn pattern_ids(tree: &SyntaxTree, pattern: NodeId) -> Vec<NodeId> {
    nodes::pattern_variables(tree, pattern)
        .into_iter()
        .map(|v| v.syntax())
        .collect()
}

/// Pattern variables of a switch label. A label exposes them only when it
/// holds a single pattern, or a pattern together with `null`.
fn label_bindings(tree: &SyntaxTree, label: NodeId) -> Vec<NodeId> {
    let Some(list) = find_child_by_role(tree, label, Role::CaseLabelElementList) else {
        return Vec::new();
    };
    let elements = find_children_by_role(tree, list, Role::CaseLabelElement);
    let is_null = |e: NodeId| {
        nodes::LiteralExpression::cast(tree, e).is_some_and(|lit| lit.is_null(tree))
    };
    let pattern = match elements.as_slice() {
        [single] => *single,
        [first, second] if is_null(*second) => *first,
        [first, second] if is_null(*first) => *second,
        _ => return Vec::new(),
    };
    if !tree.kind(pattern).is_pattern() {
        return Vec::new();
    }
    pattern_ids(tree, pattern)
}

fn guard_bindings(tree: &SyntaxTree, label: NodeId) -> Vec<NodeId> {
    find_child_by_role(tree, label, Role::Guard)
        .map(|guard| expression_bindings(tree, guard, Polarity::WhenTrue))
        .unwrap_or_default()
}

fn for_init_variables(tree: &SyntaxTree, stmt: NodeId) -> Vec<NodeId> {
    find_child_by_role(tree, stmt, Role::ForInitialization)
        .filter(|init| tree.kind(*init) == DeclarationStatement)
        .and_then(|init| find_child_by_role(tree, init, Role::Declaration))
        .into_iter()
        .collect()
}

fn parameters_of(tree: &SyntaxTree, node: NodeId) -> Vec<NodeId> {
    find_child_by_role(tree, node, Role::ParameterList)
        .map(|list| find_children_by_role(tree, list, Role::Parameter))
        .unwrap_or_default()
}

fn type_parameters_of(tree: &SyntaxTree, node: NodeId) -> Vec<NodeId> {
    find_child_by_role(tree, node, Role::TypeParameterList)
        .map(|list| find_children_by_role(tree, list, Role::TypeParameter))
        .unwrap_or_default()
}

fn class_members(tree: &SyntaxTree, class: NodeId) -> Vec<NodeId> {
    let mut members: Vec<NodeId> = find_children_by_role(tree, class, Role::Member)
        .into_iter()
        .filter(|m| tree.kind(*m) != ClassInitializer)
        .collect();
    if let Some(header) = find_child_by_role(tree, class, Role::RecordHeader) {
        members.extend(find_children_by_role(tree, header, Role::RecordComponent));
    }
    members
}
