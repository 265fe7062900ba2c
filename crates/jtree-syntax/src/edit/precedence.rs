// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Java operator precedence, used to decide when a replacement expression
//! needs parentheses.

use crate::kinds::SyntaxKind;
use crate::roles::{find_child_by_role, role_of, Role};
use crate::tree::{NodeId, SyntaxTree};

use SyntaxKind::*;

pub const PRIMARY: u8 = 0;
pub const POSTFIX: u8 = 1;
pub const PREFIX: u8 = 2;
pub const MULTIPLICATIVE: u8 = 3;
pub const ADDITIVE: u8 = 4;
pub const SHIFT: u8 = 5;
pub const RELATIONAL: u8 = 6;
pub const EQUALITY: u8 = 7;
pub const BITWISE_AND: u8 = 8;
pub const XOR: u8 = 9;
pub const BITWISE_OR: u8 = 10;
pub const AND: u8 = 11;
pub const OR: u8 = 12;
pub const CONDITIONAL: u8 = 13;
pub const ASSIGNMENT: u8 = 14;
pub const LAMBDA: u8 = 15;

/// Precedence of a binary operator token. Lower binds tighter.
pub fn operator_precedence(op: SyntaxKind) -> Option<u8> {
    let prec = match op {
        Star | Slash | Percent => MULTIPLICATIVE,
        Plus | Minus => ADDITIVE,
        LtLt | GtGt | GtGtGt => SHIFT,
        Lt | Gt | Le | Ge | InstanceofKw => RELATIONAL,
        EqEq | Ne => EQUALITY,
        Amp => BITWISE_AND,
        Caret => XOR,
        Pipe => BITWISE_OR,
        AndAnd => AND,
        OrOr => OR,
        _ => return None,
    };
    Some(prec)
}

/// Precedence of the expression rooted at `expr`.
pub fn precedence(tree: &SyntaxTree, expr: NodeId) -> u8 {
    match tree.kind(expr) {
        PostfixExpression => POSTFIX,
        PrefixExpression | TypeCastExpression => PREFIX,
        BinaryExpression | PolyadicExpression => find_child_by_role(tree, expr, Role::OperationSign)
            .and_then(|op| operator_precedence(tree.kind(op)))
            .unwrap_or(PRIMARY),
        InstanceofExpression => RELATIONAL,
        ConditionalExpression => CONDITIONAL,
        AssignmentExpression => ASSIGNMENT,
        LambdaExpression => LAMBDA,
        _ => PRIMARY,
    }
}

/// Would `expr` need parentheses if it took `slot`'s place?
pub fn needs_parentheses(tree: &SyntaxTree, slot: NodeId, expr: NodeId) -> bool {
    let Some(parent) = tree.parent(slot) else {
        return false;
    };
    if !tree.kind(expr).is_expression() || !tree.kind(parent).is_expression() {
        return false;
    }
    let prec = precedence(tree, expr);
    let Some(role) = role_of(tree, slot) else {
        return false;
    };
    match (tree.kind(parent), role) {
        (ReferenceExpression | MethodRefExpression | ThisExpression | SuperExpression, Role::Qualifier)
        | (ArrayAccessExpression, Role::ArrayExpression)
        | (PostfixExpression, Role::Operand) => prec > PRIMARY,
        // A cast may apply directly to a lambda.
        (TypeCastExpression, Role::Operand) => prec > PREFIX && prec != LAMBDA,
        (PrefixExpression, Role::Operand) => prec > PREFIX,
        (BinaryExpression, Role::LOperand) => prec > precedence(tree, parent),
        (BinaryExpression, Role::ROperand) => prec >= precedence(tree, parent),
        (PolyadicExpression, Role::Operand) => {
            let first = find_child_by_role(tree, parent, Role::Operand) == Some(slot);
            let outer = precedence(tree, parent);
            if first {
                prec > outer
            } else {
                prec >= outer
            }
        }
        (InstanceofExpression, Role::Operand) => prec > RELATIONAL,
        (ConditionalExpression, Role::Condition) => prec >= CONDITIONAL,
        (ConditionalExpression, Role::ElseExpression) => prec == ASSIGNMENT,
        (AssignmentExpression, Role::LOperand) => prec > PRIMARY,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;

    fn top(tree: &SyntaxTree) -> NodeId {
        tree.significant_children(tree.root()).next().unwrap()
    }

    #[test]
    fn test_precedence_levels() {
        let tree = parse_expression("a + b * c").unwrap();
        assert_eq!(precedence(&tree, top(&tree)), ADDITIVE);
        let tree = parse_expression("x = y").unwrap();
        assert_eq!(precedence(&tree, top(&tree)), ASSIGNMENT);
        let tree = parse_expression("!x").unwrap();
        assert_eq!(precedence(&tree, top(&tree)), PREFIX);
        let tree = parse_expression("foo.bar()").unwrap();
        assert_eq!(precedence(&tree, top(&tree)), PRIMARY);
    }

    #[test]
    fn test_operator_table() {
        assert!(operator_precedence(Star) < operator_precedence(Plus));
        assert!(operator_precedence(AndAnd) < operator_precedence(OrOr));
        assert_eq!(operator_precedence(Eq), None);
    }
}
