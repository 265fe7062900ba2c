// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression facades.

use crate::edit::{self, EditResult};
use crate::kinds::{SyntaxKind, LITERALS};
use crate::roles::{find_child_by_role, find_children_by_role, Role};
use crate::tree::{NodeId, SyntaxTree};

use super::literal::{self, LiteralValue};
use super::traits::{ast_node, child, children, sum_node};
use super::{AnonymousClass, AstNode, CodeBlock, Parameter, ParameterList, Pattern, TypeElement};

ast_node! {
    /// A name, optionally qualified: `x`, `a.b`, `this.f`.
    ReferenceExpression
}

impl ReferenceExpression {
    pub fn qualifier(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Qualifier)
    }

    pub fn name_token(self, tree: &SyntaxTree) -> Option<NodeId> {
        find_child_by_role(tree, self.0, Role::Name)
    }

    /// The referenced name without its qualifier.
    pub fn reference_name(self, tree: &SyntaxTree) -> Option<&str> {
        self.name_token(tree).and_then(|t| tree.token_text(t))
    }

    pub fn is_qualified(self, tree: &SyntaxTree) -> bool {
        self.qualifier(tree).is_some()
    }

    /// Rename the referenced member, keeping the qualifier.
    pub fn set_reference_name(self, tree: &mut SyntaxTree, name: &str) -> EditResult {
        edit::set_name(tree, self.0, name)
    }
}

ast_node!(LiteralExpression);

impl LiteralExpression {
    pub fn literal_token(self, tree: &SyntaxTree) -> Option<NodeId> {
        tree.children(self.0)
            .iter()
            .copied()
            .find(|c| LITERALS.contains(tree.kind(*c)))
    }

    pub fn literal_kind(self, tree: &SyntaxTree) -> Option<SyntaxKind> {
        self.literal_token(tree).map(|t| tree.kind(t))
    }

    /// Is this literal the direct operand of a unary minus?
    pub fn is_negated(self, tree: &SyntaxTree) -> bool {
        tree.parent(self.0)
            .filter(|p| tree.kind(*p) == SyntaxKind::PrefixExpression)
            .is_some_and(|p| tree.child_of_kind(p, SyntaxKind::Minus).is_some())
    }

    /// The decoded value, or `None` when the literal text is invalid (out of
    /// range, bad escape, lone surrogate).
    pub fn value(self, tree: &SyntaxTree) -> Option<LiteralValue> {
        let token = self.literal_token(tree)?;
        let text = tree.token_text(token)?;
        literal::decode(tree.kind(token), text, self.is_negated(tree))
    }

    pub fn is_null(self, tree: &SyntaxTree) -> bool {
        self.literal_kind(tree) == Some(SyntaxKind::NullKw)
    }
}

ast_node!(ParenthExpression);

impl ParenthExpression {
    pub fn expression(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Expression)
    }
}

ast_node! {
    /// `(a, b)` arguments of a call or `new`, or the update list of a `for`.
    ExpressionList
}

impl ExpressionList {
    pub fn expressions(self, tree: &SyntaxTree) -> Vec<Expression> {
        children(tree, self.0, Role::ExpressionInList)
    }

    pub fn add(self, tree: &mut SyntaxTree, expr: NodeId) -> EditResult<NodeId> {
        edit::add(tree, self.0, expr)
    }
}

ast_node!(MethodCallExpression);

impl MethodCallExpression {
    pub fn method_expression(self, tree: &SyntaxTree) -> Option<ReferenceExpression> {
        child(tree, self.0, Role::MethodExpression)
    }

    pub fn method_name(self, tree: &SyntaxTree) -> Option<&str> {
        let method = find_child_by_role(tree, self.0, Role::MethodExpression)?;
        let name = find_child_by_role(tree, method, Role::Name)?;
        tree.token_text(name)
    }

    pub fn argument_list(self, tree: &SyntaxTree) -> Option<ExpressionList> {
        child(tree, self.0, Role::ArgumentList)
    }

    pub fn arguments(self, tree: &SyntaxTree) -> Vec<Expression> {
        self.argument_list(tree)
            .map(|l| l.expressions(tree))
            .unwrap_or_default()
    }

    /// Append `arg` to the argument list.
    pub fn add_argument(self, tree: &mut SyntaxTree, arg: NodeId) -> EditResult<NodeId> {
        edit::add(tree, self.0, arg)
    }
}

ast_node! {
    /// Object or array creation.
    NewExpression
}

impl NewExpression {
    pub fn class_reference(self, tree: &SyntaxTree) -> Option<NodeId> {
        find_child_by_role(tree, self.0, Role::Reference)
    }

    pub fn argument_list(self, tree: &SyntaxTree) -> Option<ExpressionList> {
        child(tree, self.0, Role::ArgumentList)
    }

    pub fn array_dimensions(self, tree: &SyntaxTree) -> Vec<Expression> {
        children(tree, self.0, Role::ArrayDimension)
    }

    pub fn array_initializer(self, tree: &SyntaxTree) -> Option<ArrayInitializerExpression> {
        child(tree, self.0, Role::ArrayInitializer)
    }

    pub fn anonymous_class(self, tree: &SyntaxTree) -> Option<AnonymousClass> {
        child(tree, self.0, Role::AnonymousClass)
    }

    pub fn is_array_creation(self, tree: &SyntaxTree) -> bool {
        tree.child_of_kind(self.0, SyntaxKind::LBracket).is_some()
    }
}

ast_node!(ArrayInitializerExpression);

impl ArrayInitializerExpression {
    pub fn initializers(self, tree: &SyntaxTree) -> Vec<Expression> {
        children(tree, self.0, Role::ExpressionInList)
    }
}

ast_node!(ArrayAccessExpression);

impl ArrayAccessExpression {
    pub fn array(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::ArrayExpression)
    }

    pub fn index(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::IndexExpression)
    }
}

ast_node!(TypeCastExpression);

impl TypeCastExpression {
    pub fn cast_type(self, tree: &SyntaxTree) -> Option<TypeElement> {
        child(tree, self.0, Role::TypeElement)
    }

    pub fn operand(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Operand)
    }
}

ast_node! {
    /// `-x`, `!x`, `++x` and friends, plus the postfix `x++` and `x--`.
    UnaryExpression: PrefixExpression | PostfixExpression
}

impl UnaryExpression {
    pub fn is_prefix(self, tree: &SyntaxTree) -> bool {
        tree.kind(self.0) == SyntaxKind::PrefixExpression
    }

    pub fn operation_sign(self, tree: &SyntaxTree) -> Option<SyntaxKind> {
        find_child_by_role(tree, self.0, Role::OperationSign).map(|t| tree.kind(t))
    }

    pub fn operand(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Operand)
    }
}

ast_node! {
    /// An infix operator expression. Two operands make a
    /// `BinaryExpression`; a run of three or more operands joined by the
    /// same operator makes a `PolyadicExpression`.
    PolyadicExpression: BinaryExpression | PolyadicExpression
}

impl PolyadicExpression {
    pub fn operands(self, tree: &SyntaxTree) -> Vec<Expression> {
        tree.children(self.0)
            .iter()
            .filter_map(|c| Expression::cast(tree, *c))
            .collect()
    }

    /// The operator token kind, shared by every operator in the run.
    pub fn operation_sign(self, tree: &SyntaxTree) -> Option<SyntaxKind> {
        find_child_by_role(tree, self.0, Role::OperationSign).map(|t| tree.kind(t))
    }

    pub fn is_conditional_and(self, tree: &SyntaxTree) -> bool {
        self.operation_sign(tree) == Some(SyntaxKind::AndAnd)
    }

    pub fn is_conditional_or(self, tree: &SyntaxTree) -> bool {
        self.operation_sign(tree) == Some(SyntaxKind::OrOr)
    }
}

ast_node!(ConditionalExpression);

impl ConditionalExpression {
    pub fn condition(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Condition)
    }

    pub fn then_expression(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::ThenExpression)
    }

    pub fn else_expression(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::ElseExpression)
    }
}

ast_node!(AssignmentExpression);

impl AssignmentExpression {
    pub fn lhs(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::LOperand)
    }

    pub fn rhs(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::ROperand)
    }

    pub fn operation_sign(self, tree: &SyntaxTree) -> Option<SyntaxKind> {
        find_child_by_role(tree, self.0, Role::OperationSign).map(|t| tree.kind(t))
    }
}

ast_node! {
    /// `x instanceof T` or `x instanceof T t`.
    InstanceofExpression
}

impl InstanceofExpression {
    pub fn operand(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Operand)
    }

    pub fn check_type(self, tree: &SyntaxTree) -> Option<TypeElement> {
        child(tree, self.0, Role::TypeElement)
    }

    pub fn pattern(self, tree: &SyntaxTree) -> Option<Pattern> {
        child(tree, self.0, Role::Pattern)
    }
}

ast_node!(LambdaExpression);

impl LambdaExpression {
    pub fn parameter_list(self, tree: &SyntaxTree) -> Option<ParameterList> {
        child(tree, self.0, Role::ParameterList)
    }

    pub fn parameters(self, tree: &SyntaxTree) -> Vec<Parameter> {
        self.parameter_list(tree)
            .map(|l| l.parameters(tree))
            .unwrap_or_default()
    }

    /// The body node: a `CodeBlock` or an expression.
    pub fn body(self, tree: &SyntaxTree) -> Option<NodeId> {
        find_child_by_role(tree, self.0, Role::Body)
    }

    pub fn block_body(self, tree: &SyntaxTree) -> Option<CodeBlock> {
        child(tree, self.0, Role::Body)
    }

    pub fn expression_body(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Body)
    }
}

ast_node! {
    /// `String::valueOf`, `ArrayList::new`.
    MethodRefExpression
}

impl MethodRefExpression {
    pub fn qualifier(self, tree: &SyntaxTree) -> Option<NodeId> {
        find_child_by_role(tree, self.0, Role::Qualifier)
    }

    pub fn reference_name(self, tree: &SyntaxTree) -> Option<&str> {
        find_child_by_role(tree, self.0, Role::Name).and_then(|t| tree.token_text(t))
    }

    pub fn is_constructor(self, tree: &SyntaxTree) -> bool {
        self.reference_name(tree) == Some("new")
    }
}

ast_node! {
    /// `this`, `super`, or their qualified forms `Outer.this`.
    QualifiedKeywordExpression: ThisExpression | SuperExpression
}

impl QualifiedKeywordExpression {
    pub fn qualifier(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Qualifier)
    }

    pub fn is_super(self, tree: &SyntaxTree) -> bool {
        tree.kind(self.0) == SyntaxKind::SuperExpression
    }
}

ast_node!(ClassObjectAccessExpression);

impl ClassObjectAccessExpression {
    pub fn operand(self, tree: &SyntaxTree) -> Option<TypeElement> {
        child(tree, self.0, Role::TypeElement)
    }
}

ast_node!(SwitchExpression);

impl SwitchExpression {
    pub fn selector(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Selector)
    }

    pub fn body(self, tree: &SyntaxTree) -> Option<CodeBlock> {
        child(tree, self.0, Role::SwitchBody)
    }
}

sum_node! {
    /// Any expression.
    Expression {
        Reference(ReferenceExpression),
        Literal(LiteralExpression),
        Parenth(ParenthExpression),
        MethodCall(MethodCallExpression),
        New(NewExpression),
        ArrayInitializer(ArrayInitializerExpression),
        ArrayAccess(ArrayAccessExpression),
        TypeCast(TypeCastExpression),
        Unary(UnaryExpression),
        Polyadic(PolyadicExpression),
        Conditional(ConditionalExpression),
        Assignment(AssignmentExpression),
        Instanceof(InstanceofExpression),
        Lambda(LambdaExpression),
        MethodRef(MethodRefExpression),
        QualifiedKeyword(QualifiedKeywordExpression),
        ClassObjectAccess(ClassObjectAccessExpression),
        Switch(SwitchExpression),
    }
}

impl Expression {
    /// Strip any number of enclosing parentheses.
    pub fn skip_parens(self, tree: &SyntaxTree) -> Option<Expression> {
        let mut expr = self;
        while let Expression::Parenth(p) = expr {
            expr = p.expression(tree)?;
        }
        Some(expr)
    }
}

/// Operands of `expr` in source order, for any operator expression.
pub fn operands(tree: &SyntaxTree, expr: NodeId) -> Vec<NodeId> {
    let mut found = find_children_by_role(tree, expr, Role::Operand);
    if found.is_empty() {
        found.extend(find_child_by_role(tree, expr, Role::LOperand));
        found.extend(find_child_by_role(tree, expr, Role::ROperand));
    }
    found
}
