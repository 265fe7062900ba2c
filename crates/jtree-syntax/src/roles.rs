// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Child-role classification.
//!
//! Every significant child of a composite node occupies a [`Role`] in its
//! parent: the condition of an `if`, the operation sign of a binary
//! expression, an element of an argument list. [`role_of`] classifies a
//! child, [`find_child_by_role`] and [`find_children_by_role`] go the other
//! way. All three are single dispatch tables keyed by the parent's kind.
//!
//! For a role that is unique in its parent ([`Role::is_unique_in`]) the two
//! directions are mutual inverses: `role_of(c) == R` exactly when
//! `find_child_by_role(parent, R) == Some(c)`. [`check_role_consistency`]
//! verifies that for a whole subtree.
//!
//! Tie-breaks between children of the same kind are positional:
//!
//! - `if`: the first statement is the then-branch, a statement after the
//!   `else` keyword is the else-branch.
//! - `for`: statements before the header's `;` token are the initialization,
//!   between it and `)` the update, after `)` the body.
//! - binary, assignment, conditional and array access expressions: operands
//!   are numbered left to right.
//! - `try`: the code block after `finally` is the finally block.

use serde::Serialize;

use crate::kinds::{SyntaxKind, LITERALS, MODIFIERS, PRIMITIVE_TYPES};
use crate::tree::{NodeId, SyntaxTree};

use SyntaxKind::*;

/// The structural slot a child occupies in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    // Tokens
    Keyword,
    ElseKeyword,
    WhileKeyword,
    FinallyKeyword,
    WhenKeyword,
    InstanceofKeyword,
    OperationSign,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LAngle,
    RAngle,
    Semicolon,
    Comma,
    Dot,
    Colon,
    Question,
    Arrow,
    Eq,
    Amp,
    Pipe,
    At,
    DoubleColon,
    Ellipsis,
    Star,
    Name,
    Label,
    Literal,
    Modifier,

    // Statements
    Condition,
    ThenBranch,
    ElseBranch,
    LoopBody,
    ForInitialization,
    ForUpdate,
    IterationParameter,
    IterationPattern,
    IteratedValue,
    Selector,
    SwitchBody,
    Statement,
    Declaration,
    Body,
    TryBlock,
    CatchSection,
    CatchParameter,
    CatchBlock,
    FinallyBlock,
    ResourceList,
    Resource,
    CaseLabelElementList,
    CaseLabelElement,
    Guard,
    AssertDescription,

    // Expressions
    Expression,
    Operand,
    LOperand,
    ROperand,
    ThenExpression,
    ElseExpression,
    Qualifier,
    MethodExpression,
    ArgumentList,
    ExpressionList,
    ExpressionInList,
    ArrayExpression,
    IndexExpression,
    ArrayDimension,
    ArrayInitializer,
    AnonymousClass,
    Pattern,

    // Declarations
    PackageStatement,
    ImportList,
    ImportStatement,
    Member,
    ModifierList,
    Annotation,
    AnnotationParameterList,
    NameValuePair,
    AnnotationValue,
    TypeElement,
    ReturnType,
    Reference,
    ReferenceParameterList,
    ReferenceInList,
    TypeParameterList,
    TypeParameter,
    BoundList,
    ParameterList,
    Parameter,
    RecordHeader,
    RecordComponent,
    ExtendsList,
    ImplementsList,
    ThrowsList,
    PermitsList,
    Initializer,
    PatternVariable,
    DeconstructionList,
    /// The content of a fragment holder.
    Element,
}

impl Role {
    /// Can at most one child of a `parent` node hold this role?
    pub fn is_unique_in(self, parent: SyntaxKind) -> bool {
        match self {
            Role::Statement
            | Role::Declaration
            | Role::Member
            | Role::Parameter
            | Role::TypeParameter
            | Role::ReferenceInList
            | Role::ExpressionInList
            | Role::Comma
            | Role::CatchSection
            | Role::Annotation
            | Role::Modifier
            | Role::Resource
            | Role::CaseLabelElement
            | Role::NameValuePair
            | Role::ImportStatement
            | Role::ArrayDimension
            | Role::Amp
            | Role::Pipe
            | Role::RecordComponent
            | Role::Pattern
            | Role::Element => false,
            Role::AnnotationValue => parent == NameValuePair,
            Role::Operand | Role::OperationSign => parent != PolyadicExpression,
            Role::TypeElement => !matches!(
                parent,
                Type | TypeCastExpression | ReferenceParameterList
            ),
            Role::Semicolon => !matches!(
                parent,
                Class | AnonymousClass | EnumConstantInitializer | JavaFile | ResourceList
            ),
            Role::LBracket | Role::RBracket => parent != NewExpression,
            _ => true,
        }
    }
}

fn punctuation(kind: SyntaxKind) -> Option<Role> {
    let role = match kind {
        SyntaxKind::LParen => Role::LParen,
        SyntaxKind::RParen => Role::RParen,
        SyntaxKind::LBrace => Role::LBrace,
        SyntaxKind::RBrace => Role::RBrace,
        SyntaxKind::LBracket => Role::LBracket,
        SyntaxKind::RBracket => Role::RBracket,
        Lt => Role::LAngle,
        Gt => Role::RAngle,
        SyntaxKind::Semicolon => Role::Semicolon,
        SyntaxKind::Comma => Role::Comma,
        SyntaxKind::Dot => Role::Dot,
        SyntaxKind::Colon => Role::Colon,
        SyntaxKind::Question => Role::Question,
        SyntaxKind::Arrow => Role::Arrow,
        SyntaxKind::Eq => Role::Eq,
        SyntaxKind::Amp => Role::Amp,
        SyntaxKind::Pipe => Role::Pipe,
        SyntaxKind::At => Role::At,
        ColonColon => Role::DoubleColon,
        SyntaxKind::Ellipsis => Role::Ellipsis,
        Star => Role::Star,
        _ => return None,
    };
    Some(role)
}

/// Does a sibling of kind `kind` come before `child`?
fn after(tree: &SyntaxTree, child: NodeId, kind: SyntaxKind) -> bool {
    let Some(parent) = tree.parent(child) else {
        return false;
    };
    tree.children(parent)
        .iter()
        .take_while(|c| **c != child)
        .any(|c| tree.kind(*c) == kind)
}

/// Is `child` the first child satisfying `pred`?
fn is_first(tree: &SyntaxTree, child: NodeId, pred: impl Fn(SyntaxKind) -> bool) -> bool {
    let Some(parent) = tree.parent(child) else {
        return false;
    };
    tree.children(parent)
        .iter()
        .find(|c| pred(tree.kind(**c)))
        .is_some_and(|c| *c == child)
}

fn is_expression(kind: SyntaxKind) -> bool {
    kind.is_expression()
}

fn variable_role(kind: SyntaxKind) -> Option<Role> {
    match kind {
        ModifierList => Some(Role::ModifierList),
        Type => Some(Role::TypeElement),
        Ident => Some(Role::Name),
        ArrayInitializerExpression => Some(Role::Initializer),
        kind if kind.is_expression() => Some(Role::Initializer),
        _ => punctuation(kind),
    }
}

fn class_body_role(kind: SyntaxKind) -> Option<Role> {
    match kind {
        Method | Field | Class | ClassInitializer | EnumConstant => Some(Role::Member),
        _ => punctuation(kind),
    }
}

/// Classify a direct child of its parent. Trivia and detached nodes have no
/// role.
pub fn role_of(tree: &SyntaxTree, child: NodeId) -> Option<Role> {
    let parent = tree.parent(child)?;
    let kind = tree.kind(child);
    if kind.is_trivia() {
        return None;
    }
    match tree.kind(parent) {
        // --------------------------------------------------------------
        // Files and declarations
        // --------------------------------------------------------------
        JavaFile => match kind {
            SyntaxKind::PackageStatement => Some(Role::PackageStatement),
            SyntaxKind::ImportList => Some(Role::ImportList),
            Class => Some(Role::Member),
            _ => punctuation(kind),
        },
        DummyHolder => Some(Role::Element),
        SyntaxKind::PackageStatement => match kind {
            PackageKw => Some(Role::Keyword),
            JavaCodeReference => Some(Role::Reference),
            _ => punctuation(kind),
        },
        SyntaxKind::ImportList => match kind {
            SyntaxKind::ImportStatement => Some(Role::ImportStatement),
            _ => None,
        },
        SyntaxKind::ImportStatement => match kind {
            ImportKw => Some(Role::Keyword),
            StaticKw => Some(Role::Modifier),
            JavaCodeReference => Some(Role::Reference),
            _ => punctuation(kind),
        },
        Class => match kind {
            SyntaxKind::ModifierList => Some(Role::ModifierList),
            ClassKw | InterfaceKw | EnumKw | RecordKw => Some(Role::Keyword),
            Ident => Some(Role::Name),
            SyntaxKind::TypeParameterList => Some(Role::TypeParameterList),
            SyntaxKind::RecordHeader => Some(Role::RecordHeader),
            SyntaxKind::ExtendsList => Some(Role::ExtendsList),
            SyntaxKind::ImplementsList => Some(Role::ImplementsList),
            SyntaxKind::PermitsList => Some(Role::PermitsList),
            _ => class_body_role(kind),
        },
        SyntaxKind::AnonymousClass | EnumConstantInitializer => class_body_role(kind),
        EnumConstant => match kind {
            SyntaxKind::ModifierList => Some(Role::ModifierList),
            Ident => Some(Role::Name),
            SyntaxKind::ExpressionList => Some(Role::ArgumentList),
            EnumConstantInitializer => Some(Role::AnonymousClass),
            _ => punctuation(kind),
        },
        SyntaxKind::RecordHeader => match kind {
            SyntaxKind::RecordComponent => Some(Role::RecordComponent),
            _ => punctuation(kind),
        },
        SyntaxKind::RecordComponent
        | SyntaxKind::Parameter
        | SyntaxKind::PatternVariable
        | LocalVariable
        | Field
        | ResourceVariable => variable_role(kind),
        Method => match kind {
            SyntaxKind::ModifierList => Some(Role::ModifierList),
            SyntaxKind::TypeParameterList => Some(Role::TypeParameterList),
            Type => Some(Role::ReturnType),
            Ident => Some(Role::Name),
            SyntaxKind::ParameterList => Some(Role::ParameterList),
            SyntaxKind::ThrowsList => Some(Role::ThrowsList),
            CodeBlock => Some(Role::Body),
            _ => punctuation(kind),
        },
        ClassInitializer => match kind {
            SyntaxKind::ModifierList => Some(Role::ModifierList),
            CodeBlock => Some(Role::Body),
            _ => None,
        },
        SyntaxKind::ParameterList => match kind {
            SyntaxKind::Parameter => Some(Role::Parameter),
            _ => punctuation(kind),
        },
        SyntaxKind::TypeParameterList => match kind {
            SyntaxKind::TypeParameter => Some(Role::TypeParameter),
            _ => punctuation(kind),
        },
        SyntaxKind::TypeParameter => match kind {
            SyntaxKind::Annotation => Some(Role::Annotation),
            Ident => Some(Role::Name),
            ExtendsBoundList => Some(Role::BoundList),
            _ => None,
        },
        ExtendsBoundList => match kind {
            ExtendsKw => Some(Role::Keyword),
            Type => Some(Role::ReferenceInList),
            _ => punctuation(kind),
        },
        SyntaxKind::ExtendsList
        | SyntaxKind::ImplementsList
        | SyntaxKind::ThrowsList
        | SyntaxKind::PermitsList => match kind {
            ExtendsKw | ImplementsKw | ThrowsKw | PermitsKw => Some(Role::Keyword),
            JavaCodeReference => Some(Role::ReferenceInList),
            _ => punctuation(kind),
        },
        SyntaxKind::ModifierList => match kind {
            SyntaxKind::Annotation => Some(Role::Annotation),
            kind if MODIFIERS.contains(kind) => Some(Role::Modifier),
            _ => None,
        },
        SyntaxKind::Annotation => match kind {
            JavaCodeReference => Some(Role::Reference),
            SyntaxKind::AnnotationParameterList => Some(Role::AnnotationParameterList),
            _ => punctuation(kind),
        },
        SyntaxKind::AnnotationParameterList => match kind {
            SyntaxKind::NameValuePair => Some(Role::NameValuePair),
            _ => punctuation(kind),
        },
        SyntaxKind::NameValuePair => match kind {
            Ident => Some(Role::Name),
            SyntaxKind::Eq => Some(Role::Eq),
            _ => Some(Role::AnnotationValue),
        },
        AnnotationArrayInitializer => match kind {
            SyntaxKind::LBrace | SyntaxKind::RBrace | SyntaxKind::Comma => punctuation(kind),
            _ => Some(Role::AnnotationValue),
        },
        JavaCodeReference => match kind {
            JavaCodeReference => Some(Role::Qualifier),
            Ident => Some(Role::Name),
            SyntaxKind::ReferenceParameterList => Some(Role::ReferenceParameterList),
            _ => punctuation(kind),
        },
        SyntaxKind::ReferenceParameterList => match kind {
            Type => Some(Role::TypeElement),
            _ => punctuation(kind),
        },
        Type => match kind {
            Type => Some(Role::TypeElement),
            JavaCodeReference => Some(Role::Reference),
            SyntaxKind::Annotation => Some(Role::Annotation),
            ExtendsKw | SuperKw => Some(Role::Keyword),
            kind if PRIMITIVE_TYPES.contains(kind) => Some(Role::Keyword),
            _ => punctuation(kind),
        },

        // --------------------------------------------------------------
        // Statements
        // --------------------------------------------------------------
        CodeBlock => match kind {
            kind if kind.is_statement() => Some(Role::Statement),
            _ => punctuation(kind),
        },
        BlockStatement => match kind {
            CodeBlock => Some(Role::Body),
            _ => None,
        },
        DeclarationStatement => match kind {
            LocalVariable | Class => Some(Role::Declaration),
            _ => None,
        },
        ExpressionStatement => match kind {
            kind if kind.is_expression() => Some(Role::Expression),
            _ => punctuation(kind),
        },
        ExpressionListStatement => match kind {
            SyntaxKind::ExpressionList => Some(Role::ExpressionList),
            _ => punctuation(kind),
        },
        EmptyStatement => punctuation(kind),
        IfStatement => match kind {
            IfKw => Some(Role::Keyword),
            ElseKw => Some(Role::ElseKeyword),
            kind if kind.is_expression() => Some(Role::Condition),
            kind if kind.is_statement() => {
                if after(tree, child, ElseKw) {
                    Some(Role::ElseBranch)
                } else {
                    Some(Role::ThenBranch)
                }
            }
            _ => punctuation(kind),
        },
        WhileStatement => match kind {
            WhileKw => Some(Role::Keyword),
            kind if kind.is_expression() => Some(Role::Condition),
            kind if kind.is_statement() => Some(Role::LoopBody),
            _ => punctuation(kind),
        },
        DoWhileStatement => match kind {
            DoKw => Some(Role::Keyword),
            WhileKw => Some(Role::WhileKeyword),
            kind if kind.is_expression() => Some(Role::Condition),
            kind if kind.is_statement() => Some(Role::LoopBody),
            _ => punctuation(kind),
        },
        ForStatement => match kind {
            ForKw => Some(Role::Keyword),
            kind if kind.is_expression() => Some(Role::Condition),
            kind if kind.is_statement() => {
                if after(tree, child, SyntaxKind::RParen) {
                    Some(Role::LoopBody)
                } else if after(tree, child, SyntaxKind::Semicolon) {
                    Some(Role::ForUpdate)
                } else {
                    Some(Role::ForInitialization)
                }
            }
            _ => punctuation(kind),
        },
        ForeachStatement => match kind {
            ForKw => Some(Role::Keyword),
            SyntaxKind::Parameter => Some(Role::IterationParameter),
            kind if kind.is_expression() => Some(Role::IteratedValue),
            kind if kind.is_statement() => Some(Role::LoopBody),
            _ => punctuation(kind),
        },
        ForeachPatternStatement => match kind {
            ForKw => Some(Role::Keyword),
            kind if kind.is_pattern() => Some(Role::IterationPattern),
            kind if kind.is_expression() => Some(Role::IteratedValue),
            kind if kind.is_statement() => Some(Role::LoopBody),
            _ => punctuation(kind),
        },
        SwitchStatement | SwitchExpression => match kind {
            SwitchKw => Some(Role::Keyword),
            CodeBlock => Some(Role::SwitchBody),
            kind if kind.is_expression() => Some(Role::Selector),
            _ => punctuation(kind),
        },
        SwitchLabelStatement | SwitchLabeledRule => match kind {
            CaseKw | DefaultKw => Some(Role::Keyword),
            SyntaxKind::CaseLabelElementList => Some(Role::CaseLabelElementList),
            WhenKw => Some(Role::WhenKeyword),
            kind if kind.is_expression() => Some(Role::Guard),
            kind if kind.is_statement() => Some(Role::Body),
            _ => punctuation(kind),
        },
        SyntaxKind::CaseLabelElementList => match kind {
            SyntaxKind::Comma => Some(Role::Comma),
            _ => Some(Role::CaseLabelElement),
        },
        DefaultCaseLabelElement => match kind {
            DefaultKw => Some(Role::Keyword),
            _ => None,
        },
        BreakStatement | ContinueStatement => match kind {
            BreakKw | ContinueKw => Some(Role::Keyword),
            Ident => Some(Role::Label),
            _ => punctuation(kind),
        },
        ReturnStatement | ThrowStatement | YieldStatement => match kind {
            ReturnKw | ThrowKw | YieldKw => Some(Role::Keyword),
            kind if kind.is_expression() => Some(Role::Expression),
            _ => punctuation(kind),
        },
        LabeledStatement => match kind {
            Ident => Some(Role::Label),
            kind if kind.is_statement() => Some(Role::Statement),
            _ => punctuation(kind),
        },
        SynchronizedStatement => match kind {
            SynchronizedKw => Some(Role::Keyword),
            kind if kind.is_expression() => Some(Role::Expression),
            CodeBlock => Some(Role::Body),
            _ => punctuation(kind),
        },
        AssertStatement => match kind {
            AssertKw => Some(Role::Keyword),
            kind if kind.is_expression() => {
                if is_first(tree, child, is_expression) {
                    Some(Role::Condition)
                } else {
                    Some(Role::AssertDescription)
                }
            }
            _ => punctuation(kind),
        },
        TryStatement => match kind {
            TryKw => Some(Role::Keyword),
            FinallyKw => Some(Role::FinallyKeyword),
            SyntaxKind::ResourceList => Some(Role::ResourceList),
            SyntaxKind::CatchSection => Some(Role::CatchSection),
            CodeBlock => {
                if after(tree, child, FinallyKw) {
                    Some(Role::FinallyBlock)
                } else {
                    Some(Role::TryBlock)
                }
            }
            _ => None,
        },
        SyntaxKind::ResourceList => match kind {
            ResourceVariable | ResourceExpression => Some(Role::Resource),
            _ => punctuation(kind),
        },
        ResourceExpression => match kind {
            kind if kind.is_expression() => Some(Role::Expression),
            _ => None,
        },
        SyntaxKind::CatchSection => match kind {
            CatchKw => Some(Role::Keyword),
            SyntaxKind::Parameter => Some(Role::CatchParameter),
            CodeBlock => Some(Role::CatchBlock),
            _ => punctuation(kind),
        },

        // --------------------------------------------------------------
        // Expressions
        // --------------------------------------------------------------
        ReferenceExpression => match kind {
            Ident | ThisKw | SuperKw => Some(Role::Name),
            SyntaxKind::ReferenceParameterList => Some(Role::ReferenceParameterList),
            kind if kind.is_expression() => Some(Role::Qualifier),
            _ => punctuation(kind),
        },
        LiteralExpression => match kind {
            kind if LITERALS.contains(kind) => Some(Role::Literal),
            _ => None,
        },
        ParenthExpression => match kind {
            kind if kind.is_expression() => Some(Role::Expression),
            _ => punctuation(kind),
        },
        MethodCallExpression => match kind {
            ReferenceExpression => Some(Role::MethodExpression),
            SyntaxKind::ExpressionList => Some(Role::ArgumentList),
            _ => None,
        },
        SyntaxKind::ExpressionList | ArrayInitializerExpression => match kind {
            kind if kind.is_expression() => Some(Role::ExpressionInList),
            _ => punctuation(kind),
        },
        NewExpression => match kind {
            NewKw => Some(Role::Keyword),
            JavaCodeReference => Some(Role::Reference),
            SyntaxKind::ReferenceParameterList => Some(Role::ReferenceParameterList),
            SyntaxKind::ExpressionList => Some(Role::ArgumentList),
            ArrayInitializerExpression => Some(Role::ArrayInitializer),
            SyntaxKind::AnonymousClass => Some(Role::AnonymousClass),
            SyntaxKind::Annotation => Some(Role::Annotation),
            kind if PRIMITIVE_TYPES.contains(kind) => Some(Role::TypeElement),
            kind if kind.is_expression() => Some(Role::ArrayDimension),
            _ => punctuation(kind),
        },
        ArrayAccessExpression => match kind {
            kind if kind.is_expression() => {
                if is_first(tree, child, is_expression) {
                    Some(Role::ArrayExpression)
                } else {
                    Some(Role::IndexExpression)
                }
            }
            _ => punctuation(kind),
        },
        TypeCastExpression => match kind {
            Type => Some(Role::TypeElement),
            kind if kind.is_expression() => Some(Role::Operand),
            _ => punctuation(kind),
        },
        PrefixExpression | PostfixExpression => match kind {
            kind if kind.is_expression() => Some(Role::Operand),
            _ => Some(Role::OperationSign),
        },
        BinaryExpression | AssignmentExpression => match kind {
            kind if kind.is_expression() => {
                if is_first(tree, child, is_expression) {
                    Some(Role::LOperand)
                } else {
                    Some(Role::ROperand)
                }
            }
            _ => Some(Role::OperationSign),
        },
        PolyadicExpression => match kind {
            kind if kind.is_expression() => Some(Role::Operand),
            _ => Some(Role::OperationSign),
        },
        ConditionalExpression => match kind {
            kind if kind.is_expression() => {
                if after(tree, child, SyntaxKind::Colon) {
                    Some(Role::ElseExpression)
                } else if after(tree, child, SyntaxKind::Question) {
                    Some(Role::ThenExpression)
                } else {
                    Some(Role::Condition)
                }
            }
            _ => punctuation(kind),
        },
        InstanceofExpression => match kind {
            InstanceofKw => Some(Role::InstanceofKeyword),
            Type => Some(Role::TypeElement),
            kind if kind.is_pattern() => Some(Role::Pattern),
            kind if kind.is_expression() => Some(Role::Operand),
            _ => None,
        },
        LambdaExpression => match kind {
            SyntaxKind::ParameterList => Some(Role::ParameterList),
            CodeBlock => Some(Role::Body),
            kind if kind.is_expression() => Some(Role::Body),
            _ => punctuation(kind),
        },
        MethodRefExpression => match kind {
            Ident | NewKw => Some(Role::Name),
            SyntaxKind::ReferenceParameterList => Some(Role::ReferenceParameterList),
            Type => Some(Role::Qualifier),
            kind if kind.is_expression() => Some(Role::Qualifier),
            _ => punctuation(kind),
        },
        ThisExpression | SuperExpression => match kind {
            ThisKw | SuperKw => Some(Role::Keyword),
            kind if kind.is_expression() => Some(Role::Qualifier),
            _ => punctuation(kind),
        },
        ClassObjectAccessExpression => match kind {
            Type => Some(Role::TypeElement),
            ClassKw => Some(Role::Keyword),
            _ => punctuation(kind),
        },

        // --------------------------------------------------------------
        // Patterns
        // --------------------------------------------------------------
        TypeTestPattern => match kind {
            SyntaxKind::PatternVariable => Some(Role::PatternVariable),
            _ => None,
        },
        DeconstructionPattern => match kind {
            Type => Some(Role::TypeElement),
            SyntaxKind::DeconstructionList => Some(Role::DeconstructionList),
            SyntaxKind::PatternVariable => Some(Role::PatternVariable),
            _ => None,
        },
        SyntaxKind::DeconstructionList => match kind {
            kind if kind.is_pattern() => Some(Role::Pattern),
            _ => punctuation(kind),
        },
        UnnamedPattern => match kind {
            Ident => Some(Role::Name),
            _ => None,
        },
        _ => None,
    }
}

/// The child holding `role` in `node`. For a repeated role this is the
/// first such child.
pub fn find_child_by_role(tree: &SyntaxTree, node: NodeId, role: Role) -> Option<NodeId> {
    let children = tree.children(node);
    match (tree.kind(node), role) {
        (IfStatement, Role::Condition) => children
            .iter()
            .copied()
            .find(|c| tree.kind(*c).is_expression()),
        (IfStatement, Role::ThenBranch) => {
            // First statement, unless it sits past the `else` keyword.
            let first = children
                .iter()
                .copied()
                .find(|c| tree.kind(*c).is_statement() || tree.kind(*c) == ElseKw)?;
            if tree.kind(first) == ElseKw {
                None
            } else {
                Some(first)
            }
        }
        (IfStatement, Role::ElseBranch) => children
            .iter()
            .copied()
            .skip_while(|c| tree.kind(*c) != ElseKw)
            .find(|c| tree.kind(*c).is_statement()),
        (ForStatement, Role::ForInitialization | Role::ForUpdate | Role::LoopBody) => {
            let mut section = Role::ForInitialization;
            for child in children {
                match tree.kind(*child) {
                    SyntaxKind::Semicolon => section = Role::ForUpdate,
                    SyntaxKind::RParen => section = Role::LoopBody,
                    kind if kind.is_statement() && section == role => return Some(*child),
                    _ => {}
                }
            }
            None
        }
        (BinaryExpression | AssignmentExpression, Role::LOperand) => children
            .iter()
            .copied()
            .find(|c| tree.kind(*c).is_expression()),
        (BinaryExpression | AssignmentExpression, Role::ROperand) => children
            .iter()
            .copied()
            .filter(|c| tree.kind(*c).is_expression())
            .nth(1),
        _ => children
            .iter()
            .copied()
            .find(|c| role_of(tree, *c) == Some(role)),
    }
}

/// All children holding `role` in `node`, in order.
pub fn find_children_by_role(tree: &SyntaxTree, node: NodeId, role: Role) -> Vec<NodeId> {
    tree.children(node)
        .iter()
        .copied()
        .filter(|c| role_of(tree, *c) == Some(role))
        .collect()
}

/// Check that roles classify every significant child of every node under
/// `node` and that unique roles round-trip through [`find_child_by_role`].
/// Returns one description per violation.
pub fn check_role_consistency(tree: &SyntaxTree, node: NodeId) -> Vec<String> {
    let mut problems = Vec::new();
    for parent in tree.descendants(node) {
        if tree.is_token(parent) {
            continue;
        }
        let parent_kind = tree.kind(parent);
        for child in tree.significant_children(parent) {
            let Some(role) = role_of(tree, child) else {
                problems.push(format!(
                    "{} ({}) has no role in {} ({})",
                    child,
                    tree.kind(child),
                    parent,
                    parent_kind
                ));
                continue;
            };
            if !role.is_unique_in(parent_kind) {
                continue;
            }
            let found = find_child_by_role(tree, parent, role);
            if found != Some(child) {
                problems.push(format!(
                    "{} ({}) has unique role {:?} in {} ({}) but lookup finds {:?}",
                    child,
                    tree.kind(child),
                    role,
                    parent,
                    parent_kind,
                    found
                ));
            }
        }
    }
    problems
}

// ============================================================================
// Jump targets
// ============================================================================

/// Kinds the label search never leaves.
fn is_jump_boundary(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        Method | LambdaExpression | ClassInitializer | Class | SyntaxKind::AnonymousClass
    )
}

fn label_text(tree: &SyntaxTree, jump: NodeId) -> Option<&str> {
    let label = find_child_by_role(tree, jump, Role::Label)?;
    tree.token_text(label)
}

/// The statement a `break` exits: the labelled statement's body for a
/// labelled break, otherwise the innermost loop or switch statement.
pub fn exit_target(tree: &SyntaxTree, jump: NodeId) -> Option<NodeId> {
    jump_target(tree, jump, |kind| {
        crate::kinds::LOOPS.contains(kind) || kind == SwitchStatement
    })
}

/// The loop a `continue` restarts.
pub fn continue_target(tree: &SyntaxTree, jump: NodeId) -> Option<NodeId> {
    jump_target(tree, jump, |kind| crate::kinds::LOOPS.contains(kind))
}

fn jump_target(
    tree: &SyntaxTree,
    jump: NodeId,
    unlabeled: impl Fn(SyntaxKind) -> bool,
) -> Option<NodeId> {
    let label = label_text(tree, jump);
    for ancestor in tree.ancestors(jump).skip(1) {
        let kind = tree.kind(ancestor);
        if is_jump_boundary(kind) || (kind == SwitchExpression && label.is_none()) {
            return None;
        }
        match label {
            Some(name) => {
                if kind == LabeledStatement && label_text(tree, ancestor) == Some(name) {
                    return find_child_by_role(tree, ancestor, Role::Statement);
                }
            }
            None => {
                if unlabeled(kind) {
                    return Some(ancestor);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_expression, parse_statement};

    fn find_kind(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
        tree.descendants(tree.root())
            .find(|n| tree.kind(*n) == kind)
            .unwrap_or_else(|| panic!("no {} in tree", kind))
    }

    #[test]
    fn test_if_branches() {
        let tree = parse_statement("if (a) foo(); else bar();").unwrap();
        let stmt = find_kind(&tree, IfStatement);
        let then = find_child_by_role(&tree, stmt, Role::ThenBranch).unwrap();
        let other = find_child_by_role(&tree, stmt, Role::ElseBranch).unwrap();
        assert_eq!(tree.text(then), "foo();");
        assert_eq!(tree.text(other), "bar();");
        assert_eq!(role_of(&tree, then), Some(Role::ThenBranch));
        assert_eq!(role_of(&tree, other), Some(Role::ElseBranch));
        let cond = find_child_by_role(&tree, stmt, Role::Condition).unwrap();
        assert_eq!(tree.text(cond), "a");
    }

    #[test]
    fn test_if_without_else() {
        let tree = parse_statement("if (a) foo();").unwrap();
        let stmt = find_kind(&tree, IfStatement);
        assert!(find_child_by_role(&tree, stmt, Role::ElseBranch).is_none());
        assert!(find_child_by_role(&tree, stmt, Role::ThenBranch).is_some());
    }

    #[test]
    fn test_for_sections() {
        let tree = parse_statement("for (int i = 0; i < 10; i++) { }").unwrap();
        let stmt = find_kind(&tree, ForStatement);
        let init = find_child_by_role(&tree, stmt, Role::ForInitialization).unwrap();
        let update = find_child_by_role(&tree, stmt, Role::ForUpdate).unwrap();
        let body = find_child_by_role(&tree, stmt, Role::LoopBody).unwrap();
        assert_eq!(tree.text(init), "int i = 0;");
        assert_eq!(tree.text(update), "i++");
        assert_eq!(tree.text(body), "{ }");
    }

    #[test]
    fn test_empty_for_sections_are_placeholders() {
        let tree = parse_statement("for (;;) {}").unwrap();
        let stmt = find_kind(&tree, ForStatement);
        let init = find_child_by_role(&tree, stmt, Role::ForInitialization).unwrap();
        let update = find_child_by_role(&tree, stmt, Role::ForUpdate).unwrap();
        assert_eq!(tree.kind(init), EmptyStatement);
        assert_eq!(tree.kind(update), EmptyStatement);
        assert_eq!(tree.text(update), "");
        assert!(find_child_by_role(&tree, stmt, Role::Condition).is_none());
    }

    #[test]
    fn test_binary_operands() {
        let tree = parse_expression("a - b").unwrap();
        let expr = find_kind(&tree, BinaryExpression);
        let l = find_child_by_role(&tree, expr, Role::LOperand).unwrap();
        let r = find_child_by_role(&tree, expr, Role::ROperand).unwrap();
        let op = find_child_by_role(&tree, expr, Role::OperationSign).unwrap();
        assert_eq!(tree.text(l), "a");
        assert_eq!(tree.text(r), "b");
        assert_eq!(tree.kind(op), Minus);
    }

    #[test]
    fn test_polyadic_operands_repeat() {
        let tree = parse_expression("a && b && c").unwrap();
        let expr = find_kind(&tree, PolyadicExpression);
        assert_eq!(find_children_by_role(&tree, expr, Role::Operand).len(), 3);
        assert_eq!(find_children_by_role(&tree, expr, Role::OperationSign).len(), 2);
        assert!(!Role::Operand.is_unique_in(PolyadicExpression));
        assert!(Role::Operand.is_unique_in(PrefixExpression));
    }

    #[test]
    fn test_conditional_roles() {
        let tree = parse_expression("c ? x : y").unwrap();
        let expr = find_kind(&tree, ConditionalExpression);
        let then = find_child_by_role(&tree, expr, Role::ThenExpression).unwrap();
        let other = find_child_by_role(&tree, expr, Role::ElseExpression).unwrap();
        assert_eq!(tree.text(then), "x");
        assert_eq!(tree.text(other), "y");
    }

    #[test]
    fn test_consistency_on_rich_statement() {
        let tree = parse_statement(
            "try (var r = open(); other) { if (!(o instanceof String s)) return; } catch (IOException | RuntimeException e) { } finally { }",
        )
        .unwrap();
        assert_eq!(check_role_consistency(&tree, tree.root()), Vec::<String>::new());
    }

    #[test]
    fn test_labeled_break_target() {
        let tree =
            parse_statement("outer: for (;;) { while (true) { break outer; } }").unwrap();
        let brk = find_kind(&tree, BreakStatement);
        let target = exit_target(&tree, brk).unwrap();
        assert_eq!(tree.kind(target), ForStatement);
    }

    #[test]
    fn test_unlabeled_break_target() {
        let tree = parse_statement("for (;;) { switch (x) { case 1: break; } }").unwrap();
        let brk = find_kind(&tree, BreakStatement);
        assert_eq!(tree.kind(exit_target(&tree, brk).unwrap()), SwitchStatement);
        let tree = parse_statement("for (;;) { switch (x) { case 1: continue; } }").unwrap();
        let cont = find_kind(&tree, ContinueStatement);
        assert_eq!(tree.kind(continue_target(&tree, cont).unwrap()), ForStatement);
    }

    #[test]
    fn test_label_search_stops_at_lambda() {
        let tree =
            parse_statement("outer: for (;;) { Runnable r = () -> { break outer; }; }").unwrap();
        let brk = find_kind(&tree, BreakStatement);
        assert!(exit_target(&tree, brk).is_none());
    }
}
