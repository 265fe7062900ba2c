// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definition.

use crate::nodes::{
    // Files and declarations
    Annotation, AnonymousClass, Class, ClassInitializer, CodeReference, EnumConstant, Field,
    ImportStatement, JavaFile, LocalVariable, Method, ModifierList, Parameter, ParameterList,
    RecordComponent, ReferenceList, TypeElement, TypeParameter, TypeParameterList,
    // Statements
    AssertStatement, BlockStatement, BreakStatement, CatchSection, CodeBlock, ContinueStatement,
    DeclarationStatement, DoWhileStatement, EmptyStatement, ExpressionListStatement,
    ExpressionStatement, ForStatement, ForeachPatternStatement, ForeachStatement, IfStatement,
    LabeledStatement, ResourceList, ResourceVariable, ReturnStatement, SwitchLabel,
    SwitchStatement, SynchronizedStatement, ThrowStatement, TryStatement, WhileStatement,
    YieldStatement,
    // Expressions
    ArrayAccessExpression, ArrayInitializerExpression, AssignmentExpression,
    ClassObjectAccessExpression, ConditionalExpression, ExpressionList, InstanceofExpression,
    LambdaExpression, LiteralExpression, MethodCallExpression, MethodRefExpression,
    NewExpression, ParenthExpression, PolyadicExpression, QualifiedKeywordExpression,
    ReferenceExpression, SwitchExpression, TypeCastExpression, UnaryExpression,
    // Patterns
    DeconstructionPattern, PatternVariable, TypeTestPattern, UnnamedPattern,
};
use crate::tree::{NodeId, SyntaxTree};

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// `leave_*` is still called for this node.
    SkipChildren,

    /// Stop traversal entirely. No further `visit_*` or `leave_*` methods
    /// are called.
    Stop,
}

/// Generates `visit_*` and `leave_*` pairs with do-nothing defaults.
///
/// ```ignore
/// visitor_methods! {
///     // visit_if_statement / leave_if_statement for IfStatement
///     if_statement: IfStatement,
/// }
/// ```
macro_rules! visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called before descending into children. Return `VisitResult` to control traversal."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, tree: &SyntaxTree, node: $node_type) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called after all children have been visited. Called even if `SkipChildren` was returned."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, tree: &SyntaxTree, node: $node_type) {}
            )*
        }
    };
}

/// Read-only visitor over a [`SyntaxTree`].
///
/// Every composite node first goes through [`Visitor::visit_node`], then
/// through the typed `visit_*` method for its facade, if it has one. Leaves
/// go through [`Visitor::visit_token`] only. If either visit method asks to
/// skip children, children are skipped; `Stop` from either ends the walk.
///
/// # Example
///
/// ```ignore
/// use jtree_syntax::visitor::{walk, Visitor, VisitResult};
///
/// struct CallCounter(usize);
///
/// impl Visitor for CallCounter {
///     fn visit_method_call_expression(
///         &mut self,
///         _tree: &SyntaxTree,
///         _node: MethodCallExpression,
///     ) -> VisitResult {
///         self.0 += 1;
///         VisitResult::Continue
///     }
/// }
/// ```
pub trait Visitor {
    /// Called for every composite node before its typed method.
    #[allow(unused_variables)]
    fn visit_node(&mut self, tree: &SyntaxTree, node: NodeId) -> VisitResult {
        VisitResult::Continue
    }

    /// Called for every composite node after its typed `leave_*` method.
    #[allow(unused_variables)]
    fn leave_node(&mut self, tree: &SyntaxTree, node: NodeId) {}

    /// Called for every leaf, trivia included.
    #[allow(unused_variables)]
    fn visit_token(&mut self, tree: &SyntaxTree, token: NodeId) -> VisitResult {
        VisitResult::Continue
    }

    // Files and declarations
    visitor_methods! {
        java_file: JavaFile,
        import_statement: ImportStatement,
        class: Class,
        anonymous_class: AnonymousClass,
        enum_constant: EnumConstant,
        method: Method,
        field: Field,
        class_initializer: ClassInitializer,
        local_variable: LocalVariable,
        parameter: Parameter,
        parameter_list: ParameterList,
        record_component: RecordComponent,
        type_parameter_list: TypeParameterList,
        type_parameter: TypeParameter,
        reference_list: ReferenceList,
        modifier_list: ModifierList,
        annotation: Annotation,
        type_element: TypeElement,
        code_reference: CodeReference,
    }

    // Statements
    visitor_methods! {
        code_block: CodeBlock,
        block_statement: BlockStatement,
        declaration_statement: DeclarationStatement,
        expression_statement: ExpressionStatement,
        expression_list_statement: ExpressionListStatement,
        empty_statement: EmptyStatement,
        if_statement: IfStatement,
        while_statement: WhileStatement,
        do_while_statement: DoWhileStatement,
        for_statement: ForStatement,
        foreach_statement: ForeachStatement,
        foreach_pattern_statement: ForeachPatternStatement,
        switch_statement: SwitchStatement,
        switch_label: SwitchLabel,
        break_statement: BreakStatement,
        continue_statement: ContinueStatement,
        return_statement: ReturnStatement,
        throw_statement: ThrowStatement,
        yield_statement: YieldStatement,
        try_statement: TryStatement,
        resource_list: ResourceList,
        resource_variable: ResourceVariable,
        catch_section: CatchSection,
        labeled_statement: LabeledStatement,
        synchronized_statement: SynchronizedStatement,
        assert_statement: AssertStatement,
    }

    // Expressions
    visitor_methods! {
        reference_expression: ReferenceExpression,
        literal_expression: LiteralExpression,
        parenth_expression: ParenthExpression,
        method_call_expression: MethodCallExpression,
        expression_list: ExpressionList,
        new_expression: NewExpression,
        array_initializer_expression: ArrayInitializerExpression,
        array_access_expression: ArrayAccessExpression,
        type_cast_expression: TypeCastExpression,
        unary_expression: UnaryExpression,
        polyadic_expression: PolyadicExpression,
        conditional_expression: ConditionalExpression,
        assignment_expression: AssignmentExpression,
        instanceof_expression: InstanceofExpression,
        lambda_expression: LambdaExpression,
        method_ref_expression: MethodRefExpression,
        qualified_keyword_expression: QualifiedKeywordExpression,
        class_object_access_expression: ClassObjectAccessExpression,
        switch_expression: SwitchExpression,
    }

    // Patterns
    visitor_methods! {
        type_test_pattern: TypeTestPattern,
        pattern_variable: PatternVariable,
        deconstruction_pattern: DeconstructionPattern,
        unnamed_pattern: UnnamedPattern,
    }
}
