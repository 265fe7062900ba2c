// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for tree traversal.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit_*` methods
//! - **Post-order** for `leave_*` methods
//! - Children are visited in source order
//!
//! ```ignore
//! use jtree_syntax::visitor::{walk, Visitor, VisitResult};
//!
//! struct NameCounter {
//!     count: usize,
//! }
//!
//! impl Visitor for NameCounter {
//!     fn visit_reference_expression(
//!         &mut self,
//!         _tree: &SyntaxTree,
//!         _node: ReferenceExpression,
//!     ) -> VisitResult {
//!         self.count += 1;
//!         VisitResult::Continue
//!     }
//! }
//!
//! let mut counter = NameCounter { count: 0 };
//! walk(&tree, tree.root(), &mut counter);
//! ```

mod traits;

pub use traits::{VisitResult, Visitor};

use crate::nodes::{self, AstNode};
use crate::tree::{NodeId, SyntaxTree};

/// Generates the typed dispatch functions. Facade kind sets are disjoint,
/// so at most one arm matches any node.
macro_rules! dispatch {
    ($($base:ident : $facade:ident),* $(,)?) => {
        paste::paste! {
            fn dispatch_visit<V: Visitor + ?Sized>(
                tree: &SyntaxTree,
                node: NodeId,
                visitor: &mut V,
            ) -> VisitResult {
                $(
                    if let Some(typed) = nodes::$facade::cast(tree, node) {
                        return visitor.[<visit_ $base>](tree, typed);
                    }
                )*
                VisitResult::Continue
            }

            fn dispatch_leave<V: Visitor + ?Sized>(tree: &SyntaxTree, node: NodeId, visitor: &mut V) {
                $(
                    if let Some(typed) = nodes::$facade::cast(tree, node) {
                        visitor.[<leave_ $base>](tree, typed);
                        return;
                    }
                )*
            }
        }
    };
}

dispatch! {
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
    type_test_pattern: TypeTestPattern,
    pattern_variable: PatternVariable,
    deconstruction_pattern: DeconstructionPattern,
    unnamed_pattern: UnnamedPattern,
}

/// Walk the subtree rooted at `node`. Returns `VisitResult::Stop` if the
/// visitor stopped the walk, `VisitResult::Continue` otherwise.
pub fn walk<V: Visitor + ?Sized>(tree: &SyntaxTree, node: NodeId, visitor: &mut V) -> VisitResult {
    if tree.is_token(node) {
        return match visitor.visit_token(tree, node) {
            VisitResult::Stop => VisitResult::Stop,
            _ => VisitResult::Continue,
        };
    }

    let generic = visitor.visit_node(tree, node);
    if generic == VisitResult::Stop {
        return VisitResult::Stop;
    }
    let typed = dispatch_visit(tree, node, visitor);
    if typed == VisitResult::Stop {
        return VisitResult::Stop;
    }

    if generic == VisitResult::Continue && typed == VisitResult::Continue {
        for &child in tree.children(node) {
            if walk(tree, child, visitor) == VisitResult::Stop {
                return VisitResult::Stop;
            }
        }
    }

    dispatch_leave(tree, node, visitor);
    visitor.leave_node(tree, node);
    VisitResult::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::SyntaxKind;
    use crate::nodes::{LambdaExpression, MethodCallExpression};
    use crate::parser::parse_statement;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        events: Vec<String>,
        skip_lambdas: bool,
        stop_at: Option<&'static str>,
    }

    impl Visitor for Recorder {
        fn visit_method_call_expression(
            &mut self,
            tree: &SyntaxTree,
            node: MethodCallExpression,
        ) -> VisitResult {
            let name = node.method_name(tree).unwrap_or_default().to_string();
            let stop = self.stop_at == Some(name.as_str());
            self.calls.push(name);
            if stop {
                VisitResult::Stop
            } else {
                VisitResult::Continue
            }
        }

        fn visit_lambda_expression(
            &mut self,
            _tree: &SyntaxTree,
            _node: LambdaExpression,
        ) -> VisitResult {
            if self.skip_lambdas {
                VisitResult::SkipChildren
            } else {
                VisitResult::Continue
            }
        }

        fn visit_node(&mut self, tree: &SyntaxTree, node: NodeId) -> VisitResult {
            if tree.kind(node) == SyntaxKind::IfStatement {
                self.events.push("enter if".to_string());
            }
            VisitResult::Continue
        }

        fn leave_node(&mut self, tree: &SyntaxTree, node: NodeId) {
            if tree.kind(node) == SyntaxKind::IfStatement {
                self.events.push("leave if".to_string());
            }
        }

        fn leave_if_statement(&mut self, _tree: &SyntaxTree, _node: nodes::IfStatement) {
            self.events.push("leave typed if".to_string());
        }
    }

    const SOURCE: &str = "if (a()) { run(() -> b()); } else { c(); }";

    #[test]
    fn test_preorder_calls() {
        let tree = parse_statement(SOURCE).unwrap();
        let mut recorder = Recorder::default();
        assert_eq!(walk(&tree, tree.root(), &mut recorder), VisitResult::Continue);
        assert_eq!(recorder.calls, ["a", "run", "b", "c"]);
        assert_eq!(recorder.events, ["enter if", "leave typed if", "leave if"]);
    }

    #[test]
    fn test_skip_children() {
        let tree = parse_statement(SOURCE).unwrap();
        let mut recorder = Recorder {
            skip_lambdas: true,
            ..Recorder::default()
        };
        walk(&tree, tree.root(), &mut recorder);
        assert_eq!(recorder.calls, ["a", "run", "c"]);
    }

    #[test]
    fn test_stop() {
        let tree = parse_statement(SOURCE).unwrap();
        let mut recorder = Recorder {
            stop_at: Some("run"),
            ..Recorder::default()
        };
        assert_eq!(walk(&tree, tree.root(), &mut recorder), VisitResult::Stop);
        assert_eq!(recorder.calls, ["a", "run"]);
        assert_eq!(recorder.events, ["enter if"]);
    }
}
