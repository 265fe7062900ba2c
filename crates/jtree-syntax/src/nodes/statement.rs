// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement facades.

use crate::edit::{self, EditResult};
use crate::kinds::SyntaxKind;
use crate::roles::{self, find_child_by_role, Role};
use crate::tree::{NodeId, SyntaxTree};

use super::traits::{ast_node, child, children, children_of, sum_node};
use super::{Class, Expression, ExpressionList, LocalVariable, NamedNode, Parameter, Pattern};

ast_node! {
    /// `{ statements }`, also used for method bodies and switch bodies.
    CodeBlock
}

impl CodeBlock {
    pub fn statements(self, tree: &SyntaxTree) -> Vec<Statement> {
        children(tree, self.0, Role::Statement)
    }

    pub fn lbrace(self, tree: &SyntaxTree) -> Option<NodeId> {
        find_child_by_role(tree, self.0, Role::LBrace)
    }

    pub fn rbrace(self, tree: &SyntaxTree) -> Option<NodeId> {
        find_child_by_role(tree, self.0, Role::RBrace)
    }

    /// Append `stmt` after the last statement.
    pub fn add_statement(self, tree: &mut SyntaxTree, stmt: NodeId) -> EditResult<NodeId> {
        edit::add(tree, self.0, stmt)
    }
}

ast_node! {
    /// A nested block used as a statement.
    BlockStatement
}

impl BlockStatement {
    pub fn code_block(self, tree: &SyntaxTree) -> Option<CodeBlock> {
        child(tree, self.0, Role::Body)
    }
}

ast_node! {
    /// A local variable or local class declaration.
    DeclarationStatement
}

impl DeclarationStatement {
    pub fn local_variable(self, tree: &SyntaxTree) -> Option<LocalVariable> {
        child(tree, self.0, Role::Declaration)
    }

    pub fn local_class(self, tree: &SyntaxTree) -> Option<Class> {
        child(tree, self.0, Role::Declaration)
    }
}

ast_node!(ExpressionStatement);

impl ExpressionStatement {
    pub fn expression(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Expression)
    }
}

ast_node! {
    /// `a++, b--` in a `for` header.
    ExpressionListStatement
}

impl ExpressionListStatement {
    pub fn expression_list(self, tree: &SyntaxTree) -> Option<ExpressionList> {
        child(tree, self.0, Role::ExpressionList)
    }
}

ast_node! {
    /// `;`, or the zero-width placeholder for an empty `for` update.
    EmptyStatement
}

ast_node!(IfStatement);

impl IfStatement {
    pub fn condition(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Condition)
    }

    pub fn then_branch(self, tree: &SyntaxTree) -> Option<Statement> {
        child(tree, self.0, Role::ThenBranch)
    }

    pub fn else_branch(self, tree: &SyntaxTree) -> Option<Statement> {
        child(tree, self.0, Role::ElseBranch)
    }

    pub fn else_keyword(self, tree: &SyntaxTree) -> Option<NodeId> {
        find_child_by_role(tree, self.0, Role::ElseKeyword)
    }

    /// Add `stmt` as the else branch. Fails if there already is one.
    pub fn set_else_branch(self, tree: &mut SyntaxTree, stmt: NodeId) -> EditResult<NodeId> {
        edit::add(tree, self.0, stmt)
    }
}

ast_node!(WhileStatement);

impl WhileStatement {
    pub fn condition(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Condition)
    }

    pub fn body(self, tree: &SyntaxTree) -> Option<Statement> {
        child(tree, self.0, Role::LoopBody)
    }
}

ast_node!(DoWhileStatement);

impl DoWhileStatement {
    pub fn condition(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Condition)
    }

    pub fn body(self, tree: &SyntaxTree) -> Option<Statement> {
        child(tree, self.0, Role::LoopBody)
    }
}

ast_node! {
    /// Classic three-part `for`. Empty initialization and update sections
    /// are `EmptyStatement` placeholders.
    ForStatement
}

impl ForStatement {
    pub fn initialization(self, tree: &SyntaxTree) -> Option<Statement> {
        child(tree, self.0, Role::ForInitialization)
    }

    pub fn condition(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Condition)
    }

    pub fn update(self, tree: &SyntaxTree) -> Option<Statement> {
        child(tree, self.0, Role::ForUpdate)
    }

    pub fn body(self, tree: &SyntaxTree) -> Option<Statement> {
        child(tree, self.0, Role::LoopBody)
    }
}

ast_node!(ForeachStatement);

impl ForeachStatement {
    pub fn iteration_parameter(self, tree: &SyntaxTree) -> Option<Parameter> {
        child(tree, self.0, Role::IterationParameter)
    }

    pub fn iterated_value(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::IteratedValue)
    }

    pub fn body(self, tree: &SyntaxTree) -> Option<Statement> {
        child(tree, self.0, Role::LoopBody)
    }
}

ast_node! {
    /// `for (Point(var x, var y) : points)`.
    ForeachPatternStatement
}

impl ForeachPatternStatement {
    pub fn iteration_pattern(self, tree: &SyntaxTree) -> Option<Pattern> {
        child(tree, self.0, Role::IterationPattern)
    }

    pub fn iterated_value(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::IteratedValue)
    }

    pub fn body(self, tree: &SyntaxTree) -> Option<Statement> {
        child(tree, self.0, Role::LoopBody)
    }
}

ast_node!(SwitchStatement);

impl SwitchStatement {
    pub fn selector(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Selector)
    }

    pub fn body(self, tree: &SyntaxTree) -> Option<CodeBlock> {
        child(tree, self.0, Role::SwitchBody)
    }
}

ast_node! {
    /// `case` or `default` label, either `:`-style or `->`-style.
    SwitchLabel: SwitchLabelStatement | SwitchLabeledRule
}

impl SwitchLabel {
    pub fn is_rule(self, tree: &SyntaxTree) -> bool {
        tree.kind(self.0) == SyntaxKind::SwitchLabeledRule
    }

    /// `default:` or `case null, default:`.
    pub fn is_default(self, tree: &SyntaxTree) -> bool {
        if tree.child_of_kind(self.0, SyntaxKind::DefaultKw).is_some() {
            return true;
        }
        self.elements(tree)
            .iter()
            .any(|e| tree.kind(*e) == SyntaxKind::DefaultCaseLabelElement)
    }

    /// The label elements, in order.
    pub fn elements(self, tree: &SyntaxTree) -> Vec<NodeId> {
        find_child_by_role(tree, self.0, Role::CaseLabelElementList)
            .map(|list| roles::find_children_by_role(tree, list, Role::CaseLabelElement))
            .unwrap_or_default()
    }

    pub fn guard(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Guard)
    }

    /// The statement after `->`.
    pub fn rule_body(self, tree: &SyntaxTree) -> Option<Statement> {
        child(tree, self.0, Role::Body)
    }
}

ast_node! {
    BreakStatement
}

impl BreakStatement {
    pub fn label(self, tree: &SyntaxTree) -> Option<&str> {
        find_child_by_role(tree, self.0, Role::Label).and_then(|l| tree.token_text(l))
    }

    /// The statement this `break` exits.
    pub fn exit_target(self, tree: &SyntaxTree) -> Option<NodeId> {
        roles::exit_target(tree, self.0)
    }
}

ast_node!(ContinueStatement);

impl ContinueStatement {
    pub fn label(self, tree: &SyntaxTree) -> Option<&str> {
        find_child_by_role(tree, self.0, Role::Label).and_then(|l| tree.token_text(l))
    }

    pub fn continued_loop(self, tree: &SyntaxTree) -> Option<NodeId> {
        roles::continue_target(tree, self.0)
    }
}

ast_node!(ReturnStatement);

impl ReturnStatement {
    pub fn value(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Expression)
    }
}

ast_node!(ThrowStatement);

impl ThrowStatement {
    pub fn exception(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Expression)
    }
}

ast_node!(YieldStatement);

impl YieldStatement {
    pub fn value(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Expression)
    }
}

ast_node!(TryStatement);

impl TryStatement {
    pub fn resource_list(self, tree: &SyntaxTree) -> Option<ResourceList> {
        child(tree, self.0, Role::ResourceList)
    }

    pub fn try_block(self, tree: &SyntaxTree) -> Option<CodeBlock> {
        child(tree, self.0, Role::TryBlock)
    }

    pub fn catch_sections(self, tree: &SyntaxTree) -> Vec<CatchSection> {
        children(tree, self.0, Role::CatchSection)
    }

    pub fn finally_block(self, tree: &SyntaxTree) -> Option<CodeBlock> {
        child(tree, self.0, Role::FinallyBlock)
    }
}

ast_node!(ResourceList);

impl ResourceList {
    /// Resource variables and expressions, in order.
    pub fn resources(self, tree: &SyntaxTree) -> Vec<NodeId> {
        roles::find_children_by_role(tree, self.0, Role::Resource)
    }

    pub fn variables(self, tree: &SyntaxTree) -> Vec<ResourceVariable> {
        children_of(tree, self.0)
    }
}

ast_node! {
    /// `var in = open()` inside a resource list.
    ResourceVariable
}

impl NamedNode for ResourceVariable {}

impl ResourceVariable {
    pub fn initializer(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Initializer)
    }
}

ast_node!(CatchSection);

impl CatchSection {
    pub fn parameter(self, tree: &SyntaxTree) -> Option<Parameter> {
        child(tree, self.0, Role::CatchParameter)
    }

    pub fn catch_block(self, tree: &SyntaxTree) -> Option<CodeBlock> {
        child(tree, self.0, Role::CatchBlock)
    }
}

ast_node!(LabeledStatement);

impl LabeledStatement {
    pub fn label(self, tree: &SyntaxTree) -> Option<&str> {
        find_child_by_role(tree, self.0, Role::Label).and_then(|l| tree.token_text(l))
    }

    pub fn statement(self, tree: &SyntaxTree) -> Option<Statement> {
        child(tree, self.0, Role::Statement)
    }

    pub fn set_label(self, tree: &mut SyntaxTree, label: &str) -> EditResult {
        edit::set_name(tree, self.0, label)
    }
}

ast_node!(SynchronizedStatement);

impl SynchronizedStatement {
    pub fn lock(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Expression)
    }

    pub fn body(self, tree: &SyntaxTree) -> Option<CodeBlock> {
        child(tree, self.0, Role::Body)
    }
}

ast_node!(AssertStatement);

impl AssertStatement {
    pub fn condition(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::Condition)
    }

    pub fn description(self, tree: &SyntaxTree) -> Option<Expression> {
        child(tree, self.0, Role::AssertDescription)
    }
}

sum_node! {
    /// Any statement.
    Statement {
        Block(BlockStatement),
        Declaration(DeclarationStatement),
        Expression(ExpressionStatement),
        ExpressionList(ExpressionListStatement),
        Empty(EmptyStatement),
        If(IfStatement),
        While(WhileStatement),
        DoWhile(DoWhileStatement),
        For(ForStatement),
        Foreach(ForeachStatement),
        ForeachPattern(ForeachPatternStatement),
        Switch(SwitchStatement),
        Label(SwitchLabel),
        Break(BreakStatement),
        Continue(ContinueStatement),
        Return(ReturnStatement),
        Throw(ThrowStatement),
        Yield(YieldStatement),
        Try(TryStatement),
        Labeled(LabeledStatement),
        Synchronized(SynchronizedStatement),
        Assert(AssertStatement),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::AstNode;
    use crate::parser::parse_statement;

    fn top<N: AstNode>(tree: &SyntaxTree) -> N {
        let id = tree.significant_children(tree.root()).next().unwrap();
        N::cast(tree, id).unwrap()
    }

    #[test]
    fn test_if_accessors() {
        let tree = parse_statement("if (ok) run(); else stop();").unwrap();
        let stmt: IfStatement = top(&tree);
        assert_eq!(stmt.condition(&tree).unwrap().text(&tree), "ok");
        assert!(matches!(stmt.then_branch(&tree), Some(Statement::Expression(_))));
        assert_eq!(stmt.else_branch(&tree).unwrap().text(&tree), "stop();");
    }

    #[test]
    fn test_for_placeholders() {
        let tree = parse_statement("for (;;) {}").unwrap();
        let stmt: ForStatement = top(&tree);
        assert!(matches!(stmt.initialization(&tree), Some(Statement::Empty(_))));
        assert!(matches!(stmt.update(&tree), Some(Statement::Empty(_))));
        assert!(stmt.condition(&tree).is_none());
        assert!(matches!(stmt.body(&tree), Some(Statement::Block(_))));
    }

    #[test]
    fn test_try_parts() {
        let tree = parse_statement(
            "try (var in = open()) { read(in); } catch (IOException e) { } finally { close(); }",
        )
        .unwrap();
        let stmt: TryStatement = top(&tree);
        let resources = stmt.resource_list(&tree).unwrap();
        let vars = resources.variables(&tree);
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name(&tree), Some("in"));
        let catches = stmt.catch_sections(&tree);
        assert_eq!(catches.len(), 1);
        let param = catches[0].parameter(&tree).unwrap();
        assert_eq!(param.name(&tree), Some("e"));
        assert_eq!(stmt.finally_block(&tree).unwrap().statements(&tree).len(), 1);
    }

    #[test]
    fn test_switch_labels() {
        let tree =
            parse_statement("switch (o) { case Integer i when i > 0 -> a(); case null, default -> b(); }")
                .unwrap();
        let stmt: SwitchStatement = top(&tree);
        let labels: Vec<SwitchLabel> = stmt
            .body(&tree)
            .unwrap()
            .statements(&tree)
            .into_iter()
            .filter_map(|s| match s {
                Statement::Label(l) => Some(l),
                _ => None,
            })
            .collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].is_rule(&tree));
        assert!(labels[0].guard(&tree).is_some());
        assert!(!labels[0].is_default(&tree));
        assert!(labels[1].is_default(&tree));
        assert_eq!(labels[1].elements(&tree).len(), 2);
    }

    #[test]
    fn test_labeled_break() {
        let tree = parse_statement("outer: while (true) { break outer; }").unwrap();
        let labeled: LabeledStatement = top(&tree);
        assert_eq!(labeled.label(&tree), Some("outer"));
        let brk = tree
            .descendants(tree.root())
            .find_map(|n| BreakStatement::cast(&tree, n))
            .unwrap();
        assert_eq!(brk.label(&tree), Some("outer"));
        let target = brk.exit_target(&tree).unwrap();
        assert_eq!(Some(target), labeled.statement(&tree).map(|s| s.syntax()));
    }
}
