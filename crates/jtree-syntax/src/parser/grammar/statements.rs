// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statements, code blocks and switch bodies.

use crate::kinds::SyntaxKind;
use crate::parser::{PResult, Parser};

use SyntaxKind::*;

impl Parser<'_> {
    /// `{ statements }`
    pub(crate) fn code_block(&mut self) -> PResult {
        self.start_node(CodeBlock);
        self.expect(LBrace)?;
        self.with_arrow_lambdas(true, |p| {
            while !p.at(RBrace) && !p.at_eof() {
                p.statement()?;
            }
            Ok(())
        })?;
        self.expect(RBrace)?;
        self.finish_node();
        Ok(())
    }

    pub(crate) fn statement(&mut self) -> PResult {
        match self.current() {
            Some(LBrace) => {
                self.start_node(BlockStatement);
                self.code_block()?;
                self.finish_node();
                Ok(())
            }
            Some(Semicolon) => {
                self.start_node(EmptyStatement);
                self.bump();
                self.finish_node();
                Ok(())
            }
            Some(IfKw) => self.if_statement(),
            Some(WhileKw) => self.while_statement(),
            Some(DoKw) => self.do_while_statement(),
            Some(ForKw) => self.for_statement(),
            Some(SwitchKw) => self.switch_construct(SwitchStatement),
            Some(BreakKw) => self.jump_statement(BreakStatement),
            Some(ContinueKw) => self.jump_statement(ContinueStatement),
            Some(ReturnKw) => self.return_statement(),
            Some(ThrowKw) => self.throw_statement(),
            Some(TryKw) => self.try_statement(),
            Some(SynchronizedKw) if self.nth_at(1, LParen) => self.synchronized_statement(),
            Some(AssertKw) => self.assert_statement(),
            Some(Ident) if self.nth_at(1, Colon) => self.labeled_statement(),
            Some(Ident) if self.at_yield() => self.yield_statement(),
            _ => {
                if self.at_local_class() {
                    self.start_node(DeclarationStatement);
                    let cp = self.checkpoint();
                    self.modifier_list()?;
                    self.class_rest(cp)?;
                    self.finish_node();
                    Ok(())
                } else if self.at_local_variable() {
                    self.start_node(DeclarationStatement);
                    self.local_variable()?;
                    self.finish_node();
                    Ok(())
                } else {
                    self.start_node(ExpressionStatement);
                    self.expression()?;
                    self.expect(Semicolon)?;
                    self.finish_node();
                    Ok(())
                }
            }
        }
    }

    fn at_local_class(&self) -> bool {
        let mut i = 0;
        loop {
            match self.nth(i) {
                Some(FinalKw | AbstractKw | StaticKw | StrictfpKw) => i += 1,
                Some(At) if !self.nth_at(i + 1, InterfaceKw) => match self.scan_modifiers(i) {
                    Some(next) if next > i => i = next,
                    _ => return false,
                },
                Some(ClassKw | InterfaceKw | EnumKw) => return true,
                Some(Ident) if self.nth_text(i) == "sealed" => i += 1,
                Some(Ident) => {
                    return self.nth_text(i) == "record"
                        && self.nth_at(i + 1, Ident)
                        && matches!(self.nth(i + 2), Some(LParen | Lt))
                }
                _ => return false,
            }
        }
    }

    fn at_yield(&self) -> bool {
        self.at_contextual("yield")
            && !matches!(
                self.nth(1),
                Some(
                    Eq | Dot
                        | LParen
                        | LBracket
                        | PlusPlus
                        | MinusMinus
                        | Arrow
                        | Semicolon
                        | PlusEq
                        | MinusEq
                        | StarEq
                        | SlashEq
                )
            )
    }

    /// `LocalVariable`, including its terminating `;`.
    pub(crate) fn local_variable(&mut self) -> PResult {
        self.start_node(LocalVariable);
        self.modifier_list()?;
        self.var_check()?;
        self.type_()?;
        self.expect_ident()?;
        self.variable_tail()?;
        self.finish_node();
        Ok(())
    }

    fn parenthesized_condition(&mut self) -> PResult {
        self.expect(LParen)?;
        self.with_arrow_lambdas(true, |p| p.expression())?;
        self.expect(RParen)
    }

    fn if_statement(&mut self) -> PResult {
        self.start_node(IfStatement);
        self.bump();
        self.parenthesized_condition()?;
        self.statement()?;
        if self.at(ElseKw) {
            self.bump();
            self.statement()?;
        }
        self.finish_node();
        Ok(())
    }

    fn while_statement(&mut self) -> PResult {
        self.start_node(WhileStatement);
        self.bump();
        self.parenthesized_condition()?;
        self.statement()?;
        self.finish_node();
        Ok(())
    }

    fn do_while_statement(&mut self) -> PResult {
        self.start_node(DoWhileStatement);
        self.bump();
        self.statement()?;
        self.expect(WhileKw)?;
        self.parenthesized_condition()?;
        self.expect(Semicolon)?;
        self.finish_node();
        Ok(())
    }

    fn for_statement(&mut self) -> PResult {
        let cp = self.checkpoint();
        self.bump();
        self.expect(LParen)?;

        if self.at_declaration(&[Colon]) {
            self.start_node_at(cp, ForeachStatement);
            self.start_node(Parameter);
            self.modifier_list()?;
            self.var_check()?;
            self.type_()?;
            self.expect_ident()?;
            self.finish_node();
            self.expect(Colon)?;
            self.expression()?;
            self.expect(RParen)?;
            self.statement()?;
            self.finish_node();
            return Ok(());
        }

        if self.at_foreach_pattern() {
            self.start_node_at(cp, ForeachPatternStatement);
            self.require(self.level().has_foreach_record_patterns(), "record patterns in for-each")?;
            self.pattern()?;
            self.expect(Colon)?;
            self.expression()?;
            self.expect(RParen)?;
            self.statement()?;
            self.finish_node();
            return Ok(());
        }

        self.start_node_at(cp, ForStatement);
        if self.at(Semicolon) {
            self.start_node(EmptyStatement);
            self.bump();
            self.finish_node();
        } else if self.at_local_variable() {
            self.start_node(DeclarationStatement);
            self.local_variable()?;
            self.finish_node();
        } else {
            self.expression_list_statement(true)?;
        }
        if !self.at(Semicolon) {
            self.expression()?;
        }
        self.expect(Semicolon)?;
        if self.at(RParen) {
            self.empty_node(EmptyStatement);
        } else {
            self.expression_list_statement(false)?;
        }
        self.expect(RParen)?;
        self.statement()?;
        self.finish_node();
        Ok(())
    }

    fn at_foreach_pattern(&self) -> bool {
        let Some(start) = self.scan_modifiers(0) else {
            return false;
        };
        let Some(end) = self.scan_type(start) else {
            return false;
        };
        self.nth_at(end, LParen)
            && self
                .scan_balanced(end)
                .is_some_and(|close| self.nth_at(close, Colon))
    }

    /// `a, b` in a `for` header: an `ExpressionStatement` for a single
    /// expression, otherwise an `ExpressionListStatement`.
    fn expression_list_statement(&mut self, with_semicolon: bool) -> PResult {
        let cp = self.checkpoint();
        let list = self.checkpoint();
        self.expression()?;
        if self.at(Comma) {
            self.start_node_at(list, ExpressionList);
            while self.at(Comma) {
                self.bump();
                self.expression()?;
            }
            self.finish_node();
            self.start_node_at(cp, ExpressionListStatement);
        } else {
            self.start_node_at(cp, ExpressionStatement);
        }
        if with_semicolon {
            self.expect(Semicolon)?;
        }
        self.finish_node();
        Ok(())
    }

    /// Switch statement or switch expression.
    pub(crate) fn switch_construct(&mut self, kind: SyntaxKind) -> PResult {
        self.start_node(kind);
        self.bump();
        self.parenthesized_condition()?;
        self.start_node(CodeBlock);
        self.expect(LBrace)?;
        while !self.at(RBrace) && !self.at_eof() {
            if self.at(CaseKw) || (self.at(DefaultKw) && matches!(self.nth(1), Some(Colon | Arrow)))
            {
                self.switch_label()?;
            } else {
                self.with_arrow_lambdas(true, |p| p.statement())?;
            }
        }
        self.expect(RBrace)?;
        self.finish_node();
        self.finish_node();
        Ok(())
    }

    fn switch_label(&mut self) -> PResult {
        let cp = self.checkpoint();
        if self.at(DefaultKw) {
            self.bump();
        } else {
            self.bump();
            self.with_arrow_lambdas(false, |p| p.case_label_elements())?;
            if self.at_contextual("when") {
                self.bump_as(WhenKw);
                self.with_arrow_lambdas(false, |p| p.expression())?;
            }
        }
        match self.current() {
            Some(Colon) => {
                self.start_node_at(cp, SwitchLabelStatement);
                self.bump();
                self.finish_node();
            }
            Some(Arrow) => {
                self.require(self.level().has_switch_expressions(), "switch rules")?;
                self.start_node_at(cp, SwitchLabeledRule);
                self.bump();
                self.with_arrow_lambdas(true, |p| p.rule_body())?;
                self.finish_node();
            }
            _ => return Err(self.unexpected("':' or '->'")),
        }
        Ok(())
    }

    fn rule_body(&mut self) -> PResult {
        match self.current() {
            Some(LBrace) => {
                self.start_node(BlockStatement);
                self.code_block()?;
                self.finish_node();
            }
            Some(ThrowKw) => self.throw_statement()?,
            _ => {
                self.start_node(ExpressionStatement);
                self.expression()?;
                self.expect(Semicolon)?;
                self.finish_node();
            }
        }
        Ok(())
    }

    fn case_label_elements(&mut self) -> PResult {
        self.start_node(CaseLabelElementList);
        loop {
            self.case_label_element()?;
            if !self.at(Comma) {
                break;
            }
            self.bump();
        }
        self.finish_node();
        Ok(())
    }

    fn case_label_element(&mut self) -> PResult {
        if self.at(DefaultKw) {
            self.require(self.level().has_switch_patterns(), "'default' case label element")?;
            self.start_node(DefaultCaseLabelElement);
            self.bump();
            self.finish_node();
            return Ok(());
        }
        if self.at(NullKw) {
            self.require(self.level().has_switch_patterns(), "'null' case label")?;
        }
        if self.at_pattern() {
            self.require(self.level().has_switch_patterns(), "patterns in switch")?;
            return self.pattern();
        }
        self.conditional_expression()
    }

    fn jump_statement(&mut self, kind: SyntaxKind) -> PResult {
        self.start_node(kind);
        self.bump();
        if self.at(Ident) {
            self.bump();
        }
        self.expect(Semicolon)?;
        self.finish_node();
        Ok(())
    }

    fn return_statement(&mut self) -> PResult {
        self.start_node(ReturnStatement);
        self.bump();
        if !self.at(Semicolon) {
            self.expression()?;
        }
        self.expect(Semicolon)?;
        self.finish_node();
        Ok(())
    }

    fn throw_statement(&mut self) -> PResult {
        self.start_node(ThrowStatement);
        self.bump();
        self.expression()?;
        self.expect(Semicolon)?;
        self.finish_node();
        Ok(())
    }

    fn yield_statement(&mut self) -> PResult {
        self.require(self.level().has_switch_expressions(), "yield statements")?;
        self.start_node(YieldStatement);
        self.bump_as(YieldKw);
        self.expression()?;
        self.expect(Semicolon)?;
        self.finish_node();
        Ok(())
    }

    fn labeled_statement(&mut self) -> PResult {
        self.start_node(LabeledStatement);
        self.bump();
        self.bump();
        self.statement()?;
        self.finish_node();
        Ok(())
    }

    fn synchronized_statement(&mut self) -> PResult {
        self.start_node(SynchronizedStatement);
        self.bump();
        self.parenthesized_condition()?;
        self.code_block()?;
        self.finish_node();
        Ok(())
    }

    fn assert_statement(&mut self) -> PResult {
        self.start_node(AssertStatement);
        self.bump();
        self.expression()?;
        if self.at(Colon) {
            self.bump();
            self.expression()?;
        }
        self.expect(Semicolon)?;
        self.finish_node();
        Ok(())
    }

    fn try_statement(&mut self) -> PResult {
        self.start_node(TryStatement);
        self.bump();
        let has_resources = self.at(LParen);
        if has_resources {
            self.resource_list()?;
        }
        self.code_block()?;
        let mut handlers = 0;
        while self.at(CatchKw) {
            self.start_node(CatchSection);
            self.bump();
            self.expect(LParen)?;
            self.start_node(Parameter);
            self.modifier_list()?;
            self.union_type()?;
            self.expect_ident()?;
            self.finish_node();
            self.expect(RParen)?;
            self.code_block()?;
            self.finish_node();
            handlers += 1;
        }
        if self.at(FinallyKw) {
            self.bump();
            self.code_block()?;
            handlers += 1;
        }
        if handlers == 0 && !has_resources {
            return Err(self.unexpected("'catch' or 'finally'"));
        }
        self.finish_node();
        Ok(())
    }

    fn resource_list(&mut self) -> PResult {
        self.start_node(ResourceList);
        self.bump();
        loop {
            if self.at_declaration(&[Eq]) {
                self.start_node(ResourceVariable);
                self.modifier_list()?;
                self.var_check()?;
                self.type_()?;
                self.expect_ident()?;
                self.expect(Eq)?;
                self.expression()?;
                self.finish_node();
            } else {
                self.start_node(ResourceExpression);
                self.expression()?;
                self.finish_node();
            }
            if !self.at(Semicolon) {
                break;
            }
            self.bump();
            if self.at(RParen) {
                break;
            }
        }
        self.expect(RParen)?;
        self.finish_node();
        Ok(())
    }
}
