// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expressions and patterns.
//!
//! Binary operators are parsed by precedence climbing. A run of the same
//! operator becomes one `PolyadicExpression` (`a + b + c`); two operands make
//! a `BinaryExpression`. When the operator changes within a precedence level,
//! the run so far is closed and becomes the left operand of the next node.

use crate::kinds::{SyntaxKind, LITERALS, PRIMITIVE_TYPES};
use crate::parser::{PResult, Parser};
use crate::tree::Checkpoint;

use SyntaxKind::*;

const LEVEL_OR: u8 = 1;
const LEVEL_AND: u8 = 2;
const LEVEL_BIT_OR: u8 = 3;
const LEVEL_XOR: u8 = 4;
const LEVEL_BIT_AND: u8 = 5;
const LEVEL_EQUALITY: u8 = 6;
const LEVEL_RELATIONAL: u8 = 7;
const LEVEL_SHIFT: u8 = 8;
const LEVEL_ADDITIVE: u8 = 9;
const LEVEL_MULTIPLICATIVE: u8 = 10;

impl Parser<'_> {
    /// Any expression, including lambdas and assignments.
    pub(crate) fn expression(&mut self) -> PResult {
        if self.at_lambda() {
            return self.lambda();
        }
        let cp = self.checkpoint();
        self.conditional_expression()?;
        if let Some((op, count)) = self.peek_assignment_op() {
            self.start_node_at(cp, AssignmentExpression);
            self.bump_glued(op, count);
            self.expression()?;
            self.finish_node();
        }
        Ok(())
    }

    fn peek_assignment_op(&self) -> Option<(SyntaxKind, usize)> {
        match self.current()? {
            kind @ (Eq | PlusEq | MinusEq | StarEq | SlashEq | AmpEq | PipeEq | CaretEq
            | PercentEq | LtLtEq) => Some((kind, 1)),
            Gt if self.nth_at(1, Ge) && self.nth_adjacent(1) => Some((GtGtEq, 2)),
            Gt if self.nth_at(1, Gt)
                && self.nth_adjacent(1)
                && self.nth_at(2, Ge)
                && self.nth_adjacent(2) =>
            {
                Some((GtGtGtEq, 3))
            }
            _ => None,
        }
    }

    /// `cond ? a : b`, or any binary expression.
    pub(crate) fn conditional_expression(&mut self) -> PResult {
        let cp = self.checkpoint();
        self.binary(LEVEL_OR)?;
        if self.at(Question) {
            self.start_node_at(cp, ConditionalExpression);
            self.bump();
            self.with_arrow_lambdas(true, |p| p.expression())?;
            self.expect(Colon)?;
            if self.at_lambda() {
                self.lambda()?;
            } else {
                self.conditional_expression()?;
            }
            self.finish_node();
        }
        Ok(())
    }

    fn binary(&mut self, level: u8) -> PResult {
        if level > LEVEL_MULTIPLICATIVE {
            return self.unary();
        }
        let cp = self.checkpoint();
        self.binary(level + 1)?;
        let mut operands = 1;
        let mut run: Option<SyntaxKind> = None;
        loop {
            if level == LEVEL_RELATIONAL && self.at(InstanceofKw) {
                self.close_run(cp, operands);
                self.start_node_at(cp, InstanceofExpression);
                self.bump();
                self.instanceof_target()?;
                self.finish_node();
                operands = 1;
                run = None;
                continue;
            }
            let Some((op, count)) = self.peek_binary_op(level) else {
                break;
            };
            if run.is_some_and(|r| r != op) {
                self.close_run(cp, operands);
                operands = 1;
            }
            self.bump_glued(op, count);
            self.binary(level + 1)?;
            operands += 1;
            run = Some(op);
        }
        self.close_run(cp, operands);
        Ok(())
    }

    fn close_run(&mut self, cp: Checkpoint, operands: usize) {
        match operands {
            0 | 1 => {}
            2 => {
                self.start_node_at(cp, BinaryExpression);
                self.finish_node();
            }
            _ => {
                self.start_node_at(cp, PolyadicExpression);
                self.finish_node();
            }
        }
    }

    fn peek_binary_op(&self, level: u8) -> Option<(SyntaxKind, usize)> {
        let kind = self.current()?;
        let single = match (level, kind) {
            (LEVEL_OR, OrOr)
            | (LEVEL_AND, AndAnd)
            | (LEVEL_BIT_OR, Pipe)
            | (LEVEL_XOR, Caret)
            | (LEVEL_BIT_AND, Amp)
            | (LEVEL_EQUALITY, EqEq | Ne)
            | (LEVEL_RELATIONAL, Lt | Le | Ge)
            | (LEVEL_SHIFT, LtLt)
            | (LEVEL_ADDITIVE, Plus | Minus)
            | (LEVEL_MULTIPLICATIVE, Star | Slash | Percent) => true,
            (LEVEL_RELATIONAL, Gt) => {
                !(matches!(self.nth(1), Some(Gt | Ge)) && self.nth_adjacent(1))
            }
            _ => false,
        };
        if single {
            return Some((kind, 1));
        }
        if level == LEVEL_SHIFT && kind == Gt && self.nth_at(1, Gt) && self.nth_adjacent(1) {
            let third = self.nth(2).filter(|_| self.nth_adjacent(2));
            return match third {
                Some(Ge) => None,
                Some(Gt) => {
                    let fourth = self.nth(3).filter(|_| self.nth_adjacent(3));
                    match fourth {
                        Some(Ge | Gt) => None,
                        _ => Some((GtGtGt, 3)),
                    }
                }
                _ => Some((GtGt, 2)),
            };
        }
        None
    }

    fn instanceof_target(&mut self) -> PResult {
        if self.at_pattern() {
            self.require(self.level().has_instanceof_patterns(), "patterns in instanceof")?;
            self.pattern()
        } else {
            if self.at(FinalKw) {
                return Err(self.unexpected("type"));
            }
            self.type_()
        }
    }

    fn unary(&mut self) -> PResult {
        match self.current() {
            Some(Plus | Minus | PlusPlus | MinusMinus | Bang | Tilde) => {
                self.start_node(PrefixExpression);
                self.bump();
                self.unary()?;
                self.finish_node();
                Ok(())
            }
            Some(LParen) if self.at_cast() => {
                self.start_node(TypeCastExpression);
                self.bump();
                self.type_()?;
                while self.at(Amp) {
                    self.bump();
                    self.type_()?;
                }
                self.expect(RParen)?;
                if self.at_lambda() {
                    self.lambda()?;
                } else {
                    self.unary()?;
                }
                self.finish_node();
                Ok(())
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> PResult {
        let cp = self.checkpoint();
        self.primary()?;
        self.selectors(cp)?;
        while matches!(self.current(), Some(PlusPlus | MinusMinus)) {
            self.start_node_at(cp, PostfixExpression);
            self.bump();
            self.finish_node();
        }
        Ok(())
    }

    fn primary(&mut self) -> PResult {
        let cp = self.checkpoint();
        match self.current() {
            Some(TextBlockLiteral) => {
                self.require(self.level().has_text_blocks(), "text blocks")?;
                self.literal();
            }
            Some(kind) if LITERALS.contains(kind) => self.literal(),
            Some(ThisKw | SuperKw) if self.nth_at(1, LParen) => {
                self.start_node(MethodCallExpression);
                self.start_node(ReferenceExpression);
                self.bump();
                self.finish_node();
                self.arguments()?;
                self.finish_node();
            }
            Some(ThisKw) => {
                self.start_node(ThisExpression);
                self.bump();
                self.finish_node();
            }
            Some(SuperKw) => {
                self.start_node(SuperExpression);
                self.bump();
                self.finish_node();
            }
            Some(LParen) => {
                self.start_node(ParenthExpression);
                self.bump();
                self.with_arrow_lambdas(true, |p| p.expression())?;
                self.expect(RParen)?;
                self.finish_node();
            }
            Some(NewKw) => self.new_expression()?,
            Some(SwitchKw) => {
                self.require(self.level().has_switch_expressions(), "switch expressions")?;
                self.switch_construct(SwitchExpression)?;
            }
            Some(kind) if PRIMITIVE_TYPES.contains(kind) => self.type_qualified(cp)?,
            Some(Ident) if self.at_type_qualified_expression() => self.type_qualified(cp)?,
            Some(Ident) if self.nth_at(1, LParen) => {
                self.start_node(MethodCallExpression);
                self.start_node(ReferenceExpression);
                self.bump();
                self.finish_node();
                self.arguments()?;
                self.finish_node();
            }
            Some(Ident) => {
                self.start_node(ReferenceExpression);
                self.bump();
                self.finish_node();
            }
            _ => return Err(self.unexpected("expression")),
        }
        Ok(())
    }

    fn literal(&mut self) {
        self.start_node(LiteralExpression);
        self.bump();
        self.finish_node();
    }

    /// `Type.class` or `Type::member`.
    fn type_qualified(&mut self, cp: Checkpoint) -> PResult {
        self.type_()?;
        if self.at(Dot) && self.nth_at(1, ClassKw) {
            self.start_node_at(cp, ClassObjectAccessExpression);
            self.bump();
            self.bump();
            self.finish_node();
            Ok(())
        } else if self.at(ColonColon) {
            self.method_reference_rest(cp)
        } else {
            Err(self.unexpected("'.class' or '::'"))
        }
    }

    fn method_reference_rest(&mut self, cp: Checkpoint) -> PResult {
        self.start_node_at(cp, MethodRefExpression);
        self.expect(ColonColon)?;
        if self.at(Lt) {
            self.reference_parameter_list()?;
        }
        if self.at(NewKw) {
            self.bump();
        } else {
            self.expect_ident()?;
        }
        self.finish_node();
        Ok(())
    }

    fn selectors(&mut self, cp: Checkpoint) -> PResult {
        loop {
            match self.current() {
                Some(Dot) => match self.nth(1) {
                    Some(Ident) => {
                        self.start_node_at(cp, ReferenceExpression);
                        self.bump();
                        self.bump();
                        self.finish_node();
                        if self.at(LParen) {
                            self.start_node_at(cp, MethodCallExpression);
                            self.arguments()?;
                            self.finish_node();
                        }
                    }
                    Some(Lt) => {
                        self.start_node_at(cp, ReferenceExpression);
                        self.bump();
                        self.reference_parameter_list()?;
                        self.expect_ident()?;
                        self.finish_node();
                        self.start_node_at(cp, MethodCallExpression);
                        self.arguments()?;
                        self.finish_node();
                    }
                    Some(ThisKw) => {
                        self.start_node_at(cp, ThisExpression);
                        self.bump();
                        self.bump();
                        self.finish_node();
                    }
                    Some(SuperKw) => {
                        self.start_node_at(cp, SuperExpression);
                        self.bump();
                        self.bump();
                        self.finish_node();
                    }
                    Some(NewKw) => return Err(self.unsupported("qualified class instance creation")),
                    _ => return Err(self.unexpected("member name")),
                },
                Some(LBracket) => {
                    self.start_node_at(cp, ArrayAccessExpression);
                    self.bump();
                    self.with_arrow_lambdas(true, |p| p.expression())?;
                    self.expect(RBracket)?;
                    self.finish_node();
                }
                Some(ColonColon) => self.method_reference_rest(cp)?,
                _ => return Ok(()),
            }
        }
    }

    /// `(a, b)` argument list.
    pub(crate) fn arguments(&mut self) -> PResult {
        self.start_node(ExpressionList);
        self.expect(LParen)?;
        self.with_arrow_lambdas(true, |p| {
            if !p.at(RParen) {
                p.expression()?;
                while p.at(Comma) {
                    p.bump();
                    p.expression()?;
                }
            }
            Ok(())
        })?;
        self.expect(RParen)?;
        self.finish_node();
        Ok(())
    }

    fn new_expression(&mut self) -> PResult {
        self.start_node(NewExpression);
        self.bump();
        if self.at(Lt) {
            self.reference_parameter_list()?;
        }
        while self.at(At) {
            self.annotation()?;
        }
        match self.current() {
            Some(kind) if PRIMITIVE_TYPES.contains(kind) => self.bump(),
            Some(Ident) => self.code_reference()?,
            _ => return Err(self.unexpected("type")),
        }
        if self.at(LBracket) {
            while self.at(LBracket) {
                self.bump();
                if !self.at(RBracket) {
                    self.with_arrow_lambdas(true, |p| p.expression())?;
                }
                self.expect(RBracket)?;
            }
            if self.at(LBrace) {
                self.array_initializer()?;
            }
        } else {
            self.arguments()?;
            if self.at(LBrace) {
                self.start_node(AnonymousClass);
                self.class_body()?;
                self.finish_node();
            }
        }
        self.finish_node();
        Ok(())
    }

    /// `{a, {b, c}, }`
    pub(crate) fn array_initializer(&mut self) -> PResult {
        self.start_node(ArrayInitializerExpression);
        self.expect(LBrace)?;
        while !self.at(RBrace) && !self.at_eof() {
            self.variable_initializer()?;
            if !self.at(Comma) {
                break;
            }
            self.bump();
        }
        self.expect(RBrace)?;
        self.finish_node();
        Ok(())
    }

    fn lambda(&mut self) -> PResult {
        self.start_node(LambdaExpression);
        if self.at(Ident) {
            self.start_node(ParameterList);
            self.start_node(Parameter);
            self.empty_node(ModifierList);
            self.bump();
            self.finish_node();
            self.finish_node();
        } else {
            self.start_node(ParameterList);
            self.expect(LParen)?;
            if !self.at(RParen) {
                loop {
                    if self.at(Ident) && matches!(self.nth(1), Some(Comma | RParen)) {
                        self.start_node(Parameter);
                        self.empty_node(ModifierList);
                        self.bump();
                        self.finish_node();
                    } else {
                        self.parameter()?;
                    }
                    if !self.at(Comma) {
                        break;
                    }
                    self.bump();
                }
            }
            self.expect(RParen)?;
            self.finish_node();
        }
        self.expect(Arrow)?;
        if self.at(LBrace) {
            self.code_block()?;
        } else {
            self.with_arrow_lambdas(true, |p| p.expression())?;
        }
        self.finish_node();
        Ok(())
    }

    /// Type-test, record or unnamed pattern.
    pub(crate) fn pattern(&mut self) -> PResult {
        if self.at_contextual("_") {
            self.require(self.level().has_unnamed_patterns(), "unnamed patterns")?;
            self.start_node(UnnamedPattern);
            self.bump();
            self.finish_node();
            return Ok(());
        }
        let start = self.scan_modifiers(0).unwrap_or(0);
        let is_record = self
            .scan_type(start)
            .is_some_and(|end| self.nth_at(end, LParen));
        if is_record {
            self.require(self.level().has_record_patterns(), "record patterns")?;
            self.start_node(DeconstructionPattern);
            self.type_()?;
            self.start_node(DeconstructionList);
            self.expect(LParen)?;
            if !self.at(RParen) {
                loop {
                    self.pattern()?;
                    if !self.at(Comma) {
                        break;
                    }
                    self.bump();
                }
            }
            self.expect(RParen)?;
            self.finish_node();
            self.finish_node();
            return Ok(());
        }
        self.start_node(TypeTestPattern);
        self.start_node(PatternVariable);
        self.modifier_list()?;
        self.var_check()?;
        self.type_()?;
        if self.at_contextual("_") {
            self.require(self.level().has_unnamed_patterns(), "unnamed pattern variables")?;
        }
        self.expect_ident()?;
        self.finish_node();
        self.finish_node();
        Ok(())
    }
}
