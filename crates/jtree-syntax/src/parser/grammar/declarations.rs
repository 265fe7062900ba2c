// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Files, classes and class members.

use crate::kinds::SyntaxKind;
use crate::parser::{PResult, Parser};
use crate::tree::Checkpoint;

use SyntaxKind::*;

impl Parser<'_> {
    /// Everything inside a `JavaFile`.
    pub(crate) fn file_body(&mut self) -> PResult {
        if self.at(PackageKw) {
            self.start_node(PackageStatement);
            self.bump();
            self.code_reference()?;
            self.expect(Semicolon)?;
            self.finish_node();
        }
        if self.at(ImportKw) {
            self.start_node(ImportList);
            while self.at(ImportKw) {
                self.import_statement()?;
            }
            self.finish_node();
        } else {
            self.empty_node(ImportList);
        }
        while !self.at_eof() {
            if self.at(Semicolon) {
                self.bump();
                continue;
            }
            if self.at_contextual("module") || self.at_contextual("open") {
                return Err(self.unsupported("module declaration"));
            }
            let cp = self.checkpoint();
            self.modifier_list()?;
            if !self.at_class_keyword() {
                return Err(self.unexpected("class, interface, enum or record"));
            }
            self.class_rest(cp)?;
        }
        Ok(())
    }

    fn import_statement(&mut self) -> PResult {
        self.start_node(ImportStatement);
        self.expect(ImportKw)?;
        if self.at(StaticKw) {
            self.bump();
        }
        self.code_reference()?;
        if self.at(Dot) && self.nth_at(1, Star) {
            self.bump();
            self.bump();
        }
        self.expect(Semicolon)?;
        self.finish_node();
        Ok(())
    }

    pub(crate) fn at_class_keyword(&self) -> bool {
        match self.current() {
            Some(ClassKw | InterfaceKw | EnumKw) => true,
            Some(At) => self.nth_at(1, InterfaceKw),
            Some(Ident) => {
                self.at_contextual("record")
                    && self.nth_at(1, Ident)
                    && matches!(self.nth(2), Some(LParen | Lt))
            }
            _ => false,
        }
    }

    /// A class declaration whose modifier list was parsed after `cp`.
    pub(crate) fn class_rest(&mut self, cp: Checkpoint) -> PResult {
        self.start_node_at(cp, Class);
        let is_enum = self.at(EnumKw);
        let is_record = self.at(Ident);
        match self.current() {
            Some(At) => return Err(self.unsupported("annotation type declaration")),
            Some(Ident) => {
                self.require(self.level().has_records(), "records")?;
                self.bump_as(RecordKw);
            }
            _ => self.bump(),
        }
        self.expect_ident()?;
        self.type_parameter_list()?;
        if is_record {
            self.record_header()?;
        }
        self.reference_list(ExtendsList, ExtendsKw)?;
        self.reference_list(ImplementsList, ImplementsKw)?;
        if self.at_contextual("permits") {
            self.require(self.level().has_sealed_classes(), "sealed classes")?;
            self.start_node(PermitsList);
            self.bump_as(PermitsKw);
            self.reference_list_items()?;
            self.finish_node();
        }
        if is_enum {
            self.enum_body()?;
        } else {
            self.class_body()?;
        }
        self.finish_node();
        Ok(())
    }

    /// `extends A, B` style list, zero-width when the keyword is absent.
    pub(crate) fn reference_list(&mut self, kind: SyntaxKind, keyword: SyntaxKind) -> PResult {
        if !self.at(keyword) {
            self.empty_node(kind);
            return Ok(());
        }
        self.start_node(kind);
        self.bump();
        self.reference_list_items()?;
        self.finish_node();
        Ok(())
    }

    fn reference_list_items(&mut self) -> PResult {
        self.code_reference()?;
        while self.at(Comma) {
            self.bump();
            self.code_reference()?;
        }
        Ok(())
    }

    fn record_header(&mut self) -> PResult {
        self.start_node(RecordHeader);
        self.expect(LParen)?;
        if !self.at(RParen) {
            loop {
                self.start_node(RecordComponent);
                self.modifier_list()?;
                self.type_()?;
                if self.at(Ellipsis) {
                    return Err(self.unsupported("variable arity record component"));
                }
                self.expect_ident()?;
                self.finish_node();
                if !self.at(Comma) {
                    break;
                }
                self.bump();
            }
        }
        self.expect(RParen)?;
        self.finish_node();
        Ok(())
    }

    /// `{ members }`. The braces belong to the enclosing class node.
    pub(crate) fn class_body(&mut self) -> PResult {
        self.expect(LBrace)?;
        self.members()?;
        self.expect(RBrace)
    }

    fn members(&mut self) -> PResult {
        while !self.at(RBrace) && !self.at_eof() {
            if self.at(Semicolon) {
                self.bump();
            } else {
                self.member()?;
            }
        }
        Ok(())
    }

    fn enum_body(&mut self) -> PResult {
        self.expect(LBrace)?;
        while !self.at(Semicolon) && !self.at(RBrace) && !self.at_eof() {
            self.enum_constant()?;
            if !self.at(Comma) {
                break;
            }
            self.bump();
        }
        if self.at(Semicolon) {
            self.bump();
            self.members()?;
        }
        self.expect(RBrace)
    }

    fn enum_constant(&mut self) -> PResult {
        self.start_node(EnumConstant);
        self.modifier_list()?;
        self.expect_ident()?;
        if self.at(LParen) {
            self.arguments()?;
        }
        if self.at(LBrace) {
            self.start_node(EnumConstantInitializer);
            self.class_body()?;
            self.finish_node();
        }
        self.finish_node();
        Ok(())
    }

    /// A single class member.
    pub(crate) fn member(&mut self) -> PResult {
        let cp = self.checkpoint();
        self.modifier_list()?;
        if self.at_class_keyword() {
            return self.class_rest(cp);
        }
        if self.at(LBrace) {
            self.start_node_at(cp, ClassInitializer);
            self.code_block()?;
            self.finish_node();
            return Ok(());
        }
        let is_method = self.at(Lt)
            || (self.at(Ident) && self.nth_at(1, LParen))
            || self
                .scan_type(0)
                .is_some_and(|end| self.nth_at(end, Ident) && self.nth_at(end + 1, LParen));
        if is_method {
            self.method_rest(cp)
        } else {
            self.field_rest(cp)
        }
    }

    fn method_rest(&mut self, cp: Checkpoint) -> PResult {
        self.start_node_at(cp, Method);
        self.type_parameter_list()?;
        // Constructors have no return type.
        if !(self.at(Ident) && self.nth_at(1, LParen)) {
            self.type_()?;
        }
        self.expect_ident()?;
        self.parameter_list()?;
        if self.at(LBracket) {
            return Err(self.unsupported("array dimensions after a method signature"));
        }
        self.reference_list(ThrowsList, ThrowsKw)?;
        if self.at(DefaultKw) {
            return Err(self.unsupported("annotation method default value"));
        }
        if self.at(LBrace) {
            self.code_block()?;
        } else {
            self.expect(Semicolon)?;
        }
        self.finish_node();
        Ok(())
    }

    fn field_rest(&mut self, cp: Checkpoint) -> PResult {
        self.start_node_at(cp, Field);
        self.type_()?;
        self.expect_ident()?;
        self.variable_tail()?;
        self.finish_node();
        Ok(())
    }

    /// `[= initializer] ;` after a variable name.
    pub(crate) fn variable_tail(&mut self) -> PResult {
        if self.at(LBracket) {
            return Err(self.unsupported("array dimensions after a variable name"));
        }
        if self.at(Eq) {
            self.bump();
            self.variable_initializer()?;
        }
        if self.at(Comma) {
            return Err(self.unsupported("multiple declarators in one declaration"));
        }
        self.expect(Semicolon)
    }

    pub(crate) fn variable_initializer(&mut self) -> PResult {
        if self.at(LBrace) {
            self.array_initializer()
        } else {
            self.expression()
        }
    }
}
