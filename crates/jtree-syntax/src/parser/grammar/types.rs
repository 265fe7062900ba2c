// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Types, references, modifiers, annotations and parameters.

use crate::kinds::{SyntaxKind, MODIFIERS, PRIMITIVE_TYPES};
use crate::parser::{PResult, Parser};

use SyntaxKind::*;

impl Parser<'_> {
    /// `Type`, including array dimensions.
    pub(crate) fn type_(&mut self) -> PResult {
        let cp = self.checkpoint();
        self.start_node(Type);
        while self.at(At) {
            self.annotation()?;
        }
        match self.current() {
            Some(kind) if PRIMITIVE_TYPES.contains(kind) => self.bump(),
            Some(Ident) => self.code_reference()?,
            Some(Question) => {
                self.bump();
                if matches!(self.current(), Some(ExtendsKw | SuperKw)) {
                    self.bump();
                    self.type_()?;
                }
            }
            _ => return Err(self.unexpected("type")),
        }
        self.finish_node();
        while self.at(LBracket) && self.nth_at(1, RBracket) {
            self.start_node_at(cp, Type);
            self.bump();
            self.bump();
            self.finish_node();
        }
        Ok(())
    }

    /// A type that may end in `...`, for the last method parameter.
    fn parameter_type(&mut self) -> PResult {
        let cp = self.checkpoint();
        self.type_()?;
        if self.at(Ellipsis) {
            self.start_node_at(cp, Type);
            self.bump();
            self.finish_node();
        }
        Ok(())
    }

    /// Catch parameter type: `A | B | C`.
    pub(crate) fn union_type(&mut self) -> PResult {
        let cp = self.checkpoint();
        self.type_()?;
        if self.at(Pipe) {
            self.start_node_at(cp, Type);
            while self.at(Pipe) {
                self.bump();
                self.type_()?;
            }
            self.finish_node();
        }
        Ok(())
    }

    /// Possibly qualified `JavaCodeReference` with type arguments.
    pub(crate) fn code_reference(&mut self) -> PResult {
        let cp = self.checkpoint();
        self.start_node(JavaCodeReference);
        self.expect_ident()?;
        self.reference_parameter_list_opt()?;
        self.finish_node();
        while self.at(Dot) && self.nth_at(1, Ident) {
            self.start_node_at(cp, JavaCodeReference);
            self.bump();
            self.bump();
            self.reference_parameter_list_opt()?;
            self.finish_node();
        }
        Ok(())
    }

    fn reference_parameter_list_opt(&mut self) -> PResult {
        if self.at(Lt) {
            self.reference_parameter_list()?;
        }
        Ok(())
    }

    /// `<A, B>` or the diamond `<>`.
    pub(crate) fn reference_parameter_list(&mut self) -> PResult {
        self.start_node(ReferenceParameterList);
        self.expect(Lt)?;
        if !self.at(Gt) {
            self.type_()?;
            while self.at(Comma) {
                self.bump();
                self.type_()?;
            }
        }
        self.expect(Gt)?;
        self.finish_node();
        Ok(())
    }

    /// `<T extends A & B, U>`, or an empty zero-width list.
    pub(crate) fn type_parameter_list(&mut self) -> PResult {
        if !self.at(Lt) {
            self.empty_node(TypeParameterList);
            return Ok(());
        }
        self.start_node(TypeParameterList);
        self.bump();
        loop {
            self.type_parameter()?;
            if !self.at(Comma) {
                break;
            }
            self.bump();
        }
        self.expect(Gt)?;
        self.finish_node();
        Ok(())
    }

    fn type_parameter(&mut self) -> PResult {
        self.start_node(TypeParameter);
        while self.at(At) {
            self.annotation()?;
        }
        self.expect_ident()?;
        if self.at(ExtendsKw) {
            self.start_node(ExtendsBoundList);
            self.bump();
            self.type_()?;
            while self.at(Amp) {
                self.bump();
                self.type_()?;
            }
            self.finish_node();
        }
        self.finish_node();
        Ok(())
    }

    /// Modifier keywords and annotations. Always produces a node, which is
    /// zero-width when there are no modifiers.
    pub(crate) fn modifier_list(&mut self) -> PResult {
        if !self.at_modifier() {
            self.empty_node(ModifierList);
            return Ok(());
        }
        self.start_node(ModifierList);
        while self.at_modifier() {
            if self.at(At) {
                self.annotation()?;
            } else if self.at_contextual("sealed") {
                self.require(self.level().has_sealed_classes(), "sealed classes")?;
                self.bump_as(SealedKw);
            } else if self.at_contextual("non") {
                return Err(self.unsupported("non-sealed modifier"));
            } else {
                self.bump();
            }
        }
        self.finish_node();
        Ok(())
    }

    fn at_modifier(&self) -> bool {
        match self.current() {
            Some(At) => !self.nth_at(1, InterfaceKw),
            // `default ->` and `default:` are switch labels.
            Some(DefaultKw) => !matches!(self.nth(1), Some(Colon | Arrow)),
            Some(Ident) => {
                (self.at_contextual("sealed") || self.at_contextual("non"))
                    && matches!(
                        self.nth(1),
                        Some(ClassKw | InterfaceKw | AbstractKw | PublicKw | StaticKw | Minus)
                    )
                    || self.at_contextual("sealed") && self.nth_contextual(1, "record")
            }
            Some(kind) => MODIFIERS.contains(kind),
            None => false,
        }
    }

    /// `@Name`, `@Name(value)` or `@Name(a = 1, b = 2)`.
    pub(crate) fn annotation(&mut self) -> PResult {
        self.start_node(Annotation);
        self.expect(At)?;
        self.code_reference()?;
        if self.at(LParen) {
            self.start_node(AnnotationParameterList);
            self.bump();
            if !self.at(RParen) {
                loop {
                    self.name_value_pair()?;
                    if !self.at(Comma) {
                        break;
                    }
                    self.bump();
                }
            }
            self.expect(RParen)?;
            self.finish_node();
        } else {
            self.empty_node(AnnotationParameterList);
        }
        self.finish_node();
        Ok(())
    }

    fn name_value_pair(&mut self) -> PResult {
        self.start_node(NameValuePair);
        if self.at(Ident) && self.nth_at(1, Eq) {
            self.bump();
            self.bump();
        }
        self.annotation_value()?;
        self.finish_node();
        Ok(())
    }

    fn annotation_value(&mut self) -> PResult {
        match self.current() {
            Some(At) => self.annotation(),
            Some(LBrace) => {
                self.start_node(AnnotationArrayInitializer);
                self.bump();
                while !self.at(RBrace) && !self.at_eof() {
                    self.annotation_value()?;
                    if !self.at(Comma) {
                        break;
                    }
                    self.bump();
                }
                self.expect(RBrace)?;
                self.finish_node();
                Ok(())
            }
            _ => self.conditional_expression(),
        }
    }

    /// `(Type a, final Type... rest)`.
    pub(crate) fn parameter_list(&mut self) -> PResult {
        self.start_node(ParameterList);
        self.expect(LParen)?;
        if !self.at(RParen) {
            loop {
                self.parameter()?;
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

    /// `[modifiers] Type name`.
    pub(crate) fn parameter(&mut self) -> PResult {
        self.start_node(Parameter);
        self.modifier_list()?;
        if self.at(ThisKw) || self.nth_at(1, ThisKw) {
            return Err(self.unsupported("receiver parameter"));
        }
        self.var_check()?;
        self.parameter_type()?;
        self.expect_ident()?;
        if self.at(LBracket) {
            return Err(self.unsupported("array dimensions after a parameter name"));
        }
        self.finish_node();
        Ok(())
    }

    /// Reject `var` below Java 10.
    pub(crate) fn var_check(&self) -> PResult {
        if self.at_contextual("var") && self.nth_at(1, Ident) {
            self.require(self.level().has_var(), "local variable type inference")?;
        }
        Ok(())
    }
}
