// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Token lookahead used to pick between productions that share a prefix:
//! declarations versus expressions, casts versus parenthesized expressions,
//! lambdas, patterns and class literals.
//!
//! All scanners take and return positions relative to the cursor and never
//! build nodes.

use crate::kinds::{SyntaxKind, LITERALS, PRIMITIVE_TYPES};
use crate::parser::Parser;

use SyntaxKind::*;

impl Parser<'_> {
    /// Skip a type starting at `i`. Returns the position after it.
    pub(crate) fn scan_type(&self, mut i: usize) -> Option<usize> {
        i = self.scan_annotations(i)?;
        match self.nth(i)? {
            kind if PRIMITIVE_TYPES.contains(kind) => i += 1,
            Ident => {
                i += 1;
                loop {
                    if self.nth_at(i, Lt) {
                        i = self.scan_type_arguments(i)?;
                    }
                    if self.nth_at(i, Dot) && self.nth_at(i + 1, Ident) {
                        i += 2;
                        continue;
                    }
                    break;
                }
            }
            _ => return None,
        }
        while self.nth_at(i, LBracket) && self.nth_at(i + 1, RBracket) {
            i += 2;
        }
        Some(i)
    }

    /// Skip `<...>` starting at the `<` at `i`.
    pub(crate) fn scan_type_arguments(&self, mut i: usize) -> Option<usize> {
        i += 1;
        if self.nth_at(i, Gt) {
            return Some(i + 1);
        }
        loop {
            if self.nth_at(i, Question) {
                i += 1;
                if matches!(self.nth(i), Some(ExtendsKw | SuperKw)) {
                    i = self.scan_type(i + 1)?;
                }
            } else {
                i = self.scan_type(i)?;
                while self.nth_at(i, Amp) {
                    i = self.scan_type(i + 1)?;
                }
            }
            match self.nth(i)? {
                Comma => i += 1,
                Gt => return Some(i + 1),
                _ => return None,
            }
        }
    }

    fn scan_annotations(&self, mut i: usize) -> Option<usize> {
        while self.nth_at(i, At) && !self.nth_at(i + 1, InterfaceKw) {
            i += 1;
            if !self.nth_at(i, Ident) {
                return None;
            }
            i += 1;
            while self.nth_at(i, Dot) && self.nth_at(i + 1, Ident) {
                i += 2;
            }
            if self.nth_at(i, LParen) {
                i = self.scan_balanced(i)?;
            }
        }
        Some(i)
    }

    /// Skip modifiers and annotations.
    pub(crate) fn scan_modifiers(&self, mut i: usize) -> Option<usize> {
        loop {
            match self.nth(i) {
                Some(FinalKw) => i += 1,
                Some(At) if !self.nth_at(i + 1, InterfaceKw) => i = self.scan_annotations(i)?,
                _ => return Some(i),
            }
        }
    }

    /// Skip a balanced bracket group opened at `i`. Returns the position
    /// after the closing bracket.
    pub(crate) fn scan_balanced(&self, mut i: usize) -> Option<usize> {
        let mut depth = 0usize;
        loop {
            match self.nth(i)? {
                LParen | LBrace | LBracket => depth += 1,
                RParen | RBrace | RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    /// `[final] Type name` followed by one of `follow`.
    pub(crate) fn at_declaration(&self, follow: &[SyntaxKind]) -> bool {
        let Some(start) = self.scan_modifiers(0) else {
            return false;
        };
        let Some(i) = self.scan_type(start) else {
            return false;
        };
        self.nth_at(i, Ident) && self.nth(i + 1).is_some_and(|k| follow.contains(&k))
    }

    /// A local variable declaration statement.
    pub(crate) fn at_local_variable(&self) -> bool {
        if matches!(self.current(), Some(FinalKw | At)) {
            return true;
        }
        self.at_declaration(&[Eq, Semicolon, Comma, LBracket])
    }

    /// `ident ->` or `( ... ) ->`.
    pub(crate) fn at_lambda(&self) -> bool {
        if !self.arrow_lambdas_allowed() {
            return false;
        }
        match self.current() {
            Some(Ident) => self.nth_at(1, Arrow),
            Some(LParen) => self
                .scan_balanced(0)
                .is_some_and(|end| self.nth_at(end, Arrow)),
            _ => false,
        }
    }

    /// `( Type ) operand`, `( Type & Type ) operand` or `( primitive ) ...`.
    pub(crate) fn at_cast(&self) -> bool {
        if !self.at(LParen) {
            return false;
        }
        if self.nth(1).is_some_and(|k| PRIMITIVE_TYPES.contains(k)) {
            return self.scan_type(1).is_some_and(|i| self.nth_at(i, RParen));
        }
        let Some(mut i) = self.scan_type(1) else {
            return false;
        };
        while self.nth_at(i, Amp) {
            match self.scan_type(i + 1) {
                Some(next) => i = next,
                None => return false,
            }
        }
        if !self.nth_at(i, RParen) {
            return false;
        }
        match self.nth(i + 1) {
            Some(kind) if LITERALS.contains(kind) => true,
            Some(
                Ident | LParen | Bang | Tilde | ThisKw | SuperKw | NewKw | SwitchKw,
            ) => true,
            Some(kind) => PRIMITIVE_TYPES.contains(kind),
            None => false,
        }
    }

    /// A type followed by `.class` or by `::` where the type is not a plain
    /// expression (it has type arguments or array dimensions).
    pub(crate) fn at_type_qualified_expression(&self) -> bool {
        let Some(end) = self.scan_type(0) else {
            return false;
        };
        if self.nth_at(end, Dot) && self.nth_at(end + 1, ClassKw) {
            return true;
        }
        if self.nth_at(end, ColonColon) {
            let plain_name = (0..end).all(|i| matches!(self.nth(i), Some(Ident | Dot)));
            return !plain_name;
        }
        false
    }

    /// `Type ident` or `Type(` at a pattern position.
    pub(crate) fn at_pattern(&self) -> bool {
        let Some(start) = self.scan_modifiers(0) else {
            return false;
        };
        if self.nth_contextual(start, "_")
            && matches!(self.nth(start + 1), Some(Comma | RParen | Arrow | Colon))
        {
            return true;
        }
        let Some(end) = self.scan_type(start) else {
            return false;
        };
        if self.nth_at(end, LParen) {
            return true;
        }
        if !self.nth_at(end, Ident) {
            return false;
        }
        // `case FOO when cond` is a constant with a guard, `case Foo when ->`
        // binds a variable named `when`.
        !(self.nth_text(end) == "when"
            && !matches!(self.nth(end + 1), Some(Arrow | Colon | Comma | AndAnd)))
    }
}
