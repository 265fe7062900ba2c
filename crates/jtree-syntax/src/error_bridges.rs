// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Error bridge implementations for syntax-library errors.
//!
//! This module provides `impl From<X> for JtreeError` conversions from the
//! error types of this crate to the unified `JtreeError` type used by the
//! CLI.
//!
//! These bridges live here rather than in `jtree-core` because `jtree-core`
//! does not depend on the syntax library.

use jtree_core::error::JtreeError;
use crate::edit::EditError;
use crate::parser::ParserError;
use crate::tokenizer::TokError;

// ============================================================================
// Bridge: ParserError -> JtreeError
// ============================================================================

impl From<ParserError> for JtreeError {
    fn from(err: ParserError) -> Self {
        JtreeError::SyntaxError {
            message: err.to_string(),
            location: None,
        }
    }
}

// ============================================================================
// Bridge: TokError -> JtreeError
// ============================================================================

impl From<TokError> for JtreeError {
    fn from(err: TokError) -> Self {
        JtreeError::from(ParserError::from(err))
    }
}

// ============================================================================
// Bridge: EditError -> JtreeError
// ============================================================================

impl From<EditError> for JtreeError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::Fragment(parse_err) => JtreeError::from(parse_err),
            EditError::InvalidIdentifier(name) => {
                JtreeError::invalid_args(format!("invalid identifier: {:?}", name))
            }
            other => JtreeError::EditRejected {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jtree_core::error::OutputErrorCode;
    use crate::kinds::SyntaxKind;
    use crate::parser::parse_compilation_unit;

    #[test]
    fn test_parser_error_is_syntax_error() {
        let err = parse_compilation_unit("class A {").unwrap_err();
        let bridged = JtreeError::from(err);
        assert_eq!(OutputErrorCode::from(&bridged), OutputErrorCode::SyntaxError);
        assert!(bridged.to_string().contains("end of input"));
    }

    #[test]
    fn test_mandatory_child_is_edit_error() {
        let err = EditError::MandatoryChild {
            kind: SyntaxKind::CodeBlock,
            parent: SyntaxKind::Method,
        };
        let bridged = JtreeError::from(err);
        assert_eq!(OutputErrorCode::from(&bridged), OutputErrorCode::EditError);
    }

    #[test]
    fn test_fragment_error_unwraps_to_syntax_error() {
        let parse_err = parse_compilation_unit("class").unwrap_err();
        let bridged = JtreeError::from(EditError::Fragment(parse_err));
        assert!(matches!(bridged, JtreeError::SyntaxError { .. }));
    }

    #[test]
    fn test_invalid_identifier_is_invalid_arguments() {
        let bridged = JtreeError::from(EditError::InvalidIdentifier("class".to_string()));
        assert_eq!(
            OutputErrorCode::from(&bridged),
            OutputErrorCode::InvalidArguments
        );
    }
}
