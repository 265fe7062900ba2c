//! Error types and error code constants for jtree.
//!
//! This module provides a unified error type (`JtreeError`) that bridges
//! domain-specific errors from the syntax library (tokenizer, parser, edit
//! engine) into a common format suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (file not found, no node at offset)
//! - `4`: Edit errors (a structural edit was rejected)
//! - `5`: Syntax errors (the input could not be tokenized or parsed)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! ## Design
//!
//! - **Unified type**: `JtreeError` is the single error type for CLI output
//! - **Bridging**: `impl From<X> for JtreeError` lives in the root crate
//! - **Code mapping**: `OutputErrorCode` provides stable integer codes for JSON

use std::fmt;

use thiserror::Error;

use crate::output::Location;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (file not found, nothing at the requested offset).
    ResolutionError = 3,
    /// A structural edit was rejected.
    EditError = 4,
    /// The source text could not be tokenized or parsed.
    SyntaxError = 5,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
///
/// Every subsystem error is converted to this type before being rendered as
/// JSON. Each variant carries enough context for a helpful message.
#[derive(Debug, Error)]
pub enum JtreeError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        message: String,
        details: Option<serde_json::Value>,
    },

    /// File not found or unreadable.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// No node of the requested shape at the location.
    #[error("no {what} found at {file}:{line}:{col}")]
    NodeNotFound {
        what: String,
        file: String,
        line: u32,
        col: u32,
    },

    /// Source text failed to tokenize or parse.
    #[error("syntax error: {message}")]
    SyntaxError {
        message: String,
        location: Option<Location>,
    },

    /// A structural edit was rejected.
    #[error("edit rejected: {message}")]
    EditRejected { message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

impl JtreeError {
    /// Create an invalid-arguments error without details.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        JtreeError::InvalidArguments {
            message: message.into(),
            details: None,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        JtreeError::InternalError {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&JtreeError> for OutputErrorCode {
    fn from(err: &JtreeError) -> Self {
        match err {
            JtreeError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            JtreeError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            JtreeError::NodeNotFound { .. } => OutputErrorCode::ResolutionError,
            JtreeError::SyntaxError { .. } => OutputErrorCode::SyntaxError,
            JtreeError::EditRejected { .. } => OutputErrorCode::EditError,
            JtreeError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<JtreeError> for OutputErrorCode {
    fn from(err: JtreeError) -> Self {
        OutputErrorCode::from(&err)
    }
}

impl From<std::io::Error> for JtreeError {
    fn from(err: std::io::Error) -> Self {
        JtreeError::InternalError {
            message: format!("IO error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(OutputErrorCode::InvalidArguments.code(), 2);
        assert_eq!(OutputErrorCode::ResolutionError.code(), 3);
        assert_eq!(OutputErrorCode::EditError.code(), 4);
        assert_eq!(OutputErrorCode::SyntaxError.code(), 5);
        assert_eq!(OutputErrorCode::InternalError.code(), 10);
    }

    #[test]
    fn variants_map_to_codes() {
        let err = JtreeError::FileNotFound {
            path: "A.java".to_string(),
        };
        assert_eq!(OutputErrorCode::from(&err), OutputErrorCode::ResolutionError);

        let err = JtreeError::EditRejected {
            message: "mandatory child".to_string(),
        };
        assert_eq!(OutputErrorCode::from(err), OutputErrorCode::EditError);

        let err = JtreeError::invalid_args("bad offset");
        assert_eq!(err.to_string(), "invalid arguments: bad offset");
    }
}
