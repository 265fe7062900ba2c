//! JSON output types and serialization for CLI responses.
//!
//! ## Principles
//!
//! 1. **Status first:** every response has `status` as its first field
//! 2. **Deterministic:** same input gives the same output
//! 3. **Versioned:** responses carry `schema_version`

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{JtreeError, OutputErrorCode};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

/// Location in a source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    /// File path as given on the command line.
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, chars).
    pub col: u32,
    /// Byte offset from file start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_start: Option<usize>,
    /// Byte offset end, exclusive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_end: Option<usize>,
}

impl Location {
    /// Create a new location without byte offsets.
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Location {
            file: file.into(),
            line,
            col,
            byte_start: None,
            byte_end: None,
        }
    }

    /// Create a location covering a byte range of `content`.
    pub fn from_span(file: impl Into<String>, content: &str, span: crate::text::Span) -> Self {
        let (line, col) = crate::text::offset_to_position(content, span.start);
        Location {
            file: file.into(),
            line,
            col,
            byte_start: Some(span.start),
            byte_end: Some(span.end),
        }
    }
}

/// Error details carried by an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Where the error occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ErrorInfo {
    /// Create from a JtreeError.
    pub fn from_error(err: &JtreeError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();

        let (details, location) = match err {
            JtreeError::InvalidArguments { details, .. } => (details.clone(), None),
            JtreeError::NodeNotFound {
                file, line, col, ..
            } => (None, Some(Location::new(file.clone(), *line, *col))),
            JtreeError::SyntaxError { location, .. } => (None, location.clone()),
            _ => (None, None),
        };

        ErrorInfo {
            code,
            message,
            details,
            location,
        }
    }
}

/// Response emitted when a command fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a JtreeError.
    pub fn from_error(err: &JtreeError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Successful response wrapping a command-specific payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse<T> {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Command payload, flattened into the envelope.
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> OkResponse<T> {
    /// Wrap a payload in an ok envelope.
    pub fn new(payload: T) -> Self {
        OkResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            payload,
        }
    }
}

/// Write a response as pretty-printed JSON followed by a newline.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Payload {
        nodes: u32,
    }

    #[test]
    fn ok_response_puts_status_first() {
        let mut out = Vec::new();
        emit_response(&OkResponse::new(Payload { nodes: 3 }), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let status = text.find("\"status\"").unwrap();
        let nodes = text.find("\"nodes\"").unwrap();
        assert!(status < nodes);
        assert!(text.contains("\"schema_version\": \"1\""));
    }

    #[test]
    fn error_response_carries_code_and_location() {
        let err = JtreeError::NodeNotFound {
            what: "if-statement".to_string(),
            file: "A.java".to_string(),
            line: 3,
            col: 7,
        };
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.status, "error");
        assert_eq!(response.error.code, 3);
        assert_eq!(response.error.location, Some(Location::new("A.java", 3, 7)));
    }
}
