// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::tokenizer::TokError;
use crate::version::LanguageLevel;

#[allow(clippy::enum_variant_names)]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("tokenizer error: {0}")]
    TokenizerError(#[from] TokError),
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        offset: usize,
    },
    #[error("{feature} is not available at language level {level}")]
    FeatureNotAvailable {
        feature: &'static str,
        level: LanguageLevel,
        offset: usize,
    },
    #[error("{what} is not supported")]
    Unsupported { what: &'static str, offset: usize },
}

impl ParserError {
    /// Byte offset the error points at.
    pub fn offset(&self) -> usize {
        match self {
            ParserError::TokenizerError(err) => err.offset(),
            ParserError::UnexpectedToken { offset, .. }
            | ParserError::FeatureNotAvailable { offset, .. }
            | ParserError::Unsupported { offset, .. } => *offset,
        }
    }
}
