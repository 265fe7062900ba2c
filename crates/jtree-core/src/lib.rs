//! Core infrastructure for jtree.
//!
//! This crate holds the language-agnostic pieces shared by the syntax library
//! and the CLI:
//!
//! - [`text`]: byte spans and offset/line:column conversion
//! - [`error`]: the unified [`error::JtreeError`] type and stable output codes
//! - [`output`]: the JSON response envelope written by the CLI

pub mod error;
pub mod output;
pub mod text;
