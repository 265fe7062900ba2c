// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Binary entry point for the jtree CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Dump the tree of a file
//! jtree parse src/A.java --format text
//!
//! # Check round-trip and role consistency at Java 17
//! jtree --level 17 check src/A.java
//!
//! # Which variables are visible at byte offset 120?
//! jtree visible src/A.java --offset 120 --kind variable
//!
//! # Delete the statement enclosing byte offset 120
//! jtree delete src/A.java --offset 120 --kind ExpressionStatement
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use jtree::cli::{
    parse_kind, read_source, run_check, run_delete, run_parse, run_roles, run_visible,
    DumpFormat,
};
use jtree_core::error::{JtreeError, OutputErrorCode};
use jtree_core::output::{emit_response, ErrorResponse, OkResponse};
use jtree_syntax::{DeclarationKind, LanguageLevel, ParseOptions, SyntaxKind};

// ============================================================================
// CLI Structure
// ============================================================================

/// Inspect and edit Java syntax trees.
///
/// All output is JSON on stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "jtree", version, about = "Inspect and edit Java syntax trees")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for stderr output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Java language level: permissive, 8, 11, 17, 21 or 22.
    #[arg(long, global = true, default_value = "permissive")]
    level: LanguageLevel,
}

impl GlobalArgs {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions::new(self.level)
    }
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the syntax tree of a file.
    Parse {
        file: PathBuf,
        /// Tree dump format.
        #[arg(long, value_enum, default_value = "json")]
        format: DumpFormat,
    },
    /// Verify round-trip printing, parent links and child roles.
    Check { file: PathBuf },
    /// Show the innermost node at an offset with the roles of its children.
    Roles {
        file: PathBuf,
        /// Byte offset into the file.
        #[arg(long)]
        offset: usize,
    },
    /// List the declarations visible at an offset, innermost first.
    Visible {
        file: PathBuf,
        /// Byte offset into the file.
        #[arg(long)]
        offset: usize,
        /// Only declarations with this name.
        #[arg(long)]
        name: Option<String>,
        /// Only declarations of this kind: variable, class, method or label.
        #[arg(long)]
        kind: Option<DeclarationKind>,
    },
    /// Delete the innermost node of a kind enclosing an offset and print the
    /// edited source.
    Delete {
        file: PathBuf,
        /// Byte offset into the file.
        #[arg(long)]
        offset: usize,
        /// Node kind, e.g. `IfStatement` or `expression_statement`.
        #[arg(long, value_parser = parse_kind)]
        kind: SyntaxKind,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON like every other response
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), JtreeError> {
    let options = cli.global.parse_options();
    let _span = tracing::info_span!("command", level = %options.level).entered();
    match cli.command {
        Command::Parse { file, format } => {
            let (label, content) = load(&file)?;
            emit(run_parse(&label, &content, options, format)?)
        }
        Command::Check { file } => {
            let (label, content) = load(&file)?;
            emit(run_check(&label, &content, options)?)
        }
        Command::Roles { file, offset } => {
            let (label, content) = load(&file)?;
            emit(run_roles(&label, &content, options, offset)?)
        }
        Command::Visible {
            file,
            offset,
            name,
            kind,
        } => {
            let (label, content) = load(&file)?;
            emit(run_visible(
                &label,
                &content,
                options,
                offset,
                name.as_deref(),
                kind,
            )?)
        }
        Command::Delete { file, offset, kind } => {
            let (label, content) = load(&file)?;
            emit(run_delete(&label, &content, options, offset, kind)?)
        }
    }
}

fn load(path: &Path) -> Result<(String, String), JtreeError> {
    let content = read_source(path)?;
    Ok((path.display().to_string(), content))
}

/// Print a payload in the ok envelope.
fn emit<T: Serialize>(payload: T) -> Result<(), JtreeError> {
    emit_response(&OkResponse::new(payload), &mut io::stdout())
        .map_err(|e| JtreeError::internal(e.to_string()))?;
    io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["jtree", "check", "A.java", "--level", "17"]).unwrap();
        assert_eq!(cli.global.level, LanguageLevel::JDK_17);
        assert_eq!(cli.global.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_bad_level_is_rejected() {
        assert!(Cli::try_parse_from(["jtree", "--level", "7", "check", "A.java"]).is_err());
    }

    #[test]
    fn test_delete_kind_parses() {
        let cli = Cli::try_parse_from([
            "jtree",
            "delete",
            "A.java",
            "--offset",
            "4",
            "--kind",
            "if_statement",
        ])
        .unwrap();
        match cli.command {
            Command::Delete { kind, offset, .. } => {
                assert_eq!(kind, SyntaxKind::IfStatement);
                assert_eq!(offset, 4);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_visible_kind_parses() {
        let cli = Cli::try_parse_from([
            "jtree", "visible", "A.java", "--offset", "0", "--kind", "method",
        ])
        .unwrap();
        match cli.command {
            Command::Visible { kind, name, .. } => {
                assert_eq!(kind, Some(DeclarationKind::Method));
                assert!(name.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
