// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Command implementations for the `jtree` CLI.
//!
//! Each `run_*` function takes the file label, its contents and the parse
//! options, and returns a serializable payload. `main.rs` reads the file,
//! wraps the payload in an [`OkResponse`](jtree_core::output::OkResponse)
//! and prints it.
//!
//! ## Error Handling
//!
//! All functions return `Result<T, JtreeError>`; syntax-library errors are
//! converted by the `From` impls in `jtree_syntax`.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use jtree_core::error::JtreeError;
use jtree_core::output::Location;
use jtree_core::text::{offset_to_position, Span};
use jtree_syntax::edit::delete_child;
use jtree_syntax::nodes::{Class, Method, PatternVariable};
use jtree_syntax::visitor::{walk, VisitResult, Visitor};
use jtree_syntax::{
    check_role_consistency, parse_compilation_unit_with_options, resolve_visibility, role_of,
    DeclarationKind, NodeId, ParseOptions, ParserError, ResolveContext, Role, SyntaxKind,
    SyntaxTree,
};

/// Longest node excerpt included in a summary.
const SNIPPET_LEN: usize = 60;

// ============================================================================
// Input
// ============================================================================

/// Read a source file. A missing file is a resolution error rather than an
/// I/O failure.
pub fn read_source(path: &Path) -> Result<String, JtreeError> {
    if !path.is_file() {
        return Err(JtreeError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

/// A parse error with its position in `file`.
pub fn syntax_error(file: &str, content: &str, err: &ParserError) -> JtreeError {
    let offset = err.offset().min(content.len());
    JtreeError::SyntaxError {
        message: err.to_string(),
        location: Some(Location::from_span(file, content, Span::empty(offset))),
    }
}

/// Parse `content`, attaching the error position on failure.
pub fn parse_source(
    file: &str,
    content: &str,
    options: ParseOptions,
) -> Result<SyntaxTree, JtreeError> {
    let tree = parse_compilation_unit_with_options(content, options)
        .map_err(|e| syntax_error(file, content, &e))?;
    debug!(file, nodes = tree.arena_len(), level = %options.level, "parsed");
    Ok(tree)
}

fn check_offset(content: &str, offset: usize) -> Result<(), JtreeError> {
    if offset > content.len() {
        return Err(JtreeError::invalid_args(format!(
            "offset {} is past the end of the file ({} bytes)",
            offset,
            content.len()
        )));
    }
    Ok(())
}

fn not_found(what: impl Into<String>, file: &str, content: &str, offset: usize) -> JtreeError {
    let (line, col) = offset_to_position(content, offset.min(content.len()));
    JtreeError::NodeNotFound {
        what: what.into(),
        file: file.to_string(),
        line,
        col,
    }
}

/// The significant token at `offset`.
fn token_at(
    tree: &SyntaxTree,
    file: &str,
    content: &str,
    offset: usize,
) -> Result<NodeId, JtreeError> {
    check_offset(content, offset)?;
    tree.significant_token_at_offset(offset)
        .ok_or_else(|| not_found("token", file, content, offset))
}

// ============================================================================
// Shared payload pieces
// ============================================================================

/// One node, briefly.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub id: NodeId,
    pub kind: SyntaxKind,
    pub location: Location,
    /// First line of the node's text, shortened.
    pub snippet: String,
}

impl NodeSummary {
    pub fn new(tree: &SyntaxTree, node: NodeId, file: &str, content: &str) -> Self {
        NodeSummary {
            id: node,
            kind: tree.kind(node),
            location: Location::from_span(file, content, tree.span(node)),
            snippet: snippet(&tree.text(node)),
        }
    }
}

fn snippet(text: &str) -> String {
    let line = text.trim_start().lines().next().unwrap_or_default();
    if line.chars().count() <= SNIPPET_LEN {
        return line.to_string();
    }
    let mut short: String = line.chars().take(SNIPPET_LEN).collect();
    short.push_str("...");
    short
}

// ============================================================================
// parse
// ============================================================================

/// Output format of the `parse` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DumpFormat {
    /// Nested JSON nodes.
    #[default]
    Json,
    /// Indented text, one element per line.
    Text,
}

/// One element of a tree dump.
#[derive(Debug, Clone, Serialize)]
pub struct NodeDump {
    pub id: NodeId,
    pub kind: SyntaxKind,
    pub start: usize,
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Token text; absent for composite nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDump>,
}

fn dump_node(tree: &SyntaxTree, node: NodeId, start: usize) -> NodeDump {
    let mut children = Vec::new();
    let mut offset = start;
    for child in tree.children(node) {
        let dumped = dump_node(tree, *child, offset);
        offset = dumped.end;
        children.push(dumped);
    }
    let end = if tree.is_token(node) {
        start + tree.text_len(node)
    } else {
        offset
    };
    NodeDump {
        id: node,
        kind: tree.kind(node),
        start,
        end,
        role: role_of(tree, node),
        text: tree.token_text(node).map(str::to_string),
        children,
    }
}

#[derive(Debug, Serialize)]
pub struct ParsePayload {
    pub file: String,
    pub level: String,
    pub format: DumpFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<NodeDump>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump: Option<String>,
}

pub fn run_parse(
    file: &str,
    content: &str,
    options: ParseOptions,
    format: DumpFormat,
) -> Result<ParsePayload, JtreeError> {
    let tree = parse_source(file, content, options)?;
    let (dumped, dump) = match format {
        DumpFormat::Json => (Some(dump_node(&tree, tree.root(), 0)), None),
        DumpFormat::Text => (None, Some(tree.debug_dump(tree.root()))),
    };
    Ok(ParsePayload {
        file: file.to_string(),
        level: options.level.to_string(),
        format,
        tree: dumped,
        dump,
    })
}

// ============================================================================
// check
// ============================================================================

/// Node counts gathered by one visitor pass.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TreeStats {
    pub classes: usize,
    pub methods: usize,
    pub statements: usize,
    pub expressions: usize,
    pub pattern_variables: usize,
}

impl Visitor for TreeStats {
    fn visit_node(&mut self, tree: &SyntaxTree, node: NodeId) -> VisitResult {
        let kind = tree.kind(node);
        if kind.is_statement() {
            self.statements += 1;
        } else if kind.is_expression() {
            self.expressions += 1;
        }
        VisitResult::Continue
    }

    fn visit_class(&mut self, _tree: &SyntaxTree, _node: Class) -> VisitResult {
        self.classes += 1;
        VisitResult::Continue
    }

    fn visit_method(&mut self, _tree: &SyntaxTree, _node: Method) -> VisitResult {
        self.methods += 1;
        VisitResult::Continue
    }

    fn visit_pattern_variable(&mut self, _tree: &SyntaxTree, _node: PatternVariable) -> VisitResult {
        self.pattern_variables += 1;
        VisitResult::Continue
    }
}

#[derive(Debug, Serialize)]
pub struct CheckPayload {
    pub file: String,
    /// Every check passed.
    pub ok: bool,
    pub nodes: usize,
    /// The tree prints back to the input exactly.
    pub roundtrip: bool,
    /// Parent/child link problems.
    pub structure: Vec<String>,
    /// Children without a role, or whose unique role finds another child.
    pub roles: Vec<String>,
    pub stats: TreeStats,
}

pub fn run_check(
    file: &str,
    content: &str,
    options: ParseOptions,
) -> Result<CheckPayload, JtreeError> {
    let tree = parse_source(file, content, options)?;
    let roundtrip = tree.text(tree.root()) == content;
    let structure = tree.check_consistency();
    let roles = check_role_consistency(&tree, tree.root());
    let ok = roundtrip && structure.is_empty() && roles.is_empty();
    let mut stats = TreeStats::default();
    walk(&tree, tree.root(), &mut stats);
    info!(
        file,
        ok,
        structure = structure.len(),
        roles = roles.len(),
        "checked"
    );
    Ok(CheckPayload {
        file: file.to_string(),
        ok,
        nodes: tree.descendants(tree.root()).count(),
        roundtrip,
        structure,
        roles,
        stats,
    })
}

// ============================================================================
// roles
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ChildRole {
    #[serde(flatten)]
    pub node: NodeSummary,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct RolesPayload {
    pub file: String,
    pub offset: usize,
    pub node: NodeSummary,
    /// Role of `node` in its parent.
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeSummary>,
    pub children: Vec<ChildRole>,
}

pub fn run_roles(
    file: &str,
    content: &str,
    options: ParseOptions,
    offset: usize,
) -> Result<RolesPayload, JtreeError> {
    let tree = parse_source(file, content, options)?;
    let token = token_at(&tree, file, content, offset)?;
    let node = tree.parent(token).unwrap_or(token);
    let children = tree
        .significant_children(node)
        .map(|child| ChildRole {
            node: NodeSummary::new(&tree, child, file, content),
            role: role_of(&tree, child),
        })
        .collect();
    Ok(RolesPayload {
        file: file.to_string(),
        offset,
        node: NodeSummary::new(&tree, node, file, content),
        role: role_of(&tree, node),
        parent: tree
            .parent(node)
            .map(|p| NodeSummary::new(&tree, p, file, content)),
        children,
    })
}

// ============================================================================
// visible
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VisibleDeclaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub node: NodeSummary,
}

#[derive(Debug, Serialize)]
pub struct VisiblePayload {
    pub file: String,
    pub offset: usize,
    pub place: NodeSummary,
    /// Innermost first.
    pub declarations: Vec<VisibleDeclaration>,
}

pub fn run_visible(
    file: &str,
    content: &str,
    options: ParseOptions,
    offset: usize,
    name: Option<&str>,
    kind: Option<DeclarationKind>,
) -> Result<VisiblePayload, JtreeError> {
    let tree = parse_source(file, content, options)?;
    let place = token_at(&tree, file, content, offset)?;
    let mut ctx = ResolveContext::new();
    let declarations = resolve_visibility(&tree, &mut ctx, place, name, kind)
        .into_iter()
        .map(|decl| VisibleDeclaration {
            node: NodeSummary::new(&tree, decl.node, file, content),
            name: decl.name,
            kind: decl.kind,
        })
        .collect::<Vec<_>>();
    debug!(file, offset, found = declarations.len(), "resolved visibility");
    Ok(VisiblePayload {
        file: file.to_string(),
        offset,
        place: NodeSummary::new(&tree, place, file, content),
        declarations,
    })
}

// ============================================================================
// delete
// ============================================================================

#[derive(Debug, Serialize)]
pub struct DeletePayload {
    pub file: String,
    pub deleted: NodeSummary,
    /// The edited source still parses at the same level.
    pub reparses: bool,
    pub text: String,
}

pub fn run_delete(
    file: &str,
    content: &str,
    options: ParseOptions,
    offset: usize,
    kind: SyntaxKind,
) -> Result<DeletePayload, JtreeError> {
    let mut tree = parse_source(file, content, options)?;
    let token = token_at(&tree, file, content, offset)?;
    let node = tree
        .ancestors(token)
        .find(|n| tree.kind(*n) == kind)
        .ok_or_else(|| not_found(kind.name(), file, content, offset))?;
    let deleted = NodeSummary::new(&tree, node, file, content);
    delete_child(&mut tree, node)?;
    let text = tree.text(tree.root());
    let reparses = parse_compilation_unit_with_options(&text, options).is_ok();
    info!(file, kind = %kind, reparses, "deleted node");
    Ok(DeletePayload {
        file: file.to_string(),
        deleted,
        reparses,
        text,
    })
}

/// Parse a node kind name such as `IfStatement` or `if_statement`.
pub fn parse_kind(name: &str) -> Result<SyntaxKind, String> {
    SyntaxKind::from_name(name).ok_or_else(|| format!("unknown node kind '{}'", name))
}
