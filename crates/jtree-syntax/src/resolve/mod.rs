// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration visibility.
//!
//! Answers "which declarations are visible at this node?" by walking from
//! the node to the root. Scoping is flow sensitive for pattern variables:
//! they are visible only where the condition that binds them is known to
//! have held (or, for a negated test, to have failed).
//!
//! ```ignore
//! let mut ctx = ResolveContext::new();
//! let decls = resolve_visibility(&tree, &mut ctx, place, Some("f"), None);
//! ```
//!
//! # Conflicts
//!
//! A block that declares the same name twice with the same kind advertises
//! neither declaration, and hides outer declarations of that name too.
//! Otherwise the innermost declaration of a name wins.

mod context;
pub mod flow;
mod scope;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug_span;

use crate::kinds::SyntaxKind;
use crate::roles::{find_child_by_role, Role};
use crate::tree::{NodeId, SyntaxTree};

pub use context::ResolveContext;
pub use scope::{expression_bindings, process_declarations};

use scope::{tree_walk_up, WalkOutcome};

/// What sort of name a declaration introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// Locals, parameters, fields, pattern variables, resources, record
    /// components and enum constants.
    Variable,
    /// Classes and type parameters.
    Class,
    Method,
    /// Statement labels.
    Label,
}

impl DeclarationKind {
    /// The kind of name a node of `kind` declares, if it declares one.
    pub fn of(kind: SyntaxKind) -> Option<DeclarationKind> {
        use SyntaxKind::*;
        match kind {
            LocalVariable | Parameter | Field | ResourceVariable | PatternVariable
            | RecordComponent | EnumConstant => Some(DeclarationKind::Variable),
            Class | TypeParameter => Some(DeclarationKind::Class),
            Method => Some(DeclarationKind::Method),
            LabeledStatement => Some(DeclarationKind::Label),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Variable => "variable",
            DeclarationKind::Class => "class",
            DeclarationKind::Method => "method",
            DeclarationKind::Label => "label",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclarationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "variable" => Ok(DeclarationKind::Variable),
            "class" => Ok(DeclarationKind::Class),
            "method" => Ok(DeclarationKind::Method),
            "label" => Ok(DeclarationKind::Label),
            other => Err(format!(
                "unknown declaration kind '{}' (expected variable, class, method or label)",
                other
            )),
        }
    }
}

/// A visible declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// The declaring node: a variable, class, method, type parameter or
    /// labelled statement.
    pub node: NodeId,
    pub name: String,
    pub kind: DeclarationKind,
}

/// Which outcome of an enclosing condition a binding is gated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Polarity {
    WhenTrue,
    WhenFalse,
    #[default]
    WhenBoth,
}

impl Polarity {
    /// `!` swaps true and false.
    pub fn negate(self) -> Polarity {
        match self {
            Polarity::WhenTrue => Polarity::WhenFalse,
            Polarity::WhenFalse => Polarity::WhenTrue,
            Polarity::WhenBoth => Polarity::WhenBoth,
        }
    }
}

/// State handed to a processor along with each declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveState {
    pub polarity: Polarity,
}

impl ResolveState {
    pub fn with_polarity(self, polarity: Polarity) -> ResolveState {
        ResolveState { polarity }
    }
}

/// Receives declarations during a scope walk, innermost first.
pub trait ScopeProcessor {
    /// Handle one declaration. Return `false` to stop the walk.
    fn execute(&mut self, tree: &SyntaxTree, decl: &Declaration, state: ResolveState) -> bool;

    /// Only declarations with this name are interesting.
    fn name_hint(&self) -> Option<&str> {
        None
    }

    /// Are declarations of `kind` interesting?
    #[allow(unused_variables)]
    fn should_process(&self, kind: DeclarationKind) -> bool {
        true
    }

    /// A block declares `name` more than once. Return `false` to stop.
    #[allow(unused_variables)]
    fn conflict(&mut self, name: &str, kind: DeclarationKind) -> bool {
        true
    }
}

/// The declaration `node` makes, if any. `_` declares nothing.
pub(crate) fn declaration_of(tree: &SyntaxTree, node: NodeId) -> Option<Declaration> {
    let kind = DeclarationKind::of(tree.kind(node))?;
    let role = match kind {
        DeclarationKind::Label => Role::Label,
        _ => Role::Name,
    };
    let name = tree.token_text(find_child_by_role(tree, node, role)?)?;
    if name == "_" {
        return None;
    }
    Some(Declaration {
        node,
        name: name.to_string(),
        kind,
    })
}

/// Offer the declaration made by `node` to `processor`.
pub(crate) fn offer<P: ScopeProcessor + ?Sized>(
    tree: &SyntaxTree,
    processor: &mut P,
    node: NodeId,
    state: ResolveState,
) -> bool {
    match declaration_of(tree, node) {
        Some(decl) => deliver(tree, processor, &decl, state),
        None => true,
    }
}

pub(crate) fn deliver<P: ScopeProcessor + ?Sized>(
    tree: &SyntaxTree,
    processor: &mut P,
    decl: &Declaration,
    state: ResolveState,
) -> bool {
    if !processor.should_process(decl.kind) {
        return true;
    }
    if processor.name_hint().is_some_and(|hint| hint != decl.name) {
        return true;
    }
    processor.execute(tree, decl, state)
}

/// Gathers visible declarations, letting inner ones shadow outer ones.
/// Methods never shadow, since overloads coexist.
#[derive(Debug)]
struct Collector<'a> {
    name: Option<&'a str>,
    filter: Option<DeclarationKind>,
    found: Vec<Declaration>,
    shadowed: HashSet<(String, DeclarationKind)>,
}

impl<'a> Collector<'a> {
    fn new(name: Option<&'a str>, filter: Option<DeclarationKind>) -> Self {
        Collector {
            name,
            filter,
            found: Vec::new(),
            shadowed: HashSet::new(),
        }
    }
}

impl ScopeProcessor for Collector<'_> {
    fn execute(&mut self, _tree: &SyntaxTree, decl: &Declaration, _state: ResolveState) -> bool {
        if decl.kind == DeclarationKind::Method {
            self.found.push(decl.clone());
            return true;
        }
        if !self.shadowed.insert((decl.name.clone(), decl.kind)) {
            return true;
        }
        self.found.push(decl.clone());
        // A named lookup is done once the innermost match is in.
        self.name.is_none()
    }

    fn name_hint(&self) -> Option<&str> {
        self.name
    }

    fn should_process(&self, kind: DeclarationKind) -> bool {
        self.filter.is_none_or(|filter| filter == kind)
    }

    fn conflict(&mut self, name: &str, kind: DeclarationKind) -> bool {
        if self.should_process(kind) && self.name.is_none_or(|hint| hint == name) {
            // Hides the name from here outwards.
            self.shadowed.insert((name.to_string(), kind));
        }
        true
    }
}

/// Declarations visible at `place`, innermost first.
///
/// `name` restricts the result to one name (and for anything but methods,
/// to the single innermost declaration); `filter` restricts it to one
/// kind. A malformed tree yields nothing.
pub fn resolve_visibility(
    tree: &SyntaxTree,
    ctx: &mut ResolveContext,
    place: NodeId,
    name: Option<&str>,
    filter: Option<DeclarationKind>,
) -> Vec<Declaration> {
    let span = debug_span!("resolve_visibility", place = %place, name = name.unwrap_or("*"));
    let _enter = span.enter();

    let mut collector = Collector::new(name, filter);
    match tree_walk_up(tree, ctx, &mut collector, place, ResolveState::default()) {
        WalkOutcome::Malformed => Vec::new(),
        WalkOutcome::Completed | WalkOutcome::Stopped => collector.found,
    }
}

/// The innermost declaration of `name` visible at `place`.
pub fn resolve_name(
    tree: &SyntaxTree,
    ctx: &mut ResolveContext,
    place: NodeId,
    name: &str,
    filter: Option<DeclarationKind>,
) -> Option<Declaration> {
    resolve_visibility(tree, ctx, place, Some(name), filter)
        .into_iter()
        .next()
}

/// Run a custom processor over the scope walk from `place`. Returns `false`
/// if the processor stopped the walk or the tree was malformed.
pub fn walk_scopes<P: ScopeProcessor + ?Sized>(
    tree: &SyntaxTree,
    ctx: &mut ResolveContext,
    processor: &mut P,
    place: NodeId,
    state: ResolveState,
) -> bool {
    tree_walk_up(tree, ctx, processor, place, state) == WalkOutcome::Completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_compilation_unit, parse_statement};

    /// The node of `text` that starts at the first occurrence of `marker`.
    fn place_at(tree: &SyntaxTree, marker: &str) -> NodeId {
        let source = tree.text(tree.root());
        let offset = source.find(marker).unwrap();
        tree.significant_token_at_offset(offset).unwrap()
    }

    fn visible_names(text: &str, marker: &str) -> Vec<String> {
        let tree = parse_statement(text).unwrap();
        let place = place_at(&tree, marker);
        let mut ctx = ResolveContext::new();
        resolve_visibility(&tree, &mut ctx, place, None, Some(DeclarationKind::Variable))
            .into_iter()
            .map(|d| d.name)
            .collect()
    }

    fn sees(text: &str, marker: &str, name: &str) -> bool {
        let tree = parse_statement(text).unwrap();
        let place = place_at(&tree, marker);
        let mut ctx = ResolveContext::new();
        resolve_name(&tree, &mut ctx, place, name, None).is_some()
    }

    #[test]
    fn test_polarity_negate() {
        assert_eq!(Polarity::WhenTrue.negate(), Polarity::WhenFalse);
        assert_eq!(Polarity::WhenFalse.negate(), Polarity::WhenTrue);
        assert_eq!(Polarity::WhenBoth.negate(), Polarity::WhenBoth);
        assert_eq!(ResolveState::default().polarity, Polarity::WhenBoth);
    }

    #[test]
    fn test_if_branches() {
        let src = "if (x instanceof Foo f) { THEN(); } else { ELSE(); }";
        assert!(sees(src, "THEN", "f"));
        assert!(!sees(src, "ELSE", "f"));

        let src = "if (!(x instanceof Foo f)) { THEN(); } else { ELSE(); }";
        assert!(!sees(src, "THEN", "f"));
        assert!(sees(src, "ELSE", "f"));
    }

    #[test]
    fn test_pattern_visible_after_if() {
        let src = "{ if (!(x instanceof Foo f)) return; AFTER(); }";
        assert!(sees(src, "AFTER", "f"));
        let src = "{ if (!(x instanceof Foo f)) log(); AFTER(); }";
        assert!(!sees(src, "AFTER", "f"));
    }

    #[test]
    fn test_loop_break_suppresses_leak() {
        let src = "{ while (!(x instanceof Foo f)) { step(); } AFTER(); }";
        assert!(sees(src, "AFTER", "f"));
        let src = "{ while (!(x instanceof Foo f)) { if (c) break; } AFTER(); }";
        assert!(!sees(src, "AFTER", "f"));
    }

    #[test]
    fn test_conditional_and_or() {
        assert!(sees("ok = x instanceof Foo f && USE(f);", "USE", "f"));
        assert!(!sees("ok = x instanceof Foo f || USE(f);", "USE", "f"));
        assert!(sees("ok = !(x instanceof Foo f) || USE(f);", "USE", "f"));
        assert!(sees("r = x instanceof Foo f ? USE(f) : 0;", "USE", "f"));
        assert!(!sees("r = x instanceof Foo f ? 0 : USE(f);", "USE", "f"));
    }

    #[test]
    fn test_block_order_and_conflict() {
        assert_eq!(
            visible_names("{ int a = 1; HERE(); int b = 2; }", "HERE"),
            ["a"]
        );
        let src = "{ int v = 1; int v = 2; HERE(); }";
        assert!(!sees(src, "HERE", "v"));
        assert!(visible_names(src, "HERE").is_empty());
    }

    #[test]
    fn test_innermost_wins() {
        let tree =
            parse_statement("{ int v = 1; { int v = 2; HERE(); } }").unwrap();
        let place = place_at(&tree, "HERE");
        let mut ctx = ResolveContext::new();
        let all = resolve_visibility(&tree, &mut ctx, place, None, None);
        assert_eq!(all.len(), 1);
        assert!(tree.text(all[0].node).starts_with("int v = 2"));
        let named = resolve_name(&tree, &mut ctx, place, "v", None).unwrap();
        assert_eq!(named.node, all[0].node);
    }

    #[test]
    fn test_for_and_lambda_scopes() {
        let src = "for (int i = 0; i < n; i++) { BODY(); }";
        assert!(sees(src, "BODY", "i"));
        assert!(sees("{ Runnable r = (a, b) -> USE(a); }", "USE", "b"));
        assert!(sees("for (String s : list) { BODY(); }", "BODY", "s"));
        assert!(!sees("for (String s : list) { BODY(); }", "list", "s"));
        assert!(sees("for (Point(var x, var y) : pts) { BODY(); }", "BODY", "y"));
    }

    #[test]
    fn test_switch_patterns() {
        let src = "switch (o) { case String s when s.isEmpty() -> RULE(); default -> {} }";
        assert!(sees(src, "RULE", "s"));
        assert!(sees(src, "isEmpty", "s"));

        let src = "switch (o) { case Integer i: FIRST(); break; case String s: SECOND(); }";
        assert!(sees(src, "FIRST", "i"));
        assert!(!sees(src, "SECOND", "i"));
        assert!(sees(src, "SECOND", "s"));
    }

    #[test]
    fn test_try_and_catch() {
        let src = "try (var raw = open(); var buffered = wrap(raw)) { BODY(); } \
                   catch (IOException e) { HANDLE(); }";
        assert!(sees(src, "BODY", "buffered"));
        assert!(sees(src, "wrap", "raw"));
        assert!(!sees(src, "open", "buffered"));
        assert!(sees(src, "HANDLE", "e"));
        assert!(!sees(src, "BODY", "e"));
    }

    #[test]
    fn test_labels() {
        let tree = parse_statement("outer: for (;;) { HERE(); }").unwrap();
        let place = place_at(&tree, "HERE");
        let mut ctx = ResolveContext::new();
        let labels =
            resolve_visibility(&tree, &mut ctx, place, None, Some(DeclarationKind::Label));
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].name, "outer");
    }

    #[test]
    fn test_class_members_and_parameters() {
        let tree = parse_compilation_unit(
            "class A<T> { int count; void run(int n) { HERE(); } void run() {} }",
        )
        .unwrap();
        let place = place_at(&tree, "HERE");
        let mut ctx = ResolveContext::new();
        let names: Vec<(String, DeclarationKind)> =
            resolve_visibility(&tree, &mut ctx, place, None, None)
                .into_iter()
                .map(|d| (d.name, d.kind))
                .collect();
        assert!(names.contains(&("n".to_string(), DeclarationKind::Variable)));
        assert!(names.contains(&("count".to_string(), DeclarationKind::Variable)));
        assert!(names.contains(&("T".to_string(), DeclarationKind::Class)));
        assert!(names.contains(&("A".to_string(), DeclarationKind::Class)));
        let overloads = names
            .iter()
            .filter(|(n, k)| n == "run" && *k == DeclarationKind::Method)
            .count();
        assert_eq!(overloads, 2);
    }

    #[test]
    fn test_cache_invalidation() {
        let mut tree = parse_statement("{ { int a = 1; A(); } { int b = 2; B(); } }").unwrap();
        let a_place = place_at(&tree, "A()");
        let b_place = place_at(&tree, "B()");
        let mut ctx = ResolveContext::new();
        assert!(resolve_name(&tree, &mut ctx, a_place, "a", None).is_some());
        assert!(resolve_name(&tree, &mut ctx, b_place, "b", None).is_some());

        let blocks: Vec<NodeId> = tree
            .descendants(tree.root())
            .filter(|n| tree.kind(*n) == SyntaxKind::CodeBlock)
            .collect();
        let (outer, first, second) = (blocks[0], blocks[1], blocks[2]);
        assert!(ctx.is_cache_fresh(&tree, first));
        assert!(ctx.is_cache_fresh(&tree, second));

        let name = tree
            .descendants(first)
            .find(|n| tree.token_text(*n) == Some("a"))
            .unwrap();
        tree.set_token_text(name, "c");

        assert!(!ctx.is_cache_fresh(&tree, first));
        assert!(!ctx.is_cache_fresh(&tree, outer));
        assert!(ctx.is_cache_fresh(&tree, second));
        assert!(resolve_name(&tree, &mut ctx, a_place, "a", None).is_none());
        assert!(resolve_name(&tree, &mut ctx, a_place, "c", None).is_some());

        ctx.clear_caches();
        assert_eq!(ctx.cached_blocks(), 0);
    }
}
