// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration visibility over whole files, with one context shared across
//! queries and edits.

use jtree_syntax::nodes::{AstNode, LocalVariable, NamedNode};
use jtree_syntax::resolve::{walk_scopes, ResolveState, ScopeProcessor};
use jtree_syntax::{
    parse_compilation_unit, resolve_name, resolve_visibility, Declaration, DeclarationKind,
    NodeId, ResolveContext, SyntaxTree,
};
use std::path::PathBuf;

fn parse_fixture(name: &str) -> SyntaxTree {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    let source = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e));
    parse_compilation_unit(&source).unwrap_or_else(|e| panic!("{}: {}", name, e))
}

/// The token starting at the first occurrence of `marker`.
fn place_at(tree: &SyntaxTree, marker: &str) -> NodeId {
    let source = tree.text(tree.root());
    let offset = source
        .find(marker)
        .unwrap_or_else(|| panic!("marker {:?} not found", marker));
    tree.significant_token_at_offset(offset).unwrap()
}

fn sees(tree: &SyntaxTree, ctx: &mut ResolveContext, marker: &str, name: &str) -> bool {
    let place = place_at(tree, marker);
    resolve_name(tree, ctx, place, name, None).is_some()
}

fn names(
    tree: &SyntaxTree,
    ctx: &mut ResolveContext,
    marker: &str,
    kind: DeclarationKind,
) -> Vec<String> {
    let place = place_at(tree, marker);
    resolve_visibility(tree, ctx, place, None, Some(kind))
        .into_iter()
        .map(|d| d.name)
        .collect()
}

#[test]
fn negated_pattern_flows_past_continue() {
    let tree = parse_fixture("Shapes.java");
    let mut ctx = ResolveContext::new();
    assert!(!sees(&tree, &mut ctx, "sum += shape.area()", "circle"));
    assert!(sees(&tree, &mut ctx, "sum += Math.PI", "circle"));
    assert!(sees(&tree, &mut ctx, "sum += Math.PI", "shape"));
    assert!(!sees(&tree, &mut ctx, "return sum;", "shape"));
    assert!(sees(&tree, &mut ctx, "return sum;", "sum"));
}

#[test]
fn pattern_after_if_follows_the_false_outcome() {
    let source = "class A {
    void positive(Object x) {
        if (x instanceof Foo f) return;
        afterPositive();
    }
    void negated(Object x) {
        if (!(x instanceof Foo f)) return;
        afterNegated();
    }
    void branches(Object x) {
        if (x instanceof Foo f) { inThen(); } else { inElse(); }
    }
}
";
    let tree = parse_compilation_unit(source).unwrap();
    let mut ctx = ResolveContext::new();
    // After `if (p) return;` the condition was false, so `f` is unbound
    assert!(!sees(&tree, &mut ctx, "afterPositive", "f"));
    assert!(sees(&tree, &mut ctx, "afterPositive", "x"));
    assert!(sees(&tree, &mut ctx, "afterNegated", "f"));
    assert!(sees(&tree, &mut ctx, "inThen", "f"));
    assert!(!sees(&tree, &mut ctx, "inElse", "f"));
}

#[test]
fn switch_patterns_are_local_to_their_rule() {
    let tree = parse_fixture("Shapes.java");
    let mut ctx = ResolveContext::new();
    assert!(sees(&tree, &mut ctx, "\"a point\"", "c"));
    assert!(sees(&tree, &mut ctx, "\"circle of radius \"", "r"));
    assert!(!sees(&tree, &mut ctx, "\"circle of radius \"", "c"));
    assert!(sees(&tree, &mut ctx, "\"group of \"", "members"));
    assert!(!sees(&tree, &mut ctx, "\"unknown: \"", "s"));
    assert!(sees(&tree, &mut ctx, "\"unknown: \"", "o"));
}

#[test]
fn conditional_and_carries_pattern() {
    let tree = parse_fixture("Shapes.java");
    let mut ctx = ResolveContext::new();
    assert!(sees(&tree, &mut ctx, "Objects.equals", "s"));
    assert!(sees(&tree, &mut ctx, "Objects.equals", "other"));
}

#[test]
fn methods_fields_and_labels() {
    let tree = parse_fixture("Control.java");
    let mut ctx = ResolveContext::new();
    let marker = "found = row *";
    let vars = names(&tree, &mut ctx, marker, DeclarationKind::Variable);
    for expected in ["col", "row", "found", "grid", "target", "index", "counter"] {
        assert!(vars.contains(&expected.to_string()), "{} missing from {:?}", expected, vars);
    }
    let methods = names(&tree, &mut ctx, marker, DeclarationKind::Method);
    for expected in ["search", "read", "classify", "max"] {
        assert!(methods.contains(&expected.to_string()), "{} missing from {:?}", expected, methods);
    }
    assert_eq!(methods.iter().filter(|m| *m == "Control").count(), 2);
    assert_eq!(names(&tree, &mut ctx, marker, DeclarationKind::Label), ["outer"]);
    assert!(names(&tree, &mut ctx, "return found;", DeclarationKind::Label).is_empty());
}

#[test]
fn resources_and_catch_parameters() {
    let tree = parse_fixture("Control.java");
    let mut ctx = ResolveContext::new();
    assert!(sees(&tree, &mut ctx, "out.append(line)", "reader"));
    assert!(sees(&tree, &mut ctx, "out.append(line)", "line"));
    assert!(sees(&tree, &mut ctx, "return \"\";", "e"));
    assert!(!sees(&tree, &mut ctx, "return \"\";", "reader"));
    assert!(!sees(&tree, &mut ctx, "counter++", "e"));
}

#[test]
fn lambdas_and_anonymous_classes_see_enclosing_locals() {
    let tree = parse_fixture("Lambdas.java");
    let mut ctx = ResolveContext::new();
    assert!(sees(&tree, &mut ctx, "nested.get().run()", "nested"));
    assert!(sees(&tree, &mut ctx, "nested.get().run()", "GREETING"));
    assert!(sees(&tree, &mut ctx, "System.out.println(GREETING)", "GREETING"));
    assert!(sees(&tree, &mut ctx, "!s.isEmpty()", "s"));
    assert!(!sees(&tree, &mut ctx, "task.run()", "s"));
    assert!(sees(&tree, &mut ctx, "this.symbol = symbol", "symbol"));
}

#[test]
fn shared_context_follows_edits() {
    let mut tree = parse_fixture("Control.java");
    let mut ctx = ResolveContext::new();
    assert!(sees(&tree, &mut ctx, "return found;", "found"));
    let cached = ctx.cached_blocks();
    assert!(cached > 0);

    let found = resolve_name(&tree, &mut ctx, place_at(&tree, "return found;"), "found", None)
        .unwrap();
    let var = LocalVariable::cast(&tree, found.node).unwrap();
    var.set_name(&mut tree, "result").unwrap();

    assert!(!sees(&tree, &mut ctx, "return found;", "found"));
    assert!(sees(&tree, &mut ctx, "return found;", "result"));
    ctx.clear_caches();
    assert_eq!(ctx.cached_blocks(), 0);
    assert!(sees(&tree, &mut ctx, "return found;", "result"));
}

/// Counts every offered declaration without stopping.
#[derive(Default)]
struct Counter {
    seen: Vec<Declaration>,
}

impl ScopeProcessor for Counter {
    fn execute(&mut self, _tree: &SyntaxTree, decl: &Declaration, _state: ResolveState) -> bool {
        self.seen.push(decl.clone());
        true
    }

    fn should_process(&self, kind: DeclarationKind) -> bool {
        kind == DeclarationKind::Variable
    }
}

#[test]
fn custom_processor_walks_every_scope() {
    let tree = parse_fixture("Control.java");
    let mut ctx = ResolveContext::new();
    let mut counter = Counter::default();
    let place = place_at(&tree, "best = next.compareTo");
    assert!(walk_scopes(&tree, &mut ctx, &mut counter, place, ResolveState::default()));
    let seen: Vec<&str> = counter.seen.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(&seen[..4], ["next", "best", "it", "items"]);
    assert!(seen.contains(&"index"));
    assert!(counter
        .seen
        .iter()
        .all(|d| d.kind == DeclarationKind::Variable));
}
