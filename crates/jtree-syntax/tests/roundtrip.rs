// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Round-trip tests for the jtree-syntax parser.
//!
//! Every fixture in `tests/fixtures/` must print back byte for byte, and the
//! parsed tree must pass the structural consistency check.

use difference::assert_diff;
use itertools::Itertools;
use jtree_syntax::{
    parse_compilation_unit, parse_compilation_unit_with_options, prettify_error, LanguageLevel,
    ParseOptions, SyntaxTree,
};
use std::path::PathBuf;

/// Helper to visualize whitespace differences in test output
fn visualize(s: &str) -> String {
    s.replace(' ', "▩").lines().join("↩\n")
}

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
}

fn assert_roundtrip(input: &str, label: &str) -> SyntaxTree {
    let tree = match parse_compilation_unit(input) {
        Ok(tree) => tree,
        Err(e) => panic!("{}", prettify_error(&e, input, label)),
    };
    let generated = tree.text(tree.root());
    if generated != input {
        let got = visualize(&generated);
        let expected = visualize(input);
        assert_diff!(expected.as_ref(), got.as_ref(), "", 0);
    }
    let problems = tree.check_consistency();
    assert!(problems.is_empty(), "{}: inconsistent tree: {:?}", label, problems);
    tree
}

// =============================================================================
// Fixture-based round-trip tests
// =============================================================================

#[test]
fn roundtrip_fixture_shapes() {
    assert_roundtrip(&fixture("Shapes.java"), "Shapes.java");
}

#[test]
fn roundtrip_fixture_control() {
    assert_roundtrip(&fixture("Control.java"), "Control.java");
}

#[test]
fn roundtrip_fixture_lambdas() {
    assert_roundtrip(&fixture("Lambdas.java"), "Lambdas.java");
}

// =============================================================================
// Inline round-trip tests
// =============================================================================

#[test]
fn roundtrip_empty_file() {
    assert_roundtrip("", "empty");
    assert_roundtrip("\n\n// only a comment\n", "comment");
}

#[test]
fn roundtrip_crlf_and_tabs() {
    assert_roundtrip("class A {\r\n\tint x;\r\n\tvoid m() {\r\n\t\tx = 1;\r\n\t}\r\n}\r\n", "crlf");
}

#[test]
fn roundtrip_unicode_identifiers_and_strings() {
    assert_roundtrip("class Grüße { String s = \"héllo → wörld\"; int π = 3; }", "unicode");
}

#[test]
fn roundtrip_nested_generics() {
    assert_roundtrip(
        "class A { java.util.Map<String, java.util.List<java.util.Set<Integer>>> m; }",
        "generics",
    );
}

#[test]
fn roundtrip_token_texts_concatenate() {
    let source = fixture("Control.java");
    let tree = assert_roundtrip(&source, "Control.java");
    let joined: String = tree
        .tokens(tree.root())
        .filter_map(|t| tree.token_text(t))
        .collect();
    assert_eq!(joined, source);
}

#[test]
fn roundtrip_fixtures_at_their_minimum_level() {
    let level = ParseOptions::new(LanguageLevel::JDK_21);
    for name in ["Shapes.java", "Control.java", "Lambdas.java"] {
        let source = fixture(name);
        assert!(parse_compilation_unit_with_options(&source, level).is_ok(), "{}", name);
    }
    let source = fixture("Shapes.java");
    assert!(parse_compilation_unit_with_options(&source, ParseOptions::new(LanguageLevel::JDK_17))
        .is_err());
}
