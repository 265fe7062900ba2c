// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Role classification over whole files: every significant child has a
//! role, and unique roles look up the child that reports them.

use jtree_syntax::kinds::SyntaxKind;
use jtree_syntax::roles::{find_child_by_role, find_children_by_role, role_of, Role};
use jtree_syntax::{check_role_consistency, parse_compilation_unit, NodeId, SyntaxTree};
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

fn find_kind(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
    tree.descendants(tree.root())
        .find(|n| tree.kind(*n) == kind)
        .unwrap_or_else(|| panic!("no {} in tree", kind))
}

#[test]
fn fixtures_are_role_consistent() {
    for name in ["Shapes.java", "Control.java", "Lambdas.java"] {
        let tree = parse_fixture(name);
        let problems = check_role_consistency(&tree, tree.root());
        assert!(problems.is_empty(), "{}:\n{}", name, problems.join("\n"));
    }
}

#[test]
fn find_by_role_is_inverse_of_role_of() {
    let tree = parse_fixture("Control.java");
    let mut checked = 0;
    for parent in tree.descendants(tree.root()) {
        if tree.is_token(parent) {
            continue;
        }
        for child in tree.significant_children(parent) {
            let Some(role) = role_of(&tree, child) else {
                continue;
            };
            assert!(
                find_children_by_role(&tree, parent, role).contains(&child),
                "{} not found under its own role {:?}",
                child,
                role
            );
            checked += 1;
        }
    }
    assert!(checked > 100);
}

#[test]
fn try_statement_sections() {
    let tree = parse_fixture("Control.java");
    let stmt = find_kind(&tree, SyntaxKind::TryStatement);
    let resources = find_child_by_role(&tree, stmt, Role::ResourceList).unwrap();
    assert!(tree.text(resources).starts_with("(BufferedReader reader"));
    let catches = find_children_by_role(&tree, stmt, Role::CatchSection);
    assert_eq!(catches.len(), 1);
    let param = find_child_by_role(&tree, catches[0], Role::CatchParameter).unwrap();
    assert_eq!(tree.text(param), "FileNotFoundException e");
    let finally = find_child_by_role(&tree, stmt, Role::FinallyBlock).unwrap();
    assert!(tree.text(finally).contains("counter++"));
    assert_ne!(find_child_by_role(&tree, stmt, Role::TryBlock), Some(finally));
}

#[test]
fn switch_rule_roles() {
    let tree = parse_fixture("Shapes.java");
    let guarded = tree
        .descendants(tree.root())
        .filter(|n| tree.kind(*n) == SyntaxKind::SwitchLabeledRule)
        .find(|n| find_child_by_role(&tree, *n, Role::Guard).is_some())
        .unwrap();
    let guard = find_child_by_role(&tree, guarded, Role::Guard).unwrap();
    assert_eq!(tree.text(guard).trim(), "c.radius() == 0");
    let body = find_child_by_role(&tree, guarded, Role::Body).unwrap();
    assert_eq!(tree.kind(body), SyntaxKind::ExpressionStatement);
    let labels = find_child_by_role(&tree, guarded, Role::CaseLabelElementList).unwrap();
    let elements = find_children_by_role(&tree, labels, Role::CaseLabelElement);
    assert_eq!(elements.len(), 1);
    assert_eq!(tree.kind(elements[0]), SyntaxKind::TypeTestPattern);
}

#[test]
fn labeled_loop_roles() {
    let tree = parse_fixture("Control.java");
    let labeled = find_kind(&tree, SyntaxKind::LabeledStatement);
    let label = find_child_by_role(&tree, labeled, Role::Label).unwrap();
    assert_eq!(tree.token_text(label), Some("outer"));
    let stmt = find_child_by_role(&tree, labeled, Role::Statement).unwrap();
    assert_eq!(tree.kind(stmt), SyntaxKind::ForStatement);
    let brk = find_kind(&tree, SyntaxKind::BreakStatement);
    assert_eq!(jtree_syntax::roles::exit_target(&tree, brk), Some(stmt));
}
