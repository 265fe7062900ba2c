// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Separator-delimited lists: argument and parameter lists, type parameter
//! and type argument lists, annotation parameters and arrays, array
//! initializers, deconstruction lists, record headers, case labels, resource
//! lists, reference lists and modifier lists.
//!
//! Insertion adds exactly one separator between the new element and its
//! neighbouring element; deletion removes exactly one. The whitespace that
//! insertion produces is removed again by deletion, so inserting and then
//! deleting the same element restores the original text.

use crate::kinds::SyntaxKind;
use crate::roles::{find_child_by_role, Role};
use crate::tree::{NodeId, SyntaxTree};

use super::{
    delete_child, detach_all, has_text_before, insert_tokens, new_ws, tidy_space_around, EditError,
    EditResult,
};

use SyntaxKind::*;

/// How elements of a list are delimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Separator {
    /// `", "`
    Comma,
    /// `"; "`
    Semicolon,
    /// `" & "`
    Amp,
    /// A single space.
    Space,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ListShape {
    pub open: Option<SyntaxKind>,
    pub close: Option<SyntaxKind>,
    pub keyword: Option<SyntaxKind>,
    pub separator: Separator,
}

const fn shape(
    open: Option<SyntaxKind>,
    close: Option<SyntaxKind>,
    keyword: Option<SyntaxKind>,
    separator: Separator,
) -> ListShape {
    ListShape {
        open,
        close,
        keyword,
        separator,
    }
}

pub(crate) fn list_shape(kind: SyntaxKind) -> Option<ListShape> {
    let parens = (Some(LParen), Some(RParen));
    let angles = (Some(Lt), Some(Gt));
    let braces = (Some(LBrace), Some(RBrace));
    let s = match kind {
        ExpressionList | ParameterList | AnnotationParameterList | DeconstructionList
        | RecordHeader => shape(parens.0, parens.1, None, Separator::Comma),
        ResourceList => shape(parens.0, parens.1, None, Separator::Semicolon),
        TypeParameterList | ReferenceParameterList => {
            shape(angles.0, angles.1, None, Separator::Comma)
        }
        AnnotationArrayInitializer | ArrayInitializerExpression => {
            shape(braces.0, braces.1, None, Separator::Comma)
        }
        CaseLabelElementList => shape(None, None, None, Separator::Comma),
        ExtendsList => shape(None, None, Some(ExtendsKw), Separator::Comma),
        ImplementsList => shape(None, None, Some(ImplementsKw), Separator::Comma),
        ThrowsList => shape(None, None, Some(ThrowsKw), Separator::Comma),
        PermitsList => shape(None, None, Some(PermitsKw), Separator::Comma),
        ExtendsBoundList => shape(None, None, Some(ExtendsKw), Separator::Amp),
        ModifierList => shape(None, None, None, Separator::Space),
        _ => return None,
    };
    Some(s)
}

/// Is `child` an element (rather than a bracket, keyword or separator) of
/// `list`?
pub(crate) fn is_element(tree: &SyntaxTree, list: NodeId, child: NodeId) -> bool {
    let kind = tree.kind(child);
    if kind.is_trivia() {
        return false;
    }
    match tree.kind(list) {
        ModifierList => true,
        _ => !tree.is_token(child),
    }
}

pub(crate) fn elements(tree: &SyntaxTree, list: NodeId) -> Vec<NodeId> {
    tree.children(list)
        .iter()
        .copied()
        .filter(|c| is_element(tree, list, *c))
        .collect()
}

fn separator_tokens(tree: &mut SyntaxTree, separator: Separator) -> Vec<NodeId> {
    match separator {
        Separator::Comma => vec![tree.new_token(Comma, ","), new_ws(tree, " ")],
        Separator::Semicolon => vec![tree.new_token(Semicolon, ";"), new_ws(tree, " ")],
        Separator::Amp => vec![
            new_ws(tree, " "),
            tree.new_token(Amp, "&"),
            new_ws(tree, " "),
        ],
        Separator::Space => vec![new_ws(tree, " ")],
    }
}

fn is_separator(kind: SyntaxKind, separator: Separator) -> bool {
    match separator {
        Separator::Comma => kind == Comma,
        Separator::Semicolon => kind == Semicolon,
        Separator::Amp => kind == Amp,
        Separator::Space => false,
    }
}

fn child_of_kind(tree: &SyntaxTree, list: NodeId, kind: Option<SyntaxKind>) -> Option<NodeId> {
    kind.and_then(|k| tree.child_of_kind(list, k))
}

// ============================================================================
// Owner redirection
// ============================================================================

/// Kinds that own a modifier list.
fn has_modifier_list(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        Class
            | Method
            | Field
            | LocalVariable
            | Parameter
            | ClassInitializer
            | RecordComponent
            | PatternVariable
            | EnumConstant
            | ResourceVariable
    )
}

fn is_modifier_like(tree: &SyntaxTree, node: NodeId) -> bool {
    let kind = tree.kind(node);
    kind == Annotation || crate::kinds::MODIFIERS.contains(kind)
}

/// The node that should actually receive `node` when it is added to
/// `parent`. Lists that do not exist yet are created.
pub(crate) fn redirect(tree: &mut SyntaxTree, parent: NodeId, node: NodeId) -> EditResult<NodeId> {
    let kind = tree.kind(node);
    let owner = tree.kind(parent);
    let is_expr = kind.is_expression();
    let target = match (owner, kind) {
        (Annotation, NameValuePair) => tree.child_of_kind(parent, AnnotationParameterList),
        (Method | Class, TypeParameter) => tree.child_of_kind(parent, TypeParameterList),
        (Method | LambdaExpression, Parameter) => tree.child_of_kind(parent, ParameterList),
        (Class, RecordComponent) => tree.child_of_kind(parent, RecordHeader),
        (Method, JavaCodeReference) => tree.child_of_kind(parent, ThrowsList),
        (MethodCallExpression | NewExpression, _) if is_expr => {
            tree.child_of_kind(parent, ExpressionList)
        }
        (EnumConstant, _) if is_expr => Some(enum_arguments(tree, parent)),
        (TryStatement, ResourceVariable | ResourceExpression) => Some(resource_list(tree, parent)),
        (DeconstructionPattern, _) if kind.is_pattern() => {
            tree.child_of_kind(parent, DeconstructionList)
        }
        (SwitchLabelStatement | SwitchLabeledRule, _)
            if is_expr || kind.is_pattern() || kind == DefaultCaseLabelElement =>
        {
            tree.child_of_kind(parent, CaseLabelElementList)
        }
        (TypeParameter, Type) => Some(bound_list(tree, parent)),
        (ExpressionListStatement, _) if is_expr => tree.child_of_kind(parent, ExpressionList),
        (
            BlockStatement | Method | LambdaExpression | ClassInitializer | SynchronizedStatement,
            _,
        ) if kind.is_statement() => tree.child_of_kind(parent, CodeBlock),
        (_, _) if has_modifier_list(owner) && is_modifier_like(tree, node) => {
            tree.child_of_kind(parent, ModifierList)
        }
        _ => Some(parent),
    };
    target.ok_or_else(|| {
        EditError::Malformed(format!("{} has no place for a {}", owner, kind))
    })
}

/// The argument list of an enum constant, created as `()` if absent.
fn enum_arguments(tree: &mut SyntaxTree, constant: NodeId) -> NodeId {
    if let Some(list) = tree.child_of_kind(constant, ExpressionList) {
        return list;
    }
    let open = tree.new_token(LParen, "(");
    let close = tree.new_token(RParen, ")");
    let list = tree.new_node(ExpressionList, vec![open, close]);
    match tree.child_of_kind(constant, Ident) {
        Some(name) => tree.insert_next_to(name, list, false),
        None => {
            let len = tree.children(constant).len();
            tree.insert_at(constant, len, list);
        }
    }
    list
}

/// The resource list of a `try`, created as ` ()` after the keyword if
/// absent.
fn resource_list(tree: &mut SyntaxTree, try_stmt: NodeId) -> NodeId {
    if let Some(list) = tree.child_of_kind(try_stmt, ResourceList) {
        return list;
    }
    let open = tree.new_token(LParen, "(");
    let close = tree.new_token(RParen, ")");
    let list = tree.new_node(ResourceList, vec![open, close]);
    let space = new_ws(tree, " ");
    let index = tree
        .child_of_kind(try_stmt, TryKw)
        .and_then(|kw| tree.index_in_parent(kw))
        .map_or(0, |i| i + 1);
    tree.insert_at(try_stmt, index, list);
    tree.insert_at(try_stmt, index, space);
    list
}

/// The bound list of a type parameter, created empty after the name.
fn bound_list(tree: &mut SyntaxTree, param: NodeId) -> NodeId {
    if let Some(list) = tree.child_of_kind(param, ExtendsBoundList) {
        return list;
    }
    let list = tree.new_node(ExtendsBoundList, Vec::new());
    let len = tree.children(param).len();
    tree.insert_at(param, len, list);
    list
}

// ============================================================================
// Insertion
// ============================================================================

/// Give an empty list the brackets or keyword it needs before its first
/// element.
fn open_list(tree: &mut SyntaxTree, list: NodeId, shape: &ListShape) {
    let list_kind = tree.kind(list);
    if let Some(keyword) = shape.keyword {
        if tree.child_of_kind(list, keyword).is_none() {
            let text = keyword.fixed_text().unwrap_or_default();
            let tokens = vec![
                new_ws(tree, " "),
                tree.new_token(keyword, text),
                new_ws(tree, " "),
            ];
            insert_tokens(tree, list, 0, tokens);
        }
        return;
    }
    let (Some(open), Some(close)) = (shape.open, shape.close) else {
        return;
    };
    let has_open = tree.child_of_kind(list, open).is_some();
    if has_open {
        return;
    }
    let owner = tree.parent(list);
    let owner_kind = owner.map(|o| tree.kind(o));
    if list_kind == ParameterList && owner_kind == Some(LambdaExpression) {
        // `x -> ...` gains parentheses around its existing parameter.
        let open_token = tree.new_token(open, open.fixed_text().unwrap_or_default());
        tree.insert_at(list, 0, open_token);
        let close_token = tree.new_token(close, close.fixed_text().unwrap_or_default());
        let len = tree.children(list).len();
        tree.insert_at(list, len, close_token);
        return;
    }
    let mut tokens = Vec::new();
    if list_kind == TypeParameterList && owner_kind == Some(Method) && has_text_before(tree, list)
    {
        tokens.push(new_ws(tree, " "));
    }
    tokens.push(tree.new_token(open, open.fixed_text().unwrap_or_default()));
    tokens.push(tree.new_token(close, close.fixed_text().unwrap_or_default()));
    if list_kind == TypeParameterList && owner_kind == Some(Method) && !has_text_before(tree, list)
    {
        tokens.push(new_ws(tree, " "));
    }
    let len = tree.children(list).len();
    insert_tokens(tree, list, len, tokens);
}

/// Insert `node` into a separated list.
pub(crate) fn insert(
    tree: &mut SyntaxTree,
    list: NodeId,
    node: NodeId,
    anchor: Option<NodeId>,
    before: bool,
) -> EditResult<NodeId> {
    let Some(shape) = list_shape(tree.kind(list)) else {
        return Err(EditError::Malformed(format!("{} is not a list", tree.kind(list))));
    };
    let was_empty = elements(tree, list).is_empty();
    open_list(tree, list, &shape);

    let index = match anchor {
        Some(anchor) if tree.parent(anchor) == Some(list) => {
            let i = tree.index_in_parent(anchor).unwrap_or(0);
            if before {
                i
            } else {
                i + 1
            }
        }
        _ => default_index(tree, list, &shape),
    };
    tree.insert_at(list, index, node);

    let prev = tree.prev_significant_sibling(node);
    let next = tree.next_significant_sibling(node);
    if prev.is_some_and(|p| is_element(tree, list, p)) {
        let tokens = separator_tokens(tree, shape.separator);
        let at = tree.index_in_parent(node).unwrap_or(index);
        insert_tokens(tree, list, at, tokens);
    } else if next.is_some_and(|n| is_element(tree, list, n)) {
        let tokens = separator_tokens(tree, shape.separator);
        let at = tree.index_in_parent(node).map_or(index + 1, |i| i + 1);
        insert_tokens(tree, list, at, tokens);
    }

    if was_empty && tree.kind(list) == ModifierList {
        // A modifier list that gains its first element needs a space
        // before whatever follows it.
        let followed_by_space = tree
            .next_sibling(list)
            .is_some_and(|n| tree.kind(n) == Whitespace);
        if !followed_by_space {
            let space = new_ws(tree, " ");
            tree.insert_next_to(list, space, false);
        }
    }
    Ok(node)
}

fn default_index(tree: &SyntaxTree, list: NodeId, shape: &ListShape) -> usize {
    let children = tree.children(list);
    if let Some(last) = elements(tree, list).last() {
        return tree.index_in_parent(*last).map_or(children.len(), |i| i + 1);
    }
    if let Some(close) = child_of_kind(tree, list, shape.close) {
        return tree.index_in_parent(close).unwrap_or(children.len());
    }
    if let Some(open) = child_of_kind(tree, list, shape.open) {
        return tree.index_in_parent(open).map_or(children.len(), |i| i + 1);
    }
    children.len()
}

// ============================================================================
// Deletion
// ============================================================================

/// Lists whose owner cannot exist without at least one element.
fn deletes_owner_when_emptied(tree: &SyntaxTree, list: NodeId) -> Option<NodeId> {
    let owner = tree.parent(list)?;
    match (tree.kind(list), tree.kind(owner)) {
        (CaseLabelElementList, _) => Some(owner),
        (ExpressionList, ExpressionListStatement) => Some(owner),
        _ => None,
    }
}

/// Delete the element `child` from `list`.
pub(crate) fn delete(tree: &mut SyntaxTree, list: NodeId, child: NodeId) -> EditResult {
    let Some(shape) = list_shape(tree.kind(list)) else {
        return Err(EditError::Malformed(format!("{} is not a list", tree.kind(list))));
    };
    let remaining = elements(tree, list).len().saturating_sub(1);
    if remaining == 0 {
        if let Some(owner) = deletes_owner_when_emptied(tree, list) {
            return delete_child(tree, owner);
        }
        if tree.kind(list) == ResourceList {
            return delete_list_node(tree, list);
        }
    }

    let doomed = doomed_with_separator(tree, list, child, shape.separator);
    detach_all(tree, doomed);

    if remaining == 0 {
        close_list(tree, list, &shape);
    } else if remaining == 1 {
        unwrap_single_lambda_parameter(tree, list);
    }
    Ok(())
}

/// `child` plus the one separator (and the whitespace insertion would have
/// added with it) that goes with it.
fn doomed_with_separator(
    tree: &SyntaxTree,
    list: NodeId,
    child: NodeId,
    separator: Separator,
) -> Vec<NodeId> {
    let children = tree.children(list).to_vec();
    let Some(index) = children.iter().position(|c| *c == child) else {
        return vec![child];
    };
    let next_sig = children[index + 1..]
        .iter()
        .position(|c| !tree.kind(*c).is_trivia())
        .map(|p| index + 1 + p);
    let prev_sig = children[..index]
        .iter()
        .rposition(|c| !tree.kind(*c).is_trivia());

    if separator == Separator::Space {
        let next_ws = children
            .get(index + 1)
            .filter(|c| tree.kind(**c) == Whitespace);
        if let (Some(ws), Some(_)) = (next_ws, next_sig) {
            return vec![child, *ws];
        }
        if let Some(p) = index.checked_sub(1) {
            if tree.kind(children[p]) == Whitespace && prev_sig.is_some() {
                return vec![children[p], child];
            }
        }
        return vec![child];
    }

    if let Some(sep) = next_sig.filter(|i| is_separator(tree.kind(children[*i]), separator)) {
        // Element, trivia up to the separator, the separator, and one
        // following whitespace token.
        let mut end = sep;
        if children
            .get(sep + 1)
            .is_some_and(|c| tree.kind(*c) == Whitespace)
        {
            end = sep + 1;
        }
        return children[index..=end].to_vec();
    }
    if let Some(sep) = prev_sig.filter(|i| is_separator(tree.kind(children[*i]), separator)) {
        let mut start = sep;
        if separator == Separator::Amp
            && sep > 0
            && tree.kind(children[sep - 1]) == Whitespace
        {
            start = sep - 1;
        }
        return children[start..=index].to_vec();
    }
    vec![child]
}

/// Remove the decorations of a list that lost its last element.
fn close_list(tree: &mut SyntaxTree, list: NodeId, shape: &ListShape) {
    let owner_kind = tree.parent(list).map(|o| tree.kind(o));
    match tree.kind(list) {
        TypeParameterList | AnnotationParameterList | ExtendsList | ImplementsList
        | ThrowsList | PermitsList | ModifierList => {
            let all = tree.children(list).to_vec();
            detach_all(tree, all);
            tidy_space_around(tree, list);
        }
        ExtendsBoundList => {
            let _ = delete_list_node(tree, list);
        }
        ExpressionList if owner_kind == Some(EnumConstant) => {
            let all = tree.children(list).to_vec();
            detach_all(tree, all);
            tree.detach(list);
        }
        _ => {
            // Bracketed lists keep their brackets; drop leftover trivia.
            let trivia: Vec<NodeId> = tree
                .children(list)
                .iter()
                .copied()
                .filter(|c| tree.kind(*c).is_trivia())
                .collect();
            if shape.open.is_some() {
                detach_all(tree, trivia);
            }
        }
    }
}

/// Remove a whole list node together with the whitespace before it.
fn delete_list_node(tree: &mut SyntaxTree, list: NodeId) -> EditResult {
    let mut doomed = vec![list];
    if let Some(prev) = tree.prev_sibling(list) {
        if tree.kind(prev) == Whitespace {
            doomed.insert(0, prev);
        }
    }
    detach_all(tree, doomed);
    Ok(())
}

/// `(x) -> ...` with a single untyped parameter loses its parentheses again.
fn unwrap_single_lambda_parameter(tree: &mut SyntaxTree, list: NodeId) {
    let Some(owner) = tree.parent(list) else {
        return;
    };
    if tree.kind(list) != ParameterList || tree.kind(owner) != LambdaExpression {
        return;
    }
    let params = elements(tree, list);
    let [param] = params.as_slice() else {
        return;
    };
    if find_child_by_role(tree, *param, Role::TypeElement).is_some() {
        return;
    }
    let parens: Vec<NodeId> = tree
        .children(list)
        .iter()
        .copied()
        .filter(|c| matches!(tree.kind(*c), LParen | RParen))
        .collect();
    detach_all(tree, parens);
}

/// Remove every element of a list (an `extends` clause, a type parameter
/// list, annotation arguments).
pub(crate) fn clear(tree: &mut SyntaxTree, list: NodeId) -> EditResult {
    let Some(shape) = list_shape(tree.kind(list)) else {
        return Err(EditError::Malformed(format!("{} is not a list", tree.kind(list))));
    };
    let all = tree.children(list).to_vec();
    let keep: Vec<NodeId> = all
        .iter()
        .copied()
        .filter(|c| Some(tree.kind(*c)) == shape.open || Some(tree.kind(*c)) == shape.close)
        .collect();
    let doomed: Vec<NodeId> = all.into_iter().filter(|c| !keep.contains(c)).collect();
    detach_all(tree, doomed);
    close_list(tree, list, &shape);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::add;
    use crate::parser::{parse_compilation_unit, parse_expression, parse_member, parse_statement};

    fn find_kind(tree: &SyntaxTree, kind: SyntaxKind) -> NodeId {
        tree.descendants(tree.root())
            .find(|n| tree.kind(*n) == kind)
            .unwrap_or_else(|| panic!("no {} in tree", kind))
    }

    fn text(tree: &SyntaxTree) -> String {
        tree.text(tree.root())
    }

    /// Graft the first `kind` node of a parsed snippet into `tree`.
    fn graft_kind(
        tree: &mut SyntaxTree,
        fragment: Result<SyntaxTree, crate::parser::ParserError>,
        kind: SyntaxKind,
    ) -> NodeId {
        let fragment = fragment.unwrap();
        let node = find_kind(&fragment, kind);
        tree.graft(&fragment, node)
    }

    /// Elements and separators alternate between the brackets, starting and
    /// ending with an element. Returns the element count.
    fn assert_separators(tree: &SyntaxTree, list: NodeId) -> usize {
        let shape = list_shape(tree.kind(list)).unwrap();
        let inner: Vec<NodeId> = tree
            .significant_children(list)
            .filter(|c| {
                let kind = Some(tree.kind(*c));
                kind != shape.open && kind != shape.close
            })
            .collect();
        for (i, child) in inner.iter().enumerate() {
            let separator = is_separator(tree.kind(*child), shape.separator);
            assert_eq!(separator, i % 2 == 1, "bad separators in {:?}", tree.text(list));
        }
        assert!(inner.len() % 2 == 1 || inner.is_empty());
        elements(tree, list).len()
    }

    #[test]
    fn test_method_type_parameters_are_created_and_removed() {
        let source = "class A { void m() {} }";
        let mut tree = parse_compilation_unit(source).unwrap();
        let method = find_kind(&tree, Method);
        let t = graft_kind(&mut tree, parse_member("<T> void n() {}"), TypeParameter);
        add(&mut tree, method, t).unwrap();
        assert_eq!(text(&tree), "class A { <T> void m() {} }");

        let u = graft_kind(&mut tree, parse_member("<U> void n() {}"), TypeParameter);
        add(&mut tree, method, u).unwrap();
        assert_eq!(text(&tree), "class A { <T, U> void m() {} }");
        let list = find_kind(&tree, TypeParameterList);
        assert_eq!(assert_separators(&tree, list), 2);

        delete_child(&mut tree, t).unwrap();
        assert_eq!(text(&tree), "class A { <U> void m() {} }");
        delete_child(&mut tree, u).unwrap();
        assert_eq!(text(&tree), source);
        assert!(tree.check_consistency().is_empty());
    }

    #[test]
    fn test_class_type_parameters() {
        let source = "class A {}";
        let mut tree = parse_compilation_unit(source).unwrap();
        let class = find_kind(&tree, Class);
        let t = graft_kind(&mut tree, parse_compilation_unit("class B<T> {}"), TypeParameter);
        add(&mut tree, class, t).unwrap();
        assert_eq!(text(&tree), "class A<T> {}");
        delete_child(&mut tree, t).unwrap();
        assert_eq!(text(&tree), source);
    }

    #[test]
    fn test_bare_annotation_gains_parentheses() {
        let source = "@A class X {}";
        let mut tree = parse_compilation_unit(source).unwrap();
        let annotation = find_kind(&tree, Annotation);
        let pair = graft_kind(
            &mut tree,
            parse_compilation_unit("@B(v = 1) class Y {}"),
            NameValuePair,
        );
        add(&mut tree, annotation, pair).unwrap();
        assert_eq!(text(&tree), "@A(v = 1) class X {}");
        delete_child(&mut tree, pair).unwrap();
        assert_eq!(text(&tree), source);
    }

    #[test]
    fn test_annotation_array_separators() {
        let mut tree = parse_compilation_unit("@A(v = {1}) class X {}").unwrap();
        let array = find_kind(&tree, AnnotationArrayInitializer);
        let two = graft_kind(&mut tree, parse_expression("2"), LiteralExpression);
        add(&mut tree, array, two).unwrap();
        assert_eq!(text(&tree), "@A(v = {1, 2}) class X {}");
        assert_eq!(assert_separators(&tree, array), 2);
        delete_child(&mut tree, two).unwrap();
        assert_eq!(text(&tree), "@A(v = {1}) class X {}");
        assert_eq!(assert_separators(&tree, array), 1);
    }

    #[test]
    fn test_trailing_comma_stays_last() {
        let mut tree = parse_expression("new int[] {1, 2,}").unwrap();
        let array = find_kind(&tree, ArrayInitializerExpression);
        let three = graft_kind(&mut tree, parse_expression("3"), LiteralExpression);
        add(&mut tree, array, three).unwrap();
        assert_eq!(text(&tree), "new int[] {1, 2, 3,}");
    }

    #[test]
    fn test_deconstruction_list_separators() {
        let source = "if (o instanceof Point(var x)) use(x);";
        let mut tree = parse_statement(source).unwrap();
        let record = find_kind(&tree, DeconstructionPattern);
        let pattern = {
            let fragment = parse_expression("o instanceof Point(var a, var y)").unwrap();
            let list = find_kind(&fragment, DeconstructionList);
            let second = elements(&fragment, list)[1];
            tree.graft(&fragment, second)
        };
        add(&mut tree, record, pattern).unwrap();
        assert_eq!(text(&tree), "if (o instanceof Point(var x, var y)) use(x);");
        let list = find_kind(&tree, DeconstructionList);
        assert_eq!(assert_separators(&tree, list), 2);
        delete_child(&mut tree, pattern).unwrap();
        assert_eq!(text(&tree), source);
    }

    #[test]
    fn test_resource_list_is_created_after_try() {
        let source = "try { } finally { }";
        let mut tree = parse_statement(source).unwrap();
        let try_stmt = find_kind(&tree, TryStatement);
        let resource = graft_kind(
            &mut tree,
            parse_statement("try (Reader r = open()) {}"),
            ResourceVariable,
        );
        add(&mut tree, try_stmt, resource).unwrap();
        assert_eq!(text(&tree), "try (Reader r = open()) { } finally { }");
        delete_child(&mut tree, resource).unwrap();
        assert_eq!(text(&tree), source);
    }

    #[test]
    fn test_case_label_elements() {
        let mut tree = parse_statement("switch (k) { case 1 -> a(); default -> b(); }").unwrap();
        let rule = find_kind(&tree, SwitchLabeledRule);
        let one = tree
            .descendants(find_kind(&tree, CaseLabelElementList))
            .find(|n| tree.kind(*n) == LiteralExpression)
            .unwrap();
        let two = graft_kind(&mut tree, parse_expression("2"), LiteralExpression);
        add(&mut tree, rule, two).unwrap();
        assert_eq!(text(&tree), "switch (k) { case 1, 2 -> a(); default -> b(); }");
        let list = find_kind(&tree, CaseLabelElementList);
        assert_eq!(assert_separators(&tree, list), 2);

        delete_child(&mut tree, one).unwrap();
        assert_eq!(text(&tree), "switch (k) { case 2 -> a(); default -> b(); }");

        // The last element takes its rule with it.
        delete_child(&mut tree, two).unwrap();
        assert_eq!(tree.parent(rule), None);
        assert!(!text(&tree).contains("a()"));
        assert!(text(&tree).contains("default -> b();"));
        assert!(tree.check_consistency().is_empty());
    }

    #[test]
    fn test_lambda_parentheses_follow_parameter_count() {
        let source = "x -> x";
        let mut tree = parse_expression(source).unwrap();
        let lambda = find_kind(&tree, LambdaExpression);
        let y = {
            let fragment = parse_expression("(a, y) -> a").unwrap();
            let list = find_kind(&fragment, ParameterList);
            let second = elements(&fragment, list)[1];
            tree.graft(&fragment, second)
        };
        add(&mut tree, lambda, y).unwrap();
        assert_eq!(text(&tree), "(x, y) -> x");
        delete_child(&mut tree, y).unwrap();
        assert_eq!(text(&tree), source);
    }

    #[test]
    fn test_delete_from_non_list_is_refused() {
        let mut tree = parse_expression("a + b").unwrap();
        let binary = find_kind(&tree, BinaryExpression);
        let child = tree.significant_children(binary).next().unwrap();
        assert!(matches!(
            delete(&mut tree, binary, child),
            Err(EditError::Malformed(_))
        ));
    }
}
