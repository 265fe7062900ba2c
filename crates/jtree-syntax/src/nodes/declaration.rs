// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Files, classes, members and variables.

use crate::edit::{self, EditError, EditResult};
use crate::kinds::{SyntaxKind, MODIFIERS};
use crate::roles::{find_child_by_role, find_children_by_role, Role};
use crate::tree::{NodeId, SyntaxTree};

use super::traits::{ast_node, child, children, children_of, sum_node};
use super::{AstNode, CodeBlock, Expression, ExpressionList, NamedNode};

ast_node! {
    /// A whole compilation unit.
    JavaFile
}

impl JavaFile {
    pub fn package_name(self, tree: &SyntaxTree) -> Option<String> {
        let package = find_child_by_role(tree, self.0, Role::PackageStatement)?;
        let reference = find_child_by_role(tree, package, Role::Reference)?;
        Some(CodeReference(reference).qualified_name(tree))
    }

    pub fn imports(self, tree: &SyntaxTree) -> Vec<ImportStatement> {
        find_child_by_role(tree, self.0, Role::ImportList)
            .map(|list| children(tree, list, Role::ImportStatement))
            .unwrap_or_default()
    }

    /// Top-level classes.
    pub fn classes(self, tree: &SyntaxTree) -> Vec<Class> {
        children(tree, self.0, Role::Member)
    }

    pub fn add_class(self, tree: &mut SyntaxTree, class: NodeId) -> EditResult<NodeId> {
        edit::add(tree, self.0, class)
    }
}

ast_node!(ImportStatement);

impl ImportStatement {
    pub fn is_static(self, tree: &SyntaxTree) -> bool {
        tree.child_of_kind(self.0, SyntaxKind::StaticKw).is_some()
    }

    pub fn is_on_demand(self, tree: &SyntaxTree) -> bool {
        tree.child_of_kind(self.0, SyntaxKind::Star).is_some()
    }

    pub fn imported_name(self, tree: &SyntaxTree) -> Option<String> {
        let reference = find_child_by_role(tree, self.0, Role::Reference)?;
        Some(CodeReference(reference).qualified_name(tree))
    }
}

ast_node! {
    /// Class, interface, enum or record declaration.
    Class
}

impl NamedNode for Class {}

impl Class {
    fn keyword(self, tree: &SyntaxTree) -> Option<SyntaxKind> {
        find_child_by_role(tree, self.0, Role::Keyword).map(|k| tree.kind(k))
    }

    pub fn is_interface(self, tree: &SyntaxTree) -> bool {
        self.keyword(tree) == Some(SyntaxKind::InterfaceKw)
    }

    pub fn is_enum(self, tree: &SyntaxTree) -> bool {
        self.keyword(tree) == Some(SyntaxKind::EnumKw)
    }

    pub fn is_record(self, tree: &SyntaxTree) -> bool {
        self.keyword(tree) == Some(SyntaxKind::RecordKw)
    }

    pub fn modifier_list(self, tree: &SyntaxTree) -> Option<ModifierList> {
        child(tree, self.0, Role::ModifierList)
    }

    pub fn type_parameter_list(self, tree: &SyntaxTree) -> Option<TypeParameterList> {
        child(tree, self.0, Role::TypeParameterList)
    }

    pub fn record_components(self, tree: &SyntaxTree) -> Vec<RecordComponent> {
        find_child_by_role(tree, self.0, Role::RecordHeader)
            .map(|header| children(tree, header, Role::RecordComponent))
            .unwrap_or_default()
    }

    pub fn extends_list(self, tree: &SyntaxTree) -> Option<ReferenceList> {
        child(tree, self.0, Role::ExtendsList)
    }

    pub fn implements_list(self, tree: &SyntaxTree) -> Option<ReferenceList> {
        child(tree, self.0, Role::ImplementsList)
    }

    pub fn permits_list(self, tree: &SyntaxTree) -> Option<ReferenceList> {
        child(tree, self.0, Role::PermitsList)
    }

    pub fn members(self, tree: &SyntaxTree) -> Vec<Member> {
        children(tree, self.0, Role::Member)
    }

    pub fn methods(self, tree: &SyntaxTree) -> Vec<Method> {
        children(tree, self.0, Role::Member)
    }

    pub fn fields(self, tree: &SyntaxTree) -> Vec<Field> {
        children(tree, self.0, Role::Member)
    }

    pub fn enum_constants(self, tree: &SyntaxTree) -> Vec<EnumConstant> {
        children(tree, self.0, Role::Member)
    }

    pub fn inner_classes(self, tree: &SyntaxTree) -> Vec<Class> {
        children(tree, self.0, Role::Member)
    }

    pub fn add_member(self, tree: &mut SyntaxTree, member: NodeId) -> EditResult<NodeId> {
        edit::add(tree, self.0, member)
    }
}

ast_node! {
    /// The body of `new T() { ... }`.
    AnonymousClass
}

impl AnonymousClass {
    pub fn members(self, tree: &SyntaxTree) -> Vec<Member> {
        children(tree, self.0, Role::Member)
    }
}

ast_node!(EnumConstant);

impl NamedNode for EnumConstant {}

impl EnumConstant {
    pub fn argument_list(self, tree: &SyntaxTree) -> Option<ExpressionList> {
        child(tree, self.0, Role::ArgumentList)
    }

    pub fn initializer_body(self, tree: &SyntaxTree) -> Option<NodeId> {
        find_child_by_role(tree, self.0, Role::AnonymousClass)
    }
}

ast_node!(Method);

impl NamedNode for Method {}

impl Method {
    pub fn is_constructor(self, tree: &SyntaxTree) -> bool {
        self.return_type(tree).is_none()
    }

    pub fn modifier_list(self, tree: &SyntaxTree) -> Option<ModifierList> {
        child(tree, self.0, Role::ModifierList)
    }

    pub fn type_parameter_list(self, tree: &SyntaxTree) -> Option<TypeParameterList> {
        child(tree, self.0, Role::TypeParameterList)
    }

    pub fn return_type(self, tree: &SyntaxTree) -> Option<TypeElement> {
        child(tree, self.0, Role::ReturnType)
    }

    pub fn parameter_list(self, tree: &SyntaxTree) -> Option<ParameterList> {
        child(tree, self.0, Role::ParameterList)
    }

    pub fn parameters(self, tree: &SyntaxTree) -> Vec<Parameter> {
        self.parameter_list(tree)
            .map(|l| l.parameters(tree))
            .unwrap_or_default()
    }

    pub fn throws_list(self, tree: &SyntaxTree) -> Option<ReferenceList> {
        child(tree, self.0, Role::ThrowsList)
    }

    pub fn body(self, tree: &SyntaxTree) -> Option<CodeBlock> {
        child(tree, self.0, Role::Body)
    }

    pub fn add_parameter(self, tree: &mut SyntaxTree, param: NodeId) -> EditResult<NodeId> {
        edit::add(tree, self.0, param)
    }

    /// Turn the method abstract-style: the body becomes `;`.
    pub fn delete_body(self, tree: &mut SyntaxTree) -> EditResult {
        match find_child_by_role(tree, self.0, Role::Body) {
            Some(body) => edit::delete_child(tree, body),
            None => Ok(()),
        }
    }
}

ast_node! {
    /// `static { ... }` or an instance initializer.
    ClassInitializer
}

impl ClassInitializer {
    pub fn is_static(self, tree: &SyntaxTree) -> bool {
        self.modifier_list(tree)
            .is_some_and(|m| m.has_modifier(tree, SyntaxKind::StaticKw))
    }

    pub fn modifier_list(self, tree: &SyntaxTree) -> Option<ModifierList> {
        child(tree, self.0, Role::ModifierList)
    }

    pub fn body(self, tree: &SyntaxTree) -> Option<CodeBlock> {
        child(tree, self.0, Role::Body)
    }
}

/// Accessors shared by every variable-like declaration.
macro_rules! variable_accessors {
    ($($name:ident),+) => {$(
        impl NamedNode for $name {}

        impl $name {
            pub fn modifier_list(self, tree: &SyntaxTree) -> Option<ModifierList> {
                child(tree, self.0, Role::ModifierList)
            }

            pub fn type_element(self, tree: &SyntaxTree) -> Option<TypeElement> {
                child(tree, self.0, Role::TypeElement)
            }

            pub fn initializer(self, tree: &SyntaxTree) -> Option<Expression> {
                child(tree, self.0, Role::Initializer)
            }

            /// Remove `= initializer`.
            pub fn delete_initializer(self, tree: &mut SyntaxTree) -> EditResult {
                match find_child_by_role(tree, self.0, Role::Initializer) {
                    Some(init) => edit::delete_child(tree, init),
                    None => Ok(()),
                }
            }
        }
    )+};
}

ast_node!(Field);
ast_node!(LocalVariable);
ast_node!(Parameter);
ast_node!(RecordComponent);

variable_accessors!(Field, LocalVariable, Parameter, RecordComponent);

impl Parameter {
    pub fn is_varargs(self, tree: &SyntaxTree) -> bool {
        self.type_element(tree)
            .is_some_and(|t| tree.child_of_kind(t.syntax(), SyntaxKind::Ellipsis).is_some())
    }

    /// Lambda parameters written without a type.
    pub fn is_implicitly_typed(self, tree: &SyntaxTree) -> bool {
        self.type_element(tree).is_none()
    }
}

ast_node!(ParameterList);

impl ParameterList {
    pub fn parameters(self, tree: &SyntaxTree) -> Vec<Parameter> {
        children(tree, self.0, Role::Parameter)
    }
}

ast_node!(TypeParameterList);

impl TypeParameterList {
    pub fn type_parameters(self, tree: &SyntaxTree) -> Vec<TypeParameter> {
        children(tree, self.0, Role::TypeParameter)
    }
}

ast_node!(TypeParameter);

impl NamedNode for TypeParameter {}

impl TypeParameter {
    pub fn bounds(self, tree: &SyntaxTree) -> Vec<TypeElement> {
        find_child_by_role(tree, self.0, Role::BoundList)
            .map(|list| children(tree, list, Role::ReferenceInList))
            .unwrap_or_default()
    }
}

ast_node! {
    /// `extends`, `implements`, `throws` or `permits` clause. Zero-width
    /// when the clause is absent.
    ReferenceList: ExtendsList | ImplementsList | ThrowsList | PermitsList
}

impl ReferenceList {
    pub fn references(self, tree: &SyntaxTree) -> Vec<CodeReference> {
        children(tree, self.0, Role::ReferenceInList)
    }

    pub fn is_empty(self, tree: &SyntaxTree) -> bool {
        self.references(tree).is_empty()
    }
}

ast_node!(ModifierList);

impl ModifierList {
    pub fn has_modifier(self, tree: &SyntaxTree, modifier: SyntaxKind) -> bool {
        tree.child_of_kind(self.0, modifier).is_some()
    }

    pub fn modifiers(self, tree: &SyntaxTree) -> Vec<SyntaxKind> {
        find_children_by_role(tree, self.0, Role::Modifier)
            .into_iter()
            .map(|m| tree.kind(m))
            .collect()
    }

    pub fn annotations(self, tree: &SyntaxTree) -> Vec<Annotation> {
        children_of(tree, self.0)
    }

    /// Add or remove a modifier keyword. Setting a modifier that is
    /// already present, or clearing one that is absent, does nothing.
    pub fn set_modifier(self, tree: &mut SyntaxTree, modifier: SyntaxKind, on: bool) -> EditResult {
        let text = match modifier.fixed_text() {
            Some(text) if MODIFIERS.contains(modifier) => text,
            _ => {
                return Err(EditError::Malformed(format!(
                    "{} is not a modifier",
                    modifier
                )))
            }
        };
        match (tree.child_of_kind(self.0, modifier), on) {
            (Some(existing), false) => edit::delete_child(tree, existing),
            (None, true) => {
                let token = tree.new_token(modifier, text);
                edit::add(tree, self.0, token).map(|_| ())
            }
            _ => Ok(()),
        }
    }
}

ast_node!(Annotation);

impl Annotation {
    pub fn qualified_name(self, tree: &SyntaxTree) -> Option<String> {
        let reference = find_child_by_role(tree, self.0, Role::Reference)?;
        Some(CodeReference(reference).qualified_name(tree))
    }

    pub fn attributes(self, tree: &SyntaxTree) -> Vec<NodeId> {
        find_child_by_role(tree, self.0, Role::AnnotationParameterList)
            .map(|list| find_children_by_role(tree, list, Role::NameValuePair))
            .unwrap_or_default()
    }
}

ast_node! {
    /// A type as written: primitive, reference, array, wildcard or union.
    TypeElement: Type
}

impl TypeElement {
    pub fn is_primitive(self, tree: &SyntaxTree) -> bool {
        tree.significant_children(self.0)
            .any(|c| crate::kinds::PRIMITIVE_TYPES.contains(tree.kind(c)))
    }

    pub fn is_array(self, tree: &SyntaxTree) -> bool {
        tree.child_of_kind(self.0, SyntaxKind::LBracket).is_some()
    }

    /// `var` in a local variable or lambda parameter.
    pub fn is_inferred(self, tree: &SyntaxTree) -> bool {
        self.reference(tree)
            .is_some_and(|r| r.qualified_name(tree) == "var")
    }

    pub fn reference(self, tree: &SyntaxTree) -> Option<CodeReference> {
        child(tree, self.0, Role::Reference)
    }

    pub fn component_type(self, tree: &SyntaxTree) -> Option<TypeElement> {
        child(tree, self.0, Role::TypeElement)
    }
}

ast_node! {
    /// A possibly qualified name with type arguments: `java.util.List<T>`.
    CodeReference: JavaCodeReference
}

impl CodeReference {
    pub fn qualifier(self, tree: &SyntaxTree) -> Option<CodeReference> {
        child(tree, self.0, Role::Qualifier)
    }

    pub fn reference_name(self, tree: &SyntaxTree) -> Option<&str> {
        find_child_by_role(tree, self.0, Role::Name).and_then(|t| tree.token_text(t))
    }

    /// Dotted name without type arguments.
    pub fn qualified_name(self, tree: &SyntaxTree) -> String {
        let mut parts = Vec::new();
        let mut current = Some(self);
        while let Some(reference) = current {
            if let Some(name) = reference.reference_name(tree) {
                parts.push(name);
            }
            current = reference.qualifier(tree);
        }
        parts.reverse();
        parts.join(".")
    }

    pub fn type_arguments(self, tree: &SyntaxTree) -> Vec<TypeElement> {
        find_child_by_role(tree, self.0, Role::ReferenceParameterList)
            .map(|list| children(tree, list, Role::TypeElement))
            .unwrap_or_default()
    }
}

sum_node! {
    /// Anything that can appear in a class body.
    Member {
        Method(Method),
        Field(Field),
        Class(Class),
        Initializer(ClassInitializer),
        EnumConstant(EnumConstant),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_compilation_unit, parse_member};

    fn first<N: AstNode>(tree: &SyntaxTree) -> N {
        tree.descendants(tree.root())
            .find_map(|n| N::cast(tree, n))
            .unwrap()
    }

    #[test]
    fn test_file_parts() {
        let tree = parse_compilation_unit(
            "package a.b;\nimport java.util.List;\nimport static java.lang.Math.*;\nclass A {}\ninterface B {}\n",
        )
        .unwrap();
        let file: JavaFile = first(&tree);
        assert_eq!(file.package_name(&tree).as_deref(), Some("a.b"));
        let imports = file.imports(&tree);
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].imported_name(&tree).as_deref(), Some("java.util.List"));
        assert!(imports[1].is_static(&tree));
        assert!(imports[1].is_on_demand(&tree));
        let classes = file.classes(&tree);
        assert_eq!(classes.len(), 2);
        assert!(classes[1].is_interface(&tree));
    }

    #[test]
    fn test_class_members() {
        let tree = parse_compilation_unit(
            "class A<T> extends B implements C, D { int x = 1; A() {} void m(int a, String... rest) {} static {} class Inner {} }",
        )
        .unwrap();
        let class: Class = first(&tree);
        assert_eq!(class.name(&tree), Some("A"));
        assert_eq!(class.members(&tree).len(), 5);
        assert_eq!(class.fields(&tree).len(), 1);
        assert_eq!(class.inner_classes(&tree).len(), 1);
        assert_eq!(class.implements_list(&tree).unwrap().references(&tree).len(), 2);
        let tps = class.type_parameter_list(&tree).unwrap().type_parameters(&tree);
        assert_eq!(tps[0].name(&tree), Some("T"));

        let methods = class.methods(&tree);
        assert!(methods[0].is_constructor(&tree));
        let params = methods[1].parameters(&tree);
        assert_eq!(params.len(), 2);
        assert!(params[1].is_varargs(&tree));
        assert!(!params[0].is_varargs(&tree));
        assert!(params[0].type_element(&tree).unwrap().is_primitive(&tree));
    }

    #[test]
    fn test_record_and_enum() {
        let tree = parse_compilation_unit(
            "record P(int x, int y) {}\nenum E { A, B(1) { }, C; }\n",
        )
        .unwrap();
        let file: JavaFile = first(&tree);
        let classes = file.classes(&tree);
        assert!(classes[0].is_record(&tree));
        let names: Vec<_> = classes[0]
            .record_components(&tree)
            .iter()
            .filter_map(|c| c.name(&tree))
            .collect();
        assert_eq!(names, ["x", "y"]);
        assert!(classes[1].is_enum(&tree));
        let constants = classes[1].enum_constants(&tree);
        assert_eq!(constants.len(), 3);
        assert!(constants[1].argument_list(&tree).is_some());
        assert!(constants[1].initializer_body(&tree).is_some());
        assert!(constants[2].argument_list(&tree).is_none());
    }

    #[test]
    fn test_set_modifier() {
        let mut tree = parse_member("void m() {}").unwrap();
        let method: Method = first(&tree);
        let modifiers = method.modifier_list(&tree).unwrap();
        modifiers.set_modifier(&mut tree, SyntaxKind::PublicKw, true).unwrap();
        assert_eq!(tree.text(tree.root()), "public void m() {}");
        modifiers.set_modifier(&mut tree, SyntaxKind::PublicKw, true).unwrap();
        assert_eq!(modifiers.modifiers(&tree), [SyntaxKind::PublicKw]);
        modifiers.set_modifier(&mut tree, SyntaxKind::PublicKw, false).unwrap();
        assert_eq!(tree.text(tree.root()), "void m() {}");
        assert!(modifiers.set_modifier(&mut tree, SyntaxKind::IntKw, true).is_err());
    }

    #[test]
    fn test_qualified_reference_name() {
        let tree = parse_member("java.util.Map<String, Integer> m;").unwrap();
        let field: Field = first(&tree);
        let ty = field.type_element(&tree).unwrap();
        let reference = ty.reference(&tree).unwrap();
        assert_eq!(reference.qualified_name(&tree), "java.util.Map");
        assert_eq!(reference.type_arguments(&tree).len(), 2);
    }
}
