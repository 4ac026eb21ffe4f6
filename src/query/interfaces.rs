//! Interface lists without redundant entries.
//!
//! Metadata lists every interface a type implements, including the ones it inherits through
//! its base type or through other interfaces. Source code only names the ones that are not
//! implied; [`interfaces`] computes that list.

use std::collections::HashSet;

use crate::model::{CodeModel, TypeDeclaration, TypeReference, TypeSignature};

/// Identity of an interface use: metadata full name plus generic arguments.
///
/// Owners are left out so that a reference carrying assembly scope and one built from a
/// declaration compare equal.
type InterfaceKey = (String, Vec<TypeSignature>);

fn key(reference: &TypeReference) -> InterfaceKey {
    (reference.full_name(), reference.generic_arguments.clone())
}

/// Declared interfaces of `declaration` that are not implied by its base type chain or by
/// another declared interface, in declaration order.
///
/// Interfaces that cannot be resolved against `model` are kept: nothing proves them redundant.
#[must_use]
pub fn interfaces(declaration: &TypeDeclaration, model: &CodeModel) -> Vec<TypeReference> {
    let mut implied = HashSet::new();

    if let Some(base) = &declaration.base_type {
        let mut visited = HashSet::new();
        collect_base_chain(base, model, &mut implied, &mut visited);
    }

    for interface in &declaration.interfaces {
        let mut visited = HashSet::new();
        collect_inherited(interface, model, &mut implied, &mut visited);
    }

    let mut seen = HashSet::new();
    declaration
        .interfaces
        .iter()
        .filter(|interface| {
            let key = key(interface);
            !implied.contains(&key) && seen.insert(key)
        })
        .cloned()
        .collect()
}

/// Every interface implemented by `reference`, transitively, excluding `reference` itself
#[must_use]
pub fn inherited_interfaces(reference: &TypeReference, model: &CodeModel) -> Vec<TypeReference> {
    let mut result = Vec::new();
    let mut emitted = HashSet::from([key(reference)]);
    collect_references(reference, model, &mut result, &mut emitted, &mut HashSet::new());
    result
}

/// Interfaces of `reference`'s declaration with the reference's generic arguments applied
fn declared_interfaces(reference: &TypeReference, model: &CodeModel) -> Vec<TypeReference> {
    match model.resolve_type(reference) {
        Some(declaration) => declaration
            .interfaces
            .iter()
            .map(|interface| interface.substitute(&reference.generic_arguments, &[]))
            .collect(),
        None => Vec::new(),
    }
}

/// Add the interfaces `reference` implements, but not `reference` itself
fn collect_inherited(
    reference: &TypeReference,
    model: &CodeModel,
    found: &mut HashSet<InterfaceKey>,
    visited: &mut HashSet<InterfaceKey>,
) {
    if !visited.insert(key(reference)) {
        return;
    }

    for interface in declared_interfaces(reference, model) {
        found.insert(key(&interface));
        collect_inherited(&interface, model, found, visited);
    }
}

/// Add every interface implemented anywhere along the base type chain starting at `base`
fn collect_base_chain(
    base: &TypeReference,
    model: &CodeModel,
    found: &mut HashSet<InterfaceKey>,
    visited: &mut HashSet<InterfaceKey>,
) {
    if !visited.insert(key(base)) {
        return;
    }

    let Some(declaration) = model.resolve_type(base) else {
        return;
    };

    let mut inherited_visited = HashSet::new();
    collect_inherited(base, model, found, &mut inherited_visited);

    if let Some(next) = &declaration.base_type {
        let next = next.substitute(&base.generic_arguments, &[]);
        collect_base_chain(&next, model, found, visited);
    }
}

fn collect_references(
    reference: &TypeReference,
    model: &CodeModel,
    result: &mut Vec<TypeReference>,
    emitted: &mut HashSet<InterfaceKey>,
    visited: &mut HashSet<InterfaceKey>,
) {
    if !visited.insert(key(reference)) {
        return;
    }

    for interface in declared_interfaces(reference, model) {
        if emitted.insert(key(&interface)) {
            result.push(interface.clone());
        }
        collect_references(&interface, model, result, emitted, visited);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{identity::AssemblyVersion, AssemblyBuilder, PrimitiveKind, TypeBuilder};

    fn names(references: &[TypeReference]) -> Vec<String> {
        references.iter().map(TypeReference::full_name).collect()
    }

    #[test]
    fn test_removes_interfaces_implied_by_other_interfaces() {
        let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
        let module = builder.module("Sample.dll");

        TypeBuilder::interface("Sample", "IBase").build_in(&module);
        TypeBuilder::interface("Sample", "IDerived")
            .implements(TypeReference::new("Sample", "IBase"))
            .build_in(&module);
        let worker = TypeBuilder::class("Sample", "Worker")
            .implements(TypeReference::new("Sample", "IDerived"))
            .implements(TypeReference::new("Sample", "IBase"))
            .implements(TypeReference::new("System", "IDisposable"))
            .build_in(&module);

        let model = CodeModel::new();
        model.add_assembly(builder.build());

        assert_eq!(
            names(&interfaces(&worker, &model)),
            vec!["Sample.IDerived", "System.IDisposable"]
        );
    }

    #[test]
    fn test_removes_interfaces_of_base_chain() {
        let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
        let module = builder.module("Sample.dll");

        TypeBuilder::interface("Sample", "IRoot").build_in(&module);
        TypeBuilder::interface("Sample", "IShape")
            .implements(TypeReference::new("Sample", "IRoot"))
            .build_in(&module);
        TypeBuilder::class("Sample", "Shape")
            .implements(TypeReference::new("Sample", "IShape"))
            .build_in(&module);
        TypeBuilder::class("Sample", "Polygon")
            .extends(TypeReference::new("Sample", "Shape"))
            .build_in(&module);
        let square = TypeBuilder::class("Sample", "Square")
            .extends(TypeReference::new("Sample", "Polygon"))
            .implements(TypeReference::new("Sample", "IShape"))
            .implements(TypeReference::new("Sample", "IRoot"))
            .build_in(&module);

        let model = CodeModel::new();
        model.add_assembly(builder.build());

        assert!(interfaces(&square, &model).is_empty());
    }

    #[test]
    fn test_generic_interfaces_compare_arguments() {
        let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
        let module = builder.module("Sample.dll");

        let enumerable = |argument: TypeSignature| {
            TypeReference::new("Sample", "IEnumerable`1").with_arguments(vec![argument])
        };

        TypeBuilder::interface("Sample", "IEnumerable")
            .generic_parameter("T")
            .build_in(&module);
        TypeBuilder::interface("Sample", "IList")
            .generic_parameter("T")
            .implements(enumerable(TypeSignature::type_parameter("T", 0)))
            .build_in(&module);

        let int32 = TypeSignature::primitive(PrimitiveKind::Int32);
        let string = TypeSignature::primitive(PrimitiveKind::String);
        let numbers = TypeBuilder::class("Sample", "Numbers")
            .implements(
                TypeReference::new("Sample", "IList`1").with_arguments(vec![int32.clone()]),
            )
            .implements(enumerable(int32))
            .implements(enumerable(string))
            .build_in(&module);

        let model = CodeModel::new();
        model.add_assembly(builder.build());

        let result = interfaces(&numbers, &model);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].full_name(), "Sample.IList`1");
        assert_eq!(
            result[1].generic_arguments,
            vec![TypeSignature::primitive(PrimitiveKind::String)]
        );

        let inherited = inherited_interfaces(&result[0], &model);
        assert_eq!(names(&inherited), vec!["Sample.IEnumerable`1"]);
    }
}
