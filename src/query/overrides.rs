//! Override matching.
//!
//! A method overrides a base method when both are virtual, they agree on name, return type and
//! parameter types, and the base method is declared somewhere up the base type chain. Generic
//! base types are instantiated along the way, so `Base<int>.Run(T)` matches `Derived.Run(int)`.

use std::sync::Arc;

use crate::model::{CodeModel, MethodDeclaration, MethodDeclarationRc, TypeReference};

/// Returns true if `candidate` is a method that `method` overrides or hides in a base type
#[must_use]
pub fn is_base_method(
    candidate: &MethodDeclaration,
    method: &MethodDeclaration,
    model: &CodeModel,
) -> bool {
    if candidate.name != method.name
        || !candidate.is_virtual()
        || !method.is_virtual()
        || candidate.parameters.len() != method.parameters.len()
    {
        return false;
    }

    let (Some(candidate_type), Some(method_type)) =
        (candidate.declaring_type(), method.declaring_type())
    else {
        return false;
    };

    let mut base = method_type.base_type.clone();
    let mut depth = 0usize;
    while let Some(reference) = base {
        // Cyclic base chains only come out of corrupt models
        depth += 1;
        if depth > 64 {
            return false;
        }

        let Some(declaration) = model.resolve_type(&reference) else {
            return false;
        };

        if Arc::ptr_eq(&declaration, &candidate_type) {
            return signatures_match(candidate, method, &reference);
        }

        base = declaration
            .base_type
            .as_ref()
            .map(|next| next.substitute(&reference.generic_arguments, &[]));
    }

    false
}

/// The nearest base type method `method` overrides or hides
#[must_use]
pub fn base_method(method: &MethodDeclaration, model: &CodeModel) -> Option<MethodDeclarationRc> {
    let declaring = method.declaring_type()?;

    let mut base = declaring.base_type.clone();
    let mut depth = 0usize;
    while let Some(reference) = base {
        depth += 1;
        if depth > 64 {
            return None;
        }

        let declaration = model.resolve_type(&reference)?;
        let found = declaration
            .methods
            .iter()
            .map(|(_, candidate)| candidate)
            .find(|candidate| {
                candidate.name == method.name
                    && candidate.is_virtual()
                    && method.is_virtual()
                    && signatures_match(candidate, method, &reference)
            })
            .cloned();
        if found.is_some() {
            return found;
        }

        base = declaration
            .base_type
            .as_ref()
            .map(|next| next.substitute(&reference.generic_arguments, &[]));
    }

    None
}

/// Compare return and parameter types, instantiating the candidate through `via`
fn signatures_match(
    candidate: &MethodDeclaration,
    method: &MethodDeclaration,
    via: &TypeReference,
) -> bool {
    let arguments = &via.generic_arguments;

    candidate.return_type.substitute(arguments, &[]) == method.return_type
        && candidate.parameters.len() == method.parameters.len()
        && candidate
            .parameters
            .iter()
            .zip(&method.parameters)
            .all(|(base, derived)| {
                base.parameter_type.substitute(arguments, &[]) == derived.parameter_type
            })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        identity::AssemblyVersion, AssemblyBuilder, MethodModifiers, PrimitiveKind, TypeBuilder,
        TypeDeclarationRc, TypeSignature,
    };

    fn method(declaration: &TypeDeclarationRc, name: &str) -> MethodDeclarationRc {
        match declaration.method(name) {
            Some(method) => method,
            None => panic!("{name} missing"),
        }
    }

    fn hierarchy(
        derived_modifiers: MethodModifiers,
        parameter: PrimitiveKind,
    ) -> (CodeModel, TypeDeclarationRc, TypeDeclarationRc) {
        let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
        let module = builder.module("Sample.dll");

        let base = TypeBuilder::class("Sample", "Animal")
            .method("Speak", |method| {
                method
                    .modifiers(MethodModifiers::VIRTUAL | MethodModifiers::NEW_SLOT)
                    .parameter("volume", TypeSignature::primitive(PrimitiveKind::Int32))
            })
            .build_in(&module);
        TypeBuilder::class("Sample", "Mammal")
            .extends(TypeReference::new("Sample", "Animal"))
            .build_in(&module);
        let derived = TypeBuilder::class("Sample", "Dog")
            .extends(TypeReference::new("Sample", "Mammal"))
            .method("Speak", |method| {
                method
                    .modifiers(derived_modifiers)
                    .parameter("volume", TypeSignature::primitive(parameter))
            })
            .build_in(&module);

        let model = CodeModel::new();
        model.add_assembly(builder.build());
        (model, base, derived)
    }

    #[test]
    fn test_transitive_override() {
        let (model, base, derived) = hierarchy(MethodModifiers::VIRTUAL, PrimitiveKind::Int32);
        let candidate = method(&base, "Speak");
        let overriding = method(&derived, "Speak");

        assert!(is_base_method(&candidate, &overriding, &model));
        assert!(!is_base_method(&overriding, &candidate, &model));
        assert!(base_method(&overriding, &model)
            .is_some_and(|found| found.token == candidate.token));
    }

    #[test]
    fn test_parameter_mismatch_is_not_an_override() {
        let (model, base, derived) = hierarchy(MethodModifiers::VIRTUAL, PrimitiveKind::Int64);
        assert!(!is_base_method(&method(&base, "Speak"), &method(&derived, "Speak"), &model));
    }

    #[test]
    fn test_non_virtual_is_not_an_override() {
        let (model, base, derived) = hierarchy(MethodModifiers::empty(), PrimitiveKind::Int32);
        assert!(!is_base_method(&method(&base, "Speak"), &method(&derived, "Speak"), &model));
        assert!(base_method(&method(&derived, "Speak"), &model).is_none());
    }

    #[test]
    fn test_generic_base_is_instantiated() {
        let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
        let module = builder.module("Sample.dll");

        let base = TypeBuilder::class("Sample", "Handler")
            .generic_parameter("T")
            .method("Handle", |method| {
                method
                    .modifiers(MethodModifiers::VIRTUAL | MethodModifiers::NEW_SLOT)
                    .parameter("item", TypeSignature::type_parameter("T", 0))
            })
            .build_in(&module);
        let derived = TypeBuilder::class("Sample", "TextHandler")
            .extends(
                TypeReference::new("Sample", "Handler`1")
                    .with_arguments(vec![TypeSignature::primitive(PrimitiveKind::String)]),
            )
            .method("Handle", |method| {
                method
                    .modifiers(MethodModifiers::VIRTUAL)
                    .parameter("item", TypeSignature::primitive(PrimitiveKind::String))
            })
            .build_in(&module);

        let model = CodeModel::new();
        model.add_assembly(builder.build());

        assert!(is_base_method(&method(&base, "Handle"), &method(&derived, "Handle"), &model));
    }
}
