//! Visibility-filtered, sorted member listings.
//!
//! Every listing is recomputed on each call: the result depends on the visibility gates, and
//! the accessor exclusion of [`methods`] must follow the property and event lists as they are.
//! Members are ordered by name, then by signature text, which makes the order total for
//! overloads.

use std::collections::HashSet;

use crate::{
    config::VisibilityConfiguration,
    model::{
        EventDeclarationRc, FieldDeclarationRc, MethodDeclarationRc, PropertyDeclarationRc,
        Token, TypeDeclaration, TypeDeclarationRc,
    },
    query::{
        names::{method_signature_text, signature_name},
        visibility::Visible,
    },
};

/// Tokens of every property and event accessor of `declaration`
#[must_use]
pub fn accessor_tokens(declaration: &TypeDeclaration) -> HashSet<Token> {
    let mut tokens = HashSet::new();
    for (_, property) in declaration.properties.iter() {
        tokens.extend(property.accessors().into_iter().map(|accessor| accessor.token));
    }
    for (_, event) in declaration.events.iter() {
        tokens.extend(event.accessors().into_iter().map(|accessor| accessor.token));
    }
    tokens
}

/// Visible fields, sorted by name
#[must_use]
pub fn fields(
    declaration: &TypeDeclaration,
    gates: &VisibilityConfiguration,
) -> Vec<FieldDeclarationRc> {
    let mut fields: Vec<FieldDeclarationRc> = declaration
        .fields
        .iter()
        .map(|(_, field)| field.clone())
        .filter(|field| field.is_visible(gates))
        .collect();
    fields.sort_by_cached_key(|field| (field.name.clone(), signature_name(&field.field_type)));
    fields
}

/// Visible methods that are not property or event accessors, sorted by name and signature
#[must_use]
pub fn methods(
    declaration: &TypeDeclaration,
    gates: &VisibilityConfiguration,
) -> Vec<MethodDeclarationRc> {
    let accessors = accessor_tokens(declaration);

    let mut methods: Vec<MethodDeclarationRc> = declaration
        .methods
        .iter()
        .map(|(_, method)| method.clone())
        .filter(|method| !accessors.contains(&method.token))
        .filter(|method| method.is_visible(gates))
        .collect();
    methods.sort_by_cached_key(|method| (method.name.clone(), method_signature_text(method)));
    methods
}

/// Visible properties, sorted by name and index parameters
#[must_use]
pub fn properties(
    declaration: &TypeDeclaration,
    gates: &VisibilityConfiguration,
) -> Vec<PropertyDeclarationRc> {
    let mut properties: Vec<PropertyDeclarationRc> = declaration
        .properties
        .iter()
        .map(|(_, property)| property.clone())
        .filter(|property| property.is_visible(gates))
        .collect();
    properties.sort_by_cached_key(|property| {
        let parameters: Vec<String> = property
            .parameters
            .iter()
            .map(|parameter| signature_name(&parameter.parameter_type))
            .collect();
        (property.name.clone(), parameters.join(", "))
    });
    properties
}

/// Visible events, sorted by name
#[must_use]
pub fn events(
    declaration: &TypeDeclaration,
    gates: &VisibilityConfiguration,
) -> Vec<EventDeclarationRc> {
    let mut events: Vec<EventDeclarationRc> = declaration
        .events
        .iter()
        .map(|(_, event)| event.clone())
        .filter(|event| event.is_visible(gates))
        .collect();
    events.sort_by(|a, b| a.name.cmp(&b.name));
    events
}

/// Visible nested types, sorted by name
#[must_use]
pub fn nested_types(
    declaration: &TypeDeclaration,
    gates: &VisibilityConfiguration,
) -> Vec<TypeDeclarationRc> {
    let mut nested: Vec<TypeDeclarationRc> = declaration
        .nested_types
        .iter()
        .map(|(_, nested)| nested.clone())
        .filter(|nested| nested.is_visible(gates))
        .collect();
    nested.sort_by(|a, b| a.name.cmp(&b.name).then(a.token.cmp(&b.token)));
    nested
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        identity::AssemblyVersion, AssemblyBuilder, PrimitiveKind, TypeBuilder, TypeSignature,
        Visibility,
    };

    fn names<T>(items: &[T], name: impl Fn(&T) -> String) -> Vec<String> {
        items.iter().map(name).collect()
    }

    #[test]
    fn test_accessors_are_excluded_from_methods() {
        let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
        let module = builder.module("Sample.dll");
        let int32 = TypeSignature::primitive(PrimitiveKind::Int32);

        let declaration = TypeBuilder::class("Sample", "Counter")
            .field("count", int32.clone(), |field| field)
            .method("Reset", |method| method)
            .property("Count", int32.clone(), |property| {
                property.getter(|getter| getter).setter(|setter| setter)
            })
            .event("Changed", TypeSignature::named("System", "EventHandler"), |event| event)
            .build_in(&module);

        let gates = VisibilityConfiguration::all();
        assert_eq!(declaration.methods.count(), 5);
        assert_eq!(
            names(&methods(&declaration, &gates), |method| method.name.clone()),
            vec!["Reset"]
        );
        assert_eq!(properties(&declaration, &gates).len(), 1);
        assert_eq!(events(&declaration, &gates).len(), 1);
        assert_eq!(fields(&declaration, &gates).len(), 1);

        let public_only = VisibilityConfiguration::public_only();
        assert!(fields(&declaration, &public_only).is_empty());
    }

    #[test]
    fn test_overloads_sort_by_signature() {
        let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
        let module = builder.module("Sample.dll");

        let declaration = TypeBuilder::class("Sample", "Printer")
            .method("Print", |method| {
                method.parameter("value", TypeSignature::primitive(PrimitiveKind::String))
            })
            .method("Print", |method| {
                method.parameter("value", TypeSignature::primitive(PrimitiveKind::Int32))
            })
            .method("Flush", |method| method.visibility(Visibility::Family))
            .build_in(&module);

        let listed = methods(&declaration, &VisibilityConfiguration::all());
        assert_eq!(
            names(&listed, |method| method_signature_text(method)),
            vec![
                "Sample.Printer.Flush()",
                "Sample.Printer.Print(System.Int32)",
                "Sample.Printer.Print(System.String)",
            ]
        );
    }
}
