//! Syntax-neutral name composition.
//!
//! These names are used for tooltips of cross-references, for sorting member lists and for
//! messages. They follow the C#-like notation of the framework documentation
//! (`System.Collections.Generic.List<T>`, `Outer.Inner`, `int[,]` as `System.Int32[,]`);
//! the syntax-specific spelling of type names lives in [`crate::render`].

use crate::model::{
    FieldReference, MethodDeclaration, MethodReference, TypeDeclaration, TypeReference,
    TypeSignature,
};

/// Strip the generic arity suffix of a metadata name (`` List`1 `` is `List`)
#[must_use]
pub fn strip_arity(name: &str) -> &str {
    match name.rfind('`') {
        Some(index) if name[index + 1..].chars().all(|c| c.is_ascii_digit()) => &name[..index],
        _ => name,
    }
}

/// Fully qualified name of a type reference.
///
/// Nested types are joined with `.`, arity suffixes are dropped and generic arguments follow
/// as `<A, B>`. An open generic definition therefore shows its parameter names, an
/// instantiation its argument types.
#[must_use]
pub fn qualified_name(reference: &TypeReference) -> String {
    let mut name = match reference.enclosing() {
        Some(enclosing) => {
            format!("{}.{}", qualified_name(enclosing), strip_arity(&reference.name))
        }
        None if reference.namespace.is_empty() => strip_arity(&reference.name).to_string(),
        None => format!("{}.{}", reference.namespace, strip_arity(&reference.name)),
    };

    if !reference.generic_arguments.is_empty() {
        let arguments: Vec<String> = reference
            .generic_arguments
            .iter()
            .map(signature_name)
            .collect();
        name.push('<');
        name.push_str(&arguments.join(", "));
        name.push('>');
    }

    name
}

/// Fully qualified name of a declaration, generic parameters included
#[must_use]
pub fn declaration_name(declaration: &TypeDeclaration) -> String {
    qualified_name(&declaration.reference())
}

/// Fully qualified name of a type signature
#[must_use]
pub fn signature_name(signature: &TypeSignature) -> String {
    match signature {
        TypeSignature::Void => "System.Void".to_string(),
        TypeSignature::Named(reference) => qualified_name(reference),
        TypeSignature::Array { element, rank } => {
            let commas = ",".repeat(rank.saturating_sub(1) as usize);
            format!("{}[{commas}]", signature_name(element))
        }
        TypeSignature::Pointer(inner) => format!("{}*", signature_name(inner)),
        TypeSignature::ByRef(inner) => format!("{}&", signature_name(inner)),
        TypeSignature::GenericParameter { name, .. } => name.clone(),
    }
}

/// `Type.Name(ParamTypes)` of a method declaration
#[must_use]
pub fn method_signature_text(method: &MethodDeclaration) -> String {
    let owner = method
        .declaring_type()
        .map(|declaring| declaration_name(&declaring))
        .unwrap_or_default();
    compose(&owner, &method.name, &method.parameter_types())
}

/// `Type.Name(ParamTypes)` of a method reference
#[must_use]
pub fn method_reference_text(method: &MethodReference) -> String {
    compose(
        &qualified_name(&method.declaring_type),
        &method.name,
        &method.parameter_types,
    )
}

/// `Type.Name` of a field reference
#[must_use]
pub fn field_reference_text(field: &FieldReference) -> String {
    format!("{}.{}", qualified_name(&field.declaring_type), field.name)
}

fn compose(owner: &str, name: &str, parameters: &[TypeSignature]) -> String {
    let parameters: Vec<String> = parameters.iter().map(signature_name).collect();
    if owner.is_empty() {
        format!("{name}({})", parameters.join(", "))
    } else {
        format!("{owner}.{name}({})", parameters.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PrimitiveKind, TypeOwner};

    #[test]
    fn test_strip_arity() {
        assert_eq!(strip_arity("List`1"), "List");
        assert_eq!(strip_arity("Dictionary`2"), "Dictionary");
        assert_eq!(strip_arity("Plain"), "Plain");
        assert_eq!(strip_arity("Odd`name"), "Odd`name");
    }

    #[test]
    fn test_generic_definition_and_instantiation() {
        let definition = TypeReference::new("System.Collections.Generic", "Dictionary`2")
            .with_arguments(vec![
                TypeSignature::type_parameter("TKey", 0),
                TypeSignature::type_parameter("TValue", 1),
            ]);
        assert_eq!(
            qualified_name(&definition),
            "System.Collections.Generic.Dictionary<TKey, TValue>"
        );

        let instantiation = TypeReference::new("System.Collections.Generic", "Dictionary`2")
            .with_arguments(vec![
                TypeSignature::primitive(PrimitiveKind::String),
                TypeSignature::primitive(PrimitiveKind::Int32).array(),
            ]);
        assert_eq!(
            qualified_name(&instantiation),
            "System.Collections.Generic.Dictionary<System.String, System.Int32[]>"
        );
    }

    #[test]
    fn test_nested_name() {
        let outer = TypeReference::new("Sample", "Outer")
            .with_owner(TypeOwner::Module("Sample.dll".to_string()));
        let inner = TypeReference::nested(outer, "Inner");
        assert_eq!(qualified_name(&inner), "Sample.Outer.Inner");
        assert_eq!(inner.full_name(), "Sample.Outer/Inner");
    }

    #[test]
    fn test_name_rendering_is_deterministic() {
        let reference = TypeReference::new("A", "B`1")
            .with_arguments(vec![TypeSignature::primitive(PrimitiveKind::Int32).pointer()]);
        let first = qualified_name(&reference);
        assert_eq!(first, qualified_name(&reference));
        assert_eq!(first, "A.B<System.Int32*>");
    }

    #[test]
    fn test_method_reference_text() {
        let method = MethodReference::new(
            TypeReference::new("System", "Console"),
            "WriteLine",
            TypeSignature::Void,
        )
        .with_parameters(vec![TypeSignature::primitive(PrimitiveKind::String)]);
        assert_eq!(
            method_reference_text(&method),
            "System.Console.WriteLine(System.String)"
        );

        let multi = TypeSignature::Array {
            element: Box::new(TypeSignature::primitive(PrimitiveKind::Double)),
            rank: 3,
        };
        assert_eq!(signature_name(&multi), "System.Double[,,]");
    }
}
