//! Type signatures and type references.
//!
//! A [`TypeSignature`] describes the shape of a type use (a field type, a parameter type, a
//! cast target). Named types inside a signature are [`TypeReference`]s, which identify a type
//! structurally by name, namespace, generic arguments and owner chain. References are resolved
//! to declarations through [`crate::model::CodeModel`]; references to types outside the loaded
//! set simply stay unresolved.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use strum::{Display, EnumString};

use crate::model::{identity::AssemblyIdentity, token::Token};

/// Declaration a generic parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericOwner {
    /// A type's generic parameter (`!0`)
    Type,
    /// A method's generic parameter (`!!0`)
    Method,
}

/// The built-in `System` types the target syntaxes spell with a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum PrimitiveKind {
    /// `System.Void`
    Void,
    /// `System.Boolean`
    Boolean,
    /// `System.Char`
    Char,
    /// `System.SByte`
    SByte,
    /// `System.Byte`
    Byte,
    /// `System.Int16`
    Int16,
    /// `System.UInt16`
    UInt16,
    /// `System.Int32`
    Int32,
    /// `System.UInt32`
    UInt32,
    /// `System.Int64`
    Int64,
    /// `System.UInt64`
    UInt64,
    /// `System.Single`
    Single,
    /// `System.Double`
    Double,
    /// `System.Decimal`
    Decimal,
    /// `System.String`
    String,
    /// `System.Object`
    Object,
    /// `System.IntPtr`
    IntPtr,
    /// `System.UIntPtr`
    UIntPtr,
}

/// What a type reference is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TypeOwner {
    /// No scope information
    #[default]
    None,
    /// A module of the current assembly, by name
    Module(String),
    /// Another assembly
    Assembly(AssemblyIdentity),
    /// The enclosing type of a nested type
    Type(Box<TypeReference>),
}

/// A named type, as seen from a use site.
///
/// Structural identity (`Eq`/`Hash`) covers name, namespace, generic arguments and owner chain;
/// the token is deliberately left out so that a reference assembled by hand equals the one
/// handed out by the provider.
#[derive(Debug, Clone)]
pub struct TypeReference {
    /// Provider token, [`Token::NULL`] if unknown
    pub token: Token,
    /// Namespace, empty for nested types and the global namespace
    pub namespace: String,
    /// Metadata name, including the generic arity suffix (`` List`1 ``)
    pub name: String,
    /// Generic arguments; parameter signatures for a generic definition
    pub generic_arguments: Vec<TypeSignature>,
    /// Scope of the reference
    pub owner: TypeOwner,
}

impl TypeReference {
    /// Create a reference to a top-level type without owner information
    #[must_use]
    pub fn new(namespace: &str, name: &str) -> Self {
        TypeReference {
            token: Token::NULL,
            namespace: namespace.to_string(),
            name: name.to_string(),
            generic_arguments: Vec::new(),
            owner: TypeOwner::None,
        }
    }

    /// Create a reference to a nested type
    #[must_use]
    pub fn nested(enclosing: TypeReference, name: &str) -> Self {
        TypeReference {
            token: Token::NULL,
            namespace: String::new(),
            name: name.to_string(),
            generic_arguments: Vec::new(),
            owner: TypeOwner::Type(Box::new(enclosing)),
        }
    }

    /// Create a reference to one of the `System` primitive types
    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeReference::new("System", &kind.to_string())
    }

    /// Set the provider token
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }

    /// Set the owner
    #[must_use]
    pub fn with_owner(mut self, owner: TypeOwner) -> Self {
        self.owner = owner;
        self
    }

    /// Set the generic arguments
    #[must_use]
    pub fn with_arguments(mut self, arguments: Vec<TypeSignature>) -> Self {
        self.generic_arguments = arguments;
        self
    }

    /// The enclosing type of a nested type reference
    #[must_use]
    pub fn enclosing(&self) -> Option<&TypeReference> {
        match &self.owner {
            TypeOwner::Type(enclosing) => Some(enclosing),
            _ => None,
        }
    }

    /// Metadata full name: `Namespace.Name` for top-level types, `Outer/Inner` for nested ones.
    ///
    /// Generic arguments are not part of the full name; every instantiation of a generic type
    /// shares the full name of its definition.
    #[must_use]
    pub fn full_name(&self) -> String {
        if let Some(enclosing) = self.enclosing() {
            return format!("{}/{}", enclosing.full_name(), self.name);
        }

        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns the primitive kind if this is a non-generic `System` primitive
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        if self.namespace != "System" || !self.generic_arguments.is_empty() {
            return None;
        }
        if self.enclosing().is_some() {
            return None;
        }

        PrimitiveKind::from_str(&self.name).ok()
    }

    /// Returns true if this reference names `Namespace.Name` exactly
    #[must_use]
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace == namespace && self.name == name && self.enclosing().is_none()
    }

    /// Returns true if every generic argument is a type-owned generic parameter in position
    /// order, i.e. the reference names the open generic definition itself.
    #[must_use]
    pub fn is_generic_definition(&self) -> bool {
        !self.generic_arguments.is_empty()
            && self
                .generic_arguments
                .iter()
                .enumerate()
                .all(|(index, argument)| {
                    matches!(
                        argument,
                        TypeSignature::GenericParameter { position, owner: GenericOwner::Type, .. }
                            if *position as usize == index
                    )
                })
    }

    /// Replace generic parameters inside the arguments of this reference
    #[must_use]
    pub fn substitute(
        &self,
        type_arguments: &[TypeSignature],
        method_arguments: &[TypeSignature],
    ) -> TypeReference {
        TypeReference {
            token: self.token,
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            generic_arguments: self
                .generic_arguments
                .iter()
                .map(|argument| argument.substitute(type_arguments, method_arguments))
                .collect(),
            owner: self.owner.clone(),
        }
    }
}

impl PartialEq for TypeReference {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.namespace == other.namespace
            && self.generic_arguments == other.generic_arguments
            && self.owner == other.owner
    }
}

impl Eq for TypeReference {}

impl Hash for TypeReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.namespace.hash(state);
        self.generic_arguments.hash(state);
        self.owner.hash(state);
    }
}

/// The shape of a type use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    /// `void`
    Void,
    /// A class, struct, interface, enum or delegate, possibly instantiated
    Named(TypeReference),
    /// An array of `element`; `rank` 1 is a vector
    Array {
        /// Element type
        element: Box<TypeSignature>,
        /// Number of dimensions
        rank: u32,
    },
    /// Unmanaged pointer
    Pointer(Box<TypeSignature>),
    /// Managed reference (`ref`, `out`)
    ByRef(Box<TypeSignature>),
    /// A generic parameter of a type or method
    GenericParameter {
        /// Parameter name, e.g. `T`
        name: String,
        /// Zero-based position in the owner's parameter list
        position: u32,
        /// Whether the parameter belongs to a type or a method
        owner: GenericOwner,
    },
}

impl TypeSignature {
    /// A named top-level type
    #[must_use]
    pub fn named(namespace: &str, name: &str) -> Self {
        TypeSignature::Named(TypeReference::new(namespace, name))
    }

    /// One of the `System` primitives; [`PrimitiveKind::Void`] maps to [`TypeSignature::Void`]
    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Void => TypeSignature::Void,
            _ => TypeSignature::Named(TypeReference::primitive(kind)),
        }
    }

    /// A type-owned generic parameter
    #[must_use]
    pub fn type_parameter(name: &str, position: u32) -> Self {
        TypeSignature::GenericParameter {
            name: name.to_string(),
            position,
            owner: GenericOwner::Type,
        }
    }

    /// A method-owned generic parameter
    #[must_use]
    pub fn method_parameter(name: &str, position: u32) -> Self {
        TypeSignature::GenericParameter {
            name: name.to_string(),
            position,
            owner: GenericOwner::Method,
        }
    }

    /// Wrap into a vector of this type
    #[must_use]
    pub fn array(self) -> Self {
        TypeSignature::Array {
            element: Box::new(self),
            rank: 1,
        }
    }

    /// Wrap into a managed reference
    #[must_use]
    pub fn by_ref(self) -> Self {
        TypeSignature::ByRef(Box::new(self))
    }

    /// Wrap into an unmanaged pointer
    #[must_use]
    pub fn pointer(self) -> Self {
        TypeSignature::Pointer(Box::new(self))
    }

    /// The named type, if this signature is one
    #[must_use]
    pub fn as_reference(&self) -> Option<&TypeReference> {
        match self {
            TypeSignature::Named(reference) => Some(reference),
            _ => None,
        }
    }

    /// Primitive kind of the signature, including `void`
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            TypeSignature::Void => Some(PrimitiveKind::Void),
            TypeSignature::Named(reference) => reference.primitive_kind(),
            _ => None,
        }
    }

    /// Replace generic parameters by the given arguments.
    ///
    /// Parameters without a matching argument are kept as they are.
    #[must_use]
    pub fn substitute(
        &self,
        type_arguments: &[TypeSignature],
        method_arguments: &[TypeSignature],
    ) -> TypeSignature {
        match self {
            TypeSignature::Void => TypeSignature::Void,
            TypeSignature::Named(reference) => {
                TypeSignature::Named(reference.substitute(type_arguments, method_arguments))
            }
            TypeSignature::Array { element, rank } => TypeSignature::Array {
                element: Box::new(element.substitute(type_arguments, method_arguments)),
                rank: *rank,
            },
            TypeSignature::Pointer(inner) => {
                TypeSignature::Pointer(Box::new(inner.substitute(type_arguments, method_arguments)))
            }
            TypeSignature::ByRef(inner) => {
                TypeSignature::ByRef(Box::new(inner.substitute(type_arguments, method_arguments)))
            }
            TypeSignature::GenericParameter {
                position, owner, ..
            } => {
                let arguments = match owner {
                    GenericOwner::Type => type_arguments,
                    GenericOwner::Method => method_arguments,
                };
                arguments
                    .get(*position as usize)
                    .cloned()
                    .unwrap_or_else(|| self.clone())
            }
        }
    }
}

impl From<TypeReference> for TypeSignature {
    fn from(reference: TypeReference) -> Self {
        TypeSignature::Named(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::identity::AssemblyVersion;

    #[test]
    fn test_structural_identity_ignores_token() {
        let a = TypeReference::new("System", "String").with_token(Token::new(0x0100_0001));
        let b = TypeReference::new("System", "String");
        assert_eq!(a, b);
    }

    #[test]
    fn test_structural_identity_includes_owner() {
        let mscorlib = AssemblyIdentity::new("mscorlib", AssemblyVersion::new(4, 0, 0, 0));
        let other = AssemblyIdentity::new("Other", AssemblyVersion::new(1, 0, 0, 0));

        let a = TypeReference::new("N", "T").with_owner(TypeOwner::Assembly(mscorlib));
        let b = TypeReference::new("N", "T").with_owner(TypeOwner::Assembly(other));
        assert_ne!(a, b);
    }

    #[test]
    fn test_full_name() {
        let outer = TypeReference::new("Sample", "Outer`1");
        let inner = TypeReference::nested(outer.clone(), "Inner");
        assert_eq!(outer.full_name(), "Sample.Outer`1");
        assert_eq!(inner.full_name(), "Sample.Outer`1/Inner");
        assert_eq!(TypeReference::new("", "Global").full_name(), "Global");
    }

    #[test]
    fn test_primitive_kind() {
        assert_eq!(
            TypeReference::new("System", "Int32").primitive_kind(),
            Some(PrimitiveKind::Int32)
        );
        assert_eq!(TypeReference::new("System", "Guid").primitive_kind(), None);
        assert_eq!(TypeReference::new("Other", "Int32").primitive_kind(), None);
        assert_eq!(
            TypeSignature::primitive(PrimitiveKind::Void),
            TypeSignature::Void
        );
    }

    #[test]
    fn test_generic_definition() {
        let definition = TypeReference::new("System.Collections.Generic", "List`1")
            .with_arguments(vec![TypeSignature::type_parameter("T", 0)]);
        assert!(definition.is_generic_definition());

        let instance = TypeReference::new("System.Collections.Generic", "List`1")
            .with_arguments(vec![TypeSignature::primitive(PrimitiveKind::Int32)]);
        assert!(!instance.is_generic_definition());
    }

    #[test]
    fn test_substitute() {
        let list_of_t = TypeSignature::Named(
            TypeReference::new("System.Collections.Generic", "IEnumerable`1")
                .with_arguments(vec![TypeSignature::type_parameter("T", 0)]),
        );
        let int32 = TypeSignature::primitive(PrimitiveKind::Int32);

        let substituted = list_of_t.substitute(std::slice::from_ref(&int32), &[]);
        assert_eq!(
            substituted,
            TypeSignature::Named(
                TypeReference::new("System.Collections.Generic", "IEnumerable`1")
                    .with_arguments(vec![int32])
            )
        );

        let method_param = TypeSignature::method_parameter("U", 0).array();
        assert_eq!(method_param.substitute(&[], &[]), method_param);
    }
}
