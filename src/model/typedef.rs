//! Type declarations.

use std::sync::{Arc, OnceLock};

use strum::Display;

use crate::model::{
    attributes::CustomAttribute,
    container::ModuleRc,
    flags::{GenericParameterFlags, TypeAttributes, Visibility},
    members::{EventDeclarationRc, FieldDeclarationRc, MethodDeclarationRc, PropertyDeclarationRc},
    token::Token,
    types::{TypeOwner, TypeReference, TypeSignature},
    weak::{ModuleRef, TypeDeclarationRef},
};

/// Reference-counted type declaration
pub type TypeDeclarationRc = Arc<TypeDeclaration>;
/// Append-only list of type declarations
pub type TypeDeclarationList = Arc<boxcar::Vec<TypeDeclarationRc>>;
/// Append-only list of fields
pub type FieldList = Arc<boxcar::Vec<FieldDeclarationRc>>;
/// Append-only list of methods
pub type MethodList = Arc<boxcar::Vec<MethodDeclarationRc>>;
/// Append-only list of properties
pub type PropertyList = Arc<boxcar::Vec<PropertyDeclarationRc>>;
/// Append-only list of events
pub type EventList = Arc<boxcar::Vec<EventDeclarationRc>>;

/// The kind of a type, derived from its flags and base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TypeKind {
    /// Reference type
    Class,
    /// Value type
    Struct,
    /// Interface
    Interface,
    /// Enumeration
    Enum,
    /// Delegate
    Delegate,
}

/// A generic parameter of a type or method declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericParameter {
    /// Parameter name
    pub name: String,
    /// Zero-based position
    pub position: u32,
    /// Variance and special constraints
    pub flags: GenericParameterFlags,
    /// Type constraints
    pub constraints: Vec<TypeSignature>,
}

impl GenericParameter {
    /// Create an unconstrained, invariant generic parameter
    #[must_use]
    pub fn new(name: &str, position: u32) -> Self {
        GenericParameter {
            name: name.to_string(),
            position,
            flags: GenericParameterFlags::empty(),
            constraints: Vec::new(),
        }
    }

    /// Returns true if any constraint has to be rendered
    #[must_use]
    pub fn has_constraints(&self) -> bool {
        !self.constraints.is_empty()
            || self.flags.intersects(
                GenericParameterFlags::REFERENCE_TYPE_CONSTRAINT
                    | GenericParameterFlags::NOT_NULLABLE_VALUE_TYPE_CONSTRAINT
                    | GenericParameterFlags::DEFAULT_CONSTRUCTOR_CONSTRAINT,
            )
    }
}

/// A type defined in a loaded module.
///
/// Member collections are append-only and owned by the declaration. The links to the
/// enclosing type and to the module are weak and set once, after the declaration has been
/// placed behind an `Arc`.
pub struct TypeDeclaration {
    /// Provider token
    pub token: Token,
    /// Namespace, empty for nested types
    pub namespace: String,
    /// Metadata name including the generic arity suffix
    pub name: String,
    /// Accessibility
    pub visibility: Visibility,
    /// Attribute flags
    pub flags: TypeAttributes,
    /// The type this one extends
    pub base_type: Option<TypeReference>,
    /// Declared interfaces, in metadata order
    pub interfaces: Vec<TypeReference>,
    /// Generic parameters
    pub generic_parameters: Vec<GenericParameter>,
    /// Custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
    /// Fields
    pub fields: FieldList,
    /// Methods, including property and event accessors
    pub methods: MethodList,
    /// Properties
    pub properties: PropertyList,
    /// Events
    pub events: EventList,
    /// Nested types
    pub nested_types: TypeDeclarationList,
    enclosing: OnceLock<TypeDeclarationRef>,
    module: OnceLock<ModuleRef>,
}

impl TypeDeclaration {
    /// Create a new, empty type declaration
    #[must_use]
    pub fn new(
        token: Token,
        namespace: &str,
        name: &str,
        visibility: Visibility,
        flags: TypeAttributes,
    ) -> Self {
        TypeDeclaration {
            token,
            namespace: namespace.to_string(),
            name: name.to_string(),
            visibility,
            flags,
            base_type: None,
            interfaces: Vec::new(),
            generic_parameters: Vec::new(),
            custom_attributes: Vec::new(),
            fields: Arc::new(boxcar::Vec::new()),
            methods: Arc::new(boxcar::Vec::new()),
            properties: Arc::new(boxcar::Vec::new()),
            events: Arc::new(boxcar::Vec::new()),
            nested_types: Arc::new(boxcar::Vec::new()),
            enclosing: OnceLock::new(),
            module: OnceLock::new(),
        }
    }

    /// Link this declaration to its enclosing type. Only the first call has an effect.
    pub fn set_enclosing_type(&self, enclosing: &TypeDeclarationRc) {
        let _ = self.enclosing.set(TypeDeclarationRef::new(enclosing));
    }

    /// Link this declaration to its module. Only the first call has an effect.
    pub fn set_module(&self, module: &ModuleRc) {
        let _ = self.module.set(ModuleRef::new(module));
    }

    /// Returns true if this type is declared inside another type.
    ///
    /// Stays true even when the enclosing declaration has been dropped.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.enclosing.get().is_some()
    }

    /// The enclosing type, if this type is nested and the link is still alive
    #[must_use]
    pub fn enclosing_type(&self) -> Option<TypeDeclarationRc> {
        self.enclosing.get().and_then(TypeDeclarationRef::upgrade)
    }

    /// The owning module; nested types inherit the module of their enclosing type
    #[must_use]
    pub fn module(&self) -> Option<ModuleRc> {
        if let Some(module) = self.module.get().and_then(ModuleRef::upgrade) {
            return Some(module);
        }

        self.enclosing_type().and_then(|enclosing| enclosing.module())
    }

    /// The kind of this type
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        if self.flags.contains(TypeAttributes::INTERFACE) {
            return TypeKind::Interface;
        }

        match &self.base_type {
            Some(base) if base.is("System", "Enum") => TypeKind::Enum,
            Some(base) if base.is("System", "ValueType") && !self.is("System", "Enum") => {
                TypeKind::Struct
            }
            Some(base) if base.is("System", "MulticastDelegate") => TypeKind::Delegate,
            _ => TypeKind::Class,
        }
    }

    /// Returns true if this declaration is `Namespace.Name`
    #[must_use]
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.namespace == namespace && self.name == name && !self.is_nested()
    }

    /// Returns true if the type is abstract
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(TypeAttributes::ABSTRACT)
    }

    /// Returns true if the type is sealed
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.flags.contains(TypeAttributes::SEALED)
    }

    /// Returns true for `static` classes, which are abstract and sealed in metadata
    #[must_use]
    pub fn is_static_class(&self) -> bool {
        self.kind() == TypeKind::Class && self.is_abstract() && self.is_sealed()
    }

    /// Metadata full name: `Namespace.Name`, or `Outer/Inner` for nested types
    #[must_use]
    pub fn full_name(&self) -> String {
        if let Some(enclosing) = self.enclosing_type() {
            return format!("{}/{}", enclosing.full_name(), self.name);
        }

        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Generic parameters as signatures, in position order
    #[must_use]
    pub fn generic_parameter_signatures(&self) -> Vec<TypeSignature> {
        self.generic_parameters
            .iter()
            .map(|parameter| TypeSignature::type_parameter(&parameter.name, parameter.position))
            .collect()
    }

    /// A reference naming this declaration.
    ///
    /// Generic types produce a reference to their open definition.
    #[must_use]
    pub fn reference(&self) -> TypeReference {
        let owner = if let Some(enclosing) = self.enclosing_type() {
            TypeOwner::Type(Box::new(enclosing.reference()))
        } else if let Some(module) = self.module() {
            TypeOwner::Module(module.name.clone())
        } else {
            TypeOwner::None
        };

        TypeReference {
            token: self.token,
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            generic_arguments: self.generic_parameter_signatures(),
            owner,
        }
    }

    /// Find a method by name
    #[must_use]
    pub fn method(&self, name: &str) -> Option<MethodDeclarationRc> {
        self.methods
            .iter()
            .find(|(_, method)| method.name == name)
            .map(|(_, method)| method.clone())
    }

    /// Find a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<FieldDeclarationRc> {
        self.fields
            .iter()
            .find(|(_, field)| field.name == name)
            .map(|(_, field)| field.clone())
    }
}

impl std::fmt::Debug for TypeDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDeclaration")
            .field("token", &self.token)
            .field("full_name", &self.full_name())
            .field("visibility", &self.visibility)
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration(base: Option<TypeReference>, flags: TypeAttributes) -> TypeDeclaration {
        let mut declaration =
            TypeDeclaration::new(Token::new(0x0200_0002), "N", "T", Visibility::Public, flags);
        declaration.base_type = base;
        declaration
    }

    #[test]
    fn test_kind() {
        let object = Some(TypeReference::new("System", "Object"));
        assert_eq!(
            declaration(object.clone(), TypeAttributes::empty()).kind(),
            TypeKind::Class
        );
        assert_eq!(
            declaration(None, TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT).kind(),
            TypeKind::Interface
        );
        assert_eq!(
            declaration(
                Some(TypeReference::new("System", "ValueType")),
                TypeAttributes::SEALED
            )
            .kind(),
            TypeKind::Struct
        );
        assert_eq!(
            declaration(Some(TypeReference::new("System", "Enum")), TypeAttributes::SEALED).kind(),
            TypeKind::Enum
        );
        assert_eq!(
            declaration(
                Some(TypeReference::new("System", "MulticastDelegate")),
                TypeAttributes::SEALED
            )
            .kind(),
            TypeKind::Delegate
        );
    }

    #[test]
    fn test_static_class() {
        let object = Some(TypeReference::new("System", "Object"));
        assert!(declaration(object, TypeAttributes::ABSTRACT | TypeAttributes::SEALED)
            .is_static_class());
    }

    #[test]
    fn test_nested_links() {
        let outer = Arc::new(TypeDeclaration::new(
            Token::new(0x0200_0002),
            "N",
            "Outer",
            Visibility::Public,
            TypeAttributes::empty(),
        ));
        let inner = Arc::new(TypeDeclaration::new(
            Token::new(0x0200_0003),
            "",
            "Inner",
            Visibility::Private,
            TypeAttributes::empty(),
        ));
        inner.set_enclosing_type(&outer);

        assert!(inner.is_nested());
        assert_eq!(inner.full_name(), "N.Outer/Inner");
        let reference = inner.reference();
        assert_eq!(reference.full_name(), "N.Outer/Inner");
        assert_eq!(reference.token, Token::new(0x0200_0003));

        drop(outer);
        assert!(inner.is_nested());
        assert!(inner.enclosing_type().is_none());
        assert_eq!(inner.full_name(), "Inner");
    }
}
