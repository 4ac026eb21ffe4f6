//! Field, method, property and event declarations and the references naming them.

use std::sync::{Arc, OnceLock};

use crate::model::{
    attributes::CustomAttribute,
    body::MethodBody,
    flags::{FieldModifiers, MethodModifiers, ParameterFlags, Visibility},
    literal::Literal,
    token::Token,
    typedef::{GenericParameter, TypeDeclarationRc},
    types::{TypeReference, TypeSignature},
    weak::TypeDeclarationRef,
};

/// Reference-counted field declaration
pub type FieldDeclarationRc = Arc<FieldDeclaration>;
/// Reference-counted method declaration
pub type MethodDeclarationRc = Arc<MethodDeclaration>;
/// Reference-counted property declaration
pub type PropertyDeclarationRc = Arc<PropertyDeclaration>;
/// Reference-counted event declaration
pub type EventDeclarationRc = Arc<EventDeclaration>;

/// Name of instance constructors
pub const CONSTRUCTOR_NAME: &str = ".ctor";
/// Name of type initializers
pub const TYPE_INITIALIZER_NAME: &str = ".cctor";

fn global_type() -> TypeReference {
    TypeReference::new("", "<Module>")
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Zero-based position, not counting `this`
    pub position: u32,
    /// Parameter type; `ref`/`out` parameters have a [`TypeSignature::ByRef`] type
    pub parameter_type: TypeSignature,
    /// Attribute flags
    pub flags: ParameterFlags,
    /// Default value of optional parameters
    pub default: Option<Literal>,
    /// Custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
}

impl Parameter {
    /// Create a plain parameter
    #[must_use]
    pub fn new(name: &str, position: u32, parameter_type: TypeSignature) -> Self {
        Parameter {
            name: name.to_string(),
            position,
            parameter_type,
            flags: ParameterFlags::empty(),
            default: None,
            custom_attributes: Vec::new(),
        }
    }

    /// `out` parameter: by-reference, `[Out]` and not `[In]`
    #[must_use]
    pub fn is_out(&self) -> bool {
        matches!(self.parameter_type, TypeSignature::ByRef(_))
            && self.flags.contains(ParameterFlags::OUT)
            && !self.flags.contains(ParameterFlags::IN)
    }

    /// `ref` parameter: by-reference and not `out`
    #[must_use]
    pub fn is_ref(&self) -> bool {
        matches!(self.parameter_type, TypeSignature::ByRef(_)) && !self.is_out()
    }

    /// `params` parameter, marked with `System.ParamArrayAttribute`
    #[must_use]
    pub fn is_params(&self) -> bool {
        self.custom_attributes
            .iter()
            .any(|attribute| attribute.attribute_type().is("System", "ParamArrayAttribute"))
    }
}

/// A field of a type declaration.
#[derive(Debug)]
pub struct FieldDeclaration {
    /// Provider token
    pub token: Token,
    /// Field name
    pub name: String,
    /// Accessibility
    pub visibility: Visibility,
    /// Modifier flags
    pub modifiers: FieldModifiers,
    /// Field type
    pub field_type: TypeSignature,
    /// Constant value of literal fields
    pub constant: Option<Literal>,
    /// Custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
    declaring_type: OnceLock<TypeDeclarationRef>,
}

impl FieldDeclaration {
    /// Create a new field declaration
    #[must_use]
    pub fn new(
        token: Token,
        name: &str,
        visibility: Visibility,
        modifiers: FieldModifiers,
        field_type: TypeSignature,
    ) -> Self {
        FieldDeclaration {
            token,
            name: name.to_string(),
            visibility,
            modifiers,
            field_type,
            constant: None,
            custom_attributes: Vec::new(),
            declaring_type: OnceLock::new(),
        }
    }

    /// Link the field to its declaring type. Only the first call has an effect.
    pub fn set_declaring_type(&self, declaring_type: &TypeDeclarationRc) {
        let _ = self
            .declaring_type
            .set(TypeDeclarationRef::new(declaring_type));
    }

    /// The declaring type, if the link is still alive
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeDeclarationRc> {
        self.declaring_type.get().and_then(TypeDeclarationRef::upgrade)
    }

    /// Returns true for static fields
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(FieldModifiers::STATIC)
    }

    /// Returns true for compile-time constants
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.modifiers.contains(FieldModifiers::LITERAL)
    }

    /// A reference naming this field
    #[must_use]
    pub fn reference(&self) -> FieldReference {
        FieldReference {
            token: self.token,
            declaring_type: self
                .declaring_type()
                .map_or_else(global_type, |declaring| declaring.reference()),
            name: self.name.clone(),
            field_type: self.field_type.clone(),
        }
    }
}

/// A method of a type declaration.
#[derive(Debug)]
pub struct MethodDeclaration {
    /// Provider token
    pub token: Token,
    /// Method name; `.ctor` and `.cctor` for constructors
    pub name: String,
    /// Accessibility
    pub visibility: Visibility,
    /// Modifier flags
    pub modifiers: MethodModifiers,
    /// Return type
    pub return_type: TypeSignature,
    /// Parameters, in position order
    pub parameters: Vec<Parameter>,
    /// Generic parameters
    pub generic_parameters: Vec<GenericParameter>,
    /// Custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
    /// The body, absent for abstract and extern methods
    pub body: Option<MethodBody>,
    declaring_type: OnceLock<TypeDeclarationRef>,
}

impl MethodDeclaration {
    /// Create a new method declaration without parameters or body
    #[must_use]
    pub fn new(
        token: Token,
        name: &str,
        visibility: Visibility,
        modifiers: MethodModifiers,
        return_type: TypeSignature,
    ) -> Self {
        MethodDeclaration {
            token,
            name: name.to_string(),
            visibility,
            modifiers,
            return_type,
            parameters: Vec::new(),
            generic_parameters: Vec::new(),
            custom_attributes: Vec::new(),
            body: None,
            declaring_type: OnceLock::new(),
        }
    }

    /// Link the method to its declaring type. Only the first call has an effect.
    pub fn set_declaring_type(&self, declaring_type: &TypeDeclarationRc) {
        let _ = self
            .declaring_type
            .set(TypeDeclarationRef::new(declaring_type));
    }

    /// The declaring type, if the link is still alive
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeDeclarationRc> {
        self.declaring_type.get().and_then(TypeDeclarationRef::upgrade)
    }

    /// Returns true for instance constructors and type initializers
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME || self.name == TYPE_INITIALIZER_NAME
    }

    /// Returns true for static methods
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(MethodModifiers::STATIC)
    }

    /// Returns true for virtual methods
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.modifiers.contains(MethodModifiers::VIRTUAL)
    }

    /// Returns true for abstract methods
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(MethodModifiers::ABSTRACT)
    }

    /// Returns true for methods that cannot be overridden
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.modifiers.contains(MethodModifiers::FINAL)
    }

    /// Returns true for methods occupying a new vtable slot
    #[must_use]
    pub fn is_new_slot(&self) -> bool {
        self.modifiers.contains(MethodModifiers::NEW_SLOT)
    }

    /// Parameter types, in position order
    #[must_use]
    pub fn parameter_types(&self) -> Vec<TypeSignature> {
        self.parameters
            .iter()
            .map(|parameter| parameter.parameter_type.clone())
            .collect()
    }

    /// A reference naming this method
    #[must_use]
    pub fn reference(&self) -> MethodReference {
        MethodReference {
            token: self.token,
            declaring_type: self
                .declaring_type()
                .map_or_else(global_type, |declaring| declaring.reference()),
            name: self.name.clone(),
            return_type: self.return_type.clone(),
            parameter_types: self.parameter_types(),
            generic_arguments: self
                .generic_parameters
                .iter()
                .map(|parameter| {
                    TypeSignature::method_parameter(&parameter.name, parameter.position)
                })
                .collect(),
            has_this: !self.is_static(),
        }
    }
}

/// A property of a type declaration.
#[derive(Debug)]
pub struct PropertyDeclaration {
    /// Provider token
    pub token: Token,
    /// Property name
    pub name: String,
    /// Property type
    pub property_type: TypeSignature,
    /// Index parameters
    pub parameters: Vec<Parameter>,
    /// The `get` accessor
    pub getter: Option<MethodDeclarationRc>,
    /// The `set` accessor
    pub setter: Option<MethodDeclarationRc>,
    /// Custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
    declaring_type: OnceLock<TypeDeclarationRef>,
}

impl PropertyDeclaration {
    /// Create a property without accessors
    #[must_use]
    pub fn new(token: Token, name: &str, property_type: TypeSignature) -> Self {
        PropertyDeclaration {
            token,
            name: name.to_string(),
            property_type,
            parameters: Vec::new(),
            getter: None,
            setter: None,
            custom_attributes: Vec::new(),
            declaring_type: OnceLock::new(),
        }
    }

    /// Link the property to its declaring type. Only the first call has an effect.
    pub fn set_declaring_type(&self, declaring_type: &TypeDeclarationRc) {
        let _ = self
            .declaring_type
            .set(TypeDeclarationRef::new(declaring_type));
    }

    /// The declaring type, if the link is still alive
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeDeclarationRc> {
        self.declaring_type.get().and_then(TypeDeclarationRef::upgrade)
    }

    /// The accessor methods that are present
    #[must_use]
    pub fn accessors(&self) -> Vec<&MethodDeclarationRc> {
        self.getter.iter().chain(self.setter.iter()).collect()
    }

    /// Most visible accessor visibility; `None` for a property without accessors
    #[must_use]
    pub fn visibility(&self) -> Option<Visibility> {
        self.accessors()
            .into_iter()
            .map(|accessor| accessor.visibility)
            .max()
    }

    /// Returns true if the accessors are static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.accessors()
            .first()
            .is_some_and(|accessor| accessor.is_static())
    }

    /// Returns true for indexers
    #[must_use]
    pub fn is_indexer(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// A reference naming this property
    #[must_use]
    pub fn reference(&self) -> PropertyReference {
        PropertyReference {
            token: self.token,
            declaring_type: self
                .declaring_type()
                .map_or_else(global_type, |declaring| declaring.reference()),
            name: self.name.clone(),
            property_type: self.property_type.clone(),
            parameter_types: self
                .parameters
                .iter()
                .map(|parameter| parameter.parameter_type.clone())
                .collect(),
        }
    }
}

/// An event of a type declaration.
#[derive(Debug)]
pub struct EventDeclaration {
    /// Provider token
    pub token: Token,
    /// Event name
    pub name: String,
    /// Delegate type of the event
    pub event_type: TypeSignature,
    /// The `add` accessor
    pub add_method: Option<MethodDeclarationRc>,
    /// The `remove` accessor
    pub remove_method: Option<MethodDeclarationRc>,
    /// The `raise` accessor
    pub raise_method: Option<MethodDeclarationRc>,
    /// Custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
    declaring_type: OnceLock<TypeDeclarationRef>,
}

impl EventDeclaration {
    /// Create an event without accessors
    #[must_use]
    pub fn new(token: Token, name: &str, event_type: TypeSignature) -> Self {
        EventDeclaration {
            token,
            name: name.to_string(),
            event_type,
            add_method: None,
            remove_method: None,
            raise_method: None,
            custom_attributes: Vec::new(),
            declaring_type: OnceLock::new(),
        }
    }

    /// Link the event to its declaring type. Only the first call has an effect.
    pub fn set_declaring_type(&self, declaring_type: &TypeDeclarationRc) {
        let _ = self
            .declaring_type
            .set(TypeDeclarationRef::new(declaring_type));
    }

    /// The declaring type, if the link is still alive
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeDeclarationRc> {
        self.declaring_type.get().and_then(TypeDeclarationRef::upgrade)
    }

    /// The accessor methods that are present
    #[must_use]
    pub fn accessors(&self) -> Vec<&MethodDeclarationRc> {
        self.add_method
            .iter()
            .chain(self.remove_method.iter())
            .chain(self.raise_method.iter())
            .collect()
    }

    /// Most visible accessor visibility; `None` for an event without accessors
    #[must_use]
    pub fn visibility(&self) -> Option<Visibility> {
        self.accessors()
            .into_iter()
            .map(|accessor| accessor.visibility)
            .max()
    }

    /// Returns true if the accessors are static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.accessors()
            .first()
            .is_some_and(|accessor| accessor.is_static())
    }

    /// A reference naming this event
    #[must_use]
    pub fn reference(&self) -> EventReference {
        EventReference {
            token: self.token,
            declaring_type: self
                .declaring_type()
                .map_or_else(global_type, |declaring| declaring.reference()),
            name: self.name.clone(),
            event_type: self.event_type.clone(),
        }
    }
}

/// A method, as seen from a use site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodReference {
    /// Provider token, [`Token::NULL`] if unknown
    pub token: Token,
    /// The type declaring the method
    pub declaring_type: TypeReference,
    /// Method name
    pub name: String,
    /// Return type
    pub return_type: TypeSignature,
    /// Parameter types, in position order
    pub parameter_types: Vec<TypeSignature>,
    /// Generic method arguments; parameter signatures for the definition
    pub generic_arguments: Vec<TypeSignature>,
    /// Instance method
    pub has_this: bool,
}

impl MethodReference {
    /// Create a reference to an instance method without parameters
    #[must_use]
    pub fn new(declaring_type: TypeReference, name: &str, return_type: TypeSignature) -> Self {
        MethodReference {
            token: Token::NULL,
            declaring_type,
            name: name.to_string(),
            return_type,
            parameter_types: Vec::new(),
            generic_arguments: Vec::new(),
            has_this: true,
        }
    }

    /// Set the provider token
    #[must_use]
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }

    /// Set the parameter types
    #[must_use]
    pub fn with_parameters(mut self, parameter_types: Vec<TypeSignature>) -> Self {
        self.parameter_types = parameter_types;
        self
    }

    /// Mark the method as static
    #[must_use]
    pub fn as_static(mut self) -> Self {
        self.has_this = false;
        self
    }

    /// Returns true for instance constructors and type initializers
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME || self.name == TYPE_INITIALIZER_NAME
    }
}

/// A field, as seen from a use site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldReference {
    /// Provider token, [`Token::NULL`] if unknown
    pub token: Token,
    /// The type declaring the field
    pub declaring_type: TypeReference,
    /// Field name
    pub name: String,
    /// Field type
    pub field_type: TypeSignature,
}

impl FieldReference {
    /// Create a field reference
    #[must_use]
    pub fn new(declaring_type: TypeReference, name: &str, field_type: TypeSignature) -> Self {
        FieldReference {
            token: Token::NULL,
            declaring_type,
            name: name.to_string(),
            field_type,
        }
    }
}

/// A property, as seen from a use site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyReference {
    /// Provider token, [`Token::NULL`] if unknown
    pub token: Token,
    /// The type declaring the property
    pub declaring_type: TypeReference,
    /// Property name
    pub name: String,
    /// Property type
    pub property_type: TypeSignature,
    /// Index parameter types
    pub parameter_types: Vec<TypeSignature>,
}

impl PropertyReference {
    /// Create a reference to a non-indexed property
    #[must_use]
    pub fn new(declaring_type: TypeReference, name: &str, property_type: TypeSignature) -> Self {
        PropertyReference {
            token: Token::NULL,
            declaring_type,
            name: name.to_string(),
            property_type,
            parameter_types: Vec::new(),
        }
    }
}

/// An event, as seen from a use site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventReference {
    /// Provider token, [`Token::NULL`] if unknown
    pub token: Token,
    /// The type declaring the event
    pub declaring_type: TypeReference,
    /// Event name
    pub name: String,
    /// Delegate type of the event
    pub event_type: TypeSignature,
}

impl EventReference {
    /// Create an event reference
    #[must_use]
    pub fn new(declaring_type: TypeReference, name: &str, event_type: TypeSignature) -> Self {
        EventReference {
            token: Token::NULL,
            declaring_type,
            name: name.to_string(),
            event_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::PrimitiveKind;

    fn accessor(name: &str, visibility: Visibility) -> MethodDeclarationRc {
        Arc::new(MethodDeclaration::new(
            Token::new(0x0600_0001),
            name,
            visibility,
            MethodModifiers::SPECIAL_NAME,
            TypeSignature::primitive(PrimitiveKind::Int32),
        ))
    }

    #[test]
    fn test_property_visibility_is_most_visible_accessor() {
        let mut property = PropertyDeclaration::new(
            Token::new(0x1700_0001),
            "Count",
            TypeSignature::primitive(PrimitiveKind::Int32),
        );
        assert_eq!(property.visibility(), None);

        property.getter = Some(accessor("get_Count", Visibility::Public));
        property.setter = Some(accessor("set_Count", Visibility::Private));
        assert_eq!(property.visibility(), Some(Visibility::Public));
    }

    #[test]
    fn test_parameter_direction() {
        let int32 = TypeSignature::primitive(PrimitiveKind::Int32);

        let mut out = Parameter::new("result", 0, int32.clone().by_ref());
        out.flags = ParameterFlags::OUT;
        assert!(out.is_out());
        assert!(!out.is_ref());

        let by_ref = Parameter::new("value", 1, int32.clone().by_ref());
        assert!(by_ref.is_ref());

        let plain = Parameter::new("count", 2, int32);
        assert!(!plain.is_ref() && !plain.is_out() && !plain.is_params());
    }

    #[test]
    fn test_reference_without_declaring_type() {
        let method = MethodDeclaration::new(
            Token::new(0x0600_0002),
            "Main",
            Visibility::Public,
            MethodModifiers::STATIC,
            TypeSignature::Void,
        );
        let reference = method.reference();
        assert_eq!(reference.declaring_type.name, "<Module>");
        assert!(!reference.has_this);
        assert_eq!(reference.token, Token::new(0x0600_0002));
    }
}
