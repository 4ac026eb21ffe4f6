use crate::model::{
    literal::Literal,
    members::MethodReference,
    types::{TypeReference, TypeSignature},
};

/// A custom attribute argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeArgument {
    /// A primitive or string constant
    Literal(Literal),
    /// A `typeof(...)` argument
    Type(TypeSignature),
    /// A value of an enum type
    Enum {
        /// The enum type
        enum_type: TypeReference,
        /// The underlying value
        value: Literal,
    },
    /// An array argument; `None` elements encode a null array
    Array {
        /// Element type
        element_type: TypeSignature,
        /// Elements, or `None` for a null array
        elements: Option<Vec<AttributeArgument>>,
    },
}

/// Whether a named argument sets a field or a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedArgumentKind {
    /// Sets a field
    Field,
    /// Sets a property
    Property,
}

/// A named argument of a custom attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArgument {
    /// Field or property
    pub kind: NamedArgumentKind,
    /// Name of the target member
    pub name: String,
    /// Assigned value
    pub value: AttributeArgument,
}

/// A custom attribute instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttribute {
    /// The attribute constructor
    pub constructor: MethodReference,
    /// Constructor arguments, in position order
    pub positional: Vec<AttributeArgument>,
    /// Named field and property arguments, in blob order
    pub named: Vec<NamedArgument>,
}

impl CustomAttribute {
    /// Create an attribute without arguments
    #[must_use]
    pub fn new(constructor: MethodReference) -> Self {
        CustomAttribute {
            constructor,
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    /// The attribute type
    #[must_use]
    pub fn attribute_type(&self) -> &TypeReference {
        &self.constructor.declaring_type
    }

    /// Named arguments partitioned by target kind: fields first, then properties.
    ///
    /// Blob order is kept inside each group.
    #[must_use]
    pub fn partitioned_named(&self) -> (Vec<&NamedArgument>, Vec<&NamedArgument>) {
        self.named
            .iter()
            .partition(|argument| argument.kind == NamedArgumentKind::Field)
    }
}
