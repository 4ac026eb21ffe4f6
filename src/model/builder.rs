//! Fluent builders assembling a code model.
//!
//! Model providers and tests use these to put together assemblies, modules and type
//! declarations without wiring weak back-references and tokens by hand. Tokens are handed out
//! by the module a type is built into.
//!
//! # Examples
//!
//! ```rust,ignore
//! use cilrender::model::{AssemblyBuilder, TypeBuilder, TypeSignature, Visibility};
//! use cilrender::model::identity::AssemblyVersion;
//!
//! let mut assembly = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
//! let module = assembly.module("Sample.dll");
//!
//! TypeBuilder::class("Sample", "Counter")
//!     .field("count", TypeSignature::named("System", "Int32"), |f| f)
//!     .method("Increment", |m| m.returns(TypeSignature::Void))
//!     .build_in(&module);
//!
//! let assembly = assembly.build();
//! ```

use std::sync::Arc;

use sha1::{Digest, Sha1};

use crate::model::{
    attributes::CustomAttribute,
    body::MethodBody,
    container::{Assembly, AssemblyRc, Module, ModuleRc},
    flags::{FieldModifiers, MethodModifiers, TypeAttributes, Visibility},
    identity::{AssemblyIdentity, AssemblyVersion},
    literal::Literal,
    members::{
        EventDeclaration, FieldDeclaration, MethodDeclaration, MethodDeclarationRc, Parameter,
        PropertyDeclaration,
    },
    statement::{Block, Statement},
    token::Token,
    typedef::{GenericParameter, TypeDeclaration, TypeDeclarationRc},
    types::{TypeReference, TypeSignature},
};

/// Builder for an assembly and its modules.
pub struct AssemblyBuilder {
    identity: AssemblyIdentity,
    custom_attributes: Vec<CustomAttribute>,
    modules: Vec<ModuleRc>,
}

impl AssemblyBuilder {
    /// Start an unsigned, culture-neutral assembly
    #[must_use]
    pub fn new(name: &str, version: AssemblyVersion) -> Self {
        Self::from_identity(AssemblyIdentity::new(name, version))
    }

    /// Start an assembly with a full identity
    #[must_use]
    pub fn from_identity(identity: AssemblyIdentity) -> Self {
        AssemblyBuilder {
            identity,
            custom_attributes: Vec::new(),
            modules: Vec::new(),
        }
    }

    /// Add an assembly-level custom attribute
    #[must_use]
    pub fn attribute(mut self, attribute: CustomAttribute) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    /// Create a module and return it so types can be built into it.
    ///
    /// The MVID is derived from the assembly and module names, so repeated builds produce the
    /// same identifiers.
    pub fn module(&mut self, name: &str) -> ModuleRc {
        self.module_with_attributes(name, Vec::new())
    }

    /// Create a module carrying module-level custom attributes
    pub fn module_with_attributes(
        &mut self,
        name: &str,
        custom_attributes: Vec<CustomAttribute>,
    ) -> ModuleRc {
        let mut module = Module::new(name, derive_mvid(&self.identity.name, name));
        module.custom_attributes = custom_attributes;

        let module = Arc::new(module);
        self.modules.push(module.clone());
        module
    }

    /// Finish the assembly, linking all modules back to it
    #[must_use]
    pub fn build(self) -> AssemblyRc {
        let mut assembly = Assembly::new(self.identity);
        assembly.custom_attributes = self.custom_attributes;

        let assembly = Arc::new(assembly);
        for module in self.modules {
            assembly.add_module(module);
        }
        assembly
    }
}

fn derive_mvid(assembly: &str, module: &str) -> uguid::Guid {
    let mut hasher = Sha1::new();
    hasher.update(assembly.as_bytes());
    hasher.update([0u8]);
    hasher.update(module.as_bytes());
    let hash = hasher.finalize();

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);
    uguid::Guid::from_bytes(bytes)
}

/// Builder for a method declaration.
pub struct MethodBuilder {
    name: String,
    visibility: Visibility,
    modifiers: MethodModifiers,
    return_type: TypeSignature,
    parameters: Vec<Parameter>,
    generic_parameters: Vec<GenericParameter>,
    custom_attributes: Vec<CustomAttribute>,
    body: Option<MethodBody>,
}

impl MethodBuilder {
    /// Start a public instance method returning `void`
    #[must_use]
    pub fn new(name: &str) -> Self {
        MethodBuilder {
            name: name.to_string(),
            visibility: Visibility::Public,
            modifiers: MethodModifiers::HIDE_BY_SIG,
            return_type: TypeSignature::Void,
            parameters: Vec::new(),
            generic_parameters: Vec::new(),
            custom_attributes: Vec::new(),
            body: None,
        }
    }

    /// Set the accessibility
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Add modifier flags
    #[must_use]
    pub fn modifiers(mut self, modifiers: MethodModifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    /// Set the return type
    #[must_use]
    pub fn returns(mut self, return_type: TypeSignature) -> Self {
        self.return_type = return_type;
        self
    }

    /// Append a plain parameter
    #[must_use]
    pub fn parameter(mut self, name: &str, parameter_type: TypeSignature) -> Self {
        let position = self.parameters.len() as u32;
        self.parameters
            .push(Parameter::new(name, position, parameter_type));
        self
    }

    /// Append a fully specified parameter; its position is reassigned
    #[must_use]
    pub fn parameter_with(mut self, mut parameter: Parameter) -> Self {
        parameter.position = self.parameters.len() as u32;
        self.parameters.push(parameter);
        self
    }

    /// Append a generic parameter
    #[must_use]
    pub fn generic_parameter(mut self, name: &str) -> Self {
        let position = self.generic_parameters.len() as u32;
        self.generic_parameters
            .push(GenericParameter::new(name, position));
        self
    }

    /// Add a custom attribute
    #[must_use]
    pub fn attribute(mut self, attribute: CustomAttribute) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    /// Set the body
    #[must_use]
    pub fn body(mut self, body: MethodBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Set a body consisting of decompiled statements only
    #[must_use]
    pub fn statements(self, statements: Vec<Statement>) -> Self {
        self.body(MethodBody::from_statements(Block::new(statements)))
    }

    fn build(self, token: Token) -> MethodDeclaration {
        let mut method = MethodDeclaration::new(
            token,
            &self.name,
            self.visibility,
            self.modifiers,
            self.return_type,
        );
        method.parameters = self.parameters;
        method.generic_parameters = self.generic_parameters;
        method.custom_attributes = self.custom_attributes;
        method.body = self.body;
        method
    }
}

/// Builder for a field declaration.
pub struct FieldBuilder {
    name: String,
    visibility: Visibility,
    modifiers: FieldModifiers,
    field_type: TypeSignature,
    constant: Option<Literal>,
    custom_attributes: Vec<CustomAttribute>,
}

impl FieldBuilder {
    /// Start a private instance field
    #[must_use]
    pub fn new(name: &str, field_type: TypeSignature) -> Self {
        FieldBuilder {
            name: name.to_string(),
            visibility: Visibility::Private,
            modifiers: FieldModifiers::empty(),
            field_type,
            constant: None,
            custom_attributes: Vec::new(),
        }
    }

    /// Set the accessibility
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Add modifier flags
    #[must_use]
    pub fn modifiers(mut self, modifiers: FieldModifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    /// Make the field a compile-time constant
    #[must_use]
    pub fn constant(mut self, value: Literal) -> Self {
        self.modifiers |=
            FieldModifiers::STATIC | FieldModifiers::LITERAL | FieldModifiers::HAS_DEFAULT;
        self.constant = Some(value);
        self
    }

    /// Add a custom attribute
    #[must_use]
    pub fn attribute(mut self, attribute: CustomAttribute) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    fn build(self, token: Token) -> FieldDeclaration {
        let mut field = FieldDeclaration::new(
            token,
            &self.name,
            self.visibility,
            self.modifiers,
            self.field_type,
        );
        field.constant = self.constant;
        field.custom_attributes = self.custom_attributes;
        field
    }
}

/// Builder for a property and its accessors.
pub struct PropertyBuilder {
    name: String,
    property_type: TypeSignature,
    parameters: Vec<Parameter>,
    getter: Option<MethodBuilder>,
    setter: Option<MethodBuilder>,
    custom_attributes: Vec<CustomAttribute>,
}

impl PropertyBuilder {
    /// Start a property without accessors
    #[must_use]
    pub fn new(name: &str, property_type: TypeSignature) -> Self {
        PropertyBuilder {
            name: name.to_string(),
            property_type,
            parameters: Vec::new(),
            getter: None,
            setter: None,
            custom_attributes: Vec::new(),
        }
    }

    /// Append an index parameter
    #[must_use]
    pub fn index(mut self, name: &str, parameter_type: TypeSignature) -> Self {
        let position = self.parameters.len() as u32;
        self.parameters
            .push(Parameter::new(name, position, parameter_type));
        self
    }

    /// Add a `get_Name` accessor, configured by `configure`
    #[must_use]
    pub fn getter(mut self, configure: impl FnOnce(MethodBuilder) -> MethodBuilder) -> Self {
        let mut accessor = MethodBuilder::new(&format!("get_{}", self.name))
            .modifiers(MethodModifiers::SPECIAL_NAME)
            .returns(self.property_type.clone());
        for parameter in &self.parameters {
            accessor = accessor.parameter_with(parameter.clone());
        }
        self.getter = Some(configure(accessor));
        self
    }

    /// Add a `set_Name` accessor, configured by `configure`
    #[must_use]
    pub fn setter(mut self, configure: impl FnOnce(MethodBuilder) -> MethodBuilder) -> Self {
        let mut accessor = MethodBuilder::new(&format!("set_{}", self.name))
            .modifiers(MethodModifiers::SPECIAL_NAME);
        for parameter in &self.parameters {
            accessor = accessor.parameter_with(parameter.clone());
        }
        accessor = accessor.parameter("value", self.property_type.clone());
        self.setter = Some(configure(accessor));
        self
    }

    /// Add a custom attribute
    #[must_use]
    pub fn attribute(mut self, attribute: CustomAttribute) -> Self {
        self.custom_attributes.push(attribute);
        self
    }
}

/// Builder for an event and its accessors.
pub struct EventBuilder {
    name: String,
    event_type: TypeSignature,
    add_method: MethodBuilder,
    remove_method: MethodBuilder,
    custom_attributes: Vec<CustomAttribute>,
}

impl EventBuilder {
    /// Start an event with public `add_Name` / `remove_Name` accessors
    #[must_use]
    pub fn new(name: &str, event_type: TypeSignature) -> Self {
        let accessor = |prefix: &str| {
            MethodBuilder::new(&format!("{prefix}_{name}"))
                .modifiers(MethodModifiers::SPECIAL_NAME)
                .parameter("value", event_type.clone())
        };

        EventBuilder {
            name: name.to_string(),
            add_method: accessor("add"),
            remove_method: accessor("remove"),
            event_type,
            custom_attributes: Vec::new(),
        }
    }

    /// Configure both accessors
    #[must_use]
    pub fn accessors(mut self, configure: impl Fn(MethodBuilder) -> MethodBuilder) -> Self {
        self.add_method = configure(self.add_method);
        self.remove_method = configure(self.remove_method);
        self
    }

    /// Add a custom attribute
    #[must_use]
    pub fn attribute(mut self, attribute: CustomAttribute) -> Self {
        self.custom_attributes.push(attribute);
        self
    }
}

/// Builder for a type declaration and everything it contains.
pub struct TypeBuilder {
    namespace: String,
    name: String,
    visibility: Visibility,
    flags: TypeAttributes,
    base_type: Option<TypeReference>,
    interfaces: Vec<TypeReference>,
    generic_parameters: Vec<GenericParameter>,
    custom_attributes: Vec<CustomAttribute>,
    fields: Vec<FieldBuilder>,
    methods: Vec<MethodBuilder>,
    properties: Vec<PropertyBuilder>,
    events: Vec<EventBuilder>,
    nested: Vec<TypeBuilder>,
}

impl TypeBuilder {
    fn start(
        namespace: &str,
        name: &str,
        flags: TypeAttributes,
        base: Option<TypeReference>,
    ) -> Self {
        TypeBuilder {
            namespace: namespace.to_string(),
            name: name.to_string(),
            visibility: Visibility::Public,
            flags,
            base_type: base,
            interfaces: Vec::new(),
            generic_parameters: Vec::new(),
            custom_attributes: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Start a public class deriving from `System.Object`
    #[must_use]
    pub fn class(namespace: &str, name: &str) -> Self {
        Self::start(
            namespace,
            name,
            TypeAttributes::BEFORE_FIELD_INIT,
            Some(TypeReference::new("System", "Object")),
        )
    }

    /// Start a public struct
    #[must_use]
    pub fn value_type(namespace: &str, name: &str) -> Self {
        Self::start(
            namespace,
            name,
            TypeAttributes::SEALED | TypeAttributes::BEFORE_FIELD_INIT,
            Some(TypeReference::new("System", "ValueType")),
        )
    }

    /// Start a public interface
    #[must_use]
    pub fn interface(namespace: &str, name: &str) -> Self {
        Self::start(
            namespace,
            name,
            TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT,
            None,
        )
    }

    /// Start a public enum with the conventional `value__` backing field of type `underlying`
    #[must_use]
    pub fn enumeration(namespace: &str, name: &str, underlying: TypeSignature) -> Self {
        Self::start(
            namespace,
            name,
            TypeAttributes::SEALED,
            Some(TypeReference::new("System", "Enum")),
        )
        .field("value__", underlying, |field| {
            field
                .visibility(Visibility::Public)
                .modifiers(FieldModifiers::SPECIAL_NAME)
        })
    }

    /// Start a public delegate type with the given `Invoke` signature
    #[must_use]
    pub fn delegate(
        namespace: &str,
        name: &str,
        configure_invoke: impl FnOnce(MethodBuilder) -> MethodBuilder,
    ) -> Self {
        let virtual_method = MethodModifiers::VIRTUAL | MethodModifiers::NEW_SLOT;
        Self::start(
            namespace,
            name,
            TypeAttributes::SEALED,
            Some(TypeReference::new("System", "MulticastDelegate")),
        )
        .method(".ctor", |method| {
            method
                .modifiers(MethodModifiers::SPECIAL_NAME | MethodModifiers::RTSPECIAL_NAME)
                .parameter("object", TypeSignature::named("System", "Object"))
                .parameter("method", TypeSignature::named("System", "IntPtr"))
        })
        .method("Invoke", |method| configure_invoke(method.modifiers(virtual_method)))
    }

    /// Set the accessibility
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Add attribute flags
    #[must_use]
    pub fn flags(mut self, flags: TypeAttributes) -> Self {
        self.flags |= flags;
        self
    }

    /// Set the base type
    #[must_use]
    pub fn extends(mut self, base_type: TypeReference) -> Self {
        self.base_type = Some(base_type);
        self
    }

    /// Declare an implemented interface
    #[must_use]
    pub fn implements(mut self, interface: TypeReference) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Append a generic parameter; the type's metadata name gets the arity suffix
    #[must_use]
    pub fn generic_parameter(mut self, name: &str) -> Self {
        let position = self.generic_parameters.len() as u32;
        self.generic_parameters
            .push(GenericParameter::new(name, position));
        self
    }

    /// Add a custom attribute
    #[must_use]
    pub fn attribute(mut self, attribute: CustomAttribute) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    /// Add a field configured by `configure`
    #[must_use]
    pub fn field(
        mut self,
        name: &str,
        field_type: TypeSignature,
        configure: impl FnOnce(FieldBuilder) -> FieldBuilder,
    ) -> Self {
        self.fields
            .push(configure(FieldBuilder::new(name, field_type)));
        self
    }

    /// Add a method configured by `configure`
    #[must_use]
    pub fn method(
        mut self,
        name: &str,
        configure: impl FnOnce(MethodBuilder) -> MethodBuilder,
    ) -> Self {
        self.methods.push(configure(MethodBuilder::new(name)));
        self
    }

    /// Add a public instance constructor configured by `configure`
    #[must_use]
    pub fn constructor(self, configure: impl FnOnce(MethodBuilder) -> MethodBuilder) -> Self {
        self.method(".ctor", |method| {
            configure(
                method.modifiers(MethodModifiers::SPECIAL_NAME | MethodModifiers::RTSPECIAL_NAME),
            )
        })
    }

    /// Add a property configured by `configure`
    #[must_use]
    pub fn property(
        mut self,
        name: &str,
        property_type: TypeSignature,
        configure: impl FnOnce(PropertyBuilder) -> PropertyBuilder,
    ) -> Self {
        self.properties
            .push(configure(PropertyBuilder::new(name, property_type)));
        self
    }

    /// Add an event configured by `configure`
    #[must_use]
    pub fn event(
        mut self,
        name: &str,
        event_type: TypeSignature,
        configure: impl FnOnce(EventBuilder) -> EventBuilder,
    ) -> Self {
        self.events
            .push(configure(EventBuilder::new(name, event_type)));
        self
    }

    /// Add a nested type; its namespace is dropped when it is built
    #[must_use]
    pub fn nested(mut self, nested: TypeBuilder) -> Self {
        self.nested.push(nested);
        self
    }

    /// Build the type as a top-level type of `module`
    pub fn build_in(self, module: &ModuleRc) -> TypeDeclarationRc {
        let declaration = self.build_declaration(module);
        module.add_type(declaration.clone());
        declaration
    }

    fn build_declaration(self, module: &ModuleRc) -> TypeDeclarationRc {
        let name = if self.generic_parameters.is_empty() || self.name.contains('`') {
            self.name
        } else {
            format!("{}`{}", self.name, self.generic_parameters.len())
        };

        let mut declaration = TypeDeclaration::new(
            module.allocate_token(Token::TYPE_DEF),
            &self.namespace,
            &name,
            self.visibility,
            self.flags,
        );
        declaration.base_type = self.base_type;
        declaration.interfaces = self.interfaces;
        declaration.generic_parameters = self.generic_parameters;
        declaration.custom_attributes = self.custom_attributes;

        let declaration = Arc::new(declaration);

        for field in self.fields {
            let field = Arc::new(field.build(module.allocate_token(Token::FIELD)));
            field.set_declaring_type(&declaration);
            declaration.fields.push(field);
        }

        for method in self.methods {
            add_method(&declaration, module, method);
        }

        for property in self.properties {
            let mut built = PropertyDeclaration::new(
                module.allocate_token(Token::PROPERTY),
                &property.name,
                property.property_type,
            );
            built.parameters = property.parameters;
            built.custom_attributes = property.custom_attributes;
            built.getter = property
                .getter
                .map(|getter| add_method(&declaration, module, getter));
            built.setter = property
                .setter
                .map(|setter| add_method(&declaration, module, setter));

            let built = Arc::new(built);
            built.set_declaring_type(&declaration);
            declaration.properties.push(built);
        }

        for event in self.events {
            let mut built = EventDeclaration::new(
                module.allocate_token(Token::EVENT),
                &event.name,
                event.event_type,
            );
            built.custom_attributes = event.custom_attributes;
            built.add_method = Some(add_method(&declaration, module, event.add_method));
            built.remove_method = Some(add_method(&declaration, module, event.remove_method));

            let built = Arc::new(built);
            built.set_declaring_type(&declaration);
            declaration.events.push(built);
        }

        for nested in self.nested {
            let nested = TypeBuilder {
                namespace: String::new(),
                ..nested
            };
            let nested = nested.build_declaration(module);
            nested.set_enclosing_type(&declaration);
            declaration.nested_types.push(nested);
        }

        declaration
    }
}

fn add_method(
    declaration: &TypeDeclarationRc,
    module: &Module,
    method: MethodBuilder,
) -> MethodDeclarationRc {
    let method = Arc::new(method.build(module.allocate_token(Token::METHOD_DEF)));
    method.set_declaring_type(declaration);
    declaration.methods.push(method.clone());
    method
}
