//! Declaration rendering.
//!
//! Walks the container hierarchy (assembly, module, namespace, type, member) and decides what
//! is written: visibility filtering, member order, which parts the configuration suppresses,
//! and how a method body is chosen. The spelling of each declaration line is left to the
//! [`crate::render::Syntax`] in use.

use tracing::{debug, warn};

use crate::{
    assembly::validate_stream,
    model::{
        Assembly, Block, CodeModel, EventDeclaration, FieldDeclaration, MethodDeclaration,
        Module, Namespace, PrimitiveKind, PropertyDeclaration, Statement, TypeDeclaration,
        TypeKind, TypeReference, TypeSignature, Visibility,
    },
    query::{self, base_method, namespace_types, Visible},
    render::{
        context::RenderContext,
        syntax::{AttributeTarget, Closer},
    },
    Result,
};

/// Name of the backing field every enum carries
const ENUM_VALUE_FIELD: &str = "value__";

/// How a method takes part in virtual dispatch, as far as the source modifiers are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Inheritance {
    /// Not virtual, or virtual only to implement an interface
    Plain,
    /// Abstract in a new slot
    Abstract,
    /// Abstract override of an inherited method
    AbstractOverride,
    /// Virtual in a new slot
    Virtual,
    /// Override of an inherited method
    Override,
    /// Final override of an inherited method
    SealedOverride,
    /// Virtual in a new slot, hiding an inherited method of the same signature
    NewVirtual,
}

/// Classify `method` from its flags and, for new virtual slots, the base type chain
pub(crate) fn inheritance(method: &MethodDeclaration, model: &CodeModel) -> Inheritance {
    if method.is_abstract() {
        return if method.is_new_slot() {
            Inheritance::Abstract
        } else {
            Inheritance::AbstractOverride
        };
    }

    if !method.is_virtual() {
        return Inheritance::Plain;
    }

    match (method.is_new_slot(), method.is_final()) {
        (false, false) => Inheritance::Override,
        (false, true) => Inheritance::SealedOverride,
        // sealed new slots are interface implementations
        (true, true) => Inheritance::Plain,
        (true, false) => {
            if base_method(method, model).is_some() {
                Inheritance::NewVirtual
            } else {
                Inheritance::Virtual
            }
        }
    }
}

/// The decompiled statements of `method`, if it has any
pub(crate) fn statements_of(method: &MethodDeclaration) -> Option<&Block> {
    method.body.as_ref().and_then(|body| body.statements.as_ref())
}

/// Underlying type of an enum, `None` for the default `Int32`
pub(crate) fn enum_underlying_type(declaration: &TypeDeclaration) -> Option<TypeSignature> {
    let field = declaration
        .fields
        .iter()
        .map(|(_, field)| field)
        .find(|field| !field.is_static() && field.name == ENUM_VALUE_FIELD)?;

    let is_int32 = field
        .field_type
        .as_reference()
        .and_then(TypeReference::primitive_kind)
        == Some(PrimitiveKind::Int32);
    if is_int32 {
        None
    } else {
        Some(field.field_type.clone())
    }
}

/// Visibility written on an accessor: only when it is narrower than the member's
pub(crate) fn accessor_visibility(
    member: Option<Visibility>,
    accessor: &MethodDeclaration,
) -> Option<Visibility> {
    member
        .filter(|member| accessor.visibility < *member)
        .map(|_| accessor.visibility)
}

/// Base type as written in a declaration header; the implicit bases are left out
fn written_base(declaration: &TypeDeclaration) -> Option<TypeReference> {
    let base = declaration.base_type.as_ref()?;
    let implicit = ["Object", "ValueType", "Enum", "MulticastDelegate"]
        .iter()
        .any(|name| base.is("System", name));
    if implicit {
        None
    } else {
        Some(base.clone())
    }
}

impl RenderContext<'_> {
    /// Blank line between two members or types
    fn separate_member(&mut self, first: &mut bool) {
        if *first {
            *first = false;
        } else {
            self.out.write_line();
        }
    }

    /// Assembly header and assembly-level attributes
    pub(crate) fn assembly(&mut self, assembly: &Assembly) -> Result<()> {
        let display_name = assembly.identity.display_name();
        self.comment(&format!("Assembly {display_name}"));
        self.out.write_line();
        self.out.write_property("Name", &display_name);
        self.out.write_property("Modules", &assembly.modules.count().to_string());
        self.attributes(&assembly.custom_attributes, Some(AttributeTarget::Assembly))
    }

    /// Module header and module-level attributes
    pub(crate) fn module(&mut self, module: &Module) -> Result<()> {
        self.comment(&format!("Module {}", module.name));
        self.out.write_line();
        let mvid = module.mvid.to_string();
        self.comment(&format!("MVID: {mvid}"));
        self.out.write_line();
        self.out.write_property("MVID", &mvid);
        self.attributes(&module.custom_attributes, Some(AttributeTarget::Module))
    }

    /// A namespace with its visible types; the global namespace has no header
    pub(crate) fn namespace(&mut self, namespace: &Namespace) -> Result<()> {
        let types = namespace_types(namespace, &self.config.visibility);
        let syntax = self.syntax;

        if namespace.name.is_empty() {
            if !self.config.show_namespace_body {
                return Ok(());
            }
            let mut first = true;
            for declaration in &types {
                self.separate_member(&mut first);
                self.type_declaration(declaration)?;
                self.out.write_line();
            }
            return Ok(());
        }

        syntax.write_namespace_header(self, &namespace.name);
        if !self.config.show_namespace_body {
            return Ok(());
        }

        syntax.open_block(self.out);
        let mut first = true;
        for declaration in &types {
            self.separate_member(&mut first);
            self.type_declaration(declaration)?;
            self.out.write_line();
        }
        syntax.close_block(self.out, Closer::Namespace);
        Ok(())
    }

    /// A type declaration, including its members when type bodies are shown
    pub(crate) fn type_declaration(&mut self, declaration: &TypeDeclaration) -> Result<()> {
        let syntax = self.syntax;
        self.attributes(&declaration.custom_attributes, None)?;

        let kind = declaration.kind();
        if kind == TypeKind::Delegate {
            if let Some(invoke) = declaration.method("Invoke") {
                return syntax.write_delegate(self, declaration, &invoke);
            }
            warn!(name = %declaration.full_name(), "delegate without Invoke method");
        }

        let base = if kind == TypeKind::Class {
            written_base(declaration)
        } else {
            None
        };
        let interfaces = query::interfaces(declaration, self.model);
        syntax.write_type_header(self, declaration, base.as_ref(), &interfaces)?;

        if !self.config.show_type_declaration_body {
            return Ok(());
        }

        let wrote_bases = syntax.open_type_body(self, kind, base.as_ref(), &interfaces)?;
        if kind == TypeKind::Enum {
            self.enum_members(declaration)?;
        } else {
            self.type_members(declaration, kind == TypeKind::Interface, wrote_bases)?;
        }
        syntax.close_block(self.out, Closer::Type(kind));
        Ok(())
    }

    /// Literal fields of an enum, in declaration order
    fn enum_members(&mut self, declaration: &TypeDeclaration) -> Result<()> {
        let syntax = self.syntax;
        let gates = self.config.visibility;
        let members: Vec<_> = declaration
            .fields
            .iter()
            .map(|(_, field)| field.clone())
            .filter(|field| field.is_literal() && field.is_visible(&gates))
            .collect();

        for (index, field) in members.iter().enumerate() {
            self.attributes(&field.custom_attributes, None)?;
            syntax.write_enum_member(self, field, index + 1 == members.len())?;
            self.out.write_line();
        }
        Ok(())
    }

    /// Fields, methods, properties, events and nested types, each group sorted
    fn type_members(
        &mut self,
        declaration: &TypeDeclaration,
        in_interface: bool,
        wrote_bases: bool,
    ) -> Result<()> {
        let gates = self.config.visibility;
        let fields = query::fields(declaration, &gates);
        let methods = query::methods(declaration, &gates);
        let properties = query::properties(declaration, &gates);
        let events = query::events(declaration, &gates);
        let nested = query::nested_types(declaration, &gates);

        let mut first = !wrote_bases;

        // fields stay on consecutive lines
        if !fields.is_empty() {
            self.separate_member(&mut first);
            for field in &fields {
                self.field(field)?;
                self.out.write_line();
            }
        }
        for method in &methods {
            self.separate_member(&mut first);
            self.method(method, in_interface)?;
            self.out.write_line();
        }
        for property in &properties {
            self.separate_member(&mut first);
            self.property(property, in_interface)?;
            self.out.write_line();
        }
        for event in &events {
            self.separate_member(&mut first);
            self.event(event, in_interface)?;
            self.out.write_line();
        }
        for nested in &nested {
            self.separate_member(&mut first);
            self.type_declaration(nested)?;
            self.out.write_line();
        }
        Ok(())
    }

    pub(crate) fn field(&mut self, field: &FieldDeclaration) -> Result<()> {
        self.attributes(&field.custom_attributes, None)?;
        let syntax = self.syntax;
        syntax.write_field(self, field)
    }

    /// A method: header, then its statements, a placeholder for undecompiled code, or the
    /// terminator of a bodyless declaration
    pub(crate) fn method(&mut self, method: &MethodDeclaration, in_interface: bool) -> Result<()> {
        self.attributes(&method.custom_attributes, None)?;
        let syntax = self.syntax;
        syntax.write_method_header(self, method, in_interface)?;

        let closer = if method.is_constructor() || matches!(method.return_type, TypeSignature::Void)
        {
            Closer::Sub
        } else {
            Closer::Function
        };

        let body = match &method.body {
            Some(body) if !in_interface => body,
            _ => {
                self.terminate();
                return Ok(());
            }
        };

        if let Some(statements) = &body.statements {
            return self.method_body(statements, closer);
        }

        let note = match validate_stream(&body.instructions, body.code_size) {
            Ok(()) => format!(
                "{} instructions, {} bytes, not decompiled",
                body.instructions.len(),
                body.code_size
            ),
            Err(error) => {
                debug!(method = %method.name, %error, "undecompiled body is malformed");
                error.to_string()
            }
        };
        self.method_body(&Block::new(vec![Statement::Comment(note)]), closer)
    }

    pub(crate) fn property(
        &mut self,
        property: &PropertyDeclaration,
        in_interface: bool,
    ) -> Result<()> {
        self.attributes(&property.custom_attributes, None)?;
        let syntax = self.syntax;
        syntax.write_property(self, property, in_interface)
    }

    pub(crate) fn event(&mut self, event: &EventDeclaration, in_interface: bool) -> Result<()> {
        self.attributes(&event.custom_attributes, None)?;
        let syntax = self.syntax;
        syntax.write_event(self, event, in_interface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::RenderConfig,
        model::{
            AttributeArgument, CustomAttribute, Literal, MethodModifiers, MethodReference,
            NamedArgument, NamedArgumentKind, TypeBuilder,
        },
        render::{Language, RenderUnit},
        test::{counted_loop, counter_type, gates, model_of, render, sample_module},
    };

    #[test]
    fn test_inheritance_classification() {
        let (builder, module) = sample_module();
        let virtual_slot = MethodModifiers::VIRTUAL | MethodModifiers::NEW_SLOT;
        let base = TypeBuilder::class("Sample", "Shape")
            .method("Area", |method| method.modifiers(virtual_slot))
            .method("Draw", |method| {
                method.modifiers(virtual_slot | MethodModifiers::ABSTRACT)
            })
            .build_in(&module);
        let derived = TypeBuilder::class("Sample", "Circle")
            .extends(base.reference())
            .method("Area", |method| {
                method.modifiers(MethodModifiers::VIRTUAL | MethodModifiers::FINAL)
            })
            .method("Draw", |method| method.modifiers(MethodModifiers::VIRTUAL))
            .method("Dispose", |method| {
                method.modifiers(virtual_slot | MethodModifiers::FINAL)
            })
            .build_in(&module);
        let model = model_of(builder);

        let kind = |declaration: &TypeDeclaration, name: &str| {
            let method = declaration.method(name).expect("method");
            inheritance(&method, &model)
        };
        assert_eq!(kind(&base, "Area"), Inheritance::Virtual);
        assert_eq!(kind(&base, "Draw"), Inheritance::Abstract);
        assert_eq!(kind(&derived, "Area"), Inheritance::SealedOverride);
        assert_eq!(kind(&derived, "Draw"), Inheritance::Override);
        assert_eq!(kind(&derived, "Dispose"), Inheritance::Plain);
    }

    #[test]
    fn test_enum_underlying_type() {
        let (_builder, module) = sample_module();
        let small = TypeBuilder::enumeration(
            "Sample",
            "Small",
            TypeSignature::primitive(PrimitiveKind::Byte),
        )
        .build_in(&module);
        let plain = TypeBuilder::enumeration(
            "Sample",
            "Plain",
            TypeSignature::primitive(PrimitiveKind::Int32),
        )
        .build_in(&module);

        assert_eq!(
            enum_underlying_type(&small),
            Some(TypeSignature::primitive(PrimitiveKind::Byte))
        );
        assert_eq!(enum_underlying_type(&plain), None);
    }

    #[test]
    fn test_accessor_visibility_only_when_narrower() {
        let (_builder, module) = sample_module();
        let declaration = TypeBuilder::class("Sample", "Counter")
            .method("get_Count", |method| method.visibility(Visibility::Public))
            .method("set_Count", |method| method.visibility(Visibility::Private))
            .build_in(&module);

        let getter = declaration.method("get_Count").expect("getter");
        let setter = declaration.method("set_Count").expect("setter");
        assert_eq!(accessor_visibility(Some(Visibility::Public), &getter), None);
        assert_eq!(
            accessor_visibility(Some(Visibility::Public), &setter),
            Some(Visibility::Private)
        );
        assert_eq!(accessor_visibility(None, &setter), None);
    }

    #[test]
    fn test_public_surface_of_counter() {
        let (builder, module) = sample_module();
        let counter = counter_type(&module);
        let model = model_of(builder);
        let config = RenderConfig::default().with_visibility(gates(&[Visibility::Public]));

        let csharp = render(
            &model,
            Language::CSharp,
            config.clone(),
            RenderUnit::Type(&counter),
        );
        assert!(csharp.contains("public class Counter"), "{csharp}");
        assert!(csharp.contains("public void Reset()"), "{csharp}");
        assert!(csharp.contains("public int Count"), "{csharp}");
        assert!(!csharp.contains("int count;"), "{csharp}");
        assert!(!csharp.contains("get_Count"), "{csharp}");

        let visual_basic = render(
            &model,
            Language::VisualBasic,
            config,
            RenderUnit::Type(&counter),
        );
        assert!(visual_basic.contains("Public Class Counter"), "{visual_basic}");
        assert!(visual_basic.contains("Public Sub Reset()"), "{visual_basic}");
        assert!(visual_basic.contains("End Property"), "{visual_basic}");
        assert!(!visual_basic.contains("Private count"), "{visual_basic}");
        assert!(!visual_basic.contains("get_Count"), "{visual_basic}");
    }

    #[test]
    fn test_private_gate_shows_field() {
        let (builder, module) = sample_module();
        let counter = counter_type(&module);
        let model = model_of(builder);
        let config = RenderConfig::default();

        let csharp = render(&model, Language::CSharp, config, RenderUnit::Type(&counter));
        assert!(csharp.contains("private int count;"), "{csharp}");
    }

    #[test]
    fn test_counted_loop_written_once() {
        let (builder, module) = sample_module();
        let declaration = TypeBuilder::class("Sample", "Printer")
            .method("Print", |method| method.statements(counted_loop()))
            .build_in(&module);
        let model = model_of(builder);
        let print = declaration.method("Print").expect("method");

        let csharp = render(
            &model,
            Language::CSharp,
            RenderConfig::default(),
            RenderUnit::Method(&print),
        );
        assert_eq!(csharp.matches("for (").count(), 1, "{csharp}");
        assert_eq!(csharp.matches("i++").count(), 1, "{csharp}");
        assert!(csharp.contains("for (int i = 0; i < 10; i++)"), "{csharp}");
        assert!(!csharp.contains("while"), "{csharp}");

        let visual_basic = render(
            &model,
            Language::VisualBasic,
            RenderConfig::default(),
            RenderUnit::Method(&print),
        );
        assert!(visual_basic.contains("For i As Integer = 0 To 9"), "{visual_basic}");
        assert_eq!(visual_basic.matches("Next").count(), 1, "{visual_basic}");
        assert!(!visual_basic.contains("+= 1"), "{visual_basic}");
    }

    /// `TagAttribute("alpha")` setting the property `Weight` before the field `Enabled`
    fn tag_attribute() -> CustomAttribute {
        let constructor = MethodReference::new(
            TypeReference::new("Sample", "TagAttribute"),
            ".ctor",
            TypeSignature::Void,
        )
        .with_parameters(vec![TypeSignature::primitive(PrimitiveKind::String)]);

        let mut attribute = CustomAttribute::new(constructor);
        attribute.positional = vec![AttributeArgument::Literal(Literal::from("alpha"))];
        attribute.named = vec![
            NamedArgument {
                kind: NamedArgumentKind::Property,
                name: "Weight".to_string(),
                value: AttributeArgument::Literal(Literal::Int32(3)),
            },
            NamedArgument {
                kind: NamedArgumentKind::Field,
                name: "Enabled".to_string(),
                value: AttributeArgument::Literal(Literal::Boolean(true)),
            },
        ];
        attribute
    }

    #[test]
    fn test_attribute_arguments() {
        let (builder, module) = sample_module();
        let declaration = TypeBuilder::class("Sample", "Tagged")
            .attribute(tag_attribute())
            .build_in(&module);
        let model = model_of(builder);
        let unit = RenderUnit::Type(&declaration);

        let csharp = render(&model, Language::CSharp, RenderConfig::default(), unit);
        assert!(
            csharp.starts_with("[Tag(\"alpha\", Enabled = true, Weight = 3)]\npublic class Tagged"),
            "{csharp}"
        );

        let visual_basic = render(&model, Language::VisualBasic, RenderConfig::default(), unit);
        assert!(
            visual_basic.starts_with("<Tag(\"alpha\", Enabled:=True, Weight:=3)>"),
            "{visual_basic}"
        );

        let hidden = RenderConfig::default().with_custom_attributes(false);
        let csharp = render(&model, Language::CSharp, hidden, unit);
        assert!(csharp.starts_with("public class Tagged"), "{csharp}");
    }
}
