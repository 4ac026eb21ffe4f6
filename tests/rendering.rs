//! End-to-end rendering of small models through the public API.
//!
//! Each test assembles a model with the builders, renders one unit and checks the lines a
//! reader of the generated source would rely on.

use cilrender::{prelude::*, query};

fn int32() -> TypeSignature {
    TypeSignature::primitive(PrimitiveKind::Int32)
}

fn sample() -> (AssemblyBuilder, ModuleRc) {
    let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
    let module = builder.module("Sample.dll");
    (builder, module)
}

fn model_of(builder: AssemblyBuilder) -> CodeModel {
    let model = CodeModel::new();
    model.add_assembly(builder.build());
    model
}

/// A type with a private field, a public method and a public property over that field
fn counter(module: &ModuleRc) -> TypeDeclarationRc {
    let field = FieldReference::new(TypeReference::new("Sample", "Counter"), "count", int32());
    let count = || Expression::FieldReference {
        target: Some(Box::new(Expression::ThisReference)),
        field: field.clone(),
    };

    TypeBuilder::class("Sample", "Counter")
        .field("count", int32(), |field| field)
        .method("Increment", |method| {
            method.statements(vec![Statement::Expression(Expression::unary(
                UnaryOperator::PostIncrement,
                count(),
            ))])
        })
        .property("Count", int32(), |property| {
            property.getter(|getter| getter.statements(vec![Statement::Return(Some(count()))]))
        })
        .build_in(module)
}

#[test]
fn test_public_gate_hides_private_field() -> Result<()> {
    let (builder, module) = sample();
    let declaration = counter(&module);
    let model = model_of(builder);

    let config = RenderConfig::new().with_visibility(VisibilityConfiguration::public_only());
    let renderer = Renderer::new(&model, Language::CSharp, config)?;
    let text = renderer.render_text(RenderUnit::Type(&declaration))?;

    assert!(text.contains("public void Increment()"), "{text}");
    assert!(text.contains("public int Count"), "{text}");
    assert!(!text.contains("int count;"), "{text}");
    assert!(!text.contains("get_Count"), "{text}");

    let methods = query::methods(&declaration, &VisibilityConfiguration::all());
    let names: Vec<&str> = methods.iter().map(|method| method.name.as_str()).collect();
    assert_eq!(names, vec!["Increment"]);
    Ok(())
}

#[test]
fn test_number_format_of_constants() -> Result<()> {
    let (builder, module) = sample();
    let declaration = TypeBuilder::class("Sample", "Limits")
        .field("Small", int32(), |field| {
            field.visibility(Visibility::Public).constant(Literal::Int32(5))
        })
        .field("Mask", int32(), |field| {
            field.visibility(Visibility::Public).constant(Literal::Int32(240))
        })
        .field("Hundred", int32(), |field| {
            field.visibility(Visibility::Public).constant(Literal::Int32(100))
        })
        .field("Large", int32(), |field| {
            field.visibility(Visibility::Public).constant(Literal::Int32(5000))
        })
        .build_in(&module);
    let model = model_of(builder);

    let csharp = Renderer::new(&model, Language::CSharp, RenderConfig::default())?
        .render_text(RenderUnit::Type(&declaration))?;
    assert!(csharp.contains("public const int Small = 5;"), "{csharp}");
    assert!(csharp.contains("public const int Mask = 0xF0;"), "{csharp}");
    assert!(csharp.contains("public const int Hundred = 100;"), "{csharp}");
    assert!(csharp.contains("public const int Large = 0x1388;"), "{csharp}");

    let decimal = RenderConfig::default().with_number_format(NumberFormat::Decimal);
    let csharp = Renderer::new(&model, Language::CSharp, decimal)?
        .render_text(RenderUnit::Type(&declaration))?;
    assert!(csharp.contains("Large = 5000;"), "{csharp}");

    let visual_basic = Renderer::new(&model, Language::VisualBasic, RenderConfig::default())?
        .render_text(RenderUnit::Type(&declaration))?;
    assert!(visual_basic.contains("Mask As Integer = &HF0"), "{visual_basic}");
    Ok(())
}

#[test]
fn test_redundant_interfaces_are_not_listed() -> Result<()> {
    let (builder, module) = sample();
    let readable = TypeBuilder::interface("Sample", "IReadable").build_in(&module);
    let stream = TypeBuilder::interface("Sample", "IStream")
        .implements(readable.reference())
        .build_in(&module);
    let file = TypeBuilder::class("Sample", "FileStream")
        .implements(stream.reference())
        .implements(readable.reference())
        .build_in(&module);
    let model = model_of(builder);

    let config = RenderConfig::default().with_type_declaration_body(false);
    let text = Renderer::new(&model, Language::CSharp, config)?
        .render_text(RenderUnit::Type(&file))?;
    assert_eq!(text, "public class FileStream : IStream");
    Ok(())
}

#[test]
fn test_rendering_is_deterministic() -> Result<()> {
    let (builder, module) = sample();
    let first = counter(&module);
    let second = TypeBuilder::value_type("Sample", "Point")
        .field("X", int32(), |field| field.visibility(Visibility::Public))
        .field("Y", int32(), |field| field.visibility(Visibility::Public))
        .build_in(&module);
    let model = model_of(builder);

    let renderer = Renderer::new(&model, Language::VisualBasic, RenderConfig::default())?;
    let units = [RenderUnit::Type(&first), RenderUnit::Type(&second)];

    let serial: Vec<String> = units
        .iter()
        .map(|unit| renderer.render_text(*unit))
        .collect::<Result<_>>()?;
    let parallel: Vec<String> = renderer
        .render_all(&units)
        .into_iter()
        .collect::<Result<_>>()?;

    assert_eq!(serial, parallel);
    assert!(serial[1].starts_with("Public Structure Point"), "{}", serial[1]);
    Ok(())
}

#[test]
fn test_unsupported_construct_names_the_unit() -> Result<()> {
    let (builder, module) = sample();
    let pointer = Variable::new("p", TypeSignature::Pointer(Box::new(int32())), 0);
    let declaration = TypeBuilder::class("Sample", "Native")
        .method("Touch", |method| {
            method.statements(vec![Statement::Expression(Expression::assign(
                Expression::AddressDereference(Box::new(Expression::variable(&pointer))),
                Expression::literal(1),
            ))])
        })
        .build_in(&module);
    let model = model_of(builder);

    let csharp = Renderer::new(&model, Language::CSharp, RenderConfig::default())?
        .render_text(RenderUnit::Type(&declaration))?;
    assert!(csharp.contains("*p = 1;"), "{csharp}");

    let result = Renderer::new(&model, Language::VisualBasic, RenderConfig::default())?
        .render_text(RenderUnit::Type(&declaration));
    match result {
        Err(Error::Render { unit, source }) => {
            assert_eq!(unit, "Sample.Native");
            assert!(matches!(*source, Error::UnsupportedConstruct { .. }));
        }
        other => panic!("expected a render error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_fragments_mark_declarations() -> Result<()> {
    let (builder, module) = sample();
    let declaration = counter(&module);
    let model = model_of(builder);

    let renderer = Renderer::new(&model, Language::CSharp, RenderConfig::default())?;
    let mut out = FragmentFormatter::new();
    renderer.render(RenderUnit::Type(&declaration), &mut out)?;

    let declared: Vec<&str> = out
        .fragments()
        .iter()
        .filter_map(|fragment| match fragment {
            Fragment::Declaration { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(declared, vec!["Counter", "count", "Increment", "Count"]);
    Ok(())
}
