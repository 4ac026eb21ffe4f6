//! Reflection.Emit output for methods carrying instruction streams.

use cilrender::{emit, prelude::*};

fn console_write_line() -> Operand {
    Operand::Method(
        MethodReference::new(
            TypeReference::new("System", "Console"),
            "WriteLine",
            TypeSignature::Void,
        )
        .with_parameters(vec![TypeSignature::primitive(PrimitiveKind::String)])
        .as_static()
        .with_token(Token::from_parts(Token::MEMBER_REF, 7)),
    )
}

fn stream(instructions: Vec<Instruction>, code_size: u32) -> MethodBody {
    MethodBody {
        instructions,
        code_size,
        max_stack: 8,
        ..MethodBody::default()
    }
}

/// `Greet` prints twice; `Broken` branches into the middle of an instruction
fn program(module: &ModuleRc) -> TypeDeclarationRc {
    TypeBuilder::class("Sample", "Program")
        .method("Greet", |method| {
            method
                .modifiers(MethodModifiers::STATIC)
                .body(stream(
                    vec![
                        Instruction::new(0, opcodes::LDSTR, Operand::String("hello".into())),
                        Instruction::new(5, opcodes::CALL, console_write_line()),
                        Instruction::new(10, opcodes::LDSTR, Operand::String("world".into())),
                        Instruction::new(15, opcodes::CALL, console_write_line()),
                        Instruction::simple(20, opcodes::RET),
                    ],
                    21,
                ))
        })
        .method("Broken", |method| {
            method.body(stream(
                vec![
                    Instruction::new(0, opcodes::LDC_I4_S, Operand::Immediate(Immediate::Int8(1))),
                    Instruction::new(2, opcodes::BRTRUE_S, Operand::Target(1)),
                    Instruction::simple(4, opcodes::RET),
                ],
                5,
            ))
        })
        .build_in(module)
}

fn model_with_program() -> (CodeModel, TypeDeclarationRc) {
    let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
    let module = builder.module("Sample.dll");
    let declaration = program(&module);
    let model = CodeModel::new();
    model.add_assembly(builder.build());
    (model, declaration)
}

#[test]
fn test_member_handles_are_shared() -> Result<()> {
    let (model, declaration) = model_with_program();
    let greet = declaration.method("Greet").expect("Greet is declared");

    let renderer = Renderer::new(&model, Language::ReflectionEmit, RenderConfig::default())?;
    let text = renderer.render_text(RenderUnit::Method(&greet))?;

    assert_eq!(text.matches("MethodInfo method0 = ").count(), 1, "{text}");
    assert_eq!(text.matches("il.Emit(OpCodes.Call, method0);").count(), 2, "{text}");
    assert!(text.contains("il.Emit(OpCodes.Ldstr, \"world\");"), "{text}");
    assert!(text.ends_with("il.Emit(OpCodes.Ret);"), "{text}");
    Ok(())
}

#[test]
fn test_malformed_method_does_not_stop_its_type() -> Result<()> {
    let (model, declaration) = model_with_program();

    let broken = declaration.method("Broken").expect("Broken is declared");
    assert!(matches!(
        emit::plan(&broken),
        Err(Error::MalformedBytecode { offset: 2, .. })
    ));

    let renderer = Renderer::new(&model, Language::ReflectionEmit, RenderConfig::default())?;
    let text = renderer.render_text(RenderUnit::Type(&declaration))?;

    assert!(text.starts_with("// Type Sample.Program"), "{text}");
    assert!(text.contains("Malformed bytecode at IL_0002"), "{text}");
    assert_eq!(text.matches("DefineMethod(").count(), 1, "{text}");
    assert!(text.contains("DefineMethod(\"Greet\""), "{text}");
    Ok(())
}

#[test]
fn test_source_languages_summarize_undecompiled_bodies() -> Result<()> {
    let (model, declaration) = model_with_program();
    let greet = declaration.method("Greet").expect("Greet is declared");

    let renderer = Renderer::new(&model, Language::CSharp, RenderConfig::default())?;
    let text = renderer.render_text(RenderUnit::Method(&greet))?;
    assert!(text.starts_with("public static void Greet()"), "{text}");
    assert!(text.contains("// 5 instructions, 21 bytes, not decompiled"), "{text}");
    Ok(())
}

#[test]
fn test_field_units_have_no_construction() -> Result<()> {
    let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
    let module = builder.module("Sample.dll");
    let declaration = TypeBuilder::class("Sample", "Holder")
        .field("value", TypeSignature::primitive(PrimitiveKind::Int32), |field| field)
        .build_in(&module);
    let model = CodeModel::new();
    model.add_assembly(builder.build());

    let field = declaration.field("value").expect("value is declared");
    let renderer = Renderer::new(&model, Language::ReflectionEmit, RenderConfig::default())?;
    let error = renderer
        .render_text(RenderUnit::Field(&field))
        .expect_err("fields cannot be emitted");
    match error {
        Error::Render { source, .. } => {
            assert!(matches!(*source, Error::UnsupportedConstruct { .. }));
        }
        other => panic!("unexpected error {other}"),
    }
    Ok(())
}
