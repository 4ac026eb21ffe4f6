//! Benchmarks for rendering.
//!
//! Measures one type with a few dozen members written in each language, and the
//! Reflection.Emit plan of a long straight-line method.

extern crate cilrender;

use cilrender::{emit, prelude::*};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

fn int32() -> TypeSignature {
    TypeSignature::primitive(PrimitiveKind::Int32)
}

/// `Sample.Widget` with 16 fields and 16 methods, each method summing two fields
fn widget(module: &ModuleRc) -> TypeDeclarationRc {
    let widget = TypeReference::new("Sample", "Widget");
    let field = |index: usize| Expression::FieldReference {
        target: Some(Box::new(Expression::ThisReference)),
        field: FieldReference::new(widget.clone(), &format!("value{index}"), int32()),
    };

    let mut builder = TypeBuilder::class("Sample", "Widget");
    for index in 0..16 {
        builder = builder.field(&format!("value{index}"), int32(), |field| field);
    }
    for index in 0..16 {
        let sum = Expression::binary(field(index), BinaryOperator::Add, field((index + 1) % 16));
        builder = builder.method(&format!("Sum{index}"), move |method| {
            method
                .returns(int32())
                .statements(vec![Statement::Return(Some(sum))])
        });
    }
    builder.build_in(module)
}

/// A static method pushing and popping `count` constants
fn straight_line(count: u32) -> MethodDeclaration {
    let mut instructions = Vec::new();
    let mut offset = 0;
    for index in 0..count {
        instructions.push(Instruction::new(
            offset,
            opcodes::LDC_I4,
            Operand::Immediate(Immediate::Int32(index as i32)),
        ));
        instructions.push(Instruction::simple(offset + 5, opcodes::POP));
        offset += 6;
    }
    instructions.push(Instruction::simple(offset, opcodes::RET));

    let mut method = MethodDeclaration::new(
        Token::from_parts(Token::METHOD_DEF, 1),
        "Run",
        Visibility::Public,
        MethodModifiers::STATIC,
        TypeSignature::Void,
    );
    method.body = Some(MethodBody {
        instructions,
        code_size: offset + 1,
        max_stack: 1,
        ..MethodBody::default()
    });
    method
}

fn bench_render_type(c: &mut Criterion) {
    let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
    let module = builder.module("Sample.dll");
    let declaration = widget(&module);
    let model = CodeModel::new();
    model.add_assembly(builder.build());

    let mut group = c.benchmark_group("render_type");
    for language in [Language::CSharp, Language::VisualBasic] {
        let renderer = Renderer::new(&model, language, RenderConfig::default()).unwrap();
        group.bench_function(language.to_string(), |b| {
            b.iter(|| {
                let text = renderer
                    .render_text(RenderUnit::Type(black_box(&declaration)))
                    .unwrap();
                black_box(text)
            });
        });
    }
    group.finish();
}

fn bench_construction_plan(c: &mut Criterion) {
    let method = straight_line(512);

    let mut group = c.benchmark_group("construction_plan");
    group.throughput(Throughput::Elements(1025));
    group.bench_function("plan", |b| {
        b.iter(|| {
            let plan = emit::plan(black_box(&method)).unwrap();
            black_box(plan)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_render_type, bench_construction_plan);
criterion_main!(benches);
