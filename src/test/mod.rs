//! Model factories shared by the unit tests.

use crate::{
    config::{RenderConfig, VisibilityConfiguration},
    model::{
        identity::AssemblyVersion, AssemblyBuilder, BinaryOperator, Block, CodeModel, Expression,
        FieldReference, MethodReference, ModuleRc, PrimitiveKind, Statement, TypeBuilder,
        TypeDeclarationRc, TypeReference, TypeSignature, UnaryOperator, Variable, Visibility,
    },
    render::{Language, RenderUnit, Renderer},
};

/// An assembly `Sample` 1.0.0.0 with one module `Sample.dll`
pub fn sample_module() -> (AssemblyBuilder, ModuleRc) {
    let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
    let module = builder.module("Sample.dll");
    (builder, module)
}

/// A model holding the built assembly
pub fn model_of(builder: AssemblyBuilder) -> CodeModel {
    let model = CodeModel::new();
    model.add_assembly(builder.build());
    model
}

/// `unit` rendered as text, panicking on failure
pub fn render(
    model: &CodeModel,
    language: Language,
    config: RenderConfig,
    unit: RenderUnit<'_>,
) -> String {
    Renderer::new(model, language, config)
        .and_then(|renderer| renderer.render_text(unit))
        .unwrap_or_else(|error| panic!("{unit:?} failed to render: {error}"))
}

pub fn int32() -> TypeSignature {
    TypeSignature::primitive(PrimitiveKind::Int32)
}

/// `Sample.Counter`: a private field `count`, a public method `Reset` clearing it and a
/// public property `Count` whose getter reads it
pub fn counter_type(module: &ModuleRc) -> TypeDeclarationRc {
    let counter = TypeReference::new("Sample", "Counter");
    let count = || Expression::FieldReference {
        target: Some(Box::new(Expression::ThisReference)),
        field: FieldReference::new(counter.clone(), "count", int32()),
    };

    TypeBuilder::class("Sample", "Counter")
        .field("count", int32(), |field| field)
        .method("Reset", |method| {
            method.statements(vec![Statement::Expression(Expression::assign(
                count(),
                Expression::literal(0),
            ))])
        })
        .property("Count", int32(), |property| {
            property.getter(|getter| getter.statements(vec![Statement::Return(Some(count()))]))
        })
        .build_in(module)
}

/// `i = 0; while (i < 10) { Console.WriteLine(i); i++; }`, the decompiled shape of a counted
/// loop
pub fn counted_loop() -> Vec<Statement> {
    let i = Variable::new("i", int32(), 0);
    let write_line = MethodReference::new(
        TypeReference::new("System", "Console"),
        "WriteLine",
        TypeSignature::Void,
    )
    .with_parameters(vec![int32()])
    .as_static();

    vec![
        Statement::Expression(Expression::assign(
            Expression::VariableDeclaration(i.clone()),
            Expression::literal(0),
        )),
        Statement::While {
            condition: Expression::binary(
                Expression::variable(&i),
                BinaryOperator::LessThan,
                Expression::literal(10),
            ),
            body: Block::new(vec![
                Statement::Expression(Expression::call(
                    None,
                    write_line,
                    vec![Expression::variable(&i)],
                )),
                Statement::Expression(Expression::unary(
                    UnaryOperator::PostIncrement,
                    Expression::variable(&i),
                )),
            ]),
        },
    ]
}

/// Visibility gates with only the named gates open
pub fn gates(open: &[Visibility]) -> VisibilityConfiguration {
    let mut gates = VisibilityConfiguration::none();
    for visibility in open {
        match visibility {
            Visibility::Public => gates.public = true,
            Visibility::Private | Visibility::CompilerControlled => gates.private = true,
            Visibility::Family => gates.family = true,
            Visibility::Assembly => gates.assembly = true,
            Visibility::FamilyAndAssembly => gates.family_and_assembly = true,
            Visibility::FamilyOrAssembly => gates.family_or_assembly = true,
        }
    }
    gates
}
