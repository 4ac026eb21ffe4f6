//! Reflection.Emit backend.
//!
//! Instead of decompiling a method, this backend re-synthesizes the code that would build the
//! same method at runtime through `System.Reflection.Emit`: a `DefineMethod` call, one
//! `DeclareLocal` per local slot, one `DefineLabel` per branch target, one reflective lookup
//! per referenced member and finally the `Emit` calls with their exception blocks.
//!
//! Planning and writing are separate. [`plan`] produces a [`ConstructionPlan`] of
//! [`BuilderCall`]s which is data only and can be inspected; the renderer writes a plan as C#
//! when [`crate::Language::ReflectionEmit`] is selected.
//!
//! # Examples
//!
//! ```rust,ignore
//! use cilrender::emit;
//!
//! let plan = emit::plan(&method)?;
//! for (name, handle) in plan.handles() {
//!     println!("{name}: {handle:?}");
//! }
//! # Ok::<(), cilrender::Error>(())
//! ```

mod calls;
mod planner;
mod writer;

pub use calls::{BuilderCall, EmitArgument, Handle, MethodDefinition};
pub use planner::{ConstructionPlan, Phase, Planner};

use crate::{
    model::{MethodBody, MethodDeclaration},
    Result,
};

/// Plan the construction of `method`.
///
/// A method without a body (abstract, extern, interface members) yields a plan holding only
/// the method definition.
///
/// # Errors
/// Returns [`crate::Error::MalformedBytecode`] or [`crate::Error::UnknownInstruction`] when
/// the instruction stream or exception table cannot be re-synthesized.
pub fn plan(method: &MethodDeclaration) -> Result<ConstructionPlan> {
    match &method.body {
        Some(body) => Planner::new(method, body, true).plan(),
        None => Planner::new(method, &MethodBody::default(), false).plan(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assembly::{opcodes, Immediate, Instruction, Operand},
        config::RenderConfig,
        model::{
            CodeModel, ExceptionHandler, ExceptionHandlerFlags, MethodModifiers, MethodReference,
            PrimitiveKind, Token, TypeReference, TypeSignature, Variable, Visibility,
        },
        render::{context::RenderContext, syntax::CSharp, TextFormatter},
        Error,
    };

    fn method_with(body: MethodBody) -> MethodDeclaration {
        let mut method = MethodDeclaration::new(
            Token::from_parts(Token::METHOD_DEF, 1),
            "Run",
            Visibility::Public,
            MethodModifiers::STATIC | MethodModifiers::HIDE_BY_SIG,
            TypeSignature::Void,
        );
        method.body = Some(body);
        method
    }

    fn body(instructions: Vec<Instruction>, code_size: u32) -> MethodBody {
        MethodBody {
            instructions,
            code_size,
            max_stack: 8,
            ..MethodBody::default()
        }
    }

    fn write_line() -> Operand {
        Operand::Method(
            MethodReference::new(
                TypeReference::new("System", "Console"),
                "WriteLine",
                TypeSignature::Void,
            )
            .with_parameters(vec![TypeSignature::Named(TypeReference::new(
                "System", "String",
            ))])
            .as_static()
            .with_token(Token::from_parts(Token::MEMBER_REF, 4)),
        )
    }

    fn calls_after_declarations(plan: &ConstructionPlan) -> Vec<BuilderCall> {
        plan.calls
            .iter()
            .filter(|call| {
                !matches!(
                    call,
                    BuilderCall::Comment(_)
                        | BuilderCall::DefineMethod(_)
                        | BuilderCall::DeclareLocal { .. }
                        | BuilderCall::DefineLabel { .. }
                        | BuilderCall::DeclareHandle { .. }
                )
            })
            .cloned()
            .collect()
    }

    fn emit(offset: u32, opcode: &str, argument: EmitArgument) -> BuilderCall {
        BuilderCall::Emit {
            offset,
            opcode: opcode.to_string(),
            argument,
        }
    }

    #[test]
    fn test_handles_declared_once() {
        let method = method_with(body(
            vec![
                Instruction::new(0, opcodes::LDSTR, Operand::String("a".into())),
                Instruction::new(5, opcodes::CALL, write_line()),
                Instruction::new(10, opcodes::LDSTR, Operand::String("b".into())),
                Instruction::new(15, opcodes::CALL, write_line()),
                Instruction::simple(20, opcodes::RET),
            ],
            21,
        ));

        let plan = plan(&method).unwrap();
        let handles: Vec<_> = plan.handles().collect();
        assert_eq!(handles.len(), 1);
        assert_eq!(handles[0].0, "method0");
        assert!(matches!(handles[0].1, Handle::Method(reference) if reference.name == "WriteLine"));

        let calls: Vec<_> = plan
            .emits()
            .filter(|(opcode, _)| *opcode == "Call")
            .map(|(_, argument)| argument.clone())
            .collect();
        assert_eq!(
            calls,
            vec![
                EmitArgument::Handle("method0".into()),
                EmitArgument::Handle("method0".into())
            ]
        );
    }

    #[test]
    fn test_labels_sorted_by_offset() {
        // 0: ldc.i4.0  1: stloc.0  2: br.s 6  4: ldloc.0  5: pop  6: ldloc.0
        // 7: ldc.i4.s 10  9: blt.s 4  11: ret
        let mut body = body(
            vec![
                Instruction::simple(0, opcodes::LDC_I4_0),
                Instruction::simple(1, opcodes::STLOC_0),
                Instruction::new(2, opcodes::BR_S, Operand::Target(6)),
                Instruction::simple(4, opcodes::LDLOC_0),
                Instruction::simple(5, opcodes::POP),
                Instruction::simple(6, opcodes::LDLOC_0),
                Instruction::new(7, opcodes::LDC_I4_S, Operand::Immediate(Immediate::Int8(10))),
                Instruction::new(9, opcodes::BLT_S, Operand::Target(4)),
                Instruction::simple(11, opcodes::RET),
            ],
            12,
        );
        body.locals = vec![Variable::new("i", TypeSignature::primitive(PrimitiveKind::Int32), 0)];
        let method = method_with(body);

        let plan = plan(&method).unwrap();
        let labels: Vec<_> = plan.labels().collect();
        assert_eq!(labels, vec![("label0", 4), ("label1", 6)]);

        let position = |wanted: &BuilderCall| plan.calls.iter().position(|call| call == wanted);
        let mark = position(&BuilderCall::MarkLabel("label0".into())).unwrap();
        let target = position(&emit(4, "Ldloc_0", EmitArgument::None)).unwrap();
        assert_eq!(mark + 1, target);
        assert!(plan.calls.contains(&emit(9, "Blt_S", EmitArgument::Label("label0".into()))));
    }

    #[test]
    fn test_exception_blocks() {
        let exception = TypeReference::new("System", "Exception");
        let mut body = body(
            vec![
                Instruction::simple(0, opcodes::NOP),
                Instruction::new(1, opcodes::LEAVE_S, Operand::Target(6)),
                Instruction::simple(3, opcodes::POP),
                Instruction::new(4, opcodes::LEAVE_S, Operand::Target(6)),
                Instruction::simple(6, opcodes::RET),
            ],
            7,
        );
        body.exception_handlers = vec![ExceptionHandler {
            flags: ExceptionHandlerFlags::EXCEPTION,
            try_offset: 0,
            try_length: 3,
            handler_offset: 3,
            handler_length: 3,
            catch_type: Some(exception.clone()),
            filter_offset: 0,
        }];
        let method = method_with(body);

        let plan = plan(&method).unwrap();
        let label = || EmitArgument::Label("label0".into());
        assert_eq!(
            calls_after_declarations(&plan),
            vec![
                BuilderCall::BeginExceptionBlock,
                emit(0, "Nop", EmitArgument::None),
                emit(1, "Leave_S", label()),
                BuilderCall::BeginCatchBlock(Some(exception)),
                emit(3, "Pop", EmitArgument::None),
                emit(4, "Leave_S", label()),
                BuilderCall::EndExceptionBlock,
                BuilderCall::MarkLabel("label0".into()),
                emit(6, "Ret", EmitArgument::None),
            ]
        );
    }

    fn handler(
        flags: ExceptionHandlerFlags,
        try_range: (u32, u32),
        handler_range: (u32, u32),
        catch_type: Option<TypeReference>,
    ) -> ExceptionHandler {
        ExceptionHandler {
            flags,
            try_offset: try_range.0,
            try_length: try_range.1 - try_range.0,
            handler_offset: handler_range.0,
            handler_length: handler_range.1 - handler_range.0,
            catch_type,
            filter_offset: 0,
        }
    }

    #[test]
    fn test_regions_sharing_a_try_start() {
        // try { try { nop } catch (Exception) { pop } } finally { }
        let exception = TypeReference::new("System", "Exception");
        let mut body = body(
            vec![
                Instruction::simple(0, opcodes::NOP),
                Instruction::new(1, opcodes::LEAVE_S, Operand::Target(6)),
                Instruction::simple(3, opcodes::POP),
                Instruction::new(4, opcodes::LEAVE_S, Operand::Target(6)),
                Instruction::new(6, opcodes::LEAVE_S, Operand::Target(9)),
                Instruction::simple(8, opcodes::ENDFINALLY),
                Instruction::simple(9, opcodes::RET),
            ],
            10,
        );
        body.exception_handlers = vec![
            handler(ExceptionHandlerFlags::EXCEPTION, (0, 3), (3, 6), Some(exception.clone())),
            handler(ExceptionHandlerFlags::FINALLY, (0, 8), (8, 9), None),
        ];

        let plan = plan(&method_with(body)).unwrap();
        let label = |name: &str| EmitArgument::Label(name.into());
        assert_eq!(
            calls_after_declarations(&plan),
            vec![
                BuilderCall::BeginExceptionBlock,
                BuilderCall::BeginExceptionBlock,
                emit(0, "Nop", EmitArgument::None),
                emit(1, "Leave_S", label("label0")),
                BuilderCall::BeginCatchBlock(Some(exception)),
                emit(3, "Pop", EmitArgument::None),
                emit(4, "Leave_S", label("label0")),
                BuilderCall::EndExceptionBlock,
                BuilderCall::MarkLabel("label0".into()),
                emit(6, "Leave_S", label("label1")),
                BuilderCall::BeginFinallyBlock,
                emit(8, "Endfinally", EmitArgument::None),
                BuilderCall::EndExceptionBlock,
                BuilderCall::MarkLabel("label1".into()),
                emit(9, "Ret", EmitArgument::None),
            ]
        );
    }

    #[test]
    fn test_nested_region() {
        // try { nop; try { nop } catch (Exception) { pop } } finally { }
        let exception = TypeReference::new("System", "Exception");
        let mut body = body(
            vec![
                Instruction::simple(0, opcodes::NOP),
                Instruction::simple(1, opcodes::NOP),
                Instruction::new(2, opcodes::LEAVE_S, Operand::Target(7)),
                Instruction::simple(4, opcodes::POP),
                Instruction::new(5, opcodes::LEAVE_S, Operand::Target(7)),
                Instruction::new(7, opcodes::LEAVE_S, Operand::Target(10)),
                Instruction::simple(9, opcodes::ENDFINALLY),
                Instruction::simple(10, opcodes::RET),
            ],
            11,
        );
        body.exception_handlers = vec![
            handler(ExceptionHandlerFlags::FINALLY, (0, 9), (9, 10), None),
            handler(ExceptionHandlerFlags::EXCEPTION, (1, 4), (4, 7), Some(exception.clone())),
        ];

        let plan = plan(&method_with(body)).unwrap();
        let label = |name: &str| EmitArgument::Label(name.into());
        assert_eq!(
            calls_after_declarations(&plan),
            vec![
                BuilderCall::BeginExceptionBlock,
                emit(0, "Nop", EmitArgument::None),
                BuilderCall::BeginExceptionBlock,
                emit(1, "Nop", EmitArgument::None),
                emit(2, "Leave_S", label("label0")),
                BuilderCall::BeginCatchBlock(Some(exception)),
                emit(4, "Pop", EmitArgument::None),
                emit(5, "Leave_S", label("label0")),
                BuilderCall::EndExceptionBlock,
                BuilderCall::MarkLabel("label0".into()),
                emit(7, "Leave_S", label("label1")),
                BuilderCall::BeginFinallyBlock,
                emit(9, "Endfinally", EmitArgument::None),
                BuilderCall::EndExceptionBlock,
                BuilderCall::MarkLabel("label1".into()),
                emit(10, "Ret", EmitArgument::None),
            ]
        );
    }

    #[test]
    fn test_crossing_regions_are_malformed() {
        let mut body = body(
            vec![
                Instruction::simple(0, opcodes::NOP),
                Instruction::simple(1, opcodes::NOP),
                Instruction::simple(2, opcodes::NOP),
                Instruction::simple(3, opcodes::ENDFINALLY),
                Instruction::simple(4, opcodes::ENDFINALLY),
                Instruction::simple(5, opcodes::RET),
            ],
            6,
        );
        body.exception_handlers = vec![
            handler(ExceptionHandlerFlags::FINALLY, (0, 2), (2, 4), None),
            handler(ExceptionHandlerFlags::FINALLY, (1, 3), (3, 5), None),
        ];

        assert!(matches!(
            plan(&method_with(body)),
            Err(Error::MalformedBytecode { .. })
        ));
    }

    #[test]
    fn test_target_inside_instruction() {
        let method = method_with(body(
            vec![
                Instruction::new(0, opcodes::LDC_I4_S, Operand::Immediate(Immediate::Int8(1))),
                Instruction::new(2, opcodes::BRTRUE_S, Operand::Target(1)),
                Instruction::simple(4, opcodes::RET),
            ],
            5,
        ));

        assert!(matches!(
            plan(&method),
            Err(Error::MalformedBytecode { offset: 2, .. })
        ));
    }

    #[test]
    fn test_handler_edge_inside_instruction() {
        let mut body = body(
            vec![
                Instruction::new(0, opcodes::LDSTR, Operand::String("x".into())),
                Instruction::simple(5, opcodes::POP),
                Instruction::simple(6, opcodes::RET),
            ],
            7,
        );
        body.exception_handlers = vec![ExceptionHandler {
            flags: ExceptionHandlerFlags::FINALLY,
            try_offset: 0,
            try_length: 2,
            handler_offset: 5,
            handler_length: 1,
            catch_type: None,
            filter_offset: 0,
        }];

        assert!(matches!(
            plan(&method_with(body)),
            Err(Error::MalformedBytecode { offset: 2, .. })
        ));
    }

    #[test]
    fn test_bodyless_method() {
        let method = MethodDeclaration::new(
            Token::from_parts(Token::METHOD_DEF, 2),
            "Area",
            Visibility::Public,
            MethodModifiers::ABSTRACT | MethodModifiers::VIRTUAL | MethodModifiers::NEW_SLOT,
            TypeSignature::primitive(PrimitiveKind::Int32),
        );

        let plan = plan(&method).unwrap();
        let definition = plan.calls.iter().find_map(|call| match call {
            BuilderCall::DefineMethod(definition) => Some(definition),
            _ => None,
        });
        let definition = definition.unwrap();
        assert!(!definition.generator);
        assert_eq!(
            definition.attributes,
            vec!["Public", "Virtual", "NewSlot", "Abstract"]
        );
        assert_eq!(plan.emits().count(), 0);
    }

    #[test]
    fn test_written_plan() {
        let method = method_with(body(
            vec![
                Instruction::new(0, opcodes::LDSTR, Operand::String("hi".into())),
                Instruction::new(5, opcodes::CALL, write_line()),
                Instruction::simple(10, opcodes::RET),
            ],
            11,
        ));
        let plan = plan(&method).unwrap();

        let model = CodeModel::new();
        let config = RenderConfig::default();
        let mut out = TextFormatter::new();
        RenderContext::new(&model, &config, &CSharp, &mut out)
            .construction_plan(&plan)
            .unwrap();
        let text = out.into_text();

        assert!(text.contains(
            "MethodBuilder method = typeBuilder.DefineMethod(\"Run\", MethodAttributes.Public | \
             MethodAttributes.Static | MethodAttributes.HideBySig, typeof(void), Type.EmptyTypes);"
        ));
        assert!(text.contains("ILGenerator il = method.GetILGenerator();"));
        assert!(text.contains("MethodInfo method0 = typeof(Console).GetMethod(\"WriteLine\""));
        assert!(text.contains("new Type[] { typeof(string) }"));
        assert!(text.contains("il.Emit(OpCodes.Ldstr, \"hi\");"));
        assert!(text.contains("il.Emit(OpCodes.Call, method0);"));
        assert!(text.ends_with("il.Emit(OpCodes.Ret);"));
    }
}
