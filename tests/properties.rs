//! Property-based tests for visibility filtering and instruction stream layout.

use std::collections::HashSet;

use cilrender::{
    assembly::{instruction_size, validate_stream},
    prelude::*,
    query,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn visibility() -> impl Strategy<Value = Visibility> {
    prop_oneof![
        Just(Visibility::CompilerControlled),
        Just(Visibility::Private),
        Just(Visibility::FamilyAndAssembly),
        Just(Visibility::Assembly),
        Just(Visibility::Family),
        Just(Visibility::FamilyOrAssembly),
        Just(Visibility::Public),
    ]
}

fn gates() -> impl Strategy<Value = VisibilityConfiguration> {
    prop::array::uniform6(any::<bool>()).prop_map(|open| VisibilityConfiguration {
        public: open[0],
        private: open[1],
        family: open[2],
        assembly: open[3],
        family_and_assembly: open[4],
        family_or_assembly: open[5],
    })
}

/// A gate set and a superset of it
fn nested_gates() -> impl Strategy<Value = (VisibilityConfiguration, VisibilityConfiguration)> {
    (gates(), gates()).prop_map(|(narrow, extra)| {
        let wide = VisibilityConfiguration {
            public: narrow.public || extra.public,
            private: narrow.private || extra.private,
            family: narrow.family || extra.family,
            assembly: narrow.assembly || extra.assembly,
            family_and_assembly: narrow.family_and_assembly || extra.family_and_assembly,
            family_or_assembly: narrow.family_or_assembly || extra.family_or_assembly,
        };
        (narrow, wide)
    })
}

/// One instruction shape and the size it encodes to
fn shaped_instruction() -> impl Strategy<Value = (u16, Operand, u32)> {
    prop_oneof![
        Just((opcodes::NOP, Operand::None, 1)),
        Just((opcodes::POP, Operand::None, 1)),
        Just((opcodes::ADD, Operand::None, 1)),
        any::<i8>().prop_map(|value| {
            (opcodes::LDC_I4_S, Operand::Immediate(Immediate::Int8(value)), 2)
        }),
        any::<i32>().prop_map(|value| {
            (opcodes::LDC_I4, Operand::Immediate(Immediate::Int32(value)), 5)
        }),
        any::<i64>().prop_map(|value| {
            (opcodes::LDC_I8, Operand::Immediate(Immediate::Int64(value)), 9)
        }),
        "[a-z]{0,8}".prop_map(|text| (opcodes::LDSTR, Operand::String(text), 5)),
        any::<u16>().prop_map(|index| (opcodes::LDLOC, Operand::Local(index), 4)),
        any::<u16>().prop_map(|index| (opcodes::LDARG, Operand::Argument(index), 4)),
        prop::collection::vec(any::<u32>(), 0..6).prop_map(|targets| {
            let size = 5 + 4 * targets.len() as u32;
            (opcodes::SWITCH, Operand::Switch(targets), size)
        }),
    ]
}

fn laid_out(shapes: Vec<(u16, Operand, u32)>) -> (Vec<Instruction>, u32) {
    let mut offset = 0;
    let mut instructions = Vec::with_capacity(shapes.len());
    for (opcode, operand, size) in shapes {
        instructions.push(Instruction::new(offset, opcode, operand));
        offset += size;
    }
    (instructions, offset)
}

fn member_names(declaration: &TypeDeclaration, gates: &VisibilityConfiguration) -> HashSet<String> {
    let fields = query::fields(declaration, gates);
    let methods = query::methods(declaration, gates);
    fields
        .iter()
        .map(|field| field.name.clone())
        .chain(methods.iter().map(|method| method.name.clone()))
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn opening_more_gates_never_hides_members(
        field_visibilities in prop::collection::vec(visibility(), 0..8),
        method_visibilities in prop::collection::vec(visibility(), 0..8),
        (narrow, wide) in nested_gates(),
    ) {
        let mut builder = AssemblyBuilder::new("Sample", AssemblyVersion::new(1, 0, 0, 0));
        let module = builder.module("Sample.dll");
        let mut declaration = TypeBuilder::class("Sample", "Members");
        for (index, visibility) in field_visibilities.into_iter().enumerate() {
            declaration = declaration.field(
                &format!("field{index}"),
                TypeSignature::primitive(PrimitiveKind::Int32),
                move |field| field.visibility(visibility),
            );
        }
        for (index, visibility) in method_visibilities.into_iter().enumerate() {
            declaration = declaration.method(&format!("Method{index}"), move |method| {
                method.visibility(visibility)
            });
        }
        let declaration = declaration.build_in(&module);

        prop_assert!(narrow.is_subset_of(&wide));
        let shown = member_names(&declaration, &narrow);
        let widened = member_names(&declaration, &wide);
        prop_assert!(shown.is_subset(&widened));
    }

    #[test]
    fn sequential_streams_validate(shapes in prop::collection::vec(shaped_instruction(), 0..24)) {
        let expected: Vec<u32> = shapes.iter().map(|(_, _, size)| *size).collect();
        let (instructions, code_size) = laid_out(shapes);

        for (instruction, size) in instructions.iter().zip(expected) {
            prop_assert_eq!(instruction_size(instruction).ok(), Some(size));
        }
        prop_assert!(validate_stream(&instructions, code_size).is_ok());
        prop_assert!(matches!(
            validate_stream(&instructions, code_size + 1),
            Err(Error::MalformedBytecode { .. })
        ), "overlong code size must be reported as malformed bytecode");
    }

    #[test]
    fn shifted_instruction_is_reported_at_its_offset(
        shapes in prop::collection::vec(shaped_instruction(), 2..16),
        victim in any::<prop::sample::Index>(),
    ) {
        let (mut instructions, code_size) = laid_out(shapes);
        let index = 1 + victim.index(instructions.len() - 1);
        instructions[index].offset += 1;
        let shifted = instructions[index].offset;

        match validate_stream(&instructions, code_size) {
            Err(Error::MalformedBytecode { offset, .. }) => {
                prop_assert_eq!(offset, shifted);
            }
            other => {
                prop_assert!(false, "expected malformed bytecode, got {:?}", other);
            }
        }
    }
}
