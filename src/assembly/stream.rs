//! Instruction sizes and stream validation.
//!
//! A method body is one linear instruction stream: every instruction starts where the previous
//! one ended, and the last one ends exactly at the body's declared code size. The functions
//! here compute encoded sizes from the operand classification and check that invariant.

use crate::{
    assembly::{
        instruction::{Instruction, Operand, OperandKind},
        instructions::operand_kind,
    },
    Error, Result,
};

/// Encoded size of `instruction` in bytes: the opcode (1 or 2 bytes) plus its operand.
///
/// # Errors
/// - [`Error::UnknownInstruction`] if the opcode is reserved or out of range
/// - [`Error::MalformedBytecode`] if a `switch` carries no jump table
pub fn instruction_size(instruction: &Instruction) -> Result<u32> {
    let kind = operand_kind(instruction.opcode).map_err(|_| Error::UnknownInstruction {
        opcode: instruction.opcode,
        offset: instruction.offset,
    })?;

    let opcode_width = if instruction.is_two_byte() { 2 } else { 1 };
    let operand_width = match kind.fixed_width() {
        Some(width) => width,
        None => match &instruction.operand {
            Operand::Switch(targets) => {
                let count = u32::try_from(targets.len()).map_err(|_| {
                    malformed_error!(instruction.offset, "switch table too large")
                })?;
                count
                    .checked_mul(4)
                    .and_then(|table| table.checked_add(4))
                    .ok_or_else(|| {
                        malformed_error!(instruction.offset, "switch table too large")
                    })?
            }
            other => {
                return Err(malformed_error!(
                    instruction.offset,
                    "switch without jump table, found {:?}",
                    other
                ))
            }
        },
    };

    Ok(opcode_width + operand_width)
}

/// Check the offset/size invariant of a whole method body.
///
/// Every instruction must start where its predecessor ended, the first one at offset 0, and
/// the last one must end at `code_size`. Operands must match the operand kind of their opcode.
/// An empty stream is valid only for an empty body.
///
/// # Errors
/// Returns [`Error::MalformedBytecode`] naming the first offending offset, or
/// [`Error::UnknownInstruction`] for an unmapped opcode.
pub fn validate_stream(instructions: &[Instruction], code_size: u32) -> Result<()> {
    let mut expected = 0u32;

    for instruction in instructions {
        if instruction.offset != expected {
            return Err(malformed_error!(
                instruction.offset,
                "instruction expected at offset 0x{:04X}",
                expected
            ));
        }

        let kind = operand_kind(instruction.opcode).map_err(|_| Error::UnknownInstruction {
            opcode: instruction.opcode,
            offset: instruction.offset,
        })?;
        if !instruction.operand.fits(kind) {
            return Err(malformed_error!(
                instruction.offset,
                "operand {:?} does not fit operand kind {}",
                instruction.operand,
                kind
            ));
        }

        expected = expected
            .checked_add(instruction_size(instruction)?)
            .ok_or_else(|| malformed_error!(instruction.offset, "code size overflow"))?;
    }

    if expected != code_size {
        return Err(malformed_error!(
            expected,
            "stream ends at 0x{:04X} but the body declares 0x{:04X} bytes",
            expected,
            code_size
        ));
    }

    Ok(())
}

/// Absolute target offsets of a branch, `leave` or `switch` instruction.
///
/// Non-branching instructions have no targets.
#[must_use]
pub fn branch_targets(instruction: &Instruction) -> Vec<u32> {
    match &instruction.operand {
        Operand::Target(target) => vec![*target],
        Operand::Switch(targets) => targets.clone(),
        _ => Vec::new(),
    }
}

/// Returns true if `opcode` takes a branch target or jump table
#[must_use]
pub fn is_branch_opcode(opcode: u16) -> bool {
    operand_kind(opcode).is_ok_and(|kind| kind.is_branch() || kind == OperandKind::InlineSwitch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assembly::{instruction::Immediate, opcodes},
        model::{MethodReference, TypeReference, TypeSignature},
    };

    fn call_to(name: &str) -> Operand {
        Operand::Method(MethodReference::new(
            TypeReference::new("System", "Console"),
            name,
            TypeSignature::Void,
        ))
    }

    #[test]
    fn test_instruction_sizes() {
        let cases = [
            (Instruction::simple(0, opcodes::NOP), 1),
            (
                Instruction::new(0, opcodes::LDC_I4_S, Operand::Immediate(Immediate::Int8(5))),
                2,
            ),
            (
                Instruction::new(0, opcodes::LDC_I8, Operand::Immediate(Immediate::Int64(5))),
                9,
            ),
            (Instruction::new(0, opcodes::CALL, call_to("WriteLine")), 5),
            (Instruction::new(0, opcodes::LDLOC, Operand::Local(300)), 4),
            (Instruction::simple(0, opcodes::CEQ), 2),
            (Instruction::new(0, opcodes::SWITCH, Operand::Switch(vec![10, 20, 30])), 17),
        ];

        for (instruction, size) in cases {
            assert_eq!(
                instruction_size(&instruction).ok(),
                Some(size),
                "opcode 0x{:04X}",
                instruction.opcode
            );
        }
    }

    #[test]
    fn test_switch_without_table_is_malformed() {
        let instruction = Instruction::simple(4, opcodes::SWITCH);
        assert!(matches!(
            instruction_size(&instruction),
            Err(Error::MalformedBytecode { offset: 4, .. })
        ));
    }

    #[test]
    fn test_unknown_opcode_keeps_offset() {
        let instruction = Instruction::simple(12, 0x24);
        assert!(matches!(
            instruction_size(&instruction),
            Err(Error::UnknownInstruction {
                opcode: 0x24,
                offset: 12
            })
        ));
    }

    #[test]
    fn test_validate_well_formed_stream() {
        let stream = vec![
            Instruction::simple(0, opcodes::LDARG_0),
            Instruction::new(1, opcodes::BRFALSE_S, Operand::Target(8)),
            Instruction::new(3, opcodes::CALL, call_to("Beep")),
            Instruction::simple(8, opcodes::RET),
        ];
        assert!(validate_stream(&stream, 9).is_ok());
    }

    #[test]
    fn test_validate_rejects_gaps_and_wrong_size() {
        let gap = vec![
            Instruction::simple(0, opcodes::NOP),
            Instruction::simple(2, opcodes::RET),
        ];
        assert!(matches!(
            validate_stream(&gap, 3),
            Err(Error::MalformedBytecode { offset: 2, .. })
        ));

        let short = vec![Instruction::simple(0, opcodes::RET)];
        assert!(matches!(
            validate_stream(&short, 4),
            Err(Error::MalformedBytecode { offset: 1, .. })
        ));

        assert!(validate_stream(&[], 0).is_ok());
    }

    #[test]
    fn test_validate_rejects_mismatched_operand() {
        let stream = vec![Instruction::new(0, opcodes::BR, Operand::Local(1))];
        assert!(matches!(
            validate_stream(&stream, 5),
            Err(Error::MalformedBytecode { offset: 0, .. })
        ));
    }

    #[test]
    fn test_branch_targets() {
        assert_eq!(
            branch_targets(&Instruction::new(0, opcodes::BR_S, Operand::Target(7))),
            vec![7]
        );
        assert_eq!(
            branch_targets(&Instruction::new(0, opcodes::SWITCH, Operand::Switch(vec![9, 3]))),
            vec![9, 3]
        );
        assert!(branch_targets(&Instruction::simple(0, opcodes::RET)).is_empty());
        assert!(is_branch_opcode(opcodes::LEAVE_S));
        assert!(is_branch_opcode(opcodes::SWITCH));
        assert!(!is_branch_opcode(opcodes::CALL));
    }
}
