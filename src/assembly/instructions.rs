//! The static CIL opcode table.
//!
//! One entry per legal opcode, sorted by opcode value. Reserved slots of the one-byte space
//! (`0x24`, `0x77`-`0x78`, `0xA6`-`0xB2`, `0xBB`-`0xC1`, `0xC4`-`0xC5`, `0xC7`-`0xCF`) and of the
//! `0xFE` space (`0xFE08`, `0xFE10`, `0xFE1B`) have no entry.

use crate::{
    assembly::instruction::{FlowType, OperandKind},
    Error, Result,
};

use FlowType::{
    Call, ConditionalBranch, EndFinally, Leave, Meta, Return, Sequential, Switch, Throw,
    UnconditionalBranch,
};
use OperandKind::{
    InlineBrTarget, InlineField, InlineI, InlineI8, InlineMethod, InlineNone, InlineR, InlineSig,
    InlineString, InlineSwitch, InlineTok, InlineType, InlineVar, ShortInlineBrTarget,
    ShortInlineI, ShortInlineR, ShortInlineVar,
};

/// Classification of one opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpCodeInfo {
    /// Numeric opcode
    pub opcode: u16,
    /// ILAsm mnemonic
    pub mnemonic: &'static str,
    /// Operand classification
    pub operand: OperandKind,
    /// Control flow behaviour
    pub flow: FlowType,
}

const fn op(
    opcode: u16,
    mnemonic: &'static str,
    operand: OperandKind,
    flow: FlowType,
) -> OpCodeInfo {
    OpCodeInfo {
        opcode,
        mnemonic,
        operand,
        flow,
    }
}

/// All legal opcodes, sorted by opcode value
pub static OPCODE_TABLE: &[OpCodeInfo] = &[
    op(0x00, "nop", InlineNone, Sequential),
    op(0x01, "break", InlineNone, Sequential),
    op(0x02, "ldarg.0", InlineNone, Sequential),
    op(0x03, "ldarg.1", InlineNone, Sequential),
    op(0x04, "ldarg.2", InlineNone, Sequential),
    op(0x05, "ldarg.3", InlineNone, Sequential),
    op(0x06, "ldloc.0", InlineNone, Sequential),
    op(0x07, "ldloc.1", InlineNone, Sequential),
    op(0x08, "ldloc.2", InlineNone, Sequential),
    op(0x09, "ldloc.3", InlineNone, Sequential),
    op(0x0A, "stloc.0", InlineNone, Sequential),
    op(0x0B, "stloc.1", InlineNone, Sequential),
    op(0x0C, "stloc.2", InlineNone, Sequential),
    op(0x0D, "stloc.3", InlineNone, Sequential),
    op(0x0E, "ldarg.s", ShortInlineVar, Sequential),
    op(0x0F, "ldarga.s", ShortInlineVar, Sequential),
    op(0x10, "starg.s", ShortInlineVar, Sequential),
    op(0x11, "ldloc.s", ShortInlineVar, Sequential),
    op(0x12, "ldloca.s", ShortInlineVar, Sequential),
    op(0x13, "stloc.s", ShortInlineVar, Sequential),
    op(0x14, "ldnull", InlineNone, Sequential),
    op(0x15, "ldc.i4.m1", InlineNone, Sequential),
    op(0x16, "ldc.i4.0", InlineNone, Sequential),
    op(0x17, "ldc.i4.1", InlineNone, Sequential),
    op(0x18, "ldc.i4.2", InlineNone, Sequential),
    op(0x19, "ldc.i4.3", InlineNone, Sequential),
    op(0x1A, "ldc.i4.4", InlineNone, Sequential),
    op(0x1B, "ldc.i4.5", InlineNone, Sequential),
    op(0x1C, "ldc.i4.6", InlineNone, Sequential),
    op(0x1D, "ldc.i4.7", InlineNone, Sequential),
    op(0x1E, "ldc.i4.8", InlineNone, Sequential),
    op(0x1F, "ldc.i4.s", ShortInlineI, Sequential),
    op(0x20, "ldc.i4", InlineI, Sequential),
    op(0x21, "ldc.i8", InlineI8, Sequential),
    op(0x22, "ldc.r4", ShortInlineR, Sequential),
    op(0x23, "ldc.r8", InlineR, Sequential),
    op(0x25, "dup", InlineNone, Sequential),
    op(0x26, "pop", InlineNone, Sequential),
    op(0x27, "jmp", InlineMethod, Call),
    op(0x28, "call", InlineMethod, Call),
    op(0x29, "calli", InlineSig, Call),
    op(0x2A, "ret", InlineNone, Return),
    op(0x2B, "br.s", ShortInlineBrTarget, UnconditionalBranch),
    op(0x2C, "brfalse.s", ShortInlineBrTarget, ConditionalBranch),
    op(0x2D, "brtrue.s", ShortInlineBrTarget, ConditionalBranch),
    op(0x2E, "beq.s", ShortInlineBrTarget, ConditionalBranch),
    op(0x2F, "bge.s", ShortInlineBrTarget, ConditionalBranch),
    op(0x30, "bgt.s", ShortInlineBrTarget, ConditionalBranch),
    op(0x31, "ble.s", ShortInlineBrTarget, ConditionalBranch),
    op(0x32, "blt.s", ShortInlineBrTarget, ConditionalBranch),
    op(0x33, "bne.un.s", ShortInlineBrTarget, ConditionalBranch),
    op(0x34, "bge.un.s", ShortInlineBrTarget, ConditionalBranch),
    op(0x35, "bgt.un.s", ShortInlineBrTarget, ConditionalBranch),
    op(0x36, "ble.un.s", ShortInlineBrTarget, ConditionalBranch),
    op(0x37, "blt.un.s", ShortInlineBrTarget, ConditionalBranch),
    op(0x38, "br", InlineBrTarget, UnconditionalBranch),
    op(0x39, "brfalse", InlineBrTarget, ConditionalBranch),
    op(0x3A, "brtrue", InlineBrTarget, ConditionalBranch),
    op(0x3B, "beq", InlineBrTarget, ConditionalBranch),
    op(0x3C, "bge", InlineBrTarget, ConditionalBranch),
    op(0x3D, "bgt", InlineBrTarget, ConditionalBranch),
    op(0x3E, "ble", InlineBrTarget, ConditionalBranch),
    op(0x3F, "blt", InlineBrTarget, ConditionalBranch),
    op(0x40, "bne.un", InlineBrTarget, ConditionalBranch),
    op(0x41, "bge.un", InlineBrTarget, ConditionalBranch),
    op(0x42, "bgt.un", InlineBrTarget, ConditionalBranch),
    op(0x43, "ble.un", InlineBrTarget, ConditionalBranch),
    op(0x44, "blt.un", InlineBrTarget, ConditionalBranch),
    op(0x45, "switch", InlineSwitch, Switch),
    op(0x46, "ldind.i1", InlineNone, Sequential),
    op(0x47, "ldind.u1", InlineNone, Sequential),
    op(0x48, "ldind.i2", InlineNone, Sequential),
    op(0x49, "ldind.u2", InlineNone, Sequential),
    op(0x4A, "ldind.i4", InlineNone, Sequential),
    op(0x4B, "ldind.u4", InlineNone, Sequential),
    op(0x4C, "ldind.i8", InlineNone, Sequential),
    op(0x4D, "ldind.i", InlineNone, Sequential),
    op(0x4E, "ldind.r4", InlineNone, Sequential),
    op(0x4F, "ldind.r8", InlineNone, Sequential),
    op(0x50, "ldind.ref", InlineNone, Sequential),
    op(0x51, "stind.ref", InlineNone, Sequential),
    op(0x52, "stind.i1", InlineNone, Sequential),
    op(0x53, "stind.i2", InlineNone, Sequential),
    op(0x54, "stind.i4", InlineNone, Sequential),
    op(0x55, "stind.i8", InlineNone, Sequential),
    op(0x56, "stind.r4", InlineNone, Sequential),
    op(0x57, "stind.r8", InlineNone, Sequential),
    op(0x58, "add", InlineNone, Sequential),
    op(0x59, "sub", InlineNone, Sequential),
    op(0x5A, "mul", InlineNone, Sequential),
    op(0x5B, "div", InlineNone, Sequential),
    op(0x5C, "div.un", InlineNone, Sequential),
    op(0x5D, "rem", InlineNone, Sequential),
    op(0x5E, "rem.un", InlineNone, Sequential),
    op(0x5F, "and", InlineNone, Sequential),
    op(0x60, "or", InlineNone, Sequential),
    op(0x61, "xor", InlineNone, Sequential),
    op(0x62, "shl", InlineNone, Sequential),
    op(0x63, "shr", InlineNone, Sequential),
    op(0x64, "shr.un", InlineNone, Sequential),
    op(0x65, "neg", InlineNone, Sequential),
    op(0x66, "not", InlineNone, Sequential),
    op(0x67, "conv.i1", InlineNone, Sequential),
    op(0x68, "conv.i2", InlineNone, Sequential),
    op(0x69, "conv.i4", InlineNone, Sequential),
    op(0x6A, "conv.i8", InlineNone, Sequential),
    op(0x6B, "conv.r4", InlineNone, Sequential),
    op(0x6C, "conv.r8", InlineNone, Sequential),
    op(0x6D, "conv.u4", InlineNone, Sequential),
    op(0x6E, "conv.u8", InlineNone, Sequential),
    op(0x6F, "callvirt", InlineMethod, Call),
    op(0x70, "cpobj", InlineType, Sequential),
    op(0x71, "ldobj", InlineType, Sequential),
    op(0x72, "ldstr", InlineString, Sequential),
    op(0x73, "newobj", InlineMethod, Call),
    op(0x74, "castclass", InlineType, Sequential),
    op(0x75, "isinst", InlineType, Sequential),
    op(0x76, "conv.r.un", InlineNone, Sequential),
    op(0x79, "unbox", InlineType, Sequential),
    op(0x7A, "throw", InlineNone, Throw),
    op(0x7B, "ldfld", InlineField, Sequential),
    op(0x7C, "ldflda", InlineField, Sequential),
    op(0x7D, "stfld", InlineField, Sequential),
    op(0x7E, "ldsfld", InlineField, Sequential),
    op(0x7F, "ldsflda", InlineField, Sequential),
    op(0x80, "stsfld", InlineField, Sequential),
    op(0x81, "stobj", InlineType, Sequential),
    op(0x82, "conv.ovf.i1.un", InlineNone, Sequential),
    op(0x83, "conv.ovf.i2.un", InlineNone, Sequential),
    op(0x84, "conv.ovf.i4.un", InlineNone, Sequential),
    op(0x85, "conv.ovf.i8.un", InlineNone, Sequential),
    op(0x86, "conv.ovf.u1.un", InlineNone, Sequential),
    op(0x87, "conv.ovf.u2.un", InlineNone, Sequential),
    op(0x88, "conv.ovf.u4.un", InlineNone, Sequential),
    op(0x89, "conv.ovf.u8.un", InlineNone, Sequential),
    op(0x8A, "conv.ovf.i.un", InlineNone, Sequential),
    op(0x8B, "conv.ovf.u.un", InlineNone, Sequential),
    op(0x8C, "box", InlineType, Sequential),
    op(0x8D, "newarr", InlineType, Sequential),
    op(0x8E, "ldlen", InlineNone, Sequential),
    op(0x8F, "ldelema", InlineType, Sequential),
    op(0x90, "ldelem.i1", InlineNone, Sequential),
    op(0x91, "ldelem.u1", InlineNone, Sequential),
    op(0x92, "ldelem.i2", InlineNone, Sequential),
    op(0x93, "ldelem.u2", InlineNone, Sequential),
    op(0x94, "ldelem.i4", InlineNone, Sequential),
    op(0x95, "ldelem.u4", InlineNone, Sequential),
    op(0x96, "ldelem.i8", InlineNone, Sequential),
    op(0x97, "ldelem.i", InlineNone, Sequential),
    op(0x98, "ldelem.r4", InlineNone, Sequential),
    op(0x99, "ldelem.r8", InlineNone, Sequential),
    op(0x9A, "ldelem.ref", InlineNone, Sequential),
    op(0x9B, "stelem.i", InlineNone, Sequential),
    op(0x9C, "stelem.i1", InlineNone, Sequential),
    op(0x9D, "stelem.i2", InlineNone, Sequential),
    op(0x9E, "stelem.i4", InlineNone, Sequential),
    op(0x9F, "stelem.i8", InlineNone, Sequential),
    op(0xA0, "stelem.r4", InlineNone, Sequential),
    op(0xA1, "stelem.r8", InlineNone, Sequential),
    op(0xA2, "stelem.ref", InlineNone, Sequential),
    op(0xA3, "ldelem", InlineType, Sequential),
    op(0xA4, "stelem", InlineType, Sequential),
    op(0xA5, "unbox.any", InlineType, Sequential),
    op(0xB3, "conv.ovf.i1", InlineNone, Sequential),
    op(0xB4, "conv.ovf.u1", InlineNone, Sequential),
    op(0xB5, "conv.ovf.i2", InlineNone, Sequential),
    op(0xB6, "conv.ovf.u2", InlineNone, Sequential),
    op(0xB7, "conv.ovf.i4", InlineNone, Sequential),
    op(0xB8, "conv.ovf.u4", InlineNone, Sequential),
    op(0xB9, "conv.ovf.i8", InlineNone, Sequential),
    op(0xBA, "conv.ovf.u8", InlineNone, Sequential),
    op(0xC2, "refanyval", InlineType, Sequential),
    op(0xC3, "ckfinite", InlineNone, Sequential),
    op(0xC6, "mkrefany", InlineType, Sequential),
    op(0xD0, "ldtoken", InlineTok, Sequential),
    op(0xD1, "conv.u2", InlineNone, Sequential),
    op(0xD2, "conv.u1", InlineNone, Sequential),
    op(0xD3, "conv.i", InlineNone, Sequential),
    op(0xD4, "conv.ovf.i", InlineNone, Sequential),
    op(0xD5, "conv.ovf.u", InlineNone, Sequential),
    op(0xD6, "add.ovf", InlineNone, Sequential),
    op(0xD7, "add.ovf.un", InlineNone, Sequential),
    op(0xD8, "mul.ovf", InlineNone, Sequential),
    op(0xD9, "mul.ovf.un", InlineNone, Sequential),
    op(0xDA, "sub.ovf", InlineNone, Sequential),
    op(0xDB, "sub.ovf.un", InlineNone, Sequential),
    op(0xDC, "endfinally", InlineNone, EndFinally),
    op(0xDD, "leave", InlineBrTarget, Leave),
    op(0xDE, "leave.s", ShortInlineBrTarget, Leave),
    op(0xDF, "stind.i", InlineNone, Sequential),
    op(0xE0, "conv.u", InlineNone, Sequential),
    op(0xFE00, "arglist", InlineNone, Sequential),
    op(0xFE01, "ceq", InlineNone, Sequential),
    op(0xFE02, "cgt", InlineNone, Sequential),
    op(0xFE03, "cgt.un", InlineNone, Sequential),
    op(0xFE04, "clt", InlineNone, Sequential),
    op(0xFE05, "clt.un", InlineNone, Sequential),
    op(0xFE06, "ldftn", InlineMethod, Sequential),
    op(0xFE07, "ldvirtftn", InlineMethod, Sequential),
    op(0xFE09, "ldarg", InlineVar, Sequential),
    op(0xFE0A, "ldarga", InlineVar, Sequential),
    op(0xFE0B, "starg", InlineVar, Sequential),
    op(0xFE0C, "ldloc", InlineVar, Sequential),
    op(0xFE0D, "ldloca", InlineVar, Sequential),
    op(0xFE0E, "stloc", InlineVar, Sequential),
    op(0xFE0F, "localloc", InlineNone, Sequential),
    op(0xFE11, "endfilter", InlineNone, Return),
    op(0xFE12, "unaligned.", ShortInlineI, Meta),
    op(0xFE13, "volatile.", InlineNone, Meta),
    op(0xFE14, "tail.", InlineNone, Meta),
    op(0xFE15, "initobj", InlineType, Sequential),
    op(0xFE16, "constrained.", InlineType, Meta),
    op(0xFE17, "cpblk", InlineNone, Sequential),
    op(0xFE18, "initblk", InlineNone, Sequential),
    op(0xFE19, "no.", ShortInlineI, Meta),
    op(0xFE1A, "rethrow", InlineNone, Throw),
    op(0xFE1C, "sizeof", InlineType, Sequential),
    op(0xFE1D, "refanytype", InlineNone, Sequential),
    op(0xFE1E, "readonly.", InlineNone, Meta),
];

/// Look up the table entry of `opcode`
#[must_use]
pub fn opcode_info(opcode: u16) -> Option<&'static OpCodeInfo> {
    OPCODE_TABLE
        .binary_search_by_key(&opcode, |info| info.opcode)
        .ok()
        .map(|index| &OPCODE_TABLE[index])
}

/// Classify the operand of `opcode`.
///
/// # Errors
/// Returns [`Error::UnknownInstruction`] for reserved or out-of-range opcodes.
pub fn operand_kind(opcode: u16) -> Result<OperandKind> {
    opcode_info(opcode)
        .map(|info| info.operand)
        .ok_or(Error::UnknownInstruction { opcode, offset: 0 })
}

/// Name of the `System.Reflection.Emit.OpCodes` field for `opcode`.
///
/// Mnemonic segments are capitalized and joined with `_` (`br.s` is `Br_S`); prefix opcodes
/// drop their trailing dot, and `tail.` is spelled `Tailcall`.
///
/// # Errors
/// Returns [`Error::UnknownInstruction`] for reserved or out-of-range opcodes.
pub fn emit_field_name(opcode: u16) -> Result<String> {
    let info = opcode_info(opcode).ok_or(Error::UnknownInstruction { opcode, offset: 0 })?;

    if info.mnemonic == "tail." {
        return Ok("Tailcall".to_string());
    }

    let segments: Vec<String> = info
        .mnemonic
        .trim_end_matches('.')
        .split('.')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    Ok(segments.join("_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::opcodes;

    #[test]
    fn test_table_is_sorted_and_unique() {
        assert!(OPCODE_TABLE
            .windows(2)
            .all(|pair| pair[0].opcode < pair[1].opcode));
    }

    #[test]
    fn test_table_covers_legal_space() {
        let one_byte = OPCODE_TABLE.iter().filter(|info| info.opcode <= 0xE0).count();
        let two_byte = OPCODE_TABLE
            .iter()
            .filter(|info| info.opcode >= 0xFE00)
            .count();

        // 0xE1 slots minus 1 + 2 + 13 + 7 + 2 + 9 reserved ones
        assert_eq!(one_byte, 0xE1 - 34);
        // 0x1F slots minus 3 reserved ones
        assert_eq!(two_byte, 0x1F - 3);
        assert_eq!(OPCODE_TABLE.len(), one_byte + two_byte);
    }

    #[test]
    fn test_operand_kinds() {
        assert_eq!(operand_kind(opcodes::NOP).ok(), Some(OperandKind::InlineNone));
        assert_eq!(
            operand_kind(opcodes::LDC_I4_S).ok(),
            Some(OperandKind::ShortInlineI)
        );
        assert_eq!(operand_kind(opcodes::CALL).ok(), Some(OperandKind::InlineMethod));
        assert_eq!(
            operand_kind(opcodes::BR_S).ok(),
            Some(OperandKind::ShortInlineBrTarget)
        );
        assert_eq!(operand_kind(opcodes::SWITCH).ok(), Some(OperandKind::InlineSwitch));
        assert_eq!(operand_kind(opcodes::LDLOC).ok(), Some(OperandKind::InlineVar));
        assert_eq!(operand_kind(opcodes::LDTOKEN).ok(), Some(OperandKind::InlineTok));
        assert_eq!(operand_kind(opcodes::CALLI).ok(), Some(OperandKind::InlineSig));
    }

    #[test]
    fn test_reserved_opcodes_are_unknown() {
        let reserved_opcodes = [
            0x24u16, 0x77, 0x78, 0xA6, 0xB2, 0xBB, 0xC1, 0xC4, 0xC7, 0xCF, 0xE1, 0xFF,
        ];
        for reserved in reserved_opcodes {
            assert!(
                matches!(
                    operand_kind(reserved),
                    Err(Error::UnknownInstruction { opcode, .. }) if opcode == reserved
                ),
                "0x{reserved:02X} must be unknown"
            );
        }
        for reserved in [0xFE08u16, 0xFE10, 0xFE1B, 0xFE1F, 0xFD00] {
            assert!(operand_kind(reserved).is_err());
        }
    }

    #[test]
    fn test_emit_field_names() {
        assert_eq!(emit_field_name(opcodes::BR_S).ok().as_deref(), Some("Br_S"));
        assert_eq!(emit_field_name(opcodes::TAILCALL).ok().as_deref(), Some("Tailcall"));
        assert_eq!(
            emit_field_name(opcodes::LDC_I4_M1).ok().as_deref(),
            Some("Ldc_I4_M1")
        );
        assert_eq!(
            emit_field_name(opcodes::CONV_OVF_I1_UN).ok().as_deref(),
            Some("Conv_Ovf_I1_Un")
        );
        assert_eq!(
            emit_field_name(opcodes::CONSTRAINED).ok().as_deref(),
            Some("Constrained")
        );
        assert_eq!(emit_field_name(opcodes::CALLVIRT).ok().as_deref(), Some("Callvirt"));
    }
}
