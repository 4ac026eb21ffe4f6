//! Instruction, operand and classification types.
//!
//! Instructions arrive already decoded from the model provider: the renderer never reads raw
//! method bytes. What it needs from the encoding is the operand classification of each opcode
//! ([`OperandKind`]), from which encoded sizes and branch targets follow.

use strum::{Display, EnumString};

use crate::model::{FieldReference, MethodReference, Token, TypeSignature};

/// Operand classification of an opcode, as named by ECMA-335 Partition VI.
///
/// # Examples
///
/// ```rust,ignore
/// use cilrender::assembly::{operand_kind, opcodes, OperandKind};
///
/// assert_eq!(operand_kind(opcodes::LDLOC_S)?, OperandKind::ShortInlineVar);
/// assert_eq!(operand_kind(opcodes::SWITCH)?.fixed_width(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum OperandKind {
    /// No operand
    InlineNone,
    /// 8-bit integer
    ShortInlineI,
    /// 32-bit integer
    InlineI,
    /// 64-bit integer
    InlineI8,
    /// 32-bit float
    ShortInlineR,
    /// 64-bit float
    InlineR,
    /// 8-bit relative branch target
    ShortInlineBrTarget,
    /// 32-bit relative branch target
    InlineBrTarget,
    /// Method token
    InlineMethod,
    /// Field token
    InlineField,
    /// Type token
    InlineType,
    /// Type, method or field token (`ldtoken`)
    InlineTok,
    /// User string token
    InlineString,
    /// Stand-alone signature token (`calli`)
    InlineSig,
    /// 8-bit local or argument index
    ShortInlineVar,
    /// 16-bit local or argument index
    InlineVar,
    /// Jump table: 32-bit count followed by that many 32-bit targets
    InlineSwitch,
}

impl OperandKind {
    /// Encoded operand width in bytes, `None` for the variable-size switch table
    #[must_use]
    pub fn fixed_width(self) -> Option<u32> {
        match self {
            OperandKind::InlineNone => Some(0),
            OperandKind::ShortInlineI
            | OperandKind::ShortInlineBrTarget
            | OperandKind::ShortInlineVar => Some(1),
            OperandKind::InlineVar => Some(2),
            OperandKind::InlineI
            | OperandKind::ShortInlineR
            | OperandKind::InlineBrTarget
            | OperandKind::InlineMethod
            | OperandKind::InlineField
            | OperandKind::InlineType
            | OperandKind::InlineTok
            | OperandKind::InlineString
            | OperandKind::InlineSig => Some(4),
            OperandKind::InlineI8 | OperandKind::InlineR => Some(8),
            OperandKind::InlineSwitch => None,
        }
    }

    /// Returns true for the two branch target kinds
    #[must_use]
    pub fn is_branch(self) -> bool {
        matches!(
            self,
            OperandKind::ShortInlineBrTarget | OperandKind::InlineBrTarget
        )
    }
}

/// Control flow behaviour of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FlowType {
    /// Normal execution continues to next instruction
    Sequential,
    /// Conditional branch to another location
    ConditionalBranch,
    /// Always branches to another location
    UnconditionalBranch,
    /// Call to another method
    Call,
    /// Returns from current method
    Return,
    /// Multi-way branch
    Switch,
    /// Exception throwing
    Throw,
    /// End of finally or fault block
    EndFinally,
    /// Leave protected region
    Leave,
    /// Prefix modifying the next instruction
    Meta,
}

/// Immediate operand values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Immediate {
    /// `ShortInlineI`
    Int8(i8),
    /// `InlineI`
    Int32(i32),
    /// `InlineI8`
    Int64(i64),
    /// `ShortInlineR`
    Float32(f32),
    /// `InlineR`
    Float64(f64),
}

/// The operand of a decoded instruction.
///
/// Branch targets are absolute offsets; the provider has already resolved the relative
/// displacement.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// No operand
    None,
    /// Numeric immediate
    Immediate(Immediate),
    /// Absolute branch target offset
    Target(u32),
    /// Absolute switch target offsets
    Switch(Vec<u32>),
    /// Local variable index
    Local(u16),
    /// Argument index
    Argument(u16),
    /// String literal of `ldstr`
    String(String),
    /// Type operand
    Type(TypeSignature),
    /// Method operand
    Method(MethodReference),
    /// Field operand
    Field(FieldReference),
    /// Raw stand-alone signature token of `calli`
    Signature(Token),
}

impl Operand {
    /// Returns true if this operand can be encoded with `kind`
    #[must_use]
    pub fn fits(&self, kind: OperandKind) -> bool {
        match (kind, self) {
            (OperandKind::InlineNone, Operand::None)
            | (OperandKind::ShortInlineI, Operand::Immediate(Immediate::Int8(_)))
            | (OperandKind::InlineI, Operand::Immediate(Immediate::Int32(_)))
            | (OperandKind::InlineI8, Operand::Immediate(Immediate::Int64(_)))
            | (OperandKind::ShortInlineR, Operand::Immediate(Immediate::Float32(_)))
            | (OperandKind::InlineR, Operand::Immediate(Immediate::Float64(_)))
            | (OperandKind::ShortInlineBrTarget | OperandKind::InlineBrTarget, Operand::Target(_))
            | (OperandKind::InlineSwitch, Operand::Switch(_))
            | (OperandKind::InlineMethod, Operand::Method(_))
            | (OperandKind::InlineField, Operand::Field(_))
            | (OperandKind::InlineType, Operand::Type(_))
            | (
                OperandKind::InlineTok,
                Operand::Type(_) | Operand::Method(_) | Operand::Field(_),
            )
            | (OperandKind::InlineString, Operand::String(_))
            | (OperandKind::InlineSig, Operand::Signature(_))
            | (
                OperandKind::ShortInlineVar | OperandKind::InlineVar,
                Operand::Local(_) | Operand::Argument(_),
            ) => true,
            _ => false,
        }
    }
}

/// A decoded CIL instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Offset from the start of the method body
    pub offset: u32,
    /// Opcode; two-byte opcodes as `0xFE00 | second_byte`
    pub opcode: u16,
    /// Operand
    pub operand: Operand,
}

impl Instruction {
    /// Create an instruction
    #[must_use]
    pub fn new(offset: u32, opcode: u16, operand: Operand) -> Self {
        Instruction {
            offset,
            opcode,
            operand,
        }
    }

    /// Create an instruction without operand
    #[must_use]
    pub fn simple(offset: u32, opcode: u16) -> Self {
        Instruction::new(offset, opcode, Operand::None)
    }

    /// Returns true if the opcode lives in the `0xFE` two-byte space
    #[must_use]
    pub fn is_two_byte(&self) -> bool {
        self.opcode & 0xFF00 == crate::assembly::opcodes::PREFIX_FE
    }
}
