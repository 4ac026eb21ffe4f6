//! CIL opcode classification based on ECMA-335 Partition III.
//!
//! Method bodies reach the renderer as already-decoded [`Instruction`]s. This module supplies
//! what the encoding still decides: the operand kind of each opcode, the encoded size of each
//! instruction, the offset/size invariant of a whole stream, and the branch targets the
//! Reflection.Emit backend turns into labels.
//!
//! # Key Components
//!
//! - [`OPCODE_TABLE`] / [`opcode_info`] - static table of every legal opcode
//! - [`operand_kind`] - classify an opcode, failing for reserved slots
//! - [`instruction_size`] / [`validate_stream`] - encoded sizes and stream validation
//! - [`branch_targets`] - absolute targets of a branch or switch
//! - [`emit_field_name`] - the `System.Reflection.Emit.OpCodes` field of an opcode
//!
//! # Examples
//!
//! ```rust,ignore
//! use cilrender::assembly::{instruction_size, opcodes, Instruction, Operand};
//!
//! let branch = Instruction::new(0, opcodes::BR_S, Operand::Target(2));
//! assert_eq!(instruction_size(&branch)?, 2);
//! # Ok::<(), cilrender::Error>(())
//! ```

mod instruction;
mod instructions;
pub mod opcodes;
mod stream;

pub use instruction::{FlowType, Immediate, Instruction, Operand, OperandKind};
pub use instructions::{emit_field_name, opcode_info, operand_kind, OpCodeInfo, OPCODE_TABLE};
pub use stream::{branch_targets, instruction_size, is_branch_opcode, validate_stream};
