use bitflags::bitflags;

use crate::{
    assembly::Instruction,
    model::{expression::Variable, statement::Block, types::TypeReference},
};

bitflags! {
    /// Kind of an exception handler clause (ECMA-335 II.25.4.6)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExceptionHandlerFlags: u16 {
        /// A typed exception clause
        const EXCEPTION = 0x0000;
        /// An exception filter and handler clause
        const FILTER = 0x0001;
        /// A finally clause
        const FINALLY = 0x0002;
        /// Fault clause (finally that is called on exception only)
        const FAULT = 0x0004;
    }
}

/// One clause of a method's exception handling table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionHandler {
    /// Clause kind
    pub flags: ExceptionHandlerFlags,
    /// Offset of the protected region
    pub try_offset: u32,
    /// Length of the protected region in bytes
    pub try_length: u32,
    /// Offset of the handler
    pub handler_offset: u32,
    /// Length of the handler in bytes
    pub handler_length: u32,
    /// Caught type of typed clauses
    pub catch_type: Option<TypeReference>,
    /// Offset of the filter block of filter clauses
    pub filter_offset: u32,
}

impl ExceptionHandler {
    /// End offset of the protected region (exclusive)
    #[must_use]
    pub fn try_end(&self) -> u32 {
        self.try_offset + self.try_length
    }

    /// End offset of the handler (exclusive)
    #[must_use]
    pub fn handler_end(&self) -> u32 {
        self.handler_offset + self.handler_length
    }

    /// Returns true for `finally` clauses
    #[must_use]
    pub fn is_finally(&self) -> bool {
        self.flags.contains(ExceptionHandlerFlags::FINALLY)
    }

    /// Returns true for `fault` clauses
    #[must_use]
    pub fn is_fault(&self) -> bool {
        self.flags.contains(ExceptionHandlerFlags::FAULT)
    }

    /// Returns true for filter clauses
    #[must_use]
    pub fn is_filter(&self) -> bool {
        self.flags.contains(ExceptionHandlerFlags::FILTER)
    }
}

/// The body of a method.
///
/// A body carries both the decompiled statement tree, consumed by the language renderers, and
/// the raw instruction stream with its exception table, consumed by the Reflection.Emit
/// backend. Either part may be missing when the provider could not produce it.
#[derive(Debug, Clone, Default)]
pub struct MethodBody {
    /// Decompiled statements
    pub statements: Option<Block>,
    /// Instruction stream in offset order
    pub instructions: Vec<Instruction>,
    /// Exception handling clauses
    pub exception_handlers: Vec<ExceptionHandler>,
    /// Local variables, in slot order
    pub locals: Vec<Variable>,
    /// Declared size of the instruction stream in bytes
    pub code_size: u32,
    /// Maximum evaluation stack depth
    pub max_stack: u16,
    /// Locals are zero-initialized
    pub init_locals: bool,
}

impl MethodBody {
    /// Create a body holding only decompiled statements
    #[must_use]
    pub fn from_statements(statements: Block) -> Self {
        MethodBody {
            statements: Some(statements),
            ..MethodBody::default()
        }
    }
}
