//! The builder calls a construction plan is made of.

use crate::model::{FieldReference, MethodReference, Token, TypeReference, TypeSignature};

/// A reflective handle declared ahead of the instructions that use it.
#[derive(Debug, Clone, PartialEq)]
pub enum Handle {
    /// `GetMethod`
    Method(MethodReference),
    /// `GetConstructor`
    Constructor(MethodReference),
    /// `GetField`
    Field(FieldReference),
    /// `typeof`
    Type(TypeSignature),
}

impl Handle {
    /// Prefix of the generated variable name
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Handle::Method(_) => "method",
            Handle::Constructor(_) => "ctor",
            Handle::Field(_) => "field",
            Handle::Type(_) => "type",
        }
    }

    /// Name of the reflection type the handle is declared as
    #[must_use]
    pub fn reflection_type(&self) -> &'static str {
        match self {
            Handle::Method(_) => "MethodInfo",
            Handle::Constructor(_) => "ConstructorInfo",
            Handle::Field(_) => "FieldInfo",
            Handle::Type(_) => "Type",
        }
    }
}

/// The second argument of an `Emit` call.
#[derive(Debug, Clone, PartialEq)]
pub enum EmitArgument {
    /// No operand
    None,
    /// `(sbyte)n`
    Int8(i8),
    /// `n`
    Int32(i32),
    /// `nL`
    Int64(i64),
    /// `nf`
    Float32(f32),
    /// `n`
    Float64(f64),
    /// A declared label
    Label(String),
    /// A jump table of declared labels
    Labels(Vec<String>),
    /// A declared local
    Local(String),
    /// Argument index; `short` selects the one-byte encoding
    Argument {
        /// Argument index
        index: u16,
        /// One-byte operand form
        short: bool,
    },
    /// A string constant
    String(String),
    /// A declared handle
    Handle(String),
    /// A raw stand-alone signature token
    Signature(Token),
}

/// What a method builder is created from.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDefinition {
    /// Method name, empty for constructors
    pub name: String,
    /// `MethodAttributes` member names
    pub attributes: Vec<&'static str>,
    /// Return type, `None` for constructors
    pub return_type: Option<TypeSignature>,
    /// Parameter types
    pub parameter_types: Vec<TypeSignature>,
    /// Defines a constructor
    pub constructor: bool,
    /// The method has an instruction stream and gets an `ILGenerator`
    pub generator: bool,
}

/// One call against the builder API.
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderCall {
    /// An explanatory comment
    Comment(String),
    /// `DefineMethod` / `DefineConstructor` and `GetILGenerator`
    DefineMethod(MethodDefinition),
    /// `DeclareLocal`
    DeclareLocal {
        /// Variable name
        name: String,
        /// Local type
        local_type: TypeSignature,
        /// Pinned local
        pinned: bool,
    },
    /// `DefineLabel`
    DefineLabel {
        /// Variable name
        name: String,
        /// Offset the label marks
        offset: u32,
    },
    /// A reflective handle lookup
    DeclareHandle {
        /// Variable name
        name: String,
        /// What is looked up
        handle: Handle,
    },
    /// `BeginExceptionBlock`
    BeginExceptionBlock,
    /// `BeginCatchBlock`; `None` in a filter handler
    BeginCatchBlock(Option<TypeReference>),
    /// `BeginExceptFilterBlock`
    BeginExceptFilterBlock,
    /// `BeginFinallyBlock`
    BeginFinallyBlock,
    /// `BeginFaultBlock`
    BeginFaultBlock,
    /// `EndExceptionBlock`
    EndExceptionBlock,
    /// `MarkLabel`
    MarkLabel(String),
    /// `Emit`
    Emit {
        /// Offset of the instruction
        offset: u32,
        /// `OpCodes` field name
        opcode: String,
        /// Operand
        argument: EmitArgument,
    },
}
