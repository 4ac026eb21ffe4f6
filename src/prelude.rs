//! # cilrender Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the cilrender library. Import this module to get quick access to the model builders,
//! the renderer and the output sinks.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cilrender operations
pub use crate::Error;

/// The result type used throughout cilrender
pub use crate::Result;

/// Rendering configuration
pub use crate::config::{NumberFormat, RenderConfig, VisibilityConfiguration};

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Renderer, output languages and render units
pub use crate::render::{Language, RenderUnit, Renderer};

/// Output sinks
pub use crate::render::{Entity, Formatter, Fragment, FragmentFormatter, TextFormatter};

/// Syntax strategies
pub use crate::render::{CSharp, Syntax, VisualBasic};

// ================================================================================================
// Code Model
// ================================================================================================

/// Model registry and identity
pub use crate::model::{identity::AssemblyVersion, CodeModel, Token};

/// Containers
pub use crate::model::{Assembly, AssemblyRc, Module, ModuleRc, Namespace};

/// Types and type references
pub use crate::model::{
    GenericParameter, PrimitiveKind, TypeDeclaration, TypeDeclarationRc, TypeKind,
    TypeReference, TypeSignature,
};

/// Members and member references
pub use crate::model::{
    EventDeclaration, EventReference, FieldDeclaration, FieldReference, MethodDeclaration,
    MethodDeclarationRc, MethodReference, Parameter, PropertyDeclaration, PropertyReference,
};

/// Flags
pub use crate::model::{
    FieldModifiers, MethodModifiers, ParameterFlags, TypeAttributes, Visibility,
};

/// Method bodies, statements and expressions
pub use crate::model::{
    BinaryOperator, Block, CatchClause, ExceptionHandler, ExceptionHandlerFlags, Expression,
    Literal, MethodBody, Statement, SwitchCase, UnaryOperator, Variable,
};

/// Custom attributes
pub use crate::model::{AttributeArgument, CustomAttribute, NamedArgument, NamedArgumentKind};

/// Builders
pub use crate::model::{
    AssemblyBuilder, EventBuilder, FieldBuilder, MethodBuilder, PropertyBuilder, TypeBuilder,
};

// ================================================================================================
// Instructions and Reflection.Emit
// ================================================================================================

/// Instruction stream types
pub use crate::assembly::{opcodes, Immediate, Instruction, Operand, OperandKind};

/// Construction plans
pub use crate::emit::{BuilderCall, ConstructionPlan, EmitArgument, Handle};
