//! The read-only code model consumed by the renderers.
//!
//! The model is supplied by the decompiler: assemblies own modules, modules own type
//! declarations, types own their members, and every method may carry a [`MethodBody`] with a
//! decompiled statement tree and the raw instruction stream. Back-references (member to
//! declaring type, nested type to enclosing type, type to module) are weak and are never
//! followed as ownership.
//!
//! # Key Components
//!
//! - [`TypeDeclaration`] / [`TypeReference`] / [`TypeSignature`] - types and type uses
//! - [`MethodDeclaration`], [`FieldDeclaration`], [`PropertyDeclaration`], [`EventDeclaration`]
//!   and their references
//! - [`Expression`] / [`Statement`] - the decompiled body trees
//! - [`CodeModel`] - registry resolving references to declarations
//! - [`TypeBuilder`] and friends - fluent construction of a model
//!
//! The renderers never mutate the model; everything here is safe to share across threads once
//! it has been built.

mod attributes;
mod body;
mod builder;
mod container;
mod expression;
mod flags;
mod literal;
mod members;
mod registry;
mod statement;
mod typedef;
mod types;
mod weak;

pub mod identity;
pub mod token;

pub use attributes::{AttributeArgument, CustomAttribute, NamedArgument, NamedArgumentKind};
pub use body::{ExceptionHandler, ExceptionHandlerFlags, MethodBody};
pub use builder::{
    AssemblyBuilder, EventBuilder, FieldBuilder, MethodBuilder, PropertyBuilder, TypeBuilder,
};
pub use container::{Assembly, AssemblyRc, Module, ModuleRc, Namespace};
pub use expression::{BinaryOperator, Expression, UnaryOperator, Variable};
pub use flags::{
    FieldModifiers, GenericParameterFlags, MethodModifiers, ParameterFlags, TypeAttributes,
    Visibility, MEMBER_ACCESS_MASK, TYPE_VISIBILITY_MASK,
};
pub use literal::Literal;
pub use members::{
    EventDeclaration, EventDeclarationRc, EventReference, FieldDeclaration, FieldDeclarationRc,
    FieldReference, MethodDeclaration, MethodDeclarationRc, MethodReference, Parameter,
    PropertyDeclaration, PropertyDeclarationRc, PropertyReference, CONSTRUCTOR_NAME,
    TYPE_INITIALIZER_NAME,
};
pub use registry::CodeModel;
pub use statement::{Block, CatchClause, Statement, SwitchCase};
pub use token::Token;
pub use typedef::{
    EventList, FieldList, GenericParameter, MethodList, PropertyList, TypeDeclaration,
    TypeDeclarationList, TypeDeclarationRc, TypeKind,
};
pub use types::{GenericOwner, PrimitiveKind, TypeOwner, TypeReference, TypeSignature};
pub use weak::{AssemblyRef, ModuleRef, TypeDeclarationRef, WeakRef};
