// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(clippy::too_many_arguments)]

//! # cilrender
//!
//! Rendering backend for .NET decompilers. `cilrender` takes a fully reconstructed, read-only
//! code model (assemblies, modules, types, members and a statement/expression tree per method
//! body) and writes it as source text in a target syntax:
//!
//! - **C#** and **Visual Basic** through one rendering engine parameterized by a
//!   [`render::Syntax`] strategy
//! - **Reflection.Emit** construction code, re-synthesized from a method's CIL instruction
//!   stream by the [`emit`] backend
//!
//! Output is not a string but a stream of typed fragments (keywords, literals, declarations,
//! cross-references, ...) delivered to a [`render::Formatter`]. [`render::TextFormatter`]
//! collects plain text, [`render::FragmentFormatter`] keeps the typed fragments for hosts that
//! colorize or hyperlink the output.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cilrender::prelude::*;
//!
//! let model = CodeModel::new();
//! model.add_assembly(assembly.clone());
//!
//! let renderer = Renderer::new(&model, Language::CSharp, RenderConfig::default())?;
//! let mut out = TextFormatter::new();
//! renderer.render(RenderUnit::Type(&my_type), &mut out)?;
//! println!("{}", out.text());
//! # Ok::<(), cilrender::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`model`] - The code model supplied by the decompiler, plus builders and the
//!   [`model::CodeModel`] registry resolving references to declarations
//! - [`query`] - Derived facts over the model: names, visibility, interfaces, member listings
//! - [`assembly`] - CIL opcode table, operand kinds and instruction sizes
//! - [`render`] - Expression, statement and declaration renderers and the output sink
//! - [`emit`] - The Reflection.Emit backend
//! - [`config`] - Rendering configuration and visibility gates
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`](Result). Constructs a target syntax cannot
//! express abort the current render call with [`Error::UnsupportedConstruct`]; broken
//! instruction streams surface as [`Error::MalformedBytecode`] or
//! [`Error::UnknownInstruction`].

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
pub mod prelude;

/// CIL opcode classification based on ECMA-335.
///
/// The static opcode table maps every legal opcode to its mnemonic, operand kind and flow
/// behaviour. It is used to compute instruction sizes, validate instruction streams and
/// collect branch targets.
///
/// # Key Types
///
/// - [`assembly::Instruction`] - A decoded instruction as supplied by the model provider
/// - [`assembly::Operand`] - Instruction operands (immediates, targets, member references)
/// - [`assembly::OperandKind`] - Operand classification of an opcode
///
/// # Main Functions
///
/// - [`assembly::operand_kind`] - Classify an opcode
/// - [`assembly::instruction_size`] - Encoded size of an instruction
/// - [`assembly::validate_stream`] - Check the offset/size invariant of a method body
pub mod assembly;

/// Rendering configuration.
pub mod config;

/// Reflection.Emit backend, re-synthesizing a method body as builder API calls.
pub mod emit;

/// The read-only code model consumed by the renderers.
pub mod model;

/// Pure helper functions computing derived facts over the model.
pub mod query;

/// The rendering engine and its output sink.
pub mod render;

/// `cilrender` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `cilrender` Error type
///
/// One enum covering rendering, model, bytecode and configuration failures.
pub use error::Error;

pub use config::{NumberFormat, RenderConfig, VisibilityConfiguration};
pub use model::CodeModel;
pub use render::{Language, RenderUnit, Renderer};
