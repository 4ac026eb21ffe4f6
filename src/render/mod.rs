//! The rendering engine.
//!
//! One engine writes every target language. Declarations, statements and expressions are
//! walked by the same code; whatever differs between languages (keywords, operator spelling,
//! block structure, which constructs exist at all) is asked of the [`Syntax`] in use.
//!
//! # Architecture
//!
//! - [`Renderer`] - Entry point, validates the configuration and dispatches one
//!   [`RenderUnit`] per call
//! - `declarations` - Containers, types and members, visibility filtering and member order
//! - `statements` - Statement trees, line breaking and counted loop recognition
//! - `expressions` - Expression trees and operator precedence
//! - [`syntax`] - The [`Syntax`] strategy with the [`CSharp`] and [`VisualBasic`] implementations
//! - [`sink`] - The [`Formatter`] output sink
//!
//! # Examples
//!
//! ```rust,ignore
//! use cilrender::prelude::*;
//!
//! let renderer = Renderer::new(&model, Language::VisualBasic, RenderConfig::default())?;
//! let mut out = TextFormatter::new();
//! renderer.render(RenderUnit::Type(&declaration), &mut out)?;
//! # Ok::<(), cilrender::Error>(())
//! ```

pub(crate) mod context;
mod declarations;
mod expressions;
pub(crate) mod literals;
pub mod sink;
pub(crate) mod statements;
pub mod syntax;

pub use context::RenderContext;
pub use sink::{Entity, Formatter, Fragment, FragmentFormatter, TextFormatter};
pub use statements::{Breakable, CountedLoop, StatementState};
pub use syntax::{
    AddressKind, AttributeTarget, CSharp, CastKind, Closer, HandlerAction, Jump, Keyword, Level,
    Syntax, TypeOperator, VisualBasic,
};

use rayon::prelude::*;
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, warn};

use crate::{
    config::RenderConfig,
    emit,
    model::{
        Assembly, CodeModel, EventDeclaration, FieldDeclaration, MethodDeclaration, Module,
        Namespace, PropertyDeclaration, TypeDeclaration, TypeDeclarationRc, TypeKind,
    },
    query::{self, method_signature_text},
    Error, Result,
};

/// Output language of a [`Renderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Language {
    /// C#
    #[strum(serialize = "C#", serialize = "CSharp")]
    CSharp,
    /// Visual Basic
    #[strum(serialize = "Visual Basic", serialize = "VisualBasic")]
    VisualBasic,
    /// C# code calling the Reflection.Emit builder API
    #[strum(serialize = "Reflection.Emit", serialize = "ReflectionEmit")]
    ReflectionEmit,
}

impl Language {
    /// The syntax strategy; Reflection.Emit code is written as C#
    #[must_use]
    pub fn syntax(self) -> &'static dyn Syntax {
        match self {
            Language::CSharp | Language::ReflectionEmit => &CSharp,
            Language::VisualBasic => &VisualBasic,
        }
    }

    /// Name used in [`Error::UnsupportedConstruct`]
    #[must_use]
    pub fn syntax_name(self) -> &'static str {
        match self {
            Language::ReflectionEmit => "Reflection.Emit",
            language => language.syntax().name(),
        }
    }
}

/// One top-level object handed to [`Renderer::render`].
#[derive(Debug, Clone, Copy)]
pub enum RenderUnit<'u> {
    /// An assembly header
    Assembly(&'u Assembly),
    /// A module header
    Module(&'u Module),
    /// A namespace with its types
    Namespace(&'u Namespace),
    /// A type with its members
    Type(&'u TypeDeclaration),
    /// A method or constructor
    Method(&'u MethodDeclaration),
    /// A field
    Field(&'u FieldDeclaration),
    /// A property
    Property(&'u PropertyDeclaration),
    /// An event
    Event(&'u EventDeclaration),
}

impl RenderUnit<'_> {
    /// Name used in logs and in [`Error::Render`]
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            RenderUnit::Assembly(assembly) => assembly.identity.display_name(),
            RenderUnit::Module(module) => module.name.clone(),
            RenderUnit::Namespace(namespace) => namespace.name.clone(),
            RenderUnit::Type(declaration) => declaration.full_name(),
            RenderUnit::Method(method) => method_signature_text(method),
            RenderUnit::Field(field) => member_name(field.declaring_type(), &field.name),
            RenderUnit::Property(property) => {
                member_name(property.declaring_type(), &property.name)
            }
            RenderUnit::Event(event) => member_name(event.declaring_type(), &event.name),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            RenderUnit::Assembly(_) => "assembly",
            RenderUnit::Module(_) => "module",
            RenderUnit::Namespace(_) => "namespace",
            RenderUnit::Type(_) => "type",
            RenderUnit::Method(_) => "method",
            RenderUnit::Field(_) => "field",
            RenderUnit::Property(_) => "property",
            RenderUnit::Event(_) => "event",
        }
    }
}

fn member_name(declaring: Option<TypeDeclarationRc>, name: &str) -> String {
    match declaring {
        Some(declaring) => format!("{}.{name}", declaring.full_name()),
        None => name.to_string(),
    }
}

/// True if the member declared by a type of `declaring` is written without a body
fn in_interface(declaring: Option<TypeDeclarationRc>) -> bool {
    declaring.is_some_and(|declaring| declaring.kind() == TypeKind::Interface)
}

/// Renders model objects in one language with one configuration.
///
/// A `Renderer` holds no mutable state; every [`Renderer::render`] call builds its own
/// transient context, so one renderer can serve several threads.
pub struct Renderer<'m> {
    model: &'m CodeModel,
    language: Language,
    config: RenderConfig,
}

impl<'m> Renderer<'m> {
    /// Create a renderer over `model`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfiguration`] when `config` cannot render anything.
    pub fn new(model: &'m CodeModel, language: Language, config: RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Renderer {
            model,
            language,
            config,
        })
    }

    /// The output language
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// The configuration in use
    #[must_use]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `unit` into `out`.
    ///
    /// Output already delivered to `out` stays there when the call fails.
    ///
    /// # Errors
    /// Returns [`Error::Render`] naming the unit, wrapping the failure that aborted it.
    pub fn render(&self, unit: RenderUnit<'_>, out: &mut dyn Formatter) -> Result<()> {
        debug!(language = %self.language, kind = unit.kind(), unit = %unit.name(), "render");

        let mut cx = RenderContext::new(self.model, &self.config, self.language.syntax(), out);
        let result = if self.language == Language::ReflectionEmit {
            construction(&mut cx, unit)
        } else {
            source(&mut cx, unit)
        };

        result.map_err(|source| {
            debug!(unit = %unit.name(), error = %source, "render failed");
            Error::Render {
                unit: unit.name(),
                source: Box::new(source),
            }
        })
    }

    /// Render `unit` to plain text.
    ///
    /// # Errors
    /// See [`Renderer::render`].
    pub fn render_text(&self, unit: RenderUnit<'_>) -> Result<String> {
        let mut out = TextFormatter::new();
        self.render(unit, &mut out)?;
        Ok(out.into_text())
    }

    /// Render independent units in parallel, one text per unit in input order.
    pub fn render_all(&self, units: &[RenderUnit<'_>]) -> Vec<Result<String>> {
        units
            .par_iter()
            .map(|unit| self.render_text(*unit))
            .collect()
    }
}

/// C# or Visual Basic source of `unit`
fn source(cx: &mut RenderContext<'_>, unit: RenderUnit<'_>) -> Result<()> {
    match unit {
        RenderUnit::Assembly(assembly) => cx.assembly(assembly),
        RenderUnit::Module(module) => cx.module(module),
        RenderUnit::Namespace(namespace) => cx.namespace(namespace),
        RenderUnit::Type(declaration) => cx.type_declaration(declaration),
        RenderUnit::Method(method) => cx.method(method, in_interface(method.declaring_type())),
        RenderUnit::Field(field) => cx.field(field),
        RenderUnit::Property(property) => {
            cx.property(property, in_interface(property.declaring_type()))
        }
        RenderUnit::Event(event) => cx.event(event, in_interface(event.declaring_type())),
    }
}

/// Reflection.Emit code of `unit`; only units holding methods have any
fn construction(cx: &mut RenderContext<'_>, unit: RenderUnit<'_>) -> Result<()> {
    match unit {
        RenderUnit::Method(method) => {
            let plan = emit::plan(method)?;
            cx.construction_plan(&plan)
        }
        RenderUnit::Type(declaration) => type_construction(cx, declaration),
        RenderUnit::Namespace(namespace) => {
            let types = query::namespace_types(namespace, &cx.config.visibility);
            for (index, declaration) in types.iter().enumerate() {
                if index > 0 {
                    cx.out.write_line();
                    cx.out.write_line();
                }
                type_construction(cx, declaration)?;
            }
            Ok(())
        }
        other => Err(unsupported_error!(
            format!("{} unit", other.kind()),
            Language::ReflectionEmit.syntax_name()
        )),
    }
}

/// One plan per visible method; a method whose body cannot be planned gets a comment
fn type_construction(cx: &mut RenderContext<'_>, declaration: &TypeDeclaration) -> Result<()> {
    cx.comment(&format!("Type {}", declaration.full_name()));
    for method in query::methods(declaration, &cx.config.visibility) {
        cx.out.write_line();
        cx.out.write_line();
        match emit::plan(&method) {
            Ok(plan) => cx.construction_plan(&plan)?,
            Err(error @ (Error::MalformedBytecode { .. } | Error::UnknownInstruction { .. })) => {
                warn!(method = %method.name, %error, "method body not re-synthesized");
                cx.comment(&format!("{}: {error}", method_signature_text(&method)));
            }
            Err(error) => return Err(error),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;
    use crate::config::VisibilityConfiguration;

    #[test]
    fn test_language_names() {
        assert_eq!(Language::from_str("C#").ok(), Some(Language::CSharp));
        assert_eq!(Language::from_str("VisualBasic").ok(), Some(Language::VisualBasic));
        assert_eq!(Language::ReflectionEmit.to_string(), "Reflection.Emit");
        assert_eq!(Language::iter().count(), 3);
        assert_eq!(Language::VisualBasic.syntax_name(), "Visual Basic");
    }

    #[test]
    fn test_renderer_rejects_closed_gates() {
        let model = CodeModel::new();
        let config = RenderConfig::default().with_visibility(VisibilityConfiguration::none());
        assert!(matches!(
            Renderer::new(&model, Language::CSharp, config),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
