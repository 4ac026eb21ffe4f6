//! Per-call rendering context.
//!
//! A [`RenderContext`] is created for every [`crate::Renderer::render`] call and dropped when
//! it returns. It bundles the read-only inputs (model, configuration, syntax) with the output
//! sink and the mutable statement state, and provides the name, type and literal writers every
//! other part of the engine builds on.

use crate::{
    config::RenderConfig,
    model::{
        AttributeArgument, CodeModel, CustomAttribute, Expression, FieldReference, Literal,
        NamedArgumentKind, Parameter, PrimitiveKind, PropertyReference, TypeReference,
        TypeSignature, Variable, CONSTRUCTOR_NAME, TYPE_INITIALIZER_NAME,
    },
    query::{field_reference_text, qualified_name, signature_name, strip_arity},
    render::{
        literals::{format_float, format_integer, format_single, non_finite_member},
        sink::{Entity, Formatter},
        statements::StatementState,
        syntax::{AttributeTarget, CastKind, Keyword, Syntax, TypeOperator},
    },
    Result,
};

/// Mutable state and shared writers of one render call.
pub struct RenderContext<'a> {
    pub(crate) model: &'a CodeModel,
    pub(crate) config: &'a RenderConfig,
    pub(crate) syntax: &'static dyn Syntax,
    pub(crate) out: &'a mut dyn Formatter,
    pub(crate) state: StatementState,
    /// Set while the root expression of an expression statement is dispatched
    pub(crate) statement_root: bool,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(
        model: &'a CodeModel,
        config: &'a RenderConfig,
        syntax: &'static dyn Syntax,
        out: &'a mut dyn Formatter,
    ) -> Self {
        RenderContext {
            model,
            config,
            syntax,
            out,
            state: StatementState::default(),
            statement_root: false,
        }
    }

    pub(crate) fn write(&mut self, text: &str) {
        self.out.write(text);
    }

    pub(crate) fn write_keyword(&mut self, keyword: &str) {
        self.out.write_keyword(keyword);
    }

    pub(crate) fn keyword(&mut self, keyword: Keyword) {
        let text = self.syntax.keyword(keyword);
        self.out.write_keyword(text);
    }

    pub(crate) fn terminate(&mut self) {
        let terminator = self.syntax.terminator();
        if !terminator.is_empty() {
            self.out.write(terminator);
        }
    }

    pub(crate) fn comment(&mut self, text: &str) {
        let comment = format!("{} {text}", self.syntax.comment_prefix());
        self.out.write_comment(&comment);
    }

    /// Identifier text of a declared name.
    ///
    /// Compiler-generated names are reduced to identifier characters and keywords are
    /// escaped, so a declaration and its references always spell the same identifier.
    pub(crate) fn declaration_text(&self, name: &str) -> String {
        let name = strip_arity(name);
        if is_generated(name) {
            sanitize(name)
        } else if self.syntax.is_keyword(name) {
            self.syntax.escape_keyword(name)
        } else {
            name.to_string()
        }
    }

    /// Identifier text of a referenced name.
    ///
    /// Constructor names map to the syntax's constructor spelling, everything else is spelled
    /// as its declaration.
    pub(crate) fn reference_text(&self, name: &str, declaring: Option<&TypeReference>) -> String {
        if name == CONSTRUCTOR_NAME || name == TYPE_INITIALIZER_NAME {
            return match declaring {
                Some(declaring) => self.syntax.constructor_name(declaring),
                None => self.syntax.constructor_name(&TypeReference::new("", name)),
            };
        }
        self.declaration_text(name)
    }

    pub(crate) fn declare(&mut self, name: &str, target: Option<Entity>) {
        let text = self.declaration_text(name);
        self.out.write_declaration(&text, target.as_ref());
    }

    pub(crate) fn refer(
        &mut self,
        name: &str,
        declaring: Option<&TypeReference>,
        description: &str,
        target: Entity,
    ) {
        let text = self.reference_text(name, declaring);
        self.out.write_reference(&text, description, Some(&target));
    }

    pub(crate) fn declare_variable(&mut self, variable: &Variable) {
        let text = self.declaration_text(&variable.name);
        self.out.write_declaration(&text, Some(&Entity::Variable(variable.name.clone())));
    }

    pub(crate) fn refer_variable(&mut self, variable: &Variable) {
        let description = signature_name(&variable.variable_type);
        self.refer(
            &variable.name,
            None,
            &description,
            Entity::Variable(variable.name.clone()),
        );
    }

    pub(crate) fn declare_parameter(&mut self, parameter: &Parameter) {
        let text = self.declaration_text(&parameter.name);
        self.out
            .write_declaration(&text, Some(&Entity::Parameter(parameter.name.clone())));
    }

    /// A type use
    pub(crate) fn write_type(&mut self, signature: &TypeSignature) -> Result<()> {
        match signature {
            TypeSignature::Void => {
                match self.syntax.primitive_keyword(PrimitiveKind::Void) {
                    Some(keyword) => self.out.write_keyword(keyword),
                    None => self.write_type_reference(&TypeReference::new("System", "Void"))?,
                }
                Ok(())
            }
            TypeSignature::Named(reference) => self.write_type_reference(reference),
            TypeSignature::Array { element, rank } => {
                self.write_type(element)?;
                let (open, close) = self.syntax.index_brackets();
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                self.write(&format!("{open}{commas}{close}"));
                Ok(())
            }
            TypeSignature::Pointer(inner) => {
                if !self.syntax.supports_pointers() {
                    return Err(unsupported_error!("pointer type", self.syntax.name()));
                }
                self.write_type(inner)?;
                self.write("*");
                Ok(())
            }
            // Direction is part of the parameter, not of the type
            TypeSignature::ByRef(inner) => self.write_type(inner),
            TypeSignature::GenericParameter { name, .. } => {
                let text = self.declaration_text(name);
                self.out.write_reference(&text, name, None);
                Ok(())
            }
        }
    }

    /// A named type, nested types qualified by their enclosing types
    pub(crate) fn write_type_reference(&mut self, reference: &TypeReference) -> Result<()> {
        if let Some(keyword) = reference
            .primitive_kind()
            .and_then(|kind| self.syntax.primitive_keyword(kind))
        {
            self.out.write_keyword(keyword);
            return Ok(());
        }

        if let Some(enclosing) = reference.enclosing() {
            self.write_type_reference(enclosing)?;
            self.write(".");
        }

        let description = qualified_name(reference);
        self.refer(
            &reference.name,
            None,
            &description,
            Entity::Type(reference.clone()),
        );
        self.generic_arguments(&reference.generic_arguments)
    }

    pub(crate) fn generic_arguments(&mut self, arguments: &[TypeSignature]) -> Result<()> {
        if arguments.is_empty() {
            return Ok(());
        }

        let (open, close) = self.syntax.generic_brackets();
        self.write(open);
        for (index, argument) in arguments.iter().enumerate() {
            if index > 0 {
                self.write(", ");
            }
            self.write_type(argument)?;
        }
        self.write(close);
        Ok(())
    }

    /// Comma separated expressions at the lowest precedence
    pub(crate) fn expression_list(&mut self, expressions: &[Expression]) -> Result<()> {
        for (index, expression) in expressions.iter().enumerate() {
            if index > 0 {
                self.write(", ");
            }
            self.expression(expression, 0)?;
        }
        Ok(())
    }

    /// `(arguments)`
    pub(crate) fn arguments(&mut self, arguments: &[Expression]) -> Result<()> {
        self.write("(");
        self.expression_list(arguments)?;
        self.write(")");
        Ok(())
    }

    /// `(parameters)` of a declaration
    pub(crate) fn parameters(&mut self, parameters: &[Parameter]) -> Result<()> {
        self.write("(");
        for (index, parameter) in parameters.iter().enumerate() {
            if index > 0 {
                self.write(", ");
            }
            let syntax = self.syntax;
            syntax.write_parameter(self, parameter)?;
        }
        self.write(")");
        Ok(())
    }

    /// A constant
    pub(crate) fn literal(&mut self, literal: &Literal) -> Result<()> {
        match literal {
            Literal::Null => self.keyword(Keyword::Null),
            Literal::Boolean(true) => self.keyword(Keyword::True),
            Literal::Boolean(false) => self.keyword(Keyword::False),
            Literal::Char(value) => {
                let text = self.syntax.char_literal(*value);
                self.out.write_literal(&text);
            }
            Literal::String(value) => {
                let text = self.syntax.string_literal(value);
                self.out.write_literal(&text);
            }
            Literal::Single(value) => {
                if let Some(member) = non_finite_member(f64::from(*value)) {
                    return self.non_finite(PrimitiveKind::Single, member);
                }
                let text = format!("{}{}", format_single(*value), self.syntax.single_suffix());
                self.out.write_literal(&text);
            }
            Literal::Double(value) => {
                if let Some(member) = non_finite_member(*value) {
                    return self.non_finite(PrimitiveKind::Double, member);
                }
                self.out.write_literal(&format_float(*value));
            }
            integer => {
                // every remaining variant is an integer
                let value = integer.as_integer().unwrap_or_default();
                let text = format!(
                    "{}{}",
                    format_integer(value, self.config.number_format, self.syntax.hex_prefix()),
                    self.syntax.integer_suffix(integer)
                );
                self.out.write_literal(&text);
            }
        }
        Ok(())
    }

    fn non_finite(&mut self, kind: PrimitiveKind, member: &str) -> Result<()> {
        self.write_type_reference(&TypeReference::primitive(kind))?;
        self.write(".");
        self.out.write_reference(member, member, None);
        Ok(())
    }

    /// Custom attributes, one per line, each followed by a line break
    pub(crate) fn attributes(
        &mut self,
        attributes: &[CustomAttribute],
        target: Option<AttributeTarget>,
    ) -> Result<()> {
        if !self.config.show_custom_attributes {
            return Ok(());
        }

        for attribute in attributes {
            self.attribute(attribute, target)?;
            self.out.write_line();
        }
        Ok(())
    }

    /// One custom attribute: positional arguments, then named fields, then named properties
    pub(crate) fn attribute(
        &mut self,
        attribute: &CustomAttribute,
        target: Option<AttributeTarget>,
    ) -> Result<()> {
        let (open, close) = self.syntax.attribute_brackets();
        self.write(open);
        if let Some(target) = target {
            let prefix = self.syntax.attribute_target(target);
            self.write_keyword(prefix);
            self.write(": ");
        }

        let attribute_type = attribute.attribute_type();
        let name = strip_arity(&attribute_type.name);
        let short = match name.strip_suffix("Attribute") {
            Some(short) if !short.is_empty() => short,
            _ => name,
        };
        let description = qualified_name(attribute_type);
        self.refer(
            short,
            None,
            &description,
            Entity::Method(attribute.constructor.clone()),
        );

        let (fields, properties) = attribute.partitioned_named();
        if !attribute.positional.is_empty() || !attribute.named.is_empty() {
            self.write("(");
            let mut first = true;
            for argument in &attribute.positional {
                if !first {
                    self.write(", ");
                }
                first = false;
                self.attribute_argument(argument)?;
            }
            for named in fields.into_iter().chain(properties) {
                if !first {
                    self.write(", ");
                }
                first = false;
                let entity = match named.kind {
                    NamedArgumentKind::Field => {
                        Entity::Field(FieldReference::new(
                            attribute_type.clone(),
                            &named.name,
                            TypeSignature::Void,
                        ))
                    }
                    NamedArgumentKind::Property => {
                        Entity::Property(PropertyReference::new(
                            attribute_type.clone(),
                            &named.name,
                            TypeSignature::Void,
                        ))
                    }
                };
                self.refer(&named.name, None, &named.name, entity);
                let separator = self.syntax.named_argument_separator();
                self.write(separator);
                self.attribute_argument(&named.value)?;
            }
            self.write(")");
        }

        self.write(close);
        Ok(())
    }

    fn attribute_argument(&mut self, argument: &AttributeArgument) -> Result<()> {
        match argument {
            AttributeArgument::Literal(literal) => self.literal(literal),
            AttributeArgument::Type(signature) => {
                let syntax = self.syntax;
                syntax.write_type_operator(self, TypeOperator::TypeOf, signature)
            }
            AttributeArgument::Enum { enum_type, value } => self.enum_value(enum_type, value),
            AttributeArgument::Array { elements: None, .. } => {
                self.keyword(Keyword::Null);
                Ok(())
            }
            AttributeArgument::Array {
                element_type,
                elements: Some(elements),
            } => {
                let values: Vec<Expression> = elements
                    .iter()
                    .map(|element| match element {
                        AttributeArgument::Literal(literal) => {
                            Expression::Literal(literal.clone())
                        }
                        AttributeArgument::Type(signature) => Expression::TypeOf(signature.clone()),
                        AttributeArgument::Enum { enum_type, value } => Expression::Cast {
                            target_type: TypeSignature::Named(enum_type.clone()),
                            value: Box::new(Expression::Literal(value.clone())),
                        },
                        AttributeArgument::Array { .. } => {
                            Expression::Literal(Literal::Null)
                        }
                    })
                    .collect();
                let initializer = Expression::ArrayInitializer(values);
                let syntax = self.syntax;
                syntax.write_array_create(self, element_type, &[], Some(&initializer))
            }
        }
    }

    /// An enum constant: the matching literal field when the enum resolves, a cast otherwise
    fn enum_value(&mut self, enum_type: &TypeReference, value: &Literal) -> Result<()> {
        if let Some(declaration) = self.model.resolve_type(enum_type) {
            let member = declaration
                .fields
                .iter()
                .map(|(_, field)| field.clone())
                .find(|field| field.is_literal() && field.constant.as_ref() == Some(value));
            if let Some(field) = member {
                self.write_type_reference(enum_type)?;
                self.write(".");
                let reference = field.reference();
                let description = field_reference_text(&reference);
                self.refer(&field.name, None, &description, Entity::Field(reference));
                return Ok(());
            }
        }

        let syntax = self.syntax;
        syntax.write_cast(
            self,
            CastKind::Cast,
            &TypeSignature::Named(enum_type.clone()),
            &Expression::Literal(value.clone()),
        )
    }
}

/// Returns true for names no source language could have declared
fn is_generated(name: &str) -> bool {
    name.contains(['<', '>', '$', '.'])
}

/// Replace every character that cannot appear in an identifier with `_`
pub(crate) fn sanitize(name: &str) -> String {
    let mut text: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    match text.chars().next() {
        Some(c) if !c.is_ascii_digit() => {}
        _ => text.insert(0, '_'),
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{Statement, TypeBuilder},
        render::{Language, RenderUnit},
        test::{int32, model_of, render, sample_module},
    };

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("<Main>b__0"), "_Main_b__0");
        assert_eq!(sanitize("CS$<>8__locals1"), "CS___8__locals1");
        assert_eq!(sanitize("1st"), "_1st");
        assert!(is_generated("<Count>k__BackingField"));
        assert!(!is_generated("Count"));
    }

    #[test]
    fn test_generated_names_match_between_declaration_and_use() {
        let (builder, module) = sample_module();
        let backing = FieldReference::new(
            TypeReference::new("Sample", "Holder"),
            "<Count>k__BackingField",
            int32(),
        );
        let declaration = TypeBuilder::class("Sample", "Holder")
            .field("<Count>k__BackingField", int32(), |field| field)
            .method("Read", |method| {
                method.returns(int32()).statements(vec![Statement::Return(Some(
                    Expression::FieldReference {
                        target: Some(Box::new(Expression::ThisReference)),
                        field: backing,
                    },
                ))])
            })
            .build_in(&module);
        let model = model_of(builder);

        for language in [Language::CSharp, Language::VisualBasic] {
            let text = render(
                &model,
                language,
                RenderConfig::default(),
                RenderUnit::Type(&declaration),
            );
            assert_eq!(text.matches("_Count_k__BackingField").count(), 2, "{text}");
            assert!(!text.contains("<Count>"), "{text}");
        }
    }
}
