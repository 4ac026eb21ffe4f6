//! Expression rendering.
//!
//! Every expression kind has a precedence in the target syntax. A child is written in
//! parentheses exactly when its precedence is below the minimum its position requires, so
//! the output never carries parentheses the grammar does not need and never lacks one it does.

use crate::{
    model::{BinaryOperator, Expression, Literal, MethodReference, TypeReference, UnaryOperator},
    query::{method_reference_text, qualified_name},
    render::{
        context::RenderContext,
        sink::Entity,
        syntax::{AddressKind, CastKind, Keyword, Level, TypeOperator},
    },
    Result,
};

/// Returns true for literals written with a leading minus sign
fn is_negative(literal: &Literal) -> bool {
    match literal {
        Literal::Single(value) => value.is_sign_negative() && value.is_finite(),
        Literal::Double(value) => value.is_sign_negative() && value.is_finite(),
        other => other.as_integer().is_some_and(|value| value < 0),
    }
}

fn is_null(expression: &Expression) -> bool {
    matches!(expression, Expression::Literal(Literal::Null))
}

impl RenderContext<'_> {
    /// Precedence of a syntax level
    pub(crate) fn level(&self, level: Level) -> u8 {
        self.syntax.precedence(level)
    }

    /// Precedence of `expression` as written by the current syntax
    pub(crate) fn precedence_of(&self, expression: &Expression) -> u8 {
        let syntax = self.syntax;
        match expression {
            Expression::Literal(literal) if is_negative(literal) => syntax.precedence(Level::Unary),
            Expression::Binary { operator, .. } => syntax.binary_precedence(*operator),
            Expression::Unary { operator, .. } if operator.is_postfix() => {
                syntax.precedence(Level::Primary)
            }
            Expression::Unary { operator, .. } if operator.is_step() => {
                syntax.precedence(Level::Unary)
            }
            Expression::Unary { operator, .. } => syntax.unary_precedence(*operator),
            Expression::Assign { .. }
            | Expression::CompoundAssign { .. }
            | Expression::AnonymousMethod { .. } => syntax.precedence(Level::Assignment),
            Expression::Conditional { .. } => syntax.precedence(Level::Conditional),
            Expression::NullCoalescing { .. } => syntax.precedence(Level::NullCoalescing),
            Expression::Cast { .. } => syntax.cast_precedence(CastKind::Cast),
            Expression::TryCast { .. } => syntax.cast_precedence(CastKind::TryCast),
            Expression::CanCast { .. } => syntax.cast_precedence(CastKind::CanCast),
            Expression::AddressOf(_) | Expression::AddressDereference(_) => {
                syntax.precedence(Level::Unary)
            }
            _ => syntax.precedence(Level::Primary),
        }
    }

    /// Write `expression` in a position requiring at least precedence `min`
    pub(crate) fn expression(&mut self, expression: &Expression, min: u8) -> Result<()> {
        let statement = std::mem::take(&mut self.statement_root);
        let parenthesize = self.precedence_of(expression) < min;

        if parenthesize {
            self.write("(");
        }
        self.dispatch(expression, statement)?;
        if parenthesize {
            self.write(")");
        }
        Ok(())
    }

    /// Write `expression` at the precedence of `level`
    pub(crate) fn operand(&mut self, expression: &Expression, level: Level) -> Result<()> {
        let min = self.level(level);
        self.expression(expression, min)
    }

    fn dispatch(&mut self, expression: &Expression, statement: bool) -> Result<()> {
        let syntax = self.syntax;
        match expression {
            Expression::Literal(literal) => self.literal(literal),
            Expression::Binary {
                left,
                operator,
                right,
            } => self.binary(left, *operator, right),
            Expression::Unary { operator, operand } if operator.is_step() => {
                syntax.write_step(self, *operator, operand, statement)
            }
            Expression::Unary { operator, operand } => self.prefix(*operator, operand),
            Expression::Assign { target, value } => {
                syntax.write_assign(self, target, None, value, statement)
            }
            Expression::CompoundAssign {
                target,
                operator,
                value,
            } => syntax.write_assign(self, target, Some(*operator), value, statement),
            Expression::Conditional {
                condition,
                then_value,
                else_value,
            } => syntax.write_conditional(self, condition, then_value, else_value),
            Expression::ArgumentReference { name, .. } => {
                let text = self.reference_text(name, None);
                self.out
                    .write_reference(&text, name, Some(&Entity::Parameter(name.clone())));
                Ok(())
            }
            Expression::VariableReference(variable) => {
                self.refer_variable(variable);
                Ok(())
            }
            Expression::VariableDeclaration(variable) => {
                syntax.write_variable_declaration(self, variable)
            }
            Expression::ThisReference => {
                self.keyword(Keyword::This);
                Ok(())
            }
            Expression::BaseReference => {
                self.keyword(Keyword::Base);
                Ok(())
            }
            Expression::TypeReference(signature) => self.write_type(signature),
            Expression::FieldReference { target, field } => {
                self.member_target(target.as_deref(), &field.declaring_type)?;
                let description = format!(
                    "{}.{}",
                    qualified_name(&field.declaring_type),
                    field.name
                );
                self.refer(
                    &field.name,
                    Some(&field.declaring_type),
                    &description,
                    Entity::Field(field.clone()),
                );
                Ok(())
            }
            Expression::PropertyReference { target, property } => {
                self.member_target(target.as_deref(), &property.declaring_type)?;
                let description = format!(
                    "{}.{}",
                    qualified_name(&property.declaring_type),
                    property.name
                );
                self.refer(
                    &property.name,
                    Some(&property.declaring_type),
                    &description,
                    Entity::Property(property.clone()),
                );
                Ok(())
            }
            Expression::PropertyIndexer {
                target,
                property,
                indices,
            } => {
                self.operand(target, Level::Primary)?;
                if syntax.named_indexers() && property.name != "Item" {
                    self.write(".");
                    let description = format!(
                        "{}.{}",
                        qualified_name(&property.declaring_type),
                        property.name
                    );
                    self.refer(
                        &property.name,
                        Some(&property.declaring_type),
                        &description,
                        Entity::Property(property.clone()),
                    );
                }
                self.indices(indices)
            }
            Expression::EventReference { target, event } => {
                self.member_target(target.as_deref(), &event.declaring_type)?;
                let description = format!(
                    "{}.{}",
                    qualified_name(&event.declaring_type),
                    event.name
                );
                self.refer(
                    &event.name,
                    Some(&event.declaring_type),
                    &description,
                    Entity::Event(event.clone()),
                );
                Ok(())
            }
            Expression::MethodReference { target, method } => {
                if let Some(prefix) = syntax.method_group_prefix() {
                    self.write_keyword(prefix);
                    self.write(" ");
                }
                self.method_name(target.as_deref(), method)
            }
            Expression::MethodInvoke { method, arguments } => self.invoke(method, arguments),
            Expression::DelegateInvoke { target, arguments } => {
                self.operand(target, Level::Primary)?;
                self.arguments(arguments)
            }
            Expression::DelegateCreate {
                delegate_type,
                target,
                method,
            } => syntax.write_delegate_create(self, delegate_type, target.as_deref(), method),
            Expression::ObjectCreate {
                constructor,
                arguments,
            } => {
                self.keyword(Keyword::New);
                self.write(" ");
                self.write_type_reference(&constructor.declaring_type)?;
                self.arguments(arguments)
            }
            Expression::ArrayCreate {
                element_type,
                dimensions,
                initializer,
            } => syntax.write_array_create(self, element_type, dimensions, initializer.as_deref()),
            Expression::ArrayIndexer { target, indices } => {
                self.operand(target, Level::Primary)?;
                self.indices(indices)
            }
            Expression::ArrayInitializer(values) => {
                if values.is_empty() {
                    self.write("{}");
                } else {
                    self.write("{ ");
                    self.expression_list(values)?;
                    self.write(" }");
                }
                Ok(())
            }
            Expression::Cast { target_type, value } => {
                syntax.write_cast(self, CastKind::Cast, target_type, value)
            }
            Expression::TryCast { target_type, value } => {
                syntax.write_cast(self, CastKind::TryCast, target_type, value)
            }
            Expression::CanCast { target_type, value } => {
                syntax.write_cast(self, CastKind::CanCast, target_type, value)
            }
            Expression::TypeOf(signature) => {
                syntax.write_type_operator(self, TypeOperator::TypeOf, signature)
            }
            Expression::SizeOf(signature) => {
                syntax.write_type_operator(self, TypeOperator::SizeOf, signature)
            }
            Expression::DefaultValue(signature) => {
                syntax.write_type_operator(self, TypeOperator::Default, signature)
            }
            Expression::AddressOf(operand) => syntax.write_address(self, AddressKind::Of, operand),
            Expression::AddressDereference(operand) => {
                syntax.write_address(self, AddressKind::Dereference, operand)
            }
            Expression::AddressOut(operand) => {
                syntax.write_address(self, AddressKind::Out, operand)
            }
            Expression::AddressReference(operand) => {
                syntax.write_address(self, AddressKind::Reference, operand)
            }
            Expression::NullCoalescing { value, fallback } => {
                syntax.write_null_coalescing(self, value, fallback)
            }
            Expression::AnonymousMethod {
                parameters,
                return_type,
                body,
            } => syntax.write_anonymous_method(self, parameters, return_type, body),
            Expression::Snippet(text) => {
                self.write(text);
                Ok(())
            }
        }
    }

    /// Left operand at the operator's precedence, right operand one above, so that
    /// left-associative chains stay flat and right-nested ones keep their parentheses
    fn binary(
        &mut self,
        left: &Expression,
        operator: BinaryOperator,
        right: &Expression,
    ) -> Result<()> {
        let precedence = self.syntax.binary_precedence(operator);
        let null_operand = is_null(left) || is_null(right);

        self.expression(left, precedence)?;
        self.write(" ");
        let text = self.syntax.binary_operator(operator, null_operand);
        self.write_operator(text);
        self.write(" ");
        self.expression(right, precedence + 1)
    }

    /// Symbolic operators as text, word operators as keywords
    pub(crate) fn write_operator(&mut self, text: &str) {
        if text.starts_with(|c: char| c.is_ascii_alphabetic()) {
            self.write_keyword(text);
        } else {
            self.write(text);
        }
    }

    fn prefix(&mut self, operator: UnaryOperator, operand: &Expression) -> Result<()> {
        let text = self.syntax.unary_operator(operator);
        self.write_operator(text);

        // `- -x` and `-(-1)` must not fuse into a decrement or a different literal
        let doubled = operator == UnaryOperator::Negate
            && match operand {
                Expression::Literal(literal) => is_negative(literal),
                Expression::Unary { operator, .. } => {
                    matches!(
                        operator,
                        UnaryOperator::Negate
                            | UnaryOperator::PreDecrement
                            | UnaryOperator::PreIncrement
                    )
                }
                _ => false,
            };
        if doubled {
            self.write("(");
            self.expression(operand, 0)?;
            self.write(")");
            return Ok(());
        }

        let precedence = self.syntax.unary_precedence(operator);
        self.expression(operand, precedence)
    }

    /// `target.` of a member access, or the declaring type for static access
    pub(crate) fn member_target(
        &mut self,
        target: Option<&Expression>,
        declaring: &TypeReference,
    ) -> Result<()> {
        match target {
            Some(target) => self.operand(target, Level::Primary)?,
            None => self.write_type_reference(declaring)?,
        }
        self.write(".");
        Ok(())
    }

    /// `target.Name<Args>` of a method group or call
    pub(crate) fn method_name(
        &mut self,
        target: Option<&Expression>,
        method: &MethodReference,
    ) -> Result<()> {
        self.member_target(target, &method.declaring_type)?;
        let description = method_reference_text(method);
        self.refer(
            &method.name,
            Some(&method.declaring_type),
            &description,
            Entity::Method(method.clone()),
        );
        self.generic_arguments(&method.generic_arguments)
    }

    fn invoke(&mut self, method: &Expression, arguments: &[Expression]) -> Result<()> {
        let Expression::MethodReference {
            target,
            method: reference,
        } = method
        else {
            self.operand(method, Level::Primary)?;
            return self.arguments(arguments);
        };

        let chained = reference.is_constructor()
            && matches!(
                target.as_deref(),
                Some(Expression::ThisReference | Expression::BaseReference)
            );
        if chained {
            // `base(...)` / `MyBase.New(...)`
            if let Some(target) = target {
                self.operand(target, Level::Primary)?;
            }
            if let Some(member) = self.syntax.chained_constructor_member() {
                self.write(".");
                let description = method_reference_text(reference);
                self.out.write_reference(
                    member,
                    &description,
                    Some(&Entity::Method(reference.clone())),
                );
            }
            return self.arguments(arguments);
        }

        self.method_name(target.as_deref(), reference)?;
        self.arguments(arguments)
    }

    /// Index list in the syntax's index brackets
    fn indices(&mut self, indices: &[Expression]) -> Result<()> {
        let (open, close) = self.syntax.index_brackets();
        self.write(open);
        self.expression_list(indices)?;
        self.write(close);
        Ok(())
    }
}
