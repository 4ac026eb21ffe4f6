//! The expression taxonomy of decompiled method bodies.
//!
//! [`Expression`] is a closed sum type; every kind has exactly one representation and the
//! renderers match on it exhaustively.

use strum::Display;

use crate::model::{
    literal::Literal,
    members::{EventReference, FieldReference, MethodReference, Parameter, PropertyReference},
    statement::Block,
    types::TypeSignature,
};

/// A local variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Variable name
    pub name: String,
    /// Variable type
    pub variable_type: TypeSignature,
    /// Slot index in the local signature
    pub index: u32,
    /// Pinned local (`fixed`)
    pub pinned: bool,
}

impl Variable {
    /// Create an unpinned local variable
    #[must_use]
    pub fn new(name: &str, variable_type: TypeSignature, index: u32) -> Self {
        Variable {
            name: name.to_string(),
            variable_type,
            index,
            pinned: false,
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%` / `Mod`
    Modulus,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// Reference equality
    IdentityEquality,
    /// Reference inequality
    IdentityInequality,
    /// Value equality
    ValueEquality,
    /// Value inequality
    ValueInequality,
    /// `|` / `Or`
    BitwiseOr,
    /// `&` / `And`
    BitwiseAnd,
    /// `^` / `Xor`
    BitwiseExclusiveOr,
    /// `||` / `OrElse`
    BooleanOr,
    /// `&&` / `AndAlso`
    BooleanAnd,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
}

impl BinaryOperator {
    /// Returns true for the relational and equality operators
    #[must_use]
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::IdentityEquality
                | BinaryOperator::IdentityInequality
                | BinaryOperator::ValueEquality
                | BinaryOperator::ValueInequality
                | BinaryOperator::LessThan
                | BinaryOperator::LessThanOrEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanOrEqual
        )
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum UnaryOperator {
    /// `-x`
    Negate,
    /// `!x` / `Not x`
    BooleanNot,
    /// `~x` / `Not x`
    BitwiseNot,
    /// `++x`
    PreIncrement,
    /// `--x`
    PreDecrement,
    /// `x++`
    PostIncrement,
    /// `x--`
    PostDecrement,
}

impl UnaryOperator {
    /// Returns true for the operators written after their operand
    #[must_use]
    pub fn is_postfix(self) -> bool {
        matches!(self, UnaryOperator::PostIncrement | UnaryOperator::PostDecrement)
    }

    /// Returns true for the four increment and decrement operators
    #[must_use]
    pub fn is_step(self) -> bool {
        matches!(
            self,
            UnaryOperator::PreIncrement
                | UnaryOperator::PreDecrement
                | UnaryOperator::PostIncrement
                | UnaryOperator::PostDecrement
        )
    }
}

/// An expression of a decompiled method body.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A constant
    Literal(Literal),
    /// `left op right`
    Binary {
        /// Left operand
        left: Box<Expression>,
        /// Operator
        operator: BinaryOperator,
        /// Right operand
        right: Box<Expression>,
    },
    /// Prefix or postfix operator application
    Unary {
        /// Operator
        operator: UnaryOperator,
        /// Operand
        operand: Box<Expression>,
    },
    /// `target = value`
    Assign {
        /// Assigned location
        target: Box<Expression>,
        /// Assigned value
        value: Box<Expression>,
    },
    /// `target op= value`
    CompoundAssign {
        /// Assigned location
        target: Box<Expression>,
        /// Operator
        operator: BinaryOperator,
        /// Right operand
        value: Box<Expression>,
    },
    /// `condition ? then_value : else_value`
    Conditional {
        /// Condition
        condition: Box<Expression>,
        /// Value if true
        then_value: Box<Expression>,
        /// Value if false
        else_value: Box<Expression>,
    },
    /// Use of a method parameter
    ArgumentReference {
        /// Parameter name
        name: String,
        /// Parameter position
        position: u32,
    },
    /// Use of a local variable
    VariableReference(Variable),
    /// Declaration of a local variable, usually as the target of an assignment
    VariableDeclaration(Variable),
    /// `this` / `Me`
    ThisReference,
    /// `base` / `MyBase`
    BaseReference,
    /// A type used as an expression, e.g. the target of a static member access
    TypeReference(TypeSignature),
    /// Field access; a `None` target is a static access through the declaring type
    FieldReference {
        /// Instance expression
        target: Option<Box<Expression>>,
        /// The field
        field: FieldReference,
    },
    /// Property access; a `None` target is a static access through the declaring type
    PropertyReference {
        /// Instance expression
        target: Option<Box<Expression>>,
        /// The property
        property: PropertyReference,
    },
    /// Indexed property access, `target[indices]`
    PropertyIndexer {
        /// Instance expression
        target: Box<Expression>,
        /// The indexer property
        property: PropertyReference,
        /// Index arguments
        indices: Vec<Expression>,
    },
    /// Event access; a `None` target is a static access through the declaring type
    EventReference {
        /// Instance expression
        target: Option<Box<Expression>>,
        /// The event
        event: EventReference,
    },
    /// A method group; a `None` target is a static access through the declaring type
    MethodReference {
        /// Instance expression
        target: Option<Box<Expression>>,
        /// The method
        method: MethodReference,
    },
    /// Invocation of a method group
    MethodInvoke {
        /// The invoked method, usually a [`Expression::MethodReference`]
        method: Box<Expression>,
        /// Arguments
        arguments: Vec<Expression>,
    },
    /// Invocation of a delegate value
    DelegateInvoke {
        /// The delegate
        target: Box<Expression>,
        /// Arguments
        arguments: Vec<Expression>,
    },
    /// `new D(target.Method)`
    DelegateCreate {
        /// Delegate type
        delegate_type: TypeSignature,
        /// Instance the method is bound to; `None` for static methods
        target: Option<Box<Expression>>,
        /// The bound method
        method: MethodReference,
    },
    /// `new T(arguments)`
    ObjectCreate {
        /// The constructor
        constructor: MethodReference,
        /// Constructor arguments
        arguments: Vec<Expression>,
    },
    /// `new T[dimensions] { initializer }`
    ArrayCreate {
        /// Element type
        element_type: TypeSignature,
        /// Dimension lengths
        dimensions: Vec<Expression>,
        /// Optional initializer, an [`Expression::ArrayInitializer`]
        initializer: Option<Box<Expression>>,
    },
    /// `target[indices]` on an array
    ArrayIndexer {
        /// The array
        target: Box<Expression>,
        /// Indices
        indices: Vec<Expression>,
    },
    /// `{ a, b, c }`
    ArrayInitializer(Vec<Expression>),
    /// `(T)value`
    Cast {
        /// Target type
        target_type: TypeSignature,
        /// Converted value
        value: Box<Expression>,
    },
    /// `value as T`
    TryCast {
        /// Target type
        target_type: TypeSignature,
        /// Converted value
        value: Box<Expression>,
    },
    /// `value is T`
    CanCast {
        /// Tested type
        target_type: TypeSignature,
        /// Tested value
        value: Box<Expression>,
    },
    /// `typeof(T)`
    TypeOf(TypeSignature),
    /// `sizeof(T)`
    SizeOf(TypeSignature),
    /// `default(T)`
    DefaultValue(TypeSignature),
    /// `&x`
    AddressOf(Box<Expression>),
    /// `*x`
    AddressDereference(Box<Expression>),
    /// `out x`
    AddressOut(Box<Expression>),
    /// `ref x`
    AddressReference(Box<Expression>),
    /// `value ?? fallback`
    NullCoalescing {
        /// Tested value
        value: Box<Expression>,
        /// Value if null
        fallback: Box<Expression>,
    },
    /// `delegate (parameters) { body }`
    AnonymousMethod {
        /// Parameters
        parameters: Vec<Parameter>,
        /// Return type
        return_type: TypeSignature,
        /// Body
        body: Block,
    },
    /// Verbatim text supplied by the decompiler
    Snippet(String),
}

impl Expression {
    /// A literal expression
    #[must_use]
    pub fn literal(value: impl Into<Literal>) -> Self {
        Expression::Literal(value.into())
    }

    /// A reference to a local variable
    #[must_use]
    pub fn variable(variable: &Variable) -> Self {
        Expression::VariableReference(variable.clone())
    }

    /// `left op right`
    #[must_use]
    pub fn binary(left: Expression, operator: BinaryOperator, right: Expression) -> Self {
        Expression::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    /// Prefix or postfix operator application
    #[must_use]
    pub fn unary(operator: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary {
            operator,
            operand: Box::new(operand),
        }
    }

    /// `target = value`
    #[must_use]
    pub fn assign(target: Expression, value: Expression) -> Self {
        Expression::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    /// A call to `method` on `target`, or a static call when `target` is `None`
    #[must_use]
    pub fn call(
        target: Option<Expression>,
        method: MethodReference,
        arguments: Vec<Expression>,
    ) -> Self {
        Expression::MethodInvoke {
            method: Box::new(Expression::MethodReference {
                target: target.map(Box::new),
                method,
            }),
            arguments,
        }
    }

    /// The local variable this expression reads or declares, if any
    #[must_use]
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Expression::VariableReference(variable) | Expression::VariableDeclaration(variable) => {
                Some(variable)
            }
            _ => None,
        }
    }

    /// Returns true if this expression mentions the variable named `name` anywhere in its
    /// immediate operands
    #[must_use]
    pub fn references_variable(&self, name: &str) -> bool {
        match self {
            Expression::VariableReference(variable) | Expression::VariableDeclaration(variable) => {
                variable.name == name
            }
            Expression::Binary { left, right, .. } => {
                left.references_variable(name) || right.references_variable(name)
            }
            Expression::Unary { operand, .. } => operand.references_variable(name),
            Expression::Cast { value, .. } => value.references_variable(name),
            _ => false,
        }
    }

    /// Returns true if the variable named `name` occurs anywhere in this expression,
    /// including nested lambda bodies
    #[must_use]
    pub fn uses_variable(&self, name: &str) -> bool {
        let any = |expressions: &[Expression]| expressions.iter().any(|e| e.uses_variable(name));
        let boxed = |expression: &Option<Box<Expression>>| {
            expression.as_ref().is_some_and(|e| e.uses_variable(name))
        };

        match self {
            Expression::VariableReference(variable) | Expression::VariableDeclaration(variable) => {
                variable.name == name
            }
            Expression::Binary { left, right, .. }
            | Expression::Assign {
                target: left,
                value: right,
            }
            | Expression::CompoundAssign {
                target: left,
                value: right,
                ..
            }
            | Expression::NullCoalescing {
                value: left,
                fallback: right,
            } => left.uses_variable(name) || right.uses_variable(name),
            Expression::Conditional {
                condition,
                then_value,
                else_value,
            } => {
                condition.uses_variable(name)
                    || then_value.uses_variable(name)
                    || else_value.uses_variable(name)
            }
            Expression::Unary { operand: inner, .. }
            | Expression::Cast { value: inner, .. }
            | Expression::TryCast { value: inner, .. }
            | Expression::CanCast { value: inner, .. }
            | Expression::AddressOf(inner)
            | Expression::AddressDereference(inner)
            | Expression::AddressOut(inner)
            | Expression::AddressReference(inner) => inner.uses_variable(name),
            Expression::FieldReference { target, .. }
            | Expression::PropertyReference { target, .. }
            | Expression::EventReference { target, .. }
            | Expression::MethodReference { target, .. }
            | Expression::DelegateCreate { target, .. } => boxed(target),
            Expression::PropertyIndexer {
                target, indices, ..
            }
            | Expression::ArrayIndexer { target, indices } => {
                target.uses_variable(name) || any(indices)
            }
            Expression::MethodInvoke {
                method: target,
                arguments,
            }
            | Expression::DelegateInvoke { target, arguments } => {
                target.uses_variable(name) || any(arguments)
            }
            Expression::ObjectCreate { arguments, .. }
            | Expression::ArrayInitializer(arguments) => any(arguments),
            Expression::ArrayCreate {
                dimensions,
                initializer,
                ..
            } => any(dimensions) || boxed(initializer),
            Expression::AnonymousMethod { body, .. } => body.uses_variable(name),
            Expression::Literal(_)
            | Expression::ArgumentReference { .. }
            | Expression::ThisReference
            | Expression::BaseReference
            | Expression::TypeReference(_)
            | Expression::TypeOf(_)
            | Expression::SizeOf(_)
            | Expression::DefaultValue(_)
            | Expression::Snippet(_) => false,
        }
    }
}
