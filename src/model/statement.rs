//! The statement taxonomy of decompiled method bodies.

use crate::model::{
    expression::{Expression, Variable},
    types::TypeSignature,
};

/// An ordered sequence of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Statements, in program order
    pub statements: Vec<Statement>,
}

impl Block {
    /// Create a block from statements
    #[must_use]
    pub fn new(statements: Vec<Statement>) -> Self {
        Block { statements }
    }

    /// Returns true if the block has no statements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Returns true if any statement of the block uses the variable named `name`
    #[must_use]
    pub fn uses_variable(&self, name: &str) -> bool {
        self.statements
            .iter()
            .any(|statement| statement.uses_variable(name))
    }
}

impl From<Vec<Statement>> for Block {
    fn from(statements: Vec<Statement>) -> Self {
        Block { statements }
    }
}

/// A `catch` clause of a [`Statement::TryCatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// Exception variable, if the handler binds one
    pub variable: Option<Variable>,
    /// Caught exception type
    pub catch_type: TypeSignature,
    /// Filter expression (`when`)
    pub filter: Option<Expression>,
    /// Handler body
    pub body: Block,
}

/// A section of a [`Statement::Switch`].
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Case labels; an empty list is the `default` section
    pub labels: Vec<Expression>,
    /// Section body
    pub body: Block,
}

impl SwitchCase {
    /// Returns true for the `default` section
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A statement of a decompiled method body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Nested block
    Block(Block),
    /// Expression evaluated for its side effects
    Expression(Expression),
    /// `if (condition) then else otherwise`
    If {
        /// Condition
        condition: Expression,
        /// Taken branch
        then_block: Block,
        /// Optional else branch
        else_block: Option<Block>,
    },
    /// `while (condition) body`
    While {
        /// Condition
        condition: Expression,
        /// Loop body
        body: Block,
    },
    /// `do body while (condition)`
    DoWhile {
        /// Loop body
        body: Block,
        /// Condition
        condition: Expression,
    },
    /// `for (initializer; condition; increment) body`
    For {
        /// Initializer statement
        initializer: Option<Box<Statement>>,
        /// Condition
        condition: Option<Expression>,
        /// Increment statement
        increment: Option<Box<Statement>>,
        /// Loop body
        body: Block,
    },
    /// `foreach (variable in collection) body`
    ForEach {
        /// Iteration variable
        variable: Variable,
        /// Enumerated collection
        collection: Expression,
        /// Loop body
        body: Block,
    },
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `return value`
    Return(Option<Expression>),
    /// `throw value`; `None` rethrows
    Throw(Option<Expression>),
    /// `try`, with catch clauses, finally or fault handler
    TryCatch {
        /// Protected block
        try_block: Block,
        /// Catch clauses, in handler order
        catch_clauses: Vec<CatchClause>,
        /// `finally` handler
        finally_block: Option<Block>,
        /// `fault` handler
        fault_block: Option<Block>,
    },
    /// `switch (value) { cases }`
    Switch {
        /// Switched value
        value: Expression,
        /// Sections
        cases: Vec<SwitchCase>,
    },
    /// `goto label`
    Goto(String),
    /// `label:`
    Label(String),
    /// `lock (target) body`
    Lock {
        /// Locked object
        target: Expression,
        /// Protected body
        body: Block,
    },
    /// `using (resource) body`
    Using {
        /// Disposed resource
        resource: Expression,
        /// Body
        body: Block,
    },
    /// `fixed (T* variable = value) body`
    Fixed {
        /// Pinned variable
        variable: Variable,
        /// Pinned value
        value: Expression,
        /// Body
        body: Block,
    },
    /// A comment line
    Comment(String),
    /// `event += listener`
    AttachEvent {
        /// The event, an [`Expression::EventReference`]
        event: Expression,
        /// The handler delegate
        listener: Expression,
    },
    /// `event -= listener`
    RemoveEvent {
        /// The event, an [`Expression::EventReference`]
        event: Expression,
        /// The handler delegate
        listener: Expression,
    },
    /// Debugger break
    DebugBreak,
}

impl Statement {
    /// Returns true if the variable named `name` occurs anywhere in this statement
    #[must_use]
    pub fn uses_variable(&self, name: &str) -> bool {
        let expression = |value: &Expression| value.uses_variable(name);
        let block = |body: &Block| body.uses_variable(name);

        match self {
            Statement::Block(body) => block(body),
            Statement::Expression(value)
            | Statement::Return(Some(value))
            | Statement::Throw(Some(value)) => expression(value),
            Statement::If {
                condition,
                then_block,
                else_block,
            } => {
                expression(condition)
                    || block(then_block)
                    || else_block.as_ref().is_some_and(block)
            }
            Statement::While { condition, body } | Statement::DoWhile { body, condition } => {
                expression(condition) || block(body)
            }
            Statement::For {
                initializer,
                condition,
                increment,
                body,
            } => {
                initializer.as_ref().is_some_and(|s| s.uses_variable(name))
                    || condition.as_ref().is_some_and(expression)
                    || increment.as_ref().is_some_and(|s| s.uses_variable(name))
                    || block(body)
            }
            Statement::ForEach {
                variable,
                collection,
                body,
            } => variable.name == name || expression(collection) || block(body),
            Statement::TryCatch {
                try_block,
                catch_clauses,
                finally_block,
                fault_block,
            } => {
                block(try_block)
                    || catch_clauses.iter().any(|clause| {
                        clause.variable.as_ref().is_some_and(|v| v.name == name)
                            || clause.filter.as_ref().is_some_and(expression)
                            || block(&clause.body)
                    })
                    || finally_block.as_ref().is_some_and(block)
                    || fault_block.as_ref().is_some_and(block)
            }
            Statement::Switch { value, cases } => {
                expression(value)
                    || cases
                        .iter()
                        .any(|case| case.labels.iter().any(expression) || block(&case.body))
            }
            Statement::Lock { target: value, body }
            | Statement::Using {
                resource: value,
                body,
            } => expression(value) || block(body),
            Statement::Fixed {
                variable,
                value,
                body,
            } => variable.name == name || expression(value) || block(body),
            Statement::AttachEvent { event, listener }
            | Statement::RemoveEvent { event, listener } => {
                expression(event) || expression(listener)
            }
            Statement::Return(None)
            | Statement::Throw(None)
            | Statement::Break
            | Statement::Continue
            | Statement::Goto(_)
            | Statement::Label(_)
            | Statement::Comment(_)
            | Statement::DebugBreak => false,
        }
    }
}
