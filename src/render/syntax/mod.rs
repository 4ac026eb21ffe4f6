//! Target syntax strategies.
//!
//! The rendering engine owns everything that is the same for every target language: traversal
//! order, visibility filtering, precedence-driven parenthesization, the statement state
//! machine, loop recovery and number formatting. A [`Syntax`] supplies the spelling: keyword
//! tables, operators and their precedence, literal escaping, and the shape of each compound
//! statement and declaration.
//!
//! Two strategies exist, [`CSharp`] and [`VisualBasic`]. Strategies are stateless and shared
//! as `&'static dyn Syntax`; the engine passes its per-call [`RenderContext`] into every hook
//! that needs to recurse.

mod csharp;
mod visualbasic;

pub use csharp::CSharp;
pub use visualbasic::VisualBasic;

use crate::{
    model::{
        BinaryOperator, Block, CatchClause, EventDeclaration, Expression, FieldDeclaration,
        Literal, MethodDeclaration, MethodReference, Parameter, PrimitiveKind,
        PropertyDeclaration, Statement, SwitchCase, TypeDeclaration, TypeKind, TypeReference,
        TypeSignature, UnaryOperator, Variable, Visibility,
    },
    render::{context::RenderContext, sink::Formatter, statements::CountedLoop},
    Result,
};

/// Keywords the engine writes without knowing their spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// `null` / `Nothing`
    Null,
    /// `true` / `True`
    True,
    /// `false` / `False`
    False,
    /// `this` / `Me`
    This,
    /// `base` / `MyBase`
    Base,
    /// `new` / `New`
    New,
    /// `return` / `Return`
    Return,
    /// `throw` / `Throw`
    Throw,
    /// `goto` / `GoTo`
    Goto,
    /// `namespace` / `Namespace`
    Namespace,
}

/// Precedence levels of expression kinds that are not plain operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Assignments and anonymous methods
    Assignment,
    /// `c ? a : b`
    Conditional,
    /// `a ?? b`
    NullCoalescing,
    /// Prefix operators
    Unary,
    /// Member access, invocation, indexing, literals, names
    Primary,
}

/// The three type-conversion expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastKind {
    /// Checked conversion
    Cast,
    /// Conversion yielding null on failure
    TryCast,
    /// Type test
    CanCast,
}

/// Operators taking a type operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOperator {
    /// `typeof(T)`
    TypeOf,
    /// `sizeof(T)`
    SizeOf,
    /// `default(T)`
    Default,
}

/// Address expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// `&x`
    Of,
    /// `*x`
    Dereference,
    /// `out x`
    Out,
    /// `ref x`
    Reference,
}

/// Jump statements leaving or restarting the innermost loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    /// `break`
    Break,
    /// `continue`
    Continue,
}

/// Whether an event handler statement attaches or removes its listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerAction {
    /// `+=` / `AddHandler`
    Attach,
    /// `-=` / `RemoveHandler`
    Remove,
}

/// Scope of an assembly- or module-level custom attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeTarget {
    /// `[assembly: ...]`
    Assembly,
    /// `[module: ...]`
    Module,
}

/// What closes a block.
///
/// Brace syntaxes close every block the same way; keyword syntaxes need to know which
/// construct ends. `Clause` ends a block that is followed by another clause of the same
/// statement (`Else`, `Catch`, `Finally`) and writes nothing in keyword syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closer {
    /// Nested block statement
    Block,
    /// A clause continued by the next clause
    Clause,
    /// `if`
    If,
    /// `while`
    While,
    /// Body of a `do ... while`
    Do,
    /// Counted and collection loops
    For,
    /// `lock` / `SyncLock`
    Lock,
    /// `using`
    Using,
    /// `fixed`
    Fixed,
    /// `switch` / `Select Case`
    Switch,
    /// `namespace`
    Namespace,
    /// A type body
    Type(TypeKind),
    /// A method without return value
    Sub,
    /// A method with return value
    Function,
    /// A property
    Property,
    /// A getter
    Get,
    /// A setter
    Set,
    /// An anonymous method without return value
    AnonymousSub,
    /// An anonymous method with return value
    AnonymousFunction,
}

/// A target syntax.
///
/// Implemented by [`CSharp`] and [`VisualBasic`]. Hooks taking a [`RenderContext`] write the
/// named construct at the current output position, recursing through the context for nested
/// expressions, statements and types.
#[allow(missing_docs)]
pub trait Syntax: Send + Sync {
    /// Display name, used in [`crate::Error::UnsupportedConstruct`]
    fn name(&self) -> &'static str;

    /// Returns true if `name` collides with a reserved word
    fn is_keyword(&self, name: &str) -> bool;

    /// `name` made usable as an identifier (`@class`, `[Class]`)
    fn escape_keyword(&self, name: &str) -> String;

    /// Spelling of a constructor of `declaring` in reference position
    fn constructor_name(&self, declaring: &TypeReference) -> String;

    /// Spelling of an engine keyword
    fn keyword(&self, keyword: Keyword) -> &'static str;

    /// Keyword of a primitive type, `None` where the syntax has none
    fn primitive_keyword(&self, kind: PrimitiveKind) -> Option<&'static str>;

    /// Accessibility keyword(s)
    fn visibility_keyword(&self, visibility: Visibility) -> &'static str;

    /// Line comment marker
    fn comment_prefix(&self) -> &'static str;

    /// Statement terminator, empty for line-oriented syntaxes
    fn terminator(&self) -> &'static str;

    /// Prefix of hexadecimal integer literals
    fn hex_prefix(&self) -> &'static str;

    /// Type suffix of an integer literal
    fn integer_suffix(&self, literal: &Literal) -> &'static str;

    /// Type suffix of a single precision literal
    fn single_suffix(&self) -> &'static str;

    /// Quoted and escaped string literal
    fn string_literal(&self, value: &str) -> String;

    /// Quoted and escaped character literal
    fn char_literal(&self, value: char) -> String;

    /// Brackets around generic argument lists
    fn generic_brackets(&self) -> (&'static str, &'static str);

    /// Brackets of array ranks and index lists
    fn index_brackets(&self) -> (&'static str, &'static str);

    /// Brackets around custom attributes
    fn attribute_brackets(&self) -> (&'static str, &'static str);

    /// Prefix of an assembly- or module-level attribute
    fn attribute_target(&self, target: AttributeTarget) -> &'static str;

    /// Separator between a named attribute argument and its value
    fn named_argument_separator(&self) -> &'static str;

    /// Returns true if unmanaged pointers can be written
    fn supports_pointers(&self) -> bool;

    /// Returns true if a loop or `if` body may be a single statement without a block
    fn allows_embedded_statement(&self) -> bool;

    /// Returns true if a non-default indexed property is accessed by name
    fn named_indexers(&self) -> bool;

    fn binary_operator(&self, operator: BinaryOperator, null_operand: bool) -> &'static str;

    fn binary_precedence(&self, operator: BinaryOperator) -> u8;

    /// Text of a non-step prefix operator
    fn unary_operator(&self, operator: UnaryOperator) -> &'static str;

    fn unary_precedence(&self, operator: UnaryOperator) -> u8;

    fn precedence(&self, level: Level) -> u8;

    fn cast_precedence(&self, kind: CastKind) -> u8;

    /// Start a block after a statement or declaration header
    fn open_block(&self, out: &mut dyn Formatter);

    /// End a block; the cursor is at the start of a line
    fn close_block(&self, out: &mut dyn Formatter, closer: Closer);

    /// `target = value` or `target op= value`; `statement` is true at statement level
    fn write_assign(
        &self,
        cx: &mut RenderContext<'_>,
        target: &Expression,
        operator: Option<BinaryOperator>,
        value: &Expression,
        statement: bool,
    ) -> Result<()>;

    /// Increment or decrement
    fn write_step(
        &self,
        cx: &mut RenderContext<'_>,
        operator: UnaryOperator,
        operand: &Expression,
        statement: bool,
    ) -> Result<()>;

    fn write_conditional(
        &self,
        cx: &mut RenderContext<'_>,
        condition: &Expression,
        then_value: &Expression,
        else_value: &Expression,
    ) -> Result<()>;

    fn write_null_coalescing(
        &self,
        cx: &mut RenderContext<'_>,
        value: &Expression,
        fallback: &Expression,
    ) -> Result<()>;

    fn write_cast(
        &self,
        cx: &mut RenderContext<'_>,
        kind: CastKind,
        target_type: &TypeSignature,
        value: &Expression,
    ) -> Result<()>;

    fn write_type_operator(
        &self,
        cx: &mut RenderContext<'_>,
        operator: TypeOperator,
        operand: &TypeSignature,
    ) -> Result<()>;

    fn write_address(
        &self,
        cx: &mut RenderContext<'_>,
        kind: AddressKind,
        operand: &Expression,
    ) -> Result<()>;

    fn write_array_create(
        &self,
        cx: &mut RenderContext<'_>,
        element_type: &TypeSignature,
        dimensions: &[Expression],
        initializer: Option<&Expression>,
    ) -> Result<()>;

    fn write_delegate_create(
        &self,
        cx: &mut RenderContext<'_>,
        delegate_type: &TypeSignature,
        target: Option<&Expression>,
        method: &MethodReference,
    ) -> Result<()>;

    /// Operator written in front of a method group used as a value
    fn method_group_prefix(&self) -> Option<&'static str>;

    /// Member named after `this`/`base` in a chained constructor call
    fn chained_constructor_member(&self) -> Option<&'static str>;

    fn write_variable_declaration(
        &self,
        cx: &mut RenderContext<'_>,
        variable: &Variable,
    ) -> Result<()>;

    fn write_anonymous_method(
        &self,
        cx: &mut RenderContext<'_>,
        parameters: &[Parameter],
        return_type: &TypeSignature,
        body: &Block,
    ) -> Result<()>;

    fn write_if(
        &self,
        cx: &mut RenderContext<'_>,
        condition: &Expression,
        then_block: &Block,
        else_block: Option<&Block>,
    ) -> Result<()>;

    fn write_while(
        &self,
        cx: &mut RenderContext<'_>,
        condition: &Expression,
        body: &Block,
    ) -> Result<()>;

    fn write_do_while(
        &self,
        cx: &mut RenderContext<'_>,
        body: &Block,
        condition: &Expression,
    ) -> Result<()>;

    fn write_for(
        &self,
        cx: &mut RenderContext<'_>,
        initializer: Option<&Statement>,
        condition: Option<&Expression>,
        increment: Option<&Statement>,
        body: &Block,
    ) -> Result<()>;

    /// Returns true if the recovered counted loop can be written by this syntax
    fn supports_counted_loop(&self, counted: &CountedLoop<'_>) -> bool;

    fn write_counted_loop(&self, cx: &mut RenderContext<'_>, counted: &CountedLoop<'_>)
        -> Result<()>;

    fn write_foreach(
        &self,
        cx: &mut RenderContext<'_>,
        variable: &Variable,
        collection: &Expression,
        body: &Block,
    ) -> Result<()>;

    fn write_jump(&self, cx: &mut RenderContext<'_>, jump: Jump) -> Result<()>;

    fn write_try(
        &self,
        cx: &mut RenderContext<'_>,
        try_block: &Block,
        catch_clauses: &[CatchClause],
        finally_block: Option<&Block>,
        fault_block: Option<&Block>,
    ) -> Result<()>;

    fn write_switch(
        &self,
        cx: &mut RenderContext<'_>,
        value: &Expression,
        cases: &[SwitchCase],
    ) -> Result<()>;

    fn write_lock(&self, cx: &mut RenderContext<'_>, target: &Expression, body: &Block)
        -> Result<()>;

    fn write_using(
        &self,
        cx: &mut RenderContext<'_>,
        resource: &Expression,
        body: &Block,
    ) -> Result<()>;

    fn write_fixed(
        &self,
        cx: &mut RenderContext<'_>,
        variable: &Variable,
        value: &Expression,
        body: &Block,
    ) -> Result<()>;

    fn write_event_handler(
        &self,
        cx: &mut RenderContext<'_>,
        action: HandlerAction,
        event: &Expression,
        listener: &Expression,
    ) -> Result<()>;

    fn write_debug_break(&self, cx: &mut RenderContext<'_>) -> Result<()>;

    fn write_namespace_header(&self, cx: &mut RenderContext<'_>, name: &str);

    /// Modifiers, kind, name, generic parameters and, where the syntax puts it there, the
    /// base list
    fn write_type_header(
        &self,
        cx: &mut RenderContext<'_>,
        declaration: &TypeDeclaration,
        base: Option<&TypeReference>,
        interfaces: &[TypeReference],
    ) -> Result<()>;

    /// Open the member block; returns true if it already wrote content lines
    fn open_type_body(
        &self,
        cx: &mut RenderContext<'_>,
        kind: TypeKind,
        base: Option<&TypeReference>,
        interfaces: &[TypeReference],
    ) -> Result<bool>;

    fn write_enum_member(
        &self,
        cx: &mut RenderContext<'_>,
        field: &FieldDeclaration,
        last: bool,
    ) -> Result<()>;

    fn write_delegate(
        &self,
        cx: &mut RenderContext<'_>,
        declaration: &TypeDeclaration,
        invoke: &MethodDeclaration,
    ) -> Result<()>;

    fn write_field(&self, cx: &mut RenderContext<'_>, field: &FieldDeclaration) -> Result<()>;

    /// Everything of a method declaration before its body
    fn write_method_header(
        &self,
        cx: &mut RenderContext<'_>,
        method: &MethodDeclaration,
        in_interface: bool,
    ) -> Result<()>;

    fn write_property(
        &self,
        cx: &mut RenderContext<'_>,
        property: &PropertyDeclaration,
        in_interface: bool,
    ) -> Result<()>;

    fn write_event(
        &self,
        cx: &mut RenderContext<'_>,
        event: &EventDeclaration,
        in_interface: bool,
    ) -> Result<()>;

    fn write_parameter(&self, cx: &mut RenderContext<'_>, parameter: &Parameter) -> Result<()>;
}

/// Binary search over a sorted keyword table
pub(crate) fn contains_sorted(table: &[&str], word: &str) -> bool {
    table.binary_search(&word).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_tables_are_sorted() {
        for table in [csharp::KEYWORDS, visualbasic::KEYWORDS] {
            assert!(table.windows(2).all(|pair| pair[0] < pair[1]), "{:?}", table);
        }
    }

    #[test]
    fn test_keyword_escaping() {
        assert_eq!(CSharp.escape_keyword("class"), "@class");
        assert_eq!(CSharp.escape_keyword("Class"), "Class");
        assert_eq!(VisualBasic.escape_keyword("Class"), "[Class]");
        assert_eq!(VisualBasic.escape_keyword("class"), "[class]");
        assert_eq!(VisualBasic.escape_keyword("value"), "value");
    }
}
