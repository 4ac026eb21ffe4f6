//! Visual Basic spelling.
//!
//! Visual Basic is line oriented: blocks are closed by `End` keywords instead of braces, there
//! are no statement terminators and no embedded single-statement bodies. Assignments and
//! increments are statements only, so an expression tree that uses them as values cannot be
//! written and fails with [`crate::Error::UnsupportedConstruct`].

use crate::{
    model::{
        BinaryOperator, Block, CatchClause, EventDeclaration, Expression, FieldDeclaration,
        FieldModifiers, GenericParameter, GenericParameterFlags, Literal, MethodDeclaration,
        MethodReference, Parameter, PrimitiveKind, PropertyDeclaration, Statement, SwitchCase,
        TypeDeclaration, TypeKind, TypeReference, TypeSignature, UnaryOperator, Variable,
        Visibility,
    },
    query::strip_arity,
    render::{
        context::RenderContext,
        declarations::{
            accessor_visibility, enum_underlying_type, inheritance, statements_of, Inheritance,
        },
        sink::{Entity, Formatter},
        statements::{adjust_literal, Breakable, CountedLoop},
        syntax::{
            contains_sorted, AddressKind, AttributeTarget, CastKind, Closer, HandlerAction, Jump,
            Keyword, Level, Syntax, TypeOperator,
        },
    },
    Result,
};

const NAME: &str = "Visual Basic";

/// Reserved words, lowercase and sorted; matching is case-insensitive
pub(crate) const KEYWORDS: &[&str] = &[
    "addhandler", "addressof", "alias", "and", "andalso", "as", "boolean", "byref", "byte",
    "byval", "call", "case", "catch", "cbool", "cbyte", "cchar", "cdate", "cdbl", "cdec", "char",
    "cint", "class", "clng", "cobj", "const", "continue", "csbyte", "cshort", "csng", "cstr",
    "ctype", "cuint", "culng", "cushort", "date", "decimal", "declare", "default", "delegate",
    "dim", "directcast", "do", "double", "each", "else", "elseif", "end", "endif", "enum", "erase",
    "error", "event", "exit", "false", "finally", "for", "friend", "function", "get", "gettype",
    "getxmlnamespace", "global", "gosub", "goto", "handles", "if", "implements", "imports", "in",
    "inherits", "integer", "interface", "is", "isnot", "let", "lib", "like", "long", "loop", "me",
    "mod", "module", "mustinherit", "mustoverride", "mybase", "myclass", "namespace", "narrowing",
    "new", "next", "not", "nothing", "notinheritable", "notoverridable", "object", "of", "on",
    "operator", "option", "optional", "or", "orelse", "overloads", "overridable", "overrides",
    "paramarray", "partial", "private", "property", "protected", "public", "raiseevent",
    "readonly", "redim", "rem", "removehandler", "resume", "return", "sbyte", "select", "set",
    "shadows", "shared", "short", "single", "static", "step", "stop", "string", "structure", "sub",
    "synclock", "then", "throw", "to", "true", "try", "trycast", "typeof", "uinteger", "ulong",
    "ushort", "using", "variant", "wend", "when", "while", "widening", "with", "withevents",
    "writeonly", "xor",
];

/// The Visual Basic syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisualBasic;

fn modifier(cx: &mut RenderContext<'_>, keyword: &str) {
    cx.write_keyword(keyword);
    cx.write(" ");
}

fn visibility(cx: &mut RenderContext<'_>, visibility: Visibility) {
    let keyword = VisualBasic.visibility_keyword(visibility);
    modifier(cx, keyword);
}

fn inheritance_modifiers(cx: &mut RenderContext<'_>, method: &MethodDeclaration) {
    let keywords: &[&str] = match inheritance(method, cx.model) {
        Inheritance::Plain => &[],
        Inheritance::Abstract => &["MustOverride"],
        Inheritance::AbstractOverride => &["MustOverride", "Overrides"],
        Inheritance::Virtual => &["Overridable"],
        Inheritance::Override => &["Overrides"],
        Inheritance::SealedOverride => &["NotOverridable", "Overrides"],
        Inheritance::NewVirtual => &["Shadows", "Overridable"],
    };
    for keyword in keywords {
        modifier(cx, keyword);
    }
}

/// ` As T`
fn as_clause(cx: &mut RenderContext<'_>, signature: &TypeSignature) -> Result<()> {
    cx.write(" ");
    modifier(cx, "As");
    cx.write_type(signature)
}

/// `(Of Out T As {Class, New}, U)`
fn generic_parameters(cx: &mut RenderContext<'_>, parameters: &[GenericParameter]) -> Result<()> {
    if parameters.is_empty() {
        return Ok(());
    }

    cx.write("(");
    modifier(cx, "Of");
    for (index, parameter) in parameters.iter().enumerate() {
        if index > 0 {
            cx.write(", ");
        }
        if parameter.flags.contains(GenericParameterFlags::COVARIANT) {
            modifier(cx, "Out");
        } else if parameter.flags.contains(GenericParameterFlags::CONTRAVARIANT) {
            modifier(cx, "In");
        }
        cx.declare(&parameter.name, None);
        constraints(cx, parameter)?;
    }
    cx.write(")");
    Ok(())
}

fn constraints(cx: &mut RenderContext<'_>, parameter: &GenericParameter) -> Result<()> {
    if !parameter.has_constraints() {
        return Ok(());
    }

    let value_type = parameter
        .flags
        .contains(GenericParameterFlags::NOT_NULLABLE_VALUE_TYPE_CONSTRAINT);
    let types: Vec<&TypeSignature> = parameter
        .constraints
        .iter()
        .filter(|constraint| {
            !(value_type
                && constraint
                    .as_reference()
                    .is_some_and(|reference| reference.is("System", "ValueType")))
        })
        .collect();

    let mut keywords = Vec::new();
    if parameter.flags.contains(GenericParameterFlags::REFERENCE_TYPE_CONSTRAINT) {
        keywords.push("Class");
    }
    if value_type {
        keywords.push("Structure");
    }
    if parameter.flags.contains(GenericParameterFlags::DEFAULT_CONSTRUCTOR_CONSTRAINT)
        && !value_type
    {
        keywords.push("New");
    }

    let multiple = keywords.len() + types.len() > 1;
    cx.write(" ");
    modifier(cx, "As");
    if multiple {
        cx.write("{");
    }
    let mut first = true;
    for keyword in keywords {
        if !first {
            cx.write(", ");
        }
        first = false;
        cx.write_keyword(keyword);
    }
    for constraint in types {
        if !first {
            cx.write(", ");
        }
        first = false;
        cx.write_type(constraint)?;
    }
    if multiple {
        cx.write("}");
    }
    Ok(())
}

/// Returns true if the upper bound of a `For` loop can be written without re-evaluation
/// concerns
fn is_simple_bound(expression: &Expression) -> bool {
    match expression {
        Expression::Literal(literal) => literal.as_integer().is_some(),
        Expression::VariableReference(_) | Expression::ArgumentReference { .. } => true,
        Expression::FieldReference { target, .. }
        | Expression::PropertyReference { target, .. } => {
            target.as_deref().map_or(true, |target| {
                matches!(
                    target,
                    Expression::ThisReference
                        | Expression::VariableReference(_)
                        | Expression::ArgumentReference { .. }
                )
            })
        }
        _ => false,
    }
}

/// `expression + delta`, folded into the literal where possible
fn offset_expression(expression: &Expression, delta: i32) -> Expression {
    if delta == 0 {
        return expression.clone();
    }
    if let Expression::Literal(literal) = expression {
        if let Some(adjusted) = adjust_literal(literal, i128::from(delta)) {
            return Expression::Literal(adjusted);
        }
    }
    let operator = if delta > 0 {
        BinaryOperator::Add
    } else {
        BinaryOperator::Subtract
    };
    Expression::binary(
        expression.clone(),
        operator,
        Expression::literal(delta.abs()),
    )
}

/// Accessor with its body; a missing body is written as an empty one
fn accessor(
    cx: &mut RenderContext<'_>,
    header: &str,
    member_visibility: Option<Visibility>,
    method: &MethodDeclaration,
    closer: Closer,
) -> Result<()> {
    if let Some(visibility) = accessor_visibility(member_visibility, method) {
        self::visibility(cx, visibility);
    }
    cx.write_keyword(header);
    let empty = Block::default();
    cx.method_body(statements_of(method).unwrap_or(&empty), closer)
}

impl Syntax for VisualBasic {
    fn name(&self) -> &'static str {
        NAME
    }

    fn is_keyword(&self, name: &str) -> bool {
        contains_sorted(KEYWORDS, &name.to_ascii_lowercase())
    }

    fn escape_keyword(&self, name: &str) -> String {
        format!("[{name}]")
    }

    fn constructor_name(&self, _declaring: &TypeReference) -> String {
        "New".to_string()
    }

    fn keyword(&self, keyword: Keyword) -> &'static str {
        match keyword {
            Keyword::Null => "Nothing",
            Keyword::True => "True",
            Keyword::False => "False",
            Keyword::This => "Me",
            Keyword::Base => "MyBase",
            Keyword::New => "New",
            Keyword::Return => "Return",
            Keyword::Throw => "Throw",
            Keyword::Goto => "GoTo",
            Keyword::Namespace => "Namespace",
        }
    }

    fn primitive_keyword(&self, kind: PrimitiveKind) -> Option<&'static str> {
        Some(match kind {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::SByte => "SByte",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Int16 => "Short",
            PrimitiveKind::UInt16 => "UShort",
            PrimitiveKind::Int32 => "Integer",
            PrimitiveKind::UInt32 => "UInteger",
            PrimitiveKind::Int64 => "Long",
            PrimitiveKind::UInt64 => "ULong",
            PrimitiveKind::Single => "Single",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Decimal => "Decimal",
            PrimitiveKind::String => "String",
            PrimitiveKind::Object => "Object",
            PrimitiveKind::Void | PrimitiveKind::IntPtr | PrimitiveKind::UIntPtr => return None,
        })
    }

    fn visibility_keyword(&self, visibility: Visibility) -> &'static str {
        match visibility {
            Visibility::CompilerControlled | Visibility::Private => "Private",
            Visibility::FamilyAndAssembly => "Private Protected",
            Visibility::Assembly => "Friend",
            Visibility::Family => "Protected",
            Visibility::FamilyOrAssembly => "Protected Friend",
            Visibility::Public => "Public",
        }
    }

    fn comment_prefix(&self) -> &'static str {
        "'"
    }

    fn terminator(&self) -> &'static str {
        ""
    }

    fn hex_prefix(&self) -> &'static str {
        "&H"
    }

    fn integer_suffix(&self, literal: &Literal) -> &'static str {
        match literal {
            Literal::Int16(_) => "S",
            Literal::UInt16(_) => "US",
            Literal::UInt32(_) => "UI",
            Literal::Int64(_) => "L",
            Literal::UInt64(_) => "UL",
            _ => "",
        }
    }

    fn single_suffix(&self) -> &'static str {
        "F"
    }

    fn string_literal(&self, value: &str) -> String {
        // control characters cannot appear inside quotes and are concatenated as ChrW(n)
        let mut parts = Vec::new();
        let mut quoted = String::new();
        for c in value.chars() {
            if c.is_control() {
                if !quoted.is_empty() {
                    parts.push(format!("\"{quoted}\""));
                    quoted.clear();
                }
                parts.push(format!("ChrW({})", c as u32));
            } else if c == '"' {
                quoted.push_str("\"\"");
            } else {
                quoted.push(c);
            }
        }
        if !quoted.is_empty() || parts.is_empty() {
            parts.push(format!("\"{quoted}\""));
        }
        parts.join(" & ")
    }

    fn char_literal(&self, value: char) -> String {
        match value {
            c if c.is_control() => format!("ChrW({})", c as u32),
            '"' => "\"\"\"\"c".to_string(),
            c => format!("\"{c}\"c"),
        }
    }

    fn generic_brackets(&self) -> (&'static str, &'static str) {
        ("(Of ", ")")
    }

    fn index_brackets(&self) -> (&'static str, &'static str) {
        ("(", ")")
    }

    fn attribute_brackets(&self) -> (&'static str, &'static str) {
        ("<", ">")
    }

    fn attribute_target(&self, target: AttributeTarget) -> &'static str {
        match target {
            AttributeTarget::Assembly => "Assembly",
            AttributeTarget::Module => "Module",
        }
    }

    fn named_argument_separator(&self) -> &'static str {
        ":="
    }

    fn supports_pointers(&self) -> bool {
        false
    }

    fn allows_embedded_statement(&self) -> bool {
        false
    }

    fn named_indexers(&self) -> bool {
        true
    }

    fn binary_operator(&self, operator: BinaryOperator, null_operand: bool) -> &'static str {
        match operator {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulus => "Mod",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::IdentityEquality => "Is",
            BinaryOperator::IdentityInequality => "IsNot",
            BinaryOperator::ValueEquality if null_operand => "Is",
            BinaryOperator::ValueEquality => "=",
            BinaryOperator::ValueInequality if null_operand => "IsNot",
            BinaryOperator::ValueInequality => "<>",
            BinaryOperator::BitwiseOr => "Or",
            BinaryOperator::BitwiseAnd => "And",
            BinaryOperator::BitwiseExclusiveOr => "Xor",
            BinaryOperator::BooleanOr => "OrElse",
            BinaryOperator::BooleanAnd => "AndAlso",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
        }
    }

    fn binary_precedence(&self, operator: BinaryOperator) -> u8 {
        match operator {
            BinaryOperator::BitwiseExclusiveOr => 2,
            BinaryOperator::BitwiseOr | BinaryOperator::BooleanOr => 3,
            BinaryOperator::BitwiseAnd | BinaryOperator::BooleanAnd => 4,
            BinaryOperator::IdentityEquality
            | BinaryOperator::IdentityInequality
            | BinaryOperator::ValueEquality
            | BinaryOperator::ValueInequality
            | BinaryOperator::LessThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterThanOrEqual => 6,
            BinaryOperator::ShiftLeft | BinaryOperator::ShiftRight => 7,
            BinaryOperator::Add | BinaryOperator::Subtract => 9,
            BinaryOperator::Modulus => 10,
            BinaryOperator::Multiply | BinaryOperator::Divide => 12,
        }
    }

    fn unary_operator(&self, operator: UnaryOperator) -> &'static str {
        match operator {
            UnaryOperator::Negate => "-",
            UnaryOperator::BooleanNot | UnaryOperator::BitwiseNot => "Not ",
            UnaryOperator::PreIncrement | UnaryOperator::PostIncrement => "+",
            UnaryOperator::PreDecrement | UnaryOperator::PostDecrement => "-",
        }
    }

    fn unary_precedence(&self, operator: UnaryOperator) -> u8 {
        match operator {
            UnaryOperator::BooleanNot | UnaryOperator::BitwiseNot => 5,
            _ => 13,
        }
    }

    fn precedence(&self, level: Level) -> u8 {
        match level {
            Level::Assignment => 1,
            Level::Unary => 13,
            // If(...) is written like a call
            Level::Conditional | Level::NullCoalescing | Level::Primary => 15,
        }
    }

    fn cast_precedence(&self, kind: CastKind) -> u8 {
        match kind {
            CastKind::Cast | CastKind::TryCast => 15,
            CastKind::CanCast => 6,
        }
    }

    fn open_block(&self, out: &mut dyn Formatter) {
        out.write_indent();
        out.write_line();
    }

    fn close_block(&self, out: &mut dyn Formatter, closer: Closer) {
        out.write_outdent();
        let end = match closer {
            Closer::Block | Closer::Clause => return,
            Closer::If => "End If",
            Closer::While => "End While",
            Closer::Do => "Loop",
            Closer::For => "Next",
            Closer::Lock => "End SyncLock",
            Closer::Using => "End Using",
            Closer::Fixed => "End",
            Closer::Switch => "End Select",
            Closer::Namespace => "End Namespace",
            Closer::Type(TypeKind::Class | TypeKind::Delegate) => "End Class",
            Closer::Type(TypeKind::Struct) => "End Structure",
            Closer::Type(TypeKind::Interface) => "End Interface",
            Closer::Type(TypeKind::Enum) => "End Enum",
            Closer::Sub | Closer::AnonymousSub => "End Sub",
            Closer::Function | Closer::AnonymousFunction => "End Function",
            Closer::Property => "End Property",
            Closer::Get => "End Get",
            Closer::Set => "End Set",
        };
        out.write_keyword(end);
    }

    fn write_assign(
        &self,
        cx: &mut RenderContext<'_>,
        target: &Expression,
        operator: Option<BinaryOperator>,
        value: &Expression,
        statement: bool,
    ) -> Result<()> {
        if !statement {
            return Err(unsupported_error!("assignment used as a value", NAME));
        }

        cx.operand(target, Level::Unary)?;
        match operator {
            None => {
                cx.write(" = ");
                cx.expression(value, 0)
            }
            Some(
                operator @ (BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::ShiftLeft
                | BinaryOperator::ShiftRight),
            ) => {
                cx.write(" ");
                cx.write(self.binary_operator(operator, false));
                cx.write("= ");
                cx.expression(value, 0)
            }
            // no compound form: x = x Mod y
            Some(operator) => {
                cx.write(" = ");
                let expanded = Expression::Binary {
                    left: Box::new(target.clone()),
                    operator,
                    right: Box::new(value.clone()),
                };
                cx.expression(&expanded, 0)
            }
        }
    }

    fn write_step(
        &self,
        cx: &mut RenderContext<'_>,
        operator: UnaryOperator,
        operand: &Expression,
        statement: bool,
    ) -> Result<()> {
        if !statement {
            return Err(unsupported_error!("increment used as a value", NAME));
        }

        cx.operand(operand, Level::Unary)?;
        cx.write(match operator {
            UnaryOperator::PreIncrement | UnaryOperator::PostIncrement => " += 1",
            _ => " -= 1",
        });
        Ok(())
    }

    fn write_conditional(
        &self,
        cx: &mut RenderContext<'_>,
        condition: &Expression,
        then_value: &Expression,
        else_value: &Expression,
    ) -> Result<()> {
        cx.write_keyword("If");
        cx.write("(");
        cx.expression(condition, 0)?;
        cx.write(", ");
        cx.expression(then_value, 0)?;
        cx.write(", ");
        cx.expression(else_value, 0)?;
        cx.write(")");
        Ok(())
    }

    fn write_null_coalescing(
        &self,
        cx: &mut RenderContext<'_>,
        value: &Expression,
        fallback: &Expression,
    ) -> Result<()> {
        cx.write_keyword("If");
        cx.write("(");
        cx.expression(value, 0)?;
        cx.write(", ");
        cx.expression(fallback, 0)?;
        cx.write(")");
        Ok(())
    }

    fn write_cast(
        &self,
        cx: &mut RenderContext<'_>,
        kind: CastKind,
        target_type: &TypeSignature,
        value: &Expression,
    ) -> Result<()> {
        match kind {
            CastKind::Cast | CastKind::TryCast => {
                cx.write_keyword(if kind == CastKind::Cast { "CType" } else { "TryCast" });
                cx.write("(");
                cx.expression(value, 0)?;
                cx.write(", ");
                cx.write_type(target_type)?;
                cx.write(")");
                Ok(())
            }
            CastKind::CanCast => {
                modifier(cx, "TypeOf");
                cx.expression(value, self.cast_precedence(kind) + 1)?;
                cx.write(" ");
                modifier(cx, "Is");
                cx.write_type(target_type)
            }
        }
    }

    fn write_type_operator(
        &self,
        cx: &mut RenderContext<'_>,
        operator: TypeOperator,
        operand: &TypeSignature,
    ) -> Result<()> {
        match operator {
            TypeOperator::TypeOf => {
                cx.write_keyword("GetType");
                cx.write("(");
                cx.write_type(operand)?;
                cx.write(")");
                Ok(())
            }
            TypeOperator::SizeOf => Err(unsupported_error!("sizeof", NAME)),
            TypeOperator::Default => {
                cx.keyword(Keyword::Null);
                Ok(())
            }
        }
    }

    fn write_address(
        &self,
        cx: &mut RenderContext<'_>,
        kind: AddressKind,
        operand: &Expression,
    ) -> Result<()> {
        match kind {
            AddressKind::Of => Err(unsupported_error!("address-of", NAME)),
            AddressKind::Dereference => Err(unsupported_error!("pointer dereference", NAME)),
            // by-reference passing is implied by the parameter
            AddressKind::Out | AddressKind::Reference => cx.operand(operand, Level::Primary),
        }
    }

    fn write_array_create(
        &self,
        cx: &mut RenderContext<'_>,
        element_type: &TypeSignature,
        dimensions: &[Expression],
        initializer: Option<&Expression>,
    ) -> Result<()> {
        let mut innermost = element_type;
        let mut ranks = Vec::new();
        while let TypeSignature::Array { element, rank } = innermost {
            ranks.push(*rank);
            innermost = element;
        }

        cx.keyword(Keyword::New);
        cx.write(" ");
        cx.write_type(innermost)?;

        // dimensions are written as upper bounds
        cx.write("(");
        for (index, dimension) in dimensions.iter().enumerate() {
            if index > 0 {
                cx.write(", ");
            }
            cx.expression(&offset_expression(dimension, -1), 0)?;
        }
        cx.write(")");
        for rank in ranks {
            cx.write(&format!("({})", ",".repeat(rank.saturating_sub(1) as usize)));
        }

        cx.write(" ");
        match initializer {
            Some(initializer) => cx.expression(initializer, 0),
            None => {
                cx.write("{}");
                Ok(())
            }
        }
    }

    fn write_delegate_create(
        &self,
        cx: &mut RenderContext<'_>,
        delegate_type: &TypeSignature,
        target: Option<&Expression>,
        method: &MethodReference,
    ) -> Result<()> {
        cx.keyword(Keyword::New);
        cx.write(" ");
        cx.write_type(delegate_type)?;
        cx.write("(");
        modifier(cx, "AddressOf");
        cx.method_name(target, method)?;
        cx.write(")");
        Ok(())
    }

    fn method_group_prefix(&self) -> Option<&'static str> {
        Some("AddressOf")
    }

    fn chained_constructor_member(&self) -> Option<&'static str> {
        Some("New")
    }

    fn write_variable_declaration(
        &self,
        cx: &mut RenderContext<'_>,
        variable: &Variable,
    ) -> Result<()> {
        modifier(cx, "Dim");
        cx.declare_variable(variable);
        as_clause(cx, &variable.variable_type)
    }

    fn write_anonymous_method(
        &self,
        cx: &mut RenderContext<'_>,
        parameters: &[Parameter],
        return_type: &TypeSignature,
        body: &Block,
    ) -> Result<()> {
        let function = !matches!(return_type, TypeSignature::Void);
        cx.write_keyword(if function { "Function" } else { "Sub" });
        cx.parameters(parameters)?;
        if function {
            as_clause(cx, return_type)?;
        }
        let closer = if function {
            Closer::AnonymousFunction
        } else {
            Closer::AnonymousSub
        };
        cx.method_body(body, closer)
    }

    fn write_if(
        &self,
        cx: &mut RenderContext<'_>,
        condition: &Expression,
        then_block: &Block,
        else_block: Option<&Block>,
    ) -> Result<()> {
        modifier(cx, "If");
        cx.expression(condition, 0)?;
        cx.write(" ");
        cx.write_keyword("Then");

        let mut then_block = then_block;
        let mut else_block = else_block;
        loop {
            let Some(otherwise) = else_block else {
                return cx.block(&then_block.statements, Closer::If);
            };
            cx.block(&then_block.statements, Closer::Clause)?;

            if let [Statement::If {
                condition,
                then_block: next_then,
                else_block: next_else,
            }] = otherwise.statements.as_slice()
            {
                modifier(cx, "ElseIf");
                cx.expression(condition, 0)?;
                cx.write(" ");
                cx.write_keyword("Then");
                then_block = next_then;
                else_block = next_else.as_ref();
                continue;
            }

            cx.write_keyword("Else");
            return cx.block(&otherwise.statements, Closer::If);
        }
    }

    fn write_while(
        &self,
        cx: &mut RenderContext<'_>,
        condition: &Expression,
        body: &Block,
    ) -> Result<()> {
        modifier(cx, "While");
        cx.expression(condition, 0)?;
        cx.block(&body.statements, Closer::While)
    }

    fn write_do_while(
        &self,
        cx: &mut RenderContext<'_>,
        body: &Block,
        condition: &Expression,
    ) -> Result<()> {
        cx.write_keyword("Do");
        cx.block(&body.statements, Closer::Do)?;
        cx.write(" ");
        modifier(cx, "While");
        cx.expression(condition, 0)
    }

    fn write_for(
        &self,
        cx: &mut RenderContext<'_>,
        initializer: Option<&Statement>,
        condition: Option<&Expression>,
        increment: Option<&Statement>,
        body: &Block,
    ) -> Result<()> {
        // general for loops become the initializer followed by a While loop
        if let Some(initializer) = initializer {
            cx.statement(initializer)?;
            cx.out.write_line();
        }

        modifier(cx, "While");
        match condition {
            Some(condition) => cx.expression(condition, 0)?,
            None => cx.keyword(Keyword::True),
        }

        let mut statements = body.statements.clone();
        statements.extend(increment.cloned());
        cx.block(&statements, Closer::While)
    }

    fn supports_counted_loop(&self, counted: &CountedLoop<'_>) -> bool {
        let Some((operator, bound)) = counted.bound else {
            return false;
        };
        let direction = matches!(
            (operator, counted.step),
            (BinaryOperator::LessThan | BinaryOperator::LessThanOrEqual, 1)
                | (BinaryOperator::GreaterThan | BinaryOperator::GreaterThanOrEqual, -1)
        );
        direction && is_simple_bound(bound)
    }

    fn write_counted_loop(
        &self,
        cx: &mut RenderContext<'_>,
        counted: &CountedLoop<'_>,
    ) -> Result<()> {
        let Some((operator, bound)) = counted.bound else {
            return Err(unsupported_error!("counted loop without bound", NAME));
        };

        modifier(cx, "For");
        if counted.declares {
            cx.declare_variable(counted.variable);
            as_clause(cx, &counted.variable.variable_type)?;
        } else {
            cx.refer_variable(counted.variable);
        }
        cx.write(" = ");
        cx.expression(counted.start, 0)?;
        cx.write(" ");
        modifier(cx, "To");

        // exclusive bounds become inclusive ones
        let delta = match operator {
            BinaryOperator::LessThan => -1,
            BinaryOperator::GreaterThan => 1,
            _ => 0,
        };
        cx.expression(&offset_expression(bound, delta), 0)?;
        if counted.step < 0 {
            cx.write(" ");
            modifier(cx, "Step");
            cx.out.write_literal("-1");
        }

        cx.block(counted.body, Closer::For)
    }

    fn write_foreach(
        &self,
        cx: &mut RenderContext<'_>,
        variable: &Variable,
        collection: &Expression,
        body: &Block,
    ) -> Result<()> {
        modifier(cx, "For");
        modifier(cx, "Each");
        cx.declare_variable(variable);
        as_clause(cx, &variable.variable_type)?;
        cx.write(" ");
        modifier(cx, "In");
        cx.expression(collection, 0)?;
        cx.block(&body.statements, Closer::For)
    }

    fn write_jump(&self, cx: &mut RenderContext<'_>, jump: Jump) -> Result<()> {
        let (keyword, loops_only) = match jump {
            Jump::Break => ("Exit", false),
            Jump::Continue => ("Continue", true),
        };
        let construct = match cx.innermost_breakable(loops_only) {
            Some(Breakable::For) => "For",
            Some(Breakable::While) => "While",
            Some(Breakable::Do) => "Do",
            Some(Breakable::Switch) => "Select",
            None => return Err(unsupported_error!("jump outside a loop", NAME)),
        };
        modifier(cx, keyword);
        cx.write_keyword(construct);
        Ok(())
    }

    fn write_try(
        &self,
        cx: &mut RenderContext<'_>,
        try_block: &Block,
        catch_clauses: &[CatchClause],
        finally_block: Option<&Block>,
        fault_block: Option<&Block>,
    ) -> Result<()> {
        cx.write_keyword("Try");
        cx.block(&try_block.statements, Closer::Clause)?;

        for clause in catch_clauses {
            cx.write_keyword("Catch");

            let catch_all = clause.variable.is_none()
                && clause
                    .catch_type
                    .as_reference()
                    .is_some_and(|reference| reference.is("System", "Object"));
            if !catch_all {
                cx.write(" ");
                match &clause.variable {
                    Some(variable) => cx.declare_variable(variable),
                    None => cx.out.write_declaration("ex", None),
                }
                as_clause(cx, &clause.catch_type)?;
            }
            if let Some(filter) = &clause.filter {
                cx.write(" ");
                modifier(cx, "When");
                cx.expression(filter, 0)?;
            }
            cx.block(&clause.body.statements, Closer::Clause)?;
        }

        if let Some(fault_block) = fault_block {
            cx.comment("fault");
            cx.out.write_line();
            cx.write_keyword("Finally");
            cx.block(&fault_block.statements, Closer::Clause)?;
        }

        if let Some(finally_block) = finally_block {
            cx.write_keyword("Finally");
            cx.block(&finally_block.statements, Closer::Clause)?;
        }

        cx.write_keyword("End Try");
        Ok(())
    }

    fn write_switch(
        &self,
        cx: &mut RenderContext<'_>,
        value: &Expression,
        cases: &[SwitchCase],
    ) -> Result<()> {
        modifier(cx, "Select");
        modifier(cx, "Case");
        cx.expression(value, 0)?;
        self.open_block(cx.out);

        for (index, case) in cases.iter().enumerate() {
            if index > 0 {
                cx.out.write_line();
            }
            cx.write_keyword("Case");
            cx.write(" ");
            if case.is_default() {
                cx.write_keyword("Else");
            } else {
                cx.expression_list(&case.labels)?;
            }

            // sections never fall through
            let statements = match case.body.statements.as_slice() {
                [rest @ .., Statement::Break] => rest,
                statements => statements,
            };
            cx.clause_body(statements)?;
        }

        if !cases.is_empty() {
            cx.out.write_line();
        }
        self.close_block(cx.out, Closer::Switch);
        Ok(())
    }

    fn write_lock(
        &self,
        cx: &mut RenderContext<'_>,
        target: &Expression,
        body: &Block,
    ) -> Result<()> {
        modifier(cx, "SyncLock");
        cx.expression(target, 0)?;
        cx.block(&body.statements, Closer::Lock)
    }

    fn write_using(
        &self,
        cx: &mut RenderContext<'_>,
        resource: &Expression,
        body: &Block,
    ) -> Result<()> {
        modifier(cx, "Using");
        cx.expression(resource, 0)?;
        cx.block(&body.statements, Closer::Using)
    }

    fn write_fixed(
        &self,
        _cx: &mut RenderContext<'_>,
        _variable: &Variable,
        _value: &Expression,
        _body: &Block,
    ) -> Result<()> {
        Err(unsupported_error!("fixed statement", NAME))
    }

    fn write_event_handler(
        &self,
        cx: &mut RenderContext<'_>,
        action: HandlerAction,
        event: &Expression,
        listener: &Expression,
    ) -> Result<()> {
        modifier(
            cx,
            match action {
                HandlerAction::Attach => "AddHandler",
                HandlerAction::Remove => "RemoveHandler",
            },
        );
        cx.expression(event, 0)?;
        cx.write(", ");
        cx.expression(listener, 0)
    }

    fn write_debug_break(&self, cx: &mut RenderContext<'_>) -> Result<()> {
        cx.write_keyword("Stop");
        Ok(())
    }

    fn write_namespace_header(&self, cx: &mut RenderContext<'_>, name: &str) {
        cx.keyword(Keyword::Namespace);
        cx.write(" ");
        cx.out
            .write_declaration(name, Some(&Entity::Namespace(name.to_string())));
    }

    fn write_type_header(
        &self,
        cx: &mut RenderContext<'_>,
        declaration: &TypeDeclaration,
        _base: Option<&TypeReference>,
        _interfaces: &[TypeReference],
    ) -> Result<()> {
        visibility(cx, declaration.visibility);

        let kind = declaration.kind();
        if kind == TypeKind::Class {
            if declaration.is_static_class() || declaration.is_sealed() {
                modifier(cx, "NotInheritable");
            } else if declaration.is_abstract() {
                modifier(cx, "MustInherit");
            }
        }
        modifier(
            cx,
            match kind {
                TypeKind::Class => "Class",
                TypeKind::Struct => "Structure",
                TypeKind::Interface => "Interface",
                TypeKind::Enum => "Enum",
                TypeKind::Delegate => "Delegate",
            },
        );

        cx.declare(
            strip_arity(&declaration.name),
            Some(Entity::Type(declaration.reference())),
        );
        generic_parameters(cx, &declaration.generic_parameters)?;

        if kind == TypeKind::Enum {
            if let Some(underlying) = enum_underlying_type(declaration) {
                as_clause(cx, &underlying)?;
            }
        }
        Ok(())
    }

    fn open_type_body(
        &self,
        cx: &mut RenderContext<'_>,
        kind: TypeKind,
        base: Option<&TypeReference>,
        interfaces: &[TypeReference],
    ) -> Result<bool> {
        self.open_block(cx.out);

        let mut wrote = false;
        if let Some(base) = base {
            modifier(cx, "Inherits");
            cx.write_type_reference(base)?;
            cx.out.write_line();
            wrote = true;
        }
        if !interfaces.is_empty() {
            // interfaces inherit interfaces, everything else implements them
            modifier(
                cx,
                if kind == TypeKind::Interface {
                    "Inherits"
                } else {
                    "Implements"
                },
            );
            for (index, interface) in interfaces.iter().enumerate() {
                if index > 0 {
                    cx.write(", ");
                }
                cx.write_type_reference(interface)?;
            }
            cx.out.write_line();
            wrote = true;
        }
        Ok(wrote)
    }

    fn write_enum_member(
        &self,
        cx: &mut RenderContext<'_>,
        field: &FieldDeclaration,
        _last: bool,
    ) -> Result<()> {
        cx.declare(&field.name, Some(Entity::Field(field.reference())));
        if let Some(constant) = &field.constant {
            cx.write(" = ");
            cx.literal(constant)?;
        }
        Ok(())
    }

    fn write_delegate(
        &self,
        cx: &mut RenderContext<'_>,
        declaration: &TypeDeclaration,
        invoke: &MethodDeclaration,
    ) -> Result<()> {
        visibility(cx, declaration.visibility);
        modifier(cx, "Delegate");
        let function = !matches!(invoke.return_type, TypeSignature::Void);
        modifier(cx, if function { "Function" } else { "Sub" });
        cx.declare(
            strip_arity(&declaration.name),
            Some(Entity::Type(declaration.reference())),
        );
        generic_parameters(cx, &declaration.generic_parameters)?;
        cx.parameters(&invoke.parameters)?;
        if function {
            as_clause(cx, &invoke.return_type)?;
        }
        Ok(())
    }

    fn write_field(&self, cx: &mut RenderContext<'_>, field: &FieldDeclaration) -> Result<()> {
        visibility(cx, field.visibility);
        if field.is_literal() {
            modifier(cx, "Const");
        } else {
            if field.is_static() {
                modifier(cx, "Shared");
            }
            if field.modifiers.contains(FieldModifiers::INIT_ONLY) {
                modifier(cx, "ReadOnly");
            }
        }

        cx.declare(&field.name, Some(Entity::Field(field.reference())));
        as_clause(cx, &field.field_type)?;
        if let (true, Some(constant)) = (field.is_literal(), &field.constant) {
            cx.write(" = ");
            cx.literal(constant)?;
        }
        Ok(())
    }

    fn write_method_header(
        &self,
        cx: &mut RenderContext<'_>,
        method: &MethodDeclaration,
        in_interface: bool,
    ) -> Result<()> {
        let type_initializer = method.is_constructor() && method.is_static();
        if !in_interface && !type_initializer {
            visibility(cx, method.visibility);
        }
        if method.is_static() {
            modifier(cx, "Shared");
        }
        if !in_interface {
            inheritance_modifiers(cx, method);
        }

        let function =
            !method.is_constructor() && !matches!(method.return_type, TypeSignature::Void);
        modifier(cx, if function { "Function" } else { "Sub" });

        let entity = Some(Entity::Method(method.reference()));
        if method.is_constructor() {
            cx.out.write_declaration("New", entity.as_ref());
        } else {
            cx.declare(&method.name, entity);
            generic_parameters(cx, &method.generic_parameters)?;
        }

        cx.parameters(&method.parameters)?;
        if function {
            as_clause(cx, &method.return_type)?;
        }
        Ok(())
    }

    fn write_property(
        &self,
        cx: &mut RenderContext<'_>,
        property: &PropertyDeclaration,
        in_interface: bool,
    ) -> Result<()> {
        let member_visibility = property.visibility();
        let accessors = property.accessors();
        if property.is_indexer() && property.name == "Item" {
            modifier(cx, "Default");
        }
        if !in_interface {
            if let Some(visibility) = member_visibility {
                self::visibility(cx, visibility);
            }
            if property.is_static() {
                modifier(cx, "Shared");
            }
            if let Some(primary) = accessors.first() {
                inheritance_modifiers(cx, primary);
            }
        }
        match (&property.getter, &property.setter) {
            (Some(_), None) => modifier(cx, "ReadOnly"),
            (None, Some(_)) => modifier(cx, "WriteOnly"),
            _ => {}
        }

        modifier(cx, "Property");
        cx.declare(&property.name, Some(Entity::Property(property.reference())));
        if property.is_indexer() {
            cx.parameters(&property.parameters)?;
        }
        as_clause(cx, &property.property_type)?;

        let with_bodies =
            !in_interface && accessors.iter().any(|method| statements_of(method).is_some());
        if !with_bodies {
            return Ok(());
        }

        self.open_block(cx.out);
        if let Some(getter) = &property.getter {
            accessor(cx, "Get", member_visibility, getter, Closer::Get)?;
            cx.out.write_line();
        }
        if let Some(setter) = &property.setter {
            if let Some(visibility) = accessor_visibility(member_visibility, setter) {
                self::visibility(cx, visibility);
            }
            cx.write_keyword("Set");
            cx.write("(");
            cx.out.write_declaration("value", None);
            as_clause(cx, &property.property_type)?;
            cx.write(")");
            let empty = Block::default();
            cx.method_body(statements_of(setter).unwrap_or(&empty), Closer::Set)?;
            cx.out.write_line();
        }
        self.close_block(cx.out, Closer::Property);
        Ok(())
    }

    fn write_event(
        &self,
        cx: &mut RenderContext<'_>,
        event: &EventDeclaration,
        in_interface: bool,
    ) -> Result<()> {
        if !in_interface {
            if let Some(visibility) = event.visibility() {
                self::visibility(cx, visibility);
            }
            if event.is_static() {
                modifier(cx, "Shared");
            }
        }
        modifier(cx, "Event");
        cx.declare(&event.name, Some(Entity::Event(event.reference())));
        as_clause(cx, &event.event_type)
    }

    fn write_parameter(&self, cx: &mut RenderContext<'_>, parameter: &Parameter) -> Result<()> {
        if cx.config.show_custom_attributes {
            for attribute in &parameter.custom_attributes {
                if attribute.attribute_type().is("System", "ParamArrayAttribute") {
                    continue;
                }
                cx.attribute(attribute, None)?;
                cx.write(" ");
            }
        }

        if parameter.default.is_some() {
            modifier(cx, "Optional");
        }
        if parameter.is_out() || parameter.is_ref() {
            modifier(cx, "ByRef");
        } else if parameter.is_params() {
            modifier(cx, "ParamArray");
        }

        cx.declare_parameter(parameter);
        as_clause(cx, &parameter.parameter_type)?;
        if let Some(default) = &parameter.default {
            cx.write(" = ");
            cx.literal(default)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literals() {
        assert_eq!(VisualBasic.string_literal(""), "\"\"");
        assert_eq!(VisualBasic.string_literal("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(VisualBasic.string_literal("a\nb"), "\"a\" & ChrW(10) & \"b\"");
        assert_eq!(VisualBasic.string_literal("\t"), "ChrW(9)");
    }

    #[test]
    fn test_char_literals() {
        assert_eq!(VisualBasic.char_literal('a'), "\"a\"c");
        assert_eq!(VisualBasic.char_literal('"'), "\"\"\"\"c");
        assert_eq!(VisualBasic.char_literal('\0'), "ChrW(0)");
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert!(VisualBasic.is_keyword("Integer"));
        assert!(VisualBasic.is_keyword("INTEGER"));
        assert!(!VisualBasic.is_keyword("Count"));
    }

    #[test]
    fn test_null_comparisons_use_is() {
        assert_eq!(VisualBasic.binary_operator(BinaryOperator::ValueEquality, true), "Is");
        assert_eq!(VisualBasic.binary_operator(BinaryOperator::ValueEquality, false), "=");
        assert_eq!(
            VisualBasic.binary_operator(BinaryOperator::ValueInequality, true),
            "IsNot"
        );
    }

    #[test]
    fn test_offset_expression_folds_literals() {
        let folded = offset_expression(&Expression::literal(10), -1);
        assert_eq!(folded, Expression::literal(9));

        let variable = Expression::ArgumentReference {
            name: "n".into(),
            position: 0,
        };
        let offset = offset_expression(&variable, -1);
        assert!(matches!(
            offset,
            Expression::Binary {
                operator: BinaryOperator::Subtract,
                ..
            }
        ));
    }
}
