//! C# spelling.

use crate::{
    model::{
        BinaryOperator, Block, CatchClause, EventDeclaration, Expression, FieldDeclaration,
        FieldModifiers, GenericParameter, GenericParameterFlags, Literal, MethodDeclaration,
        MethodModifiers, MethodReference, Parameter, PrimitiveKind, PropertyDeclaration,
        Statement, SwitchCase, TypeDeclaration, TypeKind, TypeReference, TypeSignature,
        UnaryOperator, Variable, Visibility,
    },
    query::strip_arity,
    render::{
        context::RenderContext,
        declarations::{
            accessor_visibility, enum_underlying_type, inheritance, statements_of, Inheritance,
        },
        sink::{Entity, Formatter},
        statements::CountedLoop,
        syntax::{
            contains_sorted, AddressKind, AttributeTarget, CastKind, Closer, HandlerAction, Jump,
            Keyword, Level, Syntax, TypeOperator,
        },
    },
    Result,
};

/// Reserved words, sorted
pub(crate) const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// The C# syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharp;

fn escape_into(text: &mut String, c: char, quote: char) {
    match c {
        '\\' => text.push_str("\\\\"),
        '\0' => text.push_str("\\0"),
        '\n' => text.push_str("\\n"),
        '\r' => text.push_str("\\r"),
        '\t' => text.push_str("\\t"),
        '\u{7}' => text.push_str("\\a"),
        '\u{8}' => text.push_str("\\b"),
        '\u{b}' => text.push_str("\\v"),
        '\u{c}' => text.push_str("\\f"),
        c if c == quote => {
            text.push('\\');
            text.push(c);
        }
        c if c.is_control() => text.push_str(&format!("\\u{:04X}", c as u32)),
        c => text.push(c),
    }
}

/// `<out T, in U>`
fn generic_parameters(cx: &mut RenderContext<'_>, parameters: &[GenericParameter]) {
    if parameters.is_empty() {
        return;
    }

    cx.write("<");
    for (index, parameter) in parameters.iter().enumerate() {
        if index > 0 {
            cx.write(", ");
        }
        if parameter.flags.contains(GenericParameterFlags::COVARIANT) {
            cx.write_keyword("out");
            cx.write(" ");
        } else if parameter.flags.contains(GenericParameterFlags::CONTRAVARIANT) {
            cx.write_keyword("in");
            cx.write(" ");
        }
        cx.declare(&parameter.name, None);
    }
    cx.write(">");
}

/// ` where T : class, IComparable<T>, new()` for every constrained parameter
fn constraints(cx: &mut RenderContext<'_>, parameters: &[GenericParameter]) -> Result<()> {
    for parameter in parameters.iter().filter(|parameter| parameter.has_constraints()) {
        cx.write(" ");
        cx.write_keyword("where");
        cx.write(" ");
        cx.out.write_reference(&parameter.name, &parameter.name, None);
        cx.write(" : ");

        let value_type = parameter
            .flags
            .contains(GenericParameterFlags::NOT_NULLABLE_VALUE_TYPE_CONSTRAINT);
        let mut first = true;
        let mut separate = |cx: &mut RenderContext<'_>| {
            if !first {
                cx.write(", ");
            }
            first = false;
        };

        if parameter.flags.contains(GenericParameterFlags::REFERENCE_TYPE_CONSTRAINT) {
            separate(cx);
            cx.write_keyword("class");
        }
        if value_type {
            separate(cx);
            cx.write_keyword("struct");
        }
        for constraint in &parameter.constraints {
            let implied = value_type
                && constraint
                    .as_reference()
                    .is_some_and(|reference| reference.is("System", "ValueType"));
            if implied {
                continue;
            }
            separate(cx);
            cx.write_type(constraint)?;
        }
        if parameter.flags.contains(GenericParameterFlags::DEFAULT_CONSTRUCTOR_CONSTRAINT)
            && !value_type
        {
            separate(cx);
            cx.write_keyword("new");
            cx.write("()");
        }
    }
    Ok(())
}

fn modifier(cx: &mut RenderContext<'_>, keyword: &str) {
    cx.write_keyword(keyword);
    cx.write(" ");
}

fn visibility(cx: &mut RenderContext<'_>, visibility: Visibility) {
    let keyword = CSharp.visibility_keyword(visibility);
    modifier(cx, keyword);
}

fn inheritance_modifiers(cx: &mut RenderContext<'_>, method: &MethodDeclaration) {
    let keywords: &[&str] = match inheritance(method, cx.model) {
        Inheritance::Plain => &[],
        Inheritance::Abstract => &["abstract"],
        Inheritance::AbstractOverride => &["abstract", "override"],
        Inheritance::Virtual => &["virtual"],
        Inheritance::Override => &["override"],
        Inheritance::SealedOverride => &["sealed", "override"],
        Inheritance::NewVirtual => &["new", "virtual"],
    };
    for keyword in keywords {
        modifier(cx, keyword);
    }
}

/// `get`/`set`/`add`/`remove` with its body, or a terminated accessor without one
fn accessor(
    cx: &mut RenderContext<'_>,
    keyword: &str,
    member_visibility: Option<Visibility>,
    method: &MethodDeclaration,
) -> Result<()> {
    if let Some(visibility) = accessor_visibility(member_visibility, method) {
        self::visibility(cx, visibility);
    }
    cx.write_keyword(keyword);
    match statements_of(method) {
        Some(body) => cx.method_body(body, Closer::Function),
        None => {
            cx.terminate();
            Ok(())
        }
    }
}

impl Syntax for CSharp {
    fn name(&self) -> &'static str {
        "C#"
    }

    fn is_keyword(&self, name: &str) -> bool {
        contains_sorted(KEYWORDS, name)
    }

    fn escape_keyword(&self, name: &str) -> String {
        format!("@{name}")
    }

    fn constructor_name(&self, declaring: &TypeReference) -> String {
        strip_arity(&declaring.name).to_string()
    }

    fn keyword(&self, keyword: Keyword) -> &'static str {
        match keyword {
            Keyword::Null => "null",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::This => "this",
            Keyword::Base => "base",
            Keyword::New => "new",
            Keyword::Return => "return",
            Keyword::Throw => "throw",
            Keyword::Goto => "goto",
            Keyword::Namespace => "namespace",
        }
    }

    fn primitive_keyword(&self, kind: PrimitiveKind) -> Option<&'static str> {
        Some(match kind {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Boolean => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::SByte => "sbyte",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Int16 => "short",
            PrimitiveKind::UInt16 => "ushort",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::UInt32 => "uint",
            PrimitiveKind::Int64 => "long",
            PrimitiveKind::UInt64 => "ulong",
            PrimitiveKind::Single => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::String => "string",
            PrimitiveKind::Object => "object",
            PrimitiveKind::IntPtr | PrimitiveKind::UIntPtr => return None,
        })
    }

    fn visibility_keyword(&self, visibility: Visibility) -> &'static str {
        match visibility {
            Visibility::CompilerControlled | Visibility::Private => "private",
            Visibility::FamilyAndAssembly => "private protected",
            Visibility::Assembly => "internal",
            Visibility::Family => "protected",
            Visibility::FamilyOrAssembly => "protected internal",
            Visibility::Public => "public",
        }
    }

    fn comment_prefix(&self) -> &'static str {
        "//"
    }

    fn terminator(&self) -> &'static str {
        ";"
    }

    fn hex_prefix(&self) -> &'static str {
        "0x"
    }

    fn integer_suffix(&self, literal: &Literal) -> &'static str {
        match literal {
            Literal::UInt32(_) => "U",
            Literal::Int64(_) => "L",
            Literal::UInt64(_) => "UL",
            _ => "",
        }
    }

    fn single_suffix(&self) -> &'static str {
        "f"
    }

    fn string_literal(&self, value: &str) -> String {
        let mut text = String::with_capacity(value.len() + 2);
        text.push('"');
        for c in value.chars() {
            escape_into(&mut text, c, '"');
        }
        text.push('"');
        text
    }

    fn char_literal(&self, value: char) -> String {
        let mut text = String::from("'");
        escape_into(&mut text, value, '\'');
        text.push('\'');
        text
    }

    fn generic_brackets(&self) -> (&'static str, &'static str) {
        ("<", ">")
    }

    fn index_brackets(&self) -> (&'static str, &'static str) {
        ("[", "]")
    }

    fn attribute_brackets(&self) -> (&'static str, &'static str) {
        ("[", "]")
    }

    fn attribute_target(&self, target: AttributeTarget) -> &'static str {
        match target {
            AttributeTarget::Assembly => "assembly",
            AttributeTarget::Module => "module",
        }
    }

    fn named_argument_separator(&self) -> &'static str {
        " = "
    }

    fn supports_pointers(&self) -> bool {
        true
    }

    fn allows_embedded_statement(&self) -> bool {
        true
    }

    fn named_indexers(&self) -> bool {
        false
    }

    fn binary_operator(&self, operator: BinaryOperator, _null_operand: bool) -> &'static str {
        match operator {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulus => "%",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::IdentityEquality | BinaryOperator::ValueEquality => "==",
            BinaryOperator::IdentityInequality | BinaryOperator::ValueInequality => "!=",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::BitwiseExclusiveOr => "^",
            BinaryOperator::BooleanOr => "||",
            BinaryOperator::BooleanAnd => "&&",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
        }
    }

    fn binary_precedence(&self, operator: BinaryOperator) -> u8 {
        match operator {
            BinaryOperator::BooleanOr => 4,
            BinaryOperator::BooleanAnd => 5,
            BinaryOperator::BitwiseOr => 6,
            BinaryOperator::BitwiseExclusiveOr => 7,
            BinaryOperator::BitwiseAnd => 8,
            BinaryOperator::IdentityEquality
            | BinaryOperator::IdentityInequality
            | BinaryOperator::ValueEquality
            | BinaryOperator::ValueInequality => 9,
            BinaryOperator::LessThan
            | BinaryOperator::LessThanOrEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterThanOrEqual => 10,
            BinaryOperator::ShiftLeft | BinaryOperator::ShiftRight => 11,
            BinaryOperator::Add | BinaryOperator::Subtract => 12,
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulus => 13,
        }
    }

    fn unary_operator(&self, operator: UnaryOperator) -> &'static str {
        match operator {
            UnaryOperator::Negate => "-",
            UnaryOperator::BooleanNot => "!",
            UnaryOperator::BitwiseNot => "~",
            UnaryOperator::PreIncrement | UnaryOperator::PostIncrement => "++",
            UnaryOperator::PreDecrement | UnaryOperator::PostDecrement => "--",
        }
    }

    fn unary_precedence(&self, _operator: UnaryOperator) -> u8 {
        14
    }

    fn precedence(&self, level: Level) -> u8 {
        match level {
            Level::Assignment => 1,
            Level::Conditional => 2,
            Level::NullCoalescing => 3,
            Level::Unary => 14,
            Level::Primary => 15,
        }
    }

    fn cast_precedence(&self, kind: CastKind) -> u8 {
        match kind {
            CastKind::Cast => 14,
            CastKind::TryCast | CastKind::CanCast => 10,
        }
    }

    fn open_block(&self, out: &mut dyn Formatter) {
        out.write_line();
        out.write("{");
        out.write_indent();
        out.write_line();
    }

    fn close_block(&self, out: &mut dyn Formatter, _closer: Closer) {
        out.write_outdent();
        out.write("}");
    }

    fn write_assign(
        &self,
        cx: &mut RenderContext<'_>,
        target: &Expression,
        operator: Option<BinaryOperator>,
        value: &Expression,
        _statement: bool,
    ) -> Result<()> {
        cx.operand(target, Level::Unary)?;
        cx.write(" ");
        if let Some(operator) = operator {
            cx.write(self.binary_operator(operator, false));
        }
        cx.write("= ");
        cx.operand(value, Level::Assignment)
    }

    fn write_step(
        &self,
        cx: &mut RenderContext<'_>,
        operator: UnaryOperator,
        operand: &Expression,
        _statement: bool,
    ) -> Result<()> {
        let text = self.unary_operator(operator);
        if operator.is_postfix() {
            cx.operand(operand, Level::Primary)?;
            cx.write(text);
            Ok(())
        } else {
            cx.write(text);
            cx.operand(operand, Level::Unary)
        }
    }

    fn write_conditional(
        &self,
        cx: &mut RenderContext<'_>,
        condition: &Expression,
        then_value: &Expression,
        else_value: &Expression,
    ) -> Result<()> {
        cx.operand(condition, Level::NullCoalescing)?;
        cx.write(" ? ");
        cx.operand(then_value, Level::Conditional)?;
        cx.write(" : ");
        cx.operand(else_value, Level::Conditional)
    }

    fn write_null_coalescing(
        &self,
        cx: &mut RenderContext<'_>,
        value: &Expression,
        fallback: &Expression,
    ) -> Result<()> {
        let precedence = cx.level(Level::NullCoalescing);
        cx.expression(value, precedence + 1)?;
        cx.write(" ?? ");
        cx.expression(fallback, precedence)
    }

    fn write_cast(
        &self,
        cx: &mut RenderContext<'_>,
        kind: CastKind,
        target_type: &TypeSignature,
        value: &Expression,
    ) -> Result<()> {
        match kind {
            CastKind::Cast => {
                cx.write("(");
                cx.write_type(target_type)?;
                cx.write(")");
                cx.operand(value, Level::Unary)
            }
            CastKind::TryCast | CastKind::CanCast => {
                cx.expression(value, self.cast_precedence(kind))?;
                cx.write(" ");
                cx.write_keyword(if kind == CastKind::TryCast { "as" } else { "is" });
                cx.write(" ");
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
        cx.write_keyword(match operator {
            TypeOperator::TypeOf => "typeof",
            TypeOperator::SizeOf => "sizeof",
            TypeOperator::Default => "default",
        });
        cx.write("(");
        cx.write_type(operand)?;
        cx.write(")");
        Ok(())
    }

    fn write_address(
        &self,
        cx: &mut RenderContext<'_>,
        kind: AddressKind,
        operand: &Expression,
    ) -> Result<()> {
        match kind {
            AddressKind::Of => {
                cx.write("&");
                cx.operand(operand, Level::Unary)
            }
            AddressKind::Dereference => {
                cx.write("*");
                cx.operand(operand, Level::Unary)
            }
            AddressKind::Out | AddressKind::Reference => {
                modifier(cx, if kind == AddressKind::Out { "out" } else { "ref" });
                cx.operand(operand, Level::Primary)
            }
        }
    }

    fn write_array_create(
        &self,
        cx: &mut RenderContext<'_>,
        element_type: &TypeSignature,
        dimensions: &[Expression],
        initializer: Option<&Expression>,
    ) -> Result<()> {
        // the sized rank comes first: `new int[3][]`
        let mut innermost = element_type;
        let mut ranks = Vec::new();
        while let TypeSignature::Array { element, rank } = innermost {
            ranks.push(*rank);
            innermost = element;
        }

        modifier(cx, "new");
        cx.write_type(innermost)?;
        cx.write("[");
        cx.expression_list(dimensions)?;
        cx.write("]");
        for rank in ranks {
            cx.write(&format!("[{}]", ",".repeat(rank.saturating_sub(1) as usize)));
        }

        if let Some(initializer) = initializer {
            cx.write(" ");
            cx.expression(initializer, 0)?;
        }
        Ok(())
    }

    fn write_delegate_create(
        &self,
        cx: &mut RenderContext<'_>,
        delegate_type: &TypeSignature,
        target: Option<&Expression>,
        method: &MethodReference,
    ) -> Result<()> {
        modifier(cx, "new");
        cx.write_type(delegate_type)?;
        cx.write("(");
        cx.method_name(target, method)?;
        cx.write(")");
        Ok(())
    }

    fn method_group_prefix(&self) -> Option<&'static str> {
        None
    }

    fn chained_constructor_member(&self) -> Option<&'static str> {
        None
    }

    fn write_variable_declaration(
        &self,
        cx: &mut RenderContext<'_>,
        variable: &Variable,
    ) -> Result<()> {
        cx.write_type(&variable.variable_type)?;
        cx.write(" ");
        cx.declare_variable(variable);
        Ok(())
    }

    fn write_anonymous_method(
        &self,
        cx: &mut RenderContext<'_>,
        parameters: &[Parameter],
        _return_type: &TypeSignature,
        body: &Block,
    ) -> Result<()> {
        cx.write_keyword("delegate");
        cx.parameters(parameters)?;
        cx.method_body(body, Closer::AnonymousFunction)
    }

    fn write_if(
        &self,
        cx: &mut RenderContext<'_>,
        condition: &Expression,
        then_block: &Block,
        else_block: Option<&Block>,
    ) -> Result<()> {
        cx.write_keyword("if");
        cx.write(" (");
        cx.expression(condition, 0)?;
        cx.write(")");
        cx.embedded(&then_block.statements, Closer::If)?;

        let Some(else_block) = else_block else {
            return Ok(());
        };
        cx.out.write_line();
        cx.flush_outdent();
        cx.write_keyword("else");
        match else_block.statements.as_slice() {
            [chained @ Statement::If { .. }] => {
                cx.write(" ");
                cx.statement(chained)
            }
            statements => cx.embedded(statements, Closer::If),
        }
    }

    fn write_while(
        &self,
        cx: &mut RenderContext<'_>,
        condition: &Expression,
        body: &Block,
    ) -> Result<()> {
        cx.write_keyword("while");
        cx.write(" (");
        cx.expression(condition, 0)?;
        cx.write(")");
        cx.embedded(&body.statements, Closer::While)
    }

    fn write_do_while(
        &self,
        cx: &mut RenderContext<'_>,
        body: &Block,
        condition: &Expression,
    ) -> Result<()> {
        cx.write_keyword("do");
        cx.block(&body.statements, Closer::Do)?;
        cx.write(" ");
        cx.write_keyword("while");
        cx.write(" (");
        cx.expression(condition, 0)?;
        cx.write(");");
        Ok(())
    }

    fn write_for(
        &self,
        cx: &mut RenderContext<'_>,
        initializer: Option<&Statement>,
        condition: Option<&Expression>,
        increment: Option<&Statement>,
        body: &Block,
    ) -> Result<()> {
        let clause = |cx: &mut RenderContext<'_>, statement: &Statement| match statement {
            Statement::Expression(expression) => cx.statement_expression(expression),
            _ => Err(unsupported_error!("non-expression for clause", "C#")),
        };

        cx.write_keyword("for");
        cx.write(" (");
        if let Some(initializer) = initializer {
            clause(cx, initializer)?;
        }
        cx.write(";");
        if let Some(condition) = condition {
            cx.write(" ");
            cx.expression(condition, 0)?;
        }
        cx.write(";");
        if let Some(increment) = increment {
            cx.write(" ");
            clause(cx, increment)?;
        }
        cx.write(")");
        cx.embedded(&body.statements, Closer::For)
    }

    fn supports_counted_loop(&self, _counted: &CountedLoop<'_>) -> bool {
        true
    }

    fn write_counted_loop(
        &self,
        cx: &mut RenderContext<'_>,
        counted: &CountedLoop<'_>,
    ) -> Result<()> {
        cx.write_keyword("for");
        cx.write(" (");
        cx.statement_expression(counted.initializer)?;
        cx.write("; ");
        cx.expression(counted.condition, 0)?;
        cx.write("; ");
        cx.statement_expression(counted.increment)?;
        cx.write(")");
        cx.embedded(counted.body, Closer::For)
    }

    fn write_foreach(
        &self,
        cx: &mut RenderContext<'_>,
        variable: &Variable,
        collection: &Expression,
        body: &Block,
    ) -> Result<()> {
        cx.write_keyword("foreach");
        cx.write(" (");
        self.write_variable_declaration(cx, variable)?;
        cx.write(" ");
        cx.write_keyword("in");
        cx.write(" ");
        cx.expression(collection, 0)?;
        cx.write(")");
        cx.embedded(&body.statements, Closer::For)
    }

    fn write_jump(&self, cx: &mut RenderContext<'_>, jump: Jump) -> Result<()> {
        cx.write_keyword(match jump {
            Jump::Break => "break",
            Jump::Continue => "continue",
        });
        cx.terminate();
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
        cx.write_keyword("try");
        cx.block(&try_block.statements, Closer::Clause)?;

        for clause in catch_clauses {
            cx.out.write_line();
            cx.write_keyword("catch");

            let catch_all = clause.variable.is_none()
                && clause.filter.is_none()
                && clause
                    .catch_type
                    .as_reference()
                    .is_some_and(|reference| reference.is("System", "Object"));
            if !catch_all {
                cx.write(" (");
                cx.write_type(&clause.catch_type)?;
                if let Some(variable) = &clause.variable {
                    cx.write(" ");
                    cx.declare_variable(variable);
                }
                cx.write(")");
            }
            if let Some(filter) = &clause.filter {
                cx.write(" ");
                cx.write_keyword("when");
                cx.write(" (");
                cx.expression(filter, 0)?;
                cx.write(")");
            }
            cx.block(&clause.body.statements, Closer::Clause)?;
        }

        if let Some(fault_block) = fault_block {
            cx.out.write_line();
            cx.comment("fault");
            cx.out.write_line();
            cx.write_keyword("finally");
            cx.block(&fault_block.statements, Closer::Clause)?;
        }

        if let Some(finally_block) = finally_block {
            cx.out.write_line();
            cx.write_keyword("finally");
            cx.block(&finally_block.statements, Closer::Clause)?;
        }
        Ok(())
    }

    fn write_switch(
        &self,
        cx: &mut RenderContext<'_>,
        value: &Expression,
        cases: &[SwitchCase],
    ) -> Result<()> {
        cx.write_keyword("switch");
        cx.write(" (");
        cx.expression(value, 0)?;
        cx.write(")");
        self.open_block(cx.out);

        for (index, case) in cases.iter().enumerate() {
            if index > 0 {
                cx.out.write_line();
            }
            if case.is_default() {
                cx.write_keyword("default");
                cx.write(":");
            }
            for (position, label) in case.labels.iter().enumerate() {
                if position > 0 {
                    cx.out.write_line();
                }
                modifier(cx, "case");
                cx.expression(label, 0)?;
                cx.write(":");
            }
            cx.clause_body(&case.body.statements)?;
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
        cx.write_keyword("lock");
        cx.write(" (");
        cx.expression(target, 0)?;
        cx.write(")");
        cx.block(&body.statements, Closer::Lock)
    }

    fn write_using(
        &self,
        cx: &mut RenderContext<'_>,
        resource: &Expression,
        body: &Block,
    ) -> Result<()> {
        cx.write_keyword("using");
        cx.write(" (");
        cx.expression(resource, 0)?;
        cx.write(")");
        cx.block(&body.statements, Closer::Using)
    }

    fn write_fixed(
        &self,
        cx: &mut RenderContext<'_>,
        variable: &Variable,
        value: &Expression,
        body: &Block,
    ) -> Result<()> {
        cx.write_keyword("fixed");
        cx.write(" (");
        self.write_variable_declaration(cx, variable)?;
        cx.write(" = ");
        cx.operand(value, Level::Assignment)?;
        cx.write(")");
        cx.block(&body.statements, Closer::Fixed)
    }

    fn write_event_handler(
        &self,
        cx: &mut RenderContext<'_>,
        action: HandlerAction,
        event: &Expression,
        listener: &Expression,
    ) -> Result<()> {
        cx.operand(event, Level::Primary)?;
        cx.write(match action {
            HandlerAction::Attach => " += ",
            HandlerAction::Remove => " -= ",
        });
        cx.operand(listener, Level::Assignment)?;
        cx.terminate();
        Ok(())
    }

    fn write_debug_break(&self, cx: &mut RenderContext<'_>) -> Result<()> {
        cx.write("System.Diagnostics.");
        cx.write_type_reference(&TypeReference::new("System.Diagnostics", "Debugger"))?;
        cx.write(".Break()");
        cx.terminate();
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
        base: Option<&TypeReference>,
        interfaces: &[TypeReference],
    ) -> Result<()> {
        visibility(cx, declaration.visibility);

        let kind = declaration.kind();
        match kind {
            TypeKind::Class if declaration.is_static_class() => modifier(cx, "static"),
            TypeKind::Class => {
                if declaration.is_abstract() {
                    modifier(cx, "abstract");
                }
                if declaration.is_sealed() {
                    modifier(cx, "sealed");
                }
            }
            _ => {}
        }
        modifier(
            cx,
            match kind {
                TypeKind::Class => "class",
                TypeKind::Struct => "struct",
                TypeKind::Interface => "interface",
                TypeKind::Enum => "enum",
                TypeKind::Delegate => "delegate",
            },
        );

        let name = strip_arity(&declaration.name);
        cx.declare(name, Some(Entity::Type(declaration.reference())));
        generic_parameters(cx, &declaration.generic_parameters);

        if kind == TypeKind::Enum {
            if let Some(underlying) = enum_underlying_type(declaration) {
                cx.write(" : ");
                cx.write_type(&underlying)?;
            }
        } else {
            let mut first = true;
            for reference in base.into_iter().chain(interfaces) {
                cx.write(if first { " : " } else { ", " });
                first = false;
                cx.write_type_reference(reference)?;
            }
        }

        constraints(cx, &declaration.generic_parameters)
    }

    fn open_type_body(
        &self,
        cx: &mut RenderContext<'_>,
        _kind: TypeKind,
        _base: Option<&TypeReference>,
        _interfaces: &[TypeReference],
    ) -> Result<bool> {
        self.open_block(cx.out);
        Ok(false)
    }

    fn write_enum_member(
        &self,
        cx: &mut RenderContext<'_>,
        field: &FieldDeclaration,
        last: bool,
    ) -> Result<()> {
        cx.declare(&field.name, Some(Entity::Field(field.reference())));
        if let Some(constant) = &field.constant {
            cx.write(" = ");
            cx.literal(constant)?;
        }
        if !last {
            cx.write(",");
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
        modifier(cx, "delegate");
        cx.write_type(&invoke.return_type)?;
        cx.write(" ");
        cx.declare(
            strip_arity(&declaration.name),
            Some(Entity::Type(declaration.reference())),
        );
        generic_parameters(cx, &declaration.generic_parameters);
        cx.parameters(&invoke.parameters)?;
        constraints(cx, &declaration.generic_parameters)?;
        cx.terminate();
        Ok(())
    }

    fn write_field(&self, cx: &mut RenderContext<'_>, field: &FieldDeclaration) -> Result<()> {
        visibility(cx, field.visibility);
        if field.is_literal() {
            modifier(cx, "const");
        } else {
            if field.is_static() {
                modifier(cx, "static");
            }
            if field.modifiers.contains(FieldModifiers::INIT_ONLY) {
                modifier(cx, "readonly");
            }
        }

        cx.write_type(&field.field_type)?;
        cx.write(" ");
        cx.declare(&field.name, Some(Entity::Field(field.reference())));
        if let (true, Some(constant)) = (field.is_literal(), &field.constant) {
            cx.write(" = ");
            cx.literal(constant)?;
        }
        cx.terminate();
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
            modifier(cx, "static");
        }
        if !in_interface {
            inheritance_modifiers(cx, method);
        }
        if method.modifiers.contains(MethodModifiers::PINVOKE_IMPL) {
            modifier(cx, "extern");
        }

        let entity = Some(Entity::Method(method.reference()));
        if method.is_constructor() {
            let name = method
                .declaring_type()
                .map(|declaring| self.constructor_name(&declaring.reference()))
                .unwrap_or_else(|| method.name.clone());
            cx.out.write_declaration(&name, entity.as_ref());
        } else {
            cx.write_type(&method.return_type)?;
            cx.write(" ");
            cx.declare(&method.name, entity);
            generic_parameters(cx, &method.generic_parameters);
        }

        cx.parameters(&method.parameters)?;
        constraints(cx, &method.generic_parameters)
    }

    fn write_property(
        &self,
        cx: &mut RenderContext<'_>,
        property: &PropertyDeclaration,
        in_interface: bool,
    ) -> Result<()> {
        let member_visibility = property.visibility();
        let accessors = property.accessors();
        if !in_interface {
            if let Some(visibility) = member_visibility {
                self::visibility(cx, visibility);
            }
            if property.is_static() {
                modifier(cx, "static");
            }
            if let Some(primary) = accessors.first() {
                inheritance_modifiers(cx, primary);
            }
        }

        cx.write_type(&property.property_type)?;
        cx.write(" ");
        let entity = Some(Entity::Property(property.reference()));
        if property.is_indexer() {
            cx.out.write_declaration("this", entity.as_ref());
            cx.write("[");
            for (index, parameter) in property.parameters.iter().enumerate() {
                if index > 0 {
                    cx.write(", ");
                }
                self.write_parameter(cx, parameter)?;
            }
            cx.write("]");
        } else {
            cx.declare(&property.name, entity);
        }

        let pairs = [("get", &property.getter), ("set", &property.setter)];
        let with_bodies =
            !in_interface && accessors.iter().any(|method| statements_of(method).is_some());

        if !with_bodies {
            cx.write(" { ");
            for (keyword, method) in pairs {
                if let Some(method) = method {
                    if let Some(visibility) = accessor_visibility(member_visibility, method) {
                        self::visibility(cx, visibility);
                    }
                    cx.write_keyword(keyword);
                    cx.write("; ");
                }
            }
            cx.write("}");
            return Ok(());
        }

        self.open_block(cx.out);
        for (keyword, method) in pairs {
            if let Some(method) = method {
                accessor(cx, keyword, member_visibility, method)?;
                cx.out.write_line();
            }
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
        let member_visibility = event.visibility();
        if !in_interface {
            if let Some(visibility) = member_visibility {
                self::visibility(cx, visibility);
            }
            if event.is_static() {
                modifier(cx, "static");
            }
            if let Some(add) = &event.add_method {
                inheritance_modifiers(cx, add);
            }
        }

        modifier(cx, "event");
        cx.write_type(&event.event_type)?;
        cx.write(" ");
        cx.declare(&event.name, Some(Entity::Event(event.reference())));

        let pairs = [("add", &event.add_method), ("remove", &event.remove_method)];
        let with_bodies = !in_interface
            && pairs
                .iter()
                .any(|(_, method)| method.as_ref().is_some_and(|m| statements_of(m).is_some()));
        if !with_bodies {
            cx.terminate();
            return Ok(());
        }

        self.open_block(cx.out);
        for (keyword, method) in pairs {
            if let Some(method) = method {
                accessor(cx, keyword, member_visibility, method)?;
                cx.out.write_line();
            }
        }
        self.close_block(cx.out, Closer::Property);
        Ok(())
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

        if parameter.is_out() {
            modifier(cx, "out");
        } else if parameter.is_ref() {
            modifier(cx, "ref");
        } else if parameter.is_params() {
            modifier(cx, "params");
        }

        cx.write_type(&parameter.parameter_type)?;
        cx.write(" ");
        cx.declare_parameter(parameter);
        if let Some(default) = &parameter.default {
            cx.write(" = ");
            cx.literal(default)?;
        }
        Ok(())
    }
}
