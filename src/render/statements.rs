//! Statement rendering.
//!
//! Statements are written one per line. The [`StatementState`] decides where line breaks go:
//! the first statement of a block follows the block opening directly, every later one is
//! preceded by a line break, and an embedded single-statement body leaves an outdent pending
//! until the next line starts.
//!
//! Before dispatching, [`CountedLoop::recognize`] looks for the decompiled shape of a counted
//! loop (`i = 0; while (i < n) { ...; i++; }`) and, when the syntax can express it, writes a
//! `for` loop instead of the two statements.

use tracing::trace;

use crate::{
    model::{BinaryOperator, Block, Expression, Literal, Statement, UnaryOperator, Variable},
    render::{
        context::RenderContext,
        sink::Entity,
        syntax::{Closer, HandlerAction, Jump, Keyword},
    },
    Result,
};

/// Constructs a `break` can leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakable {
    /// Counted and collection loops
    For,
    /// `while` loops
    While,
    /// `do ... while` loops
    Do,
    /// `switch` sections
    Switch,
}

impl Closer {
    fn breakable(self) -> Option<Breakable> {
        match self {
            Closer::For => Some(Breakable::For),
            Closer::While => Some(Breakable::While),
            Closer::Do => Some(Breakable::Do),
            _ => None,
        }
    }
}

/// Layout state of the statement writer.
#[derive(Debug, Clone, Default)]
pub struct StatementState {
    /// No statement has been written in the current block yet
    pub first: bool,
    /// Outdents owed by embedded single-statement bodies, applied when the next line starts
    pub pending_outdent: u32,
    /// Nesting depth below the method body; 0 for the body's own statements
    pub depth: u32,
    /// Enclosing breakable constructs, innermost last
    pub breakables: Vec<Breakable>,
}

/// The part of [`StatementState`] saved around a nested block
struct Saved {
    first: bool,
    depth: u32,
}

/// A recovered counted loop.
///
/// `initializer` is the assignment before the loop, `increment` the step expression taken
/// from the end of the loop body, and `body` the remaining body statements.
#[derive(Debug, Clone)]
pub struct CountedLoop<'s> {
    /// `v = start`
    pub initializer: &'s Expression,
    /// The loop variable
    pub variable: &'s Variable,
    /// Returns true if the initializer declares the variable
    pub declares: bool,
    /// Initial value
    pub start: &'s Expression,
    /// Loop condition as written
    pub condition: &'s Expression,
    /// Comparison and bound with the variable on the left, when it is a direct operand
    pub bound: Option<(BinaryOperator, &'s Expression)>,
    /// The step expression
    pub increment: &'s Expression,
    /// +1 or -1
    pub step: i8,
    /// Body without the step
    pub body: &'s [Statement],
}

impl<'s> CountedLoop<'s> {
    /// Match `first` followed by `second` against the counted loop shape
    #[must_use]
    pub fn recognize(first: &'s Statement, second: Option<&'s Statement>) -> Option<Self> {
        let Statement::Expression(initializer @ Expression::Assign { target, value }) = first
        else {
            return None;
        };
        let variable = target.as_variable()?;

        let Some(Statement::While { condition, body }) = second else {
            return None;
        };
        let Expression::Binary {
            left,
            operator,
            right,
        } = condition
        else {
            return None;
        };
        if !operator.is_comparison() || !condition.references_variable(&variable.name) {
            return None;
        }

        let (last, rest) = body.statements.split_last()?;
        let Statement::Expression(increment) = last else {
            return None;
        };
        let step = step_of(increment, &variable.name)?;

        // `continue` would skip the increment in the original loop but not in a `for`
        if rest.iter().any(continues_loop) {
            return None;
        }

        let bound = if is_variable(left, &variable.name) {
            Some((*operator, right.as_ref()))
        } else if is_variable(right, &variable.name) {
            Some((flip(*operator), left.as_ref()))
        } else {
            None
        };

        Some(CountedLoop {
            initializer,
            variable,
            declares: matches!(target.as_ref(), Expression::VariableDeclaration(_)),
            start: value,
            condition,
            bound,
            increment,
            step,
            body: rest,
        })
    }
}

fn is_variable(expression: &Expression, name: &str) -> bool {
    matches!(expression, Expression::VariableReference(variable) if variable.name == name)
}

/// Mirror a comparison so that its operands can be swapped
fn flip(operator: BinaryOperator) -> BinaryOperator {
    match operator {
        BinaryOperator::LessThan => BinaryOperator::GreaterThan,
        BinaryOperator::LessThanOrEqual => BinaryOperator::GreaterThanOrEqual,
        BinaryOperator::GreaterThan => BinaryOperator::LessThan,
        BinaryOperator::GreaterThanOrEqual => BinaryOperator::LessThanOrEqual,
        other => other,
    }
}

fn is_one(expression: &Expression) -> bool {
    matches!(expression, Expression::Literal(literal) if literal.is_one())
}

/// +1 or -1 if `expression` steps the variable `name` by exactly one
fn step_of(expression: &Expression, name: &str) -> Option<i8> {
    let direction = |operator: BinaryOperator| match operator {
        BinaryOperator::Add => Some(1),
        BinaryOperator::Subtract => Some(-1),
        _ => None,
    };

    match expression {
        Expression::Unary { operator, operand } if is_variable(operand, name) => match operator {
            UnaryOperator::PreIncrement | UnaryOperator::PostIncrement => Some(1),
            UnaryOperator::PreDecrement | UnaryOperator::PostDecrement => Some(-1),
            _ => None,
        },
        Expression::CompoundAssign {
            target,
            operator,
            value,
        } if is_variable(target, name) && is_one(value) => direction(*operator),
        Expression::Assign { target, value } if is_variable(target, name) => match value.as_ref() {
            Expression::Binary {
                left,
                operator,
                right,
            } if is_variable(left, name) && is_one(right) => direction(*operator),
            _ => None,
        },
        _ => None,
    }
}

/// Returns true if `statement` contains a `continue` bound to the enclosing loop
fn continues_loop(statement: &Statement) -> bool {
    let any = |block: &Block| block.statements.iter().any(continues_loop);
    match statement {
        Statement::Continue => true,
        Statement::Block(block) => any(block),
        Statement::If {
            then_block,
            else_block,
            ..
        } => any(then_block) || else_block.as_ref().is_some_and(any),
        Statement::TryCatch {
            try_block,
            catch_clauses,
            finally_block,
            fault_block,
        } => {
            any(try_block)
                || catch_clauses.iter().any(|clause| any(&clause.body))
                || finally_block.as_ref().is_some_and(any)
                || fault_block.as_ref().is_some_and(any)
        }
        Statement::Switch { cases, .. } => cases.iter().any(|case| any(&case.body)),
        Statement::Lock { body, .. }
        | Statement::Using { body, .. }
        | Statement::Fixed { body, .. } => any(body),
        // Nested loops own their `continue`s
        _ => false,
    }
}

/// Statements that may stand as an embedded body without braces
fn is_simple(statement: &Statement) -> bool {
    matches!(
        statement,
        Statement::Expression(_)
            | Statement::Return(_)
            | Statement::Throw(_)
            | Statement::Break
            | Statement::Continue
            | Statement::Goto(_)
    )
}

/// The literal `value - 1` or `value + 1` of an integer literal, if representable
pub(crate) fn adjust_literal(literal: &Literal, delta: i128) -> Option<Literal> {
    let value = literal.as_integer()?.checked_add(delta)?;
    Some(match literal {
        Literal::SByte(_) => Literal::SByte(i8::try_from(value).ok()?),
        Literal::Byte(_) => Literal::Byte(u8::try_from(value).ok()?),
        Literal::Int16(_) => Literal::Int16(i16::try_from(value).ok()?),
        Literal::UInt16(_) => Literal::UInt16(u16::try_from(value).ok()?),
        Literal::Int32(_) => Literal::Int32(i32::try_from(value).ok()?),
        Literal::UInt32(_) => Literal::UInt32(u32::try_from(value).ok()?),
        Literal::Int64(_) => Literal::Int64(i64::try_from(value).ok()?),
        Literal::UInt64(_) => Literal::UInt64(u64::try_from(value).ok()?),
        _ => return None,
    })
}

impl RenderContext<'_> {
    fn enter(&mut self) -> Saved {
        let saved = Saved {
            first: self.state.first,
            depth: self.state.depth,
        };
        self.state.first = true;
        self.state.depth += 1;
        saved
    }

    fn leave(&mut self, saved: Saved) {
        self.state.first = saved.first;
        self.state.depth = saved.depth;
    }

    /// Apply the outdents owed by embedded bodies
    pub(crate) fn flush_outdent(&mut self) {
        while self.state.pending_outdent > 0 {
            self.out.write_outdent();
            self.state.pending_outdent -= 1;
        }
    }

    /// Line break before every statement but the first of a block
    fn separate(&mut self) {
        if self.state.first {
            self.state.first = false;
        } else {
            self.out.write_line();
        }
        self.flush_outdent();
    }

    /// The statements of a method or anonymous method body, inside a block closed by
    /// `closer`. A valueless `return` ending the body is implicit and left out.
    pub(crate) fn method_body(&mut self, block: &Block, closer: Closer) -> Result<()> {
        let outer = std::mem::take(&mut self.state);
        self.state.first = true;

        self.syntax.open_block(self.out);
        let result = self.statements(&block.statements);
        if !self.state.first {
            self.out.write_line();
        }
        self.flush_outdent();
        self.state = outer;
        result?;

        self.syntax.close_block(self.out, closer);
        Ok(())
    }

    /// A nested block closed by `closer`
    pub(crate) fn block(&mut self, statements: &[Statement], closer: Closer) -> Result<()> {
        self.syntax.open_block(self.out);

        let saved = self.enter();
        let breakable = closer.breakable();
        if let Some(breakable) = breakable {
            self.state.breakables.push(breakable);
        }
        let result = self.statements(statements);
        if breakable.is_some() {
            self.state.breakables.pop();
        }
        let wrote = !self.state.first;
        self.leave(saved);
        result?;

        self.close(wrote, closer);
        Ok(())
    }

    /// A block statement of a brace syntax, opened on the current line
    pub(crate) fn bare_block(&mut self, block: &Block) -> Result<()> {
        self.write("{");
        self.out.write_indent();
        self.out.write_line();

        let saved = self.enter();
        let result = self.statements(&block.statements);
        let wrote = !self.state.first;
        self.leave(saved);
        result?;

        self.close(wrote, Closer::Block);
        Ok(())
    }

    fn close(&mut self, wrote: bool, closer: Closer) {
        if wrote {
            self.out.write_line();
        }
        self.flush_outdent();
        self.syntax.close_block(self.out, closer);
    }

    /// A loop or `if` body: a single simple statement is embedded on its own indented line
    /// where the syntax allows it, anything else becomes a block
    pub(crate) fn embedded(&mut self, statements: &[Statement], closer: Closer) -> Result<()> {
        let single = match statements {
            [statement] if is_simple(statement) => Some(statement),
            _ => None,
        };

        let Some(statement) = single.filter(|_| self.syntax.allows_embedded_statement()) else {
            return self.block(statements, closer);
        };

        self.out.write_indent();
        self.out.write_line();

        let saved = self.enter();
        let breakable = closer.breakable();
        if let Some(breakable) = breakable {
            self.state.breakables.push(breakable);
        }
        let result = self.statement(statement);
        if breakable.is_some() {
            self.state.breakables.pop();
        }
        self.leave(saved);
        self.state.pending_outdent += 1;
        result
    }

    /// Statements of a `case` section or similar clause, indented one level below the
    /// current line and each starting on a new line
    pub(crate) fn clause_body(&mut self, statements: &[Statement]) -> Result<()> {
        self.out.write_indent();
        let saved = self.enter();
        self.state.first = false;
        self.state.breakables.push(Breakable::Switch);
        let result = self.statements(statements);
        self.state.breakables.pop();
        self.leave(saved);
        self.flush_outdent();
        self.out.write_outdent();
        result
    }

    /// A statement sequence, with counted loop recovery
    pub(crate) fn statements(&mut self, statements: &[Statement]) -> Result<()> {
        let mut index = 0;
        while index < statements.len() {
            let statement = &statements[index];

            if self.state.depth == 0
                && index + 1 == statements.len()
                && matches!(statement, Statement::Return(None))
            {
                break;
            }

            if let Some(counted) = CountedLoop::recognize(statement, statements.get(index + 1)) {
                // a variable declared by the loop header goes out of scope after the loop
                let used_after = counted.declares
                    && statements
                        .get(index + 2..)
                        .unwrap_or_default()
                        .iter()
                        .any(|later| later.uses_variable(&counted.variable.name));
                if !used_after && self.syntax.supports_counted_loop(&counted) {
                    trace!(variable = %counted.variable.name, "counted loop recovered");
                    self.separate();
                    let syntax = self.syntax;
                    syntax.write_counted_loop(self, &counted)?;
                    index += 2;
                    continue;
                }
            }

            self.separate();
            self.statement(statement)?;
            index += 1;
        }
        Ok(())
    }

    /// One statement at the current position
    pub(crate) fn statement(&mut self, statement: &Statement) -> Result<()> {
        let syntax = self.syntax;
        match statement {
            Statement::Block(block) => {
                if syntax.terminator().is_empty() {
                    // keyword syntaxes have no bare blocks; the statements join the parent
                    // one level down, so a trailing `Return` stays explicit
                    let first = self.state.first;
                    let depth = self.state.depth;
                    self.state.first = true;
                    self.state.depth += 1;
                    let result = self.statements(&block.statements);
                    self.state.depth = depth;
                    if self.state.first {
                        self.state.first = first;
                    }
                    result
                } else {
                    self.bare_block(block)
                }
            }
            Statement::Expression(expression) => {
                self.statement_expression(expression)?;
                self.terminate();
                Ok(())
            }
            Statement::If {
                condition,
                then_block,
                else_block,
            } => syntax.write_if(self, condition, then_block, else_block.as_ref()),
            Statement::While { condition, body } => syntax.write_while(self, condition, body),
            Statement::DoWhile { body, condition } => syntax.write_do_while(self, body, condition),
            Statement::For {
                initializer,
                condition,
                increment,
                body,
            } => syntax.write_for(
                self,
                initializer.as_deref(),
                condition.as_ref(),
                increment.as_deref(),
                body,
            ),
            Statement::ForEach {
                variable,
                collection,
                body,
            } => syntax.write_foreach(self, variable, collection, body),
            Statement::Break => syntax.write_jump(self, Jump::Break),
            Statement::Continue => syntax.write_jump(self, Jump::Continue),
            Statement::Return(value) => self.keyword_statement(Keyword::Return, value.as_ref()),
            Statement::Throw(value) => self.keyword_statement(Keyword::Throw, value.as_ref()),
            Statement::TryCatch {
                try_block,
                catch_clauses,
                finally_block,
                fault_block,
            } => syntax.write_try(
                self,
                try_block,
                catch_clauses,
                finally_block.as_ref(),
                fault_block.as_ref(),
            ),
            Statement::Switch { value, cases } => syntax.write_switch(self, value, cases),
            Statement::Goto(label) => {
                self.keyword(Keyword::Goto);
                self.write(" ");
                let text = self.declaration_text(label);
                self.out.write_reference(
                    &text,
                    label,
                    Some(&Entity::Label(label.clone())),
                );
                self.terminate();
                Ok(())
            }
            Statement::Label(label) => {
                self.declare(label, Some(Entity::Label(label.clone())));
                self.write(":");
                Ok(())
            }
            Statement::Lock { target, body } => syntax.write_lock(self, target, body),
            Statement::Using { resource, body } => syntax.write_using(self, resource, body),
            Statement::Fixed {
                variable,
                value,
                body,
            } => syntax.write_fixed(self, variable, value, body),
            Statement::Comment(text) => {
                self.comment(text);
                Ok(())
            }
            Statement::AttachEvent { event, listener } => {
                syntax.write_event_handler(self, HandlerAction::Attach, event, listener)
            }
            Statement::RemoveEvent { event, listener } => {
                syntax.write_event_handler(self, HandlerAction::Remove, event, listener)
            }
            Statement::DebugBreak => syntax.write_debug_break(self),
        }
    }

    /// An expression in statement position, without terminator
    pub(crate) fn statement_expression(&mut self, expression: &Expression) -> Result<()> {
        self.statement_root = true;
        let result = self.expression(expression, 0);
        self.statement_root = false;
        result
    }

    /// `return value;`, `throw value;` and their valueless forms
    fn keyword_statement(&mut self, keyword: Keyword, value: Option<&Expression>) -> Result<()> {
        self.keyword(keyword);
        if let Some(value) = value {
            self.write(" ");
            self.expression(value, 0)?;
        }
        self.terminate();
        Ok(())
    }

    /// The innermost construct a `break` leaves
    pub(crate) fn innermost_breakable(&self, loops_only: bool) -> Option<Breakable> {
        self.state
            .breakables
            .iter()
            .rev()
            .copied()
            .find(|breakable| !loops_only || *breakable != Breakable::Switch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::RenderConfig,
        model::{
            CatchClause, MethodReference, PrimitiveKind, TypeBuilder, TypeReference, TypeSignature,
        },
        render::{Language, RenderUnit},
        test::{counted_loop, model_of, render, sample_module},
    };

    fn counter() -> Variable {
        Variable::new("i", TypeSignature::primitive(PrimitiveKind::Int32), 0)
    }

    fn variable() -> Expression {
        Expression::variable(&counter())
    }

    fn loop_pair(step: Expression, body: Vec<Statement>) -> (Statement, Statement) {
        let mut statements = body;
        statements.push(Statement::Expression(step));
        (
            Statement::Expression(Expression::assign(
                Expression::VariableDeclaration(counter()),
                Expression::literal(0),
            )),
            Statement::While {
                condition: Expression::binary(
                    variable(),
                    BinaryOperator::LessThan,
                    Expression::literal(10),
                ),
                body: Block::new(statements),
            },
        )
    }

    #[test]
    fn test_recognizes_all_step_forms() {
        let steps = [
            (Expression::unary(UnaryOperator::PostIncrement, variable()), 1),
            (Expression::unary(UnaryOperator::PreIncrement, variable()), 1),
            (Expression::unary(UnaryOperator::PostDecrement, variable()), -1),
            (Expression::unary(UnaryOperator::PreDecrement, variable()), -1),
            (
                Expression::CompoundAssign {
                    target: Box::new(variable()),
                    operator: BinaryOperator::Add,
                    value: Box::new(Expression::literal(1)),
                },
                1,
            ),
            (
                Expression::assign(
                    variable(),
                    Expression::binary(
                        variable(),
                        BinaryOperator::Subtract,
                        Expression::literal(1),
                    ),
                ),
                -1,
            ),
        ];

        for (step, expected) in steps {
            let (first, second) = loop_pair(step, vec![]);
            let counted = CountedLoop::recognize(&first, Some(&second));
            assert_eq!(counted.map(|counted| counted.step), Some(expected));
        }
    }

    #[test]
    fn test_declines_other_steps() {
        let by_two = Expression::CompoundAssign {
            target: Box::new(variable()),
            operator: BinaryOperator::Add,
            value: Box::new(Expression::literal(2)),
        };
        let (first, second) = loop_pair(by_two, vec![]);
        assert!(CountedLoop::recognize(&first, Some(&second)).is_none());
    }

    #[test]
    fn test_declines_continue() {
        let (first, second) = loop_pair(
            Expression::unary(UnaryOperator::PostIncrement, variable()),
            vec![Statement::If {
                condition: Expression::literal(true),
                then_block: Block::new(vec![Statement::Continue]),
                else_block: None,
            }],
        );
        assert!(CountedLoop::recognize(&first, Some(&second)).is_none());
    }

    #[test]
    fn test_bound_is_normalized() {
        let (first, _) = loop_pair(
            Expression::unary(UnaryOperator::PostIncrement, variable()),
            vec![],
        );
        let second = Statement::While {
            condition: Expression::binary(
                Expression::literal(10),
                BinaryOperator::GreaterThan,
                variable(),
            ),
            body: Block::new(vec![Statement::Expression(Expression::unary(
                UnaryOperator::PostIncrement,
                variable(),
            ))]),
        };

        let counted = CountedLoop::recognize(&first, Some(&second));
        let bound = counted.and_then(|counted| counted.bound);
        assert!(matches!(
            bound,
            Some((BinaryOperator::LessThan, Expression::Literal(Literal::Int32(10))))
        ));
    }

    #[test]
    fn test_adjust_literal() {
        assert_eq!(adjust_literal(&Literal::Int32(10), -1), Some(Literal::Int32(9)));
        assert_eq!(adjust_literal(&Literal::Byte(0), -1), None);
        assert_eq!(adjust_literal(&Literal::String("x".into()), 1), None);
    }

    /// `Console.WriteLine(text)`
    fn say(text: &str) -> Statement {
        let write_line = MethodReference::new(
            TypeReference::new("System", "Console"),
            "WriteLine",
            TypeSignature::Void,
        )
        .with_parameters(vec![TypeSignature::primitive(PrimitiveKind::String)])
        .as_static();
        Statement::Expression(Expression::call(None, write_line, vec![Expression::literal(text)]))
    }

    /// `statements` as the body of `Sample.Program.Run`, rendered in `language`
    fn body(language: Language, statements: Vec<Statement>) -> String {
        let (builder, module) = sample_module();
        let declaration = TypeBuilder::class("Sample", "Program")
            .method("Run", |method| method.statements(statements))
            .build_in(&module);
        let model = model_of(builder);
        let method = declaration.method("Run").expect("Run is declared");
        render(&model, language, RenderConfig::default(), RenderUnit::Method(&method))
    }

    fn assert_in_order(text: &str, needles: &[&str]) {
        let mut rest = text;
        for needle in needles {
            let at = rest
                .find(needle)
                .unwrap_or_else(|| panic!("{needle:?} missing or out of order in\n{text}"));
            rest = &rest[at + needle.len()..];
        }
    }

    fn exception() -> TypeSignature {
        TypeSignature::named("System", "Exception")
    }

    fn catch(variable: Option<Variable>, catch_type: TypeSignature, text: &str) -> CatchClause {
        CatchClause {
            variable,
            catch_type,
            filter: None,
            body: Block::new(vec![say(text)]),
        }
    }

    fn try_statement(catch_clauses: Vec<CatchClause>, finally: Option<&str>) -> Statement {
        Statement::TryCatch {
            try_block: Block::new(vec![say("work")]),
            catch_clauses,
            finally_block: finally.map(|text| Block::new(vec![say(text)])),
            fault_block: None,
        }
    }

    #[test]
    fn test_nested_block_keeps_its_return() {
        let statements = vec![
            Statement::Block(Block::new(vec![say("A"), Statement::Return(None)])),
            say("B"),
        ];

        let visual_basic = body(Language::VisualBasic, statements.clone());
        assert_in_order(&visual_basic, &["\"A\"", "Return", "\"B\"", "End Sub"]);

        let csharp = body(Language::CSharp, statements);
        assert_in_order(&csharp, &["\"A\"", "return;", "\"B\""]);
    }

    #[test]
    fn test_trailing_return_is_implicit() {
        let statements = vec![say("A"), Statement::Return(None)];

        let visual_basic = body(Language::VisualBasic, statements.clone());
        assert!(!visual_basic.contains("Return"), "{visual_basic}");

        let csharp = body(Language::CSharp, statements);
        assert!(!csharp.contains("return"), "{csharp}");
    }

    #[test]
    fn test_counter_used_after_loop_stays_declared_outside() {
        let i = Variable::new("i", TypeSignature::primitive(PrimitiveKind::Int32), 0);
        let mut statements = counted_loop();
        statements.push(Statement::Return(Some(Expression::variable(&i))));

        let csharp = body(Language::CSharp, statements.clone());
        assert!(!csharp.contains("for ("), "{csharp}");
        assert_in_order(&csharp, &["int i = 0;", "while (i < 10)", "return i;"]);

        let visual_basic = body(Language::VisualBasic, statements);
        assert!(!visual_basic.contains("For i"), "{visual_basic}");
        assert_in_order(&visual_basic, &["Dim i As Integer = 0", "While i < 10", "Return i"]);
    }

    #[test]
    fn test_try_finally() {
        let statements = vec![try_statement(vec![], Some("cleanup"))];

        let csharp = body(Language::CSharp, statements.clone());
        assert!(!csharp.contains("catch"), "{csharp}");
        assert_in_order(
            &csharp,
            &["try", "\"work\"", "}", "finally", "{", "\"cleanup\"", "}"],
        );

        let visual_basic = body(Language::VisualBasic, statements);
        assert!(!visual_basic.contains("Catch"), "{visual_basic}");
        assert_in_order(
            &visual_basic,
            &["Try", "\"work\"", "Finally", "\"cleanup\"", "End Try"],
        );
    }

    #[test]
    fn test_try_catch() {
        let ex = Variable::new("ex", exception(), 1);
        let statements = vec![try_statement(vec![catch(Some(ex), exception(), "failed")], None)];

        let csharp = body(Language::CSharp, statements.clone());
        assert!(!csharp.contains("finally"), "{csharp}");
        assert_in_order(&csharp, &["try", "\"work\"", "catch (Exception ex)", "\"failed\""]);

        let visual_basic = body(Language::VisualBasic, statements);
        assert!(!visual_basic.contains("Finally"), "{visual_basic}");
        assert_in_order(
            &visual_basic,
            &["Try", "\"work\"", "Catch ex As Exception", "\"failed\"", "End Try"],
        );
    }

    #[test]
    fn test_try_catch_all_finally() {
        let object = TypeSignature::named("System", "Object");
        let statements = vec![try_statement(
            vec![catch(None, object, "failed")],
            Some("cleanup"),
        )];

        let csharp = body(Language::CSharp, statements.clone());
        assert!(!csharp.contains("catch ("), "{csharp}");
        assert_in_order(
            &csharp,
            &["try", "\"work\"", "catch", "\"failed\"", "finally", "\"cleanup\""],
        );

        let visual_basic = body(Language::VisualBasic, statements);
        assert!(!visual_basic.contains(" As Object"), "{visual_basic}");
        assert_in_order(
            &visual_basic,
            &["Try", "\"work\"", "Catch", "\"failed\"", "Finally", "\"cleanup\"", "End Try"],
        );
    }
}
