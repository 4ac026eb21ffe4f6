//! Writes a [`ConstructionPlan`] as C# Reflection.Emit code.

use crate::{
    emit::{
        calls::{BuilderCall, EmitArgument, Handle, MethodDefinition},
        planner::ConstructionPlan,
    },
    model::{Literal, TypeReference, TypeSignature},
    query::{field_reference_text, method_reference_text, signature_name},
    render::{context::RenderContext, sink::Entity, syntax::TypeOperator},
    Result,
};

/// Member lookup flags that find every declared member
const BINDING_FLAGS: &str =
    "BindingFlags.Public | BindingFlags.NonPublic | BindingFlags.Instance | BindingFlags.Static";

/// Builder variable of the planned method
const BUILDER: &str = "method";

/// IL generator variable
const GENERATOR: &str = "il";

impl RenderContext<'_> {
    /// Every call of `plan`, one statement per line
    pub(crate) fn construction_plan(&mut self, plan: &ConstructionPlan) -> Result<()> {
        for (index, call) in plan.calls.iter().enumerate() {
            if index > 0 {
                self.out.write_line();
            }
            self.builder_call(call)?;
        }
        Ok(())
    }

    fn builder_call(&mut self, call: &BuilderCall) -> Result<()> {
        match call {
            BuilderCall::Comment(text) => {
                self.comment(text);
                return Ok(());
            }
            BuilderCall::DefineMethod(definition) => return self.define_method(definition),
            BuilderCall::DeclareLocal {
                name,
                local_type,
                pinned,
            } => {
                self.write("LocalBuilder ");
                self.out
                    .write_declaration(name, Some(&Entity::Variable(name.clone())));
                self.write(" = ");
                self.generator_call("DeclareLocal");
                self.type_expression(local_type)?;
                if *pinned {
                    self.write(", ");
                    self.write_keyword("true");
                }
                self.write(")");
            }
            BuilderCall::DefineLabel { name, offset } => {
                self.write("Label ");
                self.out.write_declaration(name, Some(&Entity::Label(name.clone())));
                self.write(" = ");
                self.generator_call("DefineLabel");
                self.write("); ");
                self.comment(&format!("IL_{offset:04x}"));
                return Ok(());
            }
            BuilderCall::DeclareHandle { name, handle } => return self.declare_handle(name, handle),
            BuilderCall::BeginExceptionBlock => self.generator_call("BeginExceptionBlock"),
            BuilderCall::BeginCatchBlock(catch_type) => {
                self.generator_call("BeginCatchBlock");
                match catch_type {
                    Some(catch_type) => self.declaring_type(catch_type)?,
                    None => self.write_keyword("null"),
                }
            }
            BuilderCall::BeginExceptFilterBlock => self.generator_call("BeginExceptFilterBlock"),
            BuilderCall::BeginFinallyBlock => self.generator_call("BeginFinallyBlock"),
            BuilderCall::BeginFaultBlock => self.generator_call("BeginFaultBlock"),
            BuilderCall::EndExceptionBlock => self.generator_call("EndExceptionBlock"),
            BuilderCall::MarkLabel(label) => {
                self.generator_call("MarkLabel");
                self.label_reference(label);
            }
            BuilderCall::Emit {
                opcode, argument, ..
            } => {
                self.generator_call("Emit");
                self.out
                    .write_reference(&format!("OpCodes.{opcode}"), opcode, None);
                if *argument != EmitArgument::None {
                    self.write(", ");
                    self.emit_argument(argument)?;
                }
            }
        }
        self.write(");");
        Ok(())
    }

    /// `il.Name(`
    fn generator_call(&mut self, name: &str) {
        self.write(GENERATOR);
        self.write(".");
        self.write(name);
        self.write("(");
    }

    fn label_reference(&mut self, label: &str) {
        self.out
            .write_reference(label, label, Some(&Entity::Label(label.to_string())));
    }

    fn define_method(&mut self, definition: &MethodDefinition) -> Result<()> {
        let attributes: Vec<String> = definition
            .attributes
            .iter()
            .map(|attribute| format!("MethodAttributes.{attribute}"))
            .collect();

        if definition.constructor {
            self.write("ConstructorBuilder ");
            self.out.write_declaration(BUILDER, None);
            self.write(" = typeBuilder.DefineConstructor(");
            self.write(&attributes.join(" | "));
            self.write(", CallingConventions.Standard, ");
        } else {
            self.write("MethodBuilder ");
            self.out.write_declaration(BUILDER, None);
            self.write(" = typeBuilder.DefineMethod(");
            self.literal(&Literal::String(definition.name.clone()))?;
            self.write(", ");
            self.write(&attributes.join(" | "));
            self.write(", ");
            let return_type = definition.return_type.as_ref().unwrap_or(&TypeSignature::Void);
            self.type_expression(return_type)?;
            self.write(", ");
        }
        self.type_array(&definition.parameter_types)?;
        self.write(");");

        if definition.generator {
            self.out.write_line();
            self.write("ILGenerator ");
            self.out.write_declaration(GENERATOR, None);
            self.write(&format!(" = {BUILDER}.GetILGenerator();"));
        }
        Ok(())
    }

    fn declare_handle(&mut self, name: &str, handle: &Handle) -> Result<()> {
        self.write(handle.reflection_type());
        self.write(" ");
        self.out.write_declaration(name, Some(&Entity::Variable(name.to_string())));
        self.write(" = ");

        match handle {
            Handle::Method(method) => {
                let description = method_reference_text(method);
                self.declaring_type(&method.declaring_type)?;
                self.write(".GetMethod(");
                self.literal(&Literal::String(method.name.clone()))?;
                self.write(&format!(", {BINDING_FLAGS}, "));
                self.write_keyword("null");
                self.write(", ");
                self.type_array(&method.parameter_types)?;
                self.write(", ");
                self.write_keyword("null");
                self.write(")");
                self.comment_suffix(&description);
            }
            Handle::Constructor(method) => {
                let description = method_reference_text(method);
                self.declaring_type(&method.declaring_type)?;
                self.write(&format!(".GetConstructor({BINDING_FLAGS}, "));
                self.write_keyword("null");
                self.write(", ");
                self.type_array(&method.parameter_types)?;
                self.write(", ");
                self.write_keyword("null");
                self.write(")");
                self.comment_suffix(&description);
            }
            Handle::Field(field) => {
                let description = field_reference_text(field);
                self.declaring_type(&field.declaring_type)?;
                self.write(".GetField(");
                self.literal(&Literal::String(field.name.clone()))?;
                self.write(&format!(", {BINDING_FLAGS})"));
                self.comment_suffix(&description);
            }
            Handle::Type(signature) => {
                self.type_expression(signature)?;
                self.comment_suffix(&signature_name(signature));
            }
        }
        Ok(())
    }

    /// Statement terminator and a trailing comment
    fn comment_suffix(&mut self, text: &str) {
        self.write("; ");
        self.comment(text);
    }

    fn declaring_type(&mut self, reference: &TypeReference) -> Result<()> {
        self.type_expression(&TypeSignature::Named(reference.clone()))
    }

    /// `typeof(T)`, with `MakeByRefType`/`MakePointerType` for the shapes `typeof` cannot
    /// spell
    fn type_expression(&mut self, signature: &TypeSignature) -> Result<()> {
        match signature {
            TypeSignature::ByRef(inner) => {
                self.type_expression(inner)?;
                self.write(".MakeByRefType()");
                Ok(())
            }
            TypeSignature::Pointer(inner) => {
                self.type_expression(inner)?;
                self.write(".MakePointerType()");
                Ok(())
            }
            signature => {
                let syntax = self.syntax;
                syntax.write_type_operator(self, TypeOperator::TypeOf, signature)
            }
        }
    }

    /// `Type.EmptyTypes` or `new Type[] { typeof(A), typeof(B) }`
    fn type_array(&mut self, types: &[TypeSignature]) -> Result<()> {
        if types.is_empty() {
            self.write("Type.EmptyTypes");
            return Ok(());
        }

        self.write_keyword("new");
        self.write(" Type[] { ");
        for (index, signature) in types.iter().enumerate() {
            if index > 0 {
                self.write(", ");
            }
            self.type_expression(signature)?;
        }
        self.write(" }");
        Ok(())
    }

    fn emit_argument(&mut self, argument: &EmitArgument) -> Result<()> {
        match argument {
            EmitArgument::None => {}
            EmitArgument::Int8(value) => {
                self.write("(");
                self.write_keyword("sbyte");
                self.write(")");
                self.literal(&Literal::SByte(*value))?;
            }
            EmitArgument::Int32(value) => self.literal(&Literal::Int32(*value))?,
            EmitArgument::Int64(value) => self.literal(&Literal::Int64(*value))?,
            EmitArgument::Float32(value) => self.literal(&Literal::Single(*value))?,
            EmitArgument::Float64(value) => self.literal(&Literal::Double(*value))?,
            EmitArgument::Label(label) => self.label_reference(label),
            EmitArgument::Labels(labels) => {
                self.write_keyword("new");
                self.write(" Label[] { ");
                for (index, label) in labels.iter().enumerate() {
                    if index > 0 {
                        self.write(", ");
                    }
                    self.label_reference(label);
                }
                self.write(" }");
            }
            EmitArgument::Local(name) | EmitArgument::Handle(name) => {
                self.out
                    .write_reference(name, name, Some(&Entity::Variable(name.clone())));
            }
            EmitArgument::Argument { index, short } => {
                self.write("(");
                self.write_keyword(if *short { "byte" } else { "short" });
                self.write(")");
                self.literal(&Literal::Int32(i32::from(*index)))?;
            }
            EmitArgument::String(value) => self.literal(&Literal::String(value.clone()))?,
            EmitArgument::Signature(token) => {
                self.out.write_literal(&format!("0x{:08X}", token.value()));
            }
        }
        Ok(())
    }
}
