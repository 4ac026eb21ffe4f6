//! Construction planning.
//!
//! A [`Planner`] turns one method body into a [`ConstructionPlan`] in six phases that must run
//! in order:
//!
//! 1. `Init` validates the instruction stream and exception table and defines the method
//! 2. `DeclareLocals` declares one builder local per local slot
//! 3. `DeclareLabels` declares one label per distinct branch or switch target, sorted by offset
//! 4. `DeclareOperandHandles` declares each referenced method, field and type once
//! 5. `EmitInstructions` walks the stream, opening and closing exception blocks and marking
//!    labels at their offsets
//! 6. `Finalize` closes the exception blocks that end with the code
//!
//! Handles are keyed by token; references without a token fall back to structural identity.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, trace};

use crate::{
    assembly::{
        branch_targets, emit_field_name, operand_kind, validate_stream, Immediate, Operand,
        OperandKind,
    },
    emit::calls::{BuilderCall, EmitArgument, Handle, MethodDefinition},
    model::{
        ExceptionHandler, FieldReference, MethodBody, MethodDeclaration, MethodModifiers,
        MethodReference, TypeSignature, Visibility,
    },
    query::method_signature_text,
    Error, Result,
};

/// The planning phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Validation and method definition
    Init,
    /// Local declarations
    DeclareLocals,
    /// Label declarations
    DeclareLabels,
    /// Handle declarations
    DeclareOperandHandles,
    /// Instruction emission with exception blocks
    EmitInstructions,
    /// Closing of trailing exception blocks
    Finalize,
}

impl Phase {
    fn next(self) -> Option<Phase> {
        match self {
            Phase::Init => Some(Phase::DeclareLocals),
            Phase::DeclareLocals => Some(Phase::DeclareLabels),
            Phase::DeclareLabels => Some(Phase::DeclareOperandHandles),
            Phase::DeclareOperandHandles => Some(Phase::EmitInstructions),
            Phase::EmitInstructions => Some(Phase::Finalize),
            Phase::Finalize => None,
        }
    }
}

/// The ordered builder calls reconstructing one method.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionPlan {
    /// `Type.Name(Parameters)` of the planned method
    pub method: String,
    /// Calls, in the order they are written
    pub calls: Vec<BuilderCall>,
}

impl ConstructionPlan {
    /// Declared handles, in declaration order
    pub fn handles(&self) -> impl Iterator<Item = (&str, &Handle)> {
        self.calls.iter().filter_map(|call| match call {
            BuilderCall::DeclareHandle { name, handle } => Some((name.as_str(), handle)),
            _ => None,
        })
    }

    /// Declared labels with the offsets they mark
    pub fn labels(&self) -> impl Iterator<Item = (&str, u32)> {
        self.calls.iter().filter_map(|call| match call {
            BuilderCall::DefineLabel { name, offset } => Some((name.as_str(), *offset)),
            _ => None,
        })
    }

    /// The `Emit` calls
    pub fn emits(&self) -> impl Iterator<Item = (&str, &EmitArgument)> {
        self.calls.iter().filter_map(|call| match call {
            BuilderCall::Emit {
                opcode, argument, ..
            } => Some((opcode.as_str(), argument)),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum HandleKey {
    Token(u32),
    Method(MethodReference),
    Field(FieldReference),
    Type(TypeSignature),
}

/// A protected range with every handler that shares it
#[derive(Debug)]
struct Region<'a> {
    try_start: u32,
    handlers: Vec<&'a ExceptionHandler>,
    /// End of the last handler
    end: u32,
}

/// Plans the builder calls of one method body.
pub struct Planner<'a> {
    method: &'a MethodDeclaration,
    body: &'a MethodBody,
    generator: bool,
    phase: Option<Phase>,
    calls: Vec<BuilderCall>,
    locals: Vec<String>,
    labels: BTreeMap<u32, String>,
    handles: HashMap<HandleKey, String>,
    handle_counts: HashMap<&'static str, usize>,
    regions: Vec<Region<'a>>,
    open: Vec<usize>,
}

impl<'a> Planner<'a> {
    /// Create a planner for `method` with `body`; `generator` is false for bodyless methods
    #[must_use]
    pub fn new(method: &'a MethodDeclaration, body: &'a MethodBody, generator: bool) -> Self {
        Planner {
            method,
            body,
            generator,
            phase: None,
            calls: Vec::new(),
            locals: Vec::new(),
            labels: BTreeMap::new(),
            handles: HashMap::new(),
            handle_counts: HashMap::new(),
            regions: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Run every phase and return the plan.
    ///
    /// # Errors
    /// Returns [`Error::MalformedBytecode`] when the stream, a branch target or the exception
    /// table is inconsistent, [`Error::UnknownInstruction`] for unmapped opcodes.
    pub fn plan(mut self) -> Result<ConstructionPlan> {
        self.init()?;
        self.declare_locals();
        self.declare_labels()?;
        self.declare_operand_handles();
        self.emit_instructions()?;
        self.finalize()?;

        debug!(method = %self.method.name, calls = self.calls.len(), "construction plan ready");
        Ok(ConstructionPlan {
            method: method_signature_text(self.method),
            calls: self.calls,
        })
    }

    fn enter(&mut self, phase: Phase) {
        let expected = match self.phase {
            None => Some(Phase::Init),
            Some(current) => current.next(),
        };
        debug_assert_eq!(Some(phase), expected, "construction phases run in order");
        trace!(?phase, "construction phase");
        self.phase = Some(phase);
    }

    fn init(&mut self) -> Result<()> {
        self.enter(Phase::Init);

        let body = self.body;
        validate_stream(&body.instructions, body.code_size)?;

        let mut boundaries: BTreeSet<u32> = body
            .instructions
            .iter()
            .map(|instruction| instruction.offset)
            .collect();
        boundaries.insert(body.code_size);

        let mut grouped: BTreeMap<(u32, u32), Vec<&'a ExceptionHandler>> = BTreeMap::new();
        for handler in &body.exception_handlers {
            let mut edges = vec![
                handler.try_offset,
                handler.try_end(),
                handler.handler_offset,
                handler.handler_end(),
            ];
            if handler.is_filter() {
                edges.push(handler.filter_offset);
            }
            if let Some(edge) = edges.into_iter().find(|edge| !boundaries.contains(edge)) {
                return Err(malformed_error!(
                    edge,
                    "exception handler edge is not an instruction boundary"
                ));
            }
            if handler.try_length == 0 || handler.handler_offset < handler.try_end() {
                return Err(malformed_error!(
                    handler.handler_offset,
                    "handler does not follow a non-empty protected range"
                ));
            }
            grouped
                .entry((handler.try_offset, handler.try_end()))
                .or_default()
                .push(handler);
        }

        for ((try_start, _), mut handlers) in grouped {
            handlers.sort_by_key(|handler| handler.handler_offset);
            let end = handlers
                .iter()
                .map(|handler| handler.handler_end())
                .max()
                .unwrap_or(try_start);
            self.regions.push(Region {
                try_start,
                handlers,
                end,
            });
        }

        self.calls.push(BuilderCall::Comment(format!(
            "{} ({} bytes, max stack {})",
            method_signature_text(self.method),
            body.code_size,
            body.max_stack
        )));
        self.calls
            .push(BuilderCall::DefineMethod(definition(self.method, self.generator)));
        Ok(())
    }

    fn declare_locals(&mut self) {
        self.enter(Phase::DeclareLocals);

        for (index, local) in self.body.locals.iter().enumerate() {
            let name = format!("local{index}");
            self.calls.push(BuilderCall::DeclareLocal {
                name: name.clone(),
                local_type: local.variable_type.clone(),
                pinned: local.pinned,
            });
            self.locals.push(name);
        }
    }

    fn declare_labels(&mut self) -> Result<()> {
        self.enter(Phase::DeclareLabels);

        let boundaries: BTreeSet<u32> = self
            .body
            .instructions
            .iter()
            .map(|instruction| instruction.offset)
            .collect();

        let mut targets = BTreeSet::new();
        for instruction in &self.body.instructions {
            for target in branch_targets(instruction) {
                if !boundaries.contains(&target) {
                    return Err(malformed_error!(
                        instruction.offset,
                        "branch target 0x{:04X} is not an instruction boundary",
                        target
                    ));
                }
                targets.insert(target);
            }
        }

        for (index, offset) in targets.into_iter().enumerate() {
            let name = format!("label{index}");
            self.calls.push(BuilderCall::DefineLabel {
                name: name.clone(),
                offset,
            });
            self.labels.insert(offset, name);
        }
        Ok(())
    }

    fn declare_operand_handles(&mut self) {
        self.enter(Phase::DeclareOperandHandles);

        let body = self.body;
        for instruction in &body.instructions {
            let (key, handle) = match &instruction.operand {
                Operand::Method(reference) => {
                    let key = if reference.token.is_null() {
                        HandleKey::Method(reference.clone())
                    } else {
                        HandleKey::Token(reference.token.value())
                    };
                    let handle = if reference.is_constructor() {
                        Handle::Constructor(reference.clone())
                    } else {
                        Handle::Method(reference.clone())
                    };
                    (key, handle)
                }
                Operand::Field(reference) => {
                    let key = if reference.token.is_null() {
                        HandleKey::Field(reference.clone())
                    } else {
                        HandleKey::Token(reference.token.value())
                    };
                    (key, Handle::Field(reference.clone()))
                }
                Operand::Type(signature) => {
                    let key = match signature.as_reference() {
                        Some(reference) if !reference.token.is_null() => {
                            HandleKey::Token(reference.token.value())
                        }
                        _ => HandleKey::Type(signature.clone()),
                    };
                    (key, Handle::Type(signature.clone()))
                }
                _ => continue,
            };

            if self.handles.contains_key(&key) {
                continue;
            }

            let count = self.handle_counts.entry(handle.prefix()).or_insert(0);
            let name = format!("{}{}", handle.prefix(), count);
            *count += 1;

            self.handles.insert(key, name.clone());
            self.calls.push(BuilderCall::DeclareHandle { name, handle });
        }
    }

    fn emit_instructions(&mut self) -> Result<()> {
        self.enter(Phase::EmitInstructions);

        let body = self.body;
        for instruction in &body.instructions {
            let offset = instruction.offset;
            self.region_boundaries(offset)?;

            if let Some(label) = self.labels.get(&offset) {
                self.calls.push(BuilderCall::MarkLabel(label.clone()));
            }

            let unknown = |_: Error| Error::UnknownInstruction {
                opcode: instruction.opcode,
                offset,
            };
            let kind = operand_kind(instruction.opcode).map_err(unknown)?;
            let opcode = emit_field_name(instruction.opcode).map_err(unknown)?;
            let argument = self.argument(offset, &instruction.operand, kind)?;
            self.calls.push(BuilderCall::Emit {
                offset,
                opcode,
                argument,
            });
        }
        Ok(())
    }

    /// Exception block calls at `offset`: ends (innermost first), handler starts, begins
    /// (outermost first)
    fn region_boundaries(&mut self, offset: u32) -> Result<()> {
        while let Some(&top) = self.open.last() {
            if self.regions[top].end != offset {
                break;
            }
            self.open.pop();
            self.calls.push(BuilderCall::EndExceptionBlock);
        }
        if self
            .open
            .iter()
            .any(|&index| self.regions[index].end == offset)
        {
            return Err(malformed_error!(offset, "exception regions overlap"));
        }

        for (index, region) in self.regions.iter().enumerate() {
            for handler in &region.handlers {
                let filter_start = handler.is_filter() && handler.filter_offset == offset;
                if !filter_start && handler.handler_offset != offset {
                    continue;
                }
                if self.open.last() != Some(&index) {
                    return Err(malformed_error!(
                        offset,
                        "handler starts outside its protected region"
                    ));
                }
                if filter_start {
                    self.calls.push(BuilderCall::BeginExceptFilterBlock);
                }
                if handler.handler_offset == offset {
                    self.calls.push(if handler.is_filter() {
                        BuilderCall::BeginCatchBlock(None)
                    } else if handler.is_finally() {
                        BuilderCall::BeginFinallyBlock
                    } else if handler.is_fault() {
                        BuilderCall::BeginFaultBlock
                    } else {
                        BuilderCall::BeginCatchBlock(handler.catch_type.clone())
                    });
                }
            }
        }

        let mut starting: Vec<usize> = (0..self.regions.len())
            .filter(|&index| self.regions[index].try_start == offset)
            .collect();
        starting.sort_by(|&a, &b| self.regions[b].end.cmp(&self.regions[a].end));
        for index in starting {
            if let Some(&enclosing) = self.open.last() {
                if self.regions[index].end > self.regions[enclosing].end {
                    return Err(malformed_error!(offset, "exception regions overlap"));
                }
            }
            self.open.push(index);
            self.calls.push(BuilderCall::BeginExceptionBlock);
        }
        Ok(())
    }

    fn argument(&self, offset: u32, operand: &Operand, kind: OperandKind) -> Result<EmitArgument> {
        let label = |target: &u32| {
            self.labels
                .get(target)
                .cloned()
                .ok_or_else(|| malformed_error!(offset, "no label for target 0x{:04X}", target))
        };

        Ok(match operand {
            Operand::None => EmitArgument::None,
            Operand::Immediate(Immediate::Int8(value)) => EmitArgument::Int8(*value),
            Operand::Immediate(Immediate::Int32(value)) => EmitArgument::Int32(*value),
            Operand::Immediate(Immediate::Int64(value)) => EmitArgument::Int64(*value),
            Operand::Immediate(Immediate::Float32(value)) => EmitArgument::Float32(*value),
            Operand::Immediate(Immediate::Float64(value)) => EmitArgument::Float64(*value),
            Operand::Target(target) => EmitArgument::Label(label(target)?),
            Operand::Switch(targets) => {
                EmitArgument::Labels(targets.iter().map(label).collect::<Result<_>>()?)
            }
            Operand::Local(index) => {
                let name = self.locals.get(usize::from(*index)).ok_or_else(|| {
                    malformed_error!(offset, "local {} is not declared", index)
                })?;
                EmitArgument::Local(name.clone())
            }
            Operand::Argument(index) => EmitArgument::Argument {
                index: *index,
                short: kind == OperandKind::ShortInlineVar,
            },
            Operand::String(value) => EmitArgument::String(value.clone()),
            Operand::Method(_) | Operand::Field(_) | Operand::Type(_) => {
                EmitArgument::Handle(self.handle_name(offset, operand)?)
            }
            Operand::Signature(token) => EmitArgument::Signature(*token),
        })
    }

    fn handle_name(&self, offset: u32, operand: &Operand) -> Result<String> {
        let key = match operand {
            Operand::Method(reference) if reference.token.is_null() => {
                HandleKey::Method(reference.clone())
            }
            Operand::Method(reference) => HandleKey::Token(reference.token.value()),
            Operand::Field(reference) if reference.token.is_null() => {
                HandleKey::Field(reference.clone())
            }
            Operand::Field(reference) => HandleKey::Token(reference.token.value()),
            Operand::Type(signature) => match signature.as_reference() {
                Some(reference) if !reference.token.is_null() => {
                    HandleKey::Token(reference.token.value())
                }
                _ => HandleKey::Type(signature.clone()),
            },
            _ => return Err(malformed_error!(offset, "operand is not a metadata reference")),
        };
        self.handles
            .get(&key)
            .cloned()
            .ok_or_else(|| malformed_error!(offset, "handle used before its declaration"))
    }

    fn finalize(&mut self) -> Result<()> {
        self.enter(Phase::Finalize);

        while let Some(top) = self.open.pop() {
            let end = self.regions[top].end;
            if end != self.body.code_size {
                return Err(malformed_error!(end, "exception region was never closed"));
            }
            self.calls.push(BuilderCall::EndExceptionBlock);
        }

        Ok(())
    }
}

/// `DefineMethod` arguments of `method`
fn definition(method: &MethodDeclaration, generator: bool) -> MethodDefinition {
    let mut attributes = vec![match method.visibility {
        Visibility::CompilerControlled => "PrivateScope",
        Visibility::Private => "Private",
        Visibility::FamilyAndAssembly => "FamANDAssem",
        Visibility::Assembly => "Assembly",
        Visibility::Family => "Family",
        Visibility::FamilyOrAssembly => "FamORAssem",
        Visibility::Public => "Public",
    }];

    let modifiers = [
        (MethodModifiers::STATIC, "Static"),
        (MethodModifiers::FINAL, "Final"),
        (MethodModifiers::VIRTUAL, "Virtual"),
        (MethodModifiers::HIDE_BY_SIG, "HideBySig"),
        (MethodModifiers::NEW_SLOT, "NewSlot"),
        (MethodModifiers::ABSTRACT, "Abstract"),
        (MethodModifiers::SPECIAL_NAME, "SpecialName"),
        (MethodModifiers::RTSPECIAL_NAME, "RTSpecialName"),
        (MethodModifiers::PINVOKE_IMPL, "PinvokeImpl"),
    ];
    attributes.extend(
        modifiers
            .iter()
            .filter(|(flag, _)| method.modifiers.contains(*flag))
            .map(|(_, name)| *name),
    );

    let constructor = method.is_constructor();
    MethodDefinition {
        name: if constructor {
            String::new()
        } else {
            method.name.clone()
        },
        attributes,
        return_type: (!constructor).then(|| method.return_type.clone()),
        parameter_types: method.parameter_types(),
        constructor,
        generator,
    }
}
