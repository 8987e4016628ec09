//! Bytecode generation from a resolved AST
//!
//! Each method body is lowered into its own [`BytecodeChunk`] by a
//! [`MethodEmitter`], a context value that lives for exactly one method.
//! Expressions are emitted in one of two modes: value mode pushes the
//! expression's value, address mode (used for assignment targets) pushes
//! only what the matching store instruction consumes.

use crate::ast::*;
use crate::environment::GenerationEnvironment;
use crate::symbol_table::{
    Namespace, StaticType, SymbolId, SymbolTable, VariableSymbol,
};
use bytecode_system::{BytecodeChunk, ElementKind, Label, MethodHandle, Opcode};
use core_types::{CompileError, SourcePosition};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

/// Instructions of one method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodCode {
    /// Qualified name, `Class.method`
    pub name: String,
    /// Emitted instructions and labels
    pub chunk: BytecodeChunk,
}

/// Output of [`BytecodeGenerator::generate`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneratedCode {
    /// One entry per method, keyed by its runtime handle
    pub methods: BTreeMap<MethodHandle, MethodCode>,
}

impl GeneratedCode {
    /// Find a method's code by qualified name
    pub fn method(&self, name: &str) -> Option<&MethodCode> {
        self.methods.values().find(|method| method.name == name)
    }
}

/// Bytecode generator that lowers a resolved program method by method
pub struct BytecodeGenerator<'a> {
    table: &'a SymbolTable,
    environment: &'a GenerationEnvironment,
}

impl<'a> BytecodeGenerator<'a> {
    /// Create a generator over a symbol table and the handles for its entities
    pub fn new(table: &'a SymbolTable, environment: &'a GenerationEnvironment) -> Self {
        Self { table, environment }
    }

    /// Generate code for every method of `program`.
    ///
    /// The program must have parsed and resolved without diagnostics.
    pub fn generate(&self, program: &Program) -> Result<GeneratedCode, CompileError> {
        let main = program
            .main_class
            .as_ref()
            .ok_or_else(|| CompileError::internal("program has no main class"))?;

        let mut code = GeneratedCode::default();
        let main_method = self.main_method(main)?;
        self.generate_method(&mut code, main_method, &main.name, &main.statements)?;

        for class in &program.classes {
            for declaration in &class.declarations {
                match declaration {
                    Declaration::Method(method) => {
                        let symbol = self.table.symbol_declared_by(method.id).ok_or_else(|| {
                            CompileError::internal(format!(
                                "method `{}.{}` was not resolved",
                                class.name, method.name
                            ))
                        })?;
                        self.generate_method(&mut code, symbol, &class.name, &method.body)?;
                    }
                    Declaration::Variable(_) => {}
                    Declaration::Error { .. } => return Err(erroneous_tree()),
                }
            }
        }

        debug!(methods = code.methods.len(), "generated bytecode");
        Ok(code)
    }

    fn main_method(&self, main: &MainClassDeclaration) -> Result<SymbolId, CompileError> {
        self.table
            .scope_of(main.id)
            .and_then(|scope| self.table.scope(scope).lookup(Namespace::Method, "main"))
            .ok_or_else(|| CompileError::internal("main method was not resolved"))
    }

    fn generate_method(
        &self,
        code: &mut GeneratedCode,
        method: SymbolId,
        class_name: &str,
        body: &[Statement],
    ) -> Result<(), CompileError> {
        let name = format!("{}.{}", class_name, self.table.symbol(method).name);
        let handle = self.environment.method_handle(method)?;

        let mut emitter = MethodEmitter::new(self);
        for statement in body {
            emitter.visit_statement(statement)?;
        }
        if !matches!(body.last(), Some(Statement::Return { .. })) {
            emitter.chunk.emit(Opcode::Return);
        }
        let chunk = emitter.finish()?;

        debug!(
            method = %name,
            instructions = chunk.instruction_count(),
            labels = chunk.label_count(),
            "generated method"
        );
        code.methods.insert(handle, MethodCode { name, chunk });
        Ok(())
    }
}

/// Per-method emission state
struct MethodEmitter<'g, 'a> {
    generator: &'g BytecodeGenerator<'a>,
    chunk: BytecodeChunk,
    /// Labels to bind when the keyed statement is reached
    labels: HashMap<NodeId, Label>,
}

impl<'g, 'a> MethodEmitter<'g, 'a> {
    fn new(generator: &'g BytecodeGenerator<'a>) -> Self {
        Self {
            generator,
            chunk: BytecodeChunk::new(),
            labels: HashMap::new(),
        }
    }

    fn finish(self) -> Result<BytecodeChunk, CompileError> {
        let unmarked = self.chunk.unmarked_labels();
        if !unmarked.is_empty() || !self.labels.is_empty() {
            return Err(CompileError::internal(format!(
                "labels left unbound: {:?}",
                unmarked
            )));
        }
        Ok(self.chunk)
    }

    fn emit(&mut self, opcode: Opcode, position: SourcePosition) {
        trace!(%opcode, "emit");
        self.chunk.emit_with_position(opcode, position);
    }

    /// Allocate a label bound when `statement` is visited
    fn label_statement(&mut self, statement: &Statement) -> Result<Label, CompileError> {
        let id = statement.id().ok_or_else(erroneous_tree)?;
        let label = self.chunk.define_label();
        self.labels.insert(id, label);
        Ok(label)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn visit_statement(&mut self, statement: &Statement) -> Result<(), CompileError> {
        if let Some(label) = statement.id().and_then(|id| self.labels.remove(&id)) {
            self.chunk.mark_label(label);
        }

        match statement {
            Statement::VariableDeclaration(_) => {}
            Statement::Print {
                expression,
                position,
                ..
            } => {
                self.visit_expression(expression)?;
                self.emit(Opcode::CallPrintInt, *position);
            }
            Statement::Return {
                expression,
                position,
                ..
            } => {
                self.visit_expression(expression)?;
                self.emit(Opcode::Return, *position);
            }
            Statement::Assert {
                expression,
                position,
                ..
            } => {
                self.visit_expression(expression)?;
                self.emit(Opcode::CallAssert, *position);
            }
            Statement::Block { statements, .. } => {
                for statement in statements {
                    self.visit_statement(statement)?;
                }
            }
            Statement::Assignment {
                target,
                value,
                position,
                ..
            } => {
                self.visit_address(target)?;
                self.visit_expression(value)?;
                self.emit_store(target, *position)?;
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                position,
                ..
            } => {
                self.visit_expression(condition)?;
                let exit = self.chunk.define_label();
                let on_false = match else_branch {
                    Some(else_branch) => self.label_statement(else_branch)?,
                    None => exit,
                };

                self.emit(Opcode::BranchIfFalse(on_false), *position);
                self.visit_statement(then_branch)?;
                self.emit(Opcode::Branch(exit), *position);
                if let Some(else_branch) = else_branch {
                    self.visit_statement(else_branch)?;
                }
                self.chunk.mark_label(exit);
            }
            Statement::While {
                condition,
                body,
                position,
                ..
            } => {
                let test = self.chunk.define_label();
                let body_label = self.label_statement(body)?;

                self.emit(Opcode::Branch(test), *position);
                self.visit_statement(body)?;
                self.chunk.mark_label(test);
                self.visit_expression(condition)?;
                self.emit(Opcode::BranchIfTrue(body_label), *position);
            }
            Statement::MethodInvocation(call) => {
                self.visit_invocation(call)?;
                if self.static_type(call.id)? != &StaticType::Void {
                    self.emit(Opcode::Pop, call.position);
                }
            }
            Statement::Error { .. } => return Err(erroneous_tree()),
        }
        Ok(())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Emit `expression` in value mode
    fn visit_expression(&mut self, expression: &Expression) -> Result<(), CompileError> {
        match expression {
            Expression::MethodInvocation(call) => self.visit_invocation(call)?,
            Expression::InstanceCreation {
                type_name,
                array_size,
                position,
                ..
            } => {
                let ty = self.generator.environment.type_handle(type_name)?;
                match array_size {
                    Some(size) => {
                        self.visit_expression(size)?;
                        self.emit(Opcode::NewArray(ty), *position);
                    }
                    None => {
                        let constructor = self.generator.environment.constructor(ty)?;
                        self.emit(Opcode::NewObject(constructor), *position);
                    }
                }
            }
            Expression::UnaryNot {
                operand, position, ..
            } => {
                self.visit_expression(operand)?;
                self.emit(Opcode::PushInt(0), *position);
                self.emit(Opcode::Equal, *position);
            }
            Expression::BinaryOperator {
                operator,
                left,
                right,
                position,
                ..
            } => {
                self.visit_expression(left)?;
                self.visit_expression(right)?;
                self.emit(binary_opcode(*operator), *position);
            }
            Expression::BooleanLiteral {
                value, position, ..
            } => {
                self.emit(Opcode::PushInt(i32::from(*value)), *position);
            }
            Expression::IntegerLiteral {
                value, position, ..
            } => {
                self.emit(Opcode::PushInt(*value), *position);
            }
            Expression::This { position, .. } => {
                self.emit(Opcode::LoadArg(0), *position);
            }
            Expression::ArrayIndex {
                array,
                index,
                position,
                ..
            } => {
                self.visit_expression(array)?;
                self.visit_expression(index)?;
                let kind = self.element_kind(array)?;
                self.emit(Opcode::LoadElement(kind), *position);
            }
            Expression::VariableReference { id, position, .. } => {
                let (symbol, variable) = self.variable(*id)?;
                let opcode = match variable.kind {
                    VariableKind::Class => {
                        self.emit(Opcode::LoadArg(0), *position);
                        Opcode::LoadField(self.generator.environment.field_handle(symbol)?)
                    }
                    VariableKind::Formal => Opcode::LoadArg(slot(variable)?),
                    VariableKind::Local => Opcode::LoadLocal(slot(variable)?),
                };
                self.emit(opcode, *position);
            }
            Expression::Error { .. } => return Err(erroneous_tree()),
        }
        Ok(())
    }

    /// Emit `target` in address mode: everything its store consumes except the value
    fn visit_address(&mut self, target: &Expression) -> Result<(), CompileError> {
        match target {
            Expression::VariableReference { id, position, .. } => {
                let (_, variable) = self.variable(*id)?;
                if variable.kind == VariableKind::Class {
                    self.emit(Opcode::LoadArg(0), *position);
                }
                Ok(())
            }
            Expression::ArrayIndex { array, index, .. } => {
                self.visit_expression(array)?;
                self.visit_expression(index)
            }
            other => Err(CompileError::internal(format!(
                "cannot assign to {}",
                other.describe()
            ))),
        }
    }

    fn emit_store(
        &mut self,
        target: &Expression,
        position: SourcePosition,
    ) -> Result<(), CompileError> {
        let opcode = match target {
            Expression::VariableReference { id, .. } => {
                let (symbol, variable) = self.variable(*id)?;
                match variable.kind {
                    VariableKind::Class => {
                        Opcode::StoreField(self.generator.environment.field_handle(symbol)?)
                    }
                    VariableKind::Formal => Opcode::StoreArg(slot(variable)?),
                    VariableKind::Local => Opcode::StoreLocal(slot(variable)?),
                }
            }
            Expression::ArrayIndex { array, .. } => Opcode::StoreElement(self.element_kind(array)?),
            other => {
                return Err(CompileError::internal(format!(
                    "cannot assign to {}",
                    other.describe()
                )))
            }
        };
        self.emit(opcode, position);
        Ok(())
    }

    fn visit_invocation(&mut self, call: &MethodInvocation) -> Result<(), CompileError> {
        self.visit_expression(&call.receiver)?;

        let receiver_id = call.receiver.id().ok_or_else(erroneous_tree)?;
        if matches!(self.static_type(receiver_id)?, StaticType::Array(_)) {
            self.emit(Opcode::ArrayLength, call.position);
            return Ok(());
        }

        for argument in &call.arguments {
            self.visit_expression(argument)?;
        }
        let method = self.generator.table.referenced_symbol(call.id).ok_or_else(|| {
            CompileError::internal(format!("call to `{}` was not resolved", call.method_name))
        })?;
        let handle = self.generator.environment.method_handle(method)?;
        self.emit(Opcode::Call(handle), call.position);
        Ok(())
    }

    // ========================================================================
    // Symbol table queries
    // ========================================================================

    fn static_type(&self, node: NodeId) -> Result<&'a StaticType, CompileError> {
        self.generator
            .table
            .expression_type(node)
            .ok_or_else(|| CompileError::internal(format!("no static type for node {}", node)))
    }

    fn variable(&self, node: NodeId) -> Result<(SymbolId, &'a VariableSymbol), CompileError> {
        let table = self.generator.table;
        table
            .referenced_symbol(node)
            .and_then(|symbol| table.variable(symbol).map(|variable| (symbol, variable)))
            .ok_or_else(|| {
                CompileError::internal(format!("variable at node {} was not resolved", node))
            })
    }

    fn element_kind(&self, array: &Expression) -> Result<ElementKind, CompileError> {
        let id = array.id().ok_or_else(erroneous_tree)?;
        match self.static_type(id)?.element_type() {
            Some(element) if element.is_integral() => Ok(ElementKind::Int),
            Some(_) => Ok(ElementKind::Reference),
            None => Err(CompileError::internal(format!(
                "node {} is indexed but is not an array",
                id
            ))),
        }
    }
}

fn slot(variable: &VariableSymbol) -> Result<u16, CompileError> {
    variable
        .index
        .ok_or_else(|| CompileError::internal("variable has no argument or local slot"))
}

fn binary_opcode(operator: BinaryOperator) -> Opcode {
    match operator {
        BinaryOperator::Add => Opcode::Add,
        BinaryOperator::Sub => Opcode::Sub,
        BinaryOperator::Mul => Opcode::Mul,
        BinaryOperator::Div => Opcode::Div,
        BinaryOperator::Mod => Opcode::Rem,
        BinaryOperator::Less => Opcode::LessThan,
        BinaryOperator::Greater => Opcode::GreaterThan,
        BinaryOperator::Equal => Opcode::Equal,
        BinaryOperator::And => Opcode::And,
        BinaryOperator::Or => Opcode::Or,
    }
}

fn erroneous_tree() -> CompileError {
    CompileError::internal("cannot generate code for a tree with parse errors")
}
