//! Name resolution for MiniJava programs
//!
//! [`ScopeAnalyzer`] builds the [`SymbolTable`] in four passes:
//!
//! 1. define the built-in types and every class in the global scope
//! 2. link each class scope to its superclass scope
//! 3. define fields and method symbols in the class scopes
//! 4. walk method bodies, defining formals and locals and resolving every
//!    variable reference, type name and method call
//!
//! Every problem found is recorded as a semantic diagnostic and analysis
//! carries on, so one run reports all of them.

use crate::ast::*;
use crate::error::{duplicate_definition, slots_exhausted, unresolved};
use crate::symbol_table::{
    MethodSymbol, Namespace, ScopeId, ScopeKind, StaticType, Symbol, SymbolId, SymbolKind,
    SymbolTable, TypeSymbol, VariableSymbol,
};
use crate::token::BUILTIN_TYPES;
use core_types::{CompileError, Diagnostic, SourcePosition};
use tracing::{debug, trace};

/// Name of the pseudo-method giving an array's length
const LENGTH: &str = "length";

/// Scope analyzer for MiniJava ASTs
pub struct ScopeAnalyzer {
    table: SymbolTable,
    diagnostics: Vec<Diagnostic>,
    current_scope: ScopeId,
    /// Next local slot in the method being analyzed
    next_local: u32,
    /// Set once the current method ran out of slots, so it is reported once
    slots_reported: bool,
    in_static_method: bool,
}

impl ScopeAnalyzer {
    /// Create a new scope analyzer
    pub fn new() -> Self {
        let table = SymbolTable::new();
        let current_scope = table.global_scope();
        Self {
            table,
            diagnostics: Vec::new(),
            current_scope,
            next_local: 0,
            slots_reported: false,
            in_static_method: false,
        }
    }

    /// Resolve the program, failing with every semantic diagnostic found
    pub fn analyze(self, program: &Program) -> Result<SymbolTable, CompileError> {
        let (table, diagnostics) = self.analyze_with_diagnostics(program);
        if diagnostics.is_empty() {
            Ok(table)
        } else {
            Err(CompileError::Rejected(diagnostics))
        }
    }

    /// Resolve the program, returning the table together with the diagnostics
    pub fn analyze_with_diagnostics(mut self, program: &Program) -> (SymbolTable, Vec<Diagnostic>) {
        debug!("resolving names");
        self.define_builtin_types();
        let classes = self.define_classes(program);
        self.link_superclasses(&classes);

        let mut methods = Vec::new();
        for &(class, scope) in &classes {
            match class {
                ClassRef::Main(main) => {
                    if let Some(method) = self.define_main_method(main, scope) {
                        methods.push(method);
                    }
                }
                ClassRef::Regular(class) => self.define_members(class, scope, &mut methods),
            }
        }

        for method in &methods {
            self.analyze_method(method);
        }

        debug!(
            scopes = self.table.scope_count(),
            diagnostics = self.diagnostics.len(),
            "resolved names"
        );
        (self.table, self.diagnostics)
    }

    // ========================================================================
    // Passes 1-3: types, inheritance, members
    // ========================================================================

    fn define_builtin_types(&mut self) {
        let global = self.table.global_scope();
        for name in BUILTIN_TYPES {
            self.table.define(
                global,
                Symbol {
                    name: name.to_string(),
                    kind: SymbolKind::Type(TypeSymbol {
                        builtin: true,
                        scope: None,
                        superclass: None,
                    }),
                    declaration: None,
                },
            );
        }
    }

    fn define_classes<'p>(&mut self, program: &'p Program) -> Vec<(ClassRef<'p>, ScopeId)> {
        let mut classes = Vec::new();
        let main = program.main_class.iter().map(ClassRef::Main);
        let regular = program.classes.iter().map(ClassRef::Regular);

        for class in main.chain(regular) {
            let (id, name, position) = class.header();
            let global = self.table.global_scope();
            let symbol = Symbol {
                name: name.to_string(),
                kind: SymbolKind::Type(TypeSymbol {
                    builtin: false,
                    scope: None,
                    superclass: None,
                }),
                declaration: Some(id),
            };

            let Some(symbol_id) = self.table.define(global, symbol) else {
                self.report(duplicate_definition("class", name, position));
                continue;
            };
            let scope = self.table.add_scope(ScopeKind::Class, global, Some(symbol_id));
            if let Some(ty) = self.table.type_symbol_mut(symbol_id) {
                ty.scope = Some(scope);
            }
            self.table.bind_scope(id, scope);
            trace!(class = name, ?scope, "defined class");
            classes.push((class, scope));
        }
        classes
    }

    fn link_superclasses(&mut self, classes: &[(ClassRef<'_>, ScopeId)]) {
        for &(class, scope) in classes {
            let ClassRef::Regular(class) = class else {
                continue;
            };
            let Some(superclass) = &class.superclass else {
                continue;
            };
            let Some(this_class) = self.table.symbol_declared_by(class.id) else {
                continue;
            };

            let Some(parent) = self.table.resolve_type(superclass) else {
                self.report(unresolved("superclass", superclass, class.position));
                continue;
            };
            let parent_scope = self
                .table
                .type_symbol(parent)
                .filter(|ty| !ty.builtin)
                .and_then(|ty| ty.scope);
            let Some(parent_scope) = parent_scope else {
                self.report(Diagnostic::semantic(
                    format!(
                        "class `{}` cannot extend built-in type `{}`",
                        class.name, superclass
                    ),
                    class.position,
                ));
                continue;
            };
            if self.inherits_from(parent, this_class) {
                self.report(Diagnostic::semantic(
                    format!("cyclic inheritance involving class `{}`", class.name),
                    class.position,
                ));
                continue;
            }

            if let Some(ty) = self.table.type_symbol_mut(this_class) {
                ty.superclass = Some(parent);
            }
            self.table.set_parent(scope, parent_scope);
        }
    }

    /// Whether `class` is `ancestor` or (transitively) extends it
    fn inherits_from(&self, class: SymbolId, ancestor: SymbolId) -> bool {
        let mut current = Some(class);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.table.type_symbol(id).and_then(|ty| ty.superclass);
        }
        false
    }

    fn define_main_method<'p>(
        &mut self,
        main: &'p MainClassDeclaration,
        class_scope: ScopeId,
    ) -> Option<MethodRef<'p>> {
        let owner = self.table.symbol_declared_by(main.id)?;
        let method_scope = self.table.add_scope(ScopeKind::Method, class_scope, None);
        let symbol = Symbol {
            name: "main".to_string(),
            kind: SymbolKind::Method(MethodSymbol {
                return_type: StaticType::Void,
                parameters: Vec::new(),
                scope: method_scope,
                owner,
            }),
            declaration: None,
        };
        let method = self.table.define(class_scope, symbol)?;
        self.set_scope_owner(method_scope, method);

        Some(MethodRef {
            scope: method_scope,
            parameters: &[],
            body: &main.statements,
            is_static: true,
        })
    }

    fn define_members<'p>(
        &mut self,
        class: &'p ClassDeclaration,
        class_scope: ScopeId,
        methods: &mut Vec<MethodRef<'p>>,
    ) {
        let Some(owner) = self.table.symbol_declared_by(class.id) else {
            return;
        };

        for declaration in &class.declarations {
            match declaration {
                Declaration::Variable(field) => {
                    self.define_variable(field, class_scope, None);
                }
                Declaration::Method(method) => {
                    if let Some(method) = self.define_method(method, class_scope, owner) {
                        methods.push(method);
                    }
                }
                Declaration::Error { .. } => {}
            }
        }
    }

    fn define_method<'p>(
        &mut self,
        method: &'p MethodDeclaration,
        class_scope: ScopeId,
        owner: SymbolId,
    ) -> Option<MethodRef<'p>> {
        self.check_type_name(&method.return_type, method.position);
        let method_scope = self.table.add_scope(ScopeKind::Method, class_scope, None);
        let symbol = Symbol {
            name: method.name.clone(),
            kind: SymbolKind::Method(MethodSymbol {
                return_type: StaticType::from_type_name(&method.return_type, method.returns_array),
                parameters: method
                    .parameters
                    .iter()
                    .map(|param| StaticType::from_type_name(&param.type_name, param.is_array))
                    .collect(),
                scope: method_scope,
                owner,
            }),
            declaration: Some(method.id),
        };

        let Some(symbol_id) = self.table.define(class_scope, symbol) else {
            self.report(duplicate_definition("method", &method.name, method.position));
            return None;
        };
        self.set_scope_owner(method_scope, symbol_id);
        self.table.bind_scope(method.id, method_scope);

        Some(MethodRef {
            scope: method_scope,
            parameters: &method.parameters,
            body: &method.body,
            is_static: false,
        })
    }

    fn set_scope_owner(&mut self, scope: ScopeId, owner: SymbolId) {
        self.table.set_owner(scope, owner);
    }

    /// Define a field, formal or local; `index` is the argument or slot number
    fn define_variable(
        &mut self,
        declaration: &VariableDeclaration,
        scope: ScopeId,
        index: Option<u16>,
    ) -> Option<SymbolId> {
        self.check_type_name(&declaration.type_name, declaration.position);
        self.table.bind_scope(declaration.id, scope);

        let symbol = Symbol {
            name: declaration.name.clone(),
            kind: SymbolKind::Variable(VariableSymbol {
                ty: StaticType::from_type_name(&declaration.type_name, declaration.is_array),
                kind: declaration.kind,
                index,
            }),
            declaration: Some(declaration.id),
        };
        let defined = self.table.define(scope, symbol);
        if defined.is_none() {
            self.report(duplicate_definition(
                "variable",
                &declaration.name,
                declaration.position,
            ));
        }
        defined
    }

    /// Slot `index` as an instruction operand. Past the operand range the
    /// variable is still defined without a slot so its uses resolve.
    fn slot(&mut self, index: usize, what: &str, position: SourcePosition) -> Option<u16> {
        let slot = u16::try_from(index).ok();
        if slot.is_none() && !self.slots_reported {
            self.slots_reported = true;
            self.report(slots_exhausted(what, position));
        }
        slot
    }

    fn check_type_name(&mut self, name: &str, position: SourcePosition) {
        if self.table.resolve_type(name).is_none() {
            self.report(unresolved("type", name, position));
        }
    }

    // ========================================================================
    // Pass 4: method bodies
    // ========================================================================

    fn analyze_method(&mut self, method: &MethodRef<'_>) {
        self.current_scope = method.scope;
        self.next_local = 0;
        self.slots_reported = false;
        self.in_static_method = method.is_static;

        for (position, parameter) in method.parameters.iter().enumerate() {
            // Argument 0 is the receiver.
            let index = self.slot(position + 1, "parameters", parameter.position);
            self.define_variable(parameter, method.scope, index);
        }
        for statement in method.body {
            self.visit_statement(statement);
        }
    }

    fn visit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::VariableDeclaration(declaration) => {
                let slot = self.slot(
                    self.next_local as usize,
                    "local variables",
                    declaration.position,
                );
                if self
                    .define_variable(declaration, self.current_scope, slot)
                    .is_some()
                    && slot.is_some()
                {
                    self.next_local += 1;
                }
            }
            Statement::Print { expression, .. }
            | Statement::Return { expression, .. }
            | Statement::Assert { expression, .. } => {
                self.visit_expression(expression);
            }
            Statement::Block { id, statements, .. } => {
                let outer = self.current_scope;
                self.current_scope = self.table.add_scope(ScopeKind::Block, outer, None);
                self.table.bind_scope(*id, self.current_scope);
                for statement in statements {
                    self.visit_statement(statement);
                }
                self.current_scope = outer;
            }
            Statement::Assignment { target, value, .. } => {
                if !matches!(
                    target,
                    Expression::VariableReference { .. } | Expression::ArrayIndex { .. }
                ) {
                    self.report(Diagnostic::semantic(
                        format!(
                            "cannot assign to {}; expected a variable or array element",
                            target.describe()
                        ),
                        target.position(),
                    ));
                }
                self.visit_expression(target);
                self.visit_expression(value);
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.visit_expression(condition);
                self.visit_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.visit_statement(else_branch);
                }
            }
            Statement::While {
                condition, body, ..
            } => {
                self.visit_expression(condition);
                self.visit_statement(body);
            }
            Statement::MethodInvocation(call) => {
                self.visit_invocation(call);
            }
            Statement::Error { .. } => {}
        }
    }

    /// Resolve names in an expression and record its static type
    fn visit_expression(&mut self, expression: &Expression) -> Option<StaticType> {
        let ty = match expression {
            Expression::MethodInvocation(call) => return self.visit_invocation(call),
            Expression::IntegerLiteral { .. } => Some(StaticType::Int),
            Expression::BooleanLiteral { .. } => Some(StaticType::Boolean),
            Expression::This { id, position } => {
                self.table.bind_scope(*id, self.current_scope);
                if self.in_static_method {
                    self.report(Diagnostic::semantic(
                        "`this` cannot be used in the static main method",
                        *position,
                    ));
                }
                self.table
                    .enclosing_class(self.current_scope)
                    .map(|class| StaticType::Class(self.table.symbol(class).name.clone()))
            }
            Expression::VariableReference { id, name, position } => {
                self.table.bind_scope(*id, self.current_scope);
                match self.table.resolve_variable(self.current_scope, name) {
                    Some(symbol) => {
                        self.table.bind_reference(*id, symbol);
                        self.table.variable(symbol).map(|variable| variable.ty.clone())
                    }
                    None => {
                        self.report(unresolved("variable", name, *position));
                        None
                    }
                }
            }
            Expression::ArrayIndex {
                array,
                index,
                position,
                ..
            } => {
                let array_type = self.visit_expression(array);
                self.visit_expression(index);
                match array_type {
                    Some(StaticType::Array(element)) => Some(*element),
                    Some(other) => {
                        self.report(Diagnostic::semantic(
                            format!("cannot index into a value of type `{}`", other),
                            *position,
                        ));
                        None
                    }
                    None => None,
                }
            }
            Expression::UnaryNot { operand, .. } => {
                self.visit_expression(operand);
                Some(StaticType::Boolean)
            }
            Expression::BinaryOperator {
                operator,
                left,
                right,
                ..
            } => {
                self.visit_expression(left);
                self.visit_expression(right);
                match operator.category() {
                    OperatorCategory::Arithmetic => Some(StaticType::Int),
                    _ => Some(StaticType::Boolean),
                }
            }
            Expression::InstanceCreation {
                id,
                type_name,
                array_size,
                position,
            } => {
                self.table.bind_scope(*id, self.current_scope);
                match array_size {
                    Some(size) => {
                        self.visit_expression(size);
                        self.check_type_name(type_name, *position);
                        Some(StaticType::from_type_name(type_name, true))
                    }
                    None => match self.table.resolve_type(type_name) {
                        Some(symbol) => {
                            self.table.bind_reference(*id, symbol);
                            Some(StaticType::Class(type_name.clone()))
                        }
                        None => {
                            self.report(unresolved("type", type_name, *position));
                            None
                        }
                    },
                }
            }
            Expression::Error { .. } => None,
        };

        if let (Some(id), Some(ty)) = (expression.id(), &ty) {
            self.table.set_expression_type(id, ty.clone());
        }
        ty
    }

    fn visit_invocation(&mut self, call: &MethodInvocation) -> Option<StaticType> {
        self.table.bind_scope(call.id, self.current_scope);
        let receiver = self.visit_expression(&call.receiver);
        for argument in &call.arguments {
            self.visit_expression(argument);
        }

        let ty = match receiver? {
            StaticType::Array(_) if call.method_name == LENGTH => Some(StaticType::Int),
            _ if call.method_name == LENGTH => {
                self.report(Diagnostic::semantic(
                    "`length` can only be applied to arrays",
                    call.position,
                ));
                None
            }
            StaticType::Class(class_name) => self.resolve_call(call, &class_name),
            other => {
                self.report(Diagnostic::semantic(
                    format!(
                        "cannot call method `{}` on a value of type `{}`",
                        call.method_name, other
                    ),
                    call.position,
                ));
                None
            }
        };

        if let Some(ty) = &ty {
            self.table.set_expression_type(call.id, ty.clone());
        }
        ty
    }

    /// Resolve `call` in the scope of `class_name` and check its arity
    fn resolve_call(&mut self, call: &MethodInvocation, class_name: &str) -> Option<StaticType> {
        let class_scope = self
            .table
            .resolve_type(class_name)
            .and_then(|class| self.table.type_symbol(class))
            .and_then(|ty| ty.scope)?;

        let Some(symbol) = self.table.resolve(class_scope, Namespace::Method, &call.method_name)
        else {
            self.report(unresolved("method", &call.method_name, call.position));
            return None;
        };
        let method = self.table.method(symbol)?.clone();

        if method.parameters.len() != call.arguments.len() {
            self.report(Diagnostic::semantic(
                format!(
                    "method `{}` takes {} argument(s) but {} were supplied",
                    call.method_name,
                    method.parameters.len(),
                    call.arguments.len()
                ),
                call.position,
            ));
        }
        self.table.bind_reference(call.id, symbol);
        Some(method.return_type)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        trace!(%diagnostic, "semantic error");
        self.diagnostics.push(diagnostic);
    }
}

impl Default for ScopeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// A class of either kind, during analysis
#[derive(Clone, Copy)]
enum ClassRef<'p> {
    Main(&'p MainClassDeclaration),
    Regular(&'p ClassDeclaration),
}

impl<'p> ClassRef<'p> {
    fn header(&self) -> (NodeId, &'p str, SourcePosition) {
        match self {
            ClassRef::Main(main) => (main.id, &main.name, main.position),
            ClassRef::Regular(class) => (class.id, &class.name, class.position),
        }
    }
}

/// A method body waiting for pass 4
struct MethodRef<'p> {
    scope: ScopeId,
    parameters: &'p [VariableDeclaration],
    body: &'p [Statement],
    is_static: bool,
}
