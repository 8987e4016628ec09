//! Runtime handles for the code generator
//!
//! The generator never invents type, method, field or constructor
//! references itself. It asks a [`GenerationEnvironment`] for the opaque
//! handle that stands for each resolved entity; a missing entry is an
//! internal error, since resolution already guaranteed the entity exists.

use crate::symbol_table::{SymbolId, SymbolKind, SymbolTable};
use crate::ast::VariableKind;
use bytecode_system::{ConstructorHandle, FieldHandle, MethodHandle, TypeHandle};
use core_types::CompileError;
use std::collections::HashMap;
use tracing::debug;

/// Lookup tables from resolved entities to runtime handles
#[derive(Debug, Clone, Default)]
pub struct GenerationEnvironment {
    types: HashMap<String, TypeHandle>,
    methods: HashMap<SymbolId, MethodHandle>,
    fields: HashMap<SymbolId, FieldHandle>,
    constructors: HashMap<TypeHandle, ConstructorHandle>,
}

impl GenerationEnvironment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handle of a type by name
    pub fn insert_type(&mut self, name: impl Into<String>, handle: TypeHandle) {
        self.types.insert(name.into(), handle);
    }

    /// Register the handle of a method symbol
    pub fn insert_method(&mut self, method: SymbolId, handle: MethodHandle) {
        self.methods.insert(method, handle);
    }

    /// Register the handle of a field symbol
    pub fn insert_field(&mut self, field: SymbolId, handle: FieldHandle) {
        self.fields.insert(field, handle);
    }

    /// Register the no-argument constructor of a class type
    pub fn insert_constructor(&mut self, ty: TypeHandle, handle: ConstructorHandle) {
        self.constructors.insert(ty, handle);
    }

    /// Handle of the type declared as `name`
    pub fn type_handle(&self, name: &str) -> Result<TypeHandle, CompileError> {
        self.types
            .get(name)
            .copied()
            .ok_or_else(|| CompileError::internal(format!("no type handle for `{}`", name)))
    }

    /// Handle of a method symbol
    pub fn method_handle(&self, method: SymbolId) -> Result<MethodHandle, CompileError> {
        self.methods
            .get(&method)
            .copied()
            .ok_or_else(|| CompileError::internal(format!("no method handle for {:?}", method)))
    }

    /// Handle of a field symbol
    pub fn field_handle(&self, field: SymbolId) -> Result<FieldHandle, CompileError> {
        self.fields
            .get(&field)
            .copied()
            .ok_or_else(|| CompileError::internal(format!("no field handle for {:?}", field)))
    }

    /// Constructor of a class type
    pub fn constructor(&self, ty: TypeHandle) -> Result<ConstructorHandle, CompileError> {
        self.constructors
            .get(&ty)
            .copied()
            .ok_or_else(|| CompileError::internal(format!("no constructor for {}", ty)))
    }
}

/// Assigns consecutive handles in symbol definition order
pub struct SequentialLayout;

impl SequentialLayout {
    /// Build an environment covering every type, method and field of `table`
    pub fn build(table: &SymbolTable) -> GenerationEnvironment {
        let mut environment = GenerationEnvironment::new();
        let (mut types, mut methods, mut fields) = (0u32, 0u32, 0u32);

        for (id, symbol) in table.symbols() {
            match &symbol.kind {
                SymbolKind::Type(ty) => {
                    let handle = TypeHandle(types);
                    types += 1;
                    environment.insert_type(symbol.name.clone(), handle);
                    if !ty.builtin {
                        environment.insert_constructor(handle, ConstructorHandle(handle.0));
                    }
                }
                SymbolKind::Method(_) => {
                    environment.insert_method(id, MethodHandle(methods));
                    methods += 1;
                }
                SymbolKind::Variable(variable) if variable.kind == VariableKind::Class => {
                    environment.insert_field(id, FieldHandle(fields));
                    fields += 1;
                }
                SymbolKind::Variable(_) => {}
            }
        }

        debug!(types, methods, fields, "laid out runtime handles");
        environment
    }
}
