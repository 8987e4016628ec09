//! Symbols, scopes and the symbol table
//!
//! Scopes form a tree mirroring lexical nesting (global, class, method,
//! block). Every scope holds three independent namespaces, so a type, a
//! method and a variable may share a name. A class scope's parent is the
//! scope of its superclass, which makes inherited fields and methods visible
//! through ordinary chained resolution.

use crate::ast::{NodeId, VariableKind};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Index of a scope in the symbol table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScopeId(pub u32);

/// Index of a symbol in the symbol table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

/// What construct a scope belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScopeKind {
    /// The unique root scope holding every type
    Global,
    /// Fields and methods of a class
    Class,
    /// Formals and top-level locals of a method
    Method,
    /// Locals of a nested `{ }` block
    Block,
}

/// The three symbol namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Namespace {
    /// Type names
    Type,
    /// Method names
    Method,
    /// Variable names
    Variable,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Namespace::Type => "type",
            Namespace::Method => "method",
            Namespace::Variable => "variable",
        };
        f.write_str(name)
    }
}

/// Static type of a declaration or expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum StaticType {
    /// `int`
    Int,
    /// `boolean`
    Boolean,
    /// `void`
    Void,
    /// A user-defined class
    Class(String),
    /// Array of the element type
    Array(Box<StaticType>),
}

impl StaticType {
    /// Build a type from a declared type name and array flag
    pub fn from_type_name(name: &str, is_array: bool) -> Self {
        let base = match name {
            "int" => StaticType::Int,
            "boolean" => StaticType::Boolean,
            "void" => StaticType::Void,
            other => StaticType::Class(other.to_string()),
        };
        if is_array {
            StaticType::Array(Box::new(base))
        } else {
            base
        }
    }

    /// Element type of an array type
    pub fn element_type(&self) -> Option<&StaticType> {
        match self {
            StaticType::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Whether values of this type are stored as integers (`int`, `boolean`)
    pub fn is_integral(&self) -> bool {
        matches!(self, StaticType::Int | StaticType::Boolean)
    }

    /// Name of the class for class types
    pub fn class_name(&self) -> Option<&str> {
        match self {
            StaticType::Class(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for StaticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaticType::Int => f.write_str("int"),
            StaticType::Boolean => f.write_str("boolean"),
            StaticType::Void => f.write_str("void"),
            StaticType::Class(name) => f.write_str(name),
            StaticType::Array(element) => write!(f, "{}[]", element),
        }
    }
}

/// A type symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSymbol {
    /// Built-in types have no scope and no declaration
    pub builtin: bool,
    /// Class scope holding fields and methods
    pub scope: Option<ScopeId>,
    /// Resolved superclass
    pub superclass: Option<SymbolId>,
}

/// A method symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSymbol {
    /// Declared return type
    pub return_type: StaticType,
    /// Parameter types in declaration order
    pub parameters: Vec<StaticType>,
    /// Scope holding the formals and top-level locals
    pub scope: ScopeId,
    /// Type symbol of the declaring class
    pub owner: SymbolId,
}

/// A variable symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSymbol {
    /// Declared type
    pub ty: StaticType,
    /// Storage kind
    pub kind: VariableKind,
    /// Argument position for formals (0 is `this`), slot for locals, `None` for fields
    pub index: Option<u16>,
}

/// Kind-specific symbol data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SymbolKind {
    /// A type
    Type(TypeSymbol),
    /// A method
    Method(MethodSymbol),
    /// A field, formal or local
    Variable(VariableSymbol),
}

impl SymbolKind {
    /// Namespace this symbol lives in
    pub fn namespace(&self) -> Namespace {
        match self {
            SymbolKind::Type(_) => Namespace::Type,
            SymbolKind::Method(_) => Namespace::Method,
            SymbolKind::Variable(_) => Namespace::Variable,
        }
    }
}

/// A named entity, distinct from the AST node declaring it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    /// Symbol name
    pub name: String,
    /// Kind-specific data
    pub kind: SymbolKind,
    /// Declaring node; `None` for built-ins
    pub declaration: Option<NodeId>,
}

/// A node in the scope tree
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    /// What the scope belongs to
    pub kind: ScopeKind,
    /// Enclosing scope; `None` only for the global scope
    pub parent: Option<ScopeId>,
    /// Class or method symbol owning the scope
    pub owner: Option<SymbolId>,
    types: HashMap<String, SymbolId>,
    methods: HashMap<String, SymbolId>,
    variables: HashMap<String, SymbolId>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>, owner: Option<SymbolId>) -> Self {
        Self {
            kind,
            parent,
            owner,
            types: HashMap::new(),
            methods: HashMap::new(),
            variables: HashMap::new(),
        }
    }

    fn names(&self, namespace: Namespace) -> &HashMap<String, SymbolId> {
        match namespace {
            Namespace::Type => &self.types,
            Namespace::Method => &self.methods,
            Namespace::Variable => &self.variables,
        }
    }

    fn names_mut(&mut self, namespace: Namespace) -> &mut HashMap<String, SymbolId> {
        match namespace {
            Namespace::Type => &mut self.types,
            Namespace::Method => &mut self.methods,
            Namespace::Variable => &mut self.variables,
        }
    }

    /// Look a name up in this scope only
    pub fn lookup(&self, namespace: Namespace, name: &str) -> Option<SymbolId> {
        self.names(namespace).get(name).copied()
    }
}

/// Scope tree, symbols and the node/symbol mappings of one compilation unit.
///
/// Populated by [`ScopeAnalyzer`](crate::ScopeAnalyzer); read-only afterwards.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
    /// Node -> scope it was resolved in or defines
    node_scopes: HashMap<NodeId, ScopeId>,
    /// Declaring node -> symbol it defines
    declared: HashMap<NodeId, SymbolId>,
    /// Referencing node -> symbol it resolved to
    references: HashMap<NodeId, SymbolId>,
    /// Expression node -> static type
    expression_types: HashMap<NodeId, StaticType>,
}

impl SymbolTable {
    /// Create a table holding only the empty global scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Global, None, None)],
            symbols: Vec::new(),
            node_scopes: HashMap::new(),
            declared: HashMap::new(),
            references: HashMap::new(),
            expression_types: HashMap::new(),
        }
    }

    /// The root scope
    pub fn global_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Create a scope nested in `parent`
    pub fn add_scope(
        &mut self,
        kind: ScopeKind,
        parent: ScopeId,
        owner: Option<SymbolId>,
    ) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, Some(parent), owner));
        id
    }

    /// Re-parent a scope (used to link a class scope to its superclass scope)
    pub(crate) fn set_parent(&mut self, scope: ScopeId, parent: ScopeId) {
        self.scopes[scope.0 as usize].parent = Some(parent);
    }

    pub(crate) fn set_owner(&mut self, scope: ScopeId, owner: SymbolId) {
        self.scopes[scope.0 as usize].owner = Some(owner);
    }

    /// Define a symbol in `scope`.
    ///
    /// Returns `None` if the name is already defined in the same namespace of
    /// the same scope. Definitions in enclosing scopes do not conflict.
    pub fn define(&mut self, scope: ScopeId, symbol: Symbol) -> Option<SymbolId> {
        let namespace = symbol.kind.namespace();
        if self.scope(scope).lookup(namespace, &symbol.name).is_some() {
            return None;
        }

        let id = SymbolId(self.symbols.len() as u32);
        if let Some(node) = symbol.declaration {
            self.declared.insert(node, id);
        }
        self.scopes[scope.0 as usize]
            .names_mut(namespace)
            .insert(symbol.name.clone(), id);
        self.symbols.push(symbol);
        Some(id)
    }

    /// Resolve a type name; types only live in the global scope
    pub fn resolve_type(&self, name: &str) -> Option<SymbolId> {
        self.scope(self.global_scope()).lookup(Namespace::Type, name)
    }

    /// Resolve a variable, walking outward from `scope`
    pub fn resolve_variable(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.resolve(scope, Namespace::Variable, name)
    }

    /// Resolve a method, walking outward from `scope`
    pub fn resolve_method(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.resolve(scope, Namespace::Method, name)
    }

    /// Resolve a name in `namespace`, innermost definition first
    pub fn resolve(&self, scope: ScopeId, namespace: Namespace, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(symbol) = scope.lookup(namespace, name) {
                return Some(symbol);
            }
            current = scope.parent;
        }
        None
    }

    /// Get a scope
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    /// Get a symbol
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    /// Iterate over every symbol in definition order
    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .map(|(index, symbol)| (SymbolId(index as u32), symbol))
    }

    /// Number of scopes, the global scope included
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Type data of a symbol, if it is a type
    pub fn type_symbol(&self, id: SymbolId) -> Option<&TypeSymbol> {
        match &self.symbol(id).kind {
            SymbolKind::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// Method data of a symbol, if it is a method
    pub fn method(&self, id: SymbolId) -> Option<&MethodSymbol> {
        match &self.symbol(id).kind {
            SymbolKind::Method(method) => Some(method),
            _ => None,
        }
    }

    /// Variable data of a symbol, if it is a variable
    pub fn variable(&self, id: SymbolId) -> Option<&VariableSymbol> {
        match &self.symbol(id).kind {
            SymbolKind::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub(crate) fn type_symbol_mut(&mut self, id: SymbolId) -> Option<&mut TypeSymbol> {
        match &mut self.symbols[id.0 as usize].kind {
            SymbolKind::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// Record the scope a node was resolved in or defines
    pub(crate) fn bind_scope(&mut self, node: NodeId, scope: ScopeId) {
        self.node_scopes.insert(node, scope);
    }

    /// Record the symbol a node refers to
    pub(crate) fn bind_reference(&mut self, node: NodeId, symbol: SymbolId) {
        self.references.insert(node, symbol);
    }

    pub(crate) fn set_expression_type(&mut self, node: NodeId, ty: StaticType) {
        self.expression_types.insert(node, ty);
    }

    /// Scope a node was resolved in, or the scope it defines
    pub fn scope_of(&self, node: NodeId) -> Option<ScopeId> {
        self.node_scopes.get(&node).copied()
    }

    /// Node declaring a symbol
    pub fn declaration_of(&self, symbol: SymbolId) -> Option<NodeId> {
        self.symbol(symbol).declaration
    }

    /// Symbol declared by a declaration node
    pub fn symbol_declared_by(&self, node: NodeId) -> Option<SymbolId> {
        self.declared.get(&node).copied()
    }

    /// Symbol a reference node (variable reference, invocation, creation) resolved to
    pub fn referenced_symbol(&self, node: NodeId) -> Option<SymbolId> {
        self.references.get(&node).copied()
    }

    /// Static type of an expression node
    pub fn expression_type(&self, node: NodeId) -> Option<&StaticType> {
        self.expression_types.get(&node)
    }

    /// Type symbol of the class enclosing `scope`
    pub fn enclosing_class(&self, scope: ScopeId) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if scope.kind == ScopeKind::Class {
                return scope.owner;
            }
            current = scope.parent;
        }
        None
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
