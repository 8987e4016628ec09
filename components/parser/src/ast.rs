//! Abstract Syntax Tree node definitions
//!
//! The tree is frozen once the parser returns it. Later passes attach their
//! results (scopes, symbols, static types, branch labels) in side tables keyed
//! by [`NodeId`].

use core_types::SourcePosition;
use serde::Serialize;
use std::fmt;

/// Identity of an AST node, unique within one parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Root of a compilation unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    /// The main class; absent only when it failed to parse
    pub main_class: Option<MainClassDeclaration>,
    /// Every other class, in source order
    pub classes: Vec<ClassDeclaration>,
}

/// `class Name { public static void main() { ... } }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainClassDeclaration {
    /// Node identity
    pub id: NodeId,
    /// Class name
    pub name: String,
    /// Body of the `main` method
    pub statements: Vec<Statement>,
    /// Position of the `class` keyword
    pub position: SourcePosition,
}

/// A regular class declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDeclaration {
    /// Node identity
    pub id: NodeId,
    /// Class name
    pub name: String,
    /// Name given in the `extends` clause
    pub superclass: Option<String>,
    /// Fields and methods in source order
    pub declarations: Vec<Declaration>,
    /// Position of the `class` keyword
    pub position: SourcePosition,
}

/// A member of a class body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Declaration {
    /// Field declaration
    Variable(VariableDeclaration),
    /// Method declaration
    Method(MethodDeclaration),
    /// Placeholder for a declaration that failed to parse
    Error {
        /// Where the failed declaration started
        position: SourcePosition,
    },
}

/// Storage classification of a variable, fixed by where it is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VariableKind {
    /// Method parameter
    Formal,
    /// Local variable in a method body
    Local,
    /// Class field
    Class,
}

/// Field, parameter or local variable declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclaration {
    /// Node identity
    pub id: NodeId,
    /// Variable name
    pub name: String,
    /// Declared type name (`int`, `boolean` or a class name)
    pub type_name: String,
    /// Whether the declared type is an array of `type_name`
    pub is_array: bool,
    /// Storage kind
    pub kind: VariableKind,
    /// Position of the type
    pub position: SourcePosition,
}

/// `public Type name(params) { ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDeclaration {
    /// Node identity
    pub id: NodeId,
    /// Method name
    pub name: String,
    /// Declared return type name
    pub return_type: String,
    /// Whether the return type is an array
    pub returns_array: bool,
    /// Formal parameters; parameters that failed to parse are omitted
    pub parameters: Vec<VariableDeclaration>,
    /// Method body
    pub body: Vec<Statement>,
    /// Position of the `public` keyword
    pub position: SourcePosition,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// Local variable declaration
    VariableDeclaration(VariableDeclaration),

    /// `System.out.println(expr);`
    Print {
        /// Node identity
        id: NodeId,
        /// Printed integer expression
        expression: Expression,
        /// Source location
        position: SourcePosition,
    },

    /// `return expr;`
    Return {
        /// Node identity
        id: NodeId,
        /// Returned value
        expression: Expression,
        /// Source location
        position: SourcePosition,
    },

    /// `{ ... }`
    Block {
        /// Node identity
        id: NodeId,
        /// Nested statements
        statements: Vec<Statement>,
        /// Source location
        position: SourcePosition,
    },

    /// `assert(expr);`
    Assert {
        /// Node identity
        id: NodeId,
        /// Asserted boolean expression
        expression: Expression,
        /// Source location
        position: SourcePosition,
    },

    /// `target = value;`
    Assignment {
        /// Node identity
        id: NodeId,
        /// Variable reference or array element being assigned
        target: Expression,
        /// Assigned value
        value: Expression,
        /// Position of the `=` token
        position: SourcePosition,
    },

    /// `if (cond) then_branch else else_branch`
    If {
        /// Node identity
        id: NodeId,
        /// Condition
        condition: Expression,
        /// Branch taken when the condition holds
        then_branch: Box<Statement>,
        /// Optional alternative
        else_branch: Option<Box<Statement>>,
        /// Source location
        position: SourcePosition,
    },

    /// `while (cond) body`
    While {
        /// Node identity
        id: NodeId,
        /// Loop condition
        condition: Expression,
        /// Loop body
        body: Box<Statement>,
        /// Source location
        position: SourcePosition,
    },

    /// A method invocation used as a statement
    MethodInvocation(MethodInvocation),

    /// Placeholder for a statement that failed to parse
    Error {
        /// Where the failed statement started
        position: SourcePosition,
    },
}

impl Statement {
    /// Node identity, `None` for error placeholders
    pub fn id(&self) -> Option<NodeId> {
        match self {
            Statement::VariableDeclaration(decl) => Some(decl.id),
            Statement::MethodInvocation(call) => Some(call.id),
            Statement::Print { id, .. }
            | Statement::Return { id, .. }
            | Statement::Block { id, .. }
            | Statement::Assert { id, .. }
            | Statement::Assignment { id, .. }
            | Statement::If { id, .. }
            | Statement::While { id, .. } => Some(*id),
            Statement::Error { .. } => None,
        }
    }

    /// Source location
    pub fn position(&self) -> SourcePosition {
        match self {
            Statement::VariableDeclaration(decl) => decl.position,
            Statement::MethodInvocation(call) => call.position,
            Statement::Print { position, .. }
            | Statement::Return { position, .. }
            | Statement::Block { position, .. }
            | Statement::Assert { position, .. }
            | Statement::Assignment { position, .. }
            | Statement::If { position, .. }
            | Statement::While { position, .. }
            | Statement::Error { position } => *position,
        }
    }
}

/// `receiver.name(arguments)`, also used for the `.length` pseudo-method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodInvocation {
    /// Node identity
    pub id: NodeId,
    /// Expression the method is invoked on
    pub receiver: Box<Expression>,
    /// Method name
    pub method_name: String,
    /// Call arguments
    pub arguments: Vec<Expression>,
    /// Position of the method name
    pub position: SourcePosition,
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    /// Method call or `.length`
    MethodInvocation(MethodInvocation),

    /// `new T()` or `new T[size]`
    InstanceCreation {
        /// Node identity
        id: NodeId,
        /// Created type, or the element type for arrays
        type_name: String,
        /// Array size expression, present for array creation
        array_size: Option<Box<Expression>>,
        /// Position of the `new` keyword
        position: SourcePosition,
    },

    /// `!operand`
    UnaryNot {
        /// Node identity
        id: NodeId,
        /// Negated term
        operand: Box<Expression>,
        /// Source location
        position: SourcePosition,
    },

    /// `left op right`
    BinaryOperator {
        /// Node identity
        id: NodeId,
        /// Operator
        operator: BinaryOperator,
        /// Left operand
        left: Box<Expression>,
        /// Right operand
        right: Box<Expression>,
        /// Position of the operator token
        position: SourcePosition,
    },

    /// `true` / `false`
    BooleanLiteral {
        /// Node identity
        id: NodeId,
        /// Literal value
        value: bool,
        /// Source location
        position: SourcePosition,
    },

    /// Integer literal
    IntegerLiteral {
        /// Node identity
        id: NodeId,
        /// Literal value
        value: i32,
        /// Source location
        position: SourcePosition,
    },

    /// `this`
    This {
        /// Node identity
        id: NodeId,
        /// Source location
        position: SourcePosition,
    },

    /// `array[index]`
    ArrayIndex {
        /// Node identity
        id: NodeId,
        /// Indexed array
        array: Box<Expression>,
        /// Index
        index: Box<Expression>,
        /// Position of the `[` token
        position: SourcePosition,
    },

    /// Reference to a variable by name
    VariableReference {
        /// Node identity
        id: NodeId,
        /// Referenced name
        name: String,
        /// Source location
        position: SourcePosition,
    },

    /// Placeholder for an expression that failed to parse
    Error {
        /// Where the failed expression started
        position: SourcePosition,
    },
}

impl Expression {
    /// Node identity, `None` for error placeholders
    pub fn id(&self) -> Option<NodeId> {
        match self {
            Expression::MethodInvocation(call) => Some(call.id),
            Expression::InstanceCreation { id, .. }
            | Expression::UnaryNot { id, .. }
            | Expression::BinaryOperator { id, .. }
            | Expression::BooleanLiteral { id, .. }
            | Expression::IntegerLiteral { id, .. }
            | Expression::This { id, .. }
            | Expression::ArrayIndex { id, .. }
            | Expression::VariableReference { id, .. } => Some(*id),
            Expression::Error { .. } => None,
        }
    }

    /// Source location
    pub fn position(&self) -> SourcePosition {
        match self {
            Expression::MethodInvocation(call) => call.position,
            Expression::InstanceCreation { position, .. }
            | Expression::UnaryNot { position, .. }
            | Expression::BinaryOperator { position, .. }
            | Expression::BooleanLiteral { position, .. }
            | Expression::IntegerLiteral { position, .. }
            | Expression::This { position, .. }
            | Expression::ArrayIndex { position, .. }
            | Expression::VariableReference { position, .. }
            | Expression::Error { position } => *position,
        }
    }

    /// Short human-readable name of the expression kind
    pub fn describe(&self) -> &'static str {
        match self {
            Expression::MethodInvocation(_) => "method invocation",
            Expression::InstanceCreation { .. } => "instance creation",
            Expression::UnaryNot { .. } => "unary not",
            Expression::BinaryOperator { .. } => "binary operator",
            Expression::BooleanLiteral { .. } => "boolean literal",
            Expression::IntegerLiteral { .. } => "integer literal",
            Expression::This { .. } => "this reference",
            Expression::ArrayIndex { .. } => "array index",
            Expression::VariableReference { .. } => "variable reference",
            Expression::Error { .. } => "invalid expression",
        }
    }
}

/// Operator families, used for typing and code selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperatorCategory {
    /// `+ - * / %`: int x int -> int
    Arithmetic,
    /// `< >`: int x int -> boolean
    Relational,
    /// `==`: same type on both sides -> boolean
    Equality,
    /// `&& ||`: boolean x boolean -> boolean
    Logical,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOperator {
    /// +
    Add,
    /// -
    Sub,
    /// *
    Mul,
    /// /
    Div,
    /// %
    Mod,
    /// <
    Less,
    /// >
    Greater,
    /// ==
    Equal,
    /// &&
    And,
    /// ||
    Or,
}

impl BinaryOperator {
    /// Highest precedence level used by binary operators
    pub const MAX_PRECEDENCE: u8 = 6;

    /// Look up an operator by its source text
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Sub,
            "*" => BinaryOperator::Mul,
            "/" => BinaryOperator::Div,
            "%" => BinaryOperator::Mod,
            "<" => BinaryOperator::Less,
            ">" => BinaryOperator::Greater,
            "==" => BinaryOperator::Equal,
            "&&" => BinaryOperator::And,
            "||" => BinaryOperator::Or,
            _ => return None,
        };
        Some(op)
    }

    /// Source text of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::Equal => "==",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }

    /// Operator family
    pub fn category(&self) -> OperatorCategory {
        match self {
            BinaryOperator::Add
            | BinaryOperator::Sub
            | BinaryOperator::Mul
            | BinaryOperator::Div
            | BinaryOperator::Mod => OperatorCategory::Arithmetic,
            BinaryOperator::Less | BinaryOperator::Greater => OperatorCategory::Relational,
            BinaryOperator::Equal => OperatorCategory::Equality,
            BinaryOperator::And | BinaryOperator::Or => OperatorCategory::Logical,
        }
    }

    /// Binding strength, 1 (`||`) to [`Self::MAX_PRECEDENCE`] (`* / %`)
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Equal => 3,
            BinaryOperator::Less | BinaryOperator::Greater => 4,
            BinaryOperator::Add | BinaryOperator::Sub => 5,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 6,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
