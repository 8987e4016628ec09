//! MiniJava front end
//!
//! Provides the lexer, the error-recovering parser, name resolution and
//! stack-machine code generation for MiniJava.
//!
//! # Overview
//!
//! - [`Lexer`] - Tokenizes MiniJava source code
//! - [`Parser`] - Recursive descent parser with panic-mode recovery
//! - [`Program`] - Root of the abstract syntax tree
//! - [`ScopeAnalyzer`] - Builds the [`SymbolTable`] and reports semantic errors
//! - [`BytecodeGenerator`] - Lowers each method into a bytecode chunk
//!
//! # Example
//!
//! ```
//! use parser::{BytecodeGenerator, Parser, ScopeAnalyzer, SequentialLayout};
//!
//! let source = "class Main { public static void main() { System.out.println(1 + 2); } }";
//! let program = Parser::new(source).parse().unwrap();
//! let table = ScopeAnalyzer::new().analyze(&program).unwrap();
//! let environment = SequentialLayout::build(&table);
//!
//! let code = BytecodeGenerator::new(&table, &environment)
//!     .generate(&program)
//!     .unwrap();
//! assert_eq!(code.methods.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod bytecode_gen;
pub mod environment;
mod error;
pub mod lexer;
pub mod parser;
pub mod scope;
pub mod symbol_table;
pub mod token;

pub use ast::{Expression, NodeId, Program, Statement};
pub use bytecode_gen::{BytecodeGenerator, GeneratedCode, MethodCode};
pub use environment::{GenerationEnvironment, SequentialLayout};
pub use lexer::Lexer;
pub use parser::Parser;
pub use scope::ScopeAnalyzer;
pub use symbol_table::{Namespace, ScopeId, StaticType, SymbolId, SymbolTable};
pub use token::{Keyword, Token, TokenBuffer, TokenKind, TokenSource};
