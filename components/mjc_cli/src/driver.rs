//! Compilation driver
//!
//! The Driver runs the whole pipeline over one source text:
//! - Parser for the AST and syntax diagnostics
//! - ScopeAnalyzer for the symbol table and semantic diagnostics
//! - SequentialLayout for runtime handles
//! - BytecodeGenerator for one instruction chunk per method

use crate::error::CliResult;
use core_types::CompileError;
use parser::{BytecodeGenerator, GeneratedCode, Parser, Program, ScopeAnalyzer, SequentialLayout};
use serde_json::json;
use std::path::Path;
use tracing::{debug, info};

/// A successfully compiled program
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Parsed program
    pub program: Program,
    /// Generated code, one chunk per method
    pub code: GeneratedCode,
}

/// Runs the compiler pipeline and renders its results
#[derive(Debug, Clone, Default)]
pub struct Driver {
    /// Whether to include the AST in the output
    print_ast: bool,
    /// Whether to include instruction listings in the output
    print_bytecode: bool,
    /// Whether to render output and diagnostics as JSON
    json: bool,
}

impl Driver {
    /// Create a driver with every output disabled
    ///
    /// # Example
    /// ```
    /// use mjc_cli::Driver;
    ///
    /// let driver = Driver::new().with_print_bytecode(true);
    /// assert!(driver.is_print_bytecode_enabled());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable AST printing
    pub fn with_print_ast(mut self, enabled: bool) -> Self {
        self.print_ast = enabled;
        self
    }

    /// Enable bytecode printing
    pub fn with_print_bytecode(mut self, enabled: bool) -> Self {
        self.print_bytecode = enabled;
        self
    }

    /// Enable JSON output
    pub fn with_json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Check if AST printing is enabled
    pub fn is_print_ast_enabled(&self) -> bool {
        self.print_ast
    }

    /// Check if bytecode printing is enabled
    pub fn is_print_bytecode_enabled(&self) -> bool {
        self.print_bytecode
    }

    /// Check if JSON output is enabled
    pub fn is_json_enabled(&self) -> bool {
        self.json
    }

    /// Compile a MiniJava source file
    ///
    /// # Errors
    /// Returns `CliError` if the file cannot be read or compilation fails
    pub fn compile_file(&self, path: impl AsRef<Path>) -> CliResult<Compilation> {
        let path = path.as_ref();
        info!(path = %path.display(), "compiling file");
        let source = std::fs::read_to_string(path)?;
        self.compile_source(&source)
    }

    /// Compile MiniJava source text
    ///
    /// # Example
    /// ```
    /// use mjc_cli::Driver;
    ///
    /// let source = "class Main { public static void main() { System.out.println(1); } }";
    /// let compilation = Driver::new().compile_source(source).unwrap();
    /// assert_eq!(compilation.code.methods.len(), 1);
    /// ```
    pub fn compile_source(&self, source: &str) -> CliResult<Compilation> {
        let program = Parser::new(source).parse()?;
        let table = ScopeAnalyzer::new().analyze(&program)?;
        let environment = SequentialLayout::build(&table);
        let code = BytecodeGenerator::new(&table, &environment).generate(&program)?;
        debug!(methods = code.methods.len(), "compilation finished");
        Ok(Compilation { program, code })
    }

    /// Render a compilation according to the enabled outputs
    pub fn render(&self, compilation: &Compilation) -> CliResult<String> {
        if self.json {
            return self.render_json(compilation);
        }

        let mut output = String::new();
        if self.print_ast {
            output.push_str(&format!("{:#?}\n", compilation.program));
        }
        if self.print_bytecode {
            for (handle, method) in &compilation.code.methods {
                output.push_str(&format!("{} ({}):\n{}", method.name, handle, method.chunk));
            }
        }
        if !self.print_ast && !self.print_bytecode {
            output = format!("compiled {} method(s)\n", compilation.code.methods.len());
        }
        Ok(output)
    }

    fn render_json(&self, compilation: &Compilation) -> CliResult<String> {
        let methods: Vec<_> = compilation
            .code
            .methods
            .iter()
            .map(|(handle, method)| {
                json!({
                    "handle": handle,
                    "name": method.name,
                    "chunk": method.chunk,
                })
            })
            .collect();

        let mut document = json!({ "methods": methods });
        if self.print_ast {
            document["ast"] = serde_json::to_value(&compilation.program)?;
        }
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Render a compilation failure, one diagnostic per line or as a JSON array
    pub fn render_error(&self, error: &CompileError) -> String {
        match error {
            CompileError::Rejected(diagnostics) if self.json => {
                serde_json::to_string_pretty(diagnostics).unwrap_or_else(|e| e.to_string())
            }
            CompileError::Rejected(diagnostics) => diagnostics
                .iter()
                .map(ToString::to_string)
                .chain(std::iter::once(error.to_string()))
                .collect::<Vec<_>>()
                .join("\n"),
            CompileError::Internal(_) => error.to_string(),
        }
    }
}
