//! Command line arguments

use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

/// MiniJava compiler
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "mjc", version, about = "Compile a MiniJava program to stack-machine bytecode")]
pub struct Cli {
    /// MiniJava source file to compile
    pub file: PathBuf,

    /// Print the abstract syntax tree
    #[arg(long)]
    pub print_ast: bool,

    /// Print the generated instructions of every method
    #[arg(long)]
    pub print_bytecode: bool,

    /// Emit output and diagnostics as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Create CLI options for compiling `file` with every output disabled
    pub fn with_file(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            print_ast: false,
            print_bytecode: false,
            json: false,
            verbose: 0,
        }
    }

    /// Maximum log level selected by `-v`
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
