//! MiniJava Compiler CLI Library
//!
//! Provides the Driver and supporting modules for the `mjc` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod driver;
pub mod error;

pub use cli::Cli;
pub use driver::{Compilation, Driver};
pub use error::{CliError, CliResult};
