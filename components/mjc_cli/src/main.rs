//! MiniJava compiler
//!
//! Entry point for `mjc`. Parses CLI arguments, installs the log subscriber
//! and delegates to the Driver for compilation.

use clap::Parser as ClapParser;
use mjc_cli::{Cli, CliError, Driver};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let driver = Driver::new()
        .with_print_ast(cli.print_ast)
        .with_print_bytecode(cli.print_bytecode)
        .with_json(cli.json);

    let result = driver
        .compile_file(&cli.file)
        .and_then(|compilation| driver.render(&compilation));

    match result {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(CliError::Compile(e)) => {
            eprintln!("{}", driver.render_error(&e));
            ExitCode::FAILURE
        }
        Err(CliError::Io(e)) => {
            eprintln!("Error: Could not read file '{}': {}", cli.file.display(), e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
