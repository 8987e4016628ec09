//! End-to-End CLI Integration Tests
//!
//! Drives the compiler through the mjc_cli Driver API, from a file on disk
//! to rendered output.

use mjc_cli::{CliError, Driver};
use std::io::Write;
use tempfile::NamedTempFile;

use integration_tests::programs;

fn source_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(source.as_bytes()).expect("Failed to write source");
    file
}

#[test]
fn test_e2e_summary() {
    let file = source_file(programs::BUBBLE_SORT);
    let driver = Driver::new();
    let compilation = driver.compile_file(file.path()).expect("Failed to compile");
    assert_eq!(driver.render(&compilation).unwrap(), "compiled 5 method(s)\n");
}

#[test]
fn test_e2e_bytecode_listing() {
    let file = source_file(programs::SHAPES);
    let driver = Driver::new().with_print_bytecode(true);
    let compilation = driver.compile_file(file.path()).expect("Failed to compile");
    let output = driver.render(&compilation).unwrap();

    assert!(output.contains("Shapes.main (method#0):"));
    assert!(output.contains("Square.area (method#4):"));
    assert!(output.contains("ret"));
}

#[test]
fn test_e2e_json_output() {
    let file = source_file(programs::FACTORIAL);
    let driver = Driver::new().with_json(true);
    let compilation = driver.compile_file(file.path()).expect("Failed to compile");
    let output = driver.render(&compilation).unwrap();

    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    let methods = value["methods"].as_array().unwrap();
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[1]["name"], "Fac.compute");
    assert!(value.get("ast").is_none());
}

#[test]
fn test_e2e_json_diagnostics() {
    let file = source_file("class Main { public static void main() { System.out.println(y); } }");
    let driver = Driver::new().with_json(true);
    let Err(CliError::Compile(error)) = driver.compile_file(file.path()) else {
        panic!("Expected compile error");
    };

    let value: serde_json::Value = serde_json::from_str(&driver.render_error(&error)).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["kind"], "Semantic");
    assert_eq!(value[0]["message"], "cannot find variable `y`");
}

#[test]
fn test_e2e_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Driver::new().compile_file(dir.path().join("absent.java"));
    assert!(matches!(result, Err(CliError::Io(_))));
}
