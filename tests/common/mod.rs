//! Shared test utilities.

#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;

/// Owned token list from string literals.
pub fn tokens(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

/// Write a definition file into a fresh temp dir.
///
/// Keep the `TempDir` alive for as long as the path is used.
pub fn temp_definition(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("definition.toml");
    std::fs::write(&path, content).expect("Failed to write definition file");
    (temp_dir, path)
}

/// A small but complete definition used across tests.
pub const SAMPLE_DEFINITION: &str = r#"
[[elements]]
kind = "flag"
id = "verbose"
alias = "v"
help = "Print more"

[[elements]]
kind = "option"
id = "jobs"
alias = "j"
type = "int"
default = 1

[[elements]]
kind = "option"
id = "include"
alias = "I"
cardinality = "unlimited"

[[elements]]
kind = "argument"
id = "input"

[[elements]]
kind = "argument"
id = "output"
default = "out.txt"
"#;
