//! Layered configuration: built-in defaults, a TOML file, command-line flags and
//! `--set` overrides, merged in that order of increasing precedence.

pub mod builder;
pub mod defaults;
pub mod file;
pub mod models;
