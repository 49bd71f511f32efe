//! Reader for STAR files as written by RELION.
//!
//! [`parse`] turns text into an untyped [`StarDocument`]; [`StarFile`] wires it into
//! the [`TableFile`] interface so documents can be read straight from disk.

pub mod dom;
pub mod parse;

pub use dom::{DataBlock, Loop, StarDocument, Value};
pub use parse::parse;

use crate::core::io::traits::TableFile;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StarError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Unterminated quoted string on line {line}")]
    UnterminatedQuote { line: usize },
    #[error("Unterminated text field starting on line {line}")]
    UnterminatedTextField { line: usize },
    #[error("Loop in block '{block}' on line {line} declares no columns")]
    EmptyLoopHeader { block: String, line: usize },
    #[error("Loop in block '{block}' has {values} values, not a multiple of its {columns} columns")]
    RaggedLoop {
        block: String,
        columns: usize,
        values: usize,
    },
}

pub struct StarFile;

impl TableFile for StarFile {
    type Document = StarDocument;
    type Error = StarError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Document, Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        parse(&text)
    }
}
