use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading structured table files.
///
/// Implementors parse a format that may hold several logical tables per file and
/// return the whole document; choosing a table is left to the caller.
pub trait TableFile {
    /// The parsed representation of one file.
    type Document;

    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads a document from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the reader reports an I/O error.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Document, Self::Error>;

    /// Reads a document from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Document, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
