use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Row {row} has {found} values but the table has {expected} columns")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A named table of particles, one row per particle.
///
/// Cells hold the raw text of each value; `None` marks the STAR null markers
/// (`.` and `?`). Column order carries no meaning, only column names do.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleTable {
    name: String,
    columns: Vec<String>,
    // Row-major, `columns.len() * nrows()` entries.
    cells: Vec<Option<String>>,
}

impl ParticleTable {
    /// Builds a table from explicit rows, checking that every row matches the header.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RowLength`] for the first row whose length differs from
    /// the number of columns.
    pub fn with_rows(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Result<Self, TableError> {
        let mut cells = Vec::with_capacity(columns.len() * rows.len());
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != columns.len() {
                return Err(TableError::RowLength {
                    row,
                    expected: columns.len(),
                    found: values.len(),
                });
            }
            cells.extend(values);
        }
        Ok(Self {
            name: name.into(),
            columns,
            cells,
        })
    }

    pub(crate) fn from_parts(
        name: String,
        columns: Vec<String>,
        cells: Vec<Option<String>>,
    ) -> Self {
        debug_assert!(columns.is_empty() || cells.len() % columns.len() == 0);
        Self {
            name,
            columns,
            cells,
        }
    }

    /// Name of the data block the table was read from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn nrows(&self) -> usize {
        if self.columns.is_empty() {
            0
        } else {
            self.cells.len() / self.columns.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nrows() == 0
    }

    /// Finds a column by name.
    ///
    /// Matching ignores ASCII case and a leading underscore on either side, so
    /// `rlnTomoTiltSeriesPixelSize` finds a `_rlnTomoTiltSeriesPixelSize` header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_column_name(name);
        self.columns
            .iter()
            .position(|c| normalize_column_name(c).eq_ignore_ascii_case(wanted))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        if col >= self.columns.len() || row >= self.nrows() {
            return None;
        }
        self.cells[row * self.columns.len() + col].as_deref()
    }
}

fn normalize_column_name(name: &str) -> &str {
    name.strip_prefix('_').unwrap_or(name)
}
