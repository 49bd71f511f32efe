//! In-memory representation of a STAR file.

use crate::core::models::table::ParticleTable;

/// A parsed STAR document: data blocks in the order they are declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarDocument {
    pub blocks: Vec<DataBlock>,
}

/// A `data_NAME` block holding single-valued items and looped tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataBlock {
    pub name: String,
    pub pairs: Vec<(String, Value)>,
    pub loops: Vec<Loop>,
}

/// A `loop_` table with row-major values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loop {
    pub tags: Vec<String>,
    /// Length is always a multiple of `tags.len()`.
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    /// The `.` marker.
    Inapplicable,
    /// The `?` marker.
    Unknown,
}

impl Value {
    pub fn into_cell(self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl StarDocument {
    /// The first declared block, if any.
    pub fn first_block(&self) -> Option<&DataBlock> {
        self.blocks.first()
    }

    pub fn block_names(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.name.as_str())
    }
}

impl Loop {
    pub fn nrows(&self) -> usize {
        if self.tags.is_empty() {
            0
        } else {
            self.values.len() / self.tags.len()
        }
    }
}

impl DataBlock {
    /// Looks up a single-valued item by tag (case-insensitive).
    #[cfg(test)]
    pub(crate) fn get(&self, tag: &str) -> Option<&Value> {
        self.pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(tag))
            .map(|(_, v)| v)
    }

    /// Presents the block as one table.
    ///
    /// A block with a loop yields its first loop. A block made only of single-valued
    /// items yields a one-row table with one column per item.
    pub fn to_table(&self) -> ParticleTable {
        match self.loops.first() {
            Some(lp) => ParticleTable::from_parts(
                self.name.clone(),
                lp.tags.clone(),
                lp.values.iter().cloned().map(Value::into_cell).collect(),
            ),
            None if self.pairs.is_empty() => {
                ParticleTable::from_parts(self.name.clone(), Vec::new(), Vec::new())
            }
            None => ParticleTable::from_parts(
                self.name.clone(),
                self.pairs.iter().map(|(k, _)| k.clone()).collect(),
                self.pairs
                    .iter()
                    .map(|(_, v)| v.clone().into_cell())
                    .collect(),
            ),
        }
    }
}
