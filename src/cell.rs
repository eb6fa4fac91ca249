//! # Cells and Mutations
//!
//! The flat storage-side representation the codec converts to and from.
//! A [`Cell`] is one stored (family, qualifier, value, timestamp) unit
//! for a row; a [`Mutation`] is the set of cell writes to apply for one
//! row. Reading and writing cells is the retrieval/commit layer's job —
//! nothing in this crate performs I/O.

/// Timestamp sentinel meaning "let the store assign the current time".
pub const LATEST_TIMESTAMP: i64 = i64::MAX;

/// One stored cell of a row, as handed over by the retrieval layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    family: Vec<u8>,
    qualifier: Vec<u8>,
    value: Vec<u8>,
    timestamp: i64,
}

impl Cell {
    pub fn new(
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            family: family.into(),
            qualifier: qualifier.into(),
            value: value.into(),
            timestamp: LATEST_TIMESTAMP,
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn family(&self) -> &[u8] {
        &self.family
    }

    pub fn qualifier(&self) -> &[u8] {
        &self.qualifier
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// One column write within a [`Mutation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationEntry {
    family: Vec<u8>,
    qualifier: Vec<u8>,
    value: Vec<u8>,
    timestamp: i64,
}

impl MutationEntry {
    pub(crate) fn new(family: Vec<u8>, qualifier: Vec<u8>, value: Vec<u8>, timestamp: i64) -> Self {
        Self {
            family,
            qualifier,
            value,
            timestamp,
        }
    }

    pub fn family(&self) -> &[u8] {
        &self.family
    }

    pub fn qualifier(&self) -> &[u8] {
        &self.qualifier
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// The cell writes to apply for one row.
///
/// Absence of an entry for a column means "do not touch this column",
/// never "write null" — the cell model has no null marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    row_key: Vec<u8>,
    entries: Vec<MutationEntry>,
}

impl Mutation {
    pub(crate) fn new(row_key: Vec<u8>, entries: Vec<MutationEntry>) -> Self {
        Self { row_key, entries }
    }

    /// The encoded storage row identifier.
    pub fn row_key(&self) -> &[u8] {
        &self.row_key
    }

    /// Entries in schema declaration order (families, then fields).
    pub fn entries(&self) -> &[MutationEntry] {
        &self.entries
    }

    /// Looks up the entry for one column, if this mutation writes it.
    pub fn get(&self, family: &[u8], qualifier: &[u8]) -> Option<&MutationEntry> {
        self.entries
            .iter()
            .find(|e| e.family() == family && e.qualifier() == qualifier)
    }

    pub fn contains(&self, family: &[u8], qualifier: &[u8]) -> bool {
        self.get(family, qualifier).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
