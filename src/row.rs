//! # Row Records
//!
//! The structured, typed side of the codec. A [`Row`] is a fixed-arity
//! container: the row-key values, one [`FamilyRow`] per declared family
//! (in schema declaration order), and a tail of metadata slots addressed
//! positionally past the physical arity.
//!
//! ## Positional Addressing
//!
//! The physical arity of a row is `1 + family_count` (one key slot plus
//! one slot per family). System-level metadata rides in extra slots
//! starting at that arity, so control information can share the row's
//! positional addressing without colliding with real fields — see
//! [`serde::metadata`](crate::serde::metadata).
//!
//! ## Lifecycle
//!
//! Rows decoded in fresh mode are independent and safe to retain
//! indefinitely. The reuse-mode scratch row is owned by its decoder and
//! overwritten on every call; callers must not hold a reference across
//! calls.

use smallvec::SmallVec;

use crate::schema::SchemaIndex;
use crate::types::Value;

/// Positional values of one family, in the family's field order.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyRow {
    values: Vec<Value>,
}

impl FamilyRow {
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// A family row of `arity` null slots.
    pub fn nulls(arity: usize) -> Self {
        Self {
            values: vec![Value::Null; arity],
        }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn value(&self, ordinal: usize) -> Option<&Value> {
        self.values.get(ordinal)
    }

    pub fn set_value(&mut self, ordinal: usize, value: Value) {
        self.values[ordinal] = value;
    }

    pub fn arity(&self) -> usize {
        self.values.len()
    }
}

/// One structured row record: key values, family rows, metadata tail.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    key: SmallVec<[Value; 2]>,
    families: Vec<FamilyRow>,
    metadata: Vec<Value>,
}

impl Row {
    pub fn new(
        key: impl IntoIterator<Item = Value>,
        families: impl IntoIterator<Item = FamilyRow>,
    ) -> Self {
        Self {
            key: key.into_iter().collect(),
            families: families.into_iter().collect(),
            metadata: Vec::new(),
        }
    }

    /// An all-null row shaped for `index`: one null per key field, one
    /// null-filled family row per declared family.
    pub fn shaped(index: &SchemaIndex) -> Self {
        Self {
            key: index.key_fields().iter().map(|_| Value::Null).collect(),
            families: index
                .families()
                .iter()
                .map(|f| FamilyRow::nulls(f.fields().len()))
                .collect(),
            metadata: Vec::new(),
        }
    }

    /// Row-key values in key field order.
    pub fn key_values(&self) -> &[Value] {
        &self.key
    }

    pub fn key_value(&self, pos: usize) -> Option<&Value> {
        self.key.get(pos)
    }

    pub(crate) fn set_key_value(&mut self, pos: usize, value: Value) {
        self.key[pos] = value;
    }

    /// Family rows in schema declaration order.
    pub fn families(&self) -> &[FamilyRow] {
        &self.families
    }

    pub fn family(&self, pos: usize) -> Option<&FamilyRow> {
        self.families.get(pos)
    }

    pub fn family_mut(&mut self, pos: usize) -> Option<&mut FamilyRow> {
        self.families.get_mut(pos)
    }

    /// Top-level slot count: the key slot plus one slot per family.
    /// Metadata positions start here.
    pub fn physical_arity(&self) -> usize {
        1 + self.families.len()
    }

    /// Reads the metadata slot at absolute position `pos` (which must be
    /// at or past the physical arity). Returns None for never-set slots.
    pub fn metadata_slot(&self, pos: usize) -> Option<&Value> {
        let idx = pos.checked_sub(self.physical_arity())?;
        self.metadata.get(idx)
    }

    /// Writes the metadata slot at absolute position `pos`, growing the
    /// metadata tail with nulls as needed.
    pub fn set_metadata_slot(&mut self, pos: usize, value: Value) {
        let arity = self.physical_arity();
        assert!(
            pos >= arity,
            "metadata position {} collides with physical slot (arity {})",
            pos,
            arity
        );
        let idx = pos - arity;
        if idx >= self.metadata.len() {
            self.metadata.resize(idx + 1, Value::Null);
        }
        self.metadata[idx] = value;
    }

    /// Renders this row as a nested tuple string, with `null_literal`
    /// standing in for null values. Display-only; never stored.
    pub fn render(&self, null_literal: &str) -> String {
        let mut out = String::from("(");
        for (i, key) in self.key.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&key.render(null_literal));
        }
        for family in &self.families {
            out.push_str(", (");
            for (i, value) in family.values().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&value.render(null_literal));
            }
            out.push(')');
        }
        out.push(')');
        out
    }
}
