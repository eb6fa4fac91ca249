//! # Writable Metadata
//!
//! System-level values that ride along with a row on the write path
//! without being real columns. Each metadata kind is addressed at a
//! fixed position past the row's physical arity, reusing the row
//! record's positional addressing without colliding with declared
//! fields.
//!
//! One kind is defined today: the per-row write timestamp. Adding a new
//! system-level value means adding a kind here plus its accessor; no
//! other component changes.

use eyre::Result;

use crate::cell::LATEST_TIMESTAMP;
use crate::row::Row;
use crate::types::Value;

/// Key under which the write-timestamp metadata is requested.
pub const TIMESTAMP_KEY: &str = "timestamp";

/// The registry of metadata kinds writable through the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    /// Per-row write timestamp, epoch millis. Non-nullable: a declared
    /// timestamp slot holding null fails that row's encode.
    Timestamp,
}

impl MetadataKind {
    /// All supported kinds, for listings and validation messages.
    pub fn all() -> &'static [MetadataKind] {
        &[MetadataKind::Timestamp]
    }

    /// Resolves a requested key to its kind.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            TIMESTAMP_KEY => Some(MetadataKind::Timestamp),
            _ => None,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            MetadataKind::Timestamp => TIMESTAMP_KEY,
        }
    }
}

/// Accessor for the per-row write timestamp.
///
/// When the key was not requested the accessor is unpositioned and reads
/// the default [`LATEST_TIMESTAMP`], meaning "use the mutation's global
/// timestamp".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampMetadata {
    pos: Option<usize>,
}

impl TimestampMetadata {
    /// Resolves the accessor position from the ordered requested keys.
    /// A declared key sits at `index_in_declared_list + physical_arity`.
    pub fn resolve(metadata_keys: &[String], physical_arity: usize) -> Self {
        let pos = metadata_keys
            .iter()
            .position(|key| key == TIMESTAMP_KEY)
            .map(|idx| idx + physical_arity);
        Self { pos }
    }

    /// True if the timestamp key was requested for this codec.
    pub fn is_declared(&self) -> bool {
        self.pos.is_some()
    }

    /// Reads the row's write timestamp in epoch millis.
    pub fn read(&self, row: &Row) -> Result<i64> {
        let Some(pos) = self.pos else {
            return Ok(LATEST_TIMESTAMP);
        };
        match row.metadata_slot(pos) {
            Some(Value::Timestamp(millis)) => Ok(*millis),
            Some(Value::Null) | None => eyre::bail!(
                "writable metadata '{}' cannot accept a null value",
                TIMESTAMP_KEY
            ),
            Some(other) => eyre::bail!(
                "writable metadata '{}' expects a timestamp value, got {}",
                TIMESTAMP_KEY,
                other.kind()
            ),
        }
    }
}
