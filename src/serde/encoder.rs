//! # Row Encoder
//!
//! Turns one structured [`Row`] into the [`Mutation`] to apply: the
//! encoded row identifier plus one entry per non-null declared field.
//!
//! ## Null Policy
//!
//! The cell model has no write-null primitive, so a null field never
//! produces an entry — the column is simply left untouched — under
//! either `skip_null_on_write` setting. The flag records the caller's
//! intent (see [`CodecOptions`]); today both settings behave
//! identically, and that equivalence is covered by tests.
//!
//! ## Timestamps
//!
//! Every entry carries the effective write timestamp: the row-sourced
//! writable-metadata timestamp when one is declared and non-default,
//! otherwise the `write_timestamp` argument. Rows with a declared
//! timestamp slot holding null fail to encode.
//!
//! Encoding is `&self` and allocates a fresh mutation per call, so one
//! encoder can serve many threads concurrently.
//!
//! [`CodecOptions`]: crate::options::CodecOptions

use std::sync::Arc;

use eyre::Result;

use crate::cell::{Mutation, MutationEntry, LATEST_TIMESTAMP};
use crate::row::Row;
use crate::schema::SchemaIndex;
use crate::serde::metadata::{MetadataKind, TimestampMetadata};

#[derive(Debug)]
pub struct RowEncoder {
    index: Arc<SchemaIndex>,
    timestamp_metadata: TimestampMetadata,
}

impl RowEncoder {
    /// Builds an encoder over `index`, resolving the writable-metadata
    /// accessors requested in the index's options. Unknown metadata
    /// keys fail construction.
    pub fn new(index: Arc<SchemaIndex>) -> Result<Self> {
        for key in &index.options().metadata_keys {
            if MetadataKind::parse(key).is_none() {
                let supported: Vec<&str> =
                    MetadataKind::all().iter().map(|k| k.key()).collect();
                eyre::bail!(
                    "unknown writable metadata key '{}', supported keys: {:?}",
                    key,
                    supported
                );
            }
        }
        let timestamp_metadata =
            TimestampMetadata::resolve(&index.options().metadata_keys, index.physical_arity());
        Ok(Self {
            index,
            timestamp_metadata,
        })
    }

    pub fn index(&self) -> &SchemaIndex {
        &self.index
    }

    /// Encodes `row` into the mutation to apply under `write_timestamp`
    /// (pass [`LATEST_TIMESTAMP`] to let the store assign the time).
    pub fn encode(&self, row: &Row, write_timestamp: i64) -> Result<Mutation> {
        let row_key = self.encode_row_key(row)?;

        let row_timestamp = self.timestamp_metadata.read(row)?;
        let timestamp = if row_timestamp != LATEST_TIMESTAMP {
            row_timestamp
        } else {
            write_timestamp
        };

        let mut entries = Vec::new();
        for (fpos, family) in self.index.families().iter().enumerate() {
            let family_row = row.family(fpos).ok_or_else(|| {
                eyre::eyre!(
                    "row carries {} families, schema declares {}",
                    row.families().len(),
                    self.index.families().len()
                )
            })?;
            eyre::ensure!(
                family_row.arity() == family.fields().len(),
                "family '{}' row carries {} values, schema declares {}",
                family.name(),
                family_row.arity(),
                family.fields().len()
            );
            for (ordinal, field) in family.fields().iter().enumerate() {
                let value = &family_row.values()[ordinal];
                if value.is_null() {
                    // Absence is the only representable "no value";
                    // both skip-null settings leave the column alone.
                    continue;
                }
                let mut bytes = Vec::new();
                field.codec().encode_value(value, &mut bytes)?;
                entries.push(MutationEntry::new(
                    family.name_bytes().to_vec(),
                    field.qualifier().to_vec(),
                    bytes,
                    timestamp,
                ));
            }
        }
        Ok(Mutation::new(row_key, entries))
    }

    fn encode_row_key(&self, row: &Row) -> Result<Vec<u8>> {
        let key_fields = self.index.key_fields();
        eyre::ensure!(
            row.key_values().len() == key_fields.len(),
            "row carries {} key values, schema declares {}",
            row.key_values().len(),
            key_fields.len()
        );
        let mut row_key = Vec::new();
        for (field, value) in key_fields.iter().zip(row.key_values()) {
            eyre::ensure!(
                !value.is_null(),
                "row key field '{}' cannot accept a null value",
                field.name()
            );
            field.codec().encode_value(value, &mut row_key)?;
        }
        eyre::ensure!(
            !row_key.is_empty(),
            "row key encodes to zero bytes"
        );
        Ok(row_key)
    }
}
