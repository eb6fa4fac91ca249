//! # Row Decoder
//!
//! Reconstructs one structured [`Row`] from a row identifier and the set
//! of stored cells the retrieval layer delivered for it.
//!
//! ## Decode Modes
//!
//! - **fresh** (`decode`): every call allocates new containers; returned
//!   rows are independent and safe to retain indefinitely. Takes
//!   `&self`, so one decoder can serve many threads concurrently.
//! - **reuse** (`decode_reused`): one scratch row owned by the decoder
//!   is overwritten in place on every call and returned by reference.
//!   The reference aliases decoder state and is invalidated by the next
//!   call; exclusive access is enforced through `&mut self`. Use one
//!   decoder per worker for parallel streaming.
//!
//! On a decode error the scratch row is never exposed: the call returns
//! `Err` before any reference escapes, and the next successful call
//! overwrites every slot positionally, so a failed row cannot leak
//! stale values into a successful result.
//!
//! ## Cell Handling
//!
//! Cells are indexed by (family, qualifier), so results do not depend on
//! presentation order. Absent cells decode to null (schema/row nullability
//! validation is deferred to consumers). The decoder is
//! timestamp-agnostic: if the retrieval layer hands several versions of
//! one column, the last one presented wins — version selection is the
//! retrieval layer's policy, not this crate's.

use std::sync::Arc;

use eyre::Result;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::cell::Cell;
use crate::row::Row;
use crate::schema::SchemaIndex;
use crate::types::Value;

pub struct RowDecoder {
    index: Arc<SchemaIndex>,
    scratch: Row,
}

impl RowDecoder {
    pub fn new(index: Arc<SchemaIndex>) -> Self {
        let scratch = Row::shaped(&index);
        Self { index, scratch }
    }

    pub fn index(&self) -> &SchemaIndex {
        &self.index
    }

    /// Fresh-mode decode: returns an independent row.
    pub fn decode(&self, row_key: &[u8], cells: &[Cell]) -> Result<Row> {
        let mut row = Row::shaped(&self.index);
        decode_into(&self.index, &mut row, row_key, cells)?;
        Ok(row)
    }

    /// Reuse-mode decode: overwrites and returns the decoder's scratch
    /// row. The returned reference is invalidated by the next call.
    pub fn decode_reused(&mut self, row_key: &[u8], cells: &[Cell]) -> Result<&Row> {
        decode_into(&self.index, &mut self.scratch, row_key, cells)?;
        Ok(&self.scratch)
    }

    /// Decodes only the row identifier into its key field values.
    pub fn decode_row_key(&self, row_key: &[u8]) -> Result<SmallVec<[Value; 2]>> {
        decode_key_values(&self.index, row_key)
    }
}

fn decode_key_values(index: &SchemaIndex, bytes: &[u8]) -> Result<SmallVec<[Value; 2]>> {
    let mut values = SmallVec::new();
    let mut offset = 0;
    for field in index.key_fields() {
        let value = match field.codec().fixed_size() {
            Some(width) => {
                eyre::ensure!(
                    offset + width <= bytes.len(),
                    "malformed row key: field '{}' needs {} bytes, {} remain",
                    field.name(),
                    width,
                    bytes.len() - offset
                );
                let value = field.codec().decode_value(&bytes[offset..offset + width])?;
                offset += width;
                value
            }
            // Schema validation pins variable-width key fields to the
            // last position, so the remainder is theirs.
            None => {
                let value = field.codec().decode_value(&bytes[offset..])?;
                offset = bytes.len();
                value
            }
        };
        values.push(value);
    }
    eyre::ensure!(
        offset == bytes.len(),
        "malformed row key: {} trailing bytes past the declared key fields",
        bytes.len() - offset
    );
    Ok(values)
}

fn decode_into(index: &SchemaIndex, row: &mut Row, row_key: &[u8], cells: &[Cell]) -> Result<()> {
    let key_values = decode_key_values(index, row_key)?;

    let mut by_column: HashMap<(&[u8], &[u8]), &[u8]> = HashMap::with_capacity(cells.len());
    for cell in cells {
        by_column.insert((cell.family(), cell.qualifier()), cell.value());
    }

    for (pos, value) in key_values.into_iter().enumerate() {
        row.set_key_value(pos, value);
    }
    for (fpos, family) in index.families().iter().enumerate() {
        for (ordinal, field) in family.fields().iter().enumerate() {
            let value = match by_column.get(&(family.name_bytes(), field.qualifier())) {
                Some(bytes) => field.codec().decode_value(bytes)?,
                None => Value::Null,
            };
            let family_row = row
                .family_mut(fpos)
                .ok_or_else(|| eyre::eyre!("row shape is missing family slot {}", fpos))?;
            family_row.set_value(ordinal, value);
        }
    }
    Ok(())
}
