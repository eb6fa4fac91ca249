//! # Row Serde
//!
//! The codec proper, built on the schema index and the per-type codec
//! bank:
//!
//! - `decoder`: stored cells → typed row, in fresh or reuse mode
//! - `encoder`: typed row → mutation entries, null fields omitted
//! - `metadata`: writable system values (per-row write timestamp)
//!   addressed past the row's physical arity
//!
//! Both directions share one immutable [`SchemaIndex`]; neither performs
//! I/O. Reading cells and applying mutations belong to the surrounding
//! retrieval and commit layers.
//!
//! [`SchemaIndex`]: crate::schema::SchemaIndex

pub mod decoder;
pub mod encoder;
pub mod metadata;

#[cfg(test)]
mod tests;

pub use decoder::RowDecoder;
pub use encoder::RowEncoder;
pub use metadata::{MetadataKind, TimestampMetadata, TIMESTAMP_KEY};
