//! # cellserde - Row Serde for Sparse Wide-Column Stores
//!
//! cellserde is a bidirectional codec between structured, strongly-typed
//! row records and the flat family/qualifier/value cell representation
//! of a sparse wide-column store. It owns the mapping rules between a
//! nested logical schema and byte-level column storage; reading and
//! writing the cells themselves (connections, scans, mutation batching)
//! belongs to the surrounding storage client.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use cellserde::{
//!     CodecOptions, FieldDef, FieldType, RowDecoder, RowEncoder,
//!     SchemaIndex, TableSchema, LATEST_TIMESTAMP,
//! };
//!
//! let schema = TableSchema::builder()
//!     .key_field("rowkey", FieldType::Int)
//!     .family("profile", [
//!         FieldDef::new("name", FieldType::Text),
//!         FieldDef::new("age", FieldType::BigInt),
//!     ])
//!     .build()?;
//! let index = Arc::new(SchemaIndex::new(&schema, CodecOptions::default())?);
//!
//! let decoder = RowDecoder::new(Arc::clone(&index));
//! let row = decoder.decode(&row_key_bytes, &cells)?;
//!
//! let encoder = RowEncoder::new(index)?;
//! let mutation = encoder.encode(&row, LATEST_TIMESTAMP)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │        Row Serde (decoder / encoder)      │
//! ├──────────────────────┬────────────────────┤
//! │     Schema Index     │  Writable Metadata │
//! ├──────────────────────┴────────────────────┤
//! │       Codec Bank (per-type FieldCodec)    │
//! ├───────────────────────────────────────────┤
//! │   Types (FieldType, Value) · Row · Cell   │
//! └───────────────────────────────────────────┘
//! ```
//!
//! The schema index is built once and shared read-only by both paths.
//! Decoding offers two modes: **fresh** (allocate per call, retain
//! freely, thread-safe through `&self`) and **reuse** (one scratch row
//! overwritten per call, `&mut self`, for single-threaded streaming).
//! Encoding always produces a fresh [`Mutation`].
//!
//! ## Module Overview
//!
//! - [`types`]: logical field types and owned runtime values
//! - [`codec`]: per-type byte encoding, selected at index build time
//! - [`schema`]: table definition, validation, and the resolved index
//! - [`row`]: structured row records with positional metadata slots
//! - [`cell`]: the storage-side cell and mutation types
//! - [`serde`]: the decoder, encoder, and writable-metadata extension
//! - [`options`]: construction-time codec configuration

pub mod cell;
pub mod codec;
pub mod options;
pub mod row;
pub mod schema;
pub mod serde;
pub mod types;

pub use cell::{Cell, Mutation, MutationEntry, LATEST_TIMESTAMP};
pub use codec::FieldCodec;
pub use options::CodecOptions;
pub use row::{FamilyRow, Row};
pub use schema::{FamilyDef, FieldDef, SchemaIndex, TableSchema};
pub use serde::{MetadataKind, RowDecoder, RowEncoder, TimestampMetadata, TIMESTAMP_KEY};
pub use types::{FieldType, Value};
