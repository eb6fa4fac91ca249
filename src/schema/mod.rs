//! # Schema
//!
//! Logical table definition and its resolved form:
//!
//! - `table`: `TableSchema` and its builder — row key fields plus
//!   ordered families of named, typed fields, validated at build time
//! - `index`: `SchemaIndex` — the immutable byte-level layout (name
//!   encodings, per-field codecs, lookup tables) both codec paths share

pub mod index;
pub mod table;

pub use index::{FamilyLayout, FieldLayout, KeyField, SchemaIndex};
pub use table::{FamilyDef, FieldDef, TableSchema, TableSchemaBuilder, MAX_DECIMAL_SCALE};
