//! # Codec Bank
//!
//! Per-type value encoding for the wide-column wire format:
//!
//! - `field_codec`: the `FieldCodec` tagged dispatch enum, one variant
//!   per logical type, built once per field at schema-index time

pub mod field_codec;

pub use field_codec::{FieldCodec, MAX_DECIMAL_BYTES};
