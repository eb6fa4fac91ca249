//! # Per-Type Field Codec
//!
//! One codec variant per logical type, selected once at schema-index
//! construction time. Dispatch is a match on the tagged variant; no
//! runtime type inspection happens per value.
//!
//! ## Wire Format
//!
//! Fixed-width types serialize big-endian so encoded bytes compare the
//! way the store compares them:
//!
//! | Codec | Bytes | Layout |
//! |-------|-------|--------|
//! | Bool | 1 | 0 = false, nonzero = true |
//! | TinyInt | 1 | i8 |
//! | SmallInt | 2 | i16 big-endian |
//! | Int | 4 | i32 big-endian |
//! | BigInt | 8 | i64 big-endian |
//! | Float | 4 | IEEE-754 bits big-endian |
//! | Double | 8 | IEEE-754 bits big-endian |
//! | Date | 4 | days since epoch, i32 big-endian |
//! | Time | 4 | millis of day, i32 big-endian |
//! | Timestamp | 8 | epoch millis, i64 big-endian |
//!
//! Variable-width types are length-implicit (the cell length is the
//! serialized length):
//!
//! - `Text`: UTF-8 bytes. Decode validates UTF-8; the lenient variant
//!   substitutes U+FFFD instead of failing.
//! - `Bytes`: raw bytes, passed through.
//! - `Decimal`: the unscaled integer as a minimal big-endian
//!   two's-complement byte string; the scale is schema metadata carried
//!   on the codec, never stored.
//!
//! ## Round-Trip Law
//!
//! For every representable value `v`, `decode(encode(v)) == v`. Decode
//! of a fixed-width cell whose length does not match the declared width
//! fails with a "malformed ... value" error rather than defaulting,
//! since a length skew indicates storage/schema drift.

use eyre::Result;

use crate::types::{FieldType, Value};

/// Maximum byte length of a decimal's unscaled two's-complement form.
pub const MAX_DECIMAL_BYTES: usize = 16;

/// Encoder/decoder for a single schema field, chosen at index build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCodec {
    Bool,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Date,
    Time,
    Timestamp,
    Text { lenient: bool },
    Bytes,
    Decimal { scale: u8 },
}

impl FieldCodec {
    /// Builds the codec for a field of the given logical type.
    ///
    /// `scale` applies to `Decimal` fields only; `lenient_text` selects
    /// lossy UTF-8 decoding for `Text` fields.
    pub fn for_type(field_type: FieldType, scale: u8, lenient_text: bool) -> Self {
        match field_type {
            FieldType::Bool => FieldCodec::Bool,
            FieldType::TinyInt => FieldCodec::TinyInt,
            FieldType::SmallInt => FieldCodec::SmallInt,
            FieldType::Int => FieldCodec::Int,
            FieldType::BigInt => FieldCodec::BigInt,
            FieldType::Float => FieldCodec::Float,
            FieldType::Double => FieldCodec::Double,
            FieldType::Date => FieldCodec::Date,
            FieldType::Time => FieldCodec::Time,
            FieldType::Timestamp => FieldCodec::Timestamp,
            FieldType::Text => FieldCodec::Text {
                lenient: lenient_text,
            },
            FieldType::Bytes => FieldCodec::Bytes,
            FieldType::Decimal => FieldCodec::Decimal { scale },
        }
    }

    /// The logical type this codec serves.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldCodec::Bool => FieldType::Bool,
            FieldCodec::TinyInt => FieldType::TinyInt,
            FieldCodec::SmallInt => FieldType::SmallInt,
            FieldCodec::Int => FieldType::Int,
            FieldCodec::BigInt => FieldType::BigInt,
            FieldCodec::Float => FieldType::Float,
            FieldCodec::Double => FieldType::Double,
            FieldCodec::Date => FieldType::Date,
            FieldCodec::Time => FieldType::Time,
            FieldCodec::Timestamp => FieldType::Timestamp,
            FieldCodec::Text { .. } => FieldType::Text,
            FieldCodec::Bytes => FieldType::Bytes,
            FieldCodec::Decimal { .. } => FieldType::Decimal,
        }
    }

    /// The fixed wire width, or None for variable-width codecs.
    pub fn fixed_size(&self) -> Option<usize> {
        self.field_type().fixed_size()
    }

    fn name(&self) -> &'static str {
        match self {
            FieldCodec::Bool => "bool",
            FieldCodec::TinyInt => "tinyint",
            FieldCodec::SmallInt => "smallint",
            FieldCodec::Int => "int",
            FieldCodec::BigInt => "bigint",
            FieldCodec::Float => "float",
            FieldCodec::Double => "double",
            FieldCodec::Date => "date",
            FieldCodec::Time => "time",
            FieldCodec::Timestamp => "timestamp",
            FieldCodec::Text { .. } => "text",
            FieldCodec::Bytes => "bytes",
            FieldCodec::Decimal { .. } => "decimal",
        }
    }

    /// Serializes `value` onto `out`.
    ///
    /// The value's variant must match this codec's logical type; null is
    /// never encoded (absence of a cell is the only "no value").
    pub fn encode_value(&self, value: &Value, out: &mut Vec<u8>) -> Result<()> {
        match (self, value) {
            (FieldCodec::Bool, Value::Bool(v)) => out.push(u8::from(*v)),
            (FieldCodec::TinyInt, Value::Int8(v)) => out.extend_from_slice(&v.to_be_bytes()),
            (FieldCodec::SmallInt, Value::Int16(v)) => out.extend_from_slice(&v.to_be_bytes()),
            (FieldCodec::Int, Value::Int32(v)) => out.extend_from_slice(&v.to_be_bytes()),
            (FieldCodec::BigInt, Value::Int64(v)) => out.extend_from_slice(&v.to_be_bytes()),
            (FieldCodec::Float, Value::Float32(v)) => out.extend_from_slice(&v.to_be_bytes()),
            (FieldCodec::Double, Value::Float64(v)) => out.extend_from_slice(&v.to_be_bytes()),
            (FieldCodec::Date, Value::Date(days)) => out.extend_from_slice(&days.to_be_bytes()),
            (FieldCodec::Time, Value::Time(millis)) => {
                out.extend_from_slice(&millis.to_be_bytes())
            }
            (FieldCodec::Timestamp, Value::Timestamp(millis)) => {
                out.extend_from_slice(&millis.to_be_bytes())
            }
            (FieldCodec::Text { .. }, Value::Text(s)) => out.extend_from_slice(s.as_bytes()),
            (FieldCodec::Bytes, Value::Bytes(b)) => out.extend_from_slice(b),
            (FieldCodec::Decimal { scale }, Value::Decimal { unscaled, scale: s }) => {
                eyre::ensure!(
                    scale == s,
                    "decimal scale mismatch: column declares {}, value carries {}",
                    scale,
                    s
                );
                encode_unscaled(*unscaled, out);
            }
            (codec, Value::Null) => {
                eyre::bail!("cannot encode a null value as {}", codec.name())
            }
            (codec, other) => {
                eyre::bail!("cannot encode a {} value as {}", other.kind(), codec.name())
            }
        }
        Ok(())
    }

    /// Deserializes one cell's value bytes.
    pub fn decode_value(&self, bytes: &[u8]) -> Result<Value> {
        let value = match self {
            FieldCodec::Bool => Value::Bool(self.fixed::<1>(bytes)?[0] != 0),
            FieldCodec::TinyInt => Value::Int8(i8::from_be_bytes(self.fixed(bytes)?)),
            FieldCodec::SmallInt => Value::Int16(i16::from_be_bytes(self.fixed(bytes)?)),
            FieldCodec::Int => Value::Int32(i32::from_be_bytes(self.fixed(bytes)?)),
            FieldCodec::BigInt => Value::Int64(i64::from_be_bytes(self.fixed(bytes)?)),
            FieldCodec::Float => Value::Float32(f32::from_be_bytes(self.fixed(bytes)?)),
            FieldCodec::Double => Value::Float64(f64::from_be_bytes(self.fixed(bytes)?)),
            FieldCodec::Date => Value::Date(i32::from_be_bytes(self.fixed(bytes)?)),
            FieldCodec::Time => Value::Time(i32::from_be_bytes(self.fixed(bytes)?)),
            FieldCodec::Timestamp => Value::Timestamp(i64::from_be_bytes(self.fixed(bytes)?)),
            FieldCodec::Text { lenient: false } => match std::str::from_utf8(bytes) {
                Ok(s) => Value::Text(s.to_string()),
                Err(e) => eyre::bail!("malformed text value: invalid UTF-8: {}", e),
            },
            FieldCodec::Text { lenient: true } => {
                Value::Text(String::from_utf8_lossy(bytes).into_owned())
            }
            FieldCodec::Bytes => Value::Bytes(bytes.to_vec()),
            FieldCodec::Decimal { scale } => Value::Decimal {
                unscaled: decode_unscaled(bytes)?,
                scale: *scale,
            },
        };
        Ok(value)
    }

    /// Reads a fixed-width cell as an N-byte array, failing on any
    /// length skew between storage and schema.
    fn fixed<const N: usize>(&self, bytes: &[u8]) -> Result<[u8; N]> {
        bytes.try_into().map_err(|_| {
            eyre::eyre!(
                "malformed {} value: expected {} bytes, got {}",
                self.name(),
                N,
                bytes.len()
            )
        })
    }
}

/// Appends the minimal big-endian two's-complement form of `unscaled`.
///
/// Redundant sign-extension bytes are stripped; at least one byte is
/// always written, so zero encodes as a single 0x00.
fn encode_unscaled(unscaled: i128, out: &mut Vec<u8>) {
    let bytes = unscaled.to_be_bytes();
    let mut start = 0;
    while start < bytes.len() - 1 {
        let redundant = match bytes[start] {
            0x00 => bytes[start + 1] & 0x80 == 0,
            0xFF => bytes[start + 1] & 0x80 != 0,
            _ => false,
        };
        if !redundant {
            break;
        }
        start += 1;
    }
    out.extend_from_slice(&bytes[start..]);
}

/// Reads a big-endian two's-complement byte string of 1..=16 bytes.
fn decode_unscaled(bytes: &[u8]) -> Result<i128> {
    eyre::ensure!(!bytes.is_empty(), "malformed decimal value: empty");
    eyre::ensure!(
        bytes.len() <= MAX_DECIMAL_BYTES,
        "malformed decimal value: {} bytes exceeds the {}-byte maximum",
        bytes.len(),
        MAX_DECIMAL_BYTES
    );
    let mut acc: i128 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
    for &b in bytes {
        acc = (acc << 8) | i128::from(b);
    }
    Ok(acc)
}
