//! # Logical Field Types
//!
//! This module provides the canonical `FieldType` enum for cellserde, used
//! across schema definitions, the codec bank, and row records.
//!
//! ## Design Principles
//!
//! 1. **Single source of truth**: one FieldType enum used everywhere
//! 2. **Storage-efficient**: `#[repr(u8)]` for single-byte discriminant
//! 3. **Metadata-free**: decimal scale lives in `FieldDef`, not in the enum
//!
//! ## Type Categories
//!
//! | Category | Types | Wire width |
//! |----------|-------|------------|
//! | **Boolean** | Bool | 1 byte |
//! | **Integer** | TinyInt, SmallInt, Int, BigInt | 1, 2, 4, 8 bytes |
//! | **Float** | Float, Double | 4, 8 bytes |
//! | **Date/Time** | Date, Time, Timestamp | 4, 4, 8 bytes |
//! | **Text** | Text | variable |
//! | **Binary** | Bytes | variable |
//! | **Numeric** | Decimal | variable |
//!
//! ## Wire Encoding
//!
//! Fixed-width types use big-endian byte order so encoded values compare
//! the way the store compares them. Variable-width types are
//! length-implicit: the stored cell length is the serialized length.
//!
//! ## Discriminant Values
//!
//! Discriminants are grouped by category:
//! - 0-9: fixed-width primitives (bool, integers, floats, date/time)
//! - 20-22: variable-width (text, bytes, decimal)

/// Canonical logical type for schema fields.
///
/// Uses `#[repr(u8)]` for efficient single-byte storage encoding.
/// Decimal scale is stored in `FieldDef`, not here.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool = 0,
    TinyInt = 1,
    SmallInt = 2,
    Int = 3,
    BigInt = 4,
    Float = 5,
    Double = 6,
    Date = 7,
    Time = 8,
    Timestamp = 9,

    Text = 20,
    Bytes = 21,
    Decimal = 22,
}

impl FieldType {
    /// Returns the fixed wire width for this type, or None for
    /// variable-width types.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            FieldType::Bool => Some(1),
            FieldType::TinyInt => Some(1),
            FieldType::SmallInt => Some(2),
            FieldType::Int => Some(4),
            FieldType::BigInt => Some(8),
            FieldType::Float => Some(4),
            FieldType::Double => Some(8),
            FieldType::Date => Some(4),
            FieldType::Time => Some(4),
            FieldType::Timestamp => Some(8),
            FieldType::Text | FieldType::Bytes | FieldType::Decimal => None,
        }
    }

    /// Returns true if this type requires variable-width encoding.
    pub fn is_variable(&self) -> bool {
        self.fixed_size().is_none()
    }

    /// Returns true if this is an integer or floating-point type.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::TinyInt
                | FieldType::SmallInt
                | FieldType::Int
                | FieldType::BigInt
                | FieldType::Float
                | FieldType::Double
                | FieldType::Decimal
        )
    }

    /// Returns true if this is a date/time type.
    pub fn is_datetime(&self) -> bool {
        matches!(
            self,
            FieldType::Date | FieldType::Time | FieldType::Timestamp
        )
    }
}

impl TryFrom<u8> for FieldType {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FieldType::Bool),
            1 => Ok(FieldType::TinyInt),
            2 => Ok(FieldType::SmallInt),
            3 => Ok(FieldType::Int),
            4 => Ok(FieldType::BigInt),
            5 => Ok(FieldType::Float),
            6 => Ok(FieldType::Double),
            7 => Ok(FieldType::Date),
            8 => Ok(FieldType::Time),
            9 => Ok(FieldType::Timestamp),
            20 => Ok(FieldType::Text),
            21 => Ok(FieldType::Bytes),
            22 => Ok(FieldType::Decimal),
            _ => eyre::bail!("invalid FieldType discriminant: {}", value),
        }
    }
}
