//! # Codec Options
//!
//! Construction-time configuration shared by the schema index, decoder,
//! and encoder. Options are captured when the index is built and are
//! immutable afterwards.

/// Configuration for building a codec over one table schema.
///
/// `null_literal` feeds text rendering only ([`Row::render`]); binary
/// storage always represents "no value" as cell absence, never as a
/// sentinel byte sequence.
///
/// `skip_null_on_write` states the caller's intent for null fields on the
/// write path. The cell model has no write-null primitive, so with either
/// setting a null field produces no mutation entry; the flag is kept so
/// the intent survives into configuration should the destination ever
/// grow a delete-marker write.
///
/// [`Row::render`]: crate::row::Row::render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Literal substituted for null values in rendered text.
    pub null_literal: String,
    /// Skip null fields when building mutations (see type-level docs).
    pub skip_null_on_write: bool,
    /// Decode text cells with invalid UTF-8 lossily instead of failing.
    pub lenient_text: bool,
    /// Ordered metadata keys requested for the write path; positions are
    /// assigned past the physical arity in this order.
    pub metadata_keys: Vec<String>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            null_literal: "null".to_string(),
            skip_null_on_write: false,
            lenient_text: false,
            metadata_keys: Vec::new(),
        }
    }
}

impl CodecOptions {
    pub fn with_null_literal(mut self, literal: impl Into<String>) -> Self {
        self.null_literal = literal.into();
        self
    }

    pub fn with_skip_null_on_write(mut self, skip: bool) -> Self {
        self.skip_null_on_write = skip;
        self
    }

    pub fn with_lenient_text(mut self, lenient: bool) -> Self {
        self.lenient_text = lenient;
        self
    }

    pub fn with_metadata_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.metadata_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}
