//! # Schema Index
//!
//! The resolved, immutable layout a codec works from. Built once from a
//! [`TableSchema`] plus [`CodecOptions`]; shared read-only by the encode
//! and decode paths for the lifetime of the codec.
//!
//! ## Contents
//!
//! For every family: the byte encoding of its name (UTF-8) and, per
//! field, the qualifier byte encoding, the [`FieldCodec`] selected for
//! its logical type, and its ordinal within the family row. Lookup runs
//! in two hops — family bytes, then qualifier bytes — over hash tables
//! built at construction, so decode cost does not depend on the order
//! cells arrive in.
//!
//! ## Invariants
//!
//! Qualifier byte encodings are unique within one family and family byte
//! encodings are unique across the schema; construction fails otherwise.

use eyre::Result;
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::codec::FieldCodec;
use crate::options::CodecOptions;
use crate::schema::table::TableSchema;

/// One row-key component: its name and resolved codec.
#[derive(Debug, Clone)]
pub struct KeyField {
    name: String,
    codec: FieldCodec,
}

impl KeyField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codec(&self) -> &FieldCodec {
        &self.codec
    }
}

/// One column's resolved layout within its family.
#[derive(Debug, Clone)]
pub struct FieldLayout {
    name: String,
    qualifier: Vec<u8>,
    codec: FieldCodec,
}

impl FieldLayout {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The qualifier's byte encoding as stored.
    pub fn qualifier(&self) -> &[u8] {
        &self.qualifier
    }

    pub fn codec(&self) -> &FieldCodec {
        &self.codec
    }
}

/// One family's resolved layout.
#[derive(Debug, Clone)]
pub struct FamilyLayout {
    name: String,
    name_bytes: Vec<u8>,
    fields: Vec<FieldLayout>,
    by_qualifier: HashMap<Vec<u8>, usize>,
}

impl FamilyLayout {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The family name's byte encoding as stored.
    pub fn name_bytes(&self) -> &[u8] {
        &self.name_bytes
    }

    /// Fields in declaration order; the slice index is the field's
    /// ordinal within this family's row representation.
    pub fn fields(&self) -> &[FieldLayout] {
        &self.fields
    }

    /// Ordinal of the field stored under `qualifier`, if declared.
    pub fn ordinal_of(&self, qualifier: &[u8]) -> Option<usize> {
        self.by_qualifier.get(qualifier).copied()
    }
}

/// Immutable resolved layout shared by encoder and decoder.
#[derive(Debug, Clone)]
pub struct SchemaIndex {
    key_fields: SmallVec<[KeyField; 2]>,
    families: Vec<FamilyLayout>,
    by_family: HashMap<Vec<u8>, usize>,
    options: CodecOptions,
}

impl SchemaIndex {
    pub fn new(schema: &TableSchema, options: CodecOptions) -> Result<Self> {
        let key_fields = schema
            .key_fields()
            .iter()
            .map(|field| KeyField {
                name: field.name().to_string(),
                codec: FieldCodec::for_type(
                    field.field_type(),
                    field.scale(),
                    options.lenient_text,
                ),
            })
            .collect();

        let mut families = Vec::with_capacity(schema.families().len());
        let mut by_family = HashMap::with_capacity(schema.families().len());
        for (fpos, family) in schema.families().iter().enumerate() {
            let name_bytes = family.name().as_bytes().to_vec();
            eyre::ensure!(
                by_family.insert(name_bytes.clone(), fpos).is_none(),
                "duplicate family encoding '{}'",
                family.name()
            );

            let mut fields = Vec::with_capacity(family.fields().len());
            let mut by_qualifier = HashMap::with_capacity(family.fields().len());
            for (ordinal, field) in family.fields().iter().enumerate() {
                let qualifier = field.name().as_bytes().to_vec();
                eyre::ensure!(
                    by_qualifier.insert(qualifier.clone(), ordinal).is_none(),
                    "duplicate qualifier encoding '{}' in family '{}'",
                    field.name(),
                    family.name()
                );
                fields.push(FieldLayout {
                    name: field.name().to_string(),
                    qualifier,
                    codec: FieldCodec::for_type(
                        field.field_type(),
                        field.scale(),
                        options.lenient_text,
                    ),
                });
            }

            families.push(FamilyLayout {
                name: family.name().to_string(),
                name_bytes,
                fields,
                by_qualifier,
            });
        }

        Ok(Self {
            key_fields,
            families,
            by_family,
            options,
        })
    }

    /// Row-key components in key order.
    pub fn key_fields(&self) -> &[KeyField] {
        &self.key_fields
    }

    /// Families in declaration order; the slice index is the family's
    /// position in a row record.
    pub fn families(&self) -> &[FamilyLayout] {
        &self.families
    }

    /// Resolves a stored (family, qualifier) pair to its codec, family
    /// position, and ordinal. Returns None for columns the schema does
    /// not declare.
    pub fn resolve(&self, family: &[u8], qualifier: &[u8]) -> Option<(&FieldCodec, usize, usize)> {
        let fpos = *self.by_family.get(family)?;
        let layout = &self.families[fpos];
        let ordinal = layout.ordinal_of(qualifier)?;
        Some((layout.fields[ordinal].codec(), fpos, ordinal))
    }

    /// Top-level slot count of a row record (key slot + one per family).
    pub fn physical_arity(&self) -> usize {
        1 + self.families.len()
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }
}
