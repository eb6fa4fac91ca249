//! # Logical Table Schema
//!
//! This module provides the schema definition types for a wide-column
//! table: a row key of one or more ordered fields, plus an ordered list
//! of named families, each holding an ordered list of named, typed
//! fields.
//!
//! ## Shape
//!
//! The schema tree has depth exactly two. The row key is flat (never
//! nested under a family) and is encoded into the storage row
//! identifier, not into a family/qualifier cell. Family declaration
//! order fixes the positional index of each field within its family's
//! row representation; storage itself looks families up by name.
//!
//! ## Validation
//!
//! `TableSchemaBuilder::build` rejects schemas the codec could not serve:
//! empty row keys, empty family lists, empty families, duplicate family
//! names, duplicate qualifier names within a family, variable-width
//! row-key fields anywhere but the last key position, and decimal scales
//! beyond the supported digit range.

use eyre::Result;

use crate::codec::MAX_DECIMAL_BYTES;
use crate::types::FieldType;

/// Largest decimal scale a 16-byte unscaled integer can meaningfully carry.
pub const MAX_DECIMAL_SCALE: u8 = 38;

/// One named, typed field: a row-key component or a column in a family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    name: String,
    field_type: FieldType,
    scale: u8,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            scale: 0,
        }
    }

    /// A decimal field; `scale` is the number of fractional digits,
    /// recovered from the schema on decode (it is never stored).
    pub fn decimal(name: impl Into<String>, scale: u8) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Decimal,
            scale,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn scale(&self) -> u8 {
        self.scale
    }
}

/// A named field-group: one column family and its ordered columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyDef {
    name: String,
    fields: Vec<FieldDef>,
}

impl FamilyDef {
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

/// The logical schema of one table: row key fields plus ordered families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    key_fields: Vec<FieldDef>,
    families: Vec<FamilyDef>,
}

impl TableSchema {
    pub fn builder() -> TableSchemaBuilder {
        TableSchemaBuilder::default()
    }

    pub fn key_fields(&self) -> &[FieldDef] {
        &self.key_fields
    }

    pub fn families(&self) -> &[FamilyDef] {
        &self.families
    }

    /// Top-level slot count of a row record: the key slot plus one slot
    /// per family. Metadata positions start past this arity.
    pub fn physical_arity(&self) -> usize {
        1 + self.families.len()
    }
}

#[derive(Debug, Default)]
pub struct TableSchemaBuilder {
    key_fields: Vec<FieldDef>,
    families: Vec<FamilyDef>,
}

impl TableSchemaBuilder {
    /// Appends a row-key component. Key fields are encoded into the row
    /// identifier in the order they are added.
    pub fn key_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.key_fields.push(FieldDef::new(name, field_type));
        self
    }

    /// Appends a decimal row-key component.
    pub fn decimal_key_field(mut self, name: impl Into<String>, scale: u8) -> Self {
        self.key_fields.push(FieldDef::decimal(name, scale));
        self
    }

    /// Appends a family with its ordered fields.
    pub fn family(
        mut self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDef>,
    ) -> Self {
        self.families.push(FamilyDef::new(name, fields));
        self
    }

    pub fn build(self) -> Result<TableSchema> {
        eyre::ensure!(
            !self.key_fields.is_empty(),
            "schema requires at least one row key field"
        );
        eyre::ensure!(
            !self.families.is_empty(),
            "schema requires at least one family"
        );

        for (pos, field) in self.key_fields.iter().enumerate() {
            check_scale(field)?;
            let duplicate = self.key_fields[..pos]
                .iter()
                .any(|earlier| earlier.name() == field.name());
            eyre::ensure!(
                !duplicate,
                "duplicate row key field '{}'",
                field.name()
            );
            // Variable-width key components are only decodable as the
            // trailing remainder of the row identifier.
            eyre::ensure!(
                pos == self.key_fields.len() - 1 || !field.field_type().is_variable(),
                "variable-width row key field '{}' must be the last key component",
                field.name()
            );
        }

        for (pos, family) in self.families.iter().enumerate() {
            eyre::ensure!(
                !family.fields().is_empty(),
                "family '{}' declares no fields",
                family.name()
            );
            let duplicate = self.families[..pos]
                .iter()
                .any(|earlier| earlier.name() == family.name());
            eyre::ensure!(!duplicate, "duplicate family '{}'", family.name());

            for (fpos, field) in family.fields().iter().enumerate() {
                check_scale(field)?;
                let duplicate = family.fields()[..fpos]
                    .iter()
                    .any(|earlier| earlier.name() == field.name());
                eyre::ensure!(
                    !duplicate,
                    "duplicate qualifier '{}' in family '{}'",
                    field.name(),
                    family.name()
                );
            }
        }

        Ok(TableSchema {
            key_fields: self.key_fields,
            families: self.families,
        })
    }
}

fn check_scale(field: &FieldDef) -> Result<()> {
    if field.field_type() == FieldType::Decimal {
        eyre::ensure!(
            field.scale() <= MAX_DECIMAL_SCALE,
            "decimal field '{}' declares scale {}, maximum is {} ({} unscaled bytes)",
            field.name(),
            field.scale(),
            MAX_DECIMAL_SCALE,
            MAX_DECIMAL_BYTES
        );
    }
    Ok(())
}
