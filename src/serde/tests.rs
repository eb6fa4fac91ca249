//! Tests for the row serde: decode modes, encode policy, metadata.

use std::sync::Arc;

use crate::cell::{Cell, Mutation, LATEST_TIMESTAMP};
use crate::codec::FieldCodec;
use crate::options::CodecOptions;
use crate::row::{FamilyRow, Row};
use crate::schema::{FieldDef, SchemaIndex, TableSchema};
use crate::serde::{RowDecoder, RowEncoder, TIMESTAMP_KEY};
use crate::types::{FieldType, Value};

fn reference_schema() -> TableSchema {
    TableSchema::builder()
        .key_field("rowkey", FieldType::Int)
        .family("family1", [FieldDef::new("col1", FieldType::Int)])
        .family(
            "family2",
            [
                FieldDef::new("col1", FieldType::Text),
                FieldDef::new("col2", FieldType::BigInt),
            ],
        )
        .family(
            "family3",
            [
                FieldDef::new("col1", FieldType::Double),
                FieldDef::new("col2", FieldType::Bool),
                FieldDef::new("col3", FieldType::Text),
            ],
        )
        .build()
        .unwrap()
}

fn reference_index(options: CodecOptions) -> Arc<SchemaIndex> {
    Arc::new(SchemaIndex::new(&reference_schema(), options).unwrap())
}

fn cell(family: &str, qualifier: &str, codec: FieldCodec, value: Value) -> Cell {
    let mut bytes = Vec::new();
    codec.encode_value(&value, &mut bytes).unwrap();
    Cell::new(family, qualifier, bytes)
}

fn int_key(key: i32) -> Vec<u8> {
    key.to_be_bytes().to_vec()
}

fn reference_cells(n: i32) -> Vec<Cell> {
    let text = FieldCodec::Text { lenient: false };
    let double = match n {
        1 => 1.01,
        2 => 2.02,
        _ => n as f64,
    };
    vec![
        cell("family1", "col1", FieldCodec::Int, Value::Int32(10 * n)),
        cell("family2", "col1", text, Value::Text(format!("Hello-{}", n))),
        cell("family2", "col2", FieldCodec::BigInt, Value::Int64(100 * n as i64)),
        cell("family3", "col1", FieldCodec::Double, Value::Float64(double)),
        cell("family3", "col2", FieldCodec::Bool, Value::Bool(n % 2 == 0)),
        cell("family3", "col3", text, Value::Text(format!("Welt-{}", n))),
    ]
}

fn cells_of(mutation: &Mutation) -> Vec<Cell> {
    mutation
        .entries()
        .iter()
        .map(|e| {
            Cell::new(e.family().to_vec(), e.qualifier().to_vec(), e.value().to_vec())
                .with_timestamp(e.timestamp())
        })
        .collect()
}

#[test]
fn fresh_decode_returns_independent_rows() {
    let decoder = RowDecoder::new(reference_index(CodecOptions::default()));

    let row1 = decoder.decode(&int_key(1), &reference_cells(1)).unwrap();
    let row2 = decoder.decode(&int_key(2), &reference_cells(2)).unwrap();

    assert!(!std::ptr::eq(&row1, &row2));
    assert_eq!(row1.render("null"), "(1, (10), (Hello-1, 100), (1.01, false, Welt-1))");
    assert_eq!(row2.render("null"), "(2, (20), (Hello-2, 200), (2.02, true, Welt-2))");
}

#[test]
fn reused_decode_returns_the_same_instance() {
    let mut decoder = RowDecoder::new(reference_index(CodecOptions::default()));

    let first = decoder.decode_reused(&int_key(1), &reference_cells(1)).unwrap();
    let rendered1 = first.render("null");
    let addr1 = first as *const Row;

    let second = decoder.decode_reused(&int_key(2), &reference_cells(2)).unwrap();
    let rendered2 = second.render("null");
    let addr2 = second as *const Row;

    assert!(std::ptr::eq(addr1, addr2), "reuse mode must return one instance");
    assert_eq!(rendered1, "(1, (10), (Hello-1, 100), (1.01, false, Welt-1))");
    assert_eq!(rendered2, "(2, (20), (Hello-2, 200), (2.02, true, Welt-2))");
}

#[test]
fn decode_is_independent_of_cell_order() {
    let decoder = RowDecoder::new(reference_index(CodecOptions::default()));

    let cells = reference_cells(1);
    let mut reversed = cells.clone();
    reversed.reverse();
    let mut rotated = cells.clone();
    rotated.rotate_left(3);

    let expected = decoder.decode(&int_key(1), &cells).unwrap();
    assert_eq!(decoder.decode(&int_key(1), &reversed).unwrap(), expected);
    assert_eq!(decoder.decode(&int_key(1), &rotated).unwrap(), expected);
}

#[test]
fn absent_cells_decode_to_null() {
    let decoder = RowDecoder::new(reference_index(CodecOptions::default()));

    // Only family2.col2 is present; every other declared column is null.
    let cells = vec![cell(
        "family2",
        "col2",
        FieldCodec::BigInt,
        Value::Int64(100),
    )];
    let row = decoder.decode(&int_key(1), &cells).unwrap();

    assert_eq!(row.family(0).unwrap().value(0), Some(&Value::Null));
    assert_eq!(row.family(1).unwrap().value(0), Some(&Value::Null));
    assert_eq!(row.family(1).unwrap().value(1), Some(&Value::Int64(100)));
    assert_eq!(row.render("null"), "(1, (null), (null, 100), (null, null, null))");
}

#[test]
fn undeclared_cells_are_ignored() {
    let decoder = RowDecoder::new(reference_index(CodecOptions::default()));

    let mut cells = reference_cells(1);
    cells.push(Cell::new("family9", "col1", vec![0x01]));
    cells.push(Cell::new("family1", "col9", vec![0x01]));

    let row = decoder.decode(&int_key(1), &cells).unwrap();
    assert_eq!(row.render("null"), "(1, (10), (Hello-1, 100), (1.01, false, Welt-1))");
}

#[test]
fn last_presented_version_wins() {
    let decoder = RowDecoder::new(reference_index(CodecOptions::default()));

    let cells = vec![
        cell("family1", "col1", FieldCodec::Int, Value::Int32(1)).with_timestamp(10),
        cell("family1", "col1", FieldCodec::Int, Value::Int32(2)).with_timestamp(5),
    ];
    let row = decoder.decode(&int_key(1), &cells).unwrap();
    assert_eq!(row.family(0).unwrap().value(0), Some(&Value::Int32(2)));
}

#[test]
fn malformed_cell_aborts_the_row() {
    let decoder = RowDecoder::new(reference_index(CodecOptions::default()));

    let cells = vec![Cell::new("family1", "col1", vec![0x01, 0x02])];
    let result = decoder.decode(&int_key(1), &cells);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("malformed int value"));
}

#[test]
fn reused_decode_error_is_not_observable_as_success() {
    let mut decoder = RowDecoder::new(reference_index(CodecOptions::default()));

    let bad = vec![Cell::new("family1", "col1", vec![0x01])];
    assert!(decoder.decode_reused(&int_key(1), &bad).is_err());

    let row = decoder
        .decode_reused(&int_key(2), &reference_cells(2))
        .unwrap();
    assert_eq!(row.render("null"), "(2, (20), (Hello-2, 200), (2.02, true, Welt-2))");
}

#[test]
fn malformed_row_key_is_rejected() {
    let decoder = RowDecoder::new(reference_index(CodecOptions::default()));

    let result = decoder.decode(&[0x01, 0x02], &reference_cells(1));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("malformed row key"));

    let result = decoder.decode(&[0x00, 0x00, 0x00, 0x01, 0xAA], &reference_cells(1));
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("trailing bytes"));
}

#[test]
fn decode_row_key_matches_the_full_decode() {
    let decoder = RowDecoder::new(reference_index(CodecOptions::default()));

    let key_values = decoder.decode_row_key(&int_key(7)).unwrap();
    assert_eq!(key_values.as_slice(), &[Value::Int32(7)]);

    let row = decoder.decode(&int_key(7), &reference_cells(1)).unwrap();
    assert_eq!(row.key_values(), key_values.as_slice());
}

fn reference_row_with_nulls() -> Row {
    // family1.col1, family2.col2 and family3.col3 are null.
    Row::new(
        [Value::Int32(10)],
        [
            FamilyRow::new([Value::Null]),
            FamilyRow::new([Value::Text("Hello-1".into()), Value::Null]),
            FamilyRow::new([Value::Float64(2.02), Value::Bool(true), Value::Null]),
        ],
    )
}

#[test]
fn null_fields_are_omitted_under_either_skip_setting() {
    for skip in [false, true] {
        let options = CodecOptions::default().with_skip_null_on_write(skip);
        let encoder = RowEncoder::new(reference_index(options)).unwrap();

        let mutation = encoder
            .encode(&reference_row_with_nulls(), LATEST_TIMESTAMP)
            .unwrap();

        assert!(!mutation.row_key().is_empty());
        assert!(!mutation.contains(b"family1", b"col1"));
        assert!(mutation.contains(b"family2", b"col1"));
        assert!(!mutation.contains(b"family2", b"col2"));
        assert!(mutation.contains(b"family3", b"col1"));
        assert!(mutation.contains(b"family3", b"col2"));
        assert!(!mutation.contains(b"family3", b"col3"));
        assert_eq!(mutation.len(), 3);
    }
}

#[test]
fn encode_then_decode_restores_the_row() {
    let index = reference_index(CodecOptions::default());
    let encoder = RowEncoder::new(Arc::clone(&index)).unwrap();
    let decoder = RowDecoder::new(index);

    let row = Row::new(
        [Value::Int32(1)],
        [
            FamilyRow::new([Value::Int32(10)]),
            FamilyRow::new([Value::Text("Hello-1".into()), Value::Int64(100)]),
            FamilyRow::new([
                Value::Float64(1.01),
                Value::Bool(false),
                Value::Text("Welt-1".into()),
            ]),
        ],
    );

    let mutation = encoder.encode(&row, LATEST_TIMESTAMP).unwrap();
    let decoded = decoder
        .decode(mutation.row_key(), &cells_of(&mutation))
        .unwrap();
    assert_eq!(decoded, row);
}

#[test]
fn mutation_entries_carry_the_write_timestamp() {
    let encoder = RowEncoder::new(reference_index(CodecOptions::default())).unwrap();

    let mutation = encoder.encode(&reference_row_with_nulls(), 1234).unwrap();
    assert!(mutation.entries().iter().all(|e| e.timestamp() == 1234));
}

#[test]
fn metadata_timestamp_takes_precedence_over_the_argument() {
    let options = CodecOptions::default().with_metadata_keys([TIMESTAMP_KEY]);
    let encoder = RowEncoder::new(reference_index(options)).unwrap();

    let mut row = reference_row_with_nulls();
    row.set_metadata_slot(row.physical_arity(), Value::Timestamp(777));

    let mutation = encoder.encode(&row, 1234).unwrap();
    assert!(mutation.entries().iter().all(|e| e.timestamp() == 777));
}

#[test]
fn default_metadata_timestamp_falls_back_to_the_argument() {
    let options = CodecOptions::default().with_metadata_keys([TIMESTAMP_KEY]);
    let encoder = RowEncoder::new(reference_index(options)).unwrap();

    let mut row = reference_row_with_nulls();
    row.set_metadata_slot(row.physical_arity(), Value::Timestamp(LATEST_TIMESTAMP));

    let mutation = encoder.encode(&row, 1234).unwrap();
    assert!(mutation.entries().iter().all(|e| e.timestamp() == 1234));
}

#[test]
fn declared_metadata_timestamp_rejects_null_rows() {
    let options = CodecOptions::default().with_metadata_keys([TIMESTAMP_KEY]);
    let encoder = RowEncoder::new(reference_index(options)).unwrap();

    let result = encoder.encode(&reference_row_with_nulls(), 1234);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("cannot accept a null value"));
}

#[test]
fn unknown_metadata_key_fails_encoder_construction() {
    let options = CodecOptions::default().with_metadata_keys(["ttl"]);
    let result = RowEncoder::new(reference_index(options));
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("unknown writable metadata key 'ttl'"));
}

#[test]
fn null_row_key_fails_encode() {
    let encoder = RowEncoder::new(reference_index(CodecOptions::default())).unwrap();

    let families = reference_row_with_nulls().families().to_vec();
    let row = Row::new([Value::Null], families);
    let result = encoder.encode(&row, LATEST_TIMESTAMP);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("row key field 'rowkey' cannot accept a null value"));
}

#[test]
fn row_shape_mismatch_fails_encode() {
    let encoder = RowEncoder::new(reference_index(CodecOptions::default())).unwrap();

    let row = Row::new([Value::Int32(1)], [FamilyRow::new([Value::Int32(10)])]);
    let result = encoder.encode(&row, LATEST_TIMESTAMP);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("families"));
}

#[test]
fn multi_field_row_keys_concatenate_and_split() {
    let schema = TableSchema::builder()
        .key_field("tenant", FieldType::Int)
        .key_field("name", FieldType::Text)
        .family("f", [FieldDef::new("c", FieldType::Int)])
        .build()
        .unwrap();
    let index = Arc::new(SchemaIndex::new(&schema, CodecOptions::default()).unwrap());
    let encoder = RowEncoder::new(Arc::clone(&index)).unwrap();
    let decoder = RowDecoder::new(index);

    let row = Row::new(
        [Value::Int32(7), Value::Text("alpha".into())],
        [FamilyRow::new([Value::Int32(1)])],
    );
    let mutation = encoder.encode(&row, LATEST_TIMESTAMP).unwrap();
    assert_eq!(&mutation.row_key()[..4], &7i32.to_be_bytes());
    assert_eq!(&mutation.row_key()[4..], b"alpha");

    let key_values = decoder.decode_row_key(mutation.row_key()).unwrap();
    assert_eq!(
        key_values.as_slice(),
        &[Value::Int32(7), Value::Text("alpha".into())]
    );
}

#[test]
fn fresh_decode_is_shareable_across_threads() {
    let decoder = Arc::new(RowDecoder::new(reference_index(CodecOptions::default())));

    let handles: Vec<_> = (1..=4)
        .map(|n| {
            let decoder = Arc::clone(&decoder);
            std::thread::spawn(move || {
                let row = decoder.decode(&int_key(n), &reference_cells(n)).unwrap();
                row.key_values()[0].clone()
            })
        })
        .collect();

    let mut keys: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    keys.sort_by_key(|v| match v {
        Value::Int32(n) => *n,
        _ => unreachable!(),
    });
    assert_eq!(
        keys,
        vec![Value::Int32(1), Value::Int32(2), Value::Int32(3), Value::Int32(4)]
    );
}
