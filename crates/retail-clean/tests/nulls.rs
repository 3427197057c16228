//! Tests for sentinel/duplicate/null normalization.

use polars::prelude::{Column, DataFrame};
use retail_clean::frame::EntityFrame;
use retail_clean::nulls::{drop_duplicates, drop_null_rows, normalize_nulls, replace_sentinels};
use retail_model::Entity;

fn sample_frame() -> DataFrame {
    DataFrame::new(vec![
        Column::new(
            "index".into(),
            vec![Some(0i64), Some(1), Some(1), Some(2), Some(3)],
        ),
        Column::new(
            "name".into(),
            vec![
                Some("Ada"),
                Some("Grace"),
                Some("Grace"),
                Some("NULL"),
                Some("Edsger"),
            ],
        ),
        Column::new(
            "city".into(),
            vec![Some("London"), Some("Berlin"), Some("Berlin"), Some("Leeds"), None],
        ),
    ])
    .unwrap()
}

#[test]
fn sentinel_cells_become_nulls() {
    let mut df = sample_frame();
    replace_sentinels(&mut df, &["NULL"]).unwrap();
    let value = df.column("name").unwrap().get(3).unwrap();
    assert!(matches!(value, polars::prelude::AnyValue::Null));
}

#[test]
fn duplicates_removed_keeping_first() {
    let mut df = sample_frame();
    drop_duplicates(&mut df).unwrap();
    assert_eq!(df.height(), 4);
}

#[test]
fn null_rows_removed() {
    let mut df = sample_frame();
    drop_null_rows(&mut df).unwrap();
    // Only the row with a true null (Edsger) goes; the "NULL" sentinel is
    // still a string at this point.
    assert_eq!(df.height(), 4);
}

#[test]
fn near_duplicates_differing_by_null_survive_deduplication() {
    // Duplicate removal runs before null-row removal, so a pair differing
    // only in a null cell is two distinct rows.
    let mut df = DataFrame::new(vec![
        Column::new("a".into(), vec![Some("x"), Some("x")]),
        Column::new("b".into(), vec![Some("y"), None]),
    ])
    .unwrap();
    drop_duplicates(&mut df).unwrap();
    assert_eq!(df.height(), 2);
}

#[test]
fn full_sequence_promotes_index_and_is_idempotent() {
    let mut frame = EntityFrame::new(Entity::Users, sample_frame());
    normalize_nulls(&mut frame, &["NULL"]).unwrap();
    assert_eq!(frame.primary_key.as_deref(), Some("index"));
    // Sentinel row and null row dropped, duplicate collapsed.
    assert_eq!(frame.record_count(), 2);

    let rows = frame.record_count();
    let columns = frame.data.width();
    normalize_nulls(&mut frame, &["NULL"]).unwrap();
    assert_eq!(frame.record_count(), rows);
    assert_eq!(frame.data.width(), columns);
}

#[test]
fn null_cells_and_empty_strings_dedupe_separately() {
    let mut df = DataFrame::new(vec![Column::new(
        "a".into(),
        vec![Some(""), None, Some("")],
    )])
    .unwrap();
    drop_duplicates(&mut df).unwrap();
    // "" and null are distinct values; only the second "" collapses.
    assert_eq!(df.height(), 2);
}
