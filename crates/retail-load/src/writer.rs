//! Star-schema loading: replace a destination table with a cleaned frame.
//!
//! Replacement is wholesale: drop, recreate from the frame's column types,
//! insert everything inside one transaction. There is no upsert path; a
//! pipeline run owns its output tables completely.

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, DataFrame, DataType};
use sqlx::postgres::PgPool;
use tracing::info;

use retail_clean::EntityFrame;
use retail_ingest::{any_to_f64, any_to_i64, any_to_string};

/// Upper bound on bind parameters per INSERT statement; Postgres caps the
/// protocol at 65535.
const MAX_BIND_PARAMS: usize = 60_000;

/// One cell value ready for binding.
enum SqlValue {
    Text(Option<String>),
    Int(Option<i64>),
    Float(Option<f64>),
    Bool(Option<bool>),
}

/// Map a frame dtype to its destination column type.
fn sql_type(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => "BIGINT",
        DataType::Float32 | DataType::Float64 => "DOUBLE PRECISION",
        DataType::Boolean => "BOOLEAN",
        _ => "TEXT",
    }
}

/// Render the CREATE TABLE statement for a frame, including the PRIMARY KEY
/// constraint when the frame has a promoted key column.
pub fn create_table_sql(table: &str, df: &DataFrame, primary_key: Option<&str>) -> String {
    let mut parts: Vec<String> = df
        .get_columns()
        .iter()
        .map(|column| format!("\"{}\" {}", column.name(), sql_type(column.dtype())))
        .collect();
    if let Some(key) = primary_key {
        parts.push(format!("PRIMARY KEY (\"{key}\")"));
    }
    format!("CREATE TABLE \"{table}\" ({})", parts.join(", "))
}

fn cell_value(value: AnyValue<'_>, dtype: &DataType) -> SqlValue {
    let is_null = matches!(value, AnyValue::Null);
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => SqlValue::Int(any_to_i64(value)),
        DataType::Float32 | DataType::Float64 => SqlValue::Float(any_to_f64(value)),
        DataType::Boolean => SqlValue::Bool(match value {
            AnyValue::Boolean(b) => Some(b),
            _ => None,
        }),
        _ => SqlValue::Text(if is_null { None } else { Some(any_to_string(value)) }),
    }
}

/// Replace the frame's destination table with its rows.
pub async fn replace_table(pool: &PgPool, frame: &EntityFrame) -> Result<()> {
    let table = frame.table_name();
    let df = &frame.data;
    let mut tx = pool.begin().await.context("begin load transaction")?;

    sqlx::query(&format!("DROP TABLE IF EXISTS \"{table}\""))
        .execute(&mut *tx)
        .await
        .with_context(|| format!("drop table '{table}'"))?;
    sqlx::query(&create_table_sql(table, df, frame.primary_key.as_deref()))
        .execute(&mut *tx)
        .await
        .with_context(|| format!("create table '{table}'"))?;

    let columns = df.get_columns().to_vec();
    if !columns.is_empty() && df.height() > 0 {
        let column_list = columns
            .iter()
            .map(|column| format!("\"{}\"", column.name()))
            .collect::<Vec<_>>()
            .join(", ");
        let chunk_rows = (MAX_BIND_PARAMS / columns.len()).max(1);
        let mut start = 0usize;
        while start < df.height() {
            let end = (start + chunk_rows).min(df.height());
            let mut placeholders = Vec::with_capacity(end - start);
            let mut param = 1usize;
            for _ in start..end {
                let row: Vec<String> = (0..columns.len())
                    .map(|_| {
                        let placeholder = format!("${param}");
                        param += 1;
                        placeholder
                    })
                    .collect();
                placeholders.push(format!("({})", row.join(", ")));
            }
            let sql = format!(
                "INSERT INTO \"{table}\" ({column_list}) VALUES {}",
                placeholders.join(", ")
            );
            let mut query = sqlx::query(&sql);
            for idx in start..end {
                for column in &columns {
                    let value = column.get(idx).unwrap_or(AnyValue::Null);
                    query = match cell_value(value, column.dtype()) {
                        SqlValue::Text(v) => query.bind(v),
                        SqlValue::Int(v) => query.bind(v),
                        SqlValue::Float(v) => query.bind(v),
                        SqlValue::Bool(v) => query.bind(v),
                    };
                }
            }
            query
                .execute(&mut *tx)
                .await
                .with_context(|| format!("insert into '{table}'"))?;
            start = end;
        }
    }

    tx.commit().await.context("commit load transaction")?;
    info!(table, rows = df.height(), "replaced destination table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::Column;

    #[test]
    fn create_table_maps_dtypes() {
        let df = DataFrame::new(vec![
            Column::new("store_code".into(), vec!["AB-123", "CD-456"]),
            Column::new("staff_numbers".into(), vec![Some(3i64), None]),
            Column::new("longitude".into(), vec![Some(1.5f64), Some(2.5)]),
            Column::new("still_available".into(), vec![true, false]),
        ])
        .unwrap();
        let sql = create_table_sql("dim_store_details", &df, None);
        assert_eq!(
            sql,
            "CREATE TABLE \"dim_store_details\" (\"store_code\" TEXT, \
             \"staff_numbers\" BIGINT, \"longitude\" DOUBLE PRECISION, \
             \"still_available\" BOOLEAN)"
        );
    }

    #[test]
    fn create_table_declares_primary_key() {
        let df = DataFrame::new(vec![
            Column::new("index".into(), vec![1i64, 2]),
            Column::new("order_id".into(), vec!["a", "b"]),
        ])
        .unwrap();
        let sql = create_table_sql("orders_table", &df, Some("index"));
        assert!(sql.ends_with("PRIMARY KEY (\"index\"))"));
    }
}
