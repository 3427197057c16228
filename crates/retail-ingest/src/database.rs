//! Relational source: reads whole tables from the operational Postgres
//! database into DataFrames.
//!
//! Connections are opened from explicit credentials and passed around as
//! pools; nothing here caches a process-wide handle.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::{Column, DataFrame};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column as _, Row, TypeInfo};
use tracing::{debug, warn};

use retail_model::DbCredentials;

/// Open a connection pool against the given database.
pub async fn connect(creds: &DbCredentials) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(4)
        .connect(&creds.connection_url())
        .await
        .with_context(|| format!("connect to database '{}' on {}", creds.database, creds.host))
}

/// List the table names in the public schema.
pub async fn list_tables(pool: &PgPool) -> Result<Vec<String>> {
    let rows = sqlx::query(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = 'public' ORDER BY table_name",
    )
    .fetch_all(pool)
    .await
    .context("list database tables")?;
    let mut names = Vec::with_capacity(rows.len());
    for row in &rows {
        names.push(row.try_get::<String, _>(0)?);
    }
    Ok(names)
}

/// Read an entire table into a DataFrame.
///
/// The table name is interpolated into the statement, so it is restricted to
/// plain identifiers; anything else is rejected before touching the database.
pub async fn fetch_table(pool: &PgPool, table: &str) -> Result<DataFrame> {
    anyhow::ensure!(
        is_plain_identifier(table),
        "invalid table name '{table}'"
    );
    let rows = sqlx::query(&format!("SELECT * FROM \"{table}\""))
        .fetch_all(pool)
        .await
        .with_context(|| format!("read table '{table}'"))?;
    debug!(table, rows = rows.len(), "fetched relational table");
    rows_to_frame(&rows)
}

fn is_plain_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Convert fetched rows into typed polars columns.
///
/// Date and timestamp values are rendered as ISO-8601 strings, matching the
/// textual form the cleaners coerce from.
fn rows_to_frame(rows: &[PgRow]) -> Result<DataFrame> {
    let Some(first) = rows.first() else {
        return Ok(DataFrame::default());
    };
    let mut columns: Vec<Column> = Vec::with_capacity(first.columns().len());
    for (idx, meta) in first.columns().iter().enumerate() {
        let name = meta.name();
        let type_name = meta.type_info().name().to_uppercase();
        let column = match type_name.as_str() {
            "INT2" => int_column(rows, idx, name, |row, idx| {
                row.try_get::<Option<i16>, _>(idx).map(|v| v.map(i64::from))
            })?,
            "INT4" => int_column(rows, idx, name, |row, idx| {
                row.try_get::<Option<i32>, _>(idx).map(|v| v.map(i64::from))
            })?,
            "INT8" => int_column(rows, idx, name, |row, idx| {
                row.try_get::<Option<i64>, _>(idx)
            })?,
            "FLOAT4" => {
                let mut values: Vec<Option<f64>> = Vec::with_capacity(rows.len());
                for row in rows {
                    values.push(row.try_get::<Option<f32>, _>(idx)?.map(f64::from));
                }
                Column::new(name.into(), values)
            }
            "FLOAT8" => {
                let mut values: Vec<Option<f64>> = Vec::with_capacity(rows.len());
                for row in rows {
                    values.push(row.try_get::<Option<f64>, _>(idx)?);
                }
                Column::new(name.into(), values)
            }
            "BOOL" => {
                let mut values: Vec<Option<bool>> = Vec::with_capacity(rows.len());
                for row in rows {
                    values.push(row.try_get::<Option<bool>, _>(idx)?);
                }
                Column::new(name.into(), values)
            }
            "DATE" => {
                let mut values: Vec<Option<String>> = Vec::with_capacity(rows.len());
                for row in rows {
                    let value = row.try_get::<Option<NaiveDate>, _>(idx)?;
                    values.push(value.map(|date| date.format("%Y-%m-%d").to_string()));
                }
                Column::new(name.into(), values)
            }
            "TIMESTAMP" => {
                let mut values: Vec<Option<String>> = Vec::with_capacity(rows.len());
                for row in rows {
                    let value = row.try_get::<Option<NaiveDateTime>, _>(idx)?;
                    values.push(value.map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string()));
                }
                Column::new(name.into(), values)
            }
            "TIMESTAMPTZ" => {
                let mut values: Vec<Option<String>> = Vec::with_capacity(rows.len());
                for row in rows {
                    let value = row.try_get::<Option<DateTime<Utc>>, _>(idx)?;
                    values.push(value.map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string()));
                }
                Column::new(name.into(), values)
            }
            "UUID" => {
                let mut values: Vec<Option<String>> = Vec::with_capacity(rows.len());
                for row in rows {
                    let value = row.try_get::<Option<sqlx::types::Uuid>, _>(idx)?;
                    values.push(value.map(|uuid| uuid.to_string()));
                }
                Column::new(name.into(), values)
            }
            "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => {
                let mut values: Vec<Option<String>> = Vec::with_capacity(rows.len());
                for row in rows {
                    values.push(row.try_get::<Option<String>, _>(idx)?);
                }
                Column::new(name.into(), values)
            }
            other => {
                warn!(column = name, pg_type = other, "unhandled column type, reading as null");
                let values: Vec<Option<String>> = vec![None; rows.len()];
                Column::new(name.into(), values)
            }
        };
        columns.push(column);
    }
    DataFrame::new(columns).context("build dataframe from table rows")
}

fn int_column(
    rows: &[PgRow],
    idx: usize,
    name: &str,
    get: impl Fn(&PgRow, usize) -> sqlx::Result<Option<i64>>,
) -> Result<Column> {
    let mut values: Vec<Option<i64>> = Vec::with_capacity(rows.len());
    for row in rows {
        values.push(get(row, idx)?);
    }
    Ok(Column::new(name.into(), values))
}
