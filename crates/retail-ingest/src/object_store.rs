//! Object storage source: CSV and JSON objects addressed by URL.
//!
//! `s3://bucket/key` addresses are rewritten to the bucket's public HTTPS
//! endpoint; `http(s)` URLs pass through unchanged. Only `.csv` and `.json`
//! objects are supported; any other extension is a structural error that
//! aborts the entity's run.

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use serde_json::Value;
use tracing::debug;

use retail_model::RetailError;

use crate::records::{RawCell, frame_from_cells, records_to_frame};

/// Region suffix for rewriting `s3://` addresses to public HTTPS endpoints.
const S3_REGION: &str = "eu-west-1";

/// Resolve an object URL to a fetchable HTTPS URL plus its file extension.
pub fn resolve_object_url(url: &str) -> Result<(String, String)> {
    let (fetch_url, path) = if let Some(rest) = url.strip_prefix("s3://") {
        let (bucket, key) = rest
            .split_once('/')
            .with_context(|| format!("object url '{url}' has no key"))?;
        (
            format!("https://{bucket}.s3.{S3_REGION}.amazonaws.com/{key}"),
            key.to_string(),
        )
    } else if url.starts_with("http://") || url.starts_with("https://") {
        (url.to_string(), url.to_string())
    } else {
        anyhow::bail!("object url '{url}' is neither s3:// nor http(s)://");
    };
    let extension = path
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    Ok((fetch_url, extension))
}

/// Fetch a CSV or JSON object and decode it into a frame.
pub async fn fetch_object(client: &reqwest::Client, url: &str) -> Result<DataFrame> {
    let (fetch_url, extension) = resolve_object_url(url)?;
    match extension.as_str() {
        "csv" | "json" => {}
        other => return Err(RetailError::UnsupportedFormat(other.to_string()).into()),
    }
    let bytes = client
        .get(&fetch_url)
        .send()
        .await
        .with_context(|| format!("fetch object '{url}'"))?
        .error_for_status()
        .with_context(|| format!("fetch object '{url}'"))?
        .bytes()
        .await
        .context("read object body")?;
    debug!(url, bytes = bytes.len(), "fetched object");
    match extension.as_str() {
        "csv" => decode_csv(&bytes),
        _ => decode_json(&bytes),
    }
}

fn decode_csv(bytes: &[u8]) -> Result<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .context("read csv headers")?
        .iter()
        .enumerate()
        .map(|(idx, header)| normalize_header(header, idx))
        .collect();
    let mut rows: Vec<Vec<RawCell>> = Vec::new();
    for record in reader.records() {
        let record = record.context("read csv record")?;
        rows.push(record.iter().map(RawCell::from_csv).collect());
    }
    frame_from_cells(&headers, &rows)
}

fn decode_json(bytes: &[u8]) -> Result<DataFrame> {
    let payload: Value = serde_json::from_slice(bytes).context("decode json object")?;
    match payload {
        Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(map) => records.push(map),
                    other => anyhow::bail!("json row is not an object: {other}"),
                }
            }
            records_to_frame(&records)
        }
        // Column-oriented form: {"column": {"0": value, "1": value, ...}}
        Value::Object(columns) => {
            let mut row_keys: Vec<String> = Vec::new();
            for value in columns.values() {
                let Value::Object(cells) = value else {
                    anyhow::bail!("json column is not an object of cells");
                };
                for key in cells.keys() {
                    if !row_keys.iter().any(|existing| existing == key) {
                        row_keys.push(key.clone());
                    }
                }
            }
            let headers: Vec<String> = columns.keys().cloned().collect();
            let rows: Vec<Vec<RawCell>> = row_keys
                .iter()
                .map(|row_key| {
                    headers
                        .iter()
                        .map(|header| {
                            columns
                                .get(header)
                                .and_then(|cells| cells.get(row_key))
                                .map(RawCell::from_json)
                                .unwrap_or(RawCell::Null)
                        })
                        .collect()
                })
                .collect();
            frame_from_cells(&headers, &rows)
        }
        other => anyhow::bail!("unexpected json object shape: {other}"),
    }
}

/// Trim BOM and whitespace from a header; name anonymous columns by position.
fn normalize_header(raw: &str, idx: usize) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() {
        format!("unnamed_{idx}")
    } else {
        trimmed.to_string()
    }
}
