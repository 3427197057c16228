//! Store details source: a numbered REST resource, one document per store.
//!
//! The API exposes a count endpoint and a detail endpoint per store number;
//! the extractor walks `0..count` and folds the JSON documents into a single
//! frame, one row per store.

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use serde_json::Value;
use tracing::{debug, info};

use retail_model::PipelineConfig;

use crate::records::records_to_frame;

/// Ask the API how many stores exist.
pub async fn fetch_store_count(client: &reqwest::Client, config: &PipelineConfig) -> Result<u64> {
    let payload: Value = client
        .get(&config.store_count_url)
        .header("x-api-key", &config.api_key)
        .send()
        .await
        .context("fetch store count")?
        .error_for_status()
        .context("fetch store count")?
        .json()
        .await
        .context("decode store count payload")?;
    payload
        .get("number_stores")
        .and_then(Value::as_u64)
        .context("store count payload has no 'number_stores' field")
}

/// Retrieve every store detail document and fold them into one frame.
pub async fn fetch_stores(client: &reqwest::Client, config: &PipelineConfig) -> Result<DataFrame> {
    let count = fetch_store_count(client, config).await?;
    info!(count, "retrieving store details");
    let mut records = Vec::with_capacity(count as usize);
    for store_number in 0..count {
        let url = format!("{}/{store_number}", config.store_detail_url);
        let payload: Value = client
            .get(&url)
            .header("x-api-key", &config.api_key)
            .send()
            .await
            .with_context(|| format!("fetch store {store_number}"))?
            .error_for_status()
            .with_context(|| format!("fetch store {store_number}"))?
            .json()
            .await
            .with_context(|| format!("decode store {store_number}"))?;
        match payload {
            Value::Object(map) => records.push(map),
            other => {
                anyhow::bail!("store {store_number}: expected a JSON object, got {other}")
            }
        }
        if store_number % 100 == 0 {
            debug!(store_number, "store detail progress");
        }
    }
    records_to_frame(&records)
}
