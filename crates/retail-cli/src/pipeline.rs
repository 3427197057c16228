//! Entity run orchestration with explicit stages.
//!
//! Each entity runs extract → clean → load to completion before the next
//! begins. Entities are independent: one entity's failure is recorded in its
//! summary and the remaining entities still run.

use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use sqlx::postgres::PgPool;
use tracing::{Instrument, info, info_span};

use retail_clean::CleanerRegistry;
use retail_ingest::{fetch_document_table, fetch_object, fetch_stores, fetch_table};
use retail_load::replace_table;
use retail_model::{Entity, PipelineConfig};

use crate::types::EntitySummary;

/// Everything an entity run needs, wired up once in `commands`.
pub struct PipelineContext {
    pub source: PgPool,
    pub target: Option<PgPool>,
    pub http: reqwest::Client,
    pub config: PipelineConfig,
    pub registry: CleanerRegistry,
}

/// Fetch the raw dataset for one entity from its source.
async fn extract(ctx: &PipelineContext, entity: Entity) -> Result<DataFrame> {
    match entity {
        Entity::Users => fetch_table(&ctx.source, "legacy_users").await,
        Entity::Orders => fetch_table(&ctx.source, "orders_table").await,
        Entity::Cards => fetch_document_table(&ctx.http, &ctx.config.card_details_url).await,
        Entity::Stores => fetch_stores(&ctx.http, &ctx.config).await,
        Entity::Products => fetch_object(&ctx.http, &ctx.config.products_url).await,
        Entity::Dates => fetch_object(&ctx.http, &ctx.config.date_details_url).await,
    }
}

/// Run one entity end to end, returning its summary.
///
/// Only the error string is surfaced here; the caller decides the exit code.
pub async fn run_entity(ctx: &PipelineContext, entity: Entity) -> EntitySummary {
    let span = info_span!("entity", entity = %entity);
    let start = Instant::now();
    match run_entity_inner(ctx, entity).instrument(span).await {
        Ok((raw_rows, clean_rows, loaded)) => EntitySummary {
            entity,
            raw_rows,
            clean_rows,
            loaded,
            duration: start.elapsed(),
            error: None,
        },
        Err(error) => EntitySummary {
            entity,
            raw_rows: 0,
            clean_rows: 0,
            loaded: false,
            duration: start.elapsed(),
            error: Some(format!("{error:#}")),
        },
    }
}

async fn run_entity_inner(
    ctx: &PipelineContext,
    entity: Entity,
) -> Result<(usize, usize, bool)> {
    let raw = extract(ctx, entity)
        .await
        .with_context(|| format!("extract '{entity}'"))?;
    let raw_rows = raw.height();
    info!(rows = raw_rows, source = entity.source_description(), "extracted raw dataset");

    let frame = ctx
        .registry
        .clean(entity, raw)
        .with_context(|| format!("clean '{entity}'"))?;
    let clean_rows = frame.record_count();
    info!(
        rows = clean_rows,
        dropped = raw_rows.saturating_sub(clean_rows),
        "cleaned dataset"
    );

    let Some(target) = &ctx.target else {
        info!(table = entity.table_name(), "dry run, skipping load");
        return Ok((raw_rows, clean_rows, false));
    };
    replace_table(target, &frame)
        .await
        .with_context(|| format!("load '{}'", entity.table_name()))?;
    Ok((raw_rows, clean_rows, true))
}
