use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info;

use retail_clean::build_default_registry;
use retail_ingest::connect;
use retail_model::{Entity, PipelineConfig, load_credentials, load_pipeline_config};

use crate::cli::RunArgs;
use crate::pipeline::{PipelineContext, run_entity};
use crate::summary::apply_table_style;
use crate::types::RunResult;

/// Print the entity catalogue.
pub fn run_entities() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Entity", "Destination table", "Source"]);
    apply_table_style(&mut table);
    for entity in Entity::ALL {
        table.add_row(vec![
            entity.key().to_string(),
            entity.table_name().to_string(),
            entity.source_description().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Run the pipeline over the selected entities.
pub async fn run_pipeline(args: &RunArgs) -> Result<RunResult> {
    let config = match &args.config {
        Some(path) => load_pipeline_config(path).context("load pipeline config")?,
        None => PipelineConfig::default(),
    };

    let source_creds = load_credentials(&args.source_creds).context("load source credentials")?;
    let source = connect(&source_creds).await?;
    let target = if args.dry_run {
        None
    } else {
        let target_creds =
            load_credentials(&args.target_creds).context("load target credentials")?;
        Some(connect(&target_creds).await?)
    };

    let http = reqwest::Client::builder()
        .build()
        .context("build http client")?;

    let ctx = PipelineContext {
        source,
        target,
        http,
        config,
        registry: build_default_registry(),
    };

    let entities: Vec<Entity> = if args.only.is_empty() {
        Entity::ALL.to_vec()
    } else {
        args.only.iter().map(|arg| Entity::from(*arg)).collect()
    };

    info!(
        dry_run = args.dry_run,
        entities = entities.len(),
        "starting pipeline run"
    );

    let mut summaries = Vec::with_capacity(entities.len());
    for entity in entities {
        summaries.push(run_entity(&ctx, entity).await);
    }

    let has_errors = summaries.iter().any(|summary| summary.error.is_some());
    Ok(RunResult {
        entities: summaries,
        dry_run: args.dry_run,
        has_errors,
    })
}
