use std::time::Duration;

use retail_model::Entity;

#[derive(Debug)]
pub struct RunResult {
    pub entities: Vec<EntitySummary>,
    pub dry_run: bool,
    pub has_errors: bool,
}

#[derive(Debug)]
pub struct EntitySummary {
    pub entity: Entity,
    pub raw_rows: usize,
    pub clean_rows: usize,
    pub loaded: bool,
    pub duration: Duration,
    pub error: Option<String>,
}
