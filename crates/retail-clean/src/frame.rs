use polars::prelude::DataFrame;

use retail_model::Entity;

/// One entity's dataset on its way through the pipeline.
///
/// The `primary_key` field carries the "promote the `index` column" decision:
/// the column stays in the frame as ordinary data, and the destination writer
/// declares it as the table's primary key.
#[derive(Debug, Clone)]
pub struct EntityFrame {
    pub entity: Entity,
    pub data: DataFrame,
    pub primary_key: Option<String>,
}

impl EntityFrame {
    pub fn new(entity: Entity, data: DataFrame) -> Self {
        Self {
            entity,
            data,
            primary_key: None,
        }
    }

    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    /// Destination table this frame loads into.
    pub fn table_name(&self) -> &'static str {
        self.entity.table_name()
    }
}
