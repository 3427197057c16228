//! Rule-driven cleaning engine.
//!
//! Each entity's cleaner is an ordered list of rules executed by one engine,
//! rather than six hand-written near-duplicate functions. A rule is a small
//! unit of work over the frame: a coercion, a validation filter, or a
//! reshape. Rules carry metadata so a run can be traced rule by rule.

use std::collections::HashMap;

use anyhow::Result;
use polars::prelude::DataFrame;
use tracing::debug;

use retail_model::{Entity, RetailError};

use crate::frame::EntityFrame;

/// What kind of work a rule does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Sentinel/duplicate/null-row normalization.
    Nulls,
    /// Type coercion (dates, numbers, booleans) with missing-on-failure.
    Coercion,
    /// Row filters on validation predicates.
    Validation,
    /// Column drops, renames, and value rewrites.
    Reshape,
}

/// Metadata about a cleaning rule.
#[derive(Debug, Clone)]
pub struct RuleMetadata {
    /// Unique rule identifier, e.g. "users.phone-format".
    pub id: String,
    /// Rule category.
    pub category: RuleCategory,
    /// Human-readable description.
    pub description: String,
}

impl RuleMetadata {
    pub fn new(
        id: impl Into<String>,
        category: RuleCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            description: description.into(),
        }
    }
}

/// One unit of cleaning work applied to an entity frame.
pub trait CleanRule: Send + Sync {
    /// Get the rule metadata.
    fn metadata(&self) -> &RuleMetadata;

    /// Apply the rule to the frame, mutating it in place.
    ///
    /// # Errors
    ///
    /// Structural problems (a required column missing) abort the entity's
    /// run; cell-level defects never error and become missing values or
    /// dropped rows instead.
    fn apply(&self, frame: &mut EntityFrame) -> Result<()>;
}

/// An entity's cleaner: its ordered rule list.
pub struct EntityCleaner {
    entity: Entity,
    rules: Vec<Box<dyn CleanRule>>,
}

impl EntityCleaner {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            rules: Vec::new(),
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Append a rule; rules run in registration order.
    pub fn add_rule(&mut self, rule: Box<dyn CleanRule>) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Run every rule over a raw dataset, producing the cleaned frame.
    ///
    /// On error the partially-transformed frame is discarded; callers never
    /// see a frame that violates the entity's documented invariants.
    pub fn clean(&self, raw: DataFrame) -> Result<EntityFrame> {
        let mut frame = EntityFrame::new(self.entity, raw);
        for rule in &self.rules {
            let meta = rule.metadata();
            let before = frame.record_count();
            rule.apply(&mut frame)?;
            debug!(
                entity = %self.entity,
                rule = %meta.id,
                rows_before = before,
                rows_after = frame.record_count(),
                "applied cleaning rule"
            );
        }
        Ok(frame)
    }

    /// Metadata for every registered rule, in execution order.
    pub fn rule_metadata(&self) -> Vec<&RuleMetadata> {
        self.rules.iter().map(|rule| rule.metadata()).collect()
    }
}

/// Registry of entity cleaners.
#[derive(Default)]
pub struct CleanerRegistry {
    cleaners: HashMap<Entity, EntityCleaner>,
}

impl CleanerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, cleaner: EntityCleaner) {
        self.cleaners.insert(cleaner.entity(), cleaner);
    }

    pub fn get(&self, entity: Entity) -> Option<&EntityCleaner> {
        self.cleaners.get(&entity)
    }

    /// Clean a raw dataset with the entity's registered rule set.
    pub fn clean(&self, entity: Entity, raw: DataFrame) -> Result<EntityFrame> {
        let cleaner = self.cleaners.get(&entity).ok_or_else(|| {
            RetailError::Message(format!("no cleaner registered for entity '{entity}'"))
        })?;
        cleaner.clean(raw)
    }

    pub fn registered_entities(&self) -> Vec<Entity> {
        self.cleaners.keys().copied().collect()
    }
}
