//! Order rule set.
//!
//! The fact table. Orders carry denormalized name columns and a stray
//! numeric-literal-named column that never persist, an editing artifact
//! column `level_0` that becomes the order id, and two identifier columns
//! that must both be canonical.

use retail_model::Entity;

use crate::engine::EntityCleaner;
use crate::rules::{DropColumns, KeepCanonicalIds, NormalizeNulls, RenameColumns};

/// Orders: prune never-persisted columns, rename the order id, keep rows
/// whose identifiers are both canonical, then normalize nulls and promote
/// the index.
pub fn build_orders_cleaner() -> EntityCleaner {
    let mut cleaner = EntityCleaner::new(Entity::Orders);
    cleaner
        .add_rule(Box::new(DropColumns::new(
            "orders.prune-columns",
            &["first_name", "last_name", "1"],
            false,
        )))
        .add_rule(Box::new(RenameColumns::new(
            "orders.order-id",
            &[("level_0", "order_id")],
        )))
        .add_rule(Box::new(KeepCanonicalIds::new(
            "orders.valid-uuids",
            &["user_uuid", "date_uuid"],
        )))
        .add_rule(Box::new(NormalizeNulls::new("orders.normalize-nulls", &["NULL"])));
    cleaner
}
