//! Entity rule sets.
//!
//! One module per entity builds that entity's ordered rule list. The
//! registry wires all six together; the pipeline only ever asks the registry
//! to clean a raw frame for an entity.
//!
//! | Entity | Highlights |
//! |--------|------------|
//! | users | date coercion, UK country-code fix, per-country phone formats, identifier filter |
//! | cards | date coercion, card-number character stripping |
//! | stores | continent typo rewrite, country-code row filter, staff-count digits |
//! | products | weight-to-kg conversion, price parsing, availability flag, uuid pattern filter |
//! | orders | column pruning, order-id rename, double identifier filter |
//! | dates | time-period membership filter, calendar-part coercion |

mod cards;
mod dates;
mod orders;
mod products;
mod stores;
mod users;

pub use cards::build_cards_cleaner;
pub use dates::build_dates_cleaner;
pub use orders::build_orders_cleaner;
pub use products::build_products_cleaner;
pub use stores::build_stores_cleaner;
pub use users::build_users_cleaner;

use crate::engine::CleanerRegistry;

/// Build the registry with every entity's rule set registered.
pub fn build_default_registry() -> CleanerRegistry {
    let mut registry = CleanerRegistry::new();
    registry.register(build_users_cleaner());
    registry.register(build_cards_cleaner());
    registry.register(build_stores_cleaner());
    registry.register(build_products_cleaner());
    registry.register(build_orders_cleaner());
    registry.register(build_dates_cleaner());
    registry
}
