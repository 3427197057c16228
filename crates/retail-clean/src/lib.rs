pub mod cleaners;
pub mod datetime;
pub mod engine;
pub mod frame;
pub mod frame_utils;
pub mod identifier;
pub mod nulls;
pub mod rules;
pub mod weights;

pub use cleaners::build_default_registry;
pub use datetime::parse_flexible_date;
pub use engine::{CleanRule, CleanerRegistry, EntityCleaner, RuleCategory, RuleMetadata};
pub use frame::EntityFrame;
pub use identifier::{is_canonical_uuid, matches_uuid_pattern};
pub use nulls::normalize_nulls;
pub use weights::parse_weight_kg;
