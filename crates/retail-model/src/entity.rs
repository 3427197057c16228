//! The fixed catalogue of datasets the pipeline moves.
//!
//! Each entity names one raw source dataset and one destination table in the
//! local analytical database. The catalogue is closed: adding a dataset means
//! adding a variant here and a rule set in the cleaning crate.

use std::fmt;
use std::str::FromStr;

use crate::error::RetailError;

/// One dataset handled by the pipeline, keyed by its business meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Entity {
    Users,
    Cards,
    Stores,
    Products,
    Orders,
    Dates,
}

impl Entity {
    /// All entities in pipeline execution order.
    pub const ALL: [Entity; 6] = [
        Entity::Users,
        Entity::Cards,
        Entity::Stores,
        Entity::Products,
        Entity::Orders,
        Entity::Dates,
    ];

    /// Destination table name in the star schema.
    pub fn table_name(self) -> &'static str {
        match self {
            Entity::Users => "dim_users",
            Entity::Cards => "dim_card_details",
            Entity::Stores => "dim_store_details",
            Entity::Products => "dim_products",
            Entity::Orders => "orders_table",
            Entity::Dates => "dim_date_times",
        }
    }

    /// Short lowercase key used on the CLI and in logs.
    pub fn key(self) -> &'static str {
        match self {
            Entity::Users => "users",
            Entity::Cards => "cards",
            Entity::Stores => "stores",
            Entity::Products => "products",
            Entity::Orders => "orders",
            Entity::Dates => "dates",
        }
    }

    /// Human-readable description of the raw source.
    pub fn source_description(self) -> &'static str {
        match self {
            Entity::Users => "relational table 'legacy_users'",
            Entity::Cards => "card details PDF document",
            Entity::Stores => "paginated store detail API",
            Entity::Products => "object storage CSV (products)",
            Entity::Orders => "relational table 'orders_table'",
            Entity::Dates => "object storage JSON (date details)",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Entity {
    type Err = RetailError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "users" => Ok(Entity::Users),
            "cards" => Ok(Entity::Cards),
            "stores" => Ok(Entity::Stores),
            "products" => Ok(Entity::Products),
            "orders" => Ok(Entity::Orders),
            "dates" => Ok(Entity::Dates),
            other => Err(RetailError::Message(format!("unknown entity '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_match_star_schema() {
        assert_eq!(Entity::Users.table_name(), "dim_users");
        assert_eq!(Entity::Cards.table_name(), "dim_card_details");
        assert_eq!(Entity::Stores.table_name(), "dim_store_details");
        assert_eq!(Entity::Products.table_name(), "dim_products");
        assert_eq!(Entity::Orders.table_name(), "orders_table");
        assert_eq!(Entity::Dates.table_name(), "dim_date_times");
    }

    #[test]
    fn parses_cli_keys_case_insensitively() {
        assert_eq!("users".parse::<Entity>().unwrap(), Entity::Users);
        assert_eq!("Stores".parse::<Entity>().unwrap(), Entity::Stores);
        assert!("unknown".parse::<Entity>().is_err());
    }

    #[test]
    fn catalogue_is_complete() {
        assert_eq!(Entity::ALL.len(), 6);
        for entity in Entity::ALL {
            assert_eq!(entity.key().parse::<Entity>().unwrap(), entity);
        }
    }
}
