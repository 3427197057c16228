pub mod api;
pub mod database;
pub mod document;
pub mod object_store;
pub mod polars_utils;
pub mod records;

pub use api::{fetch_store_count, fetch_stores};
pub use database::{connect, fetch_table, list_tables};
pub use document::{fetch_document_table, parse_card_lines};
pub use object_store::{fetch_object, resolve_object_url};
pub use polars_utils::{
    any_is_null, any_to_f64, any_to_i64, any_to_string, format_numeric, parse_f64, parse_i64,
};
pub use records::records_to_frame;
