pub mod writer;

pub use writer::{create_table_sql, replace_table};
