//! Serializers that turn generated tables into SQL `INSERT` statements,
//! CSV files, or JSON arrays (spec.md §4.7).

pub mod batch;
pub mod csv_export;
pub mod error;
pub mod json_export;
pub mod sql;

pub use error::ExportError;
pub use sql::render_sql_inserts;
pub use csv_export::render_csv;
pub use json_export::render_json;
