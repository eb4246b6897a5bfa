//! Generates synthetic, constraint-compliant rows for a SQL schema.
//!
//! Parses a subset of `CREATE TABLE` DDL, derives per-column value domains
//! from `CHECK` predicates, schedules FK-dependent tables topologically,
//! fills and repairs rows against their constraints, and exports the
//! result as SQL `INSERT`s, CSV, or JSON.
//!
//! ```no_run
//! use rowsmith::GenerationConfig;
//!
//! let ddl = "CREATE TABLE users (id SERIAL PRIMARY KEY, email VARCHAR(255));";
//! let config = GenerationConfig::new().seed(42).default_count(100);
//! let today = chrono::Local::now().date_naive();
//! let output = rowsmith::generate(ddl, &config, today).unwrap();
//! let sql = rowsmith::export_sql_to_string(&output);
//! println!("{sql}");
//! ```

mod config;
mod error;
mod export;
mod generate;

pub use config::GenerationConfig;
pub use error::Error;
pub use export::{export_csv_to_dir, export_json_to_dir, export_sql_to_file, export_sql_to_string};
pub use generate::{generate, GenerationOutput};

pub use rowsmith_core::schema::Schema;
pub use rowsmith_core::value::{GeneratedTable, Row, Value};
pub use rowsmith_ddl::{parse_ddl, Diagnostic};
pub use rowsmith_seed::{GenerationReport, UnderfilledTable};

/// Re-exports for `use rowsmith::prelude::*;`.
pub mod prelude {
    pub use crate::{
        export_csv_to_dir, export_json_to_dir, export_sql_to_file, export_sql_to_string, generate,
        Error, GenerationConfig, GenerationOutput,
    };
}
