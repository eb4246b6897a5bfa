//! The end-to-end pipeline: parse DDL, validate, schedule, fill, report
//! (spec.md §4), tying `rowsmith-ddl`/`rowsmith-expr`/`rowsmith-seed`
//! together behind one entry point.

use std::collections::HashMap;

use rowsmith_core::schema::Schema;
use rowsmith_core::value::GeneratedTable;
use rowsmith_ddl::Diagnostic;
use rowsmith_seed::GenerationReport;

use crate::config::GenerationConfig;
use crate::error::Error;

/// Everything a successful [`generate`] call produces.
pub struct GenerationOutput {
    /// The normalized schema the DDL parsed into.
    pub schema: Schema,
    /// Per-table generated rows.
    pub tables: HashMap<String, GeneratedTable>,
    /// Topological table order (parents before children), for exporters
    /// that need a deterministic `INSERT` sequence (§6: "table order =
    /// topological order").
    pub table_order: Vec<String>,
    /// Non-fatal parse-time diagnostics (e.g. unknown types, unsigned
    /// normalization).
    pub diagnostics: Vec<Diagnostic>,
    /// Non-fatal per-table underfill reports from the repair loop.
    pub report: GenerationReport,
}

/// Parse `ddl`, validate it, compute its dependency levels, and generate
/// rows per `config` (spec.md §4 end to end).
///
/// `current_date` is captured once by the caller (rather than read
/// internally with `chrono::Local::now()`) so a single run sees one frozen
/// notion of "today" throughout parsing, domain extraction, and
/// generation — and so tests can pin it.
pub fn generate(
    ddl: &str,
    config: &GenerationConfig,
    current_date: chrono::NaiveDate,
) -> Result<GenerationOutput, Error> {
    let (schema, diagnostics) = rowsmith_ddl::parse_ddl(ddl)?;
    schema.validate()?;

    let levels = rowsmith_seed::compute_levels(&schema)?;
    let options = config.resolve(&schema, current_date)?;

    let (tables, report, cancelled) = rowsmith_seed::fill_schema(&schema, &levels, &options);
    if cancelled {
        tracing::debug!("discarding partial results from a cancelled run");
        return Err(Error::Cancelled);
    }

    let table_order: Vec<String> = levels.into_iter().flat_map(|level| level.tables).collect();

    Ok(GenerationOutput { schema, tables, table_order, diagnostics, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    fn today() -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
    }

    #[test]
    fn simple_pk_and_check_produces_requested_rows() {
        let ddl = "CREATE TABLE t (id SERIAL PRIMARY KEY, age INT CHECK (age >= 18 AND age <= 30));";
        let config = GenerationConfig::new().seed(42).default_count(5);
        let out = generate(ddl, &config, today()).unwrap();
        let t = &out.tables["t"];
        assert_eq!(t.len(), 5);
        assert!(out.report.underfilled.is_empty());
    }

    #[test]
    fn cancellation_flag_set_before_run_yields_no_output() {
        let ddl = "CREATE TABLE t (id SERIAL PRIMARY KEY);";
        let flag = Arc::new(AtomicBool::new(true));
        let config = GenerationConfig::new().seed(1).cancellation_flag(flag.clone());
        let result = generate(ddl, &config, today());
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn table_order_is_topological() {
        let ddl = "CREATE TABLE theaters (id SERIAL PRIMARY KEY);\n\
                   CREATE TABLE seats (id SERIAL PRIMARY KEY, theater_id INT, \
                   FOREIGN KEY (theater_id) REFERENCES theaters(id));";
        let config = GenerationConfig::new().seed(42).default_count(3);
        let out = generate(ddl, &config, today()).unwrap();
        let theaters_pos = out.table_order.iter().position(|t| t == "theaters").unwrap();
        let seats_pos = out.table_order.iter().position(|t| t == "seats").unwrap();
        assert!(theaters_pos < seats_pos);
    }
}
