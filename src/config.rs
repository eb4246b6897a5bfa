//! [`GenerationConfig`]: the builder a caller fills in before calling
//! [`crate::generate`], with fluent `self -> Self` setters scoped by
//! plain table/column name strings rather than compile-time schema
//! handles, since this system has no generated Rust types to borrow
//! those from.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rowsmith_core::value::{Row, Value};
use rowsmith_expr::eval::{eval_bool, EvalContext, Tri};
use rowsmith_seed::{ColumnOverrides, FillOptions, Generator, GeneratorKind, RealisticPool, RepairBudgets};

use crate::error::Error;

/// `table_name`-or-`"global"` scoping key used throughout §6's
/// configuration surface ("scopes: table-name or `global`").
const GLOBAL: &str = "global";

/// Row-generation options (spec.md §6). Construct with [`GenerationConfig::new`]
/// and chain setters, then pass to [`crate::generate`].
pub struct GenerationConfig {
    seed: u64,
    default_count: usize,
    table_counts: HashMap<String, usize>,
    predefined_global: HashMap<String, Vec<Value>>,
    predefined_table: HashMap<(String, String), Vec<Value>>,
    kind_global: HashMap<String, GeneratorKind>,
    kind_table: HashMap<(String, String), GeneratorKind>,
    generator_table: HashMap<(String, String), Arc<dyn Generator>>,
    guess_column_type_mappings: bool,
    threshold_for_guessing: u8,
    budgets: RepairBudgets,
    realistic_pool: Option<Arc<dyn RealisticPool>>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            default_count: 10,
            table_counts: HashMap::new(),
            predefined_global: HashMap::new(),
            predefined_table: HashMap::new(),
            kind_global: HashMap::new(),
            kind_table: HashMap::new(),
            generator_table: HashMap::new(),
            guess_column_type_mappings: false,
            threshold_for_guessing: 80,
            budgets: RepairBudgets::default(),
            realistic_pool: None,
            cancel: None,
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic randomness seed (§6: `seed`, optional — default 0).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Default rows per table (§6: `num_rows`, default 10).
    pub fn default_count(mut self, count: usize) -> Self {
        self.default_count = count;
        self
    }

    /// Row count override for one table (§6: `num_rows_per_table`).
    pub fn count(mut self, table: impl Into<String>, count: usize) -> Self {
        self.table_counts.insert(table.into(), count);
        self
    }

    /// Constrain a column's sampler to a fixed list of values (§6:
    /// `predefined_values`). `scope` is `"global"` or a table name;
    /// table-specific entries win over global ones.
    pub fn predefined_values(
        mut self,
        scope: impl Into<String>,
        column: impl Into<String>,
        values: Vec<Value>,
    ) -> Self {
        let scope = scope.into();
        if scope == GLOBAL {
            self.predefined_global.insert(column.into(), values);
        } else {
            self.predefined_table.insert((scope, column.into()), values);
        }
        self
    }

    /// Force a column onto a named [`GeneratorKind`] (§6:
    /// `column_type_mappings`), same scoping as [`Self::predefined_values`].
    pub fn column_type_mapping(
        mut self,
        scope: impl Into<String>,
        column: impl Into<String>,
        kind: GeneratorKind,
    ) -> Self {
        let scope = scope.into();
        if scope == GLOBAL {
            self.kind_global.insert(column.into(), kind);
        } else {
            self.kind_table.insert((scope, column.into()), kind);
        }
        self
    }

    /// Force a column onto a fully custom [`Generator`] implementation.
    /// Table-scoped only — a free-standing `Generator` has no way to know
    /// which table's RNG/row-index it's being driven by ahead of time.
    pub fn generator(mut self, table: impl Into<String>, column: impl Into<String>, gen: Arc<dyn Generator>) -> Self {
        self.generator_table.insert((table.into(), column.into()), gen);
        self
    }

    /// Enable `strsim`-scored fuzzy matching of column names against the
    /// realistic-generator registry (§6: `guess_column_type_mappings`).
    pub fn guess_column_type_mappings(mut self, enabled: bool) -> Self {
        self.guess_column_type_mappings = enabled;
        self
    }

    /// Minimum similarity score (0-100) for a fuzzy match to fire (§6:
    /// `threshold_for_guessing`, default 80).
    pub fn threshold_for_guessing(mut self, threshold: u8) -> Self {
        self.threshold_for_guessing = threshold;
        self
    }

    /// §6: `max_attempts_per_row` (K1, default 20).
    pub fn max_attempts_per_row(mut self, attempts: usize) -> Self {
        self.budgets.max_attempts_per_row = attempts;
        self
    }

    /// §6: `max_attempts_per_value` (K2, default 10).
    pub fn max_attempts_per_value(mut self, attempts: usize) -> Self {
        self.budgets.max_attempts_per_value = attempts;
        self
    }

    /// §6: `max_total_attempt_multiplier` (K3, default 3).
    pub fn max_total_attempt_multiplier(mut self, multiplier: usize) -> Self {
        self.budgets.max_total_attempt_multiplier = multiplier;
        self
    }

    /// Supply a richer [`RealisticPool`] than the in-crate default (§4.4:
    /// the realistic-string source is an injected provider).
    pub fn realistic_pool(mut self, pool: Arc<dyn RealisticPool>) -> Self {
        self.realistic_pool = Some(pool);
        self
    }

    /// Share a flag a caller can flip to cancel an in-flight run at the
    /// next dependency-level boundary (§5).
    pub fn cancellation_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub(crate) fn default_count_value(&self) -> usize {
        self.default_count
    }

    pub(crate) fn table_counts_clone(&self) -> HashMap<String, usize> {
        self.table_counts.clone()
    }

    pub(crate) fn seed_value(&self) -> u64 {
        self.seed
    }

    pub(crate) fn cancel_flag(&self) -> Option<Arc<AtomicBool>> {
        self.cancel.clone()
    }

    /// Resolve every per-column override against `schema`, applying the
    /// global-then-table-override precedence (§9's two-level lookup design
    /// note), and validate that no predefined value already violates its
    /// column's `CHECK`s (§7: `ConfigError::PredefinedValueViolatesCheck`,
    /// surfaced at run start rather than discovered mid-generation).
    pub(crate) fn resolve(
        &self,
        schema: &rowsmith_core::schema::Schema,
        current_date: chrono::NaiveDate,
    ) -> Result<FillOptions, Error> {
        let mut overrides = ColumnOverrides::default();
        let ctx = EvalContext::new(current_date);

        for table in schema.tables() {
            for column in &table.columns {
                let key = (table.name.clone(), column.name.clone());

                let values = self
                    .predefined_table
                    .get(&key)
                    .or_else(|| self.predefined_global.get(&column.name))
                    .cloned();
                if let Some(values) = values {
                    for value in &values {
                        let mut probe: Row = Row::new();
                        probe.insert(column.name.clone(), value.clone());
                        for check in table.checks_for_column(&column.name) {
                            if let Tri::False = eval_bool(check, &probe, &ctx) {
                                return Err(rowsmith_seed::ConfigError::PredefinedValueViolatesCheck {
                                    table: table.name.clone(),
                                    column: column.name.clone(),
                                    value: format!("{value}"),
                                }
                                .into());
                            }
                        }
                    }
                    overrides.predefined_values.insert(key.clone(), values);
                    continue;
                }

                if let Some(kind) = self.kind_table.get(&key).or_else(|| self.kind_global.get(&column.name)) {
                    overrides.kind_overrides.insert(key.clone(), kind.clone());
                }
                if let Some(gen) = self.generator_table.get(&key) {
                    overrides.generator_overrides.insert(key, Arc::clone(gen));
                }
            }
        }

        Ok(FillOptions {
            seed: self.seed,
            default_count: self.default_count,
            table_counts: self.table_counts.clone(),
            overrides,
            realistic_pool: self
                .realistic_pool
                .clone()
                .unwrap_or_else(|| Arc::new(rowsmith_seed::DefaultRealisticPool)),
            guess_column_type_mappings: self.guess_column_type_mappings,
            threshold_for_guessing: self.threshold_for_guessing,
            budgets: self.budgets,
            current_date,
            cancel: self.cancel.clone(),
        })
    }
}
