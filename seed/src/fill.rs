//! Row generator and repair loop (spec.md §4.6).
//!
//! Produces each table's requested row count column-by-column, validates
//! every candidate against its table's `CHECK`s and `NOT NULL`/uniqueness
//! constraints, and repairs or drops rows that fail. Each foreign key
//! samples one parent tuple per row uniformly at random rather than a
//! deterministic round robin, per spec.md §9's "FK cardinality...
//! mandates uniform."

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;

use rowsmith_core::domain::ValueDomain;
use rowsmith_core::expr::ExprAst;
use rowsmith_core::schema::{Schema, TableDef, TypeTag};
use rowsmith_core::value::{GeneratedTable, Row, Value};
use rowsmith_expr::eval::{eval_bool, EvalContext};
use rowsmith_expr::{default_domain_for_type, extract_domain};

use crate::generator::{Generator, GeneratorKind, PredefinedGen, SerialGen};
use crate::realistic::RealisticPool;
use crate::rng::column_rng;
use crate::topology::Level;

/// Retry budgets from spec.md §6: `max_attempts_per_row` is K1, the first
/// domain-biased resample stage (default 20); `max_attempts_per_value` is
/// K2, the narrowed-domain resample stage (default 10); fields keep the
/// spec's own names even though the K1/K2 stage order reads more naturally
/// the other way round.
#[derive(Debug, Clone, Copy)]
pub struct RepairBudgets {
    pub max_attempts_per_row: usize,
    pub max_attempts_per_value: usize,
    pub max_total_attempt_multiplier: usize,
}

impl Default for RepairBudgets {
    fn default() -> Self {
        Self {
            max_attempts_per_row: 20,
            max_attempts_per_value: 10,
            max_total_attempt_multiplier: 3,
        }
    }
}

/// A non-fatal report that a table fell short of its requested row count
/// (spec.md §4.6 step 4, §7).
#[derive(Debug, Clone)]
pub struct UnderfilledTable {
    pub table: String,
    pub produced: usize,
    pub requested: usize,
    pub last_failures: Vec<String>,
}

/// Accumulated non-fatal diagnostics from a full generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub underfilled: Vec<UnderfilledTable>,
}

/// Per-column overrides resolved ahead of generation (global-vs-per-table
/// precedence already applied by the caller, per spec.md §9's two-level
/// lookup design note).
#[derive(Default)]
pub struct ColumnOverrides {
    pub predefined_values: HashMap<(String, String), Vec<Value>>,
    pub kind_overrides: HashMap<(String, String), GeneratorKind>,
    pub generator_overrides: HashMap<(String, String), Arc<dyn Generator>>,
}

/// Everything [`fill_schema`] needs besides the schema itself.
pub struct FillOptions {
    pub seed: u64,
    pub default_count: usize,
    pub table_counts: HashMap<String, usize>,
    pub overrides: ColumnOverrides,
    pub realistic_pool: Arc<dyn RealisticPool>,
    pub guess_column_type_mappings: bool,
    pub threshold_for_guessing: u8,
    pub budgets: RepairBudgets,
    pub current_date: chrono::NaiveDate,
    /// Checked at each level boundary (spec.md §5: "cancellable at level
    /// boundaries"). When set, the caller is responsible for discarding
    /// whatever partial result comes back — this function itself just
    /// stops scheduling further levels.
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Generate every table in the schema, level by level (spec.md §4.5-§4.6).
/// Returns `true` in the third element if a caller-requested cancellation
/// cut the run short.
pub fn fill_schema(
    schema: &Schema,
    levels: &[Level],
    options: &FillOptions,
) -> (HashMap<String, GeneratedTable>, GenerationReport, bool) {
    let mut generated: HashMap<String, GeneratedTable> = HashMap::new();
    let mut report = GenerationReport::default();
    let ctx = EvalContext::new(options.current_date);

    for level in levels {
        if let Some(flag) = &options.cancel {
            if flag.load(Ordering::Relaxed) {
                tracing::debug!("generation cancelled at level boundary");
                return (generated, report, true);
            }
        }

        let count_for = |name: &str| -> usize {
            options.table_counts.get(name).copied().unwrap_or(options.default_count)
        };

        if !level.cyclic {
            let results: Vec<(String, GeneratedTable, Option<UnderfilledTable>)> = level
                .tables
                .par_iter()
                .map(|name| {
                    let table = schema.get(name).expect("level table present in schema");
                    let requested = count_for(name);
                    let (gt, underfill) =
                        fill_table(table, requested, options, &ctx, &generated, None);
                    (name.clone(), gt, underfill)
                })
                .collect();
            for (name, gt, underfill) in results {
                generated.insert(name, gt);
                if let Some(u) = underfill {
                    report.underfilled.push(u);
                }
            }
        } else {
            // Two-phase nullable-first / back-patch fill for a cyclic level
            // (spec.md §4.5, §9): pass 1 defers every in-level FK column,
            // pass 2 back-patches from the now-populated siblings.
            let deferred: HashSet<String> = level.tables.iter().cloned().collect();
            let mut pass1: HashMap<String, GeneratedTable> = HashMap::new();
            for name in &level.tables {
                let table = schema.get(name).expect("level table present in schema");
                let requested = count_for(name);
                let (gt, underfill) =
                    fill_table(table, requested, options, &ctx, &generated, Some(&deferred));
                if let Some(u) = underfill {
                    report.underfilled.push(u);
                }
                pass1.insert(name.clone(), gt);
            }
            for name in &level.tables {
                let table = schema.get(name).expect("level table present in schema");
                back_patch(table, &deferred, &mut pass1, options);
            }
            generated.extend(pass1);
        }
    }

    (generated, report, false)
}

/// Draw a value for one FK column set uniformly from the referenced table's
/// already-generated rows (spec.md §4.6 item 1: "FK columns draw uniformly
/// from the set of already-generated parent key values").
fn sample_fk_tuple(
    rng: &mut StdRng,
    ref_columns: &[String],
    parent: &GeneratedTable,
) -> Option<Vec<Value>> {
    if parent.rows.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..parent.rows.len());
    let row = &parent.rows[idx];
    let tuple: Vec<Value> = ref_columns.iter().map(|c| row.get(c).cloned().unwrap_or(Value::Null)).collect();
    Some(tuple)
}

fn fill_table(
    table: &TableDef,
    requested: usize,
    options: &FillOptions,
    ctx: &EvalContext,
    already_generated: &HashMap<String, GeneratedTable>,
    defer_fk_within: Option<&HashSet<String>>,
) -> (GeneratedTable, Option<UnderfilledTable>) {
    if requested == 0 || table.columns.is_empty() {
        return (GeneratedTable::new(), None);
    }

    let domains: HashMap<&str, ValueDomain> = table
        .columns
        .iter()
        .map(|c| {
            let checks = table.checks_for_column(&c.name);
            let base = default_domain_for_type(&c.type_tag, ctx.current_date);
            let extracted = extract_domain(&c.name, &checks, &c.type_tag, ctx.current_date);
            (c.name.as_str(), base.intersect(&extracted))
        })
        .collect();

    let generators: HashMap<&str, Box<dyn Generator>> = table
        .columns
        .iter()
        .map(|c| {
            let key = (table.name.clone(), c.name.clone());
            let domain = &domains[c.name.as_str()];
            let gen: Box<dyn Generator> = if let Some(values) = options.overrides.predefined_values.get(&key) {
                Box::new(PredefinedGen { values: values.clone() })
            } else if let Some(g) = options.overrides.generator_overrides.get(&key) {
                Box::new(Arc::clone(g))
            } else if let Some(kind) = options.overrides.kind_overrides.get(&key) {
                kind.clone().into_generator(domain, &c.type_tag, Arc::clone(&options.realistic_pool))
            } else if matches!(c.type_tag, TypeTag::Serial) {
                Box::new(SerialGen)
            } else {
                let kind = crate::inference::infer_generator_kind(
                    c,
                    domain,
                    options.guess_column_type_mappings,
                    options.threshold_for_guessing,
                );
                kind.into_generator(domain, &c.type_tag, Arc::clone(&options.realistic_pool))
            };
            (c.name.as_str(), gen)
        })
        .collect();

    let mut col_rngs: HashMap<&str, StdRng> = table
        .columns
        .iter()
        .map(|c| (c.name.as_str(), column_rng(&table.name, &c.name, options.seed)))
        .collect();

    let pk = table.primary_key().map(|cols| cols.to_vec());
    let unique_sets: Vec<Vec<String>> = table.unique_sets().map(|s| s.to_vec()).collect();
    let mut pk_seen: HashSet<Vec<String>> = HashSet::new();
    let mut unique_seen: Vec<HashSet<Vec<String>>> = vec![HashSet::new(); unique_sets.len()];

    let mut out = GeneratedTable::new();
    let max_total = requested.saturating_mul(options.budgets.max_total_attempt_multiplier).max(requested);
    let mut attempted = 0usize;
    let mut last_failures: Vec<String> = Vec::new();

    while out.len() < requested && attempted < max_total {
        attempted += 1;
        let row_index = out.len();
        let mut row: Row = Row::new();

        // Each FK samples one parent tuple and assigns every column in it
        // together, so a composite FK never ends up with columns pulled
        // from different parent rows.
        let mut fk_owned: HashSet<&str> = HashSet::new();
        let mut forced_drop: Option<String> = None;
        for fk in table.foreign_keys() {
            let deferred = defer_fk_within.map(|d| d.contains(&fk.ref_table)).unwrap_or(false);
            for c in &fk.columns {
                fk_owned.insert(c.as_str());
            }
            if deferred {
                for c in &fk.columns {
                    row.insert(c.clone(), Value::Null);
                }
                continue;
            }
            let tuple = already_generated
                .get(&fk.ref_table)
                .and_then(|parent| {
                    let rng = col_rngs.get_mut(fk.columns[0].as_str()).expect("rng present for fk column");
                    sample_fk_tuple(rng, &fk.ref_columns, parent)
                });
            match tuple {
                Some(values) => {
                    for (c, v) in fk.columns.iter().zip(values.into_iter()) {
                        row.insert(c.clone(), v);
                    }
                }
                None => {
                    // spec.md §4.6 item 1: "if the parent set is empty the
                    // row is dropped" — unconditionally, not just when the
                    // FK column happens to be non-nullable. Stuffing NULL
                    // here would let the generic NOT-NULL/CHECK repair
                    // paths paper over a missing referential link.
                    forced_drop = Some(fk.ref_table.clone());
                    break;
                }
            }
        }

        if let Some(ref_table) = forced_drop {
            last_failures.push(format!("foreign key into {:?} has no generated parent rows", ref_table));
            if last_failures.len() > 10 {
                last_failures.truncate(10);
            }
            continue;
        }

        for column in &table.columns {
            if fk_owned.contains(column.name.as_str()) {
                continue;
            }
            let rng = col_rngs.get_mut(column.name.as_str()).expect("rng present for every column");
            let value = generators[column.name.as_str()].sample(rng, row_index);
            row.insert(column.name.clone(), value);
        }

        let mut ok = repair_row(table, &mut row, &domains, &generators, &mut col_rngs, ctx, options, row_index);

        if ok {
            if let Some(cols) = &pk {
                let tuple = projection(&row, cols);
                if tuple.iter().all(|v| *v != Value::Null) && !pk_seen.insert(tuple) {
                    ok = false;
                    last_failures.push(format!("primary key collision on {:?}", cols));
                }
            }
        }
        if ok {
            for (set, seen) in unique_sets.iter().zip(unique_seen.iter_mut()) {
                let tuple = projection(&row, set);
                if tuple.iter().any(|v| *v == Value::Null) {
                    continue;
                }
                if !seen.insert(tuple) {
                    ok = false;
                    last_failures.push(format!("unique constraint collision on {:?}", set));
                    break;
                }
            }
        }

        if ok {
            out.push(row);
        } else if last_failures.len() > 10 {
            last_failures.truncate(10);
        }
    }

    if out.len() < requested {
        last_failures.truncate(10);
        (
            out.clone(),
            Some(UnderfilledTable {
                table: table.name.clone(),
                produced: out.len(),
                requested,
                last_failures,
            }),
        )
    } else {
        (out, None)
    }
}

fn projection(row: &Row, cols: &[String]) -> Vec<Value> {
    cols.iter().map(|c| row.get(c).cloned().unwrap_or(Value::Null)).collect()
}

/// Validate and repair one candidate row in place (spec.md §4.6 steps 2-3).
/// Returns false when the row should be dropped.
fn repair_row(
    table: &TableDef,
    row: &mut Row,
    domains: &HashMap<&str, ValueDomain>,
    generators: &HashMap<&str, Box<dyn Generator>>,
    col_rngs: &mut HashMap<&str, StdRng>,
    ctx: &EvalContext,
    options: &FillOptions,
    row_index: usize,
) -> bool {
    for column in &table.columns {
        // FK-owned columns are never handed to the generic fallback
        // sampler here: candidate construction either filled them from an
        // already-generated parent tuple or force-dropped the row before
        // reaching this point (see the forced-drop branch above), and a
        // typed/realistic generator has no notion of the parent's key set
        // to stay referentially consistent (§8 property 4).
        if table.foreign_keys().any(|fk| fk.columns.contains(&column.name)) {
            continue;
        }
        if !column.nullable && row.get(&column.name).map(Value::is_null).unwrap_or(true) {
            if !resample_until_not_null(column, row, generators, col_rngs, row_index, options.budgets.max_attempts_per_value) {
                return false;
            }
        }
    }

    let checks: Vec<&ExprAst> = table.checks().collect();
    let mut violated: Vec<&ExprAst> = checks
        .iter()
        .filter(|expr| !eval_bool(expr, row, ctx).passes())
        .copied()
        .collect();

    let mut attempts = 0usize;
    while !violated.is_empty() && attempts < options.budgets.max_attempts_per_row {
        attempts += 1;
        // "Repair targets the lexicographically-last referenced column
        // first (heuristic), then widens" (§4.6) — one target per violated
        // expression, deduplicated, in that order.
        let mut targets: Vec<&str> = Vec::new();
        for expr in &violated {
            if let Some(last) = expr.referenced_columns().into_iter().max() {
                if !targets.contains(&last) {
                    targets.push(last);
                }
            }
        }
        for col_name in &targets {
            let Some(column) = table.column(col_name) else { continue };
            if table.foreign_keys().any(|fk| fk.columns.contains(&column.name)) {
                continue;
            }
            let relevant: Vec<&ExprAst> = violated
                .iter()
                .filter(|e| e.referenced_columns().contains(col_name))
                .copied()
                .collect();
            repair_column(column, &relevant, row, domains, generators, col_rngs, ctx, row_index, &options.budgets);
        }
        violated = checks
            .iter()
            .filter(|expr| !eval_bool(expr, row, ctx).passes())
            .copied()
            .collect();
    }

    violated.is_empty()
}

fn resample_until_not_null(
    column: &rowsmith_core::schema::ColumnDef,
    row: &mut Row,
    generators: &HashMap<&str, Box<dyn Generator>>,
    col_rngs: &mut HashMap<&str, StdRng>,
    row_index: usize,
    max_attempts: usize,
) -> bool {
    let Some(gen) = generators.get(column.name.as_str()) else { return false };
    let rng = col_rngs.get_mut(column.name.as_str()).expect("rng present for every column");
    for _ in 0..max_attempts {
        let v = gen.sample(rng, row_index);
        if !v.is_null() {
            row.insert(column.name.clone(), v);
            return true;
        }
    }
    false
}

/// Step 3's two-stage retry for one offending column against the specific
/// predicates it violated: first re-sample from the column's own (already
/// domain-biased) generator up to K1 times; if that doesn't clear the
/// predicate, narrow the domain using the failing expression itself — via
/// the same extractor that built the initial per-column bias (§4.3) — and
/// resample from a generator built on the narrowed domain up to K2 times.
/// Leaves the row with its last-sampled value if both stages exhaust their
/// budget; the caller re-checks all predicates afterward.
#[allow(clippy::too_many_arguments)]
fn repair_column(
    column: &rowsmith_core::schema::ColumnDef,
    violated: &[&ExprAst],
    row: &mut Row,
    domains: &HashMap<&str, ValueDomain>,
    generators: &HashMap<&str, Box<dyn Generator>>,
    col_rngs: &mut HashMap<&str, StdRng>,
    ctx: &EvalContext,
    row_index: usize,
    budgets: &RepairBudgets,
) -> bool {
    let Some(base_gen) = generators.get(column.name.as_str()) else { return false };
    let passes = |row: &Row| violated.iter().all(|e| eval_bool(e, row, ctx).passes());

    for _ in 0..budgets.max_attempts_per_value {
        let rng = col_rngs.get_mut(column.name.as_str()).expect("rng present for every column");
        let v = base_gen.sample(rng, row_index);
        row.insert(column.name.clone(), v);
        if passes(row) {
            return true;
        }
    }

    let narrowed_domain = domains[column.name.as_str()].clone().intersect(&extract_domain(
        &column.name,
        violated,
        &column.type_tag,
        ctx.current_date,
    ));
    let narrowed_gen = crate::inference::infer_generator_kind(column, &narrowed_domain, false, 0)
        .into_generator(&narrowed_domain, &column.type_tag, Arc::new(crate::realistic::DefaultRealisticPool));
    for _ in 0..budgets.max_attempts_per_row {
        let rng = col_rngs.get_mut(column.name.as_str()).expect("rng present for every column");
        let v = narrowed_gen.sample(rng, row_index);
        row.insert(column.name.clone(), v);
        if passes(row) {
            return true;
        }
    }
    false
}

/// Pass 2 of the cyclic-level fill: for every row with a deferred (still
/// `NULL`) FK into a sibling table in the same level, draw a real value now
/// that every sibling has its full row set (spec.md §4.5, §9).
fn back_patch(
    table: &TableDef,
    deferred: &HashSet<String>,
    generated: &mut HashMap<String, GeneratedTable>,
    options: &FillOptions,
) {
    let fks: Vec<_> = table
        .foreign_keys()
        .filter(|fk| deferred.contains(&fk.ref_table))
        .cloned()
        .collect();
    if fks.is_empty() {
        return;
    }

    let mut rng = column_rng(&table.name, "__backpatch", options.seed);
    let siblings: HashMap<String, GeneratedTable> = fks
        .iter()
        .filter_map(|fk| generated.get(&fk.ref_table).map(|gt| (fk.ref_table.clone(), gt.clone())))
        .collect();

    let Some(rows) = generated.get_mut(&table.name) else { return };
    for (row_index, row) in rows.rows.iter_mut().enumerate() {
        for fk in &fks {
            let is_self = fk.ref_table == table.name;
            let parent = if is_self { None } else { siblings.get(&fk.ref_table) };
            let column_is_null = fk
                .columns
                .iter()
                .all(|c| row.get(c).map(Value::is_null).unwrap_or(true));
            if !column_is_null {
                continue;
            }
            let column_nullable = fk
                .columns
                .iter()
                .all(|c| table.column(c).map(|cd| cd.nullable).unwrap_or(true));

            if is_self {
                if row_index == 0 {
                    if column_nullable {
                        continue;
                    }
                    // First row self-references: fill from its own (already
                    // generated) PK values, the documented §4.6 edge case.
                    if let Some(pk) = table.primary_key() {
                        for (fk_col, ref_col) in fk.columns.iter().zip(fk.ref_columns.iter()) {
                            if pk.contains(ref_col) {
                                if let Some(v) = row.get(ref_col).cloned() {
                                    row.insert(fk_col.clone(), v);
                                }
                            }
                        }
                    }
                    continue;
                }
                continue;
            }

            let Some(parent) = parent else { continue };
            if parent.rows.is_empty() {
                continue;
            }
            let idx = rng.random_range(0..parent.rows.len());
            let parent_row = &parent.rows[idx];
            for (fk_col, ref_col) in fk.columns.iter().zip(fk.ref_columns.iter()) {
                if let Some(v) = parent_row.get(ref_col).cloned() {
                    row.insert(fk_col.clone(), v);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realistic::DefaultRealisticPool;
    use rowsmith_core::schema::{ColumnDef, TableConstraint};
    use rust_decimal::Decimal;

    fn base_options() -> FillOptions {
        FillOptions {
            seed: 7,
            default_count: 5,
            table_counts: HashMap::new(),
            overrides: ColumnOverrides::default(),
            realistic_pool: Arc::new(DefaultRealisticPool),
            guess_column_type_mappings: false,
            threshold_for_guessing: 80,
            budgets: RepairBudgets::default(),
            current_date: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            cancel: None,
        }
    }

    #[test]
    fn simple_table_fills_requested_row_count_with_dense_serial() {
        let mut table = TableDef::new("t");
        table.columns.push(ColumnDef::new("id", TypeTag::Serial));
        let mut age = ColumnDef::new("age", TypeTag::Integer);
        age.nullable = false;
        table.columns.push(age);
        table.constraints.push(TableConstraint::PrimaryKey(vec!["id".into()]));

        let mut schema = Schema::new();
        schema.insert(table);
        let levels = crate::topology::compute_levels(&schema).unwrap();
        let options = base_options();
        let (generated, report, _cancelled) = fill_schema(&schema, &levels, &options);
        assert!(report.underfilled.is_empty());
        let t = &generated["t"];
        assert_eq!(t.len(), 5);
        for (i, row) in t.rows.iter().enumerate() {
            assert_eq!(row["id"], Value::Int(i as i64 + 1));
            assert!(!row["age"].is_null());
        }
    }

    #[test]
    fn unsatisfiable_check_reports_underfill_without_aborting() {
        use rowsmith_core::expr::{BinOp, ExprAst, Literal};
        let mut table = TableDef::new("prices");
        let mut price = ColumnDef::new("price", TypeTag::Decimal(5, 2));
        price.nullable = false;
        table.columns.push(price);
        let impossible = ExprAst::BinaryOp(
            BinOp::And,
            Box::new(ExprAst::BinaryOp(
                BinOp::Gt,
                Box::new(ExprAst::ColumnRef("price".into())),
                Box::new(ExprAst::Literal(Literal::Decimal(Decimal::from(100)))),
            )),
            Box::new(ExprAst::BinaryOp(
                BinOp::Lt,
                Box::new(ExprAst::ColumnRef("price".into())),
                Box::new(ExprAst::Literal(Literal::Decimal(Decimal::from(50)))),
            )),
        );
        table.constraints.push(TableConstraint::Check(impossible));

        let mut schema = Schema::new();
        schema.insert(table);
        let levels = crate::topology::compute_levels(&schema).unwrap();
        let mut options = base_options();
        options.default_count = 10;
        let (generated, report, _cancelled) = fill_schema(&schema, &levels, &options);
        assert_eq!(generated["prices"].len(), 0);
        assert_eq!(report.underfilled.len(), 1);
        assert_eq!(report.underfilled[0].produced, 0);
        assert_eq!(report.underfilled[0].requested, 10);
    }

    #[test]
    fn composite_fk_references_existing_parent_row() {
        let mut theaters = TableDef::new("theaters");
        theaters.columns.push(ColumnDef::new("id", TypeTag::Serial));
        theaters.constraints.push(TableConstraint::PrimaryKey(vec!["id".into()]));

        let mut seats = TableDef::new("seats");
        seats.columns.push(ColumnDef::new("row_no", TypeTag::Integer));
        seats.columns.push(ColumnDef::new("theater_id", TypeTag::Integer));
        seats.constraints.push(TableConstraint::ForeignKey(rowsmith_core::schema::ForeignKey {
            columns: vec!["theater_id".into()],
            ref_table: "theaters".into(),
            ref_columns: vec!["id".into()],
            on_delete: None,
            on_update: None,
        }));

        let mut schema = Schema::new();
        schema.insert(theaters);
        schema.insert(seats);
        let levels = crate::topology::compute_levels(&schema).unwrap();
        let mut options = base_options();
        options.table_counts.insert("theaters".into(), 3);
        options.table_counts.insert("seats".into(), 20);
        let (generated, _report, _cancelled) = fill_schema(&schema, &levels, &options);
        let theater_ids: HashSet<i64> = generated["theaters"]
            .rows
            .iter()
            .filter_map(|r| match r["id"] {
                Value::Int(n) => Some(n),
                _ => None,
            })
            .collect();
        for row in &generated["seats"].rows {
            if let Value::Int(n) = row["theater_id"] {
                assert!(theater_ids.contains(&n));
            }
        }
    }

    #[test]
    fn not_null_fk_with_empty_parent_drops_every_row_instead_of_fabricating_values() {
        let mut theaters = TableDef::new("theaters");
        theaters.columns.push(ColumnDef::new("id", TypeTag::Serial));
        theaters.constraints.push(TableConstraint::PrimaryKey(vec!["id".into()]));

        let mut seats = TableDef::new("seats");
        let mut theater_id = ColumnDef::new("theater_id", TypeTag::Integer);
        theater_id.nullable = false;
        seats.columns.push(theater_id);
        seats.constraints.push(TableConstraint::ForeignKey(rowsmith_core::schema::ForeignKey {
            columns: vec!["theater_id".into()],
            ref_table: "theaters".into(),
            ref_columns: vec!["id".into()],
            on_delete: None,
            on_update: None,
        }));

        let mut schema = Schema::new();
        schema.insert(theaters);
        schema.insert(seats);
        let levels = crate::topology::compute_levels(&schema).unwrap();
        let mut options = base_options();
        options.table_counts.insert("theaters".into(), 0);
        options.table_counts.insert("seats".into(), 10);
        let (generated, report, _cancelled) = fill_schema(&schema, &levels, &options);

        assert!(generated["theaters"].is_empty());
        assert!(
            generated["seats"].is_empty(),
            "a NOT NULL FK into an empty parent must drop every candidate row, never fabricate a non-referential value"
        );
        let underfilled = report.underfilled.iter().find(|u| u.table == "seats").expect("seats should be reported underfilled");
        assert_eq!(underfilled.produced, 0);
        assert_eq!(underfilled.requested, 10);
    }
}
