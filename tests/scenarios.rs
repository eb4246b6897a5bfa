//! End-to-end scenarios (spec.md §8 A-F) exercising the full
//! DDL → generate → export pipeline through the public facade API.

use std::collections::HashSet;

use rowsmith::GenerationConfig;

fn today() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

/// A. Simple PK + CHECK: 5 rows, dense ids 1..5, age within bounds.
#[test]
fn scenario_a_simple_pk_and_check() {
    let ddl = "CREATE TABLE t (id SERIAL PRIMARY KEY, age INT CHECK (age >= 18 AND age <= 30));";
    let config = GenerationConfig::new().seed(42).default_count(5);
    let output = rowsmith::generate(ddl, &config, today()).unwrap();

    let t = &output.tables["t"];
    assert_eq!(t.len(), 5);
    for (i, row) in t.rows.iter().enumerate() {
        assert_eq!(row["id"], rowsmith::Value::Int(i as i64 + 1));
        let rowsmith::Value::Int(age) = row["age"] else { panic!("expected int age") };
        assert!((18..=30).contains(&age));
    }
}

/// B. ENUM via IN: every value is one of the listed constants.
#[test]
fn scenario_b_enum_via_in() {
    let ddl = "CREATE TABLE t (country VARCHAR(20) CHECK (country IN ('A','B','C')));";
    let config = GenerationConfig::new().seed(42).default_count(30);
    let output = rowsmith::generate(ddl, &config, today()).unwrap();

    for row in &output.tables["t"].rows {
        let rowsmith::Value::Text(country) = &row["country"] else { panic!("expected text") };
        assert!(["A", "B", "C"].contains(&country.as_str()));
    }
}

/// C. Composite FK: every seat's theater_id matches an existing theater,
/// and the (row, seat, theater_id) tuples stay unique.
#[test]
fn scenario_c_composite_fk() {
    let ddl = "\
        CREATE TABLE theaters (id SERIAL PRIMARY KEY);\n\
        CREATE TABLE seats (\n\
          row INT,\n\
          seat INT,\n\
          theater_id INT,\n\
          PRIMARY KEY (row, seat, theater_id),\n\
          FOREIGN KEY (theater_id) REFERENCES theaters(id)\n\
        );";
    let config = GenerationConfig::new().seed(42).default_count(3).count("seats", 20);
    let output = rowsmith::generate(ddl, &config, today()).unwrap();

    let theater_ids: HashSet<i64> = output.tables["theaters"]
        .rows
        .iter()
        .map(|r| match r["id"] {
            rowsmith::Value::Int(v) => v,
            _ => panic!("expected int id"),
        })
        .collect();

    let mut seen = HashSet::new();
    for row in &output.tables["seats"].rows {
        let rowsmith::Value::Int(theater_id) = row["theater_id"] else { panic!("expected int fk") };
        assert!(theater_ids.contains(&theater_id));
        let tuple = (row["row"].clone(), row["seat"].clone(), row["theater_id"].clone());
        assert!(seen.insert(format!("{:?}", tuple)));
    }
    assert!(output.tables["seats"].len() <= 60);
}

/// D. Unsatisfiable repair: an impossible CHECK reports underfill instead
/// of aborting the whole run.
#[test]
fn scenario_d_unsatisfiable_check_reports_underfill() {
    let ddl = "CREATE TABLE prices (price DECIMAL(5,2) CHECK (price > 100 AND price < 50));";
    let config = GenerationConfig::new().seed(42).default_count(10);
    let output = rowsmith::generate(ddl, &config, today()).unwrap();

    assert!(output.tables["prices"].is_empty());
    let underfilled = output
        .report
        .underfilled
        .iter()
        .find(|u| u.table == "prices")
        .expect("prices should be reported underfilled");
    assert_eq!(underfilled.produced, 0);
    assert_eq!(underfilled.requested, 10);
}

/// E. Cycle with nullable FK: both tables populate despite the mutual
/// foreign keys.
#[test]
fn scenario_e_cycle_with_nullable_fk() {
    let ddl = "\
        CREATE TABLE a (id SERIAL PRIMARY KEY, b_id INT, FOREIGN KEY (b_id) REFERENCES b(id));\n\
        CREATE TABLE b (id SERIAL PRIMARY KEY, a_id INT, FOREIGN KEY (a_id) REFERENCES a(id));";
    let config = GenerationConfig::new().seed(42).default_count(8);
    let output = rowsmith::generate(ddl, &config, today()).unwrap();

    assert_eq!(output.tables["a"].len(), 8);
    assert_eq!(output.tables["b"].len(), 8);
}

/// F. Regex constraint: every isbn is exactly 13 ASCII digits.
#[test]
fn scenario_f_regex_constraint() {
    let ddl = "CREATE TABLE t (isbn VARCHAR(13) CHECK (isbn ~ '^[0-9]{13}$'));";
    let config = GenerationConfig::new().seed(42).default_count(15);
    let output = rowsmith::generate(ddl, &config, today()).unwrap();

    for row in &output.tables["t"].rows {
        let rowsmith::Value::Text(isbn) = &row["isbn"] else { panic!("expected text") };
        assert_eq!(isbn.len(), 13);
        assert!(isbn.chars().all(|c| c.is_ascii_digit()));
    }
}

/// Determinism (§8 property 5): two runs with identical schema, config,
/// and seed produce byte-identical SQL output.
#[test]
fn determinism_same_seed_yields_identical_sql() {
    let ddl = "CREATE TABLE t (id SERIAL PRIMARY KEY, age INT CHECK (age >= 18 AND age <= 65));";
    let config = GenerationConfig::new().seed(1234).default_count(50);

    let first = rowsmith::generate(ddl, &config, today()).unwrap();
    let second = rowsmith::generate(ddl, &config, today()).unwrap();

    assert_eq!(
        rowsmith::export_sql_to_string(&first),
        rowsmith::export_sql_to_string(&second)
    );
}

/// NOT NULL closure (§8 property 1): a non-nullable column never contains
/// a NULL in the generated output.
#[test]
fn not_null_closure_is_honored() {
    let ddl = "CREATE TABLE t (id SERIAL PRIMARY KEY, name VARCHAR(50) NOT NULL);";
    let config = GenerationConfig::new().seed(9).default_count(30);
    let output = rowsmith::generate(ddl, &config, today()).unwrap();

    for row in &output.tables["t"].rows {
        assert!(!row["name"].is_null());
    }
}
