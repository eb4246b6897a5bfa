//! Universal invariants (spec.md §8, properties 3, 4, 6) checked over a
//! schema exercising unique sets, an FK, and a numeric domain bound.

use rowsmith::GenerationConfig;

fn today() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

const DDL: &str = "\
    CREATE TABLE customers (\n\
      id SERIAL PRIMARY KEY,\n\
      email VARCHAR(255) UNIQUE,\n\
      loyalty_points INT CHECK (loyalty_points >= 0 AND loyalty_points <= 1000)\n\
    );\n\
    CREATE TABLE orders (\n\
      id SERIAL PRIMARY KEY,\n\
      customer_id INT NOT NULL,\n\
      FOREIGN KEY (customer_id) REFERENCES customers(id)\n\
    );";

/// Property 3: UNIQUE projections never repeat among non-NULL values.
#[test]
fn uniqueness_holds_for_unique_columns() {
    let config = GenerationConfig::new().seed(3).default_count(40);
    let output = rowsmith::generate(DDL, &config, today()).unwrap();

    let mut seen = std::collections::HashSet::new();
    for row in &output.tables["customers"].rows {
        let rowsmith::Value::Text(email) = &row["email"] else { panic!("expected text email") };
        assert!(seen.insert(email.clone()), "duplicate email {email}");
    }
}

/// Property 4: every non-NULL FK value matches an existing parent row.
#[test]
fn referential_integrity_holds() {
    let config = GenerationConfig::new().seed(3).default_count(40);
    let output = rowsmith::generate(DDL, &config, today()).unwrap();

    let customer_ids: std::collections::HashSet<i64> = output.tables["customers"]
        .rows
        .iter()
        .map(|r| match r["id"] {
            rowsmith::Value::Int(v) => v,
            _ => panic!("expected int id"),
        })
        .collect();

    for row in &output.tables["orders"].rows {
        let rowsmith::Value::Int(customer_id) = row["customer_id"] else {
            panic!("customer_id is NOT NULL, should never be absent as a value")
        };
        assert!(customer_ids.contains(&customer_id));
    }
}

/// Property 6: every value for a column with an extractable numeric bound
/// lies within that bound (stronger than "check soundness" alone).
#[test]
fn domain_pre_filtering_holds() {
    let config = GenerationConfig::new().seed(3).default_count(40);
    let output = rowsmith::generate(DDL, &config, today()).unwrap();

    for row in &output.tables["customers"].rows {
        let rowsmith::Value::Int(points) = row["loyalty_points"] else { panic!("expected int") };
        assert!((0..=1000).contains(&points));
    }
}
