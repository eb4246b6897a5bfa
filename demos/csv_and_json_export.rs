//! Generates rows for a schema with an ENUM-style CHECK and writes both
//! CSV and JSON exports to a temp directory.

use rowsmith::GenerationConfig;

fn main() {
    let ddl = "CREATE TABLE orders (\n\
        id SERIAL PRIMARY KEY,\n\
        status VARCHAR(20) CHECK (status IN ('pending', 'shipped', 'delivered')),\n\
        total DECIMAL(10,2) CHECK (total >= 0 AND total <= 10000)\n\
    );";

    let config = GenerationConfig::new().seed(7).default_count(25);
    let today = chrono::Local::now().date_naive();
    let output = rowsmith::generate(ddl, &config, today).expect("generation failed");

    let dir = std::env::temp_dir().join("rowsmith-demo");
    rowsmith::export_csv_to_dir(&output, &dir).expect("csv export failed");
    rowsmith::export_json_to_dir(&output, &dir).expect("json export failed");

    println!("wrote orders.csv and orders.json to {}", dir.display());
}
