//! Parses a small schema, generates rows, and prints the SQL export.

use rowsmith::GenerationConfig;

fn main() {
    let ddl = "\
        CREATE TABLE theaters (id SERIAL PRIMARY KEY, name VARCHAR(100));\n\
        CREATE TABLE seats (\n\
          id SERIAL PRIMARY KEY,\n\
          row INT CHECK (row >= 1 AND row <= 20),\n\
          seat INT CHECK (seat >= 1 AND seat <= 10),\n\
          theater_id INT,\n\
          FOREIGN KEY (theater_id) REFERENCES theaters(id)\n\
        );";

    let config = GenerationConfig::new().seed(42).default_count(5).count("seats", 20);
    let today = chrono::Local::now().date_naive();

    let output = rowsmith::generate(ddl, &config, today).expect("generation failed");
    if !output.report.underfilled.is_empty() {
        for underfilled in &output.report.underfilled {
            eprintln!(
                "warning: {} only produced {}/{} rows",
                underfilled.table, underfilled.produced, underfilled.requested
            );
        }
    }

    println!("{}", rowsmith::export_sql_to_string(&output));
}
