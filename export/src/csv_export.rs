//! CSV export (spec.md §4.7): one file per table, header row of column
//! names, RFC-4180 quoting via the `csv` crate, `NULL` as an empty field.

use rowsmith_core::schema::Schema;
use rowsmith_core::value::{GeneratedTable, Value};

use crate::error::ExportError;

/// Render one table to a CSV string: header row followed by its rows in
/// generation order.
pub fn render_csv(table_name: &str, schema: &Schema, generated: &GeneratedTable) -> Result<String, ExportError> {
    let table = schema
        .get(table_name)
        .unwrap_or_else(|| panic!("unknown table {table_name:?} passed to render_csv"));
    let columns: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(&columns)
        .map_err(|source| ExportError::Csv { table: table_name.to_string(), source })?;

    for row in &generated.rows {
        let fields: Vec<String> = columns
            .iter()
            .map(|c| row.get(*c).unwrap_or(&Value::Null).to_csv_field())
            .collect();
        writer
            .write_record(&fields)
            .map_err(|source| ExportError::Csv { table: table_name.to_string(), source })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv { table: table_name.to_string(), source: e.into_error() })?;
    String::from_utf8(bytes).map_err(|e| ExportError::Csv {
        table: table_name.to_string(),
        source: csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
    })
}
