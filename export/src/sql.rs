//! SQL `INSERT` batch rendering (spec.md §4.7, §6).

use std::collections::HashMap;

use rowsmith_core::schema::Schema;
use rowsmith_core::value::{GeneratedTable, Value};

use crate::batch;

/// Render every table in `table_order` as `INSERT INTO ... VALUES (...);`
/// batches, concatenated into one string with a trailing newline (§6: "one
/// file, concatenated `INSERT` statements, table order = topological
/// order, terminating semicolons, trailing newline").
pub fn render_sql_inserts(
    schema: &Schema,
    table_order: &[String],
    tables: &HashMap<String, GeneratedTable>,
) -> String {
    let mut out = String::new();
    for name in table_order {
        let Some(table) = schema.get(name) else { continue };
        let Some(generated) = tables.get(name) else { continue };
        if generated.rows.is_empty() {
            continue;
        }
        let columns: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        let column_list = columns.join(", ");

        let rendered: Vec<String> = generated
            .rows
            .iter()
            .map(|row| {
                let values: Vec<String> = columns
                    .iter()
                    .map(|c| row.get(*c).unwrap_or(&Value::Null).to_sql_literal())
                    .collect();
                format!("({})", values.join(", "))
            })
            .collect();

        for chunk in batch::chunk_rows(&rendered, batch::MAX_BATCH_ROWS, batch::MAX_BATCH_BYTES) {
            tracing::debug!(table = %name, rows = chunk.len(), "emitting INSERT batch");
            out.push_str("INSERT INTO ");
            out.push_str(name);
            out.push_str(" (");
            out.push_str(&column_list);
            out.push_str(") VALUES ");
            out.push_str(&chunk.join(", "));
            out.push_str(";\n");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsmith_core::schema::{ColumnDef, TableDef, TypeTag};
    use rowsmith_core::value::Row;

    #[test]
    fn renders_insert_with_column_list_and_literals() {
        let mut table = TableDef::new("t");
        table.columns.push(ColumnDef::new("id", TypeTag::Serial));
        table.columns.push(ColumnDef::new("name", TypeTag::Text));
        let mut schema = Schema::new();
        schema.insert(table);

        let mut gt = GeneratedTable::new();
        let mut row: Row = Row::new();
        row.insert("id".into(), Value::Int(1));
        row.insert("name".into(), Value::Text("O'Brien".into()));
        gt.push(row);

        let mut tables = HashMap::new();
        tables.insert("t".to_string(), gt);

        let sql = render_sql_inserts(&schema, &["t".to_string()], &tables);
        assert_eq!(sql, "INSERT INTO t (id, name) VALUES (1, 'O''Brien');\n");
    }

    #[test]
    fn empty_table_emits_nothing() {
        let mut table = TableDef::new("t");
        table.columns.push(ColumnDef::new("id", TypeTag::Serial));
        let mut schema = Schema::new();
        schema.insert(table);
        let mut tables = HashMap::new();
        tables.insert("t".to_string(), GeneratedTable::new());
        assert_eq!(render_sql_inserts(&schema, &["t".to_string()], &tables), "");
    }

    #[test]
    fn missing_value_renders_as_null() {
        let mut table = TableDef::new("t");
        table.columns.push(ColumnDef::new("id", TypeTag::Serial));
        table.columns.push(ColumnDef::new("nickname", TypeTag::Text));
        let mut schema = Schema::new();
        schema.insert(table);

        let mut gt = GeneratedTable::new();
        let mut row: Row = Row::new();
        row.insert("id".into(), Value::Int(1));
        row.insert("nickname".into(), Value::Null);
        gt.push(row);
        let mut tables = HashMap::new();
        tables.insert("t".to_string(), gt);

        let sql = render_sql_inserts(&schema, &["t".to_string()], &tables);
        assert_eq!(sql, "INSERT INTO t (id, nickname) VALUES (1, NULL);\n");
    }
}
