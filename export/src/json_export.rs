//! JSON export (spec.md §4.7): one file per table, an array of row
//! objects keyed by column name in declaration order. Decimals are
//! emitted as strings to avoid float rounding of arbitrary-precision
//! values.

use serde_json::{Map, Value as JsonValue};

use rowsmith_core::schema::Schema;
use rowsmith_core::value::{GeneratedTable, Value};

use crate::error::ExportError;

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Int(v) => JsonValue::from(*v),
        Value::Decimal(v) => JsonValue::String(v.to_string()),
        Value::Bool(v) => JsonValue::from(*v),
        Value::Text(v) | Value::Date(v) | Value::Time(v) | Value::Timestamp(v) => {
            JsonValue::String(v.clone())
        }
    }
}

/// Render one table to a JSON array of objects, columns in declaration
/// order (relies on the `preserve_order` feature so that order survives
/// into the serialized output).
pub fn render_json(table_name: &str, schema: &Schema, generated: &GeneratedTable) -> Result<String, ExportError> {
    let table = schema
        .get(table_name)
        .unwrap_or_else(|| panic!("unknown table {table_name:?} passed to render_json"));
    let columns: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();

    let rows: Vec<JsonValue> = generated
        .rows
        .iter()
        .map(|row| {
            let mut object = Map::new();
            for column in &columns {
                let value = row.get(*column).unwrap_or(&Value::Null);
                object.insert(column.to_string(), value_to_json(value));
            }
            JsonValue::Object(object)
        })
        .collect();

    serde_json::to_string_pretty(&JsonValue::Array(rows))
        .map_err(|source| ExportError::Json { table: table_name.to_string(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsmith_core::schema::{ColumnDef, TableDef, TypeTag};
    use rowsmith_core::value::Row;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn columns_stay_in_declaration_order_and_decimals_are_strings() {
        let mut table = TableDef::new("orders");
        table.columns.push(ColumnDef::new("id", TypeTag::Serial));
        table.columns.push(ColumnDef::new("total", TypeTag::Decimal(10, 2)));
        let mut schema = Schema::new();
        schema.insert(table);

        let mut gt = GeneratedTable::new();
        let mut row: Row = Row::new();
        row.insert("total".into(), Value::Decimal(Decimal::from_str("19.99").unwrap()));
        row.insert("id".into(), Value::Int(1));
        gt.push(row);

        let json = render_json("orders", &schema, &gt).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &parsed[0];
        let keys: Vec<&String> = first.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["id", "total"]);
        assert_eq!(first["total"], serde_json::Value::String("19.99".to_string()));
    }

    #[test]
    fn null_becomes_json_null() {
        let mut table = TableDef::new("people");
        table.columns.push(ColumnDef::new("nickname", TypeTag::Text));
        let mut schema = Schema::new();
        schema.insert(table);

        let mut gt = GeneratedTable::new();
        let mut row: Row = Row::new();
        row.insert("nickname".into(), Value::Null);
        gt.push(row);

        let json = render_json("people", &schema, &gt).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["nickname"], serde_json::Value::Null);
    }
}
