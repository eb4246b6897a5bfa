//! The normalized, dialect-independent schema representation (§3).

use std::collections::HashMap;

use crate::expr::ExprAst;
use thiserror::Error;

/// A normalized column type, independent of source dialect (§3, §4.1).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeTag {
    Integer,
    Decimal(u8, u8),
    Varchar(usize),
    Char(usize),
    Text,
    Date,
    Time,
    Timestamp,
    Boolean,
    Serial,
    Enum(Vec<String>),
    /// Unrecognized source type (§4.1: "Unknown types become TypeTag `OPAQUE`").
    Opaque(String),
}

impl TypeTag {
    pub fn is_integer(&self) -> bool {
        matches!(self, TypeTag::Integer | TypeTag::Serial)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeTag::Integer | TypeTag::Serial | TypeTag::Decimal(_, _))
    }

    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            TypeTag::Varchar(_) | TypeTag::Char(_) | TypeTag::Text | TypeTag::Opaque(_)
        )
    }

    pub fn max_length(&self) -> Option<usize> {
        match self {
            TypeTag::Varchar(n) | TypeTag::Char(n) => Some(*n),
            _ => None,
        }
    }
}

/// A default value expression attached to a column (`DEFAULT expr`).
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultExpr {
    Literal(crate::expr::Literal),
    CurrentDate,
    Expr(ExprAst),
}

/// `ON DELETE` / `ON UPDATE` referential actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefAction {
    NoAction,
    Cascade,
    SetNull,
    Restrict,
    SetDefault,
}

/// One column definition (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub type_tag: TypeTag,
    pub nullable: bool,
    pub default: Option<DefaultExpr>,
    /// Indices into the owning `TableDef::constraints` that mention this
    /// column ("the column's attached constraint list (subset of table
    /// constraints scoped to this column)").
    pub attached_constraints: Vec<usize>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, type_tag: TypeTag) -> Self {
        Self {
            name: name.into(),
            type_tag,
            nullable: true,
            default: None,
            attached_constraints: Vec::new(),
        }
    }
}

/// A foreign key from this table into another.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub ref_table: String,
    pub ref_columns: Vec<String>,
    pub on_delete: Option<RefAction>,
    pub on_update: Option<RefAction>,
}

/// A table-level constraint (§3). `SERIAL` columns imply an extra
/// `NotNull` + `Unique` that the parser materializes explicitly so the
/// rest of the pipeline never special-cases the type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    PrimaryKey(Vec<String>),
    Unique(Vec<String>),
    NotNull(String),
    Check(ExprAst),
    ForeignKey(ForeignKey),
}

/// One table's full definition (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraint>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn primary_key(&self) -> Option<&[String]> {
        self.constraints.iter().find_map(|c| match c {
            TableConstraint::PrimaryKey(cols) => Some(cols.as_slice()),
            _ => None,
        })
    }

    pub fn unique_sets(&self) -> impl Iterator<Item = &[String]> {
        self.constraints.iter().filter_map(|c| match c {
            TableConstraint::Unique(cols) => Some(cols.as_slice()),
            _ => None,
        })
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.constraints.iter().filter_map(|c| match c {
            TableConstraint::ForeignKey(fk) => Some(fk),
            _ => None,
        })
    }

    pub fn checks(&self) -> impl Iterator<Item = &ExprAst> {
        self.constraints.iter().filter_map(|c| match c {
            TableConstraint::Check(expr) => Some(expr),
            _ => None,
        })
    }

    /// `CHECK` expressions that mention `column`, used by the domain
    /// extractor (§4.3).
    pub fn checks_for_column<'a>(&'a self, column: &'a str) -> Vec<&'a ExprAst> {
        self.checks()
            .filter(|e| e.referenced_columns().contains(&column))
            .collect()
    }
}

/// Schema validation failures (§3 invariants).
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("table {table:?} constraint references unknown column {column:?}")]
    UnknownColumn { table: String, column: String },
    #[error("foreign key on {table:?} references unknown table {ref_table:?}")]
    UnknownRefTable { table: String, ref_table: String },
    #[error("foreign key on {table:?} references unknown column {ref_table:?}.{ref_column:?}")]
    UnknownRefColumn {
        table: String,
        ref_table: String,
        ref_column: String,
    },
}

/// Mapping from table name to its definition, preserving insertion order
/// (§3: "Insertion order of tables is preserved for deterministic replay").
/// Equality on table names is case-sensitive (`HashMap<String, _>` + a
/// parallel `Vec<String>` for order, rather than a sorted `BTreeMap` which
/// would silently reorder tables alphabetically).
#[derive(Debug, Clone, Default)]
pub struct Schema {
    order: Vec<String>,
    tables: HashMap<String, TableDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a table, preserving its original position on replace.
    pub fn insert(&mut self, table: TableDef) {
        if !self.tables.contains_key(&table.name) {
            self.order.push(table.name.clone());
        }
        self.tables.insert(table.name.clone(), table);
    }

    pub fn get(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    /// Tables in insertion (declaration) order.
    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.order.iter().map(move |name| &self.tables[name])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Validate the §3 cross-table invariants: every column referenced in a
    /// constraint exists, and every FK reference resolves.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for table in self.tables() {
            for constraint in &table.constraints {
                match constraint {
                    TableConstraint::PrimaryKey(cols) | TableConstraint::Unique(cols) => {
                        for c in cols {
                            self.require_column(table, c)?;
                        }
                    }
                    TableConstraint::NotNull(c) => self.require_column(table, c)?,
                    TableConstraint::Check(expr) => {
                        for c in expr.referenced_columns() {
                            self.require_column(table, c)?;
                        }
                    }
                    TableConstraint::ForeignKey(fk) => {
                        for c in &fk.columns {
                            self.require_column(table, c)?;
                        }
                        let ref_table =
                            self.get(&fk.ref_table).ok_or_else(|| SchemaError::UnknownRefTable {
                                table: table.name.clone(),
                                ref_table: fk.ref_table.clone(),
                            })?;
                        for c in &fk.ref_columns {
                            if ref_table.column(c).is_none() {
                                return Err(SchemaError::UnknownRefColumn {
                                    table: table.name.clone(),
                                    ref_table: fk.ref_table.clone(),
                                    ref_column: c.clone(),
                                });
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn require_column(&self, table: &TableDef, column: &str) -> Result<(), SchemaError> {
        if table.column(column).is_none() {
            return Err(SchemaError::UnknownColumn {
                table: table.name.clone(),
                column: column.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_preserved() {
        let mut schema = Schema::new();
        schema.insert(TableDef::new("zebras"));
        schema.insert(TableDef::new("apples"));
        let names: Vec<&str> = schema.tables().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["zebras", "apples"]);
    }

    #[test]
    fn replace_keeps_original_position() {
        let mut schema = Schema::new();
        schema.insert(TableDef::new("a"));
        schema.insert(TableDef::new("b"));
        schema.insert(TableDef::new("a"));
        let names: Vec<&str> = schema.tables().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn validate_rejects_unknown_fk_target() {
        let mut table = TableDef::new("orders");
        table.columns.push(ColumnDef::new("customer_id", TypeTag::Integer));
        table.constraints.push(TableConstraint::ForeignKey(ForeignKey {
            columns: vec!["customer_id".into()],
            ref_table: "customers".into(),
            ref_columns: vec!["id".into()],
            on_delete: None,
            on_update: None,
        }));
        let mut schema = Schema::new();
        schema.insert(table);
        assert_eq!(
            schema.validate(),
            Err(SchemaError::UnknownRefTable {
                table: "orders".into(),
                ref_table: "customers".into()
            })
        );
    }

    #[test]
    fn validate_accepts_self_reference() {
        let mut table = TableDef::new("employees");
        table.columns.push(ColumnDef::new("id", TypeTag::Serial));
        table.columns.push(ColumnDef::new("manager_id", TypeTag::Integer));
        table.constraints.push(TableConstraint::ForeignKey(ForeignKey {
            columns: vec!["manager_id".into()],
            ref_table: "employees".into(),
            ref_columns: vec!["id".into()],
            on_delete: None,
            on_update: None,
        }));
        let mut schema = Schema::new();
        schema.insert(table);
        assert!(schema.validate().is_ok());
    }
}
