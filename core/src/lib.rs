//! Shared schema data model for the rowsmith pipeline.
//!
//! `rowsmith-ddl` parses `CREATE TABLE` statements into the [`schema`] types
//! defined here; `rowsmith-expr` parses and evaluates the [`expr::ExprAst`]
//! trees attached to `CHECK` constraints and derives [`domain::ValueDomain`]s
//! from them; `rowsmith-seed` and `rowsmith-export` consume both to produce
//! and render [`value::Value`]s.

pub mod domain;
pub mod expr;
pub mod schema;
pub mod value;

pub use domain::{DomainKind, ValueDomain};
pub use expr::ExprAst;
pub use schema::{
    ColumnDef, DefaultExpr, ForeignKey, RefAction, Schema, SchemaError, TableConstraint,
    TableDef, TypeTag,
};
pub use value::{GeneratedTable, Row, Value};
