//! Lexer and recursive-descent parser that turn `CREATE TABLE` DDL text into
//! a [`rowsmith_core::Schema`] (spec §4.1).

pub mod diagnostic;
pub mod error;
mod lexer;
pub mod parser;

pub use diagnostic::Diagnostic;
pub use error::ParseError;
pub use parser::parse_ddl;

#[cfg(test)]
mod tests {
    use super::*;
    use rowsmith_core::schema::TypeTag;

    #[test]
    fn parses_simple_primary_key_and_check() {
        let (schema, diags) = parse_ddl(
            "CREATE TABLE t (id SERIAL PRIMARY KEY, age INT CHECK (age >= 18 AND age <= 30));",
        )
        .unwrap();
        assert!(diags.is_empty());
        let table = schema.get("t").unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.column("id").unwrap().type_tag, TypeTag::Serial);
        assert!(!table.column("id").unwrap().nullable);
        assert_eq!(table.primary_key(), Some(&["id".to_string()][..]));
        assert_eq!(table.checks().count(), 1);
    }

    #[test]
    fn parses_enum_via_in_check() {
        let (schema, _) = parse_ddl(
            "CREATE TABLE t (country VARCHAR(20) CHECK (country IN ('A','B','C')));",
        )
        .unwrap();
        let table = schema.get("t").unwrap();
        assert_eq!(table.column("country").unwrap().type_tag, TypeTag::Varchar(20));
    }

    #[test]
    fn parses_composite_foreign_key() {
        let (schema, _) = parse_ddl(
            "CREATE TABLE theaters (id SERIAL PRIMARY KEY);\n\
             CREATE TABLE seats (\n\
               row INT,\n\
               seat INT,\n\
               theater_id INT,\n\
               PRIMARY KEY (row, seat, theater_id),\n\
               FOREIGN KEY (theater_id) REFERENCES theaters(id)\n\
             );",
        )
        .unwrap();
        let seats = schema.get("seats").unwrap();
        let fk = seats.foreign_keys().next().unwrap();
        assert_eq!(fk.ref_table, "theaters");
        assert_eq!(fk.ref_columns, vec!["id".to_string()]);
    }

    #[test]
    fn unknown_type_falls_back_to_opaque_with_diagnostic() {
        let (schema, diags) = parse_ddl("CREATE TABLE t (geom GEOMETRY);").unwrap();
        let table = schema.get("t").unwrap();
        assert!(matches!(table.column("geom").unwrap().type_tag, TypeTag::Opaque(_)));
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn unsigned_integer_normalizes_with_warning() {
        let (schema, diags) = parse_ddl("CREATE TABLE t (n BIGINT UNSIGNED);").unwrap();
        let table = schema.get("t").unwrap();
        assert_eq!(table.column("n").unwrap().type_tag, TypeTag::Integer);
        assert!(matches!(diags[0], Diagnostic::UnsignedNormalized { .. }));
    }

    #[test]
    fn later_redefinition_replaces_earlier_table() {
        let (schema, _) = parse_ddl(
            "CREATE TABLE t (a INT); CREATE TABLE t (b INT);",
        )
        .unwrap();
        assert_eq!(schema.len(), 1);
        assert!(schema.get("t").unwrap().column("b").is_some());
    }

    #[test]
    fn backtick_and_double_quoted_identifiers_accepted() {
        let (schema, _) = parse_ddl("CREATE TABLE `t` (\"id\" INT);").unwrap();
        assert!(schema.get("t").unwrap().column("id").is_some());
    }

    #[test]
    fn regex_check_is_retained_verbatim_through_lifting() {
        let (schema, _) = parse_ddl(
            "CREATE TABLE t (isbn VARCHAR(13) CHECK (isbn ~ '^[0-9]{13}$'));",
        )
        .unwrap();
        let table = schema.get("t").unwrap();
        let check = table.checks().next().unwrap();
        assert!(matches!(check, rowsmith_core::expr::ExprAst::Regex(_, _, _)));
    }
}
