//! Recursive-descent parser for the `CREATE TABLE` grammar (§4.1).
//!
//! Hand-written over the token stream rather than a parser-combinator
//! crate, matching the scale of the grammar: a handful of statement and
//! clause shapes, not a general-purpose SQL dialect.

use rowsmith_core::schema::{
    ColumnDef, DefaultExpr, ForeignKey, RefAction, Schema, TableConstraint, TableDef, TypeTag,
};

use crate::diagnostic::Diagnostic;
use crate::error::ParseError;
use crate::lexer::{self, LexOutput, Token, TokenKind};

pub fn parse_ddl(input: &str) -> Result<(Schema, Vec<Diagnostic>), ParseError> {
    let lexed = lexer::lex(input)?;
    let mut parser = Parser { lexed, pos: 0, diagnostics: Vec::new(), pending_constraints: Vec::new() };
    let mut schema = Schema::new();
    while !parser.at_eof() {
        while parser.eat_punct(&TokenKind::Semicolon) {}
        if parser.at_eof() {
            break;
        }
        let table = parser.parse_create_table()?;
        if schema.get(&table.name).is_some() {
            tracing::debug!(table = %table.name, "redefining table from later CREATE TABLE statement");
        }
        schema.insert(table);
        while parser.eat_punct(&TokenKind::Semicolon) {}
    }
    Ok((schema, parser.diagnostics))
}

struct Parser {
    lexed: LexOutput,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    /// Constraints discovered inline on a column (`PRIMARY KEY`, `UNIQUE`,
    /// `CHECK`, `REFERENCES`, the implicit `SERIAL` pair) are buffered here
    /// while the column list is being parsed, then spliced into
    /// `TableDef::constraints` by `finalize_attached_constraints` once the
    /// whole table is known. Reset at the start of each `CREATE TABLE`.
    pending_constraints: Vec<TableConstraint>,
}

impl Parser {
    fn tok(&self) -> &Token {
        &self.lexed.tokens[self.pos]
    }

    fn at_eof(&self) -> bool {
        matches!(self.tok().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let t = self.lexed.tokens[self.pos].clone();
        if self.pos + 1 < self.lexed.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn peek_ident_upper(&self) -> Option<String> {
        match &self.tok().kind {
            TokenKind::Ident(s) => Some(s.to_ascii_uppercase()),
            _ => None,
        }
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.peek_ident_upper().as_deref() == Some(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_punct(&mut self, kind: &TokenKind) -> bool {
        if &self.tok().kind == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<(), ParseError> {
        if self.eat_keyword(kw) {
            Ok(())
        } else {
            Err(self.err(kw))
        }
    }

    fn expect_punct(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.eat_punct(&kind) {
            Ok(())
        } else {
            Err(self.err(&format!("{kind}")))
        }
    }

    fn err(&self, expected: &str) -> ParseError {
        ParseError {
            line: self.tok().line,
            column: self.tok().column,
            expected: expected.to_string(),
            found: self.tok().kind.to_string(),
        }
    }

    /// Accepts a bare, backtick-, or double-quote-delimited identifier
    /// (case-preserving; the lexer already strips delimiters).
    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.tok().kind.clone() {
            TokenKind::Ident(s) => {
                self.advance();
                Ok(s)
            }
            _ => Err(self.err("identifier")),
        }
    }

    fn parse_create_table(&mut self) -> Result<TableDef, ParseError> {
        self.expect_keyword("CREATE")?;
        self.expect_keyword("TABLE")?;
        if self.eat_keyword("IF") {
            self.expect_keyword("NOT")?;
            self.expect_keyword("EXISTS")?;
        }
        let name = self.expect_ident()?;
        let mut table = TableDef::new(name.clone());
        self.pending_constraints.clear();
        self.expect_punct(TokenKind::LParen)?;

        loop {
            if self.is_table_constraint_start() {
                let constraint = self.parse_table_constraint(&table.name)?;
                table.constraints.push(constraint);
            } else {
                let column = self.parse_column_def(&table.name)?;
                table.columns.push(column);
            }
            if self.eat_punct(&TokenKind::Comma) {
                continue;
            }
            break;
        }
        self.expect_punct(TokenKind::RParen)?;
        self.finalize_attached_constraints(&mut table);
        Ok(table)
    }

    fn is_table_constraint_start(&self) -> bool {
        matches!(
            self.peek_ident_upper().as_deref(),
            Some("PRIMARY") | Some("UNIQUE") | Some("CHECK") | Some("FOREIGN") | Some("CONSTRAINT")
        )
    }

    fn parse_table_constraint(&mut self, table: &str) -> Result<TableConstraint, ParseError> {
        if self.eat_keyword("CONSTRAINT") {
            self.expect_ident()?; // named constraint: name is discarded, no DB to enforce uniqueness of names against
        }
        if self.eat_keyword("PRIMARY") {
            self.expect_keyword("KEY")?;
            let cols = self.parse_column_list()?;
            return Ok(TableConstraint::PrimaryKey(cols));
        }
        if self.eat_keyword("UNIQUE") {
            let cols = self.parse_column_list()?;
            return Ok(TableConstraint::Unique(cols));
        }
        if self.eat_keyword("CHECK") {
            let expr = self.parse_parenthesized_expr()?;
            return Ok(TableConstraint::Check(expr));
        }
        if self.eat_keyword("FOREIGN") {
            self.expect_keyword("KEY")?;
            let cols = self.parse_column_list()?;
            self.expect_keyword("REFERENCES")?;
            let (ref_table, ref_cols, on_delete, on_update) = self.parse_references_tail()?;
            let _ = table;
            return Ok(TableConstraint::ForeignKey(ForeignKey {
                columns: cols,
                ref_table,
                ref_columns: ref_cols,
                on_delete,
                on_update,
            }));
        }
        Err(self.err("PRIMARY KEY | UNIQUE | CHECK | FOREIGN KEY"))
    }

    fn parse_column_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect_punct(TokenKind::LParen)?;
        let mut cols = Vec::new();
        loop {
            cols.push(self.expect_ident()?);
            if self.eat_punct(&TokenKind::Comma) {
                continue;
            }
            break;
        }
        self.expect_punct(TokenKind::RParen)?;
        Ok(cols)
    }

    fn parse_references_tail(
        &mut self,
    ) -> Result<(String, Vec<String>, Option<RefAction>, Option<RefAction>), ParseError> {
        let ref_table = self.expect_ident()?;
        let ref_cols = self.parse_column_list()?;
        let mut on_delete = None;
        let mut on_update = None;
        loop {
            if self.eat_keyword("ON") {
                if self.eat_keyword("DELETE") {
                    on_delete = Some(self.parse_ref_action()?);
                } else if self.eat_keyword("UPDATE") {
                    on_update = Some(self.parse_ref_action()?);
                } else {
                    return Err(self.err("DELETE | UPDATE"));
                }
                continue;
            }
            break;
        }
        Ok((ref_table, ref_cols, on_delete, on_update))
    }

    fn parse_ref_action(&mut self) -> Result<RefAction, ParseError> {
        if self.eat_keyword("CASCADE") {
            return Ok(RefAction::Cascade);
        }
        if self.eat_keyword("RESTRICT") {
            return Ok(RefAction::Restrict);
        }
        if self.eat_keyword("SET") {
            if self.eat_keyword("NULL") {
                return Ok(RefAction::SetNull);
            }
            if self.eat_keyword("DEFAULT") {
                return Ok(RefAction::SetDefault);
            }
            return Err(self.err("NULL | DEFAULT"));
        }
        if self.eat_keyword("NO") {
            self.expect_keyword("ACTION")?;
            return Ok(RefAction::NoAction);
        }
        Err(self.err("CASCADE | RESTRICT | SET NULL | SET DEFAULT | NO ACTION"))
    }

    fn parse_column_def(&mut self, table: &str) -> Result<ColumnDef, ParseError> {
        let name = self.expect_ident()?;
        let (type_tag, mut auto_increment) = self.parse_type(table, &name)?;
        let mut column = ColumnDef::new(name.clone(), type_tag);
        column.nullable = true;

        let mut saw_not_null = false;
        let mut saw_primary_key = false;
        let mut saw_unique = false;
        let mut pending_check: Vec<rowsmith_core::expr::ExprAst> = Vec::new();
        let mut pending_fk: Option<ForeignKey> = None;

        loop {
            if self.eat_keyword("NOT") {
                self.expect_keyword("NULL")?;
                column.nullable = false;
                saw_not_null = true;
                continue;
            }
            if self.eat_keyword("NULL") {
                continue;
            }
            if self.eat_keyword("PRIMARY") {
                self.expect_keyword("KEY")?;
                saw_primary_key = true;
                column.nullable = false;
                continue;
            }
            if self.eat_keyword("UNIQUE") {
                saw_unique = true;
                continue;
            }
            if self.eat_keyword("AUTO_INCREMENT") || self.eat_keyword("AUTOINCREMENT") {
                auto_increment = true;
                continue;
            }
            if self.eat_keyword("DEFAULT") {
                column.default = Some(self.parse_default_expr()?);
                continue;
            }
            if self.eat_keyword("CHECK") {
                pending_check.push(self.parse_parenthesized_expr()?);
                continue;
            }
            if self.eat_keyword("REFERENCES") {
                let ref_table = self.expect_ident()?;
                let ref_cols = self.parse_column_list()?;
                let mut on_delete = None;
                let mut on_update = None;
                loop {
                    if self.eat_keyword("ON") {
                        if self.eat_keyword("DELETE") {
                            on_delete = Some(self.parse_ref_action()?);
                        } else if self.eat_keyword("UPDATE") {
                            on_update = Some(self.parse_ref_action()?);
                        } else {
                            return Err(self.err("DELETE | UPDATE"));
                        }
                        continue;
                    }
                    break;
                }
                pending_fk = Some(ForeignKey {
                    columns: vec![name.clone()],
                    ref_table,
                    ref_columns: ref_cols,
                    on_delete,
                    on_update,
                });
                continue;
            }
            break;
        }

        let is_serial = matches!(column.type_tag, TypeTag::Serial) || auto_increment;
        if auto_increment && !matches!(column.type_tag, TypeTag::Serial) {
            column.type_tag = TypeTag::Serial;
        }
        if is_serial {
            column.nullable = false;
        }
        let _ = saw_not_null;

        column.attached_constraints = vec![]; // filled in finalize_attached_constraints once table.constraints is whole

        // Column-scoped constraints are materialized as table-level
        // constraints so `TableDef::checks`/`foreign_keys`/etc. have one
        // place to look, matching spec.md §3's ColumnDef note that the
        // attached-constraint list is "a subset of table constraints".
        self.stash_inline_constraints(
            table,
            &name,
            saw_primary_key,
            saw_unique,
            is_serial,
            pending_check,
            pending_fk,
        );

        Ok(column)
    }

    /// Inline constraints discovered while parsing a column are buffered on
    /// the parser and spliced into `table.constraints` by the caller once
    /// the whole column list is known (`TableDef` is built incrementally by
    /// the caller's loop, not by this method, so we stash rather than push
    /// directly).
    fn stash_inline_constraints(
        &mut self,
        _table: &str,
        name: &str,
        primary_key: bool,
        unique: bool,
        serial: bool,
        checks: Vec<rowsmith_core::expr::ExprAst>,
        fk: Option<ForeignKey>,
    ) {
        if primary_key {
            self.pending_constraints.push(TableConstraint::PrimaryKey(vec![name.to_string()]));
        }
        if unique || serial {
            self.pending_constraints.push(TableConstraint::Unique(vec![name.to_string()]));
        }
        if serial {
            self.pending_constraints.push(TableConstraint::NotNull(name.to_string()));
        }
        for check in checks {
            self.pending_constraints.push(TableConstraint::Check(check));
        }
        if let Some(fk) = fk {
            self.pending_constraints.push(TableConstraint::ForeignKey(fk));
        }
    }

    fn finalize_attached_constraints(&mut self, table: &mut TableDef) {
        table.constraints.append(&mut self.pending_constraints);
        for (idx, constraint) in table.constraints.iter().enumerate() {
            let cols: Vec<String> = match constraint {
                TableConstraint::PrimaryKey(c) | TableConstraint::Unique(c) => c.clone(),
                TableConstraint::NotNull(c) => vec![c.clone()],
                TableConstraint::Check(expr) => {
                    expr.referenced_columns().into_iter().map(str::to_string).collect()
                }
                TableConstraint::ForeignKey(fk) => fk.columns.clone(),
            };
            for col_name in cols {
                if let Some(col) = table.columns.iter_mut().find(|c| c.name == col_name) {
                    col.attached_constraints.push(idx);
                }
            }
        }
    }

    fn parse_default_expr(&mut self) -> Result<DefaultExpr, ParseError> {
        if self.eat_keyword("CURRENT_DATE") {
            return Ok(DefaultExpr::CurrentDate);
        }
        if self.tok().kind == TokenKind::LParen {
            let expr = self.parse_parenthesized_expr()?;
            return Ok(DefaultExpr::Expr(expr));
        }
        match self.tok().kind.clone() {
            TokenKind::StringLit(s) => {
                self.advance();
                Ok(DefaultExpr::Literal(rowsmith_core::expr::Literal::String(s)))
            }
            TokenKind::Number(n) => {
                self.advance();
                if n.contains('.') {
                    let d = n.parse().map_err(|_| self.err("numeric literal"))?;
                    Ok(DefaultExpr::Literal(rowsmith_core::expr::Literal::Decimal(d)))
                } else {
                    let v: i64 = n.parse().map_err(|_| self.err("integer literal"))?;
                    Ok(DefaultExpr::Literal(rowsmith_core::expr::Literal::Int(v)))
                }
            }
            TokenKind::Ident(ref s) if s.eq_ignore_ascii_case("TRUE") => {
                self.advance();
                Ok(DefaultExpr::Literal(rowsmith_core::expr::Literal::Bool(true)))
            }
            TokenKind::Ident(ref s) if s.eq_ignore_ascii_case("FALSE") => {
                self.advance();
                Ok(DefaultExpr::Literal(rowsmith_core::expr::Literal::Bool(false)))
            }
            TokenKind::Ident(ref s) if s.eq_ignore_ascii_case("NULL") => {
                self.advance();
                Ok(DefaultExpr::Literal(rowsmith_core::expr::Literal::Null))
            }
            _ => Err(self.err("default value")),
        }
    }

    /// Expects the current token to be `(`, captures the verbatim text up to
    /// the matching `)` by byte offset, and hands it to `rowsmith-expr`'s own
    /// lexer/parser — DDL tokens don't carry arithmetic/comparison operators,
    /// so expressions are never parsed from DDL tokens directly.
    fn parse_parenthesized_expr(&mut self) -> Result<rowsmith_core::expr::ExprAst, ParseError> {
        let open = self.advance();
        if open.kind != TokenKind::LParen {
            return Err(ParseError {
                line: open.line,
                column: open.column,
                expected: "(".into(),
                found: open.kind.to_string(),
            });
        }
        let start = open.offset + 1;
        let mut depth = 1i32;
        let close_offset = loop {
            let t = self.advance();
            match t.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        break t.offset;
                    }
                }
                TokenKind::Eof => {
                    return Err(ParseError {
                        line: t.line,
                        column: t.column,
                        expected: ")".into(),
                        found: "<eof>".into(),
                    });
                }
                _ => {}
            }
        };
        let text = self.lexed.slice(start, close_offset);
        rowsmith_expr::parse(&text).map_err(ParseError::from)
    }

    fn parse_type(&mut self, table: &str, column: &str) -> Result<(TypeTag, bool), ParseError> {
        let name = self.expect_ident()?;
        let upper = name.to_ascii_uppercase();
        let mut auto_increment = false;
        let tag = match upper.as_str() {
            "SERIAL" | "BIGSERIAL" => TypeTag::Serial,
            "INTEGER" | "INT" | "SMALLINT" | "BIGINT" | "TINYINT" | "MEDIUMINT" => {
                if self.eat_keyword("UNSIGNED") {
                    self.diagnostics.push(Diagnostic::UnsignedNormalized {
                        table: table.to_string(),
                        column: column.to_string(),
                        original: format!("{upper} UNSIGNED"),
                    });
                }
                TypeTag::Integer
            }
            "DECIMAL" | "NUMERIC" => {
                let (p, s) = self.parse_precision_scale()?;
                TypeTag::Decimal(p, s)
            }
            "VARCHAR" | "CHARACTER" => {
                let n = self.parse_single_length().unwrap_or(255);
                TypeTag::Varchar(n)
            }
            "CHAR" => {
                let n = self.parse_single_length().unwrap_or(1);
                TypeTag::Char(n)
            }
            "TEXT" | "CLOB" | "LONGTEXT" | "MEDIUMTEXT" => TypeTag::Text,
            "DATE" => TypeTag::Date,
            "TIME" => TypeTag::Time,
            "TIMESTAMP" | "DATETIME" => TypeTag::Timestamp,
            "BOOLEAN" | "BOOL" => TypeTag::Boolean,
            "ENUM" => {
                let values = self.parse_enum_values()?;
                TypeTag::Enum(values)
            }
            other => {
                self.diagnostics.push(Diagnostic::UnknownType {
                    table: table.to_string(),
                    column: column.to_string(),
                    type_name: other.to_string(),
                });
                // Consume an ignored size/precision argument list, if present,
                // so parsing can resume after an unrecognized type name.
                if self.tok().kind == TokenKind::LParen {
                    let _ = self.parse_column_list_or_numbers();
                }
                TypeTag::Opaque(name)
            }
        };
        // `INT ... AUTO_INCREMENT` is detected by the caller re-scanning the
        // inline-constraint loop; here we only recognize the MySQL spelling
        // that appears directly after the type name in some dialects.
        if self.eat_keyword("AUTO_INCREMENT") || self.eat_keyword("AUTOINCREMENT") {
            auto_increment = true;
        }
        Ok((tag, auto_increment))
    }

    fn parse_precision_scale(&mut self) -> Result<(u8, u8), ParseError> {
        if self.tok().kind != TokenKind::LParen {
            return Ok((10, 0));
        }
        self.advance();
        let p = self.expect_number()?;
        let s = if self.eat_punct(&TokenKind::Comma) {
            self.expect_number()?
        } else {
            0
        };
        self.expect_punct(TokenKind::RParen)?;
        Ok((p as u8, s as u8))
    }

    fn parse_single_length(&mut self) -> Option<usize> {
        if self.tok().kind != TokenKind::LParen {
            return None;
        }
        self.advance();
        let n = self.expect_number().ok()?;
        let _ = self.expect_punct(TokenKind::RParen);
        Some(n as usize)
    }

    fn parse_enum_values(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect_punct(TokenKind::LParen)?;
        let mut values = Vec::new();
        loop {
            match self.tok().kind.clone() {
                TokenKind::StringLit(s) => {
                    self.advance();
                    values.push(s);
                }
                _ => return Err(self.err("string literal")),
            }
            if self.eat_punct(&TokenKind::Comma) {
                continue;
            }
            break;
        }
        self.expect_punct(TokenKind::RParen)?;
        Ok(values)
    }

    fn expect_number(&mut self) -> Result<i64, ParseError> {
        match self.tok().kind.clone() {
            TokenKind::Number(n) => {
                self.advance();
                n.parse().map_err(|_| self.err("integer"))
            }
            _ => Err(self.err("integer")),
        }
    }

    /// Best-effort skip of an unrecognized type's argument list, e.g. an
    /// `OPAQUE`-mapped vendor type like `GEOMETRY(Point,4326)`.
    fn parse_column_list_or_numbers(&mut self) -> Result<(), ParseError> {
        self.expect_punct(TokenKind::LParen)?;
        let mut depth = 1i32;
        loop {
            match self.advance().kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::Eof => return Err(self.err(")")),
                _ => {}
            }
        }
        Ok(())
    }
}
