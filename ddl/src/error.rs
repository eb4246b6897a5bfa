use thiserror::Error;

/// Fatal DDL parse failure (§4.1, §7: "`ParseError` — fatal, no output").
#[derive(Debug, Error, Clone, PartialEq)]
#[error("parse error at {line}:{column}: expected {expected}, found {found}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub expected: String,
    pub found: String,
}

impl From<crate::lexer::LexError> for ParseError {
    fn from(e: crate::lexer::LexError) -> Self {
        ParseError {
            line: e.line,
            column: e.column,
            expected: "valid token".into(),
            found: e.message,
        }
    }
}

impl From<rowsmith_expr::ExprParseError> for ParseError {
    fn from(e: rowsmith_expr::ExprParseError) -> Self {
        ParseError {
            line: 0,
            column: 0,
            expected: "valid CHECK expression".into(),
            found: e.to_string(),
        }
    }
}
