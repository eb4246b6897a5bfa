use thiserror::Error;

/// Fatal failure while parsing a `CHECK` (or other retained) expression.
/// Per spec §7: "expression parse errors during DDL ingestion fail parsing."
#[derive(Debug, Error, Clone, PartialEq)]
#[error("expression parse error at byte {pos}: expected {expected}, found {found}")]
pub struct ExprParseError {
    pub pos: usize,
    pub expected: String,
    pub found: String,
}

impl From<crate::lexer::LexError> for ExprParseError {
    fn from(e: crate::lexer::LexError) -> Self {
        ExprParseError { pos: e.pos, expected: "valid token".into(), found: e.message }
    }
}
