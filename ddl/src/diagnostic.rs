//! Non-fatal parse-time diagnostics (§4.1, §7 — these never fail parsing).

/// A warning surfaced during DDL ingestion without aborting the parse.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// An unrecognized type name fell back to `TypeTag::Opaque` (§4.1:
    /// "Unknown types become TypeTag `OPAQUE` with a warning").
    UnknownType {
        table: String,
        column: String,
        type_name: String,
    },
    /// A dialect-specific unsigned integer type was normalized to plain
    /// `INTEGER`, which may lose range (§9 Open Questions).
    UnsignedNormalized {
        table: String,
        column: String,
        original: String,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::UnknownType { table, column, type_name } => write!(
                f,
                "{table}.{column}: unknown type {type_name:?}, falling back to OPAQUE"
            ),
            Diagnostic::UnsignedNormalized { table, column, original } => write!(
                f,
                "{table}.{column}: {original} normalized to INTEGER, range may be lost"
            ),
        }
    }
}
