use thiserror::Error;

/// Composed, fatal error surface for the pipeline (spec.md §7): one enum
/// with a `#[from]` variant per subsystem error, rather than a boxed
/// `dyn Error`.
///
/// `UnderfilledTable` and `Diagnostic::UnknownType` are deliberately absent
/// here — they're non-fatal and travel on the success path inside
/// [`crate::GenerationReport`] / the diagnostics returned alongside a
/// schema, per §7's fatal/non-fatal split.
#[derive(Debug, Error)]
pub enum Error {
    #[error("DDL parse error: {0}")]
    Parse(#[from] rowsmith_ddl::ParseError),

    #[error("CHECK expression parse error: {0}")]
    ExprParse(#[from] rowsmith_expr::ExprParseError),

    #[error("schema error: {0}")]
    Schema(#[from] rowsmith_core::schema::SchemaError),

    #[error("{0}")]
    Cyclic(#[from] rowsmith_seed::CyclicDependencyError),

    #[error("configuration error: {0}")]
    Config(#[from] rowsmith_seed::ConfigError),

    #[error("export error: {0}")]
    Export(#[from] rowsmith_export::ExportError),

    #[error("generation was cancelled before completion")]
    Cancelled,
}
