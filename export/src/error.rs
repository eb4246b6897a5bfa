use thiserror::Error;

/// I/O or serialization failure while writing one export mode (§4.7, §7:
/// "`ExportError` (I/O) — fatal for the affected export mode only").
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error writing {table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },
    #[error("json error writing {table}: {source}")]
    Json {
        table: String,
        #[source]
        source: serde_json::Error,
    },
}
