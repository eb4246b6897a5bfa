use thiserror::Error;

/// Fatal failure when a foreign-key cycle cannot be resolved by the
/// nullable-first / back-patch strategy (§4.5, §7).
#[derive(Debug, Error, Clone, PartialEq)]
#[error("cyclic foreign-key dependency among tables {tables:?} has no nullable entry point")]
pub struct CyclicDependencyError {
    pub tables: Vec<String>,
}

/// Invalid option combination surfaced at run start (§7: e.g. "predefined
/// values violating a CHECK").
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{table}.{column}: predefined value {value:?} violates its CHECK constraint")]
    PredefinedValueViolatesCheck {
        table: String,
        column: String,
        value: String,
    },
    #[error("{scope}.{column}: unknown column referenced in configuration")]
    UnknownColumn { scope: String, column: String },
}
