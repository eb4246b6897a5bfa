//! Column-mapping inference, dependency resolution, and row generation
//! (spec.md §4, §5): turns a validated [`rowsmith_core::schema::Schema`]
//! into per-table [`rowsmith_core::value::GeneratedTable`]s.

pub mod error;
pub mod fill;
pub mod generator;
pub mod inference;
pub mod realistic;
pub mod rng;
pub mod topology;

pub use error::{ConfigError, CyclicDependencyError};
pub use fill::{
    ColumnOverrides, FillOptions, GenerationReport, RepairBudgets, UnderfilledTable, fill_schema,
};
pub use generator::{Generator, GeneratorKind};
pub use inference::infer_generator_kind;
pub use realistic::{DefaultRealisticPool, RealisticKey, RealisticPool};
pub use topology::{Level, compute_levels};
