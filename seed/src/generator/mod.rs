//! Value samplers for populating a single column (spec.md §4.4, §9:
//! "Sampler/Generator trait...Enum, Numeric, Date, String, Regex,
//! Realistic, UserProvided").

pub mod numeric;
pub mod string;
pub mod temporal;

use std::sync::Arc;

use rand::rngs::StdRng;
use rowsmith_core::domain::ValueDomain;
use rowsmith_core::schema::TypeTag;
use rowsmith_core::Value;

use crate::realistic::{RealisticKey, RealisticPool};

/// Produces one column value at a time, driven by a per-column RNG.
///
/// Works over the shared `rowsmith_core::Value` wire type rather than a
/// dialect-specific one, and takes the row index so uniqueness-friendly
/// generators (email, SERIAL) can use it.
pub trait Generator: Send + Sync {
    fn sample(&self, rng: &mut StdRng, row_index: usize) -> Value;

    fn name(&self) -> &'static str;
}

impl Generator for Arc<dyn Generator> {
    fn sample(&self, rng: &mut StdRng, row_index: usize) -> Value {
        (**self).sample(rng, row_index)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Which family of generator to build for a column, narrowed to the
/// concrete variants spec.md §9 names.
#[derive(Debug, Clone)]
pub enum GeneratorKind {
    Enum(Vec<String>),
    Numeric,
    DateLike,
    StringFallback,
    Regex(String),
    Realistic(RealisticKey),
}

impl GeneratorKind {
    /// Build a boxed sampler for this kind, given the column's extracted
    /// domain and type (for bounds/length wrapping) and a realistic-value
    /// provider.
    pub fn into_generator(
        self,
        domain: &ValueDomain,
        type_tag: &TypeTag,
        pool: Arc<dyn RealisticPool>,
    ) -> Box<dyn Generator> {
        match self {
            GeneratorKind::Enum(values) => Box::new(string::EnumGen { values, type_tag: type_tag.clone() }),
            GeneratorKind::Numeric => Box::new(numeric::NumericGen::from_domain(domain, type_tag)),
            GeneratorKind::DateLike => match type_tag {
                TypeTag::Time => Box::new(temporal::TimeGen),
                TypeTag::Timestamp => Box::new(temporal::TimestampGen::from_domain(domain)),
                _ => Box::new(temporal::DateGen::from_domain(domain)),
            },
            GeneratorKind::StringFallback => Box::new(string::StringFallbackGen::from_domain(domain)),
            GeneratorKind::Regex(pattern) => Box::new(string::RegexGen { pattern, max_length: domain.max_length }),
            GeneratorKind::Realistic(key) => Box::new(string::RealisticGen {
                key,
                pool,
                max_length: domain.max_length,
            }),
        }
    }
}

/// SERIAL columns use a per-table monotonic counter starting at 1
/// (spec.md §4.4), independent of any `ValueDomain`.
pub struct SerialGen;

impl Generator for SerialGen {
    fn sample(&self, _rng: &mut StdRng, row_index: usize) -> Value {
        Value::Int(row_index as i64 + 1)
    }

    fn name(&self) -> &'static str {
        "Serial"
    }
}

/// Wraps a fixed list of values (used for `predefined_values`); draws
/// uniformly, looping if the row count exceeds the list length.
pub struct PredefinedGen {
    pub values: Vec<Value>,
}

impl Generator for PredefinedGen {
    fn sample(&self, rng: &mut StdRng, _row_index: usize) -> Value {
        use rand::Rng;
        if self.values.is_empty() {
            return Value::Null;
        }
        self.values[rng.random_range(0..self.values.len())].clone()
    }

    fn name(&self) -> &'static str {
        "Predefined"
    }
}
