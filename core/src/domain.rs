//! Per-column value domains derived from `CHECK` predicates (§3, §4.3).
//!
//! A domain is advisory: it biases sampling toward values likely to pass
//! validation, but the evaluator in `rowsmith-expr` remains the source of
//! truth for whether a row is actually accepted.

use rust_decimal::Decimal;

/// The broad shape of values a column may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainKind {
    Numeric,
    String,
    Date,
    Enum,
    Any,
}

/// A conservative value domain for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDomain {
    pub kind: DomainKind,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub inclusive_min: bool,
    pub inclusive_max: bool,
    pub enum_set: Option<Vec<String>>,
    pub regex: Option<String>,
    pub max_length: Option<usize>,
    pub nullable: bool,
}

impl ValueDomain {
    /// The widest possible domain: any value, nullable.
    pub fn any() -> Self {
        Self {
            kind: DomainKind::Any,
            min: None,
            max: None,
            inclusive_min: true,
            inclusive_max: true,
            enum_set: None,
            regex: None,
            max_length: None,
            nullable: true,
        }
    }

    pub fn numeric(min: Decimal, max: Decimal) -> Self {
        Self {
            kind: DomainKind::Numeric,
            min: Some(min),
            max: Some(max),
            inclusive_min: true,
            inclusive_max: true,
            ..Self::any()
        }
    }

    pub fn string(max_length: Option<usize>) -> Self {
        Self {
            kind: DomainKind::String,
            max_length,
            ..Self::any()
        }
    }

    pub fn enumerated(values: Vec<String>) -> Self {
        Self {
            kind: DomainKind::Enum,
            enum_set: Some(values),
            ..Self::any()
        }
    }

    /// Intersect this domain with another, tightening bounds and enum sets.
    /// Used when multiple conjuncts in a `CHECK` constrain the same column
    /// (§4.3: "Bounds across conjuncts intersect").
    pub fn intersect(mut self, other: &ValueDomain) -> Self {
        self.min = tighter_min(self.min, self.inclusive_min, other.min, other.inclusive_min)
            .map(|(v, _)| v);
        if let (Some(a), Some(b)) = (self.min, other.min) {
            if b > a || (b == a && !other.inclusive_min) {
                self.inclusive_min = other.inclusive_min;
            }
        }
        self.max = tighter_max(self.max, self.inclusive_max, other.max, other.inclusive_max)
            .map(|(v, _)| v);
        if let (Some(a), Some(b)) = (self.max, other.max) {
            if b < a || (b == a && !other.inclusive_max) {
                self.inclusive_max = other.inclusive_max;
            }
        }
        self.max_length = match (self.max_length, other.max_length) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, None) => a,
            (None, b) => b,
        };
        self.enum_set = match (self.enum_set.take(), other.enum_set.clone()) {
            (Some(a), Some(b)) => Some(a.into_iter().filter(|v| b.contains(v)).collect()),
            (Some(a), None) => Some(a),
            (None, b) => b,
        };
        self.nullable = self.nullable && other.nullable;
        self
    }
}

fn tighter_min(
    a: Option<Decimal>,
    _a_incl: bool,
    b: Option<Decimal>,
    _b_incl: bool,
) -> Option<(Decimal, bool)> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a.max(b), true)),
        (Some(a), None) => Some((a, true)),
        (None, Some(b)) => Some((b, true)),
        (None, None) => None,
    }
}

fn tighter_max(
    a: Option<Decimal>,
    _a_incl: bool,
    b: Option<Decimal>,
    _b_incl: bool,
) -> Option<(Decimal, bool)> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a.min(b), true)),
        (Some(a), None) => Some((a, true)),
        (None, Some(b)) => Some((b, true)),
        (None, None) => None,
    }
}
