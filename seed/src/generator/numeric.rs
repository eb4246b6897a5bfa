//! Numeric samplers, bounded by a column's extracted [`ValueDomain`].

use rand::rngs::StdRng;
use rand::Rng;
use rust_decimal::Decimal;

use rowsmith_core::domain::ValueDomain;
use rowsmith_core::schema::TypeTag;
use rowsmith_core::Value;

use super::Generator;

/// Random integer or decimal in `[min, max]`, drawn from the column's
/// domain (falling back to the type default when a bound is unextractable).
pub struct NumericGen {
    min: Decimal,
    max: Decimal,
    is_integer: bool,
    scale: u32,
}

impl NumericGen {
    pub fn from_domain(domain: &ValueDomain, type_tag: &TypeTag) -> Self {
        let min = domain.min.unwrap_or_else(|| Decimal::from(-2_147_483_647i64));
        let max = domain.max.unwrap_or_else(|| Decimal::from(2_147_483_647i64));
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let scale = match type_tag {
            TypeTag::Decimal(_, s) => u32::from(*s),
            _ => 0,
        };
        Self {
            min,
            max,
            is_integer: type_tag.is_integer(),
            scale,
        }
    }
}

impl Generator for NumericGen {
    fn sample(&self, rng: &mut StdRng, _row_index: usize) -> Value {
        if self.is_integer {
            let lo = self.min.round().to_string().parse::<i64>().unwrap_or(i64::MIN);
            let hi = self.max.round().to_string().parse::<i64>().unwrap_or(i64::MAX);
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
            return Value::Int(rng.random_range(lo..=hi));
        }
        let lo_f = self.min.to_string().parse::<f64>().unwrap_or(f64::MIN / 2.0);
        let hi_f = self.max.to_string().parse::<f64>().unwrap_or(f64::MAX / 2.0);
        let (lo_f, hi_f) = if lo_f <= hi_f { (lo_f, hi_f) } else { (hi_f, lo_f) };
        let sampled = if lo_f < hi_f { rng.random_range(lo_f..hi_f) } else { lo_f };
        let decimal = Decimal::from_f64_retain(sampled)
            .unwrap_or(self.min)
            .round_dp(self.scale);
        Value::Decimal(decimal)
    }

    fn name(&self) -> &'static str {
        "Numeric"
    }
}

/// Uniform random booleans, used for `TypeTag::Boolean` columns whose
/// domain enum-set wasn't otherwise narrowed by a `CHECK`.
pub struct BoolGen;

impl Generator for BoolGen {
    fn sample(&self, rng: &mut StdRng, _row_index: usize) -> Value {
        Value::Bool(rng.random_bool(0.5))
    }

    fn name(&self) -> &'static str {
        "Bool"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rowsmith_core::domain::ValueDomain;

    #[test]
    fn integer_stays_in_bounds() {
        let domain = ValueDomain::numeric(Decimal::from(18), Decimal::from(30));
        let g = NumericGen::from_domain(&domain, &TypeTag::Integer);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            match g.sample(&mut rng, 0) {
                Value::Int(v) => assert!((18..=30).contains(&v)),
                other => panic!("expected Int, got {other:?}"),
            }
        }
    }

    #[test]
    fn decimal_respects_scale() {
        let domain = ValueDomain::numeric(Decimal::from(0), Decimal::from(999));
        let g = NumericGen::from_domain(&domain, &TypeTag::Decimal(5, 2));
        let mut rng = StdRng::seed_from_u64(7);
        match g.sample(&mut rng, 0) {
            Value::Decimal(v) => assert!(v.scale() <= 2),
            other => panic!("expected Decimal, got {other:?}"),
        }
    }

    #[test]
    fn bool_generates_both_values() {
        let g = BoolGen;
        let mut rng = StdRng::seed_from_u64(42);
        let vals: Vec<bool> = (0..100)
            .map(|_| match g.sample(&mut rng, 0) {
                Value::Bool(b) => b,
                other => panic!("expected Bool, got {other:?}"),
            })
            .collect();
        assert!(vals.contains(&true));
        assert!(vals.contains(&false));
    }
}
