//! Date sampler, bounded by a column's extracted [`ValueDomain`] (expressed
//! in epoch-day `Decimal`s, per `rowsmith_expr::domain::default_domain_for_type`).

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::Rng;

use rowsmith_core::domain::ValueDomain;
use rowsmith_core::Value;

use super::Generator;

pub struct DateGen {
    min_days: i32,
    max_days: i32,
}

impl DateGen {
    pub fn from_domain(domain: &ValueDomain) -> Self {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().num_days_from_ce();
        let min_days = domain
            .min
            .and_then(|d| d.to_string().parse::<i32>().ok())
            .unwrap_or(epoch);
        let max_days = domain
            .max
            .and_then(|d| d.to_string().parse::<i32>().ok())
            .unwrap_or(min_days + 365 * 10);
        let (min_days, max_days) = if min_days <= max_days { (min_days, max_days) } else { (max_days, min_days) };
        Self { min_days, max_days }
    }
}

impl Generator for DateGen {
    fn sample(&self, rng: &mut StdRng, _row_index: usize) -> Value {
        let day = rng.random_range(self.min_days..=self.max_days);
        let date = NaiveDate::from_num_days_from_ce_opt(day)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
        Value::Date(date.format("%Y-%m-%d").to_string())
    }

    fn name(&self) -> &'static str {
        "Date"
    }
}

/// Uniform random time-of-day, used for `TypeTag::Time` columns (no
/// meaningful domain bound — any clock time is valid).
pub struct TimeGen;

impl Generator for TimeGen {
    fn sample(&self, rng: &mut StdRng, _row_index: usize) -> Value {
        let hour = rng.random_range(0u32..24);
        let minute = rng.random_range(0u32..60);
        let second = rng.random_range(0u32..60);
        Value::Time(format!("{hour:02}:{minute:02}:{second:02}"))
    }

    fn name(&self) -> &'static str {
        "Time"
    }
}

/// Timestamp = a random date plus a random time of day.
pub struct TimestampGen {
    date: DateGen,
}

impl TimestampGen {
    pub fn from_domain(domain: &ValueDomain) -> Self {
        Self { date: DateGen::from_domain(domain) }
    }
}

impl Generator for TimestampGen {
    fn sample(&self, rng: &mut StdRng, row_index: usize) -> Value {
        let Value::Date(date) = self.date.sample(rng, row_index) else {
            unreachable!("DateGen always returns Value::Date")
        };
        let hour = rng.random_range(0u32..24);
        let minute = rng.random_range(0u32..60);
        let second = rng.random_range(0u32..60);
        Value::Timestamp(format!("{date} {hour:02}:{minute:02}:{second:02}"))
    }

    fn name(&self) -> &'static str {
        "Timestamp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rowsmith_core::domain::{DomainKind, ValueDomain};
    use rust_decimal::Decimal;

    fn date_domain(min: i64, max: i64) -> ValueDomain {
        ValueDomain {
            kind: DomainKind::Date,
            min: Some(Decimal::from(min)),
            max: Some(Decimal::from(max)),
            ..ValueDomain::any()
        }
    }

    #[test]
    fn date_stays_within_bounds() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().num_days_from_ce();
        let domain = date_domain(epoch as i64, epoch as i64 + 30);
        let g = DateGen::from_domain(&domain);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            match g.sample(&mut rng, 0) {
                Value::Date(s) => {
                    let parsed = NaiveDate::parse_from_str(&s, "%Y-%m-%d").unwrap();
                    assert!(parsed >= NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
                    assert!(parsed <= NaiveDate::from_ymd_opt(1970, 1, 31).unwrap());
                }
                other => panic!("expected Date, got {other:?}"),
            }
        }
    }

    #[test]
    fn time_components_are_in_range() {
        let g = TimeGen;
        let mut rng = StdRng::seed_from_u64(11);
        match g.sample(&mut rng, 0) {
            Value::Time(s) => assert_eq!(s.len(), 8),
            other => panic!("expected Time, got {other:?}"),
        }
    }
}
