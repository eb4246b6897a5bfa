//! Domain extractor (§4.3): conservative symbolic simplification of a
//! column's `CHECK` predicates into a [`ValueDomain`] the sampler can use to
//! bias candidate generation. The evaluator in [`crate::eval`] remains
//! authoritative; a domain may be weaker than the predicate it came from.

use chrono::{Datelike, Duration, NaiveDate};
use rowsmith_core::domain::{DomainKind, ValueDomain};
use rowsmith_core::expr::{BinOp, ExprAst, FuncName, Literal};
use rowsmith_core::schema::TypeTag;
use rust_decimal::Decimal;

/// Type-default domain applied before any `CHECK`-derived narrowing
/// (§4.3: "INTEGER → ±2³¹−1; DECIMAL(p,s) → derived from precision;
/// DATE → [1970-01-01, CURRENT_DATE+10y]; VARCHAR(n) → length ≤ n").
pub fn default_domain_for_type(type_tag: &TypeTag, today: NaiveDate) -> ValueDomain {
    match type_tag {
        TypeTag::Integer | TypeTag::Serial => {
            ValueDomain::numeric(Decimal::from(-2_147_483_647i64), Decimal::from(2_147_483_647i64))
        }
        TypeTag::Decimal(p, s) => {
            let bound = Decimal::from(10i64.saturating_pow(u32::from(*p).saturating_sub(u32::from(*s))))
                - Decimal::new(1, u32::from(*s));
            ValueDomain::numeric(-bound, bound)
        }
        TypeTag::Varchar(n) | TypeTag::Char(n) => ValueDomain::string(Some(*n)),
        TypeTag::Text | TypeTag::Opaque(_) => ValueDomain::string(None),
        TypeTag::Date | TypeTag::Timestamp => {
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
            let max = today + Duration::days(365 * 10);
            ValueDomain {
                kind: DomainKind::Date,
                min: Some(Decimal::from(epoch.num_days_from_ce())),
                max: Some(Decimal::from(max.num_days_from_ce())),
                ..ValueDomain::any()
            }
        }
        TypeTag::Time => ValueDomain::any(),
        TypeTag::Boolean => ValueDomain::enumerated(vec!["true".into(), "false".into()]),
        TypeTag::Enum(values) => ValueDomain::enumerated(values.clone()),
    }
}

/// Derive the narrowed domain for `column` from the `CHECK` expressions that
/// mention it, starting from the type default.
pub fn extract_domain(column: &str, checks: &[&ExprAst], type_tag: &TypeTag, today: NaiveDate) -> ValueDomain {
    let mut domain = default_domain_for_type(type_tag, today);
    for check in checks {
        for conjunct in check.conjuncts() {
            if let Some(fragment) = domain_from_conjunct(column, conjunct) {
                domain = domain.intersect(&fragment);
            }
        }
    }
    domain
}

fn domain_from_conjunct(column: &str, expr: &ExprAst) -> Option<ValueDomain> {
    match expr {
        ExprAst::BinaryOp(op, l, r) => {
            if let (ExprAst::ColumnRef(c), ExprAst::Literal(lit)) = (l.as_ref(), r.as_ref()) {
                if c == column {
                    return domain_from_comparison(*op, lit);
                }
            }
            if let (ExprAst::Literal(lit), ExprAst::ColumnRef(c)) = (l.as_ref(), r.as_ref()) {
                if c == column {
                    return domain_from_comparison(flip_op(*op), lit);
                }
            }
            None
        }
        ExprAst::Between(e, lo, hi) => {
            let ExprAst::ColumnRef(c) = e.as_ref() else {
                return None;
            };
            if c != column {
                return None;
            }
            let (ExprAst::Literal(lo_lit), ExprAst::Literal(hi_lit)) = (lo.as_ref(), hi.as_ref()) else {
                return None;
            };
            let lo_dec = literal_as_decimal(lo_lit)?;
            let hi_dec = literal_as_decimal(hi_lit)?;
            Some(ValueDomain::numeric(lo_dec, hi_dec))
        }
        ExprAst::In(e, list) => {
            let ExprAst::ColumnRef(c) = e.as_ref() else {
                return None;
            };
            if c != column {
                return None;
            }
            let values: Option<Vec<String>> = list
                .iter()
                .map(|item| match item {
                    ExprAst::Literal(lit) => literal_as_string(lit),
                    _ => None,
                })
                .collect();
            values.map(ValueDomain::enumerated)
        }
        ExprAst::Regex(e, pattern, negated) => {
            let ExprAst::ColumnRef(c) = e.as_ref() else {
                return None;
            };
            if c != column || *negated {
                return None;
            }
            Some(ValueDomain {
                regex: Some(pattern.clone()),
                ..ValueDomain::any()
            })
        }
        ExprAst::BinaryOp(_, _, _) => None,
        _ => domain_from_length_call(column, expr),
    }
}

fn domain_from_length_call(column: &str, expr: &ExprAst) -> Option<ValueDomain> {
    if let ExprAst::BinaryOp(op, l, r) = expr {
        if let (
            ExprAst::FuncCall(FuncName::Length, args, None),
            ExprAst::Literal(Literal::Int(n)),
        ) = (l.as_ref(), r.as_ref())
        {
            if let Some(ExprAst::ColumnRef(c)) = args.first() {
                if c == column {
                    let max_len = match op {
                        BinOp::Lt => Some((*n - 1).max(0) as usize),
                        BinOp::LtEq | BinOp::Eq => Some((*n).max(0) as usize),
                        _ => None,
                    };
                    return max_len.map(|m| ValueDomain {
                        max_length: Some(m),
                        ..ValueDomain::any()
                    });
                }
            }
        }
    }
    None
}

fn domain_from_comparison(op: BinOp, lit: &Literal) -> Option<ValueDomain> {
    match op {
        BinOp::Gt | BinOp::GtEq => {
            let v = literal_as_decimal(lit)?;
            Some(ValueDomain {
                kind: DomainKind::Numeric,
                min: Some(v),
                inclusive_min: matches!(op, BinOp::GtEq),
                ..ValueDomain::any()
            })
        }
        BinOp::Lt | BinOp::LtEq => {
            let v = literal_as_decimal(lit)?;
            Some(ValueDomain {
                kind: DomainKind::Numeric,
                max: Some(v),
                inclusive_max: matches!(op, BinOp::LtEq),
                ..ValueDomain::any()
            })
        }
        BinOp::Eq => {
            let v = literal_as_decimal(lit)?;
            Some(ValueDomain::numeric(v, v))
        }
        _ => None,
    }
}

fn flip_op(op: BinOp) -> BinOp {
    match op {
        BinOp::Gt => BinOp::Lt,
        BinOp::GtEq => BinOp::LtEq,
        BinOp::Lt => BinOp::Gt,
        BinOp::LtEq => BinOp::GtEq,
        other => other,
    }
}

fn literal_as_decimal(lit: &Literal) -> Option<Decimal> {
    match lit {
        Literal::Int(v) => Some(Decimal::from(*v)),
        Literal::Decimal(v) => Some(*v),
        _ => None,
    }
}

fn literal_as_string(lit: &Literal) -> Option<String> {
    match lit {
        Literal::String(s) => Some(s.clone()),
        Literal::Int(v) => Some(v.to_string()),
        Literal::Decimal(v) => Some(v.to_string()),
        Literal::Bool(v) => Some(v.to_string()),
        Literal::Date(s) => Some(s.clone()),
        Literal::Null => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsmith_core::expr::ExprAst;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 26).unwrap()
    }

    #[test]
    fn extracts_conjunctive_numeric_bounds() {
        let expr = crate::parser::parse("age >= 18 AND age <= 30").unwrap();
        let domain = extract_domain("age", &[&expr], &TypeTag::Integer, today());
        assert_eq!(domain.min, Some(Decimal::from(18)));
        assert_eq!(domain.max, Some(Decimal::from(30)));
    }

    #[test]
    fn extracts_enum_set_from_in_list() {
        let expr = crate::parser::parse("country IN ('A', 'B', 'C')").unwrap();
        let domain = extract_domain("country", &[&expr], &TypeTag::Varchar(20), today());
        assert_eq!(
            domain.enum_set,
            Some(vec!["A".to_string(), "B".to_string(), "C".to_string()])
        );
    }

    #[test]
    fn extracts_regex_pattern() {
        let expr = crate::parser::parse("isbn ~ '^[0-9]{13}$'").unwrap();
        let domain = extract_domain("isbn", &[&expr], &TypeTag::Varchar(13), today());
        assert_eq!(domain.regex.as_deref(), Some("^[0-9]{13}$"));
    }

    #[test]
    fn unsatisfiable_bounds_still_intersect_to_inverted_range() {
        let expr = crate::parser::parse("price > 100 AND price < 50").unwrap();
        let domain = extract_domain("price", &[&expr], &TypeTag::Decimal(5, 2), today());
        assert_eq!(domain.min, Some(Decimal::from(100)));
        assert_eq!(domain.max, Some(Decimal::from(50)));
    }

    #[test]
    fn disjunction_is_too_weak_to_narrow() {
        let expr = crate::parser::parse("age < 10 OR age > 90").unwrap();
        let domain = extract_domain("age", &[&expr], &TypeTag::Integer, today());
        assert_eq!(domain.min, Some(Decimal::from(-2_147_483_647i64)));
        assert_eq!(domain.max, Some(Decimal::from(2_147_483_647i64)));
    }
}
