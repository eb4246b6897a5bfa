//! Expression evaluator (§4.2).
//!
//! Two entry points: [`eval_bool`] for predicate positions (three-valued
//! logic) and [`eval_value`] for value-producing positions (`None` stands
//! for SQL `NULL` propagation). Type mismatches and arithmetic errors never
//! panic or return `Result` — they degrade to `Unknown`/`None` and feed the
//! repair loop (§7: "expression evaluation errors never bubble up").

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};
use rowsmith_core::expr::{BinOp, DatePart, ExprAst, FuncName, Literal, UnaryOp};
use rowsmith_core::value::{Row, Value};
use rust_decimal::Decimal;

/// SQL three-valued logic result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tri {
    True,
    False,
    Unknown,
}

impl Tri {
    pub fn from_bool(b: bool) -> Self {
        if b {
            Tri::True
        } else {
            Tri::False
        }
    }

    /// A `CHECK` passes unless it evaluates to `False` (§3, §4.2).
    pub fn passes(self) -> bool {
        !matches!(self, Tri::False)
    }

    fn not(self) -> Tri {
        match self {
            Tri::True => Tri::False,
            Tri::False => Tri::True,
            Tri::Unknown => Tri::Unknown,
        }
    }

    fn and(self, other: Tri) -> Tri {
        match (self, other) {
            (Tri::False, _) | (_, Tri::False) => Tri::False,
            (Tri::True, Tri::True) => Tri::True,
            _ => Tri::Unknown,
        }
    }

    fn or(self, other: Tri) -> Tri {
        match (self, other) {
            (Tri::True, _) | (_, Tri::True) => Tri::True,
            (Tri::False, Tri::False) => Tri::False,
            _ => Tri::Unknown,
        }
    }
}

/// The process-start date, frozen for the life of a run (§4.2: "`CURRENT_DATE`
/// is the process-start date, frozen for a run (testability)").
#[derive(Debug, Clone, Copy)]
pub struct EvalContext {
    pub current_date: NaiveDate,
}

impl EvalContext {
    pub fn new(current_date: NaiveDate) -> Self {
        Self { current_date }
    }
}

pub fn eval_bool(expr: &ExprAst, row: &Row, ctx: &EvalContext) -> Tri {
    match expr {
        ExprAst::Literal(Literal::Bool(b)) => Tri::from_bool(*b),
        ExprAst::Literal(Literal::Null) => Tri::Unknown,
        ExprAst::UnaryOp(UnaryOp::Not, e) => eval_bool(e, row, ctx).not(),
        ExprAst::BinaryOp(BinOp::And, l, r) => eval_bool(l, row, ctx).and(eval_bool(r, row, ctx)),
        ExprAst::BinaryOp(BinOp::Or, l, r) => eval_bool(l, row, ctx).or(eval_bool(r, row, ctx)),
        ExprAst::BinaryOp(op, l, r) if is_comparison(*op) => {
            eval_comparison(*op, eval_value(l, row, ctx), eval_value(r, row, ctx))
        }
        ExprAst::Between(e, lo, hi) => {
            let ge_lo = eval_comparison(BinOp::GtEq, eval_value(e, row, ctx), eval_value(lo, row, ctx));
            let le_hi = eval_comparison(BinOp::LtEq, eval_value(e, row, ctx), eval_value(hi, row, ctx));
            ge_lo.and(le_hi)
        }
        ExprAst::In(e, list) => {
            let Some(v) = eval_value(e, row, ctx) else {
                return Tri::Unknown;
            };
            let mut saw_unknown = false;
            for item in list {
                match eval_value(item, row, ctx) {
                    Some(iv) => {
                        if values_equal(&v, &iv) {
                            return Tri::True;
                        }
                    }
                    None => saw_unknown = true,
                }
            }
            if saw_unknown {
                Tri::Unknown
            } else {
                Tri::False
            }
        }
        ExprAst::Like(e, pattern) => match eval_value(e, row, ctx) {
            Some(Value::Text(s)) => Tri::from_bool(like_match(&s, pattern)),
            Some(_) => Tri::Unknown,
            None => Tri::Unknown,
        },
        ExprAst::Regex(e, pattern, negated) => match eval_value(e, row, ctx) {
            Some(Value::Text(s)) => match regex::Regex::new(pattern) {
                Ok(re) => {
                    let m = re.is_match(&s);
                    Tri::from_bool(if *negated { !m } else { m })
                }
                Err(_) => Tri::Unknown,
            },
            Some(_) => Tri::Unknown,
            None => Tri::Unknown,
        },
        ExprAst::IsNull(e, negated) => {
            let is_null = eval_value(e, row, ctx).is_none();
            Tri::from_bool(if *negated { !is_null } else { is_null })
        }
        ExprAst::ColumnRef(name) => match row.get(name) {
            Some(Value::Bool(b)) => Tri::from_bool(*b),
            Some(Value::Null) | None => Tri::Unknown,
            Some(_) => Tri::Unknown,
        },
        _ => match eval_value(expr, row, ctx) {
            Some(Value::Bool(b)) => Tri::from_bool(b),
            _ => Tri::Unknown,
        },
    }
}

fn is_comparison(op: BinOp) -> bool {
    matches!(
        op,
        BinOp::Eq | BinOp::NotEq | BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq
    )
}

fn eval_comparison(op: BinOp, l: Option<Value>, r: Option<Value>) -> Tri {
    let (Some(l), Some(r)) = (l, r) else {
        return Tri::Unknown;
    };
    match op {
        BinOp::Eq => Tri::from_bool(values_equal(&l, &r)),
        BinOp::NotEq => Tri::from_bool(!values_equal(&l, &r)),
        _ => match compare_values(&l, &r) {
            Some(ord) => Tri::from_bool(match op {
                BinOp::Lt => ord == Ordering::Less,
                BinOp::LtEq => ord != Ordering::Greater,
                BinOp::Gt => ord == Ordering::Greater,
                BinOp::GtEq => ord != Ordering::Less,
                _ => unreachable!(),
            }),
            None => Tri::Unknown,
        },
    }
}

pub fn eval_value(expr: &ExprAst, row: &Row, ctx: &EvalContext) -> Option<Value> {
    match expr {
        ExprAst::Literal(lit) => literal_to_value(lit),
        ExprAst::ColumnRef(name) => match row.get(name) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v.clone()),
        },
        ExprAst::UnaryOp(UnaryOp::Neg, e) => numeric_negate(eval_value(e, row, ctx)?),
        ExprAst::UnaryOp(UnaryOp::Not, e) => match eval_bool(e, row, ctx) {
            Tri::True => Some(Value::Bool(true)),
            Tri::False => Some(Value::Bool(false)),
            Tri::Unknown => None,
        },
        ExprAst::BinaryOp(op, _, _) if is_comparison(*op) || matches!(op, BinOp::And | BinOp::Or) => {
            match eval_bool(expr, row, ctx) {
                Tri::True => Some(Value::Bool(true)),
                Tri::False => Some(Value::Bool(false)),
                Tri::Unknown => None,
            }
        }
        ExprAst::BinaryOp(op, l, r) => {
            let lv = eval_value(l, row, ctx)?;
            let rv = eval_value(r, row, ctx)?;
            eval_arithmetic(*op, lv, rv)
        }
        ExprAst::Between(_, _, _)
        | ExprAst::In(_, _)
        | ExprAst::Like(_, _)
        | ExprAst::Regex(_, _, _)
        | ExprAst::IsNull(_, _) => match eval_bool(expr, row, ctx) {
            Tri::True => Some(Value::Bool(true)),
            Tri::False => Some(Value::Bool(false)),
            Tri::Unknown => None,
        },
        ExprAst::FuncCall(name, args, part) => eval_func(*name, args, *part, row, ctx),
    }
}

fn literal_to_value(lit: &Literal) -> Option<Value> {
    match lit {
        Literal::Int(v) => Some(Value::Int(*v)),
        Literal::Decimal(v) => Some(Value::Decimal(*v)),
        Literal::String(v) => Some(Value::Text(v.clone())),
        Literal::Date(v) => Some(Value::Date(v.clone())),
        Literal::Bool(v) => Some(Value::Bool(*v)),
        Literal::Null => None,
    }
}

fn numeric_negate(v: Value) -> Option<Value> {
    match v {
        Value::Int(i) => Some(Value::Int(-i)),
        Value::Decimal(d) => Some(Value::Decimal(-d)),
        _ => None,
    }
}

fn eval_arithmetic(op: BinOp, l: Value, r: Value) -> Option<Value> {
    let as_decimal = |v: &Value| -> Option<Decimal> {
        match v {
            Value::Int(i) => Some(Decimal::from(*i)),
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    };
    let use_decimal = matches!(l, Value::Decimal(_)) || matches!(r, Value::Decimal(_));
    if use_decimal {
        let a = as_decimal(&l)?;
        let b = as_decimal(&r)?;
        let result = match op {
            BinOp::Add => a + b,
            BinOp::Sub => a - b,
            BinOp::Mul => a * b,
            BinOp::Div => {
                if b.is_zero() {
                    return None;
                }
                a / b
            }
            BinOp::Mod => {
                if b.is_zero() {
                    return None;
                }
                a % b
            }
            _ => return None,
        };
        Some(Value::Decimal(result))
    } else {
        let a = match l {
            Value::Int(i) => i,
            _ => return None,
        };
        let b = match r {
            Value::Int(i) => i,
            _ => return None,
        };
        let result = match op {
            BinOp::Add => a.checked_add(b)?,
            BinOp::Sub => a.checked_sub(b)?,
            BinOp::Mul => a.checked_mul(b)?,
            BinOp::Div => {
                if b == 0 {
                    return None;
                }
                a / b
            }
            BinOp::Mod => {
                if b == 0 {
                    return None;
                }
                a % b
            }
            _ => return None,
        };
        Some(Value::Int(result))
    }
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.partial_cmp(y),
        (Value::Decimal(x), Value::Decimal(y)) => x.partial_cmp(y),
        (Value::Int(x), Value::Decimal(y)) => Decimal::from(*x).partial_cmp(y),
        (Value::Decimal(x), Value::Int(y)) => x.partial_cmp(&Decimal::from(*y)),
        (Value::Text(x), Value::Text(y)) => x.partial_cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.partial_cmp(y),
        (Value::Date(x), Value::Date(y))
        | (Value::Time(x), Value::Time(y))
        | (Value::Timestamp(x), Value::Timestamp(y)) => x.partial_cmp(y),
        _ => None,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    compare_values(a, b) == Some(Ordering::Equal)
}

/// Translate a SQL `LIKE` pattern (`%`, `_`) into an anchored, case-sensitive
/// regex and match against it.
fn like_match(text: &str, pattern: &str) -> bool {
    let mut regex_src = String::from("^");
    for c in pattern.chars() {
        match c {
            '%' => regex_src.push_str(".*"),
            '_' => regex_src.push('.'),
            other => regex_src.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex_src.push('$');
    regex::Regex::new(&regex_src)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

fn eval_func(
    name: FuncName,
    args: &[ExprAst],
    part: Option<DatePart>,
    row: &Row,
    ctx: &EvalContext,
) -> Option<Value> {
    match name {
        FuncName::CurrentDate => Some(Value::Date(ctx.current_date.format("%Y-%m-%d").to_string())),
        FuncName::Date => {
            let v = eval_value(args.first()?, row, ctx)?;
            let s = match v {
                Value::Text(s) | Value::Date(s) | Value::Timestamp(s) => s,
                _ => return None,
            };
            let date_part = s.split(['T', ' ']).next().unwrap_or(&s);
            NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
            Some(Value::Date(date_part.to_string()))
        }
        FuncName::Length => {
            let v = eval_value(args.first()?, row, ctx)?;
            match v {
                Value::Text(s) => Some(Value::Int(s.chars().count() as i64)),
                _ => None,
            }
        }
        FuncName::Upper => match eval_value(args.first()?, row, ctx)? {
            Value::Text(s) => Some(Value::Text(s.to_uppercase())),
            _ => None,
        },
        FuncName::Lower => match eval_value(args.first()?, row, ctx)? {
            Value::Text(s) => Some(Value::Text(s.to_lowercase())),
            _ => None,
        },
        FuncName::Extract => {
            let part = part?;
            let v = eval_value(args.first()?, row, ctx)?;
            let s = match v {
                Value::Text(s) | Value::Date(s) | Value::Timestamp(s) => s,
                _ => return None,
            };
            let date_part = s.split(['T', ' ']).next().unwrap_or(&s);
            let naive = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
            let value = match part {
                DatePart::Year => naive.year() as i64,
                DatePart::Month => naive.month() as i64,
                DatePart::Day => naive.day() as i64,
                DatePart::Hour | DatePart::Minute | DatePart::Second => {
                    let time_part = s.split(['T', ' ']).nth(1).unwrap_or("00:00:00");
                    let parts: Vec<&str> = time_part.splitn(3, ':').collect();
                    let n: i64 = parts
                        .get(match part {
                            DatePart::Hour => 0,
                            DatePart::Minute => 1,
                            _ => 2,
                        })
                        .and_then(|p| p.parse().ok())
                        .unwrap_or(0);
                    n
                }
            };
            Some(Value::Int(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsmith_core::value::Row;

    fn ctx() -> EvalContext {
        EvalContext::new(NaiveDate::from_ymd_opt(2026, 7, 26).unwrap())
    }

    #[test]
    fn null_comparison_is_unknown_and_passes_check() {
        let expr = ExprAst::BinaryOp(
            BinOp::Gt,
            Box::new(ExprAst::ColumnRef("age".into())),
            Box::new(ExprAst::Literal(Literal::Int(0))),
        );
        let row: Row = Row::new();
        assert_eq!(eval_bool(&expr, &row, &ctx()), Tri::Unknown);
        assert!(eval_bool(&expr, &row, &ctx()).passes());
    }

    #[test]
    fn and_short_circuits_to_false_even_with_unknown_operand() {
        let unknown = ExprAst::IsNull(Box::new(ExprAst::ColumnRef("missing".into())), false);
        let always_false = ExprAst::Literal(Literal::Bool(false));
        let expr = ExprAst::BinaryOp(BinOp::And, Box::new(unknown), Box::new(always_false));
        let row: Row = Row::new();
        assert_eq!(eval_bool(&expr, &row, &ctx()), Tri::Unknown.and(Tri::False));
    }

    #[test]
    fn division_by_zero_is_unknown() {
        let expr = ExprAst::BinaryOp(
            BinOp::Div,
            Box::new(ExprAst::Literal(Literal::Int(1))),
            Box::new(ExprAst::Literal(Literal::Int(0))),
        );
        let row: Row = Row::new();
        assert_eq!(eval_value(&expr, &row, &ctx()), None);
    }

    #[test]
    fn like_matches_percent_and_underscore_wildcards() {
        assert!(like_match("hello", "h_l%"));
        assert!(!like_match("world", "h_l%"));
    }

    #[test]
    fn regex_constraint_matches_digit_pattern() {
        let mut row: Row = Row::new();
        row.insert("isbn".into(), Value::Text("1234567890123".into()));
        let expr = ExprAst::Regex(
            Box::new(ExprAst::ColumnRef("isbn".into())),
            "^[0-9]{13}$".into(),
            false,
        );
        assert_eq!(eval_bool(&expr, &row, &ctx()), Tri::True);
    }

    #[test]
    fn between_is_inclusive() {
        let mut row: Row = Row::new();
        row.insert("age".into(), Value::Int(18));
        let expr = ExprAst::Between(
            Box::new(ExprAst::ColumnRef("age".into())),
            Box::new(ExprAst::Literal(Literal::Int(18))),
            Box::new(ExprAst::Literal(Literal::Int(30))),
        );
        assert_eq!(eval_bool(&expr, &row, &ctx()), Tri::True);
    }
}
