//! String samplers: enum, ASCII fallback, regex-biased, and realistic-pool
//! dispatch (spec.md §4.4, §9).

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;

use rowsmith_core::domain::ValueDomain;
use rowsmith_core::schema::TypeTag;
use rowsmith_core::Value;

use crate::realistic::{RealisticKey, RealisticPool};

use super::Generator;

/// Uniform random draw over a fixed set of strings (`ENUM` or `IN`-derived
/// domains, spec.md §4.4 item 1), coerced to the column's declared type
/// ("with type coercion") — most commonly `Boolean`, since
/// `default_domain_for_type` always hands boolean columns an `{"true",
/// "false"}` enum set.
pub struct EnumGen {
    pub values: Vec<String>,
    pub type_tag: TypeTag,
}

impl Generator for EnumGen {
    fn sample(&self, rng: &mut StdRng, _row_index: usize) -> Value {
        if self.values.is_empty() {
            return Value::Null;
        }
        let raw = &self.values[rng.random_range(0..self.values.len())];
        coerce(raw, &self.type_tag)
    }

    fn name(&self) -> &'static str {
        "Enum"
    }
}

fn coerce(raw: &str, type_tag: &TypeTag) -> Value {
    match type_tag {
        TypeTag::Boolean => Value::Bool(raw == "true"),
        TypeTag::Integer | TypeTag::Serial => raw.parse().map(Value::Int).unwrap_or(Value::Null),
        TypeTag::Decimal(_, _) => raw.parse().map(Value::Decimal).unwrap_or(Value::Null),
        _ => Value::Text(raw.to_string()),
    }
}

/// Random ASCII lowercase string of length in `[1, min(max_length, 20)]`
/// (spec.md §4.4 item 4 typed fallback).
pub struct StringFallbackGen {
    min_len: usize,
    max_len: usize,
}

impl StringFallbackGen {
    pub fn from_domain(domain: &ValueDomain) -> Self {
        let max_len = domain.max_length.unwrap_or(20).min(20).max(1);
        Self { min_len: 1, max_len }
    }
}

impl Generator for StringFallbackGen {
    fn sample(&self, rng: &mut StdRng, _row_index: usize) -> Value {
        let len = rng.random_range(self.min_len..=self.max_len);
        let s: String = (0..len)
            .map(|_| (b'a' + rng.random_range(0u8..26)) as char)
            .collect();
        Value::Text(s)
    }

    fn name(&self) -> &'static str {
        "StringFallback"
    }
}

/// Dispatches to a caller-supplied [`RealisticPool`], truncating to
/// `max_length` when the column has a length bound. Falls back to the
/// ASCII sampler if the pool doesn't know the key (e.g. a custom pool that
/// only covers a subset of [`RealisticKey`]).
pub struct RealisticGen {
    pub key: RealisticKey,
    pub pool: Arc<dyn RealisticPool>,
    pub max_length: Option<usize>,
}

impl Generator for RealisticGen {
    fn sample(&self, rng: &mut StdRng, row_index: usize) -> Value {
        let value = self
            .pool
            .sample(self.key, rng, row_index)
            .unwrap_or_else(|| StringFallbackGen { min_len: 1, max_len: 20 }.sample(rng, row_index));
        match (value, self.max_length) {
            (Value::Text(s), Some(n)) if s.chars().count() > n => {
                Value::Text(s.chars().take(n).collect())
            }
            (other, _) => other,
        }
    }

    fn name(&self) -> &'static str {
        "Realistic"
    }
}

/// Best-effort regex-directed string sampler ("xeger-lite"): walks the
/// pattern and emits characters satisfying each atom, rather than
/// generating candidates and testing them against a compiled regex. Covers
/// literals, `\d`/`\w`/`.`, bracket classes, and `{m,n}`/`+`/`*`/`?`
/// quantifiers — enough for the realistic shapes `CHECK (... ~ '...')`
/// constraints take (e.g. `^[0-9]{13}$`). Constructs outside this subset
/// (alternation, backreferences, lookaround) degrade to a literal-ish
/// best effort; the evaluator in `rowsmith-expr` remains authoritative, so
/// a weak sample here is just more likely to need a repair pass.
pub struct RegexGen {
    pub pattern: String,
    pub max_length: Option<usize>,
}

impl Generator for RegexGen {
    fn sample(&self, rng: &mut StdRng, _row_index: usize) -> Value {
        let mut out = sample_pattern(&self.pattern, rng);
        if let Some(n) = self.max_length {
            if out.chars().count() > n {
                out = out.chars().take(n).collect();
            }
        }
        Value::Text(out)
    }

    fn name(&self) -> &'static str {
        "Regex"
    }
}

#[derive(Debug, Clone)]
enum ClassAtom {
    Digit,
    Word,
    Any,
    Literal(char),
    Set(Vec<(char, char)>),
}

fn sample_pattern(pattern: &str, rng: &mut StdRng) -> String {
    let trimmed = pattern.trim_start_matches('^').trim_end_matches('$');
    let chars: Vec<char> = trimmed.chars().collect();
    let mut i = 0;
    let mut out = String::new();
    while i < chars.len() {
        let (atom, next) = parse_atom(&chars, i);
        i = next;
        let (min, max, next) = parse_quantifier(&chars, i);
        i = next;
        let count = if max > min { rng.random_range(min..=max) } else { min };
        for _ in 0..count {
            out.push(sample_atom(&atom, rng));
        }
    }
    out
}

fn parse_atom(chars: &[char], i: usize) -> (ClassAtom, usize) {
    match chars[i] {
        '\\' if i + 1 < chars.len() => {
            let atom = match chars[i + 1] {
                'd' => ClassAtom::Digit,
                'w' => ClassAtom::Word,
                c => ClassAtom::Literal(c),
            };
            (atom, i + 2)
        }
        '.' => (ClassAtom::Any, i + 1),
        '[' => parse_bracket(chars, i),
        c => (ClassAtom::Literal(c), i + 1),
    }
}

fn parse_bracket(chars: &[char], i: usize) -> (ClassAtom, usize) {
    let mut j = i + 1;
    let mut ranges = Vec::new();
    let negated = j < chars.len() && chars[j] == '^';
    if negated {
        j += 1;
    }
    while j < chars.len() && chars[j] != ']' {
        if j + 2 < chars.len() && chars[j + 1] == '-' && chars[j + 2] != ']' {
            ranges.push((chars[j], chars[j + 2]));
            j += 3;
        } else {
            ranges.push((chars[j], chars[j]));
            j += 1;
        }
    }
    let end = if j < chars.len() { j + 1 } else { j };
    if negated || ranges.is_empty() {
        // Negated classes and empty brackets are rare in practice here;
        // fall back to a broad printable-ASCII atom rather than modeling
        // exclusion.
        (ClassAtom::Any, end)
    } else {
        (ClassAtom::Set(ranges), end)
    }
}

fn parse_quantifier(chars: &[char], i: usize) -> (usize, usize, usize) {
    if i >= chars.len() {
        return (1, 1, i);
    }
    match chars[i] {
        '+' => (1, 8, i + 1),
        '*' => (0, 8, i + 1),
        '?' => (0, 1, i + 1),
        '{' => {
            if let Some(close) = chars[i..].iter().position(|&c| c == '}') {
                let inner: String = chars[i + 1..i + close].iter().collect();
                let end = i + close + 1;
                if let Some((lo, hi)) = inner.split_once(',') {
                    let lo: usize = lo.trim().parse().unwrap_or(1);
                    let hi: usize = hi.trim().parse().unwrap_or(lo);
                    (lo, hi.max(lo), end)
                } else if let Ok(n) = inner.trim().parse::<usize>() {
                    (n, n, end)
                } else {
                    (1, 1, end)
                }
            } else {
                (1, 1, i)
            }
        }
        _ => (1, 1, i),
    }
}

fn sample_atom(atom: &ClassAtom, rng: &mut StdRng) -> char {
    match atom {
        ClassAtom::Digit => char::from(b'0' + rng.random_range(0..10u8)),
        ClassAtom::Word => {
            let idx = rng.random_range(0..63u8);
            match idx {
                0..=25 => (b'a' + idx) as char,
                26..=51 => (b'A' + (idx - 26)) as char,
                52..=61 => (b'0' + (idx - 52)) as char,
                _ => '_',
            }
        }
        ClassAtom::Any => (b'a' + rng.random_range(0u8..26)) as char,
        ClassAtom::Literal(c) => *c,
        ClassAtom::Set(ranges) => {
            let total: usize = ranges
                .iter()
                .map(|&(lo, hi)| (hi as u32).saturating_sub(lo as u32) as usize + 1)
                .sum();
            let mut pick = rng.random_range(0..total.max(1));
            for &(lo, hi) in ranges {
                let span = (hi as u32).saturating_sub(lo as u32) as usize + 1;
                if pick < span {
                    return char::from_u32(lo as u32 + pick as u32).unwrap_or(lo);
                }
                pick -= span;
            }
            ranges.first().map(|&(lo, _)| lo).unwrap_or('a')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn enum_draws_only_from_set() {
        let g = EnumGen {
            values: vec!["A".into(), "B".into(), "C".into()],
            type_tag: rowsmith_core::schema::TypeTag::Text,
        };
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            match g.sample(&mut rng, 0) {
                Value::Text(s) => assert!(["A", "B", "C"].contains(&s.as_str())),
                other => panic!("expected Text, got {other:?}"),
            }
        }
    }

    #[test]
    fn regex_digit_repeat_matches_isbn_shape() {
        let g = RegexGen { pattern: "^[0-9]{13}$".to_string(), max_length: None };
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            match g.sample(&mut rng, 0) {
                Value::Text(s) => {
                    assert_eq!(s.len(), 13);
                    assert!(s.chars().all(|c| c.is_ascii_digit()));
                }
                other => panic!("expected Text, got {other:?}"),
            }
        }
    }

    #[test]
    fn string_fallback_respects_max_length() {
        let domain = ValueDomain::string(Some(5));
        let g = StringFallbackGen::from_domain(&domain);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            match g.sample(&mut rng, 0) {
                Value::Text(s) => assert!(s.len() <= 5 && !s.is_empty()),
                other => panic!("expected Text, got {other:?}"),
            }
        }
    }
}
