//! Column-mapping inference: choose a [`GeneratorKind`] for a column that
//! has no user-provided override (spec.md §4.4).
//!
//! Two mutually exclusive layers: exact substring heuristics run as a
//! fast path when fuzzy matching is off, and a `strsim`-scored match runs
//! instead when it's on.

use rowsmith_core::domain::ValueDomain;
use rowsmith_core::schema::{ColumnDef, TypeTag};

use crate::generator::GeneratorKind;
use crate::realistic::RealisticKey;

/// Pick a generator kind for `column`, given its extracted domain and the
/// two fuzzy-matching options from `GenerationConfig` (§6:
/// `guess_column_type_mappings`, `threshold_for_guessing`).
///
/// Callers check `ENUM`/user-provided-mapping/predefined-values ahead of
/// this function (§4.4 items 1-2 are resolved with information this
/// function doesn't have, namely explicit config); this function only
/// covers items 3-4 plus the regex-domain case.
pub fn infer_generator_kind(
    column: &ColumnDef,
    domain: &ValueDomain,
    guess_column_type_mappings: bool,
    threshold_for_guessing: u8,
) -> GeneratorKind {
    if let Some(values) = &domain.enum_set {
        return GeneratorKind::Enum(values.clone());
    }
    if let Some(pattern) = &domain.regex {
        return GeneratorKind::Regex(pattern.clone());
    }
    let realistic = if guess_column_type_mappings {
        best_fuzzy_match(&column.name, threshold_for_guessing)
    } else {
        RealisticKey::match_by_substring(&column.name)
    };
    if let Some(key) = realistic {
        return GeneratorKind::Realistic(key);
    }
    typed_fallback(&column.type_tag)
}

fn typed_fallback(type_tag: &TypeTag) -> GeneratorKind {
    if type_tag.is_numeric() {
        GeneratorKind::Numeric
    } else if matches!(type_tag, TypeTag::Date | TypeTag::Time | TypeTag::Timestamp) {
        GeneratorKind::DateLike
    } else {
        GeneratorKind::StringFallback
    }
}

/// Score `column_name` against every [`RealisticKey`] in the registry with
/// `strsim::normalized_levenshtein`, scaled to 0-100 (spec.md §4.4 item 3:
/// "a symmetric string similarity score scaled 0-100"). Returns the best
/// match if its score is at or above `threshold`.
fn best_fuzzy_match(column_name: &str, threshold: u8) -> Option<RealisticKey> {
    let lower = column_name.to_lowercase();
    let mut best: Option<(RealisticKey, u8)> = None;
    for key in RealisticKey::ALL {
        let score = (strsim::normalized_levenshtein(&lower, key.registry_name()) * 100.0).round() as u8;
        if best.map(|(_, b)| score > b).unwrap_or(true) {
            best = Some((*key, score));
        }
    }
    best.filter(|(_, score)| *score >= threshold).map(|(key, _)| key)
}
