//! The injection seam for "realistic" string/date generation.
//!
//! The underlying realistic-string source is explicitly out of scope for
//! this crate (callers are expected to plug in a richer provider for
//! production use). [`RealisticPool`] is the trait a caller implements;
//! [`DefaultRealisticPool`] is a small in-crate fallback, backed by static
//! tables, that's just rich enough to exercise the pipeline and its tests.

use rand::rngs::StdRng;
use rand::Rng;

use rowsmith_core::Value;

/// A named source of human-plausible values, keyed by [`RealisticKey`].
///
/// Implementors only need to handle the keys they care about; returning
/// `None` for an unknown or unsupported key lets the caller fall back to a
/// domain-typed sampler instead.
pub trait RealisticPool: Send + Sync {
    fn sample(&self, key: RealisticKey, rng: &mut StdRng, row_index: usize) -> Option<Value>;
}

/// Registry of realistic-generator keys a column name can be matched
/// against (spec.md §4.4: "a registry of realistic generators (email,
/// first_name, last_name, phone, city, address, isbn, etc.)").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealisticKey {
    Email,
    Phone,
    FirstName,
    LastName,
    FullName,
    City,
    Country,
    Address,
    JobTitle,
    Company,
    Description,
    Isbn,
}

impl RealisticKey {
    /// All registry entries, in a fixed order used for both the substring
    /// fast path and the fuzzy-matching scorer.
    pub const ALL: &'static [RealisticKey] = &[
        RealisticKey::Email,
        RealisticKey::Phone,
        RealisticKey::FirstName,
        RealisticKey::LastName,
        RealisticKey::FullName,
        RealisticKey::City,
        RealisticKey::Country,
        RealisticKey::Address,
        RealisticKey::JobTitle,
        RealisticKey::Company,
        RealisticKey::Description,
        RealisticKey::Isbn,
    ];

    /// The name used to score this key against a column name, and to parse
    /// a `column_type_mappings` string value back into a key.
    pub fn registry_name(self) -> &'static str {
        match self {
            RealisticKey::Email => "email",
            RealisticKey::Phone => "phone",
            RealisticKey::FirstName => "first_name",
            RealisticKey::LastName => "last_name",
            RealisticKey::FullName => "full_name",
            RealisticKey::City => "city",
            RealisticKey::Country => "country",
            RealisticKey::Address => "address",
            RealisticKey::JobTitle => "job_title",
            RealisticKey::Company => "company",
            RealisticKey::Description => "description",
            RealisticKey::Isbn => "isbn",
        }
    }

    pub fn from_registry_name(name: &str) -> Option<RealisticKey> {
        Self::ALL.iter().copied().find(|k| k.registry_name() == name)
    }

    /// Exact substring fragments this key fires on, checked in registry
    /// order.
    fn name_fragments(self) -> &'static [&'static str] {
        match self {
            RealisticKey::Email => &["email", "e_mail"],
            RealisticKey::Phone => &["phone", "tel", "mobile"],
            RealisticKey::FirstName => &["first_name", "fname", "given_name"],
            RealisticKey::LastName => &["last_name", "lname", "surname", "family_name"],
            RealisticKey::FullName => &["full_name", "display_name", "username"],
            RealisticKey::City => &["city", "town"],
            RealisticKey::Country => &["country", "nation"],
            RealisticKey::Address => &["address", "street"],
            RealisticKey::JobTitle => &["job", "title", "position"],
            RealisticKey::Company => &["company", "org", "employer"],
            RealisticKey::Description => &["description", "bio", "summary"],
            RealisticKey::Isbn => &["isbn"],
        }
    }

    /// Fast substring match against a lower-cased column name, used as
    /// the unconditional heuristic when fuzzy matching is off.
    pub fn match_by_substring(column_name: &str) -> Option<RealisticKey> {
        let lower = column_name.to_lowercase();
        if lower == "name" {
            return Some(RealisticKey::FullName);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name_fragments().iter().any(|frag| lower.contains(frag)))
    }
}

pub mod names {
    pub const FIRST_NAMES: &[&str] = &[
        "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda",
        "David", "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica",
        "Thomas", "Sarah", "Charles", "Karen", "Christopher", "Nancy", "Daniel", "Lisa",
        "Matthew", "Margaret", "Anthony", "Betty", "Mark", "Sandra", "Donald", "Ashley",
        "Steven", "Dorothy", "Paul", "Kimberly", "Andrew", "Emily", "Joshua", "Donna",
    ];

    pub const LAST_NAMES: &[&str] = &[
        "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
        "Rodriguez", "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson",
        "Thomas", "Taylor", "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson",
        "White", "Harris", "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson",
    ];

    pub const JOB_TITLES: &[&str] = &[
        "Software Engineer", "Product Manager", "Data Analyst", "Sales Representative",
        "Marketing Coordinator", "Operations Manager", "Financial Analyst",
        "Customer Support Specialist", "Project Manager", "Human Resources Generalist",
        "Account Executive", "UX Designer", "Quality Assurance Engineer",
        "Business Analyst", "Systems Administrator",
    ];
}

pub mod locations {
    pub const CITIES: &[&str] = &[
        "Springfield", "Franklin", "Clinton", "Georgetown", "Salem", "Fairview",
        "Madison", "Arlington", "Ashland", "Burlington", "Greenville", "Manchester",
        "Oakland", "Riverside", "Centerville", "Lexington", "Dover", "Milton",
        "Auburn", "Bristol",
    ];

    pub const COUNTRIES: &[&str] = &[
        "United States", "Canada", "United Kingdom", "Germany", "France", "Japan",
        "Australia", "Brazil", "Mexico", "India", "Spain", "Italy", "Netherlands",
        "Sweden", "Norway",
    ];

    pub const STREET_SUFFIXES: &[&str] = &[
        "Street", "Avenue", "Boulevard", "Lane", "Drive", "Court", "Way", "Place",
        "Terrace", "Circle",
    ];
}

pub mod domains {
    pub const EMAIL_DOMAINS: &[&str] = &[
        "example.com", "mail.example.org", "workmail.example.net", "inbox.example.io",
    ];

    pub const COMPANY_SUFFIXES: &[&str] = &["Inc.", "LLC", "Group", "Partners", "Co.", "& Sons"];

    pub const LOREM_WORDS: &[&str] = &[
        "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit",
        "sed", "do", "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore",
        "magna", "aliqua", "enim", "ad", "minim", "veniam", "quis", "nostrud",
    ];
}

/// The default, in-crate [`RealisticPool`] implementation. Stateless: every
/// call only reads from `'static` tables and the caller-supplied RNG, which
/// is what makes it safe to share across `rayon`-parallel table generators
/// (§4.6 [EXPANSION]).
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRealisticPool;

impl RealisticPool for DefaultRealisticPool {
    fn sample(&self, key: RealisticKey, rng: &mut StdRng, row_index: usize) -> Option<Value> {
        use domains::{COMPANY_SUFFIXES, EMAIL_DOMAINS, LOREM_WORDS};
        use locations::{CITIES, COUNTRIES, STREET_SUFFIXES};
        use names::{FIRST_NAMES, JOB_TITLES, LAST_NAMES};

        let pick = |rng: &mut StdRng, table: &[&str]| table[rng.random_range(0..table.len())].to_string();

        let text = match key {
            RealisticKey::FirstName => pick(rng, FIRST_NAMES),
            RealisticKey::LastName => pick(rng, LAST_NAMES),
            RealisticKey::FullName => format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)),
            RealisticKey::Email => format!(
                "{}.{}{row_index}@{}",
                pick(rng, FIRST_NAMES).to_lowercase(),
                pick(rng, LAST_NAMES).to_lowercase(),
                pick(rng, EMAIL_DOMAINS)
            ),
            RealisticKey::Phone => format!(
                "({:03}) {:03}-{:04}",
                rng.random_range(200..999u16),
                rng.random_range(200..999u16),
                rng.random_range(1000..9999u16)
            ),
            RealisticKey::City => pick(rng, CITIES),
            RealisticKey::Country => pick(rng, COUNTRIES),
            RealisticKey::Address => format!(
                "{} {} {}",
                rng.random_range(1..9999u16),
                pick(rng, FIRST_NAMES),
                pick(rng, STREET_SUFFIXES)
            ),
            RealisticKey::JobTitle => pick(rng, JOB_TITLES),
            RealisticKey::Company => format!("{} {}", pick(rng, LAST_NAMES), pick(rng, COMPANY_SUFFIXES)),
            RealisticKey::Description => {
                let words = rng.random_range(6..=14usize);
                (0..words).map(|_| pick(rng, LOREM_WORDS)).collect::<Vec<_>>().join(" ")
            }
            RealisticKey::Isbn => {
                let digits: String = (0..13).map(|_| char::from(b'0' + rng.random_range(0..10u8))).collect();
                digits
            }
        };
        Some(Value::Text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_match_is_case_insensitive_and_prioritized() {
        assert_eq!(RealisticKey::match_by_substring("user_email"), Some(RealisticKey::Email));
        assert_eq!(RealisticKey::match_by_substring("FIRST_NAME"), Some(RealisticKey::FirstName));
        assert_eq!(RealisticKey::match_by_substring("name"), Some(RealisticKey::FullName));
        assert_eq!(RealisticKey::match_by_substring("some_field"), None);
    }

    #[test]
    fn registry_name_round_trips() {
        for key in RealisticKey::ALL {
            assert_eq!(RealisticKey::from_registry_name(key.registry_name()), Some(*key));
        }
    }

    #[test]
    fn default_pool_email_contains_at_and_row_index() {
        let pool = DefaultRealisticPool;
        let mut rng = rand::SeedableRng::seed_from_u64(42);
        let Some(Value::Text(s)) = pool.sample(RealisticKey::Email, &mut rng, 7) else {
            panic!("expected text");
        };
        assert!(s.contains('@'));
        assert!(s.contains('7'));
    }

    #[test]
    fn default_pool_isbn_is_13_digits() {
        let pool = DefaultRealisticPool;
        let mut rng = rand::SeedableRng::seed_from_u64(1);
        let Some(Value::Text(s)) = pool.sample(RealisticKey::Isbn, &mut rng, 0) else {
            panic!("expected text");
        };
        assert_eq!(s.len(), 13);
        assert!(s.chars().all(|c| c.is_ascii_digit()));
    }
}
