//! Key pattern sets used for classification.
//!
//! A pattern set is an ordered list of lowercase substrings. A key matches
//! when its lowercased form equals a pattern exactly, or failing that,
//! contains any pattern as a substring.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default patterns naming personally identifiable information.
pub const DEFAULT_PII_PATTERNS: &[&str] = &[
    "email",
    "e_mail",
    "phone",
    "mobile",
    "ssn",
    "social_security",
    "passport",
    "national_id",
    "tax_id",
    "driver_license",
    "address",
    "street",
    "postal_code",
    "zip_code",
    "birth",
    "dob",
    "first_name",
    "last_name",
    "full_name",
    "credit_card",
    "card_number",
    "iban",
];

/// Default patterns naming credentials and other secrets.
pub const DEFAULT_SENSITIVE_PATTERNS: &[&str] = &[
    "password",
    "passwd",
    "pwd",
    "secret",
    "token",
    "api_key",
    "apikey",
    "access_key",
    "private_key",
    "authorization",
    "credential",
    "cookie",
    "jwt",
    "bearer",
    "signature",
    "session_key",
];

static DEFAULT_PII: Lazy<PatternSet> = Lazy::new(|| PatternSet::new(DEFAULT_PII_PATTERNS.iter().copied()));

static DEFAULT_SENSITIVE: Lazy<PatternSet> =
    Lazy::new(|| PatternSet::new(DEFAULT_SENSITIVE_PATTERNS.iter().copied()));

/// Ordered, deduplicated list of lowercase key patterns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PatternSet {
    patterns: Vec<String>,
    exact: HashSet<String>,
}

impl PatternSet {
    /// Build a pattern set. Patterns are lowercased; empty and duplicate
    /// entries are dropped while keeping first-seen order.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = PatternSet::default();
        set.extend(patterns);
        set
    }

    /// The built-in PII pattern set.
    pub fn default_pii() -> Self {
        DEFAULT_PII.clone()
    }

    /// The built-in sensitive-data pattern set.
    pub fn default_sensitive() -> Self {
        DEFAULT_SENSITIVE.clone()
    }

    /// Append patterns, skipping any already present.
    pub fn extend<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let lowered = pattern.as_ref().trim().to_lowercase();
            if lowered.is_empty() || self.exact.contains(&lowered) {
                continue;
            }
            self.exact.insert(lowered.clone());
            self.patterns.push(lowered);
        }
    }

    /// Check an already-lowercased key against the set.
    ///
    /// Exact match first, then a linear substring scan.
    pub fn matches_lowered(&self, lowered_key: &str) -> bool {
        if self.exact.contains(lowered_key) {
            return true;
        }
        self.patterns.iter().any(|p| lowered_key.contains(p.as_str()))
    }

    /// Check a key as given; lowercases it first.
    pub fn matches(&self, key: &str) -> bool {
        self.matches_lowered(&lowercase_key(key))
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the set has no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterate patterns in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }
}

impl PartialEq for PatternSet {
    fn eq(&self, other: &Self) -> bool {
        self.patterns == other.patterns
    }
}

impl Eq for PatternSet {}

impl From<Vec<String>> for PatternSet {
    fn from(value: Vec<String>) -> Self {
        PatternSet::new(value)
    }
}

impl From<PatternSet> for Vec<String> {
    fn from(value: PatternSet) -> Self {
        value.patterns
    }
}

/// Lowercase a key, borrowing when it is already lowercase ASCII.
pub(crate) fn lowercase_key(key: &str) -> std::borrow::Cow<'_, str> {
    if key.bytes().all(|b| !b.is_ascii_uppercase() && b.is_ascii()) {
        std::borrow::Cow::Borrowed(key)
    } else {
        std::borrow::Cow::Owned(key.to_lowercase())
    }
}
