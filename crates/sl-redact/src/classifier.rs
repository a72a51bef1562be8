//! Field-name classifier with a per-category cache.
//!
//! The classifier answers "must the value under this key be masked, and as
//! what?". Results are a pure function of the key, the current pattern sets
//! and the masking toggles; the caches only remember answers for keys already
//! seen.

use crate::cache::ClassificationCache;
use crate::pattern::lowercase_key;
use crate::{Classification, PatternSet, RedactionPolicy, INTERNAL_TARGET};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// One classification category: a toggle, its patterns, and its cache.
#[derive(Debug)]
struct Category {
    enabled: AtomicBool,
    patterns: RwLock<Arc<PatternSet>>,
    cache: ClassificationCache,
}

impl Category {
    fn new(patterns: PatternSet, enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            patterns: RwLock::new(Arc::new(patterns)),
            cache: ClassificationCache::new(),
        }
    }

    fn matches(&self, key: &str) -> bool {
        // Disabled categories never touch the cache.
        if !self.enabled.load(Ordering::Relaxed) {
            return false;
        }

        if let Some(hit) = self.cache.get(key) {
            return hit;
        }

        let generation = self.cache.generation();
        let patterns = self.snapshot();
        let result = patterns.matches_lowered(&lowercase_key(key));
        self.cache.insert(key, result, generation);
        result
    }

    fn snapshot(&self) -> Arc<PatternSet> {
        self.patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, patterns: PatternSet) {
        *self.patterns.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(patterns);
        // Clear after the swap so no in-flight result from the old set survives.
        self.cache.clear();
    }

    fn extend<I, S>(&self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut next = (*self.snapshot()).clone();
        next.extend(patterns);
        self.replace(next);
    }
}

/// Classifies field keys as PII, sensitive, or public.
///
/// Safe to share across threads; typically held in an `Arc` by the logger.
#[derive(Debug)]
pub struct FieldClassifier {
    pii: Category,
    sensitive: Category,
}

impl FieldClassifier {
    /// Create a classifier with the built-in pattern sets and masking enabled.
    pub fn new() -> Self {
        Self::with_patterns(PatternSet::default_pii(), PatternSet::default_sensitive())
    }

    /// Create a classifier with explicit pattern sets.
    pub fn with_patterns(pii: PatternSet, sensitive: PatternSet) -> Self {
        Self {
            pii: Category::new(pii, true),
            sensitive: Category::new(sensitive, true),
        }
    }

    /// Create a classifier matching a policy's patterns and toggles.
    pub fn from_policy(policy: &RedactionPolicy) -> Self {
        Self {
            pii: Category::new(policy.pii_patterns.clone(), policy.mask_pii),
            sensitive: Category::new(policy.sensitive_patterns.clone(), policy.mask_sensitive),
        }
    }

    /// Classify a key.
    ///
    /// PII is checked first; the sensitive lookup only runs when the key is
    /// not PII. Never fails: unmatched keys are public.
    pub fn classify(&self, key: &str) -> Classification {
        if self.pii.matches(key) {
            return Classification::PII;
        }
        if self.sensitive.matches(key) {
            return Classification::SENSITIVE;
        }
        Classification::PUBLIC
    }

    /// Bring patterns and toggles in line with a policy.
    ///
    /// Caches are only cleared for categories whose patterns changed.
    pub fn apply_policy(&self, policy: &RedactionPolicy) {
        self.set_pii_masking(policy.mask_pii);
        self.set_sensitive_masking(policy.mask_sensitive);
        if *self.pii.snapshot() != policy.pii_patterns {
            self.set_pii_patterns(policy.pii_patterns.clone());
        }
        if *self.sensitive.snapshot() != policy.sensitive_patterns {
            self.set_sensitive_patterns(policy.sensitive_patterns.clone());
        }
    }

    /// Enable or disable PII masking. Takes effect on the next lookup.
    pub fn set_pii_masking(&self, enabled: bool) {
        self.pii.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Enable or disable sensitive masking. Takes effect on the next lookup.
    pub fn set_sensitive_masking(&self, enabled: bool) {
        self.sensitive.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Replace the PII patterns and clear the PII cache.
    pub fn set_pii_patterns(&self, patterns: PatternSet) {
        tracing::debug!(target: INTERNAL_TARGET, count = patterns.len(), "replacing pii patterns");
        self.pii.replace(patterns);
    }

    /// Replace the sensitive patterns and clear the sensitive cache.
    pub fn set_sensitive_patterns(&self, patterns: PatternSet) {
        tracing::debug!(target: INTERNAL_TARGET, count = patterns.len(), "replacing sensitive patterns");
        self.sensitive.replace(patterns);
    }

    /// Append PII patterns and clear the PII cache.
    pub fn add_pii_patterns<I, S>(&self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.pii.extend(patterns);
    }

    /// Append sensitive patterns and clear the sensitive cache.
    pub fn add_sensitive_patterns<I, S>(&self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sensitive.extend(patterns);
    }

    /// Drop every cached result.
    ///
    /// The caches grow with the number of distinct keys seen. Long-lived
    /// processes with unbounded key cardinality should call this periodically.
    pub fn clear_cache(&self) {
        self.pii.cache.clear();
        self.sensitive.cache.clear();
    }

    /// Number of cached entries across both categories.
    pub fn cache_len(&self) -> usize {
        self.pii.cache.len() + self.sensitive.cache.len()
    }
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self::new()
    }
}
