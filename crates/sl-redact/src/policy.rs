//! Redaction policy configuration.
//!
//! Defines which key patterns count as PII or sensitive, whether each
//! category is masked at all, and the strings written in place of masked
//! values.

use crate::{Classification, PatternSet, RedactionError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Schema version for the policy file.
pub const POLICY_SCHEMA_VERSION: &str = "1.0.0";

/// Default replacement for PII values.
pub const DEFAULT_PII_MASK: &str = "***PII***";

/// Default replacement for sensitive values.
pub const DEFAULT_SENSITIVE_MASK: &str = "***MASKED***";

/// Redaction policy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionPolicy {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Whether PII values are masked.
    #[serde(default = "default_true")]
    pub mask_pii: bool,

    /// Whether sensitive values are masked.
    #[serde(default = "default_true")]
    pub mask_sensitive: bool,

    /// Replacement written for PII values.
    #[serde(default = "default_pii_mask")]
    pub pii_mask: String,

    /// Replacement written for sensitive values.
    #[serde(default = "default_sensitive_mask")]
    pub sensitive_mask: String,

    /// Patterns naming PII keys.
    #[serde(default = "PatternSet::default_pii")]
    pub pii_patterns: PatternSet,

    /// Patterns naming sensitive keys.
    #[serde(default = "PatternSet::default_sensitive")]
    pub sensitive_patterns: PatternSet,

    /// Mask matching keys of every field kind, not only strings.
    #[serde(default)]
    pub redact_all_kinds: bool,
}

fn default_schema_version() -> String {
    POLICY_SCHEMA_VERSION.to_string()
}

fn default_true() -> bool {
    true
}

fn default_pii_mask() -> String {
    DEFAULT_PII_MASK.to_string()
}

fn default_sensitive_mask() -> String {
    DEFAULT_SENSITIVE_MASK.to_string()
}

impl RedactionPolicy {
    /// Create a new policy with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load policy from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let policy: RedactionPolicy = serde_json::from_str(&content)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Save policy to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Semantic checks that serde cannot express.
    pub fn validate(&self) -> crate::Result<()> {
        if self.mask_pii && self.pii_mask.is_empty() {
            return Err(RedactionError::policy("pii_mask must not be empty"));
        }
        if self.mask_sensitive && self.sensitive_mask.is_empty() {
            return Err(RedactionError::policy("sensitive_mask must not be empty"));
        }
        Ok(())
    }

    /// The replacement text for a classification, if it is masked.
    pub fn mask_for(&self, classification: Classification) -> Option<&str> {
        if classification.is_pii {
            Some(&self.pii_mask)
        } else if classification.is_sensitive {
            Some(&self.sensitive_mask)
        } else {
            None
        }
    }

    /// Disable or enable PII masking.
    pub fn with_mask_pii(mut self, enabled: bool) -> Self {
        self.mask_pii = enabled;
        self
    }

    /// Disable or enable sensitive masking.
    pub fn with_mask_sensitive(mut self, enabled: bool) -> Self {
        self.mask_sensitive = enabled;
        self
    }

    /// Set the mask strings.
    pub fn with_masks(mut self, pii: impl Into<String>, sensitive: impl Into<String>) -> Self {
        self.pii_mask = pii.into();
        self.sensitive_mask = sensitive.into();
        self
    }

    /// Mask matching keys of every field kind.
    pub fn with_redact_all_kinds(mut self, enabled: bool) -> Self {
        self.redact_all_kinds = enabled;
        self
    }
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self {
            schema_version: POLICY_SCHEMA_VERSION.to_string(),
            mask_pii: true,
            mask_sensitive: true,
            pii_mask: DEFAULT_PII_MASK.to_string(),
            sensitive_mask: DEFAULT_SENSITIVE_MASK.to_string(),
            pii_patterns: PatternSet::default_pii(),
            sensitive_patterns: PatternSet::default_sensitive(),
            redact_all_kinds: false,
        }
    }
}
