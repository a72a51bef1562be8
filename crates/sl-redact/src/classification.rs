//! Classification results for field keys.

use serde::{Deserialize, Serialize};

/// Result of classifying a single field key.
///
/// At most one flag is set: when a key is PII the sensitive check is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Classification {
    /// The key names personally identifiable information.
    pub is_pii: bool,
    /// The key names a credential or other secret.
    pub is_sensitive: bool,
}

impl Classification {
    /// Classification for keys that need no masking.
    pub const PUBLIC: Classification = Classification {
        is_pii: false,
        is_sensitive: false,
    };

    /// A PII classification.
    pub const PII: Classification = Classification {
        is_pii: true,
        is_sensitive: false,
    };

    /// A sensitive (non-PII) classification.
    pub const SENSITIVE: Classification = Classification {
        is_pii: false,
        is_sensitive: true,
    };

    /// Build from raw flags, applying PII-first precedence.
    pub fn from_flags(is_pii: bool, is_sensitive: bool) -> Self {
        if is_pii {
            Self::PII
        } else if is_sensitive {
            Self::SENSITIVE
        } else {
            Self::PUBLIC
        }
    }

    /// Returns whether the value must be replaced by a mask.
    pub fn is_masked(&self) -> bool {
        self.is_pii || self.is_sensitive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pii_wins_over_sensitive() {
        let c = Classification::from_flags(true, true);
        assert_eq!(c, Classification::PII);
        assert!(!c.is_sensitive);
    }

    #[test]
    fn public_is_not_masked() {
        assert!(!Classification::PUBLIC.is_masked());
        assert!(Classification::SENSITIVE.is_masked());
        assert_eq!(Classification::from_flags(false, false), Classification::default());
    }
}
