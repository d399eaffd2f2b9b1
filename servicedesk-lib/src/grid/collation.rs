//! Locale-aware string comparison.

use std::cmp::Ordering;
use std::fmt;

use icu::collator::Collator;
use icu::collator::CollatorBorrowed;
use icu::locale::Locale;

use crate::error::ConfigError;

/// Compares strings the way a reader of `locale` expects, not by code
/// point.
pub struct Collation {
    locale: String,
    collator: CollatorBorrowed<'static>,
}

impl Collation {
    /// Creates a collation for a BCP 47 locale such as `ru` or `en-US`.
    pub fn new(locale: &str) -> Result<Self, ConfigError> {
        let parsed = locale.parse::<Locale>().map_err(|e| ConfigError::InvalidLocale {
            locale: locale.to_string(),
            message: e.to_string(),
        })?;

        let collator = Collator::try_new(parsed.into(), Default::default()).map_err(|e| {
            ConfigError::InvalidLocale {
                locale: locale.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            locale: locale.to_string(),
            collator,
        })
    }

    /// Returns the locale this collation was built for.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Compares two strings.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator.compare(a, b)
    }
}

impl fmt::Debug for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collation")
            .field("locale", &self.locale)
            .finish()
    }
}
