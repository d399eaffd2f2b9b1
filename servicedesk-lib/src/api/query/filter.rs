//! Filter criteria supplied by a filter panel.

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;

/// Inclusive date bounds, sent as `date_gte` / `date_lte`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Lower bound.
    pub from: DateTime<Utc>,
    /// Upper bound.
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Creates a date range.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Formats a bound as ISO-8601 with milliseconds and a `Z` suffix,
    /// e.g. `2024-01-31T00:00:00.000Z`.
    pub fn format_bound(bound: &DateTime<Utc>) -> String {
        bound.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Returns the formatted lower bound.
    pub fn from_param(&self) -> String {
        Self::format_bound(&self.from)
    }

    /// Returns the formatted upper bound.
    pub fn to_param(&self) -> String {
        Self::format_bound(&self.to)
    }
}

/// Filter values merged into every outbound query.
///
/// Keys keep insertion order. A `None` value means "not set" and is left out
/// of the query; an empty string is a real value and is sent as-is, which
/// the server reads as "no constraint".
///
/// # Example
///
/// ```
/// use servicedesk_lib::api::query::FilterCriteria;
///
/// let criteria = FilterCriteria::new()
///     .with("description_like", "toner")
///     .with("department", "");
///
/// assert_eq!(criteria.get("department"), Some(Some("")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    values: Vec<(String, Option<String>)>,
    date_range: Option<DateRange>,
}

impl FilterCriteria {
    /// Creates empty criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, returning the criteria for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, Some(value.into()));
        self
    }

    /// Sets the date range, returning the criteria for chaining.
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Sets or clears a value. Existing keys keep their position.
    pub fn set(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.values.push((key, value)),
        }
    }

    /// Removes a key entirely.
    pub fn remove(&mut self, key: &str) {
        self.values.retain(|(k, _)| k != key);
    }

    /// Returns `None` if the key is absent, `Some(None)` if it is present
    /// without a value.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    /// Sets or clears the date range.
    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.date_range = range;
    }

    /// Returns the date range.
    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    /// Iterates over keys and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Returns `true` if there are no keys and no date range.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.date_range.is_none()
    }
}
