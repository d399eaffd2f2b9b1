//! Query parameter generation.

use log::warn;
use url::Url;
use url::form_urlencoded;

use super::DateRange;
use super::FilterCriteria;
use super::SortKey;

/// Parameters owned by the grid; criteria cannot override them.
const RESERVED_KEYS: [&str; 4] = ["sort", "order", "start", "end"];

const DATE_GTE: &str = "date_gte";
const DATE_LTE: &str = "date_lte";

/// Ordered key/value pairs for a GET query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Returns the first value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the keys in order.
    pub fn keys(&self) -> Vec<&str> {
        self.pairs.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Returns the number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Renders `application/x-www-form-urlencoded` text.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Appends the parameters to a URL's query string.
    pub fn apply_to(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        url.query_pairs_mut().extend_pairs(self.iter());
    }
}

/// Builds the outbound parameters for one grid fetch.
///
/// Pure: the same inputs always give the same parameters. Output order is
/// date bounds, filter values, then `sort`, `order`, `start`, `end`.
///
/// # Example
///
/// ```
/// use servicedesk_lib::api::query::{FilterCriteria, QueryBuilder, SortKey};
///
/// let sort = SortKey::asc("id");
/// let criteria = FilterCriteria::new().with("status", "");
/// let params = QueryBuilder::new(&sort, 0, 20).criteria(Some(&criteria)).build();
///
/// assert_eq!(params.to_query_string(), "status=&sort=id&order=asc&start=0&end=20");
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    sort: &'a SortKey,
    start: usize,
    end: usize,
    criteria: Option<&'a FilterCriteria>,
    default_dates: Option<&'a DateRange>,
}

impl<'a> QueryBuilder<'a> {
    /// Creates a builder for a sort and window.
    pub fn new(sort: &'a SortKey, start: usize, end: usize) -> Self {
        Self {
            sort,
            start,
            end,
            criteria: None,
            default_dates: None,
        }
    }

    /// Sets the filter criteria.
    pub fn criteria(mut self, criteria: Option<&'a FilterCriteria>) -> Self {
        self.criteria = criteria;
        self
    }

    /// Sets the grid's static date bounds, used when the criteria carry no
    /// date range of their own.
    pub fn default_dates(mut self, dates: Option<&'a DateRange>) -> Self {
        self.default_dates = dates;
        self
    }

    /// Builds the parameters.
    pub fn build(&self) -> QueryParams {
        let mut params = QueryParams::new();

        let dates = self
            .criteria
            .and_then(FilterCriteria::date_range)
            .or(self.default_dates);

        if let Some(range) = dates {
            params.push(DATE_GTE, range.from_param());
            params.push(DATE_LTE, range.to_param());
        }

        if let Some(criteria) = self.criteria {
            for (key, value) in criteria.iter() {
                if RESERVED_KEYS.contains(&key) {
                    warn!("Ignoring filter key '{}': reserved for sorting and paging", key);
                    continue;
                }
                if dates.is_some() && (key == DATE_GTE || key == DATE_LTE) {
                    continue;
                }
                if let Some(value) = value {
                    params.push(key, value);
                }
            }
        }

        params.push("sort", self.sort.column_id.as_str());
        params.push("order", self.sort.direction.as_str());
        params.push("start", self.start.to_string());
        params.push("end", self.end.to_string());

        params
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::api::query::Direction;

    fn range(day: u32) -> DateRange {
        DateRange::new(
            Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, day + 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_always_has_sort_and_window() {
        let sort = SortKey::new("priority", Direction::Desc);
        let params = QueryBuilder::new(&sort, 20, 40).build();
        assert_eq!(params.keys(), vec!["sort", "order", "start", "end"]);
        assert_eq!(params.get("sort"), Some("priority"));
        assert_eq!(params.get("order"), Some("desc"));
        assert_eq!(params.get("start"), Some("20"));
        assert_eq!(params.get("end"), Some("40"));
    }

    #[test]
    fn test_empty_string_values_are_kept() {
        let sort = SortKey::asc("id");
        let criteria = FilterCriteria::new()
            .with("department", "")
            .with("inventory_like", "");
        let params = QueryBuilder::new(&sort, 0, 21).criteria(Some(&criteria)).build();
        assert_eq!(params.get("department"), Some(""));
        assert_eq!(params.get("inventory_like"), Some(""));
        assert_eq!(
            params.to_query_string(),
            "department=&inventory_like=&sort=id&order=asc&start=0&end=21"
        );
    }

    #[test]
    fn test_unset_values_are_omitted() {
        let sort = SortKey::asc("id");
        let mut criteria = FilterCriteria::new().with("status", "1");
        criteria.set("type", None);
        let params = QueryBuilder::new(&sort, 0, 20).criteria(Some(&criteria)).build();
        assert!(!params.contains("type"));
        assert_eq!(params.get("status"), Some("1"));
    }

    #[test]
    fn test_criteria_dates_win_over_defaults() {
        let sort = SortKey::asc("id");
        let defaults = range(1);
        let criteria = FilterCriteria::new().with_date_range(range(10));
        let params = QueryBuilder::new(&sort, 0, 20)
            .criteria(Some(&criteria))
            .default_dates(Some(&defaults))
            .build();
        assert_eq!(params.get("date_gte"), Some("2024-03-10T00:00:00.000Z"));
        assert_eq!(params.get("date_lte"), Some("2024-03-11T00:00:00.000Z"));
        assert_eq!(params.keys()[..2], ["date_gte", "date_lte"]);
    }

    #[test]
    fn test_default_dates_without_criteria() {
        let sort = SortKey::asc("id");
        let defaults = range(1);
        let params = QueryBuilder::new(&sort, 0, 20).default_dates(Some(&defaults)).build();
        assert_eq!(params.get("date_gte"), Some("2024-03-01T00:00:00.000Z"));
    }

    #[test]
    fn test_raw_date_keys_pass_through_without_range() {
        let sort = SortKey::asc("id");
        let criteria = FilterCriteria::new().with("date_gte", "undefined");
        let params = QueryBuilder::new(&sort, 0, 20).criteria(Some(&criteria)).build();
        assert_eq!(params.get("date_gte"), Some("undefined"));
    }

    #[test]
    fn test_raw_date_keys_dropped_when_range_present() {
        let sort = SortKey::asc("id");
        let criteria = FilterCriteria::new()
            .with("date_gte", "stale")
            .with_date_range(range(10));
        let params = QueryBuilder::new(&sort, 0, 20).criteria(Some(&criteria)).build();
        assert_eq!(params.iter().filter(|(k, _)| *k == "date_gte").count(), 1);
        assert_eq!(params.get("date_gte"), Some("2024-03-10T00:00:00.000Z"));
    }

    #[test]
    fn test_reserved_keys_cannot_be_overridden() {
        let sort = SortKey::asc("id");
        let criteria = FilterCriteria::new().with("start", "100").with("sort", "title");
        let params = QueryBuilder::new(&sort, 0, 20).criteria(Some(&criteria)).build();
        assert_eq!(params.len(), 4);
        assert_eq!(params.get("start"), Some("0"));
        assert_eq!(params.get("sort"), Some("id"));
    }

    #[test]
    fn test_query_string_escaping() {
        let sort = SortKey::asc("id");
        let criteria = FilterCriteria::new().with("description_like", "toner & ink");
        let params = QueryBuilder::new(&sort, 0, 20).criteria(Some(&criteria)).build();
        assert!(params.to_query_string().starts_with("description_like=toner+%26+ink&"));
    }

    #[test]
    fn test_apply_to_url() {
        let sort = SortKey::asc("id");
        let params = QueryBuilder::new(&sort, 0, 20).build();
        let mut url = Url::parse("http://localhost/api/tickets/").unwrap();
        params.apply_to(&mut url);
        assert_eq!(
            url.as_str(),
            "http://localhost/api/tickets/?sort=id&order=asc&start=0&end=20"
        );
    }
}
