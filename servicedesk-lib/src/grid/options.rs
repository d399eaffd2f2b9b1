//! Grid configuration

use crate::api::query::DateRange;
use crate::api::query::FilterCriteria;
use crate::api::query::SortKey;

/// Default page size.
pub const DEFAULT_STEP: usize = 20;

/// Default collation locale for string columns.
pub const DEFAULT_LOCALE: &str = "ru";

/// Construction options for a grid.
///
/// # Example
///
/// ```
/// use servicedesk_lib::api::query::SortKey;
/// use servicedesk_lib::grid::GridOptions;
///
/// let options = GridOptions::default()
///     .with_step(50)
///     .with_sorted(SortKey::desc("created"))
///     .with_href("/tickets");
/// ```
#[derive(Debug, Clone)]
pub struct GridOptions {
    /// Page size used when scrolling.
    ///
    /// Default: 20
    pub step: usize,

    /// First row of the initial window.
    ///
    /// Default: 0
    pub start: usize,

    /// End of the initial window; `start + step` when unset.
    pub end: Option<usize>,

    /// Initial sort; the first sortable column ascending when unset.
    pub sorted: Option<SortKey>,

    /// Sort loaded rows in memory instead of re-querying the server.
    /// Locally sorted grids do not paginate on scroll.
    ///
    /// Default: false
    pub sort_locally: bool,

    /// BCP 47 locale used to collate string columns.
    ///
    /// Default: `ru`
    pub locale: String,

    /// Static date bounds sent when the filter criteria have none.
    pub dates: Option<DateRange>,

    /// Initial filter criteria.
    pub filtered: Option<FilterCriteria>,

    /// Base path for row links (`<href>/<id>`).
    pub href: Option<String>,

    /// Stop scroll loading once a page comes back shorter than `step`.
    ///
    /// Default: false, every bottom crossing fetches the next window.
    pub stop_when_exhausted: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            start: 0,
            end: None,
            sorted: None,
            sort_locally: false,
            locale: DEFAULT_LOCALE.to_string(),
            dates: None,
            filtered: None,
            href: None,
            stop_when_exhausted: false,
        }
    }
}

impl GridOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    /// Sets an explicit initial window.
    pub fn with_window(mut self, start: usize, end: usize) -> Self {
        self.start = start;
        self.end = Some(end);
        self
    }

    /// Sets the initial sort.
    pub fn with_sorted(mut self, sorted: SortKey) -> Self {
        self.sorted = Some(sorted);
        self
    }

    /// Enables or disables local sorting.
    pub fn with_sort_locally(mut self, enabled: bool) -> Self {
        self.sort_locally = enabled;
        self
    }

    /// Sets the collation locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Sets static date bounds.
    pub fn with_dates(mut self, dates: DateRange) -> Self {
        self.dates = Some(dates);
        self
    }

    /// Sets initial filter criteria.
    pub fn with_filtered(mut self, filtered: FilterCriteria) -> Self {
        self.filtered = Some(filtered);
        self
    }

    /// Sets the row link base path.
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Enables or disables exhaustion tracking.
    pub fn with_stop_when_exhausted(mut self, enabled: bool) -> Self {
        self.stop_when_exhausted = enabled;
        self
    }
}
