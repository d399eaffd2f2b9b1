//! The grid state machine.
//!
//! [`GridState`] owns everything a grid knows (columns, sort, window, filter
//! criteria, loaded rows) and turns user actions into [`FetchRequest`]s. It
//! never performs I/O: the caller executes each request against a transport
//! and hands the result back to [`GridState::complete`].

use log::debug;
use log::info;
use log::trace;
use log::warn;

use super::Collation;
use super::DataStore;
use super::GridOptions;
use super::Renderer;
use super::ScrollPosition;
use super::ScrollTrigger;
use super::SortMode;
use super::SortState;
use super::render::row_link;
use crate::api::query::DateRange;
use crate::api::query::Direction;
use crate::api::query::FilterCriteria;
use crate::api::query::PaginationWindow;
use crate::api::query::QueryBuilder;
use crate::api::query::QueryParams;
use crate::api::query::SortKey;
use crate::error::ConfigError;
use crate::error::Error;
use crate::model::ColumnCatalog;
use crate::model::Row;

/// How a fetch result is merged into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Replace every row (mount, sort, filter, reload).
    Replace,
    /// Append a scroll page.
    Append,
}

/// A fetch the caller must execute.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub kind: FetchKind,
    /// Window generation the request was issued in.
    pub generation: u64,
    pub params: QueryParams,
}

/// What a grid action ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The store was replaced with this many rows.
    Replaced { rows: usize },
    /// This many rows were appended.
    Appended { rows: usize },
    /// Loaded rows were reordered without a fetch.
    SortedLocally(SortKey),
    /// The header is not sortable.
    Ignored,
    /// Nothing needed fetching (e.g. a scroll above the threshold).
    Skipped,
    /// The result belonged to an older window and was dropped.
    Superseded,
}

/// Result of a header click.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderAction {
    Ignored,
    /// Rows were sorted in memory; re-render them.
    Local(SortKey),
    Fetch(FetchRequest),
}

/// Grid state without I/O.
#[derive(Debug)]
pub struct GridState {
    catalog: ColumnCatalog,
    sort: SortState,
    window: PaginationWindow,
    filtered: Option<FilterCriteria>,
    dates: Option<DateRange>,
    store: DataStore,
    collation: Collation,
    trigger: ScrollTrigger,
    href: Option<String>,
    stop_when_exhausted: bool,
}

impl GridState {
    /// Creates grid state, validating options against the catalog.
    pub fn new(catalog: ColumnCatalog, options: GridOptions) -> Result<Self, ConfigError> {
        let active = match options.sorted {
            Some(sorted) => sorted,
            None => catalog.default_sort()?,
        };
        let mode = if options.sort_locally {
            SortMode::Local
        } else {
            SortMode::Server
        };
        let sort = SortState::new(&catalog, active, mode)?;

        let end = options.end.unwrap_or(options.start + options.step);
        let window = PaginationWindow::with_range(options.step, options.start, end)?;
        let collation = Collation::new(&options.locale)?;

        Ok(Self {
            catalog,
            sort,
            window,
            filtered: options.filtered,
            dates: options.dates,
            store: DataStore::new(),
            collation,
            trigger: ScrollTrigger::new(),
            href: options.href,
            stop_when_exhausted: options.stop_when_exhausted,
        })
    }

    /// Replaces the scroll trigger.
    pub fn with_trigger(mut self, trigger: ScrollTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Starts the initial load of the current window.
    pub fn mount(&mut self) -> FetchRequest {
        self.window.restart();
        info!(
            "Mounting grid: sort {} {}, window [{}, {})",
            self.sort.active().column_id,
            self.sort.active().direction,
            self.window.start(),
            self.window.end()
        );
        self.request(FetchKind::Replace)
    }

    /// Handles a header click.
    pub fn click_header(&mut self, column_id: &str) -> Result<HeaderAction, ConfigError> {
        let Some(key) = self.sort.click(&self.catalog, column_id)? else {
            debug!("Ignoring click on unsortable header '{}'", column_id);
            return Ok(HeaderAction::Ignored);
        };

        if self.sort.is_local() {
            self.sort_store()?;
            return Ok(HeaderAction::Local(key));
        }

        self.window.reset();
        Ok(HeaderAction::Fetch(self.request(FetchKind::Replace)))
    }

    /// Handles a scroll. Returns a request when the next page should load.
    ///
    /// Nothing is fetched for locally sorted grids, while a page or the
    /// first window is still loading, or (when exhaustion tracking is on)
    /// after a short page.
    pub fn scroll(&mut self, position: ScrollPosition) -> Option<FetchRequest> {
        if self.sort.is_local() || !self.trigger.crossed(position) {
            return None;
        }
        if self.stop_when_exhausted && self.window.is_exhausted() {
            debug!("Grid exhausted, not loading past row {}", self.window.end());
            return None;
        }
        if self.window.is_replacing() {
            debug!("First window not loaded yet, skipping scroll");
            return None;
        }
        if !self.window.begin_load() {
            debug!("Page already loading, skipping scroll");
            return None;
        }
        self.window.advance();
        Some(self.request(FetchKind::Append))
    }

    /// Replaces the filter criteria and reloads from the first window.
    pub fn apply_filter(&mut self, criteria: Option<FilterCriteria>) -> FetchRequest {
        self.filtered = criteria;
        self.reload()
    }

    /// Reloads from the first window with the current sort and criteria.
    pub fn reload(&mut self) -> FetchRequest {
        self.window.reset();
        self.request(FetchKind::Replace)
    }

    /// Sets an explicit server sort and window.
    pub fn sort_on_server(
        &mut self,
        column_id: &str,
        direction: Direction,
        start: usize,
        end: usize,
    ) -> Result<FetchRequest, ConfigError> {
        self.sort
            .set_active(&self.catalog, SortKey::new(column_id, direction))?;
        self.window.set_range(start, end)?;
        Ok(self.request(FetchKind::Replace))
    }

    /// Sorts the loaded rows in memory.
    pub fn sort_locally(&mut self, column_id: &str, direction: Direction) -> Result<SortKey, ConfigError> {
        let key = SortKey::new(column_id, direction);
        self.sort.set_active(&self.catalog, key.clone())?;
        self.sort_store()?;
        Ok(key)
    }

    /// Replaces the loaded rows without fetching.
    pub fn add_rows(&mut self, rows: Vec<Row>) {
        self.store.replace(rows);
    }

    /// Appends rows without fetching.
    pub fn update(&mut self, rows: Vec<Row>) {
        self.store.append(rows);
    }

    /// Merges a fetch result.
    ///
    /// Results from an older generation are dropped, errors included. A
    /// replace unblocks scrolling and an append releases the loading flag,
    /// whether or not the fetch failed.
    pub fn complete(&mut self, request: &FetchRequest, result: Result<Vec<Row>, Error>) -> Result<Outcome, Error> {
        if request.generation != self.window.generation() {
            match &result {
                Ok(rows) => debug!(
                    "Dropping {} rows from generation {} (current {})",
                    rows.len(),
                    request.generation,
                    self.window.generation()
                ),
                Err(e) => warn!("Dropping failed fetch from generation {}: {}", request.generation, e),
            }
            return Ok(Outcome::Superseded);
        }

        match request.kind {
            FetchKind::Replace => {
                self.window.finish_replace();
                let rows = result?;
                let count = rows.len();
                self.window.record_page(count);
                self.store.replace(rows);
                debug!("Loaded {} rows", count);
                Ok(Outcome::Replaced { rows: count })
            }
            FetchKind::Append => {
                self.window.finish_load();
                let rows = result?;
                let count = rows.len();
                self.window.record_page(count);
                self.store.append(rows);
                debug!("Appended {} rows, {} loaded", count, self.store.len());
                Ok(Outcome::Appended { rows: count })
            }
        }
    }

    /// Pushes the rows touched by an outcome to a renderer.
    pub fn render<R: Renderer + ?Sized>(&self, outcome: &Outcome, renderer: &mut R) {
        match outcome {
            Outcome::Replaced { .. } => renderer.replace_rows(&self.catalog, self.store.rows()),
            Outcome::Appended { rows: count } => {
                let rows = self.store.rows();
                let from = rows.len().saturating_sub(*count);
                renderer.append_rows(&self.catalog, &rows[from..]);
            }
            Outcome::SortedLocally(key) => {
                renderer.set_sorted(key);
                renderer.replace_rows(&self.catalog, self.store.rows());
            }
            Outcome::Ignored | Outcome::Skipped | Outcome::Superseded => {}
        }
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    /// Returns the active sort.
    pub fn sorted(&self) -> &SortKey {
        self.sort.active()
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn window(&self) -> &PaginationWindow {
        &self.window
    }

    pub fn start(&self) -> usize {
        self.window.start()
    }

    pub fn end(&self) -> usize {
        self.window.end()
    }

    pub fn is_loading(&self) -> bool {
        self.window.is_loading()
    }

    pub fn filtered(&self) -> Option<&FilterCriteria> {
        self.filtered.as_ref()
    }

    /// Replaces the filter criteria without reloading.
    pub fn set_filtered(&mut self, criteria: Option<FilterCriteria>) {
        self.filtered = criteria;
    }

    pub fn dates(&self) -> Option<&DateRange> {
        self.dates.as_ref()
    }

    pub fn rows(&self) -> &[Row] {
        self.store.rows()
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// Returns the link for a row, if the grid has an `href`.
    pub fn link(&self, row: &Row) -> Option<String> {
        row_link(self.href.as_deref()?, row)
    }

    /// Builds the query parameters for the current state.
    pub fn params(&self) -> QueryParams {
        QueryBuilder::new(self.sort.active(), self.window.start(), self.window.end())
            .criteria(self.filtered.as_ref())
            .default_dates(self.dates.as_ref())
            .build()
    }

    fn request(&self, kind: FetchKind) -> FetchRequest {
        FetchRequest {
            kind,
            generation: self.window.generation(),
            params: self.params(),
        }
    }

    fn sort_store(&mut self) -> Result<(), ConfigError> {
        let key = self.sort.active();
        let column = self.catalog.sortable_column(&key.column_id)?;
        trace!(
            "Sorting {} rows locally by {} {}",
            self.store.len(),
            key.column_id,
            key.direction
        );
        self.store.sort(column, key.direction, &self.collation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;
    use crate::error::ApiError;
    use crate::model::ColumnDescriptor;
    use crate::model::SortType;

    fn catalog() -> ColumnCatalog {
        ColumnCatalog::new([
            ColumnDescriptor::new("id", "ID").sortable(SortType::Number),
            ColumnDescriptor::new("owner", "Owner").sortable(SortType::String),
            ColumnDescriptor::new("description", "Description"),
        ])
        .unwrap()
    }

    fn rows(from: usize, count: usize) -> Vec<Row> {
        (from..from + count).map(|i| Row::new().set("id", i as i64)).collect()
    }

    fn grid(options: GridOptions) -> GridState {
        GridState::new(catalog(), options).unwrap()
    }

    #[test]
    fn test_defaults() {
        let state = grid(GridOptions::default());
        assert_eq!(state.sorted(), &SortKey::asc("id"));
        assert_eq!((state.start(), state.end()), (0, 20));
        assert!(!state.is_loading());
        assert!(state.rows().is_empty());
    }

    #[test]
    fn test_invalid_options() {
        let err = GridState::new(catalog(), GridOptions::default().with_step(0)).unwrap_err();
        assert_eq!(err, ConfigError::ZeroStep);

        let err = GridState::new(catalog(), GridOptions::default().with_sorted(SortKey::asc("nope"))).unwrap_err();
        assert_eq!(err, ConfigError::unknown_column("nope"));

        let err = GridState::new(catalog(), GridOptions::default().with_locale("??")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLocale { .. }));
    }

    #[test]
    fn test_scroll_pages_forward() {
        let mut state = grid(GridOptions::default());
        let mount = state.mount();
        assert_eq!(mount.params.get("start"), Some("0"));
        assert_eq!(mount.params.get("end"), Some("20"));
        state.complete(&mount, Ok(rows(0, 20))).unwrap();

        let page = state.scroll(ScrollPosition::at_bottom()).unwrap();
        assert_eq!(page.kind, FetchKind::Append);
        assert_eq!(page.params.get("start"), Some("20"));
        assert_eq!(page.params.get("end"), Some("40"));
        assert!(state.is_loading());

        // Second crossing while loading does nothing.
        assert!(state.scroll(ScrollPosition::at_bottom()).is_none());

        let outcome = state.complete(&page, Ok(rows(20, 20))).unwrap();
        assert_eq!(outcome, Outcome::Appended { rows: 20 });
        assert_eq!(state.rows().len(), 40);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_scroll_below_threshold_skipped() {
        let mut state = grid(GridOptions::default());
        assert!(state.scroll(ScrollPosition::new(2000.0, 800.0)).is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_header_click_resets_window() {
        let mut state = grid(GridOptions::default());
        state.mount();
        state.scroll(ScrollPosition::at_bottom());

        let HeaderAction::Fetch(request) = state.click_header("id").unwrap() else {
            panic!("expected fetch");
        };
        assert_eq!(request.kind, FetchKind::Replace);
        assert_eq!(request.params.get("sort"), Some("id"));
        assert_eq!(request.params.get("order"), Some("desc"));
        assert_eq!(request.params.get("start"), Some("0"));
        assert_eq!(request.params.get("end"), Some("21"));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_unsortable_header_ignored() {
        let mut state = grid(GridOptions::default());
        assert_eq!(state.click_header("description").unwrap(), HeaderAction::Ignored);
        assert_eq!(state.sorted(), &SortKey::asc("id"));
    }

    #[test]
    fn test_stale_append_dropped_after_filter() {
        let mut state = grid(GridOptions::default());
        let mount = state.mount();
        state.complete(&mount, Ok(rows(0, 20))).unwrap();
        let page = state.scroll(ScrollPosition::at_bottom()).unwrap();

        let reload = state.apply_filter(Some(FilterCriteria::new().with("status", "1")));
        assert_eq!(reload.params.get("status"), Some("1"));

        assert_eq!(state.complete(&reload, Ok(rows(100, 3))).unwrap(), Outcome::Replaced { rows: 3 });
        assert_eq!(state.complete(&page, Ok(rows(20, 20))).unwrap(), Outcome::Superseded);
        assert_eq!(state.rows().len(), 3);
    }

    #[test]
    fn test_failed_append_releases_loading() {
        let mut state = grid(GridOptions::default());
        let mount = state.mount();
        state.complete(&mount, Ok(rows(0, 20))).unwrap();
        let page = state.scroll(ScrollPosition::at_bottom()).unwrap();

        let err = state
            .complete(&page, Err(ApiError::http(500, "boom").into()))
            .unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        assert!(!state.is_loading());
        assert!(state.scroll(ScrollPosition::at_bottom()).is_some());
    }

    #[test]
    fn test_scroll_waits_for_replace() {
        let mut state = grid(GridOptions::default());
        assert!(state.scroll(ScrollPosition::at_bottom()).is_none());

        let mount = state.mount();
        state.complete(&mount, Ok(rows(0, 20))).unwrap();
        let reload = state.apply_filter(Some(FilterCriteria::new().with("status", "1")));
        assert!(state.scroll(ScrollPosition::at_bottom()).is_none());
        assert_eq!((state.start(), state.end()), (0, 21));

        state
            .complete(&reload, Err(ApiError::http(502, "bad gateway").into()))
            .unwrap_err();
        let page = state.scroll(ScrollPosition::at_bottom()).unwrap();
        assert_eq!(page.params.get("start"), Some("21"));
        assert_eq!(page.params.get("end"), Some("41"));
    }

    #[test]
    fn test_stop_when_exhausted() {
        let mut state = grid(GridOptions::default().with_stop_when_exhausted(true));
        let mount = state.mount();
        state.complete(&mount, Ok(rows(0, 5))).unwrap();
        assert!(state.scroll(ScrollPosition::at_bottom()).is_none());

        // Without tracking the grid keeps asking.
        let mut state = grid(GridOptions::default());
        let mount = state.mount();
        state.complete(&mount, Ok(rows(0, 5))).unwrap();
        assert!(state.scroll(ScrollPosition::at_bottom()).is_some());
    }

    #[test]
    fn test_local_sort_never_fetches() {
        let mut state = grid(GridOptions::default().with_sort_locally(true));
        state.add_rows(vec![
            Row::new().set("id", 1).set("owner", "Яблоко"),
            Row::new().set("id", 2).set("owner", "Апельсин"),
        ]);

        assert_eq!(state.click_header("owner").unwrap(), HeaderAction::Local(SortKey::desc("owner")));
        assert_eq!(state.rows()[0].get_str("owner"), Some("Яблоко"));

        state.sort_locally("owner", Direction::Asc).unwrap();
        assert_eq!(state.rows()[0].get_str("owner"), Some("Апельсин"));

        assert!(state.scroll(ScrollPosition::at_bottom()).is_none());
    }

    #[test]
    fn test_sort_on_server_sets_window() {
        let mut state = grid(GridOptions::default());
        let request = state.sort_on_server("owner", Direction::Desc, 40, 60).unwrap();
        assert_eq!(request.params.get("sort"), Some("owner"));
        assert_eq!(request.params.get("order"), Some("desc"));
        assert_eq!(request.params.get("start"), Some("40"));
        assert_eq!(request.params.get("end"), Some("60"));
        assert!(state.sort_on_server("description", Direction::Asc, 0, 20).is_err());
    }

    #[test]
    fn test_criteria_dates_override_defaults() {
        let default = DateRange::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap(),
        );
        let chosen = DateRange::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap(),
        );
        let mut state = grid(GridOptions::default().with_dates(default));
        assert_eq!(state.params().get("date_gte"), Some("2024-01-01T00:00:00.000Z"));

        let request = state.apply_filter(Some(FilterCriteria::new().with_date_range(chosen)));
        assert_eq!(request.params.get("date_gte"), Some("2024-05-01T00:00:00.000Z"));
        assert_eq!(request.params.get("date_lte"), Some("2024-05-02T00:00:00.000Z"));
    }

    #[test]
    fn test_link() {
        let state = grid(GridOptions::default().with_href("/devices"));
        assert_eq!(state.link(&Row::new().set("id", 3)).as_deref(), Some("/devices/3"));
    }
}
