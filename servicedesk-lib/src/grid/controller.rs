//! Sequential grid controller.

use log::debug;

use super::FetchRequest;
use super::GridOptions;
use super::GridState;
use super::HeaderAction;
use super::Outcome;
use super::Renderer;
use super::ScrollPosition;
use crate::api::Transport;
use crate::api::query::Direction;
use crate::api::query::FilterCriteria;
use crate::api::query::SortKey;
use crate::error::ConfigError;
use crate::error::Error;
use crate::model::ColumnCatalog;
use crate::model::Row;

/// Drives a [`GridState`] against a transport and a renderer, one action at
/// a time.
///
/// Every async method runs its fetch to completion before returning, so
/// actions never overlap. For a grid that keeps accepting input while
/// fetches are in flight, use [`GridRuntime`](super::GridRuntime).
///
/// # Example
///
/// ```no_run
/// use servicedesk_lib::ServiceDeskClient;
/// use servicedesk_lib::grid::{GridController, GridOptions, NullRenderer, ScrollPosition};
/// use servicedesk_lib::model::{ColumnCatalog, ColumnDescriptor, SortType};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ServiceDeskClient::builder().url("https://sd.example.com").build();
/// let columns = ColumnCatalog::new([
///     ColumnDescriptor::new("id", "ID").sortable(SortType::Number),
///     ColumnDescriptor::new("title", "Title").sortable(SortType::String),
/// ])?;
///
/// let mut grid = GridController::new(
///     columns,
///     GridOptions::default(),
///     client.resource("api/devices/"),
///     NullRenderer,
/// )?;
///
/// grid.mount().await?;
/// grid.click_header("title").await?;
/// grid.on_scroll(ScrollPosition::at_bottom()).await?;
/// # Ok(())
/// # }
/// ```
pub struct GridController<T, R> {
    state: GridState,
    transport: T,
    renderer: R,
}

impl<T: Transport, R: Renderer> GridController<T, R> {
    /// Creates a controller. Nothing is fetched until [`mount`](Self::mount).
    pub fn new(catalog: ColumnCatalog, options: GridOptions, transport: T, renderer: R) -> Result<Self, ConfigError> {
        Ok(Self::from_state(GridState::new(catalog, options)?, transport, renderer))
    }

    /// Creates a controller around existing state.
    pub fn from_state(state: GridState, transport: T, renderer: R) -> Self {
        Self {
            state,
            transport,
            renderer,
        }
    }

    /// Loads the initial window.
    pub async fn mount(&mut self) -> Result<Outcome, Error> {
        let request = self.state.mount();
        self.renderer.set_sorted(self.state.sorted());
        self.execute(request).await
    }

    /// Handles a header click.
    pub async fn click_header(&mut self, column_id: &str) -> Result<Outcome, Error> {
        match self.state.click_header(column_id)? {
            HeaderAction::Ignored => Ok(Outcome::Ignored),
            HeaderAction::Local(key) => Ok(self.present(Outcome::SortedLocally(key))),
            HeaderAction::Fetch(request) => {
                self.renderer.set_sorted(self.state.sorted());
                self.execute(request).await
            }
        }
    }

    /// Handles a scroll, loading the next page if the bottom was crossed.
    pub async fn on_scroll(&mut self, position: ScrollPosition) -> Result<Outcome, Error> {
        match self.state.scroll(position) {
            Some(request) => self.execute(request).await,
            None => Ok(Outcome::Skipped),
        }
    }

    /// Applies filter criteria and reloads from the first window.
    pub async fn apply_filter(&mut self, criteria: Option<FilterCriteria>) -> Result<Outcome, Error> {
        let request = self.state.apply_filter(criteria);
        self.execute(request).await
    }

    /// Drops all filter criteria and reloads.
    pub async fn reset_filters(&mut self) -> Result<Outcome, Error> {
        self.apply_filter(None).await
    }

    /// Reloads from the first window.
    pub async fn reload(&mut self) -> Result<Outcome, Error> {
        let request = self.state.reload();
        self.execute(request).await
    }

    /// Fetches `[start, end)` sorted by a column.
    pub async fn sort_on_server(
        &mut self,
        column_id: &str,
        direction: Direction,
        start: usize,
        end: usize,
    ) -> Result<Outcome, Error> {
        let request = self.state.sort_on_server(column_id, direction, start, end)?;
        self.renderer.set_sorted(self.state.sorted());
        self.execute(request).await
    }

    /// Sorts the loaded rows in memory.
    pub fn sort_locally(&mut self, column_id: &str, direction: Direction) -> Result<Outcome, Error> {
        let key = self.state.sort_locally(column_id, direction)?;
        Ok(self.present(Outcome::SortedLocally(key)))
    }

    /// Replaces the rows without fetching.
    pub fn add_rows(&mut self, rows: Vec<Row>) {
        let count = rows.len();
        self.state.add_rows(rows);
        self.present(Outcome::Replaced { rows: count });
    }

    /// Appends rows without fetching.
    pub fn update(&mut self, rows: Vec<Row>) {
        let count = rows.len();
        self.state.update(rows);
        self.present(Outcome::Appended { rows: count });
    }

    pub fn sorted(&self) -> &SortKey {
        self.state.sorted()
    }

    pub fn start(&self) -> usize {
        self.state.start()
    }

    pub fn end(&self) -> usize {
        self.state.end()
    }

    pub fn filtered(&self) -> Option<&FilterCriteria> {
        self.state.filtered()
    }

    /// Replaces the filter criteria without reloading.
    pub fn set_filtered(&mut self, criteria: Option<FilterCriteria>) {
        self.state.set_filtered(criteria);
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn rows(&self) -> &[Row] {
        self.state.rows()
    }

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Consumes the controller, returning its parts.
    pub fn into_parts(self) -> (GridState, T, R) {
        (self.state, self.transport, self.renderer)
    }

    async fn execute(&mut self, request: FetchRequest) -> Result<Outcome, Error> {
        debug!(
            "Fetching ({:?}, generation {}): {}",
            request.kind,
            request.generation,
            request.params.to_query_string()
        );

        self.renderer.set_loading(true);
        let result = self.transport.fetch(&request.params).await;
        self.renderer.set_loading(false);

        let outcome = self.state.complete(&request, result)?;
        Ok(self.present(outcome))
    }

    fn present(&mut self, outcome: Outcome) -> Outcome {
        self.state.render(&outcome, &mut self.renderer);
        outcome
    }
}
