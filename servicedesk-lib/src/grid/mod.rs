//! Incremental data grids
//!
//! A grid shows rows of one API resource under a fixed set of columns. It
//! loads a window of rows on mount, appends the next window each time the
//! user scrolls past the bottom, and sorts or filters either by re-querying
//! from the first window or, for locally sorted grids, by reordering the
//! rows it already has.
//!
//! - [`GridState`]: the state machine, free of I/O
//! - [`GridController`]: drives the state sequentially against a
//!   [`Transport`](crate::api::Transport)
//! - [`GridRuntime`] / [`GridHandle`]: drives the state on a task, accepting
//!   commands while fetches are in flight

mod collation;
mod controller;
mod filter_panel;
mod options;
mod render;
mod runtime;
mod scroll;
mod sort;
mod state;
mod store;

pub use collation::Collation;
pub use controller::GridController;
pub use filter_panel::FieldKind;
pub use filter_panel::FilterField;
pub use filter_panel::FilterPanel;
pub use options::DEFAULT_LOCALE;
pub use options::DEFAULT_STEP;
pub use options::GridOptions;
pub use render::NullRenderer;
pub use render::Renderer;
pub use render::row_cells;
pub use render::row_link;
pub use runtime::GridCommand;
pub use runtime::GridHandle;
pub use runtime::GridRuntime;
pub use runtime::GridSnapshot;
pub use scroll::ScrollPosition;
pub use scroll::ScrollTrigger;
pub use sort::SortMode;
pub use sort::SortState;
pub use sort::compare_rows;
pub use sort::sort_rows;
pub use state::FetchKind;
pub use state::FetchRequest;
pub use state::GridState;
pub use state::HeaderAction;
pub use state::Outcome;
pub use store::DataStore;
