//! Outbound query composition.
//!
//! A grid request is described by three pieces of state:
//!
//! - [`SortKey`] - the active sort column and [`Direction`]
//! - [`PaginationWindow`] - the half-open `[start, end)` row window
//! - [`FilterCriteria`] - optional filter values and [`DateRange`]
//!
//! [`QueryBuilder`] turns them into [`QueryParams`] without side effects.

mod filter;
mod order;
mod params;
mod window;

pub use filter::DateRange;
pub use filter::FilterCriteria;
pub use order::Direction;
pub use order::SortKey;
pub use params::QueryBuilder;
pub use params::QueryParams;
pub use window::PaginationWindow;
