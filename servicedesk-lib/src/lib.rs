//! Servicedesk admin grid library
//!
//! Incremental, sortable and filterable data grids backed by the servicedesk
//! REST API (tickets, devices, staff positions). Rows are loaded in windows
//! as the user scrolls; sorting and filtering either re-query the server or,
//! for locally sorted grids, reorder the rows already loaded.

pub mod api;
pub mod auth;
pub mod error;
pub mod grid;
pub mod model;

mod client;

pub use client::*;
