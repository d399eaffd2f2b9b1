//! Sort state and local row ordering.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::Collation;
use crate::api::query::Direction;
use crate::api::query::SortKey;
use crate::error::ConfigError;
use crate::model::ColumnCatalog;
use crate::model::ColumnDescriptor;
use crate::model::Row;
use crate::model::SortType;

/// Where sorting happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Reorder the rows already loaded.
    Local,
    /// Re-query the server from the first window.
    #[default]
    Server,
}

/// The active sort plus the direction each header currently displays.
///
/// A header click flips the clicked header's displayed direction and makes
/// it the active sort. Headers that were never clicked display ascending,
/// except the initially active one which displays its configured direction.
#[derive(Debug, Clone)]
pub struct SortState {
    active: SortKey,
    rendered: HashMap<String, Direction>,
    mode: SortMode,
}

impl SortState {
    /// Creates sort state, checking that `active` names a sortable column.
    pub fn new(catalog: &ColumnCatalog, active: SortKey, mode: SortMode) -> Result<Self, ConfigError> {
        catalog.sortable_column(&active.column_id)?;

        let mut rendered: HashMap<String, Direction> = catalog
            .columns()
            .iter()
            .filter(|c| c.sortable)
            .map(|c| (c.id.clone(), Direction::Asc))
            .collect();
        rendered.insert(active.column_id.clone(), active.direction);

        Ok(Self {
            active,
            rendered,
            mode,
        })
    }

    /// Returns the active sort key.
    pub fn active(&self) -> &SortKey {
        &self.active
    }

    /// Returns the sort mode.
    pub fn mode(&self) -> SortMode {
        self.mode
    }

    /// Returns `true` for local sorting.
    pub fn is_local(&self) -> bool {
        self.mode == SortMode::Local
    }

    /// Returns the direction a header displays.
    pub fn rendered_direction(&self, column_id: &str) -> Direction {
        self.rendered.get(column_id).copied().unwrap_or_default()
    }

    /// Handles a header click.
    ///
    /// Returns the new active key, or `None` if the header exists but is not
    /// sortable. Unknown column ids are an error.
    pub fn click(&mut self, catalog: &ColumnCatalog, column_id: &str) -> Result<Option<SortKey>, ConfigError> {
        match catalog.sortable_column(column_id) {
            Ok(_) => {}
            Err(ConfigError::UnsortableSortColumn { .. }) => return Ok(None),
            Err(e) => return Err(e),
        }

        let direction = self.rendered_direction(column_id).flip();
        self.rendered.insert(column_id.to_string(), direction);
        self.active = SortKey::new(column_id, direction);
        Ok(Some(self.active.clone()))
    }

    /// Replaces the active sort directly.
    pub fn set_active(&mut self, catalog: &ColumnCatalog, key: SortKey) -> Result<(), ConfigError> {
        catalog.sortable_column(&key.column_id)?;
        self.rendered.insert(key.column_id.clone(), key.direction);
        self.active = key;
        Ok(())
    }
}

/// Compares two rows by a column in ascending order.
///
/// - `Number` orders by numeric value; rows without one compare greater
///   than rows with one, so they come last ascending and first descending.
/// - `String` orders the displayed text with the collation.
/// - `Custom` uses the column's comparator.
pub fn compare_rows(column: &ColumnDescriptor, a: &Row, b: &Row, collation: &Collation) -> Ordering {
    match column.effective_sort_type() {
        SortType::Number => match (a.get_f64(&column.id), b.get_f64(&column.id)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortType::String => collation.compare(&a.display(&column.id), &b.display(&column.id)),
        SortType::Custom => match column.comparator() {
            Some(comparator) => comparator(a, b),
            None => Ordering::Equal,
        },
    }
}

/// Sorts rows in place. The sort is stable, so equal rows keep their
/// loaded order in both directions.
pub fn sort_rows(rows: &mut [Row], column: &ColumnDescriptor, direction: Direction, collation: &Collation) {
    rows.sort_by(|a, b| direction.apply(compare_rows(column, a, b, collation)));
}
