//! Loaded rows.

use super::Collation;
use super::sort::sort_rows;
use crate::api::query::Direction;
use crate::model::ColumnDescriptor;
use crate::model::Row;

/// The rows a grid currently holds, in display order.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    rows: Vec<Row>,
}

impl DataStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every row.
    pub fn replace(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    /// Appends rows after the existing ones. Returns the appended slice.
    pub fn append(&mut self, rows: Vec<Row>) -> &[Row] {
        let from = self.rows.len();
        self.rows.extend(rows);
        &self.rows[from..]
    }

    /// Reorders the rows by a column.
    pub fn sort(&mut self, column: &ColumnDescriptor, direction: Direction, collation: &Collation) {
        sort_rows(&mut self.rows, column, direction, collation);
    }

    /// Removes every row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Finds a row by its `id`, compared as text.
    pub fn get(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.id_string().as_deref() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_returns_new_rows() {
        let mut store = DataStore::new();
        store.replace(vec![Row::new().set("id", 1)]);
        let appended = store.append(vec![Row::new().set("id", 2), Row::new().set("id", 3)]);
        assert_eq!(appended.len(), 2);
        assert_eq!(store.len(), 3);
        assert!(store.get("3").is_some());
        assert!(store.get("4").is_none());
    }

    #[test]
    fn test_replace_discards_previous() {
        let mut store = DataStore::new();
        store.append(vec![Row::new().set("id", 1), Row::new().set("id", 2)]);
        store.replace(vec![Row::new().set("id", 9)]);
        assert_eq!(store.len(), 1);
        assert!(store.get("1").is_none());
        store.clear();
        assert!(store.is_empty());
    }
}
