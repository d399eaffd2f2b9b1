//! Column descriptors and the column catalog

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::Row;
use crate::api::query::Direction;
use crate::api::query::SortKey;
use crate::error::ConfigError;

/// Caller-supplied ordering for [`SortType::Custom`] columns.
///
/// The comparator always describes ascending order; the grid reverses it for
/// descending sorts.
pub type Comparator = Arc<dyn Fn(&Row, &Row) -> Ordering + Send + Sync>;

/// Renders the value of a cell to display text.
///
/// Receives the row's value for the column id (`Null` when missing).
pub type CellTemplate = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// How a sortable column is ordered when sorting locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    /// Numeric comparison.
    #[default]
    Number,
    /// Locale-aware collation.
    String,
    /// Caller-supplied [`Comparator`].
    Custom,
}

/// Static description of one grid column.
///
/// Descriptors can be deserialized from configuration; comparators and
/// templates are code and must be attached afterwards.
///
/// # Example
///
/// ```
/// use servicedesk_lib::model::{ColumnDescriptor, SortType};
///
/// let columns = vec![
///     ColumnDescriptor::new("id", "ID").sortable(SortType::Number),
///     ColumnDescriptor::new("title", "Title").sortable(SortType::String),
///     ColumnDescriptor::new("description", "Description"),
/// ];
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Field name in the row, also sent as the `sort` parameter.
    pub id: String,
    /// Header text.
    pub title: String,
    /// Whether clicking the header sorts by this column.
    #[serde(default)]
    pub sortable: bool,
    /// Sort strategy; `None` on a sortable column means numeric.
    #[serde(default)]
    pub sort_type: Option<SortType>,
    #[serde(skip)]
    comparator: Option<Comparator>,
    #[serde(skip)]
    template: Option<CellTemplate>,
}

impl ColumnDescriptor {
    /// Creates a non-sortable column.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            sortable: false,
            sort_type: None,
            comparator: None,
            template: None,
        }
    }

    /// Makes the column sortable with the given strategy.
    pub fn sortable(mut self, sort_type: SortType) -> Self {
        self.sortable = true;
        self.sort_type = Some(sort_type);
        self
    }

    /// Makes the column sortable with a custom comparator.
    pub fn custom<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&Row, &Row) -> Ordering + Send + Sync + 'static,
    {
        self.sortable = true;
        self.sort_type = Some(SortType::Custom);
        self.comparator = Some(Arc::new(comparator));
        self
    }

    /// Attaches a comparator without changing the sort type.
    ///
    /// Used for descriptors loaded from configuration with
    /// `sort_type = "custom"`.
    pub fn with_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&Row, &Row) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    /// Sets the cell template.
    pub fn template<F>(mut self, template: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.template = Some(Arc::new(template));
        self
    }

    /// Returns the sort strategy used for local sorting.
    pub fn effective_sort_type(&self) -> SortType {
        self.sort_type.unwrap_or_default()
    }

    /// Returns the custom comparator, if any.
    pub fn comparator(&self) -> Option<&Comparator> {
        self.comparator.as_ref()
    }

    /// Returns `true` if a template is attached.
    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    /// Renders this column's cell for a row.
    pub fn render_cell(&self, row: &Row) -> String {
        match &self.template {
            Some(template) => template(row.get(&self.id).unwrap_or(&Value::Null)),
            None => row.display(&self.id),
        }
    }

    /// Checks that a custom sort type has a comparator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sortable && self.sort_type == Some(SortType::Custom) && self.comparator.is_none() {
            return Err(ConfigError::CustomSortWithoutComparator {
                column: self.id.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("sort_type", &self.sort_type)
            .field("comparator", &self.comparator.is_some())
            .field("template", &self.template.is_some())
            .finish()
    }
}

/// The ordered, immutable set of columns a grid is built with.
///
/// Column ids need not be unique: a page may show two views of the same
/// field (e.g. a device's name and its department). Sorting by an id uses
/// the first *sortable* descriptor with that id.
#[derive(Debug, Clone)]
pub struct ColumnCatalog {
    columns: Arc<[ColumnDescriptor]>,
}

impl ColumnCatalog {
    /// Creates a catalog, validating every descriptor.
    pub fn new(columns: impl IntoIterator<Item = ColumnDescriptor>) -> Result<Self, ConfigError> {
        let columns: Vec<_> = columns.into_iter().collect();
        for column in &columns {
            column.validate()?;
        }
        Ok(Self {
            columns: columns.into(),
        })
    }

    /// Returns the columns in display order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the catalog has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the first column with the given id.
    pub fn get(&self, id: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Returns `true` if any column has the given id.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the sortable column with the given id.
    ///
    /// Fails with [`ConfigError::UnknownColumn`] when no column has the id and
    /// with [`ConfigError::UnsortableSortColumn`] when none of them is sortable.
    pub fn sortable_column(&self, id: &str) -> Result<&ColumnDescriptor, ConfigError> {
        if let Some(column) = self.columns.iter().find(|c| c.id == id && c.sortable) {
            return Ok(column);
        }
        if self.contains(id) {
            Err(ConfigError::unsortable(id))
        } else {
            Err(ConfigError::unknown_column(id))
        }
    }

    /// Returns the first sortable column.
    pub fn first_sortable(&self) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.sortable)
    }

    /// Returns the default sort: first sortable column, ascending.
    pub fn default_sort(&self) -> Result<SortKey, ConfigError> {
        self.first_sortable()
            .map(|c| SortKey::new(c.id.clone(), Direction::Asc))
            .ok_or(ConfigError::NoSortableColumn)
    }
}
