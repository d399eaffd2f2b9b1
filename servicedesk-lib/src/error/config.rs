//! Grid configuration errors

/// Errors raised when a column catalog or grid options are inconsistent.
///
/// These are detected when the grid is constructed or when a command names a
/// column, never in the middle of a fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A column uses the custom sort type but has no comparator attached.
    #[error("Column '{column}' uses custom sorting but has no comparator")]
    CustomSortWithoutComparator { column: String },

    /// The active sort references a column that cannot be sorted.
    #[error("Column '{column}' is not sortable")]
    UnsortableSortColumn { column: String },

    /// A column id that does not exist in the catalog.
    #[error("Unknown column '{column}'")]
    UnknownColumn { column: String },

    /// The catalog has no sortable column to derive a default sort from.
    #[error("Column catalog has no sortable column")]
    NoSortableColumn,

    /// The page size must be positive.
    #[error("Page size must be greater than zero")]
    ZeroStep,

    /// The initial window is empty or inverted.
    #[error("Invalid window [{start}, {end})")]
    InvalidWindow { start: usize, end: usize },

    /// The collation locale could not be parsed or has no collation data.
    #[error("Invalid collation locale '{locale}': {message}")]
    InvalidLocale { locale: String, message: String },
}

impl ConfigError {
    /// Creates an unknown column error.
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }

    /// Creates an unsortable sort column error.
    pub fn unsortable(column: impl Into<String>) -> Self {
        Self::UnsortableSortColumn {
            column: column.into(),
        }
    }
}
