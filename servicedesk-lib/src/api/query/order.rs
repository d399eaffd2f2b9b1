//! Sort direction and sort key.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Sort direction, sent as the `order` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn flip(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    /// Returns the wire representation (`asc` / `desc`).
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }

    /// Applies the direction to an ascending comparison result.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            other => Err(format!("invalid sort order '{}', expected asc or desc", other)),
        }
    }
}

/// The active sort: which column, in which direction.
///
/// # Example
///
/// ```
/// use servicedesk_lib::api::query::{Direction, SortKey};
///
/// let sort = SortKey::desc("priority");
/// assert_eq!(sort.direction, Direction::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// Column id, sent as the `sort` parameter.
    #[serde(rename = "id")]
    pub column_id: String,
    /// Sort direction, sent as the `order` parameter.
    #[serde(rename = "order")]
    pub direction: Direction,
}

impl SortKey {
    /// Creates a sort key.
    pub fn new(column_id: impl Into<String>, direction: Direction) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
        }
    }

    /// Creates an ascending sort key.
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, Direction::Asc)
    }

    /// Creates a descending sort key.
    pub fn desc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, Direction::Desc)
    }
}
