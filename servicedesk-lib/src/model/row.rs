//! Dynamic row record

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// A single row returned by a collection endpoint.
///
/// Rows are opaque JSON objects. The grid only looks inside them through a
/// column descriptor (sort type, comparator or template) and through the
/// `id` field used for row links and lookups.
///
/// # Example
///
/// ```
/// use servicedesk_lib::model::Row;
///
/// let row = Row::new()
///     .set("id", 7)
///     .set("title", "Printer");
///
/// assert_eq!(row.id_string().as_deref(), Some("7"));
/// assert_eq!(row.display("title"), "Printer");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: Map<String, Value>,
}

impl Row {
    /// Name of the identifying field.
    pub const ID_FIELD: &'static str = "id";

    /// Creates an empty row.
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Wraps an existing JSON object.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Sets a field, returning the row for chaining.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts or replaces a field in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Returns the raw value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the row identifier, if present.
    pub fn id(&self) -> Option<&Value> {
        self.fields.get(Self::ID_FIELD)
    }

    /// Returns the identifier rendered as text (`7`, `"abc"` → `abc`).
    pub fn id_string(&self) -> Option<String> {
        match self.id()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Returns a string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Returns a field as a number.
    ///
    /// Accepts JSON numbers and strings holding a number, the way a loosely
    /// typed API tends to send numeric ids and inventory numbers.
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        match self.fields.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Returns the text shown for a field when no template is configured.
    ///
    /// Strings are shown as-is, `null` and missing fields as an empty string,
    /// everything else as compact JSON.
    pub fn display(&self, field: &str) -> String {
        match self.fields.get(field) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Returns all fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the row and returns the underlying object.
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for Row {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_map(fields)
    }
}
