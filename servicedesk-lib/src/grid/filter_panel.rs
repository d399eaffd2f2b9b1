//! Filter form model.

use crate::api::query::DateRange;
use crate::api::query::FilterCriteria;

/// The input type of a filter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, usually matched with `LIKE` server-side.
    Text,
    /// One of a fixed list of options. The first option is the
    /// "any" placeholder the server ignores.
    Select { options: Vec<String> },
}

/// One field of a filter panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    value: String,
}

impl FilterField {
    /// Returns the current value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Ordered filter fields plus an optional date range, turned into
/// [`FilterCriteria`] on submit.
///
/// # Example
///
/// ```
/// use servicedesk_lib::grid::FilterPanel;
///
/// let mut panel = FilterPanel::new()
///     .text("description_like", "Description")
///     .select("status", "Status", ["", "0", "1"]);
///
/// panel.set("description_like", "printer");
/// let criteria = panel.criteria();
/// assert_eq!(criteria.get("description_like"), Some(Some("printer")));
/// assert_eq!(criteria.get("status"), Some(Some("")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPanel {
    fields: Vec<FilterField>,
    date_range: Option<DateRange>,
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text field.
    pub fn text(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.fields.push(FilterField {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Text,
            value: String::new(),
        });
        self
    }

    /// Adds a select field, initially set to its first option.
    pub fn select<I, S>(mut self, key: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let value = options.first().cloned().unwrap_or_default();
        self.fields.push(FilterField {
            key: key.into(),
            label: label.into(),
            kind: FieldKind::Select { options },
            value,
        });
        self
    }

    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    /// Returns a field's value.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.field(key).map(FilterField::value)
    }

    /// Sets a field's value.
    ///
    /// Returns `false` if no field has the key or the value is not one of a
    /// select field's options.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        let Some(field) = self.fields.iter_mut().find(|f| f.key == key) else {
            return false;
        };
        if let FieldKind::Select { options } = &field.kind
            && !options.iter().any(|o| *o == value)
        {
            return false;
        }
        field.value = value;
        true
    }

    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.date_range = range;
    }

    /// Empties every field and drops the date range.
    ///
    /// Select fields are emptied too rather than set back to their first
    /// option, matching what the admin pages send on reset.
    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.date_range = None;
    }

    /// Builds criteria from the current values. Empty values are kept so the
    /// server sees the field was submitted blank.
    pub fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        for field in &self.fields {
            criteria.set(field.key.clone(), Some(field.value.clone()));
        }
        criteria.set_date_range(self.date_range);
        criteria
    }

    fn field(&self, key: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.key == key)
    }
}
