//! Rendering seam.

use crate::api::query::SortKey;
use crate::model::ColumnCatalog;
use crate::model::Row;

/// Receives row updates from a grid.
///
/// `replace_rows` always receives the complete row set; `append_rows`
/// receives only the rows added by a scroll page.
pub trait Renderer: Send {
    /// Redraws the whole grid body.
    fn replace_rows(&mut self, columns: &ColumnCatalog, rows: &[Row]);

    /// Adds rows after the ones already drawn.
    fn append_rows(&mut self, columns: &ColumnCatalog, rows: &[Row]);

    /// Shows or hides the loading indicator.
    fn set_loading(&mut self, _loading: bool) {}

    /// Updates the header sort indicator.
    fn set_sorted(&mut self, _sort: &SortKey) {}
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn replace_rows(&mut self, columns: &ColumnCatalog, rows: &[Row]) {
        (**self).replace_rows(columns, rows)
    }

    fn append_rows(&mut self, columns: &ColumnCatalog, rows: &[Row]) {
        (**self).append_rows(columns, rows)
    }

    fn set_loading(&mut self, loading: bool) {
        (**self).set_loading(loading)
    }

    fn set_sorted(&mut self, sort: &SortKey) {
        (**self).set_sorted(sort)
    }
}

/// A renderer that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn replace_rows(&mut self, _columns: &ColumnCatalog, _rows: &[Row]) {}

    fn append_rows(&mut self, _columns: &ColumnCatalog, _rows: &[Row]) {}
}

/// Renders every cell of a row in column order.
pub fn row_cells(columns: &ColumnCatalog, row: &Row) -> Vec<String> {
    columns.columns().iter().map(|c| c.render_cell(row)).collect()
}

/// Builds the link for a row: `<href>/<id>`.
pub fn row_link(href: &str, row: &Row) -> Option<String> {
    let id = row.id_string()?;
    Some(format!("{}/{}", href.trim_end_matches('/'), id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnDescriptor;
    use crate::model::SortType;

    #[test]
    fn test_row_cells_use_templates() {
        let columns = ColumnCatalog::new([
            ColumnDescriptor::new("id", "ID").sortable(SortType::Number),
            ColumnDescriptor::new("device", "Device").template(|v| {
                format!(
                    "{}, inv. {}",
                    v["title"].as_str().unwrap_or_default(),
                    v["inv_num"].as_i64().unwrap_or_default()
                )
            }),
            ColumnDescriptor::new("owner", "Owner"),
        ])
        .unwrap();

        let row = Row::new()
            .set("id", 7)
            .set("device", serde_json::json!({"title": "Printer", "inv_num": 4411}));

        assert_eq!(row_cells(&columns, &row), vec!["7", "Printer, inv. 4411", ""]);
    }

    #[test]
    fn test_row_link() {
        let row = Row::new().set("id", 42);
        assert_eq!(row_link("/tickets/", &row).as_deref(), Some("/tickets/42"));
        assert_eq!(row_link("/tickets", &Row::new()), None);
    }
}
