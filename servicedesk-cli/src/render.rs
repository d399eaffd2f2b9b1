//! Plain-text table output.

use std::io::Write;

use servicedesk_lib::api::query::Direction;
use servicedesk_lib::api::query::SortKey;
use servicedesk_lib::grid::Renderer;
use servicedesk_lib::grid::row_cells;
use servicedesk_lib::grid::row_link;
use servicedesk_lib::model::ColumnCatalog;
use servicedesk_lib::model::Row;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

const MAX_CELL_WIDTH: usize = 32;
const SEPARATOR: &str = "  ";

/// Writes grid rows as aligned text columns.
///
/// Column widths are measured on every full redraw and reused for appended
/// pages so the columns stay aligned while scrolling.
pub struct TerminalRenderer<W> {
    out: W,
    href: Option<String>,
    empty_text: String,
    sorted: Option<SortKey>,
    widths: Vec<usize>,
}

impl TerminalRenderer<std::io::Stdout> {
    pub fn stdout(href: Option<&str>, empty_text: &str) -> Self {
        Self::new(std::io::stdout(), href, empty_text)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, href: Option<&str>, empty_text: &str) -> Self {
        Self {
            out,
            href: href.map(str::to_string),
            empty_text: empty_text.to_string(),
            sorted: None,
            widths: Vec::new(),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn measure(&mut self, columns: &ColumnCatalog, rows: &[Row]) {
        self.widths = columns
            .columns()
            .iter()
            .map(|c| c.title.width() + 2)
            .collect();
        for row in rows {
            for (width, cell) in self.widths.iter_mut().zip(row_cells(columns, row)) {
                *width = (*width).max(cell.width());
            }
        }
        for width in &mut self.widths {
            *width = (*width).min(MAX_CELL_WIDTH);
        }
    }

    fn header(&self, columns: &ColumnCatalog) -> String {
        let titles = columns.columns().iter().map(|c| {
            let marker = match &self.sorted {
                Some(sort) if c.sortable && sort.column_id == c.id => match sort.direction {
                    Direction::Asc => " ^",
                    Direction::Desc => " v",
                },
                _ => "",
            };
            format!("{}{}", c.title, marker)
        });
        self.line(titles)
    }

    fn line(&self, cells: impl Iterator<Item = String>) -> String {
        let padded: Vec<String> = cells
            .zip(&self.widths)
            .map(|(cell, width)| pad(&truncate(&cell, *width), *width))
            .collect();
        padded.join(SEPARATOR).trim_end().to_string()
    }

    fn write_rows(&mut self, columns: &ColumnCatalog, rows: &[Row]) {
        for row in rows {
            let mut line = self.line(row_cells(columns, row).into_iter());
            if let Some(link) = self.href.as_deref().and_then(|href| row_link(href, row)) {
                line.push_str(SEPARATOR);
                line.push_str(&link);
            }
            let _ = writeln!(self.out, "{line}");
        }
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn replace_rows(&mut self, columns: &ColumnCatalog, rows: &[Row]) {
        self.measure(columns, rows);
        let header = self.header(columns);
        let _ = writeln!(self.out, "{header}");
        let _ = writeln!(self.out, "{}", "-".repeat(header.width()));

        if rows.is_empty() {
            let _ = writeln!(self.out, "{}", self.empty_text);
        } else {
            self.write_rows(columns, rows);
        }
        let _ = self.out.flush();
    }

    fn append_rows(&mut self, columns: &ColumnCatalog, rows: &[Row]) {
        if self.widths.len() != columns.len() {
            self.measure(columns, rows);
        }
        self.write_rows(columns, rows);
        let _ = self.out.flush();
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            eprintln!("Loading…");
        }
    }

    fn set_sorted(&mut self, sort: &SortKey) {
        self.sorted = Some(sort.clone());
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

/// Cuts text to a display width, ending with `…` when shortened.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
