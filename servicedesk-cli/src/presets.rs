//! Column and filter layouts for each console page.

use serde_json::Value;
use servicedesk_lib::api::query::SortKey;
use servicedesk_lib::grid::FilterPanel;
use servicedesk_lib::grid::GridOptions;
use servicedesk_lib::model::ColumnCatalog;
use servicedesk_lib::model::ColumnDescriptor;
use servicedesk_lib::model::Row;
use servicedesk_lib::model::SortType;

use crate::config::Resource;

/// Everything the CLI needs to show one collection.
#[derive(Debug, Clone)]
pub struct Preset {
    pub title: &'static str,
    /// Endpoint path relative to the API base URL.
    pub path: &'static str,
    /// Base path of row links.
    pub href: &'static str,
    pub columns: ColumnCatalog,
    pub sorted: SortKey,
    pub filters: FilterPanel,
    pub empty_text: &'static str,
}

impl Preset {
    pub fn for_resource(resource: Resource) -> Result<Self, servicedesk_lib::error::ConfigError> {
        match resource {
            Resource::Tickets => tickets(),
            Resource::Devices => devices(),
            Resource::Positions => positions(),
        }
    }

    /// Grid options for this page; callers layer user settings on top.
    pub fn options(&self) -> GridOptions {
        GridOptions::default()
            .with_sorted(self.sorted.clone())
            .with_href(self.href)
    }
}

fn nested_str<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn nested_display(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn device_department(row: &Row) -> String {
    row.get("device")
        .map(|device| nested_str(device, "department").to_string())
        .unwrap_or_default()
}

fn tickets() -> Result<Preset, servicedesk_lib::error::ConfigError> {
    let columns = ColumnCatalog::new([
        ColumnDescriptor::new("id", "ID").sortable(SortType::Number),
        ColumnDescriptor::new("priority", "Priority").sortable(SortType::String),
        ColumnDescriptor::new("created", "Created"),
        ColumnDescriptor::new("owner", "Owner").sortable(SortType::String),
        ColumnDescriptor::new("description", "Description"),
        ColumnDescriptor::new("device", "Device").template(|device| {
            format!(
                "{}, inv. {}",
                nested_str(device, "title"),
                nested_display(device, "inv_num")
            )
        }),
        // Sorting by the nested device object compares its department.
        ColumnDescriptor::new("device", "Department")
            .custom(|a: &Row, b: &Row| device_department(a).cmp(&device_department(b)))
            .template(|device| nested_str(device, "department").to_string()),
        ColumnDescriptor::new("category", "Category").sortable(SortType::String),
    ])?;

    let filters = FilterPanel::new()
        .text("description_like", "Description")
        .text("inventory_like", "Inventory number")
        .select("status", "Status", ["", "1", "0"])
        .text("department", "Department");

    Ok(Preset {
        title: "Tickets",
        path: "api/tickets/",
        href: "/tickets",
        columns,
        sorted: SortKey::desc("id"),
        filters,
        empty_text: "No tickets match the filters",
    })
}

fn devices() -> Result<Preset, servicedesk_lib::error::ConfigError> {
    let columns = ColumnCatalog::new([
        ColumnDescriptor::new("id", "ID").sortable(SortType::Number),
        ColumnDescriptor::new("inv_num", "Inventory").sortable(SortType::Number),
        ColumnDescriptor::new("title", "Title").sortable(SortType::String),
        ColumnDescriptor::new("department", "Department").sortable(SortType::String),
        ColumnDescriptor::new("type", "Type").sortable(SortType::String),
    ])?;

    let filters = FilterPanel::new()
        .text("title_like", "Title")
        .text("inventory_like", "Inventory number")
        .text("type", "Type")
        .text("department", "Department");

    Ok(Preset {
        title: "Devices",
        path: "api/devices/",
        href: "/devices",
        columns,
        sorted: SortKey::asc("id"),
        filters,
        empty_text: "No devices match the filters",
    })
}

fn positions() -> Result<Preset, servicedesk_lib::error::ConfigError> {
    let columns = ColumnCatalog::new([
        ColumnDescriptor::new("id", "ID").sortable(SortType::Number),
        ColumnDescriptor::new("title", "Title").sortable(SortType::String),
        ColumnDescriptor::new("quantity", "Quantity").sortable(SortType::Number),
    ])?;

    Ok(Preset {
        title: "Stock positions",
        path: "api/positions/",
        href: "/positions",
        columns,
        sorted: SortKey::asc("id"),
        filters: FilterPanel::new().text("contains", "Title"),
        empty_text: "No data",
    })
}
