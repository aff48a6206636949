//! Grid configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tabledom::Element;

use crate::column::ColumnSpec;
use crate::filter::FilterState;
use crate::result::Row;
use crate::sort::SortOrder;

/// Every recognised option with its default.
///
/// Deserializes from the camelCase option bag, so a JSON file with any
/// subset of keys is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridOptions {
    /// Explicit widget id, used for the persistence key.
    pub id: Option<String>,
    /// Section heading shown above the toolbar. Empty hides it.
    pub title: String,
    /// Log transport failures and state changes at a higher level.
    pub debug: bool,
    /// Data source base URL.
    pub url: String,
    pub per_page: usize,
    pub per_page_choices: Vec<usize>,
    pub page_padding: usize,
    pub current_page: usize,
    pub total_rows: usize,
    pub sort: SortOrder,
    pub filter: FilterState,
    pub columns: Vec<ColumnSpec>,
    pub show_pagination: bool,
    pub show_top_pagination: bool,
    pub show_header: bool,
    pub show_footer: bool,
    pub show_filter_row: bool,
    /// Element id of an external filter dialog.
    pub filter_modal: Option<String>,
    pub allow_overflow: bool,
    pub allow_multiple_sort: bool,
    pub allow_save_columns: bool,
    pub allow_tableinfo: bool,
    pub toggle_columns: bool,
    pub auto_load: bool,
    /// Classes applied to the table element.
    pub class: String,
    /// Placeholder text for empty and failed fetches.
    pub empty_message: String,
    /// Extra form fields sent with the save-columns request.
    pub post: BTreeMap<String, String>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            debug: false,
            url: String::new(),
            per_page: 10,
            per_page_choices: vec![10, 20, 50, 100, 200],
            page_padding: 2,
            current_page: 1,
            total_rows: 0,
            sort: SortOrder::default(),
            filter: FilterState::default(),
            columns: Vec::new(),
            show_pagination: true,
            show_top_pagination: false,
            show_header: true,
            show_footer: false,
            show_filter_row: false,
            filter_modal: None,
            allow_overflow: true,
            allow_multiple_sort: false,
            allow_save_columns: true,
            allow_tableinfo: false,
            toggle_columns: true,
            auto_load: true,
            class: "table table-striped table-bordered".to_string(),
            empty_message: "No Results Found".to_string(),
            post: BTreeMap::new(),
        }
    }
}

impl GridOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnSpec>) -> Self {
        self.columns.extend(columns);
        self
    }
}

/// Post-processes a body row. Receives the built row and its record.
pub type RowHook = Arc<dyn Fn(Element, &Row) -> Element + Send + Sync>;
/// Adjusts a finished subtree in place (whole grid or header).
pub type TreeHook = Arc<dyn Fn(&mut Element) + Send + Sync>;
/// Adjusts the footer; receives the response's opaque `footer` value.
pub type FooterHook = Arc<dyn Fn(&mut Element, Option<&Value>) + Send + Sync>;
/// Runs once at construction, before the first toolbar is built.
pub type PreRenderHook = Arc<dyn Fn(&mut GridOptions) + Send + Sync>;

/// Caller-supplied callbacks. All optional.
#[derive(Clone, Default)]
pub struct GridHooks {
    pub row: Option<RowHook>,
    pub table: Option<TreeHook>,
    pub header: Option<TreeHook>,
    pub footer: Option<FooterHook>,
    pub pre_render: Option<PreRenderHook>,
}

impl GridHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_row(mut self, hook: impl Fn(Element, &Row) -> Element + Send + Sync + 'static) -> Self {
        self.row = Some(Arc::new(hook));
        self
    }

    pub fn on_table(mut self, hook: impl Fn(&mut Element) + Send + Sync + 'static) -> Self {
        self.table = Some(Arc::new(hook));
        self
    }

    pub fn on_header(mut self, hook: impl Fn(&mut Element) + Send + Sync + 'static) -> Self {
        self.header = Some(Arc::new(hook));
        self
    }

    pub fn on_footer(
        mut self,
        hook: impl Fn(&mut Element, Option<&Value>) + Send + Sync + 'static,
    ) -> Self {
        self.footer = Some(Arc::new(hook));
        self
    }

    pub fn on_pre_render(mut self, hook: impl Fn(&mut GridOptions) + Send + Sync + 'static) -> Self {
        self.pre_render = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for GridHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridHooks")
            .field("row", &self.row.is_some())
            .field("table", &self.table.is_some())
            .field("header", &self.header.is_some())
            .field("footer", &self.footer.is_some())
            .field("pre_render", &self.pre_render.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_option_bag() {
        let options: GridOptions = serde_json::from_str(
            r#"{
                "url": "/api/people",
                "perPage": 25,
                "allowMultipleSort": true,
                "sort": [["name", "desc"]],
                "columns": [{"field": "name", "title": "Name", "filter": true}]
            }"#,
        )
        .unwrap();
        assert_eq!(options.per_page, 25);
        assert_eq!(options.page_padding, 2);
        assert!(options.allow_multiple_sort);
        assert!(options.show_header);
        assert!(!options.show_footer);
        assert_eq!(options.sort.len(), 1);
        assert_eq!(options.columns[0].filter, Some(true));
    }
}
