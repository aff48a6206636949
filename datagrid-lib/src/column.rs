//! Column schema: caller-facing specs, resolved columns and layer merging.
//!
//! A [`ColumnSpec`] is a partial description where every field is optional.
//! Specs arrive from up to three places (the caller, persisted preferences,
//! and the server's `columns` echo) and are layered onto defaults to produce
//! the resolved [`Column`] list the grid renders from.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ColumnError;
use crate::result::Row;

/// Per-cell value transform. Receives the row and the column being rendered.
pub type CellFormatter = Arc<dyn Fn(&Row, &Column) -> String + Send + Sync>;

/// Handler for an action cell click. Receives the cell's action value.
pub type ActionCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Partial column description. `None` means "not specified by this layer".
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<bool>,
    /// Static cell content used when the row has no value for `field`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
    /// Label of the action button rendered in each cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_class: Option<String>,
    /// Row field whose value the action button carries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_data_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css: Option<BTreeMap<String, String>>,
    #[serde(skip)]
    pub callback: Option<CellFormatter>,
    #[serde(skip)]
    pub action_callback: Option<ActionCallback>,
}

impl ColumnSpec {
    /// A column bound to a row field.
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::default()
        }
    }

    /// A column with static content in every cell.
    pub fn custom(content: impl Into<String>) -> Self {
        Self {
            custom: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    /// Enable the filter input for this column.
    pub fn filterable(mut self) -> Self {
        self.filter = Some(true);
        self
    }

    pub fn css(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.css
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Render each cell as an action button.
    pub fn action(
        mut self,
        label: impl Into<String>,
        class: impl Into<String>,
        data_field: impl Into<String>,
    ) -> Self {
        self.action = Some(label.into());
        self.action_class = Some(class.into());
        self.action_data_field = Some(data_field.into());
        self
    }

    pub fn on_action(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.action_callback = Some(Arc::new(callback));
        self
    }

    pub fn format(mut self, callback: impl Fn(&Row, &Column) -> String + Send + Sync + 'static) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// `other`'s specified fields win over `self`'s.
    pub fn overlay(&mut self, other: &ColumnSpec) {
        fn take<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
            if let Some(v) = src {
                *dst = Some(v.clone());
            }
        }
        take(&mut self.field, &other.field);
        take(&mut self.title, &other.title);
        take(&mut self.sortable, &other.sortable);
        take(&mut self.hidden, &other.hidden);
        take(&mut self.filter, &other.filter);
        take(&mut self.custom, &other.custom);
        take(&mut self.action, &other.action);
        take(&mut self.action_class, &other.action_class);
        take(&mut self.action_data_field, &other.action_data_field);
        take(&mut self.css, &other.css);
        take(&mut self.callback, &other.callback);
        take(&mut self.action_callback, &other.action_callback);
    }

    /// Copy of `self` with every field that `mask` specifies cleared.
    pub fn without(&self, mask: &ColumnSpec) -> ColumnSpec {
        fn drop_if<T: Clone>(value: &Option<T>, mask: &Option<T>) -> Option<T> {
            if mask.is_some() { None } else { value.clone() }
        }
        ColumnSpec {
            field: drop_if(&self.field, &mask.field),
            title: drop_if(&self.title, &mask.title),
            sortable: drop_if(&self.sortable, &mask.sortable),
            hidden: drop_if(&self.hidden, &mask.hidden),
            filter: drop_if(&self.filter, &mask.filter),
            custom: drop_if(&self.custom, &mask.custom),
            action: drop_if(&self.action, &mask.action),
            action_class: drop_if(&self.action_class, &mask.action_class),
            action_data_field: drop_if(&self.action_data_field, &mask.action_data_field),
            css: drop_if(&self.css, &mask.css),
            callback: drop_if(&self.callback, &mask.callback),
            action_callback: drop_if(&self.action_callback, &mask.action_callback),
        }
    }
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("field", &self.field)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("hidden", &self.hidden)
            .field("filter", &self.filter)
            .field("custom", &self.custom)
            .field("action", &self.action)
            .field("action_class", &self.action_class)
            .field("action_data_field", &self.action_data_field)
            .field("css", &self.css)
            .field("callback", &self.callback.as_ref().map(|_| ".."))
            .field("action_callback", &self.action_callback.as_ref().map(|_| ".."))
            .finish()
    }
}

/// A fully-defaulted column.
///
/// Serializes with the same keys as [`ColumnSpec`], so a saved column list
/// reads back as a list of specs.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub title: String,
    pub sortable: bool,
    pub hidden: bool,
    pub filter: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_data_field: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub css: BTreeMap<String, String>,
    /// Assigned when the header is built; unique within one render pass.
    #[serde(skip)]
    pub classname: Option<String>,
    #[serde(skip)]
    pub callback: Option<CellFormatter>,
    #[serde(skip)]
    pub action_callback: Option<ActionCallback>,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            field: None,
            title: String::new(),
            sortable: true,
            hidden: false,
            filter: false,
            custom: None,
            action: None,
            action_class: None,
            action_data_field: None,
            css: BTreeMap::new(),
            classname: None,
            callback: None,
            action_callback: None,
        }
    }
}

impl Column {
    /// Defaults with `spec` applied.
    pub fn resolve(spec: &ColumnSpec) -> Self {
        let mut column = Self::default();
        column.apply(spec);
        column
    }

    /// Overwrite every field `spec` specifies.
    pub fn apply(&mut self, spec: &ColumnSpec) {
        if let Some(field) = &spec.field {
            self.field = Some(field.clone());
        }
        if let Some(title) = &spec.title {
            self.title = title.clone();
        }
        if let Some(sortable) = spec.sortable {
            self.sortable = sortable;
        }
        if let Some(hidden) = spec.hidden {
            self.hidden = hidden;
        }
        if let Some(filter) = spec.filter {
            self.filter = filter;
        }
        if let Some(custom) = &spec.custom {
            self.custom = Some(custom.clone());
        }
        if let Some(action) = &spec.action {
            self.action = Some(action.clone());
        }
        if let Some(class) = &spec.action_class {
            self.action_class = Some(class.clone());
        }
        if let Some(data_field) = &spec.action_data_field {
            self.action_data_field = Some(data_field.clone());
        }
        if let Some(css) = &spec.css {
            self.css = css.clone();
        }
        if let Some(callback) = &spec.callback {
            self.callback = Some(callback.clone());
        }
        if let Some(callback) = &spec.action_callback {
            self.action_callback = Some(callback.clone());
        }
    }

    /// Whether a header click on this column should sort.
    pub fn is_sortable(&self) -> bool {
        self.sortable && self.custom.is_none() && self.field.is_some()
    }

    /// Whether the filter row carries an input for this column.
    pub fn has_filter_input(&self) -> bool {
        self.filter && self.field.is_some()
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("field", &self.field)
            .field("title", &self.title)
            .field("sortable", &self.sortable)
            .field("hidden", &self.hidden)
            .field("filter", &self.filter)
            .field("custom", &self.custom)
            .field("action", &self.action)
            .field("action_class", &self.action_class)
            .field("classname", &self.classname)
            .finish_non_exhaustive()
    }
}

/// Checks that every column has something to display.
pub fn validate(specs: &[ColumnSpec]) -> Result<(), ColumnError> {
    match specs
        .iter()
        .position(|s| s.field.is_none() && s.custom.is_none() && s.action.is_none())
    {
        Some(index) => Err(ColumnError::MissingFieldAndCustom { index }),
        None => Ok(()),
    }
}

/// Resolve caller specs onto defaults. Pure; no classnames are assigned.
pub fn normalize(specs: &[ColumnSpec]) -> Vec<Column> {
    specs.iter().map(Column::resolve).collect()
}

/// Build the starting column list: defaults, then persisted, then caller.
///
/// Layers line up by position; persisted entries beyond the caller's list
/// are ignored.
pub fn merge_initial(caller: &[ColumnSpec], persisted: &[ColumnSpec]) -> Vec<Column> {
    caller
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let mut column = Column::default();
            if let Some(saved) = persisted.get(i) {
                column.apply(saved);
            }
            column.apply(spec);
            column
        })
        .collect()
}

/// Apply a server `columns` echo. Fields the caller specified are kept.
pub fn apply_server(columns: &mut [Column], server: &[ColumnSpec], caller: &[ColumnSpec]) {
    for (i, column) in columns.iter_mut().enumerate() {
        let Some(spec) = server.get(i) else { continue };
        let spec = match caller.get(i) {
            Some(mask) => spec.without(mask),
            None => spec.clone(),
        };
        column.apply(&spec);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let column = Column::resolve(&ColumnSpec::field("name"));
        assert!(column.sortable);
        assert!(!column.hidden);
        assert!(!column.filter);
        assert!(column.classname.is_none());
    }

    #[test]
    fn test_custom_column_is_not_sortable() {
        let column = Column::resolve(&ColumnSpec::custom("-"));
        assert!(column.sortable);
        assert!(!column.is_sortable());
    }

    #[test]
    fn test_validate_rejects_empty_column() {
        let specs = vec![ColumnSpec::field("a"), ColumnSpec::default().title("b")];
        assert_eq!(
            validate(&specs),
            Err(ColumnError::MissingFieldAndCustom { index: 1 })
        );
        assert!(validate(&[ColumnSpec::custom("x")]).is_ok());
    }

    #[test]
    fn test_persisted_layer_sits_under_caller() {
        let caller = vec![
            ColumnSpec::field("a").title("A"),
            ColumnSpec::field("b").title("B").hidden(false),
        ];
        let persisted = vec![
            ColumnSpec::default().hidden(true).title("Old"),
            ColumnSpec::default().hidden(true),
        ];
        let columns = merge_initial(&caller, &persisted);
        assert!(columns[0].hidden);
        assert_eq!(columns[0].title, "A");
        assert!(!columns[1].hidden);
    }

    #[test]
    fn test_server_layer_cannot_override_caller_fields() {
        let caller = vec![ColumnSpec::field("a").title("A")];
        let mut columns = normalize(&caller);
        let server = vec![ColumnSpec::default().title("Server").hidden(true)];
        apply_server(&mut columns, &server, &caller);
        assert_eq!(columns[0].title, "A");
        assert!(columns[0].hidden);
    }

    #[test]
    fn test_saved_column_reads_back_as_spec() {
        let column = Column::resolve(&ColumnSpec::field("a").title("A").hidden(true));
        let json = serde_json::to_string(&vec![column]).unwrap();
        let specs: Vec<ColumnSpec> = serde_json::from_str(&json).unwrap();
        assert_eq!(specs[0].field.as_deref(), Some("a"));
        assert_eq!(specs[0].hidden, Some(true));
        assert_eq!(specs[0].sortable, Some(true));
    }
}
