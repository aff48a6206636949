//! Data source collaborator.
//!
//! The grid only knows the [`DataSource`] trait. Requests carry the page
//! window and, for back ends that want them, the sort and filter the grid
//! currently holds.

mod http;
mod memory;

pub use http::*;
pub use memory::*;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::column::Column;
use crate::error::SourceError;
use crate::filter::FilterState;
use crate::result::ResultSet;
use crate::sort::SortOrder;

/// Monotonic id of one issued fetch. Only the latest token may be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub(crate) u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One page request.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub token: RequestToken,
    /// Rows per page.
    pub limit: usize,
    /// `(current_page - 1) * per_page`.
    pub offset: usize,
    pub sort: SortOrder,
    pub filter: FilterState,
}

impl PageRequest {
    /// `limit=<n>&offset=<n>`.
    pub fn query_string(&self) -> String {
        format!("limit={}&offset={}", self.limit, self.offset)
    }
}

/// Body of the save-columns companion request.
#[derive(Debug, Clone)]
pub struct SaveColumnsRequest {
    pub columns: Vec<Column>,
    pub sort: SortOrder,
    pub filter: FilterState,
    /// Extra caller-configured form fields.
    pub extra: BTreeMap<String, String>,
}

impl SaveColumnsRequest {
    /// Form fields in submission order: extras first, then the action fields.
    pub fn form_fields(&self) -> Result<Vec<(String, String)>, SourceError> {
        let encode = |value: serde_json::Result<String>| {
            value.map_err(|e| SourceError::parse(format!("encoding save-columns body: {e}")))
        };

        let mut fields: Vec<(String, String)> = self
            .extra
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), "action" | "columns" | "sort" | "filter"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        fields.push(("action".to_string(), "save-columns".to_string()));
        fields.push(("columns".to_string(), encode(serde_json::to_string(&self.columns))?));
        fields.push(("sort".to_string(), encode(serde_json::to_string(&self.sort))?));
        fields.push(("filter".to_string(), encode(serde_json::to_string(&self.filter))?));
        Ok(fields)
    }
}

/// A paged, sortable, filterable row source.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch one page. Timeouts are the implementation's concern.
    async fn fetch(&self, request: &PageRequest) -> Result<ResultSet, SourceError>;

    /// Server-side durability for saved column preferences.
    async fn save_columns(&self, request: &SaveColumnsRequest) -> Result<(), SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnSpec;
    use crate::sort::SortDirection;

    #[test]
    fn test_query_string() {
        let request = PageRequest {
            token: RequestToken(1),
            limit: 10,
            offset: 20,
            sort: SortOrder::new(),
            filter: FilterState::new(),
        };
        assert_eq!(request.query_string(), "limit=10&offset=20");
    }

    #[test]
    fn test_save_form_fields() {
        let request = SaveColumnsRequest {
            columns: vec![Column::resolve(&ColumnSpec::field("a").hidden(true))],
            sort: SortOrder::from_pairs([("a", SortDirection::Asc)]),
            filter: [("a", "x")].into_iter().collect(),
            extra: [("csrf".to_string(), "t0k".to_string()), ("action".to_string(), "nope".to_string())]
                .into_iter()
                .collect(),
        };
        let fields = request.form_fields().unwrap();
        let keys: Vec<_> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["csrf", "action", "columns", "sort", "filter"]);
        assert_eq!(fields[1].1, "save-columns");
        assert!(fields[2].1.contains(r#""hidden":true"#));
        assert_eq!(fields[3].1, r#"[["a","asc"]]"#);
        assert_eq!(fields[4].1, r#"{"a":"x"}"#);
    }
}
