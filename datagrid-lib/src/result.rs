//! Decoded data source response.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::column::ColumnSpec;
use crate::filter::FilterState;
use crate::sort::SortOrder;

/// One row record: field name to value.
pub type Row = serde_json::Map<String, Value>;

/// The full decoded response of one fetch.
///
/// Replaced wholesale on every fetch, never merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Row>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sort: SortOrder,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filter: FilterState,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_page: Option<usize>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_rows: Option<usize>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub columns: Vec<ColumnSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Value>,
}

impl ResultSet {
    /// Creates a result set holding `data` and nothing else.
    pub fn with_rows(data: Vec<Row>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

/// Text shown for a cell value. Null renders as empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// An explicit `null` reads the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a non-negative number or a numeric string; anything else is absent.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|n| n as usize),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_response() {
        let rs: ResultSet = serde_json::from_str(
            r#"{
                "data": [{"id": 1, "name": "Ada"}],
                "sort": [["name", "asc"]],
                "filter": {"name": "Ada"},
                "currentPage": "2",
                "totalRows": 95,
                "footer": {"sum": 1}
            }"#,
        )
        .unwrap();
        assert_eq!(rs.len(), 1);
        assert_eq!(rs.current_page, Some(2));
        assert_eq!(rs.total_rows, Some(95));
        assert_eq!(rs.filter.get("name"), Some("Ada"));
        assert!(rs.footer.is_some());
    }

    #[test]
    fn test_missing_data_is_empty() {
        let rs: ResultSet = serde_json::from_str(r#"{"totalRows": 10}"#).unwrap();
        assert!(rs.is_empty());
        let rs: ResultSet = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(rs.is_empty());
    }

    #[test]
    fn test_null_state_echoes_read_as_empty() {
        let rs: ResultSet = serde_json::from_str(
            r#"{"data": [{"id": 1}], "sort": null, "filter": null, "columns": null, "totalRows": 1}"#,
        )
        .unwrap();
        assert_eq!(rs.len(), 1);
        assert!(rs.sort.is_empty());
        assert!(rs.filter.is_empty());
        assert!(rs.columns.is_empty());
        assert_eq!(rs.total_rows, Some(1));
    }

    #[test]
    fn test_non_array_data_is_malformed() {
        assert!(serde_json::from_str::<ResultSet>(r#"{"data": "oops"}"#).is_err());
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&Value::Null), "");
        assert_eq!(display_value(&serde_json::json!("x")), "x");
        assert_eq!(display_value(&serde_json::json!(3)), "3");
        assert_eq!(display_value(&serde_json::json!(true)), "true");
    }
}
