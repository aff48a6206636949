//! Filter state: a `field -> value` equality mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current filter inputs keyed by field.
///
/// Clearing an input keeps its key with an empty value; only
/// [`FilterState::clear`] removes entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FilterEcho")]
pub struct FilterState(BTreeMap<String, String>);

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or overwrites the value for `field`.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Sets `field` to the empty string.
    pub fn clear_field(&mut self, field: impl Into<String>) {
        self.0.insert(field.into(), String::new());
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Value to show in the input for `field`.
    pub fn input_value(&self, field: &str) -> &str {
        self.get(field).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries with a non-empty value.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(_, v)| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Shapes a server may echo back for the filter.
///
/// Some back ends encode an empty mapping as `[]`; scalar values are
/// stringified the way they would appear in an input.
#[derive(Deserialize)]
#[serde(untagged)]
enum FilterEcho {
    Map(serde_json::Map<String, Value>),
    List(Vec<Value>),
}

impl From<FilterEcho> for FilterState {
    fn from(echo: FilterEcho) -> Self {
        match echo {
            FilterEcho::Map(map) => map
                .into_iter()
                .map(|(k, v)| (k, crate::result::display_value(&v)))
                .collect(),
            FilterEcho::List(_) => Self::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_field_keeps_key() {
        let mut filter = FilterState::new();
        filter.set("name", "x");
        filter.clear_field("name");
        assert_eq!(filter.get("name"), Some(""));
        assert_eq!(filter.len(), 1);
        assert_eq!(filter.active().count(), 0);
    }

    #[test]
    fn test_clear_removes_entries() {
        let mut filter: FilterState = [("a", "1"), ("b", "2")].into_iter().collect();
        filter.clear();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_echo_accepts_map_with_scalars() {
        let filter: FilterState = serde_json::from_str(r#"{"name":"x","age":42}"#).unwrap();
        assert_eq!(filter.get("name"), Some("x"));
        assert_eq!(filter.get("age"), Some("42"));
    }

    #[test]
    fn test_echo_accepts_empty_list() {
        let filter: FilterState = serde_json::from_str("[]").unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_input_value_defaults_to_empty() {
        assert_eq!(FilterState::new().input_value("missing"), "");
    }
}
