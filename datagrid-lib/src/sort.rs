//! Sort state: an ordered list of `(field, direction)` pairs.

use serde::{Deserialize, Serialize};

/// Sort direction for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Next state of the `unsorted -> asc -> desc -> unsorted` cycle.
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Asc),
            Some(Self::Asc) => Some(Self::Desc),
            Some(Self::Desc) => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Parses `asc`/`desc` case-insensitively; anything else is unsorted.
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered sort specification, at most one entry per field.
///
/// Serializes as `[["field", "asc"], ...]`. Deserialization is lenient:
/// entries with an unknown direction (including the empty string some back
/// ends echo for a cleared column) are dropped, and a repeated field keeps
/// its first position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct SortOrder(Vec<(String, SortDirection)>);

impl SortOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an order from pairs, dropping repeated fields.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, SortDirection)>,
        S: Into<String>,
    {
        let mut order = Self::new();
        for (field, direction) in pairs {
            let field = field.into();
            if order.direction_of(&field).is_none() {
                order.0.push((field, direction));
            }
        }
        order
    }

    /// Current direction for `field`, if it is sorted.
    pub fn direction_of(&self, field: &str) -> Option<SortDirection> {
        self.0
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, direction)| *direction)
    }

    /// Advances `field` through its sort cycle and returns the new direction.
    ///
    /// In single mode the whole list is replaced by at most one entry. In
    /// multi mode an existing entry is updated in place (or removed once it
    /// cycles back to unsorted) and a new field is appended.
    pub fn toggle(&mut self, field: &str, multiple: bool) -> Option<SortDirection> {
        let next = SortDirection::cycle(self.direction_of(field));

        if !multiple {
            self.0.clear();
            if let Some(direction) = next {
                self.0.push((field.to_string(), direction));
            }
            return next;
        }

        match (self.0.iter().position(|(f, _)| f == field), next) {
            (Some(i), Some(direction)) => self.0[i].1 = direction,
            (Some(i), None) => {
                self.0.remove(i);
            }
            (None, Some(direction)) => self.0.push((field.to_string(), direction)),
            (None, None) => {}
        }
        next
    }

    pub fn entries(&self) -> &[(String, SortDirection)] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.0.iter().map(|(f, d)| (f.as_str(), *d))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<(String, String)>> for SortOrder {
    fn from(raw: Vec<(String, String)>) -> Self {
        Self::from_pairs(
            raw.into_iter()
                .filter_map(|(field, dir)| SortDirection::parse(&dir).map(|d| (field, d))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_sort_cycles_back_to_empty() {
        let mut sort = SortOrder::new();
        assert_eq!(sort.toggle("name", false), Some(SortDirection::Asc));
        assert_eq!(sort.toggle("name", false), Some(SortDirection::Desc));
        assert_eq!(sort.toggle("name", false), None);
        assert!(sort.is_empty());
    }

    #[test]
    fn test_single_sort_replaces_other_field() {
        let mut sort = SortOrder::from_pairs([("age", SortDirection::Desc)]);
        sort.toggle("name", false);
        assert_eq!(sort.entries(), &[("name".to_string(), SortDirection::Asc)]);
    }

    #[test]
    fn test_multi_sort_preserves_click_order() {
        let mut sort = SortOrder::new();
        sort.toggle("a", true);
        sort.toggle("b", true);
        sort.toggle("a", true);
        assert_eq!(
            sort.entries(),
            &[
                ("a".to_string(), SortDirection::Desc),
                ("b".to_string(), SortDirection::Asc)
            ]
        );
    }

    #[test]
    fn test_multi_sort_removes_unsorted_entry() {
        let mut sort = SortOrder::new();
        sort.toggle("a", true);
        sort.toggle("b", true);
        sort.toggle("a", true);
        sort.toggle("a", true);
        assert_eq!(sort.entries(), &[("b".to_string(), SortDirection::Asc)]);
    }

    #[test]
    fn test_lenient_echo_drops_blank_and_duplicate_entries() {
        let sort: SortOrder =
            serde_json::from_str(r#"[["a","ASC"],["b",""],["a","desc"],["c","desc"]]"#).unwrap();
        assert_eq!(
            sort.entries(),
            &[
                ("a".to_string(), SortDirection::Asc),
                ("c".to_string(), SortDirection::Desc)
            ]
        );
    }

    #[test]
    fn test_serializes_as_pairs() {
        let sort = SortOrder::from_pairs([("a", SortDirection::Asc)]);
        assert_eq!(serde_json::to_string(&sort).unwrap(), r#"[["a","asc"]]"#);
    }
}
