//! In-memory data source.

use std::cmp::Ordering;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{DataSource, PageRequest, SaveColumnsRequest};
use crate::error::SourceError;
use crate::result::{display_value, ResultSet, Row};
use crate::sort::{SortDirection, SortOrder};

/// Serves pages from a fixed row set.
///
/// Applies the request's filter (equality on the displayed value, empty
/// values ignored) and sort, then echoes both back the way a server would.
/// Every request and save is recorded for inspection.
#[derive(Debug, Default)]
pub struct MemorySource {
    rows: Vec<Row>,
    latency: Option<Duration>,
    requests: Mutex<Vec<PageRequest>>,
    saves: Mutex<Vec<SaveColumnsRequest>>,
}

impl MemorySource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Save-columns requests received so far, oldest first.
    pub fn saves(&self) -> Vec<SaveColumnsRequest> {
        self.saves.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn matching_rows(&self, request: &PageRequest) -> Vec<&Row> {
        let mut rows: Vec<&Row> = self
            .rows
            .iter()
            .filter(|row| {
                request.filter.active().all(|(field, wanted)| {
                    row.get(field).map(display_value).as_deref() == Some(wanted)
                })
            })
            .collect();

        if !request.sort.is_empty() {
            rows.sort_by(|a, b| compare_rows(a, b, &request.sort));
        }
        rows
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch(&self, request: &PageRequest) -> Result<ResultSet, SourceError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let rows = self.matching_rows(request);
        let total_rows = rows.len();
        let data = rows
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .cloned()
            .collect();

        Ok(ResultSet {
            data,
            sort: request.sort.clone(),
            filter: request.filter.clone(),
            current_page: Some(request.offset / request.limit.max(1) + 1),
            total_rows: Some(total_rows),
            ..ResultSet::default()
        })
    }

    async fn save_columns(&self, request: &SaveColumnsRequest) -> Result<(), SourceError> {
        if let Ok(mut saves) = self.saves.lock() {
            saves.push(request.clone());
        }
        Ok(())
    }
}

fn compare_rows(a: &Row, b: &Row, sort: &SortOrder) -> Ordering {
    for (field, direction) in sort.iter() {
        let ordering = compare_values(a.get(field), b.get(field));
        let ordering = match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Missing and null sort first; numbers compare numerically.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => display_value(x).cmp(&display_value(y)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterState;
    use crate::source::RequestToken;
    use serde_json::json;

    fn rows() -> Vec<Row> {
        [
            json!({"id": 1, "name": "Ada", "team": "red"}),
            json!({"id": 2, "name": "Bob", "team": "blue"}),
            json!({"id": 10, "name": "Cy", "team": "red"}),
        ]
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect()
    }

    fn request(limit: usize, offset: usize) -> PageRequest {
        PageRequest {
            token: RequestToken(1),
            limit,
            offset,
            sort: SortOrder::new(),
            filter: FilterState::new(),
        }
    }

    #[tokio::test]
    async fn test_pages_and_counts() {
        let source = MemorySource::new(rows());
        let rs = source.fetch(&request(2, 2)).await.unwrap();
        assert_eq!(rs.len(), 1);
        assert_eq!(rs.total_rows, Some(3));
        assert_eq!(rs.current_page, Some(2));
    }

    #[tokio::test]
    async fn test_sorts_numbers_numerically() {
        let source = MemorySource::new(rows());
        let mut req = request(10, 0);
        req.sort = SortOrder::from_pairs([("id", SortDirection::Desc)]);
        let rs = source.fetch(&req).await.unwrap();
        let ids: Vec<_> = rs.data.iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(10), json!(2), json!(1)]);
        assert_eq!(rs.sort, req.sort);
    }

    #[tokio::test]
    async fn test_filters_ignore_cleared_values() {
        let source = MemorySource::new(rows());
        let mut req = request(10, 0);
        req.filter.set("team", "red");
        req.filter.clear_field("name");
        let rs = source.fetch(&req).await.unwrap();
        assert_eq!(rs.total_rows, Some(2));
        assert_eq!(rs.filter.get("name"), Some(""));
        assert_eq!(source.requests().len(), 1);
    }
}
