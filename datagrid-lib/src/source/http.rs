//! HTTP data source.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{DataSource, PageRequest, SaveColumnsRequest};
use crate::error::SourceError;
use crate::result::ResultSet;

/// Fetches pages with `GET <url>?limit=&offset=` and saves columns with a
/// form `POST <url>`.
///
/// Cheap to clone; the HTTP client is shared.
///
/// # Example
///
/// ```ignore
/// let source = HttpSource::builder()
///     .url("https://example.com/api/people")
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct HttpSource {
    inner: Arc<HttpSourceInner>,
}

struct HttpSourceInner {
    url: url::Url,
    http_client: Client,
    timeout: Option<Duration>,
    send_state: bool,
}

impl HttpSource {
    pub fn builder() -> HttpSourceBuilder<Missing> {
        HttpSourceBuilder::new()
    }

    pub fn url(&self) -> &str {
        self.inner.url.as_str()
    }

    fn map_send_error(&self, err: reqwest::Error) -> SourceError {
        match (err.is_timeout(), self.inner.timeout) {
            (true, Some(timeout)) => SourceError::Timeout(timeout),
            _ => SourceError::Network(err),
        }
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self, request: &PageRequest) -> Result<ResultSet, SourceError> {
        let mut query = vec![
            ("limit", request.limit.to_string()),
            ("offset", request.offset.to_string()),
        ];
        if self.inner.send_state {
            query.push((
                "sort",
                serde_json::to_string(&request.sort).map_err(|e| SourceError::parse(e.to_string()))?,
            ));
            query.push((
                "filter",
                serde_json::to_string(&request.filter)
                    .map_err(|e| SourceError::parse(e.to_string()))?,
            ));
        }

        let mut builder = self
            .inner
            .http_client
            .get(self.inner.url.clone())
            .query(&query);
        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        log::debug!("GET {} {} ({})", self.inner.url, request.query_string(), request.token);
        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        if !status.is_success() {
            return Err(SourceError::http(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|e| SourceError::parse_with_body(e.to_string(), body))
    }

    async fn save_columns(&self, request: &SaveColumnsRequest) -> Result<(), SourceError> {
        let fields = request.form_fields()?;

        let mut builder = self
            .inner
            .http_client
            .post(self.inner.url.clone())
            .form(&fields);
        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        if response.status().is_success() {
            log::debug!("columns saved to {}", self.inner.url);
            Ok(())
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(SourceError::http(status, body))
        }
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(pub(crate) T);

/// Builder for [`HttpSource`]. The URL is required at compile time.
pub struct HttpSourceBuilder<Url> {
    url: Url,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
    send_state: bool,
}

impl HttpSourceBuilder<Missing> {
    pub fn new() -> Self {
        Self {
            url: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
            send_state: false,
        }
    }

    /// Sets the data source base URL.
    pub fn url(self, url: impl Into<String>) -> HttpSourceBuilder<Set<String>> {
        HttpSourceBuilder {
            url: Set(url.into()),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            send_state: self.send_state,
        }
    }
}

impl Default for HttpSourceBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> HttpSourceBuilder<U> {
    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout. Ignored when a custom client is supplied.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Also send `sort` and `filter` as JSON query parameters.
    pub fn send_state(mut self, send: bool) -> Self {
        self.send_state = send;
        self
    }
}

impl HttpSourceBuilder<Set<String>> {
    pub fn build(self) -> Result<HttpSource, SourceError> {
        let url = url::Url::parse(&self.url.0)
            .map_err(|e| SourceError::InvalidUrl(format!("{}: {}", self.url.0, e)))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(HttpSource {
            inner: Arc::new(HttpSourceInner {
                url,
                http_client,
                timeout: self.timeout,
                send_state: self.send_state,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_relative_url() {
        let err = HttpSource::builder().url("not a url").build().err().unwrap();
        assert!(matches!(err, SourceError::InvalidUrl(_)));
    }

    #[test]
    fn test_build_keeps_url() {
        let source = HttpSource::builder()
            .url("https://example.com/api/people")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(source.url(), "https://example.com/api/people");
    }
}
