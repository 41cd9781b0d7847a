//! Seam between queries and the HTTP layer.
//!
//! The SDK does not ship an HTTP stack; callers plug one in through
//! [`Transport`]. [`SearchClient`] posts a query payload through it and hands
//! back a [`Response`] wrapping the parsed JSON document.

use serde_json::Value;

use crate::config::ClientConfig;
use crate::query::Query;
use crate::{Error, Result};

/// Status and body of an HTTP exchange, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP collaborator. Implementations own connection handling, auth, and retries.
pub trait Transport {
    fn post(&self, uri: &str, body: &Value) -> Result<RawResponse>;

    fn get(&self, uri: &str, params: &[(&str, &str)]) -> Result<RawResponse>;
}

/// Parsed JSON document returned by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    root: Value,
}

impl Response {
    /// Parse a successful raw response. Error statuses become [`Error::Http`].
    pub fn from_raw(raw: RawResponse) -> Result<Self> {
        if !raw.is_success() {
            tracing::warn!(status = raw.status, "search service returned an error status");
            return Err(Error::Http {
                status: raw.status,
                body: raw.body,
            });
        }
        if raw.body.trim().is_empty() {
            return Ok(Self { root: Value::Null });
        }
        let root = serde_json::from_str(&raw.body)?;
        Ok(Self { root })
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Member of the document root.
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.root
            .get(key)
            .ok_or_else(|| Error::MissingKey(key.to_string()))
    }

    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.get(key)?
            .as_str()
            .ok_or_else(|| Error::MalformedPayload(format!("'{}' is not a string", key)))
    }

    /// Array member of the document root, e.g. the `fileEvents` of a search.
    pub fn items(&self, key: &str) -> Result<&[Value]> {
        self.get(key)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| Error::MalformedPayload(format!("'{}' is not an array", key)))
    }
}

/// Posts queries to a search endpoint through a [`Transport`].
pub struct SearchClient<T: Transport> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> SearchClient<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute URL for a service path.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Post `query` to `path` and parse the response.
    pub fn search(&self, path: &str, query: &Query) -> Result<Response> {
        let url = self.url(path);
        tracing::debug!(
            url = %url,
            groups = query.groups().len(),
            dialect = %query.dialect(),
            "posting search query"
        );
        let raw = self.transport.post(&url, &query.to_value())?;
        Response::from_raw(raw)
    }

    /// Fetch `path` with query-string parameters and parse the response.
    pub fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<Response> {
        let url = self.url(path);
        tracing::debug!(url = %url, params = params.len(), "fetching");
        let raw = self.transport.get(&url, params)?;
        Response::from_raw(raw)
    }
}
