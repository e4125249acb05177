//! HTTP transport for the guests service.
//!
//! [`GuestsConnector`] is the narrow seam the adapter talks through: a `GET`
//! and a `PATCH` with headers and query parameters. [`HttpGuestsConnector`]
//! is the reqwest implementation; [`mock::MockGuestsConnector`] records
//! requests for unit tests.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::types::SearchFilter;
use crate::config::GuestsServiceConfig;

/// Header carrying the per-call correlation id.
pub const CORRELATION_ID_HEADER: &str = "x-global-transaction-id";

/// Header identifying the calling system on mutating requests.
pub const SOURCE_ID_HEADER: &str = "x-source-id";

/// Errors that can occur when calling the guests service.
#[derive(Debug, Error)]
pub enum GuestsApiError {
    /// HTTP request failed (network, timeout, invalid header)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Service returned a non-success status
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Response body was not valid JSON
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response body was valid JSON but not the expected shape
    #[error("unexpected response body: expected a JSON object")]
    UnexpectedBody,

    /// Lookup input was incomplete; raised before any request is sent
    #[error("{message} ({detail})")]
    NotFound { message: String, detail: String },
}

/// Headers and query parameters for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Vec<(&'static str, String)>,
    pub params: SearchFilter,
}

impl RequestOptions {
    /// Options carrying only the correlation id header.
    #[must_use]
    pub fn correlated(correlation_id: &str) -> Self {
        Self::default().header(CORRELATION_ID_HEADER, correlation_id)
    }

    #[must_use]
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    #[must_use]
    pub fn params(mut self, params: SearchFilter) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A decoded response: JSON body plus lower-cased response headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectorResponse {
    pub data: Value,
    pub headers: BTreeMap<String, String>,
}

impl ConnectorResponse {
    #[must_use]
    pub fn json(data: Value) -> Self {
        Self {
            data,
            headers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Transport operations against the guests service.
///
/// Retry and timeout policy belong to the implementation, never to callers.
#[async_trait]
pub trait GuestsConnector: Send + Sync {
    /// Issue a `GET` for `path` (relative to the service base URL).
    async fn get(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ConnectorResponse, GuestsApiError>;

    /// Issue a `PATCH` for `path` with a JSON body.
    async fn patch(
        &self,
        path: &str,
        body: &Value,
        options: RequestOptions,
    ) -> Result<ConnectorResponse, GuestsApiError>;
}

/// reqwest-based implementation of [`GuestsConnector`].
pub struct HttpGuestsConnector {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGuestsConnector {
    /// Create a connector with a default `reqwest::Client`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a connector with a custom `reqwest::Client` (timeouts, proxies, TLS).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build a connector with the timeout from configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (e.g. TLS backend failure).
    pub fn from_config(config: &GuestsServiceConfig) -> Result<Self, GuestsApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(
        &self,
        method: &'static str,
        url: &str,
        mut request: reqwest::RequestBuilder,
        headers: Vec<(&'static str, String)>,
    ) -> Result<ConnectorResponse, GuestsApiError> {
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(method, url, status = status.as_u16(), "guests service responded");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GuestsApiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let bytes = response.bytes().await?;
        let data = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok(ConnectorResponse { data, headers })
    }
}

#[async_trait]
impl GuestsConnector for HttpGuestsConnector {
    async fn get(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ConnectorResponse, GuestsApiError> {
        let url = self.url(path);
        let mut request = self.client.get(&url);
        if !options.params.is_empty() {
            request = request.query(&options.params);
        }
        self.execute("GET", &url, request, options.headers).await
    }

    async fn patch(
        &self,
        path: &str,
        body: &Value,
        options: RequestOptions,
    ) -> Result<ConnectorResponse, GuestsApiError> {
        let url = self.url(path);
        let request = self.client.patch(&url).json(body);
        self.execute("PATCH", &url, request, options.headers).await
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Recording connector for unit tests.

    use super::{ConnectorResponse, GuestsApiError, GuestsConnector, RequestOptions};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// One request seen by [`MockGuestsConnector`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub method: &'static str,
        pub path: String,
        pub options: RequestOptions,
        pub body: Option<Value>,
    }

    /// Mock implementation of `GuestsConnector`.
    ///
    /// Queue responses with `push_*_result`; when a queue is empty the mock
    /// answers with an empty JSON object. Inspect traffic with `requests()`.
    pub struct MockGuestsConnector {
        get_results: Mutex<VecDeque<Result<ConnectorResponse, GuestsApiError>>>,
        patch_results: Mutex<VecDeque<Result<ConnectorResponse, GuestsApiError>>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockGuestsConnector {
        pub fn new() -> Self {
            Self {
                get_results: Mutex::new(VecDeque::new()),
                patch_results: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Queue the result of the next `get` call.
        pub fn push_get_result(&self, result: Result<ConnectorResponse, GuestsApiError>) {
            self.get_results.lock().unwrap().push_back(result);
        }

        /// Queue the result of the next `patch` call.
        pub fn push_patch_result(&self, result: Result<ConnectorResponse, GuestsApiError>) {
            self.patch_results.lock().unwrap().push_back(result);
        }

        /// All requests seen so far, in order.
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        /// The most recent request, if any.
        pub fn last_request(&self) -> Option<RecordedRequest> {
            self.requests.lock().unwrap().last().cloned()
        }

        fn record(&self, request: RecordedRequest) {
            self.requests.lock().unwrap().push(request);
        }

        fn next(
            queue: &Mutex<VecDeque<Result<ConnectorResponse, GuestsApiError>>>,
        ) -> Result<ConnectorResponse, GuestsApiError> {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ConnectorResponse::json(Value::Object(Default::default()))))
        }
    }

    impl Default for MockGuestsConnector {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl GuestsConnector for MockGuestsConnector {
        async fn get(
            &self,
            path: &str,
            options: RequestOptions,
        ) -> Result<ConnectorResponse, GuestsApiError> {
            self.record(RecordedRequest {
                method: "GET",
                path: path.to_string(),
                options,
                body: None,
            });
            Self::next(&self.get_results)
        }

        async fn patch(
            &self,
            path: &str,
            body: &Value,
            options: RequestOptions,
        ) -> Result<ConnectorResponse, GuestsApiError> {
            self.record(RecordedRequest {
                method: "PATCH",
                path: path.to_string(),
                options,
                body: Some(body.clone()),
            });
            Self::next(&self.patch_results)
        }
    }
}
