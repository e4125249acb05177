//! Common test utilities for integration tests.
//!
//! - [`http_mock`] - wiremock re-exports for stubbing the guests service
//! - [`TestAdapterBuilder`] - builds an HTTP-backed adapter pointed at a mock server
//!
//! # Usage
//!
//! ```ignore
//! use crate::common::{http_mock::MockServer, TestAdapterBuilder};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let server = MockServer::start().await;
//!     let adapter = TestAdapterBuilder::new(&server).build();
//!     // adapter.search(...)
//! }
//! ```

#![allow(dead_code)]

pub mod http_mock;

use std::time::Duration;

use guests_adapter::guests::{
    AdapterSettings, ExtractMode, GuestsAdapter, HttpGuestsConnector, SearchDefaults,
};
use wiremock::MockServer;

pub const SOURCE_ID: &str = "match-link-test";

/// Builder for an adapter wired to a [`MockServer`].
pub struct TestAdapterBuilder {
    base_url: String,
    settings: AdapterSettings,
    timeout: Option<Duration>,
}

impl TestAdapterBuilder {
    pub fn new(server: &MockServer) -> Self {
        Self {
            base_url: server.uri(),
            settings: AdapterSettings::new(SOURCE_ID),
            timeout: None,
        }
    }

    pub fn with_phone_mode(mut self, mode: ExtractMode) -> Self {
        self.settings.phone_mode = mode;
        self
    }

    pub fn with_search_defaults(mut self, defaults: SearchDefaults) -> Self {
        self.settings.search_defaults = defaults;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_trailing_slash(mut self) -> Self {
        self.base_url.push('/');
        self
    }

    #[allow(clippy::expect_used)]
    pub fn build(self) -> GuestsAdapter<HttpGuestsConnector> {
        let connector = match self.timeout {
            Some(timeout) => {
                let client = reqwest::Client::builder()
                    .timeout(timeout)
                    .build()
                    .expect("client build");
                HttpGuestsConnector::with_client(client, self.base_url)
            }
            None => HttpGuestsConnector::new(self.base_url),
        };
        GuestsAdapter::new(connector, self.settings)
    }
}
