//! HTTP mock server helpers for testing outbound calls to the guests service.
//!
//! This module is a thin re-export of `wiremock` so tests read the same way
//! regardless of which matchers they need.
//!
//! # Patterns
//!
//! - **Success response**: `ResponseTemplate::new(200).set_body_json(value)`
//! - **Error response**: `ResponseTemplate::new(500)`
//! - **Timeout simulation**: `.set_delay(Duration::from_secs(5))`
//! - **Request verification**: `.expect(1)` to assert call count (checked on drop)

pub use wiremock::matchers::{body_json, header, method, path, query_param};
pub use wiremock::MockServer;
pub use wiremock::{Mock, ResponseTemplate};
