//! Guests service adapter.
//!
//! Translates guest lookups (retrieve, search, patch) into requests against
//! the remote guests service and normalises what comes back.
//!
//! # Architecture
//!
//! - [`GuestsAdapter`] - Domain-facing operations, generic over the transport
//! - [`SearchCriterion`] - The fields a search can be narrowed by; each yields a filter fragment
//! - [`construct_name_query`] - Fuzzy first/last name fragment for name searches
//! - [`GuestsConnector`] - Transport trait
//! - [`HttpGuestsConnector`] - Real HTTP implementation using reqwest
//! - [`mock::MockGuestsConnector`] - Recording mock (behind `test-utils` feature)
//!
//! # Search precedence
//!
//! Query parameters are layered lowest to highest:
//!
//! 1. The caller's filter
//! 2. Keys derived from the search criterion (`email_address`, `phone_number`,
//!    `marketing_id`, `first_name`/`last_name`)
//! 3. [`SearchDefaults`] (`sort`, `limit`)
//!
//! # Example
//!
//! ```ignore
//! use guests_adapter::guests::{AdapterSettings, GuestsAdapter, HttpGuestsConnector, SearchFilter};
//!
//! let adapter = GuestsAdapter::new(
//!     HttpGuestsConnector::new("http://guests.internal"),
//!     AdapterSettings::new("match-link"),
//! );
//! let results = adapter
//!     .search_by_email("a@b.com", SearchFilter::new(), "corr-123")
//!     .await?;
//! ```

mod adapter;
mod client;
mod query;
mod types;

pub use adapter::{annotate_record, AdapterSettings, GuestsAdapter};
pub use client::{
    ConnectorResponse, GuestsApiError, GuestsConnector, HttpGuestsConnector, RequestOptions,
    CORRELATION_ID_HEADER, SOURCE_ID_HEADER,
};
pub use query::{construct_name_query, SearchCriterion, FUZZY_MARKER, FUZZY_MIN_LEN};
pub use types::{Guest, NameQuery, SearchDefaults, SearchFilter};

pub use guest_phone::ExtractMode;

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock;
