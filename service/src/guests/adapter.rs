//! Domain-facing guests adapter.

use guest_phone::ExtractMode;
use serde_json::Value;

use super::client::{
    GuestsApiError, GuestsConnector, HttpGuestsConnector, RequestOptions, SOURCE_ID_HEADER,
};
use super::query::{construct_name_query, SearchCriterion};
use super::types::{Guest, NameQuery, SearchDefaults, SearchFilter};
use crate::config::Config;

const GUESTS_PATH: &str = "/guests";

/// Read-once settings injected into the adapter at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterSettings {
    pub search_defaults: SearchDefaults,
    /// Sent as `x-source-id` on patch requests.
    pub source_id: String,
    pub phone_mode: ExtractMode,
}

impl AdapterSettings {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            search_defaults: SearchDefaults::default(),
            source_id: source_id.into(),
            phone_mode: ExtractMode::default(),
        }
    }
}

impl From<&Config> for AdapterSettings {
    fn from(config: &Config) -> Self {
        Self {
            search_defaults: config.search.clone(),
            source_id: config.match_link.source_id.clone(),
            phone_mode: config.guests.extract_phone_number_by,
        }
    }
}

/// Translates guest lookups and updates into guests service requests.
///
/// Stateless between calls; any number of calls may be in flight at once.
pub struct GuestsAdapter<C> {
    connector: C,
    settings: AdapterSettings,
}

impl GuestsAdapter<HttpGuestsConnector> {
    /// Build an HTTP-backed adapter from loaded configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, GuestsApiError> {
        let connector = HttpGuestsConnector::from_config(&config.guests)?;
        Ok(Self::new(connector, AdapterSettings::from(config)))
    }
}

impl<C: GuestsConnector> GuestsAdapter<C> {
    pub const fn new(connector: C, settings: AdapterSettings) -> Self {
        Self {
            connector,
            settings,
        }
    }

    pub const fn connector(&self) -> &C {
        &self.connector
    }

    pub const fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    /// Fetch one guest and stamp it with the requested `id` and the `rev`
    /// from the response `ETag`.
    ///
    /// # Errors
    /// Propagates transport errors; returns [`GuestsApiError::UnexpectedBody`]
    /// if the service answers with something other than a JSON object.
    #[tracing::instrument(skip(self), fields(correlation_id = %correlation_id))]
    pub async fn retrieve_by_id(
        &self,
        id: &str,
        correlation_id: &str,
    ) -> Result<Value, GuestsApiError> {
        let path = format!("{GUESTS_PATH}/{}", urlencoding::encode(id));
        let response = self
            .connector
            .get(&path, RequestOptions::correlated(correlation_id))
            .await?;
        let etag = response.header("etag").map(str::to_owned);
        annotate_record(response.data, id, etag.as_deref())
    }

    /// Search with `filter`; the configured sort and limit always win over
    /// same-named filter keys.
    ///
    /// # Errors
    /// Propagates transport errors unchanged.
    #[tracing::instrument(skip(self, filter), fields(correlation_id = %correlation_id))]
    pub async fn search(
        &self,
        filter: SearchFilter,
        correlation_id: &str,
    ) -> Result<Value, GuestsApiError> {
        let params = self.settings.search_defaults.apply(filter);
        tracing::debug!(keys = ?filter_keys(&params), "searching guests");
        let options = RequestOptions::correlated(correlation_id).params(params);
        let response = self.connector.get(GUESTS_PATH, options).await?;
        Ok(response.data)
    }

    /// Search narrowed by `criterion`.
    ///
    /// Precedence, lowest to highest: `filter`, the criterion's keys, the
    /// search defaults.
    ///
    /// # Errors
    /// Returns [`GuestsApiError::NotFound`] without sending a request when a
    /// name criterion is incomplete; otherwise propagates transport errors.
    #[tracing::instrument(
        skip(self, criterion, filter),
        fields(criterion = criterion.kind(), correlation_id = %correlation_id)
    )]
    pub async fn search_by(
        &self,
        criterion: SearchCriterion,
        filter: SearchFilter,
        correlation_id: &str,
    ) -> Result<Value, GuestsApiError> {
        let fragment = criterion
            .fragment(self.settings.phone_mode)
            .inspect_err(|err| tracing::warn!(error = %err, "rejected guest search"))?;
        self.search(filter.overlay(fragment), correlation_id).await
    }

    /// Search for guests with the given email address.
    ///
    /// # Errors
    /// See [`Self::search_by`].
    pub async fn search_by_email(
        &self,
        email_address: &str,
        filter: SearchFilter,
        correlation_id: &str,
    ) -> Result<Value, GuestsApiError> {
        self.search_by(
            SearchCriterion::Email(email_address.to_string()),
            filter,
            correlation_id,
        )
        .await
    }

    /// Search by phone number, normalised with the configured extraction mode.
    ///
    /// # Errors
    /// See [`Self::search_by`].
    pub async fn search_by_phone(
        &self,
        phone_number: &str,
        filter: SearchFilter,
        correlation_id: &str,
    ) -> Result<Value, GuestsApiError> {
        self.search_by(
            SearchCriterion::Phone(phone_number.to_string()),
            filter,
            correlation_id,
        )
        .await
    }

    /// Search for guests carrying the given marketing id.
    ///
    /// # Errors
    /// See [`Self::search_by`].
    pub async fn search_by_marketing_id(
        &self,
        marketing_id: &str,
        filter: SearchFilter,
        correlation_id: &str,
    ) -> Result<Value, GuestsApiError> {
        self.search_by(
            SearchCriterion::MarketingId(marketing_id.to_string()),
            filter,
            correlation_id,
        )
        .await
    }

    /// Fuzzy search by the guest's first, alternate and last names.
    ///
    /// # Errors
    /// Returns [`GuestsApiError::NotFound`] when the first or last name is
    /// empty. See [`Self::search_by`].
    pub async fn search_by_name(
        &self,
        guest: &Guest,
        filter: SearchFilter,
        correlation_id: &str,
    ) -> Result<Value, GuestsApiError> {
        self.search_by(SearchCriterion::Name(guest.clone()), filter, correlation_id)
            .await
    }

    /// Fuzzy name fragment for `guest`. Pure; sends nothing.
    #[must_use]
    pub fn construct_name_query(&self, guest: &Guest) -> NameQuery {
        construct_name_query(guest)
    }

    /// Send a partial update; the response body is returned as-is.
    ///
    /// # Errors
    /// Propagates transport errors unchanged.
    #[tracing::instrument(skip(self, request_body), fields(correlation_id = %correlation_id))]
    pub async fn patch(
        &self,
        request_body: &Value,
        correlation_id: &str,
    ) -> Result<Value, GuestsApiError> {
        let options = RequestOptions::correlated(correlation_id)
            .header(SOURCE_ID_HEADER, self.settings.source_id.clone());
        let response = self
            .connector
            .patch(GUESTS_PATH, request_body, options)
            .await?;
        Ok(response.data)
    }
}

/// Stamp a retrieved record with its `id` and `rev`.
///
/// `rev` is `null` when the service sent no `ETag`, so both keys are always
/// present on the result.
///
/// # Errors
/// Returns [`GuestsApiError::UnexpectedBody`] if `body` is not a JSON object.
pub fn annotate_record(body: Value, id: &str, etag: Option<&str>) -> Result<Value, GuestsApiError> {
    let Value::Object(mut record) = body else {
        return Err(GuestsApiError::UnexpectedBody);
    };
    record.insert("id".to_string(), Value::String(id.to_string()));
    record.insert(
        "rev".to_string(),
        etag.map_or(Value::Null, |rev| Value::String(rev.to_string())),
    );
    Ok(Value::Object(record))
}

// Filter values carry guest contact details; logs only get the keys.
fn filter_keys(params: &SearchFilter) -> Vec<&str> {
    params.iter().map(|(key, _)| key).collect()
}
