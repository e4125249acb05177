//! Search filter construction for the guests service.
//!
//! Every "search by X" entry point is a [`SearchCriterion`] that produces a
//! filter fragment. The adapter lays fragments over the caller's filter and
//! then lays the fixed [`SearchDefaults`](super::SearchDefaults) over the
//! result, so the precedence order lives in exactly one place.

use guest_phone::{extract_phone_number, ExtractMode};

use super::client::GuestsApiError;
use super::types::{Guest, NameQuery, SearchFilter};

/// Names shorter than this are searched exactly; fuzzy matching on one or
/// two letters matches nearly everything.
pub const FUZZY_MIN_LEN: usize = 3;

/// Suffix asking the search backend for an approximate match.
pub const FUZZY_MARKER: char = '~';

/// Build the fuzzy first/last name fragment for `guest`.
///
/// `first_name` lists the first name, then every alternate name, then the
/// fuzzy first name. `last_name` lists the last name, then the fuzzy last
/// name. Fuzzy variants are only added for names of at least
/// [`FUZZY_MIN_LEN`] characters.
#[must_use]
pub fn construct_name_query(guest: &Guest) -> NameQuery {
    let mut first_names: Vec<String> = Vec::with_capacity(guest.alt_names.len() + 2);
    first_names.push(guest.first_name.clone());
    first_names.extend(guest.alt_names.iter().cloned());
    if let Some(fuzzy) = fuzzy(&guest.first_name) {
        first_names.push(fuzzy);
    }

    let mut last_names = vec![guest.last_name.clone()];
    if let Some(fuzzy) = fuzzy(&guest.last_name) {
        last_names.push(fuzzy);
    }

    NameQuery {
        first_name: first_names.join(","),
        last_name: last_names.join(","),
    }
}

fn fuzzy(name: &str) -> Option<String> {
    (name.chars().count() >= FUZZY_MIN_LEN).then(|| format!("{name}{FUZZY_MARKER}"))
}

/// The field a search is narrowed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriterion {
    Email(String),
    /// Raw phone input; normalised with the configured [`ExtractMode`].
    Phone(String),
    MarketingId(String),
    Name(Guest),
}

impl SearchCriterion {
    /// Short label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Phone(_) => "phone",
            Self::MarketingId(_) => "marketing_id",
            Self::Name(_) => "name",
        }
    }

    /// Filter keys contributed by this criterion.
    ///
    /// # Errors
    /// Returns [`GuestsApiError::NotFound`] for a name search where the
    /// first or last name is empty.
    pub fn fragment(&self, phone_mode: ExtractMode) -> Result<SearchFilter, GuestsApiError> {
        let fragment = match self {
            Self::Email(email) => SearchFilter::new().with("email_address", email.clone()),
            Self::Phone(raw) => {
                SearchFilter::new().with("phone_number", extract_phone_number(raw, phone_mode))
            }
            Self::MarketingId(id) => SearchFilter::new().with("marketing_id", id.clone()),
            Self::Name(guest) => {
                validate_name(guest)?;
                construct_name_query(guest).into()
            }
        };
        Ok(fragment)
    }
}

fn validate_name(guest: &Guest) -> Result<(), GuestsApiError> {
    let message = match (guest.first_name.is_empty(), guest.last_name.is_empty()) {
        (false, false) => return Ok(()),
        (true, false) => "No firstName found",
        (false, true) => "No lastName found",
        (true, true) => "No firstName or lastName found",
    };
    Err(GuestsApiError::NotFound {
        message: message.to_string(),
        detail: format!(
            "firstName: {}, lastName: {}",
            guest.first_name, guest.last_name
        ),
    })
}
