//! Data types shared by the guests adapter and its connector.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The name fields of a guest record consumed by name searches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Alternate first names, in the order they should be searched.
    #[serde(default)]
    pub alt_names: Vec<String>,
}

impl Guest {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            alt_names: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_alt_names<I, S>(mut self, alt_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alt_names = alt_names.into_iter().map(Into::into).collect();
        self
    }
}

/// Query parameters sent to `GET /guests`.
///
/// Keys are unique; inserting an existing key replaces its value, which is
/// how the layered precedence of a search is expressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchFilter(BTreeMap<String, String>);

impl SearchFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Overlay `other` on top of `self`: keys present in both take `other`'s value.
    #[must_use]
    pub fn overlay(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchFilter {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl IntoIterator for SearchFilter {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Ordering and page size applied to every search.
///
/// These are laid over the caller's filter last, so a caller cannot widen
/// the page or change the ordering through the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDefaults {
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_sort() -> String {
    "ctimestamp".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_limit() -> u32 {
    200
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            sort: default_sort(),
            limit: default_limit(),
        }
    }
}

impl SearchDefaults {
    /// Final query parameters for a search: `filter` with the defaults laid on top.
    #[must_use]
    pub fn apply(&self, filter: SearchFilter) -> SearchFilter {
        filter.overlay(self.as_filter())
    }

    fn as_filter(&self) -> SearchFilter {
        SearchFilter::new()
            .with("sort", self.sort.clone())
            .with("limit", self.limit.to_string())
    }
}

/// Fuzzy name fragment understood by the guests search backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameQuery {
    pub first_name: String,
    pub last_name: String,
}

impl From<NameQuery> for SearchFilter {
    fn from(query: NameQuery) -> Self {
        Self::new()
            .with("first_name", query.first_name)
            .with("last_name", query.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_defaults() {
        let defaults = SearchDefaults::default();
        assert_eq!(defaults.sort, "ctimestamp");
        assert_eq!(defaults.limit, 200);
    }

    #[test]
    fn test_defaults_override_caller_sort_and_limit() {
        let filter = SearchFilter::new().with("limit", "5").with("sort", "x");
        let params = SearchDefaults::default().apply(filter);
        assert_eq!(params.get("limit"), Some("200"));
        assert_eq!(params.get("sort"), Some("ctimestamp"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_defaults_keep_unrelated_caller_keys() {
        let filter = SearchFilter::new().with("property_code", "NYC01");
        let params = SearchDefaults::default().apply(filter);
        assert_eq!(params.get("property_code"), Some("NYC01"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_overlay_prefers_right_hand_side() {
        let base = SearchFilter::new().with("a", "1").with("b", "2");
        let top = SearchFilter::new().with("b", "3");
        let merged = base.overlay(top);
        assert_eq!(merged.get("a"), Some("1"));
        assert_eq!(merged.get("b"), Some("3"));
    }

    #[test]
    fn test_search_filter_serializes_as_flat_map() {
        let filter: SearchFilter = [("email_address", "a@b.com")].into_iter().collect();
        let json = serde_json::to_value(&filter).expect("should serialize");
        assert_eq!(json, serde_json::json!({"email_address": "a@b.com"}));
    }

    #[test]
    fn test_guest_deserializes_camel_case() {
        let json = r#"{"firstName": "Alice", "lastName": "Ng", "altNames": ["Ali"]}"#;
        let guest: Guest = serde_json::from_str(json).expect("should parse");
        assert_eq!(guest, Guest::new("Alice", "Ng").with_alt_names(["Ali"]));
    }

    #[test]
    fn test_guest_missing_alt_names_defaults_to_empty() {
        let guest: Guest =
            serde_json::from_str(r#"{"firstName": "Al", "lastName": "Ng"}"#).expect("should parse");
        assert!(guest.alt_names.is_empty());
    }

    #[test]
    fn test_custom_defaults_from_config_shape() {
        let json = r#"{"limit": 50}"#;
        let defaults: SearchDefaults = serde_json::from_str(json).expect("should parse");
        assert_eq!(defaults.sort, "ctimestamp");
        assert_eq!(defaults.limit, 50);
    }
}
