//! Structural identity for paginated catalog queries.
//!
//! A [`QueryKey`] names one logical resource: an endpoint path plus its base
//! parameters. The page number is never part of the identity: two keys that
//! differ only in which page is being fetched refer to the same cache entry.
//! Parameters compare by value regardless of the order they were added in.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of one paginated resource request.
///
/// A key with an empty endpoint is *disabled*: it models a query whose
/// required path parameter has not resolved yet (e.g. an id still missing
/// from user input). Disabled keys never trigger a fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryKey {
  endpoint: String,
  params: BTreeMap<String, String>,
}

impl QueryKey {
  /// Create a key for the given endpoint path (e.g. `/movie/popular`).
  pub fn new(endpoint: impl Into<String>) -> Self {
    Self {
      endpoint: endpoint.into(),
      params: BTreeMap::new(),
    }
  }

  /// A key that never fetches. Used when a required parameter is absent.
  pub fn disabled() -> Self {
    Self::default()
  }

  /// Add a base parameter. Values are stored as strings; numbers are
  /// stringified the same way the upstream API expects them.
  pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
    self.params.insert(name.into(), value.to_string());
    self
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }

  /// Base parameters in canonical (sorted) order.
  pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
    self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn param(&self, name: &str) -> Option<&str> {
    self.params.get(name).map(String::as_str)
  }

  /// Whether this key can be fetched at all.
  pub fn is_enabled(&self) -> bool {
    !self.endpoint.is_empty()
  }

  /// Deterministic serialization of the identity: endpoint plus sorted
  /// `k=v` pairs. Insertion order of parameters does not affect the result.
  pub fn canonical(&self) -> String {
    let mut out = self.endpoint.clone();
    for (i, (k, v)) in self.params.iter().enumerate() {
      out.push(if i == 0 { '?' } else { '&' });
      out.push_str(k);
      out.push('=');
      out.push_str(v);
    }
    out
  }

  /// SHA256 hash of the canonical form, for stable fixed-length store keys.
  pub fn store_hash(&self) -> String {
    let mut hasher = Sha256::new();
    hasher.update(self.canonical().as_bytes());
    hex::encode(hasher.finalize())
  }
}

impl fmt::Display for QueryKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_enabled() {
      write!(f, "{}", self.canonical())
    } else {
      write!(f, "(disabled)")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_param_order_does_not_affect_identity() {
    let a = QueryKey::new("/discover/movie")
      .with_param("with_genres", 28)
      .with_param("sort_by", "popularity.desc");
    let b = QueryKey::new("/discover/movie")
      .with_param("sort_by", "popularity.desc")
      .with_param("with_genres", 28);

    assert_eq!(a, b);
    assert_eq!(a.canonical(), b.canonical());
    assert_eq!(a.store_hash(), b.store_hash());
  }

  #[test]
  fn test_different_params_are_different_queries() {
    let a = QueryKey::new("/discover/movie").with_param("with_genres", 28);
    let b = QueryKey::new("/discover/movie").with_param("with_genres", 35);

    assert_ne!(a, b);
    assert_ne!(a.store_hash(), b.store_hash());
  }

  #[test]
  fn test_canonical_form() {
    let key = QueryKey::new("/discover/tv")
      .with_param("with_origin_country", "PK")
      .with_param("first_air_date_year", 2024);

    assert_eq!(
      key.canonical(),
      "/discover/tv?first_air_date_year=2024&with_origin_country=PK"
    );
  }

  #[test]
  fn test_bare_endpoint_canonical_has_no_separator() {
    assert_eq!(QueryKey::new("/movie/popular").canonical(), "/movie/popular");
  }

  #[test]
  fn test_disabled_key() {
    let key = QueryKey::disabled();
    assert!(!key.is_enabled());
    assert!(QueryKey::new("/movie/popular").is_enabled());
  }

  #[test]
  fn test_numeric_values_stringified() {
    let key = QueryKey::new("/discover/movie").with_param("primary_release_year", 1999);
    assert_eq!(key.param("primary_release_year"), Some("1999"));
  }
}
