//! Catalog query constructors: the endpoint surface consumers browse.
//!
//! Each function builds the [`QueryKey`] for one catalog view. Constructors
//! whose required input is absent (an empty search string) return a disabled
//! key, which the cache holds idle without ever issuing a request.

use chrono::Utc;

use crate::cache::QueryKey;

// ============================================================================
// Movie catalogs
// ============================================================================

pub fn popular_movies() -> QueryKey {
  QueryKey::new("/movie/popular")
}

pub fn top_rated_movies() -> QueryKey {
  QueryKey::new("/movie/top_rated")
}

pub fn upcoming_movies() -> QueryKey {
  QueryKey::new("/movie/upcoming")
}

pub fn trending_movies() -> QueryKey {
  QueryKey::new("/trending/movie/week")
}

// ============================================================================
// TV catalogs
// ============================================================================

pub fn popular_tv() -> QueryKey {
  QueryKey::new("/tv/popular")
}

pub fn top_rated_tv() -> QueryKey {
  QueryKey::new("/tv/top_rated")
}

pub fn on_the_air_tv() -> QueryKey {
  QueryKey::new("/tv/on_the_air")
}

pub fn trending_tv() -> QueryKey {
  QueryKey::new("/trending/tv/week")
}

// ============================================================================
// Search
// ============================================================================

/// Multi-search across movies and TV shows. Disabled until the user has
/// typed something.
pub fn search(query: &str) -> QueryKey {
  let query = query.trim();
  if query.is_empty() {
    return QueryKey::disabled();
  }
  QueryKey::new("/search/multi").with_param("query", query)
}

// ============================================================================
// Discovery
// ============================================================================

/// Filters for movie discovery. Unset fields are omitted from the query.
#[derive(Debug, Clone, Default)]
pub struct MovieFilters {
  /// Comma-separated genre ids.
  pub genres: Option<String>,
  pub year: Option<u32>,
  pub origin_country: Option<String>,
  pub original_language: Option<String>,
  pub sort_by: Option<String>,
}

/// Discover movies, newest releases first unless the caller sorts otherwise.
/// Unreleased titles are cut off at today's date.
pub fn discover_movies(filters: &MovieFilters) -> QueryKey {
  let sort_by = filters
    .sort_by
    .as_deref()
    .unwrap_or("primary_release_date.desc");

  let mut key = QueryKey::new("/discover/movie")
    .with_param("sort_by", sort_by)
    .with_param("primary_release_date.lte", release_cutoff());

  if let Some(genres) = &filters.genres {
    key = key.with_param("with_genres", genres);
  }
  if let Some(year) = filters.year {
    key = key.with_param("primary_release_year", year);
  }
  if let Some(country) = &filters.origin_country {
    key = key.with_param("with_origin_country", country);
  }
  if let Some(language) = &filters.original_language {
    key = key.with_param("with_original_language", language);
  }

  key
}

/// Filters for TV discovery. Passed through verbatim; no implicit sort.
#[derive(Debug, Clone, Default)]
pub struct TvFilters {
  /// Comma-separated genre ids.
  pub genres: Option<String>,
  pub first_air_date_year: Option<u32>,
  pub origin_country: Option<String>,
  pub sort_by: Option<String>,
}

pub fn discover_tv(filters: &TvFilters) -> QueryKey {
  let mut key = QueryKey::new("/discover/tv");

  if let Some(genres) = &filters.genres {
    key = key.with_param("with_genres", genres);
  }
  if let Some(year) = filters.first_air_date_year {
    key = key.with_param("first_air_date_year", year);
  }
  if let Some(country) = &filters.origin_country {
    key = key.with_param("with_origin_country", country);
  }
  if let Some(sort_by) = &filters.sort_by {
    key = key.with_param("sort_by", sort_by);
  }

  key
}

// ============================================================================
// Region catalogs
// ============================================================================

/// Regional movie catalogs, keyed by original language. Pakistani content is
/// special-cased: the `ur` language code alone misses most of it, so the
/// origin country is pinned instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
  English,
  Hindi,
  Urdu,
  Telugu,
  Tamil,
  Punjabi,
}

impl Region {
  pub fn from_code(code: &str) -> Option<Self> {
    match code {
      "en" => Some(Region::English),
      "hi" => Some(Region::Hindi),
      "ur" => Some(Region::Urdu),
      "te" => Some(Region::Telugu),
      "ta" => Some(Region::Tamil),
      "pa" => Some(Region::Punjabi),
      _ => None,
    }
  }

  pub fn code(&self) -> &'static str {
    match self {
      Region::English => "en",
      Region::Hindi => "hi",
      Region::Urdu => "ur",
      Region::Telugu => "te",
      Region::Tamil => "ta",
      Region::Punjabi => "pa",
    }
  }
}

/// Newest releases for a region, cut off at today's date.
pub fn region_movies(region: Region) -> QueryKey {
  let mut key = QueryKey::new("/discover/movie")
    .with_param("sort_by", "primary_release_date.desc")
    .with_param("primary_release_date.lte", release_cutoff());

  match region {
    Region::Urdu => {
      key = key
        .with_param("with_origin_country", "PK")
        .with_param("with_original_language", "ur");
    }
    _ => {
      key = key.with_param("with_original_language", region.code());
    }
  }

  key
}

/// Today's date (YYYY-MM-DD), the upper bound for release-date filters.
fn release_cutoff() -> String {
  Utc::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_catalog_endpoints() {
    assert_eq!(popular_movies().endpoint(), "/movie/popular");
    assert_eq!(trending_movies().endpoint(), "/trending/movie/week");
    assert_eq!(on_the_air_tv().endpoint(), "/tv/on_the_air");
    assert_eq!(trending_tv().endpoint(), "/trending/tv/week");
  }

  #[test]
  fn test_empty_search_is_disabled() {
    assert!(!search("").is_enabled());
    assert!(!search("   ").is_enabled());

    let key = search("matrix");
    assert!(key.is_enabled());
    assert_eq!(key.param("query"), Some("matrix"));
  }

  #[test]
  fn test_discover_movies_defaults() {
    let key = discover_movies(&MovieFilters::default());
    assert_eq!(key.endpoint(), "/discover/movie");
    assert_eq!(key.param("sort_by"), Some("primary_release_date.desc"));
    assert!(key.param("primary_release_date.lte").is_some());
    assert_eq!(key.param("with_genres"), None);
  }

  #[test]
  fn test_discover_movies_with_filters() {
    let filters = MovieFilters {
      genres: Some("28,12".to_string()),
      year: Some(2023),
      sort_by: Some("popularity.desc".to_string()),
      ..Default::default()
    };
    let key = discover_movies(&filters);

    assert_eq!(key.param("with_genres"), Some("28,12"));
    assert_eq!(key.param("primary_release_year"), Some("2023"));
    assert_eq!(key.param("sort_by"), Some("popularity.desc"));
  }

  #[test]
  fn test_discover_tv_passes_filters_verbatim() {
    let filters = TvFilters {
      genres: Some("18".to_string()),
      first_air_date_year: Some(2020),
      origin_country: Some("KR".to_string()),
      sort_by: None,
    };
    let key = discover_tv(&filters);

    assert_eq!(key.endpoint(), "/discover/tv");
    assert_eq!(key.param("with_genres"), Some("18"));
    assert_eq!(key.param("first_air_date_year"), Some("2020"));
    assert_eq!(key.param("with_origin_country"), Some("KR"));
    assert_eq!(key.param("sort_by"), None);
  }

  #[test]
  fn test_urdu_region_pins_origin_country() {
    let key = region_movies(Region::Urdu);
    assert_eq!(key.param("with_origin_country"), Some("PK"));
    assert_eq!(key.param("with_original_language"), Some("ur"));
  }

  #[test]
  fn test_other_regions_use_original_language() {
    for region in [Region::Telugu, Region::Tamil, Region::Hindi] {
      let key = region_movies(region);
      assert_eq!(key.param("with_original_language"), Some(region.code()));
      assert_eq!(key.param("with_origin_country"), None);
    }
  }

  #[test]
  fn test_region_codes_round_trip() {
    for code in ["en", "hi", "ur", "te", "ta", "pa"] {
      assert_eq!(Region::from_code(code).unwrap().code(), code);
    }
    assert_eq!(Region::from_code("fr"), None);
  }
}
