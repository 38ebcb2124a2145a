//! Serde-deserializable types matching TMDB API responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs. Unknown fields
//! are ignored; absent ones default, since upstream shapes drift.

use serde::Deserialize;

// ============================================================================
// List items - movie and TV shapes merged, as mixed endpoints return both
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMediaItem {
  pub id: u64,
  /// Movies carry `title`, TV shows carry `name`.
  pub title: Option<String>,
  pub name: Option<String>,
  #[serde(default)]
  pub overview: String,
  pub poster_path: Option<String>,
  pub backdrop_path: Option<String>,
  pub release_date: Option<String>,
  pub first_air_date: Option<String>,
  #[serde(default)]
  pub vote_average: f32,
  /// Present on mixed endpoints (trending, multi-search) only.
  pub media_type: Option<String>,
}

// ============================================================================
// Shared nested shapes
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGenre {
  pub id: u64,
  pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiNetwork {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub origin_country: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSeason {
  pub id: u64,
  #[serde(default)]
  pub name: String,
  pub season_number: u32,
  #[serde(default)]
  pub episode_count: u32,
  pub air_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEpisode {
  pub id: u64,
  #[serde(default)]
  pub name: String,
  pub episode_number: u32,
  #[serde(default)]
  pub overview: String,
  pub air_date: Option<String>,
  #[serde(default)]
  pub vote_average: f32,
  pub runtime: Option<u32>,
}

// ============================================================================
// Detail endpoint responses
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ApiMovieDetails {
  pub id: u64,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub overview: String,
  pub release_date: Option<String>,
  pub runtime: Option<u32>,
  #[serde(default)]
  pub vote_average: f32,
  #[serde(default)]
  pub genres: Vec<ApiGenre>,
  pub tagline: Option<String>,
  pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiTvDetails {
  pub id: u64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub overview: String,
  pub first_air_date: Option<String>,
  #[serde(default)]
  pub number_of_seasons: u32,
  #[serde(default)]
  pub vote_average: f32,
  #[serde(default)]
  pub genres: Vec<ApiGenre>,
  #[serde(default)]
  pub seasons: Vec<ApiSeason>,
  #[serde(default)]
  pub networks: Vec<ApiNetwork>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiSeasonDetails {
  pub id: u64,
  #[serde(default)]
  pub name: String,
  pub season_number: u32,
  #[serde(default)]
  pub overview: String,
  pub air_date: Option<String>,
  #[serde(default)]
  pub episodes: Vec<ApiEpisode>,
}

// ============================================================================
// Conversions to domain types
// ============================================================================

use super::types::{
  EpisodeSummary, Genre, MediaItem, MediaKind, MovieDetails, Network, SeasonDetails,
  SeasonSummary, TvShowDetails,
};

impl ApiMediaItem {
  pub fn into_item(self) -> MediaItem {
    let kind = media_kind(self.media_type.as_deref(), self.first_air_date.is_some());
    let (title, released) = match kind {
      MediaKind::Movie => (self.title, self.release_date),
      MediaKind::Tv => (self.name, self.first_air_date),
    };
    MediaItem {
      id: self.id,
      title: title.unwrap_or_default(),
      kind,
      overview: self.overview,
      poster_path: self.poster_path,
      backdrop_path: self.backdrop_path,
      released,
      vote_average: self.vote_average,
    }
  }
}

impl From<ApiGenre> for Genre {
  fn from(g: ApiGenre) -> Self {
    Genre {
      id: g.id,
      name: g.name,
    }
  }
}

impl ApiMovieDetails {
  pub fn into_details(self) -> MovieDetails {
    MovieDetails {
      id: self.id,
      title: self.title,
      overview: self.overview,
      released: self.release_date,
      runtime: self.runtime,
      vote_average: self.vote_average,
      genres: self.genres.into_iter().map(Genre::from).collect(),
      tagline: self.tagline.filter(|t| !t.is_empty()),
      status: self.status,
    }
  }
}

impl ApiTvDetails {
  pub fn into_details(self) -> TvShowDetails {
    TvShowDetails {
      id: self.id,
      name: self.name,
      overview: self.overview,
      first_air_date: self.first_air_date,
      number_of_seasons: self.number_of_seasons,
      vote_average: self.vote_average,
      genres: self.genres.into_iter().map(Genre::from).collect(),
      seasons: self
        .seasons
        .into_iter()
        .map(|s| SeasonSummary {
          id: s.id,
          name: s.name,
          season_number: s.season_number,
          episode_count: s.episode_count,
          air_date: s.air_date,
        })
        .collect(),
      networks: self
        .networks
        .into_iter()
        .map(|n| Network {
          id: n.id,
          name: n.name,
          origin_country: n.origin_country,
        })
        .collect(),
    }
  }
}

impl ApiSeasonDetails {
  pub fn into_details(self) -> SeasonDetails {
    SeasonDetails {
      id: self.id,
      name: self.name,
      season_number: self.season_number,
      overview: self.overview,
      air_date: self.air_date,
      episodes: self
        .episodes
        .into_iter()
        .map(|e| EpisodeSummary {
          id: e.id,
          name: e.name,
          episode_number: e.episode_number,
          overview: e.overview,
          air_date: e.air_date,
          vote_average: e.vote_average,
          runtime: e.runtime,
        })
        .collect(),
    }
  }
}

/// Decide movie vs TV for list items. Mixed endpoints say so explicitly via
/// `media_type`; single-kind endpoints omit it, so fall back on which date
/// field the item carries.
fn media_kind(media_type: Option<&str>, has_first_air_date: bool) -> MediaKind {
  match media_type {
    Some("tv") => MediaKind::Tv,
    Some(_) => MediaKind::Movie,
    None if has_first_air_date => MediaKind::Tv,
    None => MediaKind::Movie,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::PageResponse;

  #[test]
  fn test_movie_list_item_deserializes() {
    let json = r#"{
      "id": 603,
      "title": "The Matrix",
      "overview": "A hacker learns the truth.",
      "poster_path": "/p.jpg",
      "backdrop_path": null,
      "release_date": "1999-03-30",
      "vote_average": 8.2,
      "popularity": 91.5,
      "adult": false
    }"#;

    let raw: ApiMediaItem = serde_json::from_str(json).unwrap();
    let item = raw.into_item();
    assert_eq!(item.id, 603);
    assert_eq!(item.title, "The Matrix");
    assert_eq!(item.kind, MediaKind::Movie);
    assert_eq!(item.year(), Some("1999"));
  }

  #[test]
  fn test_tv_item_from_mixed_endpoint() {
    let json = r#"{
      "id": 1396,
      "name": "Breaking Bad",
      "media_type": "tv",
      "first_air_date": "2008-01-20",
      "vote_average": 8.9
    }"#;

    let item: ApiMediaItem = serde_json::from_str(json).unwrap();
    let item = item.into_item();
    assert_eq!(item.kind, MediaKind::Tv);
    assert_eq!(item.title, "Breaking Bad");
    assert_eq!(item.released.as_deref(), Some("2008-01-20"));
  }

  #[test]
  fn test_tv_item_without_media_type_uses_air_date() {
    let json = r#"{"id": 66732, "name": "Stranger Things", "first_air_date": "2016-07-15"}"#;
    let item: ApiMediaItem = serde_json::from_str(json).unwrap();
    assert_eq!(item.into_item().kind, MediaKind::Tv);
  }

  #[test]
  fn test_paged_envelope_deserializes() {
    let json = r#"{
      "page": 1,
      "results": [{"id": 1, "title": "A"}, {"id": 2, "title": "B"}],
      "total_pages": 500,
      "total_results": 10000
    }"#;

    let page: PageResponse<ApiMediaItem> = serde_json::from_str(json).unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.total_pages, 500);
    assert_eq!(page.results.len(), 2);
  }

  #[test]
  fn test_season_details_with_episodes() {
    let json = r#"{
      "id": 3572,
      "name": "Season 1",
      "season_number": 1,
      "air_date": "2008-01-20",
      "episodes": [
        {"id": 62085, "name": "Pilot", "episode_number": 1, "runtime": 58},
        {"id": 62086, "name": "Cat's in the Bag...", "episode_number": 2}
      ]
    }"#;

    let season: ApiSeasonDetails = serde_json::from_str(json).unwrap();
    let season = season.into_details();
    assert_eq!(season.season_number, 1);
    assert_eq!(season.episodes.len(), 2);
    assert_eq!(season.episodes[0].runtime, Some(58));
    assert_eq!(season.episodes[1].runtime, None);
  }

  #[test]
  fn test_movie_details_drops_empty_tagline() {
    let json = r#"{"id": 603, "title": "The Matrix", "tagline": "", "genres": [{"id": 28, "name": "Action"}]}"#;
    let details: ApiMovieDetails = serde_json::from_str(json).unwrap();
    let details = details.into_details();
    assert_eq!(details.tagline, None);
    assert_eq!(details.genres[0].name, "Action");
  }
}
