//! Domain types for catalog browsing, normalized from the raw API shapes.

/// Whether an item is a movie or a TV show. Upstream list endpoints mix both
/// (trending, multi-search), so every item carries its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
  Movie,
  Tv,
}

impl MediaKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      MediaKind::Movie => "movie",
      MediaKind::Tv => "tv",
    }
  }
}

/// One catalog list item, movie or TV show.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
  pub id: u64,
  pub title: String,
  pub kind: MediaKind,
  pub overview: String,
  pub poster_path: Option<String>,
  pub backdrop_path: Option<String>,
  /// Release date for movies, first air date for TV shows (YYYY-MM-DD).
  pub released: Option<String>,
  pub vote_average: f32,
}

impl MediaItem {
  /// The release year, when the date is known.
  pub fn year(&self) -> Option<&str> {
    self.released.as_deref().and_then(|d| d.get(..4))
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
  pub id: u64,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
  pub id: u64,
  pub title: String,
  pub overview: String,
  pub released: Option<String>,
  pub runtime: Option<u32>,
  pub vote_average: f32,
  pub genres: Vec<Genre>,
  pub tagline: Option<String>,
  pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
  pub id: u64,
  pub name: String,
  pub origin_country: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSummary {
  pub id: u64,
  pub name: String,
  pub season_number: u32,
  pub episode_count: u32,
  pub air_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TvShowDetails {
  pub id: u64,
  pub name: String,
  pub overview: String,
  pub first_air_date: Option<String>,
  pub number_of_seasons: u32,
  pub vote_average: f32,
  pub genres: Vec<Genre>,
  pub seasons: Vec<SeasonSummary>,
  pub networks: Vec<Network>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
  pub id: u64,
  pub name: String,
  pub episode_number: u32,
  pub overview: String,
  pub air_date: Option<String>,
  pub vote_average: f32,
  pub runtime: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonDetails {
  pub id: u64,
  pub name: String,
  pub season_number: u32,
  pub overview: String,
  pub air_date: Option<String>,
  pub episodes: Vec<EpisodeSummary>,
}
