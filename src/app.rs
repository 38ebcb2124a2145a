//! Headless consumer of the catalog cache.
//!
//! Stands in for a presentation layer: it drives the store through the
//! consumer contract only (initialize, poll, fetch_next_page), waiting on a
//! tick like an interactive client would, then prints what a view would
//! render.

use std::time::Duration;

use color_eyre::{eyre::eyre, Result};
use tracing::info;

use crate::cache::{QueryKey, QueryStore};
use crate::config::Config;
use crate::query::{Query, QueryState};
use crate::tmdb::client::{page_fetcher, TmdbClient};
use crate::tmdb::types::{MediaItem, MovieDetails, SeasonDetails, TvShowDetails};

/// How often to poll for arrived responses
const TICK: Duration = Duration::from_millis(50);

pub struct App {
  store: QueryStore<MediaItem>,
  client: TmdbClient,
}

impl App {
  pub fn new(config: &Config) -> Result<Self> {
    let client = TmdbClient::new(config)?;
    let store = QueryStore::new(page_fetcher(client.clone()));

    Ok(Self { store, client })
  }

  /// Browse a paginated catalog, accumulating up to `pages` pages, and print
  /// one line per item. On failure, whatever pages arrived before the error
  /// are still printed.
  pub async fn browse(&mut self, key: QueryKey, pages: u32) -> Result<()> {
    if !key.is_enabled() {
      println!("(nothing to fetch)");
      return Ok(());
    }

    info!(query = %key, pages, "browsing catalog");
    self.store.initialize(&key);

    let mut failure = None;
    let mut interval = tokio::time::interval(TICK);
    loop {
      interval.tick().await;
      if !self.store.poll() {
        continue;
      }

      let Some(entry) = self.store.entry(&key) else {
        break;
      };
      if let Some(error) = entry.error() {
        failure = Some(error.to_string());
        break;
      }
      if entry.is_loading() || entry.is_fetching_next_page() {
        continue;
      }
      if (entry.pages().len() as u32) < pages && entry.has_next_page() {
        self.store.fetch_next_page(&key);
        continue;
      }
      break;
    }

    if let Some(entry) = self.store.entry(&key) {
      for item in entry.items() {
        print_item(item);
      }
      if let Some(last) = entry.pages().last() {
        if entry.has_next_page() {
          println!("-- page {} of {} --", last.page, last.total_pages);
        }
      }
    }

    match failure {
      Some(message) => Err(eyre!(message)),
      None => Ok(()),
    }
  }

  pub async fn movie(&self, id: u64) -> Result<()> {
    let client = self.client.clone();
    let mut query = Query::new(move || {
      let client = client.clone();
      async move { client.fetch_movie_details(id).await.map_err(|e| e.to_string()) }
    });

    settle(&mut query).await;
    match query.state() {
      QueryState::Success(movie) => {
        print_movie(movie);
        Ok(())
      }
      QueryState::Error(e) => Err(eyre!("{}", e)),
      _ => Err(eyre!("request did not complete")),
    }
  }

  pub async fn tv_show(&self, id: u64) -> Result<()> {
    let client = self.client.clone();
    let mut query = Query::new(move || {
      let client = client.clone();
      async move { client.fetch_tv_details(id).await.map_err(|e| e.to_string()) }
    });

    settle(&mut query).await;
    match query.state() {
      QueryState::Success(show) => {
        print_tv_show(show);
        Ok(())
      }
      QueryState::Error(e) => Err(eyre!("{}", e)),
      _ => Err(eyre!("request did not complete")),
    }
  }

  pub async fn season(&self, tv_id: u64, season_number: u32) -> Result<()> {
    let client = self.client.clone();
    let mut query = Query::new(move || {
      let client = client.clone();
      async move {
        client
          .fetch_season_details(tv_id, season_number)
          .await
          .map_err(|e| e.to_string())
      }
    });

    settle(&mut query).await;
    match query.state() {
      QueryState::Success(season) => {
        print_season(season);
        Ok(())
      }
      QueryState::Error(e) => Err(eyre!("{}", e)),
      _ => Err(eyre!("request did not complete")),
    }
  }
}

/// Start the fetch and poll until it settles.
async fn settle<T: Send + 'static>(query: &mut Query<T>) {
  query.fetch();
  let mut interval = tokio::time::interval(TICK);
  loop {
    interval.tick().await;
    if query.poll() {
      return;
    }
  }
}

fn print_item(item: &MediaItem) {
  let year = item.year().unwrap_or("----");
  println!(
    "{:>9}  {:<5}  {:>4.1}  {} ({})",
    item.id,
    item.kind.as_str(),
    item.vote_average,
    item.title,
    year
  );
}

fn print_movie(movie: &MovieDetails) {
  match movie.released.as_deref().and_then(|d| d.get(..4)) {
    Some(year) => println!("{} ({})", movie.title, year),
    None => println!("{}", movie.title),
  }
  if let Some(tagline) = &movie.tagline {
    println!("  \"{}\"", tagline);
  }
  if !movie.genres.is_empty() {
    println!("  genres: {}", join_names(movie.genres.iter().map(|g| g.name.as_str())));
  }
  if let Some(runtime) = movie.runtime {
    println!("  runtime: {} min", runtime);
  }
  if let Some(status) = &movie.status {
    println!("  status: {}", status);
  }
  println!("  rating: {:.1}", movie.vote_average);
  if !movie.overview.is_empty() {
    println!("\n{}", movie.overview);
  }
}

fn print_tv_show(show: &TvShowDetails) {
  match show.first_air_date.as_deref().and_then(|d| d.get(..4)) {
    Some(year) => println!("{} ({})", show.name, year),
    None => println!("{}", show.name),
  }
  if !show.genres.is_empty() {
    println!("  genres: {}", join_names(show.genres.iter().map(|g| g.name.as_str())));
  }
  if !show.networks.is_empty() {
    println!("  networks: {}", join_names(show.networks.iter().map(|n| n.name.as_str())));
  }
  println!("  rating: {:.1}", show.vote_average);
  if !show.overview.is_empty() {
    println!("\n{}\n", show.overview);
  }
  println!("{} seasons:", show.number_of_seasons);
  for season in &show.seasons {
    println!(
      "  {:>2}  {} ({} episodes)",
      season.season_number, season.name, season.episode_count
    );
  }
}

fn print_season(season: &SeasonDetails) {
  println!("{}", season.name);
  if !season.overview.is_empty() {
    println!("\n{}\n", season.overview);
  }
  for episode in &season.episodes {
    let runtime = episode
      .runtime
      .map(|r| format!("{} min", r))
      .unwrap_or_else(|| "-".to_string());
    println!(
      "  {:>2}  {:<40}  {:>7}  {:>4.1}",
      episode.episode_number, episode.name, runtime, episode.vote_average
    );
  }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
  names.collect::<Vec<_>>().join(", ")
}
