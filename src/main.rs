mod app;
mod cache;
mod config;
mod query;
mod tmdb;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tmdb::queries::{self, MovieFilters, Region, TvFilters};

#[derive(Parser, Debug)]
#[command(name = "flicks")]
#[command(about = "Browse movie and TV catalogs from the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/flicks/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Browse a movie catalog
  Movies {
    #[arg(value_enum)]
    list: MovieList,
    /// Number of pages to fetch
    #[arg(short, long, default_value_t = 1)]
    pages: u32,
  },
  /// Browse a TV catalog
  Tv {
    #[arg(value_enum)]
    list: TvList,
    /// Number of pages to fetch
    #[arg(short, long, default_value_t = 1)]
    pages: u32,
  },
  /// Discover movies, filtered
  DiscoverMovies {
    /// Comma-separated genre ids
    #[arg(long)]
    genres: Option<String>,
    /// Release year
    #[arg(long)]
    year: Option<u32>,
    /// Origin country (ISO 3166-1)
    #[arg(long)]
    country: Option<String>,
    /// Original language (ISO 639-1)
    #[arg(long)]
    language: Option<String>,
    /// Sort order (default: newest first)
    #[arg(long)]
    sort_by: Option<String>,
    #[arg(short, long, default_value_t = 1)]
    pages: u32,
  },
  /// Discover TV shows, filtered
  DiscoverTv {
    /// Comma-separated genre ids
    #[arg(long)]
    genres: Option<String>,
    /// First air date year
    #[arg(long)]
    year: Option<u32>,
    /// Origin country (ISO 3166-1)
    #[arg(long)]
    country: Option<String>,
    /// Sort order
    #[arg(long)]
    sort_by: Option<String>,
    #[arg(short, long, default_value_t = 1)]
    pages: u32,
  },
  /// Newest movie releases for a region
  Region {
    /// Region code: en, hi, ur, te, ta, pa
    code: String,
    #[arg(short, long, default_value_t = 1)]
    pages: u32,
  },
  /// Search movies and TV shows
  Search {
    query: String,
    #[arg(short, long, default_value_t = 1)]
    pages: u32,
  },
  /// Show movie details
  Movie { id: u64 },
  /// Show TV show details, including its seasons
  TvShow { id: u64 },
  /// Show one season of a TV show, including its episodes
  Season { id: u64, number: u32 },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MovieList {
  Popular,
  TopRated,
  Upcoming,
  Trending,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TvList {
  Popular,
  TopRated,
  OnTheAir,
  Trending,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  let _log_guard = init_logging()?;

  let args = Args::parse();

  let config = config::Config::load(args.config.as_deref())?;
  let mut app = app::App::new(&config)?;

  match args.command {
    Command::Movies { list, pages } => {
      let key = match list {
        MovieList::Popular => queries::popular_movies(),
        MovieList::TopRated => queries::top_rated_movies(),
        MovieList::Upcoming => queries::upcoming_movies(),
        MovieList::Trending => queries::trending_movies(),
      };
      app.browse(key, pages).await
    }
    Command::Tv { list, pages } => {
      let key = match list {
        TvList::Popular => queries::popular_tv(),
        TvList::TopRated => queries::top_rated_tv(),
        TvList::OnTheAir => queries::on_the_air_tv(),
        TvList::Trending => queries::trending_tv(),
      };
      app.browse(key, pages).await
    }
    Command::DiscoverMovies {
      genres,
      year,
      country,
      language,
      sort_by,
      pages,
    } => {
      let filters = MovieFilters {
        genres,
        year,
        origin_country: country,
        original_language: language,
        sort_by,
      };
      app.browse(queries::discover_movies(&filters), pages).await
    }
    Command::DiscoverTv {
      genres,
      year,
      country,
      sort_by,
      pages,
    } => {
      let filters = TvFilters {
        genres,
        first_air_date_year: year,
        origin_country: country,
        sort_by,
      };
      app.browse(queries::discover_tv(&filters), pages).await
    }
    Command::Region { code, pages } => {
      let region = Region::from_code(&code)
        .ok_or_else(|| eyre!("Unknown region code: {} (expected en, hi, ur, te, ta, pa)", code))?;
      app.browse(queries::region_movies(region), pages).await
    }
    Command::Search { query, pages } => app.browse(queries::search(&query), pages).await,
    Command::Movie { id } => app.movie(id).await,
    Command::TvShow { id } => app.tv_show(id).await,
    Command::Season { id, number } => app.season(id, number).await,
  }
}

/// Log to a file in the data directory - stdout belongs to program output.
/// Filtering comes from RUST_LOG, nothing below warn by default.
fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
  let log_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?
    .join("flicks");

  std::fs::create_dir_all(&log_dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", log_dir.display(), e))?;

  let file = tracing_appender::rolling::never(log_dir, "flicks.log");
  let (writer, guard) = tracing_appender::non_blocking(file);

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}
