//! HTTP gateway to the TMDB API.
//!
//! The proxy boundary, realized in-process: every request gets the bearer
//! credential and a default `language` injected when the caller omits one;
//! all other query parameters pass through unmodified. Upstream non-success
//! statuses surface verbatim in the error message; transport failures keep
//! their diagnostic. Nothing here retries.

use color_eyre::{eyre::eyre, Result};
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::cache::{PageResponse, PageResult, QueryKey};
use crate::config::Config;
use crate::tmdb::api_types::{ApiMediaItem, ApiMovieDetails, ApiSeasonDetails, ApiTvDetails};
use crate::tmdb::types::{MediaItem, MovieDetails, SeasonDetails, TvShowDetails};

/// TMDB API client wrapper
#[derive(Clone)]
pub struct TmdbClient {
  http: reqwest::Client,
  base_url: Url,
  token: String,
  language: String,
}

impl TmdbClient {
  pub fn new(config: &Config) -> Result<Self> {
    let token = Config::api_token()?;
    let base_url = Url::parse(&config.tmdb.base_url)
      .map_err(|e| eyre!("Invalid TMDB base URL {}: {}", config.tmdb.base_url, e))?;

    Ok(Self {
      http: reqwest::Client::new(),
      base_url,
      token,
      language: config.tmdb.language.clone(),
    })
  }

  /// Fetch one page of a paginated catalog query.
  pub async fn fetch_page(&self, key: &QueryKey, page: u32) -> Result<PageResponse<MediaItem>> {
    let url = self.request_url(key.endpoint(), key.params(), Some(page))?;
    let response: PageResponse<ApiMediaItem> = self.get(url).await?;

    Ok(PageResponse {
      page: response.page,
      total_pages: response.total_pages,
      results: response
        .results
        .into_iter()
        .map(ApiMediaItem::into_item)
        .collect(),
    })
  }

  pub async fn fetch_movie_details(&self, id: u64) -> Result<MovieDetails> {
    let url = self.request_url(&format!("/movie/{}", id), std::iter::empty(), None)?;
    let details: ApiMovieDetails = self.get(url).await?;
    Ok(details.into_details())
  }

  pub async fn fetch_tv_details(&self, id: u64) -> Result<TvShowDetails> {
    let url = self.request_url(&format!("/tv/{}", id), std::iter::empty(), None)?;
    let details: ApiTvDetails = self.get(url).await?;
    Ok(details.into_details())
  }

  pub async fn fetch_season_details(&self, tv_id: u64, season_number: u32) -> Result<SeasonDetails> {
    let url = self.request_url(
      &format!("/tv/{}/season/{}", tv_id, season_number),
      std::iter::empty(),
      None,
    )?;
    let details: ApiSeasonDetails = self.get(url).await?;
    Ok(details.into_details())
  }

  /// Build the upstream URL: caller parameters verbatim, `language` injected
  /// only when absent, `page` appended last for paginated requests.
  fn request_url<'a>(
    &self,
    endpoint: &str,
    params: impl IntoIterator<Item = (&'a str, &'a str)>,
    page: Option<u32>,
  ) -> Result<Url> {
    let base = self.base_url.as_str().trim_end_matches('/');
    let mut url = Url::parse(&format!("{}{}", base, endpoint))
      .map_err(|e| eyre!("Invalid endpoint {}: {}", endpoint, e))?;

    {
      let mut pairs = url.query_pairs_mut();
      let mut has_language = false;
      for (name, value) in params {
        has_language |= name == "language";
        pairs.append_pair(name, value);
      }
      if !has_language {
        pairs.append_pair("language", &self.language);
      }
      if let Some(page) = page {
        pairs.append_pair("page", &page.to_string());
      }
    }

    Ok(url)
  }

  async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
    debug!(url = %url, "tmdb request");

    let response = self
      .http
      .get(url)
      .bearer_auth(&self.token)
      .send()
      .await
      .map_err(|e| eyre!("Error: request failed: {}", e))?;

    let status = response.status();
    if !status.is_success() {
      warn!(status = status.as_u16(), "tmdb request failed");
      return Err(eyre!(
        "Error: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
      ));
    }

    response
      .json::<T>()
      .await
      .map_err(|e| eyre!("Error: malformed response: {}", e))
  }
}

/// The shared page fetcher wired into a [`crate::cache::QueryStore`],
/// collapsing gateway failures into the entry's error message.
pub fn page_fetcher(
  client: TmdbClient,
) -> impl Fn(QueryKey, u32) -> BoxFuture<'static, PageResult<MediaItem>> + Send + Sync {
  move |key, page| {
    let client = client.clone();
    Box::pin(async move {
      client
        .fetch_page(&key, page)
        .await
        .map_err(|e| e.to_string())
    }) as BoxFuture<'static, PageResult<MediaItem>>
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn test_client(language: &str) -> TmdbClient {
    TmdbClient {
      http: reqwest::Client::new(),
      base_url: Url::parse("https://api.themoviedb.org/3").unwrap(),
      token: "test-token".to_string(),
      language: language.to_string(),
    }
  }

  #[test]
  fn test_default_language_injected_when_absent() {
    let client = test_client("en-US");
    let key = QueryKey::new("/movie/popular");
    let url = client.request_url(key.endpoint(), key.params(), Some(1)).unwrap();

    assert_eq!(
      url.as_str(),
      "https://api.themoviedb.org/3/movie/popular?language=en-US&page=1"
    );
  }

  #[test]
  fn test_caller_language_wins() {
    let client = test_client("en-US");
    let key = QueryKey::new("/movie/popular").with_param("language", "de-DE");
    let url = client.request_url(key.endpoint(), key.params(), Some(2)).unwrap();

    let languages: Vec<_> = url
      .query_pairs()
      .filter(|(k, _)| k == "language")
      .map(|(_, v)| v.into_owned())
      .collect();
    assert_eq!(languages, vec!["de-DE"]);
  }

  #[test]
  fn test_base_parameters_pass_through_verbatim() {
    let client = test_client("en-US");
    let key = QueryKey::new("/discover/movie")
      .with_param("with_genres", 28)
      .with_param("sort_by", "popularity.desc");
    let url = client.request_url(key.endpoint(), key.params(), Some(3)).unwrap();

    let pairs: Vec<_> = url
      .query_pairs()
      .map(|(k, v)| (k.into_owned(), v.into_owned()))
      .collect();
    assert!(pairs.contains(&("with_genres".into(), "28".into())));
    assert!(pairs.contains(&("sort_by".into(), "popularity.desc".into())));
    assert!(pairs.contains(&("page".into(), "3".into())));
  }

  #[test]
  fn test_detail_url_has_no_page() {
    let client = test_client("en-US");
    let url = client
      .request_url("/tv/1396/season/1", std::iter::empty(), None)
      .unwrap();

    assert_eq!(
      url.as_str(),
      "https://api.themoviedb.org/3/tv/1396/season/1?language=en-US"
    );
  }
}
