//! Incremental pagination state machine for catalog queries.
//!
//! [`PagedQuery`] owns one cache entry: the ordered pages fetched so far for a
//! single [`QueryKey`], the loading/error state, and the in-flight request (at
//! most one at a time). Consumers read the flattened results, ask for the next
//! page, and poll for arrivals from their tick loop.
//!
//! # Example
//!
//! ```ignore
//! let mut query = PagedQuery::new(move |key, page| {
//!     let client = client.clone();
//!     Box::pin(async move { client.fetch_page(&key, page).await })
//! });
//!
//! query.set_key(Some(queries::popular_movies()));
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, re-render
//! }
//!
//! // On scroll-to-bottom
//! query.fetch_next_page();
//! ```

use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Deserialize;
use tokio::sync::mpsc;

use super::key::QueryKey;

/// One fetched page of results plus pagination metadata, immutable once
/// fetched. Only `page`, `total_pages` and `results` are interpreted; the
/// item type stays opaque to the cache.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PageResponse<T> {
  #[serde(default = "first_page")]
  pub page: u32,
  #[serde(default)]
  pub total_pages: u32,
  #[serde(default)]
  pub results: Vec<T>,
}

fn first_page() -> u32 {
  1
}

/// The phase of a paged entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagedPhase {
  /// No fetch in flight. Also the resting state of a disabled key.
  Idle,
  /// Fetching page 1 for a fresh (or refetched) entry.
  Loading,
  /// Fetching a page ≥ 2 on top of existing pages.
  LoadingNext,
  /// The last request failed. Previously fetched pages are preserved.
  Error,
}

/// Result of one page fetch, collapsed to a message string on failure.
pub type PageResult<T> = Result<PageResponse<T>, String>;

/// A page fetcher shared between entries: given the query identity and a
/// 1-based page number, produce that page.
pub type SharedPageFetcher<T> =
  Arc<dyn Fn(QueryKey, u32) -> BoxFuture<'static, PageResult<T>> + Send + Sync>;

/// Paged fetch cache entry.
///
/// Invariants:
/// - pages are contiguous starting at page 1 and append-only
/// - at most one request is in flight; a second ask is a silent no-op
/// - `has_next_page` is derived from the last page, never stored
/// - results arriving after a reset or key change are discarded
pub struct PagedQuery<T> {
  key: Option<QueryKey>,
  fetcher: SharedPageFetcher<T>,
  pages: Vec<PageResponse<T>>,
  phase: PagedPhase,
  error: Option<String>,
  receiver: Option<mpsc::UnboundedReceiver<PageResult<T>>>,
}

impl<T: Send + 'static> PagedQuery<T> {
  /// Create an idle entry with the given page fetcher. No request is issued
  /// until a key is set.
  pub fn new<F>(fetcher: F) -> Self
  where
    F: Fn(QueryKey, u32) -> BoxFuture<'static, PageResult<T>> + Send + Sync + 'static,
  {
    Self::with_fetcher(Arc::new(fetcher))
  }

  /// Create an idle entry from an already-shared fetcher (used by the store
  /// so all entries reuse one transport closure).
  pub fn with_fetcher(fetcher: SharedPageFetcher<T>) -> Self {
    Self {
      key: None,
      fetcher,
      pages: Vec::new(),
      phase: PagedPhase::Idle,
      error: None,
      receiver: None,
    }
  }

  /// Point this entry at a query, fetching page 1 if the identity changed.
  ///
  /// Identity compares by structural value, not reference: setting an equal
  /// key is a no-op, so repeated calls from a consumer render loop do not
  /// refetch. A changed key discards all accumulated state (any in-flight
  /// response will be dropped, never applied) and starts over from page 1.
  /// A disabled key leaves the entry idle and empty.
  pub fn set_key(&mut self, key: Option<QueryKey>) {
    if self.key == key {
      return;
    }

    self.key = key;
    self.receiver = None;
    self.pages.clear();
    self.error = None;
    self.phase = PagedPhase::Idle;

    if self.key.as_ref().is_some_and(QueryKey::is_enabled) {
      self.start_fetch(1, PagedPhase::Loading);
    }
  }

  pub fn key(&self) -> Option<&QueryKey> {
    self.key.as_ref()
  }

  /// The pages fetched so far, in page order.
  pub fn pages(&self) -> &[PageResponse<T>] {
    &self.pages
  }

  /// All results fetched so far, flattened in page order.
  pub fn items(&self) -> impl Iterator<Item = &T> {
    self.pages.iter().flat_map(|p| p.results.iter())
  }

  pub fn phase(&self) -> PagedPhase {
    self.phase
  }

  /// True only while fetching page 1 for a fresh entry.
  pub fn is_loading(&self) -> bool {
    self.phase == PagedPhase::Loading
  }

  /// True only while a page ≥ 2 request is in flight.
  pub fn is_fetching_next_page(&self) -> bool {
    self.phase == PagedPhase::LoadingNext
  }

  /// Whether the upstream reports more pages after the last fetched one.
  pub fn has_next_page(&self) -> bool {
    self
      .pages
      .last()
      .is_some_and(|last| last.page < last.total_pages)
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  /// Request the page after the last fetched one.
  ///
  /// Silent no-op unless the entry has at least one page, the upstream
  /// reports more, and nothing is in flight, so rapid repeated calls
  /// produce at most one request. After a failure the page counter has not
  /// advanced, so calling this again retries the same page.
  pub fn fetch_next_page(&mut self) {
    if self.receiver.is_some() || !self.has_next_page() {
      return;
    }

    let next = self.pages.last().map(|p| p.page + 1).unwrap_or(1);
    self.start_fetch(next, PagedPhase::LoadingNext);
  }

  /// Restart from page 1, discarding any in-flight request. Existing pages
  /// are kept until the fresh page 1 arrives and replaces them.
  pub fn refetch(&mut self) {
    if !self.key.as_ref().is_some_and(QueryKey::is_enabled) {
      return;
    }

    self.receiver = None;
    self.start_fetch(1, PagedPhase::Loading);
  }

  /// Apply any arrived response. Non-blocking; call from the owner's tick.
  ///
  /// Returns `true` if the state changed.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    match receiver.try_recv() {
      Ok(Ok(page)) => {
        if self.phase == PagedPhase::Loading {
          self.pages = vec![page];
        } else {
          self.pages.push(page);
        }
        self.error = None;
        self.phase = PagedPhase::Idle;
        self.receiver = None;
        true
      }
      Ok(Err(message)) => {
        self.error = Some(message);
        self.phase = PagedPhase::Error;
        self.receiver = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        // Sender dropped without sending
        self.error = Some("request was cancelled".to_string());
        self.phase = PagedPhase::Error;
        self.receiver = None;
        true
      }
    }
  }

  fn start_fetch(&mut self, page: u32, phase: PagedPhase) {
    let key = match &self.key {
      Some(k) => k.clone(),
      None => return,
    };

    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.error = None;
    self.phase = phase;

    let future = (self.fetcher)(key, page);
    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - the entry may have been reset or dropped
      let _ = tx.send(result);
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PagedQuery<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PagedQuery")
      .field("key", &self.key)
      .field("pages", &self.pages.len())
      .field("phase", &self.phase)
      .field("error", &self.error)
      .finish_non_exhaustive()
  }
}
