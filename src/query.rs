//! Single-shot async fetch with state management.
//!
//! The non-paginated companion to [`crate::cache::PagedQuery`], used for
//! detail resources that arrive as one object (a movie, a show, a season)
//! rather than an accumulating list of pages. Same consumption model: start
//! the fetch, poll from the owner's tick, read the state.
//!
//! # Example
//!
//! ```ignore
//! let client = client.clone();
//! let mut query = Query::new(move || {
//!     let client = client.clone();
//!     async move { client.fetch_movie_details(603).await.map_err(|e| e.to_string()) }
//! });
//!
//! query.fetch();
//!
//! // In event loop tick
//! if query.poll() {
//!     match query.state() {
//!         QueryState::Success(movie) => render(movie),
//!         QueryState::Error(e) => render_error(e),
//!         _ => {}
//!     }
//! }
//! ```

use std::future::Future;

use futures::future::BoxFuture;
use tokio::sync::mpsc;

/// The state of a query
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Query has not been started
  Idle,
  /// Query is currently fetching data
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed with an error
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn is_success(&self) -> bool {
    matches!(self, QueryState::Success(_))
  }

  pub fn is_error(&self) -> bool {
    matches!(self, QueryState::Error(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// A factory function that creates futures for fetching data
type FetcherFn<T> = Box<dyn Fn() -> BoxFuture<'static, Result<T, String>> + Send + Sync>;

/// Single-shot fetch with Idle / Loading / Success / Error states.
///
/// Failures are captured into the state, never propagated; starting a fetch
/// while one is pending is a no-op; a response arriving after `refetch`
/// replaced the pending request is discarded.
pub struct Query<T> {
  state: QueryState<T>,
  fetcher: FetcherFn<T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
}

impl<T: Send + 'static> Query<T> {
  /// Create a new query with the given fetcher function.
  ///
  /// The fetcher is a closure that returns a future; it is called each time
  /// `fetch()` or `refetch()` is invoked.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    Self {
      state: QueryState::Idle,
      fetcher: Box::new(move || Box::pin(fetcher())),
      receiver: None,
    }
  }

  /// Get the current state of the query.
  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  /// Get the data if the query succeeded.
  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  pub fn is_success(&self) -> bool {
    self.state.is_success()
  }

  pub fn is_error(&self) -> bool {
    self.state.is_error()
  }

  /// Get the error message if the query failed.
  pub fn error(&self) -> Option<&str> {
    self.state.error()
  }

  /// Start fetching data if not already loading.
  ///
  /// This is a no-op if the query is already loading.
  pub fn fetch(&mut self) {
    if self.state.is_loading() {
      return;
    }
    self.start_fetch();
  }

  /// Force a refetch, even if already loading or data exists.
  pub fn refetch(&mut self) {
    // Cancel any pending fetch by dropping the receiver
    self.receiver = None;
    self.start_fetch();
  }

  /// Poll for results from a pending fetch.
  ///
  /// Returns `true` if the state changed (data arrived or error occurred).
  /// Call this in your event loop tick handler.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    match receiver.try_recv() {
      Ok(Ok(data)) => {
        self.state = QueryState::Success(data);
        self.receiver = None;
        true
      }
      Ok(Err(error)) => {
        self.state = QueryState::Error(error);
        self.receiver = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        // Sender dropped without sending - treat as error
        self.state = QueryState::Error("request was cancelled".to_string());
        self.receiver = None;
        true
      }
    }
  }

  fn start_fetch(&mut self) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.state = QueryState::Loading;

    let future = (self.fetcher)();
    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - receiver may have been dropped
      let _ = tx.send(result);
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}
