//! Keyed store of paged entries, owned by one consumer scope.
//!
//! The store is the provider boundary the presentation layer talks to: it
//! routes the consumer contract (`initialize` / `entry` / `fetch_next_page` /
//! `reset`) to per-query entries keyed by the hashed canonical identity, and
//! polls them all from the owner's tick. Entries for distinct queries proceed
//! fully independently; nothing here coordinates across them.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use futures::future::BoxFuture;

use super::key::QueryKey;
use super::paged::{PagedQuery, PageResult, SharedPageFetcher};

/// Provider-scope store of [`PagedQuery`] entries sharing one page fetcher.
///
/// No ambient singleton: construct one per consumer scope and pass it down
/// explicitly. Dropping the store discards every entry, including responses
/// still in flight.
pub struct QueryStore<T> {
  entries: HashMap<String, PagedQuery<T>>,
  fetcher: SharedPageFetcher<T>,
}

impl<T: Send + 'static> QueryStore<T> {
  pub fn new<F>(fetcher: F) -> Self
  where
    F: Fn(QueryKey, u32) -> BoxFuture<'static, PageResult<T>> + Send + Sync + 'static,
  {
    Self {
      entries: HashMap::new(),
      fetcher: std::sync::Arc::new(fetcher),
    }
  }

  /// Ensure an entry exists for this query, fetching page 1 on first use.
  ///
  /// A repeated call with the same identity is a no-op, so consumers can
  /// call this unconditionally on every render. A disabled key gets an idle,
  /// empty entry that never fetches.
  pub fn initialize(&mut self, key: &QueryKey) {
    if let Entry::Vacant(slot) = self.entries.entry(key.store_hash()) {
      let mut query = PagedQuery::with_fetcher(self.fetcher.clone());
      query.set_key(Some(key.clone()));
      slot.insert(query);
    }
  }

  /// The entry for this query, if one has been initialized.
  pub fn entry(&self, key: &QueryKey) -> Option<&PagedQuery<T>> {
    self.entries.get(&key.store_hash())
  }

  /// Request the next page for this query. Silent no-op when the entry is
  /// missing, exhausted, or already has a request in flight.
  pub fn fetch_next_page(&mut self, key: &QueryKey) {
    if let Some(query) = self.entries.get_mut(&key.store_hash()) {
      query.fetch_next_page();
    }
  }

  /// Discard the entry and start over from page 1.
  pub fn reset(&mut self, key: &QueryKey) {
    self.remove(key);
    self.initialize(key);
  }

  /// Discard the entry. An in-flight response will be dropped, not applied.
  pub fn remove(&mut self, key: &QueryKey) {
    self.entries.remove(&key.store_hash());
  }

  /// Poll every entry for arrived responses. Returns `true` if any entry
  /// changed state.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    for query in self.entries.values_mut() {
      changed |= query.poll();
    }
    changed
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for QueryStore<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("QueryStore")
      .field("entries", &self.entries.len())
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::paged::PageResponse;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::sync::Arc;
  use std::time::Duration;

  fn store_with_counter(calls: Arc<AtomicU32>) -> QueryStore<u64> {
    QueryStore::new(move |_key, page: u32| {
      calls.fetch_add(1, Ordering::SeqCst);
      Box::pin(async move {
        Ok(PageResponse {
          page,
          total_pages: 3,
          results: vec![u64::from(page)],
        })
      }) as BoxFuture<'static, PageResult<u64>>
    })
  }

  async fn tick(store: &mut QueryStore<u64>) {
    tokio::time::sleep(Duration::from_millis(10)).await;
    store.poll();
  }

  #[tokio::test]
  async fn test_initialize_is_idempotent() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut store = store_with_counter(calls.clone());

    let key = QueryKey::new("/movie/popular");
    store.initialize(&key);
    store.initialize(&key);
    tick(&mut store).await;
    store.initialize(&key);

    assert_eq!(store.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.entry(&key).unwrap().pages().len(), 1);
  }

  #[tokio::test]
  async fn test_distinct_queries_are_independent() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut store = store_with_counter(calls.clone());

    let movies = QueryKey::new("/movie/popular");
    let tv = QueryKey::new("/tv/popular");
    store.initialize(&movies);
    store.initialize(&tv);
    tick(&mut store).await;

    store.fetch_next_page(&movies);
    tick(&mut store).await;

    assert_eq!(store.entry(&movies).unwrap().pages().len(), 2);
    assert_eq!(store.entry(&tv).unwrap().pages().len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn test_reset_starts_over_from_page_one() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut store = store_with_counter(calls.clone());

    let key = QueryKey::new("/movie/top_rated");
    store.initialize(&key);
    tick(&mut store).await;
    store.fetch_next_page(&key);
    tick(&mut store).await;
    assert_eq!(store.entry(&key).unwrap().pages().len(), 2);

    store.reset(&key);
    assert!(store.entry(&key).unwrap().is_loading());
    tick(&mut store).await;

    let entry = store.entry(&key).unwrap();
    assert_eq!(entry.pages().len(), 1);
    assert_eq!(entry.pages()[0].page, 1);
  }

  #[tokio::test]
  async fn test_missing_entry_fetch_next_is_noop() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut store = store_with_counter(calls.clone());

    store.fetch_next_page(&QueryKey::new("/movie/upcoming"));
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(store.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_disabled_key_gets_idle_entry() {
    let calls = Arc::new(AtomicU32::new(0));
    let mut store = store_with_counter(calls.clone());

    let key = QueryKey::disabled();
    store.initialize(&key);
    tick(&mut store).await;

    let entry = store.entry(&key).unwrap();
    assert!(!entry.is_loading());
    assert_eq!(entry.pages().len(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
  }
}
