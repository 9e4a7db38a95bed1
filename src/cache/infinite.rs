//! Infinite (paginated) queries: pages fetched one at a time and kept in order.

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::retry::RetryPolicy;
use super::traits::{QueryKey, QueryOptions};
use crate::error::FetchError;

type PageFetcher<T> = Box<dyn Fn(u32) -> BoxFuture<'static, Result<Vec<T>, FetchError>> + Send + Sync>;
type NextPageParam<T> = Box<dyn Fn(&[T], &[Vec<T>]) -> Option<u32> + Send + Sync>;

/// Pages loaded so far, in fetch order, with the param each was fetched with.
#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteData<T> {
  pub pages: Vec<Vec<T>>,
  pub page_params: Vec<u32>,
}

impl<T> Default for InfiniteData<T> {
  fn default() -> Self {
    Self {
      pages: Vec::new(),
      page_params: Vec::new(),
    }
  }
}

impl<T: Clone> InfiniteData<T> {
  /// All items across pages, in page order.
  pub fn flatten(&self) -> Vec<T> {
    self.pages.iter().flatten().cloned().collect()
  }
}

struct InfiniteState<T> {
  data: InfiniteData<T>,
  fetched_at: Option<DateTime<Utc>>,
}

/// A paginated query whose pages accumulate.
///
/// By default the next page param is the number of pages already loaded, so
/// with an initial param of 0 each `fetch_next_page` requests the next
/// sequential slice.
pub struct InfiniteQuery<K, T> {
  key: K,
  options: QueryOptions,
  initial_page_param: u32,
  fetch_page: PageFetcher<T>,
  next_page_param: NextPageParam<T>,
  state: Mutex<InfiniteState<T>>,
  /// Page count, readable without waiting on the state lock
  loaded: AtomicUsize,
  clock: Arc<dyn Clock>,
  retry: RetryPolicy,
}

impl<K: QueryKey, T: Clone + Send + Sync + 'static> InfiniteQuery<K, T> {
  pub fn new<F, Fut>(key: K, options: QueryOptions, fetch_page: F) -> Self
  where
    F: Fn(u32) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, FetchError>> + Send + 'static,
  {
    Self {
      key,
      options,
      initial_page_param: 0,
      fetch_page: Box::new(move |param| fetch_page(param).boxed()),
      next_page_param: Box::new(|_, pages| u32::try_from(pages.len()).ok()),
      state: Mutex::new(InfiniteState {
        data: InfiniteData::default(),
        fetched_at: None,
      }),
      loaded: AtomicUsize::new(0),
      clock: Arc::new(SystemClock),
      retry: RetryPolicy::default(),
    }
  }

  pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = clock;
    self
  }

  pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  /// Derive the param of the page after `last_page`; `None` means there is no next page.
  pub fn with_next_page_param<F>(mut self, next_page_param: F) -> Self
  where
    F: Fn(&[T], &[Vec<T>]) -> Option<u32> + Send + Sync + 'static,
  {
    self.next_page_param = Box::new(next_page_param);
    self
  }

  /// Current pages without fetching.
  #[allow(dead_code)]
  pub async fn data(&self) -> InfiniteData<T> {
    self.state.lock().await.data.clone()
  }

  pub async fn has_next_page(&self) -> bool {
    let state = self.state.lock().await;
    self.next_param(&state.data).is_some()
  }

  /// Load the first page, or refetch every loaded page if they are stale.
  ///
  /// A failed refetch keeps the previously loaded pages.
  pub async fn fetch(&self) -> Result<InfiniteData<T>, FetchError> {
    let mut state = self.state.lock().await;

    if let Some(fetched_at) = state.fetched_at {
      if !self.options.is_stale(fetched_at, self.clock.now()) {
        debug!(key = %self.key.description(), "cache hit");
        return Ok(state.data.clone());
      }
    }

    let wanted = state.data.pages.len().max(1);
    debug!(key = %self.key.description(), pages = wanted, "fetching pages");

    match self.fetch_pages(wanted).await {
      Ok(data) => {
        state.data = data;
        state.fetched_at = Some(self.clock.now());
        self.loaded.store(state.data.pages.len(), Ordering::SeqCst);
        Ok(state.data.clone())
      }
      Err(err) if state.fetched_at.is_some() => {
        warn!(key = %self.key.description(), error = %err, "refetch failed, keeping loaded pages");
        Ok(state.data.clone())
      }
      Err(err) => Err(err),
    }
  }

  /// Append the next page. Calls that overlap an in-progress page fetch
  /// return its result instead of requesting another page.
  pub async fn fetch_next_page(&self) -> Result<InfiniteData<T>, FetchError> {
    let observed = self.loaded.load(Ordering::SeqCst);
    let mut state = self.state.lock().await;

    if state.data.pages.len() != observed {
      debug!(key = %self.key.description(), "next page already fetched by a concurrent call");
      return Ok(state.data.clone());
    }

    let Some(param) = self.next_param(&state.data) else {
      debug!(key = %self.key.description(), "no next page");
      return Ok(state.data.clone());
    };

    debug!(key = %self.key.description(), page = param, "fetching next page");
    let page = self.fetch_one(param).await?;

    state.data.pages.push(page);
    state.data.page_params.push(param);
    state.fetched_at = Some(self.clock.now());
    self.loaded.store(state.data.pages.len(), Ordering::SeqCst);

    Ok(state.data.clone())
  }

  fn next_param(&self, data: &InfiniteData<T>) -> Option<u32> {
    match data.pages.last() {
      None => Some(self.initial_page_param),
      Some(last) => (self.next_page_param)(last, &data.pages),
    }
  }

  async fn fetch_one(&self, param: u32) -> Result<Vec<T>, FetchError> {
    let label = self.key.description();
    self.retry.run(&label, &|| (self.fetch_page)(param)).await
  }

  /// Fetch up to `count` pages in order, starting from the initial param.
  async fn fetch_pages(&self, count: usize) -> Result<InfiniteData<T>, FetchError> {
    let mut data = InfiniteData::default();
    let mut param = Some(self.initial_page_param);

    while let Some(current) = param {
      if data.pages.len() == count {
        break;
      }
      let page = self.fetch_one(current).await?;
      data.pages.push(page);
      data.page_params.push(current);
      param = self.next_param(&data);
    }

    Ok(data)
  }
}
