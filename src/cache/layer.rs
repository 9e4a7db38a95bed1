//! Cache layer that orchestrates caching logic with network fetching.

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use super::clock::Clock;
use super::retry::RetryPolicy;
use super::traits::{CacheResult, QueryKey, QueryOptions};
use crate::error::FetchError;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, FetchError>>>;

struct CachedValue<V> {
  data: V,
  fetched_at: DateTime<Utc>,
}

struct Slot<V> {
  value: Option<CachedValue<V>>,
  /// The fetch currently running for this key, joined by every concurrent reader
  in_flight: Option<SharedFetch<V>>,
}

impl<V> Default for Slot<V> {
  fn default() -> Self {
    Self {
      value: None,
      in_flight: None,
    }
  }
}

type Slots<K, V> = Arc<Mutex<HashMap<K, Slot<V>>>>;

/// Key-addressed cache of completed and in-flight fetches.
///
/// - A value younger than the query's stale time is served without fetching.
/// - At most one fetch per key is in flight; concurrent readers share its result.
/// - A failed refetch falls back to the stale value (offline mode).
///
/// Cloning is cheap and clones share the same entries.
pub struct QueryCache<K, V> {
  slots: Slots<K, V>,
  clock: Arc<dyn Clock>,
  retry: RetryPolicy,
}

impl<K: QueryKey, V: Clone + Send + Sync + 'static> QueryCache<K, V> {
  /// Create an empty cache reading time from `clock`, with the default retry policy.
  pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
    Self {
      slots: Arc::new(Mutex::new(HashMap::new())),
      clock,
      retry: RetryPolicy::default(),
    }
  }

  pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  /// Read `key`, fetching with `fetcher` when the entry is missing or stale.
  pub async fn query<F, Fut>(
    &self,
    key: K,
    options: QueryOptions,
    fetcher: F,
  ) -> Result<CacheResult<V>, FetchError>
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
  {
    let (pending, stale) = {
      let mut slots = lock(&self.slots);
      let slot = slots.entry(key.clone()).or_default();

      if let Some(cached) = &slot.value {
        if !options.is_stale(cached.fetched_at, self.clock.now()) {
          debug!(key = %key.description(), "cache hit");
          return Ok(CacheResult::from_cache(cached.data.clone(), cached.fetched_at));
        }
      }

      let stale = slot
        .value
        .as_ref()
        .map(|cached| (cached.data.clone(), cached.fetched_at));

      let pending = match &slot.in_flight {
        Some(shared) => {
          debug!(key = %key.description(), "joining in-flight fetch");
          shared.clone()
        }
        None => {
          debug!(key = %key.description(), stale = stale.is_some(), "fetching");
          let shared = self.start_fetch(key.clone(), fetcher);
          slot.in_flight = Some(shared.clone());
          shared
        }
      };

      (pending, stale)
    };

    match pending.await {
      Ok(data) => Ok(CacheResult::from_network(data)),
      Err(err) => match stale {
        Some((data, fetched_at)) => {
          warn!(key = %key.description(), error = %err, "refetch failed, serving stale data");
          Ok(CacheResult::offline(data, fetched_at))
        }
        None => Err(err),
      },
    }
  }

  /// Store `data` under `key` as if it had just been fetched.
  pub fn set_query_data(&self, key: K, data: V) {
    let fetched_at = self.clock.now();
    let mut slots = lock(&self.slots);
    slots.entry(key).or_default().value = Some(CachedValue { data, fetched_at });
  }

  /// The cached value for `key`, fresh or not, without fetching.
  pub fn get_query_data(&self, key: &K) -> Option<V> {
    let slots = lock(&self.slots);
    slots
      .get(key)
      .and_then(|slot| slot.value.as_ref())
      .map(|cached| cached.data.clone())
  }

  /// Whether a fetch for `key` is currently running.
  #[allow(dead_code)]
  pub fn is_fetching(&self, key: &K) -> bool {
    let slots = lock(&self.slots);
    slots.get(key).is_some_and(|slot| slot.in_flight.is_some())
  }

  /// Build the shared fetch for `key`. The future records its own result in
  /// the slot, so it completes the entry even if the caller that started it
  /// is dropped and another reader resumes it.
  fn start_fetch<F, Fut>(&self, key: K, fetcher: F) -> SharedFetch<V>
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
  {
    let slots = Arc::clone(&self.slots);
    let clock = Arc::clone(&self.clock);
    let retry = self.retry;

    async move {
      let label = key.description();
      let result = retry.run(&label, &fetcher).await;

      let mut guard = lock(&slots);
      let slot = guard.entry(key).or_default();
      slot.in_flight = None;
      if let Ok(data) = &result {
        slot.value = Some(CachedValue {
          data: data.clone(),
          fetched_at: clock.now(),
        });
      }
      result
    }
    .boxed()
    .shared()
  }
}

impl<K, V> Clone for QueryCache<K, V> {
  fn clone(&self) -> Self {
    Self {
      slots: Arc::clone(&self.slots),
      clock: Arc::clone(&self.clock),
      retry: self.retry,
    }
  }
}

/// Entries stay consistent across a panic (every write is a single assignment),
/// so a poisoned lock is recovered.
fn lock<K, V>(slots: &Mutex<HashMap<K, Slot<V>>>) -> MutexGuard<'_, HashMap<K, Slot<V>>> {
  slots.lock().unwrap_or_else(PoisonError::into_inner)
}
