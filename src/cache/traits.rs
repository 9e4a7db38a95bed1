//! Core traits and types for the query cache.

use chrono::{DateTime, Utc};
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

/// Composite key addressing one cache entry.
///
/// Implementors are typically enums with one variant per kind of query,
/// carrying the query parameters.
pub trait QueryKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {
  /// Human readable form used in logs (e.g. `["pokemon", 25]`).
  fn description(&self) -> String;
}

/// Per-query options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
  /// How long a fetched value is served without refetching.
  pub stale_time: Duration,
}

impl QueryOptions {
  pub fn stale_after(stale_time: Duration) -> Self {
    Self { stale_time }
  }

  /// Fetched once, then served for the lifetime of the cache.
  pub fn static_data() -> Self {
    Self {
      stale_time: Duration::MAX,
    }
  }

  /// Whether a value fetched at `fetched_at` is stale at `now`.
  pub fn is_stale(&self, fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match (now - fetched_at).to_std() {
      Ok(age) => age > self.stale_time,
      // Fetched "in the future" (clock moved backwards): treat as fresh
      Err(_) => false,
    }
  }
}

impl Default for QueryOptions {
  /// Stale immediately, i.e. every read refetches unless a fetch is in flight.
  fn default() -> Self {
    Self {
      stale_time: Duration::ZERO,
    }
  }
}

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the served value was fetched (if it came from the cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  /// Create a new cache result from a fresh cached value.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::CacheFresh,
      cached_at: Some(cached_at),
    }
  }

  /// Refetch failed, serving the stale value.
  pub fn offline(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Offline,
      cached_at: Some(cached_at),
    }
  }
}

/// Indicates where cached data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fetched from the network by this call (or a call it was deduplicated with)
  Network,
  /// Served from cache within the staleness window
  CacheFresh,
  /// Stale value served because the refetch failed
  Offline,
}
