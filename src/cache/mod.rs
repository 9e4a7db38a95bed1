//! Generic in-memory query cache.
//!
//! This module provides a PokéAPI-agnostic caching mechanism that:
//! - Addresses entries by composite query keys
//! - Serves values within a per-query staleness window without refetching
//! - Collapses concurrent fetches of the same key into one
//! - Retries failed fetches with exponential backoff
//! - Accumulates paginated results in infinite queries
//! - Provides basic offline mode (serve stale cache when a refetch fails)

mod clock;
mod infinite;
mod layer;
mod retry;
mod traits;

#[cfg(test)]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use infinite::{InfiniteData, InfiniteQuery};
pub use layer::QueryCache;
pub use retry::RetryPolicy;
#[cfg(test)]
pub use traits::CacheSource;
pub use traits::{QueryKey, QueryOptions};
