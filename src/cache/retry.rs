//! Retry with exponential backoff for failed fetches.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::FetchError;

/// How many times a failed fetch is retried, and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_retries: u32,
  pub base_delay: Duration,
  pub max_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_retries: 3,
      base_delay: Duration::from_secs(1),
      max_delay: Duration::from_secs(30),
    }
  }
}

impl RetryPolicy {
  /// Fail on the first error.
  #[cfg(test)]
  pub fn none() -> Self {
    Self {
      max_retries: 0,
      ..Self::default()
    }
  }

  pub fn with_max_retries(mut self, max_retries: u32) -> Self {
    self.max_retries = max_retries;
    self
  }

  /// Delay before retry number `attempt` (zero based): `base * 2^attempt`, capped.
  pub fn delay_for(&self, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt);
    self.base_delay.saturating_mul(factor).min(self.max_delay)
  }

  /// Run `fetcher` until it succeeds or the retry budget is spent.
  pub async fn run<T, F, Fut>(&self, label: &str, fetcher: &F) -> Result<T, FetchError>
  where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
  {
    let mut attempt = 0;
    loop {
      match fetcher().await {
        Ok(value) => return Ok(value),
        Err(err) if attempt < self.max_retries => {
          let delay = self.delay_for(attempt);
          warn!(query = label, error = %err, attempt = attempt + 1, ?delay, "fetch failed, retrying");
          tokio::time::sleep(delay).await;
          attempt += 1;
        }
        Err(err) => return Err(err),
      }
    }
  }
}
