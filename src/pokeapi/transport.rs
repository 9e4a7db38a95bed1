//! HTTP GET against the PokéAPI base URL.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::NetworkError;

/// Issues GET requests relative to a fixed base URL and returns parsed JSON.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn get(&self, path: &str) -> Result<Value, NetworkError>;
}

/// `reqwest`-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
  client: reqwest::Client,
  base_url: Url,
}

impl HttpTransport {
  pub fn new(base_url: Url, timeout: Option<Duration>) -> reqwest::Result<Self> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
      env!("CARGO_PKG_NAME"),
      "/",
      env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = timeout {
      builder = builder.timeout(timeout);
    }

    Ok(Self {
      client: builder.build()?,
      base_url,
    })
  }
}

/// Join `path` onto `base` without doubling or dropping the separating slash.
fn join_url(base: &Url, path: &str) -> String {
  format!(
    "{}/{}",
    base.as_str().trim_end_matches('/'),
    path.trim_start_matches('/')
  )
}

#[async_trait]
impl Transport for HttpTransport {
  async fn get(&self, path: &str) -> Result<Value, NetworkError> {
    let url = join_url(&self.base_url, path);
    debug!(%url, "GET");

    let response = self
      .client
      .get(&url)
      .send()
      .await
      .map_err(|source| NetworkError::Transport {
        url: url.clone(),
        source,
      })?;

    let status = response.status();
    if !status.is_success() {
      return Err(NetworkError::Status { url, status });
    }

    let body = response
      .bytes()
      .await
      .map_err(|source| NetworkError::Transport {
        url: url.clone(),
        source,
      })?;

    serde_json::from_slice(&body).map_err(|source| NetworkError::InvalidBody { url, source })
  }
}
