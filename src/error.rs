//! Error taxonomy for the PokéAPI data layer.
//!
//! Lower layers report what went wrong in detail (`NetworkError`,
//! `MappingError`). The data-access actions collapse those into a coarse
//! `FetchError` that only names what was requested.

use reqwest::StatusCode;
use thiserror::Error;

/// Transport or HTTP level failure.
#[derive(Debug, Error)]
pub enum NetworkError {
  #[error("request to {url} failed: {source}")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("{url} returned HTTP {status}")]
  Status { url: String, status: StatusCode },

  #[error("response from {url} is not valid JSON: {source}")]
  InvalidBody {
    url: String,
    #[source]
    source: serde_json::Error,
  },
}

/// The payload did not match the expected wire schema.
#[derive(Debug, Error)]
pub enum MappingError {
  #[error("unexpected payload from {path}: {source}")]
  Decode {
    path: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("missing field `{0}`")]
  MissingField(&'static str),

  #[error("missing base stat `{0}`")]
  MissingStat(&'static str),

  #[error("cannot derive an id from `{0}`")]
  InvalidResourceUrl(String),
}

/// Any failure below the action layer.
#[derive(Debug, Error)]
pub enum ClientError {
  #[error(transparent)]
  Network(#[from] NetworkError),

  #[error(transparent)]
  Mapping(#[from] MappingError),
}

/// Action-level failure. Carries only the requested id or page.
///
/// `Clone` so that every caller waiting on a deduplicated fetch receives the
/// same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
  #[error("Error getting pokemon by id: {0}")]
  ById(u32),

  #[error("Error getting pokemons page {index} (page size {size})")]
  Page { index: u32, size: u32 },

  #[error("Error getting the pokemon name index")]
  NameIndex,
}
