use color_eyre::{eyre::eyre, Result};
use futures::{stream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{ClientError, FetchError, MappingError};
use crate::pokeapi::api_types::{ApiPokemon, ApiPokemonList, ApiPokemonSpecies};
use crate::pokeapi::transport::{HttpTransport, Transport};
use crate::pokeapi::types::{Pokemon, PokemonName};

/// Page size used by the catalog listing unless configured otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// PokéAPI client exposing the read-only data-access actions
#[derive(Clone)]
pub struct PokeApiClient {
  transport: Arc<dyn Transport>,
  /// Upper bound on concurrent per-entity fetches within one action
  max_concurrency: usize,
  /// `limit` used for the single bulk listing behind the name index
  name_index_limit: u32,
}

impl PokeApiClient {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    Self {
      transport,
      max_concurrency: 8,
      name_index_limit: 10_000,
    }
  }

  pub fn from_config(config: &ApiConfig) -> Result<Self> {
    let base_url = Url::parse(&config.base_url)
      .map_err(|e| eyre!("Invalid API base URL {}: {}", config.base_url, e))?;

    let transport = HttpTransport::new(base_url, config.timeout_secs.map(Duration::from_secs))
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(
      Self::new(Arc::new(transport))
        .with_max_concurrency(config.max_concurrency)
        .with_name_index_limit(config.name_index_limit),
    )
  }

  pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
    self.max_concurrency = max_concurrency.max(1);
    self
  }

  pub fn with_name_index_limit(mut self, limit: u32) -> Self {
    self.name_index_limit = limit;
    self
  }

  /// Get a single Pokémon by id
  pub async fn get_pokemon_by_id(&self, id: u32) -> Result<Pokemon, FetchError> {
    self.load_pokemon(id).await.map_err(|e| {
      debug!(id, error = %e, "failed to get pokemon");
      FetchError::ById(id)
    })
  }

  /// Get several Pokémon, in the order of `ids`. Any failure fails the batch.
  pub async fn get_pokemons_by_ids(&self, ids: &[u32]) -> Result<Vec<Pokemon>, FetchError> {
    stream::iter(ids.iter().copied())
      .map(|id| self.get_pokemon_by_id(id))
      .buffered(self.max_concurrency)
      .try_collect::<Vec<_>>()
      .await
  }

  /// Get page `page` of the catalog (ordered by id), `page_size` entries per page
  pub async fn get_pokemons(&self, page: u32, page_size: u32) -> Result<Vec<Pokemon>, FetchError> {
    let failed = |e: &dyn std::fmt::Display| {
      debug!(page, page_size, error = %e, "failed to get pokemon page");
      FetchError::Page {
        index: page,
        size: page_size,
      }
    };

    let offset = page
      .checked_mul(page_size)
      .ok_or_else(|| failed(&"page offset overflows"))?;

    let names = self
      .list(offset, page_size)
      .await
      .and_then(|list| Ok(list.into_names()?))
      .map_err(|e| failed(&e))?;

    stream::iter(names)
      .map(|entry| self.load_pokemon(entry.id))
      .buffered(self.max_concurrency)
      .try_collect::<Vec<_>>()
      .await
      .map_err(|e| failed(&e))
  }

  /// Get the id/name index of the whole catalog in one request, sorted by id
  pub async fn get_pokemon_names_with_id(&self) -> Result<Vec<PokemonName>, FetchError> {
    let mut names = self
      .list(0, self.name_index_limit)
      .await
      .and_then(|list| Ok(list.into_names()?))
      .map_err(|e| {
        debug!(error = %e, "failed to get pokemon name index");
        FetchError::NameIndex
      })?;

    names.sort_by_key(|entry| entry.id);
    Ok(names)
  }

  /// Resolve the species color and build the domain entity
  pub async fn to_entity(&self, record: ApiPokemon) -> Result<Pokemon, ClientError> {
    let species: ApiPokemonSpecies = self
      .fetch(&format!("pokemon-species/{}", record.id))
      .await?;
    Ok(record.into_pokemon(&species)?)
  }

  async fn load_pokemon(&self, id: u32) -> Result<Pokemon, ClientError> {
    let record: ApiPokemon = self.fetch(&format!("pokemon/{}", id)).await?;
    self.to_entity(record).await
  }

  async fn list(&self, offset: u32, limit: u32) -> Result<ApiPokemonList, ClientError> {
    self
      .fetch(&format!("pokemon?offset={}&limit={}", offset, limit))
      .await
  }

  /// GET `path` and decode it into a typed wire record
  async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
    let value = self.transport.get(path).await?;
    serde_json::from_value(value).map_err(|source| {
      MappingError::Decode {
        path: path.to_string(),
        source,
      }
      .into()
    })
  }
}
