//! Cached PokéAPI client that registers the data-access actions into the query cache.

use color_eyre::Result;
use std::sync::Arc;
use tracing::debug;

use crate::cache::{Clock, InfiniteData, InfiniteQuery, QueryCache, QueryOptions, RetryPolicy, SystemClock};
use crate::config::{Config, QueryConfig};
use crate::error::FetchError;
use crate::search;

use super::cache::PokemonQueryKey;
use super::client::PokeApiClient;
use super::types::{Pokemon, PokemonName};

/// PokéAPI client with transparent caching support.
///
/// Wraps `PokeApiClient` and serves the same reads through the query cache,
/// so an entity reached through the listing, a search and the detail view is
/// fetched once per staleness window. Every Pokémon loaded by the listing is
/// also stored under its own `["pokemon", id]` key.
#[derive(Clone)]
pub struct PokedexClient {
  inner: PokeApiClient,
  pokemon: QueryCache<PokemonQueryKey, Pokemon>,
  pokemon_lists: QueryCache<PokemonQueryKey, Vec<Pokemon>>,
  names: QueryCache<PokemonQueryKey, Vec<PokemonName>>,
  catalog: Arc<InfiniteQuery<PokemonQueryKey, Pokemon>>,
  settings: QueryConfig,
}

impl PokedexClient {
  /// Create a new cached client talking to the configured API.
  pub fn new(config: &Config) -> Result<Self> {
    let inner = PokeApiClient::from_config(&config.api)?;
    Ok(Self::with_client(inner, config.query.clone(), Arc::new(SystemClock)))
  }

  pub fn with_client(inner: PokeApiClient, settings: QueryConfig, clock: Arc<dyn Clock>) -> Self {
    let retry = RetryPolicy::default().with_max_retries(settings.retries);

    let pokemon = QueryCache::with_clock(Arc::clone(&clock)).with_retry(retry);
    let pokemon_lists = QueryCache::with_clock(Arc::clone(&clock)).with_retry(retry);
    let names = QueryCache::with_clock(Arc::clone(&clock)).with_retry(retry);

    let catalog = {
      let inner = inner.clone();
      let pokemon = pokemon.clone();
      let page_size = settings.page_size;

      InfiniteQuery::new(
        PokemonQueryKey::Infinite,
        QueryOptions::stale_after(settings.list_stale_time()),
        move |page| {
          let inner = inner.clone();
          let pokemon = pokemon.clone();
          async move {
            let pokemons = inner.get_pokemons(page, page_size).await?;
            for p in &pokemons {
              pokemon.set_query_data(PokemonQueryKey::Pokemon { id: p.id }, p.clone());
            }
            Ok::<_, FetchError>(pokemons)
          }
        },
      )
      .with_clock(clock)
      .with_retry(retry)
      // An empty page means the end of the catalog
      .with_next_page_param(|last, pages| {
        if last.is_empty() {
          None
        } else {
          u32::try_from(pages.len()).ok()
        }
      })
    };

    Self {
      inner,
      pokemon,
      pokemon_lists,
      names,
      catalog: Arc::new(catalog),
      settings,
    }
  }

  pub fn settings(&self) -> &QueryConfig {
    &self.settings
  }

  /// Get a single Pokémon with caching.
  pub async fn get_pokemon(&self, id: u32) -> Result<Pokemon, FetchError> {
    let inner = self.inner.clone();
    let result = self
      .pokemon
      .query(
        PokemonQueryKey::Pokemon { id },
        QueryOptions::stale_after(self.settings.pokemon_stale_time()),
        move || {
          let inner = inner.clone();
          async move { inner.get_pokemon_by_id(id).await }
        },
      )
      .await?;

    debug!(id, source = ?result.source, cached_at = ?result.cached_at, "pokemon");
    Ok(result.data)
  }

  /// Get several Pokémon in the given order with caching. The id list is the key.
  pub async fn get_pokemons_by_ids(&self, ids: Vec<u32>) -> Result<Vec<Pokemon>, FetchError> {
    let inner = self.inner.clone();
    let key = PokemonQueryKey::ByIds { ids: ids.clone() };
    let result = self
      .pokemon_lists
      .query(
        key,
        QueryOptions::stale_after(self.settings.search_stale_time()),
        move || {
          let inner = inner.clone();
          let ids = ids.clone();
          async move { inner.get_pokemons_by_ids(&ids).await }
        },
      )
      .await?;

    debug!(source = ?result.source, count = result.data.len(), "pokemons by ids");
    Ok(result.data)
  }

  /// Get the id/name index. Fetched once, then served for the session.
  pub async fn get_pokemon_names(&self) -> Result<Vec<PokemonName>, FetchError> {
    let inner = self.inner.clone();
    let result = self
      .names
      .query(PokemonQueryKey::Names, QueryOptions::static_data(), move || {
        let inner = inner.clone();
        async move { inner.get_pokemon_names_with_id().await }
      })
      .await?;

    Ok(result.data)
  }

  /// Search by id or name, resolving matches through the name index.
  pub async fn search(&self, term: &str) -> Result<Vec<Pokemon>, FetchError> {
    let index = self.get_pokemon_names().await?;
    let ids: Vec<u32> = search::filter(term, &index)
      .into_iter()
      .map(|entry| entry.id)
      .collect();

    if ids.is_empty() {
      return Ok(Vec::new());
    }

    self.get_pokemons_by_ids(ids).await
  }

  /// Pages of the catalog listing, loading the first page if needed.
  pub async fn list(&self) -> Result<InfiniteData<Pokemon>, FetchError> {
    self.catalog.fetch().await
  }

  /// Append the next page of the catalog listing.
  pub async fn next_page(&self) -> Result<InfiniteData<Pokemon>, FetchError> {
    self.catalog.fetch_next_page().await
  }

  pub async fn has_next_page(&self) -> bool {
    self.catalog.has_next_page().await
  }

  /// A Pokémon already in the cache, without fetching.
  #[allow(dead_code)]
  pub fn cached_pokemon(&self, id: u32) -> Option<Pokemon> {
    self.pokemon.get_query_data(&PokemonQueryKey::Pokemon { id })
  }
}
