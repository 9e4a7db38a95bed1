//! Serde-deserializable types matching PokéAPI responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs. Fields the
//! mapper requires are still `Option` here so that their absence is reported
//! by name instead of as a generic decode failure.

use serde::Deserialize;
use std::collections::HashMap;

// ============================================================================
// Common nested field types
// ============================================================================

/// A `{name, url}` reference to another API resource.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiNamedResource {
  pub name: String,
  #[serde(default)]
  pub url: String,
}

// ============================================================================
// /pokemon/{id}
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ApiSprite {
  pub front_default: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiSprites {
  pub front_default: Option<String>,
  /// Alternative artwork sets keyed by source (e.g. "official-artwork")
  #[serde(default)]
  pub other: HashMap<String, ApiSprite>,
}

#[derive(Debug, Deserialize)]
pub struct ApiPokemonType {
  #[serde(default)]
  pub slot: u32,
  #[serde(rename = "type")]
  pub kind: ApiNamedResource,
}

#[derive(Debug, Deserialize)]
pub struct ApiPokemonAbility {
  pub ability: ApiNamedResource,
  #[serde(default)]
  pub slot: u32,
}

#[derive(Debug, Deserialize)]
pub struct ApiPokemonStat {
  pub base_stat: u32,
  pub stat: ApiNamedResource,
}

#[derive(Debug, Deserialize)]
pub struct ApiPokemon {
  pub id: u32,
  pub name: String,
  pub height: Option<u32>,
  pub weight: Option<u32>,
  pub sprites: Option<ApiSprites>,
  #[serde(default)]
  pub types: Vec<ApiPokemonType>,
  #[serde(default)]
  pub abilities: Vec<ApiPokemonAbility>,
  #[serde(default)]
  pub stats: Vec<ApiPokemonStat>,
}

// ============================================================================
// /pokemon-species/{id}
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiPokemonSpecies {
  pub color: Option<ApiNamedResource>,
}

// ============================================================================
// /pokemon?offset=&limit=
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiPokemonList {
  #[serde(default)]
  pub results: Vec<ApiNamedResource>,
}
