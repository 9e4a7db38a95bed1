//! Conversions from PokéAPI wire records to domain types.

use url::Url;

use super::api_types::{ApiPokemon, ApiPokemonList, ApiPokemonSpecies, ApiSprites};
use super::types::{Pokemon, PokemonName, Stat, BASE_STATS};
use crate::error::MappingError;

const OFFICIAL_ARTWORK: &str = "official-artwork";

impl ApiPokemon {
  /// Build the domain entity. The species record supplies the color.
  pub fn into_pokemon(self, species: &ApiPokemonSpecies) -> Result<Pokemon, MappingError> {
    let avatar = self
      .sprites
      .as_ref()
      .and_then(avatar_url)
      .ok_or(MappingError::MissingField("sprites.front_default"))?;

    let color = species
      .color
      .as_ref()
      .map(|c| c.name.clone())
      .ok_or(MappingError::MissingField("color"))?;

    let height = self.height.ok_or(MappingError::MissingField("height"))?;
    let weight = self.weight.ok_or(MappingError::MissingField("weight"))?;

    let mut types = self.types;
    types.sort_by_key(|t| t.slot);

    let mut abilities = self.abilities;
    abilities.sort_by_key(|a| a.slot);

    let stats = BASE_STATS
      .iter()
      .map(|&name| {
        self
          .stats
          .iter()
          .find(|s| s.stat.name == name)
          .map(|s| Stat {
            name: name.to_string(),
            value: u8::try_from(s.base_stat).unwrap_or(u8::MAX),
          })
          .ok_or(MappingError::MissingStat(name))
      })
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Pokemon {
      id: self.id,
      name: self.name,
      avatar,
      color,
      height: f64::from(height) / 10.0,
      weight: f64::from(weight) / 10.0,
      types: types.into_iter().map(|t| t.kind.name).collect(),
      abilities: abilities.into_iter().map(|a| a.ability.name).collect(),
      stats,
    })
  }
}

impl ApiPokemonList {
  /// Id/name pairs of the listed entries, in listing order.
  pub fn into_names(self) -> Result<Vec<PokemonName>, MappingError> {
    self
      .results
      .into_iter()
      .map(|entry| {
        Ok(PokemonName {
          id: resource_id(&entry.url)?,
          name: entry.name,
        })
      })
      .collect()
  }
}

/// Official artwork when present, otherwise the default front sprite
fn avatar_url(sprites: &ApiSprites) -> Option<String> {
  sprites
    .other
    .get(OFFICIAL_ARTWORK)
    .and_then(|artwork| artwork.front_default.clone())
    .or_else(|| sprites.front_default.clone())
}

/// Extract the numeric id from a resource URL such as
/// `https://pokeapi.co/api/v2/pokemon/25/`.
pub fn resource_id(resource_url: &str) -> Result<u32, MappingError> {
  let invalid = || MappingError::InvalidResourceUrl(resource_url.to_string());

  let parsed = Url::parse(resource_url).map_err(|_| invalid())?;
  parsed
    .path_segments()
    .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
    .and_then(|segment| segment.parse().ok())
    .ok_or_else(invalid)
}
