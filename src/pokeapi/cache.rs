//! Query keys for PokéAPI data.

use std::fmt;

use crate::cache::QueryKey;

/// Query key types for PokéAPI reads.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PokemonQueryKey {
  /// `["pokemon", id]`: one Pokémon
  Pokemon { id: u32 },
  /// `["pokemons", "by", ids]`: several Pokémon in the given order
  ByIds { ids: Vec<u32> },
  /// `["pokemons", "infinite"]`: the paginated catalog listing
  Infinite,
  /// `["pokemons", "all"]`: the id/name index
  Names,
}

impl QueryKey for PokemonQueryKey {
  fn description(&self) -> String {
    self.to_string()
  }
}

impl fmt::Display for PokemonQueryKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Pokemon { id } => write!(f, "[\"pokemon\", {}]", id),
      Self::ByIds { ids } => write!(f, "[\"pokemons\", \"by\", {:?}]", ids),
      Self::Infinite => f.write_str("[\"pokemons\", \"infinite\"]"),
      Self::Names => f.write_str("[\"pokemons\", \"all\"]"),
    }
  }
}
