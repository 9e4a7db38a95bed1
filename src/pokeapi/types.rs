/// The base stats every Pokémon has, in display order
pub const BASE_STATS: [&str; 6] = [
  "hp",
  "attack",
  "defense",
  "special-attack",
  "special-defense",
  "speed",
];

/// Normalized Pokémon record
#[derive(Debug, Clone, PartialEq)]
pub struct Pokemon {
  pub id: u32,
  pub name: String,
  pub avatar: String,
  /// Species color token (e.g. "yellow")
  pub color: String,
  /// Meters
  pub height: f64,
  /// Kilograms
  pub weight: f64,
  pub types: Vec<String>,
  pub abilities: Vec<String>,
  pub stats: Vec<Stat>,
}

/// One base stat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
  pub name: String,
  pub value: u8,
}

/// Entry of the catalog-wide name index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PokemonName {
  pub id: u32,
  pub name: String,
}
