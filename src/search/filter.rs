//! Resolve a typed search term against the name index.

use crate::pokeapi::types::PokemonName;

/// Name terms shorter than this match nothing
pub const MIN_NAME_TERM_LEN: usize = 3;

/// How a search term is interpreted
#[derive(Debug, Clone, PartialEq)]
pub enum SearchTerm {
  /// Numeric term: an exact id lookup (`None` if the number is not a valid id)
  Id(Option<u32>),
  /// Empty or too short to search by name
  TooShort,
  /// Lowercased substring to look for in names
  Name(String),
}

impl SearchTerm {
  pub fn parse(term: &str) -> Self {
    let trimmed = term.trim();

    if !trimmed.is_empty() {
      if let Ok(id) = trimmed.parse::<u32>() {
        return Self::Id(Some(id));
      }
      // Decimal and exponent forms of a whole number ("25.0", "1e1") name that id
      if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() {
          let whole = value.fract() == 0.0 && (1.0..=f64::from(u32::MAX)).contains(&value);
          return Self::Id(whole.then_some(value as u32));
        }
      }
    }

    if term.chars().count() < MIN_NAME_TERM_LEN || trimmed.is_empty() {
      return Self::TooShort;
    }

    Self::Name(term.to_lowercase())
  }
}

/// Entries of `index` matching `term`, in index order.
pub fn filter(term: &str, index: &[PokemonName]) -> Vec<PokemonName> {
  match SearchTerm::parse(term) {
    SearchTerm::Id(Some(id)) => index.iter().find(|entry| entry.id == id).cloned().into_iter().collect(),
    SearchTerm::Id(None) | SearchTerm::TooShort => Vec::new(),
    SearchTerm::Name(needle) => index
      .iter()
      .filter(|entry| entry.name.to_lowercase().contains(&needle))
      .cloned()
      .collect(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn index() -> Vec<PokemonName> {
    [
      (1, "bulbasaur"),
      (2, "ivysaur"),
      (25, "pikachu"),
      (26, "raichu"),
      (125, "electabuzz"),
      (250, "ho-oh"),
      (731, "pikipek"),
    ]
    .into_iter()
    .map(|(id, name)| PokemonName {
      id,
      name: name.to_string(),
    })
    .collect()
  }

  fn ids(result: &[PokemonName]) -> Vec<u32> {
    result.iter().map(|entry| entry.id).collect()
  }

  #[test]
  fn test_numeric_term_is_exact_id_lookup() {
    assert_eq!(ids(&filter("25", &index())), vec![25]);
    assert_eq!(ids(&filter(" 731 ", &index())), vec![731]);
  }

  #[test]
  fn test_numeric_term_never_matches_names() {
    // "25" is a substring of "250" but only the exact id counts
    assert_eq!(ids(&filter("25", &index())), vec![25]);
    assert!(filter("999", &index()).is_empty());
    assert!(filter("0", &index()).is_empty());
  }

  #[test]
  fn test_whole_numbers_in_other_notations_are_id_lookups() {
    assert_eq!(ids(&filter("25.0", &index())), vec![25]);
    assert_eq!(ids(&filter("1e0", &index())), vec![1]);
    assert_eq!(ids(&filter("2.5e2", &index())), vec![250]);
    assert!(filter("1e3", &index()).is_empty());
  }

  #[test]
  fn test_non_integer_numbers_match_nothing() {
    assert!(filter("2.5", &index()).is_empty());
    assert!(filter("-25", &index()).is_empty());
    assert!(filter("0.0", &index()).is_empty());
    assert!(filter("1e10", &index()).is_empty());
  }

  #[test]
  fn test_short_terms_match_nothing() {
    for term in ["", "p", "pi", "ho", "  ", "ÿé"] {
      assert!(filter(term, &index()).is_empty(), "term {:?}", term);
    }
  }

  #[test]
  fn test_substring_match_in_index_order() {
    assert_eq!(ids(&filter("pik", &index())), vec![25, 731]);
    assert_eq!(ids(&filter("chu", &index())), vec![25, 26]);
    assert_eq!(ids(&filter("saur", &index())), vec![1, 2]);
  }

  #[test]
  fn test_match_is_case_insensitive() {
    assert_eq!(ids(&filter("PIK", &index())), vec![25, 731]);
    assert_eq!(ids(&filter("PiKaChU", &index())), vec![25]);
  }

  #[test]
  fn test_parse_classification() {
    assert_eq!(SearchTerm::parse("25"), SearchTerm::Id(Some(25)));
    assert_eq!(SearchTerm::parse("2.5"), SearchTerm::Id(None));
    assert_eq!(SearchTerm::parse("1e1"), SearchTerm::Id(Some(10)));
    assert_eq!(SearchTerm::parse("pi"), SearchTerm::TooShort);
    assert_eq!(SearchTerm::parse("Pik"), SearchTerm::Name("pik".into()));
  }
}
