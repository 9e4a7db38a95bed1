//! Plain-text rendering of Pokémon for the command line.

use std::fmt::Write;

use crate::pokeapi::types::{Pokemon, PokemonName, Stat};

/// Width of a full stat bar (a base stat of 255)
const STAT_BAR_WIDTH: usize = 20;

/// Uppercase the first letter of a name ("pikachu" -> "Pikachu")
pub fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}

/// Zero-padded catalog number ("#025")
pub fn number(id: u32) -> String {
  format!("#{:03}", id)
}

/// Short label of a base stat
pub fn stat_label(name: &str) -> &str {
  match name {
    "hp" => "HP",
    "attack" => "Atk",
    "defense" => "Def",
    "special-attack" => "SpA",
    "special-defense" => "SpD",
    "speed" => "Spe",
    other => other,
  }
}

/// One line of a list: number, name, types
pub fn summary_line(pokemon: &Pokemon) -> String {
  format!(
    "{} {:<12} {}",
    number(pokemon.id),
    capitalize(&pokemon.name),
    pokemon.types.join("/")
  )
}

/// One line of the name index
pub fn name_line(entry: &PokemonName) -> String {
  format!("{} {}", number(entry.id), entry.name)
}

fn stat_line(stat: &Stat) -> String {
  let filled = usize::from(stat.value) * STAT_BAR_WIDTH / usize::from(u8::MAX);
  format!(
    "  {:<4}{:>4} {}",
    stat_label(&stat.name),
    stat.value,
    "█".repeat(filled)
  )
}

/// Multi-line detail view
pub fn detail(pokemon: &Pokemon) -> String {
  let mut out = String::new();

  // Writing to a String cannot fail
  let _ = writeln!(out, "{} {}", number(pokemon.id), capitalize(&pokemon.name));
  let _ = writeln!(out, "  Types:     {}", pokemon.types.join(", "));
  let _ = writeln!(out, "  Abilities: {}", pokemon.abilities.join(", "));
  let _ = writeln!(out, "  Height:    {:.1} m", pokemon.height);
  let _ = writeln!(out, "  Weight:    {:.1} kg", pokemon.weight);
  let _ = writeln!(out, "  Color:     {}", pokemon.color);
  let _ = writeln!(out, "  Avatar:    {}", pokemon.avatar);
  let _ = writeln!(out, "  Base stats:");
  for stat in &pokemon.stats {
    let _ = writeln!(out, "  {}", stat_line(stat));
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pikachu() -> Pokemon {
    Pokemon {
      id: 25,
      name: "pikachu".to_string(),
      avatar: "https://img.example/25.png".to_string(),
      color: "yellow".to_string(),
      height: 0.4,
      weight: 6.0,
      types: vec!["electric".to_string()],
      abilities: vec!["static".to_string(), "lightning-rod".to_string()],
      stats: vec![
        Stat {
          name: "hp".to_string(),
          value: 35,
        },
        Stat {
          name: "speed".to_string(),
          value: 255,
        },
      ],
    }
  }

  #[test]
  fn test_capitalize() {
    assert_eq!(capitalize("pikachu"), "Pikachu");
    assert_eq!(capitalize("é"), "É");
    assert_eq!(capitalize(""), "");
  }

  #[test]
  fn test_number_is_zero_padded() {
    assert_eq!(number(1), "#001");
    assert_eq!(number(25), "#025");
    assert_eq!(number(1010), "#1010");
  }

  #[test]
  fn test_summary_line() {
    assert_eq!(summary_line(&pikachu()), "#025 Pikachu      electric");
  }

  #[test]
  fn test_name_line() {
    let entry = PokemonName {
      id: 731,
      name: "pikipek".to_string(),
    };
    assert_eq!(name_line(&entry), "#731 pikipek");
  }

  #[test]
  fn test_detail() {
    let text = detail(&pikachu());
    assert!(text.starts_with("#025 Pikachu\n"));
    assert!(text.contains("  Height:    0.4 m\n"));
    assert!(text.contains("  Weight:    6.0 kg\n"));
    assert!(text.contains("  Abilities: static, lightning-rod\n"));
  }

  #[test]
  fn test_stat_bar_scales_to_max() {
    let full = stat_line(&Stat {
      name: "speed".to_string(),
      value: 255,
    });
    assert!(full.ends_with(&"█".repeat(STAT_BAR_WIDTH)));
    assert!(full.starts_with("  Spe  255 "));

    let empty = stat_line(&Stat {
      name: "hp".to_string(),
      value: 0,
    });
    assert_eq!(empty, "  HP     0 ");
  }
}
