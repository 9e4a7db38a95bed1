//! In-memory PokéAPI used by tests.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use super::transport::Transport;
use crate::error::NetworkError;

const FIRST_THIRTY: [&str; 30] = [
  "bulbasaur",
  "ivysaur",
  "venusaur",
  "charmander",
  "charmeleon",
  "charizard",
  "squirtle",
  "wartortle",
  "blastoise",
  "caterpie",
  "metapod",
  "butterfree",
  "weedle",
  "kakuna",
  "beedrill",
  "pidgey",
  "pidgeotto",
  "pidgeot",
  "rattata",
  "raticate",
  "spearow",
  "fearow",
  "ekans",
  "arbok",
  "pikachu",
  "raichu",
  "sandshrew",
  "sandslash",
  "nidoran-f",
  "nidorina",
];

const COLORS: [&str; 4] = ["green", "yellow", "red", "blue"];

/// Serves `pokemon`, `pokemon-species` and listing paths from a synthetic
/// catalog (ids 1–30 plus `pikipek` at 731) and counts requests per path.
pub struct FakeApi {
  catalog: BTreeMap<u32, String>,
  failing: Mutex<HashSet<u32>>,
  broken_species: Mutex<HashSet<u32>>,
  calls: Mutex<HashMap<String, usize>>,
  latency: Duration,
}

impl FakeApi {
  pub fn new() -> Self {
    let mut catalog: BTreeMap<u32, String> = (1..)
      .zip(FIRST_THIRTY)
      .map(|(id, name)| (id, name.to_string()))
      .collect();
    catalog.insert(731, "pikipek".to_string());

    Self {
      catalog,
      failing: Mutex::new(HashSet::new()),
      broken_species: Mutex::new(HashSet::new()),
      calls: Mutex::new(HashMap::new()),
      latency: Duration::from_millis(5),
    }
  }

  pub fn catalog_size(&self) -> usize {
    self.catalog.len()
  }

  /// Make `pokemon/{id}` answer 404.
  pub fn fail_id(&self, id: u32) {
    self.failing.lock().unwrap().insert(id);
  }

  /// Make `pokemon-species/{id}` answer without a color.
  pub fn break_species(&self, id: u32) {
    self.broken_species.lock().unwrap().insert(id);
  }

  pub fn calls(&self, path: &str) -> usize {
    self.calls.lock().unwrap().get(path).copied().unwrap_or(0)
  }

  pub fn total_calls(&self) -> usize {
    self.calls.lock().unwrap().values().sum()
  }

  fn route(&self, path: &str) -> Option<Value> {
    if let Some(id) = path.strip_prefix("pokemon-species/") {
      let id: u32 = id.parse().ok()?;
      self.catalog.get(&id)?;
      if self.broken_species.lock().unwrap().contains(&id) {
        return Some(json!({ "id": id }));
      }
      return Some(species_json(id));
    }

    if let Some(id) = path.strip_prefix("pokemon/") {
      let id: u32 = id.parse().ok()?;
      if self.failing.lock().unwrap().contains(&id) {
        return None;
      }
      return self.catalog.get(&id).map(|name| pokemon_json(id, name));
    }

    if let Some(query) = path.strip_prefix("pokemon?") {
      let params: HashMap<_, _> = url::form_urlencoded::parse(query.as_bytes()).into_owned().collect();
      let offset: usize = params.get("offset")?.parse().ok()?;
      let limit: usize = params.get("limit")?.parse().ok()?;
      let results: Vec<Value> = self
        .catalog
        .iter()
        .skip(offset)
        .take(limit)
        .map(|(id, name)| {
          json!({ "name": name, "url": format!("https://pokeapi.co/api/v2/pokemon/{id}/") })
        })
        .collect();
      return Some(json!({ "count": self.catalog.len(), "results": results }));
    }

    None
  }
}

#[async_trait]
impl Transport for FakeApi {
  async fn get(&self, path: &str) -> Result<Value, NetworkError> {
    *self.calls.lock().unwrap().entry(path.to_string()).or_default() += 1;
    tokio::time::sleep(self.latency).await;

    self.route(path).ok_or_else(|| NetworkError::Status {
      url: path.to_string(),
      status: StatusCode::NOT_FOUND,
    })
  }
}

fn pokemon_json(id: u32, name: &str) -> Value {
  let stats: Vec<Value> = super::types::BASE_STATS
    .iter()
    .zip(0u32..)
    .map(|(stat, i)| json!({ "base_stat": 30 + (id + i) % 100, "effort": 0, "stat": { "name": stat, "url": "" } }))
    .collect();

  json!({
    "id": id,
    "name": name,
    "height": id % 20 + 1,
    "weight": id * 10,
    "sprites": {
      "front_default": format!("https://img.example/sprites/{id}.png"),
      "other": {
        "official-artwork": { "front_default": format!("https://img.example/artwork/{id}.png") }
      }
    },
    "types": [ { "slot": 1, "type": { "name": "normal", "url": "" } } ],
    "abilities": [ { "slot": 1, "is_hidden": false, "ability": { "name": "run-away", "url": "" } } ],
    "stats": stats
  })
}

fn species_json(id: u32) -> Value {
  let color = COLORS[id as usize % COLORS.len()];
  json!({ "id": id, "color": { "name": color, "url": "" } })
}
