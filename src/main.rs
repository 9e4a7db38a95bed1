mod cache;
mod config;
mod error;
mod format;
mod logging;
mod pokeapi;
mod search;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::debug;

use crate::pokeapi::cached_client::PokedexClient;

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "A caching command-line client for the PokéAPI")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/pokedex/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// PokéAPI base URL (overrides config and POKEDEX_API_URL)
  #[arg(long)]
  base_url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show the details of one Pokémon
  Show { id: u32 },
  /// List the catalog, page by page
  List {
    /// Number of pages to load
    #[arg(long, default_value_t = 1)]
    pages: u32,
  },
  /// Search by name (3+ letters) or exact id
  Search { term: String },
  /// Print the id/name index of the whole catalog
  Names,
  /// Read search terms from stdin and search as they settle
  Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Override base URL if specified on command line
  if let Some(base_url) = args.base_url {
    config.api.base_url = base_url;
  }

  let _log_guard = logging::init(&config.log)?;
  debug!(base_url = %config.api.base_url, "starting");

  let client = PokedexClient::new(&config)?;

  match args.command {
    Command::Show { id } => {
      let pokemon = client.get_pokemon(id).await?;
      print!("{}", format::detail(&pokemon));
    }
    Command::List { pages } => list(&client, pages).await?,
    Command::Search { term } => print_search(&client, &term).await?,
    Command::Names => {
      for entry in client.get_pokemon_names().await? {
        println!("{}", format::name_line(&entry));
      }
    }
    Command::Interactive => interactive(&client).await?,
  }

  Ok(())
}

async fn list(client: &PokedexClient, pages: u32) -> Result<()> {
  let mut data = client.list().await?;
  while data.pages.len() < pages as usize && client.has_next_page().await {
    data = client.next_page().await?;
  }

  for pokemon in data.flatten() {
    println!("{}", format::summary_line(&pokemon));
  }

  Ok(())
}

async fn print_search(client: &PokedexClient, term: &str) -> Result<()> {
  let results = client.search(term).await?;
  if results.is_empty() {
    println!("No Pokémon found for {:?}", term);
  }
  for pokemon in &results {
    println!("{}", format::summary_line(pokemon));
  }
  Ok(())
}

async fn interactive(client: &PokedexClient) -> Result<()> {
  let (tx, rx) = watch::channel(String::new());
  let mut settled = search::debounce(rx, client.settings().debounce());

  tokio::spawn(async move {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
      if tx.send(line).is_err() {
        break;
      }
    }
  });

  while settled.changed().await.is_ok() {
    let term = settled.borrow_and_update().clone();
    if term.trim().is_empty() {
      continue;
    }

    // A failed search is reported and the session goes on
    if let Err(e) = print_search(client, &term).await {
      eprintln!("{}", e);
    }
  }

  Ok(())
}
