//! imshelf - book discovery from the terminal
//!
//! Each invocation opens the persisted session, applies one intent and
//! prints the resulting view.

mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use imshelf_core::{
    CatalogSession, FileStore, Mode, RemoteCatalog, SessionSnapshot, ShelfConfig,
    SuggestionEngine,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "imshelf", version, about = "Browse and search the book catalog")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the session cache
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Popular books for a random topic
    Browse {
        /// Extra pages to load
        #[arg(long, default_value_t = 0)]
        more: u32,
    },
    /// Search by title, author or keyword
    Search {
        query: String,
        /// Extra pages to load
        #[arg(long, default_value_t = 0)]
        more: u32,
    },
    /// Title suggestions for partial input
    Suggest {
        text: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Details for one volume
    Show { id: String },
    /// Forget the cached session and browse again
    Reset,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => ShelfConfig::load(path)?,
        None => ShelfConfig::default(),
    }
    .with_env_overrides();

    let cache_dir = cli
        .cache_dir
        .clone()
        .or_else(|| config.cache.resolve_dir())
        .ok_or("no cache directory available; pass --cache-dir")?;
    tracing::debug!(dir = %cache_dir.display(), "opening session cache");

    let store = Arc::new(FileStore::open(cache_dir)?);
    let catalog = Arc::new(RemoteCatalog::from_config(&config.api)?);
    let session = CatalogSession::open(catalog.clone(), store, config.session.clone());

    match cli.command {
        Command::Browse { more } => {
            if session.snapshot().await.mode == Mode::Search {
                session.reset().await;
            } else {
                session.start().await;
            }
            load_more(&session, more).await;
            print_session(&session.snapshot().await, cli.json)?;
        }
        Command::Search { query, more } => {
            let current = session.snapshot().await;
            let cached = current.mode == Mode::Search
                && current.query.trim() == query.trim()
                && !current.results.is_empty();
            if !cached {
                session.on_search(&query).await;
            }
            load_more(&session, more).await;
            print_session(&session.snapshot().await, cli.json)?;
        }
        Command::Suggest { text, limit } => {
            let engine = SuggestionEngine::new(catalog, config.session.suggestion_page_size);
            let limit = limit.unwrap_or(config.session.suggestion_limit);
            let suggestions = engine.suggest(&text, limit).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&suggestions)?);
            } else {
                println!("{}", output::suggestion_table(&suggestions));
            }
        }
        Command::Show { id } => {
            let record = session
                .details(&id)
                .await?
                .ok_or_else(|| format!("no volume with id {}", id))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", output::detail_view(&record));
            }
        }
        Command::Reset => {
            session.reset().await;
            print_session(&session.snapshot().await, cli.json)?;
        }
    }

    session.shutdown();
    Ok(())
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_more<C, S>(session: &CatalogSession<C, S>, pages: u32)
where
    C: imshelf_core::CatalogClient,
    S: imshelf_core::CacheStore,
{
    for _ in 0..pages {
        if !session.snapshot().await.has_more {
            break;
        }
        session.on_load_more().await;
    }
}

fn print_session(snapshot: &SessionSnapshot, json: bool) -> Result<(), serde_json::Error> {
    if let Some(error) = &snapshot.error {
        eprintln!("warning: {}", error);
    }
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
    } else {
        println!("{}", output::summary_line(snapshot));
        if !snapshot.results.is_empty() {
            println!("{}", output::results_table(snapshot));
        }
    }
    Ok(())
}
