/// Soundwave - search a music catalog and play previews from the terminal
mod commands;
mod config;
mod media_keys;
mod output;
mod session;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use output::RodioResource;
use session::Session;
use soundwave_catalog::{CatalogClient, SearchSlot};
use soundwave_core::{SnapshotStore, Track};
use soundwave_playback::{ControlSurface, PlayerStore, TransportController};
use soundwave_storage::{MemorySnapshotStore, RedbSnapshotStore};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soundwave")]
#[command(about = "Search a music catalog and play track previews", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SOUNDWAVE_CONFIG")]
    config: Option<PathBuf>,

    /// Keep player state in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog and print ranked results
    Search {
        /// Search text
        query: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Queue the top results for a query and start playing
    Play {
        /// Search text
        query: String,
        /// Number of results to queue
        #[arg(short, long)]
        top: Option<usize>,
    },
    /// Continue the last session's queue
    Resume,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing (stderr, so it does not interleave with results on stdout)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "soundwave=info,soundwave_playback=info,soundwave_catalog=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Search { query, limit } => search(&config, &query, limit).await,
        Commands::Play { query, top } => play(&config, cli.ephemeral, &query, top).await,
        Commands::Resume => resume(&config, cli.ephemeral).await,
    }
}

async fn search(config: &AppConfig, query: &str, limit: Option<usize>) -> Result<()> {
    let client = CatalogClient::new(config.catalog_config())?;
    let limit = limit.unwrap_or(client.config().default_limit);

    let tracks = client.search_with_limit(query, limit).await?;
    if tracks.is_empty() {
        println!("No playable results for \"{query}\"");
    } else {
        session::print_tracks(&tracks);
    }
    Ok(())
}

async fn play(config: &AppConfig, ephemeral: bool, query: &str, top: Option<usize>) -> Result<()> {
    let client = CatalogClient::new(config.catalog_config())?;
    let top = top.unwrap_or(client.config().quick_pick_limit);

    let tracks = client.search_with_limit(query, top).await?;
    if tracks.is_empty() {
        bail!("No playable results for \"{query}\"");
    }
    tracing::info!(query = %query, tracks = tracks.len(), "Queueing search results");

    let store = PlayerStore::new(open_persistence(config, ephemeral)?);
    run_session(config, client, store, Some(tracks)).await
}

async fn resume(config: &AppConfig, ephemeral: bool) -> Result<()> {
    let store = PlayerStore::restore(open_persistence(config, ephemeral)?);
    if store.state().queue.is_empty() {
        println!("Nothing to resume, start with `soundwave play <query>`");
        return Ok(());
    }

    let client = CatalogClient::new(config.catalog_config())?;
    run_session(config, client, store, None).await
}

fn open_persistence(config: &AppConfig, ephemeral: bool) -> Result<Box<dyn SnapshotStore>> {
    if ephemeral {
        return Ok(Box::new(MemorySnapshotStore::new()));
    }

    let path = &config.storage.state_path;
    let store = RedbSnapshotStore::open(path)
        .with_context(|| format!("Failed to open player state at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Player state opened");
    Ok(Box::new(store))
}

/// Wire the controller, audio output, search slot and media keys together
async fn run_session(
    config: &AppConfig,
    client: CatalogClient,
    store: PlayerStore,
    queue: Option<Vec<Track>>,
) -> Result<()> {
    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .user_agent(format!("Soundwave/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    let (resource, loads) = RodioResource::open(http)?;
    let mut controller = TransportController::new(store, resource, config.playback_config());
    if let Some(tracks) = queue {
        controller.set_queue(tracks, 0);
    }

    let slot = SearchSlot::new(client, config.slot_config());
    let surface = ControlSurface::new(config.playback.seek_step_secs);
    let (media_keys, media) = media_keys::listen();

    Session::new(controller, surface, slot, media_keys)
        .run(loads, media)
        .await
}
