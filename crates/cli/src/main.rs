//! feedkit command line entry point.
//!
//! Logging goes to stderr as JSON so stdout only carries the rendered feed.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use feedkit_client::{RemoteFeedLoader, ReqwestHttpClient, canonicalize};
use feedkit_core::presentation::{FeedLoaderPresentationAdapter, FeedPresenter};
use feedkit_core::{
    AppConfig, FeedLoader, FeedLoaderCacheDecorator, FeedLoaderWithFallback, FeedStore, FileFeedStore,
    InMemoryFeedStore, LocalFeedLoader, SqliteFeedStore, StoreKind,
};
use tracing_subscriber::EnvFilter;

mod view;

use view::ConsoleView;

/// feedkit - fetch, cache and show an image feed
#[derive(Parser)]
#[command(name = "feedkit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Remote feed endpoint (overrides FEEDKIT_FEED_URL)
    #[arg(long, global = true, value_name = "URL")]
    feed_url: Option<String>,

    /// Cache storage engine (overrides FEEDKIT_STORE)
    #[arg(long, global = true, value_enum)]
    store: Option<StoreArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Fetch the remote feed, cache it and print it
    Refresh,

    /// Print the cached feed if it is still fresh
    Show,

    /// Delete the cached feed if it is expired or unreadable
    Validate,

    /// Fetch the remote feed, falling back to the cache when offline
    Load,
}

#[derive(ValueEnum, Clone, Copy)]
enum StoreArg {
    Sqlite,
    File,
    Memory,
}

impl From<StoreArg> for StoreKind {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::Sqlite => StoreKind::Sqlite,
            StoreArg::File => StoreKind::File,
            StoreArg::Memory => StoreKind::Memory,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(feed_url) = cli.feed_url {
        config.feed_url = Some(feed_url);
    }
    if let Some(store) = cli.store {
        config.store = store.into();
    }

    tracing::info!(store = ?config.store, version = env!("CARGO_PKG_VERSION"), "starting feedkit");

    match config.store {
        StoreKind::Sqlite => {
            let store = SqliteFeedStore::open(&config.db_path)
                .await
                .with_context(|| format!("failed to open cache database {}", config.db_path.display()))?;
            run(cli.command, &config, store).await
        }
        StoreKind::File => run(cli.command, &config, FileFeedStore::new(config.file_path.clone())).await,
        StoreKind::Memory => run(cli.command, &config, InMemoryFeedStore::new()).await,
    }
}

async fn run<S: FeedStore + 'static>(command: Command, config: &AppConfig, store: S) -> Result<()> {
    let local = Arc::new(LocalFeedLoader::new(Arc::new(store), chrono::Utc::now).with_policy(config.cache_policy()));

    match command {
        Command::Show => present(Arc::clone(&local)).await,
        Command::Validate => {
            local.validate_cache().await;
            tracing::info!("cache validated");
            Ok(())
        }
        Command::Refresh => {
            let remote = remote_loader(config)?;
            present(FeedLoaderCacheDecorator::new(remote, Arc::clone(&local))).await
        }
        Command::Load => {
            let remote = remote_loader(config)?;
            let cached_remote = FeedLoaderCacheDecorator::new(remote, Arc::clone(&local));
            present(FeedLoaderWithFallback::new(cached_remote, Arc::clone(&local))).await
        }
    }
}

fn remote_loader(config: &AppConfig) -> Result<RemoteFeedLoader<ReqwestHttpClient>> {
    let url = canonicalize(config.require_feed_url()?)?;
    let client = ReqwestHttpClient::new(config.into())?;
    Ok(RemoteFeedLoader::new(url, Arc::new(client)))
}

async fn present(loader: impl FeedLoader) -> Result<()> {
    let view = Arc::new(ConsoleView::new(std::io::stdout()));
    let presenter = FeedPresenter::new(view.clone(), view.clone(), view.clone());

    println!("{}", FeedPresenter::TITLE);
    FeedLoaderPresentationAdapter::new(loader, presenter).did_request_feed_refresh().await;

    if view.failed() {
        anyhow::bail!("feed could not be loaded");
    }
    Ok(())
}
