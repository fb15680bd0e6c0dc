use std::process::ExitCode;

use caltrain_sync::config::{SourceConfig, SyncConfig};
use caltrain_sync::open511::{Endpoint, FetchError, FixtureSource, Open511Client, TransitSource};
use caltrain_sync::store::{DocumentStore, Fields, MemoryStore, RestStore, StoreError};
use caltrain_sync::sync::{SyncError, Synchronizer};
use serde_json::Value;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: caltrain-sync [schedule|predictions]";

#[derive(Debug, Clone, Copy)]
enum Command {
    Schedule,
    Predictions,
}

/// Live API or recorded payloads, chosen at startup.
enum Source {
    Live(Open511Client),
    Fixtures(FixtureSource),
}

impl TransitSource for Source {
    async fn fetch(&self, endpoint: Endpoint) -> Result<String, FetchError> {
        match self {
            Source::Live(client) => client.fetch(endpoint).await,
            Source::Fixtures(fixtures) => fixtures.fetch(endpoint).await,
        }
    }
}

/// Remote store, or memory for a dry run.
enum Store {
    Rest(RestStore),
    Memory(MemoryStore),
}

impl DocumentStore for Store {
    async fn update(&self, path: &str, fields: Fields) -> Result<(), StoreError> {
        match self {
            Store::Rest(store) => store.update(path, fields).await,
            Store::Memory(store) => store.update(path, fields).await,
        }
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        match self {
            Store::Rest(store) => store.set(path, value).await,
            Store::Memory(store) => store.set(path, value).await,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let command = match std::env::args().nth(1).as_deref() {
        None | Some("schedule") => Command::Schedule,
        Some("predictions") => Command::Predictions,
        Some(other) => {
            eprintln!("unknown command {other:?}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = match SyncConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let source = match config.source {
        SourceConfig::Fixtures(dir) => {
            info!(dir = %dir.display(), "using recorded payloads");
            FixtureSource::from_dir(&dir).map(Source::Fixtures)
        }
        SourceConfig::Live(open511) => {
            info!(base_url = %open511.base_url, operator = %open511.operator_id, "using 511.org");
            Open511Client::new(open511).map(Source::Live)
        }
    };
    let source = match source {
        Ok(source) => source,
        Err(e) => {
            error!(error = %e, "cannot create transit source");
            return ExitCode::FAILURE;
        }
    };

    let store = match config.store {
        Some(rest) => match RestStore::new(rest) {
            Ok(store) => Store::Rest(store),
            Err(e) => {
                error!(error = %e, "cannot create store");
                return ExitCode::FAILURE;
            }
        },
        None => {
            info!("STORE_URL not set, dry run against an in-memory store");
            Store::Memory(MemoryStore::new())
        }
    };

    let sync = Synchronizer::new(source, store).with_root(config.root);

    match run(&sync, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, ?command, "sync failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(sync: &Synchronizer<Source, Store>, command: Command) -> Result<(), SyncError> {
    match command {
        Command::Schedule => {
            sync.run_cycle().await?;
        }
        Command::Predictions => {
            sync.sync_predictions().await?;
        }
    }

    if let Store::Memory(memory) = sync.store() {
        info!(writes = memory.write_count().await, "dry run, nothing persisted");
    }
    Ok(())
}
