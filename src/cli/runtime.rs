use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waitwise_core_types::{Platform, PuzzleKind};
use waitwise_store::{JsonFileStore, Storage};

const STORE_FILE: &str = "waitwise.json";

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

/// Open the on-disk store. Priority: `--data-dir`, then `WAITWISE_DATA_DIR`,
/// then the current directory.
pub fn open_storage(data_dir: Option<&PathBuf>) -> Storage {
    let dir = match data_dir {
        Some(dir) => dir.clone(),
        None => std::env::var_os("WAITWISE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    Storage::new(Arc::new(JsonFileStore::open(dir.join(STORE_FILE))))
}

pub fn parse_kind(name: &str) -> Result<PuzzleKind> {
    PuzzleKind::ALL
        .into_iter()
        .find(|k| k.name() == name)
        .with_context(|| {
            let known: Vec<&str> = PuzzleKind::ALL.iter().map(|k| k.name()).collect();
            format!("unknown puzzle kind {name:?} (expected one of {known:?})")
        })
}

pub fn parse_platform(name: &str) -> Result<Platform> {
    Platform::ALL
        .into_iter()
        .find(|p| p.name() == name)
        .with_context(|| {
            let known: Vec<&str> = Platform::ALL.iter().map(|p| p.name()).collect();
            format!("unknown platform {name:?} (expected one of {known:?})")
        })
}
