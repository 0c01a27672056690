//! Duel client binary.
//!
//! Composition root: reads the environment, loads the skill catalog and
//! battle rules, picks a repository, builds the runtime, and drives it from
//! stdin one command per line.
//!
//! ```bash
//! DUEL_STORAGE=memory cargo run -p duel-client
//! ```
mod config;
mod render;
mod repl;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use duel_content::{ConfigLoader, SkillLoader};
use duel_core::{DuelConfig, SkillCatalog};
use duel_runtime::{
    BattleRepository, Event, FileBattleRepository, InMemoryBattleRepo, Runtime, RuntimeConfig,
    Topic,
};
use tokio::io::BufReader;
use tokio::sync::broadcast::error::RecvError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{ClientConfig, StorageKind};
use crate::repl::Repl;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _guard = setup_logging(config.log_dir.as_deref())?;

    let catalog = load_catalog(config.skills_path.as_deref())?;
    let rules = load_rules(config.rules_path.as_deref())?;
    let repository = open_repository(&config)?;

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            duel: rules,
            event_buffer_size: config.event_buffer_size,
        })
        .catalog(Arc::new(catalog))
        .repository(repository)
        .build()
        .await
        .context("failed to start the battle runtime")?;

    spawn_lifecycle_log(&runtime);

    println!("{}", repl::HELP);
    let repl = Repl::new(runtime.service());
    repl.run(BufReader::new(tokio::io::stdin())).await?;

    tracing::info!("client shutdown complete");
    Ok(())
}

/// Setup logging to stderr, and to `duel.log` in `log_dir` when given.
///
/// The returned guard flushes the file writer on drop.
fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(log_dir, "duel.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("log file: {}/duel.log", log_dir.display());
    Ok(Some(guard))
}

fn load_catalog(path: Option<&Path>) -> Result<SkillCatalog> {
    let catalog = match path {
        Some(path) => SkillLoader::load(path)
            .with_context(|| format!("invalid skill catalog {}", path.display()))?,
        None => SkillLoader::builtin().context("invalid built-in skill catalog")?,
    };
    tracing::info!(skills = catalog.len(), "skill catalog loaded");
    Ok(catalog)
}

fn load_rules(path: Option<&Path>) -> Result<DuelConfig> {
    let Some(path) = path else {
        return Ok(DuelConfig::default());
    };
    let rules = ConfigLoader::load(path)
        .with_context(|| format!("invalid battle rules {}", path.display()))?;
    tracing::info!(starting_hp = rules.starting_hp, "battle rules loaded");
    Ok(rules)
}

fn open_repository(config: &ClientConfig) -> Result<Arc<dyn BattleRepository>> {
    Ok(match config.storage {
        StorageKind::File => {
            let repository = FileBattleRepository::new(&config.data_dir).with_context(|| {
                format!("failed to open battle storage {}", config.data_dir.display())
            })?;
            tracing::info!(dir = %config.data_dir.display(), "using file storage");
            Arc::new(repository)
        }
        StorageKind::Memory => {
            tracing::warn!("using in-memory storage; battles are lost on exit");
            Arc::new(InMemoryBattleRepo::new())
        }
    })
}

/// Mirrors lifecycle events into the log.
fn spawn_lifecycle_log(runtime: &Runtime) {
    let mut events = runtime.subscribe(Topic::Lifecycle);
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(Event::Lifecycle(event)) => tracing::debug!(?event, "lifecycle event"),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "lifecycle log fell behind")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
