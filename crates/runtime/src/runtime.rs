//! High-level runtime orchestrator.
//!
//! The runtime owns the shared catalog, the repository, and the event bus,
//! rehydrates stored battles on start, and exposes a builder-based API for
//! clients to drive battles.

use std::sync::Arc;

use duel_core::{DuelConfig, SkillCatalog};
use tokio::sync::broadcast;

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::repository::BattleRepository;
use crate::service::BattleService;

/// Runtime configuration shared across the orchestrator and the service.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub duel: DuelConfig,
    pub event_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            duel: DuelConfig::default(),
            event_buffer_size: 100,
        }
    }
}

/// Main runtime hosting every battle of the process.
///
/// [`BattleService`] provides a cloneable façade for transports.
pub struct Runtime {
    service: BattleService,
    events: EventBus,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to the battle service
    pub fn service(&self) -> BattleService {
        self.service.clone()
    }

    /// Subscribe to battle events of one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.events.subscribe(topic)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    catalog: Option<Arc<SkillCatalog>>,
    repository: Option<Arc<dyn BattleRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            catalog: None,
            repository: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required skill catalog
    pub fn catalog(mut self, catalog: Arc<SkillCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Set the required battle repository
    pub fn repository(mut self, repository: Arc<dyn BattleRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Build the runtime, rehydrating every stored battle.
    ///
    /// Active battles come back with their pending actions, so a restart
    /// between the two submissions of a round loses nothing. Finished
    /// battles are loaded too, for status queries.
    pub async fn build(self) -> Result<Runtime> {
        let catalog = self.catalog.ok_or(RuntimeError::MissingCatalog)?;
        let repository = self.repository.ok_or(RuntimeError::MissingRepository)?;

        let mut battles = repository.load_all_active()?;
        let active = battles.len();
        for id in repository.list_ids()? {
            if battles.iter().any(|b| b.battle_id == id) {
                continue;
            }
            if let Some(battle) = repository.load(&id)? {
                battles.push(battle);
            }
        }

        let pending: usize = battles.iter().map(|b| b.pending_actions.len()).sum();
        tracing::info!(
            active,
            finished = battles.len() - active,
            pending,
            skills = catalog.len(),
            "runtime rehydrated battles"
        );

        let events = EventBus::with_capacity(self.config.event_buffer_size);
        let service = BattleService::new(
            catalog,
            self.config.duel,
            repository,
            events.clone(),
            battles,
        );

        Ok(Runtime { service, events })
    }
}
