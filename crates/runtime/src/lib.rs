//! Runtime orchestration for turn-synchronized duels.
//!
//! This crate wires the pure duel-core engine to per-battle locking,
//! durable repositories, and an event bus. Consumers embed [`Runtime`] and
//! drive battles through the cloneable [`BattleService`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder (including startup rehydration)
//! - [`service`] serializes transitions per battle and persists them
//! - [`api`] exposes the result and error types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] provides the storage adapters
pub mod api;
pub mod events;
pub mod repository;
pub mod runtime;
pub mod service;

pub use api::{Result, RuntimeError, SubmitResult};
pub use events::{Event, EventBus, LifecycleEvent, RoundEvent, Topic};
pub use repository::{
    BattleRecord, BattleRepository, FileBattleRepository, InMemoryBattleRepo, RepositoryError,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use service::BattleService;
