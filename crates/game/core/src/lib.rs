//! Deterministic duel rules and data types shared across crates.
//!
//! `duel-core` defines the canonical rules (skills, statuses, round
//! resolution, battle transitions) and exposes pure APIs that can be reused by
//! the runtime and offline tools. All battle mutation flows through
//! [`engine::BattleEngine`]; round math lives in [`combat::resolve`].
pub mod catalog;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod skill;
pub mod state;

pub use catalog::{CatalogError, SkillCatalog, UnknownSkillError};
pub use combat::{
    ActionTaken, AppliedStatus, Resolution, RoundOutcome, SideOutcome, StruggleReason, resolve,
};
pub use config::DuelConfig;
pub use engine::{BattleEngine, BattleError, Submission};
pub use env::{PcgRng, RngOracle, compute_seed};
pub use error::{DuelError, ErrorSeverity};
pub use skill::{
    BASIC_ATTACK_ID, EffectTarget, Skill, SkillChoice, SkillId, SkillSpec, StatusTemplate,
    StatusTemplateSpec,
};
pub use state::{
    BATTLE_SCHEMA_VERSION, Battle, BattleId, BattleStatus, ChatId, ChoiceSource, Combatant,
    PendingAction, PlayerId, StatusApplication, StatusEffect, StatusEffects, StatusKind,
    Timestamp, Winner,
};
