//! Authoritative battle state representation.
//!
//! Runtime layers clone and persist this state but mutate it exclusively
//! through the engine.
pub mod types;

pub use types::{
    BATTLE_SCHEMA_VERSION, Battle, BattleId, BattleStatus, ChatId, ChoiceSource, Combatant,
    PendingAction, PlayerId, StatusApplication, StatusEffect, StatusEffects, StatusKind,
    Timestamp, Winner,
};
