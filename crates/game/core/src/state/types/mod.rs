pub mod battle;
pub mod combatant;
pub mod common;
pub mod status;

pub use battle::{
    BATTLE_SCHEMA_VERSION, Battle, BattleStatus, ChoiceSource, PendingAction, Winner,
};
pub use combatant::Combatant;
pub use common::{BattleId, ChatId, PlayerId, Timestamp};
pub use status::{StatusApplication, StatusEffect, StatusEffects, StatusKind};
