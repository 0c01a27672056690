use duel_core::{BattleId, ChatId, PlayerId, RoundOutcome, Winner};
use serde::{Deserialize, Serialize};

/// Battle creation, seating, and completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    BattleCreated {
        battle_id: BattleId,
        chat_id: ChatId,
        players: Vec<PlayerId>,
    },
    PlayerJoined {
        battle_id: BattleId,
        player_id: PlayerId,
    },
    BattleFinished {
        battle_id: BattleId,
        chat_id: ChatId,
        winner: Winner,
        /// Rounds resolved over the whole battle.
        rounds: u32,
    },
}

/// Per-round progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// A player locked an action. The skill stays hidden until resolution.
    ActionLocked {
        battle_id: BattleId,
        round_number: u32,
        player_id: PlayerId,
    },
    RoundResolved {
        battle_id: BattleId,
        outcome: RoundOutcome,
    },
}
