//! Battle aggregate: participants, round bookkeeping, and pending actions.

use std::collections::BTreeMap;

use super::combatant::Combatant;
use super::common::{BattleId, ChatId, PlayerId, Timestamp};
use crate::config::DuelConfig;
use crate::skill::SkillId;

/// Version of the serialized [`Battle`] layout.
///
/// Stored inside every persisted battle; loaders reject other versions.
pub const BATTLE_SCHEMA_VERSION: u32 = 1;

/// Lifecycle of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BattleStatus {
    /// Battle opened; the second seat is still empty.
    WaitingForPlayers,
    /// Both seats taken; rounds resolve as pairs of actions arrive.
    InProgress,
    /// Some combatant reached 0 HP. Immutable from here on.
    Finished,
}

/// Result of a finished battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Winner {
    Player(PlayerId),
    /// Both combatants fell in the same round.
    Draw,
}

/// How the skill of a pending action was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChoiceSource {
    /// Named by the player.
    Explicit,
    /// Picked by weighted selection from the battle seed.
    Default,
}

/// A submitted action waiting for its counterpart.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingAction {
    pub player_id: PlayerId,
    pub skill_id: SkillId,
    pub source: ChoiceSource,
    pub submitted_at: Timestamp,
}

/// Canonical state of one duel.
///
/// Mutated exclusively through [`crate::engine::BattleEngine`], which keeps
/// the pending map and the round counter in step: both pending entries are
/// consumed in the same transition that increments `round_number`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battle {
    pub schema_version: u32,
    pub battle_id: BattleId,
    pub chat_id: ChatId,
    /// Seat order: index 0 opened the battle, index 1 joined it.
    pub combatants: Vec<Combatant>,
    /// Round currently collecting actions (starts at 1).
    pub round_number: u32,
    pub pending_actions: BTreeMap<PlayerId, PendingAction>,
    pub status: BattleStatus,
    pub winner: Option<Winner>,
    pub seed: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Battle {
    /// Returns true until the battle is finished.
    pub fn is_active(&self) -> bool {
        self.status != BattleStatus::Finished
    }

    pub fn is_full(&self) -> bool {
        self.combatants.len() >= DuelConfig::SEATS
    }

    /// Seat index of a participant.
    pub fn seat_of(&self, player: PlayerId) -> Option<usize> {
        self.combatants.iter().position(|c| c.player_id == player)
    }

    pub fn is_participant(&self, player: PlayerId) -> bool {
        self.seat_of(player).is_some()
    }

    pub fn combatant(&self, player: PlayerId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.player_id == player)
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.combatants.iter().map(|c| c.player_id)
    }

    pub fn pending_for(&self, player: PlayerId) -> Option<&SkillId> {
        self.pending_actions.get(&player).map(|p| &p.skill_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battle() -> Battle {
        let at = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let mut pending_actions = BTreeMap::new();
        pending_actions.insert(
            PlayerId(1),
            PendingAction {
                player_id: PlayerId(1),
                skill_id: SkillId::from("strike"),
                source: ChoiceSource::Explicit,
                submitted_at: at,
            },
        );
        Battle {
            schema_version: BATTLE_SCHEMA_VERSION,
            battle_id: BattleId::from("b1"),
            chat_id: ChatId(-42),
            combatants: vec![
                Combatant::new(PlayerId(1), 100),
                Combatant::new(PlayerId(2), 100),
            ],
            round_number: 3,
            pending_actions,
            status: BattleStatus::InProgress,
            winner: None,
            seed: 9,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn seat_and_pending_lookups() {
        let battle = battle();
        assert!(battle.is_participant(PlayerId(1)));
        assert!(!battle.is_participant(PlayerId(9)));
        assert_eq!(battle.seat_of(PlayerId(2)), Some(1));
        assert_eq!(battle.pending_for(PlayerId(1)).unwrap().as_str(), "strike");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_keeps_pending_actions_keyed_by_player() {
        let battle = battle();
        let json = serde_json::to_string(&battle).unwrap();
        assert!(json.contains("\"pending_actions\":{\"1\":"));

        let restored: Battle = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, battle);
    }
}
