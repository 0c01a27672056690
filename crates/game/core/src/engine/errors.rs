//! Rejections surfaced by battle transitions.

use crate::catalog::UnknownSkillError;
use crate::error::{DuelError, ErrorSeverity};
use crate::state::{BattleId, PlayerId};

/// Errors returned by [`super::BattleEngine`].
///
/// Every variant leaves the battle untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("player {player} is not a participant of battle {battle_id}")]
    NotAParticipant {
        battle_id: BattleId,
        player: PlayerId,
    },

    #[error("battle {0} is finished")]
    BattleFinished(BattleId),

    #[error("player {player} already locked an action for round {round}")]
    DuplicateSubmission { player: PlayerId, round: u32 },

    #[error(transparent)]
    UnknownSkill(#[from] UnknownSkillError),

    #[error("battle {0} already has two players")]
    BattleFull(BattleId),

    #[error("player {player} is already seated in battle {battle_id}")]
    AlreadySeated {
        battle_id: BattleId,
        player: PlayerId,
    },

    #[error("battle {0} has started; its seed can no longer change")]
    SeedLocked(BattleId),

    #[error("battle {0} is missing its second combatant")]
    MissingOpponent(BattleId),
}

impl DuelError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAParticipant { .. } => "BATTLE_NOT_A_PARTICIPANT",
            Self::BattleFinished(_) => "BATTLE_FINISHED",
            Self::DuplicateSubmission { .. } => "BATTLE_DUPLICATE_SUBMISSION",
            Self::UnknownSkill(_) => "BATTLE_UNKNOWN_SKILL",
            Self::BattleFull(_) => "BATTLE_FULL",
            Self::AlreadySeated { .. } => "BATTLE_ALREADY_SEATED",
            Self::SeedLocked(_) => "BATTLE_SEED_LOCKED",
            Self::MissingOpponent(_) => "BATTLE_MISSING_OPPONENT",
        }
    }
}
