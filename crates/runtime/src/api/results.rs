use duel_core::{Battle, BattleId, PlayerId, RoundOutcome, SkillId};

/// Successful outcome of [`crate::BattleService::submit_action`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitResult {
    /// The action is locked; the round resolves when the opponent submits.
    WaitingForOpponent {
        battle_id: BattleId,
        round_number: u32,
        player_id: PlayerId,
        skill_id: SkillId,
    },
    /// This submission completed the round.
    RoundResolved {
        outcome: RoundOutcome,
        /// Battle as committed after the round.
        battle: Battle,
    },
}
