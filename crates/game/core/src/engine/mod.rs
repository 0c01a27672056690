//! Battle transitions.
//!
//! The [`BattleEngine`] is the authoritative reducer for [`Battle`]. Each
//! transition either fails without touching the battle or applies all of its
//! mutations; in particular the pending map is cleared in the same call that
//! resolves the round and increments the round counter.

mod errors;

pub use errors::BattleError;

use std::collections::BTreeMap;

use crate::catalog::SkillCatalog;
use crate::combat::{self, RoundOutcome};
use crate::config::DuelConfig;
use crate::env::{compute_seed, context};
use crate::skill::SkillChoice;
use crate::state::{
    BATTLE_SCHEMA_VERSION, Battle, BattleId, BattleStatus, ChatId, ChoiceSource, Combatant,
    PendingAction, PlayerId, Timestamp, Winner,
};

/// Result of a successful [`BattleEngine::submit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// First action of the round; waiting for the opponent.
    Locked(PendingAction),
    /// Second action of the round; the round resolved.
    Resolved(RoundOutcome),
}

/// Applies battle transitions against a shared catalog and rules config.
#[derive(Clone, Copy, Debug)]
pub struct BattleEngine<'a> {
    catalog: &'a SkillCatalog,
    config: &'a DuelConfig,
}

impl<'a> BattleEngine<'a> {
    pub fn new(catalog: &'a SkillCatalog, config: &'a DuelConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'a SkillCatalog {
        self.catalog
    }

    /// Creates a battle with `player_a` seated, waiting for an opponent.
    pub fn open(
        &self,
        battle_id: BattleId,
        chat_id: ChatId,
        player_a: PlayerId,
        seed: u64,
        now: Timestamp,
    ) -> Battle {
        Battle {
            schema_version: BATTLE_SCHEMA_VERSION,
            battle_id,
            chat_id,
            combatants: vec![Combatant::new(player_a, self.config.seat_hp())],
            round_number: 1,
            pending_actions: BTreeMap::new(),
            status: BattleStatus::WaitingForPlayers,
            winner: None,
            seed,
            created_at: now,
            updated_at: now,
        }
    }

    /// Seats the second player and starts the battle.
    pub fn join(&self, battle: &mut Battle, player: PlayerId) -> Result<(), BattleError> {
        if !battle.is_active() {
            return Err(BattleError::BattleFinished(battle.battle_id.clone()));
        }
        if battle.is_participant(player) {
            return Err(BattleError::AlreadySeated {
                battle_id: battle.battle_id.clone(),
                player,
            });
        }
        if battle.is_full() {
            return Err(BattleError::BattleFull(battle.battle_id.clone()));
        }

        battle
            .combatants
            .push(Combatant::new(player, self.config.seat_hp()));
        battle.status = BattleStatus::InProgress;
        Ok(())
    }

    /// Locks `player`'s action for the current round, resolving the round
    /// when it is the second one.
    ///
    /// [`SkillChoice::Default`] is turned into a concrete skill here, from
    /// the battle seed, so the locked slot always names a skill. Explicit
    /// skills that are merely cooling down are accepted; the resolver turns
    /// them into a struggle.
    pub fn submit(
        &self,
        battle: &mut Battle,
        player: PlayerId,
        choice: SkillChoice,
        now: Timestamp,
    ) -> Result<Submission, BattleError> {
        if battle.status == BattleStatus::Finished {
            return Err(BattleError::BattleFinished(battle.battle_id.clone()));
        }
        let Some(seat) = battle.seat_of(player) else {
            return Err(BattleError::NotAParticipant {
                battle_id: battle.battle_id.clone(),
                player,
            });
        };
        if battle.pending_actions.contains_key(&player) {
            return Err(BattleError::DuplicateSubmission {
                player,
                round: battle.round_number,
            });
        }

        let (skill_id, source) = match choice {
            SkillChoice::Explicit(id) => {
                self.catalog.lookup(&id)?;
                (id, ChoiceSource::Explicit)
            }
            SkillChoice::Default => {
                let seed = compute_seed(
                    battle.seed,
                    u64::from(battle.round_number),
                    seat as u32,
                    context::DEFAULT_PICK,
                );
                let picked = self
                    .catalog
                    .choose_weighted(&battle.combatants[seat], seed);
                (picked.id.clone(), ChoiceSource::Default)
            }
        };

        let pending = PendingAction {
            player_id: player,
            skill_id,
            source,
            submitted_at: now,
        };

        let ready = battle.status == BattleStatus::InProgress
            && battle.pending_actions.len() + 1 == DuelConfig::SEATS;
        if !ready {
            battle.pending_actions.insert(player, pending.clone());
            battle.updated_at = now;
            return Ok(Submission::Locked(pending));
        }

        let [first, second] = battle.combatants.as_slice() else {
            return Err(BattleError::MissingOpponent(battle.battle_id.clone()));
        };
        let (first, second) = (first.clone(), second.clone());

        battle.pending_actions.insert(player, pending);
        let pending = std::mem::take(&mut battle.pending_actions);
        let actions = [
            pending.get(&first.player_id).map(|p| &p.skill_id),
            pending.get(&second.player_id).map(|p| &p.skill_id),
        ];

        let resolution = combat::resolve(
            self.catalog,
            battle.round_number,
            [&first, &second],
            actions,
            battle.seed,
        );

        battle.combatants = Vec::from(resolution.combatants);
        battle.round_number += 1;
        battle.updated_at = now;
        battle.winner = winner_of(&battle.combatants);
        if battle.winner.is_some() {
            battle.status = BattleStatus::Finished;
        }

        Ok(Submission::Resolved(resolution.outcome))
    }

    /// Replaces the battle seed before any round has resolved.
    pub fn reseed(&self, battle: &mut Battle, seed: u64) -> Result<(), BattleError> {
        if !battle.is_active() {
            return Err(BattleError::BattleFinished(battle.battle_id.clone()));
        }
        if battle.round_number > 1 || !battle.pending_actions.is_empty() {
            return Err(BattleError::SeedLocked(battle.battle_id.clone()));
        }
        battle.seed = seed;
        Ok(())
    }
}

fn winner_of(combatants: &[Combatant]) -> Option<Winner> {
    let [a, b] = combatants else {
        return None;
    };
    match (a.is_defeated(), b.is_defeated()) {
        (true, true) => Some(Winner::Draw),
        (true, false) => Some(Winner::Player(b.player_id)),
        (false, true) => Some(Winner::Player(a.player_id)),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::UnknownSkillError;
    use crate::skill::{BASIC_ATTACK_ID, SkillId, SkillSpec};

    const A: PlayerId = PlayerId(100);
    const B: PlayerId = PlayerId(200);

    fn skill(id: &str, base: i64, cooldown: i64, weight: i64) -> SkillSpec {
        SkillSpec {
            id: Some(id.to_owned()),
            name: Some(id.to_owned()),
            base_damage: Some(base),
            cooldown_turns: Some(cooldown),
            weight: Some(weight),
            ..SkillSpec::default()
        }
    }

    fn catalog() -> SkillCatalog {
        SkillCatalog::from_specs(vec![
            skill(BASIC_ATTACK_ID, 10, 0, 0),
            skill("strike", 20, 2, 3),
            skill("smash", 60, 1, 1),
        ])
        .unwrap()
    }

    fn now() -> Timestamp {
        chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn started(engine: &BattleEngine<'_>) -> Battle {
        let mut battle = engine.open(BattleId::from("b1"), ChatId(7), A, 99, now());
        engine.join(&mut battle, B).unwrap();
        battle
    }

    fn strike() -> SkillChoice {
        SkillChoice::explicit("strike")
    }

    #[test]
    fn open_then_join_starts_battle() {
        let catalog = catalog();
        let config = DuelConfig::with_starting_hp(100);
        let engine = BattleEngine::new(&catalog, &config);

        let mut battle = engine.open(BattleId::from("b1"), ChatId(7), A, 1, now());
        assert_eq!(battle.status, BattleStatus::WaitingForPlayers);
        assert_eq!(battle.round_number, 1);

        assert_eq!(
            engine.join(&mut battle, A),
            Err(BattleError::AlreadySeated {
                battle_id: BattleId::from("b1"),
                player: A,
            })
        );
        engine.join(&mut battle, B).unwrap();
        assert_eq!(battle.status, BattleStatus::InProgress);
        assert_eq!(battle.combatant(B).unwrap().hp, 100);
        assert_eq!(
            engine.join(&mut battle, PlayerId(300)),
            Err(BattleError::BattleFull(BattleId::from("b1")))
        );
    }

    #[test]
    fn zero_starting_hp_still_seats_living_combatants() {
        let catalog = catalog();
        let config = DuelConfig::with_starting_hp(0);
        let engine = BattleEngine::new(&catalog, &config);
        let mut battle = started(&engine);

        assert_eq!(battle.status, BattleStatus::InProgress);
        assert!(battle.combatants.iter().all(|c| c.hp == 1 && !c.is_defeated()));

        let basic = || SkillChoice::explicit(BASIC_ATTACK_ID);
        engine.submit(&mut battle, A, basic(), now()).unwrap();
        engine.submit(&mut battle, B, basic(), now()).unwrap();
        assert_eq!(battle.status, BattleStatus::Finished);
        assert_eq!(battle.winner, Some(Winner::Draw));
        assert!(matches!(
            engine.submit(&mut battle, A, basic(), now()),
            Err(BattleError::BattleFinished(_))
        ));
    }

    #[test]
    fn first_submission_locks_second_resolves() {
        let catalog = catalog();
        let config = DuelConfig::with_starting_hp(100);
        let engine = BattleEngine::new(&catalog, &config);
        let mut battle = started(&engine);

        let first = engine.submit(&mut battle, A, strike(), now()).unwrap();
        assert!(matches!(first, Submission::Locked(ref p) if p.skill_id.as_str() == "strike"));
        assert_eq!(battle.pending_actions.len(), 1);

        let second = engine
            .submit(&mut battle, B, SkillChoice::explicit(BASIC_ATTACK_ID), now())
            .unwrap();
        let Submission::Resolved(outcome) = second else {
            panic!("expected resolution");
        };
        assert_eq!(outcome.round_number, 1);
        assert_eq!(battle.round_number, 2);
        assert!(battle.pending_actions.is_empty());
        assert_eq!(battle.combatant(A).unwrap().hp, 90);
        assert_eq!(battle.combatant(B).unwrap().hp, 80);
    }

    #[test]
    fn duplicate_submission_is_rejected_without_change() {
        let catalog = catalog();
        let config = DuelConfig::default();
        let engine = BattleEngine::new(&catalog, &config);
        let mut battle = started(&engine);

        engine.submit(&mut battle, A, strike(), now()).unwrap();
        let snapshot = battle.clone();

        let err = engine
            .submit(&mut battle, A, SkillChoice::Default, now())
            .unwrap_err();
        assert_eq!(err, BattleError::DuplicateSubmission { player: A, round: 1 });
        assert_eq!(battle, snapshot);
    }

    #[test]
    fn strangers_and_unknown_skills_are_rejected() {
        let catalog = catalog();
        let config = DuelConfig::default();
        let engine = BattleEngine::new(&catalog, &config);
        let mut battle = started(&engine);

        assert!(matches!(
            engine.submit(&mut battle, PlayerId(5), strike(), now()),
            Err(BattleError::NotAParticipant { .. })
        ));
        assert_eq!(
            engine.submit(&mut battle, A, SkillChoice::explicit("teleport"), now()),
            Err(BattleError::UnknownSkill(UnknownSkillError {
                skill_id: SkillId::from("teleport"),
            }))
        );
        assert!(battle.pending_actions.is_empty());
    }

    #[test]
    fn seated_player_may_lock_before_opponent_joins() {
        let catalog = catalog();
        let config = DuelConfig::with_starting_hp(100);
        let engine = BattleEngine::new(&catalog, &config);

        let mut battle = engine.open(BattleId::from("b1"), ChatId(7), A, 5, now());
        assert!(matches!(
            engine.submit(&mut battle, A, strike(), now()),
            Ok(Submission::Locked(_))
        ));
        engine.join(&mut battle, B).unwrap();
        assert!(matches!(
            engine.submit(&mut battle, B, strike(), now()),
            Ok(Submission::Resolved(_))
        ));
        assert_eq!(battle.round_number, 2);
    }

    #[test]
    fn default_choice_is_locked_deterministically() {
        let catalog = catalog();
        let config = DuelConfig::default();
        let engine = BattleEngine::new(&catalog, &config);

        let pick = || {
            let mut battle = started(&engine);
            match engine.submit(&mut battle, A, SkillChoice::Default, now()) {
                Ok(Submission::Locked(pending)) => pending,
                other => panic!("unexpected {other:?}"),
            }
        };

        let first = pick();
        assert_eq!(first, pick());
        assert_eq!(first.source, ChoiceSource::Default);
        assert!(!first.skill_id.is_basic_attack());
    }

    #[test]
    fn defeat_finishes_the_battle() {
        let catalog = catalog();
        let config = DuelConfig::with_starting_hp(60);
        let engine = BattleEngine::new(&catalog, &config);
        let mut battle = started(&engine);

        engine
            .submit(&mut battle, A, SkillChoice::explicit("smash"), now())
            .unwrap();
        engine.submit(&mut battle, B, strike(), now()).unwrap();

        assert_eq!(battle.status, BattleStatus::Finished);
        assert_eq!(battle.winner, Some(Winner::Player(A)));
        assert_eq!(
            engine.submit(&mut battle, A, strike(), now()),
            Err(BattleError::BattleFinished(BattleId::from("b1")))
        );
    }

    #[test]
    fn seed_locks_once_play_starts() {
        let catalog = catalog();
        let config = DuelConfig::default();
        let engine = BattleEngine::new(&catalog, &config);
        let mut battle = started(&engine);

        engine.reseed(&mut battle, 1234).unwrap();
        assert_eq!(battle.seed, 1234);

        engine.submit(&mut battle, A, strike(), now()).unwrap();
        assert_eq!(
            engine.reseed(&mut battle, 1),
            Err(BattleError::SeedLocked(BattleId::from("b1")))
        );
    }
}
