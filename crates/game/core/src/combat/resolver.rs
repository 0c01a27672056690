//! Simultaneous resolution of one round.

use crate::catalog::SkillCatalog;
use crate::env::{PcgRng, RngOracle, compute_seed, context};
use crate::skill::{EffectTarget, Skill, SkillId};
use crate::state::{Combatant, StatusEffect, StatusKind};

use super::damage::{apply_damage, apply_modifiers};
use super::outcome::{ActionTaken, AppliedStatus, RoundOutcome, SideOutcome, StruggleReason};

/// Result of [`resolve`]: the outcome record and the post-round combatants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: RoundOutcome,
    /// Seat order, same as the input.
    pub combatants: [Combatant; 2],
}

/// What a side will do this round, decided from its round-start state.
struct Plan<'c> {
    requested: Option<SkillId>,
    skill: Option<&'c Skill>,
    action: ActionTaken,
}

impl<'c> Plan<'c> {
    fn struggle(requested: Option<SkillId>, reason: StruggleReason) -> Self {
        Self {
            requested,
            skill: None,
            action: ActionTaken::Struggle(reason),
        }
    }
}

fn plan<'c>(
    catalog: &'c SkillCatalog,
    combatant: &Combatant,
    requested: Option<&SkillId>,
) -> Plan<'c> {
    let Some(requested) = requested else {
        return Plan::struggle(None, StruggleReason::NoAction);
    };

    let (skill, action) = if combatant.statuses.has(StatusKind::Silence) {
        let action = if requested.is_basic_attack() {
            ActionTaken::Skill
        } else {
            ActionTaken::ForcedBasicAttack
        };
        (catalog.basic_attack(), action)
    } else {
        match catalog.lookup(requested) {
            Ok(skill) => (skill, ActionTaken::Skill),
            Err(_) => {
                return Plan::struggle(Some(requested.clone()), StruggleReason::UnknownSkill);
            }
        }
    };

    let remaining = combatant.cooldown(&skill.id);
    if remaining > 0 {
        return Plan::struggle(
            Some(requested.clone()),
            StruggleReason::OnCooldown { remaining },
        );
    }

    Plan {
        requested: Some(requested.clone()),
        skill: Some(skill),
        action,
    }
}

/// Resolves one round between two combatants.
///
/// Both sides act on the round-start snapshot, so damage lands
/// simultaneously. Order of effects:
///
/// 1. plan each side (silence, unknown skill, cooldown)
/// 2. roll damage and apply status modifiers, drain shields
/// 3. poison ticks through any remaining shield
/// 4. clamp HP
/// 5. tick cooldowns, then set the used skills' cooldowns; tick statuses
/// 6. apply newly inflicted statuses
///
/// Never fails: malformed or stale actions degrade to a struggle. The result
/// is a pure function of the arguments.
pub fn resolve(
    catalog: &SkillCatalog,
    round_number: u32,
    combatants: [&Combatant; 2],
    actions: [Option<&SkillId>; 2],
    battle_seed: u64,
) -> Resolution {
    let rng = PcgRng;
    let round = u64::from(round_number);
    let before = [combatants[0].clone(), combatants[1].clone()];
    let mut after = before.clone();

    let plans = [
        plan(catalog, &before[0], actions[0]),
        plan(catalog, &before[1], actions[1]),
    ];

    // Skill damage from the round-start snapshot.
    let mut dealt = [0u32; 2];
    let mut absorbed = [0u32; 2];
    for side in 0..2 {
        let target = 1 - side;
        let Some(skill) = plans[side].skill else {
            continue;
        };

        let seed = compute_seed(battle_seed, round, side as u32, context::DAMAGE);
        let raw = rng.range(seed, skill.base_damage, skill.max_damage);
        let modified = apply_modifiers(raw, &before[side].statuses, &before[target].statuses);
        absorbed[side] = after[target].statuses.absorb(modified);
        dealt[side] = modified - absorbed[side];
    }

    let mut poison_taken = [0u32; 2];
    for side in 0..2 {
        let poison = before[side].statuses.magnitude(StatusKind::Poison);
        if poison > 0 {
            poison_taken[side] = poison - after[side].statuses.absorb(poison);
        }
    }

    for side in 0..2 {
        let incoming = dealt[1 - side].saturating_add(poison_taken[side]);
        let hp = apply_damage(before[side].hp, incoming);
        after[side].set_hp(hp);
    }

    let mut cooldown_set = [None; 2];
    let mut expired: [Vec<StatusKind>; 2] = [Vec::new(), Vec::new()];
    for side in 0..2 {
        after[side].tick_cooldowns();
        if let Some(skill) = plans[side].skill {
            after[side].set_cooldown(skill.id.clone(), skill.cooldown_turns);
            if skill.cooldown_turns > 0 {
                cooldown_set[side] = Some(skill.cooldown_turns);
            }
        }
        expired[side] = after[side].statuses.tick();
    }

    let mut applied: [Vec<AppliedStatus>; 2] = [Vec::new(), Vec::new()];
    let mut resisted: [Vec<StatusKind>; 2] = [Vec::new(), Vec::new()];
    for side in 0..2 {
        let Some(skill) = plans[side].skill else {
            continue;
        };

        for (index, template) in skill.status_effects.iter().enumerate() {
            let seed = compute_seed(
                battle_seed,
                round,
                side as u32,
                context::STATUS + index as u32,
            );
            if !rng.chance(seed, template.chance_percent) {
                resisted[side].push(template.kind);
                continue;
            }

            let target = match template.target {
                EffectTarget::Caster => side,
                EffectTarget::Opponent => 1 - side,
            };
            let application = after[target].statuses.apply(StatusEffect {
                kind: template.kind,
                magnitude: template.magnitude,
                remaining_turns: template.duration,
            });
            applied[side].push(AppliedStatus {
                kind: template.kind,
                magnitude: template.magnitude,
                duration: template.duration,
                target: after[target].player_id,
                application,
            });
        }
    }

    let [plan_a, plan_b] = plans;
    let [applied_a, applied_b] = applied;
    let [resisted_a, resisted_b] = resisted;
    let [expired_a, expired_b] = expired;

    let side_outcome = |side: usize,
                        plan: Plan<'_>,
                        statuses_applied: Vec<AppliedStatus>,
                        statuses_resisted: Vec<StatusKind>,
                        statuses_expired: Vec<StatusKind>| SideOutcome {
        player_id: before[side].player_id,
        requested: plan.requested,
        used: plan.skill.map(|s| s.id.clone()),
        action: plan.action,
        damage_dealt: dealt[side],
        damage_absorbed: absorbed[side],
        poison_taken: poison_taken[side],
        statuses_applied,
        statuses_resisted,
        statuses_expired,
        cooldown_set: cooldown_set[side],
        hp_before: before[side].hp,
        hp_after: after[side].hp,
        max_hp: after[side].max_hp,
        defeated: after[side].is_defeated(),
    };

    let outcome = RoundOutcome {
        round_number,
        sides: [
            side_outcome(0, plan_a, applied_a, resisted_a, expired_a),
            side_outcome(1, plan_b, applied_b, resisted_b, expired_b),
        ],
    };

    Resolution {
        outcome,
        combatants: after,
    }
}
