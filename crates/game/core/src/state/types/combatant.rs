//! Per-participant battle state.

use std::collections::BTreeMap;

use super::common::PlayerId;
use super::status::StatusEffects;
use crate::skill::SkillId;

/// One side of a battle.
///
/// `hp` stays within `[0, max_hp]`; a combatant at 0 HP is defeated.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub player_id: PlayerId,
    pub hp: u32,
    pub max_hp: u32,
    pub statuses: StatusEffects,
    /// Remaining cooldown per skill; skills absent from the map are ready.
    pub cooldowns: BTreeMap<SkillId, u32>,
}

impl Combatant {
    /// Creates a combatant at full health with no statuses or cooldowns.
    pub fn new(player_id: PlayerId, max_hp: u32) -> Self {
        Self {
            player_id,
            hp: max_hp,
            max_hp,
            statuses: StatusEffects::empty(),
            cooldowns: BTreeMap::new(),
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Remaining cooldown turns of a skill (0 when ready).
    pub fn cooldown(&self, skill: &SkillId) -> u32 {
        self.cooldowns.get(skill).copied().unwrap_or(0)
    }

    pub fn is_ready(&self, skill: &SkillId) -> bool {
        self.cooldown(skill) == 0
    }

    /// Sets HP, clamped to `[0, max_hp]`.
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
    }

    /// Counts every active cooldown down by one, dropping entries that reach zero.
    pub fn tick_cooldowns(&mut self) {
        self.cooldowns.retain(|_, remaining| {
            *remaining = remaining.saturating_sub(1);
            *remaining > 0
        });
    }

    /// Puts a skill on cooldown; zero clears it.
    pub fn set_cooldown(&mut self, skill: SkillId, turns: u32) {
        if turns == 0 {
            self.cooldowns.remove(&skill);
        } else {
            self.cooldowns.insert(skill, turns);
        }
    }
}
