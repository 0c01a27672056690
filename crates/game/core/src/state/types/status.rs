//! Status effect system for combatants.
//!
//! Status effects are temporary conditions attached to a combatant. Each one
//! counts down once per resolved round and is removed when it reaches zero.
//!
//! # Damage pipeline
//!
//! Damage-shaping statuses are consulted in a fixed order:
//! attacker modifiers ([`StatusKind::Empowered`], [`StatusKind::Weakened`]) →
//! defender debuffs ([`StatusKind::Vulnerable`]) → defender mitigation
//! ([`StatusKind::DamageReduction`], then [`StatusKind::Shield`] absorption).

use arrayvec::ArrayVec;

use crate::config::DuelConfig;

/// Active status effects on a combatant, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { DuelConfig::MAX_STATUS_EFFECTS }>,
}

/// A single status effect with its remaining lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Kind-specific strength: HP per round, percent, or shield pool.
    pub magnitude: u32,
    /// Resolved rounds this effect still influences.
    pub remaining_turns: u32,
}

/// Types of status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusKind {
    // ========================================================================
    // Control
    // ========================================================================
    /// Skill choice is replaced by the basic attack.
    Silence,

    // ========================================================================
    // Damage over time
    // ========================================================================
    /// Loses `magnitude` HP every round.
    Poison,

    // ========================================================================
    // Attacker modifiers
    // ========================================================================
    /// Outgoing damage +`magnitude`%.
    Empowered,

    /// Outgoing damage -`magnitude`%.
    Weakened,

    // ========================================================================
    // Defender debuffs
    // ========================================================================
    /// Incoming damage +`magnitude`%.
    Vulnerable,

    // ========================================================================
    // Defender mitigation
    // ========================================================================
    /// Incoming damage -`magnitude`% (capped at 100).
    DamageReduction,

    /// Absorbs up to `magnitude` incoming damage; expires once depleted.
    Shield,
}

/// How [`StatusEffects::apply`] placed an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusApplication {
    /// New entry appended.
    Applied,
    /// Existing entry of the same kind replaced.
    Refreshed,
    /// No free slot; nothing changed.
    Dropped,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Checks if a status of the given kind is active.
    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Gets the active effect of the given kind.
    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Magnitude of the given kind, or 0 when inactive.
    pub fn magnitude(&self, kind: StatusKind) -> u32 {
        self.get(kind).map_or(0, |e| e.magnitude)
    }

    /// Adds a status effect.
    ///
    /// An effect of the same kind is replaced (magnitude and duration
    /// refreshed) rather than stacked. Zero-duration effects are ignored.
    pub fn apply(&mut self, effect: StatusEffect) -> StatusApplication {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            *existing = effect;
            return StatusApplication::Refreshed;
        }

        if effect.remaining_turns == 0 || self.effects.is_full() {
            return StatusApplication::Dropped;
        }

        self.effects.push(effect);
        StatusApplication::Applied
    }

    /// Drains up to `amount` from the shield pool; returns the absorbed amount.
    pub fn absorb(&mut self, amount: u32) -> u32 {
        let Some(shield) = self
            .effects
            .iter_mut()
            .find(|e| e.kind == StatusKind::Shield)
        else {
            return 0;
        };

        let absorbed = shield.magnitude.min(amount);
        shield.magnitude -= absorbed;
        absorbed
    }

    /// Counts every effect down by one round.
    ///
    /// Removes effects that reached zero turns and depleted shields, returning
    /// their kinds in the order they were held.
    pub fn tick(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        self.effects.retain(|e| {
            e.remaining_turns = e.remaining_turns.saturating_sub(1);
            let depleted = e.kind == StatusKind::Shield && e.magnitude == 0;
            if e.remaining_turns == 0 || depleted {
                expired.push(e.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Returns an iterator over all effects.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
