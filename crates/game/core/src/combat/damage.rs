//! Damage calculation and application.

use crate::state::{StatusEffects, StatusKind};

/// Applies status modifiers to a rolled damage value.
///
/// # Formula
///
/// ```text
/// d = raw
/// d = d * (100 + empowered) / 100           attacker buff
/// d = d * (100 - min(weakened, 100)) / 100  attacker debuff
/// d = d * (100 + vulnerable) / 100          defender debuff
/// d = d * (100 - min(reduction, 100)) / 100 defender mitigation
/// ```
///
/// Each step floors. Shield absorption happens afterwards, on the defender's
/// live shield pool.
///
/// # Arguments
///
/// * `raw` - Rolled skill damage
/// * `attacker` - Attacker's round-start statuses
/// * `defender` - Defender's round-start statuses
pub fn apply_modifiers(raw: u32, attacker: &StatusEffects, defender: &StatusEffects) -> u32 {
    let scale = |damage: u64, percent: u64, increase: bool| {
        if increase {
            damage.saturating_mul(100 + percent) / 100
        } else {
            damage * (100 - percent.min(100)) / 100
        }
    };

    let mut damage = u64::from(raw);
    damage = scale(
        damage,
        u64::from(attacker.magnitude(StatusKind::Empowered)),
        true,
    );
    damage = scale(
        damage,
        u64::from(attacker.magnitude(StatusKind::Weakened)),
        false,
    );
    damage = scale(
        damage,
        u64::from(defender.magnitude(StatusKind::Vulnerable)),
        true,
    );
    damage = scale(
        damage,
        u64::from(defender.magnitude(StatusKind::DamageReduction)),
        false,
    );

    u32::try_from(damage).unwrap_or(u32::MAX)
}

/// Apply damage to current HP.
///
/// Returns the new HP value (clamped to 0).
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StatusEffect;

    fn with(effects: &[(StatusKind, u32)]) -> StatusEffects {
        let mut statuses = StatusEffects::empty();
        for &(kind, magnitude) in effects {
            statuses.apply(StatusEffect {
                kind,
                magnitude,
                remaining_turns: 1,
            });
        }
        statuses
    }

    #[test]
    fn unmodified_damage_passes_through() {
        let none = StatusEffects::empty();
        assert_eq!(apply_modifiers(37, &none, &none), 37);
    }

    #[test]
    fn modifiers_apply_in_pipeline_order() {
        let attacker = with(&[(StatusKind::Empowered, 50), (StatusKind::Weakened, 20)]);
        let defender = with(&[
            (StatusKind::Vulnerable, 25),
            (StatusKind::DamageReduction, 50),
        ]);

        // 100 -> 150 -> 120 -> 150 -> 75
        assert_eq!(apply_modifiers(100, &attacker, &defender), 75);
    }

    #[test]
    fn reduction_is_capped_at_full_mitigation() {
        let none = StatusEffects::empty();
        let wall = with(&[(StatusKind::DamageReduction, 250)]);
        assert_eq!(apply_modifiers(80, &none, &wall), 0);
    }

    #[test]
    fn each_step_floors() {
        let none = StatusEffects::empty();
        let guard = with(&[(StatusKind::DamageReduction, 50)]);
        assert_eq!(apply_modifiers(15, &none, &guard), 7);
    }

    #[test]
    fn damage_never_underflows_hp() {
        assert_eq!(apply_damage(10, 25), 0);
        assert_eq!(apply_damage(30, 25), 5);
    }
}
