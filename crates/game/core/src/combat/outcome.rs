//! Immutable round outcome records.

use crate::skill::SkillId;
use crate::state::{PlayerId, StatusApplication, StatusKind};

/// Why a side's action degraded to a struggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StruggleReason {
    /// The side had no action for the round.
    NoAction,
    /// The requested id is not in the catalog.
    UnknownSkill,
    /// The skill (or the forced basic attack) is still cooling down.
    OnCooldown { remaining: u32 },
}

/// What a side actually did in the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionTaken {
    /// The requested skill was used.
    Skill,
    /// Silence replaced the requested skill with the basic attack.
    ForcedBasicAttack,
    /// No-op: no damage, no statuses, no cooldown set.
    Struggle(StruggleReason),
}

impl ActionTaken {
    pub fn is_struggle(&self) -> bool {
        matches!(self, Self::Struggle(_))
    }
}

/// A status inflicted by a side's skill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedStatus {
    pub kind: StatusKind,
    pub magnitude: u32,
    pub duration: u32,
    /// Combatant that received the status.
    pub target: PlayerId,
    pub application: StatusApplication,
}

/// Per-side summary of a resolved round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideOutcome {
    pub player_id: PlayerId,
    /// Skill the player locked in, if any.
    pub requested: Option<SkillId>,
    /// Skill that actually resolved (`None` on struggle).
    pub used: Option<SkillId>,
    pub action: ActionTaken,
    /// HP removed from the opponent by this side's skill.
    pub damage_dealt: u32,
    /// Part of this side's damage soaked by the opponent's shield.
    pub damage_absorbed: u32,
    /// HP this side lost to poison.
    pub poison_taken: u32,
    pub statuses_applied: Vec<AppliedStatus>,
    /// Statuses of this side's skill that failed their chance roll.
    pub statuses_resisted: Vec<StatusKind>,
    /// This side's own statuses that ran out during the round.
    pub statuses_expired: Vec<StatusKind>,
    /// Cooldown put on the used skill, when it has one.
    pub cooldown_set: Option<u32>,
    pub hp_before: u32,
    pub hp_after: u32,
    pub max_hp: u32,
    pub defeated: bool,
}

/// Rendering payload of one resolved round. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundOutcome {
    pub round_number: u32,
    /// Seat order, matching [`crate::Battle::combatants`].
    pub sides: [SideOutcome; 2],
}

impl RoundOutcome {
    pub fn side(&self, player: PlayerId) -> Option<&SideOutcome> {
        self.sides.iter().find(|s| s.player_id == player)
    }

    /// Returns true when some combatant ended the round at 0 HP.
    pub fn has_defeat(&self) -> bool {
        self.sides.iter().any(|s| s.defeated)
    }
}
