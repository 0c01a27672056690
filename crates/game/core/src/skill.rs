//! Skill definitions and the raw document form they are validated from.

use std::fmt;

use crate::state::StatusKind;

/// Id of the reserved skill used when a side is silenced or nothing else
/// is available.
pub const BASIC_ATTACK_ID: &str = "basic_attack";

/// Stable identifier of a skill in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SkillId(String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn basic_attack() -> Self {
        Self::new(BASIC_ATTACK_ID)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_basic_attack(&self) -> bool {
        self.0 == BASIC_ATTACK_ID
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SkillId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Who receives a status inflicted by a skill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectTarget {
    /// The side that used the skill.
    Caster,
    /// The other side.
    #[default]
    Opponent,
}

/// Status a skill inflicts after the round resolves.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTemplate {
    pub kind: StatusKind,
    pub magnitude: u32,
    /// Rounds the status stays active once applied (at least 1).
    pub duration: u32,
    pub target: EffectTarget,
    /// Probability of application, `1..=100`.
    pub chance_percent: u32,
}

/// Validated, immutable skill definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    /// Lower bound of the damage roll.
    pub base_damage: u32,
    /// Upper bound of the damage roll (`>= base_damage`).
    pub max_damage: u32,
    pub cooldown_turns: u32,
    /// Relative probability for default (non-explicit) selection.
    pub weight: u32,
    pub status_effects: Vec<StatusTemplate>,
}

impl Skill {
    pub fn is_basic_attack(&self) -> bool {
        self.id.is_basic_attack()
    }

    /// Returns true when the damage roll can produce more than one value.
    pub fn has_damage_range(&self) -> bool {
        self.max_damage > self.base_damage
    }
}

/// Skill selection submitted by a player.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SkillChoice {
    /// A skill named by id.
    Explicit(SkillId),
    /// Let the battle seed pick a weighted skill.
    Default,
}

impl SkillChoice {
    pub fn explicit(id: impl Into<String>) -> Self {
        Self::Explicit(SkillId::new(id))
    }
}

// ============================================================================
// Document form
// ============================================================================

/// Raw skill entry as written in a catalog document.
///
/// Every scalar is optional and signed so validation can report the exact
/// field that is missing or negative. Converted into [`Skill`] by
/// [`crate::SkillCatalog::from_specs`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SkillSpec {
    pub id: Option<String>,
    pub name: Option<String>,
    pub base_damage: Option<i64>,
    pub max_damage: Option<i64>,
    pub cooldown_turns: Option<i64>,
    pub weight: Option<i64>,
    pub status_effects: Vec<StatusTemplateSpec>,
}

/// Raw status entry of a [`SkillSpec`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct StatusTemplateSpec {
    pub kind: Option<StatusKind>,
    pub magnitude: Option<i64>,
    pub duration: Option<i64>,
    pub target: Option<EffectTarget>,
    pub chance_percent: Option<i64>,
}
