//! Immutable skill catalog.
//!
//! Built once from document entries, then shared read-only (typically behind
//! an `Arc`) by every battle. Catalog order is significant: it defines the
//! 1-based skill numbers players may type instead of ids.

use std::collections::HashMap;

use crate::env::{PcgRng, RngOracle};
use crate::skill::{EffectTarget, Skill, SkillId, SkillSpec, StatusTemplate, StatusTemplateSpec};
use crate::state::Combatant;

/// Errors raised while validating catalog documents.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("skill catalog is empty")]
    Empty,

    #[error("skill #{index} ({skill}) is missing required field `{field}`")]
    MissingField {
        index: usize,
        skill: String,
        field: &'static str,
    },

    #[error("skill `{skill}` has negative `{field}`: {value}")]
    NegativeValue {
        skill: String,
        field: &'static str,
        value: i64,
    },

    #[error("skill `{skill}` has `{field}` = {value}, above the maximum {max}")]
    OutOfRange {
        skill: String,
        field: &'static str,
        value: i64,
        max: i64,
    },

    #[error("skill `{skill}` has max_damage {max} below base_damage {base}")]
    DamageRange { skill: String, base: u32, max: u32 },

    #[error("skill `{skill}` status #{index}: {reason}")]
    InvalidStatus {
        skill: String,
        index: usize,
        reason: String,
    },

    #[error("duplicate skill id `{0}`")]
    DuplicateId(String),

    #[error("catalog has no `basic_attack` skill")]
    MissingBasicAttack,
}

/// Lookup of an id the catalog does not define.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown skill `{skill_id}`")]
pub struct UnknownSkillError {
    pub skill_id: SkillId,
}

/// Validated skill table.
#[derive(Clone, Debug)]
pub struct SkillCatalog {
    skills: Vec<Skill>,
    index: HashMap<SkillId, usize>,
    basic: usize,
}

impl SkillCatalog {
    /// Validates document entries and builds the catalog.
    pub fn from_specs(specs: Vec<SkillSpec>) -> Result<Self, CatalogError> {
        if specs.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut skills = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());

        for (position, spec) in specs.into_iter().enumerate() {
            let skill = validate_skill(position, spec)?;
            if index.insert(skill.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(skill.id.to_string()));
            }
            skills.push(skill);
        }

        let basic = *index
            .get(&SkillId::basic_attack())
            .ok_or(CatalogError::MissingBasicAttack)?;

        Ok(Self {
            skills,
            index,
            basic,
        })
    }

    pub fn lookup(&self, id: &SkillId) -> Result<&Skill, UnknownSkillError> {
        self.index
            .get(id)
            .map(|&i| &self.skills[i])
            .ok_or_else(|| UnknownSkillError {
                skill_id: id.clone(),
            })
    }

    pub fn contains(&self, id: &SkillId) -> bool {
        self.index.contains_key(id)
    }

    /// Skill by 1-based catalog position.
    pub fn by_number(&self, number: usize) -> Option<&Skill> {
        number.checked_sub(1).and_then(|i| self.skills.get(i))
    }

    /// 1-based catalog position of a skill.
    pub fn number_of(&self, id: &SkillId) -> Option<usize> {
        self.index.get(id).map(|i| i + 1)
    }

    pub fn basic_attack(&self) -> &Skill {
        &self.skills[self.basic]
    }

    /// Picks a skill for `combatant` by weight.
    ///
    /// Candidates are the non-basic skills with a positive weight that are
    /// off cooldown. Falls back to the basic attack when none qualify. Pure
    /// in `seed`.
    pub fn choose_weighted(&self, combatant: &Combatant, seed: u64) -> &Skill {
        let candidates: Vec<&Skill> = self
            .skills
            .iter()
            .filter(|s| !s.is_basic_attack() && s.weight > 0 && combatant.is_ready(&s.id))
            .collect();

        let total: u64 = candidates.iter().map(|s| u64::from(s.weight)).sum();
        if total == 0 {
            return self.basic_attack();
        }

        let rng = PcgRng;
        let wide = (u64::from(rng.next_u32(seed)) << 32) | u64::from(rng.next_u32(!seed));
        let mut roll = wide % total;

        for skill in &candidates {
            let weight = u64::from(skill.weight);
            if roll < weight {
                return skill;
            }
            roll -= weight;
        }

        self.basic_attack()
    }

    /// Skills in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

fn validate_skill(position: usize, spec: SkillSpec) -> Result<Skill, CatalogError> {
    let label = spec.id.clone().unwrap_or_else(|| "<unnamed>".to_owned());
    let missing = |field| CatalogError::MissingField {
        index: position + 1,
        skill: label.clone(),
        field,
    };

    let id = spec.id.clone().ok_or_else(|| missing("id"))?;
    let name = spec.name.clone().ok_or_else(|| missing("name"))?;
    let base_raw = spec.base_damage.ok_or_else(|| missing("base_damage"))?;
    let cooldown_raw = spec.cooldown_turns.ok_or_else(|| missing("cooldown_turns"))?;

    let base_damage = to_u32(&id, "base_damage", base_raw)?;
    let max_damage = match spec.max_damage {
        Some(raw) => to_u32(&id, "max_damage", raw)?,
        None => base_damage,
    };
    if max_damage < base_damage {
        return Err(CatalogError::DamageRange {
            skill: id,
            base: base_damage,
            max: max_damage,
        });
    }

    let cooldown_turns = to_u32(&id, "cooldown_turns", cooldown_raw)?;
    let weight = to_u32(&id, "weight", spec.weight.unwrap_or(0))?;

    let status_effects = spec
        .status_effects
        .into_iter()
        .enumerate()
        .map(|(i, template)| validate_status(&id, i + 1, template))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Skill {
        id: SkillId::new(id),
        name,
        base_damage,
        max_damage,
        cooldown_turns,
        weight,
        status_effects,
    })
}

fn validate_status(
    skill: &str,
    index: usize,
    spec: StatusTemplateSpec,
) -> Result<StatusTemplate, CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidStatus {
        skill: skill.to_owned(),
        index,
        reason,
    };

    let kind = spec.kind.ok_or_else(|| invalid("missing `kind`".into()))?;
    let magnitude = to_u32(skill, "status magnitude", spec.magnitude.unwrap_or(0))?;
    let duration_raw = spec
        .duration
        .ok_or_else(|| invalid("missing `duration`".into()))?;
    let duration = to_u32(skill, "status duration", duration_raw)?;
    if duration == 0 {
        return Err(invalid("duration must be at least 1".into()));
    }

    let chance_percent = spec.chance_percent.unwrap_or(100);
    if !(1..=100).contains(&chance_percent) {
        return Err(invalid(format!(
            "chance_percent {chance_percent} outside 1..=100"
        )));
    }

    Ok(StatusTemplate {
        kind,
        magnitude,
        duration,
        target: spec.target.unwrap_or(EffectTarget::Opponent),
        chance_percent: chance_percent as u32,
    })
}

fn to_u32(skill: &str, field: &'static str, value: i64) -> Result<u32, CatalogError> {
    if value < 0 {
        return Err(CatalogError::NegativeValue {
            skill: skill.to_owned(),
            field,
            value,
        });
    }
    u32::try_from(value).map_err(|_| CatalogError::OutOfRange {
        skill: skill.to_owned(),
        field,
        value,
        max: i64::from(u32::MAX),
    })
}
