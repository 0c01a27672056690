/// Battle rules configuration: constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DuelConfig {
    /// HP (and max HP) every combatant starts a battle with.
    pub starting_hp: u32,
}

impl DuelConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of simultaneously active statuses on one combatant.
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Participants per battle.
    pub const SEATS: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_STARTING_HP: u32 = 1200;
    /// Combatants are never seated already defeated.
    pub const MIN_STARTING_HP: u32 = 1;

    pub fn new() -> Self {
        Self {
            starting_hp: Self::DEFAULT_STARTING_HP,
        }
    }

    pub fn with_starting_hp(starting_hp: u32) -> Self {
        Self { starting_hp }
    }

    /// HP a newly seated combatant receives, never below [`Self::MIN_STARTING_HP`].
    pub fn seat_hp(&self) -> u32 {
        self.starting_hp.max(Self::MIN_STARTING_HP)
    }
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self::new()
    }
}
