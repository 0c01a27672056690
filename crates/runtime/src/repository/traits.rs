//! Repository contract for saving and loading battles.

use chrono::{DateTime, Utc};
use duel_core::{Battle, BattleId};

use super::Result;

/// Durable battle storage.
///
/// `save` must be all-or-nothing with respect to concurrent `load`s, including
/// loads from other processes reading the same storage.
pub trait BattleRepository: Send + Sync {
    /// Overwrite the record of `battle`, stamping a fresh `updated_at`.
    ///
    /// Returns the stamp so the caller can mirror it in memory.
    fn save(&self, battle: &Battle) -> Result<DateTime<Utc>>;

    /// Load a battle by id.
    fn load(&self, battle_id: &BattleId) -> Result<Option<Battle>>;

    /// Delete a battle record. Deleting a missing record is not an error.
    fn delete(&self, battle_id: &BattleId) -> Result<()>;

    /// List all stored battle ids, sorted.
    fn list_ids(&self) -> Result<Vec<BattleId>>;

    /// Load every battle that is not finished, pending actions included.
    fn load_all_active(&self) -> Result<Vec<Battle>> {
        let mut active = Vec::new();
        for id in self.list_ids()? {
            if let Some(battle) = self.load(&id)?
                && battle.is_active()
            {
                active.push(battle);
            }
        }
        Ok(active)
    }
}
