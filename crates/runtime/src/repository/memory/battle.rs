//! In-memory BattleRepository implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use duel_core::{Battle, BattleId};

use crate::repository::{BattleRecord, BattleRepository, RepositoryError, Result};

/// In-memory implementation of BattleRepository.
///
/// Records go through the same JSON codec as the file store, so a battle
/// loaded from here is exactly what a restart would observe.
#[derive(Debug, Default)]
pub struct InMemoryBattleRepo {
    records: RwLock<HashMap<BattleId, BattleRecord>>,
}

impl InMemoryBattleRepo {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored record, for inspection.
    pub fn record(&self, battle_id: &BattleId) -> Result<Option<BattleRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.get(battle_id).cloned())
    }

    /// Replace a stored record verbatim.
    pub fn put_record(&self, record: BattleRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.insert(record.battle_id.clone(), record);
        Ok(())
    }
}

impl BattleRepository for InMemoryBattleRepo {
    fn save(&self, battle: &Battle) -> Result<DateTime<Utc>> {
        let stamp = Utc::now();
        let record = BattleRecord::encode(battle, stamp)?;
        self.put_record(record)?;
        Ok(stamp)
    }

    fn load(&self, battle_id: &BattleId) -> Result<Option<Battle>> {
        self.record(battle_id)?
            .map(|record| record.decode())
            .transpose()
    }

    fn delete(&self, battle_id: &BattleId) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records.remove(battle_id);
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<BattleId>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<BattleId> = records.keys().cloned().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
