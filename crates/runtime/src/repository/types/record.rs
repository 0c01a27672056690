//! Stored form of a battle.

use chrono::{DateTime, Utc};
use duel_core::{BATTLE_SCHEMA_VERSION, Battle, BattleId, ChatId};
use serde::{Deserialize, Serialize};

use crate::repository::{RepositoryError, Result};

/// One persisted row per battle.
///
/// `state_json` holds the complete serialized [`Battle`], pending actions
/// included. The outer columns duplicate the fields needed to index records
/// without decoding the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub schema_version: u32,
    pub battle_id: BattleId,
    pub chat_id: ChatId,
    pub state_json: String,
    pub updated_at: DateTime<Utc>,
}

impl BattleRecord {
    /// Serialize `battle` with its `updated_at` replaced by `stamp`.
    pub fn encode(battle: &Battle, stamp: DateTime<Utc>) -> Result<Self> {
        let mut stamped = battle.clone();
        stamped.updated_at = stamp;

        Ok(Self {
            schema_version: stamped.schema_version,
            battle_id: stamped.battle_id.clone(),
            chat_id: stamped.chat_id,
            state_json: serde_json::to_string(&stamped)?,
            updated_at: stamp,
        })
    }

    /// Decode and validate the stored battle.
    ///
    /// Fails on any schema version other than [`BATTLE_SCHEMA_VERSION`] and
    /// on records whose columns disagree with the embedded state.
    pub fn decode(&self) -> Result<Battle> {
        check_version(self.schema_version)?;

        let battle: Battle = serde_json::from_str(&self.state_json)?;
        check_version(battle.schema_version)?;

        if battle.battle_id != self.battle_id || battle.chat_id != self.chat_id {
            return Err(RepositoryError::CorruptedData(format!(
                "record {} holds state of battle {} ({})",
                self.battle_id, battle.battle_id, battle.chat_id
            )));
        }

        Ok(battle)
    }
}

fn check_version(found: u32) -> Result<()> {
    if found != BATTLE_SCHEMA_VERSION {
        return Err(RepositoryError::SchemaMismatch {
            found,
            expected: BATTLE_SCHEMA_VERSION,
        });
    }
    Ok(())
}
