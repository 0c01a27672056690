//! File-based BattleRepository implementation.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use duel_core::{Battle, BattleId};

use crate::repository::{BattleRecord, BattleRepository, RepositoryError, Result};

const MAX_KEY_LEN: usize = 128;

/// File-based implementation of BattleRepository.
///
/// # File Format
///
/// Each battle is stored as `battle_{id}.json`, a pretty-printed
/// [`BattleRecord`]. Writes go to a unique temporary file in the same
/// directory, are fsynced, and then renamed over the record, so readers see
/// either the old or the new record and never a partial one.
pub struct FileBattleRepository {
    base_dir: PathBuf,
    temp_counter: AtomicU64,
}

impl FileBattleRepository {
    /// Create a new file-based battle repository.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self {
            base_dir,
            temp_counter: AtomicU64::new(0),
        })
    }

    /// Get the path to a battle file.
    fn battle_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("battle_{key}.json"))
    }

    /// Unique per process and per write.
    fn temp_path(&self, key: &str) -> PathBuf {
        let n = self.temp_counter.fetch_add(1, Ordering::Relaxed);
        self.base_dir
            .join(format!("battle_{key}.json.{}-{n}.tmp", std::process::id()))
    }

    fn write_atomically(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.battle_path(key);
        let temp_path = self.temp_path(key);

        let written = File::create(&temp_path).and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        });
        let renamed = written.and_then(|()| fs::rename(&temp_path, &path));

        if let Err(err) = renamed {
            let _ = fs::remove_file(&temp_path);
            return Err(RepositoryError::Io(err));
        }
        sync_dir(&self.base_dir).map_err(RepositoryError::Io)?;
        Ok(path)
    }
}

/// Flushes directory entries so a completed rename survives a crash.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Battle ids become part of a file name; only `[A-Za-z0-9_-]` is allowed.
fn storage_key(battle_id: &BattleId) -> Result<&str> {
    let key = battle_id.as_str();
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(key)
    } else {
        Err(RepositoryError::InvalidKey(key.to_owned()))
    }
}

impl BattleRepository for FileBattleRepository {
    fn save(&self, battle: &Battle) -> Result<DateTime<Utc>> {
        let key = storage_key(&battle.battle_id)?;
        let stamp = Utc::now();

        let record = BattleRecord::encode(battle, stamp)?;
        let bytes = serde_json::to_vec_pretty(&record)?;
        let path = self.write_atomically(key, &bytes)?;

        tracing::debug!(
            battle = %battle.battle_id,
            round = battle.round_number,
            pending = battle.pending_actions.len(),
            "saved battle to {}",
            path.display()
        );

        Ok(stamp)
    }

    fn load(&self, battle_id: &BattleId) -> Result<Option<Battle>> {
        let key = storage_key(battle_id)?;
        let path = self.battle_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let record: BattleRecord = serde_json::from_slice(&bytes)?;
        if &record.battle_id != battle_id {
            return Err(RepositoryError::CorruptedData(format!(
                "{} contains record of battle {}",
                path.display(),
                record.battle_id
            )));
        }
        let battle = record.decode()?;

        tracing::debug!(battle = %battle_id, "loaded battle from {}", path.display());

        Ok(Some(battle))
    }

    fn delete(&self, battle_id: &BattleId) -> Result<()> {
        let path = self.battle_path(storage_key(battle_id)?);

        if path.exists() {
            fs::remove_file(&path).map_err(RepositoryError::Io)?;
            tracing::debug!(battle = %battle_id, "deleted battle");
        }

        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<BattleId>> {
        let mut ids = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;

        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(key) = filename
                    .strip_prefix("battle_")
                    .and_then(|s| s.strip_suffix(".json"))
            {
                let id = BattleId::new(key);
                if storage_key(&id).is_ok() {
                    ids.push(id);
                }
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}
