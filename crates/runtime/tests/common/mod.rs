#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use duel_content::SkillLoader;
use duel_core::{Battle, BattleId, DuelConfig, SkillCatalog};
use duel_runtime::{
    BattleRepository, InMemoryBattleRepo, RepositoryError, Runtime, RuntimeConfig,
};

pub const CATALOG: &str = r#"(
    skills: [
        (id: "basic_attack", name: "Basic Attack", base_damage: 10, cooldown_turns: 0),
        (id: "strike", name: "Strike", base_damage: 20, cooldown_turns: 2, weight: 2),
        (
            id: "guard",
            name: "Guard",
            base_damage: 0,
            cooldown_turns: 0,
            weight: 1,
            status_effects: [
                (kind: damage_reduction, magnitude: 50, duration: 1, target: caster),
            ],
        ),
        (id: "smash", name: "Smash", base_damage: 40, max_damage: 70, cooldown_turns: 1, weight: 1),
    ],
)"#;

pub fn catalog() -> Arc<SkillCatalog> {
    Arc::new(SkillLoader::from_ron_str(CATALOG).unwrap())
}

pub fn config() -> RuntimeConfig {
    RuntimeConfig {
        duel: DuelConfig::with_starting_hp(100),
        ..RuntimeConfig::default()
    }
}

pub async fn runtime(repository: Arc<dyn BattleRepository>) -> Runtime {
    Runtime::builder()
        .config(config())
        .catalog(catalog())
        .repository(repository)
        .build()
        .await
        .unwrap()
}

/// Repository whose saves can be switched to fail.
#[derive(Default)]
pub struct FlakyRepo {
    pub inner: InMemoryBattleRepo,
    failing: AtomicBool,
}

impl FlakyRepo {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl BattleRepository for FlakyRepo {
    fn save(&self, battle: &Battle) -> Result<DateTime<Utc>, RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Io(std::io::Error::other("disk unavailable")));
        }
        self.inner.save(battle)
    }

    fn load(&self, battle_id: &BattleId) -> Result<Option<Battle>, RepositoryError> {
        self.inner.load(battle_id)
    }

    fn delete(&self, battle_id: &BattleId) -> Result<(), RepositoryError> {
        self.inner.delete(battle_id)
    }

    fn list_ids(&self) -> Result<Vec<BattleId>, RepositoryError> {
        self.inner.list_ids()
    }
}
