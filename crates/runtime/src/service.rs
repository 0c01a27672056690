//! Battle service: per-battle serialization of engine transitions.
//!
//! Every mutating operation follows the same shape:
//!
//! 1. acquire the battle's mutex
//! 2. clone the committed battle into a working copy
//! 3. run the duel-core transition on the working copy
//! 4. save the working copy
//! 5. replace the committed battle, release the mutex, publish events
//!
//! A failure at 3 or 4 drops the working copy, so memory and storage never
//! diverge. The mutex is held from the read through the durable save, which
//! makes "record pending / resolve if complete" a single critical section.
//!
//! Lock order is chat index, then battle. The registry lock is only held to
//! look up or insert a handle, never across an await.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use duel_core::{
    Battle, BattleEngine, BattleId, ChatId, DuelConfig, PlayerId, SkillCatalog, SkillChoice,
    Submission, Winner,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::api::{Result, RuntimeError, SubmitResult};
use crate::events::{EventBus, LifecycleEvent, RoundEvent};
use crate::repository::BattleRepository;

type BattleHandle = Arc<Mutex<Battle>>;

/// Cloneable façade over all battles of a process.
#[derive(Clone)]
pub struct BattleService {
    inner: Arc<Inner>,
}

struct Inner {
    catalog: Arc<SkillCatalog>,
    config: DuelConfig,
    repository: Arc<dyn BattleRepository>,
    events: EventBus,
    battles: RwLock<HashMap<BattleId, BattleHandle>>,
    /// Latest battle of each chat. Its mutex also serializes creation.
    chats: Mutex<HashMap<ChatId, BattleId>>,
}

impl BattleService {
    pub(crate) fn new(
        catalog: Arc<SkillCatalog>,
        config: DuelConfig,
        repository: Arc<dyn BattleRepository>,
        events: EventBus,
        battles: Vec<Battle>,
    ) -> Self {
        let mut chats: HashMap<ChatId, (BattleId, bool, chrono::DateTime<Utc>)> = HashMap::new();
        for battle in &battles {
            let candidate = (battle.battle_id.clone(), battle.is_active(), battle.updated_at);
            let replace = match chats.get(&battle.chat_id) {
                None => true,
                Some((_, active, updated_at)) => {
                    (candidate.1, candidate.2) > (*active, *updated_at)
                }
            };
            if replace {
                chats.insert(battle.chat_id, candidate);
            }
        }

        let battles = battles
            .into_iter()
            .map(|b| (b.battle_id.clone(), Arc::new(Mutex::new(b))))
            .collect();
        let chats = chats
            .into_iter()
            .map(|(chat, (battle_id, _, _))| (chat, battle_id))
            .collect();

        Self {
            inner: Arc::new(Inner {
                catalog,
                config,
                repository,
                events,
                battles: RwLock::new(battles),
                chats: Mutex::new(chats),
            }),
        }
    }

    fn engine(&self) -> BattleEngine<'_> {
        BattleEngine::new(&self.inner.catalog, &self.inner.config)
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.inner.catalog
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Number of battles held in memory (active and finished).
    pub async fn battle_count(&self) -> usize {
        self.inner.battles.read().await.len()
    }

    async fn handle(&self, battle_id: &BattleId) -> Result<BattleHandle> {
        self.inner
            .battles
            .read()
            .await
            .get(battle_id)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownBattle(battle_id.clone()))
    }

    /// Saves `working` and, only on success, makes it the committed state.
    fn commit(&self, committed: &mut Battle, mut working: Battle) -> Result<()> {
        match self.inner.repository.save(&working) {
            Ok(stamp) => {
                working.updated_at = stamp;
                *committed = working;
                Ok(())
            }
            Err(err) => {
                warn!(
                    battle = %committed.battle_id,
                    round = committed.round_number,
                    error = %err,
                    "save failed; transition rolled back"
                );
                Err(err.into())
            }
        }
    }

    /// Creates a battle with both players seated.
    ///
    /// Fails with [`RuntimeError::BattleAlreadyActive`] while the chat's
    /// previous battle is not finished.
    pub async fn create_battle(
        &self,
        chat_id: ChatId,
        player_a: PlayerId,
        player_b: PlayerId,
    ) -> Result<Battle> {
        self.start(chat_id, player_a, Some(player_b)).await
    }

    /// Creates a battle with one seated player, waiting for an opponent.
    pub async fn open_battle(&self, chat_id: ChatId, player_a: PlayerId) -> Result<Battle> {
        self.start(chat_id, player_a, None).await
    }

    async fn start(
        &self,
        chat_id: ChatId,
        player_a: PlayerId,
        player_b: Option<PlayerId>,
    ) -> Result<Battle> {
        let mut chats = self.inner.chats.lock().await;

        if let Some(existing) = chats.get(&chat_id).cloned()
            && let Ok(handle) = self.handle(&existing).await
            && handle.lock().await.is_active()
        {
            return Err(RuntimeError::BattleAlreadyActive {
                chat_id,
                battle_id: existing,
            });
        }

        let battle_id = self.fresh_battle_id().await;
        let engine = self.engine();
        let now = Utc::now();
        let mut battle = engine.open(battle_id.clone(), chat_id, player_a, rand::random(), now);
        if let Some(player_b) = player_b {
            engine.join(&mut battle, player_b)?;
        }

        battle.updated_at = self.inner.repository.save(&battle).map_err(|err| {
            warn!(battle = %battle_id, %chat_id, error = %err, "failed to persist new battle");
            RuntimeError::from(err)
        })?;

        self.inner
            .battles
            .write()
            .await
            .insert(battle_id.clone(), Arc::new(Mutex::new(battle.clone())));
        chats.insert(chat_id, battle_id.clone());
        drop(chats);

        info!(battle = %battle_id, %chat_id, players = battle.combatants.len(), "battle created");
        self.inner.events.publish(LifecycleEvent::BattleCreated {
            battle_id,
            chat_id,
            players: battle.players().collect(),
        });

        Ok(battle)
    }

    async fn fresh_battle_id(&self) -> BattleId {
        let battles = self.inner.battles.read().await;
        loop {
            let id = BattleId::new(format!("{:016x}", rand::random::<u64>()));
            if !battles.contains_key(&id) {
                return id;
            }
        }
    }

    /// Seats the second player of an open battle.
    pub async fn join_battle(&self, battle_id: &BattleId, player: PlayerId) -> Result<Battle> {
        let handle = self.handle(battle_id).await?;
        let mut committed = handle.lock().await;

        let mut working = committed.clone();
        self.engine().join(&mut working, player)?;
        self.commit(&mut committed, working)?;

        let snapshot = committed.clone();
        drop(committed);

        info!(battle = %battle_id, %player, "player joined");
        self.inner.events.publish(LifecycleEvent::PlayerJoined {
            battle_id: battle_id.clone(),
            player_id: player,
        });

        Ok(snapshot)
    }

    /// Locks a player's action; resolves the round when it is the second one.
    ///
    /// Concurrent submissions to the same battle are serialized: exactly one
    /// of two racing submissions observes an empty slot and the round
    /// resolves exactly once.
    pub async fn submit_action(
        &self,
        battle_id: &BattleId,
        player: PlayerId,
        choice: SkillChoice,
    ) -> Result<SubmitResult> {
        let handle = self.handle(battle_id).await?;
        let mut committed = handle.lock().await;

        let mut working = committed.clone();
        let submission = self
            .engine()
            .submit(&mut working, player, choice, Utc::now())
            .inspect_err(|err| {
                debug!(battle = %battle_id, %player, error = %err, "submission rejected")
            })?;
        self.commit(&mut committed, working)?;

        let battle = committed.clone();
        drop(committed);

        match submission {
            Submission::Locked(pending) => {
                debug!(battle = %battle_id, %player, round = battle.round_number, "action locked");
                self.inner.events.publish(RoundEvent::ActionLocked {
                    battle_id: battle_id.clone(),
                    round_number: battle.round_number,
                    player_id: player,
                });
                Ok(SubmitResult::WaitingForOpponent {
                    battle_id: battle_id.clone(),
                    round_number: battle.round_number,
                    player_id: player,
                    skill_id: pending.skill_id,
                })
            }
            Submission::Resolved(outcome) => {
                info!(battle = %battle_id, round = outcome.round_number, "round resolved");
                self.inner.events.publish(RoundEvent::RoundResolved {
                    battle_id: battle_id.clone(),
                    outcome: outcome.clone(),
                });
                if let Some(winner) = battle.winner {
                    self.publish_finished(&battle, winner);
                }
                Ok(SubmitResult::RoundResolved { outcome, battle })
            }
        }
    }

    fn publish_finished(&self, battle: &Battle, winner: Winner) {
        info!(battle = %battle.battle_id, ?winner, "battle finished");
        self.inner.events.publish(LifecycleEvent::BattleFinished {
            battle_id: battle.battle_id.clone(),
            chat_id: battle.chat_id,
            winner,
            rounds: battle.round_number.saturating_sub(1),
        });
    }

    /// Snapshot of a battle, active or finished.
    pub async fn get_status(&self, battle_id: &BattleId) -> Result<Battle> {
        let handle = self.handle(battle_id).await?;
        let battle = handle.lock().await.clone();
        Ok(battle)
    }

    /// Latest battle of a chat, if the chat ever had one.
    pub async fn battle_for_chat(&self, chat_id: ChatId) -> Result<Option<Battle>> {
        let chats = self.inner.chats.lock().await;
        let Some(battle_id) = chats.get(&chat_id) else {
            return Ok(None);
        };
        let handle = self.handle(battle_id).await?;
        let battle = handle.lock().await.clone();
        Ok(Some(battle))
    }

    /// Replaces the seed of a battle that has not resolved any round yet.
    pub async fn reseed(&self, battle_id: &BattleId, seed: u64) -> Result<Battle> {
        let handle = self.handle(battle_id).await?;
        let mut committed = handle.lock().await;

        let mut working = committed.clone();
        self.engine().reseed(&mut working, seed)?;
        self.commit(&mut committed, working)?;

        debug!(battle = %battle_id, seed, "battle reseeded");
        Ok(committed.clone())
    }
}
