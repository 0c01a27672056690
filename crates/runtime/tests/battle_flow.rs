mod common;

use std::sync::Arc;

use duel_core::{
    ActionTaken, BattleError, BattleStatus, ChatId, PlayerId, SkillChoice, SkillId, StatusKind,
    StruggleReason, Winner,
};
use duel_runtime::{
    Event, InMemoryBattleRepo, LifecycleEvent, RoundEvent, RuntimeError, SubmitResult, Topic,
};

const A: PlayerId = PlayerId(1);
const B: PlayerId = PlayerId(2);
const CHAT: ChatId = ChatId(-100);

fn pick(id: &str) -> SkillChoice {
    SkillChoice::explicit(id)
}

#[tokio::test]
async fn strike_against_guard_resolves_round_one() {
    let runtime = common::runtime(Arc::new(InMemoryBattleRepo::new())).await;
    let service = runtime.service();
    let battle = service.create_battle(CHAT, A, B).await.unwrap();
    let id = battle.battle_id.clone();
    assert_eq!(battle.status, BattleStatus::InProgress);

    let first = service.submit_action(&id, A, pick("strike")).await.unwrap();
    assert_eq!(
        first,
        SubmitResult::WaitingForOpponent {
            battle_id: id.clone(),
            round_number: 1,
            player_id: A,
            skill_id: SkillId::from("strike"),
        }
    );

    let SubmitResult::RoundResolved { outcome, battle } =
        service.submit_action(&id, B, pick("guard")).await.unwrap()
    else {
        panic!("second submission must resolve the round");
    };

    assert_eq!(outcome.round_number, 1);
    assert_eq!(outcome.side(A).unwrap().damage_dealt, 20);
    assert_eq!(battle.combatant(B).unwrap().hp, 80);
    assert_eq!(battle.combatant(A).unwrap().hp, 100);
    assert_eq!(battle.combatant(A).unwrap().cooldown(&SkillId::from("strike")), 2);
    assert!(
        battle
            .combatant(B)
            .unwrap()
            .statuses
            .has(StatusKind::DamageReduction)
    );
    assert_eq!(battle.round_number, 2);
    assert!(battle.pending_actions.is_empty());
}

#[tokio::test]
async fn cooling_strike_struggles_while_opponent_acts() {
    let runtime = common::runtime(Arc::new(InMemoryBattleRepo::new())).await;
    let service = runtime.service();
    let id = service.create_battle(CHAT, A, B).await.unwrap().battle_id;

    service.submit_action(&id, A, pick("strike")).await.unwrap();
    service.submit_action(&id, B, pick("basic_attack")).await.unwrap();

    service.submit_action(&id, A, pick("strike")).await.unwrap();
    let SubmitResult::RoundResolved { outcome, battle } = service
        .submit_action(&id, B, pick("basic_attack"))
        .await
        .unwrap()
    else {
        panic!("expected resolution");
    };

    let a = outcome.side(A).unwrap();
    assert_eq!(
        a.action,
        ActionTaken::Struggle(StruggleReason::OnCooldown { remaining: 2 })
    );
    assert_eq!(a.damage_dealt, 0);
    assert_eq!(battle.combatant(B).unwrap().hp, 80);
    assert_eq!(battle.combatant(A).unwrap().hp, 80);
}

#[tokio::test]
async fn second_battle_in_chat_is_rejected_until_finished() {
    let runtime = common::runtime(Arc::new(InMemoryBattleRepo::new())).await;
    let service = runtime.service();
    let first = service.create_battle(CHAT, A, B).await.unwrap();

    let err = service.create_battle(CHAT, A, B).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::BattleAlreadyActive { ref battle_id, .. } if battle_id == &first.battle_id
    ));
    assert_eq!(service.get_status(&first.battle_id).await.unwrap(), first);

    service.create_battle(ChatId(5), A, B).await.unwrap();
    assert_eq!(service.battle_count().await, 2);
}

#[tokio::test]
async fn finished_battle_stays_queryable_and_frees_the_chat() {
    let runtime = common::runtime(Arc::new(InMemoryBattleRepo::new())).await;
    let mut lifecycle = runtime.subscribe(Topic::Lifecycle);
    let service = runtime.service();
    let id = service.create_battle(CHAT, A, B).await.unwrap().battle_id;

    // Smash deals 40..=70 and basic attack 10, so B falls first.
    let mut rounds = 0;
    loop {
        let choice = if rounds % 2 == 0 { "smash" } else { "basic_attack" };
        service.submit_action(&id, A, pick(choice)).await.unwrap();
        let result = service.submit_action(&id, B, pick("basic_attack")).await.unwrap();
        rounds += 1;
        if let SubmitResult::RoundResolved { battle, .. } = result
            && battle.status == BattleStatus::Finished
        {
            assert_eq!(battle.winner, Some(Winner::Player(A)));
            break;
        }
        assert!(rounds < 10, "battle should end quickly");
    }

    let err = service.submit_action(&id, A, pick("strike")).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Battle(BattleError::BattleFinished(_))));

    let finished = service.get_status(&id).await.unwrap();
    assert_eq!(finished.status, BattleStatus::Finished);
    assert_eq!(
        service.battle_for_chat(CHAT).await.unwrap().unwrap().battle_id,
        id
    );

    let next = service.create_battle(CHAT, B, A).await.unwrap();
    assert_ne!(next.battle_id, id);
    assert_eq!(
        service.battle_for_chat(CHAT).await.unwrap().unwrap().battle_id,
        next.battle_id
    );

    let mut saw_finished = false;
    while let Ok(event) = lifecycle.try_recv() {
        if let Event::Lifecycle(LifecycleEvent::BattleFinished { battle_id, winner, .. }) = event {
            assert_eq!(battle_id, id);
            assert_eq!(winner, Winner::Player(A));
            saw_finished = true;
        }
    }
    assert!(saw_finished);
}

#[tokio::test]
async fn rejected_submissions_leave_battle_unchanged() {
    let runtime = common::runtime(Arc::new(InMemoryBattleRepo::new())).await;
    let service = runtime.service();
    let id = service.create_battle(CHAT, A, B).await.unwrap().battle_id;
    service.submit_action(&id, A, pick("strike")).await.unwrap();
    let before = service.get_status(&id).await.unwrap();

    let duplicate = service.submit_action(&id, A, pick("guard")).await.unwrap_err();
    assert!(matches!(
        duplicate,
        RuntimeError::Battle(BattleError::DuplicateSubmission { round: 1, .. })
    ));

    let stranger = service
        .submit_action(&id, PlayerId(99), pick("strike"))
        .await
        .unwrap_err();
    assert!(matches!(
        stranger,
        RuntimeError::Battle(BattleError::NotAParticipant { .. })
    ));

    let unknown = service.submit_action(&id, B, pick("teleport")).await.unwrap_err();
    assert!(matches!(
        unknown,
        RuntimeError::Battle(BattleError::UnknownSkill(_))
    ));

    let missing = service
        .submit_action(&duel_core::BattleId::from("nope"), A, pick("strike"))
        .await
        .unwrap_err();
    assert!(matches!(missing, RuntimeError::UnknownBattle(_)));

    assert_eq!(service.get_status(&id).await.unwrap(), before);
}

#[tokio::test]
async fn open_battle_accepts_early_action_then_join() {
    let runtime = common::runtime(Arc::new(InMemoryBattleRepo::new())).await;
    let mut round_events = runtime.subscribe(Topic::Round);
    let service = runtime.service();

    let battle = service.open_battle(CHAT, A).await.unwrap();
    assert_eq!(battle.status, BattleStatus::WaitingForPlayers);
    let id = battle.battle_id;

    let locked = service
        .submit_action(&id, A, SkillChoice::Default)
        .await
        .unwrap();
    assert!(matches!(locked, SubmitResult::WaitingForOpponent { .. }));

    let joined = service.join_battle(&id, B).await.unwrap();
    assert_eq!(joined.status, BattleStatus::InProgress);
    assert_eq!(joined.pending_actions.len(), 1);

    let resolved = service.submit_action(&id, B, pick("guard")).await.unwrap();
    assert!(matches!(resolved, SubmitResult::RoundResolved { .. }));

    let first = round_events.recv().await.unwrap();
    assert!(matches!(
        first,
        Event::Round(RoundEvent::ActionLocked { player_id: A, round_number: 1, .. })
    ));
    let second = round_events.recv().await.unwrap();
    assert!(matches!(second, Event::Round(RoundEvent::RoundResolved { .. })));
}

#[tokio::test]
async fn reseed_is_locked_after_first_action() {
    let runtime = common::runtime(Arc::new(InMemoryBattleRepo::new())).await;
    let service = runtime.service();
    let id = service.create_battle(CHAT, A, B).await.unwrap().battle_id;

    assert_eq!(service.reseed(&id, 42).await.unwrap().seed, 42);
    service.submit_action(&id, A, pick("strike")).await.unwrap();

    let err = service.reseed(&id, 7).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Battle(BattleError::SeedLocked(_))));
    assert_eq!(service.get_status(&id).await.unwrap().seed, 42);
}
