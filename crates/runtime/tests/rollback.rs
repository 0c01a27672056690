mod common;

use std::sync::Arc;

use duel_core::{ChatId, ErrorSeverity, PlayerId, SkillChoice};
use duel_runtime::{BattleRepository, RuntimeError, SubmitResult};

#[tokio::test]
async fn failed_save_rolls_back_the_round() {
    let repository = Arc::new(common::FlakyRepo::default());
    let runtime = common::runtime(repository.clone()).await;
    let service = runtime.service();

    let id = service
        .create_battle(ChatId(1), PlayerId(1), PlayerId(2))
        .await
        .unwrap()
        .battle_id;
    service
        .submit_action(&id, PlayerId(1), SkillChoice::explicit("strike"))
        .await
        .unwrap();
    let before = service.get_status(&id).await.unwrap();

    repository.set_failing(true);
    let err = service
        .submit_action(&id, PlayerId(2), SkillChoice::explicit("strike"))
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Storage(_)));
    assert_eq!(err.severity(), ErrorSeverity::Transient);

    let after = service.get_status(&id).await.unwrap();
    assert_eq!(after, before);
    assert_eq!(repository.load(&id).unwrap().unwrap(), before);

    // The same submission succeeds once storage recovers.
    repository.set_failing(false);
    let retried = service
        .submit_action(&id, PlayerId(2), SkillChoice::explicit("strike"))
        .await
        .unwrap();
    assert!(matches!(retried, SubmitResult::RoundResolved { .. }));
    assert_eq!(repository.load(&id).unwrap().unwrap().round_number, 2);
}

#[tokio::test]
async fn failed_create_registers_nothing() {
    let repository = Arc::new(common::FlakyRepo::default());
    let runtime = common::runtime(repository.clone()).await;
    let service = runtime.service();

    repository.set_failing(true);
    let err = service
        .create_battle(ChatId(4), PlayerId(1), PlayerId(2))
        .await
        .unwrap_err();
    assert!(err.severity().is_retryable());
    assert_eq!(service.battle_count().await, 0);
    assert!(service.battle_for_chat(ChatId(4)).await.unwrap().is_none());

    repository.set_failing(false);
    service
        .create_battle(ChatId(4), PlayerId(1), PlayerId(2))
        .await
        .unwrap();
}
