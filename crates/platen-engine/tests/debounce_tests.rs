//! Debounced prompt-refresh behavior
//!
//! Real-clock tests with wide margins: the quiescence windows here are
//! an order of magnitude larger than the scheduler jitter they tolerate.

use platen_engine::engine::prompts;
use platen_engine::{EngineConfig, Phase};
use platen_order::SessionId;
use platen_test_utils::engine_with_recorder;
use std::time::Duration;
use tokio::time::sleep;

fn config(models_dir: &std::path::Path, debounce: Duration) -> EngineConfig {
    EngineConfig::new()
        .with_models_dir(models_dir)
        .with_debounce_delay(debounce)
}

/// Count of actionable prompts carrying the finish-reminder text
fn refresh_count(messenger: &platen_test_utils::RecordingMessenger) -> usize {
    messenger
        .actionable_prompt_texts()
        .iter()
        .filter(|t| t.as_str() == prompts::FINISH_WHEN_READY)
        .count()
}

#[tokio::test]
async fn burst_of_deliveries_yields_one_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, messenger) = engine_with_recorder(
        config(dir.path(), Duration::from_millis(200)),
        1.0,
    );
    let id = SessionId::new(1);

    engine.start(id).await.unwrap();
    engine
        .submit_order(id, "a 1\nb 1\nc 1")
        .await
        .unwrap();
    // One finish prompt issued with the order acceptance.
    assert_eq!(refresh_count(&messenger), 1);

    engine.deliver(id, "a.stl", b"m").await.unwrap();
    engine.deliver(id, "b.stl", b"m").await.unwrap();
    engine.deliver(id, "c.stl", b"m").await.unwrap();

    sleep(Duration::from_millis(600)).await;
    assert_eq!(refresh_count(&messenger), 2);

    let session = engine.store().session(id);
    assert!(!session.lock().await.debounce.is_armed());
}

#[tokio::test]
async fn window_restarts_on_each_delivery() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, messenger) = engine_with_recorder(
        config(dir.path(), Duration::from_millis(400)),
        1.0,
    );
    let id = SessionId::new(2);

    engine.start(id).await.unwrap();
    engine.submit_order(id, "a 1\nb 1").await.unwrap();

    engine.deliver(id, "a.stl", b"m").await.unwrap();
    sleep(Duration::from_millis(200)).await;
    engine.deliver(id, "b.stl", b"m").await.unwrap();
    sleep(Duration::from_millis(200)).await;

    // 400ms after the first delivery, but only 200ms after the last:
    // the first timer was superseded and must not have fired.
    assert_eq!(refresh_count(&messenger), 1);

    sleep(Duration::from_millis(500)).await;
    assert_eq!(refresh_count(&messenger), 2);
}

#[tokio::test]
async fn refresh_replaces_the_stale_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, messenger) = engine_with_recorder(
        config(dir.path(), Duration::from_millis(100)),
        1.0,
    );
    let id = SessionId::new(3);

    engine.start(id).await.unwrap();
    engine.submit_order(id, "a 1").await.unwrap();
    engine.deliver(id, "a.stl", b"m").await.unwrap();
    sleep(Duration::from_millis(400)).await;

    // The refresh retracted the acceptance-time finish prompt before
    // issuing its own; exactly one of the two is still live.
    assert_eq!(refresh_count(&messenger), 2);
    let retracted = messenger
        .events()
        .iter()
        .filter(|e| {
            matches!(
                e,
                platen_test_utils::MessengerEvent::Retraction { found: true, .. }
            )
        })
        .count();
    assert_eq!(retracted, 1);

    let session = engine.store().session(id);
    assert!(session.lock().await.pending_prompt.is_some());
}

#[tokio::test]
async fn reset_cancels_the_pending_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, messenger) = engine_with_recorder(
        config(dir.path(), Duration::from_millis(200)),
        1.0,
    );
    let id = SessionId::new(4);

    engine.start(id).await.unwrap();
    engine.submit_order(id, "a 1").await.unwrap();
    engine.deliver(id, "a.stl", b"m").await.unwrap();
    engine.reset(id).await.unwrap();

    let before = refresh_count(&messenger);
    sleep(Duration::from_millis(600)).await;
    assert_eq!(refresh_count(&messenger), before);
    assert_eq!(engine.phase(id).await, Phase::AwaitingOrder);

    let session = engine.store().session(id);
    let state = session.lock().await;
    assert!(!state.debounce.is_armed());
    assert!(state.pending_prompt.is_none());
}

#[tokio::test]
async fn finish_before_the_window_elapses_cancels_the_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, messenger) = engine_with_recorder(
        config(dir.path(), Duration::from_millis(200)),
        1.0,
    );
    let id = SessionId::new(5);

    engine.start(id).await.unwrap();
    engine.submit_order(id, "a 1").await.unwrap();
    engine.deliver(id, "a.stl", b"m").await.unwrap();
    engine.finish(id).await.unwrap();
    assert_eq!(engine.phase(id).await, Phase::Idle);

    let before = refresh_count(&messenger);
    sleep(Duration::from_millis(600)).await;
    assert_eq!(refresh_count(&messenger), before);
    assert_eq!(messenger.prompt_texts().last().unwrap(), prompts::COMPLETED);
}

#[tokio::test]
async fn timers_are_per_session() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, messenger) = engine_with_recorder(
        config(dir.path(), Duration::from_millis(150)),
        1.0,
    );
    let a = SessionId::new(6);
    let b = SessionId::new(7);

    for id in [a, b] {
        engine.start(id).await.unwrap();
        engine.submit_order(id, "a 1").await.unwrap();
        engine.deliver(id, "a.stl", b"m").await.unwrap();
    }
    engine.reset(a).await.unwrap();

    sleep(Duration::from_millis(500)).await;

    // Session b's timer fired; session a's was cancelled by the reset.
    let refreshes: Vec<SessionId> = messenger
        .events()
        .iter()
        .filter_map(|e| match e {
            platen_test_utils::MessengerEvent::Prompt {
                session,
                text,
                actionable: true,
                ..
            } if text == prompts::FINISH_WHEN_READY => Some(*session),
            _ => None,
        })
        .collect();
    // Two acceptance-time prompts plus exactly one timer refresh, for b.
    assert_eq!(refreshes.len(), 3);
    assert_eq!(*refreshes.last().unwrap(), b);
}
