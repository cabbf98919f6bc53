mod common;

use std::time::Duration;

use chat_queue_core::Completion;
use chat_queue_engine::{ArmedWait, CompletionSettings, CompletionStrategy, HostAdapter};
use common::{init_logging, FakeHost};
use tokio::time::Instant;

fn assert_between(elapsed: Duration, min_ms: u64, max_ms: u64) {
    assert!(
        elapsed >= Duration::from_millis(min_ms) && elapsed <= Duration::from_millis(max_ms),
        "elapsed {elapsed:?} outside {min_ms}..={max_ms} ms"
    );
}

fn settings(strategy: CompletionStrategy) -> CompletionSettings {
    CompletionSettings {
        strategy,
        poll_interval: Duration::from_millis(500),
        start_grace: Duration::from_secs(2),
        timeout: Duration::from_secs(20),
    }
}

#[tokio::test(start_paused = true)]
async fn event_wait_ends_on_the_idle_event() {
    init_logging();
    let host = FakeHost::new(Duration::from_secs(3));
    let settings = settings(CompletionStrategy::Event);

    let armed = ArmedWait::arm(&host, &settings);
    assert!(matches!(armed, ArmedWait::Event(_)));
    let started = Instant::now();
    host.submit().await.unwrap();

    assert_eq!(armed.wait(&host, &settings).await, Completion::Finished);
    assert_between(started.elapsed(), 3_000, 3_010);
}

#[tokio::test(start_paused = true)]
async fn event_wait_times_out() {
    init_logging();
    let host = FakeHost::new(Duration::from_secs(600));
    let settings = settings(CompletionStrategy::Event);

    let armed = ArmedWait::arm(&host, &settings);
    host.submit().await.unwrap();

    assert_eq!(armed.wait(&host, &settings).await, Completion::TimedOut);
}

#[tokio::test(start_paused = true)]
async fn poll_wait_ends_after_busy_turns_idle() {
    init_logging();
    let host = FakeHost::new(Duration::from_millis(2200));
    let settings = settings(CompletionStrategy::Poll);

    let armed = ArmedWait::arm(&host, &settings);
    assert!(matches!(armed, ArmedWait::Poll));
    let started = Instant::now();
    host.submit().await.unwrap();

    assert_eq!(armed.wait(&host, &settings).await, Completion::Finished);
    assert_between(started.elapsed(), 2_500, 2_510);
}

#[tokio::test(start_paused = true)]
async fn poll_wait_accepts_an_idle_host_after_the_grace_period() {
    init_logging();
    let host = FakeHost::new(Duration::from_secs(1));
    let settings = settings(CompletionStrategy::Poll);

    // Nothing submitted: the host never reports busy.
    let started = Instant::now();
    let completion = ArmedWait::arm(&host, &settings).wait(&host, &settings).await;

    assert_eq!(completion, Completion::Finished);
    assert_between(started.elapsed(), 2_000, 2_010);
}

#[tokio::test(start_paused = true)]
async fn poll_wait_times_out_on_a_host_stuck_busy() {
    init_logging();
    let host = FakeHost::new(Duration::from_secs(600));
    let settings = settings(CompletionStrategy::Poll);

    let armed = ArmedWait::arm(&host, &settings);
    host.submit().await.unwrap();
    let started = Instant::now();

    assert_eq!(armed.wait(&host, &settings).await, Completion::TimedOut);
    assert_between(started.elapsed(), 20_000, 20_010);
}

#[test]
fn event_strategy_resolves_to_polling_for_a_host_without_events() {
    init_logging();
    let silent = FakeHost::new(Duration::from_secs(1)).without_events();
    let chatty = FakeHost::new(Duration::from_secs(1));
    let event = settings(CompletionStrategy::Event);

    assert_eq!(event.clone().resolved_for(&silent).strategy, CompletionStrategy::Poll);
    assert_eq!(event.clone().resolved_for(&chatty), event);
    assert_eq!(
        settings(CompletionStrategy::Poll).resolved_for(&chatty).strategy,
        CompletionStrategy::Poll
    );
}
