// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![cfg(feature = "runtime-tokio")]

use pacer::prelude::*;
use pacer::Origin;
use pacer_test_utils::test_data::{greet, person_alice, person_bob, person_charlie};
use pacer_test_utils::{assert_pending, settle, take_ready, CallRecorder, Greeting, TestError};
use std::time::Duration;
use tokio::time::advance;

const WAIT: Duration = Duration::from_millis(50);

#[tokio::test(start_paused = true)]
async fn test_queue_runs_calls_in_order_spaced_by_wait() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let queue = queue_throttle(recorder.echo(), WAIT);

    // Act & Assert
    let first = queue.call(1);
    let second = queue.call(2);
    let third = queue.call(3);
    assert_eq!(recorder.count(), 1);
    assert_eq!(queue.len(), 2);
    assert!(queue.is_running());

    advance(WAIT).await;
    settle().await;
    assert_eq!(recorder.count(), 2);

    advance(WAIT).await;
    settle().await;
    assert_eq!(recorder.offsets(), vec![0, 50, 100]);
    assert_eq!(recorder.args(), vec![1, 2, 3]);
    assert!(queue.is_empty());
    assert!(queue.is_running());

    advance(WAIT).await;
    settle().await;
    assert!(!queue.is_running());

    assert_eq!(first.await, Ok(1));
    assert_eq!(second.await, Ok(2));
    assert_eq!(third.await, Ok(3));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_queue_call_during_final_delay_waits() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let queue = queue_throttle(recorder.echo(), WAIT);
    let _first = queue.call(1);
    settle().await;

    // Act
    advance(Duration::from_millis(20)).await;
    let mut second = queue.call(2);

    // Assert
    assert_eq!(queue.len(), 1);
    assert_pending(&mut second);

    advance(Duration::from_millis(30)).await;
    settle().await;
    assert_eq!(take_ready(&mut second), Ok(2));
    assert_eq!(recorder.offsets(), vec![0, 50]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_queue_idle_call_runs_during_call() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let queue = queue_throttle(recorder.echo(), WAIT);
    let _first = queue.call(1);
    advance(WAIT).await;
    settle().await;
    assert!(!queue.is_running());

    // Act
    advance(Duration::from_millis(500)).await;
    let second = queue.call(2);

    // Assert
    assert_eq!(recorder.count(), 2);
    assert_eq!(recorder.offsets(), vec![0, 550]);
    settle().await;
    assert_eq!(second.await, Ok(2));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_queue_clear_rejects_queued_and_stays_usable() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let queue = queue_throttle(recorder.echo(), WAIT);
    let first = queue.call(1);
    let mut second = queue.call(2);
    let mut third = queue.call(3);

    // Act
    queue.clear();
    let later = queue.call(4);
    advance(WAIT).await;
    settle().await;

    // Assert
    assert_eq!(take_ready(&mut second), Err(PacerError::Cleared));
    assert_eq!(take_ready(&mut third), Err(PacerError::Cleared));
    assert!(!queue.is_canceled());
    assert_eq!(first.await, Ok(1));
    assert_eq!(later.await, Ok(4));
    assert_eq!(recorder.args(), vec![1, 4]);
    assert_eq!(recorder.offsets(), vec![0, 50]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_queue_cancel_is_terminal() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let queue = queue_throttle(recorder.echo(), WAIT);
    let first = queue.call(1);
    let mut second = queue.call(2);

    // Act
    queue.cancel();
    queue.cancel();
    let mut after = queue.call(3);
    advance(Duration::from_millis(200)).await;
    settle().await;

    // Assert
    let canceled: Result<u32, PacerError<TestError>> =
        Err(PacerError::canceled(Origin::QueueThrottle));
    assert_eq!(take_ready(&mut second), canceled);
    assert_eq!(take_ready(&mut after), canceled);
    assert!(queue.is_canceled());
    assert!(queue.is_empty());
    assert_eq!(first.await, Ok(1));
    assert_eq!(recorder.args(), vec![1]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_queue_pause_only_blocks_submission() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let queue = queue_throttle(recorder.echo(), WAIT);
    let _calls = [queue.call(1), queue.call(2), queue.call(3)];

    // Act
    queue.pause();
    let mut rejected = queue.call(4);
    advance(WAIT).await;
    settle().await;
    advance(WAIT).await;
    settle().await;

    // Assert
    assert_eq!(
        take_ready(&mut rejected),
        Err(PacerError::paused(Origin::QueueThrottle))
    );
    assert_eq!(recorder.args(), vec![1, 2, 3]);

    queue.resume();
    let resumed = queue.call(5);
    advance(WAIT).await;
    settle().await;
    assert_eq!(resumed.await, Ok(5));
    assert_eq!(recorder.args(), vec![1, 2, 3, 5]);
    assert_eq!(recorder.offsets(), vec![0, 50, 100, 150]);
    Ok(())
}

#[tokio::test]
async fn test_queue_pause_is_checked_before_cancel() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let queue = queue_throttle(recorder.echo(), WAIT);
    queue.cancel();
    queue.pause();

    // Act
    let mut call = queue.call(1);

    // Assert
    assert_eq!(
        take_ready(&mut call),
        Err(PacerError::paused(Origin::QueueThrottle))
    );
    assert_eq!(recorder.count(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_queue_failure_does_not_stop_the_queue() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let queue = queue_throttle(
        recorder.map(|n: u32| {
            if n % 2 == 0 {
                Err(TestError::new(format!("{n} is even")))
            } else {
                Ok(n * 10)
            }
        }),
        WAIT,
    );

    // Act
    let first = queue.call(1);
    let second = queue.call(2);
    let third = queue.call(3);
    advance(WAIT).await;
    settle().await;
    advance(WAIT).await;
    settle().await;

    // Assert
    assert_eq!(first.await, Ok(10));
    assert_eq!(
        second.await,
        Err(PacerError::Target(TestError::new("2 is even")))
    );
    assert_eq!(third.await, Ok(30));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_queue_slow_target_does_not_delay_next_item() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let queue = queue_throttle(recorder.delayed(Duration::from_millis(200)), WAIT);

    // Act
    let first = queue.call(1);
    let second = queue.call(2);
    advance(WAIT).await;
    settle().await;

    // Assert
    assert_eq!(recorder.offsets(), vec![0, 50]);
    assert_eq!(first.await, Ok(1));
    assert_eq!(second.await, Ok(2));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_queue_keeps_each_receiver() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<Greeting>::new();
    let queue = queue_throttle(
        recorder.map(|greeting: Greeting| Ok(greeting.render())),
        WAIT,
    );

    // Act
    let alice = queue.call(greet(person_alice(), "Hello"));
    let bob = queue.call(greet(person_bob(), "Hi"));
    let charlie = queue.call(greet(person_charlie(), "Hey"));
    advance(WAIT).await;
    settle().await;
    advance(WAIT).await;
    settle().await;

    // Assert
    assert_eq!(alice.await, Ok("Hello, Alice".to_string()));
    assert_eq!(bob.await, Ok("Hi, Bob".to_string()));
    assert_eq!(charlie.await, Ok("Hey, Charlie".to_string()));
    let receivers: Vec<_> = recorder
        .args()
        .into_iter()
        .map(|greeting| greeting.receiver)
        .collect();
    assert_eq!(receivers, vec![person_alice(), person_bob(), person_charlie()]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_queue_keeps_draining_after_target_panics() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let queue = queue_throttle(
        recorder.map(|n: u32| {
            if n == 1 {
                panic!("target exploded");
            }
            Ok(n)
        }),
        WAIT,
    );

    // Act & Assert
    let first = queue.call(0);
    let mut second = queue.call(1);
    let mut third = queue.call(2);

    advance(WAIT).await;
    settle().await;
    assert_eq!(
        take_ready(&mut second),
        Err(PacerError::abandoned(Origin::QueueThrottle))
    );
    assert_pending(&mut third);
    assert!(queue.is_running());

    advance(WAIT).await;
    settle().await;
    assert_eq!(take_ready(&mut third), Ok(2));
    assert_eq!(recorder.offsets(), vec![0, 50, 100]);

    advance(WAIT).await;
    settle().await;
    assert!(!queue.is_running());
    assert_eq!(queue.call(3).await, Ok(3));
    assert_eq!(first.await, Ok(0));
    Ok(())
}
