// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![cfg(feature = "runtime-tokio")]

use pacer::prelude::*;
use pacer::Origin;
use pacer_test_utils::test_data::{greet, person_alice, person_bob};
use pacer_test_utils::{assert_pending, settle, take_ready, CallRecorder, Greeting, TestError};
use std::time::Duration;
use tokio::time::advance;

const WAIT: Duration = Duration::from_millis(100);

#[tokio::test(start_paused = true)]
async fn test_throttle_leading_and_trailing_runs() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let throttled = throttle(recorder.echo(), WAIT);

    // Act
    let mut leading = throttled.call(0);
    advance(Duration::from_millis(30)).await;
    let mut trailing = throttled.call(1);
    advance(Duration::from_millis(30)).await;
    let mut ignored = throttled.call(2);

    // Assert
    assert_eq!(recorder.count(), 1);
    assert_eq!(take_ready(&mut ignored), Err(PacerError::Ignored));
    assert!(throttled.has_pending());

    advance(Duration::from_millis(39)).await;
    settle().await;
    assert_eq!(recorder.count(), 1);
    assert_pending(&mut trailing);

    advance(Duration::from_millis(1)).await;
    settle().await;
    assert_eq!(recorder.offsets(), vec![0, 100]);
    assert_eq!(recorder.args(), vec![0, 1]);
    assert_eq!(take_ready(&mut leading), Ok(0));
    assert_eq!(take_ready(&mut trailing), Ok(1));
    assert!(!throttled.has_pending());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_throttle_runs_immediately_after_interval() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let throttled = throttle(recorder.echo(), WAIT);

    // Act
    let first = throttled.call(1);
    advance(Duration::from_millis(150)).await;
    let second = throttled.call(2);
    settle().await;

    // Assert
    assert_eq!(first.await, Ok(1));
    assert_eq!(second.await, Ok(2));
    assert_eq!(recorder.offsets(), vec![0, 150]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_throttle_trailing_run_starts_new_interval() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let throttled = throttle(recorder.echo(), WAIT);
    let _leading = throttled.call(0);
    advance(Duration::from_millis(50)).await;
    let _trailing = throttled.call(1);
    advance(Duration::from_millis(50)).await;
    settle().await;

    // Act
    advance(Duration::from_millis(20)).await;
    let mut next = throttled.call(2);

    // Assert
    assert_eq!(recorder.offsets(), vec![0, 100]);
    assert!(throttled.has_pending());
    assert_pending(&mut next);

    advance(Duration::from_millis(80)).await;
    settle().await;
    assert_eq!(take_ready(&mut next), Ok(2));
    assert_eq!(recorder.offsets(), vec![0, 100, 200]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_throttle_leading_call_supersedes_running_trailing_call() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let throttled = throttle(recorder.delayed(Duration::from_millis(300)), WAIT);
    let _leading = throttled.call(0);
    advance(Duration::from_millis(30)).await;
    let mut trailing = throttled.call(1);
    advance(Duration::from_millis(70)).await;
    settle().await;
    assert_eq!(recorder.args(), vec![0, 1]);

    // Act
    advance(WAIT).await;
    let next = throttled.call(2);

    // Assert
    assert_eq!(
        take_ready(&mut trailing),
        Err(PacerError::superseded(Origin::Throttle))
    );
    assert_eq!(next.await, Ok(2));
    assert_eq!(recorder.args(), vec![0, 1, 2]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_throttle_cancel_rejects_trailing_and_is_idempotent() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let throttled = throttle(recorder.echo(), WAIT);
    let leading = throttled.call(0);
    advance(Duration::from_millis(10)).await;
    let mut trailing = throttled.call(1);

    // Act
    throttled.cancel();
    throttled.cancel();
    advance(Duration::from_millis(200)).await;
    settle().await;

    // Assert
    assert_eq!(
        take_ready(&mut trailing),
        Err(PacerError::canceled(Origin::Throttle))
    );
    assert_eq!(leading.await, Ok(0));
    assert_eq!(recorder.args(), vec![0]);
    assert!(!throttled.has_pending());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_throttle_pause_and_resume() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let throttled = throttle(recorder.echo(), WAIT);
    let _leading = throttled.call(0);

    // Act
    throttled.pause();
    let mut rejected = throttled.call(1);

    // Assert
    assert!(throttled.is_paused());
    assert_eq!(
        take_ready(&mut rejected),
        Err(PacerError::paused(Origin::Throttle))
    );
    assert!(!throttled.has_pending());

    throttled.resume();
    advance(WAIT).await;
    let resumed = throttled.call(2);
    settle().await;
    assert_eq!(resumed.await, Ok(2));
    assert_eq!(recorder.args(), vec![0, 2]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_throttle_paused_trailing_call_still_runs() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let throttled = throttle(recorder.echo(), WAIT);
    let _leading = throttled.call(0);
    advance(Duration::from_millis(10)).await;
    let trailing = throttled.call(1);

    // Act
    throttled.pause();
    advance(Duration::from_millis(90)).await;
    settle().await;

    // Assert
    assert_eq!(trailing.await, Ok(1));
    assert_eq!(recorder.offsets(), vec![0, 100]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_throttle_propagates_target_failure() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let throttled = throttle(recorder.failing("offline"), WAIT);

    // Act
    let call = throttled.call(1);
    settle().await;

    // Assert
    assert_eq!(
        call.await,
        Err(PacerError::Target(TestError::new("offline")))
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_throttle_trailing_call_keeps_its_receiver() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<Greeting>::new();
    let throttled = throttle(
        recorder.map(|greeting: Greeting| Ok(greeting.render())),
        WAIT,
    );

    // Act
    let leading = throttled.call(greet(person_alice(), "Hello"));
    let trailing = throttled.call(greet(person_bob(), "Bye"));
    advance(WAIT).await;
    settle().await;

    // Assert
    assert_eq!(leading.await, Ok("Hello, Alice".to_string()));
    assert_eq!(trailing.await, Ok("Bye, Bob".to_string()));
    assert_eq!(recorder.args()[1].receiver, person_bob());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_throttle_leading_panic_keeps_trailing_run() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let throttled = throttle(
        recorder.map(|n: u32| {
            if n == 1 {
                panic!("target exploded");
            }
            Ok(n)
        }),
        WAIT,
    );

    // Act
    let mut leading = throttled.call(1);
    let trailing = throttled.call(2);
    advance(WAIT).await;
    settle().await;

    // Assert
    assert_eq!(
        take_ready(&mut leading),
        Err(PacerError::abandoned(Origin::Throttle))
    );
    assert_eq!(trailing.await, Ok(2));
    assert_eq!(recorder.offsets(), vec![0, 100]);
    Ok(())
}

#[test]
#[should_panic(expected = "Tokio 1.x runtime")]
fn test_throttle_call_outside_tokio_runtime_panics() {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let throttled = throttle(recorder.echo(), WAIT);

    // Act
    let _ = throttled.call(1);
}
