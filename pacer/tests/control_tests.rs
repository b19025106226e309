// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![cfg(feature = "runtime-tokio")]

use pacer::prelude::*;
use pacer_test_utils::{settle, take_ready, CallRecorder};
use std::time::Duration;
use tokio::time::advance;

const WAIT: Duration = Duration::from_millis(100);

fn pause_all(controls: &[&dyn RateControl]) {
    for control in controls {
        control.pause();
    }
}

fn resume_all(controls: &[&dyn RateControl]) {
    for control in controls {
        control.resume();
    }
}

#[tokio::test(start_paused = true)]
async fn test_every_wrapper_pauses_through_the_shared_trait() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let debounced = debounce(recorder.echo(), WAIT, DebounceOptions::default());
    let throttled = throttle(recorder.echo(), WAIT);
    let queue = queue_throttle(recorder.echo(), WAIT);

    // Act
    pause_all(&[&debounced, &throttled, &queue]);
    let mut calls = [debounced.call(1), throttled.call(2), queue.call(3)];

    // Assert
    for call in &mut calls {
        let err = take_ready(call).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Paused);
        assert_eq!(err.reason(), "paused");
    }
    assert!(debounced.is_paused() && throttled.is_paused() && queue.is_paused());
    assert_eq!(recorder.count(), 0);

    resume_all(&[&debounced, &throttled, &queue]);
    let debounced_call = debounced.call(1);
    let throttled_call = throttled.call(2);
    let queued_call = queue.call(3);
    advance(WAIT).await;
    settle().await;

    assert_eq!(debounced_call.await, Ok(1));
    assert_eq!(throttled_call.await, Ok(2));
    assert_eq!(queued_call.await, Ok(3));
    Ok(())
}

#[tokio::test]
async fn test_cancel_with_nothing_pending_is_a_no_op() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let debounced = debounce(recorder.echo(), WAIT, DebounceOptions::default());
    let throttled = throttle(recorder.echo(), WAIT);
    let controls: [&dyn RateControl; 2] = [&debounced, &throttled];

    // Act
    for control in controls {
        control.cancel();
        control.cancel();
    }

    // Assert
    assert!(!debounced.has_pending());
    assert!(!throttled.has_pending());
    assert!(!debounced.is_paused());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_queue_control_clear_through_trait_object() -> anyhow::Result<()> {
    // Arrange
    let recorder = CallRecorder::<u32>::new();
    let queue = queue_throttle(recorder.echo(), WAIT);
    let _running = queue.call(1);
    let mut queued = queue.call(2);
    let control: &dyn QueueControl = &queue;

    // Act
    control.clear();

    // Assert
    assert_eq!(take_ready(&mut queued), Err(PacerError::Cleared));
    assert!(!control.is_paused());
    assert!(queue.is_empty());
    Ok(())
}

#[test]
fn test_wrappers_debug_output() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let _guard = runtime.enter();

    let recorder = CallRecorder::<u32>::new();
    let debounced = debounce(recorder.echo(), WAIT, DebounceOptions::new().immediate(true));
    let queue = queue_throttle(recorder.echo(), WAIT);
    queue.pause();

    let debounced = format!("{debounced:?}");
    let queue = format!("{queue:?}");

    assert!(debounced.starts_with("Debounced"));
    assert!(debounced.contains("immediate: true"));
    assert!(queue.contains("paused: true"));
}
