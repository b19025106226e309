// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::FutureExt;
use pacer_core::Deferred;
use std::fmt::Debug;

/// Yields to the runtime a few times so spawned timers and target futures run.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// Panics if `deferred` has already settled.
pub fn assert_pending<T, E>(deferred: &mut Deferred<T, E>)
where
    T: Debug,
    E: Debug,
{
    if let Some(outcome) = (&mut *deferred).now_or_never() {
        panic!("Unexpected settled call, expected it to be pending: {outcome:?}");
    }
}

/// Takes the outcome of a settled `deferred`, panicking if it is still pending.
pub fn take_ready<T, E>(deferred: &mut Deferred<T, E>) -> pacer_core::Result<T, E> {
    (&mut *deferred)
        .now_or_never()
        .expect("expected the call to be settled")
}
