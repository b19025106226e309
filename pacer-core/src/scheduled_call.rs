// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cancellable delayed callbacks.
//!
//! This is the one scheduling primitive the wrappers need: "run this after N",
//! and "never mind" before it fires.

use crate::logging::trace;
use core::time::Duration;
use futures::future::{abortable, AbortHandle};
use pacer_runtime::runtime::Runtime;
use pacer_runtime::timer::Timer;

/// Handle to a callback scheduled on a runtime, cancelled on drop.
///
/// Every scheduled call carries an `id` chosen by its owner. A wrapper keeps at most
/// one handle in its state; when the callback fires it must check, under the state
/// lock, that the stored handle still has its id. A handle that was replaced or
/// dropped in the meantime has been cancelled, and the firing callback does nothing.
///
/// # Example
///
/// ```
/// use pacer_core::ScheduledCall;
/// use pacer_runtime::impls::tokio::TokioRuntime;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let call = ScheduledCall::new::<TokioRuntime, _>(1, Duration::from_millis(10), |id| {
///     println!("timer {id} fired");
/// });
/// assert_eq!(call.id(), 1);
///
/// // Changed our mind: the callback never runs
/// drop(call);
/// # }
/// ```
#[derive(Debug)]
pub struct ScheduledCall {
    id: u64,
    abort: AbortHandle,
}

impl ScheduledCall {
    /// Schedules `on_fire(id)` to run on runtime `R` once `delay` has elapsed.
    pub fn new<R, C>(id: u64, delay: Duration, on_fire: C) -> Self
    where
        R: Runtime,
        C: FnOnce(u64) + Send + 'static,
    {
        let sleep = R::Timer::default().sleep_future(delay);
        let (task, abort) = abortable(async move {
            sleep.await;
            on_fire(id);
        });

        trace!("scheduled call {} in {:?}", id, delay);
        R::spawn(async move {
            let _ = task.await;
        });

        Self { id, abort }
    }

    /// The id this call was scheduled with.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether this handle is the one scheduled with `id`.
    pub fn is(&self, id: u64) -> bool {
        self.id == id
    }

    /// Cancels the call. Same as dropping the handle.
    pub fn cancel(self) {}
}

impl Drop for ScheduledCall {
    fn drop(&mut self) {
        trace!("releasing scheduled call {}", self.id);
        self.abort.abort();
    }
}
