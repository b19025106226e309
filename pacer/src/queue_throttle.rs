// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Queue-throttle: run every call, one at a time, `wait` apart.
//!
//! Calls are never dropped for being too frequent. Each one is appended to an
//! unbounded FIFO queue and a drain cycle works through it: take the head, invoke the
//! target, then wait `wait` before the next item. An idle queue runs its first item
//! during the call that submitted it.
//!
//! [`clear`](QueueControl::clear) empties the queue and keeps the wrapper usable;
//! [`cancel`](RateControl::cancel) empties it and shuts the wrapper down for good.

use crate::logging::{debug, trace};
use core::fmt;
use core::time::Duration;
use pacer_core::{
    deferred, Deferred, Origin, PacerError, QueueControl, RateControl, Resolver, ScheduledCall,
    Target,
};
use pacer_runtime::mutex::MutexLike;
use pacer_runtime::runtime::Runtime;
use std::collections::VecDeque;

const ORIGIN: Origin = Origin::QueueThrottle;

struct QueuedCall<A, T, E> {
    args: A,
    resolver: Resolver<T, E>,
}

struct State<F, A, T, E> {
    target: F,
    queue: VecDeque<QueuedCall<A, T, E>>,
    running: bool,
    pending_timer: Option<ScheduledCall>,
    next_timer_id: u64,
    canceled: bool,
    paused: bool,
}

type StateOf<F, A> = State<F, A, <F as Target<A>>::Output, <F as Target<A>>::Error>;

/// A queue-throttled function, created by [`queue_throttle`](crate::queue_throttle()).
pub struct QueueThrottled<F, A, R>
where
    F: Target<A>,
    A: Send,
    R: Runtime,
{
    state: R::Mutex<StateOf<F, A>>,
    wait: Duration,
}

impl<F, A, R> Clone for QueueThrottled<F, A, R>
where
    F: Target<A>,
    A: Send,
    R: Runtime,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            wait: self.wait,
        }
    }
}

impl<F, A, R> fmt::Debug for QueueThrottled<F, A, R>
where
    F: Target<A>,
    A: Send,
    R: Runtime,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("QueueThrottled")
            .field("wait", &self.wait)
            .field("queued", &state.queue.len())
            .field("running", &state.running)
            .field("canceled", &state.canceled)
            .field("paused", &state.paused)
            .finish_non_exhaustive()
    }
}

impl<F, A, R> QueueThrottled<F, A, R>
where
    F: Target<A>,
    A: Send + 'static,
    R: Runtime,
{
    /// Wraps `target` so calls run in order, `wait` apart.
    pub fn new(target: F, wait: Duration) -> Self {
        Self {
            state: R::Mutex::new(State {
                target,
                queue: VecDeque::new(),
                running: false,
                pending_timer: None,
                next_timer_id: 0,
                canceled: false,
                paused: false,
            }),
            wait,
        }
    }

    /// Submits a call to the queue.
    ///
    /// If the queue is idle the target runs before this returns. The deferred result
    /// settles once the call's own run completes, or rejects if the queue is paused,
    /// canceled, or cleared first.
    ///
    /// # Panics
    ///
    /// On tokio, panics when called outside a tokio runtime context.
    pub fn call(&self, args: A) -> Deferred<F::Output, F::Error> {
        let mut state = self.state.lock();
        if state.paused {
            debug!("queued call rejected: paused");
            return Deferred::rejected(ORIGIN, PacerError::paused(ORIGIN));
        }
        if state.canceled {
            debug!("queued call rejected: queue canceled");
            return Deferred::rejected(ORIGIN, PacerError::canceled(ORIGIN));
        }

        let (resolver, result) = deferred(ORIGIN);
        state.queue.push_back(QueuedCall { args, resolver });
        trace!("call queued, {} waiting", state.queue.len());

        if !state.running {
            self.drain(&mut state);
        }

        result
    }

    /// Number of calls waiting in the queue.
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Whether no call is waiting in the queue.
    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }

    /// Whether a drain cycle is active, including the delay after the last item.
    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    /// Whether [`cancel`](RateControl::cancel) has been called.
    pub fn is_canceled(&self) -> bool {
        self.state.lock().canceled
    }

    fn drain(&self, state: &mut StateOf<F, A>) {
        if state.canceled {
            return;
        }

        let Some(QueuedCall { args, resolver }) = state.queue.pop_front() else {
            trace!("queue drained");
            state.running = false;
            return;
        };

        state.running = true;
        resolver.settle_from_target::<R, _, _>(&mut state.target, args);

        let id = state.next_timer_id;
        state.next_timer_id += 1;
        let this = self.clone();
        state.pending_timer = Some(ScheduledCall::new::<R, _>(id, self.wait, move |id| {
            this.fire(id);
        }));
    }

    fn fire(&self, id: u64) {
        let mut state = self.state.lock();
        if !state.pending_timer.as_ref().is_some_and(|timer| timer.is(id)) {
            trace!("stale queue timer {} ignored", id);
            return;
        }
        state.pending_timer = None;
        self.drain(&mut state);
    }
}

impl<F, A, R> RateControl for QueueThrottled<F, A, R>
where
    F: Target<A>,
    A: Send + 'static,
    R: Runtime,
{
    fn cancel(&self) {
        let mut state = self.state.lock();
        state.canceled = true;
        state.pending_timer = None;
        debug!("queue canceled, {} calls rejected", state.queue.len());
        for call in state.queue.drain(..) {
            call.resolver.reject(PacerError::canceled(ORIGIN));
        }
    }

    fn pause(&self) {
        self.state.lock().paused = true;
    }

    fn resume(&self) {
        self.state.lock().paused = false;
    }

    fn is_paused(&self) -> bool {
        self.state.lock().paused
    }
}

impl<F, A, R> QueueControl for QueueThrottled<F, A, R>
where
    F: Target<A>,
    A: Send + 'static,
    R: Runtime,
{
    fn clear(&self) {
        let mut state = self.state.lock();
        debug!("queue cleared, {} calls rejected", state.queue.len());
        for call in state.queue.drain(..) {
            call.resolver.reject(PacerError::Cleared);
        }
    }
}
