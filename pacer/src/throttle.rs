// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Throttle: run the target at most once per interval.
//!
//! The first call of an interval runs right away. The first call that arrives before
//! the interval has elapsed is scheduled as a single trailing run at the end of the
//! interval; any further call while that trailing run is waiting rejects as
//! [`Ignored`](pacer_core::PacerError::Ignored).
//!
//! ```text
//! wait = 100ms
//! calls:   0    30   60
//! runs:    0           100 (with the args of the call at 30)
//! ```

use crate::logging::{debug, trace};
use core::fmt;
use core::marker::PhantomData;
use core::time::Duration;
use pacer_core::{
    deferred, Deferred, Origin, PacerError, RateControl, Resolver, ScheduledCall, Target,
};
use pacer_runtime::mutex::MutexLike;
use pacer_runtime::runtime::Runtime;
use pacer_runtime::timer::Timer;

const ORIGIN: Origin = Origin::Throttle;

struct State<F, T, E, I> {
    target: F,
    last_run: Option<I>,
    pending_timer: Option<ScheduledCall>,
    pending: Option<Resolver<T, E>>,
    next_timer_id: u64,
    paused: bool,
}

type StateOf<F, A, R> = State<
    F,
    <F as Target<A>>::Output,
    <F as Target<A>>::Error,
    <R as Runtime>::Instant,
>;

/// A throttled function, created by [`throttle`](crate::throttle()).
///
/// Clones share the same state. The target must not call back into the same wrapper
/// from its synchronous part.
pub struct Throttled<F, A, R>
where
    F: Target<A>,
    R: Runtime,
{
    state: R::Mutex<StateOf<F, A, R>>,
    wait: Duration,
    _args: PhantomData<fn(A)>,
}

impl<F, A, R> Clone for Throttled<F, A, R>
where
    F: Target<A>,
    R: Runtime,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            wait: self.wait,
            _args: PhantomData,
        }
    }
}

impl<F, A, R> fmt::Debug for Throttled<F, A, R>
where
    F: Target<A>,
    R: Runtime,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Throttled")
            .field("wait", &self.wait)
            .field("last_run", &state.last_run)
            .field("has_pending", &state.pending_timer.is_some())
            .field("paused", &state.paused)
            .finish_non_exhaustive()
    }
}

impl<F, A, R> Throttled<F, A, R>
where
    F: Target<A>,
    A: Send + 'static,
    R: Runtime,
{
    /// Wraps `target` so it runs at most once every `wait`.
    pub fn new(target: F, wait: Duration) -> Self {
        Self {
            state: R::Mutex::new(State {
                target,
                last_run: None,
                pending_timer: None,
                pending: None,
                next_timer_id: 0,
                paused: false,
            }),
            wait,
            _args: PhantomData,
        }
    }

    /// Calls the throttled function.
    ///
    /// Runs the target now if the interval has elapsed, schedules a trailing run if
    /// none is waiting, and rejects as ignored otherwise.
    ///
    /// # Panics
    ///
    /// On tokio, panics when called outside a tokio runtime context.
    pub fn call(&self, args: A) -> Deferred<F::Output, F::Error> {
        let mut state = self.state.lock();
        if state.paused {
            debug!("throttled call rejected: paused");
            return Deferred::rejected(ORIGIN, PacerError::paused(ORIGIN));
        }

        let timer = R::Timer::default();
        let remaining = match state.last_run {
            Some(last_run) => self.wait.saturating_sub(timer.elapsed_since(last_run)),
            None => Duration::ZERO,
        };

        if remaining.is_zero() {
            state.pending_timer = None;
            if let Some(trailing) = state.pending.take() {
                if trailing.reject(PacerError::superseded(ORIGIN)) {
                    trace!("trailing throttled call superseded by a new interval");
                }
            }

            trace!("throttle leading edge: running now");
            state.last_run = Some(timer.now());
            let (resolver, result) = deferred(ORIGIN);
            resolver.settle_from_target::<R, _, _>(&mut state.target, args);
            return result;
        }

        if state.pending_timer.is_some() {
            debug!("throttled call ignored: trailing call already scheduled");
            return Deferred::rejected(ORIGIN, PacerError::Ignored);
        }

        let (resolver, result) = deferred(ORIGIN);
        state.pending = Some(resolver.clone());

        let id = state.next_timer_id;
        state.next_timer_id += 1;
        let this = self.clone();
        state.pending_timer = Some(ScheduledCall::new::<R, _>(id, remaining, move |id| {
            this.fire(id, args, resolver);
        }));

        result
    }

    /// Whether a trailing run is scheduled.
    pub fn has_pending(&self) -> bool {
        self.state.lock().pending_timer.is_some()
    }

    fn fire(&self, id: u64, args: A, resolver: Resolver<F::Output, F::Error>) {
        let mut state = self.state.lock();
        if !state.pending_timer.as_ref().is_some_and(|timer| timer.is(id)) {
            trace!("stale throttle timer {} ignored", id);
            return;
        }

        trace!("throttle trailing edge: running");
        state.last_run = Some(R::Timer::default().now());
        state.pending_timer = None;
        resolver.settle_from_target::<R, _, _>(&mut state.target, args);
    }
}

impl<F, A, R> RateControl for Throttled<F, A, R>
where
    F: Target<A>,
    A: Send + 'static,
    R: Runtime,
{
    fn cancel(&self) {
        let mut state = self.state.lock();
        state.pending_timer = None;
        if let Some(pending) = state.pending.take() {
            if pending.reject(PacerError::canceled(ORIGIN)) {
                debug!("throttled call canceled");
            }
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
