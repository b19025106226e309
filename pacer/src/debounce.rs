// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Debounce: run the target once calls have gone quiet.
//!
//! Every call supersedes the one before it. In the default (trailing) mode the target
//! runs `wait` after the last call of a burst, with that call's arguments, and only the
//! last call's [`Deferred`] receives the result; earlier calls reject as superseded.
//!
//! Two options change the picture:
//!
//! - **`immediate`**: the first call of a burst runs right away (leading edge) and opens
//!   a quiet window of `wait`. Calls inside the window restart it and are suppressed:
//!   when the window finally closes nothing runs and the last suppressed call rejects
//!   as superseded.
//! - **`max_wait`**: if at least `max_wait` has passed since the last immediate or
//!   max-wait run, a call runs right away even in the middle of a burst. No run has
//!   happened yet when the wrapper is created, so with `max_wait` set the very first
//!   call runs at once.
//!
//! When both options could apply, `immediate` wins.
//!
//! # Example
//!
//! ```rust
//! use futures::future::ready;
//! use pacer::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let search = debounce(
//!     |query: String| ready(Ok::<_, std::io::Error>(query.len())),
//!     Duration::from_millis(100),
//!     DebounceOptions::default(),
//! );
//!
//! let first = search.call("ru".to_string());
//! let last = search.call("rust".to_string());
//!
//! assert!(first.await.unwrap_err().is_rejection());
//! assert_eq!(last.await.unwrap(), 4);
//! # }
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

const ORIGIN: Origin = Origin::Debounce;

/// Options for [`debounce`](crate::debounce()).
///
/// The default is a plain trailing debounce.
///
/// ```
/// use pacer::DebounceOptions;
/// use std::time::Duration;
///
/// let options = DebounceOptions::new()
///     .immediate(true)
///     .max_wait(Duration::from_millis(500));
/// assert!(options.immediate);
/// assert_eq!(options.max_wait, Some(Duration::from_millis(500)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceOptions {
    /// Run on the first call of a burst, then suppress until quiet.
    pub immediate: bool,
    /// Force a run once this much time has passed since the last run.
    ///
    /// A zero duration disables the option.
    pub max_wait: Option<Duration>,
}

impl DebounceOptions {
    /// Trailing-only debounce.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            immediate: false,
            max_wait: None,
        }
    }

    /// Run on the leading edge of a burst instead of the trailing one.
    #[must_use]
    pub const fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    /// Force a run if `max_wait` has passed since the last run.
    #[must_use]
    pub const fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    fn effective_max_wait(&self) -> Option<Duration> {
        self.max_wait.filter(|max_wait| !max_wait.is_zero())
    }
}

struct State<F, T, E, I> {
    target: F,
    pending_timer: Option<ScheduledCall>,
    pending: Option<Resolver<T, E>>,
    last_run: Option<I>,
    next_timer_id: u64,
    paused: bool,
}

type StateOf<F, A, R> = State<
    F,
    <F as Target<A>>::Output,
    <F as Target<A>>::Error,
    <R as Runtime>::Instant,
>;

/// A debounced function, created by [`debounce`](crate::debounce()).
///
/// Clones share the same state. The target's synchronous part runs while the wrapper's
/// state is locked, so the target must not call back into the same wrapper directly;
/// spawn a task for that instead.
pub struct Debounced<F, A, R>
where
    F: Target<A>,
    R: Runtime,
{
    state: R::Mutex<StateOf<F, A, R>>,
    wait: Duration,
    options: DebounceOptions,
    _args: PhantomData<fn(A)>,
}

impl<F, A, R> Clone for Debounced<F, A, R>
where
    F: Target<A>,
    R: Runtime,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            wait: self.wait,
            options: self.options,
            _args: PhantomData,
        }
    }
}

impl<F, A, R> fmt::Debug for Debounced<F, A, R>
where
    F: Target<A>,
    R: Runtime,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Debounced")
            .field("wait", &self.wait)
            .field("options", &self.options)
            .field("has_pending", &state.pending_timer.is_some())
            .field("paused", &state.paused)
            .finish_non_exhaustive()
    }
}

impl<F, A, R> Debounced<F, A, R>
where
    F: Target<A>,
    A: Send + 'static,
    R: Runtime,
{
    /// Wraps `target` so it only runs once calls have been quiet for `wait`.
    pub fn new(target: F, wait: Duration, options: DebounceOptions) -> Self {
        Self {
            state: R::Mutex::new(State {
                target,
                pending_timer: None,
                pending: None,
                last_run: None,
                next_timer_id: 0,
                paused: false,
            }),
            wait,
            options,
            _args: PhantomData,
        }
    }

    /// Calls the debounced function.
    ///
    /// The returned [`Deferred`] settles with the target's outcome if this call is the
    /// one that ends up running, or rejects as superseded, canceled or paused.
    ///
    /// # Panics
    ///
    /// On tokio, panics when called outside a tokio runtime context.
    pub fn call(&self, args: A) -> Deferred<F::Output, F::Error> {
        let mut state = self.state.lock();
        if state.paused {
            debug!("debounced call rejected: paused");
            return Deferred::rejected(ORIGIN, PacerError::paused(ORIGIN));
        }

        let had_timer = state.pending_timer.take().is_some();
        if let Some(previous) = state.pending.take() {
            if previous.reject(PacerError::superseded(ORIGIN)) {
                trace!("debounced call superseded");
            }
        }

        let (resolver, result) = deferred(ORIGIN);
        state.pending = Some(resolver.clone());

        let timer = R::Timer::default();
        if self.options.immediate && !had_timer {
            trace!("debounce leading edge: running now");
            state.last_run = Some(timer.now());
            self.schedule(&mut state, None);
            resolver.settle_from_target::<R, _, _>(&mut state.target, args);
        } else if self.max_wait_elapsed(&state, &timer) {
            trace!("debounce max wait elapsed: running now");
            state.last_run = Some(timer.now());
            resolver.settle_from_target::<R, _, _>(&mut state.target, args);
        } else {
            self.schedule(&mut state, Some((args, resolver)));
        }

        result
    }

    /// Whether a delayed run (or an immediate-mode quiet window) is scheduled.
    pub fn has_pending(&self) -> bool {
        self.state.lock().pending_timer.is_some()
    }

    fn max_wait_elapsed(&self, state: &StateOf<F, A, R>, timer: &R::Timer) -> bool {
        match (self.options.effective_max_wait(), state.last_run) {
            (Some(_), None) => true,
            (Some(max_wait), Some(last_run)) => timer.elapsed_since(last_run) >= max_wait,
            (None, _) => false,
        }
    }

    fn schedule(
        &self,
        state: &mut StateOf<F, A, R>,
        call: Option<(A, Resolver<F::Output, F::Error>)>,
    ) {
        let id = state.next_timer_id;
        state.next_timer_id += 1;

        let this = self.clone();
        state.pending_timer = Some(ScheduledCall::new::<R, _>(id, self.wait, move |id| {
            this.fire(id, call);
        }));
    }

    fn fire(&self, id: u64, call: Option<(A, Resolver<F::Output, F::Error>)>) {
        let mut state = self.state.lock();
        if !state.pending_timer.as_ref().is_some_and(|timer| timer.is(id)) {
            trace!("stale debounce timer {} ignored", id);
            return;
        }
        state.pending_timer = None;

        let Some((args, resolver)) = call else {
            trace!("debounce quiet window closed");
            return;
        };

        if self.options.immediate {
            debug!("debounced call suppressed by the leading edge");
            resolver.reject(PacerError::superseded(ORIGIN));
        } else {
            trace!("debounce trailing edge: running");
            resolver.settle_from_target::<R, _, _>(&mut state.target, args);
        }
    }
}

impl<F, A, R> RateControl for Debounced<F, A, R>
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
                debug!("debounced call canceled");
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
