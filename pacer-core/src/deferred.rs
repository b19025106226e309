// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-call deferred results.
//!
//! Every call made through a wrapper hands back a [`Deferred`] right away. The matching
//! [`Resolver`] stays with the wrapper (in its state, in a scheduled timer, or in the
//! task driving the target's future) and settles the result exactly once: the first
//! settle wins, every later attempt is a no-op.
//!
//! If every clone of a resolver is dropped without settling, the deferred result
//! completes with [`PacerError::Abandoned`] instead of hanging forever. A target that
//! panics, either while being invoked or while its future is polled, settles its call
//! the same way.

use crate::logging::{log_warn, trace};
use crate::target::Target;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use futures::channel::oneshot;
use futures::FutureExt;
use pacer_error::{Origin, PacerError, Result};
use pacer_runtime::runtime::Runtime;
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

type Outcome<T, E> = Result<T, E>;

/// Creates a connected resolver / deferred result pair for a call on `origin`.
///
/// # Example
///
/// ```
/// use futures::FutureExt;
/// use pacer_core::{deferred, Origin};
///
/// let (resolver, result) = deferred::<u32, ()>(Origin::Debounce);
/// assert!(resolver.resolve(7));
/// assert!(!resolver.resolve(8));
/// assert_eq!(result.now_or_never(), Some(Ok(7)));
/// ```
pub fn deferred<T, E>(origin: Origin) -> (Resolver<T, E>, Deferred<T, E>) {
    let (tx, rx) = oneshot::channel();
    let resolver = Resolver {
        slot: Arc::new(Mutex::new(Some(tx))),
        origin,
    };
    let result = Deferred {
        inner: Inner::Pending(rx),
        origin,
    };
    (resolver, result)
}

/// Settle-once handle for a [`Deferred`].
///
/// Clones share the same slot, so whichever code path settles first wins.
pub struct Resolver<T, E> {
    slot: Arc<Mutex<Option<oneshot::Sender<Outcome<T, E>>>>>,
    origin: Origin,
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            origin: self.origin,
        }
    }
}

impl<T, E> core::fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Resolver")
            .field("origin", &self.origin)
            .field("settled", &self.is_settled())
            .finish()
    }
}

impl<T, E> Resolver<T, E> {
    /// Settles the deferred result with `outcome`.
    ///
    /// Returns `true` if this call settled it, `false` if it had already been settled.
    pub fn settle(&self, outcome: Outcome<T, E>) -> bool {
        let Some(tx) = self.slot.lock().take() else {
            return false;
        };
        if tx.send(outcome).is_err() {
            trace!("deferred result dropped by caller before it settled");
        }
        true
    }

    /// Fulfills the deferred result with `value`.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Rejects the deferred result with `error`.
    pub fn reject(&self, error: PacerError<E>) -> bool {
        self.settle(Err(error))
    }

    /// Settles from the target's own outcome; target errors become [`PacerError::Target`].
    pub fn settle_with(&self, outcome: core::result::Result<T, E>) -> bool {
        self.settle(outcome.map_err(PacerError::Target))
    }

    /// Whether the deferred result has already been settled.
    pub fn is_settled(&self) -> bool {
        self.slot.lock().is_none()
    }

    fn abandon_after_panic(&self) {
        log_warn!("{} target panicked", self.origin);
        self.reject(PacerError::abandoned(self.origin));
    }
}

impl<T, E> Resolver<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Drives the target's `future` on runtime `R` and settles from its outcome.
    ///
    /// The future always runs to completion, even if the result was settled
    /// (superseded or canceled) in the meantime; its outcome is then discarded. If the
    /// future panics the call rejects as [`PacerError::Abandoned`].
    pub fn settle_from<R, Fut>(self, future: Fut)
    where
        R: Runtime,
        Fut: Future<Output = core::result::Result<T, E>> + Send + 'static,
    {
        R::spawn(async move {
            match AssertUnwindSafe(future).catch_unwind().await {
                Ok(outcome) => {
                    if !self.settle_with(outcome) {
                        trace!("target finished after its call was already settled");
                    }
                }
                Err(_) => self.abandon_after_panic(),
            }
        });
    }

    /// Invokes `target` with `args` and settles from the future it returns.
    ///
    /// A panic in the target's synchronous part is caught here and rejects the call as
    /// [`PacerError::Abandoned`], so the caller's state stays usable.
    pub fn settle_from_target<R, A, F>(self, target: &mut F, args: A)
    where
        R: Runtime,
        F: Target<A, Output = T, Error = E>,
    {
        match catch_unwind(AssertUnwindSafe(|| target.invoke(args))) {
            Ok(future) => self.settle_from::<R, _>(future),
            Err(_) => self.abandon_after_panic(),
        }
    }
}

enum Inner<T, E> {
    Pending(oneshot::Receiver<Outcome<T, E>>),
    Ready(Option<Outcome<T, E>>),
}

/// Deferred result of a single call through a pacer wrapper.
///
/// Resolves to the target's value, or to a [`PacerError`] saying why the call was
/// rejected. Dropping it does not cancel the call.
#[must_use = "a Deferred carries the only report of why a call was rejected"]
pub struct Deferred<T, E> {
    inner: Inner<T, E>,
    origin: Origin,
}

// No field is structurally pinned.
impl<T, E> Unpin for Deferred<T, E> {}

impl<T, E> Deferred<T, E> {
    /// A deferred result that is already rejected with `error`.
    pub fn rejected(origin: Origin, error: PacerError<E>) -> Self {
        Self {
            inner: Inner::Ready(Some(Err(error))),
            origin,
        }
    }

    /// A deferred result that is already fulfilled with `value`.
    pub fn resolved(origin: Origin, value: T) -> Self {
        Self {
            inner: Inner::Ready(Some(Ok(value))),
            origin,
        }
    }

    /// The wrapper this call was made on.
    pub fn origin(&self) -> Origin {
        self.origin
    }
}

impl<T, E> core::fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = match &self.inner {
            Inner::Pending(_) => "pending",
            Inner::Ready(Some(_)) => "ready",
            Inner::Ready(None) => "taken",
        };
        f.debug_struct("Deferred")
            .field("origin", &self.origin)
            .field("state", &state)
            .finish()
    }
}

impl<T, E> Future for Deferred<T, E> {
    type Output = Outcome<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match &mut this.inner {
            Inner::Ready(outcome) => match outcome.take() {
                Some(outcome) => Poll::Ready(outcome),
                None => panic!("Deferred polled after completion"),
            },
            Inner::Pending(rx) => match Pin::new(rx).poll(cx) {
                Poll::Ready(Ok(outcome)) => {
                    this.inner = Inner::Ready(None);
                    Poll::Ready(outcome)
                }
                Poll::Ready(Err(oneshot::Canceled)) => {
                    log_warn!("{} call dropped before it settled", this.origin);
                    this.inner = Inner::Ready(None);
                    Poll::Ready(Err(PacerError::abandoned(this.origin)))
                }
                Poll::Pending => Poll::Pending,
            },
        }
    }
}
