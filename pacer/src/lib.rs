// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! # Pacer
//!
//! Rate-control wrappers for async functions: debounce, throttle and queue-throttle.
//!
//! ## Overview
//!
//! Each wrapper takes a target function and timing parameters and hands back a
//! cheaply clonable object whose `call` returns a [`Deferred`] right away. The
//! deferred result settles with the target's outcome, or with a [`PacerError`]
//! saying why the call never ran (superseded, ignored, canceled, cleared, paused).
//!
//! | wrapper | runs | extra calls |
//! |---------|------|-------------|
//! | [`debounce()`] | once calls go quiet for `wait` | superseded |
//! | [`throttle()`] | at most once per `wait`, leading and trailing | ignored |
//! | [`queue_throttle()`] | every call, in order, `wait` apart | queued |
//!
//! All wrappers share the [`RateControl`] surface (`cancel`, `pause`, `resume`,
//! `is_paused`); the queue adds [`QueueControl::clear`].
//!
//! ## Runtimes
//!
//! Timers and background work run on a [`Runtime`](pacer_runtime::runtime::Runtime).
//! The `runtime-tokio` feature (default) selects tokio, `runtime-smol` selects smol;
//! [`DefaultRuntime`] is whichever is enabled. The `*_with_runtime` factories take
//! the runtime explicitly.
//!
//! With tokio, `call` must run inside a tokio runtime context: a call that schedules
//! a timer or runs the target spawns a task, and `tokio::spawn` panics outside one.
//!
//! A target that panics rejects its call as [`PacerError::Abandoned`]; the wrapper
//! keeps working.
//!
//! ## Quick Start
//!
//! ```rust
//! use futures::future::ready;
//! use pacer::prelude::*;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let save = queue_throttle(
//!     |doc: &'static str| ready(Ok::<_, std::io::Error>(doc.len())),
//!     Duration::from_millis(10),
//! );
//!
//! let first = save.call("draft");
//! let second = save.call("final");
//!
//! assert_eq!(first.await.unwrap(), 5);
//! assert_eq!(second.await.unwrap(), 5);
//! # }
//! ```

mod logging;

pub mod debounce;
pub mod queue_throttle;
pub mod throttle;

pub use self::debounce::{DebounceOptions, Debounced};
pub use self::queue_throttle::QueueThrottled;
pub use self::throttle::Throttled;
pub use pacer_core::{
    Deferred, ErrorKind, Origin, PacerError, QueueControl, RateControl, Result, Target,
};

use core::future::Future;
use core::time::Duration;
use pacer_runtime::runtime::Runtime;

/// The runtime selected by cargo features.
#[cfg(feature = "runtime-tokio")]
pub type DefaultRuntime = pacer_runtime::impls::tokio::TokioRuntime;

/// The runtime selected by cargo features.
#[cfg(all(feature = "runtime-smol", not(feature = "runtime-tokio")))]
pub type DefaultRuntime = pacer_runtime::impls::smol::SmolRuntime;

/// Debounces `target` on the [`DefaultRuntime`].
///
/// See [`debounce`](mod@debounce) for the exact behavior of `options`.
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub fn debounce<F, A, Fut, T, E>(
    target: F,
    wait: Duration,
    options: DebounceOptions,
) -> Debounced<F, A, DefaultRuntime>
where
    F: FnMut(A) -> Fut + Send + 'static,
    Fut: Future<Output = core::result::Result<T, E>> + Send + 'static,
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    debounce_with_runtime::<DefaultRuntime, _, _, _, _, _>(target, wait, options)
}

/// Debounces `target` on runtime `R`.
pub fn debounce_with_runtime<R, F, A, Fut, T, E>(
    target: F,
    wait: Duration,
    options: DebounceOptions,
) -> Debounced<F, A, R>
where
    R: Runtime,
    F: FnMut(A) -> Fut + Send + 'static,
    Fut: Future<Output = core::result::Result<T, E>> + Send + 'static,
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    Debounced::new(target, wait, options)
}

/// Throttles `target` on the [`DefaultRuntime`].
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub fn throttle<F, A, Fut, T, E>(target: F, wait: Duration) -> Throttled<F, A, DefaultRuntime>
where
    F: FnMut(A) -> Fut + Send + 'static,
    Fut: Future<Output = core::result::Result<T, E>> + Send + 'static,
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    throttle_with_runtime::<DefaultRuntime, _, _, _, _, _>(target, wait)
}

/// Throttles `target` on runtime `R`.
pub fn throttle_with_runtime<R, F, A, Fut, T, E>(target: F, wait: Duration) -> Throttled<F, A, R>
where
    R: Runtime,
    F: FnMut(A) -> Fut + Send + 'static,
    Fut: Future<Output = core::result::Result<T, E>> + Send + 'static,
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    Throttled::new(target, wait)
}

/// Queue-throttles `target` on the [`DefaultRuntime`].
#[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
pub fn queue_throttle<F, A, Fut, T, E>(
    target: F,
    wait: Duration,
) -> QueueThrottled<F, A, DefaultRuntime>
where
    F: FnMut(A) -> Fut + Send + 'static,
    Fut: Future<Output = core::result::Result<T, E>> + Send + 'static,
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    queue_throttle_with_runtime::<DefaultRuntime, _, _, _, _, _>(target, wait)
}

/// Queue-throttles `target` on runtime `R`.
pub fn queue_throttle_with_runtime<R, F, A, Fut, T, E>(
    target: F,
    wait: Duration,
) -> QueueThrottled<F, A, R>
where
    R: Runtime,
    F: FnMut(A) -> Fut + Send + 'static,
    Fut: Future<Output = core::result::Result<T, E>> + Send + 'static,
    A: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    QueueThrottled::new(target, wait)
}

/// Prelude module for convenient imports
pub mod prelude {
    #[cfg(any(feature = "runtime-tokio", feature = "runtime-smol"))]
    pub use crate::{debounce, queue_throttle, throttle, DefaultRuntime};
    pub use crate::{
        DebounceOptions, Debounced, ErrorKind, PacerError, QueueControl, QueueThrottled,
        RateControl, Throttled,
    };
    pub use crate::{debounce_with_runtime, queue_throttle_with_runtime, throttle_with_runtime};
}
