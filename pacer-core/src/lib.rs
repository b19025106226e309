// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Building blocks shared by the pacer wrappers.
//!
//! - [`Deferred`] / [`Resolver`]: a per-call deferred result and its settle-once handle
//! - [`Target`]: the wrapped function, any `FnMut(A) -> impl Future<Output = Result<T, E>>`
//! - [`ScheduledCall`]: a cancellable delayed callback on a [`Runtime`](pacer_runtime::runtime::Runtime)
//! - [`RateControl`] / [`QueueControl`]: the control surface every wrapper exposes

mod logging;

pub mod control;
pub mod deferred;
pub mod scheduled_call;
pub mod target;

pub use self::control::{QueueControl, RateControl};
pub use self::deferred::{deferred, Deferred, Resolver};
pub use self::scheduled_call::ScheduledCall;
pub use self::target::Target;
pub use pacer_error::{ErrorKind, Origin, PacerError, Result};
