// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Runtime abstraction for pacer wrappers.
//!
//! A wrapper needs three things from its environment: a clock with a sleep primitive
//! ([`timer::Timer`]), a way to run detached work ([`runtime::Runtime::spawn`]), and a
//! lock for its private state ([`mutex::MutexLike`]). Implementations live in
//! [`impls`] behind the `runtime-tokio` (default) and `runtime-smol` features.

pub mod impls;
pub mod mutex;
pub mod runtime;
pub mod timer;
