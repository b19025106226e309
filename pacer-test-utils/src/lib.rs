// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the pacer workspace.
//!
//! Wrappers are tested on tokio's paused clock. Tests start frozen with
//! `#[tokio::test(start_paused = true)]`, `advance()` moves time forward, and
//! [`helpers::settle`] lets the background tasks that timers and target futures run on
//! catch up.
//!
//! Pausing from inside a running test (`tokio::time::pause()`) leaves the clock off a
//! millisecond boundary, and timer deadlines then round up by 1ms.
//!
//! # Key Types
//!
//! ## `CallRecorder<A>`
//!
//! Hands out target functions that record every invocation together with the
//! instant it happened:
//!
//! ```rust
//! use pacer_test_utils::CallRecorder;
//! use pacer_core::Target;
//!
//! let recorder = CallRecorder::<u32>::new();
//! let mut target = recorder.echo();
//! let _ = target.invoke(4);
//! assert_eq!(recorder.args(), vec![4]);
//! ```
//!
//! ## Test Fixtures
//!
//! - `Person` - a receiver carried along with call arguments
//! - `Greeting` - call arguments made of a receiver and a message
//! - `TestError` - error returned by failing targets

pub mod error_injection;
pub mod helpers;
pub mod person;
pub mod recorder;
pub mod test_data;

pub use error_injection::TestError;
pub use helpers::{assert_pending, settle, take_ready};
pub use person::Person;
pub use recorder::{CallRecorder, Invocation};
pub use test_data::Greeting;
