// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error_injection::TestError;
use futures::future::{ready, BoxFuture, FutureExt, Ready};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// One recorded call of a test target.
#[derive(Debug, Clone)]
pub struct Invocation<A> {
    pub args: A,
    pub at: Instant,
}

/// Records every invocation of the targets it hands out.
///
/// Instants come from tokio's clock, so on a paused clock offsets are exact.
#[derive(Debug)]
pub struct CallRecorder<A> {
    calls: Arc<Mutex<Vec<Invocation<A>>>>,
    origin: Instant,
}

impl<A> Clone for CallRecorder<A> {
    fn clone(&self) -> Self {
        Self {
            calls: Arc::clone(&self.calls),
            origin: self.origin,
        }
    }
}

impl<A> Default for CallRecorder<A>
where
    A: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A> CallRecorder<A>
where
    A: Clone + Send + 'static,
{
    /// Creates a recorder; offsets are measured from this instant.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            origin: Instant::now(),
        }
    }

    fn record(&self, args: &A) {
        self.calls.lock().push(Invocation {
            args: args.clone(),
            at: Instant::now(),
        });
    }

    /// A target that resolves at once with its own arguments.
    pub fn echo(&self) -> impl FnMut(A) -> Ready<Result<A, TestError>> + Send + 'static {
        let recorder = self.clone();
        move |args| {
            recorder.record(&args);
            ready(Ok(args))
        }
    }

    /// A target that maps its arguments through `f`.
    pub fn map<T, F>(&self, mut f: F) -> impl FnMut(A) -> Ready<Result<T, TestError>> + Send + 'static
    where
        T: Send + 'static,
        F: FnMut(A) -> Result<T, TestError> + Send + 'static,
    {
        let recorder = self.clone();
        move |args| {
            recorder.record(&args);
            ready(f(args))
        }
    }

    /// A target that always fails with `message`.
    pub fn failing(
        &self,
        message: &str,
    ) -> impl FnMut(A) -> Ready<Result<A, TestError>> + Send + 'static {
        let recorder = self.clone();
        let message = message.to_string();
        move |args| {
            recorder.record(&args);
            ready(Err(TestError::new(message.clone())))
        }
    }

    /// A target whose future resolves with its arguments after `delay`.
    pub fn delayed(
        &self,
        delay: Duration,
    ) -> impl FnMut(A) -> BoxFuture<'static, Result<A, TestError>> + Send + 'static {
        let recorder = self.clone();
        move |args| {
            recorder.record(&args);
            async move {
                tokio::time::sleep(delay).await;
                Ok(args)
            }
            .boxed()
        }
    }

    /// Number of recorded invocations.
    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Arguments of every recorded invocation, in call order.
    pub fn args(&self) -> Vec<A> {
        self.calls.lock().iter().map(|call| call.args.clone()).collect()
    }

    /// Milliseconds between recorder creation and each invocation.
    ///
    /// Saturates at `u64::MAX`.
    pub fn offsets(&self) -> Vec<u64> {
        self.calls
            .lock()
            .iter()
            .map(|call| u64::try_from((call.at - self.origin).as_millis()).unwrap_or(u64::MAX))
            .collect()
    }

    /// Every recorded invocation.
    pub fn invocations(&self) -> Vec<Invocation<A>> {
        self.calls.lock().clone()
    }
}
