// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::future::Future;

/// The function a pacer wrapper controls.
///
/// Implemented for every `FnMut(A) -> Fut` where `Fut` resolves to a `Result`. The
/// argument `A` carries everything the call needs (receiver included) and is handed
/// over unchanged. The synchronous part of the closure runs at invocation time; the
/// returned future is driven in the background and settles the caller's
/// [`Deferred`](crate::Deferred).
///
/// # Example
///
/// ```
/// use futures::future::ready;
/// use pacer_core::Target;
///
/// fn assert_target<A, F: Target<A>>(_: &F) {}
///
/// let double = |n: u32| ready(Ok::<_, std::io::Error>(n * 2));
/// assert_target(&double);
/// ```
pub trait Target<A>: Send + 'static {
    /// Value produced by a successful invocation
    type Output: Send + 'static;
    /// Error produced by a failed invocation
    type Error: Send + 'static;
    /// Future returned by an invocation
    type Future: Future<Output = Result<Self::Output, Self::Error>> + Send + 'static;

    /// Invokes the wrapped function with `args`.
    fn invoke(&mut self, args: A) -> Self::Future;
}

impl<A, F, Fut, T, E> Target<A> for F
where
    F: FnMut(A) -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = T;
    type Error = E;
    type Future = Fut;

    fn invoke(&mut self, args: A) -> Self::Future {
        self(args)
    }
}
