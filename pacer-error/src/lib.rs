// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the pacer rate-control library
//!
//! Every call made through a pacer wrapper returns a deferred result. When that result
//! is not the target's own value it is a [`PacerError`], which tells the caller *why*
//! the call did not produce a value: it was superseded by a newer call, canceled,
//! cleared from a queue, rejected while paused, ignored inside a throttle interval,
//! or the target itself failed.
//!
//! # Examples
//!
//! ```
//! use pacer_error::{ErrorKind, Origin, PacerError};
//!
//! let err: PacerError<std::io::Error> = PacerError::paused(Origin::Throttle);
//! assert_eq!(err.kind(), ErrorKind::Paused);
//! assert_eq!(err.to_string(), "Throttled function is paused");
//! ```

use core::fmt;

/// The kind of wrapper that produced a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// A debounced function
    Debounce,
    /// A throttled function
    Throttle,
    /// A queue-throttled function
    QueueThrottle,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debounce => f.write_str("Debounced function"),
            Self::Throttle => f.write_str("Throttled function"),
            Self::QueueThrottle => f.write_str("Queue"),
        }
    }
}

/// Category of a [`PacerError`], without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A pending call was displaced by a newer call
    Superseded,
    /// `cancel()` was invoked on the wrapper
    Canceled,
    /// `clear()` was invoked on a queue-throttled wrapper
    Cleared,
    /// The wrapper was paused when the call arrived
    Paused,
    /// A throttled call was dropped because a trailing call is already scheduled
    Ignored,
    /// The pending call was dropped without ever being settled
    Abandoned,
    /// The wrapped function itself failed
    Target,
}

impl ErrorKind {
    /// Short reason string identifying the category.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::Superseded => "superseded",
            Self::Canceled => "canceled",
            Self::Cleared => "cleared",
            Self::Paused => "paused",
            Self::Ignored => "ignored",
            Self::Abandoned => "abandoned",
            Self::Target => "target",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Root error type for every pacer wrapper
///
/// `E` is the error type of the wrapped function. Target failures are carried through
/// unchanged in [`PacerError::Target`]; every other variant is a rejection produced by
/// the wrapper itself.
#[derive(Debug, thiserror::Error)]
pub enum PacerError<E> {
    /// A pending call was displaced by a newer call
    ///
    /// Raised by debounce when a new call arrives while an earlier one is still
    /// outstanding (or when an immediate-mode quiet window closes without running),
    /// and by throttle when a fresh interval starts while a trailing call is pending.
    #[error("{origin} call superseded by a newer call")]
    Superseded {
        /// The wrapper that rejected the call
        origin: Origin,
    },

    /// The call was canceled through `cancel()`
    ///
    /// Also raised for every call made to a queue that has already been canceled.
    #[error("{origin} call canceled")]
    Canceled {
        /// The wrapper that rejected the call
        origin: Origin,
    },

    /// The queued call was removed by `clear()`
    #[error("Queue cleared")]
    Cleared,

    /// The wrapper was paused when the call arrived
    #[error("{origin} is paused")]
    Paused {
        /// The wrapper that rejected the call
        origin: Origin,
    },

    /// The throttled call arrived while a trailing call was already scheduled
    #[error("Throttled: call ignored due to interval")]
    Ignored,

    /// The call was dropped without being settled
    ///
    /// This happens when the target's future panics, or when the runtime shuts down
    /// before a scheduled call fires.
    #[error("{origin} call dropped before it settled")]
    Abandoned {
        /// The wrapper that owned the call
        origin: Origin,
    },

    /// The wrapped function returned an error
    #[error("Target failed: {0}")]
    Target(E),
}

impl<E> PacerError<E> {
    /// Create a superseded rejection for the given wrapper
    #[must_use]
    pub const fn superseded(origin: Origin) -> Self {
        Self::Superseded { origin }
    }

    /// Create a canceled rejection for the given wrapper
    #[must_use]
    pub const fn canceled(origin: Origin) -> Self {
        Self::Canceled { origin }
    }

    /// Create a paused rejection for the given wrapper
    #[must_use]
    pub const fn paused(origin: Origin) -> Self {
        Self::Paused { origin }
    }

    /// Create an abandoned rejection for the given wrapper
    #[must_use]
    pub const fn abandoned(origin: Origin) -> Self {
        Self::Abandoned { origin }
    }

    /// The category of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Superseded { .. } => ErrorKind::Superseded,
            Self::Canceled { .. } => ErrorKind::Canceled,
            Self::Cleared => ErrorKind::Cleared,
            Self::Paused { .. } => ErrorKind::Paused,
            Self::Ignored => ErrorKind::Ignored,
            Self::Abandoned { .. } => ErrorKind::Abandoned,
            Self::Target(_) => ErrorKind::Target,
        }
    }

    /// Short reason string identifying the category (`"canceled"`, `"paused"`, ...)
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        self.kind().reason()
    }

    /// The wrapper that produced this rejection, if it was not a target failure
    #[must_use]
    pub const fn origin(&self) -> Option<Origin> {
        match self {
            Self::Superseded { origin }
            | Self::Canceled { origin }
            | Self::Paused { origin }
            | Self::Abandoned { origin } => Some(*origin),
            Self::Cleared => Some(Origin::QueueThrottle),
            Self::Ignored => Some(Origin::Throttle),
            Self::Target(_) => None,
        }
    }

    /// Check if the wrapper rejected the call (as opposed to the target failing)
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !self.is_target()
    }

    /// Check if the wrapped function itself failed
    #[must_use]
    pub const fn is_target(&self) -> bool {
        matches!(self, Self::Target(_))
    }

    /// Borrow the target's error, if this is a target failure
    pub const fn target_error(&self) -> Option<&E> {
        match self {
            Self::Target(err) => Some(err),
            _ => None,
        }
    }

    /// Take the target's error, if this is a target failure
    pub fn into_target_error(self) -> Option<E> {
        match self {
            Self::Target(err) => Some(err),
            _ => None,
        }
    }

    /// Map the target error type, leaving rejections untouched
    pub fn map_target<F, O>(self, f: O) -> PacerError<F>
    where
        O: FnOnce(E) -> F,
    {
        match self {
            Self::Superseded { origin } => PacerError::Superseded { origin },
            Self::Canceled { origin } => PacerError::Canceled { origin },
            Self::Cleared => PacerError::Cleared,
            Self::Paused { origin } => PacerError::Paused { origin },
            Self::Ignored => PacerError::Ignored,
            Self::Abandoned { origin } => PacerError::Abandoned { origin },
            Self::Target(err) => PacerError::Target(f(err)),
        }
    }
}

impl<E: Clone> Clone for PacerError<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Superseded { origin } => Self::Superseded { origin: *origin },
            Self::Canceled { origin } => Self::Canceled { origin: *origin },
            Self::Cleared => Self::Cleared,
            Self::Paused { origin } => Self::Paused { origin: *origin },
            Self::Ignored => Self::Ignored,
            Self::Abandoned { origin } => Self::Abandoned { origin: *origin },
            Self::Target(err) => Self::Target(err.clone()),
        }
    }
}

impl<E: PartialEq> PartialEq for PacerError<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Target(a), Self::Target(b)) => a == b,
            (a, b) => a.kind() == b.kind() && a.origin() == b.origin(),
        }
    }
}

/// Specialized Result type for the outcome of a paced call
///
/// `T` is the target's output and `E` the target's error type.
///
/// # Examples
///
/// ```
/// use pacer_error::{PacerError, Result};
///
/// fn outcome() -> Result<u32, std::io::Error> {
///     Err(PacerError::Cleared)
/// }
///
/// assert!(outcome().unwrap_err().is_rejection());
/// ```
pub type Result<T, E> = core::result::Result<T, PacerError<E>>;
