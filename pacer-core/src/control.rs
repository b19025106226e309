// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Control surface shared by every pacer wrapper.
///
/// All methods take effect before they return: any deferred result they reject is
/// already settled when control comes back to the caller.
pub trait RateControl {
    /// Drops pending work and rejects outstanding calls as canceled.
    ///
    /// Idempotent; a second call finds nothing left to reject.
    fn cancel(&self);

    /// Rejects every subsequent call as paused until [`resume`](Self::resume).
    ///
    /// Pending timers and queued items are kept.
    fn pause(&self);

    /// Restores normal behavior for subsequent calls.
    fn resume(&self);

    /// Whether the wrapper is currently paused.
    fn is_paused(&self) -> bool;
}

/// Extra control for wrappers that hold a queue of calls.
pub trait QueueControl: RateControl {
    /// Rejects every queued call as cleared, keeping the wrapper usable.
    fn clear(&self);
}
