//! Delayed-start timer boundary.
//!
//! The layer is single-threaded and callback-driven; the only suspension
//! point it introduces is the delayed-start timer. Hosts plug their event
//! loop in through [`DelayScheduler`]; tests drive a manual queue.

use std::time::Duration;

/// Opaque handle to one scheduled callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// One-shot timer service provided by the host.
///
/// A scheduled callback fires at most once; `cancel` on an already-fired or
/// unknown id is a no-op. Implementations are expected to deliver callbacks
/// on the same thread that scheduled them.
pub trait DelayScheduler {
    /// Schedule `callback` to run after `delay`.
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;
    /// Drop a pending callback so it never fires.
    fn cancel(&self, id: TimerId);
}
