//! Recreate-vs-mutate classification between configuration snapshots.

use crate::config::SyncConfig;

/// What a synchronization cycle has to do about a configuration change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SyncAction {
    /// Destroy the live instance, construct a fresh one, restart. The engine
    /// cannot retarget `duration` or `start` on a running instance.
    Recreate,
    /// Keep the instance; `reset()` then `update(new_end)` in place.
    Mutate,
    /// Nothing relevant changed; touch neither instance nor timer.
    Skip,
}

/// Classify the change from `prev` to `next`.
///
/// `duration`/`start` beat `end` when both change in one cycle: the fresh
/// instance is constructed from the new `end` anyway. The `redraw` flag on
/// `next` upgrades an otherwise irrelevant change to a full recreate.
pub fn classify(prev: &SyncConfig, next: &SyncConfig) -> SyncAction {
    if prev.duration != next.duration || prev.start != next.start {
        return SyncAction::Recreate;
    }
    if prev.end != next.end {
        return SyncAction::Mutate;
    }
    if next.redraw {
        return SyncAction::Recreate;
    }
    SyncAction::Skip
}
