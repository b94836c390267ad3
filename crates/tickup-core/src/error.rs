//! Error types for the synchronization layer.

use serde::{Deserialize, Serialize};

/// Errors surfaced by the façades. Playback control and teardown are
/// deliberately infallible: a handle operation on a retired unit and an
/// unmount with no live instance are both no-ops, never errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SyncError {
    /// The unit already owns a live instance.
    #[error("unit is already mounted")]
    AlreadyMounted,

    /// Operation requires a mounted unit.
    #[error("unit is not mounted")]
    NotMounted,

    /// Configuration rejected before reaching the engine.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl SyncError {
    /// Create an `InvalidConfig` error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
