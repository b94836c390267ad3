//! Tickup Core (engine-agnostic)
//!
//! The layer that keeps a declarative configuration surface and an
//! imperative, timer-driven count-up animation engine in sync. The engine
//! itself lives behind the trait boundary in [`engine`]; this crate decides
//! when instances are created, replaced, mutated in place, and started, and
//! exposes playback control to callers through [`ControlHandle`].
//!
//! Two façades share one synchronization core:
//! - [`ManagedCount`]: owns the attach/update/detach lifecycle of a render
//!   target (or hands control to the caller in render-prop shape).
//! - [`CountHook`]: one lazily-created instance per hook, mirroring the live
//!   animated value into declarative state via the formatting intercept.

pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod factory;
pub mod handle;
pub mod hook;
pub mod managed;
pub mod timer;

mod unit;

// Re-exports for consumers (hosts/adapters)
pub use config::{Callbacks, FormatOptions, SyncConfig};
pub use diff::{classify, SyncAction};
pub use engine::{CountEngine, CountInstance, EasingFn, EngineOptions, FormattingFn, Target};
pub use error::SyncError;
pub use factory::create_instance;
pub use handle::ControlHandle;
pub use hook::{CountHook, HookCallbacks};
pub use managed::{ManagedCount, TargetMode};
pub use timer::{DelayScheduler, TimerId};

/// Crate-level result type.
pub type Result<T> = core::result::Result<T, SyncError>;
