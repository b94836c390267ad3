//! Managed component façade.
//!
//! Owns the attach/update/detach lifecycle of one synchronization unit. In
//! fixed-target shape the unit renders into a target it owns; in
//! caller-supplied (render-prop) shape the caller owns the target and drives
//! playback through the returned [`ControlHandle`].

use std::fmt;
use std::rc::Rc;

use crate::config::{Callbacks, SyncConfig};
use crate::diff::SyncAction;
use crate::engine::{CountEngine, Target};
use crate::error::SyncError;
use crate::handle::ControlHandle;
use crate::timer::DelayScheduler;
use crate::unit::{self, UnitCell};
use crate::Result;

/// Who owns the render target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetMode {
    /// The unit owns the target and auto-renders into it.
    Fixed(Target),
    /// The caller owns the target (render-prop shape). `None` means the
    /// caller never attached one; the engine then gets the no-element
    /// sentinel and an advisory is logged.
    CallerSupplied(Option<Target>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Lifecycle {
    Idle,
    Mounted,
    TornDown,
}

/// Managed component over one synchronization unit.
pub struct ManagedCount {
    cell: UnitCell,
    caller_supplied: bool,
    lifecycle: Lifecycle,
}

impl ManagedCount {
    /// Build an unmounted unit. Nothing touches the engine until [`mount`].
    ///
    /// [`mount`]: ManagedCount::mount
    pub fn new(
        engine: Rc<dyn CountEngine>,
        scheduler: Rc<dyn DelayScheduler>,
        mode: TargetMode,
        config: SyncConfig,
        callbacks: Callbacks,
    ) -> Result<Self> {
        config.validate()?;

        let caller_supplied = matches!(mode, TargetMode::CallerSupplied(_));
        let target = match mode {
            TargetMode::Fixed(t) => t,
            TargetMode::CallerSupplied(Some(t)) => t,
            TargetMode::CallerSupplied(None) => {
                log::warn!(
                    "no render target attached for caller-supplied mode; \
                     the engine will run against the no-element sentinel"
                );
                Target::NoElement
            }
        };

        Ok(Self {
            cell: unit::new_unit(engine, scheduler, config, callbacks, target),
            caller_supplied,
            lifecycle: Lifecycle::Idle,
        })
    }

    /// First activation: construct the instance and, unless the caller owns
    /// the target and asked for no delay, start it immediately.
    ///
    /// In caller-supplied shape with a zero/absent delay the caller is
    /// assumed to want manual control, so only the handle is returned.
    pub fn mount(&mut self) -> Result<ControlHandle> {
        if self.lifecycle != Lifecycle::Idle {
            return Err(SyncError::AlreadyMounted);
        }
        self.lifecycle = Lifecycle::Mounted;

        unit::ensure_instance(&self.cell);

        let no_delay = self.cell.borrow().config.effective_delay() == 0.0;
        if !(self.caller_supplied && no_delay) {
            unit::start(&self.cell);
        }

        Ok(unit::handle(&self.cell))
    }

    /// One synchronization cycle: classify the change from the previous
    /// snapshot and recreate, mutate in place, or skip all work.
    ///
    /// Returns the action taken so hosts can observe what happened.
    pub fn update(&mut self, next: SyncConfig) -> Result<SyncAction> {
        if self.lifecycle != Lifecycle::Mounted {
            return Err(SyncError::NotMounted);
        }
        next.validate()?;
        Ok(unit::apply(&self.cell, next))
    }

    /// Control handle bound to this unit.
    pub fn handle(&self) -> ControlHandle {
        unit::handle(&self.cell)
    }

    /// Detach: cancel any pending delayed start and drop the instance.
    /// Safe to call repeatedly and before any instance exists.
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.lifecycle = Lifecycle::TornDown;
        unit::teardown(&self.cell);
    }

    /// Whether the unit currently owns a live instance.
    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }
}

impl fmt::Debug for ManagedCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedCount")
            .field("caller_supplied", &self.caller_supplied)
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

impl Drop for ManagedCount {
    fn drop(&mut self) {
        self.unmount();
    }
}
