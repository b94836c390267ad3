//! Control handle exposed to callers and lifecycle callbacks.

use std::cell::RefCell;
use std::rc::Weak;

use crate::unit::{self, UnitState};

/// The four playback operations, bound to a synchronization unit by weak
/// reference rather than by copy: a handle captured before a recreate keeps
/// driving whatever instance is live when it is used. Once the unit is torn
/// down every operation degrades to a no-op.
#[derive(Clone)]
pub struct ControlHandle {
    unit: Weak<RefCell<UnitState>>,
}

impl ControlHandle {
    pub(crate) fn new(unit: Weak<RefCell<UnitState>>) -> Self {
        Self { unit }
    }

    /// Toggle the current instance between paused and running, then notify
    /// `on_pause_resume`.
    pub fn pause_resume(&self) {
        if let Some(cell) = self.unit.upgrade() {
            unit::pause_resume(&cell);
        }
    }

    /// Reset the current instance to its start value, then notify `on_reset`.
    pub fn reset(&self) {
        if let Some(cell) = self.unit.upgrade() {
            unit::reset(&cell);
        }
    }

    /// Reset and start again; a configured delay applies to the new run.
    pub fn restart(&self) {
        if let Some(cell) = self.unit.upgrade() {
            unit::restart(&cell);
        }
    }

    /// Retarget the current instance to `new_end`, then notify `on_update`.
    pub fn update(&self, new_end: f64) {
        if let Some(cell) = self.unit.upgrade() {
            unit::update(&cell, new_end);
        }
    }

    /// Whether the unit behind this handle is still alive.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.unit.strong_count() > 0
    }
}

impl std::fmt::Debug for ControlHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlHandle")
            .field("live", &self.is_live())
            .finish()
    }
}
