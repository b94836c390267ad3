//! Hook/functional façade.
//!
//! One lazily-created instance per hook. Display is driven entirely through
//! the formatting intercept: the engine's only per-frame callback is its
//! formatting function, so wrapping it is the one non-polling way to mirror
//! the live animated value into declarative state.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::config::{Callbacks, SyncConfig};
use crate::engine::{CountEngine, FormattingFn, Target};
use crate::handle::ControlHandle;
use crate::timer::DelayScheduler;
use crate::unit::{self, UnitCell};
use crate::Result;

/// No-argument lifecycle callbacks for the hook façade.
#[derive(Clone, Default)]
pub struct HookCallbacks {
    pub on_start: Option<Rc<dyn Fn()>>,
    pub on_end: Option<Rc<dyn Fn()>>,
    pub on_reset: Option<Rc<dyn Fn()>>,
    pub on_pause_resume: Option<Rc<dyn Fn()>>,
    pub on_update: Option<Rc<dyn Fn()>>,
}

impl fmt::Debug for HookCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookCallbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_end", &self.on_end.is_some())
            .field("on_reset", &self.on_reset.is_some())
            .field("on_pause_resume", &self.on_pause_resume.is_some())
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}

fn adapt(cb: Option<Rc<dyn Fn()>>) -> Option<Rc<dyn Fn(&ControlHandle)>> {
    cb.map(|cb| Rc::new(move |_: &ControlHandle| cb()) as Rc<dyn Fn(&ControlHandle)>)
}

fn plain_format(decimals: u32) -> FormattingFn {
    Rc::new(move |v: f64| format!("{:.*}", decimals as usize, v))
}

/// Functional façade over one synchronization unit.
///
/// The instance is created on first use (first control call or explicit
/// [`activate`]); creation schedules the start per the delay protocol and
/// installs the value-mirroring formatting decorator.
///
/// [`activate`]: CountHook::activate
pub struct CountHook {
    cell: UnitCell,
    value: Rc<RefCell<String>>,
}

impl CountHook {
    pub fn new(
        engine: Rc<dyn CountEngine>,
        scheduler: Rc<dyn DelayScheduler>,
        config: SyncConfig,
        callbacks: HookCallbacks,
    ) -> Result<Self> {
        config.validate()?;

        let initial = match &config.formatting_fn {
            Some(f) => f(config.start),
            None => plain_format(config.decimals)(config.start),
        };

        let callbacks = Callbacks {
            on_start: adapt(callbacks.on_start),
            on_end: adapt(callbacks.on_end),
            on_reset: adapt(callbacks.on_reset),
            on_pause_resume: adapt(callbacks.on_pause_resume),
            on_update: adapt(callbacks.on_update),
        };

        Ok(Self {
            cell: unit::new_unit(engine, scheduler, config, callbacks, Target::NoElement),
            value: Rc::new(RefCell::new(initial)),
        })
    }

    /// Get-or-create: construct the instance on first call, install the
    /// formatting decorator, and request the start (delay protocol applies).
    /// Later calls are no-ops.
    pub fn activate(&self) {
        if !unit::ensure_instance(&self.cell) {
            return;
        }
        self.install_decorator();
        unit::start(&self.cell);
    }

    /// Wrap the instance's formatting function so every formatted frame is
    /// also published into the observable value. The original function is
    /// captured once per instance and never replaced afterwards.
    fn install_decorator(&self) {
        let (instance, decimals) = {
            let st = self.cell.borrow();
            (st.instance.clone(), st.config.decimals)
        };
        let Some(instance) = instance else {
            return;
        };
        let original = instance
            .formatting_fn()
            .unwrap_or_else(|| plain_format(decimals));
        let published = Rc::clone(&self.value);
        instance.set_formatting_fn(Rc::new(move |v: f64| {
            let s = original(v);
            *published.borrow_mut() = s.clone();
            s
        }));
    }

    /// The current animated display value.
    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    pub fn pause_resume(&self) {
        self.activate();
        unit::pause_resume(&self.cell);
    }

    pub fn reset(&self) {
        self.activate();
        unit::reset(&self.cell);
    }

    pub fn restart(&self) {
        self.activate();
        unit::restart(&self.cell);
    }

    pub fn update(&self, new_end: f64) {
        self.activate();
        unit::update(&self.cell, new_end);
    }

    /// Control handle bound to this hook's unit.
    pub fn handle(&self) -> ControlHandle {
        unit::handle(&self.cell)
    }
}

impl Drop for CountHook {
    fn drop(&mut self) {
        // Cancels any pending delayed start; a scheduled run never fires
        // after the hook is gone.
        unit::teardown(&self.cell);
    }
}
