//! Shared synchronization state behind both façades.
//!
//! One unit owns exactly one live engine instance and at most one pending
//! delayed-start timer. Both façades and every [`ControlHandle`] operate on
//! the same cell, so control is always late-bound to the current instance.
//!
//! No `RefCell` borrow is ever held across an engine call or a user
//! callback: completion and lifecycle callbacks are allowed to re-enter the
//! control surface immediately.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::config::{Callbacks, HandleCallback, SyncConfig};
use crate::diff::{classify, SyncAction};
use crate::engine::{CountEngine, CountInstance, Target};
use crate::factory::create_instance;
use crate::handle::ControlHandle;
use crate::timer::{DelayScheduler, TimerId};

/// Mutable state of one synchronization unit.
pub(crate) struct UnitState {
    pub(crate) engine: Rc<dyn CountEngine>,
    pub(crate) scheduler: Rc<dyn DelayScheduler>,
    pub(crate) config: SyncConfig,
    pub(crate) callbacks: Callbacks,
    pub(crate) target: Target,
    pub(crate) instance: Option<Rc<dyn CountInstance>>,
    pub(crate) pending: Option<TimerId>,
    pub(crate) torn_down: bool,
}

pub(crate) type UnitCell = Rc<RefCell<UnitState>>;

impl Drop for UnitState {
    fn drop(&mut self) {
        // Scoped acquisition: a pending timer never outlives its unit.
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
    }
}

pub(crate) fn new_unit(
    engine: Rc<dyn CountEngine>,
    scheduler: Rc<dyn DelayScheduler>,
    config: SyncConfig,
    callbacks: Callbacks,
    target: Target,
) -> UnitCell {
    Rc::new(RefCell::new(UnitState {
        engine,
        scheduler,
        config,
        callbacks,
        target,
        instance: None,
        pending: None,
        torn_down: false,
    }))
}

fn cancel_pending(cell: &UnitCell) {
    let taken = {
        let mut st = cell.borrow_mut();
        st.pending.take().map(|id| (st.scheduler.clone(), id))
    };
    if let Some((scheduler, id)) = taken {
        scheduler.cancel(id);
    }
}

/// Create the instance slot if empty. Returns true when a fresh instance was
/// constructed.
pub(crate) fn ensure_instance(cell: &UnitCell) -> bool {
    {
        let st = cell.borrow();
        if st.instance.is_some() || st.torn_down {
            return false;
        }
    }
    let instance = {
        let st = cell.borrow();
        create_instance(st.engine.as_ref(), &st.config, &st.target)
    };
    cell.borrow_mut().instance = Some(instance);
    true
}

/// Retire the live instance: cancel its pending timer (at most once) and
/// drop it, then construct and start a replacement. There is no window in
/// which both instances are live.
pub(crate) fn recreate(cell: &UnitCell) {
    cancel_pending(cell);
    cell.borrow_mut().instance = None;
    ensure_instance(cell);
    start(cell);
}

/// Apply a new configuration snapshot, classify the change and act on it.
pub(crate) fn apply(cell: &UnitCell, next: SyncConfig) -> SyncAction {
    let action = classify(&cell.borrow().config, &next);
    cell.borrow_mut().config = next;
    match action {
        SyncAction::Recreate => recreate(cell),
        SyncAction::Mutate => {
            // Retarget in place: reset, then chase the new end. Deliberately
            // bypasses the notification wrappers so no callbacks fire.
            let (instance, end) = {
                let st = cell.borrow();
                (st.instance.clone(), st.config.end)
            };
            if let Some(instance) = instance {
                instance.reset();
                instance.update(end);
            }
        }
        SyncAction::Skip => {}
    }
    action
}

/// Invoke the engine's start on the current instance, wiring its completion
/// callback to `on_end`. Both the completion wiring and the late teardown
/// check read the cell at fire time, not at scheduling time.
fn run_engine_start(weak: &Weak<RefCell<UnitState>>) {
    let Some(cell) = weak.upgrade() else {
        return;
    };
    let instance = {
        let st = cell.borrow();
        if st.torn_down {
            return;
        }
        st.instance.clone()
    };
    let Some(instance) = instance else {
        return;
    };
    let weak = Rc::downgrade(&cell);
    instance.start(Box::new(move || {
        let Some(cell) = weak.upgrade() else {
            return;
        };
        let cb = cell.borrow().callbacks.on_end.clone();
        invoke(&cell, cb);
    }));
}

/// Start the run per the delay protocol.
///
/// With a positive delay, a single timer is scheduled (any prior timer for
/// this unit is cancelled first) and the engine start runs when it fires.
/// `on_start` is notified synchronously either way: it reports that a start
/// was requested, not that the run began.
pub(crate) fn start(cell: &UnitCell) {
    let (delay, scheduler, on_start) = {
        let st = cell.borrow();
        if st.torn_down {
            return;
        }
        (
            st.config.effective_delay(),
            st.scheduler.clone(),
            st.callbacks.on_start.clone(),
        )
    };

    // A unit owns at most one outstanding timer; any earlier request is
    // superseded by this one.
    cancel_pending(cell);

    if delay > 0.0 {
        let weak = Rc::downgrade(cell);
        let id = scheduler.schedule(
            Duration::from_secs_f64(delay),
            Box::new(move || {
                if let Some(cell) = weak.upgrade() {
                    cell.borrow_mut().pending = None;
                    run_engine_start(&Rc::downgrade(&cell));
                }
            }),
        );
        cell.borrow_mut().pending = Some(id);
    } else {
        run_engine_start(&Rc::downgrade(cell));
    }

    invoke(cell, on_start);
}

pub(crate) fn pause_resume(cell: &UnitCell) {
    let (instance, cb) = {
        let st = cell.borrow();
        (st.instance.clone(), st.callbacks.on_pause_resume.clone())
    };
    let Some(instance) = instance else {
        return;
    };
    instance.pause_resume();
    invoke(cell, cb);
}

pub(crate) fn reset(cell: &UnitCell) {
    let (instance, cb) = {
        let st = cell.borrow();
        (st.instance.clone(), st.callbacks.on_reset.clone())
    };
    let Some(instance) = instance else {
        return;
    };
    instance.reset();
    invoke(cell, cb);
}

/// Reset then start again, re-applying the delay policy.
pub(crate) fn restart(cell: &UnitCell) {
    reset(cell);
    start(cell);
}

pub(crate) fn update(cell: &UnitCell, new_end: f64) {
    let (instance, cb) = {
        let st = cell.borrow();
        (st.instance.clone(), st.callbacks.on_update.clone())
    };
    let Some(instance) = instance else {
        return;
    };
    // The stored config stays the last declarative snapshot; an imperative
    // retarget through the handle does not rewrite it.
    instance.update(new_end);
    invoke(cell, cb);
}

/// Retire the unit: cancel any pending timer, drop the instance, and refuse
/// any later start. Safe to call with no instance ever created.
pub(crate) fn teardown(cell: &UnitCell) {
    cancel_pending(cell);
    let mut st = cell.borrow_mut();
    st.torn_down = true;
    st.instance = None;
}

pub(crate) fn handle(cell: &UnitCell) -> ControlHandle {
    ControlHandle::new(Rc::downgrade(cell))
}

fn invoke(cell: &UnitCell, cb: Option<HandleCallback>) {
    if let Some(cb) = cb {
        cb(&handle(cell));
    }
}
