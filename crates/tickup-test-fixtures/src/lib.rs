//! Deterministic test doubles for the two external boundaries of
//! `tickup-core`: a scripted count-up engine that records every call it
//! receives, and a manually advanced timer scheduler.
//!
//! Everything here is single-threaded, matching the execution model of the
//! layer under test.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tickup_core::engine::CompletionFn;
use tickup_core::{
    CountEngine, CountInstance, DelayScheduler, EngineOptions, FormattingFn, Target, TimerId,
};

/// One recorded instance operation.
#[derive(Clone, Debug, PartialEq)]
pub enum InstanceCall {
    Start,
    PauseResume,
    Reset,
    Update(f64),
}

/// Engine instance that records its calls instead of animating.
///
/// `start` parks the completion callback; [`complete`] fires it, standing in
/// for the engine's internal frame loop reaching the end value.
///
/// [`complete`]: ScriptedInstance::complete
pub struct ScriptedInstance {
    id: usize,
    target: Target,
    start: f64,
    end: f64,
    decimals: u32,
    duration: Option<f64>,
    options: EngineOptions,
    calls: RefCell<Vec<InstanceCall>>,
    completion: RefCell<Option<CompletionFn>>,
    formatting: RefCell<Option<FormattingFn>>,
    current: Cell<f64>,
}

impl ScriptedInstance {
    fn new(
        id: usize,
        target: Target,
        start: f64,
        end: f64,
        decimals: u32,
        duration: Option<f64>,
        options: EngineOptions,
    ) -> Self {
        let formatting = options.formatting_fn.clone();
        Self {
            id,
            target,
            start,
            end,
            decimals,
            duration,
            options,
            calls: RefCell::new(Vec::new()),
            completion: RefCell::new(None),
            formatting: RefCell::new(formatting),
            current: Cell::new(start),
        }
    }

    /// Creation index within the parent [`ScriptedEngine`].
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn start_value(&self) -> f64 {
        self.start
    }

    pub fn end_value(&self) -> f64 {
        self.end
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Options as passed at construction.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<InstanceCall> {
        self.calls.borrow().clone()
    }

    pub fn start_count(&self) -> usize {
        self.count(|c| matches!(c, InstanceCall::Start))
    }

    pub fn reset_count(&self) -> usize {
        self.count(|c| matches!(c, InstanceCall::Reset))
    }

    pub fn update_count(&self) -> usize {
        self.count(|c| matches!(c, InstanceCall::Update(_)))
    }

    fn count(&self, pred: impl Fn(&InstanceCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    /// Whether a run is in flight (started, completion not yet fired).
    pub fn is_running(&self) -> bool {
        self.completion.borrow().is_some()
    }

    /// Finish the current run: fires the parked completion callback. Panics
    /// if no run is in flight, which in these tests means start never made
    /// it to the engine.
    pub fn complete(&self) {
        let cb = self
            .completion
            .borrow_mut()
            .take()
            .expect("no run in flight on scripted instance");
        self.current.set(self.end);
        cb();
    }

    /// Push one animated value through the formatting function, as the
    /// engine would on every frame. Returns the display string.
    pub fn render_frame(&self, value: f64) -> String {
        self.current.set(value);
        let f = self.formatting.borrow().clone();
        match f {
            Some(f) => f(value),
            None => format!("{:.*}", self.decimals as usize, value),
        }
    }

    /// The value last pushed through [`render_frame`] (or start/end bounds).
    ///
    /// [`render_frame`]: ScriptedInstance::render_frame
    pub fn current_value(&self) -> f64 {
        self.current.get()
    }
}

impl CountInstance for ScriptedInstance {
    fn start(&self, on_complete: CompletionFn) {
        self.calls.borrow_mut().push(InstanceCall::Start);
        *self.completion.borrow_mut() = Some(on_complete);
    }

    fn pause_resume(&self) {
        self.calls.borrow_mut().push(InstanceCall::PauseResume);
    }

    fn reset(&self) {
        self.calls.borrow_mut().push(InstanceCall::Reset);
        self.current.set(self.start);
    }

    fn update(&self, new_end: f64) {
        self.calls.borrow_mut().push(InstanceCall::Update(new_end));
    }

    fn formatting_fn(&self) -> Option<FormattingFn> {
        self.formatting.borrow().clone()
    }

    fn set_formatting_fn(&self, f: FormattingFn) {
        *self.formatting.borrow_mut() = Some(f);
    }
}

/// Engine double that hands out [`ScriptedInstance`]s and keeps them all for
/// later inspection, so tests can tell a recreate from a mutate by identity.
#[derive(Default)]
pub struct ScriptedEngine {
    created: RefCell<Vec<Rc<ScriptedInstance>>>,
}

impl ScriptedEngine {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Number of instances constructed so far.
    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }

    /// All constructed instances, oldest first.
    pub fn created(&self) -> Vec<Rc<ScriptedInstance>> {
        self.created.borrow().clone()
    }

    /// Most recently constructed instance.
    pub fn last(&self) -> Option<Rc<ScriptedInstance>> {
        self.created.borrow().last().cloned()
    }
}

impl CountEngine for ScriptedEngine {
    fn create(
        &self,
        target: &Target,
        start: f64,
        end: f64,
        decimals: u32,
        duration: Option<f64>,
        options: EngineOptions,
    ) -> Rc<dyn CountInstance> {
        let id = self.created.borrow().len();
        let instance = Rc::new(ScriptedInstance::new(
            id,
            target.clone(),
            start,
            end,
            decimals,
            duration,
            options,
        ));
        self.created.borrow_mut().push(Rc::clone(&instance));
        instance
    }
}

struct PendingTimer {
    id: TimerId,
    remaining: Duration,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct SchedulerInner {
    next_id: u64,
    queue: Vec<PendingTimer>,
    scheduled: u64,
    cancelled: u64,
}

/// Manually advanced one-shot timer queue.
///
/// Timers scheduled while `advance` is firing callbacks keep their full
/// delay; only timers that existed when `advance` was called are aged.
#[derive(Default)]
pub struct ManualScheduler {
    inner: RefCell<SchedulerInner>,
}

impl ManualScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Move time forward, firing every timer that comes due, in due order.
    pub fn advance(&self, delta: Duration) {
        let due: Vec<PendingTimer> = {
            let mut inner = self.inner.borrow_mut();
            for t in inner.queue.iter_mut() {
                t.remaining = t.remaining.saturating_sub(delta);
            }
            let mut due: Vec<PendingTimer> = Vec::new();
            let mut keep: Vec<PendingTimer> = Vec::new();
            for t in inner.queue.drain(..) {
                if t.remaining.is_zero() {
                    due.push(t);
                } else {
                    keep.push(t);
                }
            }
            inner.queue = keep;
            due
        };
        for t in due {
            (t.callback)();
        }
    }

    /// Timers currently waiting.
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Total timers ever scheduled.
    pub fn scheduled_count(&self) -> u64 {
        self.inner.borrow().scheduled
    }

    /// Total live timers cancelled (cancelling a fired or unknown timer does
    /// not count).
    pub fn cancelled_count(&self) -> u64 {
        self.inner.borrow().cancelled
    }
}

impl DelayScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        inner.scheduled += 1;
        inner.queue.push(PendingTimer {
            id,
            remaining: delay,
            callback,
        });
        id
    }

    fn cancel(&self, id: TimerId) {
        let mut inner = self.inner.borrow_mut();
        let before = inner.queue.len();
        inner.queue.retain(|t| t.id != id);
        if inner.queue.len() != before {
            inner.cancelled += 1;
        }
    }
}
