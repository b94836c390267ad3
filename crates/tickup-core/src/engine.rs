//! Boundary contract with the count-up animation engine.
//!
//! The engine is an external collaborator: it owns easing math, display text
//! mutation and frame scheduling. This module pins down the only surface this
//! crate consumes, so any engine matching it is interchangeable.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Per-frame formatting function: animated value in, display string out.
pub type FormattingFn = Rc<dyn Fn(f64) -> String>;

/// Easing function `(t, start, delta, duration) -> value`.
pub type EasingFn = Rc<dyn Fn(f64, f64, f64, f64) -> f64>;

/// Callback the engine invokes once a run finishes.
pub type CompletionFn = Box<dyn FnOnce()>;

/// Render target handed to the engine at construction.
///
/// `NoElement` is the sentinel used by the hook façade, which drives display
/// purely through the formatting intercept instead of a real target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    /// Host-resolved handle of the element whose text the engine mutates.
    Element(String),
    /// No render target; the engine animates values only.
    NoElement,
}

impl Target {
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, Target::Element(_))
    }
}

/// Options recognized by the engine constructor.
///
/// `use_grouping` is never set directly by callers; the factory derives it
/// from `separator`. Function slots stay `None` when the caller supplied
/// nothing, so the engine falls back to its own defaults.
#[derive(Clone)]
pub struct EngineOptions {
    pub decimal: String,
    pub separator: String,
    pub prefix: String,
    pub suffix: String,
    pub use_easing: bool,
    pub use_grouping: bool,
    pub easing_fn: Option<EasingFn>,
    pub formatting_fn: Option<FormattingFn>,
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions")
            .field("decimal", &self.decimal)
            .field("separator", &self.separator)
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("use_easing", &self.use_easing)
            .field("use_grouping", &self.use_grouping)
            .field("easing_fn", &self.easing_fn.is_some())
            .field("formatting_fn", &self.formatting_fn.is_some())
            .finish()
    }
}

/// One live animation run owned by a synchronization unit.
///
/// Methods take `&self`: the engine is a stateful object with its own
/// interior timers, and completion callbacks may re-enter the control
/// surface while a run is in flight.
pub trait CountInstance {
    /// Begin the run. `on_complete` fires once the animation finishes.
    fn start(&self, on_complete: CompletionFn);
    /// Toggle between paused and running.
    fn pause_resume(&self);
    /// Return the displayed value to the configured start.
    fn reset(&self);
    /// Retarget the run to a new end value without restarting.
    fn update(&self, new_end: f64);

    /// The formatting function currently in effect (the engine always has
    /// one, but may report `None` when running on its built-in default).
    fn formatting_fn(&self) -> Option<FormattingFn>;
    /// Replace the formatting function on the live instance.
    fn set_formatting_fn(&self, f: FormattingFn);
}

/// Engine constructor boundary.
pub trait CountEngine {
    /// Construct a fresh instance. Construction must not start the run.
    fn create(
        &self,
        target: &Target,
        start: f64,
        end: f64,
        decimals: u32,
        duration: Option<f64>,
        options: EngineOptions,
    ) -> Rc<dyn CountInstance>;
}
