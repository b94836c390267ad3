//! Configuration snapshots and callback slots.
//!
//! A `SyncConfig` is recomputed for every synchronization cycle and never
//! mutated in place; the diff between consecutive snapshots drives the
//! recreate/mutate/skip decision in [`crate::diff`].

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::engine::{EasingFn, FormattingFn};
use crate::error::SyncError;
use crate::handle::ControlHandle;
use crate::Result;

/// Display options forwarded verbatim to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    pub decimal: String,
    pub separator: String,
    pub prefix: String,
    pub suffix: String,
    pub use_easing: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            decimal: ".".to_string(),
            separator: String::new(),
            prefix: String::new(),
            suffix: String::new(),
            use_easing: true,
        }
    }
}

/// Immutable configuration snapshot for one synchronization cycle.
///
/// `end` is required (constructor argument); everything else defaults.
/// `delay` is in seconds; `None` and `Some(0.0)` both mean "no delay".
/// `redraw` forces a recreate+restart even when no relevant field changed.
#[derive(Clone)]
pub struct SyncConfig {
    pub start: f64,
    pub end: f64,
    pub duration: Option<f64>,
    pub decimals: u32,
    pub format: FormatOptions,
    pub easing_fn: Option<EasingFn>,
    pub formatting_fn: Option<FormattingFn>,
    pub delay: Option<f64>,
    pub redraw: bool,
}

impl SyncConfig {
    /// Snapshot with the required end value and defaults everywhere else.
    pub fn new(end: f64) -> Self {
        Self {
            start: 0.0,
            end,
            duration: None,
            decimals: 0,
            format: FormatOptions::default(),
            easing_fn: None,
            formatting_fn: None,
            delay: None,
            redraw: false,
        }
    }

    /// Effective delay in seconds; absent and zero collapse to "no delay".
    #[inline]
    pub fn effective_delay(&self) -> f64 {
        self.delay.unwrap_or(0.0).max(0.0)
    }

    /// Reject values the engine would misbehave on.
    pub fn validate(&self) -> Result<()> {
        if let Some(d) = self.delay {
            if !d.is_finite() || d < 0.0 {
                return Err(SyncError::invalid(format!(
                    "delay must be a non-negative number of seconds, got {d}"
                )));
            }
        }
        if let Some(d) = self.duration {
            if !d.is_finite() || d < 0.0 {
                return Err(SyncError::invalid(format!(
                    "duration must be a non-negative number of seconds, got {d}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("duration", &self.duration)
            .field("decimals", &self.decimals)
            .field("format", &self.format)
            .field("easing_fn", &self.easing_fn.is_some())
            .field("formatting_fn", &self.formatting_fn.is_some())
            .field("delay", &self.delay)
            .field("redraw", &self.redraw)
            .finish()
    }
}

/// Lifecycle callback invoked with the current control handle.
pub type HandleCallback = Rc<dyn Fn(&ControlHandle)>;

/// Callback slots for the managed component façade. Empty slots are no-ops.
#[derive(Clone, Default)]
pub struct Callbacks {
    pub on_start: Option<HandleCallback>,
    pub on_end: Option<HandleCallback>,
    pub on_reset: Option<HandleCallback>,
    pub on_pause_resume: Option<HandleCallback>,
    pub on_update: Option<HandleCallback>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_end", &self.on_end.is_some())
            .field("on_reset", &self.on_reset.is_some())
            .field("on_pause_resume", &self.on_pause_resume.is_some())
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_contract() {
        let cfg = SyncConfig::new(100.0);
        assert_eq!(cfg.start, 0.0);
        assert_eq!(cfg.decimals, 0);
        assert_eq!(cfg.format.decimal, ".");
        assert_eq!(cfg.format.separator, "");
        assert!(cfg.format.use_easing);
        assert!(cfg.duration.is_none());
        assert!(cfg.delay.is_none());
        assert!(!cfg.redraw);
    }

    #[test]
    fn absent_and_zero_delay_are_equivalent() {
        let mut cfg = SyncConfig::new(1.0);
        assert_eq!(cfg.effective_delay(), 0.0);
        cfg.delay = Some(0.0);
        assert_eq!(cfg.effective_delay(), 0.0);
        cfg.delay = Some(1.5);
        assert_eq!(cfg.effective_delay(), 1.5);
    }

    #[test]
    fn format_options_round_trip() {
        let opts = FormatOptions {
            separator: ",".into(),
            prefix: "$".into(),
            ..FormatOptions::default()
        };
        let json = serde_json::to_string(&opts).unwrap();
        let back: FormatOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(opts, back);
    }

    #[test]
    fn negative_delay_is_rejected() {
        let mut cfg = SyncConfig::new(1.0);
        cfg.delay = Some(-0.5);
        assert!(matches!(
            cfg.validate(),
            Err(SyncError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn negative_duration_is_rejected() {
        let mut cfg = SyncConfig::new(1.0);
        cfg.duration = Some(-2.0);
        assert!(cfg.validate().is_err());
    }
}
