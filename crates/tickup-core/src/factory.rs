//! Instance factory: configuration snapshot -> fresh engine instance.

use std::rc::Rc;

use crate::config::SyncConfig;
use crate::engine::{CountEngine, CountInstance, EngineOptions, Target};

/// Construct a fresh instance from a configuration snapshot.
///
/// Pure with respect to its inputs aside from the engine constructing a
/// stateful object. Starting the run is a separate, explicit step.
///
/// `use_grouping` is derived from `separator`; absent easing/formatting
/// functions are left out of the options so the engine keeps its own
/// defaults instead of receiving a bogus override.
pub fn create_instance(
    engine: &dyn CountEngine,
    config: &SyncConfig,
    target: &Target,
) -> Rc<dyn CountInstance> {
    let options = EngineOptions {
        decimal: config.format.decimal.clone(),
        separator: config.format.separator.clone(),
        prefix: config.format.prefix.clone(),
        suffix: config.format.suffix.clone(),
        use_easing: config.format.use_easing,
        use_grouping: !config.format.separator.is_empty(),
        easing_fn: config.easing_fn.clone(),
        formatting_fn: config.formatting_fn.clone(),
    };

    engine.create(
        target,
        config.start,
        config.end,
        config.decimals,
        config.duration,
        options,
    )
}
