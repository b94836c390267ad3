use std::cell::Cell;
use std::rc::Rc;

use tickup_core::{
    Callbacks, CountEngine, DelayScheduler, ManagedCount, SyncAction, SyncConfig, SyncError,
    Target, TargetMode,
};
use tickup_test_fixtures::{InstanceCall, ManualScheduler, ScriptedEngine};

fn base_config() -> SyncConfig {
    SyncConfig {
        duration: Some(2.0),
        ..SyncConfig::new(100.0)
    }
}

fn managed(
    engine: &Rc<ScriptedEngine>,
    sched: &Rc<ManualScheduler>,
    config: SyncConfig,
    callbacks: Callbacks,
) -> ManagedCount {
    ManagedCount::new(
        Rc::clone(engine) as Rc<dyn CountEngine>,
        Rc::clone(sched) as Rc<dyn DelayScheduler>,
        TargetMode::Fixed(Target::Element("counter".into())),
        config,
        callbacks,
    )
    .expect("config is valid")
}

/// it should create, auto-start and notify through the full run
/// (end=100, duration=2, start=0)
#[test]
fn mount_starts_and_completes() {
    let engine = ScriptedEngine::new();
    let sched = ManualScheduler::new();

    let starts = Rc::new(Cell::new(0u32));
    let ends = Rc::new(Cell::new(0u32));
    let callbacks = Callbacks {
        on_start: Some(Rc::new({
            let starts = Rc::clone(&starts);
            move |_| starts.set(starts.get() + 1)
        })),
        on_end: Some(Rc::new({
            let ends = Rc::clone(&ends);
            move |handle| {
                ends.set(ends.get() + 1);
                // A completion callback may drive the handle immediately.
                handle.reset();
            }
        })),
        ..Callbacks::default()
    };

    let mut count = managed(&engine, &sched, base_config(), callbacks);
    let _handle = count.mount().unwrap();

    assert_eq!(engine.created_count(), 1);
    let inst = engine.last().unwrap();
    assert_eq!(inst.start_value(), 0.0);
    assert_eq!(inst.end_value(), 100.0);
    assert_eq!(inst.duration(), Some(2.0));
    assert_eq!(inst.start_count(), 1);
    assert_eq!(starts.get(), 1);
    assert_eq!(ends.get(), 0);
    assert!(inst.is_running());

    inst.complete();
    assert_eq!(ends.get(), 1);
    // on_end reset the displayed value back toward start
    assert_eq!(inst.reset_count(), 1);
    assert_eq!(inst.current_value(), 0.0);
}

/// it should skip all work when no relevant field changed
#[test]
fn irrelevant_update_is_a_noop() {
    let engine = ScriptedEngine::new();
    let sched = ManualScheduler::new();
    let mut count = managed(&engine, &sched, base_config(), Callbacks::default());
    count.mount().unwrap();

    let mut next = base_config();
    next.decimals = 2;
    next.format.prefix = "$".into();
    next.format.separator = ",".into();

    let action = count.update(next).unwrap();
    assert_eq!(action, SyncAction::Skip);
    assert_eq!(engine.created_count(), 1);
    assert_eq!(engine.last().unwrap().start_count(), 1);
    assert_eq!(sched.scheduled_count(), 0);
}

/// it should recreate and restart when duration changes
#[test]
fn duration_change_recreates() {
    let engine = ScriptedEngine::new();
    let sched = ManualScheduler::new();
    let mut count = managed(&engine, &sched, base_config(), Callbacks::default());
    count.mount().unwrap();

    let first = engine.last().unwrap();
    let next = SyncConfig {
        duration: Some(4.0),
        ..base_config()
    };
    let action = count.update(next).unwrap();

    assert_eq!(action, SyncAction::Recreate);
    assert_eq!(engine.created_count(), 2);
    let second = engine.last().unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(second.duration(), Some(4.0));
    assert_eq!(second.start_count(), 1);
    // the retired instance is never started again
    assert_eq!(first.start_count(), 1);
}

/// it should cancel the previous pending timer exactly once on recreate
#[test]
fn recreate_cancels_pending_timer_once() {
    let engine = ScriptedEngine::new();
    let sched = ManualScheduler::new();
    let config = SyncConfig {
        delay: Some(5.0),
        ..base_config()
    };
    let mut count = managed(&engine, &sched, config, Callbacks::default());
    count.mount().unwrap();

    // the run is waiting on the delay timer
    assert_eq!(sched.pending_count(), 1);
    assert_eq!(engine.last().unwrap().start_count(), 0);

    let next = SyncConfig {
        delay: Some(5.0),
        duration: Some(4.0),
        ..base_config()
    };
    count.update(next).unwrap();

    assert_eq!(sched.cancelled_count(), 1);
    assert_eq!(sched.scheduled_count(), 2);
    assert_eq!(sched.pending_count(), 1);
    assert_eq!(engine.created_count(), 2);

    sched.advance(std::time::Duration::from_secs(5));
    let instances = engine.created();
    assert_eq!(instances[0].start_count(), 0);
    assert_eq!(instances[1].start_count(), 1);
}

/// it should reset and update the same instance when only end changed
#[test]
fn end_change_mutates_in_place() {
    let engine = ScriptedEngine::new();
    let sched = ManualScheduler::new();

    let starts = Rc::new(Cell::new(0u32));
    let resets = Rc::new(Cell::new(0u32));
    let updates = Rc::new(Cell::new(0u32));
    let callbacks = Callbacks {
        on_start: Some(Rc::new({
            let starts = Rc::clone(&starts);
            move |_| starts.set(starts.get() + 1)
        })),
        on_reset: Some(Rc::new({
            let resets = Rc::clone(&resets);
            move |_| resets.set(resets.get() + 1)
        })),
        on_update: Some(Rc::new({
            let updates = Rc::clone(&updates);
            move |_| updates.set(updates.get() + 1)
        })),
        ..Callbacks::default()
    };
    let mut count = managed(&engine, &sched, base_config(), callbacks);
    count.mount().unwrap();
    assert_eq!(starts.get(), 1);

    let next = SyncConfig {
        end: 250.0,
        ..base_config()
    };
    let action = count.update(next).unwrap();

    assert_eq!(action, SyncAction::Mutate);
    assert_eq!(engine.created_count(), 1);
    let inst = engine.last().unwrap();
    assert_eq!(
        inst.calls(),
        vec![
            InstanceCall::Start,
            InstanceCall::Reset,
            InstanceCall::Update(250.0)
        ]
    );
    // the in-place retarget fires no notifications
    assert_eq!(starts.get(), 1);
    assert_eq!(resets.get(), 0);
    assert_eq!(updates.get(), 0);
}

/// it should treat the redraw flag as a forced recreate+restart
#[test]
fn redraw_flag_forces_recreate() {
    let engine = ScriptedEngine::new();
    let sched = ManualScheduler::new();
    let mut count = managed(&engine, &sched, base_config(), Callbacks::default());
    count.mount().unwrap();

    let next = SyncConfig {
        redraw: true,
        ..base_config()
    };
    let action = count.update(next).unwrap();

    assert_eq!(action, SyncAction::Recreate);
    assert_eq!(engine.created_count(), 2);
    assert_eq!(engine.last().unwrap().start_count(), 1);
}

/// it should refuse double mount and update before mount
#[test]
fn lifecycle_misuse_is_an_error() {
    let engine = ScriptedEngine::new();
    let sched = ManualScheduler::new();
    let mut count = managed(&engine, &sched, base_config(), Callbacks::default());

    assert_eq!(
        count.update(base_config()).unwrap_err(),
        SyncError::NotMounted
    );
    count.mount().unwrap();
    assert_eq!(count.mount().unwrap_err(), SyncError::AlreadyMounted);

    count.unmount();
    assert_eq!(
        count.update(base_config()).unwrap_err(),
        SyncError::NotMounted
    );
    // repeated unmount stays quiet
    count.unmount();
}

/// it should reject invalid numeric configuration up front
#[test]
fn invalid_config_is_rejected() {
    let engine = ScriptedEngine::new();
    let sched = ManualScheduler::new();
    let bad = SyncConfig {
        delay: Some(-1.0),
        ..base_config()
    };
    let err = ManagedCount::new(
        Rc::clone(&engine) as Rc<dyn CountEngine>,
        Rc::clone(&sched) as Rc<dyn DelayScheduler>,
        TargetMode::Fixed(Target::Element("counter".into())),
        bad,
        Callbacks::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SyncError::InvalidConfig { .. }));
}
