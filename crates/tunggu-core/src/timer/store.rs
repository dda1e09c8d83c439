//! Timer entity store.
//!
//! The store is the single source of truth for timer state. It is an
//! explicit object, constructed once at application start and handed to
//! each binding by reference; tests build isolated instances.
//!
//! Every mutating operation on an unknown id is a silent no-op. Bindings
//! tear timers down on unmount while a scheduled tick may still be in
//! flight, so the store has to shrug off calls for ids that are gone.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::entity::{Timer, TimerConfig, TimerId, TimerStage};
use crate::events::Event;

/// Shared handle to a [`TimerStore`]. One per application.
pub type SharedStore = Arc<Mutex<TimerStore>>;

/// Lock a shared store, recovering the inner state if a panicking holder
/// poisoned the mutex. Timer state is valid after every operation, so a
/// poisoned lock still yields usable data.
pub(crate) fn lock(store: &SharedStore) -> MutexGuard<'_, TimerStore> {
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
pub struct TimerStore {
    timers: HashMap<TimerId, Timer>,
    active_id: Option<TimerId>,
}

impl TimerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// New store behind a shared handle, ready to pass to bindings.
    pub fn shared() -> SharedStore {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Create a timer and return its fresh id.
    ///
    /// When stages are supplied, the total duration is the stage-duration
    /// sum -- any explicitly passed duration is ignored -- and the stage
    /// index starts at 0. An empty stage list counts as no stages.
    pub fn create(&mut self, config: TimerConfig) -> TimerId {
        let id = TimerId::new_v4();
        let stages = config.stages.filter(|stages| !stages.is_empty());
        let duration = match &stages {
            Some(stages) => stages.iter().map(|s| s.duration).sum(),
            None => config.duration,
        };
        let timer = Timer {
            id,
            kind: config.kind,
            name: config.name,
            category: config.category,
            duration,
            elapsed: 0,
            remaining: duration,
            is_running: false,
            is_paused: false,
            is_completed: false,
            current_stage_index: stages.as_ref().map(|_| 0),
            stages,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        };
        self.timers.insert(id, timer);
        id
    }

    /// Begin (or resume) running. Stamps `started_at` and records the id as
    /// the active pointer.
    pub fn start(&mut self, id: TimerId) -> Option<Event> {
        let timer = self.timers.get_mut(&id)?;
        let resumed = timer.is_paused;
        timer.is_running = true;
        timer.is_paused = false;
        timer.started_at = Some(Utc::now());
        self.active_id = Some(id);
        Some(if resumed {
            Event::TimerResumed {
                id,
                remaining_secs: timer.remaining,
                at: Utc::now(),
            }
        } else {
            Event::TimerStarted {
                id,
                name: timer.name.clone(),
                duration_secs: timer.duration,
                at: Utc::now(),
            }
        })
    }

    /// Stop running without touching elapsed/remaining. The tick schedule
    /// is the caller's to cancel.
    pub fn pause(&mut self, id: TimerId) -> Option<Event> {
        let timer = self.timers.get_mut(&id)?;
        timer.is_running = false;
        timer.is_paused = true;
        Some(Event::TimerPaused {
            id,
            remaining_secs: timer.remaining,
            at: Utc::now(),
        })
    }

    /// Back to the initial state: elapsed 0, full remaining, flags cleared,
    /// stage index 0, start/completion stamps cleared.
    pub fn reset(&mut self, id: TimerId) -> Option<Event> {
        let timer = self.timers.get_mut(&id)?;
        timer.elapsed = 0;
        timer.remaining = timer.duration;
        timer.is_running = false;
        timer.is_paused = false;
        timer.is_completed = false;
        timer.current_stage_index = timer.stages.as_ref().map(|_| 0);
        timer.started_at = None;
        timer.completed_at = None;
        Some(Event::TimerReset { id, at: Utc::now() })
    }

    /// Change the target length, zeroing elapsed and snapping remaining to
    /// the new value. An immediate visual reset, not a resume-in-place;
    /// the running flags are left alone.
    pub fn set_duration(&mut self, id: TimerId, secs: u64) -> Option<Event> {
        let timer = self.timers.get_mut(&id)?;
        timer.duration = secs;
        timer.remaining = secs;
        timer.elapsed = 0;
        Some(Event::DurationChanged {
            id,
            duration_secs: secs,
            at: Utc::now(),
        })
    }

    /// Count one stopwatch second. Remaining stays 0 and the timer never
    /// completes through this path.
    pub fn advance_stopwatch(&mut self, id: TimerId) -> Option<Event> {
        let timer = self.timers.get_mut(&id)?;
        if !timer.is_running {
            return None;
        }
        timer.elapsed += 1;
        timer.remaining = 0;
        Some(Event::StopwatchTicked {
            id,
            elapsed_secs: timer.elapsed,
            at: Utc::now(),
        })
    }

    /// Remove a timer. Clears the active pointer if it matched.
    pub fn remove(&mut self, id: TimerId) {
        self.timers.remove(&id);
        if self.active_id == Some(id) {
            self.active_id = None;
        }
    }

    /// Advance a running countdown by one second.
    ///
    /// Pure state transition: the returned events are for the caller to
    /// dispatch ([`StageAdvanced`](Event::StageAdvanced) on a boundary
    /// crossing, [`TimerCompleted`](Event::TimerCompleted) when the
    /// countdown runs out). Missing or not-running timers yield no events
    /// and no mutation.
    pub fn tick(&mut self, id: TimerId) -> Vec<Event> {
        let Some(timer) = self.timers.get_mut(&id) else {
            return Vec::new();
        };
        if !timer.is_running {
            return Vec::new();
        }

        timer.elapsed += 1;
        timer.remaining = timer.duration.saturating_sub(timer.elapsed);

        let mut events = Vec::new();
        if let (Some(stages), Some(index)) = (&timer.stages, timer.current_stage_index) {
            let target = stage_index_for(stages, timer.elapsed);
            if target != index {
                events.push(Event::StageAdvanced {
                    id,
                    from_index: index,
                    to_index: target,
                    from_name: stages[index].name.clone(),
                    to_name: stages[target].name.clone(),
                    at: Utc::now(),
                });
                timer.current_stage_index = Some(target);
            }
        }

        if timer.remaining == 0 {
            timer.is_completed = true;
            timer.is_running = false;
            timer.completed_at = Some(Utc::now());
            events.push(Event::TimerCompleted {
                id,
                kind: timer.kind,
                name: timer.name.clone(),
                at: Utc::now(),
            });
        }
        events
    }

    pub fn get(&self, id: TimerId) -> Option<&Timer> {
        self.timers.get(&id)
    }

    /// The most recently started timer, if it still exists. A convenience
    /// pointer only; it never gates other timers.
    pub fn active(&self) -> Option<&Timer> {
        self.timers.get(&self.active_id?)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// The one authoritative stage computation.
///
/// Walks the stage list accumulating durations and picks the first stage
/// whose window has not yet been used up -- at an exact boundary the next
/// stage is selected. Elapsed past the final boundary keeps the final
/// stage (the timer completes instead). Zero-length stages are skipped.
fn stage_index_for(stages: &[TimerStage], elapsed: u64) -> usize {
    let mut rest = elapsed;
    for (i, stage) in stages.iter().enumerate() {
        if rest < stage.duration {
            return i;
        }
        rest -= stage.duration;
    }
    stages.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::entity::{StageKind, TimerCategory, TimerKind};
    use proptest::prelude::*;

    fn plain_config(duration: u64) -> TimerConfig {
        TimerConfig {
            kind: TimerKind::Countdown,
            name: "Timer".into(),
            category: TimerCategory::Productivity,
            duration,
            stages: None,
        }
    }

    fn stage(name: &str, duration: u64, kind: StageKind) -> TimerStage {
        TimerStage {
            id: format!("stage-{name}"),
            name: name.into(),
            duration,
            kind,
        }
    }

    fn hiit_config() -> TimerConfig {
        TimerConfig {
            kind: TimerKind::Hiit,
            name: "HIIT".into(),
            category: TimerCategory::Fitness,
            duration: 60, // overridden by the stage sum
            stages: Some(vec![
                stage("Work 1", 20, StageKind::Work),
                stage("Rest 1", 10, StageKind::Rest),
                stage("Work 2", 20, StageKind::Work),
            ]),
        }
    }

    #[test]
    fn create_initializes_fresh_state() {
        let mut store = TimerStore::new();
        let id = store.create(plain_config(60));
        let timer = store.get(id).unwrap();
        assert_eq!(timer.duration, 60);
        assert_eq!(timer.elapsed, 0);
        assert_eq!(timer.remaining, 60);
        assert!(!timer.is_running && !timer.is_paused && !timer.is_completed);
        assert!(timer.started_at.is_none());
        assert!(timer.stages.is_none());
    }

    #[test]
    fn create_with_stages_sums_durations_over_explicit_duration() {
        let mut store = TimerStore::new();
        let id = store.create(hiit_config());
        let timer = store.get(id).unwrap();
        assert_eq!(timer.duration, 50);
        assert_eq!(timer.remaining, 50);
        assert_eq!(timer.current_stage_index, Some(0));
    }

    #[test]
    fn create_treats_empty_stage_list_as_no_stages() {
        let mut store = TimerStore::new();
        let mut config = plain_config(45);
        config.stages = Some(Vec::new());
        let id = store.create(config);
        let timer = store.get(id).unwrap();
        assert_eq!(timer.duration, 45);
        assert!(timer.stages.is_none());
        assert!(timer.current_stage_index.is_none());
    }

    #[test]
    fn start_sets_flags_and_active_pointer() {
        let mut store = TimerStore::new();
        let id = store.create(plain_config(60));
        let event = store.start(id).unwrap();
        assert!(matches!(event, Event::TimerStarted { .. }));
        let timer = store.get(id).unwrap();
        assert!(timer.is_running && !timer.is_paused);
        assert!(timer.started_at.is_some());
        assert_eq!(store.active().unwrap().id, id);
    }

    #[test]
    fn start_after_pause_reports_resume() {
        let mut store = TimerStore::new();
        let id = store.create(plain_config(60));
        store.start(id);
        store.pause(id);
        let event = store.start(id).unwrap();
        assert!(matches!(event, Event::TimerResumed { .. }));
    }

    #[test]
    fn pause_leaves_elapsed_untouched() {
        let mut store = TimerStore::new();
        let id = store.create(plain_config(60));
        store.start(id);
        store.tick(id);
        store.tick(id);
        store.pause(id);
        let timer = store.get(id).unwrap();
        assert!(!timer.is_running && timer.is_paused);
        assert_eq!(timer.elapsed, 2);
        assert_eq!(timer.remaining, 58);
    }

    #[test]
    fn pause_then_resume_matches_continuous_run() {
        let mut store = TimerStore::new();
        let id = store.create(plain_config(10));
        store.start(id);
        for _ in 0..3 {
            store.tick(id);
        }
        store.pause(id);
        // Ticks during the pause window must not advance anything.
        for _ in 0..5 {
            assert!(store.tick(id).is_empty());
        }
        store.start(id);
        for _ in 0..3 {
            store.tick(id);
        }
        assert_eq!(store.get(id).unwrap().elapsed, 6);
    }

    #[test]
    fn tick_maintains_duration_budget() {
        let mut store = TimerStore::new();
        let id = store.create(plain_config(5));
        store.start(id);
        for _ in 0..5 {
            store.tick(id);
            let timer = store.get(id).unwrap();
            assert_eq!(timer.elapsed + timer.remaining, timer.duration);
        }
    }

    #[test]
    fn completion_flips_exactly_at_zero_remaining() {
        let mut store = TimerStore::new();
        let id = store.create(plain_config(3));
        store.start(id);
        store.tick(id);
        store.tick(id);
        assert!(!store.get(id).unwrap().is_completed);
        let events = store.tick(id);
        assert!(matches!(events[..], [Event::TimerCompleted { .. }]));
        let timer = store.get(id).unwrap();
        assert!(timer.is_completed);
        assert!(!timer.is_running);
        assert_eq!(timer.remaining, 0);
        assert!(timer.completed_at.is_some());
        // No further ticking once stopped.
        assert!(store.tick(id).is_empty());
        assert_eq!(store.get(id).unwrap().elapsed, 3);
    }

    #[test]
    fn stage_progression_matches_cumulative_windows() {
        let mut store = TimerStore::new();
        let id = store.create(hiit_config());
        store.start(id);

        for expected_tick in 1..=19 {
            store.tick(id);
            let timer = store.get(id).unwrap();
            assert_eq!(timer.elapsed, expected_tick);
            assert_eq!(timer.current_stage_index, Some(0));
        }

        let events = store.tick(id); // 20th
        assert!(matches!(
            events[..],
            [Event::StageAdvanced {
                from_index: 0,
                to_index: 1,
                ..
            }]
        ));
        assert_eq!(store.get(id).unwrap().current_stage_index, Some(1));

        for _ in 21..=29 {
            assert!(store.tick(id).is_empty());
        }
        assert_eq!(store.get(id).unwrap().current_stage_index, Some(1));

        let events = store.tick(id); // 30th
        assert!(matches!(
            events[..],
            [Event::StageAdvanced {
                from_index: 1,
                to_index: 2,
                ..
            }]
        ));

        for _ in 31..=49 {
            store.tick(id);
        }
        let events = store.tick(id); // 50th
        assert!(matches!(events[..], [Event::TimerCompleted { .. }]));
        let timer = store.get(id).unwrap();
        assert!(timer.is_completed);
        assert_eq!(timer.current_stage_index, Some(2));
    }

    #[test]
    fn stage_advance_event_carries_names() {
        let mut store = TimerStore::new();
        let id = store.create(hiit_config());
        store.start(id);
        for _ in 0..19 {
            store.tick(id);
        }
        match &store.tick(id)[..] {
            [Event::StageAdvanced {
                from_name, to_name, ..
            }] => {
                assert_eq!(from_name, "Work 1");
                assert_eq!(to_name, "Rest 1");
            }
            other => panic!("expected StageAdvanced, got {other:?}"),
        }
    }

    #[test]
    fn zero_length_stages_are_skipped() {
        let mut store = TimerStore::new();
        let id = store.create(TimerConfig {
            kind: TimerKind::Hiit,
            name: "HIIT".into(),
            category: TimerCategory::Fitness,
            duration: 0,
            stages: Some(vec![
                stage("Work 1", 2, StageKind::Work),
                stage("Rest 1", 0, StageKind::Rest),
                stage("Work 2", 2, StageKind::Work),
            ]),
        });
        store.start(id);
        store.tick(id);
        assert_eq!(store.get(id).unwrap().current_stage_index, Some(0));
        // Boundary crossing jumps straight over the empty stage.
        let events = store.tick(id);
        assert!(matches!(
            events[..],
            [Event::StageAdvanced {
                from_index: 0,
                to_index: 2,
                ..
            }]
        ));
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut store = TimerStore::new();
        let id = store.create(hiit_config());
        store.start(id);
        for _ in 0..25 {
            store.tick(id);
        }
        store.reset(id);
        let timer = store.get(id).unwrap();
        assert_eq!(timer.elapsed, 0);
        assert_eq!(timer.remaining, 50);
        assert!(!timer.is_running && !timer.is_paused && !timer.is_completed);
        assert_eq!(timer.current_stage_index, Some(0));
        assert!(timer.started_at.is_none());
        assert!(timer.completed_at.is_none());
    }

    #[test]
    fn set_duration_zeroes_elapsed_mid_run() {
        let mut store = TimerStore::new();
        let id = store.create(plain_config(60));
        store.start(id);
        for _ in 0..10 {
            store.tick(id);
        }
        store.set_duration(id, 90);
        let timer = store.get(id).unwrap();
        assert_eq!(timer.duration, 90);
        assert_eq!(timer.remaining, 90);
        assert_eq!(timer.elapsed, 0);
        assert!(timer.is_running);
    }

    #[test]
    fn stopwatch_never_completes() {
        let mut store = TimerStore::new();
        let id = store.create(TimerConfig {
            kind: TimerKind::Stopwatch,
            name: "Stopwatch".into(),
            category: TimerCategory::Productivity,
            duration: 0,
            stages: None,
        });
        store.start(id);
        for _ in 0..500 {
            store.advance_stopwatch(id);
        }
        let timer = store.get(id).unwrap();
        assert_eq!(timer.elapsed, 500);
        assert_eq!(timer.remaining, 0);
        assert!(!timer.is_completed);
        assert!(timer.is_running);
    }

    #[test]
    fn stopwatch_does_not_advance_while_paused() {
        let mut store = TimerStore::new();
        let id = store.create(plain_config(0));
        store.start(id);
        store.advance_stopwatch(id);
        store.pause(id);
        assert!(store.advance_stopwatch(id).is_none());
        assert_eq!(store.get(id).unwrap().elapsed, 1);
    }

    #[test]
    fn operations_on_unknown_id_are_noops() {
        let mut store = TimerStore::new();
        let id = store.create(plain_config(60));
        let ghost = TimerId::new_v4();
        assert!(store.start(ghost).is_none());
        assert!(store.pause(ghost).is_none());
        assert!(store.reset(ghost).is_none());
        assert!(store.set_duration(ghost, 10).is_none());
        assert!(store.advance_stopwatch(ghost).is_none());
        assert!(store.tick(ghost).is_empty());
        store.remove(ghost);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().duration, 60);
    }

    #[test]
    fn remove_clears_matching_active_pointer() {
        let mut store = TimerStore::new();
        let a = store.create(plain_config(10));
        let b = store.create(plain_config(10));
        store.start(a);
        store.start(b);
        store.remove(a);
        // b was started last; removing a leaves it active.
        assert_eq!(store.active().unwrap().id, b);
        store.remove(b);
        assert!(store.active().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn ticks_after_remove_leave_store_unchanged() {
        let mut store = TimerStore::new();
        let keep = store.create(plain_config(30));
        let gone = store.create(plain_config(30));
        store.start(keep);
        store.start(gone);
        store.remove(gone);
        assert!(store.tick(gone).is_empty());
        assert!(store.pause(gone).is_none());
        assert_eq!(store.len(), 1);
        assert!(store.get(keep).unwrap().is_running);
    }

    #[test]
    fn independent_timers_tick_independently() {
        let mut store = TimerStore::new();
        let a = store.create(plain_config(10));
        let b = store.create(plain_config(10));
        store.start(a);
        store.start(b);
        store.tick(a);
        store.tick(a);
        store.tick(b);
        assert_eq!(store.get(a).unwrap().elapsed, 2);
        assert_eq!(store.get(b).unwrap().elapsed, 1);
    }

    proptest! {
        /// elapsed + remaining == duration holds through any run length,
        /// and the stage index never moves backwards.
        #[test]
        fn tick_invariants_hold(
            durations in proptest::collection::vec(1u64..30, 1..6),
            ticks in 0usize..200,
        ) {
            let stages: Vec<TimerStage> = durations
                .iter()
                .enumerate()
                .map(|(i, &d)| TimerStage {
                    id: format!("stage-{i}"),
                    name: format!("Work {}", i + 1),
                    duration: d,
                    kind: StageKind::Work,
                })
                .collect();
            let total: u64 = durations.iter().sum();

            let mut store = TimerStore::new();
            let id = store.create(TimerConfig {
                kind: TimerKind::Hiit,
                name: "HIIT".into(),
                category: TimerCategory::Fitness,
                duration: 0,
                stages: Some(stages),
            });
            store.start(id);

            let mut last_index = 0;
            for _ in 0..ticks {
                store.tick(id);
                let timer = store.get(id).unwrap();
                prop_assert_eq!(timer.elapsed + timer.remaining, timer.duration);
                prop_assert_eq!(timer.duration, total);
                let index = timer.current_stage_index.unwrap();
                prop_assert!(index >= last_index, "stage index moved backwards");
                prop_assert!(index < timer.stage_count());
                last_index = index;
                prop_assert_eq!(timer.is_completed, timer.remaining == 0);
                prop_assert_eq!(timer.is_running, !timer.is_completed);
            }
        }
    }
}
