//! Per-owner timer controller.
//!
//! A `TimerBinding` bridges one owner (a UI component, a CLI run) to one
//! store-managed timer: it creates the timer on mount, owns the one-second
//! tick schedule while the timer runs, dispatches sound/notification
//! effects from the events the store returns, and removes the timer again
//! on unmount. Any number of bindings can run concurrently; each operates
//! only on its own entry in the shared store.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::entity::{StageKind, Timer, TimerCategory, TimerConfig, TimerId, TimerKind, TimerStage};
use super::store::{lock, SharedStore};
use super::ticker::{Ticker, TICK_PERIOD};
use crate::effects::{Effects, SoundKind, TitleLabelFn};
use crate::events::Event;
use crate::util::time::{format_clock, progress_pct, ClockFormat};

/// Completion pulse pattern in milliseconds.
const VIBRATE_PATTERN: [u64; 3] = [200, 100, 200];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[default]
    Countdown,
    Stopwatch,
}

/// Work/rest shorthand for interval timers, expanded into named stages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntervalSpec {
    /// Interval length in seconds.
    pub duration: u64,
    pub kind: StageKind,
}

pub type CompleteCallback = Arc<dyn Fn() + Send + Sync>;
pub type TickCallback = Arc<dyn Fn(&Timer) + Send + Sync>;

/// Bind-time configuration. Constructed once; controls after that go
/// through the binding's methods, not through re-configuration.
#[derive(Clone)]
pub struct BindOptions {
    pub mode: TimerMode,
    /// Initial total seconds. Ignored when `intervals` or `stages` are set,
    /// and forced to 0 for stopwatches.
    pub duration: u64,
    pub name: Option<String>,
    pub kind: Option<TimerKind>,
    pub category: Option<TimerCategory>,
    /// Expanded into "Work N"/"Rest N" stages; their sum becomes the total.
    pub intervals: Vec<IntervalSpec>,
    /// Explicit named stages; wins over `intervals`.
    pub stages: Vec<TimerStage>,
    pub auto_start: bool,
    pub on_complete: Option<CompleteCallback>,
    pub on_tick: Option<TickCallback>,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            mode: TimerMode::Countdown,
            duration: 60,
            name: None,
            kind: None,
            category: None,
            intervals: Vec::new(),
            stages: Vec::new(),
            auto_start: false,
            on_complete: None,
            on_tick: None,
        }
    }
}

impl BindOptions {
    pub fn countdown(duration: u64) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    pub fn stopwatch() -> Self {
        Self {
            mode: TimerMode::Stopwatch,
            ..Self::default()
        }
    }

    pub fn auto_start(mut self) -> Self {
        self.auto_start = true;
        self
    }

    pub fn with_intervals(mut self, intervals: Vec<IntervalSpec>) -> Self {
        self.intervals = intervals;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn into_config(self) -> (TimerConfig, TimerMode, Option<CompleteCallback>, Option<TickCallback>) {
        let mode = self.mode;
        let stages = if !self.stages.is_empty() {
            Some(self.stages)
        } else if !self.intervals.is_empty() {
            Some(expand_intervals(&self.intervals))
        } else {
            None
        };
        let (default_kind, default_name, duration) = match mode {
            TimerMode::Stopwatch => (TimerKind::Stopwatch, "Stopwatch", 0),
            TimerMode::Countdown => (TimerKind::Countdown, "Timer", self.duration),
        };
        let config = TimerConfig {
            kind: self.kind.unwrap_or(default_kind),
            name: self.name.unwrap_or_else(|| default_name.to_string()),
            category: self.category.unwrap_or(TimerCategory::Productivity),
            duration,
            stages,
        };
        (config, mode, self.on_complete, self.on_tick)
    }
}

fn expand_intervals(intervals: &[IntervalSpec]) -> Vec<TimerStage> {
    intervals
        .iter()
        .enumerate()
        .map(|(index, spec)| TimerStage {
            id: format!("stage-{index}"),
            name: format!("{} {}", spec.kind.label_prefix(), index + 1),
            duration: spec.duration,
            kind: spec.kind,
        })
        .collect()
}

/// Controller for one store-managed timer, alive for one owner's lifetime.
///
/// Dropping the binding unmounts it: the tick schedule is cancelled and
/// the timer leaves the store. Every control call on a timer that is
/// already gone is a silent no-op.
pub struct TimerBinding {
    store: SharedStore,
    effects: Effects,
    id: TimerId,
    mode: TimerMode,
    on_complete: Option<CompleteCallback>,
    on_tick: Option<TickCallback>,
    ticker: Mutex<Option<Ticker>>,
}

impl TimerBinding {
    /// Create the timer in the store and return its controller, starting it
    /// immediately when `auto_start` is set. Requires a tokio runtime.
    pub fn mount(store: SharedStore, effects: Effects, options: BindOptions) -> Self {
        let auto_start = options.auto_start;
        let (config, mode, on_complete, on_tick) = options.into_config();
        let id = lock(&store).create(config);
        let binding = Self {
            store,
            effects,
            id,
            mode,
            on_complete,
            on_tick,
            ticker: Mutex::new(None),
        };
        if auto_start {
            binding.start();
        }
        binding
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Begin running: store start, start sound, live title, tick schedule.
    pub fn start(&self) {
        if lock(&self.store).start(self.id).is_none() {
            return;
        }
        self.effects.sound.play(SoundKind::TimerStart);
        self.begin_title_ticker();
        self.arm_ticker();
    }

    /// Identical to [`start`](Self::start); reads better after a pause.
    pub fn resume(&self) {
        self.start();
    }

    pub fn pause(&self) {
        if lock(&self.store).pause(self.id).is_none() {
            return;
        }
        self.cancel_ticker();
        self.effects.notifier.stop_title_ticker();
    }

    pub fn reset(&self) {
        if lock(&self.store).reset(self.id).is_none() {
            return;
        }
        self.cancel_ticker();
        self.effects.notifier.stop_title_ticker();
    }

    /// Change the countdown target, zeroing progress. No-op for stopwatches.
    pub fn set_duration(&self, secs: u64) {
        if self.mode == TimerMode::Stopwatch {
            return;
        }
        lock(&self.store).set_duration(self.id, secs);
    }

    /// Cancel the tick schedule and remove the timer from the store.
    /// Also runs on drop; calling it twice is harmless.
    pub fn unmount(&self) {
        self.cancel_ticker();
        self.effects.notifier.stop_title_ticker();
        lock(&self.store).remove(self.id);
    }

    // ── Derived reads ────────────────────────────────────────────────

    pub fn snapshot(&self) -> Option<Timer> {
        lock(&self.store).get(self.id).cloned()
    }

    pub fn is_running(&self) -> bool {
        self.snapshot().map(|t| t.is_running).unwrap_or(false)
    }

    pub fn is_paused(&self) -> bool {
        self.snapshot().map(|t| t.is_paused).unwrap_or(false)
    }

    pub fn is_completed(&self) -> bool {
        self.snapshot().map(|t| t.is_completed).unwrap_or(false)
    }

    /// Percent complete, 0.0 for stopwatches.
    pub fn progress(&self) -> f64 {
        if self.mode == TimerMode::Stopwatch {
            return 0.0;
        }
        self.snapshot()
            .map(|t| progress_pct(t.elapsed, t.duration))
            .unwrap_or(0.0)
    }

    /// 1-based current interval, 0 when the timer has no stages.
    pub fn current_interval(&self) -> usize {
        self.snapshot()
            .and_then(|t| t.current_stage_index)
            .map(|index| index + 1)
            .unwrap_or(0)
    }

    pub fn total_intervals(&self) -> usize {
        self.snapshot().map(|t| t.stage_count()).unwrap_or(0)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn arm_ticker(&self) {
        let mut guard = self.ticker.lock().unwrap_or_else(|e| e.into_inner());
        if guard.as_ref().is_some_and(Ticker::is_armed) {
            return;
        }
        let store = Arc::clone(&self.store);
        let effects = self.effects.clone();
        let id = self.id;
        let mode = self.mode;
        let on_complete = self.on_complete.clone();
        let on_tick = self.on_tick.clone();
        *guard = Some(Ticker::arm(TICK_PERIOD, move || {
            run_tick(
                &store,
                &effects,
                id,
                mode,
                on_complete.as_deref(),
                on_tick.as_deref(),
            )
        }));
    }

    fn cancel_ticker(&self) {
        let mut guard = self.ticker.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ticker) = guard.take() {
            ticker.cancel();
        }
    }

    fn begin_title_ticker(&self) {
        let Some(timer) = self.snapshot() else {
            return;
        };
        let store = Arc::clone(&self.store);
        let id = self.id;
        let mode = self.mode;
        let label: TitleLabelFn = Box::new(move || {
            let guard = lock(&store);
            let Some(timer) = guard.get(id) else {
                return "00:00".into();
            };
            let secs = match mode {
                TimerMode::Stopwatch => timer.elapsed,
                TimerMode::Countdown => timer.remaining,
            };
            format_clock(secs, ClockFormat::MmSs)
        });
        self.effects.notifier.start_title_ticker(label, &timer.name);
    }
}

impl Drop for TimerBinding {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// One firing of the tick schedule. Returns whether to keep the schedule
/// armed: a missing, paused, or completed timer ends it.
fn run_tick(
    store: &SharedStore,
    effects: &Effects,
    id: TimerId,
    mode: TimerMode,
    on_complete: Option<&(dyn Fn() + Send + Sync)>,
    on_tick: Option<&(dyn Fn(&Timer) + Send + Sync)>,
) -> bool {
    // Mutate under the lock, dispatch effects outside it.
    let (events, snapshot) = {
        let mut guard = lock(store);
        let events = match mode {
            TimerMode::Stopwatch => guard.advance_stopwatch(id).into_iter().collect(),
            TimerMode::Countdown => guard.tick(id),
        };
        (events, guard.get(id).cloned())
    };
    let Some(timer) = snapshot else {
        // Owner unmounted between firings; nothing was mutated.
        return false;
    };

    for event in &events {
        if let Event::StageAdvanced {
            from_name, to_name, ..
        } = event
        {
            effects.sound.play(SoundKind::IntervalChange);
            effects.notifier.interval_change(from_name, to_name);
        }
    }

    if let Some(on_tick) = on_tick {
        on_tick(&timer);
    }

    for event in &events {
        if let Event::TimerCompleted { name, .. } = event {
            effects.sound.play(SoundKind::TimerComplete);
            effects.notifier.timer_complete(name);
            effects.notifier.stop_title_ticker();
            let vibrate = effects
                .settings
                .read()
                .map(|settings| settings.vibration_enabled)
                .unwrap_or(false);
            if vibrate {
                effects.notifier.vibrate(&VIBRATE_PATTERN);
            }
            if let Some(on_complete) = on_complete {
                on_complete();
            }
        }
    }

    timer.is_running
}
