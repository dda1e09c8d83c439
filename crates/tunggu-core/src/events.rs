use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerId, TimerKind};

/// Every state change in the store produces an `Event`.
///
/// Store operations return the events instead of firing side effects
/// themselves; the binding (or any other caller) dispatches sound,
/// notification, and callback effects from them. The transition functions
/// stay pure and testable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        id: TimerId,
        name: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        id: TimerId,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        id: TimerId,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        id: TimerId,
        at: DateTime<Utc>,
    },
    DurationChanged {
        id: TimerId,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// One stopwatch second counted.
    StopwatchTicked {
        id: TimerId,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// A tick crossed one or more stage boundaries.
    StageAdvanced {
        id: TimerId,
        from_index: usize,
        to_index: usize,
        from_name: String,
        to_name: String,
        at: DateTime<Utc>,
    },
    /// A countdown ran out. `is_running` dropped in the same transition.
    TimerCompleted {
        id: TimerId,
        kind: TimerKind,
        name: String,
        at: DateTime<Utc>,
    },
}
