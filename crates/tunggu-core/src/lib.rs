//! # Tunggu Core Library
//!
//! Core timer runtime for Tunggu, a collection of purpose-specific timers
//! (kitchen, fitness, productivity, games). The CLI binary is a thin layer
//! over this library; any other front end binds the same way.
//!
//! ## Architecture
//!
//! - **Timer store**: the single source of truth for timer entities.
//!   An explicit object, not a global -- construct one per application
//!   (or per test) and share it behind [`SharedStore`].
//! - **Binding**: the per-owner controller. It creates a timer on mount,
//!   drives the one-second tick schedule while the timer runs, dispatches
//!   side effects from the events the store returns, and removes the
//!   timer on unmount.
//! - **Effects**: narrow sound/notification/settings interfaces the
//!   binding consults; implementations are fire-and-forget.
//! - **Storage**: TOML settings and SQLite session history under
//!   `~/.config/tunggu/`.
//!
//! ## Key Components
//!
//! - [`TimerStore`]: timer entity store and tick state machine
//! - [`TimerBinding`]: per-owner controller with scheduled ticking
//! - [`Settings`]: user preferences consulted for effect dispatch
//! - [`HistoryDb`]: finished-session log and statistics

pub mod effects;
pub mod error;
pub mod events;
pub mod storage;
pub mod timer;
pub mod util;

pub use effects::{Effects, Notifier, NullNotifier, NullSound, SoundKind, SoundPlayer};
pub use error::{ConfigError, CoreError, HistoryError, ValidationError};
pub use events::Event;
pub use storage::{
    HistoryDb, KindStat, SessionRecord, SessionStats, Settings, SettingsHandle, StatsRange,
};
pub use timer::{
    BindOptions, IntervalSpec, SharedStore, StageKind, Timer, TimerBinding, TimerCategory,
    TimerConfig, TimerId, TimerKind, TimerMode, TimerStage, TimerStore,
};
