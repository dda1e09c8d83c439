mod binding;
mod entity;
pub mod presets;
mod store;
mod ticker;

pub use binding::{
    BindOptions, CompleteCallback, IntervalSpec, TickCallback, TimerBinding, TimerMode,
};
pub use entity::{StageKind, Timer, TimerCategory, TimerConfig, TimerId, TimerKind, TimerStage};
pub use store::{SharedStore, TimerStore};
pub use ticker::{Ticker, TICK_PERIOD};
