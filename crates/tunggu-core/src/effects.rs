//! Narrow interfaces to the side-effect collaborators.
//!
//! Implementations are fire-and-forget: a failed sound or notification must
//! never disturb timer state progression, so nothing here returns a result.
//! Swallow failures at the boundary.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::SettingsHandle;

/// Which synthetic sound to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoundKind {
    TimerStart,
    TimerComplete,
    IntervalChange,
    KitchenTimer,
    FitnessTimer,
    AlertWarning,
}

/// Produces the live label for the title ticker, e.g. `"04:59"`.
pub type TitleLabelFn = Box<dyn Fn() -> String + Send + Sync>;

pub trait SoundPlayer: Send + Sync {
    fn play(&self, kind: SoundKind);
}

pub trait Notifier: Send + Sync {
    /// A timer ran out.
    fn timer_complete(&self, timer_name: &str);

    /// An interval timer crossed a stage boundary.
    fn interval_change(&self, from_stage: &str, to_stage: &str);

    /// Begin updating the window/tab title once a second with the label the
    /// closure produces, prefixed by the timer name.
    fn start_title_ticker(&self, label: TitleLabelFn, timer_name: &str);

    /// Stop the title updates and restore the original title.
    fn stop_title_ticker(&self);

    /// Haptic pulse pattern in milliseconds. Most hosts can't; default no-op.
    fn vibrate(&self, _pattern: &[u64]) {}
}

/// Silent sound player for tests and headless use.
#[derive(Debug, Default)]
pub struct NullSound;

impl SoundPlayer for NullSound {
    fn play(&self, _kind: SoundKind) {}
}

/// Inert notifier for tests and headless use.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn timer_complete(&self, _timer_name: &str) {}
    fn interval_change(&self, _from_stage: &str, _to_stage: &str) {}
    fn start_title_ticker(&self, _label: TitleLabelFn, _timer_name: &str) {}
    fn stop_title_ticker(&self) {}
}

/// The collaborator bundle a binding consults while dispatching effects.
#[derive(Clone)]
pub struct Effects {
    pub sound: Arc<dyn SoundPlayer>,
    pub notifier: Arc<dyn Notifier>,
    pub settings: SettingsHandle,
}

impl Effects {
    pub fn new(
        sound: Arc<dyn SoundPlayer>,
        notifier: Arc<dyn Notifier>,
        settings: SettingsHandle,
    ) -> Self {
        Self {
            sound,
            notifier,
            settings,
        }
    }

    /// All-null collaborators over default settings.
    pub fn null() -> Self {
        Self {
            sound: Arc::new(NullSound),
            notifier: Arc::new(NullNotifier),
            settings: crate::storage::Settings::default().into_handle(),
        }
    }
}
