use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque timer identity. Generated at creation, never reused.
pub type TimerId = Uuid;

/// Semantic timer kind, matching the purpose-specific timer pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerKind {
    EggTimer,
    SteakTimer,
    CoffeeTimer,
    TeaTimer,
    DoughProofing,
    Pomodoro,
    Hiit,
    BoxBreathing,
    Meditation,
    PowerNap,
    #[serde(rename = "52-17")]
    FiftyTwoSeventeen,
    Stopwatch,
    Countdown,
    QuickBurst,
    BoardGame,
    FiveSecondRule,
}

impl TimerKind {
    pub fn as_slug(&self) -> &'static str {
        match self {
            TimerKind::EggTimer => "egg-timer",
            TimerKind::SteakTimer => "steak-timer",
            TimerKind::CoffeeTimer => "coffee-timer",
            TimerKind::TeaTimer => "tea-timer",
            TimerKind::DoughProofing => "dough-proofing",
            TimerKind::Pomodoro => "pomodoro",
            TimerKind::Hiit => "hiit",
            TimerKind::BoxBreathing => "box-breathing",
            TimerKind::Meditation => "meditation",
            TimerKind::PowerNap => "power-nap",
            TimerKind::FiftyTwoSeventeen => "52-17",
            TimerKind::Stopwatch => "stopwatch",
            TimerKind::Countdown => "countdown",
            TimerKind::QuickBurst => "quick-burst",
            TimerKind::BoardGame => "board-game",
            TimerKind::FiveSecondRule => "five-second-rule",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        let kind = match slug {
            "egg-timer" => TimerKind::EggTimer,
            "steak-timer" => TimerKind::SteakTimer,
            "coffee-timer" => TimerKind::CoffeeTimer,
            "tea-timer" => TimerKind::TeaTimer,
            "dough-proofing" => TimerKind::DoughProofing,
            "pomodoro" => TimerKind::Pomodoro,
            "hiit" => TimerKind::Hiit,
            "box-breathing" => TimerKind::BoxBreathing,
            "meditation" => TimerKind::Meditation,
            "power-nap" => TimerKind::PowerNap,
            "52-17" => TimerKind::FiftyTwoSeventeen,
            "stopwatch" => TimerKind::Stopwatch,
            "countdown" => TimerKind::Countdown,
            "quick-burst" => TimerKind::QuickBurst,
            "board-game" => TimerKind::BoardGame,
            "five-second-rule" => TimerKind::FiveSecondRule,
            _ => return None,
        };
        Some(kind)
    }
}

impl std::fmt::Display for TimerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_slug())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerCategory {
    Kitchen,
    Fitness,
    Productivity,
    Games,
}

impl TimerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerCategory::Kitchen => "kitchen",
            TimerCategory::Fitness => "fitness",
            TimerCategory::Productivity => "productivity",
            TimerCategory::Games => "games",
        }
    }
}

impl std::fmt::Display for TimerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-phase flavor for interval-style timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Work,
    Rest,
    Break,
    Prepare,
}

impl StageKind {
    pub fn label_prefix(&self) -> &'static str {
        match self {
            StageKind::Work => "Work",
            StageKind::Rest => "Rest",
            StageKind::Break => "Break",
            StageKind::Prepare => "Prepare",
        }
    }
}

/// A named sub-phase of a timer's total duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerStage {
    pub id: String,
    pub name: String,
    /// Stage length in seconds.
    pub duration: u64,
    pub kind: StageKind,
}

/// A single countdown or stopwatch instance.
///
/// Mutated exclusively through [`TimerStore`](crate::timer::TimerStore)
/// operations so the `remaining`/`elapsed`/stage invariants hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timer {
    pub id: TimerId,
    pub kind: TimerKind,
    pub name: String,
    pub category: TimerCategory,
    /// Target length in seconds. For staged timers this is the stage sum.
    pub duration: u64,
    /// Seconds counted so far.
    pub elapsed: u64,
    /// Always `max(0, duration - elapsed)` after every store mutation.
    pub remaining: u64,
    pub is_running: bool,
    pub is_paused: bool,
    pub is_completed: bool,
    #[serde(default)]
    pub stages: Option<Vec<TimerStage>>,
    #[serde(default)]
    pub current_stage_index: Option<usize>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Timer {
    /// The stage the elapsed time currently falls in, if this timer has any.
    pub fn current_stage(&self) -> Option<&TimerStage> {
        let stages = self.stages.as_deref()?;
        stages.get(self.current_stage_index?)
    }

    pub fn stage_count(&self) -> usize {
        self.stages.as_deref().map(|stages| stages.len()).unwrap_or(0)
    }
}

/// Creation parameters for [`TimerStore::create`](crate::timer::TimerStore::create).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    pub kind: TimerKind,
    pub name: String,
    pub category: TimerCategory,
    /// Ignored when `stages` is non-empty; the stage sum wins.
    pub duration: u64,
    #[serde(default)]
    pub stages: Option<Vec<TimerStage>>,
}
