//! Built-in timer presets, one per purpose-specific timer page.
//!
//! Durations follow the original timer collection: eggs at 5/8/11 minutes,
//! tea steeps between 2 and 5 minutes, the classic 25+5 pomodoro cycle,
//! 52/17 deep work, 20s/10s HIIT rounds, 4-4-4-4 box breathing.

use serde::{Deserialize, Serialize};

use super::entity::{StageKind, TimerCategory, TimerConfig, TimerKind, TimerStage};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub slug: String,
    pub name: String,
    pub kind: TimerKind,
    pub category: TimerCategory,
    /// Total seconds for plain countdowns; ignored when stages exist.
    pub duration: u64,
    #[serde(default)]
    pub stages: Option<Vec<TimerStage>>,
}

impl Preset {
    pub fn to_config(&self) -> TimerConfig {
        TimerConfig {
            kind: self.kind,
            name: self.name.clone(),
            category: self.category,
            duration: self.duration,
            stages: self.stages.clone(),
        }
    }

    /// Total seconds including stages.
    pub fn total_secs(&self) -> u64 {
        match &self.stages {
            Some(stages) => stages.iter().map(|s| s.duration).sum(),
            None => self.duration,
        }
    }
}

fn plain(
    slug: &str,
    name: &str,
    kind: TimerKind,
    category: TimerCategory,
    duration: u64,
) -> Preset {
    Preset {
        slug: slug.into(),
        name: name.into(),
        kind,
        category,
        duration,
        stages: None,
    }
}

fn stage(index: usize, name: &str, duration: u64, kind: StageKind) -> TimerStage {
    TimerStage {
        id: format!("stage-{index}"),
        name: name.into(),
        duration,
        kind,
    }
}

/// HIIT rounds: work every round, rest between rounds (none after the last).
fn hiit_stages(work: u64, rest: u64, rounds: usize) -> Vec<TimerStage> {
    let mut stages = Vec::new();
    for round in 0..rounds {
        stages.push(stage(
            stages.len(),
            &format!("Work {}", round + 1),
            work,
            StageKind::Work,
        ));
        if round + 1 < rounds {
            stages.push(stage(
                stages.len(),
                &format!("Rest {}", round + 1),
                rest,
                StageKind::Rest,
            ));
        }
    }
    stages
}

/// Box breathing: inhale, hold, exhale, hold, all equal, repeated.
fn box_breathing_stages(phase_secs: u64, cycles: usize) -> Vec<TimerStage> {
    let phases = [
        ("Inhale", StageKind::Work),
        ("Hold", StageKind::Rest),
        ("Exhale", StageKind::Work),
        ("Hold", StageKind::Rest),
    ];
    let mut stages = Vec::new();
    for cycle in 0..cycles {
        for (label, kind) in phases {
            stages.push(stage(
                stages.len(),
                &format!("{label} {}", cycle + 1),
                phase_secs,
                kind,
            ));
        }
    }
    stages
}

/// Classic pomodoro: four focus blocks with short breaks, long break last.
fn pomodoro_stages() -> Vec<TimerStage> {
    let mut stages = Vec::new();
    for round in 0..4 {
        stages.push(stage(
            stages.len(),
            &format!("Focus {}", round + 1),
            25 * 60,
            StageKind::Work,
        ));
        let (label, secs) = if round == 3 {
            ("Long Break", 15 * 60)
        } else {
            ("Short Break", 5 * 60)
        };
        stages.push(stage(stages.len(), label, secs, StageKind::Break));
    }
    stages
}

/// Every built-in preset, grouped by category in display order.
pub fn all() -> Vec<Preset> {
    let mut presets = vec![
        // Kitchen
        plain("egg-soft", "Soft Egg", TimerKind::EggTimer, TimerCategory::Kitchen, 5 * 60),
        plain("egg-medium", "Medium Egg", TimerKind::EggTimer, TimerCategory::Kitchen, 8 * 60),
        plain("egg-hard", "Hard Egg", TimerKind::EggTimer, TimerCategory::Kitchen, 11 * 60),
        plain("tea-green", "Green Tea", TimerKind::TeaTimer, TimerCategory::Kitchen, 2 * 60),
        plain("tea-white", "White Tea", TimerKind::TeaTimer, TimerCategory::Kitchen, 3 * 60),
        plain("tea-oolong", "Oolong Tea", TimerKind::TeaTimer, TimerCategory::Kitchen, 3 * 60),
        plain("tea-black", "Black Tea", TimerKind::TeaTimer, TimerCategory::Kitchen, 4 * 60),
        plain("tea-herbal", "Herbal Tea", TimerKind::TeaTimer, TimerCategory::Kitchen, 5 * 60),
        // Fitness
        plain("power-nap", "Power Nap", TimerKind::PowerNap, TimerCategory::Fitness, 20 * 60),
        plain("meditation", "Meditation", TimerKind::Meditation, TimerCategory::Fitness, 10 * 60),
        // Productivity
        plain("quick-burst", "Quick Burst", TimerKind::QuickBurst, TimerCategory::Productivity, 10 * 60),
        // Games
        plain("five-second-rule", "Five Second Rule", TimerKind::FiveSecondRule, TimerCategory::Games, 5),
        plain("board-game-turn", "Board Game Turn", TimerKind::BoardGame, TimerCategory::Games, 60),
    ];

    presets.push(Preset {
        slug: "hiit".into(),
        name: "HIIT".into(),
        kind: TimerKind::Hiit,
        category: TimerCategory::Fitness,
        duration: 0,
        stages: Some(hiit_stages(20, 10, 8)),
    });
    presets.push(Preset {
        slug: "box-breathing".into(),
        name: "Box Breathing".into(),
        kind: TimerKind::BoxBreathing,
        category: TimerCategory::Fitness,
        duration: 0,
        stages: Some(box_breathing_stages(4, 4)),
    });
    presets.push(Preset {
        slug: "pomodoro".into(),
        name: "Pomodoro".into(),
        kind: TimerKind::Pomodoro,
        category: TimerCategory::Fitness,
        duration: 0,
        stages: Some(pomodoro_stages()),
    });
    presets.push(Preset {
        slug: "52-17".into(),
        name: "52/17".into(),
        kind: TimerKind::FiftyTwoSeventeen,
        category: TimerCategory::Productivity,
        duration: 0,
        stages: Some(vec![
            stage(0, "Work", 52 * 60, StageKind::Work),
            stage(1, "Rest", 17 * 60, StageKind::Rest),
        ]),
    });

    presets
}

pub fn find(slug: &str) -> Option<Preset> {
    all().into_iter().find(|preset| preset.slug == slug)
}

pub fn by_category(category: TimerCategory) -> Vec<Preset> {
    all()
        .into_iter()
        .filter(|preset| preset.category == category)
        .collect()
}
