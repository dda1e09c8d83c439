use clap::Subcommand;
use tunggu_core::{
    BindOptions, CoreError, IntervalSpec, StageKind, TimerCategory, TimerKind,
};

use crate::common::{self, parse_clock_arg};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a countdown in the foreground
    Countdown {
        /// Length as seconds, mm:ss, or hh:mm:ss
        #[arg(long, value_parser = parse_clock_arg)]
        duration: u64,
        /// Display name for the timer
        #[arg(long)]
        name: Option<String>,
        /// Semantic timer kind slug (e.g. "tea-timer")
        #[arg(long)]
        kind: Option<String>,
        /// Print the final timer state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count up until interrupted
    Stopwatch {
        /// Print the final timer state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Alternating work/rest interval rounds
    Intervals {
        /// Work interval in seconds
        #[arg(long, default_value_t = 20)]
        work: u64,
        /// Rest interval in seconds
        #[arg(long, default_value_t = 10)]
        rest: u64,
        /// Number of work rounds
        #[arg(long, default_value_t = 8)]
        rounds: u32,
        /// Print the final timer state as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(action: TimerAction) -> Result<(), CoreError> {
    match action {
        TimerAction::Countdown {
            duration,
            name,
            kind,
            json,
        } => {
            let mut options = BindOptions::countdown(duration);
            options.name = name;
            options.kind = kind
                .map(|slug| {
                    TimerKind::from_slug(&slug)
                        .ok_or_else(|| CoreError::Custom(format!("unknown timer kind '{slug}'")))
                })
                .transpose()?;
            common::run_foreground(options, json).await
        }
        TimerAction::Stopwatch { json } => {
            common::run_foreground(BindOptions::stopwatch(), json).await
        }
        TimerAction::Intervals {
            work,
            rest,
            rounds,
            json,
        } => {
            let mut intervals = Vec::new();
            for round in 0..rounds {
                intervals.push(IntervalSpec {
                    duration: work,
                    kind: StageKind::Work,
                });
                if round + 1 < rounds {
                    intervals.push(IntervalSpec {
                        duration: rest,
                        kind: StageKind::Rest,
                    });
                }
            }
            let mut options = BindOptions::countdown(0)
                .with_intervals(intervals)
                .with_name("Intervals");
            options.kind = Some(TimerKind::Hiit);
            options.category = Some(TimerCategory::Fitness);
            common::run_foreground(options, json).await
        }
    }
}
