use clap::Subcommand;
use tunggu_core::timer::presets;
use tunggu_core::util::time::human_duration;
use tunggu_core::{BindOptions, CoreError, TimerCategory};

use crate::common;

#[derive(Subcommand)]
pub enum PresetAction {
    /// List built-in presets grouped by category
    List,
    /// Run a preset in the foreground
    Run {
        /// Preset slug from `preset list`
        slug: String,
        /// Print the final timer state as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(action: PresetAction) -> Result<(), CoreError> {
    match action {
        PresetAction::List => {
            for category in [
                TimerCategory::Kitchen,
                TimerCategory::Fitness,
                TimerCategory::Productivity,
                TimerCategory::Games,
            ] {
                println!("{category}:");
                for preset in presets::by_category(category) {
                    println!(
                        "  {:<18} {:<18} {}",
                        preset.slug,
                        preset.name,
                        human_duration(preset.total_secs())
                    );
                }
            }
            Ok(())
        }
        PresetAction::Run { slug, json } => {
            let preset = presets::find(&slug)
                .ok_or_else(|| CoreError::Custom(format!("unknown preset '{slug}'")))?;
            let config = preset.to_config();
            let options = BindOptions {
                duration: config.duration,
                name: Some(config.name),
                kind: Some(config.kind),
                category: Some(config.category),
                stages: config.stages.unwrap_or_default(),
                ..BindOptions::default()
            };
            common::run_foreground(options, json).await
        }
    }
}
