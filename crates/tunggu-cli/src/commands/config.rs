use clap::Subcommand;
use tunggu_core::{CoreError, Settings};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print all settings as TOML
    Show,
    /// Print one settings value
    Get {
        /// Field name, e.g. "volume"
        key: String,
    },
    /// Set a settings value and persist it
    Set {
        key: String,
        value: String,
    },
    /// Restore the default settings
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), CoreError> {
    match action {
        ConfigAction::Show => {
            let settings = Settings::load_or_default();
            let rendered = toml::to_string_pretty(&settings)
                .map_err(|e| CoreError::Custom(e.to_string()))?;
            print!("{rendered}");
        }
        ConfigAction::Get { key } => {
            let settings = Settings::load_or_default();
            let value = settings
                .get(&key)
                .ok_or_else(|| CoreError::Custom(format!("unknown settings key '{key}'")))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load_or_default();
            settings.set(&key, &value)?;
            settings.save()?;
            println!("{key} = {}", settings.get(&key).unwrap_or_default());
        }
        ConfigAction::Reset => {
            Settings::default().save()?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
