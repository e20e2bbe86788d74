use clap::{Args, Subcommand};
use serde_json::Value;

use idle_cash_core::{AllocationConfig, ConfigStore, ConfigUpdate};

use crate::input;

/// Arguments for configuration inspection and updates
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,
    /// Apply a partial update and print the merged configuration
    Update(UpdateArgs),
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Path to JSON file with the fields to change
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_config(
    args: ConfigArgs,
    config: AllocationConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    match args.action {
        ConfigAction::Show => Ok(serde_json::to_value(config)?),
        ConfigAction::Update(update_args) => {
            let update: ConfigUpdate = if let Some(ref path) = update_args.input {
                input::file::read_json(path)?
            } else if let Some(data) = input::stdin::read_stdin()? {
                data
            } else {
                return Err("--input <patch.json> or stdin required for config update".into());
            };
            let store = ConfigStore::new(config)?;
            let updated = store.update(&update)?;
            Ok(serde_json::to_value(&*updated)?)
        }
    }
}
