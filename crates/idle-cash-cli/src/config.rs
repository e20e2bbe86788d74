use idle_cash_core::AllocationConfig;

use crate::input;

/// Load the strategy configuration from a JSON or YAML file, or fall back
/// to the built-in defaults. Either way it is checked before use.
pub fn load_config(path: Option<&str>) -> Result<AllocationConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(p) => {
            let config: AllocationConfig = input::file::read_structured(p)?;
            tracing::info!(path = p, "loaded configuration file");
            config
        }
        None => AllocationConfig::default(),
    };
    config.check()?;
    Ok(config)
}
