pub mod plan;
pub mod run;

use std::path::Path;

use rutina_core::{EngineConfig, SessionPlan};

/// Load a session plan from a JSON file.
pub fn load_plan(path: &Path) -> Result<SessionPlan, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let plan: SessionPlan = serde_json::from_str(&text)?;
    Ok(plan)
}

/// Load an engine configuration from a TOML file, or the defaults.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}
