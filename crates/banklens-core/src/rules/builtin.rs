use crate::error::BankLensError;
use crate::rules::parse_config_str;
use crate::rules::schema::AnalysisConfig;

const DEFAULT_JSON: &str = include_str!("../../../../rules/default.json");
const STRICT_JSON: &str = include_str!("../../../../rules/strict.json");

/// Available predefined analysis profiles.
pub const PRESETS: &[&str] = &["default", "strict"];

/// Load a predefined analysis profile by name.
pub fn load_preset(name: &str) -> Result<AnalysisConfig, BankLensError> {
    match name {
        "default" => parse_config_str(DEFAULT_JSON),
        "strict" => parse_config_str(STRICT_JSON),
        _ => Err(BankLensError::ConfigInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

/// The profile used when no config is given.
pub fn default_config() -> Result<AnalysisConfig, BankLensError> {
    load_preset("default")
}
